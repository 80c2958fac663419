use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand};
use qopt::cli::{self, CheckOptions, CliError, OutputFormat};
use qopt::{Dialect, QueryOptionKind};

#[derive(ClapParser)]
#[command(name = "qopt")]
#[command(about = "qopt - Tokenize URL query options ($filter, $orderby, $expand, ...) into token trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tokenize a $filter expression
    Filter(OptionArgs),
    /// Tokenize a $search expression
    Search(OptionArgs),
    /// Tokenize an $orderby list
    Orderby(OptionArgs),
    /// Tokenize a $compute list
    Compute(OptionArgs),
    /// Tokenize a $select list
    Select(OptionArgs),
    /// Tokenize an $expand list
    Expand(OptionArgs),
    /// Tokenize an $apply sequence
    Apply(OptionArgs),

    /// Dump the raw lexer token stream
    Tokens {
        /// Text to scan (reads from stdin if not provided)
        text: Option<String>,

        /// Use the $search vocabulary
        #[arg(long)]
        search: bool,

        /// Print the tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'qopt docs' to list categories)
        category: String,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Option text without the `$name=` prefix (reads from stdin if not provided)
    text: Option<String>,

    /// Print the token tree as compact JSON
    #[arg(long)]
    json: bool,

    /// Print the token tree as indented JSON
    #[arg(short, long)]
    pretty: bool,

    /// JSON file with tokenizer settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum nesting depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Match keywords and option names ignoring case
    #[arg(long)]
    case_insensitive: bool,

    /// Accept nested option names without '$'
    #[arg(long)]
    no_dollar_prefix: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Filter(args) => run_option(QueryOptionKind::Filter, args),
        Commands::Search(args) => run_option(QueryOptionKind::Search, args),
        Commands::Orderby(args) => run_option(QueryOptionKind::OrderBy, args),
        Commands::Compute(args) => run_option(QueryOptionKind::Compute, args),
        Commands::Select(args) => run_option(QueryOptionKind::Select, args),
        Commands::Expand(args) => run_option(QueryOptionKind::Expand, args),
        Commands::Apply(args) => run_option(QueryOptionKind::Apply, args),
        Commands::Tokens { text, search, json } => run_tokens(text, search, json),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// The argument, else stdin when it is piped
fn read_text(text: Option<String>) -> Result<String, CliError> {
    match text {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_option(kind: QueryOptionKind, args: OptionArgs) -> Result<(), CliError> {
    let mut settings = cli::load_settings(args.config.as_deref())?;
    if let Some(max_depth) = args.max_depth {
        settings.max_depth = max_depth;
    }
    settings.case_insensitive |= args.case_insensitive;
    settings.allow_no_dollar_prefix |= args.no_dollar_prefix;

    let format = if args.pretty {
        OutputFormat::PrettyJson
    } else if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Debug
    };

    let options = CheckOptions {
        kind,
        text: read_text(args.text)?,
        format,
        settings,
    };
    println!("{}", cli::execute_check(&options)?);
    Ok(())
}

fn run_tokens(text: Option<String>, search: bool, json: bool) -> Result<(), CliError> {
    let text = read_text(text)?;
    let dialect = if search {
        Dialect::Search
    } else {
        Dialect::Expression
    };
    let output = cli::dump_tokens(&text, dialect, json)?;
    if json {
        println!("{}", output);
    } else {
        print!("{}", output);
    }
    Ok(())
}
