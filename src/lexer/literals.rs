//! Classification of digit-led and word-shaped literals.
//!
//! Digit-led text is ambiguous until enough of it has been read: `2012` may
//! be an integer, the start of a date, a time, or a guid. Each candidate is
//! tried on a checkpoint and rolled back when it does not match; what is left
//! over is a number whose kind comes from its suffix or, without one, from
//! the narrowest type that represents the text exactly.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;

use super::Lexer;
use crate::ast::TokenKind;
use crate::error::{ParseError, ParseResult};

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d{4,}-\d{2}-\d{2}$").expect("date pattern"));

static TIME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,2}:\d{2}(:\d{2}(\.\d{1,12})?)?$").expect("time pattern")
});

static GUID_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$")
        .expect("guid pattern")
});

/// Past this many powers of ten any non-zero mantissa overflows a decimal
const MAX_DECIMAL_EXPONENT: i32 = 56;

/// Kind of a literal written as `prefix'...'`.
///
/// `None` for `null'...'`: typed nulls are rejected.
pub(super) fn type_prefixed_kind(prefix: &str) -> Option<TokenKind> {
    if prefix == "null" {
        return None;
    }
    let kind = [
        ("duration", TokenKind::DurationLiteral),
        ("binary", TokenKind::BinaryLiteral),
        ("X", TokenKind::BinaryLiteral),
        ("geography", TokenKind::GeographyLiteral),
        ("geometry", TokenKind::GeometryLiteral),
    ]
    .iter()
    .find(|(keyword, _)| prefix.eq_ignore_ascii_case(keyword))
    .map(|&(_, kind)| kind)
    .unwrap_or(TokenKind::QuotedLiteral);
    Some(kind)
}

/// Kind of an identifier-shaped word that is not followed by a quote
pub(super) fn classify_word(word: &str) -> TokenKind {
    match word {
        "INF" | "NaN" => TokenKind::DoubleLiteral,
        "INFF" | "INFf" | "NaNF" | "NaNf" => TokenKind::SingleLiteral,
        "null" => TokenKind::NullLiteral,
        w if w.eq_ignore_ascii_case("true") || w.eq_ignore_ascii_case("false") => {
            TokenKind::BooleanLiteral
        }
        _ => TokenKind::Identifier,
    }
}

/// Exact decimal reading of plain or scientific notation.
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(index) => (&text[..index], text[index + 1..].parse::<i32>().ok()?),
        None => (text, 0),
    };
    let mut value = Decimal::from_str_exact(mantissa).ok()?;
    if value.is_zero() {
        return Some(value);
    }
    if exponent >= 0 {
        if exponent > MAX_DECIMAL_EXPONENT {
            return None;
        }
        for _ in 0..exponent {
            value = value.checked_mul(Decimal::TEN)?;
        }
    } else {
        let scale = value.scale().checked_add(exponent.unsigned_abs())?;
        value.set_scale(scale).ok()?;
    }
    Some(value)
}

/// Whether a float's shortest round-trip text reads back as `exact`
fn round_trips<F: std::fmt::Display>(value: Option<F>, finite: bool, exact: Decimal) -> bool {
    match value {
        Some(v) if finite => Decimal::from_str(&v.to_string()).ok() == Some(exact),
        _ => false,
    }
}

/// Narrowest numeric kind representing `text` without loss.
///
/// Integral text tries 32 then 64 bits. Otherwise single wins when it
/// round-trips, then double, then decimal. Text outside the decimal range
/// is a double when finite.
pub(crate) fn best_numeric_kind(text: &str, integral: bool) -> Option<TokenKind> {
    if integral {
        if text.parse::<i32>().is_ok() {
            return Some(TokenKind::IntegerLiteral);
        }
        if text.parse::<i64>().is_ok() {
            return Some(TokenKind::Int64Literal);
        }
    }

    let single = text.parse::<f32>().ok();
    let double = text.parse::<f64>().ok();
    match parse_decimal(text) {
        Some(exact) => {
            if round_trips(single, single.is_some_and(f32::is_finite), exact) {
                Some(TokenKind::SingleLiteral)
            } else if round_trips(double, double.is_some_and(f64::is_finite), exact) {
                Some(TokenKind::DoubleLiteral)
            } else {
                Some(TokenKind::DecimalLiteral)
            }
        }
        None => double
            .filter(|d| d.is_finite())
            .map(|_| TokenKind::DoubleLiteral),
    }
}

/// Kind forced by an explicit type suffix, `None` when the text does not fit
pub(crate) fn suffixed_numeric_kind(text: &str, suffix: char, integral: bool) -> Option<TokenKind> {
    match suffix {
        'M' | 'm' => parse_decimal(text).map(|_| TokenKind::DecimalLiteral),
        'D' | 'd' => text
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .map(|_| TokenKind::DoubleLiteral),
        'F' | 'f' => text
            .parse::<f32>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|_| TokenKind::SingleLiteral),
        'L' | 'l' if integral => text.parse::<i64>().ok().map(|_| TokenKind::Int64Literal),
        _ => None,
    }
}

fn is_date(text: &str) -> bool {
    DATE_SHAPE.is_match(text) && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

fn is_date_time_offset(text: &str) -> bool {
    text.contains(['T', 't'])
        && (DateTime::parse_from_rfc3339(text).is_ok()
            || DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%#z").is_ok())
}

fn is_time_of_day(text: &str) -> bool {
    TIME_SHAPE.is_match(text)
        && ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
            .iter()
            .any(|format| NaiveTime::parse_from_str(text, format).is_ok())
}

fn is_guid(text: &str) -> bool {
    GUID_SHAPE.is_match(text)
}

impl<'a> Lexer<'a> {
    fn scan_digits(&mut self) {
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Index of the first `,`, `)` or whitespace at or after `start`
    fn delimited_end(&self, start: usize) -> usize {
        let mut end = start;
        while let Some(&(_, c)) = self.chars.get(end) {
            if c == ',' || c == ')' || c.is_whitespace() {
                break;
            }
            end += 1;
        }
        end
    }

    /// Match the run from `start` to the next delimiter against `accept`,
    /// moving past the run on success.
    fn scan_delimited(
        &mut self,
        start: usize,
        accept: impl Fn(&str) -> Option<TokenKind>,
    ) -> Option<TokenKind> {
        let end = self.delimited_end(start);
        let kind = accept(self.slice(start, end))?;
        self.position = end;
        Some(kind)
    }

    fn trial(
        &mut self,
        start: usize,
        label: &str,
        accept: impl Fn(&str) -> Option<TokenKind>,
    ) -> Option<TokenKind> {
        let kind = self.try_scan(|lexer| lexer.scan_delimited(start, accept));
        log::trace!(
            "{} trial at {}: {}",
            label,
            self.absolute(start),
            if kind.is_some() { "matched" } else { "rolled back" }
        );
        kind
    }

    /// Guid whose first group begins with a hex letter (`a0eebc99-...`).
    ///
    /// Called with the first group already scanned as a word.
    pub(super) fn try_letter_guid(&mut self, start: usize) -> Option<TokenKind> {
        self.trial(start, "guid", |text| {
            is_guid(text).then_some(TokenKind::GuidLiteral)
        })
    }

    /// Scan a literal whose first digit is the current character.
    ///
    /// `start` is the literal's first character, which is a `-` for
    /// negative numbers.
    pub(super) fn parse_from_digit(&mut self, start: usize) -> ParseResult<TokenKind> {
        if self.current_char() == Some('0') && matches!(self.peek_char(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            while self.current_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance();
            }
            return Ok(TokenKind::BinaryLiteral);
        }

        self.scan_digits();

        let candidate = match self.current_char() {
            Some('-') => self.trial(start, "date/time/guid", |text| {
                if is_date(text) {
                    Some(TokenKind::DateOnlyLiteral)
                } else if is_date_time_offset(text) {
                    Some(TokenKind::DateTimeOffsetLiteral)
                } else if is_guid(text) {
                    Some(TokenKind::GuidLiteral)
                } else {
                    None
                }
            }),
            Some(':') => self.trial(start, "time", |text| {
                is_time_of_day(text).then_some(TokenKind::TimeOnlyLiteral)
            }),
            Some(c) if c.is_alphabetic() => self.trial(start, "guid", |text| {
                is_guid(text).then_some(TokenKind::GuidLiteral)
            }),
            _ => None,
        };
        if let Some(kind) = candidate {
            return Ok(kind);
        }

        let mut integral = true;
        if self.current_char() == Some('.') {
            self.advance();
            self.require_digit()?;
            self.scan_digits();
            integral = false;
        }
        if matches!(self.current_char(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.current_char(), Some('+' | '-')) {
                self.advance();
            }
            self.require_digit()?;
            self.scan_digits();
            integral = false;
        }

        let text = self.slice(start, self.position);
        let kind = match self.current_char() {
            Some(suffix @ ('M' | 'm' | 'D' | 'd' | 'L' | 'l' | 'F' | 'f')) => {
                self.advance();
                suffixed_numeric_kind(text, suffix, integral)
            }
            _ => best_numeric_kind(text, integral),
        };
        kind.ok_or_else(|| ParseError::InvalidNumeric {
            text: self.slice(start, self.position).to_string(),
            position: self.absolute(start),
        })
    }

    fn require_digit(&self) -> ParseResult<()> {
        if self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err(ParseError::DigitExpected {
                position: self.absolute(self.position),
            })
        }
    }
}
