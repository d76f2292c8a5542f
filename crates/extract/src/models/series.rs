use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// A book's position within its series.
///
/// Calibre allows fractional positions (novellas slotted between two novels
/// are commonly `1.5`). The value keeps the exact text it was parsed from, so
/// `1`, `1.0` and `1.50` all render differently in generated file names while
/// still comparing equal numerically via [`value`](Self::value).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesIndex {
    text: String,
    value: f64,
}
impl SeriesIndex {
    /// Numeric value of the position.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Textual form used in file names.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Plain decimal notation only: an optional minus sign, digits, and at
    /// most one decimal point with at least one digit somewhere. Rejects the
    /// extras `f64::from_str` accepts (`inf`, `NaN`, exponents, leading `+`).
    fn is_decimal(s: &str) -> bool {
        let digits = s.strip_prefix('-').unwrap_or(s);
        let mut dots = 0;
        let mut seen_digit = false;
        for c in digits.chars() {
            match c {
                '0'..='9' => seen_digit = true,
                '.' => dots += 1,
                _ => return false,
            }
        }
        seen_digit && dots <= 1
    }
}
impl FromStr for SeriesIndex {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ErrorKind::ParseError {
            field: "series_index",
            value: s.to_string(),
        };
        if !Self::is_decimal(text) {
            exn::bail!(invalid());
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self { text: text.to_string(), value }),
            _ => exn::bail!(invalid()),
        }
    }
}
impl From<u32> for SeriesIndex {
    fn from(value: u32) -> Self {
        Self {
            text: value.to_string(),
            value: f64::from(value),
        }
    }
}
impl Display for SeriesIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.text)
    }
}
