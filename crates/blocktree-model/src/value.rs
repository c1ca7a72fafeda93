use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest magnitude at which a whole number is still rendered without a decimal part.
const INTEGRAL_DISPLAY_LIMIT: f64 = 1e15;

/// A loosely typed worksheet value.
///
/// Workbooks mix numbers, text, blanks and cached formula results in the same column, so
/// each consumer coerces explicitly: labels always go through [`CellValue::to_text`], suffix
/// detection always goes through [`CellValue::as_number`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Empty / unset cell value.
    #[default]
    Empty,
    /// IEEE-754 double precision number (dates arrive here as serial numbers).
    Number(f64),
    /// Plain text.
    Text(String),
    /// Boolean value. Reads as `True`/`False` and as `1`/`0` when a number is wanted.
    Boolean(bool),
}

impl CellValue {
    /// Returns true for [`CellValue::Empty`] and for zero-length text.
    ///
    /// Whitespace-only text is *not* empty: it is a present value that cleans to an empty
    /// label.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) | CellValue::Boolean(_) => false,
        }
    }

    /// Coerce the value to its string form.
    ///
    /// Whole numbers render without a fractional part (`3.0` becomes `"3"`).
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(format_number(*n)),
            CellValue::Boolean(true) => Cow::Borrowed("True"),
            CellValue::Boolean(false) => Cow::Borrowed("False"),
        }
    }

    /// Attempt a numeric interpretation of the value.
    ///
    /// Text is trimmed and parsed as a float; booleans are `1`/`0`. NaN never counts as a
    /// number.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::Empty => return None,
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Boolean(b) => f64::from(u8::from(*b)),
        };
        (!n.is_nan()).then_some(n)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < INTEGRAL_DISPLAY_LIMIT {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
