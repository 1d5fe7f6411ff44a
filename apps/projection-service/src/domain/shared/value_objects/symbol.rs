//! Ticker symbol.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Longest ticker accepted, in bytes.
const MAX_SYMBOL_LEN: usize = 21;

/// Uppercased ticker such as `AAPL` or `BRK.B`.
///
/// [`Symbol::new`] only normalizes. Use [`Symbol::parse`] (or `str::parse`)
/// for input that still needs checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Trim and uppercase without validating.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Normalize and validate.
    ///
    /// # Errors
    ///
    /// `DomainError::InvalidValue` when the ticker is empty, longer than
    /// 21 bytes, or has a character other than ASCII alphanumerics, `.` and `-`.
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let symbol = Self::new(value);
        symbol.check()?;
        Ok(symbol)
    }

    /// Ticker text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn check(&self) -> Result<(), DomainError> {
        let reject = |message: String| Err(DomainError::invalid_value("symbol", message));

        if self.0.is_empty() {
            return reject("symbol is empty".to_string());
        }
        if self.0.len() > MAX_SYMBOL_LEN {
            return reject(format!(
                "symbol is {} bytes, limit is {MAX_SYMBOL_LEN}",
                self.0.len()
            ));
        }
        match self
            .0
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-')))
        {
            Some(bad) => reject(format!("symbol contains {bad:?}")),
            None => Ok(()),
        }
    }
}

impl FromStr for Symbol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
