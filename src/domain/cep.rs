//! Brazilian postal code (CEP) newtype
//!
//! A [`Cep`] is always normalized: digits only, at least eight of them. Raw
//! values coming from spreadsheets or pandas exports show up as `64049-999`,
//! `64.049-999`, `64049999.0` or `1001000` (leading zero lost to a numeric
//! column); all of them normalize to the same key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a CEP
pub const CEP_LENGTH: usize = 8;

/// Number of leading digits used for prefix-based fallback
pub const PREFIX_LENGTH: usize = 4;

/// Raw values treated as "no CEP"
const MISSING_MARKERS: [&str; 5] = ["", "nan", "none", "null", "na"];

/// Normalized CEP
///
/// # Examples
///
/// ```
/// use cepgeo::domain::Cep;
///
/// let cep = Cep::parse("64049-999").unwrap();
/// assert_eq!(cep.as_str(), "64049999");
/// assert_eq!(cep.prefix(), "6404");
///
/// assert!(Cep::parse("NaN").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cep(String);

impl Cep {
    /// Normalizes a raw value, returning `None` when the value is missing
    /// or contains no digits at all
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if MISSING_MARKERS.contains(&trimmed.to_ascii_lowercase().as_str()) {
            return None;
        }

        // Float rendering of an integer column
        let trimmed = match trimmed.strip_suffix(".0") {
            Some(head) if !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()) => head,
            _ => trimmed,
        };

        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }

        Some(Self(format!("{:0>width$}", digits, width = CEP_LENGTH)))
    }

    /// Creates a CEP, rejecting missing values
    pub fn new(raw: impl AsRef<str>) -> Result<Self, String> {
        let raw = raw.as_ref();
        Self::parse(raw).ok_or_else(|| format!("Invalid or missing CEP: '{raw}'"))
    }

    /// Returns the normalized digits
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the four-digit prefix used by the fallback table
    pub fn prefix(&self) -> &str {
        self.0.get(..PREFIX_LENGTH).unwrap_or(&self.0)
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Cep {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Cep> for String {
    fn from(cep: Cep) -> Self {
        cep.0
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
