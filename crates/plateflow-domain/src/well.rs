//! Well addressing: (row, column) pairs and their alphanumeric labels
//!
//! Labels are a single row letter followed by the one-based column number,
//! e.g. row 2, column 3 is `"C4"`. Only rows A-Z can be labelled; there is no
//! multi-letter convention ("AA") and rows >= 26 are rejected explicitly.

use crate::error::AddressError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row letters available to the label codec
const ROW_LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of rows that can be expressed as a label
pub const MAX_LABELLED_ROWS: usize = ROW_LETTERS.len();

/// Zero-based grid position inside a plate
///
/// Ordering is row-major: rows compare first, then columns. Sorting a list of
/// addresses therefore yields the canonical plate scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WellAddress {
    /// Zero-based row
    pub row: usize,
    /// Zero-based column
    pub column: usize,
}

impl WellAddress {
    /// Create an address from zero-based row and column
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Encode a (row, column) pair as a label
    ///
    /// # Examples
    ///
    /// ```
    /// use plateflow_domain::WellAddress;
    ///
    /// assert_eq!(WellAddress::encode(2, 3).unwrap(), "C4");
    /// assert!(WellAddress::encode(26, 0).is_err());
    /// ```
    pub fn encode(row: usize, column: usize) -> Result<String, AddressError> {
        let letter = ROW_LETTERS
            .get(row)
            .ok_or(AddressError::RowOutOfRange { row })?;
        Ok(format!("{}{}", *letter as char, column + 1))
    }

    /// Decode a label into a (row, column) pair
    ///
    /// The row letter is case-insensitive and surrounding whitespace is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use plateflow_domain::WellAddress;
    ///
    /// assert_eq!(WellAddress::decode("C4").unwrap(), (2, 3));
    /// assert!(WellAddress::decode("C0").is_err());
    /// ```
    pub fn decode(label: &str) -> Result<(usize, usize), AddressError> {
        let malformed = |reason: &str| AddressError::MalformedLabel {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = label.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next().ok_or_else(|| malformed("empty label"))?;
        if !letter.is_ascii_alphabetic() {
            return Err(malformed("expected a row letter"));
        }

        let digits = chars.as_str();
        if digits.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(malformed("multi-letter rows are not supported"));
        }
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed("expected a column number after the row letter"));
        }

        let column: usize = digits
            .parse()
            .map_err(|_| malformed("column number does not fit"))?;
        if column == 0 {
            return Err(malformed("columns are numbered from 1"));
        }

        let row = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
        Ok((row, column - 1))
    }

    /// Parse a label into an address
    pub fn parse(label: &str) -> Result<Self, AddressError> {
        let (row, column) = Self::decode(label)?;
        Ok(Self::new(row, column))
    }

    /// The alphanumeric label for this address
    pub fn label(&self) -> Result<String, AddressError> {
        Self::encode(self.row, self.column)
    }
}

impl From<(usize, usize)> for WellAddress {
    fn from((row, column): (usize, usize)) -> Self {
        Self::new(row, column)
    }
}

impl fmt::Display for WellAddress {
    /// Label form where possible, `R{row}C{column}` (zero-based) otherwise
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Ok(label) => f.write_str(&label),
            Err(_) => write!(f, "R{}C{}", self.row, self.column),
        }
    }
}

impl FromStr for WellAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: decode(encode(r, c)) == (r, c) for every labelled row
        #[test]
        fn test_label_roundtrip(row in 0usize..26, column in 0usize..100_000) {
            let label = WellAddress::encode(row, column).unwrap();
            prop_assert_eq!(WellAddress::decode(&label).unwrap(), (row, column));
        }

        /// Property: every row past Z is rejected
        #[test]
        fn test_rows_past_z_rejected(row in 26usize..10_000, column in 0usize..100) {
            prop_assert!(WellAddress::encode(row, column).is_err());
        }
    }
}
