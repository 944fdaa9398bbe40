//! Human-facing order number.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    /// The input does not start with `CD-`.
    #[error("order number must start with {prefix}")]
    MissingPrefix {
        /// Expected prefix.
        prefix: &'static str,
    },
    /// The date segment is not a valid `YYYYMMDD` date.
    #[error("order number date must be YYYYMMDD")]
    InvalidDate,
    /// The sequence segment is not at least three digits.
    #[error("order number sequence must be at least three digits")]
    InvalidSequence,
}

/// A display order number of the form `CD-YYYYMMDD-NNN`.
///
/// Order numbers are a display identifier only. The durable identity of an
/// order is its [`OrderId`](crate::OrderId).
///
/// ## Examples
///
/// ```
/// use chrono::NaiveDate;
/// use clothing_drop_core::OrderNumber;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// let number = OrderNumber::compose(date, 7);
/// assert_eq!(number.as_str(), "CD-20240309-007");
///
/// assert!(OrderNumber::parse("CD-20240309-007").is_ok());
/// assert!(OrderNumber::parse("CD-2024-001").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Prefix shared by every order number.
    pub const PREFIX: &'static str = "CD-";

    /// Build an order number from its date and 1-based sequence.
    #[must_use]
    pub fn compose(date: NaiveDate, sequence: u32) -> Self {
        Self(format!("{}{}-{sequence:03}", Self::PREFIX, date.format("%Y%m%d")))
    }

    /// Parse an order number.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is missing, the date segment is not a
    /// calendar date, or the sequence is shorter than three digits.
    pub fn parse(s: &str) -> Result<Self, OrderNumberError> {
        let rest = s
            .strip_prefix(Self::PREFIX)
            .ok_or(OrderNumberError::MissingPrefix {
                prefix: Self::PREFIX,
            })?;

        let (date, sequence) = rest.split_once('-').ok_or(OrderNumberError::InvalidDate)?;

        if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderNumberError::InvalidDate);
        }
        NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| OrderNumberError::InvalidDate)?;

        if sequence.len() < 3 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OrderNumberError::InvalidSequence);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OrderNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The sequence segment, if this is a well-formed order number.
    #[must_use]
    pub fn sequence(&self) -> Option<u32> {
        self.0.rsplit_once('-').and_then(|(_, seq)| seq.parse().ok())
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for OrderNumber {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    #[test]
    fn test_compose_pads_sequence() {
        assert_eq!(OrderNumber::compose(date(), 1).as_str(), "CD-20251201-001");
        assert_eq!(OrderNumber::compose(date(), 42).as_str(), "CD-20251201-042");
    }

    #[test]
    fn test_parse_valid() {
        let number = OrderNumber::parse("CD-20251201-013").unwrap();
        assert_eq!(number.sequence(), Some(13));
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert!(matches!(
            OrderNumber::parse("XX-20251201-001"),
            Err(OrderNumberError::MissingPrefix { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(
            OrderNumber::parse("CD-20251341-001"),
            Err(OrderNumberError::InvalidDate)
        );
        assert_eq!(
            OrderNumber::parse("CD-2024-001"),
            Err(OrderNumberError::InvalidDate)
        );
    }

    #[test]
    fn test_parse_invalid_sequence() {
        assert_eq!(
            OrderNumber::parse("CD-20251201-01"),
            Err(OrderNumberError::InvalidSequence)
        );
        assert_eq!(
            OrderNumber::parse("CD-20251201-0a1"),
            Err(OrderNumberError::InvalidSequence)
        );
    }

    #[test]
    fn test_serde_transparent() {
        let number = OrderNumber::compose(date(), 3);
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"CD-20251201-003\"");
    }
}
