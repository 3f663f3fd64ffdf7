//! Stock-keeping unit identifier type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sku`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SkuError {
    /// The input string is empty.
    #[error("SKU cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("SKU must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Z0-9-]`.
    #[error("SKU may only contain uppercase letters, digits, and dashes")]
    InvalidCharacter,
}

/// A stock-keeping unit identifier, unique per variant.
///
/// SKUs follow the warehouse labelling convention: uppercase letters,
/// digits, and dashes, e.g. `SHIRT-M-RED`.
///
/// ## Constraints
///
/// - Length: 1-64 characters
/// - Characters: `A-Z`, `0-9`, `-`
///
/// ## Examples
///
/// ```
/// use wardrobe_core::Sku;
///
/// assert!(Sku::parse("SHIRT-M-RED").is_ok());
/// assert!(Sku::parse("JEANS-32-BLUE").is_ok());
///
/// assert!(Sku::parse("").is_err());         // empty
/// assert!(Sku::parse("shirt m red").is_err()); // lowercase + spaces
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Maximum length of a SKU.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Sku` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 64 characters
    /// - Contains characters outside `[A-Z0-9-]`
    pub fn parse(s: &str) -> Result<Self, SkuError> {
        if s.is_empty() {
            return Err(SkuError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SkuError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(SkuError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Sku` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_conventional_skus() {
        for sku in ["SHIRT-M-RED", "JEANS-32-BLUE", "X", "A1-B2-C3"] {
            assert!(Sku::parse(sku).is_ok(), "{sku} should parse");
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(Sku::parse(""), Err(SkuError::Empty)));
    }

    #[test]
    fn rejects_lowercase_and_whitespace() {
        assert!(matches!(
            Sku::parse("shirt-m-red"),
            Err(SkuError::InvalidCharacter)
        ));
        assert!(matches!(
            Sku::parse("SHIRT M RED"),
            Err(SkuError::InvalidCharacter)
        ));
    }

    #[test]
    fn rejects_overlong() {
        let long = "A".repeat(Sku::MAX_LENGTH + 1);
        assert!(matches!(Sku::parse(&long), Err(SkuError::TooLong { .. })));
    }

    #[test]
    fn round_trips_through_serde() {
        let sku = Sku::parse("SHIRT-M-RED").unwrap();
        let json = serde_json::to_string(&sku).unwrap();
        assert_eq!(json, "\"SHIRT-M-RED\"");
        let back: Sku = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sku);
    }
}
