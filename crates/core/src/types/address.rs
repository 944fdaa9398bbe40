//! Delivery address value object.

use serde::{Deserialize, Serialize};

/// A delivery address.
///
/// Flat value object with no lifecycle of its own; it is copied into each
/// order at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    /// State or province.
    pub state: String,
    #[serde(alias = "zipCode")]
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// The address used for demo orders placed without one.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            street: "45 Nelson Mandela Square".to_owned(),
            city: "Sandton, Johannesburg".to_owned(),
            state: "Gauteng".to_owned(),
            postal_code: "2196".to_owned(),
            country: "South Africa".to_owned(),
        }
    }

    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("postalCode", &self.postal_code),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.street, self.city, self.state, self.postal_code, self.country
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_address_is_complete() {
        assert!(Address::demo().missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let address = Address {
            street: " ".to_owned(),
            postal_code: String::new(),
            ..Address::demo()
        };
        assert_eq!(address.missing_fields(), vec!["street", "postalCode"]);
    }

    #[test]
    fn test_accepts_zip_code_alias() {
        let json = r#"{"street":"1 Long St","city":"Cape Town","state":"Western Cape","zipCode":"8001","country":"ZA"}"#;
        let address: Address = serde_json::from_str(json).unwrap();
        assert_eq!(address.postal_code, "8001");
    }
}
