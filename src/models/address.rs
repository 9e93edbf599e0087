//! Canonical postal address handed to form fields.

use serde::{Deserialize, Serialize};

/// Four-field normalized address consumed by every form.
///
/// All fields are always present; a missing piece is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl CanonicalAddress {
    /// Degraded address built from a suggestion label alone.
    ///
    /// The whole label becomes an unparsed street value.
    pub fn from_label(label: &str) -> Self {
        Self {
            street: label.trim().to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.street.is_empty() && self.city.is_empty() && self.state.is_empty() && self.zip.is_empty()
    }
}

impl std::fmt::Display for CanonicalAddress {
    /// Single-line form: "149 Skillman Street, Brooklyn, NY 11205"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let region = [self.state.as_str(), self.zip.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let parts: Vec<&str> = [self.street.as_str(), self.city.as_str(), region.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();

        f.write_str(&parts.join(", "))
    }
}
