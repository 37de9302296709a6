//! Owner record: an identity and the codes it currently owns.

use serde::{Deserialize, Serialize};

/// An owner and the ordered set of codes it owns.
///
/// The store keeps `codes` in step with the link map; callers only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(alias = "uuid")]
    pub id: String,
    #[serde(default)]
    pub codes: Vec<String>,
}

impl Owner {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            codes: Vec::new(),
        }
    }

    /// Appends `code` unless it is already present. Returns true if added.
    pub fn add_code(&mut self, code: &str) -> bool {
        if self.owns(code) {
            return false;
        }
        self.codes.push(code.to_string());
        true
    }

    /// Removes `code` if present. Returns true if removed.
    pub fn remove_code(&mut self, code: &str) -> bool {
        let before = self.codes.len();
        self.codes.retain(|c| c != code);
        self.codes.len() != before
    }

    pub fn owns(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }
}
