//! Training session kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a training session.
///
/// The kind decides whether a session must pass the HSE gate after the
/// HR gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Health, safety and environment training. Two gates.
    #[serde(alias = "HSE")]
    Hse,
    /// Job-skills training. HR gate only.
    #[serde(alias = "Métier", alias = "métier", alias = "Metier")]
    Metier,
}

impl SessionKind {
    /// Whether sessions of this kind need the HSE gate.
    pub fn requires_hse_gate(&self) -> bool {
        matches!(self, Self::Hse)
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hse => "hse",
            Self::Metier => "metier",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = trainhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hse" => Ok(Self::Hse),
            "metier" | "métier" => Ok(Self::Metier),
            _ => Err(trainhub_core::AppError::validation(format!(
                "Invalid session kind: '{s}'. Expected one of: hse, metier"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_source_spellings() {
        let hse: SessionKind = serde_json::from_str("\"HSE\"").unwrap();
        let metier: SessionKind = serde_json::from_str("\"Métier\"").unwrap();
        assert_eq!(hse, SessionKind::Hse);
        assert_eq!(metier, SessionKind::Metier);
        assert_eq!("Métier".parse::<SessionKind>().unwrap(), SessionKind::Metier);
    }

    #[test]
    fn test_only_hse_requires_second_gate() {
        assert!(SessionKind::Hse.requires_hse_gate());
        assert!(!SessionKind::Metier.requires_hse_gate());
    }
}
