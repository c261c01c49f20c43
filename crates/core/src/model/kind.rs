use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {what}: {raw}")]
pub struct ParseKindError {
    what: &'static str,
    raw: String,
}

impl ParseKindError {
    fn new(what: &'static str, raw: &str) -> Self {
        Self {
            what,
            raw: raw.to_owned(),
        }
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Coarse label assigned at generation time from operand or word-length ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            _ => Err(ParseKindError::new("difficulty", s)),
        }
    }
}

//
// ─── MATH KIND ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl MathKind {
    pub const ALL: [MathKind; 4] = [
        MathKind::Addition,
        MathKind::Subtraction,
        MathKind::Multiplication,
        MathKind::Division,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MathKind::Addition => "addition",
            MathKind::Subtraction => "subtraction",
            MathKind::Multiplication => "multiplication",
            MathKind::Division => "division",
        }
    }
}

impl FromStr for MathKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "addition" => Ok(Self::Addition),
            "subtraction" => Ok(Self::Subtraction),
            "multiplication" => Ok(Self::Multiplication),
            "division" => Ok(Self::Division),
            _ => Err(ParseKindError::new("math type", s)),
        }
    }
}

//
// ─── ENGLISH KIND ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnglishKind {
    #[default]
    Spelling,
    Vocabulary,
    Grammar,
}

impl EnglishKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EnglishKind::Spelling => "spelling",
            EnglishKind::Vocabulary => "vocabulary",
            EnglishKind::Grammar => "grammar",
        }
    }
}

impl FromStr for EnglishKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spelling" => Ok(Self::Spelling),
            "vocabulary" => Ok(Self::Vocabulary),
            "grammar" => Ok(Self::Grammar),
            _ => Err(ParseKindError::new("english type", s)),
        }
    }
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// Which score/streak pair a graded answer counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    English,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Math => f.write_str("math"),
            Subject::English => f.write_str("english"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("Division".parse::<MathKind>().unwrap(), MathKind::Division);
        assert_eq!(" grammar ".parse::<EnglishKind>().unwrap(), EnglishKind::Grammar);
        assert_eq!("MEDIUM".parse::<Difficulty>().unwrap(), Difficulty::Medium);
    }

    #[test]
    fn unknown_values_are_rejected() {
        let err = "hard".parse::<Difficulty>().unwrap_err();
        assert_eq!(err.to_string(), "unknown difficulty: hard");
        assert!("modulo".parse::<MathKind>().is_err());
    }

    #[test]
    fn as_str_matches_serde_names() {
        for kind in MathKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(serde_json::to_string(&EnglishKind::Vocabulary).unwrap(), "\"vocabulary\"");
    }
}
