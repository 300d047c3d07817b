//! Reserved words of the language
//!
//! Keywords match case-insensitively: `LET`, `Let` and `let` are the same word.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Let,
    If,
    Else,
    While,
    Print,
}

impl Keyword {
    pub const ALL: [Keyword; 5] = [
        Keyword::Let,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::Print,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Let => "let",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::Print => "print",
        }
    }

    /// Case-insensitive lookup
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(s))
    }

}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        assert_eq!(Keyword::from_str("let"), Some(Keyword::Let));
        assert_eq!(Keyword::from_str("WHILE"), Some(Keyword::While));
        assert_eq!(Keyword::from_str("PrInT"), Some(Keyword::Print));
        assert_eq!(Keyword::from_str("lets"), None);
        assert_eq!(Keyword::from_str(""), None);
    }

    #[test]
    fn test_display_is_lowercase() {
        for keyword in Keyword::ALL {
            assert_eq!(keyword.to_string(), keyword.as_str());
            assert_eq!(Keyword::from_str(&keyword.as_str().to_uppercase()), Some(keyword));
        }
    }

}
