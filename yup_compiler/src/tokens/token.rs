//! Token kinds, the token record, and run classification
//!
//! Classification order for a flushed run is fixed: keyword (case-insensitive),
//! then exact symbol, then 32-bit integer literal, then identifier. Anything
//! that is not one of the first three is an identifier, so classification
//! never fails.
use crate::grammar::keywords::Keyword;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Keywords
    Let,
    If,
    Else,
    While,
    Print,

    Identifier,
    Number,

    // Operators
    Plus,         // +
    Minus,        // -
    Multiply,     // *
    Divide,       // /
    Assign,       // =
    Equal,        // ==
    NotEqual,     // !=
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=

    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    Semicolon,    // ;
    LeftBracket,  // [
    RightBracket, // ]

    /// Part of the vocabulary; the lexer never emits it
    Eof,
}

impl TokenKind {
    /// Upper-case name used in token dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Let => "LET",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::Print => "PRINT",
            Self::Identifier => "IDENTIFIER",
            Self::Number => "NUMBER",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Multiply => "MULTIPLY",
            Self::Divide => "DIVIDE",
            Self::Assign => "ASSIGN",
            Self::Equal => "EQUAL",
            Self::NotEqual => "NOT_EQUAL",
            Self::Less => "LESS",
            Self::Greater => "GREATER",
            Self::LessEqual => "LESS_EQUAL",
            Self::GreaterEqual => "GREATER_EQUAL",
            Self::LeftParen => "LEFT_PAREN",
            Self::RightParen => "RIGHT_PAREN",
            Self::LeftBrace => "LEFT_BRACE",
            Self::RightBrace => "RIGHT_BRACE",
            Self::Semicolon => "SEMICOLON",
            Self::LeftBracket => "LEFT_BRACKET",
            Self::RightBracket => "RIGHT_BRACKET",
            Self::Eof => "EOF",
        }
    }

    pub fn from_keyword(keyword: Keyword) -> Self {
        match keyword {
            Keyword::Let => Self::Let,
            Keyword::If => Self::If,
            Keyword::Else => Self::Else,
            Keyword::While => Self::While,
            Keyword::Print => Self::Print,
        }
    }

    /// `== != < > <= >=`
    pub fn is_relational_operator(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::Greater
                | Self::LessEqual
                | Self::GreaterEqual
        )
    }

    /// `+ -`
    pub fn is_additive_operator(&self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }

    /// `* /`
    pub fn is_multiplicative_operator(&self) -> bool {
        matches!(self, Self::Multiply | Self::Divide)
    }

    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Let | Self::If | Self::Else | Self::While | Self::Print => TokenClass::Keyword,
            Self::Identifier => TokenClass::Identifier,
            Self::Number => TokenClass::Literal,
            Self::Plus
            | Self::Minus
            | Self::Multiply
            | Self::Divide
            | Self::Assign
            | Self::Equal
            | Self::NotEqual
            | Self::Less
            | Self::Greater
            | Self::LessEqual
            | Self::GreaterEqual => TokenClass::Operator,
            Self::LeftParen
            | Self::RightParen
            | Self::LeftBrace
            | Self::RightBrace
            | Self::Semicolon
            | Self::LeftBracket
            | Self::RightBracket => TokenClass::Punctuation,
            Self::Eof => TokenClass::Special,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping used for metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Identifier,
    Literal,
    Operator,
    Punctuation,
    Special,
}

/// One lexical unit. Offsets are character indices into the source;
/// `end_offset` is inclusive. `span` carries byte offsets and the true
/// line/column of the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: String, start_offset: usize, span: Span) -> Self {
        let char_len = text.chars().count();
        Self {
            kind,
            text,
            start_offset,
            end_offset: start_offset + char_len.saturating_sub(1),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// `KIND(text)`, e.g. `IDENTIFIER(x)`
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.text)
    }
}

/// Render a token sequence as `[KIND(text), KIND(text)]`
pub fn format_token_list(tokens: &[Token]) -> String {
    let items: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    format!("[{}]", items.join(", "))
}

// === CLASSIFICATION FUNCTIONS ===

/// Characters that are always a token of their own
pub fn is_punctuation_char(ch: char) -> bool {
    matches!(ch, '(' | ')' | '{' | '}' | ';' | '[' | ']')
}

/// Characters that start an operator and may combine with one following `=`
pub fn is_operator_lead_char(ch: char) -> bool {
    matches!(ch, '=' | '<' | '>' | '!' | '+' | '-' | '*' | '/')
}

/// Run separators. Tab is deliberately absent: it joins the current run.
pub fn is_separator_char(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\r')
}

/// Only `==`, `>=`, `<=` and `!=` form two-character operators
pub fn combines_with(lead: char, next: char) -> bool {
    next == '=' && matches!(lead, '=' | '>' | '<' | '!')
}

/// Exact match against operator and punctuation spellings
pub fn classify_symbol(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "(" => TokenKind::LeftParen,
        ")" => TokenKind::RightParen,
        "{" => TokenKind::LeftBrace,
        "}" => TokenKind::RightBrace,
        "[" => TokenKind::LeftBracket,
        "]" => TokenKind::RightBracket,
        ";" => TokenKind::Semicolon,
        "=" => TokenKind::Assign,
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Multiply,
        "/" => TokenKind::Divide,
        "==" => TokenKind::Equal,
        "!=" => TokenKind::NotEqual,
        ">" => TokenKind::Greater,
        ">=" => TokenKind::GreaterEqual,
        "<" => TokenKind::Less,
        "<=" => TokenKind::LessEqual,
        _ => return None,
    };
    Some(kind)
}

/// Whether `text` parses as a signed 32-bit integer
pub fn is_integer_literal(text: &str) -> bool {
    text.parse::<i32>().is_ok()
}

/// Classify any flushed run or symbol
pub fn classify(text: &str) -> TokenKind {
    if let Some(keyword) = Keyword::from_str(text) {
        return TokenKind::from_keyword(keyword);
    }
    if let Some(kind) = classify_symbol(text) {
        return kind;
    }
    if is_integer_literal(text) {
        return TokenKind::Number;
    }
    TokenKind::Identifier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_classification_priority() {
        assert_eq!(classify("let"), TokenKind::Let);
        assert_eq!(classify("LET"), TokenKind::Let);
        assert_eq!(classify("else"), TokenKind::Else);
        assert_eq!(classify("<="), TokenKind::LessEqual);
        assert_eq!(classify("42"), TokenKind::Number);
        assert_eq!(classify("x1"), TokenKind::Identifier);
        assert_eq!(classify("letter"), TokenKind::Identifier);
    }

    #[test]
    fn test_number_range_is_32_bit() {
        assert_eq!(classify("2147483647"), TokenKind::Number);
        assert_eq!(classify("2147483648"), TokenKind::Identifier);
        assert_eq!(classify("12abc"), TokenKind::Identifier);
        assert_eq!(classify("5\t"), TokenKind::Identifier);
    }

    #[test]
    fn test_numbers_use_ascii_digits() {
        assert_eq!(classify("-12"), TokenKind::Number);
        assert_eq!(classify("\u{0663}\u{0664}"), TokenKind::Identifier);
        assert!(!is_integer_literal("\u{FF11}"));
    }

    #[test]
    fn test_lone_bang_is_identifier() {
        assert_eq!(classify("!"), TokenKind::Identifier);
    }

    #[test]
    fn test_operator_pairs() {
        assert!(combines_with('=', '='));
        assert!(combines_with('!', '='));
        assert!(combines_with('<', '='));
        assert!(combines_with('>', '='));
        assert!(!combines_with('+', '='));
        assert!(!combines_with('+', '-'));
        assert!(!combines_with('=', '<'));
    }

    #[test]
    fn test_token_offsets_and_display() {
        let span = Span::covering(Position::new(4, 1, 5), "abc");
        let token = Token::new(TokenKind::Identifier, "abc".to_string(), 4, span);

        assert_eq!(token.start_offset, 4);
        assert_eq!(token.end_offset, 6);
        assert_eq!(token.to_string(), "IDENTIFIER(abc)");
    }

    #[test]
    fn test_token_list_format() {
        let a = Token::new(
            TokenKind::Assign,
            "=".to_string(),
            0,
            Span::covering(Position::start(), "="),
        );
        let b = Token::new(
            TokenKind::Identifier,
            "a".to_string(),
            1,
            Span::covering(Position::new(1, 1, 2), "a"),
        );

        assert_eq!(format_token_list(&[a, b]), "[ASSIGN(=), IDENTIFIER(a)]");
        assert_eq!(format_token_list(&[]), "[]");
    }

    #[test]
    fn test_kind_groups() {
        assert!(TokenKind::GreaterEqual.is_relational_operator());
        assert!(!TokenKind::Assign.is_relational_operator());
        assert!(TokenKind::Minus.is_additive_operator());
        assert!(TokenKind::Divide.is_multiplicative_operator());
        assert_eq!(TokenKind::Semicolon.token_class(), TokenClass::Punctuation);
    }
}
