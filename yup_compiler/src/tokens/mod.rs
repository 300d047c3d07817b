//! Token model for Yup++
//!
//! [`Token`] records kind, original text, character offsets and a source
//! span. [`TokenStream`] is the parser's cursor over a token sequence.
//!
//! ## Token kinds
//!
//! - Keywords: `let if else while print` (case-insensitive)
//! - `IDENTIFIER`, `NUMBER` (signed 32-bit)
//! - Operators: `+ - * / = == != < > <= >=`
//! - Punctuation: `( ) { } ; [ ]`
//!
//! `EOF` exists in the vocabulary but is never produced by the lexer.

pub mod token;
pub mod token_stream;

pub use token::{format_token_list, Token, TokenClass, TokenKind};
pub use token_stream::TokenStream;
