//! Core lexical analyzer
//!
//! Single left-to-right scan with one character of lookahead. Characters
//! accumulate into a pending run until a separator, punctuation character,
//! or operator lead flushes it. Malformed input never fails: anything that
//! is not a keyword, symbol or integer becomes an identifier. Size
//! thresholds only produce warnings.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::token::{
    classify, combines_with, is_operator_lead_char, is_punctuation_char, is_separator_char,
    TokenClass,
};
use crate::tokens::{Token, TokenKind};
use crate::utils::{Position, Span};
use crate::{log_debug, log_success, log_warning};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-call lexical metrics, reset at the start of each `tokenize`
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub number_tokens: usize,
    pub operator_tokens: usize,
    pub punctuation_tokens: usize,
    /// Longest flushed run, in characters
    pub max_run_length: usize,
    /// Runs above `LONG_RUN_THRESHOLD`
    pub long_runs: usize,
    pub char_count: usize,
    pub processing_time: Duration,

    // Only filled when detailed metrics are enabled
    pub kind_counts: HashMap<TokenKind, usize>,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        match token.kind.token_class() {
            TokenClass::Keyword => self.keyword_tokens += 1,
            TokenClass::Identifier => self.identifier_tokens += 1,
            TokenClass::Literal => self.number_tokens += 1,
            TokenClass::Operator => self.operator_tokens += 1,
            TokenClass::Punctuation => self.punctuation_tokens += 1,
            TokenClass::Special => {}
        }

        if preferences.collect_detailed_metrics {
            *self.kind_counts.entry(token.kind).or_insert(0) += 1;
        }
    }

    pub(crate) fn record_run_length(&mut self, length: usize) {
        self.max_run_length = self.max_run_length.max(length);
        if length > LONG_RUN_THRESHOLD {
            self.long_runs += 1;
        }
    }
}

/// Start of the run currently being accumulated
#[derive(Debug, Clone, Copy)]
struct RunStart {
    char_index: usize,
    position: Position,
}

/// Lexical analyzer with a reusable run buffer
pub struct LexicalAnalyzer {
    run: String,
    run_chars: usize,
    run_start: Option<RunStart>,
    tokens: Vec<Token>,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            run: String::new(),
            run_chars: 0,
            run_start: None,
            tokens: Vec::new(),
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    /// Tokenize `source` into an ordered token sequence. Never fails.
    pub fn tokenize(&mut self, source: &str) -> Vec<Token> {
        let start_time = Instant::now();
        self.reset();

        log_debug!("Starting lexical analysis", "bytes" => source.len());

        self.scan(source);

        let tokens = std::mem::take(&mut self.tokens);
        self.metrics.processing_time = start_time.elapsed();

        if tokens.len() > MANY_TOKENS_THRESHOLD {
            log_warning!(code = codes::lexical::MANY_TOKENS, "Token count is above the warning threshold",
                "token_count" => tokens.len(),
                "threshold" => MANY_TOKENS_THRESHOLD
            );
        }

        if self.preferences.log_token_dump {
            log_debug!("Token dump",
                "tokens" => crate::tokens::token::format_token_list(&tokens)
            );
        }

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed successfully",
            "token_count" => tokens.len(),
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "numbers" => self.metrics.number_tokens,
            "operators" => self.metrics.operator_tokens,
            "punctuation" => self.metrics.punctuation_tokens,
            "max_run_length" => self.metrics.max_run_length,
            "long_runs" => self.metrics.long_runs,
            "char_count" => self.metrics.char_count,
            "duration_ms" => format!("{:.3}", self.metrics.processing_time.as_secs_f64() * 1000.0)
        );

        tokens
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: LexicalPreferences) {
        self.preferences = preferences;
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    fn reset(&mut self) {
        self.run.clear();
        self.run_chars = 0;
        self.run_start = None;
        self.tokens.clear();
        self.metrics = LexicalMetrics::default();
    }

    fn scan(&mut self, source: &str) {
        let mut chars = source.chars().peekable();
        let mut index = 0usize;
        let mut pos = Position::start();

        while let Some(ch) = chars.next() {
            if is_separator_char(ch) {
                self.flush_run();
            } else if is_punctuation_char(ch) {
                self.flush_run();
                self.emit(ch.to_string(), index, pos);
            } else if is_operator_lead_char(ch) {
                self.flush_run();

                let mut text = ch.to_string();
                let lead_index = index;
                let lead_pos = pos;

                if let Some(&next) = chars.peek() {
                    if combines_with(ch, next) {
                        chars.next();
                        text.push(next);
                        index += 1;
                        pos = pos.advance(ch);
                    }
                }

                self.emit(text, lead_index, lead_pos);

                // `pos` points at the last consumed character; step past it
                let last = if index > lead_index { '=' } else { ch };
                index += 1;
                pos = pos.advance(last);
                continue;
            } else {
                self.push_run_char(ch, index, pos);
            }

            index += 1;
            pos = pos.advance(ch);
        }

        self.flush_run();
        self.metrics.char_count = index;
    }

    fn push_run_char(&mut self, ch: char, index: usize, pos: Position) {
        if self.run_start.is_none() {
            self.run_start = Some(RunStart {
                char_index: index,
                position: pos,
            });
        }

        self.run.push(ch);
        self.run_chars += 1;
    }

    fn flush_run(&mut self) {
        let Some(start) = self.run_start.take() else {
            return;
        };

        if self.run_chars > LONG_RUN_THRESHOLD {
            log_warning!(code = codes::lexical::LONG_RUN, "Run is above the length warning threshold",
                "position" => start.position,
                "length" => self.run_chars,
                "threshold" => LONG_RUN_THRESHOLD
            );
        }

        self.metrics.record_run_length(self.run_chars);
        let text = std::mem::take(&mut self.run);
        self.run_chars = 0;

        self.emit(text, start.char_index, start.position);
    }

    fn emit(&mut self, text: String, char_index: usize, pos: Position) {
        let kind = classify(&text);
        let span = Span::covering(pos, &text);
        let token = Token::new(kind, text, char_index, span);

        self.metrics.record_token(&token, &self.preferences);
        self.tokens.push(token);
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        LexicalAnalyzer::new().tokenize(source)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|t| t.kind).collect()
    }

    fn dump(source: &str) -> String {
        crate::tokens::token::format_token_list(&lex(source))
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert!(lex("").is_empty());
        assert!(lex("   \n\r\n  ").is_empty());
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            dump("let x = 5;"),
            "[LET(let), IDENTIFIER(x), ASSIGN(=), NUMBER(5), SEMICOLON(;)]"
        );
    }

    #[test]
    fn test_operator_lookahead_does_not_lose_characters() {
        assert_eq!(dump("=a"), "[ASSIGN(=), IDENTIFIER(a)]");
        assert_eq!(dump("<a"), "[LESS(<), IDENTIFIER(a)]");
        assert_eq!(dump(">a"), "[GREATER(>), IDENTIFIER(a)]");
        assert_eq!(dump("!a"), "[IDENTIFIER(!), IDENTIFIER(a)]");
        assert_eq!(dump("+-"), "[PLUS(+), MINUS(-)]");
        assert_eq!(dump("=("), "[ASSIGN(=), LEFT_PAREN(()]");
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(
            kinds("a==b!=c<=d>=e"),
            vec![
                TokenKind::Identifier,
                TokenKind::Equal,
                TokenKind::Identifier,
                TokenKind::NotEqual,
                TokenKind::Identifier,
                TokenKind::LessEqual,
                TokenKind::Identifier,
                TokenKind::GreaterEqual,
                TokenKind::Identifier,
            ]
        );
        // `+=` is not an operator pair
        assert_eq!(kinds("+="), vec![TokenKind::Plus, TokenKind::Assign]);
        // `===` is `==` then `=`
        assert_eq!(kinds("==="), vec![TokenKind::Equal, TokenKind::Assign]);
    }

    #[test]
    fn test_operator_at_end_of_input() {
        assert_eq!(dump("x ="), "[IDENTIFIER(x), ASSIGN(=)]");
    }

    #[test]
    fn test_punctuation_splits_runs() {
        assert_eq!(
            dump("print(a)[0]{}"),
            "[PRINT(print), LEFT_PAREN((), IDENTIFIER(a), RIGHT_PAREN()), \
             LEFT_BRACKET([), NUMBER(0), RIGHT_BRACKET(]), LEFT_BRACE({), RIGHT_BRACE(})]"
        );
    }

    #[test]
    fn test_keywords_case_insensitive_text_preserved() {
        assert_eq!(dump("LET While"), "[LET(LET), WHILE(While)]");
    }

    #[test]
    fn test_tab_joins_run() {
        assert_eq!(dump("a\tb"), "[IDENTIFIER(a\tb)]");
        assert_eq!(kinds("5\t"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_unusual_runs_become_identifiers() {
        assert_eq!(dump("12abc $% 99999999999"), "[IDENTIFIER(12abc), IDENTIFIER($%), IDENTIFIER(99999999999)]");
    }

    #[test]
    fn test_offsets() {
        let tokens = lex("let xy = 10;");
        let offsets: Vec<(usize, usize)> =
            tokens.iter().map(|t| (t.start_offset, t.end_offset)).collect();

        assert_eq!(offsets, vec![(0, 2), (4, 5), (7, 7), (9, 10), (11, 11)]);
    }

    #[test]
    fn test_offsets_for_operator_pairs() {
        let tokens = lex("a<=b");
        assert_eq!((tokens[1].start_offset, tokens[1].end_offset), (1, 2));
        assert_eq!((tokens[2].start_offset, tokens[2].end_offset), (3, 3));
    }

    #[test]
    fn test_offsets_are_ordered() {
        let tokens = lex("while (x <= 10) {\n  x = x + 1;\n  print((x*2)/3);\n}");
        for token in &tokens {
            assert!(token.start_offset <= token.end_offset);
        }
        for pair in tokens.windows(2) {
            assert!(pair[0].start_offset <= pair[1].start_offset);
            assert!(pair[0].end_offset < pair[1].start_offset);
        }
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let tokens = lex("é = 1");
        assert_eq!((tokens[0].start_offset, tokens[0].end_offset), (0, 0));
        assert_eq!(tokens[1].start_offset, 2);
        assert_eq!(tokens[0].span.len(), 2);
    }

    #[test]
    fn test_astral_character_is_one_offset() {
        let tokens = lex("\u{1F600} = 1");
        assert_eq!((tokens[0].start_offset, tokens[0].end_offset), (0, 0));
        assert_eq!(tokens[1].start_offset, 2);
        assert_eq!(tokens[2].start_offset, 4);
    }

    #[test]
    fn test_true_positions() {
        let tokens = lex("let a = 1;\n  print(a);");
        let print = &tokens[5];

        assert_eq!(print.kind, TokenKind::Print);
        assert_eq!(print.span.start.line, 2);
        assert_eq!(print.span.start.column, 3);
        assert_eq!(print.start_offset, 13);
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("let total = a + 42;");
        let metrics = analyzer.metrics();

        assert_eq!(metrics.total_tokens, 7);
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.number_tokens, 1);
        assert_eq!(metrics.operator_tokens, 2);
        assert_eq!(metrics.punctuation_tokens, 1);
        assert_eq!(metrics.max_run_length, 5);
    }

    #[test]
    fn test_analyzer_is_reusable() {
        let mut analyzer = LexicalAnalyzer::new();
        let first = analyzer.tokenize("abc");
        let second = analyzer.tokenize("x");

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].text, "x");
        assert_eq!(analyzer.metrics().total_tokens, 1);
    }

    #[test]
    fn test_long_runs_are_still_tokens() {
        let name = "a".repeat(LONG_RUN_THRESHOLD + 1);
        let mut analyzer = LexicalAnalyzer::new();
        let tokens = analyzer.tokenize(&format!("let {} = 1;", name));

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, name);
        assert_eq!(analyzer.metrics().long_runs, 1);
        assert_eq!(analyzer.metrics().max_run_length, LONG_RUN_THRESHOLD + 1);
    }
}
