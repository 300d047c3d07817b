//! Recursive-descent parser for Yup++
//!
//! ```text
//! program    := statement*
//! statement  := declaration | if | while | print | assignment
//! declaration:= LET IDENTIFIER "=" expression ";"
//! assignment := IDENTIFIER "=" expression ";"
//! if | while := (IF | WHILE) "(" condition ")" "{" statement* "}"
//! print      := PRINT "(" expression ")" ";"
//! condition  := expression rel_op expression
//! expression := term (("+" | "-") term)*
//! term       := factor (("*" | "/") factor)*
//! factor     := NUMBER | IDENTIFIER | "(" expression ")"
//! ```
//!
//! A failing rule records one diagnostic and returns `None`; callers skip
//! absent children and carry on. Recovery never skips more than the one
//! offending token.

use crate::config::compile_time::syntax::*;
use crate::config::runtime::SyntaxPreferences;
use crate::grammar::{AstNode, Keyword, NodeKind};
use crate::logging::{codes, Code};
use crate::syntax::error::{Diagnostic, PositionMode, SyntaxError, SyntaxResult};
use crate::tokens::{Token, TokenKind, TokenStream};
use crate::{log_debug, log_error, log_success};

/// Tree plus everything the parse reported
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub tree: AstNode,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

pub struct YupParser {
    tokens: TokenStream,
    diagnostics: Vec<Diagnostic>,
    context_stack: Vec<&'static str>,
    /// Pushes beyond the stack cap, popped before the stack itself
    context_overflow: usize,
    depth: usize,
    mode: PositionMode,
    trace_rules: bool,
}

impl YupParser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_preferences(tokens, &SyntaxPreferences::default())
    }

    pub fn with_preferences(tokens: Vec<Token>, preferences: &SyntaxPreferences) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            diagnostics: Vec::new(),
            context_stack: Vec::new(),
            context_overflow: 0,
            depth: 0,
            mode: PositionMode::from_legacy_flag(preferences.legacy_positions),
            trace_rules: preferences.trace_rules,
        }
    }

    pub fn with_position_mode(mut self, mode: PositionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Parse the whole token sequence
    pub fn parse(mut self) -> SyntaxResult<ParseOutput> {
        let tree = self.parse_program()?;

        log_success!(codes::success::AST_CONSTRUCTION_COMPLETE,
            "AST construction completed",
            "statements" => tree.children.len(),
            "nodes" => tree.node_count(),
            "diagnostics" => self.diagnostics.len()
        );

        if self.diagnostics.is_empty() {
            log_success!(codes::success::SYNTAX_VALIDATION_PASSED,
                "Syntax validation passed",
                "tokens" => self.tokens.len()
            );
        }

        Ok(ParseOutput {
            tree,
            diagnostics: self.diagnostics,
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_program(&mut self) -> SyntaxResult<AstNode> {
        self.push_context("Program");
        let mut program = AstNode::program();

        while !self.tokens.is_at_end() {
            let before = self.tokens.position();
            let statement = self.parse_statement()?;
            self.ensure_progress(before)?;
            program.add_child(statement);
        }

        self.pop_context();
        Ok(program)
    }

    fn parse_statement(&mut self) -> SyntaxResult<Option<AstNode>> {
        let Some(token) = self.tokens.current().cloned() else {
            return Ok(None);
        };

        let node = match token.kind {
            TokenKind::Let => self.parse_declaration(),
            TokenKind::If => self.parse_block_statement(Keyword::If, NodeKind::IfStatement)?,
            TokenKind::While => {
                self.parse_block_statement(Keyword::While, NodeKind::WhileStatement)?
            }
            TokenKind::Print => self.parse_print_statement(),
            TokenKind::Identifier => self.parse_assignment(),
            _ => {
                self.error_at(
                    &token,
                    format!("Unexpected token: {}", token.text),
                    codes::syntax::UNEXPECTED_TOKEN,
                );
                self.tokens.advance();
                None
            }
        };

        Ok(node)
    }

    fn parse_declaration(&mut self) -> Option<AstNode> {
        self.push_context("Declaration");
        let result = self.declaration_body();
        self.pop_context();
        result
    }

    fn declaration_body(&mut self) -> Option<AstNode> {
        let let_token = self.bump()?;

        let Some(identifier) = self.take(TokenKind::Identifier) else {
            self.error_at(
                &let_token,
                "Expected identifier after 'let'",
                codes::syntax::MISSING_TOKEN,
            );
            return None;
        };

        if self.take(TokenKind::Assign).is_none() {
            self.error_at(
                &identifier,
                "Expected '=' after identifier in declaration",
                codes::syntax::MISSING_TOKEN,
            );
            return None;
        }

        let expression = self.parse_expression();

        if self.take(TokenKind::Semicolon).is_none() {
            let anchor = self.previous_or(&let_token);
            self.error_at(&anchor, "Expected ';' after declaration", codes::syntax::MISSING_TOKEN);
            return None;
        }

        Some(
            AstNode::new(NodeKind::Declaration, let_token.span)
                .with_child(Some(Self::leaf(NodeKind::Identifier, &identifier)))
                .with_child(expression),
        )
    }

    fn parse_assignment(&mut self) -> Option<AstNode> {
        self.push_context("Assignment");
        let result = self.assignment_body();
        self.pop_context();
        result
    }

    fn assignment_body(&mut self) -> Option<AstNode> {
        let identifier = self.bump()?;

        if self.take(TokenKind::Assign).is_none() {
            self.error_at(&identifier, "Expected '=' in assignment", codes::syntax::MISSING_TOKEN);
            return None;
        }

        let expression = self.parse_expression();

        if self.take(TokenKind::Semicolon).is_none() {
            let anchor = self.previous_or(&identifier);
            self.error_at(&anchor, "Expected ';' after assignment", codes::syntax::MISSING_TOKEN);
            return None;
        }

        Some(
            AstNode::new(NodeKind::Assignment, identifier.span)
                .with_child(Some(Self::leaf(NodeKind::Identifier, &identifier)))
                .with_child(expression),
        )
    }

    /// `if` and `while` share one shape
    fn parse_block_statement(
        &mut self,
        keyword: Keyword,
        kind: NodeKind,
    ) -> SyntaxResult<Option<AstNode>> {
        if !self.descend() {
            return Ok(None);
        }
        self.push_context(kind.as_str());
        let result = self.block_statement_body(keyword, kind);
        self.pop_context();
        self.ascend();
        result
    }

    fn block_statement_body(
        &mut self,
        keyword: Keyword,
        kind: NodeKind,
    ) -> SyntaxResult<Option<AstNode>> {
        let Some(keyword_token) = self.bump() else {
            return Ok(None);
        };
        let word = keyword.as_str();

        if self.take(TokenKind::LeftParen).is_none() {
            self.error_at(
                &keyword_token,
                format!("Expected '(' after '{}'", word),
                codes::syntax::MISSING_TOKEN,
            );
            return Ok(None);
        }

        let condition = self.parse_condition();

        if self.take(TokenKind::RightParen).is_none() {
            let anchor = self.previous_or(&keyword_token);
            self.error_at(&anchor, "Expected ')' after condition", codes::syntax::MISSING_TOKEN);
            return Ok(None);
        }

        if self.take(TokenKind::LeftBrace).is_none() {
            let anchor = self.previous_or(&keyword_token);
            self.error_at(
                &anchor,
                format!("Expected '{{' after {} condition", word),
                codes::syntax::MISSING_TOKEN,
            );
            return Ok(None);
        }

        let mut body = AstNode::new(NodeKind::Body, keyword_token.span);
        while !self.tokens.is_at_end() && !self.tokens.check(TokenKind::RightBrace) {
            let before = self.tokens.position();
            let statement = self.parse_statement()?;
            self.ensure_progress(before)?;
            body.add_child(statement);
        }

        // The body loop only stops short of `}` at end of input
        if self.take(TokenKind::RightBrace).is_none() {
            self.error_at(
                &keyword_token,
                format!("Expected '}}' to close {} statement", word),
                codes::syntax::UNCLOSED_DELIMITER,
            );
            return Ok(None);
        }

        Ok(Some(
            AstNode::new(kind, keyword_token.span)
                .with_child(condition)
                .with_child(Some(body)),
        ))
    }

    fn parse_print_statement(&mut self) -> Option<AstNode> {
        self.push_context("PrintStatement");
        let result = self.print_statement_body();
        self.pop_context();
        result
    }

    fn print_statement_body(&mut self) -> Option<AstNode> {
        let print_token = self.bump()?;

        if self.take(TokenKind::LeftParen).is_none() {
            self.error_at(&print_token, "Expected '(' after 'print'", codes::syntax::MISSING_TOKEN);
            return None;
        }

        let expression = self.parse_expression();

        if self.take(TokenKind::RightParen).is_none() {
            let anchor = self.previous_or(&print_token);
            self.error_at(
                &anchor,
                "Expected ')' after expression in print statement",
                codes::syntax::MISSING_TOKEN,
            );
            return None;
        }

        if self.take(TokenKind::Semicolon).is_none() {
            let anchor = self.previous_or(&print_token);
            self.error_at(&anchor, "Expected ';' after print statement", codes::syntax::MISSING_TOKEN);
            return None;
        }

        Some(AstNode::new(NodeKind::PrintStatement, print_token.span).with_child(expression))
    }

    // ========================================================================
    // Conditions and expressions
    // ========================================================================

    fn parse_condition(&mut self) -> Option<AstNode> {
        self.push_context("Condition");
        let left = self.parse_expression();

        let operator = self.take_if(TokenKind::is_relational_operator);

        let Some(operator) = operator else {
            if let Some(anchor) = self.previous_or_first() {
                self.error_at(
                    &anchor,
                    "Expected relational operator in condition",
                    codes::syntax::MISSING_RELATIONAL_OPERATOR,
                );
            }
            self.pop_context();
            return None;
        };

        let right = self.parse_expression();
        self.pop_context();

        Some(
            AstNode::new(NodeKind::Condition, operator.span)
                .with_child(left)
                .with_child(Some(Self::leaf(NodeKind::RelationalOperator, &operator)))
                .with_child(right),
        )
    }

    /// term (("+" | "-") term)*, left-associative
    fn parse_expression(&mut self) -> Option<AstNode> {
        let mut left = self.parse_term();

        while let Some(operator) = self.take_if(TokenKind::is_additive_operator) {
            let right = self.parse_term();
            left = Some(Self::binary(NodeKind::Expression, left, &operator, right));
        }

        left
    }

    /// factor (("*" | "/") factor)*, left-associative
    fn parse_term(&mut self) -> Option<AstNode> {
        let mut left = self.parse_factor();

        while let Some(operator) = self.take_if(TokenKind::is_multiplicative_operator) {
            let right = self.parse_factor();
            left = Some(Self::binary(NodeKind::Term, left, &operator, right));
        }

        left
    }

    fn parse_factor(&mut self) -> Option<AstNode> {
        let Some(token) = self.tokens.current().cloned() else {
            if let Some(anchor) = self.previous_or_first() {
                self.error_at(
                    &anchor,
                    "Unexpected end of input while parsing factor",
                    codes::syntax::UNEXPECTED_END_OF_INPUT,
                );
            }
            return None;
        };

        match token.kind {
            TokenKind::Number => {
                self.tokens.advance();
                Some(Self::leaf(NodeKind::Number, &token))
            }
            TokenKind::Identifier => {
                self.tokens.advance();
                Some(Self::leaf(NodeKind::Identifier, &token))
            }
            TokenKind::LeftParen => {
                if !self.descend() {
                    return None;
                }
                self.tokens.advance();
                let expression = self.parse_expression();
                let closed = self.take(TokenKind::RightParen).is_some();
                self.ascend();

                if !closed {
                    let anchor = self.previous_or(&token);
                    self.error_at(
                        &anchor,
                        "Expected ')' to close expression",
                        codes::syntax::UNCLOSED_DELIMITER,
                    );
                    return None;
                }
                expression
            }
            _ => {
                self.error_at(
                    &token,
                    format!("Unexpected token in factor: {}", token.text),
                    codes::syntax::INVALID_FACTOR,
                );
                self.tokens.advance();
                None
            }
        }
    }

    // ========================================================================
    // Node helpers
    // ========================================================================

    fn leaf(kind: NodeKind, token: &Token) -> AstNode {
        AstNode::leaf(kind, token.text.clone(), token.span)
    }

    /// `kind[left, Operator(op), right]`, anchored at the operator
    fn binary(
        kind: NodeKind,
        left: Option<AstNode>,
        operator: &Token,
        right: Option<AstNode>,
    ) -> AstNode {
        AstNode::new(kind, operator.span)
            .with_child(left)
            .with_child(Some(Self::leaf(NodeKind::Operator, operator)))
            .with_child(right)
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    /// Consume the current token unconditionally
    fn bump(&mut self) -> Option<Token> {
        self.tokens.advance().cloned()
    }

    /// Consume the current token if it has `kind`
    fn take(&mut self, kind: TokenKind) -> Option<Token> {
        self.tokens.match_kind(kind).cloned()
    }

    fn take_if(&mut self, predicate: fn(&TokenKind) -> bool) -> Option<Token> {
        if self.tokens.current().is_some_and(|t| predicate(&t.kind)) {
            self.bump()
        } else {
            None
        }
    }

    fn previous_or(&self, fallback: &Token) -> Token {
        self.tokens.previous().unwrap_or(fallback).clone()
    }

    fn previous_or_first(&self) -> Option<Token> {
        self.tokens.previous().or_else(|| self.tokens.first()).cloned()
    }

    fn ensure_progress(&self, before: usize) -> SyntaxResult<()> {
        if self.tokens.position() <= before {
            return Err(SyntaxError::invariant_violation(format!(
                "statement at token {} consumed no input (context: {})",
                before,
                self.current_context()
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Guards and diagnostics
    // ========================================================================

    /// Enter one nesting level. On overflow, records a diagnostic, consumes
    /// the current token and returns false.
    fn descend(&mut self) -> bool {
        if self.depth < MAX_PARSE_DEPTH {
            self.depth += 1;
            return true;
        }

        if let Some(token) = self.tokens.current().cloned() {
            let error = SyntaxError::max_recursion_depth(self.depth, token.span);
            log_error!(error.error_code(), &error.to_string(),
                span = token.span,
                "context" => self.current_context()
            );
            self.error_at(&token, "Maximum nesting depth exceeded", error.error_code());
            self.tokens.advance();
        }
        false
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn error_at(&mut self, token: &Token, message: impl Into<String>, code: Code) {
        let diagnostic = Diagnostic::at_token(token, message, code, self.mode);
        log_debug!("Syntax diagnostic recorded",
            "code" => code,
            "diagnostic" => &diagnostic,
            "context" => self.current_context()
        );
        self.diagnostics.push(diagnostic);
    }

    fn push_context(&mut self, rule: &'static str) {
        if self.context_stack.len() < MAX_CONTEXT_STACK_DEPTH {
            self.context_stack.push(rule);
        } else {
            self.context_overflow += 1;
        }
        if self.trace_rules {
            log_debug!("Entering rule",
                "rule" => rule,
                "context" => self.current_context(),
                "position" => self.tokens.position()
            );
        }
    }

    fn pop_context(&mut self) {
        if self.context_overflow > 0 {
            self.context_overflow -= 1;
        } else {
            self.context_stack.pop();
        }
    }

    pub fn current_context(&self) -> String {
        self.context_stack.join(" -> ")
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
