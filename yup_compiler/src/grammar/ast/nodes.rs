//! AST node definitions for Yup++
//!
//! The tree is uniform: every node has a kind label, an optional literal
//! value (leaves only), ordered children and the position of the token that
//! triggered it. Nodes are built bottom-up by the parser and never mutated
//! after being attached to a parent.

use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node labels. The rendered name is the variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// program ::= statement*
    Program,
    /// declaration ::= LET IDENTIFIER ASSIGN expression SEMICOLON
    Declaration,
    /// assignment ::= IDENTIFIER ASSIGN expression SEMICOLON
    Assignment,
    /// if_statement ::= IF "(" condition ")" "{" statement* "}"
    IfStatement,
    /// while_statement ::= WHILE "(" condition ")" "{" statement* "}"
    WhileStatement,
    /// print_statement ::= PRINT "(" expression ")" SEMICOLON
    PrintStatement,
    /// condition ::= expression rel_op expression
    Condition,
    /// expression ::= term (("+" | "-") term)*
    Expression,
    /// term ::= factor (("*" | "/") factor)*
    Term,
    Identifier,
    Number,
    /// `+ - * /`
    Operator,
    /// `== != < > <= >=`
    RelationalOperator,
    /// Statements between the braces of an if/while
    Body,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::Declaration => "Declaration",
            Self::Assignment => "Assignment",
            Self::IfStatement => "IfStatement",
            Self::WhileStatement => "WhileStatement",
            Self::PrintStatement => "PrintStatement",
            Self::Condition => "Condition",
            Self::Expression => "Expression",
            Self::Term => "Term",
            Self::Identifier => "Identifier",
            Self::Number => "Number",
            Self::Operator => "Operator",
            Self::RelationalOperator => "RelationalOperator",
            Self::Body => "Body",
        }
    }

    /// Kinds that carry a literal value
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Identifier | Self::Number | Self::Operator | Self::RelationalOperator
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
    /// Line of the triggering token (0 for the program root)
    pub line: u32,
    /// Column of the triggering token (0 for the program root)
    pub column: u32,
    #[serde(skip)]
    pub span: Option<Span>,
}

impl AstNode {
    /// Interior node anchored at `span`
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            value: None,
            children: Vec::new(),
            line: span.start.line,
            column: span.start.column,
            span: Some(span),
        }
    }

    /// Leaf node carrying a literal value
    pub fn leaf(kind: NodeKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(kind, span)
        }
    }

    /// Empty program root
    pub fn program() -> Self {
        Self {
            kind: NodeKind::Program,
            value: None,
            children: Vec::new(),
            line: 0,
            column: 0,
            span: None,
        }
    }

    /// Attach `child` if present; absent children are skipped
    pub fn add_child(&mut self, child: Option<AstNode>) {
        if let Some(child) = child {
            self.children.push(child);
        }
    }

    pub fn with_child(mut self, child: Option<AstNode>) -> Self {
        self.add_child(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(AstNode::node_count).sum::<usize>()
    }

    /// Height of this subtree; a lone node has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(AstNode::depth).max().unwrap_or(0)
    }

    /// Compact s-expression form, e.g. `Expression[Number(1), Operator(-), Number(2)]`
    pub fn to_compact_string(&self) -> String {
        let mut out = self.kind.as_str().to_string();
        if let Some(value) = &self.value {
            out.push('(');
            out.push_str(value);
            out.push(')');
        }
        if !self.children.is_empty() {
            let children: Vec<String> =
                self.children.iter().map(AstNode::to_compact_string).collect();
            out.push('[');
            out.push_str(&children.join(", "));
            out.push(']');
        }
        out
    }
}

/// Renders the same text as [`super::print_tree`] at indent 0
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::render_tree(self, 0, f)
    }
}
