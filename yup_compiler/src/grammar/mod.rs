//! Yup++ grammar: keyword table and AST

pub mod ast;
pub mod keywords;

pub use ast::{print_tree, render_tree, tree_lines, AstNode, NodeKind};
pub use keywords::Keyword;
