//! Abstract syntax tree and its text rendering

pub mod nodes;

use std::fmt::{self, Write};

pub use nodes::{AstNode, NodeKind};

/// Pre-order rendering, one line per node:
/// `"  " * depth + kind + " (value)"`, every line ending in `\n`.
pub fn print_tree(node: &AstNode, indent: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = render_tree(node, indent, &mut out);
    out
}

/// Streaming form of [`print_tree`]
pub fn render_tree<W: Write>(node: &AstNode, indent: usize, out: &mut W) -> fmt::Result {
    for _ in 0..indent {
        out.write_str("  ")?;
    }
    out.write_str(node.kind.as_str())?;
    if let Some(value) = &node.value {
        write!(out, " ({})", value)?;
    }
    out.write_char('\n')?;

    for child in &node.children {
        render_tree(child, indent + 1, out)?;
    }
    Ok(())
}

/// Rendered lines without terminators, for line-by-line consumers
pub fn tree_lines(node: &AstNode) -> Vec<String> {
    print_tree(node, 0).lines().map(str::to_string).collect()
}
