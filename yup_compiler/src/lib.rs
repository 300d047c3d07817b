// Internal modules
#[macro_use]
pub mod logging;
pub mod config;
pub mod file_processor;
pub mod grammar;
pub mod lexical;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use grammar::{print_tree, AstNode, NodeKind};
pub use lexical::tokenize;
pub use pipeline::{process_file, process_source, PipelineError, PipelineOutput, PipelineResult};
pub use syntax::{parse_program, Diagnostic};
pub use tokens::{Token, TokenKind};
