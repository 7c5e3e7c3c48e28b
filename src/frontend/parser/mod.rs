pub mod expr;
pub mod program;
pub mod stmt;
pub mod types;

pub use expr::expr_parser;
pub use program::{class_parser, function_declaration_parser, function_parser, program_parser};
pub use stmt::{block_parser, declaration_parser, stmt_parser};
pub use types::type_parser;
