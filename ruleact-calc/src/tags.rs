//! Rule tags of the calculator grammar.
//!
//! The parser tables attach one of these to each production; action
//! registries key their handlers on the same strings.

pub const STATEMENT_ASSIGN: &str = "statement_assign";
pub const STATEMENT_EXPR: &str = "statement_expr";
pub const EXPRESSION_BINOP: &str = "expression_binop";
pub const EXPRESSION_UMINUS: &str = "expression_uminus";
pub const EXPRESSION_GROUP: &str = "expression_group";
pub const EXPRESSION_NUMBER: &str = "expression_number";
pub const EXPRESSION_NAME: &str = "expression_name";
