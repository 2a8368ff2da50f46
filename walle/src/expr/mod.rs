pub mod eval;
pub mod lexer;

pub use eval::Evaluator;
