pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod primitives;
pub mod scanner;
pub mod token;
pub mod value;
