//! Message handling - Text to command parsing

pub mod parser;

pub use parser::MessageParser;
