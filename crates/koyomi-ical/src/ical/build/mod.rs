//! Serialization: component tree → canonical line-folded text.

mod fold;
mod serializer;

/// Line terminator required on every logical line, including the last.
pub const CRLF: &str = "\r\n";

pub use fold::fold_line;
pub use serializer::serialize;
