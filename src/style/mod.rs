//! CSS declaration tables and style-sheet rule scanning

pub mod declaration;
pub mod rules;

pub use declaration::{StyleDeclaration, StyleSnapshot, StyleValue};
pub use rules::parse_rules;
pub(crate) use declaration::format_property;
