//! Platform tree provider interface
//!
//! The snapshot pipeline never owns the live tree. A host (a browser binding,
//! a headless engine, or the in-memory `static_dom`) exposes its nodes and
//! style sheets through the traits in this module.

pub mod node;
pub mod sheet;

pub use node::{HostError, NodeKind, PseudoElement, SourceNode};
pub use sheet::{CssRule, RuleKind, StyleSheet, StyleSheetSource};
