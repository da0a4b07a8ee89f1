//! In-memory platform tree provider
//!
//! A complete `SourceNode` / `StyleSheetSource` implementation for hosts that
//! already know the final style of every node, and for tests.

pub mod document;
pub mod node;

pub use document::StaticDocument;
pub use node::{ElementBuilder, StaticNode};
