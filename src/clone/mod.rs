//! Tree cloning: detached copies of source trees with their computed style

pub mod cloner;
pub mod node;
pub mod uid;

pub use cloner::{CloneFilter, TreeCloner};
pub use node::CloneNode;
pub use uid::UidGenerator;
