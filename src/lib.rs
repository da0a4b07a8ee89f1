//! Self-contained snapshots of rendered DOM subtrees
//!
//! A node of a live (or in-memory) tree is cloned together with its computed
//! style, every external font and image it references is embedded as a data
//! URL, and the result is serialized into a single
//! `data:image/svg+xml` URI that renders without network access.
//!
//! ```ignore
//! use kodegen_tools_domshot::{RenderOptions, StaticDocument, to_vector_image};
//!
//! let doc = StaticDocument::parse_html(html, Some("https://example.com/"));
//! let uri = to_vector_image(&doc, doc.root(), &RenderOptions::default()).await?;
//! ```

pub mod clone;
pub mod config;
pub mod document;
pub mod errors;
pub mod host;
pub mod inline_css;
pub mod raster;
pub mod render;
pub mod static_dom;
pub mod style;
pub mod utils;

pub use clone::{CloneNode, TreeCloner, UidGenerator};
pub use config::{FallbackPolicy, FetchConfig, RenderOptions};
pub use errors::{RenderError, RenderResult};
pub use host::{HostError, NodeKind, PseudoElement, SourceNode, StyleSheet, StyleSheetSource};
pub use inline_css::{FetchError, ReqwestTransport, ResourceFetch, ResourceFetcher, Transport};
pub use raster::{DataUriDecoder, ImageLoadError, RasterHandle, Rasterizer};
pub use render::{Renderer, to_raster, to_raster_blob, to_vector_image};
pub use static_dom::{StaticDocument, StaticNode};
pub use style::{StyleDeclaration, StyleSnapshot};
