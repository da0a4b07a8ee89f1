pub mod constants;
pub mod mime;
pub mod url_utils;

pub use constants::*;
pub use mime::{data_url, is_data_url, mime_type, parse_extension};
pub use url_utils::{escape_xhtml, resolve_url};
