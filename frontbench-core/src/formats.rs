//! Output formats for syntax trees
//!
//! - treeviz: the box-drawing rendering returned by the pipeline
//! - json: the tree document

pub mod json;
pub mod registry;
pub mod treeviz;

pub use json::{to_json_str, JsonFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
