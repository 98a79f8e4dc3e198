//! JSON serialization of syntax trees

use super::registry::{FormatError, Formatter};
use crate::parsing::SyntaxTree;

pub fn to_json_str(tree: &SyntaxTree, pretty: bool) -> Result<String, FormatError> {
    let result = if pretty {
        serde_json::to_string_pretty(tree)
    } else {
        serde_json::to_string(tree)
    };
    result.map_err(|e| FormatError::SerializationError(e.to_string()))
}

/// The tree document itself, as read back by the loader
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError> {
        to_json_str(tree, self.pretty)
    }
}
