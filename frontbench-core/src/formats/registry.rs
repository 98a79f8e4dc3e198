//! Tree formats by name
//!
//! A [`FormatRegistry`] maps format names to [`Formatter`]s in registration order.
//! [`FormatRegistry::standard`] holds the built-in `treeviz` and `json` formats; callers
//! check a requested name with [`FormatRegistry::require`] before any work is done, so
//! an unknown name fails up front and lists the names that would have worked.

use crate::parsing::SyntaxTree;
use std::fmt;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No formatter is registered under `name`
    FormatNotFound {
        name: String,
        available: Vec<String>,
    },
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound { name, available } => write!(
                f,
                "Format '{}' not found (available: {})",
                name,
                available.join(", ")
            ),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Renders a syntax tree as text
pub trait Formatter: Send + Sync {
    /// The name the format is selected by, e.g. "treeviz"
    fn name(&self) -> &str;

    fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError>;
}

pub struct FormatRegistry {
    formatters: Vec<Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// `treeviz` and `json`; JSON is pretty-printed when `pretty_json` is set
    pub fn standard(pretty_json: bool) -> Self {
        let mut registry = FormatRegistry {
            formatters: Vec::new(),
        };
        registry.register(super::TreevizFormatter);
        registry.register(super::JsonFormatter {
            pretty: pretty_json,
        });
        registry
    }

    /// Add a formatter; a formatter already registered under the same name is replaced
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters.retain(|f| f.name() != formatter.name());
        self.formatters.push(Box::new(formatter));
    }

    /// Registered names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.formatters.iter().map(|f| f.name()).collect()
    }

    pub fn require(&self, name: &str) -> Result<&dyn Formatter, FormatError> {
        self.formatters
            .iter()
            .find(|f| f.name() == name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound {
                name: name.to_string(),
                available: self.names().into_iter().map(String::from).collect(),
            })
    }

    pub fn serialize(&self, tree: &SyntaxTree, format: &str) -> Result<String, FormatError> {
        self.require(format)?.serialize(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::TreeNode;

    /// Leaf values joined by spaces
    struct WordsFormatter;

    impl Formatter for WordsFormatter {
        fn name(&self) -> &str {
            "words"
        }

        fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError> {
            let words: Vec<&str> = tree.leaves().map(|l| l.value.as_str()).collect();
            Ok(words.join(" "))
        }
    }

    fn tree() -> SyntaxTree {
        SyntaxTree::new(TreeNode::branch(
            "S",
            vec![TreeNode::leaf("A", "a"), TreeNode::leaf("B", "b")],
        ))
    }

    #[test]
    fn test_standard_formats() {
        let registry = FormatRegistry::standard(false);
        assert_eq!(registry.names(), vec!["treeviz", "json"]);
        assert_eq!(
            registry.serialize(&tree(), "treeviz").unwrap(),
            "└──  S\n    ├──  A: a\n    └──  B: b\n"
        );
        assert!(registry
            .serialize(&tree(), "json")
            .unwrap()
            .starts_with(r#"{"root":{"symbol":"S""#));
    }

    #[test]
    fn test_unknown_format_lists_the_alternatives() {
        let registry = FormatRegistry::standard(true);
        let err = registry.serialize(&tree(), "xml").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Format 'xml' not found (available: treeviz, json)"
        );
    }

    #[test]
    fn test_register_adds_and_replaces() {
        let mut registry = FormatRegistry::standard(true);
        registry.register(WordsFormatter);
        assert_eq!(registry.serialize(&tree(), "words").unwrap(), "a b");

        registry.register(super::super::JsonFormatter { pretty: false });
        assert_eq!(registry.names(), vec!["treeviz", "words", "json"]);
        assert!(!registry.serialize(&tree(), "json").unwrap().contains('\n'));
    }
}
