//! Document loading
//!
//!     `DocumentLoader` reads a document from a file or a string and decodes it into one
//!     of the workbench's entities. The format comes from the file extension (`.yaml` or
//!     `.yml` for YAML, anything else JSON) and can be set explicitly for strings.
//!
//!     Decoding is two steps. The document is deserialized into its plain shape (a
//!     malformed document fails with `MalformedDocument`), then the entity's validated
//!     constructor runs, so a grammar with an undeclared terminal fails with
//!     `UndeclaredSymbol` and not with a decoding error.
//!
//!         let grammar = DocumentLoader::from_path("grammar.yaml")?.grammar()?;
//!         let tokens = DocumentLoader::from_string(source).with(&transform)?;

use crate::automata::Automaton;
use crate::error::{ErrorKind, WorkbenchError};
use crate::grammar::{Grammar, GrammarDocument};
use crate::parsing::SyntaxTree;
use crate::token::{Token, TokenPattern, TokenPatternDocument};
use crate::transforms::{Transform, TransformError};
use crate::translation::{TranslationRule, TranslationRules};
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Error that can occur when loading documents
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderError {
    /// IO error when reading file
    IoError(String),
    /// The document is malformed or fails validation
    Invalid(WorkbenchError),
    /// Transform error
    TransformError(TransformError),
}

impl LoaderError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            LoaderError::IoError(_) => Some(ErrorKind::Input),
            LoaderError::Invalid(err) => Some(err.kind()),
            LoaderError::TransformError(err) => Some(err.kind()),
        }
    }
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::Invalid(err) => write!(f, "{}", err),
            LoaderError::TransformError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<WorkbenchError> for LoaderError {
    fn from(err: WorkbenchError) -> Self {
        LoaderError::Invalid(err)
    }
}

impl From<TransformError> for LoaderError {
    fn from(err: TransformError) -> Self {
        LoaderError::TransformError(err)
    }
}

/// Serialization format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

pub struct DocumentLoader {
    source: String,
    format: DocumentFormat,
}

impl DocumentLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        debug!("loaded {} bytes from {}", source.len(), path.display());
        Ok(DocumentLoader {
            source,
            format: DocumentFormat::from_path(path),
        })
    }

    /// Load from a string, read as JSON unless [`DocumentLoader::format`] says otherwise
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        DocumentLoader {
            source: source.into(),
            format: DocumentFormat::Json,
        }
    }

    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run a transform on the raw source
    pub fn with<O: 'static>(&self, transform: &Transform<String, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.source.clone())?)
    }

    fn decode<T: DeserializeOwned>(&self, document: &str) -> Result<T, LoaderError> {
        let decoded = match self.format {
            DocumentFormat::Json => {
                serde_json::from_str(&self.source).map_err(|e| e.to_string())
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(&self.source).map_err(|e| e.to_string())
            }
        };
        decoded.map_err(|message| LoaderError::Invalid(WorkbenchError::malformed(document, message)))
    }

    pub fn grammar(&self) -> Result<Grammar, LoaderError> {
        let doc: GrammarDocument = self.decode("grammar")?;
        Ok(Grammar::try_from(doc)?)
    }

    /// An automaton whose state references are consistent
    pub fn automaton(&self) -> Result<Automaton, LoaderError> {
        let automaton: Automaton = self.decode("automaton")?;
        automaton.validate()?;
        Ok(automaton)
    }

    /// Token patterns, from a list of `{type, pattern}` or a type → pattern object
    pub fn token_patterns(&self) -> Result<Vec<TokenPattern>, LoaderError> {
        let doc: TokenPatternDocument = self.decode("token patterns")?;
        doc.into_patterns()
            .map_err(|message| WorkbenchError::malformed("token patterns", message).into())
    }

    pub fn tokens(&self) -> Result<Vec<Token>, LoaderError> {
        self.decode("tokens")
    }

    pub fn translation_rules(&self) -> Result<TranslationRules, LoaderError> {
        let rules: Vec<TranslationRule> = self.decode("translation rules")?;
        Ok(TranslationRules::new(rules)?)
    }

    pub fn syntax_tree(&self) -> Result<SyntaxTree, LoaderError> {
        self.decode("syntax tree")
    }
}
