//! Configuration for the frontbench toolchain.
//!
//! `defaults/frontbench.default.toml` is embedded into every binary and always forms
//! the bottom layer. The CLI stacks, in order: a `frontbench.toml` in the working
//! directory when one exists ([`Loader::with_optional_file`]), the file named by
//! `--config` ([`Loader::with_file`]), and the command-line flags that shadow config
//! keys ([`Loader::set_override`]). Later layers win key by key.
//!
//! [`Loader::build`] rejects values that deserialize but make no sense, such as an
//! empty `output.format`.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/frontbench.default.toml");

/// Top-level configuration consumed by frontbench applications.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkbenchConfig {
    pub lexing: LexingConfig,
    pub parser: ParserConfig,
    pub automata: AutomataConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexingConfig {
    pub merge_unidentified: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub memoize: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutomataConfig {
    pub minimize: bool,
}

/// Controls how documents are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty_json: bool,
    /// Tree format name; whether it is registered is checked by the application
    pub format: String,
}

/// Name of the optional per-directory config file
pub const LOCAL_CONFIG: &str = "frontbench.toml";

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `("automata.minimize", true)`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and check the resulting configuration.
    pub fn build(self) -> Result<WorkbenchConfig, ConfigError> {
        let config: WorkbenchConfig = self.builder.build()?.try_deserialize()?;
        if config.output.format.trim().is_empty() {
            return Err(ConfigError::Message(
                "output.format must name a tree format".to_string(),
            ));
        }
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
