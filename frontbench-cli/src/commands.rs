//! Subcommand handlers
//!
//! Each handler loads its documents, runs one core operation and returns the text to
//! print. Nothing is printed until the whole operation has succeeded.

use clap::ArgMatches;
use config::ConfigError;
use frontbench_config::WorkbenchConfig;
use frontbench_core::formats::{FormatError, FormatRegistry};
use frontbench_core::transforms::stages::{Parsing, Translation};
use frontbench_core::transforms::standard;
use frontbench_core::{
    build_dfa, build_nfa, extract_regexes, minimize_dfa, run_pipeline, to_dot, Automaton,
    DocumentLoader, ErrorKind, LexerSpec, LoaderError, ParseOptions, PipelineOptions,
    PipelineRequest, Runnable, ScanOptions, TransformError, WorkbenchError,
};
use log::{info, warn};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Config(ConfigError),
    Load(LoaderError),
    Run(TransformError),
    Core(WorkbenchError),
    Format(FormatError),
}

impl CliError {
    fn kind(&self) -> Option<ErrorKind> {
        match self {
            CliError::Load(err) => err.kind(),
            CliError::Run(err) => Some(err.kind()),
            CliError::Core(err) => Some(err.kind()),
            CliError::Usage(_) | CliError::Config(_) | CliError::Format(_) => None,
        }
    }

    /// Tag printed as `error[<label>]`
    pub fn label(&self) -> &'static str {
        match (self.kind(), self) {
            (Some(kind), _) => kind.as_str(),
            (None, CliError::Config(_)) => "config",
            (None, CliError::Format(_)) => "format",
            (None, _) => "usage",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            Some(ErrorKind::RuntimeMismatch) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Config(err) => write!(f, "{}", err),
            CliError::Load(err) => write!(f, "{}", err),
            CliError::Run(err) => write!(f, "{}", err),
            CliError::Core(err) => write!(f, "{}", err),
            CliError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}

impl From<LoaderError> for CliError {
    fn from(err: LoaderError) -> Self {
        CliError::Load(err)
    }
}

impl From<TransformError> for CliError {
    fn from(err: TransformError) -> Self {
        CliError::Run(err)
    }
}

impl From<WorkbenchError> for CliError {
    fn from(err: WorkbenchError) -> Self {
        CliError::Core(err)
    }
}

impl From<FormatError> for CliError {
    fn from(err: FormatError) -> Self {
        CliError::Format(err)
    }
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, CliError> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing <{}>", name)))
}

fn to_json<T: Serialize>(value: &T, config: &WorkbenchConfig) -> Result<String, CliError> {
    let result = if config.output.pretty_json {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| CliError::Format(FormatError::SerializationError(e.to_string())))
}

fn scan_options(config: &WorkbenchConfig) -> ScanOptions {
    ScanOptions {
        merge_unidentified: config.lexing.merge_unidentified,
    }
}

fn parse_options(config: &WorkbenchConfig) -> ParseOptions {
    ParseOptions {
        memoize: config.parser.memoize,
    }
}

/// The tree formats, with JSON layout taken from `output.pretty_json`
pub fn formats(config: &WorkbenchConfig) -> FormatRegistry {
    FormatRegistry::standard(config.output.pretty_json)
}

fn load_automaton(matches: &ArgMatches) -> Result<Automaton, CliError> {
    Ok(DocumentLoader::from_path(arg(matches, "automaton")?)?.automaton()?)
}

fn lexer_spec(matches: &ArgMatches) -> Result<LexerSpec, CliError> {
    match matches.get_one::<String>("rules") {
        Some(path) => Ok(LexerSpec::Rules(
            DocumentLoader::from_path(path)?.token_patterns()?,
        )),
        None => Ok(LexerSpec::Automaton(load_automaton(matches)?)),
    }
}

pub fn nfa(matches: &ArgMatches, config: &WorkbenchConfig) -> Result<String, CliError> {
    let patterns = DocumentLoader::from_path(arg(matches, "patterns")?)?.token_patterns()?;
    to_json(&build_nfa(&patterns)?, config)
}

pub fn dfa(matches: &ArgMatches, config: &WorkbenchConfig) -> Result<String, CliError> {
    let mut dfa = build_dfa(&load_automaton(matches)?)?;
    if config.automata.minimize {
        dfa = minimize_dfa(&dfa)?;
    }
    to_json(&dfa, config)
}

pub fn regex(matches: &ArgMatches, config: &WorkbenchConfig) -> Result<String, CliError> {
    to_json(&extract_regexes(&load_automaton(matches)?)?, config)
}

pub fn dot(matches: &ArgMatches) -> Result<String, CliError> {
    Ok(to_dot(&load_automaton(matches)?))
}

pub fn tokenize(matches: &ArgMatches, config: &WorkbenchConfig) -> Result<String, CliError> {
    let lexer = lexer_spec(matches)?;
    let source = DocumentLoader::from_path(arg(matches, "source")?)?;
    let output = source.with(&standard::lexing(lexer, scan_options(config)))?;
    if !output.unidentified.is_empty() {
        warn!("unidentified: {:?}", output.unidentified);
    }
    to_json(&output, config)
}

pub fn parse(matches: &ArgMatches, config: &WorkbenchConfig) -> Result<String, CliError> {
    let tokens = DocumentLoader::from_path(arg(matches, "tokens")?)?.tokens()?;
    let grammar = DocumentLoader::from_path(arg(matches, "grammar")?)?.grammar()?;
    let tree = Parsing::new(grammar, parse_options(config)).run(tokens)?;
    Ok(formats(config).serialize(&tree, &config.output.format)?)
}

pub fn translate(matches: &ArgMatches) -> Result<String, CliError> {
    let tree = DocumentLoader::from_path(arg(matches, "tree")?)?.syntax_tree()?;
    let rules = DocumentLoader::from_path(arg(matches, "rules")?)?.translation_rules()?;
    Ok(Translation::new(rules).run(tree)?.join("\n"))
}

pub fn run(matches: &ArgMatches, config: &WorkbenchConfig) -> Result<String, CliError> {
    let lexer = lexer_spec(matches)?;
    let grammar = DocumentLoader::from_path(arg(matches, "grammar")?)?.grammar()?;
    let translation = match matches.get_one::<String>("translation") {
        Some(path) => Some(DocumentLoader::from_path(path)?.translation_rules()?),
        None => None,
    };
    let source = DocumentLoader::from_path(arg(matches, "source")?)?;

    let output = run_pipeline(PipelineRequest {
        source: source.source().to_string(),
        lexer,
        grammar,
        translation,
        options: PipelineOptions {
            scan: scan_options(config),
            parse: parse_options(config),
        },
    })?;
    info!(
        "{} tokens, {} unidentified",
        output.tokens.len(),
        output.unidentified.len()
    );
    if !output.unidentified.is_empty() {
        warn!("unidentified: {:?}", output.unidentified);
    }

    let mut text = output.rendered_tree;
    if let Some(lines) = output.translation {
        text.push('\n');
        for line in lines {
            text.push_str(&line);
            text.push('\n');
        }
    }
    Ok(text)
}
