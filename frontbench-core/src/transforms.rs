//! Composable transforms
//!
//!     The frontend stages (tokenize, parse, translate) are exposed as [`Runnable`]
//!     implementations and chained into a [`Transform`] with `.then()`:
//!
//!         let translate = Transform::from_fn(Ok)
//!             .then(Tokenization::new(lexer, scan))      // String → LexerOutput
//!             .then(Transform::from_fn(|out| Ok(out.tokens)))
//!             .then(Parsing::new(grammar, parse))        // Vec<Token> → SyntaxTree
//!             .then(Translation::new(rules));            // SyntaxTree → Vec<String>
//!
//!     The compiler checks that each stage's input type matches the previous stage's
//!     output. Stages own the rule lists and grammars they were built with; nothing is
//!     shared between two transforms, so transforms built for different requests can run
//!     on different threads at once.
//!
//!     A failing stage reports [`TransformError::StageFailed`] with the stage name and
//!     the core error, whose [`ErrorKind`] stays reachable through [`TransformError::kind`].
//!
//!     - [`stages`]: the individual stages
//!     - [`standard`]: the lexing chain
//!
//!     The CLI runs single stages directly (`parse`, `translate`) and the lexing chain
//!     through [`crate::loader::DocumentLoader::with`].

pub mod stages;
pub mod standard;

use crate::error::{ErrorKind, WorkbenchError};
use std::fmt;

/// Error that can occur during transformation
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Stage failed with a core error
    StageFailed {
        stage: String,
        source: WorkbenchError,
    },
}

impl TransformError {
    pub fn stage(stage: &str, source: WorkbenchError) -> Self {
        TransformError::StageFailed {
            stage: stage.to_string(),
            source,
        }
    }

    /// Kind of the underlying core error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::StageFailed { source, .. } => source.kind(),
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::StageFailed { stage, source } => {
                write!(f, "Stage '{}' failed: {}", stage, source)
            }
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::StageFailed { source, .. } => Some(source),
        }
    }
}

/// Trait for anything that can transform an input to an output
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, TransformError>;
}

/// A composable transformation from `I` to `O`
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Chain `stage` after this transform, feeding it this transform's output
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DoubleNumber;
    impl Runnable<i32, i32> for DoubleNumber {
        fn run(&self, input: i32) -> Result<i32, TransformError> {
            Ok(input * 2)
        }
    }

    struct IntToString;
    impl Runnable<i32, String> for IntToString {
        fn run(&self, input: i32) -> Result<String, TransformError> {
            Ok(input.to_string())
        }
    }

    struct FailingStage;
    impl Runnable<i32, i32> for FailingStage {
        fn run(&self, _input: i32) -> Result<i32, TransformError> {
            Err(TransformError::stage("failing", WorkbenchError::NoTokens))
        }
    }

    #[test]
    fn test_type_changing_chain() {
        let transform = Transform::from_fn(|x: i32| Ok(x + 1))
            .then(DoubleNumber)
            .then(IntToString);
        assert_eq!(transform.run(4).unwrap(), "10");
    }

    #[test]
    fn test_error_propagation_stops_the_chain() {
        let transform = Transform::from_fn(|x: i32| Ok(x))
            .then(FailingStage)
            .then(IntToString);
        let err = transform.run(5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(err.to_string(), "Stage 'failing' failed: No tokens to parse");
    }

    #[test]
    fn test_error_source_is_the_core_error() {
        use std::error::Error;
        let err = TransformError::stage("parsing", WorkbenchError::NoProductions);
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("The grammar has no production rules")
        );
        assert_eq!(err.kind(), ErrorKind::Semantic);
    }
}
