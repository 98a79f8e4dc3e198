//! Builders for the standard stage chains

use super::stages::Tokenization;
use super::Transform;
use crate::lexing::{LexerOutput, ScanOptions};
use crate::pipeline::LexerSpec;

/// Source text → tokens and unidentified spans
pub fn lexing(lexer: LexerSpec, scan: ScanOptions) -> Transform<String, LexerOutput> {
    Transform::from_fn(Ok).then(Tokenization::new(lexer, scan))
}
