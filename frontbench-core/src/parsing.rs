//! Grammar-driven parsing
//!
//!     [`create_syntax_tree`] turns a token stream into a [`SyntaxTree`] under a
//!     [`Grammar`](crate::grammar::Grammar). Alternatives are tried in declared order and
//!     the first one whose whole right side parses is taken; there is no ambiguity
//!     resolution beyond that.
//!
//!     Because the grammar rejects left recursion when it is built, every chain of
//!     recursive calls at one position is finite and parsing always terminates. Without
//!     memoization the backtracking can revisit the same span many times; with
//!     [`ParseOptions::memoize`] each `(symbol, position)` pair is parsed at most once.
//!     Under first-successful-alternative semantics a symbol's result at a position never
//!     depends on how it was reached, so both modes build the same tree.

pub mod parser;
pub mod tree;

pub use parser::{create_syntax_tree, create_syntax_tree_with, ParseOptions};
pub use tree::{Leaves, SyntaxTree, TreeNode};
