//! Regular expressions and finite automata
//!
//!     Conversions between the three representations a tokenizer can be described in:
//!
//!         patterns  --build_nfa-->       NFA    (Thompson construction)
//!         NFA       --build_dfa-->       DFA    (subset construction)
//!         DFA       --minimize_dfa-->    DFA    (partition refinement)
//!         DFA       --extract_regexes--> patterns (state elimination)
//!
//!     NFAs and DFAs share one [`Automaton`] document type. A DFA is simply an automaton
//!     without epsilon edges and with at most one transition per state and character;
//!     see [`Automaton::is_deterministic`].

pub mod charset;
pub mod dot;
pub mod extract;
pub mod minimize;
pub mod model;
pub mod regex;
pub mod subset;
pub mod thompson;

pub use charset::CharSet;
pub use dot::{to_dot, Dot};
pub use extract::{extract_regexes, TypePatterns};
pub use minimize::minimize_dfa;
pub use model::{AcceptingState, Automaton, Label, Transition, EPSILON};
pub use subset::build_dfa;
pub use thompson::build_nfa;
