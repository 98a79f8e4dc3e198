//! Graphviz export

use super::model::Automaton;
use std::fmt;

/// Render an automaton as a Graphviz `digraph`
///
/// Accepting states are double circles labelled with their token type. The start state
/// is marked by an edge from an invisible point node.
pub fn to_dot(automaton: &Automaton) -> String {
    Dot(automaton).to_string()
}

/// [`fmt::Display`] adapter writing the DOT text of an automaton
pub struct Dot<'a>(pub &'a Automaton);

impl fmt::Display for Dot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let automaton = self.0;
        writeln!(f, "digraph automaton {{")?;
        writeln!(f, "    rankdir=LR;")?;
        writeln!(f, "    __start [shape=point];")?;
        for state in &automaton.states {
            match automaton.accepting_type(state) {
                Some(token_type) => writeln!(
                    f,
                    "    \"{}\" [shape=doublecircle, label=\"{}\\n{}\"];",
                    escape(state),
                    escape(state),
                    escape(token_type)
                )?,
                None => writeln!(f, "    \"{}\" [shape=circle];", escape(state))?,
            }
        }
        if !automaton.start.is_empty() {
            writeln!(f, "    __start -> \"{}\";", escape(&automaton.start))?;
        }
        for t in &automaton.transitions {
            writeln!(
                f,
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                escape(&t.from),
                escape(&t.to),
                escape(&t.label.render())
            )?;
        }
        writeln!(f, "}}")
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
