//! Treeviz rendering of syntax trees
//!
//! One line per node. Nesting is drawn with box connectors, four columns per level:
//!
//!     └──  STATEMENT
//!         ├──  DECLARATION
//!         │   ├──  TYPE
//!         │   │   └──  KEYWORD: int
//!         │   └──  IDENTIFIER: blue
//!         └──  SEPARATOR: ;
//!
//! Interior nodes show their symbol; leaves show `SYMBOL: value`.

use super::registry::{FormatError, Formatter};
use crate::parsing::{SyntaxTree, TreeNode};
use std::rc::Rc;

fn label(node: &TreeNode) -> String {
    if node.is_leaf() {
        format!("{}: {}", node.symbol, node.value)
    } else {
        node.symbol.clone()
    }
}

/// Render `tree`, one line per node in depth-first order
pub fn to_treeviz_str(tree: &SyntaxTree) -> String {
    let mut output = String::new();
    // (node, prefix of its line, whether it is the last of its siblings)
    let mut pending: Vec<(&TreeNode, Rc<str>, bool)> = vec![(&tree.root, Rc::from(""), true)];
    while let Some((node, prefix, is_last)) = pending.pop() {
        let connector = if is_last { "└──" } else { "├──" };
        output.push_str(&prefix);
        output.push_str(connector);
        output.push_str("  ");
        output.push_str(&label(node));
        output.push('\n');

        if node.children.is_empty() {
            continue;
        }
        let child_prefix: Rc<str> =
            Rc::from(format!("{}{}", prefix, if is_last { "    " } else { "│   " }));
        let last = node.children.len() - 1;
        for (i, child) in node.children.iter().enumerate().rev() {
            pending.push((child, Rc::clone(&child_prefix), i == last));
        }
    }
    output
}

/// Formatter implementation for treeviz format
pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, tree: &SyntaxTree) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree))
    }
}
