//! Syntax tree types

use serde::{Deserialize, Serialize};

/// A node of a syntax tree
///
/// Leaves carry a terminal symbol and the matched token's text. Interior nodes carry a
/// variable and the nodes its production produced, in order. A variable that was
/// expanded by an epsilon production has neither children nor a value and is not a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub symbol: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(symbol: impl Into<String>, value: impl Into<String>) -> Self {
        TreeNode {
            symbol: symbol.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(symbol: impl Into<String>, children: Vec<TreeNode>) -> Self {
        TreeNode {
            symbol: symbol.into(),
            value: String::new(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && !self.value.is_empty()
    }

    /// Leaves below (or at) this node, left to right
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }
}

// Children are released through a worklist so deep trees drop without recursion
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// A parse tree rooted at the grammar's start variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub root: TreeNode,
}

impl SyntaxTree {
    pub fn new(root: TreeNode) -> Self {
        SyntaxTree { root }
    }

    pub fn leaves(&self) -> Leaves<'_> {
        self.root.leaves()
    }

    /// Concatenation of every leaf value
    pub fn text(&self) -> String {
        self.leaves().map(|leaf| leaf.value.as_str()).collect()
    }
}

/// Depth-first, left-to-right walk over leaf nodes
pub struct Leaves<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if node.is_leaf() {
                return Some(node);
            }
            self.stack.extend(node.children.iter().rev());
        }
        None
    }
}
