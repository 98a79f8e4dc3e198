//! Shared fixtures for tests
//!
//!     Hand-checked inputs used by unit tests, integration tests and the CLI tests. Each
//!     fixture is small enough to verify by eye, and the expected outputs that go with
//!     them are asserted where they are used.
//!
//!         - [int_declaration_dfa]: a hand-drawn DFA recognizing the keyword `int`,
//!           lowercase identifiers and digit runs.
//!         - [statement_grammar] / [statement_tokens]: a declaration grammar and the
//!           token stream for `int blue = 13 + 89 ;`.
//!         - [store_rules]: translation of `int <id> = <int> ;` into two assembly lines.
//!         - [leaf_tree]: a flat tree over a list of leaves, for translation tests that do
//!           not need a grammar.

use crate::automata::{AcceptingState, Automaton, CharSet, Label, Transition};
use crate::grammar::{Grammar, GrammarDocument, ProductionRule};
use crate::parsing::{SyntaxTree, TreeNode};
use crate::token::{Token, TokenPattern};
use crate::translation::{TranslationRule, TranslationRules};

fn chars(ranges: &[(char, char)]) -> Label {
    let mut set = CharSet::new();
    for (lo, hi) in ranges {
        set.extend(&CharSet::range(*lo, *hi));
    }
    Label::Symbols(set)
}

/// Six states: `START`, `S1` (`i`), `S5` (`in`), `S4` (`int`, KEYWORD), `S3`
/// (IDENTIFIER) and `S2` (NUMBER)
pub fn int_declaration_dfa() -> Automaton {
    let edges = [
        ("START", "S1", chars(&[('i', 'i')])),
        ("START", "S3", chars(&[('a', 'h'), ('j', 'z')])),
        ("START", "S2", chars(&[('0', '9')])),
        ("S1", "S5", chars(&[('n', 'n')])),
        ("S1", "S3", chars(&[('a', 'm'), ('o', 'z')])),
        ("S5", "S4", chars(&[('t', 't')])),
        ("S5", "S3", chars(&[('a', 's'), ('u', 'z')])),
        ("S4", "S3", chars(&[('a', 'z')])),
        ("S3", "S3", chars(&[('a', 'z')])),
        ("S2", "S2", chars(&[('0', '9')])),
    ];
    Automaton {
        states: ["START", "S1", "S2", "S3", "S4", "S5"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        transitions: edges
            .into_iter()
            .map(|(from, to, label)| Transition::new(from, to, label))
            .collect(),
        start: "START".to_string(),
        accepting: vec![
            AcceptingState::new("S3", "IDENTIFIER"),
            AcceptingState::new("S4", "KEYWORD"),
            AcceptingState::new("S2", "NUMBER"),
        ],
    }
}

/// Token rules that lex `int blue = 13 + 89 ;` into [statement_tokens]
pub fn statement_patterns() -> Vec<TokenPattern> {
    vec![
        TokenPattern::new("KEYWORD", "int|float"),
        TokenPattern::new("IDENTIFIER", "[a-z_][a-z0-9_]*"),
        TokenPattern::new("INTEGER", "[0-9]+"),
        TokenPattern::new("ASSIGNMENT", "="),
        TokenPattern::new("OPERATOR", "\\+|\\-"),
        TokenPattern::new("SEPARATOR", ";"),
    ]
}

pub fn statement_grammar_document() -> GrammarDocument {
    let rule = |input: &str, output: &[&str]| ProductionRule::new(input, output.to_vec());
    GrammarDocument {
        variables: ["STATEMENT", "DECLARATION", "EXPRESSION", "TERM", "TYPE"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        terminals: [
            "KEYWORD",
            "IDENTIFIER",
            "ASSIGNMENT",
            "INTEGER",
            "OPERATOR",
            "SEPARATOR",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        start: "STATEMENT".to_string(),
        rules: vec![
            rule("STATEMENT", &["DECLARATION", "SEPARATOR"]),
            rule(
                "DECLARATION",
                &["TYPE", "IDENTIFIER", "ASSIGNMENT", "EXPRESSION"],
            ),
            rule("EXPRESSION", &["TERM", "OPERATOR", "TERM"]),
            rule("TERM", &["INTEGER"]),
            rule("TYPE", &["KEYWORD"]),
        ],
    }
}

/// `STATEMENT → DECLARATION SEPARATOR` and friends
pub fn statement_grammar() -> Grammar {
    let doc = statement_grammar_document();
    match Grammar::new(doc.variables, doc.terminals, doc.start, doc.rules) {
        Ok(grammar) => grammar,
        Err(err) => panic!("statement grammar fixture is invalid: {}", err),
    }
}

pub fn statement_tokens() -> Vec<Token> {
    [
        ("KEYWORD", "int"),
        ("IDENTIFIER", "blue"),
        ("ASSIGNMENT", "="),
        ("INTEGER", "13"),
        ("OPERATOR", "+"),
        ("INTEGER", "89"),
        ("SEPARATOR", ";"),
    ]
    .iter()
    .map(|(kind, value)| Token::new(*kind, *value))
    .collect()
}

/// The rendered tree of [statement_tokens] under [statement_grammar]
pub const STATEMENT_TREE: &str = "\
└──  STATEMENT
    ├──  DECLARATION
    │   ├──  TYPE
    │   │   └──  KEYWORD: int
    │   ├──  IDENTIFIER: blue
    │   ├──  ASSIGNMENT: =
    │   └──  EXPRESSION
    │       ├──  TERM
    │       │   └──  INTEGER: 13
    │       ├──  OPERATOR: +
    │       └──  TERM
    │           └──  INTEGER: 89
    └──  SEPARATOR: ;
";

/// `int <id> = <int> ;` → `add rax` / `mov [id]`
pub fn store_rules() -> TranslationRules {
    let rules = vec![TranslationRule::new(
        vec!["KEYWORD", "IDENTIFIER", "ASSIGNMENT", "INTEGER", "SEPARATOR"],
        vec!["add \t rax, {INTEGER}", "mov \t [{IDENTIFIER}], rax"],
    )];
    match TranslationRules::new(rules) {
        Ok(rules) => rules,
        Err(err) => panic!("store rules fixture is invalid: {}", err),
    }
}

/// A `PROGRAM` node whose children are the given leaves
pub fn leaf_tree(leaves: &[(&str, &str)]) -> SyntaxTree {
    SyntaxTree::new(TreeNode::branch(
        "PROGRAM",
        leaves
            .iter()
            .map(|(symbol, value)| TreeNode::leaf(*symbol, *value))
            .collect(),
    ))
}

/// `LIST → ITEM LIST | ITEM`: one nesting level per token
pub fn list_grammar() -> Grammar {
    let rules = vec![
        ProductionRule::new("LIST", vec!["ITEM", "LIST"]),
        ProductionRule::new("LIST", vec!["ITEM"]),
    ];
    match Grammar::new(vec!["LIST"], vec!["ITEM"], "LIST", rules) {
        Ok(grammar) => grammar,
        Err(err) => panic!("list grammar fixture is invalid: {}", err),
    }
}

/// `count` ITEM tokens valued `0`, `1`, ...
pub fn item_tokens(count: usize) -> Vec<Token> {
    (0..count)
        .map(|i| Token::new("ITEM", i.to_string()))
        .collect()
}

/// The tree [list_grammar] builds for `depth` items, assembled bottom up
pub fn list_tree(depth: usize) -> SyntaxTree {
    let mut node = TreeNode::branch("LIST", vec![TreeNode::leaf("ITEM", "x")]);
    for _ in 1..depth {
        node = TreeNode::branch("LIST", vec![TreeNode::leaf("ITEM", "x"), node]);
    }
    SyntaxTree::new(node)
}
