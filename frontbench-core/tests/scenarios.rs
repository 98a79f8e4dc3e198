//! The four end-to-end scenarios, from documents where the CLI would read them

use frontbench_core::formats::to_treeviz_str;
use frontbench_core::testing::{
    int_declaration_dfa, leaf_tree, statement_grammar, statement_tokens, store_rules,
    STATEMENT_TREE,
};
use frontbench_core::{
    create_syntax_tree, tokenize_with_automaton, translate, DocumentLoader, ErrorKind,
    ScanOptions, Token, TranslationRule, TranslationRules, WorkbenchError,
};

const INT_DECLARATION_DFA: &str = r#"{
  "states": ["START", "S1", "S2", "S3", "S4", "S5"],
  "transitions": [
    { "from": "START", "to": "S1", "label": "i" },
    { "from": "START", "to": "S3", "label": "[a-hj-z]" },
    { "from": "START", "to": "S2", "label": "[0-9]" },
    { "from": "S1", "to": "S5", "label": "n" },
    { "from": "S1", "to": "S3", "label": "[a-mo-z]" },
    { "from": "S5", "to": "S4", "label": "t" },
    { "from": "S5", "to": "S3", "label": "[a-su-z]" },
    { "from": "S4", "to": "S3", "label": "[a-z]" },
    { "from": "S3", "to": "S3", "label": "[a-z]" },
    { "from": "S2", "to": "S2", "label": "[0-9]" }
  ],
  "start": "START",
  "accepting": [
    { "state": "S3", "token_type": "IDENTIFIER" },
    { "state": "S4", "token_type": "KEYWORD" },
    { "state": "S2", "token_type": "NUMBER" }
  ]
}"#;

#[test]
fn scenario_1_dfa_tokenizes_int_declaration() {
    let dfa = DocumentLoader::from_string(INT_DECLARATION_DFA)
        .automaton()
        .unwrap();
    assert_eq!(dfa, int_declaration_dfa());

    let output = tokenize_with_automaton("int x = 3;", &dfa, &ScanOptions::default()).unwrap();
    assert_eq!(
        output.tokens,
        vec![
            Token::new("KEYWORD", "int"),
            Token::new("IDENTIFIER", "x"),
            Token::new("NUMBER", "3"),
        ]
    );
    assert_eq!(output.unidentified, vec!["=", ";"]);
}

#[test]
fn scenario_2_statement_parses_to_rendered_tree() {
    let tree = create_syntax_tree(&statement_tokens(), &statement_grammar()).unwrap();
    assert_eq!(
        to_treeviz_str(&tree),
        "\
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
"
    );
    assert_eq!(to_treeviz_str(&tree), STATEMENT_TREE);
}

#[test]
fn scenario_3_translation_fills_placeholders() {
    let rules = DocumentLoader::from_string(
        r#"[{
            "sequence": ["KEYWORD", "IDENTIFIER", "ASSIGNMENT", "INTEGER", "SEPARATOR"],
            "translation": ["add \t rax, {INTEGER}", "mov \t [{IDENTIFIER}], rax"]
        }]"#,
    )
    .translation_rules()
    .unwrap();
    assert_eq!(rules, store_rules());

    let tree = leaf_tree(&[
        ("KEYWORD", "int"),
        ("IDENTIFIER", "red"),
        ("ASSIGNMENT", "="),
        ("INTEGER", "13"),
        ("SEPARATOR", ";"),
    ]);
    assert_eq!(
        translate(&tree, &rules).unwrap(),
        vec!["add \t rax, 13", "mov \t [red], rax"]
    );
}

#[test]
fn scenario_4_uncovered_leaf_fails_translation() {
    let rules =
        TranslationRules::new(vec![TranslationRule::new(vec!["KEYWORD"], vec!["; int"])]).unwrap();
    let tree = leaf_tree(&[("KEYWORD", "int"), ("UNKNOWN", "unknown")]);
    let err = translate(&tree, &rules).unwrap_err();
    assert_eq!(
        err,
        WorkbenchError::UntranslatedToken {
            index: 1,
            token_type: "UNKNOWN".to_string(),
            value: "unknown".to_string(),
        }
    );
    assert_eq!(err.kind(), ErrorKind::RuntimeMismatch);
    assert!(err.to_string().contains("(UNKNOWN, \"unknown\")"));
}
