use assert_cmd::cargo::cargo_bin_cmd;
use frontbench_core::testing::{
    int_declaration_dfa, leaf_tree, statement_grammar, statement_patterns, statement_tokens,
    store_rules, STATEMENT_TREE,
};
use frontbench_core::{create_syntax_tree, Automaton, SyntaxTree};
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
    write(dir, name, &serde_json::to_string_pretty(value).unwrap())
}

#[test]
fn tokenize_with_automaton() {
    let dir = TempDir::new().unwrap();
    let dfa = write_json(dir.path(), "dfa.json", &int_declaration_dfa());
    let source = write(dir.path(), "decl.txt", "int x = 3;");

    let output = cargo_bin_cmd!("frontbench")
        .arg("tokenize")
        .arg(&source)
        .arg("--automaton")
        .arg(&dfa)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["tokens"][0]["type"], "KEYWORD");
    assert_eq!(value["tokens"][2]["value"], "3");
    assert_eq!(value["unidentified"], serde_json::json!(["=", ";"]));
}

#[test]
fn parse_renders_treeviz() {
    let dir = TempDir::new().unwrap();
    let tokens = write_json(dir.path(), "tokens.json", &statement_tokens());
    let grammar = write_json(dir.path(), "grammar.json", &statement_grammar());

    cargo_bin_cmd!("frontbench")
        .arg("parse")
        .arg(&tokens)
        .arg("--grammar")
        .arg(&grammar)
        .assert()
        .success()
        .stdout(STATEMENT_TREE);
}

#[rstest]
#[case("json", "\"symbol\": \"STATEMENT\"")]
#[case("treeviz", "└──  STATEMENT")]
fn parse_formats(#[case] format: &str, #[case] expected: &str) {
    let dir = TempDir::new().unwrap();
    let tokens = write_json(dir.path(), "tokens.json", &statement_tokens());
    let grammar = write_json(dir.path(), "grammar.json", &statement_grammar());

    cargo_bin_cmd!("frontbench")
        .args(["parse", "--format", format, "--grammar"])
        .arg(&grammar)
        .arg(&tokens)
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn unknown_format_fails() {
    let dir = TempDir::new().unwrap();
    let tokens = write_json(dir.path(), "tokens.json", &statement_tokens());
    let grammar = write_json(dir.path(), "grammar.json", &statement_grammar());

    cargo_bin_cmd!("frontbench")
        .args(["parse", "--format", "xml", "--grammar"])
        .arg(&grammar)
        .arg(&tokens)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error[format]: Format 'xml' not found"));
}

#[test]
fn syntax_error_exits_with_runtime_mismatch() {
    let dir = TempDir::new().unwrap();
    let tokens = write_json(dir.path(), "tokens.json", &statement_tokens()[..3].to_vec());
    let grammar = write_json(dir.path(), "grammar.json", &statement_grammar());

    cargo_bin_cmd!("frontbench")
        .arg("parse")
        .arg(&tokens)
        .arg("-g")
        .arg(&grammar)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "error[runtime-mismatch]: Stage 'parsing' failed: Syntax error at token 3: unexpected end of input",
        ));
}

#[test]
fn invalid_grammar_is_a_semantic_error() {
    let dir = TempDir::new().unwrap();
    let tokens = write_json(dir.path(), "tokens.json", &statement_tokens());
    let grammar = write(
        dir.path(),
        "grammar.yaml",
        "variables: [E]\nterminals: [A]\nstart: E\nrules:\n  - { input: E, output: [E, A] }\n",
    );

    cargo_bin_cmd!("frontbench")
        .arg("parse")
        .arg(&tokens)
        .arg("-g")
        .arg(&grammar)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error[semantic]"));
}

#[test]
fn translate_tree() {
    let dir = TempDir::new().unwrap();
    let tree: SyntaxTree = create_syntax_tree(
        &[
            frontbench_core::Token::new("KEYWORD", "int"),
            frontbench_core::Token::new("IDENTIFIER", "red"),
            frontbench_core::Token::new("ASSIGNMENT", "="),
            frontbench_core::Token::new("INTEGER", "13"),
            frontbench_core::Token::new("SEPARATOR", ";"),
        ],
        &frontbench_core::Grammar::new(
            vec!["S"],
            vec!["KEYWORD", "IDENTIFIER", "ASSIGNMENT", "INTEGER", "SEPARATOR"],
            "S",
            vec![frontbench_core::ProductionRule::new(
                "S",
                vec!["KEYWORD", "IDENTIFIER", "ASSIGNMENT", "INTEGER", "SEPARATOR"],
            )],
        )
        .unwrap(),
    )
    .unwrap();
    let tree = write_json(dir.path(), "tree.json", &tree);
    let rules = write_json(dir.path(), "rules.json", &store_rules());

    cargo_bin_cmd!("frontbench")
        .arg("translate")
        .arg(&tree)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout("add \t rax, 13\nmov \t [red], rax\n");
}

#[test]
fn untranslated_leaf_exits_with_runtime_mismatch() {
    let dir = TempDir::new().unwrap();
    let tree = write_json(
        dir.path(),
        "tree.json",
        &leaf_tree(&[("KEYWORD", "int"), ("UNKNOWN", "unknown")]),
    );
    let rules = write(
        dir.path(),
        "rules.json",
        r#"[{"sequence": ["KEYWORD"], "translation": ["kw"]}]"#,
    );

    cargo_bin_cmd!("frontbench")
        .arg("translate")
        .arg(&tree)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "error[runtime-mismatch]: Stage 'translation' failed: Untranslated token #1: no rule covers (UNKNOWN, \"unknown\")",
        ));
}

#[test]
fn run_pipeline_end_to_end() {
    let dir = TempDir::new().unwrap();
    let rules = write_json(dir.path(), "lexer.json", &statement_patterns());
    let grammar = write_json(dir.path(), "grammar.json", &statement_grammar());
    let translation = write(
        dir.path(),
        "translation.yaml",
        "- sequence: [KEYWORD, IDENTIFIER, ASSIGNMENT]\n  translation: [\"; {IDENTIFIER}\"]\n\
         - sequence: [INTEGER, OPERATOR, INTEGER, SEPARATOR]\n  translation: [\"mov rax, {INTEGER}\", \"add rax, {INTEGER}\"]\n",
    );
    let source = write(dir.path(), "main.src", "int blue = 13 + 89 ;\n");

    let expected = format!("{}\n; blue\nmov rax, 13\nadd rax, 89\n", STATEMENT_TREE);
    cargo_bin_cmd!("frontbench")
        .arg("run")
        .arg(&source)
        .arg("--rules")
        .arg(&rules)
        .arg("--grammar")
        .arg(&grammar)
        .arg("--translation")
        .arg(&translation)
        .assert()
        .success()
        .stdout(expected);
}

#[test]
fn automaton_commands_chain() {
    let dir = TempDir::new().unwrap();
    let patterns = write(
        dir.path(),
        "patterns.json",
        r#"{"KEYWORD": "int", "IDENTIFIER": "[a-z]+", "NUMBER": "[0-9]+"}"#,
    );

    let nfa = cargo_bin_cmd!("frontbench")
        .arg("nfa")
        .arg(&patterns)
        .output()
        .unwrap();
    assert!(nfa.status.success());
    let nfa_path = dir.path().join("nfa.json");
    fs::write(&nfa_path, &nfa.stdout).unwrap();

    let dfa = cargo_bin_cmd!("frontbench")
        .arg("dfa")
        .arg(&nfa_path)
        .arg("--minimize")
        .output()
        .unwrap();
    assert!(dfa.status.success());
    let automaton: Automaton = serde_json::from_slice(&dfa.stdout).unwrap();
    assert!(automaton.is_deterministic());
    assert_eq!(automaton.run("int"), Some("KEYWORD"));
    assert_eq!(automaton.run("integer"), Some("IDENTIFIER"));
    assert_eq!(automaton.run("42"), Some("NUMBER"));
    let dfa_path = dir.path().join("dfa.json");
    fs::write(&dfa_path, &dfa.stdout).unwrap();

    cargo_bin_cmd!("frontbench")
        .arg("regex")
        .arg(&dfa_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"KEYWORD\"").and(predicate::str::contains("\"int\"")));

    cargo_bin_cmd!("frontbench")
        .arg("dot")
        .arg(&dfa_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph automaton {"));
}

#[test]
fn dfa_rejects_structurally_empty_automaton() {
    let dir = TempDir::new().unwrap();
    let empty = write_json(dir.path(), "empty.json", &Automaton::default());

    cargo_bin_cmd!("frontbench")
        .arg("dfa")
        .arg(&empty)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[structural-precondition]: The automaton has no start"));
}

#[test]
fn config_file_turns_on_minimization() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "frontbench.toml", "[automata]\nminimize = true\n[output]\npretty_json = false\n");
    let patterns = write(dir.path(), "patterns.json", r#"{"AB": "(a|b)c"}"#);
    let nfa = cargo_bin_cmd!("frontbench")
        .arg("nfa")
        .arg(&patterns)
        .output()
        .unwrap();
    let nfa_path = dir.path().join("nfa.json");
    fs::write(&nfa_path, &nfa.stdout).unwrap();

    let dfa = cargo_bin_cmd!("frontbench")
        .arg("--config")
        .arg(&config)
        .arg("dfa")
        .arg(&nfa_path)
        .output()
        .unwrap();
    assert!(dfa.status.success());
    let text = String::from_utf8(dfa.stdout).unwrap();
    assert_eq!(text.lines().count(), 1);
    let automaton: Automaton = serde_json::from_str(&text).unwrap();
    assert_eq!(automaton.states, vec!["START", "S1", "S2"]);
}

#[test]
fn local_config_file_picks_the_tree_format() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "frontbench.toml", "[output]\nformat = \"json\"\n");
    write_json(dir.path(), "tokens.json", &statement_tokens());
    write_json(dir.path(), "grammar.json", &statement_grammar());

    cargo_bin_cmd!("frontbench")
        .current_dir(dir.path())
        .args(["parse", "tokens.json", "-g", "grammar.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"symbol\": \"STATEMENT\""));

    cargo_bin_cmd!("frontbench")
        .current_dir(dir.path())
        .args(["parse", "tokens.json", "-g", "grammar.json", "--format", "treeviz"])
        .assert()
        .success()
        .stdout(STATEMENT_TREE);
}

#[test]
fn unknown_configured_format_fails_before_any_work() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "custom.toml", "[output]\nformat = \"xml\"\n");
    let patterns = write(dir.path(), "patterns.json", r#"{"A": "a"}"#);

    cargo_bin_cmd!("frontbench")
        .arg("--config")
        .arg(&config)
        .arg("nfa")
        .arg(&patterns)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(
            "error[format]: Format 'xml' not found (available: treeviz, json)",
        ));
}

#[test]
fn missing_file_is_an_input_error() {
    cargo_bin_cmd!("frontbench")
        .args(["nfa", "/definitely/not/here.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("error[input]: IO error"));
}
