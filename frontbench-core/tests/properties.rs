//! Property tests for the automata, the tokenizers, the parser and translation

use frontbench_core::testing::{leaf_tree, statement_patterns};
use frontbench_core::{
    build_dfa, build_nfa, create_syntax_tree, extract_regexes, minimize_dfa,
    tokenize_with_automaton, tokenize_with_rules, translate, Grammar, ProductionRule,
    ScanOptions, Token, TokenPattern, TranslationRule, TranslationRules, WorkbenchError,
};
use proptest::prelude::*;

/// Patterns over `a`, `b`, `c` in the shared dialect, every operator parenthesized
fn pattern() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        Just("[ab]".to_string()),
        Just("[a-c]".to_string()),
    ];
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(x, y)| format!("{}{}", x, y)),
            (inner.clone(), inner.clone()).prop_map(|(x, y)| format!("({}|{})", x, y)),
            inner.clone().prop_map(|x| format!("({})*", x)),
            inner.clone().prop_map(|x| format!("({})?", x)),
            inner.prop_map(|x| format!("({})+", x)),
        ]
    })
}

fn samples() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[abc]{0,6}", 24)
}

fn anchored(pattern: &str) -> regex::Regex {
    regex::Regex::new(&format!("^(?:{})$", pattern)).unwrap()
}

proptest! {
    #[test]
    fn prop_dfa_accepts_exactly_the_pattern_language(p in pattern(), inputs in samples()) {
        let oracle = anchored(&p);
        let dfa = build_dfa(&build_nfa(&[TokenPattern::new("T", p.clone())]).unwrap()).unwrap();
        let minimal = minimize_dfa(&dfa).unwrap();
        for s in &inputs {
            let expected = oracle.is_match(s);
            prop_assert_eq!(dfa.run(s) == Some("T"), expected, "dfa on {:?}", s);
            prop_assert_eq!(minimal.run(s) == Some("T"), expected, "minimal dfa on {:?}", s);
        }
    }

    #[test]
    fn prop_extracted_regex_matches_the_original(p in pattern(), inputs in samples()) {
        let dfa = build_dfa(&build_nfa(&[TokenPattern::new("T", p.clone())]).unwrap()).unwrap();
        let extracted = extract_regexes(&dfa).unwrap();
        prop_assert_eq!(extracted.len(), 1);
        let recovered = anchored(&extracted[0].patterns.join("|"));
        let oracle = anchored(&p);
        for s in &inputs {
            prop_assert_eq!(recovered.is_match(s), oracle.is_match(s), "{} vs {} on {:?}", extracted[0].patterns.join("|"), p, s);
        }
    }

    #[test]
    fn prop_subset_construction_is_deterministic(a in pattern(), b in pattern(), c in pattern()) {
        let nfa = build_nfa(&[
            TokenPattern::new("A", a),
            TokenPattern::new("B", b),
            TokenPattern::new("C", c),
        ])
        .unwrap();
        let dfa = build_dfa(&nfa).unwrap();
        prop_assert!(dfa.is_deterministic());
        prop_assert!(minimize_dfa(&dfa).unwrap().is_deterministic());
    }

    #[test]
    fn prop_tokenizers_are_deterministic(source in "[a-z0-9 =+;@-]{0,24}") {
        let patterns = statement_patterns();
        let first = tokenize_with_rules(&source, &patterns, &ScanOptions::default());
        let second = tokenize_with_rules(&source, &patterns, &ScanOptions::default());
        prop_assert_eq!(first, second);

        let dfa = build_dfa(&build_nfa(&patterns).unwrap()).unwrap();
        let first = tokenize_with_automaton(&source, &dfa, &ScanOptions::default());
        let second = tokenize_with_automaton(&source, &dfa, &ScanOptions::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_tokens_never_lose_text(source in "[a-z0-9 =+;@]{1,24}") {
        let patterns = statement_patterns();
        let dfa = build_dfa(&build_nfa(&patterns).unwrap()).unwrap();
        let squeezed: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        for output in [
            tokenize_with_rules(&source, &patterns, &ScanOptions { merge_unidentified: false }),
            tokenize_with_automaton(&source, &dfa, &ScanOptions { merge_unidentified: false }),
        ] {
            let output = match output {
                Ok(output) => output,
                Err(WorkbenchError::EmptySource) => continue,
                Err(other) => return Err(TestCaseError::fail(other.to_string())),
            };
            let total: usize = output.tokens.iter().map(|t| t.value().len()).sum::<usize>()
                + output.unidentified.iter().map(String::len).sum::<usize>();
            prop_assert_eq!(total, squeezed.len());
        }
    }

    #[test]
    fn prop_successful_parse_preserves_token_text(terms in proptest::collection::vec(0u32..1000, 1..12)) {
        let grammar = Grammar::new(
            vec!["EXPR", "TERM"],
            vec!["INTEGER", "OPERATOR"],
            "EXPR",
            vec![
                ProductionRule::new("EXPR", vec!["TERM", "OPERATOR", "EXPR"]),
                ProductionRule::new("EXPR", vec!["TERM"]),
                ProductionRule::new("TERM", vec!["INTEGER"]),
            ],
        )
        .unwrap();
        let mut tokens = Vec::new();
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                tokens.push(Token::new("OPERATOR", "+"));
            }
            tokens.push(Token::new("INTEGER", term.to_string()));
        }
        let tree = create_syntax_tree(&tokens, &grammar).unwrap();
        let expected: String = tokens.iter().map(|t| t.value()).collect();
        prop_assert_eq!(tree.text(), expected);
    }

    #[test]
    fn prop_translation_succeeds_iff_every_leaf_is_covered(kinds in proptest::collection::vec(prop_oneof![Just("A"), Just("B"), Just("C")], 0..12)) {
        // Spans are `A B` or `C`, so full coverage means the types spell (AB|C)*
        let rules = TranslationRules::new(vec![
            TranslationRule::new(vec!["A", "B"], vec!["ab"]),
            TranslationRule::new(vec!["C"], vec!["c"]),
        ])
        .unwrap();
        let leaves: Vec<(&str, &str)> = kinds.iter().map(|k| (*k, "v")).collect();
        let spelled: String = kinds.concat();
        let covered = anchored("(AB|C)*").is_match(&spelled);
        match translate(&leaf_tree(&leaves), &rules) {
            Ok(lines) => {
                prop_assert!(covered);
                let expected = spelled.matches("AB").count() + spelled.matches('C').count();
                prop_assert_eq!(lines.len(), expected);
            }
            Err(WorkbenchError::UntranslatedToken { index, .. }) => {
                prop_assert!(!covered);
                prop_assert!(index < kinds.len());
            }
            Err(other) => return Err(TestCaseError::fail(other.to_string())),
        }
    }
}
