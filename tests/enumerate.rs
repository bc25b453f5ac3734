use regenum::*;
use regex::Regex;

const PATTERNS: &[&str] = &[
    r"^abc$",
    r"^abc(def)$",
    r"^abc(def)*$",
    r"^abc(def*)$",
    r"^a*b*$",
    r"^(a*|b*|c*)$",
    r"^(a*|b*|c*)*$",
    r"^(a|b|c)*$",
    r"^([a-z])*$",
    r"^\d*$",
    r"^\s{1,2}$",
    r"^\w+$",
    r"^\W+$",
    r"^a.*b$",
    r"^a.+b$",
    r"^a[^A-Z]{1,4}b$",
];

type Entry = fn(&str, Option<Alphabets>) -> Result<Language>;

const ENTRIES: &[(&str, Entry)] = &[
    ("enumerate", |p, a| enumerate(p, a)),
    ("enumerate_examples", |p, a| enumerate_examples(p, a)),
];

fn first_error(language: &Language) -> String {
    language
        .strings()
        .find_map(|s| s.err())
        .expect("enumeration should fail")
        .to_string()
}

#[test]
fn every_string_matches_its_pattern() {
    for (name, entry) in ENTRIES {
        for &pattern in PATTERNS {
            let re = Regex::new(pattern).unwrap();
            let language = entry(pattern, None).unwrap();
            let mut count = 0;
            for s in language.strings().take(64) {
                let s = s.unwrap();
                assert!(re.is_match(&s), "{name}: {pattern} should match {s:?}");
                count += 1;
            }
            assert_ne!(count, 0, "{name}: {pattern} yielded nothing");
        }
    }
}

#[test]
fn unknown_feature() {
    for (name, entry) in ENTRIES {
        let language = entry(r"(a)\1", None).unwrap();
        assert_eq!(
            first_error(&language),
            "Unsupported regular expression feature: reference",
            "{name}"
        );
    }
}

#[test]
fn boundary_anchor() {
    for (_, entry) in ENTRIES {
        let language = entry(r"\b", None).unwrap();
        assert_eq!(first_error(&language), "No boundary anchor support");
    }
}

#[test]
fn lookahead_group() {
    for (_, entry) in ENTRIES {
        let language = entry("(?=abc)", None).unwrap();
        assert_eq!(first_error(&language), "No lookahead group support");
    }
}

#[test]
fn overly_exclusionary_class() {
    for (_, entry) in ENTRIES {
        let language = entry(r"[^ -\uffff]", None).unwrap();
        let message = first_error(&language);
        assert!(message.starts_with("No value in "), "{message}");
        assert!(
            message.ends_with(r"could satisfy the character class [^ -\uffff]"),
            "{message}"
        );
    }
}

#[test]
fn parse_errors_are_reported_up_front() {
    let err = enumerate("(ab", None).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.to_string(), "parse error: missing ')' at offset 0");
}

#[test]
fn accepts_prebuilt_trees() {
    let tree = Node::Alternative(vec![
        Node::Value('x'),
        Node::Quantifier {
            min: 1,
            max: Some(2),
            greedy: true,
            body: Box::new(Node::ClassEscape('d')),
        },
    ]);
    let digits = Alphabets {
        digit: vec!['4', '2'],
        ..Alphabets::exhaustive()
    };
    let language = enumerate(tree, Some(digits)).unwrap();
    let strings: Vec<String> = language.strings().map(Result::unwrap).collect();
    assert_eq!(strings, vec!["x4", "x2", "x44", "x24", "x42", "x22"]);
}

#[test]
fn digits_only() {
    let language = enumerate(r"^\d*$", None).unwrap();
    let digits = &language.enumerator().alphabets().digit;
    for s in language.strings().take(64) {
        assert!(s.unwrap().chars().all(|c| digits.contains(&c)));
    }
}

#[test]
fn two_stars_reach_both_sides() {
    let language = enumerate(r"^a*b*$", None).unwrap();
    let prefix: Vec<String> = language.strings().take(5).map(Result::unwrap).collect();
    assert!(prefix.contains(&String::new()));
    assert!(prefix.iter().any(|s| !s.is_empty() && s.chars().all(|c| c == 'a')));
    assert!(prefix.iter().any(|s| !s.is_empty() && s.chars().all(|c| c == 'b')));
}

#[test]
fn finite_branch_beside_infinite_branch() {
    let language = enumerate("^(?:[a-e]|z+)$", None).unwrap();
    let prefix: Vec<String> = language.strings().take(10).map(Result::unwrap).collect();
    for c in ["a", "b", "c", "d", "e"] {
        assert!(prefix.iter().any(|s| s == c), "missing {c} in {prefix:?}");
    }
}

#[test]
fn examples_terminate() {
    let pattern = r"^[a-z]?@\d{1,2}\.(?:com|org)$";
    let language = enumerate_examples(pattern, None).unwrap();
    let strings: Vec<String> = language.strings().map(Result::unwrap).collect();
    // 3 local parts ("", "g", "t"), 2 + 4 numbers, 2 suffixes.
    assert_eq!(strings.len(), 3 * 6 * 2);
    let re = Regex::new(pattern).unwrap();
    assert!(strings.iter().all(|s| re.is_match(s)));
}

#[test]
fn strings_restart_from_the_beginning() {
    let language = enumerate("^abc(def)*$", None).unwrap();
    let first: Vec<String> = language.strings().take(3).map(Result::unwrap).collect();
    let again: Vec<String> = language.strings().take(3).map(Result::unwrap).collect();
    assert_eq!(first, vec!["abc", "abcdef", "abcdefdef"]);
    assert_eq!(first, again);
}
