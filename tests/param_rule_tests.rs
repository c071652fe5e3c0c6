//! Tests for param-rule composition.
//!
//! A rule is the logical AND of its configured checks; any failing check
//! fails the whole rule.

use rairouter::errors::ConfigError;
use rairouter::tree::ParamRule;

#[test]
fn test_rule_with_no_checks_accepts_everything() {
    let rule = ParamRule::new("anything");
    assert!(rule.validate(""));
    assert!(rule.validate("42"));
    assert!(rule.validate("!@#$"));
}

#[test]
fn test_pattern_check() {
    let rule = ParamRule::new("id")
        .pattern("^[0-9]+$")
        .expect("pattern should compile");
    assert!(rule.validate("123"));
    assert!(!rule.validate("12a"));
    assert!(!rule.validate(""));
}

#[test]
fn test_length_bounds() {
    let rule = ParamRule::new("slug").min_len(3).max_len(8);
    assert!(!rule.validate("ab"));
    assert!(rule.validate("abc"));
    assert!(rule.validate("abcdefgh"));
    assert!(!rule.validate("abcdefghi"));
}

#[test]
fn test_lengths_count_characters_not_bytes() {
    let rule = ParamRule::new("name").max_len(5);
    // five characters, more than five bytes
    assert!(rule.validate("héllo"));
}

#[test]
fn test_predicate_check() {
    let rule = ParamRule::new("even").predicate(|v| v.parse::<u64>().is_ok_and(|n| n % 2 == 0));
    assert!(rule.validate("4"));
    assert!(!rule.validate("3"));
    assert!(!rule.validate("not-a-number"));
}

#[test]
fn test_checks_compose_as_logical_and() {
    let rule = ParamRule::new("code")
        .pattern("^[a-z]+$")
        .expect("pattern should compile")
        .min_len(2)
        .max_len(4)
        .predicate(|v| v != "bad");

    assert!(rule.validate("ok"));
    assert!(!rule.validate("a")); // min_len fails
    assert!(!rule.validate("toolong")); // max_len fails
    assert!(!rule.validate("UP")); // pattern fails
    assert!(!rule.validate("bad")); // predicate fails
}

#[test]
fn test_invalid_pattern_is_a_config_error() {
    let err = ParamRule::new("broken").pattern("([unclosed").unwrap_err();
    match err {
        ConfigError::InvalidParamPattern { param, .. } => assert_eq!(param, "broken"),
        other => panic!("expected InvalidParamPattern, got {other:?}"),
    }
}
