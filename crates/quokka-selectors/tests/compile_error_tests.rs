//! Tests for semantic (compile-stage) errors: positions, messages, and the
//! bounded accumulation policy.

use quokka_selectors::{Compiler, Error, compile};

fn compile_err(selector: &str) -> Error {
    match compile(selector) {
        Ok(_) => panic!("expected compile({selector:?}) to fail"),
        Err(err) => err,
    }
}

/// The accumulated compile errors, panicking on any other outcome.
fn compile_errors(compiler: &Compiler, selector: &str) -> Vec<(String, usize)> {
    match compiler.compile(selector) {
        Ok(_) => panic!("expected compile({selector:?}) to fail"),
        Err(Error::Compile(list)) => list
            .errors
            .into_iter()
            .map(|e| (e.message, e.pos))
            .collect(),
        Err(other) => panic!("expected compile errors for {selector:?}, got {other}"),
    }
}

#[test]
fn test_bad_nth_argument_position_is_deterministic() {
    // The sign must precede the full term; "3+4n" is not a valid An+B
    // form. The error is reported at the pseudo-class, byte 0.
    let err = compile_err(":nth-child(3+4n)");
    assert!(matches!(err, Error::Compile(_)));
    assert_eq!(err.pos(), 0);
    assert!(err.to_string().contains("An+B"), "got: {err}");

    let err = compile_err("li:nth-child(3+4n)");
    assert_eq!(err.pos(), 2);
}

#[test]
fn test_unknown_tag_name_is_an_error() {
    // Unknown tags fail compilation rather than silently matching nothing.
    let err = compile_err("foo");
    assert!(matches!(err, Error::Compile(_)));
    assert_eq!(err.pos(), 0);
    assert!(err.to_string().contains("unknown tag name"), "got: {err}");

    let err = compile_err("div > il");
    assert_eq!(err.pos(), 6);
}

#[test]
fn test_known_tags_are_case_insensitive() {
    assert!(compile("DIV").is_ok());
    assert!(compile("foreignObject").is_ok());
}

#[test]
fn test_unknown_pseudo_class_is_an_error() {
    let err = compile_err(":hover");
    assert!(err.to_string().contains("unknown pseudo-class"), "got: {err}");

    let err = compile_err("div:visited");
    assert_eq!(err.pos(), 3);
}

#[test]
fn test_unknown_pseudo_class_function_is_an_error() {
    let err = compile_err(":not(p)");
    assert!(
        err.to_string().contains("unknown pseudo-class function"),
        "got: {err}"
    );
}

#[test]
fn test_pseudo_elements_are_rejected() {
    let err = compile_err("p::before");
    assert!(
        err.to_string().contains("unsupported pseudo-element"),
        "got: {err}"
    );

    assert!(compile("::first-line").is_err());
    assert!(compile("p::before:hover").is_err());
}

#[test]
fn test_column_combinator_is_rejected() {
    let err = compile_err("col || td");
    assert!(
        err.to_string().contains("unsupported combinator"),
        "got: {err}"
    );
}

#[test]
fn test_unrestricted_hash_id_is_rejected() {
    let err = compile_err("#123");
    assert!(
        err.to_string().contains("not a valid identifier"),
        "got: {err}"
    );
    // A hash that is a valid identifier compiles fine.
    assert!(compile("#a123").is_ok());
}

#[test]
fn test_default_policy_stops_at_first_error() {
    let errors = compile_errors(&Compiler::new(), "foo, ::before, :hover");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].1, 0);
}

#[test]
fn test_error_accumulation_collects_up_to_the_limit() {
    let compiler = Compiler::new().max_errors(10);
    let errors = compile_errors(&compiler, "foo, ::before, :hover");
    assert_eq!(errors.len(), 3);
    // Positions are reported in source order.
    assert!(errors.windows(2).all(|w| w[0].1 < w[1].1));
    assert!(errors[0].0.contains("unknown tag name"));
    assert!(errors[1].0.contains("unsupported pseudo-element"));
    assert!(errors[2].0.contains("unknown pseudo-class"));
}

#[test]
fn test_error_accumulation_aborts_at_the_limit() {
    let compiler = Compiler::new().max_errors(2);
    let errors = compile_errors(&compiler, "foo, ::before, :hover");
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_valid_selectors_are_unaffected_by_the_limit() {
    let compiler = Compiler::new().max_errors(10);
    assert!(compiler.compile("div > p:first-child, ul li").is_ok());
}

#[test]
fn test_parse_errors_surface_through_compile() {
    let err = compile_err("div >");
    assert!(matches!(err, Error::Parse { .. }));

    let err = compile_err("");
    assert!(matches!(err, Error::Parse { .. }));
    assert_eq!(err.pos(), 0);
}

#[test]
fn test_tokenize_errors_surface_through_compile() {
    let err = compile_err("[a='unterminated");
    assert!(matches!(err, Error::Tokenize { .. }));
    assert_eq!(err.pos(), 3);
    assert!(err.to_string().contains("tokenizing selector"));
}

#[test]
fn test_error_display_includes_the_stage() {
    assert!(
        compile_err("foo")
            .to_string()
            .starts_with("compiling selector:")
    );
    assert!(
        compile_err("div >")
            .to_string()
            .starts_with("parsing selector:")
    );
}
