use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_parts() {
    let diag = Diagnostic::error(DiagnosticKind::UnresolvedName)
        .with_message("cannot find value `x`")
        .with_label(Span::new(3, 4), "not found in this scope")
        .with_note("names bound in one case are not visible in another");

    assert_eq!(diag.code(), "E2001");
    assert!(diag.is_error());
    assert_eq!(diag.primary_span(), Some(Span::new(3, 4)));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn new_uses_default_severity() {
    let diag = Diagnostic::new(DiagnosticKind::UnreachableCase);
    assert_eq!(diag.severity, Severity::Warning);
    assert!(!diag.is_error());
}

#[test]
fn primary_span_skips_secondary_labels() {
    let diag = Diagnostic::error(DiagnosticKind::DuplicateBinding)
        .with_secondary_label(Span::new(0, 1), "first bound here")
        .with_label(Span::new(6, 7), "bound again");
    assert_eq!(diag.primary_span(), Some(Span::new(6, 7)));
}

#[test]
fn witness_renders_like_a_pattern() {
    let some = Witness::Constructor {
        name: "Some".into(),
        args: vec![Witness::Wildcard],
    };
    let none = Witness::Constructor {
        name: "None".into(),
        args: vec![],
    };
    let pair = Witness::Tuple(vec![Witness::Literal("false".into()), none.clone()]);

    assert_eq!(some.to_string(), "Some(_)");
    assert_eq!(none.to_string(), "None");
    assert_eq!(pair.to_string(), "(false, None)");
}

#[test]
fn display_includes_code_labels_and_witnesses() {
    let diag = Diagnostic::error(DiagnosticKind::NonExhaustiveMatch)
        .with_message("non-exhaustive match")
        .with_label(Span::new(0, 20), "patterns not covered")
        .with_witnesses(vec![Witness::Constructor {
            name: "None".into(),
            args: vec![],
        }]);

    let text = diag.to_string();
    assert!(text.starts_with("error [E4001]: non-exhaustive match"));
    assert!(text.contains("--> 0..20: patterns not covered"));
    assert!(text.contains("= missing: None"));
}
