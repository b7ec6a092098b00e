use super::*;
use mina_ir::Span;
use pretty_assertions::assert_eq;

fn at(kind: DiagnosticKind, start: u32) -> Diagnostic {
    Diagnostic::new(kind).with_label(Span::new(start, start + 1), "here")
}

#[test]
fn finish_orders_by_position() {
    let mut sink = DiagnosticSink::new();
    sink.push(at(DiagnosticKind::TypeMismatch, 40));
    sink.push(at(DiagnosticKind::UnresolvedName, 10));
    sink.push(at(DiagnosticKind::UnreachableCase, 25));

    let diags = sink.finish();
    assert_eq!(
        diags.kinds(),
        vec![
            DiagnosticKind::UnresolvedName,
            DiagnosticKind::UnreachableCase,
            DiagnosticKind::TypeMismatch,
        ]
    );
}

#[test]
fn ties_keep_emission_order() {
    let mut sink = DiagnosticSink::new();
    sink.push(at(DiagnosticKind::NonExhaustiveMatch, 5));
    sink.push(at(DiagnosticKind::PatternTypeMismatch, 5));

    let diags = sink.finish();
    assert_eq!(
        diags.kinds(),
        vec![
            DiagnosticKind::NonExhaustiveMatch,
            DiagnosticKind::PatternTypeMismatch,
        ]
    );
}

#[test]
fn internal_failures_are_kept_apart() {
    let mut sink = DiagnosticSink::new();
    sink.internal("match without cases", Span::new(0, 5));
    sink.push(at(DiagnosticKind::UnresolvedName, 1));

    let diags = sink.finish();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.internal().len(), 1);
    assert_eq!(diags.internal()[0].kind, DiagnosticKind::AnalysisCrash);
}

#[test]
fn warnings_do_not_count_as_errors() {
    let mut sink = DiagnosticSink::new();
    sink.push(at(DiagnosticKind::UnreachableCase, 0));
    assert!(!sink.has_errors());

    let _proof = sink.error(at(DiagnosticKind::TypeMismatch, 3));
    assert_eq!(sink.error_count(), 1);

    let diags = sink.finish();
    assert!(diags.has_errors());
    assert_eq!(diags.count(DiagnosticKind::UnreachableCase), 1);
}
