use super::*;
use std::collections::HashSet;

const ALL: [DiagnosticKind; 17] = [
    DiagnosticKind::UnresolvedName,
    DiagnosticKind::UnknownPackage,
    DiagnosticKind::UnknownMember,
    DiagnosticKind::NotAConstructor,
    DiagnosticKind::ConstructorArity,
    DiagnosticKind::UnknownField,
    DiagnosticKind::DuplicateBinding,
    DiagnosticKind::DuplicateDeclaration,
    DiagnosticKind::TypeArity,
    DiagnosticKind::ImportCycle,
    DiagnosticKind::TypeMismatch,
    DiagnosticKind::InfiniteType,
    DiagnosticKind::PatternTypeMismatch,
    DiagnosticKind::BranchTypeMismatch,
    DiagnosticKind::NonExhaustiveMatch,
    DiagnosticKind::UnreachableCase,
    DiagnosticKind::AnalysisCrash,
];

#[test]
fn codes_are_unique() {
    let mut seen = HashSet::new();
    assert!(ALL.iter().all(|k| seen.insert(k.code())));
}

#[test]
fn codes_follow_phase_prefixes() {
    assert!(DiagnosticKind::UnresolvedName.code().starts_with("E2"));
    assert!(DiagnosticKind::TypeMismatch.code().starts_with("E3"));
    assert!(DiagnosticKind::NonExhaustiveMatch.code().starts_with("E4"));
    assert!(DiagnosticKind::AnalysisCrash.code().starts_with("E9"));
}

#[test]
fn only_unreachable_case_is_a_warning() {
    for kind in ALL {
        let expected = if kind == DiagnosticKind::UnreachableCase {
            Severity::Warning
        } else {
            Severity::Error
        };
        assert_eq!(kind.default_severity(), expected, "{kind:?}");
    }
}

#[test]
fn only_crash_is_internal() {
    assert_eq!(ALL.iter().filter(|k| k.is_internal()).count(), 1);
}
