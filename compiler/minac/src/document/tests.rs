use super::*;
use pretty_assertions::assert_eq;

const DOC: DocumentId = DocumentId::new(1);

#[test]
fn newer_version_cancels_the_running_one() {
    let tracker = DocumentTracker::new();
    let first = tracker.begin(DOC, 1).unwrap();
    let second = tracker.begin(DOC, 2).unwrap();

    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(tracker.latest(DOC), Some(2));
    assert_eq!(
        tracker.ensure_current(DOC, 1),
        Err(AnalysisError::StaleVersion {
            document: DOC,
            version: 1,
            latest: 2,
        })
    );
    assert_eq!(tracker.ensure_current(DOC, 2), Ok(()));
}

#[test]
fn older_version_is_rejected() {
    let tracker = DocumentTracker::new();
    let current = tracker.begin(DOC, 5).unwrap();
    assert_eq!(
        tracker.begin(DOC, 4).unwrap_err(),
        AnalysisError::StaleVersion {
            document: DOC,
            version: 4,
            latest: 5,
        }
    );
    assert!(!current.is_cancelled());
}

#[test]
fn rerunning_a_version_cancels_the_previous_run() {
    let tracker = DocumentTracker::new();
    let first = tracker.begin(DOC, 3).unwrap();
    let again = tracker.begin(DOC, 3).unwrap();
    assert!(first.is_cancelled());
    assert!(!again.is_cancelled());
}

#[test]
fn documents_are_independent() {
    let tracker = DocumentTracker::new();
    let other = DocumentId::new(2);
    let a = tracker.begin(DOC, 1).unwrap();
    let _b = tracker.begin(other, 1).unwrap();
    let _b2 = tracker.begin(other, 2).unwrap();
    assert!(!a.is_cancelled());
    assert_eq!(tracker.len(), 2);
}

#[test]
fn closing_cancels_and_forgets() {
    let tracker = DocumentTracker::new();
    let token = tracker.begin(DOC, 1).unwrap();
    tracker.close(DOC);

    assert!(token.is_cancelled());
    assert!(tracker.is_empty());
    assert_eq!(
        tracker.ensure_current(DOC, 1),
        Err(AnalysisError::UnknownUnit(DOC))
    );
}

#[test]
fn error_messages() {
    let stale = AnalysisError::StaleVersion {
        document: DOC,
        version: 1,
        latest: 2,
    };
    assert_eq!(
        stale.to_string(),
        "version 1 of document #1 is stale (latest is 2)"
    );
    assert_eq!(
        AnalysisError::from(mina_ir::Cancelled).to_string(),
        "analysis was cancelled"
    );
}
