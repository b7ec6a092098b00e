use super::*;

#[test]
fn fresh_token_passes() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
    assert_eq!(token.check(), Ok(()));
}

#[test]
fn clones_share_cancellation() {
    let token = CancellationToken::new();
    let observer = token.clone();
    token.cancel();
    assert!(observer.is_cancelled());
    assert_eq!(observer.check(), Err(Cancelled));
}

#[test]
fn cancellation_crosses_threads() {
    let token = CancellationToken::new();
    let remote = token.clone();
    std::thread::spawn(move || remote.cancel())
        .join()
        .unwrap_or_default();
    assert_eq!(token.check(), Err(Cancelled));
}
