use super::*;
use std::sync::Arc;

#[test]
fn intern_is_idempotent() {
    let interner = StringInterner::new();
    let some = interner.intern("Some");
    let none = interner.intern("None");

    assert_eq!(some, interner.intern("Some"));
    assert_ne!(some, none);
    assert_eq!(interner.lookup(some), "Some");
    assert_eq!(interner.lookup(none), "None");
}

#[test]
fn empty_string_is_reserved() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
    assert!(interner.is_empty());
}

#[test]
fn join_builds_dotted_paths() {
    let interner = StringInterner::new();
    let segments = [interner.intern("std"), interner.intern("option")];
    assert_eq!(interner.join(&segments), "std.option");
    assert_eq!(interner.join(&[]), "");
}

#[test]
fn concurrent_interning_agrees() {
    let interner = Arc::new(StringInterner::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let interner = Arc::clone(&interner);
            std::thread::spawn(move || {
                (0..200)
                    .map(|i| interner.intern(&format!("name{i}")))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<Name>> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or_default())
        .collect();
    for names in &results[1..] {
        assert_eq!(names, &results[0]);
    }
    assert_eq!(interner.lookup(results[0][17]), "name17");
}
