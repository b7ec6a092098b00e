use super::*;
use mina_ir::{module_path, StringInterner};
use std::sync::Arc;

#[test]
fn snapshots_are_isolated_from_later_writes() {
    let interner = StringInterner::new();
    let handle = SymbolTableHandle::new(SymbolTable::new(&interner));
    let before = handle.snapshot();

    handle.update(|table| table.begin_module(module_path(&interner, "app.main"), &interner));

    let after = handle.snapshot();
    assert_eq!(before.module_count() + 1, after.module_count());
    assert!(before.module_id(&module_path(&interner, "app.main")).is_none());
    assert!(after.module_id(&module_path(&interner, "app.main")).is_some());
}

#[test]
fn concurrent_writers_are_serialized() {
    let interner = Arc::new(StringInterner::new());
    let handle = Arc::new(SymbolTableHandle::new(SymbolTable::new(&interner)));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let handle = Arc::clone(&handle);
            let interner = Arc::clone(&interner);
            std::thread::spawn(move || {
                let _snapshot = handle.snapshot();
                handle.update(|table| {
                    table.begin_module(module_path(&interner, &format!("m{i}")), &interner)
                });
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap_or_default();
    }

    // Prelude plus one module per writer.
    assert_eq!(handle.snapshot().module_count(), 9);
}
