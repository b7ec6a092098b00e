use super::*;
use mina_ir::{AstBuilder, ExprId};
use mina_types::TypeFlags;
use pretty_assertions::assert_eq;

/// `lib`: `id = \x -> x`, left unannotated.
fn lib_unit(session: &Session) -> CompilationUnit {
    let mut b = AstBuilder::new(session.interner(), "lib");
    let x = b.var("x");
    let id = b.lambda(&["x"], x);
    b.value("id", None, id);
    b.finish()
}

/// `app`: `pair = (id(1), id(true))` with `lib` imported. Returns the pair
/// expression too.
fn app_unit(session: &Session) -> (CompilationUnit, ExprId) {
    let mut b = AstBuilder::new(session.interner(), "app");
    b.import_all("lib");
    let id = b.var("id");
    let one = b.int(1);
    let first = b.apply(id, &[one]);
    let id = b.var("id");
    let yes = b.bool(true);
    let second = b.apply(id, &[yes]);
    let pair = b.tuple(&[first, second]);
    b.value("pair", None, pair);
    (b.finish(), pair)
}

fn show_scheme(session: &Session, module: &str, name: &str) -> String {
    let scheme = session.value_scheme(module, name).unwrap();
    session.display_type(scheme.ty)
}

#[test]
fn schemes_are_published_for_later_units() {
    let session = Session::default();
    let token = CancellationToken::new();

    let lib = session.analyze_unit(&lib_unit(&session), &token).unwrap();
    assert!(lib.diagnostics.is_empty());
    assert_eq!(show_scheme(&session, "lib", "id"), "(a) -> a");

    let (app, pair) = app_unit(&session);
    let app = session.analyze_unit(&app, &token).unwrap();
    assert!(app.diagnostics.is_empty(), "{:?}", app.diagnostics);
    assert_eq!(session.display_type(app.types.expr_type(pair)), "(Int, Bool)");
    assert_eq!(show_scheme(&session, "app", "pair"), "(Int, Bool)");
}

#[test]
fn batches_run_dependencies_first_and_keep_input_order() {
    let session = Session::new(AnalysisConfig::default().with_parallel(false));
    let (app, pair) = app_unit(&session);
    let units = [app, lib_unit(&session)];

    let results = session
        .analyze_units(&units, &CancellationToken::new())
        .unwrap();
    assert_eq!(results.len(), 2);

    let table = session.symbols();
    let module_name = |result: &AnalysisResult| {
        session
            .interner()
            .join(table.module(result.module).path.segments())
    };
    assert_eq!(module_name(&results[0]), "app");
    assert_eq!(module_name(&results[1]), "lib");
    assert!(results.iter().all(|r| r.diagnostics.is_empty()));
    assert_eq!(
        session.display_type(results[0].types.expr_type(pair)),
        "(Int, Bool)"
    );
}

#[test]
fn parallel_and_sequential_batches_agree() {
    fn batch(session: &Session) -> Vec<CompilationUnit> {
        (0..6)
            .map(|i| {
                let mut b = AstBuilder::new(session.interner(), &format!("unit{i}"));
                // Every other unit calls an integer.
                let callee = b.int(i);
                let body = if i % 2 == 0 {
                    let arg = b.int(0);
                    b.apply(callee, &[arg])
                } else {
                    callee
                };
                b.value("v", None, body);
                b.finish()
            })
            .collect()
    }

    let kinds = |parallel: bool| {
        let session = Session::new(AnalysisConfig::default().with_parallel(parallel));
        let units = batch(&session);
        session
            .analyze_units(&units, &CancellationToken::new())
            .unwrap()
            .iter()
            .map(|r| r.diagnostics.kinds())
            .collect::<Vec<_>>()
    };

    let parallel = kinds(true);
    assert_eq!(parallel, kinds(false));
    assert_eq!(parallel[0], vec![DiagnosticKind::TypeMismatch]);
    assert!(parallel[1].is_empty());
}

#[test]
fn import_cycles_are_reported_on_both_sides() {
    let session = Session::default();
    let unit = |module: &str, imports: &str| {
        let mut b = AstBuilder::new(session.interner(), module);
        b.import_all(imports);
        let body = b.unit();
        b.value("it", None, body);
        b.finish()
    };
    let units = [unit("a", "b"), unit("b", "a")];

    let results = session
        .analyze_units(&units, &CancellationToken::new())
        .unwrap();
    for result in &results {
        assert_eq!(result.diagnostics.kinds(), vec![DiagnosticKind::ImportCycle]);
    }
    let message = results[0].diagnostics.iter().next().unwrap().message.clone();
    assert_eq!(message, "module `a` depends on `b`, which depends back on `a`");
}

#[test]
fn reanalysis_replaces_declarations() {
    let session = Session::default();
    let token = CancellationToken::new();
    let version = |value: bool| {
        let mut b = AstBuilder::new(session.interner(), "lib");
        let body = if value { b.bool(true) } else { b.int(1) };
        b.value("x", None, body);
        b.finish()
    };

    session.analyze_unit(&version(false), &token).unwrap();
    assert_eq!(show_scheme(&session, "lib", "x"), "Int");
    session.analyze_unit(&version(true), &token).unwrap();
    assert_eq!(show_scheme(&session, "lib", "x"), "Bool");
}

#[test]
fn cancelled_runs_return_no_result() {
    let session = Session::default();
    let token = CancellationToken::new();
    token.cancel();

    assert_eq!(
        session.analyze_unit(&lib_unit(&session), &token).unwrap_err(),
        AnalysisError::Cancelled(Cancelled)
    );
    let units = [lib_unit(&session)];
    assert_eq!(
        session.analyze_units(&units, &token).unwrap_err(),
        AnalysisError::Cancelled(Cancelled)
    );
}

#[test]
fn document_versions_supersede_each_other() {
    let session = Session::default();
    let tracker = DocumentTracker::new();
    let doc = DocumentId::new(7);

    let in_flight = tracker.begin(doc, 1).unwrap();
    let result = session
        .analyze_document(&tracker, doc, 2, &lib_unit(&session))
        .unwrap();
    assert!(in_flight.is_cancelled());
    assert!(result.diagnostics.is_empty());

    assert_eq!(
        session
            .analyze_document(&tracker, doc, 1, &lib_unit(&session))
            .unwrap_err(),
        AnalysisError::StaleVersion {
            document: doc,
            version: 1,
            latest: 2,
        }
    );
}

#[test]
fn cancelled_reanalysis_keeps_the_previous_declarations() {
    let session = Session::default();
    session
        .analyze_unit(&lib_unit(&session), &CancellationToken::new())
        .unwrap();

    // A newer `lib` whose run never finishes.
    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let mut b = AstBuilder::new(session.interner(), "lib");
    let x = b.var("x");
    let id = b.lambda(&["x"], x);
    b.value("id", None, id);
    let one = b.int(1);
    b.value("extra", None, one);
    assert!(session.analyze_unit(&b.finish(), &cancelled).is_err());
    assert_eq!(show_scheme(&session, "lib", "id"), "(a) -> a");
    assert!(session.value_scheme("lib", "extra").is_none());

    // `oops = id(1)(2)` still has to be reported.
    let (app, pair) = app_unit(&session);
    let mut b = AstBuilder::new(session.interner(), "client");
    b.import_all("lib");
    let id = b.var("id");
    let one = b.int(1);
    let call = b.apply(id, &[one]);
    let two = b.int(2);
    let oops = b.apply(call, &[two]);
    b.value("oops", None, oops);
    let client = b.finish();

    let token = CancellationToken::new();
    let app = session.analyze_unit(&app, &token).unwrap();
    assert!(app.diagnostics.is_empty(), "{:?}", app.diagnostics);
    assert_eq!(session.display_type(app.types.expr_type(pair)), "(Int, Bool)");
    let client = session.analyze_unit(&client, &token).unwrap();
    assert_eq!(client.diagnostics.kinds(), vec![DiagnosticKind::TypeMismatch]);
}

#[test]
fn cancelled_first_analysis_leaves_no_module_behind() {
    let session = Session::default();
    let cancelled = CancellationToken::new();
    cancelled.cancel();
    assert!(session.analyze_unit(&lib_unit(&session), &cancelled).is_err());
    assert!(session
        .symbols()
        .module_id(&module_path(session.interner(), "lib"))
        .is_none());

    let (app, _) = app_unit(&session);
    let app = session.analyze_unit(&app, &CancellationToken::new()).unwrap();
    assert_eq!(
        app.diagnostics.kinds(),
        vec![
            DiagnosticKind::UnknownPackage,
            DiagnosticKind::UnresolvedName,
            DiagnosticKind::UnresolvedName,
        ]
    );
}

#[test]
fn cancelled_batch_restores_every_module() {
    let session = Session::default();
    let token = CancellationToken::new();
    session.analyze_unit(&lib_unit(&session), &token).unwrap();

    let mut b = AstBuilder::new(session.interner(), "lib");
    let one = b.int(1);
    b.value("id", None, one);
    let (app, _) = app_unit(&session);
    let units = [b.finish(), app];
    let cancelled = CancellationToken::new();
    cancelled.cancel();
    assert!(session.analyze_units(&units, &cancelled).is_err());

    assert_eq!(show_scheme(&session, "lib", "id"), "(a) -> a");
    assert!(session
        .symbols()
        .module_id(&module_path(session.interner(), "app"))
        .is_none());
}

#[test]
fn published_schemes_hold_no_unit_variables() {
    // lib: f = \x -> (x, g); g = \y -> y
    let session = Session::default();
    let mut b = AstBuilder::new(session.interner(), "lib");
    let x = b.var("x");
    let g = b.var("g");
    let pair = b.tuple(&[x, g]);
    let f = b.lambda(&["x"], pair);
    b.value("f", None, f);
    let y = b.var("y");
    let g = b.lambda(&["y"], y);
    b.value("g", None, g);
    let lib = b.finish();

    // app: each value applies the second half of `f(1)` at its own type.
    let mut b = AstBuilder::new(session.interner(), "app");
    b.import_all("lib");
    for (name, arg) in [("first", true), ("second", false)] {
        let f = b.var("f");
        let one = b.int(1);
        let call = b.apply(f, &[one]);
        let wild = b.p_wild();
        let h = b.p_bind("h");
        let pattern = b.p_tuple(&[wild, h]);
        let h = b.var("h");
        let arg = if arg { b.bool(true) } else { b.string("s") };
        let body = b.apply(h, &[arg]);
        let case = b.case(pattern, body);
        let m = b.match_expr(call, &[case]);
        b.value(name, None, m);
    }
    let app = b.finish();

    let token = CancellationToken::new();
    session.analyze_unit(&lib, &token).unwrap();
    let app = session.analyze_unit(&app, &token).unwrap();
    assert!(app.diagnostics.is_empty(), "{:?}", app.diagnostics);

    let table = session.symbols();
    for module in ["lib", "app"] {
        let module = table.module_id(&module_path(session.interner(), module)).unwrap();
        for name in ["f", "g", "first", "second"] {
            let name_id = session.interner().intern(name);
            let Some(decl) = table.module(module).get(Namespace::Value, name_id) else {
                continue;
            };
            let DeclKind::Value {
                scheme: Some(scheme),
            } = &table.decl(decl).kind
            else {
                panic!("`{name}` has no scheme");
            };
            assert!(!session.types().flags(scheme.ty).contains(TypeFlags::HAS_VAR));
        }
    }
    assert_eq!(show_scheme(&session, "lib", "f"), "(a) -> (a, (b) -> b)");
    assert_eq!(show_scheme(&session, "app", "first"), "Bool");
    assert_eq!(show_scheme(&session, "app", "second"), "String");
}
