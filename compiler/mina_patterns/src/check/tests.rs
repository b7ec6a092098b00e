use super::*;
use mina_diagnostic::Diagnostics;
use mina_ir::{AstBuilder, CaseId};
use mina_resolve::{resolve_unit, ResolveContext};
use mina_symbols::declare_unit;
use mina_typeck::{check_unit, CheckContext};
use pretty_assertions::assert_eq;

/// Build `data Color = Red | Green | Blue` plus a value `pick` matching a
/// `Color` lambda parameter with the given cases, then run every pass.
fn analyze_color_match(
    config: &MatchConfig,
    cases: impl FnOnce(&mut AstBuilder<'_>) -> Vec<CaseId>,
) -> Diagnostics {
    analyze(config, |b| {
        b.data("Color", &[], &[("Red", &[]), ("Green", &[]), ("Blue", &[])]);
        let red = b.var("Red");
        let scrutinee = b.var("c");
        let cases = cases(b);
        let m = b.match_expr(scrutinee, &cases);
        let lambda = b.lambda(&["c"], m);
        let call = b.apply(lambda, &[red]);
        b.value("pick", None, call);
    })
}

fn analyze(config: &MatchConfig, build: impl FnOnce(&mut AstBuilder<'_>)) -> Diagnostics {
    let interner = StringInterner::new();
    let types = TypeInterner::new();
    let mut table = SymbolTable::new(&interner);
    let mut b = AstBuilder::new(&interner, "app");
    build(&mut b);
    let unit = b.finish();

    let token = CancellationToken::new();
    let mut sink = DiagnosticSink::new();
    let symbols = declare_unit(&mut table, &unit, &interner, &types, &mut sink);
    let mut run = || -> Result<(), Cancelled> {
        let resolutions = resolve_unit(
            &ResolveContext {
                table: &table,
                unit: &unit,
                symbols: &symbols,
                interner: &interner,
            },
            &mut sink,
            &token,
        )?;
        let typed = check_unit(
            &CheckContext {
                table: &table,
                unit: &unit,
                symbols: &symbols,
                resolutions: &resolutions,
                interner: &interner,
                types: &types,
            },
            &mut sink,
            &token,
        )?;
        check_matches(
            &MatchContext {
                table: &table,
                unit: &unit,
                resolutions: &resolutions,
                type_table: &typed.types,
                types: &types,
                interner: &interner,
            },
            config,
            &mut sink,
            &token,
        )
    };
    assert!(run().is_ok());
    sink.finish()
}

fn nullary(b: &mut AstBuilder<'_>, ctor: &str) -> CaseId {
    let pattern = b.p_ctor(ctor, &[]);
    let body = b.unit();
    b.case(pattern, body)
}

fn wildcard(b: &mut AstBuilder<'_>) -> CaseId {
    let pattern = b.p_wild();
    let body = b.unit();
    b.case(pattern, body)
}

#[test]
fn missing_constructor_is_reported_with_its_witness() {
    let diags = analyze_color_match(&MatchConfig::default(), |b| {
        vec![nullary(b, "Red"), nullary(b, "Green")]
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::NonExhaustiveMatch]);
    let diag = &diags.as_slice()[0];
    assert_eq!(
        diag.witnesses,
        vec![Witness::Constructor {
            name: "Blue".into(),
            args: vec![]
        }]
    );
    assert_eq!(diag.message, "non-exhaustive match: `Blue` not covered");
}

#[test]
fn trailing_wildcard_after_full_coverage_is_unreachable() {
    let diags = analyze_color_match(&MatchConfig::default(), |b| {
        vec![
            nullary(b, "Blue"),
            nullary(b, "Red"),
            nullary(b, "Green"),
            wildcard(b),
        ]
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::UnreachableCase]);
    assert!(!diags.has_errors());
}

#[test]
fn case_after_wildcard_is_unreachable() {
    let diags = analyze_color_match(&MatchConfig::default(), |b| {
        vec![wildcard(b), nullary(b, "Red")]
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::UnreachableCase]);
}

#[test]
fn redundancy_can_be_switched_off() {
    let config = MatchConfig {
        check_redundancy: false,
        ..MatchConfig::default()
    };
    let diags = analyze_color_match(&config, |b| vec![wildcard(b), nullary(b, "Red")]);

    assert!(diags.is_empty());
}

#[test]
fn witness_count_follows_config() {
    let config = MatchConfig {
        max_witnesses: 1,
        ..MatchConfig::default()
    };
    let diags = analyze_color_match(&config, |b| vec![nullary(b, "Red")]);

    assert_eq!(diags.as_slice()[0].witnesses.len(), 1);

    let diags = analyze_color_match(&MatchConfig::default(), |b| vec![nullary(b, "Red")]);
    assert_eq!(diags.as_slice()[0].witnesses.len(), 2);
}

#[test]
fn guarded_cases_do_not_cover() {
    let diags = analyze(&MatchConfig::default(), |b| {
        let scrutinee = b.int(7);
        let n = b.p_bind("n");
        let guard = b.bool(true);
        let body = b.unit();
        let case = b.guarded_case(n, guard, body);
        let m = b.match_expr(scrutinee, &[case]);
        b.value("f", None, m);
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::NonExhaustiveMatch]);
    let diag = &diags.as_slice()[0];
    assert_eq!(diag.witnesses, vec![Witness::Wildcard]);
    assert!(diag
        .notes
        .iter()
        .any(|note| note.contains("guarded cases")));
}

#[test]
fn guarded_case_is_still_checked_for_reachability() {
    let diags = analyze_color_match(&MatchConfig::default(), |b| {
        let wild = wildcard(b);
        let pattern = b.p_ctor("Red", &[]);
        let guard = b.bool(false);
        let body = b.unit();
        let guarded = b.guarded_case(pattern, guard, body);
        vec![wild, guarded]
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::UnreachableCase]);
}

#[test]
fn bool_needs_both_values() {
    let diags = analyze(&MatchConfig::default(), |b| {
        let scrutinee = b.bool(true);
        let p = b.p_bool(true);
        let body = b.unit();
        let case = b.case(p, body);
        let m = b.match_expr(scrutinee, &[case]);
        b.value("f", None, m);
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::NonExhaustiveMatch]);
    assert_eq!(
        diags.as_slice()[0].witnesses,
        vec![Witness::Literal("false".into())]
    );
}

#[test]
fn erroneous_patterns_skip_the_match() {
    let diags = analyze(&MatchConfig::default(), |b| {
        let int_a = b.t_named("Int", &[]);
        let int_b = b.t_named("Int", &[]);
        b.data("Pair", &[], &[("Pair", &[int_a, int_b])]);
        let scrutinee = b.var("p");
        let x = b.p_bind("x");
        let short = b.p_ctor("Pair", &[x]);
        let body = b.unit();
        let case = b.case(short, body);
        let m = b.match_expr(scrutinee, &[case]);
        let lambda = b.lambda(&["p"], m);
        b.value("f", None, lambda);
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::ConstructorArity]);
}

#[test]
fn ill_typed_scrutinee_skips_the_match() {
    let diags = analyze(&MatchConfig::default(), |b| {
        let scrutinee = b.var("nowhere");
        let p = b.p_int(1);
        let body = b.unit();
        let case = b.case(p, body);
        let m = b.match_expr(scrutinee, &[case]);
        b.value("f", None, m);
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::UnresolvedName]);
}

/// `data Shape = Circle { radius: Int } | Rect { w: Int, h: Int }` matched
/// on a lambda parameter.
fn analyze_shape_match(cases: impl FnOnce(&mut AstBuilder<'_>) -> Vec<CaseId>) -> Diagnostics {
    analyze(&MatchConfig::default(), |b| {
        let radius = b.t_named("Int", &[]);
        let w = b.t_named("Int", &[]);
        let h = b.t_named("Int", &[]);
        b.data_named(
            "Shape",
            &[],
            &[
                ("Circle", &[("radius", radius)]),
                ("Rect", &[("w", w), ("h", h)]),
            ],
        );
        let scrutinee = b.var("s");
        let cases = cases(b);
        let m = b.match_expr(scrutinee, &cases);
        let lambda = b.lambda(&["s"], m);
        b.value("area", None, lambda);
    })
}

#[test]
fn omitted_fields_match_anything() {
    let diags = analyze_shape_match(|b| {
        let circle = b.p_fields("Circle", &[]);
        let c0 = b.unit();
        let rect = b.p_fields("Rect", &[("h", None)]);
        let c1 = b.unit();
        vec![b.case(circle, c0), b.case(rect, c1), wildcard(b)]
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::UnreachableCase]);
}

#[test]
fn missing_field_constructor_is_witnessed_positionally() {
    let diags = analyze_shape_match(|b| {
        let zero = b.p_int(0);
        let circle = b.p_fields("Circle", &[("radius", Some(zero))]);
        let c0 = b.unit();
        let rect = b.p_fields("Rect", &[]);
        let c1 = b.unit();
        vec![b.case(circle, c0), b.case(rect, c1)]
    });

    assert_eq!(diags.kinds(), vec![DiagnosticKind::NonExhaustiveMatch]);
    assert_eq!(
        diags.as_slice()[0].witnesses,
        vec![Witness::Constructor {
            name: "Circle".into(),
            args: vec![Witness::Wildcard]
        }]
    );
}
