use super::*;
use mina_ir::{module_path, AstBuilder, IdentId};
use mina_types::TypeInterner;
use pretty_assertions::assert_eq;

use crate::{declare_unit, UnitSymbols};
use mina_diagnostic::DiagnosticSink;

struct Fixture {
    interner: StringInterner,
    types: TypeInterner,
    table: SymbolTable,
}

impl Fixture {
    fn new() -> Self {
        let interner = StringInterner::new();
        let table = SymbolTable::new(&interner);
        Fixture {
            interner,
            types: TypeInterner::new(),
            table,
        }
    }

    /// Declares `std.option` with `data Option a = None | Some a` and a value
    /// `unwrap_or`.
    fn declare_option(&mut self) -> UnitSymbols {
        let mut b = AstBuilder::new(&self.interner, "std.option");
        let a = b.t_var("a");
        b.data("Option", &["a"], &[("None", &[]), ("Some", &[a])]);
        let body = b.int(0);
        b.value("unwrap_or", None, body);
        let unit = b.finish();
        let mut sink = DiagnosticSink::new();
        let symbols = declare_unit(&mut self.table, &unit, &self.interner, &self.types, &mut sink);
        assert!(sink.is_empty());
        symbols
    }

    fn ident(&self, path: &str) -> QualifiedIdent {
        let mut b = AstBuilder::new(&self.interner, "scratch");
        let id: IdentId = b.ident(path);
        b.arena().ident(id).clone()
    }

    fn scope(&mut self, module: &str, imports: Vec<ImportScope>) -> LookupScope {
        let module = self.table.begin_module(module_path(&self.interner, module), &self.interner);
        LookupScope { module, imports }
    }
}

#[test]
fn prelude_types_are_visible_everywhere() {
    let mut fx = Fixture::new();
    let scope = fx.scope("app", vec![]);
    let int = fx.ident("Int");

    let decl = fx.table.lookup(&scope, &int, Namespace::Type);
    let Ok(decl) = decl else {
        panic!("Int should resolve: {decl:?}");
    };
    assert_eq!(fx.table.decl(decl).kind, DeclKind::Primitive(TypeId::INT));
}

#[test]
fn qualified_lookup_reports_unknown_package_then_member() {
    let mut fx = Fixture::new();
    fx.declare_option();
    let scope = fx.scope("app", vec![]);

    let missing_pkg = fx.ident("std.result.Ok");
    let missing_member = fx.ident("std.option.Maybe");
    let found = fx.ident("std.option.Some");

    assert_eq!(
        fx.table.lookup(&scope, &missing_pkg, Namespace::Constructor),
        Err(LookupError::UnknownPackage)
    );
    assert!(matches!(
        fx.table.lookup(&scope, &missing_member, Namespace::Constructor),
        Err(LookupError::UnknownMember { .. })
    ));
    assert!(fx.table.lookup(&scope, &found, Namespace::Constructor).is_ok());
}

#[test]
fn unqualified_lookup_needs_an_import() {
    let mut fx = Fixture::new();
    let option = fx.declare_option();
    let some = fx.ident("Some");

    let bare = fx.scope("app", vec![]);
    assert_eq!(
        fx.table.lookup(&bare, &some, Namespace::Constructor),
        Err(LookupError::UnknownName)
    );

    let imported = fx.scope(
        "app",
        vec![ImportScope {
            module: option.module,
            only: None,
        }],
    );
    assert!(fx.table.lookup(&imported, &some, Namespace::Constructor).is_ok());
}

#[test]
fn selective_import_hides_other_names() {
    let mut fx = Fixture::new();
    let option = fx.declare_option();
    let scope = fx.scope(
        "app",
        vec![ImportScope {
            module: option.module,
            only: Some([fx.interner.intern("None")].into_iter().collect()),
        }],
    );

    assert!(fx.table.lookup(&scope, &fx.ident("None"), Namespace::Constructor).is_ok());
    assert_eq!(
        fx.table.lookup(&scope, &fx.ident("Some"), Namespace::Constructor),
        Err(LookupError::UnknownName)
    );
}

#[test]
fn values_are_not_constructors() {
    let mut fx = Fixture::new();
    fx.declare_option();
    let scope = fx.scope("app", vec![]);
    let value = fx.ident("std.option.unwrap_or");

    assert!(matches!(
        fx.table.lookup(&scope, &value, Namespace::Constructor),
        Err(LookupError::NotAConstructor(_))
    ));
    assert!(fx.table.lookup(&scope, &value, Namespace::Value).is_ok());
}

#[test]
fn constructors_are_visible_as_values() {
    let mut fx = Fixture::new();
    fx.declare_option();
    let scope = fx.scope("app", vec![]);
    let some = fx.ident("std.option.Some");

    let by_value = fx.table.lookup(&scope, &some, Namespace::Value);
    let by_ctor = fx.table.lookup(&scope, &some, Namespace::Constructor);
    assert_eq!(by_value, by_ctor);
}

#[test]
fn data_type_knows_its_siblings() {
    let mut fx = Fixture::new();
    let option = fx.declare_option();
    let data = option.decls[0];

    let ctors = fx.table.constructors(data);
    assert_eq!(ctors.len(), 2);
    let names: Vec<&str> = ctors
        .iter()
        .map(|c| fx.interner.lookup(fx.table.decl(*c).name))
        .collect();
    assert_eq!(names, vec!["None", "Some"]);

    let Some(some) = fx.table.decl(ctors[1]).as_ctor() else {
        panic!("Some should be a constructor");
    };
    assert_eq!(some.index, 1);
    assert_eq!(some.arity(), 1);
    assert_eq!(some.fields, vec![fx.types.param(0)]);
}

#[test]
fn set_value_scheme_patches_in_place() {
    let mut fx = Fixture::new();
    let option = fx.declare_option();
    let value = option.decls[1];

    fx.table.set_value_scheme(value, TypeScheme::mono(TypeId::INT));
    assert_eq!(
        fx.table.decl(value).kind,
        DeclKind::Value {
            scheme: Some(TypeScheme::mono(TypeId::INT))
        }
    );
}

#[test]
fn redeclaring_a_module_reuses_its_ids() {
    let mut fx = Fixture::new();
    let first = fx.declare_option();
    let count = fx.table.decl_count();

    for _ in 0..3 {
        let again = fx.declare_option();
        assert_eq!(again.module, first.module);
        assert_eq!(again.decls, first.decls);
    }
    assert_eq!(fx.table.decl_count(), count);
}

/// `std.option` with `count` integer values `v0`, `v1`, ...
fn values_unit(interner: &StringInterner, count: i64) -> mina_ir::CompilationUnit {
    let mut b = AstBuilder::new(interner, "std.option");
    for i in 0..count {
        let body = b.int(i);
        b.value(&format!("v{i}"), None, body);
    }
    b.finish()
}

#[test]
fn restore_undoes_an_unfinished_redeclaration() {
    let mut fx = Fixture::new();
    let option = fx.declare_option();
    let before = fx.table.decl_count();
    let saved = fx.table.save_module(&module_path(&fx.interner, "std.option"));

    // One declaration more than before, so one slot is new.
    let unit = values_unit(&fx.interner, 5);
    let mut sink = DiagnosticSink::new();
    declare_unit(&mut fx.table, &unit, &fx.interner, &fx.types, &mut sink);
    assert_eq!(fx.table.decl_count(), before + 1);

    fx.table.restore_module(saved);

    let scope = fx.scope("app", vec![]);
    assert!(fx
        .table
        .lookup(&scope, &fx.ident("std.option.Some"), Namespace::Constructor)
        .is_ok());
    assert!(matches!(
        fx.table.lookup(&scope, &fx.ident("std.option.v0"), Namespace::Value),
        Err(LookupError::UnknownMember { .. })
    ));
    assert_eq!(fx.table.constructors(option.decls[0]).len(), 2);

    // The new slot is handed out again rather than leaked.
    declare_unit(&mut fx.table, &unit, &fx.interner, &fx.types, &mut sink);
    assert_eq!(fx.table.decl_count(), before + 1);
}

#[test]
fn restoring_a_new_module_hides_it() {
    let mut fx = Fixture::new();
    let path = module_path(&fx.interner, "std.option");
    let saved = fx.table.save_module(&path);
    fx.declare_option();

    fx.table.restore_module(saved);

    assert!(fx.table.module_id(&path).is_none());
    let scope = fx.scope("app", vec![]);
    assert_eq!(
        fx.table.lookup(&scope, &fx.ident("std.option.Some"), Namespace::Constructor),
        Err(LookupError::UnknownPackage)
    );

    let again = fx.declare_option();
    assert_eq!(fx.table.module_id(&path), Some(again.module));
}
