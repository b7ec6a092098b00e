use super::*;
use mina_ir::{AstBuilder, StringInterner};
use pretty_assertions::assert_eq;

fn unit(interner: &StringInterner, module: &str, imports: &[&str]) -> CompilationUnit {
    let mut b = AstBuilder::new(interner, module);
    for import in imports {
        b.import_all(import);
    }
    let body = b.unit();
    b.value("it", None, body);
    b.finish()
}

#[test]
fn independent_units_share_a_level() {
    let interner = StringInterner::new();
    let units = [unit(&interner, "a", &[]), unit(&interner, "b", &[])];
    let levels = DependencyGraph::build(&units).levels();
    assert_eq!(
        levels,
        Levels {
            ordered: vec![vec![0, 1]],
            cyclic: vec![],
        }
    );
}

#[test]
fn imports_come_first() {
    let interner = StringInterner::new();
    let units = [
        unit(&interner, "app", &["lib.b", "lib.a"]),
        unit(&interner, "lib.b", &["lib.a"]),
        unit(&interner, "lib.a", &[]),
    ];
    let levels = DependencyGraph::build(&units).levels();
    assert_eq!(levels.ordered, vec![vec![2], vec![1], vec![0]]);
    assert!(levels.cyclic.is_empty());
}

#[test]
fn qualified_references_are_dependencies() {
    let interner = StringInterner::new();
    let lib = unit(&interner, "lib", &[]);
    let mut b = AstBuilder::new(&interner, "app");
    let it = b.var("lib.it");
    b.value("copy", None, it);
    let units = [b.finish(), lib];

    let graph = DependencyGraph::build(&units);
    assert_eq!(graph.dependencies(0).len(), 1);
    assert_eq!(graph.dependencies(0)[0].target, 1);
    assert_eq!(graph.levels().ordered, vec![vec![1], vec![0]]);
}

#[test]
fn modules_outside_the_batch_are_ignored() {
    let interner = StringInterner::new();
    let units = [unit(&interner, "app", &["std.option"])];
    let graph = DependencyGraph::build(&units);
    assert!(graph.dependencies(0).is_empty());
    assert_eq!(graph.levels().ordered, vec![vec![0]]);
}

#[test]
fn cycles_and_their_dependents_are_left_over() {
    let interner = StringInterner::new();
    let units = [
        unit(&interner, "a", &["b"]),
        unit(&interner, "b", &["a"]),
        unit(&interner, "c", &["a"]),
        unit(&interner, "d", &[]),
    ];
    let graph = DependencyGraph::build(&units);
    let levels = graph.levels();
    assert_eq!(levels.ordered, vec![vec![3]]);
    assert_eq!(levels.cyclic, vec![0, 1, 2]);

    // `c` only sits behind the cycle.
    let on_cycle: Vec<(usize, usize)> = graph
        .cycle_edges(&levels.cyclic)
        .into_iter()
        .map(|(from, dep)| (from, dep.target))
        .collect();
    assert_eq!(on_cycle, vec![(0, 1), (1, 0)]);
}

#[test]
fn self_references_are_not_cycles() {
    let interner = StringInterner::new();
    let mut b = AstBuilder::new(&interner, "app");
    let one = b.int(1);
    b.value("one", None, one);
    let again = b.var("app.one");
    b.value("again", None, again);
    let units = [b.finish()];

    let levels = DependencyGraph::build(&units).levels();
    assert_eq!(levels.ordered, vec![vec![0]]);
    assert!(levels.cyclic.is_empty());
}
