//! Flat storage for one compilation unit's syntax tree.

use crate::ast::{Binder, CaseClause, Expr, FieldPattern, Pattern, QualifiedIdent, TypeExpr};
use crate::{
    BinderId, BinderRange, CaseId, CaseRange, ExprId, ExprRange, FieldPatternRange, IdentId,
    PatternId, PatternRange, TypeExprId, TypeExprRange,
};

fn next_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

macro_rules! arena_nodes {
    ($( $field:ident : $node:ty => $id:ident, $alloc:ident, $get:ident, $iter:ident; )*) => {
        $(
            #[doc = concat!("Allocate a node, returning its `", stringify!($id), "`.")]
            pub fn $alloc(&mut self, node: $node) -> $id {
                let id = $id::new(next_index(self.$field.len()));
                self.$field.push(node);
                id
            }

            #[inline]
            pub fn $get(&self, id: $id) -> &$node {
                &self.$field[id.index()]
            }

            pub fn $iter(&self) -> impl Iterator<Item = ($id, &$node)> + '_ {
                self.$field
                    .iter()
                    .enumerate()
                    .map(|(i, node)| ($id::new(next_index(i)), node))
            }
        )*
    };
}

macro_rules! arena_lists {
    ($( $field:ident : $id:ident => $range:ident, $alloc:ident, $get:ident; )*) => {
        $(
            pub fn $alloc(&mut self, ids: impl IntoIterator<Item = $id>) -> $range {
                let start = next_index(self.$field.len());
                self.$field.extend(ids);
                let len = next_index(self.$field.len()) - start;
                $range::new(start, len)
            }

            #[inline]
            pub fn $get(&self, range: $range) -> &[$id] {
                &self.$field[range.as_range()]
            }
        )*
    };
}

/// Owner of every node of a unit. Nodes are append-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AstArena {
    exprs: Vec<Expr>,
    patterns: Vec<Pattern>,
    cases: Vec<CaseClause>,
    type_exprs: Vec<TypeExpr>,
    idents: Vec<QualifiedIdent>,
    binders: Vec<Binder>,

    expr_lists: Vec<ExprId>,
    pattern_lists: Vec<PatternId>,
    case_lists: Vec<CaseId>,
    type_expr_lists: Vec<TypeExprId>,
    binder_lists: Vec<BinderId>,
    field_patterns: Vec<FieldPattern>,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    arena_nodes! {
        exprs: Expr => ExprId, alloc_expr, expr, exprs;
        patterns: Pattern => PatternId, alloc_pattern, pattern, patterns;
        cases: CaseClause => CaseId, alloc_case, case, cases;
        type_exprs: TypeExpr => TypeExprId, alloc_type_expr, type_expr, type_exprs;
        idents: QualifiedIdent => IdentId, alloc_ident, ident, idents;
        binders: Binder => BinderId, alloc_binder, binder, binders;
    }

    arena_lists! {
        expr_lists: ExprId => ExprRange, alloc_expr_list, expr_list;
        pattern_lists: PatternId => PatternRange, alloc_pattern_list, pattern_list;
        case_lists: CaseId => CaseRange, alloc_case_list, case_list;
        type_expr_lists: TypeExprId => TypeExprRange, alloc_type_expr_list, type_expr_list;
        binder_lists: BinderId => BinderRange, alloc_binder_list, binder_list;
        field_patterns: FieldPattern => FieldPatternRange, alloc_field_patterns, field_pattern_list;
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}
