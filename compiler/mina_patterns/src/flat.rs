//! Flattening case patterns for the matrix.
//!
//! Bindings become wildcards, `as` patterns their inner pattern and
//! literals of finite types (`Bool`, `()`) ordinary constructors. Named
//! field patterns become positional, with wildcards for omitted fields.

use mina_ir::ast::{Literal, PatternKind};
use mina_ir::PatternId;
use mina_stack::ensure_sufficient_stack;
use mina_symbols::DeclId;
use mina_types::TypeFlags;

use crate::MatchContext;

/// Head constructor of a flattened pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Head {
    /// Data constructor, by declaration.
    Variant(DeclId),
    Bool(bool),
    /// The single constructor of an n-tuple; `()` is `Tuple(0)`.
    Tuple(usize),
    /// Int, Float, Char or String literal. These domains never complete.
    Literal(Literal),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FlatPattern {
    Wildcard,
    Ctor { head: Head, fields: Vec<FlatPattern> },
}

impl FlatPattern {
    pub(crate) fn head(&self) -> Option<&Head> {
        match self {
            FlatPattern::Wildcard => None,
            FlatPattern::Ctor { head, .. } => Some(head),
        }
    }
}

/// Flatten `id`, or `None` if it is erroneous: unresolved or mis-applied
/// constructor, unknown or repeated field, or a type that failed to check.
pub(crate) fn flatten(cx: &MatchContext<'_>, id: PatternId) -> Option<FlatPattern> {
    ensure_sufficient_stack(|| flatten_inner(cx, id))
}

fn flatten_inner(cx: &MatchContext<'_>, id: PatternId) -> Option<FlatPattern> {
    let ty = cx.type_table.pattern_type(id);
    if cx.types.flags(ty).contains(TypeFlags::HAS_ERROR) {
        return None;
    }
    let arena = &cx.unit.arena;
    let flat = match &arena.pattern(id).kind {
        PatternKind::Wildcard | PatternKind::Binding(_) => FlatPattern::Wildcard,
        PatternKind::As { pattern, .. } => flatten(cx, *pattern)?,
        PatternKind::Literal(lit) => {
            let head = match *lit {
                Literal::Bool(value) => Head::Bool(value),
                Literal::Unit => Head::Tuple(0),
                other => Head::Literal(other),
            };
            FlatPattern::Ctor {
                head,
                fields: Vec::new(),
            }
        }
        PatternKind::Tuple(elems) => {
            let elems = arena.pattern_list(*elems);
            FlatPattern::Ctor {
                head: Head::Tuple(elems.len()),
                fields: flatten_all(cx, elems)?,
            }
        }
        PatternKind::Constructor { ctor, args } => {
            let decl = cx.resolutions.global(*ctor)?;
            let info = cx.table.decl(decl).as_ctor()?;
            let args = arena.pattern_list(*args);
            if info.arity() != args.len() {
                return None;
            }
            FlatPattern::Ctor {
                head: Head::Variant(decl),
                fields: flatten_all(cx, args)?,
            }
        }
        PatternKind::Fields { ctor, fields } => {
            let decl = cx.resolutions.global(*ctor)?;
            let info = cx.table.decl(decl).as_ctor()?;
            let mut flat: Vec<Option<FlatPattern>> = vec![None; info.arity()];
            for field in arena.field_pattern_list(*fields) {
                let slot = flat.get_mut(info.field_index(field.field)?)?;
                if slot.is_some() {
                    return None;
                }
                *slot = Some(flatten(cx, field.pattern)?);
            }
            FlatPattern::Ctor {
                head: Head::Variant(decl),
                fields: flat
                    .into_iter()
                    .map(|field| field.unwrap_or(FlatPattern::Wildcard))
                    .collect(),
            }
        }
    };
    Some(flat)
}

fn flatten_all(cx: &MatchContext<'_>, ids: &[PatternId]) -> Option<Vec<FlatPattern>> {
    ids.iter().map(|&id| flatten(cx, id)).collect()
}
