use mina_ir::{ExprId, PatternId};
use mina_types::TypeId;

/// Fully applied types of every expression and pattern of one unit.
///
/// Nodes that could not be typed hold [`TypeId::ERROR`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeTable {
    exprs: Vec<TypeId>,
    patterns: Vec<TypeId>,
}

impl TypeTable {
    pub(crate) fn new(exprs: Vec<TypeId>, patterns: Vec<TypeId>) -> Self {
        TypeTable { exprs, patterns }
    }

    pub fn expr_type(&self, id: ExprId) -> TypeId {
        self.exprs.get(id.index()).copied().unwrap_or(TypeId::ERROR)
    }

    pub fn pattern_type(&self, id: PatternId) -> TypeId {
        self.patterns
            .get(id.index())
            .copied()
            .unwrap_or(TypeId::ERROR)
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }
}
