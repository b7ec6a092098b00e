//! Syntax tree node definitions.
//!
//! Every node family is a closed enum so that later passes can match on it
//! exhaustively. Children are referenced through arena ids.

use crate::{
    BinderId, BinderRange, CaseRange, ExprId, ExprRange, FieldPatternRange, IdentId, Name,
    PatternId, PatternRange, Span, TypeExprId, TypeExprRange,
};
use std::hash::{Hash, Hasher};

/// Dotted module path such as `std.option`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default, Ord, PartialOrd)]
pub struct ModulePath(pub Vec<Name>);

impl ModulePath {
    pub fn new(segments: Vec<Name>) -> Self {
        ModulePath(segments)
    }

    pub fn segments(&self) -> &[Name] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A possibly package-qualified name, e.g. `std.option.Some`.
///
/// Equality and hashing ignore the span.
#[derive(Clone, Debug)]
pub struct QualifiedIdent {
    /// Package/module segments, empty for a bare name.
    pub segments: Vec<Name>,
    pub name: Name,
    pub span: Span,
}

impl QualifiedIdent {
    pub fn is_qualified(&self) -> bool {
        !self.segments.is_empty()
    }
}

impl PartialEq for QualifiedIdent {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments && self.name == other.name
    }
}

impl Eq for QualifiedIdent {}

impl Hash for QualifiedIdent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
        self.name.hash(state);
    }
}

/// Literal values shared by expressions and patterns.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(i64),
    /// IEEE-754 bits so the literal stays `Eq + Hash`.
    Float(u64),
    Bool(bool),
    Char(char),
    String(Name),
    Unit,
}

impl Literal {
    pub fn float(value: f64) -> Self {
        Literal::Float(value.to_bits())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Literal(Literal),
    /// Reference to a value or constructor.
    Ident(IdentId),
    Apply {
        func: ExprId,
        args: ExprRange,
    },
    Lambda {
        params: BinderRange,
        body: ExprId,
    },
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    /// `let binder = value in body`, non-recursive.
    Let {
        binder: BinderId,
        value: ExprId,
        body: ExprId,
    },
    Tuple(ExprRange),
    Match {
        scrutinee: ExprId,
        cases: CaseRange,
    },
    /// Placeholder left by parser error recovery.
    Error,
}

/// A name introduced by a lambda parameter or a `let`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binder {
    pub name: Name,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternKind {
    Wildcard,
    /// Binds the matched value to a fresh local.
    Binding(Name),
    Literal(Literal),
    Constructor {
        ctor: IdentId,
        args: PatternRange,
    },
    /// `Ctor { field: pattern, .. }`; fields left out match anything.
    Fields {
        ctor: IdentId,
        fields: FieldPatternRange,
    },
    Tuple(PatternRange),
    /// `name @ pattern`
    As {
        name: Name,
        pattern: PatternId,
    },
}

/// `field: pattern` inside [`PatternKind::Fields`]. The shorthand `field`
/// is a binding pattern of the same name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPattern {
    pub field: Name,
    pub pattern: PatternId,
    pub span: Span,
}

/// One arm of a `match`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseClause {
    pub pattern: PatternId,
    pub guard: Option<ExprId>,
    pub body: ExprId,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExprKind {
    Named {
        ident: IdentId,
        args: TypeExprRange,
    },
    Var(Name),
    Function {
        params: TypeExprRange,
        ret: TypeExprId,
    },
    Tuple(TypeExprRange),
}

/// Top-level `let name: ty = value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueDef {
    pub name: Name,
    pub ty: Option<TypeExprId>,
    pub value: ExprId,
}

/// One constructor of a data declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantDef {
    pub name: Name,
    pub fields: Vec<TypeExprId>,
    /// One name per field for a constructor with named fields, empty for a
    /// positional one.
    pub labels: Vec<(Name, Span)>,
    pub span: Span,
}

/// `data Name params = Variant fields | ...`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDef {
    pub name: Name,
    pub params: Vec<Name>,
    pub variants: Vec<VariantDef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Value(ValueDef),
    Data(DataDef),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

impl Decl {
    pub fn name(&self) -> Name {
        match &self.kind {
            DeclKind::Value(def) => def.name,
            DeclKind::Data(def) => def.name,
        }
    }
}

/// Names brought into unqualified scope by an import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportItems {
    All,
    Only(Vec<(Name, Span)>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub module: ModulePath,
    pub items: ImportItems,
    pub span: Span,
}
