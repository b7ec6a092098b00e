//! Programmatic construction of compilation units.
//!
//! The parser lives outside the analysis core; hosts and tests assemble trees
//! through [`AstBuilder`]. Leaves receive fresh, increasing spans and every
//! composite node spans its children, so source order follows build order.

use crate::ast::{
    Binder, CaseClause, DataDef, Decl, DeclKind, Expr, ExprKind, FieldPattern, Import,
    ImportItems, Literal, ModulePath, Pattern, PatternKind, QualifiedIdent, TypeExpr,
    TypeExprKind, ValueDef, VariantDef,
};
use crate::{
    AstArena, CaseId, CompilationUnit, ExprId, IdentId, Name, PatternId, Span, StringInterner,
    TypeExprId,
};

pub struct AstBuilder<'a> {
    interner: &'a StringInterner,
    arena: AstArena,
    module: ModulePath,
    imports: Vec<Import>,
    decls: Vec<Decl>,
    pos: u32,
}

impl<'a> AstBuilder<'a> {
    /// Start a unit for the dotted module path `module`.
    pub fn new(interner: &'a StringInterner, module: &str) -> Self {
        let module = module_path(interner, module);
        AstBuilder {
            interner,
            arena: AstArena::new(),
            module,
            imports: Vec::new(),
            decls: Vec::new(),
            pos: 0,
        }
    }

    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn arena(&self) -> &AstArena {
        &self.arena
    }

    fn fresh_span(&mut self, width: usize) -> Span {
        let width = u32::try_from(width.max(1)).unwrap_or(1);
        let span = Span::new(self.pos, self.pos + width);
        self.pos += width + 1;
        span
    }

    fn covering(&mut self, spans: impl IntoIterator<Item = Span>) -> Span {
        let mut spans = spans.into_iter();
        match spans.next() {
            Some(first) => spans.fold(first, Span::merge),
            None => self.fresh_span(2),
        }
    }

    fn expr_span(&self, id: ExprId) -> Span {
        self.arena.expr(id).span
    }

    fn pattern_span(&self, id: PatternId) -> Span {
        self.arena.pattern(id).span
    }

    fn type_span(&self, id: TypeExprId) -> Span {
        self.arena.type_expr(id).span
    }

    /// Allocate an identifier from dotted text; all but the last segment are
    /// package segments.
    pub fn ident(&mut self, path: &str) -> IdentId {
        let mut parts: Vec<Name> = path.split('.').map(|s| self.interner.intern(s)).collect();
        let name = parts.pop().unwrap_or(Name::EMPTY);
        let span = self.fresh_span(path.len());
        self.arena.alloc_ident(QualifiedIdent {
            segments: parts,
            name,
            span,
        })
    }

    fn expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr { kind, span })
    }

    pub fn lit(&mut self, lit: Literal) -> ExprId {
        let span = self.fresh_span(literal_width(self.interner, lit));
        self.expr(ExprKind::Literal(lit), span)
    }

    pub fn int(&mut self, value: i64) -> ExprId {
        self.lit(Literal::Int(value))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.lit(Literal::Bool(value))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        let name = self.interner.intern(value);
        self.lit(Literal::String(name))
    }

    pub fn unit(&mut self) -> ExprId {
        self.lit(Literal::Unit)
    }

    /// Reference to a (possibly qualified) value or constructor.
    pub fn var(&mut self, path: &str) -> ExprId {
        let ident = self.ident(path);
        let span = self.arena.ident(ident).span;
        self.expr(ExprKind::Ident(ident), span)
    }

    pub fn apply(&mut self, func: ExprId, args: &[ExprId]) -> ExprId {
        let span = self.covering(
            std::iter::once(func)
                .chain(args.iter().copied())
                .map(|e| self.expr_span(e))
                .collect::<Vec<_>>(),
        );
        let args = self.arena.alloc_expr_list(args.iter().copied());
        self.expr(ExprKind::Apply { func, args }, span)
    }

    pub fn lambda(&mut self, params: &[&str], body: ExprId) -> ExprId {
        let binders: Vec<_> = params.iter().map(|p| self.binder(p)).collect();
        let span = self.covering(
            binders
                .iter()
                .map(|b| self.arena.binder(*b).span)
                .chain(std::iter::once(self.expr_span(body)))
                .collect::<Vec<_>>(),
        );
        let params = self.arena.alloc_binder_list(binders);
        self.expr(ExprKind::Lambda { params, body }, span)
    }

    fn binder(&mut self, name: &str) -> crate::BinderId {
        let span = self.fresh_span(name.len());
        let name = self.interner.intern(name);
        self.arena.alloc_binder(Binder { name, span })
    }

    pub fn if_then_else(
        &mut self,
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    ) -> ExprId {
        let span = self.expr_span(cond).merge(self.expr_span(else_branch));
        self.expr(
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            },
            span,
        )
    }

    pub fn let_in(&mut self, name: &str, value: ExprId, body: ExprId) -> ExprId {
        let binder = self.binder(name);
        let span = self
            .arena
            .binder(binder)
            .span
            .merge(self.expr_span(value))
            .merge(self.expr_span(body));
        self.expr(ExprKind::Let { binder, value, body }, span)
    }

    pub fn tuple(&mut self, elems: &[ExprId]) -> ExprId {
        let span = self.covering(elems.iter().map(|e| self.expr_span(*e)).collect::<Vec<_>>());
        let elems = self.arena.alloc_expr_list(elems.iter().copied());
        self.expr(ExprKind::Tuple(elems), span)
    }

    pub fn match_expr(&mut self, scrutinee: ExprId, cases: &[CaseId]) -> ExprId {
        let span = cases
            .iter()
            .map(|c| self.arena.case(*c).span)
            .fold(self.expr_span(scrutinee), Span::merge);
        let cases = self.arena.alloc_case_list(cases.iter().copied());
        self.expr(ExprKind::Match { scrutinee, cases }, span)
    }

    pub fn error_expr(&mut self) -> ExprId {
        let span = self.fresh_span(1);
        self.expr(ExprKind::Error, span)
    }

    fn pattern(&mut self, kind: PatternKind, span: Span) -> PatternId {
        self.arena.alloc_pattern(Pattern { kind, span })
    }

    pub fn p_wild(&mut self) -> PatternId {
        let span = self.fresh_span(1);
        self.pattern(PatternKind::Wildcard, span)
    }

    pub fn p_bind(&mut self, name: &str) -> PatternId {
        let span = self.fresh_span(name.len());
        let name = self.interner.intern(name);
        self.pattern(PatternKind::Binding(name), span)
    }

    pub fn p_lit(&mut self, lit: Literal) -> PatternId {
        let span = self.fresh_span(literal_width(self.interner, lit));
        self.pattern(PatternKind::Literal(lit), span)
    }

    pub fn p_int(&mut self, value: i64) -> PatternId {
        self.p_lit(Literal::Int(value))
    }

    pub fn p_bool(&mut self, value: bool) -> PatternId {
        self.p_lit(Literal::Bool(value))
    }

    pub fn p_ctor(&mut self, path: &str, args: &[PatternId]) -> PatternId {
        let ctor = self.ident(path);
        let span = args
            .iter()
            .map(|p| self.pattern_span(*p))
            .fold(self.arena.ident(ctor).span, Span::merge);
        let args = self.arena.alloc_pattern_list(args.iter().copied());
        self.pattern(PatternKind::Constructor { ctor, args }, span)
    }

    /// `Ctor { field: pattern, .. }`. A field without a pattern binds a
    /// local named after the field.
    pub fn p_fields(&mut self, path: &str, fields: &[(&str, Option<PatternId>)]) -> PatternId {
        let ctor = self.ident(path);
        let mut span = self.arena.ident(ctor).span;
        let fields: Vec<FieldPattern> = fields
            .iter()
            .map(|&(field, pattern)| {
                let pattern = pattern.unwrap_or_else(|| self.p_bind(field));
                let field_span = self.pattern_span(pattern);
                span = span.merge(field_span);
                FieldPattern {
                    field: self.interner.intern(field),
                    pattern,
                    span: field_span,
                }
            })
            .collect();
        let fields = self.arena.alloc_field_patterns(fields);
        self.pattern(PatternKind::Fields { ctor, fields }, span)
    }

    pub fn p_tuple(&mut self, elems: &[PatternId]) -> PatternId {
        let span = self.covering(elems.iter().map(|p| self.pattern_span(*p)).collect::<Vec<_>>());
        let elems = self.arena.alloc_pattern_list(elems.iter().copied());
        self.pattern(PatternKind::Tuple(elems), span)
    }

    pub fn p_as(&mut self, name: &str, pattern: PatternId) -> PatternId {
        let span = self.pattern_span(pattern);
        let name = self.interner.intern(name);
        self.pattern(PatternKind::As { name, pattern }, span)
    }

    pub fn case(&mut self, pattern: PatternId, body: ExprId) -> CaseId {
        self.clause(pattern, None, body)
    }

    pub fn guarded_case(&mut self, pattern: PatternId, guard: ExprId, body: ExprId) -> CaseId {
        self.clause(pattern, Some(guard), body)
    }

    fn clause(&mut self, pattern: PatternId, guard: Option<ExprId>, body: ExprId) -> CaseId {
        let span = self.pattern_span(pattern).merge(self.expr_span(body));
        self.arena.alloc_case(CaseClause {
            pattern,
            guard,
            body,
            span,
        })
    }

    fn type_expr(&mut self, kind: TypeExprKind, span: Span) -> TypeExprId {
        self.arena.alloc_type_expr(TypeExpr { kind, span })
    }

    pub fn t_named(&mut self, path: &str, args: &[TypeExprId]) -> TypeExprId {
        let ident = self.ident(path);
        let span = args
            .iter()
            .map(|t| self.type_span(*t))
            .fold(self.arena.ident(ident).span, Span::merge);
        let args = self.arena.alloc_type_expr_list(args.iter().copied());
        self.type_expr(TypeExprKind::Named { ident, args }, span)
    }

    pub fn t_var(&mut self, name: &str) -> TypeExprId {
        let span = self.fresh_span(name.len());
        let name = self.interner.intern(name);
        self.type_expr(TypeExprKind::Var(name), span)
    }

    pub fn t_fn(&mut self, params: &[TypeExprId], ret: TypeExprId) -> TypeExprId {
        let span = params
            .iter()
            .map(|t| self.type_span(*t))
            .fold(self.type_span(ret), Span::merge);
        let params = self.arena.alloc_type_expr_list(params.iter().copied());
        self.type_expr(TypeExprKind::Function { params, ret }, span)
    }

    pub fn t_tuple(&mut self, elems: &[TypeExprId]) -> TypeExprId {
        let span = self.covering(elems.iter().map(|t| self.type_span(*t)).collect::<Vec<_>>());
        let elems = self.arena.alloc_type_expr_list(elems.iter().copied());
        self.type_expr(TypeExprKind::Tuple(elems), span)
    }

    /// Top-level value declaration.
    pub fn value(&mut self, name: &str, ty: Option<TypeExprId>, value: ExprId) {
        let mut span = self.expr_span(value);
        if let Some(ty) = ty {
            span = span.merge(self.type_span(ty));
        }
        let name = self.interner.intern(name);
        self.decls.push(Decl {
            kind: DeclKind::Value(ValueDef { name, ty, value }),
            span,
        });
    }

    /// Data declaration; each variant lists its already-built field types.
    pub fn data(&mut self, name: &str, params: &[&str], variants: &[(&str, &[TypeExprId])]) {
        let head = self.fresh_span(name.len());
        let variants: Vec<VariantDef> = variants
            .iter()
            .map(|(variant, fields)| {
                let name_span = self.fresh_span(variant.len());
                let span = fields
                    .iter()
                    .map(|t| self.type_span(*t))
                    .fold(name_span, Span::merge);
                VariantDef {
                    name: self.interner.intern(variant),
                    fields: fields.to_vec(),
                    labels: Vec::new(),
                    span,
                }
            })
            .collect();
        self.push_data(name, params, head, variants);
    }

    /// Data declaration whose constructors name their fields.
    pub fn data_named(
        &mut self,
        name: &str,
        params: &[&str],
        variants: &[(&str, &[(&str, TypeExprId)])],
    ) {
        let head = self.fresh_span(name.len());
        let variants: Vec<VariantDef> = variants
            .iter()
            .map(|(variant, fields)| {
                let mut span = self.fresh_span(variant.len());
                let mut labels = Vec::with_capacity(fields.len());
                for &(label, ty) in fields.iter() {
                    let label_span = self.fresh_span(label.len());
                    labels.push((self.interner.intern(label), label_span));
                    span = span.merge(label_span).merge(self.type_span(ty));
                }
                VariantDef {
                    name: self.interner.intern(variant),
                    fields: fields.iter().map(|&(_, ty)| ty).collect(),
                    labels,
                    span,
                }
            })
            .collect();
        self.push_data(name, params, head, variants);
    }

    fn push_data(&mut self, name: &str, params: &[&str], head: Span, variants: Vec<VariantDef>) {
        let span = variants.iter().map(|v| v.span).fold(head, Span::merge);
        self.decls.push(Decl {
            kind: DeclKind::Data(DataDef {
                name: self.interner.intern(name),
                params: params.iter().map(|p| self.interner.intern(p)).collect(),
                variants,
            }),
            span,
        });
    }

    pub fn import_all(&mut self, module: &str) {
        let span = self.fresh_span(module.len());
        self.imports.push(Import {
            module: module_path(self.interner, module),
            items: ImportItems::All,
            span,
        });
    }

    pub fn import_only(&mut self, module: &str, names: &[&str]) {
        let span = self.fresh_span(module.len());
        let items = names
            .iter()
            .map(|n| (self.interner.intern(n), self.fresh_span(n.len())))
            .collect();
        self.imports.push(Import {
            module: module_path(self.interner, module),
            items: ImportItems::Only(items),
            span,
        });
    }

    pub fn finish(self) -> CompilationUnit {
        CompilationUnit {
            module: self.module,
            imports: self.imports,
            decls: self.decls,
            arena: self.arena,
        }
    }
}

/// Parse a dotted path such as `std.option` into a [`ModulePath`].
pub fn module_path(interner: &StringInterner, dotted: &str) -> ModulePath {
    ModulePath::new(
        dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| interner.intern(s))
            .collect(),
    )
}

fn literal_width(interner: &StringInterner, lit: Literal) -> usize {
    match lit {
        Literal::Int(v) => v.to_string().len(),
        Literal::Float(_) => 3,
        Literal::Bool(true) => 4,
        Literal::Bool(false) => 5,
        Literal::Char(_) => 3,
        Literal::String(name) => interner.lookup(name).len() + 2,
        Literal::Unit => 2,
    }
}
