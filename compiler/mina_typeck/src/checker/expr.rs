use mina_diagnostic::{Diagnostic, DiagnosticKind};
use mina_ir::ast::{ExprKind, Literal};
use mina_ir::{CaseId, Cancelled, ExprId, IdentId, Span};
use mina_resolve::Resolution;
use mina_stack::ensure_sufficient_stack;
use mina_symbols::{DeclId, DeclKind};
use mina_types::{TypeId, TypeKind, TypeScheme};

use super::TypeChecker;

pub(super) fn literal_type(lit: Literal) -> TypeId {
    match lit {
        Literal::Int(_) => TypeId::INT,
        Literal::Float(_) => TypeId::FLOAT,
        Literal::Bool(_) => TypeId::BOOL,
        Literal::Char(_) => TypeId::CHAR,
        Literal::String(_) => TypeId::STRING,
        Literal::Unit => TypeId::UNIT,
    }
}

impl TypeChecker<'_, '_> {
    pub(super) fn infer_expr(&mut self, id: ExprId) -> Result<TypeId, Cancelled> {
        self.token.check()?;
        let ty = ensure_sufficient_stack(|| self.infer_expr_inner(id))?;
        if let Some(slot) = self.expr_types.get_mut(id.index()) {
            *slot = ty;
        }
        Ok(ty)
    }

    fn infer_expr_inner(&mut self, id: ExprId) -> Result<TypeId, Cancelled> {
        let arena = self.arena();
        let expr = arena.expr(id);
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_type(*lit)),
            ExprKind::Error => Ok(TypeId::ERROR),
            ExprKind::Ident(ident) => Ok(self.ident_type(*ident)),
            ExprKind::Apply { func, args } => {
                self.infer_apply(*func, arena.expr_list(*args), expr.span)
            }
            ExprKind::Lambda { params, body } => {
                let (params, body) = (arena.binder_list(*params), *body);
                self.with_locals(|this| -> Result<TypeId, Cancelled> {
                    let mut param_tys = Vec::with_capacity(params.len());
                    for &binder in params {
                        let ty = this.unifier.fresh_var();
                        if let Some(local) = this.cx.resolutions.binder_local(binder) {
                            this.bind_local(local, TypeScheme::mono(ty));
                        }
                        param_tys.push(ty);
                    }
                    let ret = this.infer_expr(body)?;
                    Ok(this.cx.types.function(param_tys, ret))
                })
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_ty = self.infer_expr(*cond)?;
                let _ = self.unify_or_report(
                    TypeId::BOOL,
                    cond_ty,
                    DiagnosticKind::TypeMismatch,
                    arena.expr(*cond).span,
                    "condition must be `Bool`",
                );
                let then_ty = self.infer_expr(*then_branch)?;
                let else_ty = self.infer_expr(*else_branch)?;
                let _ = self.unify_or_report(
                    then_ty,
                    else_ty,
                    DiagnosticKind::BranchTypeMismatch,
                    arena.expr(*else_branch).span,
                    "`if` and `else` have incompatible types",
                );
                Ok(then_ty)
            }
            ExprKind::Let {
                binder,
                value,
                body,
            } => {
                let value_ty = self.infer_expr(*value)?;
                let env = self.env_free_vars();
                let scheme = TypeScheme::generalize(&self.unifier, value_ty, &env);
                let (binder, body) = (*binder, *body);
                self.with_locals(|this| -> Result<TypeId, Cancelled> {
                    if let Some(local) = this.cx.resolutions.binder_local(binder) {
                        this.bind_local(local, scheme);
                    }
                    this.infer_expr(body)
                })
            }
            ExprKind::Tuple(elems) => {
                let mut tys = Vec::new();
                for &elem in arena.expr_list(*elems) {
                    tys.push(self.infer_expr(elem)?);
                }
                Ok(self.cx.types.tuple(tys))
            }
            ExprKind::Match { scrutinee, cases } => {
                self.infer_match(*scrutinee, arena.case_list(*cases))
            }
        }
    }

    fn ident_type(&mut self, id: IdentId) -> TypeId {
        match self.cx.resolutions.ident(id) {
            // Already reported by the resolver.
            None => TypeId::ERROR,
            Some(Resolution::Local(local)) => {
                let scheme = self
                    .locals
                    .get(local.index())
                    .copied()
                    .unwrap_or(TypeScheme::mono(TypeId::ERROR));
                scheme.instantiate(&mut self.unifier)
            }
            Some(Resolution::Global(decl)) => self.global_type(decl),
        }
    }

    fn global_type(&mut self, decl: DeclId) -> TypeId {
        let table = self.cx.table;
        match &table.decl(decl).kind {
            DeclKind::Value {
                scheme: Some(scheme),
            } => scheme.instantiate(&mut self.unifier),
            DeclKind::Value { scheme: None } => {
                if let Some(scheme) = self.inferred.get(&decl).copied() {
                    scheme.instantiate(&mut self.unifier)
                } else if let Some(&placeholder) = self.pending.get(&decl) {
                    placeholder
                } else {
                    tracing::debug!(?decl, "value of another module has no scheme yet");
                    TypeId::ERROR
                }
            }
            DeclKind::Constructor(info) => {
                info.scheme(self.cx.types).instantiate(&mut self.unifier)
            }
            DeclKind::Data(_) | DeclKind::Primitive(_) => TypeId::ERROR,
        }
    }

    fn infer_apply(
        &mut self,
        func: ExprId,
        args: &[ExprId],
        span: Span,
    ) -> Result<TypeId, Cancelled> {
        let func_ty = self.infer_expr(func)?;
        let mut arg_tys = Vec::with_capacity(args.len());
        for &arg in args {
            arg_tys.push(self.infer_expr(arg)?);
        }

        let callee = self.unifier.resolve(func_ty);
        match self.cx.types.kind(callee) {
            TypeKind::Function { params, ret } => {
                if params.len() != args.len() {
                    let _ = self.sink.error(
                        Diagnostic::error(DiagnosticKind::TypeMismatch)
                            .with_message(format!(
                                "this function takes {} argument{}, but {} were supplied",
                                params.len(),
                                if params.len() == 1 { "" } else { "s" },
                                args.len()
                            ))
                            .with_label(span, "wrong number of arguments"),
                    );
                }
                for ((&param, &arg_ty), &arg) in params.iter().zip(&arg_tys).zip(args) {
                    let arg_span = self.arena().expr(arg).span;
                    let _ = self.unify_or_report(
                        param,
                        arg_ty,
                        DiagnosticKind::TypeMismatch,
                        arg_span,
                        "argument has the wrong type",
                    );
                }
                Ok(ret)
            }
            TypeKind::Var(_) => {
                let ret = self.unifier.fresh_var();
                let expected = self.cx.types.function(arg_tys, ret);
                let _ = self.unify_or_report(
                    expected,
                    callee,
                    DiagnosticKind::TypeMismatch,
                    span,
                    "called value has the wrong type",
                );
                Ok(ret)
            }
            TypeKind::Error => Ok(TypeId::ERROR),
            _ => {
                let message = format!("expected a function, found `{}`", self.show(callee));
                let _ = self.sink.error(
                    Diagnostic::error(DiagnosticKind::TypeMismatch)
                        .with_message(message)
                        .with_label(self.arena().expr(func).span, "not a function"),
                );
                Ok(TypeId::ERROR)
            }
        }
    }

    fn infer_match(&mut self, scrutinee: ExprId, cases: &[CaseId]) -> Result<TypeId, Cancelled> {
        let scrutinee_ty = self.infer_expr(scrutinee)?;
        let result = self.unifier.fresh_var();
        for &case in cases {
            let clause = self.arena().case(case);
            self.with_locals(|this| -> Result<(), Cancelled> {
                this.check_pattern(clause.pattern, scrutinee_ty)?;
                if let Some(guard) = clause.guard {
                    let guard_ty = this.infer_expr(guard)?;
                    let _ = this.unify_or_report(
                        TypeId::BOOL,
                        guard_ty,
                        DiagnosticKind::TypeMismatch,
                        this.arena().expr(guard).span,
                        "guard must be `Bool`",
                    );
                }
                let body_ty = this.infer_expr(clause.body)?;
                let _ = this.unify_or_report(
                    result,
                    body_ty,
                    DiagnosticKind::BranchTypeMismatch,
                    this.arena().expr(clause.body).span,
                    "this case's result differs from the earlier cases",
                );
                Ok(())
            })?;
        }
        Ok(result)
    }
}
