use mina_diagnostic::DiagnosticKind;
use mina_ir::ast::{FieldPattern, PatternKind};
use mina_ir::{Cancelled, IdentId, PatternId, Span};
use mina_stack::ensure_sufficient_stack;
use mina_symbols::CtorInfo;
use mina_types::{TypeId, TypeScheme};

use super::expr::literal_type;
use super::TypeChecker;

/// A constructor pattern's head after instantiation.
struct CtorHead<'a> {
    info: &'a CtorInfo,
    /// Fresh variables for the owner's type parameters.
    args: Vec<TypeId>,
    /// The pattern's type, or the error type if it did not fit.
    ty: TypeId,
}

impl<'a> TypeChecker<'a, '_> {
    /// Check `id` against the type of the value it matches.
    ///
    /// A pattern that cannot have type `expected` is reported once and
    /// typed as [`TypeId::ERROR`]; its sub-patterns are checked against the
    /// error type so nothing below cascades.
    pub(super) fn check_pattern(
        &mut self,
        id: PatternId,
        expected: TypeId,
    ) -> Result<(), Cancelled> {
        self.token.check()?;
        let ty = ensure_sufficient_stack(|| self.check_pattern_inner(id, expected))?;
        if let Some(slot) = self.pattern_types.get_mut(id.index()) {
            *slot = ty;
        }
        Ok(())
    }

    fn check_pattern_inner(
        &mut self,
        id: PatternId,
        expected: TypeId,
    ) -> Result<TypeId, Cancelled> {
        let arena = self.arena();
        let pattern = arena.pattern(id);
        match &pattern.kind {
            PatternKind::Wildcard => Ok(expected),
            PatternKind::Binding(_) => {
                self.bind_pattern_local(id, expected);
                Ok(expected)
            }
            PatternKind::Literal(lit) => {
                Ok(self.expect_pattern_type(expected, literal_type(*lit), pattern.span))
            }
            PatternKind::Tuple(elems) => {
                let elems = arena.pattern_list(*elems);
                let vars = self.unifier.fresh_vars(elems.len());
                let tuple = self.cx.types.tuple(vars.iter().copied());
                let ty = self.expect_pattern_type(expected, tuple, pattern.span);
                for (&elem, &var) in elems.iter().zip(&vars) {
                    let elem_ty = if ty.is_error() { TypeId::ERROR } else { var };
                    self.check_pattern(elem, elem_ty)?;
                }
                Ok(ty)
            }
            PatternKind::Constructor { ctor, args } => {
                self.check_ctor_pattern(*ctor, arena.pattern_list(*args), expected, pattern.span)
            }
            PatternKind::Fields { ctor, fields } => self.check_field_patterns(
                *ctor,
                arena.field_pattern_list(*fields),
                expected,
                pattern.span,
            ),
            PatternKind::As { pattern: inner, .. } => {
                self.bind_pattern_local(id, expected);
                self.check_pattern(*inner, expected)?;
                Ok(expected)
            }
        }
    }

    fn check_ctor_pattern(
        &mut self,
        ctor: IdentId,
        subs: &[PatternId],
        expected: TypeId,
        span: Span,
    ) -> Result<TypeId, Cancelled> {
        let Some(head) = self.instantiate_ctor(ctor, expected, span) else {
            // Unresolved constructor, already reported.
            for &sub in subs {
                self.check_pattern(sub, TypeId::ERROR)?;
            }
            return Ok(TypeId::ERROR);
        };
        for (i, &sub) in subs.iter().enumerate() {
            // Surplus sub-patterns get the error type; the arity error is
            // already reported.
            let field = self.field_type(&head, i);
            self.check_pattern(sub, field)?;
        }
        Ok(head.ty)
    }

    fn check_field_patterns(
        &mut self,
        ctor: IdentId,
        fields: &[FieldPattern],
        expected: TypeId,
        span: Span,
    ) -> Result<TypeId, Cancelled> {
        let head = self.instantiate_ctor(ctor, expected, span);
        for field in fields {
            let ty = head.as_ref().map_or(TypeId::ERROR, |head| {
                match head.info.field_index(field.field) {
                    Some(index) => self.field_type(head, index),
                    None => TypeId::ERROR,
                }
            });
            self.check_pattern(field.pattern, ty)?;
        }
        Ok(head.map_or(TypeId::ERROR, |head| head.ty))
    }

    /// Instantiate the constructor `ctor` resolved to and check its result
    /// against `expected`. `None` if `ctor` did not resolve to a
    /// constructor.
    fn instantiate_ctor(
        &mut self,
        ctor: IdentId,
        expected: TypeId,
        span: Span,
    ) -> Option<CtorHead<'a>> {
        let table = self.cx.table;
        let info = self
            .cx
            .resolutions
            .global(ctor)
            .and_then(|decl| table.decl(decl).as_ctor())?;
        let args = self.unifier.fresh_vars(info.params as usize);
        let result = self.cx.types.substitute_params(info.result, &args);
        let ty = self.expect_pattern_type(expected, result, span);
        Some(CtorHead { info, args, ty })
    }

    /// Type of field `index` of an instantiated constructor.
    fn field_type(&self, head: &CtorHead<'_>, index: usize) -> TypeId {
        match head.info.fields.get(index) {
            Some(&field) if !head.ty.is_error() => {
                self.cx.types.substitute_params(field, &head.args)
            }
            _ => TypeId::ERROR,
        }
    }

    fn expect_pattern_type(&mut self, expected: TypeId, found: TypeId, span: Span) -> TypeId {
        match self.unify_or_report(
            expected,
            found,
            DiagnosticKind::PatternTypeMismatch,
            span,
            "pattern does not match the scrutinee type",
        ) {
            Ok(()) => found,
            Err(_) => TypeId::ERROR,
        }
    }

    fn bind_pattern_local(&mut self, id: PatternId, ty: TypeId) {
        if let Some(local) = self.cx.resolutions.pattern_local(id) {
            self.bind_local(local, TypeScheme::mono(ty));
        }
    }
}
