//! Rendering types for diagnostics.

use mina_ir::StringInterner;
use std::fmt;

use crate::{TypeId, TypeInterner, TypeKind};

/// `Display` adapter produced by [`TypeInterner::display`].
pub struct TypeDisplay<'a> {
    types: &'a TypeInterner,
    names: &'a StringInterner,
    ty: TypeId,
}

impl TypeInterner {
    /// Render `ty` the way it is written in source: `Option[Int]`,
    /// `(Int, Bool) -> String`, `(Int, String)`. Unsolved variables print as
    /// `?N`, quantified parameters as `a`, `b`, ...
    pub fn display<'a>(&'a self, ty: TypeId, names: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay {
            types: self,
            names,
            ty,
        }
    }
}

impl TypeDisplay<'_> {
    fn child(&self, ty: TypeId) -> Self {
        TypeDisplay {
            types: self.types,
            names: self.names,
            ty,
        }
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, items: &[TypeId]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.child(*item))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.types.kind(self.ty) {
            TypeKind::Int => f.write_str("Int"),
            TypeKind::Float => f.write_str("Float"),
            TypeKind::Bool => f.write_str("Bool"),
            TypeKind::Char => f.write_str("Char"),
            TypeKind::String => f.write_str("String"),
            TypeKind::Unit => f.write_str("()"),
            TypeKind::Error => f.write_str("<error>"),
            TypeKind::Var(var) => write!(f, "?{}", var.0),
            TypeKind::Param(i) => match u8::try_from(i) {
                Ok(i) if i < 26 => write!(f, "{}", char::from(b'a' + i)),
                _ => write!(f, "t{i}"),
            },
            TypeKind::Con { name, args, .. } => {
                f.write_str(self.names.lookup(name))?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    self.list(f, &args)?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeKind::Function { params, ret } => {
                f.write_str("(")?;
                self.list(f, &params)?;
                write!(f, ") -> {}", self.child(ret))
            }
            TypeKind::Tuple(elems) => {
                f.write_str("(")?;
                self.list(f, &elems)?;
                f.write_str(")")
            }
        }
    }
}
