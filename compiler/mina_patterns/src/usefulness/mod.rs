//! The usefulness algorithm.
//!
//! A row vector `q` is useful against a matrix `P` when some value matches
//! `q` but no row of `P`. Both questions the analyzer asks reduce to it:
//! exhaustiveness is usefulness of an all-wildcard row, redundancy is
//! usefulness of a case against the cases above it.
//!
//! Columns are split on the head constructors that appear in them. When
//! those heads cover their type's whole signature, each constructor is
//! tried through specialization; otherwise only the default matrix (rows
//! with a wildcard head) can cover the values of the missing constructors.

use mina_diagnostic::Witness;
use mina_ir::ast::Literal;
use mina_ir::StringInterner;
use mina_stack::ensure_sufficient_stack;
use mina_symbols::SymbolTable;

use crate::flat::{FlatPattern, Head};

pub(crate) type Row = Vec<FlatPattern>;

/// How the heads of one column relate to their type's constructors.
enum Coverage {
    /// Every constructor appears; all of them, in declaration order.
    Complete(Vec<Head>),
    /// Enumerable constructors that do not appear, in declaration order.
    Missing(Vec<Head>),
    /// No head at all, or an infinite literal domain.
    Open,
}

/// Constructor signatures, read from the symbol table.
#[derive(Copy, Clone)]
pub(crate) struct Signatures<'a> {
    pub table: &'a SymbolTable,
    pub interner: &'a StringInterner,
}

impl Signatures<'_> {
    fn arity(&self, head: &Head) -> usize {
        match head {
            Head::Variant(ctor) => self.table.decl(*ctor).as_ctor().map_or(0, |info| info.arity()),
            Head::Tuple(n) => *n,
            Head::Bool(_) | Head::Literal(_) => 0,
        }
    }

    fn coverage(&self, present: &[Head]) -> Coverage {
        let Some(first) = present.first() else {
            return Coverage::Open;
        };
        let all = match first {
            Head::Variant(ctor) => {
                let Some(info) = self.table.decl(*ctor).as_ctor() else {
                    return Coverage::Open;
                };
                self.table
                    .constructors(info.data)
                    .iter()
                    .map(|&sibling| Head::Variant(sibling))
                    .collect()
            }
            Head::Bool(_) => vec![Head::Bool(true), Head::Bool(false)],
            Head::Tuple(n) => vec![Head::Tuple(*n)],
            Head::Literal(_) => return Coverage::Open,
        };
        let missing: Vec<Head> = all.iter().filter(|h| !present.contains(h)).cloned().collect();
        if missing.is_empty() {
            Coverage::Complete(all)
        } else {
            Coverage::Missing(missing)
        }
    }

    /// Whether some value matches `query` but no row of `matrix`.
    pub(crate) fn is_useful(&self, matrix: &[Row], query: &[FlatPattern]) -> bool {
        ensure_sufficient_stack(|| self.is_useful_inner(matrix, query))
    }

    fn is_useful_inner(&self, matrix: &[Row], query: &[FlatPattern]) -> bool {
        let Some((first, rest)) = query.split_first() else {
            return matrix.is_empty();
        };
        match first {
            FlatPattern::Ctor { head, fields } => {
                let specialized = specialize_matrix(matrix, head, fields.len());
                let query: Row = fields.iter().chain(rest).cloned().collect();
                self.is_useful(&specialized, &query)
            }
            FlatPattern::Wildcard => match self.coverage(&column_heads(matrix)) {
                Coverage::Complete(all) => all.iter().any(|head| {
                    let arity = self.arity(head);
                    let specialized = specialize_matrix(matrix, head, arity);
                    let mut query = vec![FlatPattern::Wildcard; arity];
                    query.extend(rest.iter().cloned());
                    self.is_useful(&specialized, &query)
                }),
                Coverage::Missing(_) | Coverage::Open => {
                    self.is_useful(&default_matrix(matrix), rest)
                }
            },
        }
    }

    /// Up to `limit` value vectors of length `width` matched by no row.
    pub(crate) fn missing(&self, matrix: &[Row], width: usize, limit: usize) -> Vec<Vec<Witness>> {
        ensure_sufficient_stack(|| self.missing_inner(matrix, width, limit))
    }

    fn missing_inner(&self, matrix: &[Row], width: usize, limit: usize) -> Vec<Vec<Witness>> {
        if limit == 0 {
            return Vec::new();
        }
        if width == 0 {
            return if matrix.is_empty() { vec![Vec::new()] } else { Vec::new() };
        }

        let present = column_heads(matrix);
        let (split_on, absent) = match self.coverage(&present) {
            Coverage::Complete(all) => (all, Vec::new()),
            Coverage::Missing(absent) => {
                let absent = absent
                    .iter()
                    .map(|head| {
                        let args = vec![Witness::Wildcard; self.arity(head)];
                        self.witness(head, args)
                    })
                    .collect();
                (present, absent)
            }
            Coverage::Open => (present, vec![Witness::Wildcard]),
        };

        let mut out = Vec::new();
        // Values whose head appears nowhere are covered by wildcard rows only.
        if !absent.is_empty() {
            let rest = self.missing(&default_matrix(matrix), width - 1, limit);
            'outer: for first in absent {
                for tail in &rest {
                    if out.len() >= limit {
                        break 'outer;
                    }
                    let mut row = Vec::with_capacity(width);
                    row.push(first.clone());
                    row.extend(tail.iter().cloned());
                    out.push(row);
                }
            }
        }

        for head in split_on {
            if out.len() >= limit {
                break;
            }
            let arity = self.arity(&head);
            let specialized = specialize_matrix(matrix, &head, arity);
            let budget = limit - out.len();
            for mut values in self.missing(&specialized, arity + width - 1, budget) {
                let rest = values.split_off(arity);
                let mut row = vec![self.witness(&head, values)];
                row.extend(rest);
                out.push(row);
            }
        }
        out
    }

    fn witness(&self, head: &Head, args: Vec<Witness>) -> Witness {
        match head {
            Head::Variant(ctor) => Witness::Constructor {
                name: self.interner.lookup(self.table.decl(*ctor).name).to_owned(),
                args,
            },
            Head::Tuple(_) => Witness::Tuple(args),
            Head::Bool(value) => Witness::Literal(value.to_string()),
            Head::Literal(lit) => Witness::Literal(self.render_literal(*lit)),
        }
    }

    fn render_literal(&self, lit: Literal) -> String {
        match lit {
            Literal::Int(value) => value.to_string(),
            Literal::Float(bits) => f64::from_bits(bits).to_string(),
            Literal::Bool(value) => value.to_string(),
            Literal::Char(c) => format!("{c:?}"),
            Literal::String(name) => format!("{:?}", self.interner.lookup(name)),
            Literal::Unit => "()".to_owned(),
        }
    }
}

/// Distinct heads of the first column, in order of appearance.
fn column_heads(matrix: &[Row]) -> Vec<Head> {
    let mut heads: Vec<Head> = Vec::new();
    for head in matrix.iter().filter_map(|row| row.first()?.head()) {
        if !heads.contains(head) {
            heads.push(head.clone());
        }
    }
    heads
}

fn specialize_matrix(matrix: &[Row], head: &Head, arity: usize) -> Vec<Row> {
    matrix
        .iter()
        .filter_map(|row| specialize_row(row, head, arity))
        .collect()
}

/// Row for the values built with `head`, or `None` if the row cannot
/// match them.
fn specialize_row(row: &[FlatPattern], head: &Head, arity: usize) -> Option<Row> {
    let (first, rest) = row.split_first()?;
    let mut out = Vec::with_capacity(arity + rest.len());
    match first {
        FlatPattern::Wildcard => out.resize(arity, FlatPattern::Wildcard),
        FlatPattern::Ctor { head: h, fields } if h == head => out.extend(fields.iter().cloned()),
        FlatPattern::Ctor { .. } => return None,
    }
    out.extend(rest.iter().cloned());
    Some(out)
}

/// Rows whose first column is a wildcard, without that column.
fn default_matrix(matrix: &[Row]) -> Vec<Row> {
    matrix
        .iter()
        .filter_map(|row| match row.split_first()? {
            (FlatPattern::Wildcard, rest) => Some(rest.to_vec()),
            (FlatPattern::Ctor { .. }, _) => None,
        })
        .collect()
}
