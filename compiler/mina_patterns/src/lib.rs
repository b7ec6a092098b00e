//! Match analysis: exhaustiveness and redundancy.
//!
//! Case patterns are flattened into a pattern matrix and checked with the
//! usefulness algorithm of Maranget, "Warnings for pattern matching" (2007):
//!
//! - a match is exhaustive iff the wildcard is not useful against all
//!   unguarded rows; otherwise witnesses of the missing values are reported
//! - case `i` is unreachable iff its pattern is not useful against the
//!   unguarded rows before it
//!
//! Guarded cases never count toward coverage, since the guard may fail.

mod check;
mod flat;
mod usefulness;

pub use check::{check_matches, MatchConfig, MatchContext};
