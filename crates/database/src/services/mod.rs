pub mod access;
pub mod account;
pub mod attendance;
pub mod course;
pub mod enrollment;
pub mod grade;
pub mod lecturer;
pub mod material;
pub mod schedule;
pub mod student;

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, SimpleExpr};

/// `LOWER(column) LIKE '%needle%'`, portable across Postgres and SQLite
pub(crate) fn contains_ignore_case(column: impl IntoColumnRef, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{}%", needle.to_lowercase()))
}
