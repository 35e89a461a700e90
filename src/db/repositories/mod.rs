use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub mod account;
pub mod label;
pub mod recipe;
pub mod token;

/// An insert or update collided with a UNIQUE index.
///
/// Repositories return it inside `anyhow::Error`; check for it with
/// `err.is::<UniqueViolation>()`.
#[derive(Debug, Error)]
#[error("unique constraint violated")]
pub struct UniqueViolation;

pub(crate) fn unique_violation(err: DbErr, context: &'static str) -> anyhow::Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        anyhow::Error::new(UniqueViolation)
    } else {
        anyhow::Error::new(err).context(context)
    }
}
