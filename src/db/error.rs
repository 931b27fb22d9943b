use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

use diesel::result::Error as QueryError;
use diesel::ConnectionError;
use diesel_migrations::RunMigrationsError;

#[derive(Debug)]
pub enum DbError {
    ConnectionError(ConnectionError),
    MigrationError(RunMigrationsError),
    QueryError(QueryError),
}

impl From<ConnectionError> for DbError {
    fn from(error: ConnectionError) -> Self {
        DbError::ConnectionError(error)
    }
}

impl From<RunMigrationsError> for DbError {
    fn from(error: RunMigrationsError) -> Self {
        DbError::MigrationError(error)
    }
}

impl From<QueryError> for DbError {
    fn from(error: QueryError) -> Self {
        DbError::QueryError(error)
    }
}

impl Error for DbError {}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DbError::ConnectionError(err) => err.fmt(f),
            DbError::MigrationError(err) => err.fmt(f),
            DbError::QueryError(err) => err.fmt(f),
        }
    }
}
