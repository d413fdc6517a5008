//! DB-manager error type (SPEC_FULL.md §7).

use thiserror::Error;

use ledgerkv_storage::StorageError;

/// Failures surfaced by [`crate::DbManager`].
#[derive(Debug, Error)]
pub enum DbError {
    /// A strategy or engine call failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// `--strategy` (or config file `strategy`) named something other than
    /// `direct-version` or `dual-range-partitioned`.
    #[error("unknown storage strategy: {0:?}")]
    StrategyUnknown(String),

    /// A config value failed eager validation at startup.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any operation attempted before [`crate::DbManager::open`].
    #[error("database is not open")]
    NotOpen,
}

impl From<DbError> for ledgerkv_core::Error {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Storage(inner) => inner.into(),
            DbError::StrategyUnknown(name) => ledgerkv_core::Error::StrategyUnknown(name),
            // No dedicated config-error kind at the core boundary; an
            // invalid config is a startup failure same as an unknown
            // strategy name, so it folds into the same variant.
            DbError::InvalidConfig(reason) => ledgerkv_core::Error::StrategyUnknown(reason),
            DbError::NotOpen => ledgerkv_core::Error::NotOpen,
        }
    }
}
