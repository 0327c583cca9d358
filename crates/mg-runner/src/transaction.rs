//! Per-migration transaction scope
//!
//! `TransactionBehavior::Default` opens a transaction for the migration;
//! `None` runs its statements in autocommit mode. The scope is consumed by
//! [`TransactionScope::commit`] or [`TransactionScope::rollback`]; the
//! runner calls exactly one of them on every exit path.

use mg_core::TransactionBehavior;
use mg_db::{Database, DbError, DbResult};

pub struct TransactionScope<'a> {
    db: &'a dyn Database,
    active: bool,
}

impl<'a> TransactionScope<'a> {
    /// Open a scope, beginning a transaction unless the behavior is `None`
    pub async fn begin(db: &'a dyn Database, behavior: TransactionBehavior) -> DbResult<Self> {
        let active = match behavior {
            TransactionBehavior::Default => {
                db.begin_transaction().await?;
                true
            }
            TransactionBehavior::None => false,
        };
        Ok(Self { db, active })
    }

    /// Whether a transaction is open
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Commit; a failed commit is rolled back before the error is returned
    pub async fn commit(mut self) -> DbResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        if let Err(commit_err) = self.db.commit().await {
            if let Err(rollback_err) = self.db.rollback().await {
                log::warn!("Rollback after failed commit also failed: {}", rollback_err);
            }
            return Err(commit_err);
        }
        Ok(())
    }

    /// Roll back the open transaction, if any
    pub async fn rollback(mut self) -> DbResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.db.rollback().await.map_err(|e| match e {
            DbError::TransactionError(msg) => DbError::TransactionError(msg),
            other => DbError::TransactionError(other.to_string()),
        })
    }
}

impl Drop for TransactionScope<'_> {
    fn drop(&mut self) {
        if self.active {
            log::warn!(
                "Transaction scope on {} dropped while still open",
                self.db.db_type()
            );
        }
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;
