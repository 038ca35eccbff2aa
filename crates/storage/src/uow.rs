//! Depth-counted unit of work over an owned transaction handle

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use devshare_core::UnitOfWork;
use devshare_error::{Error, Result, ResultExt};
use sqlx::pool::PoolConnection;
use sqlx::{Database, Pool, Transaction};
use tracing::{debug, warn};

use crate::classify::{classify_connection_error, classify_transaction_error};

/// Physical transaction control. The coordinator only needs begin, commit
/// and rollback on an owned handle; everything else is the driver's concern.
#[async_trait]
pub trait TransactionDriver: Send + Sync {
    type Transaction: Send;

    async fn begin(&self) -> Result<Self::Transaction, sqlx::Error>;

    async fn commit(&self, tx: Self::Transaction) -> Result<(), sqlx::Error>;

    async fn rollback(&self, tx: Self::Transaction) -> Result<(), sqlx::Error>;
}

macro_rules! pool_driver {
    ($db:ty) => {
        #[async_trait]
        impl TransactionDriver for Pool<$db> {
            type Transaction = Transaction<'static, $db>;

            async fn begin(&self) -> Result<Self::Transaction, sqlx::Error> {
                Pool::begin(self).await
            }

            async fn commit(&self, tx: Self::Transaction) -> Result<(), sqlx::Error> {
                tx.commit().await
            }

            async fn rollback(&self, tx: Self::Transaction) -> Result<(), sqlx::Error> {
                tx.rollback().await
            }
        }
    };
}

#[cfg(feature = "sqlite")]
pool_driver!(sqlx::Sqlite);
#[cfg(feature = "postgres")]
pool_driver!(sqlx::Postgres);

/// Unit of work for one inbound operation.
///
/// Only the outermost [`begin`](UnitOfWork::begin) opens a transaction and
/// only the matching outermost [`commit`](UnitOfWork::commit) ends it.
/// [`rollback`](UnitOfWork::rollback) at any depth aborts immediately and
/// resets the depth to zero; the failure stays recorded, so if the
/// coordinator is begun again its outermost commit rolls back instead.
///
/// The transaction handle is present exactly while the depth is non-zero.
/// Dropping a coordinator with an open transaction rolls it back.
pub struct Coordinator<D: TransactionDriver> {
    driver: D,
    tx: Option<D::Transaction>,
    depth: usize,
    failed: bool,
}

impl<D: TransactionDriver> Coordinator<D> {
    pub const fn new(driver: D) -> Self {
        Self {
            driver,
            tx: None,
            depth: 0,
            failed: false,
        }
    }

    pub const fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Whether a rollback happened that no outermost commit has consumed yet
    pub const fn is_failed(&self) -> bool {
        self.failed
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }
}

impl<D: TransactionDriver> std::fmt::Debug for Coordinator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("depth", &self.depth)
            .field("failed", &self.failed)
            .field("has_transaction", &self.tx.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<D: TransactionDriver> UnitOfWork for Coordinator<D> {
    async fn begin(&mut self) -> Result<()> {
        if self.depth == 0 {
            let tx = self
                .driver
                .begin()
                .await
                .map_err(|e| classify_transaction_error(e, "begin"))
                .context("failed to begin transaction")?;
            self.tx = Some(tx);
        }
        self.depth += 1;
        debug!(depth = self.depth, "unit of work begin");
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::internal("no active transaction"));
        }

        self.depth -= 1;
        if self.depth > 0 {
            debug!(depth = self.depth, "inner commit deferred");
            return Ok(());
        }

        let Some(tx) = self.tx.take() else {
            return Err(Error::internal("no active transaction"));
        };

        if std::mem::take(&mut self.failed) {
            warn!("outermost commit on a failed unit of work, rolling back");
            return self
                .driver
                .rollback(tx)
                .await
                .map_err(|e| classify_transaction_error(e, "rollback"))
                .context("failed to rollback transaction");
        }

        self.driver
            .commit(tx)
            .await
            .map_err(|e| classify_transaction_error(e, "commit"))
            .context("failed to commit transaction")?;
        debug!("unit of work committed");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Ok(());
        }

        debug!(depth = self.depth, "unit of work rollback");
        self.failed = true;
        self.depth = 0;

        match self.tx.take() {
            Some(tx) => self
                .driver
                .rollback(tx)
                .await
                .map_err(|e| classify_transaction_error(e, "rollback"))
                .context("failed to rollback transaction"),
            None => Ok(()),
        }
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

/// Where a repository statement runs: the open transaction, or a pooled
/// connection held for that one statement.
pub enum Querier<'a, DB: Database> {
    Transaction(&'a mut Transaction<'static, DB>),
    Pooled(PoolConnection<DB>),
}

impl<DB: Database> Deref for Querier<'_, DB> {
    type Target = DB::Connection;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Transaction(tx) => tx,
            Self::Pooled(conn) => conn,
        }
    }
}

impl<DB: Database> DerefMut for Querier<'_, DB> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Self::Transaction(tx) => tx,
            Self::Pooled(conn) => conn,
        }
    }
}

impl<DB: Database> Coordinator<Pool<DB>>
where
    Pool<DB>: TransactionDriver<Transaction = Transaction<'static, DB>>,
{
    /// Connection for the next statement
    pub async fn querier(&mut self) -> Result<Querier<'_, DB>> {
        match self.tx.as_mut() {
            Some(tx) => Ok(Querier::Transaction(tx)),
            None => self
                .driver
                .acquire()
                .await
                .map(Querier::Pooled)
                .map_err(classify_connection_error),
        }
    }
}
