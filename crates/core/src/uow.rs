//! Unit of work
//!
//! A unit of work groups the storage effects of one logical operation so
//! they commit or roll back together. Implementations count nesting: only
//! the outermost `begin` opens a transaction and only the matching
//! outermost `commit` ends it. A `rollback` at any depth aborts the whole
//! transaction, and every later `commit` in that nesting drains into it.
//!
//! A service that owns a step wraps it like this:
//!
//! ```rust,ignore
//! uow.begin().await?;
//! let outcome = self.do_step(uow, request).await;
//! uow::finish(uow, outcome).await
//! ```
//!
//! The service never decides whether it is outermost. Nested participation
//! falls out of the depth counting.

use async_trait::async_trait;
use devshare_error::Result;

#[async_trait]
pub trait UnitOfWork: Send {
    /// Open a transaction at depth zero; otherwise join the active one.
    async fn begin(&mut self) -> Result<()>;

    /// Leave one nesting level. Only the outermost commit reaches storage.
    /// If any participant rolled back since the unit of work was last
    /// settled, the outermost commit rolls back instead and returns the
    /// rollback's result.
    async fn commit(&mut self) -> Result<()>;

    /// Abort the whole transaction. A no-op when none is active.
    async fn rollback(&mut self) -> Result<()>;

    /// Current nesting depth; zero when idle
    fn depth(&self) -> usize;

    fn in_transaction(&self) -> bool {
        self.depth() > 0
    }
}

/// Close a step opened with `begin`: commit on success, roll back on
/// failure. A failing rollback is logged and the step's own error wins.
pub async fn finish<U, T>(uow: &mut U, outcome: Result<T>) -> Result<T>
where
    U: UnitOfWork + ?Sized,
{
    match outcome {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::warn!(
                    error = %rollback_err,
                    original = %err,
                    "rollback after failed step also failed"
                );
            }
            Err(err)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingUow;
    use super::*;
    use devshare_error::domain;

    #[tokio::test]
    async fn test_finish_commits_on_success() {
        let mut uow = CountingUow::default();
        uow.begin().await.unwrap();

        let value = finish(&mut uow, Ok(7)).await.unwrap();

        assert_eq!(value, 7);
        assert_eq!(uow.commits, 1);
        assert_eq!(uow.depth(), 0);
    }

    #[tokio::test]
    async fn test_finish_rolls_back_and_keeps_error() {
        let mut uow = CountingUow::default();
        uow.begin().await.unwrap();

        let err = finish::<_, ()>(&mut uow, Err(domain::err_conflict()))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(uow.rollbacks, 1);
        assert_eq!(uow.commits, 0);
    }

    #[tokio::test]
    async fn test_finish_prefers_step_error_over_rollback_error() {
        let mut uow = CountingUow {
            fail_rollback: true,
            ..Default::default()
        };
        uow.begin().await.unwrap();

        let err = finish::<_, ()>(&mut uow, Err(domain::err_not_found()))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_commit_after_swallowed_failure_rolls_back() {
        let mut uow = CountingUow::default();
        uow.begin().await.unwrap();
        uow.rollback().await.unwrap();

        uow.begin().await.unwrap();
        finish(&mut uow, Ok(())).await.unwrap();

        assert_eq!(uow.commits, 0);
        assert_eq!(uow.rollbacks, 2);
    }

    #[tokio::test]
    async fn test_nested_finish_commits_once() {
        let mut uow = CountingUow::default();
        uow.begin().await.unwrap();
        uow.begin().await.unwrap();

        finish(&mut uow, Ok(())).await.unwrap();
        assert_eq!(uow.commits, 0);
        assert!(uow.in_transaction());

        finish(&mut uow, Ok(())).await.unwrap();
        assert_eq!(uow.commits, 1);
        assert!(!uow.in_transaction());
    }
}
