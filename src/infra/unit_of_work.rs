//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and runs multi-step operations inside a
//! single database transaction.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, QuerySelect,
    TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    by_username, rename_member, MemberRepository, MemberStore, TeamRepository, TeamStore,
};
use crate::domain::Member;
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, implement it over mocked repositories.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get member repository
    fn members(&self) -> Arc<dyn MemberRepository>;

    /// Get team repository
    fn teams(&self) -> Arc<dyn TeamRepository>;

    /// Execute a closure within a read-write transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a read-only transaction.
    async fn read_only<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
    auditor: &'a str,
}

impl<'a> TransactionContext<'a> {
    /// Create a new transaction context
    fn new(txn: &'a DatabaseTransaction, auditor: &'a str) -> Self {
        Self { txn, auditor }
    }

    /// Get member repository for this transaction
    pub fn members(&self) -> TxMemberRepository<'_> {
        TxMemberRepository::new(self.txn, self.auditor)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    auditor: String,
    member_repo: Arc<MemberStore>,
    team_repo: Arc<TeamStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection, auditor: impl Into<String>) -> Self {
        let auditor = auditor.into();
        let member_repo = Arc::new(MemberStore::new(db.clone(), auditor.clone()));
        let team_repo = Arc::new(TeamStore::new(db.clone()));
        Self {
            db,
            auditor,
            member_repo,
            team_repo,
        }
    }

    /// Internal transaction execution with configurable access mode
    async fn execute_transaction<F, T>(
        &self,
        isolation: IsolationLevel,
        access: AccessMode,
        f: F,
    ) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(access))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn, &self.auditor);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn members(&self) -> Arc<dyn MemberRepository> {
        self.member_repo.clone()
    }

    fn teams(&self) -> Arc<dyn TeamRepository> {
        self.team_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, AccessMode::ReadWrite, f)
            .await
    }

    async fn read_only<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, AccessMode::ReadOnly, f)
            .await
    }
}

/// Transaction-bound member repository.
///
/// Row locks taken here are held until the surrounding transaction ends.
pub struct TxMemberRepository<'a> {
    txn: &'a DatabaseTransaction,
    auditor: &'a str,
}

impl<'a> TxMemberRepository<'a> {
    fn new(txn: &'a DatabaseTransaction, auditor: &'a str) -> Self {
        Self { txn, auditor }
    }

    /// Members with the given username, locked with `SELECT ... FOR UPDATE`.
    ///
    /// SQLite has no row locks; there the query runs without the clause.
    pub async fn find_lock_by_username(&self, username: &str) -> AppResult<Vec<Member>> {
        let models = by_username(username)
            .lock_exclusive()
            .all(self.txn)
            .await?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    /// Members with the given username
    pub async fn find_read_only_by_username(&self, username: &str) -> AppResult<Vec<Member>> {
        let models = by_username(username).all(self.txn).await?;
        Ok(models.into_iter().map(Member::from).collect())
    }

    /// Change a member's username
    pub async fn rename(&self, id: i64, username: String) -> AppResult<Member> {
        rename_member(self.txn, id, username, self.auditor).await
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
