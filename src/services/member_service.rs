//! Member service - Member lookups, listing and search use cases.
//!
//! Orchestrates repository calls via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Member, MemberDto, MemberSearchCondition};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Page, PageRequest};

/// Member service trait for dependency injection.
#[async_trait]
pub trait MemberService: Send + Sync {
    /// Username of the member with the given ID
    async fn find_username(&self, id: i64) -> AppResult<String>;

    /// Get member by ID
    async fn get_member(&self, id: i64) -> AppResult<Member>;

    /// Page over all members
    async fn list(&self, request: &PageRequest) -> AppResult<Page<MemberDto>>;

    /// Conditional search returning every match
    async fn search(&self, cond: &MemberSearchCondition) -> AppResult<Vec<MemberDto>>;

    /// Paged conditional search, always counting
    async fn search_page_simple(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>>;

    /// Paged conditional search, counting only when needed
    async fn search_page_complex(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>>;

    /// Lock every member named `username` and rename them in one transaction
    async fn rename_locked(&self, username: &str, new_username: &str) -> AppResult<Vec<Member>>;

    /// Add one to the age of every member aged `threshold` or older
    async fn bump_ages(&self, threshold: i32) -> AppResult<u64>;
}

/// Concrete implementation of MemberService using Unit of Work.
pub struct MemberManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> MemberManager<U> {
    /// Create new member service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> MemberService for MemberManager<U> {
    async fn find_username(&self, id: i64) -> AppResult<String> {
        let member = self.get_member(id).await?;
        Ok(member.username)
    }

    async fn get_member(&self, id: i64) -> AppResult<Member> {
        self.uow.members().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list(&self, request: &PageRequest) -> AppResult<Page<MemberDto>> {
        let page = self.uow.members().find_all_paged(request).await?;
        Ok(page.map(MemberDto::from))
    }

    async fn search(&self, cond: &MemberSearchCondition) -> AppResult<Vec<MemberDto>> {
        self.uow.members().search(cond).await
    }

    async fn search_page_simple(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>> {
        self.uow.members().search_page_simple(cond, request).await
    }

    async fn search_page_complex(
        &self,
        cond: &MemberSearchCondition,
        request: &PageRequest,
    ) -> AppResult<Page<MemberDto>> {
        self.uow.members().search_page_complex(cond, request).await
    }

    async fn rename_locked(&self, username: &str, new_username: &str) -> AppResult<Vec<Member>> {
        let username = username.to_string();
        let new_username = new_username.to_string();

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let members = ctx.members();
                    let locked = members.find_lock_by_username(&username).await?;
                    if locked.is_empty() {
                        return Err(AppError::NotFound);
                    }

                    let mut renamed = Vec::with_capacity(locked.len());
                    for member in locked {
                        renamed.push(members.rename(member.id, new_username.clone()).await?);
                    }
                    tracing::info!(count = renamed.len(), "renamed locked members");
                    Ok(renamed)
                })
            })
            .await
    }

    async fn bump_ages(&self, threshold: i32) -> AppResult<u64> {
        self.uow.members().bulk_age_plus(threshold).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MemberRepository, MockMemberRepository, MockTeamRepository, TeamRepository,
        TransactionContext,
    };

    /// Unit of Work over mocked repositories; transactions are unavailable.
    struct TestUnitOfWork {
        members: Arc<MockMemberRepository>,
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn members(&self) -> Arc<dyn MemberRepository> {
            self.members.clone()
        }

        fn teams(&self) -> Arc<dyn TeamRepository> {
            Arc::new(MockTeamRepository::new())
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("transactions are not available"))
        }

        async fn read_only<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            Err(AppError::internal("transactions are not available"))
        }
    }

    fn service(mock: MockMemberRepository) -> MemberManager<TestUnitOfWork> {
        MemberManager::new(Arc::new(TestUnitOfWork {
            members: Arc::new(mock),
        }))
    }

    fn member(id: i64, username: &str, age: i32) -> Member {
        let now = chrono::Utc::now();
        Member {
            id,
            username: username.to_string(),
            age,
            team_id: None,
            created_date: now,
            last_modified_date: now,
            created_by: "system".to_string(),
            last_modified_by: "system".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_username() {
        let mut mock = MockMemberRepository::new();
        mock.expect_find_by_id()
            .withf(|id| *id == 1)
            .returning(|_| Ok(Some(member(1, "member1", 10))));

        let username = service(mock).find_username(1).await.unwrap();
        assert_eq!(username, "member1");
    }

    #[tokio::test]
    async fn test_missing_member_is_not_found() {
        let mut mock = MockMemberRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let result = service(mock).get_member(99).await;
        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_maps_members_to_dtos() {
        let mut mock = MockMemberRepository::new();
        mock.expect_find_all_paged().returning(|request| {
            let content = vec![member(1, "member1", 10), member(2, "member2", 20)];
            Ok(Page::new(content, request, 7))
        });

        let page = service(mock).list(&PageRequest::of(0, 2)).await.unwrap();

        assert_eq!(page.total_elements, 7);
        assert_eq!(page.content[1], MemberDto::new(2, "member2", 20, None, None));
    }

    #[tokio::test]
    async fn test_search_passes_condition_through() {
        let mut mock = MockMemberRepository::new();
        mock.expect_search()
            .withf(|cond| cond.teamname_filter() == Some("teamB"))
            .times(1)
            .returning(|_| Ok(vec![MemberDto::new(2, "member2", 20, Some(2), Some("teamB".into()))]));

        let cond = MemberSearchCondition::default().with_teamname("teamB");
        let result = service(mock).search(&cond).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_bump_ages_returns_affected_rows() {
        let mut mock = MockMemberRepository::new();
        mock.expect_bulk_age_plus()
            .withf(|age| *age == 20)
            .returning(|_| Ok(4));

        assert_eq!(service(mock).bump_ages(20).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut mock = MockMemberRepository::new();
        mock.expect_search_page_complex()
            .returning(|_, _| Err(AppError::Database(sea_orm::DbErr::Custom("down".into()))));

        let result = service(mock)
            .search_page_complex(&MemberSearchCondition::default(), &PageRequest::of(0, 5))
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
