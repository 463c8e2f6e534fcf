//! Member service tests over a real unit of work.

mod common;

use member_directory::errors::AppError;
use member_directory::infra::UnitOfWork;
use member_directory::services::{MemberManager, MemberService};
use tokio_test::assert_err;

use common::{member, persistence, test_database, AUDITOR};

#[tokio::test]
async fn test_rename_locked_renames_every_match() {
    let db = test_database().await;
    let uow = persistence(&db);
    let first = member(&uow, "member1", 10, None).await;
    let second = member(&uow, "member1", 20, None).await;
    let other = member(&uow, "member2", 30, None).await;
    let service = MemberManager::new(uow.clone());

    let renamed = service.rename_locked("member1", "renamed").await.unwrap();

    let ids: Vec<_> = renamed.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert!(renamed.iter().all(|m| m.username == "renamed"));
    assert!(renamed.iter().all(|m| m.last_modified_by == AUDITOR));

    let stored: Vec<_> = uow
        .members()
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|m| (m.id, m.username))
        .collect();
    assert_eq!(
        stored,
        vec![
            (first.id, "renamed".to_string()),
            (second.id, "renamed".to_string()),
            (other.id, "member2".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_rename_locked_without_match_is_not_found() {
    let db = test_database().await;
    let uow = persistence(&db);
    let saved = member(&uow, "member1", 10, None).await;
    let service = MemberManager::new(uow.clone());

    let err = assert_err!(service.rename_locked("nobody", "renamed").await);
    assert!(matches!(err, AppError::NotFound));

    // The rolled-back transaction left the table untouched
    let all = uow.members().find_all().await.unwrap();
    assert_eq!(all, vec![saved]);
}

#[tokio::test]
async fn test_service_reads_through_persistence() {
    let db = test_database().await;
    let uow = persistence(&db);
    let saved = member(&uow, "member1", 10, None).await;
    let service = MemberManager::new(uow);

    assert_eq!(service.find_username(saved.id).await.unwrap(), "member1");
    assert!(matches!(
        service.get_member(saved.id + 1).await,
        Err(AppError::NotFound)
    ));
}
