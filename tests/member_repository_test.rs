//! Member and team repository tests against an in-memory database.

mod common;

use member_directory::domain::NewMember;
use member_directory::errors::AppError;
use member_directory::infra::UnitOfWork;
use member_directory::types::{PageRequest, SortOrder};
use member_directory::with_transaction;
use tokio_test::{assert_err, assert_ok};

use common::{member, persistence, team, test_database, AUDITOR};

#[tokio::test]
async fn test_save_then_find_by_id() {
    let db = test_database().await;
    let uow = persistence(&db);

    let saved = uow.members().save(NewMember::new("memberA", 20)).await.unwrap();
    let found = uow.members().find_by_id(saved.id).await.unwrap();

    assert_eq!(found, Some(saved.clone()));
    assert_eq!(uow.members().find_by_id(saved.id + 100).await.unwrap(), None);
}

#[tokio::test]
async fn test_basic_crud() {
    let db = test_database().await;
    let uow = persistence(&db);
    let members = uow.members();

    let m1 = member(&uow, "member1", 10, None).await;
    member(&uow, "member2", 20, None).await;

    assert_eq!(members.find_all().await.unwrap().len(), 2);
    assert_eq!(members.count().await.unwrap(), 2);

    assert_eq!(members.delete(m1.id).await.unwrap(), 1);
    assert_eq!(members.delete(m1.id).await.unwrap(), 0);
    assert_eq!(members.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_auditing_fills_dates_and_authors() {
    let db = test_database().await;
    let uow = persistence(&db);

    let saved = member(&uow, "member1", 10, None).await;
    assert_eq!(saved.created_by, AUDITOR);
    assert_eq!(saved.last_modified_by, AUDITOR);
    assert!(saved.last_modified_date >= saved.created_date);

    let renamed = uow.members().rename(saved.id, "member2".to_string()).await.unwrap();
    assert_eq!(renamed.username, "member2");
    assert_eq!(renamed.created_date, saved.created_date);
    assert!(renamed.last_modified_date >= saved.last_modified_date);
}

#[tokio::test]
async fn test_change_team_and_team_delete() {
    let db = test_database().await;
    let uow = persistence(&db);
    let team_a = team(&uow, "teamA").await;
    let team_b = team(&uow, "teamB").await;

    let saved = member(&uow, "member1", 10, Some(&team_a)).await;
    assert!(saved.is_member_of(&team_a));

    let moved = uow.members().change_team(saved.id, Some(team_b.id)).await.unwrap();
    assert!(moved.is_member_of(&team_b));

    // Deleting the team clears the member's reference
    assert_eq!(uow.teams().delete(team_b.id).await.unwrap(), 1);
    let orphan = uow.members().find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(orphan.team_id, None);

    assert_eq!(uow.teams().count().await.unwrap(), 1);
    assert_eq!(uow.teams().find_all().await.unwrap(), vec![team_a]);
}

#[tokio::test]
async fn test_change_team_of_missing_member_is_not_found() {
    let db = test_database().await;
    let uow = persistence(&db);

    let result = uow.members().change_team(42, None).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_find_by_username_and_age_greater_than() {
    let db = test_database().await;
    let uow = persistence(&db);
    member(&uow, "AAA", 10, None).await;
    let older = member(&uow, "AAA", 20, None).await;
    member(&uow, "BBB", 30, None).await;

    let result = uow
        .members()
        .find_by_username_and_age_greater_than("AAA", 15)
        .await
        .unwrap();
    assert_eq!(result, vec![older]);

    // Strictly greater
    let result = uow
        .members()
        .find_by_username_and_age_greater_than("AAA", 20)
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_find_top3_and_find_user() {
    let db = test_database().await;
    let uow = persistence(&db);
    for i in 1..=5 {
        member(&uow, &format!("member{}", i), i * 10, None).await;
    }

    let top3: Vec<String> = uow
        .members()
        .find_top3()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.username)
        .collect();
    assert_eq!(top3, vec!["member1", "member2", "member3"]);

    let users = uow.members().find_user("member2", 20).await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(uow.members().find_user("member2", 21).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_member_dto_skips_members_without_team() {
    let db = test_database().await;
    let uow = persistence(&db);
    let team_a = team(&uow, "teamA").await;
    let saved = member(&uow, "AAA", 10, Some(&team_a)).await;
    member(&uow, "loner", 10, None).await;

    let dtos = uow.members().find_member_dto().await.unwrap();

    assert_eq!(dtos.len(), 1);
    assert_eq!(dtos[0].id, saved.id);
    assert_eq!(dtos[0].username, "AAA");
    assert_eq!(dtos[0].teamname, "teamA");
}

#[tokio::test]
async fn test_find_by_names() {
    let db = test_database().await;
    let uow = persistence(&db);
    member(&uow, "AAA", 10, None).await;
    member(&uow, "BBB", 20, None).await;
    member(&uow, "CCC", 30, None).await;

    let found = uow
        .members()
        .find_by_names(vec!["AAA".to_string(), "CCC".to_string()])
        .await
        .unwrap();
    let names: Vec<_> = found.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["AAA", "CCC"]);

    assert!(uow.members().find_by_names(Vec::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_page_by_age() {
    let db = test_database().await;
    let uow = persistence(&db);
    for i in 1..=5 {
        member(&uow, &format!("member{}", i), 10, None).await;
    }
    member(&uow, "other", 11, None).await;

    let request = PageRequest::of(0, 3).with_sort(SortOrder::desc("username"));
    let page = uow.members().find_page_by_age(10, &request).await.unwrap();

    let names: Vec<_> = page.content.iter().map(|m| m.username.as_str()).collect();
    assert_eq!(names, vec!["member5", "member4", "member3"]);
    assert_eq!(page.total_elements, 5);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.number, 0);
    assert!(page.first);
    assert!(page.has_next);
}

#[tokio::test]
async fn test_find_slice_by_age() {
    let db = test_database().await;
    let uow = persistence(&db);
    for i in 1..=5 {
        member(&uow, &format!("member{}", i), 10, None).await;
    }

    let slice = uow
        .members()
        .find_slice_by_age(10, &PageRequest::of(0, 3))
        .await
        .unwrap();
    assert_eq!(slice.content.len(), 3);
    assert!(slice.first);
    assert!(slice.has_next);

    let last = uow
        .members()
        .find_slice_by_age(10, &PageRequest::of(1, 3))
        .await
        .unwrap();
    assert_eq!(last.content.len(), 2);
    assert!(!last.has_next);
}

#[tokio::test]
async fn test_find_all_paged_rejects_unknown_sort() {
    let db = test_database().await;
    let uow = persistence(&db);
    member(&uow, "member1", 10, None).await;

    let request = PageRequest::of(0, 5).with_sort(SortOrder::asc("teamname"));
    let result = uow.members().find_all_paged(&request).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_bulk_age_plus() {
    let db = test_database().await;
    let uow = persistence(&db);
    for (i, age) in [10, 20, 25, 30, 50].into_iter().enumerate() {
        member(&uow, &format!("member{}", i), age, None).await;
    }

    let updated = uow.members().bulk_age_plus(20).await.unwrap();
    assert_eq!(updated, 4);

    let ages: Vec<_> = uow
        .members()
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.age)
        .collect();
    assert_eq!(ages, vec![10, 21, 26, 31, 51]);
}

#[tokio::test]
async fn test_team_is_loaded_with_members() {
    let db = test_database().await;
    let uow = persistence(&db);
    let team_a = team(&uow, "teamA").await;
    let team_b = team(&uow, "teamB").await;
    member(&uow, "member1", 10, Some(&team_a)).await;
    member(&uow, "member2", 10, Some(&team_b)).await;
    member(&uow, "member1", 20, None).await;

    let expected = vec![Some("teamA"), Some("teamB"), None];

    let fetch_join = uow.members().find_member_fetch_join().await.unwrap();
    let names: Vec<_> = fetch_join.iter().map(|m| m.team_name()).collect();
    assert_eq!(names, expected);

    let entity_graph = uow.members().find_member_entity_graph().await.unwrap();
    assert_eq!(entity_graph, fetch_join);

    let all = uow.members().find_all_with_team().await.unwrap();
    assert_eq!(all, fetch_join);

    let by_username = uow.members().find_by_username("member1").await.unwrap();
    let names: Vec<_> = by_username.iter().map(|m| m.team_name()).collect();
    assert_eq!(names, vec![Some("teamA"), None]);
}

#[tokio::test]
async fn test_read_only_and_projection_queries() {
    let db = test_database().await;
    let uow = persistence(&db);
    member(&uow, "member1", 10, None).await;
    member(&uow, "member2", 20, None).await;

    let read_only = uow.members().find_read_only_by_username("member1").await.unwrap();
    assert_eq!(read_only.len(), 1);
    assert_eq!(read_only[0].age, 10);

    let projections = uow
        .members()
        .find_projections_by_username("member2")
        .await
        .unwrap();
    assert_eq!(projections.len(), 1);
    assert_eq!(projections[0].username, "member2");
}

#[tokio::test]
async fn test_lock_and_rename_in_transaction() {
    let db = test_database().await;
    let uow = persistence(&db);
    let saved = member(&uow, "member1", 10, None).await;

    let renamed = with_transaction!(uow, |ctx| {
        let members = ctx.members();
        let locked = members.find_lock_by_username("member1").await?;
        assert_eq!(locked.len(), 1);
        members.rename(locked[0].id, "renamed".to_string()).await
    })
    .unwrap();

    assert_eq!(renamed.id, saved.id);
    let stored = uow.members().find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "renamed");
}

#[tokio::test]
async fn test_failed_transaction_rolls_back() {
    let db = test_database().await;
    let uow = persistence(&db);
    let saved = member(&uow, "member1", 10, None).await;
    let id = saved.id;

    let result: Result<(), AppError> = with_transaction!(uow, |ctx| {
        ctx.members().rename(id, "renamed".to_string()).await?;
        Err(AppError::validation("abort"))
    });
    let err = assert_err!(result);
    assert!(matches!(err, AppError::Validation(_)));

    let stored = uow.members().find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "member1");
}

#[tokio::test]
async fn test_read_only_unit_of_work() {
    let db = test_database().await;
    let uow = persistence(&db);
    member(&uow, "member1", 10, None).await;

    let found = assert_ok!(
        uow.read_only(|ctx| {
            Box::pin(async move { ctx.members().find_read_only_by_username("member1").await })
        })
        .await
    );
    assert_eq!(found.len(), 1);
}
