/// Notification read-state tests against the in-memory store
///
/// This test module covers:
/// - the unread→read transition and its navigation target
/// - idempotent re-marking
/// - ownership and not-found failures leaving state untouched
/// - listing, counting and bulk marking for the current user
use std::sync::Arc;

use marketplace_api::models::{CreateNotification, Pagination, DEFAULT_REDIRECT};
use marketplace_api::repository::memory::InMemoryNotificationRepository;
use marketplace_api::repository::NotificationRepository;
use marketplace_api::services::NotificationService;
use marketplace_api::AppError;
use uuid::Uuid;

fn setup() -> (Arc<InMemoryNotificationRepository>, NotificationService) {
    let repo = Arc::new(InMemoryNotificationRepository::new());
    let service = NotificationService::new(repo.clone());
    (repo, service)
}

fn bid_notification(owner: Uuid, link: Option<&str>) -> CreateNotification {
    CreateNotification {
        user_id: owner,
        title: "New bid on your listing".to_string(),
        description: "A buyer offered 120".to_string(),
        link: link.map(str::to_string),
    }
}

#[tokio::test]
async fn test_owner_marks_notification_read_and_follows_link() {
    let (repo, service) = setup();
    let owner = Uuid::new_v4();
    let n = service
        .notify(bid_notification(owner, Some("/rooms/r1")))
        .await
        .unwrap();

    let receipt = service.mark_as_read(owner, n.id).await.unwrap();

    assert_eq!(receipt.id, n.id);
    assert!(receipt.is_read);
    assert_eq!(receipt.redirect_to, "/rooms/r1");

    let stored = repo.find_by_id(n.id).await.unwrap().unwrap();
    assert!(stored.is_read);
    assert!(stored.read_at.is_some());
}

#[tokio::test]
async fn test_notification_without_link_redirects_home() {
    let (_, service) = setup();
    let owner = Uuid::new_v4();
    let n = service.notify(bid_notification(owner, None)).await.unwrap();

    let receipt = service.mark_as_read(owner, n.id).await.unwrap();

    assert!(receipt.is_read);
    assert_eq!(receipt.redirect_to, DEFAULT_REDIRECT);
}

#[tokio::test]
async fn test_marking_twice_is_a_no_op() {
    let (repo, service) = setup();
    let owner = Uuid::new_v4();
    let n = service
        .notify(bid_notification(owner, Some("/rooms/r1")))
        .await
        .unwrap();

    let first = service.mark_as_read(owner, n.id).await.unwrap();
    let read_at = repo.find_by_id(n.id).await.unwrap().unwrap().read_at;

    let second = service.mark_as_read(owner, n.id).await.unwrap();

    assert_eq!(first, second);
    let stored = repo.find_by_id(n.id).await.unwrap().unwrap();
    assert!(stored.is_read);
    assert_eq!(stored.read_at, read_at);
}

#[tokio::test]
async fn test_other_user_is_forbidden_and_flag_unchanged() {
    let (repo, service) = setup();
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let n = service.notify(bid_notification(owner, None)).await.unwrap();

    let err = service.mark_as_read(intruder, n.id).await.unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
    let stored = repo.find_by_id(n.id).await.unwrap().unwrap();
    assert!(!stored.is_read);
    assert!(stored.read_at.is_none());
}

#[tokio::test]
async fn test_unknown_notification_is_not_found() {
    let (_, service) = setup();

    let err = service
        .mark_as_read(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_external_links_are_rejected() {
    let (_, service) = setup();

    let err = service
        .notify(bid_notification(Uuid::new_v4(), Some("https://evil.example/phish")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_protocol_relative_links_are_rejected() {
    let (repo, service) = setup();
    let owner = Uuid::new_v4();

    for link in ["//evil.example/phish", "/\\evil.example"] {
        let err = service
            .notify(bid_notification(owner, Some(link)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "accepted {link}");
    }

    let (stored, total) = repo
        .list_for_user(owner, Pagination::default())
        .await
        .unwrap();
    assert!(stored.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_empty_title_is_rejected() {
    let (_, service) = setup();
    let mut input = bid_notification(Uuid::new_v4(), None);
    input.title = String::new();

    assert!(matches!(
        service.notify(input).await.unwrap_err(),
        AppError::BadRequest(_)
    ));
}

#[tokio::test]
async fn test_unread_count_and_mark_all() {
    let (_, service) = setup();
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let first = service.notify(bid_notification(owner, None)).await.unwrap();
    service.notify(bid_notification(owner, None)).await.unwrap();
    service.notify(bid_notification(owner, None)).await.unwrap();
    service.notify(bid_notification(other, None)).await.unwrap();

    service.mark_as_read(owner, first.id).await.unwrap();
    assert_eq!(service.unread_count(owner).await.unwrap(), 2);

    assert_eq!(service.mark_all_as_read(owner).await.unwrap(), 2);
    assert_eq!(service.unread_count(owner).await.unwrap(), 0);
    assert_eq!(service.mark_all_as_read(owner).await.unwrap(), 0);

    assert_eq!(service.unread_count(other).await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_only_returns_own_notifications() {
    let (_, service) = setup();
    let owner = Uuid::new_v4();

    for _ in 0..3 {
        service.notify(bid_notification(owner, None)).await.unwrap();
    }
    service
        .notify(bid_notification(Uuid::new_v4(), None))
        .await
        .unwrap();

    let page = service
        .list_for_user(owner, Pagination::new(Some(1), Some(2)))
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.has_more);
    assert!(page.items.iter().all(|n| n.user_id == owner));

    let rest = service
        .list_for_user(owner, Pagination::new(Some(2), Some(2)))
        .await
        .unwrap();
    assert_eq!(rest.items.len(), 1);
    assert!(!rest.has_more);
}
