/// Role lifecycle tests against the in-memory store
use std::sync::Arc;

use access_control::{Access, AccessSet};
use marketplace_api::models::{CreateRole, UpdateRole};
use marketplace_api::repository::memory::InMemoryRoleRepository;
use marketplace_api::repository::RoleRepository;
use marketplace_api::services::RoleService;
use marketplace_api::AppError;
use uuid::Uuid;

fn setup() -> (Arc<InMemoryRoleRepository>, RoleService) {
    let repo = Arc::new(InMemoryRoleRepository::new());
    let service = RoleService::new(repo.clone());
    (repo, service)
}

fn coupon_editor() -> CreateRole {
    CreateRole {
        name: "Coupon editor".to_string(),
        description: "Manages promotions".to_string(),
        accesses: AccessSet::from([Access::ViewCoupons, Access::UpdateCoupon]),
    }
}

#[tokio::test]
async fn test_create_and_fetch_role() {
    let (_, service) = setup();

    let role = service.create(coupon_editor()).await.unwrap();
    let fetched = service.get(role.id).await.unwrap();

    assert_eq!(fetched.name, "Coupon editor");
    assert!(fetched.accesses.contains(Access::UpdateCoupon));
    assert!(!fetched.accesses.contains(Access::ViewReports));
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let (_, service) = setup();
    service.create(coupon_editor()).await.unwrap();

    let mut dup = coupon_editor();
    dup.name = "  Coupon editor ".to_string();

    assert!(matches!(
        service.create(dup).await.unwrap_err(),
        AppError::Conflict(_)
    ));
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let (_, service) = setup();
    let mut input = coupon_editor();
    input.name = "   ".to_string();

    assert!(matches!(
        service.create(input).await.unwrap_err(),
        AppError::BadRequest(_)
    ));
}

#[tokio::test]
async fn test_update_replaces_accesses() {
    let (_, service) = setup();
    let role = service.create(coupon_editor()).await.unwrap();

    let updated = service
        .update(
            role.id,
            UpdateRole {
                accesses: Some(AccessSet::from([Access::ViewReports])),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, role.name);
    assert_eq!(updated.accesses, AccessSet::from([Access::ViewReports]));
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let (_, service) = setup();
    let role = service.create(coupon_editor()).await.unwrap();

    assert!(matches!(
        service.update(role.id, UpdateRole::default()).await.unwrap_err(),
        AppError::BadRequest(_)
    ));
}

#[tokio::test]
async fn test_update_unknown_role_is_not_found() {
    let (_, service) = setup();

    let err = service
        .update(
            Uuid::new_v4(),
            UpdateRole {
                name: Some("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_referenced_role_cannot_be_deleted() {
    let (repo, service) = setup();
    let role = service.create(coupon_editor()).await.unwrap();
    let user = Uuid::new_v4();
    repo.assign(user, role.id).await;

    assert!(matches!(
        service.delete(role.id).await.unwrap_err(),
        AppError::Conflict(_)
    ));
    assert!(repo.find_by_id(role.id).await.unwrap().is_some());

    repo.unassign(user).await;
    service.delete(role.id).await.unwrap();
    assert!(repo.find_by_id(role.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_unknown_role_is_not_found() {
    let (_, service) = setup();

    assert!(matches!(
        service.delete(Uuid::new_v4()).await.unwrap_err(),
        AppError::NotFound(_)
    ));
}

#[tokio::test]
async fn test_find_for_user_follows_assignment() {
    let (repo, service) = setup();
    let role = service.create(coupon_editor()).await.unwrap();
    let user = Uuid::new_v4();

    assert!(repo.find_for_user(user).await.unwrap().is_none());

    repo.assign(user, role.id).await;
    let found = repo.find_for_user(user).await.unwrap().unwrap();
    assert_eq!(found.id, role.id);
}
