use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{
    is_internal_link, CreateNotification, Notification, Page, Pagination, ReadReceipt,
};
use crate::repository::NotificationRepository;

pub struct NotificationService {
    repo: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }

    /// Records a notification for a server-side event (new bid, purchase
    /// request, admin message).
    pub async fn notify(&self, input: CreateNotification) -> Result<Notification> {
        input.validate()?;
        if let Some(link) = input.link.as_deref() {
            if !link.is_empty() && !is_internal_link(link) {
                return Err(AppError::BadRequest(
                    "link must be a path inside the marketplace".to_string(),
                ));
            }
        }

        let notification = Notification::new(input, Utc::now());
        self.repo.insert(&notification).await?;

        tracing::info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            "Notification created"
        );
        Ok(notification)
    }

    /// Marks the notification read on behalf of its owner and tells the
    /// client where to navigate.
    ///
    /// Unknown ids are `NotFound`; someone else's notification is
    /// `Forbidden`. Neither case writes anything.
    pub async fn mark_as_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<ReadReceipt> {
        let mut notification = self
            .repo
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if !notification.is_owned_by(user_id) {
            tracing::warn!(
                %notification_id,
                %user_id,
                "Attempt to mark another user's notification as read"
            );
            return Err(AppError::Forbidden);
        }

        let now = Utc::now();
        if notification.mark_read(now) {
            let matched = self.repo.mark_read(notification_id, user_id, now).await?;
            if !matched {
                return Err(AppError::NotFound("Notification not found".to_string()));
            }
            tracing::debug!(%notification_id, "Notification marked as read");
        }

        Ok(ReadReceipt::for_notification(&notification))
    }

    pub async fn mark_all_as_read(&self, user_id: Uuid) -> Result<u64> {
        let updated = self.repo.mark_all_read(user_id, Utc::now()).await?;
        tracing::debug!(%user_id, updated, "Marked all notifications as read");
        Ok(updated)
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> Result<Page<Notification>> {
        let (items, total) = self.repo.list_for_user(user_id, pagination).await?;
        Ok(Page::new(items, total, pagination))
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        self.repo.unread_count(user_id).await
    }
}
