use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Where the client goes after opening a notification without a link.
pub const DEFAULT_REDIRECT: &str = "/";

/// A path inside the marketplace. `//host` and `/\host` are rejected since
/// browsers resolve both against another origin.
pub fn is_internal_link(link: &str) -> bool {
    let mut chars = link.chars();
    chars.next() == Some('/') && !matches!(chars.next(), Some('/') | Some('\\'))
}

/// A user-facing record of an event (new bid, purchase request, ...).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(input: CreateNotification, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            title: input.title,
            description: input.description,
            link: input.link.filter(|link| !link.is_empty()),
            is_read: false,
            read_at: None,
            created_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Flips the read flag. Returns `true` only for the unread→read
    /// transition; `read_at` keeps the time of that first transition.
    pub fn mark_read(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_read {
            return false;
        }
        self.is_read = true;
        self.read_at = Some(now);
        true
    }

    pub fn navigation_target(&self) -> &str {
        match self.link.as_deref() {
            Some(link) if !link.is_empty() => link,
            _ => DEFAULT_REDIRECT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateNotification {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(length(max = 2048))]
    pub link: Option<String>,
}

/// Result of opening a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadReceipt {
    pub id: Uuid,
    pub is_read: bool,
    pub redirect_to: String,
}

impl ReadReceipt {
    pub fn for_notification(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            is_read: notification.is_read,
            redirect_to: notification.navigation_target().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_link_rules() {
        assert!(is_internal_link("/"));
        assert!(is_internal_link("/rooms/r1"));
        assert!(!is_internal_link("rooms/r1"));
        assert!(!is_internal_link("https://evil.example"));
        assert!(!is_internal_link("//evil.example/phish"));
        assert!(!is_internal_link("/\\evil.example"));
    }

    fn notification(link: Option<&str>) -> Notification {
        Notification::new(
            CreateNotification {
                user_id: Uuid::new_v4(),
                title: "New bid".to_string(),
                description: "Someone outbid you".to_string(),
                link: link.map(str::to_string),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_mark_read_transitions_once() {
        let mut n = notification(None);
        let first = Utc::now();

        assert!(n.mark_read(first));
        assert!(n.is_read);
        assert_eq!(n.read_at, Some(first));

        let later = first + chrono::Duration::minutes(5);
        assert!(!n.mark_read(later));
        assert!(n.is_read);
        assert_eq!(n.read_at, Some(first));
    }

    #[test]
    fn test_navigation_target_uses_link() {
        assert_eq!(notification(Some("/rooms/r1")).navigation_target(), "/rooms/r1");
    }

    #[test]
    fn test_navigation_target_defaults_to_home() {
        assert_eq!(notification(None).navigation_target(), DEFAULT_REDIRECT);
        assert_eq!(notification(Some("")).navigation_target(), DEFAULT_REDIRECT);
    }

    #[test]
    fn test_new_notification_is_unread() {
        let n = notification(Some("/rooms/r1"));
        assert!(!n.is_read);
        assert!(n.read_at.is_none());
    }
}
