use serde::{Deserialize, Serialize};

pub mod advent_box;
pub mod error;
pub mod gate;
pub mod image_cache;
pub mod lightbox;
pub mod timeline;

pub use advent_box::{AdventBox, BoxState, ClickOutcome, RevealPlan, RevealStep, RevealTimings};
pub use error::{ensure_authorized, ensure_success, ApiError};
pub use gate::{BoxLayout, DateGate};
pub use image_cache::{ImageCache, ImageKey, ImageLookup};
pub use lightbox::{
    CloseTicket, Lightbox, LightboxPhase, ModalEffects, ModalSession, FADE_OUT_MS, PLACEHOLDER_IMAGE,
};
pub use timeline::{TaskId, Timeline};

/// One day of a calendar as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day: u32,
    pub is_open: bool,
}

/// A user's calendar. The client copy is read-only and may be stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: i64,
    pub name: String,
    pub days: Vec<CalendarDay>,
}

impl Calendar {
    pub fn day(&self, day: u32) -> Option<&CalendarDay> {
        self.days.iter().find(|d| d.day == day)
    }

    /// Unknown days count as closed
    pub fn is_day_open(&self, day: u32) -> bool {
        self.day(day).map(|d| d.is_open).unwrap_or(false)
    }

    pub fn opened_count(&self) -> usize {
        self.days.iter().filter(|d| d.is_open).count()
    }

    /// Record a backend-confirmed open. Returns false when the day is not part of this calendar.
    pub fn mark_open(&mut self, day: u32) -> bool {
        match self.days.iter_mut().find(|d| d.day == day) {
            Some(entry) => {
                entry.is_open = true;
                true
            }
            None => false,
        }
    }

    pub fn days_sorted(&self) -> Vec<CalendarDay> {
        let mut days = self.days.clone();
        days.sort_by_key(|d| d.day);
        days
    }
}

/// Credentials posted to `/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User record returned by `/login` and `/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub is_admin: bool,
    #[serde(default)]
    pub calendar_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// The signed-in user as seen by the UI: a display name plus the bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub name: String,
    pub token: String,
}

impl From<LoginResponse> for AuthUser {
    fn from(response: LoginResponse) -> Self {
        Self {
            name: response.user.name,
            token: response.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_calendar() -> Calendar {
        Calendar {
            id: 1,
            name: "Lea".to_string(),
            days: vec![
                CalendarDay { day: 3, is_open: false },
                CalendarDay { day: 1, is_open: true },
                CalendarDay { day: 2, is_open: false },
            ],
        }
    }

    #[test]
    fn test_calendar_deserializes_backend_shape() {
        let json = r#"{"id": 7, "name": "Family", "days": [{"day": 1, "is_open": true}, {"day": 2, "is_open": false}]}"#;
        let calendar: Calendar = serde_json::from_str(json).unwrap();

        assert_eq!(calendar.id, 7);
        assert_eq!(calendar.name, "Family");
        assert_eq!(calendar.days.len(), 2);
        assert!(calendar.is_day_open(1));
        assert!(!calendar.is_day_open(2));
    }

    #[test]
    fn test_unknown_day_is_closed() {
        let calendar = sample_calendar();
        assert!(!calendar.is_day_open(24));
        assert!(calendar.day(24).is_none());
    }

    #[test]
    fn test_mark_open() {
        let mut calendar = sample_calendar();
        assert_eq!(calendar.opened_count(), 1);

        assert!(calendar.mark_open(2));
        assert!(calendar.is_day_open(2));
        assert_eq!(calendar.opened_count(), 2);

        // Marking twice changes nothing
        assert!(calendar.mark_open(2));
        assert_eq!(calendar.opened_count(), 2);

        assert!(!calendar.mark_open(25));
    }

    #[test]
    fn test_days_sorted() {
        let days: Vec<u32> = sample_calendar().days_sorted().iter().map(|d| d.day).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn test_login_response_into_auth_user() {
        let json = r#"{
            "token": "abc.def",
            "user": {"id": 3, "username": "lea", "name": "Lea", "is_admin": false}
        }"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user.calendar_id, None);

        let user = AuthUser::from(response);
        assert_eq!(user.name, "Lea");
        assert_eq!(user.token, "abc.def");
    }
}
