use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::shared::enums::{parse_enum_field, MeetStatus, MeetType};
use crate::core::shared::record::{impl_record_try_from, Record};
use crate::core::shared::viewer::Viewer;
use crate::security::validation::{ValidationErrors, Validator};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const LOCATION_MAX_CHARS: usize = 200;
pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 480;
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

// ============================================================================
// Base fields
// ============================================================================

/// Fields shared by every meeting shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MeetBasePayload")]
pub struct MeetBase {
    pub title: String,
    pub description: Option<String>,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub meet_type: MeetType,
    pub location: Option<String>,
    pub is_virtual: bool,
    pub meeting_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeetBasePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub meet_type: Option<String>,
    pub location: Option<String>,
    pub is_virtual: Option<bool>,
    pub meeting_link: Option<String>,
}

fn check_title(v: &mut Validator, title: &str) {
    v.length(title, "title", Some(1), Some(TITLE_MAX_CHARS));
}

fn check_duration(v: &mut Validator, minutes: i64) -> Option<u32> {
    v.range(
        minutes,
        "duration_minutes",
        Some(MIN_DURATION_MINUTES),
        Some(MAX_DURATION_MINUTES),
    );
    if (MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&minutes) {
        u32::try_from(minutes).ok()
    } else {
        None
    }
}

impl MeetBase {
    pub fn new(title: impl Into<String>, scheduled_time: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let base = Self {
            title: title.into(),
            description: None,
            scheduled_time,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            meet_type: MeetType::default(),
            location: None,
            is_virtual: false,
            meeting_link: None,
        };
        base.validate()?;
        Ok(base)
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_time + chrono::Duration::minutes(i64::from(self.duration_minutes))
    }
}

impl Record for MeetBase {
    type Payload = MeetBasePayload;

    fn from_payload(payload: MeetBasePayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();

        let title = v.required(payload.title, "title");
        if let Some(title) = &title {
            check_title(&mut v, title);
        }
        let scheduled_time = v.required(payload.scheduled_time, "scheduled_time");
        let duration_minutes = match payload.duration_minutes {
            Some(minutes) => check_duration(&mut v, minutes),
            None => Some(DEFAULT_DURATION_MINUTES),
        };
        let meet_type = match payload.meet_type {
            Some(t) => v.check(parse_enum_field::<MeetType>(&t, "meet_type")),
            None => Some(MeetType::default()),
        };
        v.optional_length(payload.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS))
            .optional_length(payload.location.as_deref(), "location", None, Some(LOCATION_MAX_CHARS));

        v.finish()?;

        Ok(Self {
            title: title.ok_or_else(|| ValidationErrors::missing("title"))?,
            description: payload.description,
            scheduled_time: scheduled_time
                .ok_or_else(|| ValidationErrors::missing("scheduled_time"))?,
            duration_minutes: duration_minutes
                .ok_or_else(|| ValidationErrors::missing("duration_minutes"))?,
            meet_type: meet_type.ok_or_else(|| ValidationErrors::missing("meet_type"))?,
            location: payload.location,
            is_virtual: payload.is_virtual.unwrap_or(false),
            meeting_link: payload.meeting_link,
        })
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        check_title(&mut v, &self.title);
        check_duration(&mut v, i64::from(self.duration_minutes));
        v.optional_length(self.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS))
            .optional_length(self.location.as_deref(), "location", None, Some(LOCATION_MAX_CHARS));
        v.finish()
    }
}

impl_record_try_from!(MeetBase, MeetBasePayload);

// ============================================================================
// Create / Update
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MeetCreatePayload")]
pub struct MeetCreate {
    #[serde(flatten)]
    pub base: MeetBase,
    pub attendee_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeetCreatePayload {
    #[serde(flatten)]
    pub base: MeetBasePayload,
    pub attendee_ids: Vec<String>,
}

impl Record for MeetCreate {
    type Payload = MeetCreatePayload;

    fn from_payload(payload: MeetCreatePayload) -> Result<Self, ValidationErrors> {
        Ok(Self {
            base: MeetBase::from_payload(payload.base)?,
            attendee_ids: payload.attendee_ids,
        })
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        self.base.validate()
    }
}

impl_record_try_from!(MeetCreate, MeetCreatePayload);

/// Partial patch: absent fields leave the meeting untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MeetUpdatePayload")]
pub struct MeetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MeetStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeetUpdatePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub location: Option<String>,
    pub is_virtual: Option<bool>,
    pub meeting_link: Option<String>,
    pub status: Option<String>,
}

impl MeetUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Record for MeetUpdate {
    type Payload = MeetUpdatePayload;

    fn from_payload(payload: MeetUpdatePayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();

        if let Some(title) = &payload.title {
            check_title(&mut v, title);
        }
        let duration_minutes = payload
            .duration_minutes
            .and_then(|minutes| check_duration(&mut v, minutes));
        let status = payload
            .status
            .and_then(|s| v.check(parse_enum_field::<MeetStatus>(&s, "status")));
        v.optional_length(payload.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS))
            .optional_length(payload.location.as_deref(), "location", None, Some(LOCATION_MAX_CHARS));

        v.finish()?;

        Ok(Self {
            title: payload.title,
            description: payload.description,
            scheduled_time: payload.scheduled_time,
            duration_minutes,
            location: payload.location,
            is_virtual: payload.is_virtual,
            meeting_link: payload.meeting_link,
            status,
        })
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            check_title(&mut v, title);
        }
        if let Some(minutes) = self.duration_minutes {
            check_duration(&mut v, i64::from(minutes));
        }
        v.optional_length(self.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS))
            .optional_length(self.location.as_deref(), "location", None, Some(LOCATION_MAX_CHARS));
        v.finish()
    }
}

impl_record_try_from!(MeetUpdate, MeetUpdatePayload);

// ============================================================================
// Meet
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MeetPayload")]
pub struct Meet {
    pub meet_id: String,
    #[serde(flatten)]
    pub base: MeetBase,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub status: MeetStatus,
    pub attendee_ids: Vec<String>,
    pub actual_attendees: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MeetPayload {
    pub meet_id: Option<String>,
    #[serde(flatten)]
    pub base: MeetBasePayload,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub attendee_ids: Vec<String>,
    pub actual_attendees: Vec<String>,
    pub notes: Option<String>,
}

impl Meet {
    /// A new, scheduled meeting created by `created_by` right now.
    pub fn from_create(
        create: MeetCreate,
        meet_id: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Result<Self, ValidationErrors> {
        let meet = Self {
            meet_id: meet_id.into(),
            base: create.base,
            created_by: created_by.into(),
            created_at: Utc::now(),
            status: MeetStatus::default(),
            attendee_ids: create.attendee_ids,
            actual_attendees: Vec::new(),
            notes: None,
        };
        meet.validate()?;
        Ok(meet)
    }

    /// Applies every present field of `update`. On error the meeting is left
    /// unchanged.
    pub fn apply_update(&mut self, update: &MeetUpdate) -> Result<(), ValidationErrors> {
        update.validate()?;

        let mut patched = self.clone();
        if let Some(title) = &update.title {
            patched.base.title = title.clone();
        }
        if let Some(description) = &update.description {
            patched.base.description = Some(description.clone());
        }
        if let Some(scheduled_time) = update.scheduled_time {
            patched.base.scheduled_time = scheduled_time;
        }
        if let Some(minutes) = update.duration_minutes {
            patched.base.duration_minutes = minutes;
        }
        if let Some(location) = &update.location {
            patched.base.location = Some(location.clone());
        }
        if let Some(is_virtual) = update.is_virtual {
            patched.base.is_virtual = is_virtual;
        }
        if let Some(link) = &update.meeting_link {
            patched.base.meeting_link = Some(link.clone());
        }
        if let Some(status) = update.status {
            patched.status = status;
        }

        patched.validate()?;
        *self = patched;
        Ok(())
    }

    pub fn is_invited(&self, user_id: &str) -> bool {
        self.attendee_ids.iter().any(|id| id == user_id)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl Record for Meet {
    type Payload = MeetPayload;

    fn from_payload(payload: MeetPayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();

        let meet_id = v.required_string(payload.meet_id, "meet_id");
        let created_by = v.required_string(payload.created_by, "created_by");
        let status = match payload.status {
            Some(s) => v.check(parse_enum_field::<MeetStatus>(&s, "status")),
            None => Some(MeetStatus::default()),
        };
        let base = v.nested("", MeetBase::from_payload(payload.base));

        v.finish()?;

        Ok(Self {
            meet_id: meet_id.ok_or_else(|| ValidationErrors::missing("meet_id"))?,
            base: base.ok_or_else(|| ValidationErrors::missing("title"))?,
            created_by: created_by.ok_or_else(|| ValidationErrors::missing("created_by"))?,
            created_at: payload.created_at.unwrap_or_else(Utc::now),
            status: status.ok_or_else(|| ValidationErrors::missing("status"))?,
            attendee_ids: payload.attendee_ids,
            actual_attendees: payload.actual_attendees,
            notes: payload.notes,
        })
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.string_required(&self.meet_id, "meet_id")
            .string_required(&self.created_by, "created_by");
        v.nested("", self.base.validate());
        v.finish()
    }
}

impl_record_try_from!(Meet, MeetPayload);

// ============================================================================
// Viewer-relative response
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetResponse {
    #[serde(flatten)]
    pub meet: Meet,
    pub can_edit: bool,
    pub can_join: bool,
}

impl MeetResponse {
    pub fn from_meet(meet: &Meet, viewer: &Viewer) -> Self {
        Self {
            meet: meet.clone(),
            can_edit: meet.created_by == viewer.user_id,
            can_join: meet.is_invited(&viewer.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::record::RecordError;
    use serde_json::json;

    fn meet_json() -> serde_json::Value {
        json!({
            "meet_id": "meet_123",
            "title": "Weekly Committee Meeting",
            "description": "Discussion about upcoming events",
            "scheduled_time": "2025-01-15T10:00:00Z",
            "duration_minutes": 60,
            "meet_type": "committee",
            "location": "Conference Room A",
            "is_virtual": false,
            "meeting_link": null,
            "created_by": "u1",
            "status": "scheduled",
            "attendee_ids": ["u1", "u3"],
            "actual_attendees": [],
            "notes": null
        })
    }

    fn invalid_fields(value: serde_json::Value) -> ValidationErrors {
        match Meet::from_value(value) {
            Err(RecordError::Invalid(errors)) => errors,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_meet() {
        let meet = Meet::from_value(meet_json()).unwrap();
        assert_eq!(meet.base.meet_type, MeetType::Committee);
        assert_eq!(meet.status, MeetStatus::Scheduled);
        assert_eq!(meet.base.duration_minutes, 60);
        assert!(meet.is_invited("u3"));
        assert!(meet.is_active());
    }

    #[test]
    fn test_defaults_applied() {
        let meet = Meet::from_value(json!({
            "meet_id": "m1",
            "title": "Standup",
            "scheduled_time": "2025-03-01T09:00:00Z",
            "created_by": "u1"
        }))
        .unwrap();
        assert_eq!(meet.base.duration_minutes, DEFAULT_DURATION_MINUTES);
        assert_eq!(meet.base.meet_type, MeetType::General);
        assert_eq!(meet.status, MeetStatus::Scheduled);
        assert!(!meet.base.is_virtual);
        assert!(meet.attendee_ids.is_empty());
        assert!(meet.created_at <= Utc::now());
    }

    #[test]
    fn test_duration_bounds_inclusive() {
        for (minutes, ok) in [(14, false), (15, true), (480, true), (481, false), (-30, false)] {
            let mut value = meet_json();
            value["duration_minutes"] = json!(minutes);
            assert_eq!(Meet::from_value(value).is_ok(), ok, "duration {minutes}");
        }
    }

    #[test]
    fn test_string_bounds() {
        let mut value = meet_json();
        value["title"] = json!("");
        value["description"] = json!("d".repeat(DESCRIPTION_MAX_CHARS + 1));
        value["location"] = json!("l".repeat(LOCATION_MAX_CHARS + 1));
        let errors = invalid_fields(value);
        assert!(errors.has_error_for("title"));
        assert!(errors.has_error_for("description"));
        assert!(errors.has_error_for("location"));

        let mut value = meet_json();
        value["title"] = json!("t".repeat(TITLE_MAX_CHARS));
        assert!(Meet::from_value(value).is_ok());
    }

    #[test]
    fn test_missing_and_unknown_fields() {
        let mut value = meet_json();
        value.as_object_mut().unwrap().remove("scheduled_time");
        value.as_object_mut().unwrap().remove("meet_id");
        value["status"] = json!("postponed");
        value["meet_type"] = json!("party");
        let errors = invalid_fields(value);
        assert!(errors.has_error_for("scheduled_time"));
        assert!(errors.has_error_for("meet_id"));
        assert!(errors.has_error_for("status"));
        assert!(errors.has_error_for("meet_type"));
    }

    #[test]
    fn test_json_round_trip() {
        let meet = Meet::from_value(meet_json()).unwrap();
        let encoded = serde_json::to_value(&meet).unwrap();
        assert_eq!(encoded["meet_type"], "committee");
        assert_eq!(encoded["status"], "scheduled");
        assert_eq!(encoded["title"], "Weekly Committee Meeting");

        let decoded: Meet = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, meet);
    }

    #[test]
    fn test_create_round_trip() {
        let create = MeetCreate::from_value(json!({
            "title": "Budget review",
            "description": "Q3 numbers",
            "scheduled_time": "2025-03-10T09:00:00Z",
            "duration_minutes": 90,
            "meet_type": "general",
            "location": "Room 4",
            "attendee_ids": ["u1", "u2"]
        }))
        .unwrap();

        let encoded = serde_json::to_value(&create).unwrap();
        assert_eq!(encoded["title"], "Budget review");
        assert_eq!(encoded["attendee_ids"], json!(["u1", "u2"]));
        let decoded: MeetCreate = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, create);
    }

    #[test]
    fn test_update_round_trip() {
        let partial = MeetUpdate::from_value(json!({ "title": "Renamed", "duration_minutes": 45 })).unwrap();
        let full = MeetUpdate::from_value(json!({
            "title": "Renamed",
            "description": "Moved online",
            "scheduled_time": "2025-03-11T10:00:00Z",
            "duration_minutes": 120,
            "location": "Online",
            "is_virtual": true,
            "meeting_link": "https://meet.example.com/xyz",
            "status": "cancelled"
        }))
        .unwrap();

        for update in [MeetUpdate::default(), partial, full] {
            let encoded = serde_json::to_value(&update).unwrap();
            let decoded: MeetUpdate = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, update);
        }
        assert_eq!(serde_json::to_value(MeetUpdate::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_create_then_meet() {
        let create = MeetCreate::from_value(json!({
            "title": "Sponsor sync",
            "scheduled_time": "2025-02-01T15:30:00Z",
            "duration_minutes": 30,
            "meet_type": "one_on_one",
            "is_virtual": true,
            "meeting_link": "https://meet.example.com/abc",
            "attendee_ids": ["u2"]
        }))
        .unwrap();

        let meet = Meet::from_create(create, "m-7", "u1").unwrap();
        assert_eq!(meet.status, MeetStatus::Scheduled);
        assert_eq!(meet.created_by, "u1");
        assert_eq!(meet.attendee_ids, vec!["u2".to_string()]);
        assert!(meet.actual_attendees.is_empty());
        assert_eq!(
            meet.base.ends_at(),
            meet.base.scheduled_time + chrono::Duration::minutes(30)
        );

        let create = MeetCreate::from_value(json!({
            "title": "x",
            "scheduled_time": "2025-02-01T15:30:00Z"
        }))
        .unwrap();
        assert!(Meet::from_create(create, "", "u1").is_err());
    }

    #[test]
    fn test_update_patches_only_present_fields() {
        let mut meet = Meet::from_value(meet_json()).unwrap();
        let update = MeetUpdate::from_value(json!({
            "title": "Renamed",
            "status": "in_progress"
        }))
        .unwrap();

        meet.apply_update(&update).unwrap();
        assert_eq!(meet.base.title, "Renamed");
        assert_eq!(meet.status, MeetStatus::InProgress);
        assert_eq!(meet.base.duration_minutes, 60);
        assert_eq!(meet.base.location.as_deref(), Some("Conference Room A"));
    }

    #[test]
    fn test_update_bounds() {
        let err = MeetUpdate::from_value(json!({ "duration_minutes": 10 })).unwrap_err();
        assert!(err.validation_errors().unwrap().has_error_for("duration_minutes"));

        let empty = MeetUpdate::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));

        let mut meet = Meet::from_value(meet_json()).unwrap();
        let before = meet.clone();
        let bad = MeetUpdate {
            title: Some(String::new()),
            ..MeetUpdate::default()
        };
        assert!(meet.apply_update(&bad).is_err());
        assert_eq!(meet, before);
    }

    #[test]
    fn test_response_flags() {
        let meet = Meet::from_value(meet_json()).unwrap();

        let creator = MeetResponse::from_meet(&meet, &Viewer::new("u1", None));
        assert!(creator.can_edit);
        assert!(creator.can_join);

        let outsider = MeetResponse::from_meet(&meet, &Viewer::new("u2", None));
        assert!(!outsider.can_edit);
        assert!(!outsider.can_join);

        let invitee = MeetResponse::from_meet(&meet, &Viewer::new("u3", None));
        assert!(!invitee.can_edit);
        assert!(invitee.can_join);

        let wire = serde_json::to_value(&invitee).unwrap();
        assert_eq!(wire["meet_id"], "meet_123");
        assert_eq!(wire["can_join"], true);
    }
}
