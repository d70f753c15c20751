use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::shared::enums::{
    parse_enum_field, ClosedEnum, Committee, CommitteeColor, MeetStatus, UserRole,
};
use crate::core::shared::record::{impl_record_try_from, Record};
use crate::core::shared::viewer::Viewer;
use crate::directory::users::User;
use crate::meet::types::Meet;
use crate::security::validation::{ValidationError, ValidationErrors, Validator};

pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const JOINED_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Stats
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommitteeStatsPayload")]
pub struct CommitteeStats {
    pub total_members: u32,
    pub coordinators: u32,
    pub sub_coordinators: u32,
    pub active_meets: u32,
    pub completed_meets: u32,
}

/// Counts arrive signed so a negative value is reported as a range error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommitteeStatsPayload {
    pub total_members: Option<i64>,
    pub coordinators: Option<i64>,
    pub sub_coordinators: Option<i64>,
    pub active_meets: Option<i64>,
    pub completed_meets: Option<i64>,
}

fn count(v: &mut Validator, value: Option<i64>, field: &str) -> u32 {
    let value = value.unwrap_or(0);
    let max = i64::from(u32::MAX);
    v.range(value, field, Some(0), Some(max));
    u32::try_from(value).unwrap_or(0)
}

impl Record for CommitteeStats {
    type Payload = CommitteeStatsPayload;

    fn from_payload(payload: CommitteeStatsPayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let stats = Self {
            total_members: count(&mut v, payload.total_members, "total_members"),
            coordinators: count(&mut v, payload.coordinators, "coordinators"),
            sub_coordinators: count(&mut v, payload.sub_coordinators, "sub_coordinators"),
            active_meets: count(&mut v, payload.active_meets, "active_meets"),
            completed_meets: count(&mut v, payload.completed_meets, "completed_meets"),
        };
        v.finish()?;
        Ok(stats)
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl_record_try_from!(CommitteeStats, CommitteeStatsPayload);

// ============================================================================
// Member
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommitteeMemberPayload")]
pub struct CommitteeMember {
    pub uid: String,
    pub name: String,
    pub role: UserRole,
    pub email: String,
    pub joined_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommitteeMemberPayload {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub joined_date: Option<String>,
}

fn parse_joined_date(value: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, JOINED_DATE_FORMAT).map_err(|_| ValidationError::InvalidValue {
        field: field.to_string(),
        message: format!("'{value}' is not a YYYY-MM-DD date"),
    })
}

impl CommitteeMember {
    pub fn from_user(user: &User) -> Self {
        Self {
            uid: user.uid.clone(),
            name: user.name.clone(),
            role: user.role,
            email: user.email.clone(),
            joined_date: None,
        }
    }
}

impl Record for CommitteeMember {
    type Payload = CommitteeMemberPayload;

    fn from_payload(payload: CommitteeMemberPayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();

        let uid = v.required_string(payload.uid, "uid");
        let name = v.required_string(payload.name, "name");
        let email = v.required_string(payload.email, "email");
        let role = v
            .required(payload.role, "role")
            .and_then(|r| v.check(parse_enum_field::<UserRole>(&r, "role")));
        let joined_date = payload
            .joined_date
            .and_then(|d| v.check(parse_joined_date(&d, "joined_date")));
        if let Some(email) = &email {
            v.email(email, "email");
        }

        v.finish()?;

        Ok(Self {
            uid: uid.ok_or_else(|| ValidationErrors::missing("uid"))?,
            name: name.ok_or_else(|| ValidationErrors::missing("name"))?,
            role: role.ok_or_else(|| ValidationErrors::missing("role"))?,
            email: email.ok_or_else(|| ValidationErrors::missing("email"))?,
            joined_date,
        })
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.string_required(&self.uid, "uid")
            .string_required(&self.name, "name")
            .email(&self.email, "email");
        v.finish()
    }
}

impl_record_try_from!(CommitteeMember, CommitteeMemberPayload);

// ============================================================================
// Create / Update
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommitteeCreatePayload")]
pub struct CommitteeCreate {
    pub name: Committee,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommitteeCreatePayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Record for CommitteeCreate {
    type Payload = CommitteeCreatePayload;

    fn from_payload(payload: CommitteeCreatePayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let name = v
            .required(payload.name, "name")
            .and_then(|n| v.check(parse_enum_field::<Committee>(&n, "name")));
        v.optional_length(payload.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS));
        v.finish()?;

        Ok(Self {
            name: name.ok_or_else(|| ValidationErrors::missing("name"))?,
            description: payload.description,
        })
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.optional_length(self.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS));
        v.finish()
    }
}

impl_record_try_from!(CommitteeCreate, CommitteeCreatePayload);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommitteeUpdatePayload")]
pub struct CommitteeUpdate {
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommitteeUpdatePayload {
    pub description: Option<String>,
}

impl Record for CommitteeUpdate {
    type Payload = CommitteeUpdatePayload;

    fn from_payload(payload: CommitteeUpdatePayload) -> Result<Self, ValidationErrors> {
        let update = Self {
            description: payload.description,
        };
        update.validate()?;
        Ok(update)
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.optional_length(self.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS));
        v.finish()
    }
}

impl_record_try_from!(CommitteeUpdate, CommitteeUpdatePayload);

// ============================================================================
// Info
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommitteeInfoPayload")]
pub struct CommitteeInfo {
    pub name: Committee,
    pub description: Option<String>,
    pub colour: CommitteeColor,
    pub stats: CommitteeStats,
    pub members: Vec<CommitteeMember>,
    pub coordinator_ids: Vec<String>,
    pub sub_coordinator_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommitteeInfoPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "color")]
    pub colour: Option<String>,
    pub stats: Option<CommitteeStatsPayload>,
    pub members: Vec<CommitteeMemberPayload>,
    pub coordinator_ids: Vec<String>,
    pub sub_coordinator_ids: Vec<String>,
}

impl CommitteeInfo {
    pub fn create_from_committee(committee: Committee, description: Option<String>) -> Self {
        Self {
            name: committee,
            description,
            colour: committee.color(),
            stats: CommitteeStats::default(),
            members: Vec::new(),
            coordinator_ids: Vec::new(),
            sub_coordinator_ids: Vec::new(),
        }
    }

    pub fn from_create(create: CommitteeCreate) -> Self {
        Self::create_from_committee(create.name, create.description)
    }

    /// Replaces membership with the COORD and SUBCORD users assigned to this
    /// committee, in roster order.
    pub fn with_roster(mut self, users: &[User]) -> Self {
        let assigned = users.iter().filter(|u| {
            u.is_in_committee(self.name) && matches!(u.role, UserRole::Coord | UserRole::Subcord)
        });

        self.members.clear();
        self.coordinator_ids.clear();
        self.sub_coordinator_ids.clear();
        for user in assigned {
            match user.role {
                UserRole::Coord => self.coordinator_ids.push(user.uid.clone()),
                _ => self.sub_coordinator_ids.push(user.uid.clone()),
            }
            self.members.push(CommitteeMember::from_user(user));
        }

        self.stats.total_members = saturating_count(self.members.len());
        self.stats.coordinators = saturating_count(self.coordinator_ids.len());
        self.stats.sub_coordinators = saturating_count(self.sub_coordinator_ids.len());
        self
    }

    /// Counts meetings created by someone on this committee.
    pub fn with_meet_counts(mut self, meets: &[Meet]) -> Self {
        let ours = meets.iter().filter(|m| self.has_member(&m.created_by));
        let (mut active, mut completed) = (0usize, 0usize);
        for meet in ours {
            if meet.is_active() {
                active += 1;
            } else if meet.status == MeetStatus::Completed {
                completed += 1;
            }
        }
        self.stats.active_meets = saturating_count(active);
        self.stats.completed_meets = saturating_count(completed);
        self
    }

    pub fn apply_update(&mut self, update: &CommitteeUpdate) -> Result<(), ValidationErrors> {
        update.validate()?;
        self.description = update.description.clone();
        Ok(())
    }

    pub fn is_coordinator(&self, user_id: &str) -> bool {
        self.coordinator_ids.iter().any(|id| id == user_id)
    }

    pub fn is_sub_coordinator(&self, user_id: &str) -> bool {
        self.sub_coordinator_ids.iter().any(|id| id == user_id)
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.is_coordinator(user_id) || self.is_sub_coordinator(user_id)
    }
}

fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl Record for CommitteeInfo {
    type Payload = CommitteeInfoPayload;

    fn from_payload(payload: CommitteeInfoPayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();

        let name = v
            .required(payload.name, "name")
            .and_then(|n| v.check(parse_enum_field::<Committee>(&n, "name")));
        let colour = payload
            .colour
            .and_then(|c| v.check(parse_enum_field::<CommitteeColor>(&c, "colour")));
        v.optional_length(payload.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS));

        let stats = match payload.stats {
            Some(stats) => v.nested("stats", CommitteeStats::from_payload(stats)),
            None => Some(CommitteeStats::default()),
        };
        let members: Vec<CommitteeMember> = payload
            .members
            .into_iter()
            .enumerate()
            .filter_map(|(i, m)| v.nested(&format!("members[{i}]"), CommitteeMember::from_payload(m)))
            .collect();

        v.finish()?;

        let name = name.ok_or_else(|| ValidationErrors::missing("name"))?;
        Ok(Self {
            name,
            description: payload.description,
            colour: colour.unwrap_or_else(|| name.color()),
            stats: stats.unwrap_or_default(),
            members,
            coordinator_ids: payload.coordinator_ids,
            sub_coordinator_ids: payload.sub_coordinator_ids,
        })
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.optional_length(self.description.as_deref(), "description", None, Some(DESCRIPTION_MAX_CHARS));
        for (i, member) in self.members.iter().enumerate() {
            v.nested(&format!("members[{i}]"), member.validate());
        }
        v.finish()
    }
}

impl_record_try_from!(CommitteeInfo, CommitteeInfoPayload);

// ============================================================================
// Viewer-relative response
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitteeResponse {
    #[serde(flatten)]
    pub info: CommitteeInfo,
    pub can_manage: bool,
    pub is_member: bool,
    pub user_role_in_committee: Option<UserRole>,
}

impl CommitteeResponse {
    pub fn from_info(info: &CommitteeInfo, viewer: &Viewer) -> Self {
        let is_coordinator = info.is_coordinator(&viewer.user_id);
        let is_sub_coordinator = info.is_sub_coordinator(&viewer.user_id);

        let user_role_in_committee = if is_coordinator {
            Some(UserRole::Coord)
        } else if is_sub_coordinator {
            Some(UserRole::Subcord)
        } else {
            None
        };

        Self {
            info: info.clone(),
            can_manage: viewer.is_fc() || is_coordinator,
            is_member: is_coordinator || is_sub_coordinator,
            user_role_in_committee,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub fn default_description(committee: Committee) -> &'static str {
    match committee {
        Committee::MarketingSponsorships => "Handle marketing campaigns and sponsor relationships",
        Committee::MediaPr => "Manage media coverage and public relations",
        Committee::EventsLogistics => "Organize events and handle logistics",
        Committee::Production => "Handle technical production and equipment",
        Committee::Design => "Create visual designs and branding materials",
        Committee::WebAppDev => "Develop and maintain website and mobile applications",
        Committee::RegistrationSecurity => "Manage registrations and security protocols",
        Committee::Hospitality => "Handle guest relations and hospitality services",
    }
}

/// One entry per committee, in catalog order, with its default description.
pub fn get_all_committees() -> Vec<CommitteeInfo> {
    Committee::ALL
        .iter()
        .map(|&c| CommitteeInfo::create_from_committee(c, Some(default_description(c).to_string())))
        .collect()
}
