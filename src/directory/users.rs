//! Organization member identity records.

use serde::{Deserialize, Serialize};

use crate::core::shared::enums::{parse_enum_field, Committee, CommitteeColor, UserRole};
use crate::core::shared::record::{impl_record_try_from, Record};
use crate::security::validation::{ValidationErrors, Validator};

pub const NAME_MAX_CHARS: usize = 100;

/// Identity record built from profile data.
///
/// `colour` follows `committee` through [`crate::core::shared::enums::COMMITTEE_COLOR_MAP`]
/// unless it was given explicitly. Hierarchy links are not stored here; see
/// [`crate::directory::tree::UserTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserPayload")]
pub struct User {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub committee: Option<Committee>,
    pub colour: Option<CommitteeColor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phoneNo")]
    pub phone: Option<String>,
    pub role: Option<String>,
    pub committee: Option<String>,
    #[serde(alias = "color")]
    pub colour: Option<String>,
}

impl User {
    pub fn new(
        uid: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        role: UserRole,
    ) -> Result<Self, ValidationErrors> {
        let user = Self {
            uid: uid.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            role,
            committee: None,
            colour: None,
        };
        user.validate()?;
        Ok(user)
    }

    /// Assigns the committee; the colour is derived unless already set.
    pub fn with_committee(mut self, committee: Committee) -> Self {
        self.committee = Some(committee);
        if self.colour.is_none() {
            self.colour = Some(committee.color());
        }
        self
    }

    /// Explicit colour override, kept even when it disagrees with the committee.
    pub fn with_colour(mut self, colour: CommitteeColor) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn is_in_committee(&self, committee: Committee) -> bool {
        self.committee == Some(committee)
    }
}

impl Record for User {
    type Payload = UserPayload;

    fn from_payload(payload: UserPayload) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();

        let uid = v.required_string(payload.uid, "uid");
        let name = v.required_string(payload.name, "name");
        let email = v.required_string(payload.email, "email");
        let phone = v.required_string(payload.phone, "phone");
        let role = v
            .required(payload.role, "role")
            .and_then(|r| v.check(parse_enum_field::<UserRole>(&r, "role")));
        let committee = payload
            .committee
            .and_then(|c| v.check(parse_enum_field::<Committee>(&c, "committee")));
        let colour = payload
            .colour
            .and_then(|c| v.check(parse_enum_field::<CommitteeColor>(&c, "colour")));

        if let Some(name) = &name {
            v.length(name, "name", Some(1), Some(NAME_MAX_CHARS));
        }
        if let Some(email) = &email {
            v.email(email, "email");
        }
        if let Some(phone) = &phone {
            v.phone(phone, "phone");
        }

        v.finish()?;

        let mut user = Self {
            uid: uid.ok_or_else(|| ValidationErrors::missing("uid"))?,
            name: name.ok_or_else(|| ValidationErrors::missing("name"))?,
            email: email.ok_or_else(|| ValidationErrors::missing("email"))?,
            phone: phone.ok_or_else(|| ValidationErrors::missing("phone"))?,
            role: role.ok_or_else(|| ValidationErrors::missing("role"))?,
            committee: None,
            colour,
        };
        if let Some(committee) = committee {
            user = user.with_committee(committee);
        }
        Ok(user)
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.string_required(&self.uid, "uid")
            .string_required(&self.name, "name")
            .length(&self.name, "name", Some(1), Some(NAME_MAX_CHARS))
            .email(&self.email, "email")
            .phone(&self.phone, "phone");
        v.finish()
    }
}

impl_record_try_from!(User, UserPayload);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::enums::{ClosedEnum, COMMITTEE_COLOR_MAP};
    use crate::core::shared::record::RecordError;
    use serde_json::json;

    fn coord_json() -> serde_json::Value {
        json!({
            "uid": "u-42",
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "+919876543210",
            "role": "COORD",
            "committee": "Web and App Dev"
        })
    }

    #[test]
    fn test_colour_derived_from_committee() {
        for (committee, colour) in COMMITTEE_COLOR_MAP {
            let mut value = coord_json();
            value["committee"] = json!(committee.as_str());
            let user = User::from_value(value).unwrap();
            assert_eq!(user.colour, Some(colour));
        }
    }

    #[test]
    fn test_explicit_colour_is_kept() {
        let mut value = coord_json();
        value["colour"] = json!("pink");
        let user = User::from_value(value).unwrap();
        assert_eq!(user.committee, Some(Committee::WebAppDev));
        assert_eq!(user.colour, Some(CommitteeColor::Pink));
    }

    #[test]
    fn test_no_committee_means_no_colour() {
        let mut value = coord_json();
        value["committee"] = serde_json::Value::Null;
        let user = User::from_value(value).unwrap();
        assert_eq!(user.committee, None);
        assert_eq!(user.colour, None);
    }

    #[test]
    fn test_legacy_field_names() {
        let user = User::from_value(json!({
            "uid": "u-1",
            "name": "Ravi",
            "email": "ravi@example.com",
            "phoneNo": "9876543210",
            "role": "Subcord",
            "color": "teal"
        }))
        .unwrap();
        assert_eq!(user.phone, "9876543210");
        assert_eq!(user.role, UserRole::Subcord);
        assert_eq!(user.colour, Some(CommitteeColor::Teal));
    }

    #[test]
    fn test_bad_phones_rejected() {
        for phone in ["", "0123456", "+0", "12a456", "+", "1234567890123456", "+91 98765", "+1٢٣"] {
            let mut value = coord_json();
            value["phone"] = json!(phone);
            let err = User::from_value(value).unwrap_err();
            let errors = err.validation_errors().expect("validation error");
            assert!(errors.has_error_for("phone"), "{phone:?} should be rejected");
        }
    }

    #[test]
    fn test_every_bad_field_reported() {
        let err = User::from_value(json!({
            "name": "",
            "email": "not-an-email",
            "phone": "12",
            "role": "CEO",
            "committee": "Catering"
        }))
        .unwrap_err();

        let errors = err.validation_errors().unwrap();
        assert!(errors.has_error_for("uid"));
        assert!(errors.has_error_for("name"));
        assert!(errors.has_error_for("email"));
        assert!(errors.has_error_for("role"));
        assert!(errors.has_error_for("committee"));
        assert!(!errors.has_error_for("phone"));
    }

    #[test]
    fn test_wrong_json_type_is_decode_error() {
        let mut value = coord_json();
        value["uid"] = json!(42);
        assert!(matches!(User::from_value(value), Err(RecordError::Decode(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let user = User::from_value(coord_json()).unwrap();
        let encoded = user.to_json().unwrap();
        assert!(encoded.contains("\"role\":\"COORD\""));
        assert!(encoded.contains("\"colour\":\"teal\""));

        let decoded: User = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn test_serde_decode_validates() {
        let mut value = coord_json();
        value["email"] = json!("nope");
        assert!(serde_json::from_value::<User>(value).is_err());
    }

    #[test]
    fn test_constructor_and_builders() {
        let user = User::new("u-9", "Meera", "meera@example.com", "+14155550100", UserRole::Subcord)
            .unwrap()
            .with_committee(Committee::Design);
        assert_eq!(user.colour, Some(CommitteeColor::Orange));
        assert!(user.is_in_committee(Committee::Design));

        let overridden = user.with_colour(CommitteeColor::Red);
        assert_eq!(overridden.colour, Some(CommitteeColor::Red));

        assert!(User::new("u-9", "Meera", "meera@example.com", "phone", UserRole::Fc).is_err());
    }
}
