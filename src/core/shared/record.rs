//! Decoding raw JSON into validated records.
//!
//! Every record has a lenient payload twin: required fields are `Option`,
//! enum fields are plain strings. Decoding goes payload first, then
//! validation, so a caller gets one error per bad field instead of the first
//! serde failure.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::security::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl RecordError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Decode(_) => None,
        }
    }
}

pub trait Record: Sized + Serialize {
    type Payload: DeserializeOwned;

    fn from_payload(payload: Self::Payload) -> Result<Self, ValidationErrors>;

    /// Re-checks an in-memory record, e.g. after fields were set directly.
    fn validate(&self) -> Result<(), ValidationErrors>;

    fn from_value(value: Value) -> Result<Self, RecordError> {
        let payload: Self::Payload = serde_json::from_value(value)?;
        Ok(Self::from_payload(payload)?)
    }

    fn from_json(json: &str) -> Result<Self, RecordError> {
        let payload: Self::Payload = serde_json::from_str(json)?;
        Ok(Self::from_payload(payload)?)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Lets serde decode a record through its payload (`#[serde(try_from)]`),
/// so records nested in other JSON are validated too.
macro_rules! impl_record_try_from {
    ($record:ty, $payload:ty) => {
        impl TryFrom<$payload> for $record {
            type Error = $crate::security::validation::ValidationErrors;

            fn try_from(payload: $payload) -> Result<Self, Self::Error> {
                <$record as $crate::core::shared::record::Record>::from_payload(payload)
            }
        }
    };
}

pub(crate) use impl_record_try_from;
