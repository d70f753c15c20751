pub mod enums;
pub mod error;
pub mod record;
pub mod state;
pub mod viewer;

pub use enums::{ClosedEnum, Committee, CommitteeColor, MeetStatus, MeetType, UserRole};
pub use error::ApiError;
pub use record::{Record, RecordError};
pub use state::AppState;
pub use viewer::Viewer;
