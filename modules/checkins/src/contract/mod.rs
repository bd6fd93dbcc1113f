pub mod client;
pub mod error;
pub mod model;

pub use client::CheckInsApi;
pub use error::CheckInsError;
pub use model::{
    CheckIn, CheckInOutcome, Identity, PowerTier, TimelineDay, User, UserId, UserStats, UserStatus,
};
