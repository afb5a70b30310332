//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod activity;
pub mod chat;
pub mod fridge;
pub mod pdv;
pub mod user;
pub mod weight;

pub use activity::{ActivityRecord, ActivityRepository, DailyCalories};
pub use chat::{ChatMessageRecord, ChatRepository};
pub use fridge::FridgeRepository;
pub use pdv::{CreatePdvSnapshot, PdvRepository, PdvSnapshotRecord};
pub use user::{UpdateUserProfile, UserRecord, UserRepository};
pub use weight::{WeightLogRecord, WeightRepository};

/// Whether an error was raised by a UNIQUE constraint
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|e| e.is_unique_violation())
}
