use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    StoreError(#[from] verdant_store::error::StoreError),

    #[error(transparent)]
    CoreError(#[from] verdant_core::error::CoreError),

    /// Nothing to assign on the target date.
    #[error("No unassigned appointments scheduled for {date}")]
    NoUnassignedAppointments { date: chrono::NaiveDate },

    /// Assignment requested while no live active team exists.
    #[error("No active teams available for assignment")]
    NoActiveTeams,

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
