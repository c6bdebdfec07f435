use thiserror::Error;

/// Store layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The (company, property, service type, date) uniqueness key is already
    /// taken by a live appointment. Generation treats this as "already
    /// exists, skip" rather than a failure.
    #[error(
        "Duplicate appointment: property={property_id}, service_type={service_type_id}, date={date}"
    )]
    DuplicateAppointment {
        property_id: uuid::Uuid,
        service_type_id: uuid::Uuid,
        date: chrono::NaiveDate,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    CoreError(#[from] verdant_core::error::CoreError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
