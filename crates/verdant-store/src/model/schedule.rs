use chrono::NaiveDate;
use verdant_core::types::Recurrence;

/// Declarative rule describing when a property/service pairing recurs.
///
/// Created and edited by the administrative surface; read-only to the
/// generation core. Appointments reference it by id but may outlive it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub id: uuid::Uuid,
    pub company_id: uuid::Uuid,
    pub property_id: uuid::Uuid,
    pub service_type_id: uuid::Uuid,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    /// Inclusive upper bound; absent = open-ended.
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Insert struct for creating new schedules
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub property_id: uuid::Uuid,
    pub service_type_id: uuid::Uuid,
    pub recurrence: Recurrence,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}
