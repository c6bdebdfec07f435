use chrono::{NaiveDate, NaiveTime};
use verdant_core::types::AppointmentStatus;

use crate::model::property::Property;

/// One concrete dated service instance generated from a schedule.
///
/// A live appointment is unique per
/// `(company_id, property_id, service_type_id, scheduled_date)` — the store
/// enforces the key, which is what makes generation idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: uuid::Uuid,
    pub company_id: uuid::Uuid,
    /// Nullable back-reference: an appointment survives its schedule.
    pub schedule_id: Option<uuid::Uuid>,
    pub property_id: uuid::Uuid,
    pub service_type_id: uuid::Uuid,
    pub team_id: Option<uuid::Uuid>,
    pub route_order: Option<i32>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub status: AppointmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// An appointment joined with its owning property, as dispatch consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentWithProperty {
    pub appointment: Appointment,
    pub property: Property,
}

/// Insert struct for creating new appointments
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub schedule_id: Option<uuid::Uuid>,
    pub property_id: uuid::Uuid,
    pub service_type_id: uuid::Uuid,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
}
