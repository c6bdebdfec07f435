//! The persistence collaborator contract.
//!
//! Every operation takes the owning `company_id` explicitly — tenant scoping
//! is threaded as an argument and enforced here at the boundary, never
//! resolved from ambient state. Implementations must also filter soft-deleted
//! rows out of every query; the algorithms above this trait only ever see
//! live rows.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use verdant_core::types::DateWindow;

use crate::error::StoreResult;
use crate::model::appointment::{Appointment, AppointmentWithProperty, NewAppointment};
use crate::model::property::Property;
use crate::model::schedule::Schedule;
use crate::model::service_type::ServiceType;
use crate::model::team::Team;

#[async_trait]
pub trait Datastore: Send + Sync {
    /// Active, live schedules whose own date bounds overlap `window`,
    /// in ascending id order.
    async fn schedules_due_for_generation(
        &self,
        company_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<Schedule>>;

    /// Whether a live appointment already occupies the
    /// (property, service type, date) uniqueness key.
    async fn appointment_exists(
        &self,
        company_id: Uuid,
        property_id: Uuid,
        service_type_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<bool>;

    /// Creates an appointment with `status = Scheduled`.
    ///
    /// ## Errors
    /// [`crate::error::StoreError::DuplicateAppointment`] if the uniqueness
    /// key is already taken.
    async fn create_appointment(
        &self,
        company_id: Uuid,
        new: NewAppointment,
    ) -> StoreResult<Appointment>;

    /// Live `Scheduled` appointments on `date` with no crew, joined with
    /// their properties, in ascending id order.
    async fn unassigned_scheduled_on(
        &self,
        company_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Vec<AppointmentWithProperty>>;

    /// Live, active teams in ascending id order.
    async fn active_teams(&self, company_id: Uuid) -> StoreResult<Vec<Team>>;

    /// Count of live appointments assigned to `team_id` on `date`,
    /// regardless of status.
    async fn count_team_appointments(
        &self,
        company_id: Uuid,
        team_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<u32>;

    async fn assign_appointment_to_team(
        &self,
        company_id: Uuid,
        appointment_id: Uuid,
        team_id: Uuid,
    ) -> StoreResult<()>;

    async fn property(
        &self,
        company_id: Uuid,
        property_id: Uuid,
    ) -> StoreResult<Option<Property>>;

    async fn service_type(
        &self,
        company_id: Uuid,
        service_type_id: Uuid,
    ) -> StoreResult<Option<ServiceType>>;
}
