//! In-process [`Datastore`] implementation.
//!
//! Backs the CLI driver and the test suites. Rows live in id-keyed BTreeMaps;
//! ids are time-ordered v7 UUIDs, so ascending-key iteration is creation
//! order, which gives every query the stable iteration order the dispatch
//! algorithms depend on.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;
use verdant_core::types::{AppointmentStatus, DateWindow};

use crate::error::{StoreError, StoreResult};
use crate::model::appointment::{Appointment, AppointmentWithProperty, NewAppointment};
use crate::model::property::{NewProperty, Property};
use crate::model::schedule::{NewSchedule, Schedule};
use crate::model::service_type::{NewServiceType, ServiceType};
use crate::model::team::{NewTeam, Team};
use crate::store::Datastore;

/// Uniqueness key for live appointments.
type AppointmentKey = (Uuid, Uuid, Uuid, NaiveDate);

#[derive(Debug, Default)]
struct State {
    schedules: BTreeMap<Uuid, Schedule>,
    appointments: BTreeMap<Uuid, Appointment>,
    teams: BTreeMap<Uuid, Team>,
    properties: BTreeMap<Uuid, Property>,
    service_types: BTreeMap<Uuid, ServiceType>,
    appointment_keys: HashSet<AppointmentKey>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a property. Seeding stands in for the administrative surface
    /// and the upstream geocoding collaborator.
    pub fn insert_property(&self, company_id: Uuid, new: &NewProperty<'_>) -> Property {
        let property = Property {
            id: Uuid::now_v7(),
            company_id,
            address: new.address.to_string(),
            latitude: new.latitude,
            longitude: new.longitude,
            geocoding_failed: new.geocoding_failed,
            created_at: chrono::Utc::now(),
            deleted_at: None,
        };
        self.state()
            .properties
            .insert(property.id, property.clone());
        property
    }

    pub fn insert_service_type(
        &self,
        company_id: Uuid,
        new: &NewServiceType<'_>,
    ) -> ServiceType {
        let service_type = ServiceType {
            id: Uuid::now_v7(),
            company_id,
            name: new.name.to_string(),
            created_at: chrono::Utc::now(),
            deleted_at: None,
        };
        self.state()
            .service_types
            .insert(service_type.id, service_type.clone());
        service_type
    }

    pub fn insert_team(&self, company_id: Uuid, new: &NewTeam<'_>) -> Team {
        let team = Team {
            id: Uuid::now_v7(),
            company_id,
            name: new.name.to_string(),
            is_active: new.is_active,
            max_daily_appointments: new.max_daily_appointments,
            created_at: chrono::Utc::now(),
            deleted_at: None,
        };
        self.state().teams.insert(team.id, team.clone());
        team
    }

    pub fn insert_schedule(&self, company_id: Uuid, new: NewSchedule) -> Schedule {
        let schedule = Schedule {
            id: Uuid::now_v7(),
            company_id,
            property_id: new.property_id,
            service_type_id: new.service_type_id,
            recurrence: new.recurrence,
            start_date: new.start_date,
            end_date: new.end_date,
            is_active: new.is_active,
            created_at: chrono::Utc::now(),
            deleted_at: None,
        };
        self.state()
            .schedules
            .insert(schedule.id, schedule.clone());
        schedule
    }

    /// Soft-deletes a schedule on behalf of the administrative surface.
    ///
    /// ## Errors
    /// [`StoreError::NotFound`] if no live schedule matches.
    pub fn soft_delete_schedule(
        &self,
        company_id: Uuid,
        schedule_id: Uuid,
    ) -> StoreResult<()> {
        let mut state = self.state();
        let schedule = state
            .schedules
            .get_mut(&schedule_id)
            .filter(|s| s.company_id == company_id && s.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound(format!("schedule {schedule_id}")))?;
        schedule.deleted_at = Some(chrono::Utc::now());
        Ok(())
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn schedules_due_for_generation(
        &self,
        company_id: Uuid,
        window: DateWindow,
    ) -> StoreResult<Vec<Schedule>> {
        let state = self.state();
        Ok(state
            .schedules
            .values()
            .filter(|s| {
                s.company_id == company_id
                    && s.deleted_at.is_none()
                    && s.is_active
                    && s.start_date <= window.end()
                    && s.end_date.is_none_or(|end| end >= window.start())
            })
            .cloned()
            .collect())
    }

    async fn appointment_exists(
        &self,
        company_id: Uuid,
        property_id: Uuid,
        service_type_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<bool> {
        let state = self.state();
        Ok(state
            .appointment_keys
            .contains(&(company_id, property_id, service_type_id, date)))
    }

    async fn create_appointment(
        &self,
        company_id: Uuid,
        new: NewAppointment,
    ) -> StoreResult<Appointment> {
        let mut state = self.state();
        let key = (
            company_id,
            new.property_id,
            new.service_type_id,
            new.scheduled_date,
        );
        if state.appointment_keys.contains(&key) {
            return Err(StoreError::DuplicateAppointment {
                property_id: new.property_id,
                service_type_id: new.service_type_id,
                date: new.scheduled_date,
            });
        }

        let appointment = Appointment {
            id: Uuid::now_v7(),
            company_id,
            schedule_id: new.schedule_id,
            property_id: new.property_id,
            service_type_id: new.service_type_id,
            team_id: None,
            route_order: None,
            scheduled_date: new.scheduled_date,
            scheduled_time: new.scheduled_time,
            status: AppointmentStatus::Scheduled,
            created_at: chrono::Utc::now(),
            deleted_at: None,
        };
        state.appointment_keys.insert(key);
        state
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn unassigned_scheduled_on(
        &self,
        company_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Vec<AppointmentWithProperty>> {
        let state = self.state();
        state
            .appointments
            .values()
            .filter(|a| {
                a.company_id == company_id
                    && a.deleted_at.is_none()
                    && a.scheduled_date == date
                    && a.status == AppointmentStatus::Scheduled
                    && a.team_id.is_none()
            })
            .map(|a| {
                let property = state
                    .properties
                    .get(&a.property_id)
                    .filter(|p| p.deleted_at.is_none())
                    .cloned()
                    .ok_or_else(|| {
                        StoreError::NotFound(format!("property {}", a.property_id))
                    })?;
                Ok(AppointmentWithProperty {
                    appointment: a.clone(),
                    property,
                })
            })
            .collect()
    }

    async fn active_teams(&self, company_id: Uuid) -> StoreResult<Vec<Team>> {
        let state = self.state();
        Ok(state
            .teams
            .values()
            .filter(|t| t.company_id == company_id && t.deleted_at.is_none() && t.is_active)
            .cloned()
            .collect())
    }

    async fn count_team_appointments(
        &self,
        company_id: Uuid,
        team_id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<u32> {
        let state = self.state();
        let count = state
            .appointments
            .values()
            .filter(|a| {
                a.company_id == company_id
                    && a.deleted_at.is_none()
                    && a.team_id == Some(team_id)
                    && a.scheduled_date == date
            })
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn assign_appointment_to_team(
        &self,
        company_id: Uuid,
        appointment_id: Uuid,
        team_id: Uuid,
    ) -> StoreResult<()> {
        let mut state = self.state();
        if !state
            .teams
            .get(&team_id)
            .is_some_and(|t| t.company_id == company_id && t.deleted_at.is_none())
        {
            return Err(StoreError::NotFound(format!("team {team_id}")));
        }
        let appointment = state
            .appointments
            .get_mut(&appointment_id)
            .filter(|a| a.company_id == company_id && a.deleted_at.is_none())
            .ok_or_else(|| StoreError::NotFound(format!("appointment {appointment_id}")))?;
        appointment.team_id = Some(team_id);
        Ok(())
    }

    async fn property(
        &self,
        company_id: Uuid,
        property_id: Uuid,
    ) -> StoreResult<Option<Property>> {
        let state = self.state();
        Ok(state
            .properties
            .get(&property_id)
            .filter(|p| p.company_id == company_id && p.deleted_at.is_none())
            .cloned())
    }

    async fn service_type(
        &self,
        company_id: Uuid,
        service_type_id: Uuid,
    ) -> StoreResult<Option<ServiceType>> {
        let state = self.state();
        Ok(state
            .service_types
            .get(&service_type_id)
            .filter(|s| s.company_id == company_id && s.deleted_at.is_none())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use verdant_core::types::Recurrence;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn seeded() -> (MemoryStore, Uuid, Property, ServiceType) {
        let store = MemoryStore::new();
        let company_id = Uuid::now_v7();
        let property =
            store.insert_property(company_id, &fixtures::geocoded_property(40.7128, -74.0060));
        let service_type =
            store.insert_service_type(company_id, &fixtures::service_type("Mowing"));
        (store, company_id, property, service_type)
    }

    #[tokio::test]
    async fn test_duplicate_appointment_key_is_rejected() {
        let (store, company_id, property, service_type) = seeded();
        let new = NewAppointment {
            schedule_id: None,
            property_id: property.id,
            service_type_id: service_type.id,
            scheduled_date: date(2026, 6, 1),
            scheduled_time: None,
        };

        store
            .create_appointment(company_id, new.clone())
            .await
            .expect("first insert succeeds");

        let err = store
            .create_appointment(company_id, new)
            .await
            .expect_err("second insert must hit the uniqueness key");
        assert!(matches!(err, StoreError::DuplicateAppointment { .. }));
    }

    #[tokio::test]
    async fn test_same_key_is_allowed_across_companies() {
        let (store, company_id, property, service_type) = seeded();
        let other_company = Uuid::now_v7();

        let new = NewAppointment {
            schedule_id: None,
            property_id: property.id,
            service_type_id: service_type.id,
            scheduled_date: date(2026, 6, 1),
            scheduled_time: None,
        };
        store
            .create_appointment(company_id, new.clone())
            .await
            .expect("insert for company A");
        store
            .create_appointment(other_company, new)
            .await
            .expect("same key under company B is a different tenant");
    }

    #[tokio::test]
    async fn test_soft_deleted_schedules_are_invisible() {
        let (store, company_id, property, service_type) = seeded();
        let schedule = store.insert_schedule(
            company_id,
            NewSchedule {
                property_id: property.id,
                service_type_id: service_type.id,
                recurrence: Recurrence::Manual,
                start_date: date(2026, 6, 1),
                end_date: None,
                is_active: true,
            },
        );
        let window =
            DateWindow::new(date(2026, 5, 1), date(2026, 7, 1)).expect("valid window");

        let due = store
            .schedules_due_for_generation(company_id, window)
            .await
            .expect("query succeeds");
        assert_eq!(due.len(), 1);

        store
            .soft_delete_schedule(company_id, schedule.id)
            .expect("soft delete succeeds");
        let due = store
            .schedules_due_for_generation(company_id, window)
            .await
            .expect("query succeeds");
        assert!(due.is_empty());
    }

    #[tokio::test]
    async fn test_window_overlap_filters_ended_and_future_schedules() {
        let (store, company_id, property, service_type) = seeded();
        let make = |start: NaiveDate, end: Option<NaiveDate>| NewSchedule {
            property_id: property.id,
            service_type_id: service_type.id,
            recurrence: Recurrence::Manual,
            start_date: start,
            end_date: end,
            is_active: true,
        };

        // Ended before the window, starts after the window, overlapping.
        store.insert_schedule(company_id, make(date(2026, 1, 1), Some(date(2026, 2, 1))));
        store.insert_schedule(company_id, make(date(2026, 9, 1), None));
        let overlapping =
            store.insert_schedule(company_id, make(date(2026, 4, 1), Some(date(2026, 6, 15))));

        let window =
            DateWindow::new(date(2026, 6, 1), date(2026, 6, 30)).expect("valid window");
        let due = store
            .schedules_due_for_generation(company_id, window)
            .await
            .expect("query succeeds");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, overlapping.id);
    }

    #[tokio::test]
    async fn test_unassigned_query_is_tenant_scoped() {
        let (store, company_id, property, service_type) = seeded();
        let other_company = Uuid::now_v7();
        let other_property =
            store.insert_property(other_company, &fixtures::geocoded_property(41.0, -75.0));
        let other_service =
            store.insert_service_type(other_company, &fixtures::service_type("Mowing"));

        let day = date(2026, 6, 1);
        store
            .create_appointment(
                company_id,
                NewAppointment {
                    schedule_id: None,
                    property_id: property.id,
                    service_type_id: service_type.id,
                    scheduled_date: day,
                    scheduled_time: None,
                },
            )
            .await
            .expect("company A appointment");
        store
            .create_appointment(
                other_company,
                NewAppointment {
                    schedule_id: None,
                    property_id: other_property.id,
                    service_type_id: other_service.id,
                    scheduled_date: day,
                    scheduled_time: None,
                },
            )
            .await
            .expect("company B appointment");

        let unassigned = store
            .unassigned_scheduled_on(company_id, day)
            .await
            .expect("query succeeds");
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].appointment.company_id, company_id);
    }

    #[tokio::test]
    async fn test_assignment_updates_team_and_count() {
        let (store, company_id, property, service_type) = seeded();
        let team = store.insert_team(company_id, &fixtures::team("North crew", Some(4)));
        let day = date(2026, 6, 1);

        let appointment = store
            .create_appointment(
                company_id,
                NewAppointment {
                    schedule_id: None,
                    property_id: property.id,
                    service_type_id: service_type.id,
                    scheduled_date: day,
                    scheduled_time: None,
                },
            )
            .await
            .expect("appointment created");

        store
            .assign_appointment_to_team(company_id, appointment.id, team.id)
            .await
            .expect("assignment succeeds");

        let count = store
            .count_team_appointments(company_id, team.id, day)
            .await
            .expect("count succeeds");
        assert_eq!(count, 1);

        let unassigned = store
            .unassigned_scheduled_on(company_id, day)
            .await
            .expect("query succeeds");
        assert!(unassigned.is_empty());
    }
}
