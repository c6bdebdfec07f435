//! JSON seed loading.
//!
//! The CLI has no live datastore behind it; a seed file stands in for the
//! administrative surface and the geocoding collaborator, and is loaded into
//! a [`MemoryStore`] at startup. Entities reference each other by seed key,
//! resolved to generated ids at insert time.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use verdant_core::types::{
    Recurrence, RecurringFrequency, SeasonalPeriod, weekday_from_sunday_index,
};
use verdant_store::model::appointment::NewAppointment;
use verdant_store::model::property::NewProperty;
use verdant_store::model::schedule::NewSchedule;
use verdant_store::model::service_type::NewServiceType;
use verdant_store::model::team::NewTeam;
use verdant_store::store::Datastore;
use verdant_store::store::memory::MemoryStore;

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub company_id: Uuid,
    #[serde(default)]
    pub properties: Vec<PropertySeed>,
    #[serde(default)]
    pub service_types: Vec<ServiceTypeSeed>,
    #[serde(default)]
    pub teams: Vec<TeamSeed>,
    #[serde(default)]
    pub schedules: Vec<ScheduleSeed>,
    #[serde(default)]
    pub appointments: Vec<AppointmentSeed>,
}

#[derive(Debug, Deserialize)]
pub struct PropertySeed {
    pub key: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub geocoding_failed: bool,
}

#[derive(Debug, Deserialize)]
pub struct ServiceTypeSeed {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamSeed {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub max_daily_appointments: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleSeed {
    pub property: String,
    pub service_type: String,
    pub scheduling: SchedulingSeed,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Mirrors [`Recurrence`] with plain scalars: `day_of_week` is a stored
/// 0 = Sunday .. 6 = Saturday index, converted explicitly below.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulingSeed {
    Manual,
    Recurring {
        frequency: RecurringFrequency,
        day_of_week: Option<u8>,
        week_of_month: Option<u8>,
    },
    Seasonal {
        periods: Vec<SeasonalPeriod>,
    },
}

#[derive(Debug, Deserialize)]
pub struct AppointmentSeed {
    pub property: String,
    pub service_type: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

const fn default_true() -> bool {
    true
}

/// ## Summary
/// Reads a seed file and loads it into the store.
///
/// Returns the seeded company id — the tenant every subsequent core call is
/// scoped to.
///
/// ## Errors
/// Fails on unreadable or malformed seed data, dangling seed keys, or an
/// out-of-range weekday index.
pub async fn load_seed(path: &Path, store: &MemoryStore) -> Result<Uuid> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let seed: SeedFile =
        serde_json::from_str(&raw).context("failed to parse seed file as JSON")?;

    let company_id = seed.company_id;
    let mut property_ids: HashMap<String, Uuid> = HashMap::new();
    let mut service_type_ids: HashMap<String, Uuid> = HashMap::new();

    for property in &seed.properties {
        let created = store.insert_property(
            company_id,
            &NewProperty {
                address: &property.address,
                latitude: property.latitude,
                longitude: property.longitude,
                geocoding_failed: property.geocoding_failed,
            },
        );
        property_ids.insert(property.key.clone(), created.id);
    }

    for service_type in &seed.service_types {
        let created = store.insert_service_type(
            company_id,
            &NewServiceType {
                name: &service_type.name,
            },
        );
        service_type_ids.insert(service_type.key.clone(), created.id);
    }

    for team in &seed.teams {
        store.insert_team(
            company_id,
            &NewTeam {
                name: &team.name,
                is_active: team.is_active,
                max_daily_appointments: team.max_daily_appointments,
            },
        );
    }

    for schedule in &seed.schedules {
        let property_id = resolve(&property_ids, &schedule.property, "property")?;
        let service_type_id =
            resolve(&service_type_ids, &schedule.service_type, "service type")?;
        store.insert_schedule(
            company_id,
            NewSchedule {
                property_id,
                service_type_id,
                recurrence: convert_scheduling(&schedule.scheduling)?,
                start_date: schedule.start_date,
                end_date: schedule.end_date,
                is_active: schedule.is_active,
            },
        );
    }

    for appointment in &seed.appointments {
        let property_id = resolve(&property_ids, &appointment.property, "property")?;
        let service_type_id =
            resolve(&service_type_ids, &appointment.service_type, "service type")?;
        store
            .create_appointment(
                company_id,
                NewAppointment {
                    schedule_id: None,
                    property_id,
                    service_type_id,
                    scheduled_date: appointment.date,
                    scheduled_time: appointment.time,
                },
            )
            .await
            .with_context(|| {
                format!("failed to seed appointment on {}", appointment.date)
            })?;
    }

    tracing::info!(
        %company_id,
        properties = seed.properties.len(),
        service_types = seed.service_types.len(),
        teams = seed.teams.len(),
        schedules = seed.schedules.len(),
        appointments = seed.appointments.len(),
        "Seed loaded"
    );
    Ok(company_id)
}

fn resolve(ids: &HashMap<String, Uuid>, key: &str, entity: &str) -> Result<Uuid> {
    ids.get(key)
        .copied()
        .with_context(|| format!("seed references unknown {entity} key {key:?}"))
}

fn convert_scheduling(scheduling: &SchedulingSeed) -> Result<Recurrence> {
    Ok(match scheduling {
        SchedulingSeed::Manual => Recurrence::Manual,
        SchedulingSeed::Recurring {
            frequency,
            day_of_week,
            week_of_month,
        } => {
            let day_of_week = match day_of_week {
                Some(index) => match weekday_from_sunday_index(*index) {
                    Some(weekday) => Some(weekday),
                    None => bail!("day_of_week {index} is out of the 0-6 range"),
                },
                None => None,
            };
            Recurrence::Recurring {
                frequency: *frequency,
                day_of_week,
                week_of_month: *week_of_month,
            }
        }
        SchedulingSeed::Seasonal { periods } => Recurrence::Seasonal {
            periods: periods.clone(),
        },
    })
}
