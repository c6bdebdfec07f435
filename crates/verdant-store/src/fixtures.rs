//! Test fixtures for store-backed tests.
//!
//! Provides helpers for constructing seed data: properties, service types,
//! teams, and schedules.

use chrono::NaiveDate;
use verdant_core::types::Recurrence;

use crate::model::property::NewProperty;
use crate::model::schedule::NewSchedule;
use crate::model::service_type::NewServiceType;
use crate::model::team::NewTeam;

/// Creates a geocoded property at the given coordinates.
#[must_use]
pub fn geocoded_property(latitude: f64, longitude: f64) -> NewProperty<'static> {
    NewProperty {
        address: "1 Test Lane",
        latitude: Some(latitude),
        longitude: Some(longitude),
        geocoding_failed: false,
    }
}

/// Creates a property the geocoder could not resolve.
#[must_use]
pub fn ungeocoded_property() -> NewProperty<'static> {
    NewProperty {
        address: "Unresolvable Rd",
        latitude: None,
        longitude: None,
        geocoding_failed: true,
    }
}

/// Creates a test service type.
#[must_use]
pub fn service_type(name: &str) -> NewServiceType<'_> {
    NewServiceType { name }
}

/// Creates an active team with the given daily capacity.
#[must_use]
pub fn team(name: &str, max_daily_appointments: Option<u32>) -> NewTeam<'_> {
    NewTeam {
        name,
        is_active: true,
        max_daily_appointments,
    }
}

/// Creates an active open-ended schedule with the given recurrence.
#[must_use]
pub fn schedule(
    property_id: uuid::Uuid,
    service_type_id: uuid::Uuid,
    recurrence: Recurrence,
    start_date: NaiveDate,
) -> NewSchedule {
    NewSchedule {
        property_id,
        service_type_id,
        recurrence,
        start_date,
        end_date: None,
        is_active: true,
    }
}
