//! Windowed appointment generation.
//!
//! Expands each schedule into concrete appointments over an inclusive date
//! window. Generation is idempotent: the store's
//! (property, service type, date) uniqueness key is checked before every
//! insert, and a duplicate-key rejection from a concurrent writer is treated
//! as "already exists", never as a failure.

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use verdant_core::types::{DateWindow, Recurrence};
use verdant_store::error::StoreError;
use verdant_store::model::appointment::{Appointment, NewAppointment};
use verdant_store::model::schedule::Schedule;
use verdant_store::store::Datastore;

use crate::error::{ServiceError, ServiceResult};
use crate::scheduling::recurrence::RecurringRule;
use crate::scheduling::season;

/// Per-schedule outcome of a batch generation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GenerationDetail {
    pub schedule_id: Uuid,
    pub property_label: String,
    pub service_type_label: String,
    pub count: usize,
}

/// Outcome of a batch generation run.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct GenerationSummary {
    pub schedules_processed: usize,
    pub appointments_generated: usize,
    pub details: Vec<GenerationDetail>,
}

/// ## Summary
/// Generates appointments for a single schedule over `window`.
///
/// Returns only the appointments newly created by this call; dates already
/// occupied under the uniqueness key are silently skipped, which makes the
/// operation idempotent rather than merely duplicate-safe. An inactive
/// schedule, one whose own bounds miss the window, or one with inconsistent
/// dates yields an empty result, not an error.
///
/// ## Errors
/// Propagates store failures other than duplicate-key rejection, and
/// [`ServiceError::InvariantViolation`] if the iteration cursor ever fails to
/// advance (a data bug upstream; appointments committed before the trip are
/// kept).
#[tracing::instrument(skip(store, schedule), fields(
    schedule_id = %schedule.id,
    recurrence = schedule.recurrence.kind(),
    window_start = %window.start(),
    window_end = %window.end(),
))]
pub async fn generate_for_schedule<S: Datastore + ?Sized>(
    store: &S,
    company_id: Uuid,
    schedule: &Schedule,
    window: DateWindow,
) -> ServiceResult<Vec<Appointment>> {
    if !schedule.is_active {
        tracing::debug!("Schedule is inactive, skipping");
        return Ok(Vec::new());
    }
    if schedule
        .end_date
        .is_some_and(|end| end < window.start())
    {
        tracing::debug!("Schedule ended before the window, skipping");
        return Ok(Vec::new());
    }
    if schedule
        .end_date
        .is_some_and(|end| end < schedule.start_date)
    {
        tracing::warn!("Schedule end date precedes its start date, skipping");
        return Ok(Vec::new());
    }

    let mut created = Vec::new();

    match &schedule.recurrence {
        Recurrence::Manual => {
            // Single-shot: the start date itself is the only candidate.
            let candidate = schedule.start_date;
            if window.contains(candidate) {
                try_create(store, company_id, schedule, candidate, &mut created).await?;
            } else {
                tracing::debug!(%candidate, "Manual date outside the window");
            }
        }
        Recurrence::Recurring {
            frequency,
            day_of_week,
            week_of_month,
        } => {
            let rule = RecurringRule::new(
                *frequency,
                *day_of_week,
                *week_of_month,
                schedule.start_date,
            );
            let mut cursor = schedule.start_date.max(window.start());
            while within_bounds(schedule, window, cursor) {
                let Some(candidate) = rule.next_occurrence(schedule.start_date, cursor)
                else {
                    tracing::warn!(%cursor, "No further candidate resolvable");
                    break;
                };
                if !within_bounds(schedule, window, candidate) {
                    break;
                }
                try_create(store, company_id, schedule, candidate, &mut created).await?;

                let Some(next) = rule.advance_cursor(candidate) else {
                    break;
                };
                if next <= cursor {
                    tracing::error!(%cursor, %next, "Recurrence cursor failed to advance");
                    return Err(ServiceError::InvariantViolation(
                        "recurrence cursor failed to advance",
                    ));
                }
                cursor = next;
            }
        }
        Recurrence::Seasonal { periods } => {
            let mut cursor = schedule.start_date.max(window.start());
            while within_bounds(schedule, window, cursor) {
                // Re-resolve on every step so the frequency switches as the
                // iteration crosses a period boundary.
                let next = match season::active_period(periods, cursor) {
                    Some(period) => {
                        try_create(store, company_id, schedule, cursor, &mut created)
                            .await?;
                        season::seasonal_step(period.frequency, cursor)
                    }
                    // Between periods: scan forward a day at a time until one
                    // picks the cursor up or the window ends.
                    None => cursor.checked_add_days(Days::new(1)),
                };
                let Some(next) = next else {
                    break;
                };
                if next <= cursor {
                    tracing::error!(%cursor, %next, "Seasonal cursor failed to advance");
                    return Err(ServiceError::InvariantViolation(
                        "seasonal cursor failed to advance",
                    ));
                }
                cursor = next;
            }
        }
    }

    tracing::debug!(created = created.len(), "Schedule generation finished");
    Ok(created)
}

/// ## Summary
/// Generates appointments for every schedule due within `window`.
///
/// Schedules come back from the store in ascending id order and are processed
/// one at a time; a failure in one schedule is logged and isolated so the
/// rest of the batch still runs.
///
/// ## Errors
/// Only the initial schedule query can fail the whole batch.
#[tracing::instrument(skip(store), fields(
    window_start = %window.start(),
    window_end = %window.end(),
))]
pub async fn generate_for_all<S: Datastore + ?Sized>(
    store: &S,
    company_id: Uuid,
    window: DateWindow,
) -> ServiceResult<GenerationSummary> {
    let schedules = store
        .schedules_due_for_generation(company_id, window)
        .await?;
    tracing::info!(schedule_count = schedules.len(), "Starting generation batch");

    let mut summary = GenerationSummary::default();
    for schedule in &schedules {
        summary.schedules_processed += 1;
        match process_schedule(store, company_id, schedule, window).await {
            Ok(detail) => {
                summary.appointments_generated += detail.count;
                summary.details.push(detail);
            }
            Err(err) => {
                tracing::error!(schedule_id = %schedule.id, error = %err, "Generation failed for schedule");
            }
        }
    }

    tracing::info!(
        schedules_processed = summary.schedules_processed,
        appointments_generated = summary.appointments_generated,
        "Generation batch finished"
    );
    Ok(summary)
}

async fn process_schedule<S: Datastore + ?Sized>(
    store: &S,
    company_id: Uuid,
    schedule: &Schedule,
    window: DateWindow,
) -> ServiceResult<GenerationDetail> {
    let created = generate_for_schedule(store, company_id, schedule, window).await?;

    let property_label = store
        .property(company_id, schedule.property_id)
        .await?
        .map_or_else(|| schedule.property_id.to_string(), |p| p.address);
    let service_type_label = store
        .service_type(company_id, schedule.service_type_id)
        .await?
        .map_or_else(|| schedule.service_type_id.to_string(), |s| s.name);

    Ok(GenerationDetail {
        schedule_id: schedule.id,
        property_label,
        service_type_label,
        count: created.len(),
    })
}

fn within_bounds(schedule: &Schedule, window: DateWindow, date: NaiveDate) -> bool {
    window.contains(date) && schedule.end_date.is_none_or(|end| date <= end)
}

async fn try_create<S: Datastore + ?Sized>(
    store: &S,
    company_id: Uuid,
    schedule: &Schedule,
    date: NaiveDate,
    created: &mut Vec<Appointment>,
) -> ServiceResult<()> {
    let exists = store
        .appointment_exists(company_id, schedule.property_id, schedule.service_type_id, date)
        .await?;
    if exists {
        tracing::trace!(%date, "Appointment already exists, skipping");
        return Ok(());
    }

    let new = NewAppointment {
        schedule_id: Some(schedule.id),
        property_id: schedule.property_id,
        service_type_id: schedule.service_type_id,
        scheduled_date: date,
        scheduled_time: None,
    };
    match store.create_appointment(company_id, new).await {
        Ok(appointment) => {
            tracing::trace!(%date, appointment_id = %appointment.id, "Appointment created");
            created.push(appointment);
            Ok(())
        }
        // A concurrent writer won the uniqueness key between our existence
        // check and the insert; equivalent to "already exists".
        Err(StoreError::DuplicateAppointment { .. }) => {
            tracing::trace!(%date, "Lost duplicate-key race, skipping");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
