//! Greedy assignment of proximity groups to crews.
//!
//! Largest-available-first with no lookahead: each group goes whole to the
//! crew with the most remaining capacity at that moment. Deliberately
//! non-optimal bin packing — keeping a geographic cluster on one crew is
//! worth more than a perfectly balanced load.

use chrono::NaiveDate;
use uuid::Uuid;

use verdant_store::store::Datastore;

use crate::dispatch::capacity::{TeamCapacity, team_capacities};
use crate::dispatch::cluster::cluster_by_proximity;
use crate::error::{ServiceError, ServiceResult};

/// Appointments a single crew received in one run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TeamAssignment {
    pub team_id: Uuid,
    pub team_name: String,
    pub count: usize,
}

/// Outcome of one `auto_assign` run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AssignmentSummary {
    pub total_assigned: usize,
    /// Unassigned appointments found at the start of the run.
    pub total_unassigned: usize,
    pub remaining_unassigned: usize,
    pub assignments: Vec<TeamAssignment>,
    pub teams_used: usize,
}

/// ## Summary
/// Assigns the date's unassigned scheduled appointments to active crews.
///
/// Appointments are grouped by proximity (single-linkage within
/// `max_distance_km`), then groups are consumed in clustering output order:
/// each goes whole to the crew with the highest remaining capacity, crews are
/// re-ranked between groups, and once no crew has capacity the remaining
/// groups stay unassigned. Groups are never split across crews, so a crew's
/// final group may take it past its limit rather than strand a split cluster.
///
/// Capacity reads are not locked against a concurrent run for the same date;
/// callers needing that serialize per date.
///
/// ## Errors
/// - [`ServiceError::NoUnassignedAppointments`] when the date has nothing to
///   assign.
/// - [`ServiceError::NoActiveTeams`] when no live active crew exists.
/// - Store failures mid-run abort the call; groups assigned before the
///   failure keep their crew.
#[tracing::instrument(skip(store), fields(%date, max_distance_km))]
pub async fn auto_assign<S: Datastore + ?Sized>(
    store: &S,
    company_id: Uuid,
    date: NaiveDate,
    max_distance_km: f64,
) -> ServiceResult<AssignmentSummary> {
    let unassigned = store.unassigned_scheduled_on(company_id, date).await?;
    if unassigned.is_empty() {
        return Err(ServiceError::NoUnassignedAppointments { date });
    }
    let teams = store.active_teams(company_id).await?;
    if teams.is_empty() {
        return Err(ServiceError::NoActiveTeams);
    }

    let total_unassigned = unassigned.len();
    let mut capacities = team_capacities(store, company_id, &teams, date).await?;
    rank_by_available(&mut capacities);

    let groups = cluster_by_proximity(unassigned, max_distance_km);
    tracing::debug!(
        group_count = groups.len(),
        team_count = capacities.len(),
        "Assigning proximity groups"
    );

    let mut total_assigned = 0;
    let mut assignments: Vec<TeamAssignment> = Vec::new();

    for group in groups {
        let Some(best) = capacities.first_mut() else {
            break;
        };
        if best.available == 0 {
            tracing::debug!("No crew has remaining capacity, stopping");
            break;
        }

        for stop in &group {
            store
                .assign_appointment_to_team(company_id, stop.appointment.id, best.team.id)
                .await?;
        }

        let group_size = group.len();
        best.available = best
            .available
            .saturating_sub(u32::try_from(group_size).unwrap_or(u32::MAX));
        total_assigned += group_size;
        record_assignment(&mut assignments, best, group_size);
        tracing::debug!(
            team = %best.team.name,
            group_size,
            remaining_capacity = best.available,
            "Group assigned"
        );

        rank_by_available(&mut capacities);
    }

    let summary = AssignmentSummary {
        total_assigned,
        total_unassigned,
        remaining_unassigned: total_unassigned - total_assigned,
        teams_used: assignments.len(),
        assignments,
    };
    tracing::info!(
        total_assigned = summary.total_assigned,
        remaining_unassigned = summary.remaining_unassigned,
        teams_used = summary.teams_used,
        "Assignment finished"
    );
    Ok(summary)
}

/// Descending by remaining capacity, ascending team id as the deterministic
/// tie-break.
fn rank_by_available(capacities: &mut [TeamCapacity]) {
    capacities.sort_by(|a, b| {
        b.available
            .cmp(&a.available)
            .then(a.team.id.cmp(&b.team.id))
    });
}

fn record_assignment(
    assignments: &mut Vec<TeamAssignment>,
    capacity: &TeamCapacity,
    group_size: usize,
) {
    if let Some(existing) = assignments
        .iter_mut()
        .find(|a| a.team_id == capacity.team.id)
    {
        existing.count += group_size;
    } else {
        assignments.push(TeamAssignment {
            team_id: capacity.team.id,
            team_name: capacity.team.name.clone(),
            count: group_size,
        });
    }
}
