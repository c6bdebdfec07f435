//! Per-crew remaining capacity for a target date.

use chrono::NaiveDate;
use uuid::Uuid;

use verdant_core::constants::UNLIMITED_DAILY_CAPACITY;
use verdant_store::model::team::Team;
use verdant_store::store::Datastore;

use crate::error::ServiceResult;

/// A crew's capacity picture for one calendar date.
#[derive(Debug, Clone)]
pub struct TeamCapacity {
    pub team: Team,
    /// Appointments already assigned to the crew on the date.
    pub current: u32,
    /// Configured daily limit, or [`UNLIMITED_DAILY_CAPACITY`] when none is set.
    pub max: u32,
    pub available: u32,
}

/// ## Summary
/// Computes remaining daily capacity for each team on `date`.
///
/// Capacity accounting is always scoped to a single calendar date; a team
/// without a configured limit gets the unlimited sentinel.
///
/// ## Errors
/// Propagates store failures from the per-team appointment count.
pub async fn team_capacities<S: Datastore + ?Sized>(
    store: &S,
    company_id: Uuid,
    teams: &[Team],
    date: NaiveDate,
) -> ServiceResult<Vec<TeamCapacity>> {
    let mut capacities = Vec::with_capacity(teams.len());
    for team in teams {
        let current = store
            .count_team_appointments(company_id, team.id, date)
            .await?;
        let max = team.max_daily_appointments.unwrap_or(UNLIMITED_DAILY_CAPACITY);
        capacities.push(TeamCapacity {
            team: team.clone(),
            current,
            max,
            available: max.saturating_sub(current),
        });
    }
    Ok(capacities)
}
