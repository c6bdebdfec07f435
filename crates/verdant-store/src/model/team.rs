/// A crew with a per-day appointment capacity.
///
/// Crews have no home location; only properties carry coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: uuid::Uuid,
    pub company_id: uuid::Uuid,
    pub name: String,
    pub is_active: bool,
    /// Absent = effectively unlimited.
    pub max_daily_appointments: Option<u32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Insert struct for creating new teams
#[derive(Debug, Clone)]
pub struct NewTeam<'a> {
    pub name: &'a str,
    pub is_active: bool,
    pub max_daily_appointments: Option<u32>,
}
