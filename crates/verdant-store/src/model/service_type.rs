/// A service offering (mowing, fertilization, ...) referenced by schedules
/// and appointments. Label source for generation summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceType {
    pub id: uuid::Uuid,
    pub company_id: uuid::Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Insert struct for creating new service types
#[derive(Debug, Clone)]
pub struct NewServiceType<'a> {
    pub name: &'a str,
}
