use verdant_core::geo::GeoPoint;

/// A serviced property. Coordinates are written by the upstream geocoding
/// collaborator; the core only reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: uuid::Uuid,
    pub company_id: uuid::Uuid,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geocoding_failed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Property {
    /// The property's position, if geocoding produced one.
    ///
    /// `Some` iff both coordinates are present and geocoding did not fail.
    #[must_use]
    pub fn geo_point(&self) -> Option<GeoPoint> {
        if self.geocoding_failed {
            return None;
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        }
    }
}

/// Insert struct for creating new properties
#[derive(Debug, Clone)]
pub struct NewProperty<'a> {
    pub address: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub geocoding_failed: bool,
}
