/// Mean Earth radius in kilometres, used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default proximity-cluster radius for crew assignment.
pub const DEFAULT_CLUSTER_RADIUS_KM: f64 = 5.0;

/// Capacity sentinel for teams without a configured daily limit.
pub const UNLIMITED_DAILY_CAPACITY: u32 = u32::MAX;
