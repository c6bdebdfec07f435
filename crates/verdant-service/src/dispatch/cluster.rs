//! Proximity grouping of a day's appointments.
//!
//! Single-linkage clustering: a candidate joins a cluster when it is within
//! the distance threshold of ANY current member, and newly joined members can
//! pull in further candidates on the next scan. Chains therefore stretch a
//! cluster well past one threshold radius from the seed, which is the
//! intended shape: adjacent streets connect into one route-sized group.
//! This is not k-means and there is no centroid.

use verdant_core::geo::{GeoPoint, haversine_km};
use verdant_store::model::appointment::AppointmentWithProperty;

/// ## Summary
/// Partitions appointments into proximity groups.
///
/// Appointments without a usable position (missing coordinates or a failed
/// geocode) each form a singleton group; they cannot be distance-compared,
/// so they are never merged with anything. Geocoded appointments cluster
/// greedily in input order: the first remaining one seeds a cluster, then
/// candidates are folded in transitively until a scan adds nothing.
#[must_use]
pub fn cluster_by_proximity(
    stops: Vec<AppointmentWithProperty>,
    max_distance_km: f64,
) -> Vec<Vec<AppointmentWithProperty>> {
    let mut clusters: Vec<Vec<AppointmentWithProperty>> = Vec::new();
    let mut geocoded: Vec<(AppointmentWithProperty, GeoPoint)> = Vec::new();

    for stop in stops {
        match stop.property.geo_point() {
            Some(point) => geocoded.push((stop, point)),
            None => clusters.push(vec![stop]),
        }
    }

    while !geocoded.is_empty() {
        let mut members = vec![geocoded.remove(0)];
        loop {
            let mut joined_any = false;
            let mut index = 0;
            while index < geocoded.len() {
                let candidate_point = geocoded[index].1;
                let near = members
                    .iter()
                    .any(|(_, member)| haversine_km(candidate_point, *member) <= max_distance_km);
                if near {
                    members.push(geocoded.remove(index));
                    joined_any = true;
                } else {
                    index += 1;
                }
            }
            if !joined_any {
                break;
            }
        }
        clusters.push(members.into_iter().map(|(stop, _)| stop).collect());
    }

    clusters
}
