//! End-to-end crew assignment tests over the in-memory datastore.

use chrono::NaiveDate;
use uuid::Uuid;

use verdant_service::dispatch::assign::auto_assign;
use verdant_service::error::ServiceError;
use verdant_store::fixtures;
use verdant_store::model::appointment::NewAppointment;
use verdant_store::model::property::NewProperty;
use verdant_store::model::service_type::ServiceType;
use verdant_store::store::Datastore;
use verdant_store::store::memory::MemoryStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn assignment_day() -> NaiveDate {
    date(2026, 6, 1)
}

fn seeded() -> (MemoryStore, Uuid, ServiceType) {
    let store = MemoryStore::new();
    let company_id = Uuid::now_v7();
    let service_type = store.insert_service_type(company_id, &fixtures::service_type("Mowing"));
    (store, company_id, service_type)
}

/// Seeds one unassigned scheduled appointment at the given property seed.
async fn appointment_at(
    store: &MemoryStore,
    company_id: Uuid,
    service_type_id: Uuid,
    property: &NewProperty<'_>,
) -> Uuid {
    let property = store.insert_property(company_id, property);
    let appointment = store
        .create_appointment(
            company_id,
            NewAppointment {
                schedule_id: None,
                property_id: property.id,
                service_type_id,
                scheduled_date: assignment_day(),
                scheduled_time: None,
            },
        )
        .await
        .expect("appointment created");
    appointment.id
}

#[test_log::test(tokio::test)]
async fn test_capacity_ceiling_limits_assignments() {
    let (store, company_id, service_type) = seeded();
    store.insert_team(company_id, &fixtures::team("Only crew", Some(2)));
    // Ungeocoded stops cluster as singletons, so each group has size one.
    for _ in 0..5 {
        appointment_at(
            &store,
            company_id,
            service_type.id,
            &fixtures::ungeocoded_property(),
        )
        .await;
    }

    let summary = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect("assignment succeeds");

    assert_eq!(summary.total_unassigned, 5);
    assert_eq!(summary.total_assigned, 2);
    assert_eq!(summary.remaining_unassigned, 3);
    assert_eq!(summary.teams_used, 1);
    assert_eq!(summary.assignments[0].count, 2);
}

#[test_log::test(tokio::test)]
async fn test_nearby_appointments_land_on_the_same_crew() {
    let (store, company_id, service_type) = seeded();
    store.insert_team(company_id, &fixtures::team("First crew", Some(10)));
    store.insert_team(company_id, &fixtures::team("Second crew", Some(10)));

    // Two stops ~0.13 km apart and one across the river in Newark.
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::geocoded_property(40.7128, -74.0060),
    )
    .await;
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::geocoded_property(40.7138, -74.0070),
    )
    .await;
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::geocoded_property(40.7357, -74.1724),
    )
    .await;

    let summary = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect("assignment succeeds");

    assert_eq!(summary.total_assigned, 3);
    assert_eq!(summary.teams_used, 2);

    // The close pair travels as one group: one crew got both of its stops,
    // the other crew got only the Newark singleton.
    let mut counts: Vec<usize> = summary.assignments.iter().map(|a| a.count).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 2]);
}

#[test_log::test(tokio::test)]
async fn test_whole_group_stays_on_one_crew() {
    let (store, company_id, service_type) = seeded();
    store.insert_team(company_id, &fixtures::team("Small crew", Some(2)));
    store.insert_team(company_id, &fixtures::team("Other crew", Some(2)));

    // Three chained stops: one proximity group of three.
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::geocoded_property(40.7128, -74.0060),
    )
    .await;
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::geocoded_property(40.7138, -74.0070),
    )
    .await;
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::geocoded_property(40.7148, -74.0080),
    )
    .await;

    let summary = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect("assignment succeeds");

    // The group is never split: the chosen crew absorbs all three even
    // though its configured limit is two.
    assert_eq!(summary.total_assigned, 3);
    assert_eq!(summary.teams_used, 1);
    assert_eq!(summary.assignments[0].count, 3);
}

#[test_log::test(tokio::test)]
async fn test_groups_go_to_largest_available_crew_first() {
    let (store, company_id, service_type) = seeded();
    store.insert_team(company_id, &fixtures::team("Big crew", Some(3)));
    store.insert_team(company_id, &fixtures::team("Small crew", Some(1)));

    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::ungeocoded_property(),
    )
    .await;
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::ungeocoded_property(),
    )
    .await;

    let summary = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect("assignment succeeds");

    // Big crew has the higher availability both times (3, then 2 vs 1).
    assert_eq!(summary.total_assigned, 2);
    assert_eq!(summary.teams_used, 1);
    assert_eq!(summary.assignments[0].team_name, "Big crew");
    assert_eq!(summary.assignments[0].count, 2);
}

#[test_log::test(tokio::test)]
async fn test_unlimited_crew_absorbs_everything() {
    let (store, company_id, service_type) = seeded();
    store.insert_team(company_id, &fixtures::team("Unbounded crew", None));
    for _ in 0..4 {
        appointment_at(
            &store,
            company_id,
            service_type.id,
            &fixtures::ungeocoded_property(),
        )
        .await;
    }

    let summary = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect("assignment succeeds");
    assert_eq!(summary.total_assigned, 4);
    assert_eq!(summary.remaining_unassigned, 0);
}

#[test_log::test(tokio::test)]
async fn test_no_unassigned_appointments_is_a_typed_failure() {
    let (store, company_id, _service_type) = seeded();
    store.insert_team(company_id, &fixtures::team("Idle crew", Some(5)));

    let err = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect_err("nothing to assign");
    assert!(matches!(
        err,
        ServiceError::NoUnassignedAppointments { date } if date == assignment_day()
    ));
}

#[test_log::test(tokio::test)]
async fn test_no_active_teams_is_a_typed_failure() {
    let (store, company_id, service_type) = seeded();
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::ungeocoded_property(),
    )
    .await;

    let err = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect_err("no crews exist");
    assert!(matches!(err, ServiceError::NoActiveTeams));
}

#[test_log::test(tokio::test)]
async fn test_inactive_teams_do_not_count() {
    let (store, company_id, service_type) = seeded();
    let mut bench = fixtures::team("Benched crew", Some(5));
    bench.is_active = false;
    store.insert_team(company_id, &bench);
    appointment_at(
        &store,
        company_id,
        service_type.id,
        &fixtures::ungeocoded_property(),
    )
    .await;

    let err = auto_assign(&store, company_id, assignment_day(), 5.0)
        .await
        .expect_err("only an inactive crew exists");
    assert!(matches!(err, ServiceError::NoActiveTeams));
}
