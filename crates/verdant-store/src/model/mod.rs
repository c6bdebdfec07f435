pub mod appointment;
pub mod property;
pub mod schedule;
pub mod service_type;
pub mod team;
