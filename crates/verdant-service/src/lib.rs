//! Verdant's algorithmic core: schedule expansion and crew dispatch.
//!
//! [`scheduling`] turns declarative schedules into dated appointments over a
//! window, idempotently. [`dispatch`] groups a day's unassigned appointments
//! by geographic proximity and allocates whole groups to crews by remaining
//! capacity. Both talk to persistence exclusively through
//! [`verdant_store::store::Datastore`].

pub mod dispatch;
pub mod error;
pub mod scheduling;
