//! Schedule expansion: recurrence arithmetic, seasonal resolution, and the
//! windowed appointment generator.

pub mod generator;
pub mod recurrence;
pub mod season;
