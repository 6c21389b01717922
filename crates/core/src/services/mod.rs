//! Services: the report builder and the sources that feed it compiler output.

pub mod check;
pub mod sources;
