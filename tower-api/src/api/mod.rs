//! Endpoint modules, grouped by API tag

pub mod default;
