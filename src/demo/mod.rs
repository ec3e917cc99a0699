//! Canned kstat data for demo mode and tests

mod data;

pub use data::{DEMO_KSTAT_FILES, DEMO_KSTAT_JSON};
