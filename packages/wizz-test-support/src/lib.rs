//! Test support shared by the backend's unit and integration tests.

pub mod logging;
