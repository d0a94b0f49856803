//! Common test utilities for travelscout integration tests

#[allow(dead_code)]
pub mod browsers;
#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use browsers::*;
#[allow(unused_imports)]
pub use fixtures::*;
