//! Fetches CloudStack instance metadata (instance id, addresses, hostnames,
//! service offering, user data) from inside a guest and aggregates it into
//! one record.

pub mod config;
pub mod errors;
pub mod logging;
pub mod metadata;
pub mod utils;

pub use errors::Error;
