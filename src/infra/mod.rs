//! Infrastructure: Postgres repositories, HTTP surface, telemetry.

pub mod db;
pub mod error;
pub mod http;
pub mod telemetry;
