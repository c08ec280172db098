//! Interview-preparation content backend.
//!
//! Layering mirrors the request path: `infra::http` handles transport,
//! `application` holds services and repository contracts, `infra::db` binds
//! them to Postgres, and `cache` wraps the GET surface with a read-through
//! response cache invalidated by the write paths.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
