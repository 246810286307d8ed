//! Database models shared across the member repository.

#[cfg(feature = "server")]
pub mod config;
pub mod member;
pub mod team;
