//! Domain entities, search filters and query projections.

pub mod member;
pub mod projection;
pub mod search;
pub mod team;
pub mod types;
