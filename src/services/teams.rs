//! Team-level aggregates.

use crate::domain::projection::TeamAgeStats;
use crate::repository::TeamReader;
use crate::services::ServiceResult;

/// Returns member-age statistics for every team that has members.
pub fn team_age_stats<R>(repo: &R) -> ServiceResult<Vec<TeamAgeStats>>
where
    R: TeamReader + ?Sized,
{
    Ok(repo.team_age_stats()?)
}
