//! Read-only, query-shaped result rows.
//!
//! Projections carry plain values selected straight from a query. They have
//! no identity beyond their fields and are never written back.

use serde::{Deserialize, Serialize};

/// One row of the member ⋈ team join.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: i32,
    pub username: String,
    pub age: i32,
    pub team_id: i32,
    pub team_name: String,
}

impl MemberTeamDto {
    pub fn new(
        member_id: i32,
        username: impl Into<String>,
        age: i32,
        team_id: i32,
        team_name: impl Into<String>,
    ) -> Self {
        Self {
            member_id,
            username: username.into(),
            age,
            team_id,
            team_name: team_name.into(),
        }
    }
}

/// Username and age of a single member.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberDto {
    pub username: String,
    pub age: i32,
}

/// Age statistics of the members of one team.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamAgeStats {
    pub team_id: i32,
    pub team_name: String,
    pub member_count: i64,
    pub age_sum: i64,
    pub age_avg: f64,
    pub age_max: i32,
    pub age_min: i32,
}
