use diesel::prelude::*;

use crate::domain::team::{NewTeam as DomainNewTeam, Team as DomainTeam};
use crate::domain::types::{TeamId, TeamName, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::teams)]
/// Diesel model for [`crate::domain::team::Team`].
pub struct Team {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::teams)]
pub struct NewTeam<'a> {
    pub name: &'a str,
}

/// Aggregated member ages of one team, in select order.
#[derive(Debug, Queryable)]
pub struct TeamAgeRow {
    pub team_id: i32,
    pub team_name: String,
    pub member_count: i64,
    pub age_sum: Option<i64>,
    pub age_max: Option<i32>,
    pub age_min: Option<i32>,
}

impl TryFrom<Team> for DomainTeam {
    type Error = TypeConstraintError;

    fn try_from(team: Team) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TeamId::new(team.id)?,
            name: TeamName::new(team.name)?,
        })
    }
}

impl<'a> From<&'a DomainNewTeam> for NewTeam<'a> {
    fn from(team: &'a DomainNewTeam) -> Self {
        Self {
            name: team.name.as_str(),
        }
    }
}
