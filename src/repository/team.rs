//! Repository implementation for teams.

use diesel::dsl::{count, max, min, sum};
use diesel::prelude::*;

use crate::{
    domain::{
        projection::TeamAgeStats,
        team::{NewTeam, Team},
        types::TeamId,
    },
    models::team::{NewTeam as DbNewTeam, Team as DbTeam, TeamAgeRow},
    repository::{
        DieselRepository, TeamReader, TeamWriter,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl From<TeamAgeRow> for TeamAgeStats {
    fn from(row: TeamAgeRow) -> Self {
        let age_sum = row.age_sum.unwrap_or_default();
        let age_avg = if row.member_count > 0 {
            age_sum as f64 / row.member_count as f64
        } else {
            0.0
        };

        Self {
            team_id: row.team_id,
            team_name: row.team_name,
            member_count: row.member_count,
            age_sum,
            age_avg,
            age_max: row.age_max.unwrap_or_default(),
            age_min: row.age_min.unwrap_or_default(),
        }
    }
}

impl TeamWriter for DieselRepository {
    fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let db_new_team: DbNewTeam = new_team.into();

        let db_team = diesel::insert_into(teams::table)
            .values(&db_new_team)
            .get_result::<DbTeam>(&mut conn)?;

        Ok(Team::try_from(db_team)?)
    }
}

impl TeamReader for DieselRepository {
    fn get_team_by_id(&self, id: TeamId) -> RepositoryResult<Option<Team>> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        let db_team = teams::table
            .find(id.get())
            .first::<DbTeam>(&mut conn)
            .optional()?;

        db_team
            .map(|db_team| Team::try_from(db_team).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_teams(&self) -> RepositoryResult<Vec<Team>> {
        use crate::schema::teams;

        let mut conn = self.conn()?;
        teams::table
            .order(teams::name.asc())
            .load::<DbTeam>(&mut conn)?
            .into_iter()
            .map(|db_team| Team::try_from(db_team).map_err(RepositoryError::from))
            .collect()
    }

    fn team_age_stats(&self) -> RepositoryResult<Vec<TeamAgeStats>> {
        use crate::schema::{members, teams};

        let mut conn = self.conn()?;
        let rows = members::table
            .inner_join(teams::table)
            .group_by((teams::id, teams::name))
            .select((
                teams::id,
                teams::name,
                count(members::id),
                sum(members::age),
                max(members::age),
                min(members::age),
            ))
            .order(teams::name.asc())
            .load::<TeamAgeRow>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
