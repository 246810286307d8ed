//! Diesel lowering of search conditions over `members INNER JOIN teams`.

use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::projection::MemberTeamDto;
use crate::domain::search::Condition;
use crate::models::member::MemberTeamRow;
use crate::pagination::{PageRequest, SortDirection, SortField, SortOrder};
use crate::schema::{members, teams};

pub type MemberTeamSource = InnerJoin<members::table, teams::table>;
pub type BoxedMemberTeamQuery<'a> = IntoBoxed<'a, MemberTeamSource, Sqlite>;

/// Join query filtered by `condition`; rows without a team are excluded.
pub fn member_team_query(condition: &Condition) -> BoxedMemberTeamQuery<'static> {
    apply_condition(members::table.inner_join(teams::table).into_boxed(), condition)
}

fn apply_condition<'a>(
    query: BoxedMemberTeamQuery<'a>,
    condition: &Condition,
) -> BoxedMemberTeamQuery<'a> {
    match condition {
        Condition::Always => query,
        Condition::UsernameEq(username) => query.filter(members::username.eq(username.clone())),
        Condition::TeamNameEq(team_name) => query.filter(teams::name.eq(team_name.clone())),
        Condition::AgeGoe(age) => query.filter(members::age.ge(*age)),
        Condition::AgeLoe(age) => query.filter(members::age.le(*age)),
        Condition::All(parts) => parts
            .iter()
            .fold(query, |query, part| apply_condition(query, part)),
    }
}

/// Applies the requested orders followed by `members.id ASC`.
fn apply_sort<'a>(query: BoxedMemberTeamQuery<'a>, sort: &[SortOrder]) -> BoxedMemberTeamQuery<'a> {
    sort.iter()
        .fold(query, |query, order| match (order.field, order.direction) {
            (SortField::Id, SortDirection::Asc) => query.then_order_by(members::id.asc()),
            (SortField::Id, SortDirection::Desc) => query.then_order_by(members::id.desc()),
            (SortField::Username, SortDirection::Asc) => {
                query.then_order_by(members::username.asc())
            }
            (SortField::Username, SortDirection::Desc) => {
                query.then_order_by(members::username.desc())
            }
            (SortField::Age, SortDirection::Asc) => query.then_order_by(members::age.asc()),
            (SortField::Age, SortDirection::Desc) => query.then_order_by(members::age.desc()),
            (SortField::TeamName, SortDirection::Asc) => query.then_order_by(teams::name.asc()),
            (SortField::TeamName, SortDirection::Desc) => query.then_order_by(teams::name.desc()),
        })
        .then_order_by(members::id.asc())
}

/// Loads every projected row matching `condition`, ordered by member id.
pub fn load_member_teams(
    conn: &mut SqliteConnection,
    condition: &Condition,
) -> QueryResult<Vec<MemberTeamDto>> {
    let rows = apply_sort(member_team_query(condition), &[])
        .select((
            members::id,
            members::username,
            members::age,
            teams::id,
            teams::name,
        ))
        .load::<MemberTeamRow>(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Loads one page of projected rows matching `condition`.
pub fn load_member_team_page(
    conn: &mut SqliteConnection,
    condition: &Condition,
    request: &PageRequest,
) -> QueryResult<Vec<MemberTeamDto>> {
    let rows = apply_sort(member_team_query(condition), request.sort())
        .select((
            members::id,
            members::username,
            members::age,
            teams::id,
            teams::name,
        ))
        .offset(i64::try_from(request.offset()).unwrap_or(i64::MAX))
        .limit(i64::try_from(request.size()).unwrap_or(i64::MAX))
        .load::<MemberTeamRow>(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Counts the rows matching `condition`.
pub fn count_member_teams(conn: &mut SqliteConnection, condition: &Condition) -> QueryResult<usize> {
    let total: i64 = member_team_query(condition).count().get_result(conn)?;
    Ok(total as usize)
}
