//! Member search filter and the condition it composes into.
//!
//! [`compose`] turns a [`MemberSearchCond`] into an immutable [`Condition`]
//! tree. Absent or blank filter fields contribute nothing, so an empty filter
//! composes to [`Condition::Always`]. The tree is evaluated in memory with
//! [`Condition::matches`] and lowered to SQL by the repository layer.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::projection::MemberTeamDto;

/// Optional search constraints over the member ⋈ team join.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSearchCond {
    /// Exact member username.
    pub username: Option<String>,
    /// Exact team name.
    pub team_name: Option<String>,
    /// Inclusive lower age bound.
    pub age_goe: Option<i32>,
    /// Inclusive upper age bound.
    pub age_loe: Option<i32>,
}

impl MemberSearchCond {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }
}

/// Boolean expression over the columns of the member ⋈ team join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Matches every row.
    Always,
    UsernameEq(String),
    TeamNameEq(String),
    AgeGoe(i32),
    AgeLoe(i32),
    /// Conjunction of two or more conditions, none of them `Always`.
    All(Vec<Condition>),
}

impl Condition {
    /// Conjunction of `self` and `other`.
    ///
    /// `Always` is the identity and nested conjunctions are flattened.
    #[must_use]
    pub fn and(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::Always, condition) | (condition, Condition::Always) => condition,
            (Condition::All(mut left), Condition::All(right)) => {
                left.extend(right);
                Condition::All(left)
            }
            (Condition::All(mut left), condition) => {
                left.push(condition);
                Condition::All(left)
            }
            (condition, Condition::All(mut right)) => {
                right.insert(0, condition);
                Condition::All(right)
            }
            (left, right) => Condition::All(vec![left, right]),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Condition::Always)
    }

    /// Evaluates the condition against a projected row.
    pub fn matches(&self, row: &MemberTeamDto) -> bool {
        match self {
            Condition::Always => true,
            Condition::UsernameEq(username) => row.username == *username,
            Condition::TeamNameEq(team_name) => row.team_name == *team_name,
            Condition::AgeGoe(age) => row.age >= *age,
            Condition::AgeLoe(age) => row.age <= *age,
            Condition::All(parts) => parts.iter().all(|part| part.matches(row)),
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Always => write!(f, "TRUE"),
            Condition::UsernameEq(username) => write!(f, "member.username = {username:?}"),
            Condition::TeamNameEq(team_name) => write!(f, "team.name = {team_name:?}"),
            Condition::AgeGoe(age) => write!(f, "member.age >= {age}"),
            Condition::AgeLoe(age) => write!(f, "member.age <= {age}"),
            Condition::All(parts) => {
                for (index, part) in parts.iter().enumerate() {
                    if index > 0 {
                        write!(f, " AND ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// Composes the search filter into a single condition.
pub fn compose(cond: &MemberSearchCond) -> Condition {
    [
        username_eq(cond.username.as_deref()),
        team_name_eq(cond.team_name.as_deref()),
        age_goe(cond.age_goe),
        age_loe(cond.age_loe),
    ]
    .into_iter()
    .fold(Condition::Always, Condition::and)
}

/// Returns the value, untouched, when it has at least one non-whitespace
/// character.
fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn username_eq(username: Option<&str>) -> Condition {
    has_text(username).map_or(Condition::Always, |s| Condition::UsernameEq(s.to_string()))
}

fn team_name_eq(team_name: Option<&str>) -> Condition {
    has_text(team_name).map_or(Condition::Always, |s| Condition::TeamNameEq(s.to_string()))
}

fn age_goe(age: Option<i32>) -> Condition {
    age.map_or(Condition::Always, Condition::AgeGoe)
}

fn age_loe(age: Option<i32>) -> Condition {
    age.map_or(Condition::Always, Condition::AgeLoe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<MemberTeamDto> {
        vec![
            MemberTeamDto::new(1, "member1", 10, 1, "teamA"),
            MemberTeamDto::new(2, "member2", 20, 1, "teamA"),
            MemberTeamDto::new(3, "member3", 30, 2, "teamB"),
            MemberTeamDto::new(4, "member4", 40, 2, "teamB"),
        ]
    }

    fn matching_ids(condition: &Condition, rows: &[MemberTeamDto]) -> Vec<i32> {
        rows.iter()
            .filter(|row| condition.matches(row))
            .map(|row| row.member_id)
            .collect()
    }

    #[test]
    fn empty_filter_matches_every_row() {
        let condition = compose(&MemberSearchCond::new());

        assert_eq!(condition, Condition::Always);
        assert_eq!(matching_ids(&condition, &sample_rows()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn blank_strings_behave_like_absent_fields() {
        let blank = MemberSearchCond::new().username("   ").team_name("\t\n");

        assert_eq!(compose(&blank), compose(&MemberSearchCond::new()));
    }

    #[test]
    fn single_lower_bound_matches_subset() {
        let condition = compose(&MemberSearchCond::new().age_goe(30));
        let mut rows = sample_rows();

        assert_eq!(condition, Condition::AgeGoe(30));
        assert_eq!(matching_ids(&condition, &rows), vec![3, 4]);

        rows.reverse();
        assert_eq!(matching_ids(&condition, &rows), vec![4, 3]);
    }

    #[test]
    fn single_upper_bound_is_inclusive() {
        let condition = compose(&MemberSearchCond::new().age_loe(20));

        assert_eq!(matching_ids(&condition, &sample_rows()), vec![1, 2]);
    }

    #[test]
    fn team_and_age_range_select_one_member() {
        let cond = MemberSearchCond::new()
            .team_name("teamB")
            .age_goe(35)
            .age_loe(40);
        let condition = compose(&cond);

        assert_eq!(
            condition,
            Condition::All(vec![
                Condition::TeamNameEq("teamB".into()),
                Condition::AgeGoe(35),
                Condition::AgeLoe(40),
            ])
        );
        assert_eq!(matching_ids(&condition, &sample_rows()), vec![4]);
    }

    #[test]
    fn padded_string_filters_compare_verbatim() {
        let condition = compose(&MemberSearchCond::new().username(" member2 "));
        assert_eq!(condition, Condition::UsernameEq(" member2 ".into()));
        assert!(matching_ids(&condition, &sample_rows()).is_empty());

        let condition = compose(&MemberSearchCond::new().team_name(" teamB "));
        assert_eq!(condition, Condition::TeamNameEq(" teamB ".into()));
        assert!(matching_ids(&condition, &sample_rows()).is_empty());
    }

    #[test]
    fn composing_is_pure_and_repeatable() {
        let cond = MemberSearchCond::new().username("member1").age_loe(15);
        let before = cond.clone();

        let first = compose(&cond);
        let second = compose(&cond);

        assert_eq!(first, second);
        assert_eq!(cond, before);
    }

    #[test]
    fn and_flattens_nested_conjunctions() {
        let left = Condition::AgeGoe(1).and(Condition::AgeLoe(2));
        let right = Condition::UsernameEq("a".into()).and(Condition::TeamNameEq("b".into()));

        let combined = left.and(Condition::Always).and(right);

        assert_eq!(
            combined,
            Condition::All(vec![
                Condition::AgeGoe(1),
                Condition::AgeLoe(2),
                Condition::UsernameEq("a".into()),
                Condition::TeamNameEq("b".into()),
            ])
        );
    }

    #[test]
    fn display_renders_readable_expression() {
        let condition = compose(&MemberSearchCond::new().team_name("teamB").age_goe(35));

        assert_eq!(condition.to_string(), "team.name = \"teamB\" AND member.age >= 35");
        assert_eq!(Condition::Always.to_string(), "TRUE");
    }
}
