use diesel::prelude::*;

use crate::domain::member::{
    Member as DomainMember, NewMember as DomainNewMember, UpdateMember as DomainUpdateMember,
};
use crate::domain::projection::MemberTeamDto;
use crate::domain::types::{Age, MemberId, TeamId, TypeConstraintError, Username};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::members)]
/// Diesel model for [`crate::domain::member::Member`].
pub struct Member {
    pub id: i32,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::members)]
/// Insertable form of [`Member`].
pub struct NewMember<'a> {
    pub username: &'a str,
    pub age: i32,
    pub team_id: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::members)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Member`] record.
pub struct UpdateMember<'a> {
    pub username: &'a str,
    pub age: i32,
    pub team_id: Option<i32>,
}

/// Row of the member ⋈ team projection, in select order.
#[derive(Debug, Queryable)]
pub struct MemberTeamRow {
    pub member_id: i32,
    pub username: String,
    pub age: i32,
    pub team_id: i32,
    pub team_name: String,
}

impl TryFrom<Member> for DomainMember {
    type Error = TypeConstraintError;

    fn try_from(member: Member) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MemberId::new(member.id)?,
            username: Username::new(member.username)?,
            age: Age::new(member.age)?,
            team_id: member.team_id.map(TeamId::new).transpose()?,
        })
    }
}

impl<'a> From<&'a DomainNewMember> for NewMember<'a> {
    fn from(member: &'a DomainNewMember) -> Self {
        Self {
            username: member.username.as_str(),
            age: member.age.get(),
            team_id: member.team_id.map(TeamId::get),
        }
    }
}

impl<'a> From<&'a DomainUpdateMember> for UpdateMember<'a> {
    fn from(member: &'a DomainUpdateMember) -> Self {
        Self {
            username: member.username.as_str(),
            age: member.age.get(),
            team_id: member.team_id.map(TeamId::get),
        }
    }
}

impl From<MemberTeamRow> for MemberTeamDto {
    fn from(row: MemberTeamRow) -> Self {
        Self {
            member_id: row.member_id,
            username: row.username,
            age: row.age,
            team_id: row.team_id,
            team_name: row.team_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_domain_new() -> DomainNewMember {
        DomainNewMember::new(
            Username::new("member1").unwrap(),
            Age::new(10).unwrap(),
            Some(TeamId::new(3).unwrap()),
        )
    }

    #[test]
    fn from_domain_new_creates_newmember() {
        let domain = sample_domain_new();
        let new: NewMember = (&domain).into();
        assert_eq!(new.username, "member1");
        assert_eq!(new.age, 10);
        assert_eq!(new.team_id, Some(3));
    }

    #[test]
    fn from_domain_update_keeps_detached_team() {
        let domain = DomainUpdateMember::new(
            Username::new("renamed").unwrap(),
            Age::new(11).unwrap(),
            None,
        );
        let update: UpdateMember = (&domain).into();
        assert_eq!(update.username, "renamed");
        assert_eq!(update.age, 11);
        assert_eq!(update.team_id, None);
    }

    #[test]
    fn member_into_domain() {
        let db_member = Member {
            id: 1,
            username: "member1".to_string(),
            age: 10,
            team_id: Some(2),
        };
        let domain = DomainMember::try_from(db_member).unwrap();
        assert_eq!(domain.id.get(), 1);
        assert_eq!(domain.username.as_str(), "member1");
        assert_eq!(domain.age.get(), 10);
        assert_eq!(domain.team_id.map(TeamId::get), Some(2));
    }

    #[test]
    fn member_with_invalid_id_is_rejected() {
        let db_member = Member {
            id: 0,
            username: "member1".to_string(),
            age: 10,
            team_id: None,
        };
        assert_eq!(
            DomainMember::try_from(db_member),
            Err(TypeConstraintError::NonPositiveId)
        );
    }
}
