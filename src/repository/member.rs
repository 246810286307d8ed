//! Repository implementation for members and member searches.

use diesel::prelude::*;

use crate::{
    db::get_connection,
    domain::{
        member::{Member, NewMember, UpdateMember},
        projection::{MemberDto, MemberTeamDto},
        search::{MemberSearchCond, compose},
        types::{Age, MemberId, Username},
    },
    models::member::{
        Member as DbMember, NewMember as DbNewMember, UpdateMember as DbUpdateMember,
    },
    pagination::{DeferredPage, Page, PageRequest},
    repository::{
        DeferredMemberPage, DieselRepository, MemberReader, MemberWriter,
        errors::{RepositoryError, RepositoryResult},
        query::{count_member_teams, load_member_team_page, load_member_teams},
    },
};

fn into_domain(db_members: Vec<DbMember>) -> RepositoryResult<Vec<Member>> {
    db_members
        .into_iter()
        .map(|db_member| Member::try_from(db_member).map_err(RepositoryError::from))
        .collect()
}

impl MemberReader for DieselRepository {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_member = members::table
            .find(id.get())
            .first::<DbMember>(&mut conn)
            .optional()?;

        match db_member {
            Some(db_member) => Ok(Some(
                Member::try_from(db_member).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_members(&self) -> RepositoryResult<Vec<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_members = members::table
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain(db_members)
    }

    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_members = members::table
            .filter(members::username.eq(username.as_str()))
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain(db_members)
    }

    fn list_member_summaries(&self) -> RepositoryResult<Vec<MemberDto>> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let rows = members::table
            .select((members::username, members::age))
            .order(members::id.asc())
            .load::<(String, i32)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(username, age)| MemberDto { username, age })
            .collect())
    }

    fn search_members(&self, cond: &MemberSearchCond) -> RepositoryResult<Vec<MemberTeamDto>> {
        let condition = compose(cond);
        log::debug!("searching members where {condition}");

        let mut conn = self.conn()?;
        Ok(load_member_teams(&mut conn, &condition)?)
    }

    fn search_members_page(
        &self,
        cond: &MemberSearchCond,
        request: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>> {
        let condition = compose(cond);
        log::debug!(
            "searching members page {} size {} where {condition}",
            request.page(),
            request.size()
        );

        let mut conn = self.conn()?;
        let (items, total) = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let items = load_member_team_page(conn, &condition, request)?;
            let total = count_member_teams(conn, &condition)?;
            Ok((items, total))
        })?;

        Ok(Page::new(items, request, total))
    }

    fn search_members_page_deferred(
        &self,
        cond: &MemberSearchCond,
        request: &PageRequest,
    ) -> RepositoryResult<DeferredMemberPage> {
        let condition = compose(cond);
        log::debug!(
            "searching members page {} size {} where {condition}, total deferred",
            request.page(),
            request.size()
        );

        let items = {
            let mut conn = self.conn()?;
            load_member_team_page(&mut conn, &condition, request)?
        };

        let pool = self.pool.clone();
        Ok(DeferredPage::new(items, request.clone(), move || {
            log::debug!("running deferred count where {condition}");
            let mut conn = get_connection(&pool)?;
            Ok(count_member_teams(&mut conn, &condition)?)
        }))
    }
}

impl MemberWriter for DieselRepository {
    fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_new_member: DbNewMember = new_member.into();

        let db_member = diesel::insert_into(members::table)
            .values(&db_new_member)
            .get_result::<DbMember>(&mut conn)?;

        Ok(Member::try_from(db_member)?)
    }

    fn update_member(&self, id: MemberId, updates: &UpdateMember) -> RepositoryResult<Member> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateMember = updates.into();

        let updated = diesel::update(members::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbMember>(&mut conn)?;

        Ok(Member::try_from(updated)?)
    }

    fn delete_member(&self, id: MemberId) -> RepositoryResult<()> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        diesel::delete(members::table.find(id.get())).execute(&mut conn)?;
        Ok(())
    }

    fn add_age_to_all(&self, delta: i32) -> RepositoryResult<usize> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let affected = diesel::update(members::table)
            .set(members::age.eq(members::age + delta))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn rename_younger_than(&self, age: Age, username: &Username) -> RepositoryResult<usize> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let affected = diesel::update(members::table.filter(members::age.lt(age.get())))
            .set(members::username.eq(username.as_str()))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_older_than(&self, age: Age) -> RepositoryResult<usize> {
        use crate::schema::members;

        let mut conn = self.conn()?;
        let affected = diesel::delete(members::table.filter(members::age.gt(age.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
