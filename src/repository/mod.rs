use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        member::{Member, NewMember, UpdateMember},
        projection::{MemberDto, MemberTeamDto, TeamAgeStats},
        search::MemberSearchCond,
        team::{NewTeam, Team},
        types::{Age, MemberId, TeamId, Username},
    },
    pagination::{DeferredPage, Page, PageRequest},
    repository::errors::{RepositoryError, RepositoryResult},
};

pub mod errors;
pub mod member;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod query;
pub mod team;

/// Page of search results whose total may still need a count query.
pub type DeferredMemberPage = DeferredPage<MemberTeamDto, RepositoryError>;

/// Diesel-backed repository sharing one connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

pub trait MemberReader {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
    fn list_members(&self) -> RepositoryResult<Vec<Member>>;
    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
    fn list_member_summaries(&self) -> RepositoryResult<Vec<MemberDto>>;
    /// All rows of the member ⋈ team join matching `cond`.
    fn search_members(&self, cond: &MemberSearchCond) -> RepositoryResult<Vec<MemberTeamDto>>;
    /// One page plus its exact total, read in a single transaction.
    fn search_members_page(
        &self,
        cond: &MemberSearchCond,
        request: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>>;
    /// One page; the count query runs only if the total is requested and
    /// cannot be inferred from the page content.
    fn search_members_page_deferred(
        &self,
        cond: &MemberSearchCond,
        request: &PageRequest,
    ) -> RepositoryResult<DeferredMemberPage>;
}

pub trait MemberWriter {
    fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
    fn update_member(&self, id: MemberId, updates: &UpdateMember) -> RepositoryResult<Member>;
    fn delete_member(&self, id: MemberId) -> RepositoryResult<()>;
    /// Adds `delta` to every member's age.
    fn add_age_to_all(&self, delta: i32) -> RepositoryResult<usize>;
    /// Renames every member younger than `age`.
    fn rename_younger_than(&self, age: Age, username: &Username) -> RepositoryResult<usize>;
    fn delete_older_than(&self, age: Age) -> RepositoryResult<usize>;
}

pub trait TeamReader {
    fn get_team_by_id(&self, id: TeamId) -> RepositoryResult<Option<Team>>;
    fn list_teams(&self) -> RepositoryResult<Vec<Team>>;
    /// Per-team age aggregates; teams without members are omitted.
    fn team_age_stats(&self) -> RepositoryResult<Vec<TeamAgeStats>>;
}

pub trait TeamWriter {
    fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
}
