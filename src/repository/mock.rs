//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::member::{Member, NewMember, UpdateMember};
use crate::domain::projection::{MemberDto, MemberTeamDto, TeamAgeStats};
use crate::domain::search::MemberSearchCond;
use crate::domain::team::{NewTeam, Team};
use crate::domain::types::{Age, MemberId, TeamId, Username};
use crate::pagination::{Page, PageRequest};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DeferredMemberPage, MemberReader, MemberWriter, TeamReader, TeamWriter};

mock! {
    pub Repository {}

    impl MemberReader for Repository {
        fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
        fn list_members(&self) -> RepositoryResult<Vec<Member>>;
        fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
        fn list_member_summaries(&self) -> RepositoryResult<Vec<MemberDto>>;
        fn search_members(&self, cond: &MemberSearchCond) -> RepositoryResult<Vec<MemberTeamDto>>;
        fn search_members_page(
            &self,
            cond: &MemberSearchCond,
            request: &PageRequest,
        ) -> RepositoryResult<Page<MemberTeamDto>>;
        fn search_members_page_deferred(
            &self,
            cond: &MemberSearchCond,
            request: &PageRequest,
        ) -> RepositoryResult<DeferredMemberPage>;
    }

    impl MemberWriter for Repository {
        fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
        fn update_member(&self, id: MemberId, updates: &UpdateMember) -> RepositoryResult<Member>;
        fn delete_member(&self, id: MemberId) -> RepositoryResult<()>;
        fn add_age_to_all(&self, delta: i32) -> RepositoryResult<usize>;
        fn rename_younger_than(&self, age: Age, username: &Username) -> RepositoryResult<usize>;
        fn delete_older_than(&self, age: Age) -> RepositoryResult<usize>;
    }

    impl TeamReader for Repository {
        fn get_team_by_id(&self, id: TeamId) -> RepositoryResult<Option<Team>>;
        fn list_teams(&self) -> RepositoryResult<Vec<Team>>;
        fn team_age_stats(&self) -> RepositoryResult<Vec<TeamAgeStats>>;
    }

    impl TeamWriter for Repository {
        fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
    }
}
