//! Member lookups and searches exposed to the HTTP layer.

use crate::domain::member::Member;
use crate::domain::projection::MemberTeamDto;
use crate::domain::types::MemberId;
use crate::forms::members::{MemberSearchForm, MemberSearchPayload, PageLimits};
use crate::pagination::Page;
use crate::repository::MemberReader;
use crate::services::{ServiceError, ServiceResult};

/// How the total of a paged search is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalStrategy {
    /// Content and count read together in one transaction.
    Eager,
    /// Count query issued only when the page content cannot prove the total.
    Deferred,
}

/// Returns a member by id.
pub fn get_member<R>(repo: &R, id: i32) -> ServiceResult<Member>
where
    R: MemberReader + ?Sized,
{
    let id = MemberId::new(id)?;
    repo.get_member_by_id(id)?.ok_or(ServiceError::NotFound)
}

/// Returns every member/team row matching the form, unpaged.
pub fn search_members<R>(repo: &R, form: MemberSearchForm) -> ServiceResult<Vec<MemberTeamDto>>
where
    R: MemberReader + ?Sized,
{
    let payload = MemberSearchPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate search form: {err}");
        ServiceError::from(err)
    })?;

    Ok(repo.search_members(&payload.cond)?)
}

/// Returns one page of member/team rows matching the form.
pub fn search_members_page<R>(
    repo: &R,
    form: MemberSearchForm,
    limits: PageLimits,
    strategy: TotalStrategy,
) -> ServiceResult<Page<MemberTeamDto>>
where
    R: MemberReader + ?Sized,
{
    let payload = MemberSearchPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate search form: {err}");
        ServiceError::from(err)
    })?;
    let request = payload.page_request(limits)?;

    let page = match strategy {
        TotalStrategy::Eager => repo.search_members_page(&payload.cond, &request)?,
        TotalStrategy::Deferred => repo
            .search_members_page_deferred(&payload.cond, &request)?
            .into_page()?,
    };

    Ok(page)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::projection::MemberDto;
    use crate::domain::search::{MemberSearchCond, compose};
    use crate::domain::types::{Age, TeamId, Username};
    use crate::pagination::{DeferredPage, PageRequest};
    use crate::repository::DeferredMemberPage;
    use crate::repository::errors::RepositoryResult;

    const LIMITS: PageLimits = PageLimits {
        default_size: 20,
        max_size: 100,
    };

    struct InMemoryRepo {
        rows: Vec<MemberTeamDto>,
        counts: Arc<AtomicUsize>,
    }

    impl InMemoryRepo {
        fn new() -> Self {
            Self {
                rows: vec![
                    MemberTeamDto::new(1, "member1", 10, 1, "teamA"),
                    MemberTeamDto::new(2, "member2", 20, 1, "teamA"),
                    MemberTeamDto::new(3, "member3", 30, 2, "teamB"),
                    MemberTeamDto::new(4, "member4", 40, 2, "teamB"),
                ],
                counts: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn matching(&self, cond: &MemberSearchCond) -> Vec<MemberTeamDto> {
            let condition = compose(cond);
            self.rows
                .iter()
                .filter(|row| condition.matches(row))
                .cloned()
                .collect()
        }

        fn slice(rows: &[MemberTeamDto], request: &PageRequest) -> Vec<MemberTeamDto> {
            rows.iter()
                .skip(request.offset())
                .take(request.size())
                .cloned()
                .collect()
        }
    }

    impl MemberReader for InMemoryRepo {
        fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>> {
            self.rows
                .iter()
                .find(|row| row.member_id == id.get())
                .map(|row| -> RepositoryResult<Member> {
                    Ok(Member {
                        id,
                        username: Username::new(row.username.as_str())?,
                        age: Age::new(row.age)?,
                        team_id: Some(TeamId::new(row.team_id)?),
                    })
                })
                .transpose()
        }

        fn list_members(&self) -> RepositoryResult<Vec<Member>> {
            Ok(vec![])
        }

        fn find_members_by_username(&self, _username: &Username) -> RepositoryResult<Vec<Member>> {
            Ok(vec![])
        }

        fn list_member_summaries(&self) -> RepositoryResult<Vec<MemberDto>> {
            Ok(vec![])
        }

        fn search_members(&self, cond: &MemberSearchCond) -> RepositoryResult<Vec<MemberTeamDto>> {
            Ok(self.matching(cond))
        }

        fn search_members_page(
            &self,
            cond: &MemberSearchCond,
            request: &PageRequest,
        ) -> RepositoryResult<Page<MemberTeamDto>> {
            let rows = self.matching(cond);
            Ok(Page::new(Self::slice(&rows, request), request, rows.len()))
        }

        fn search_members_page_deferred(
            &self,
            cond: &MemberSearchCond,
            request: &PageRequest,
        ) -> RepositoryResult<DeferredMemberPage> {
            let rows = self.matching(cond);
            let total = rows.len();
            let counts = Arc::clone(&self.counts);
            Ok(DeferredPage::new(
                Self::slice(&rows, request),
                request.clone(),
                move || {
                    counts.fetch_add(1, Ordering::SeqCst);
                    Ok(total)
                },
            ))
        }
    }

    fn form(team_name: Option<&str>, page: usize, size: usize) -> MemberSearchForm {
        MemberSearchForm {
            team_name: team_name.map(str::to_string),
            page: Some(page),
            size: Some(size),
            ..MemberSearchForm::default()
        }
    }

    #[test]
    fn search_finds_single_member_in_age_range() {
        let repo = InMemoryRepo::new();
        let form = MemberSearchForm {
            team_name: Some("teamB".to_string()),
            age_goe: Some(35),
            age_loe: Some(40),
            ..MemberSearchForm::default()
        };

        let rows = search_members(&repo, form).unwrap();

        assert_eq!(rows, vec![MemberTeamDto::new(4, "member4", 40, 2, "teamB")]);
    }

    #[test]
    fn deferred_total_matches_eager_total() {
        let repo = InMemoryRepo::new();

        for team_name in [None, Some("teamA"), Some("teamB"), Some("teamC"), Some("  ")] {
            for size in 1..=5 {
                for page in 0..=5 {
                    let eager = search_members_page(
                        &repo,
                        form(team_name, page, size),
                        LIMITS,
                        TotalStrategy::Eager,
                    )
                    .unwrap();
                    let deferred = search_members_page(
                        &repo,
                        form(team_name, page, size),
                        LIMITS,
                        TotalStrategy::Deferred,
                    )
                    .unwrap();

                    assert_eq!(eager.total, deferred.total, "{team_name:?} {page} {size}");
                    assert_eq!(eager.items, deferred.items);
                    assert!(deferred.items.len() <= size);
                }
            }
        }
    }

    #[test]
    fn full_first_page_issues_count_query() {
        let repo = InMemoryRepo::new();

        let page =
            search_members_page(&repo, form(None, 0, 2), LIMITS, TotalStrategy::Deferred).unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 4);
        assert_eq!(page.total_pages, 2);
        assert_eq!(repo.counts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn short_first_page_skips_count_query() {
        let repo = InMemoryRepo::new();

        let page =
            search_members_page(&repo, form(None, 0, 10), LIMITS, TotalStrategy::Deferred)
                .unwrap();

        assert_eq!(page.total, 4);
        assert_eq!(repo.counts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn short_last_page_skips_count_query() {
        let repo = InMemoryRepo::new();

        let page =
            search_members_page(&repo, form(None, 1, 3), LIMITS, TotalStrategy::Deferred).unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 4);
        assert_eq!(repo.counts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn get_member_reports_missing_and_invalid_ids() {
        let repo = InMemoryRepo::new();

        assert_eq!(get_member(&repo, 3).unwrap().username.as_str(), "member3");
        assert!(matches!(get_member(&repo, 99), Err(ServiceError::NotFound)));
        assert!(matches!(
            get_member(&repo, 0),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn invalid_form_is_a_validation_error() {
        let repo = InMemoryRepo::new();

        let result = search_members_page(
            &repo,
            MemberSearchForm {
                sort: vec!["salary".to_string()],
                ..MemberSearchForm::default()
            },
            LIMITS,
            TotalStrategy::Eager,
        );

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[cfg(feature = "test-mocks")]
    #[test]
    fn repository_errors_propagate_unchanged() {
        use crate::repository::errors::RepositoryError;
        use crate::repository::mock::MockRepository;

        let mut repo = MockRepository::new();
        repo.expect_search_members()
            .returning(|_| Err(RepositoryError::ConnectionError("pool exhausted".into())));

        let result = search_members(&repo, MemberSearchForm::default());

        assert!(matches!(
            result,
            Err(ServiceError::Repository(RepositoryError::ConnectionError(_)))
        ));
    }
}
