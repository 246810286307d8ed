//! Search form decoded from the `/api/v*/members` query string.

use serde::Deserialize;
use validator::Validate;

use crate::{
    domain::search::MemberSearchCond,
    forms::FormError,
    pagination::{PageRequest, SortOrder},
};

/// Raw query parameters; `sort` may repeat (`sort=age,desc&sort=username`).
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchForm {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
    pub page: Option<usize>,
    #[validate(range(min = 1))]
    pub size: Option<usize>,
    #[serde(default)]
    pub sort: Vec<String>,
}

/// Page size defaults and limits applied to search forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: usize,
    pub max_size: usize,
}

/// Validated search filter plus paging parameters.
#[derive(Debug)]
pub struct MemberSearchPayload {
    pub cond: MemberSearchCond,
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort: Vec<SortOrder>,
}

impl TryFrom<MemberSearchForm> for MemberSearchPayload {
    type Error = FormError;

    fn try_from(form: MemberSearchForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let sort = form
            .sort
            .iter()
            .map(|token| {
                token
                    .parse::<SortOrder>()
                    .map_err(|err| FormError::InvalidSort(err.to_string()))
            })
            .collect::<Result<Vec<SortOrder>, FormError>>()?;

        Ok(Self {
            cond: MemberSearchCond {
                username: form.username,
                team_name: form.team_name,
                age_goe: form.age_goe,
                age_loe: form.age_loe,
            },
            page: form.page,
            size: form.size,
            sort,
        })
    }
}

impl MemberSearchPayload {
    /// Builds the page request, clamping the size to `limits.max_size`.
    pub fn page_request(&self, limits: PageLimits) -> Result<PageRequest, FormError> {
        let size = self
            .size
            .unwrap_or(limits.default_size)
            .min(limits.max_size);

        let request = PageRequest::new(self.page.unwrap_or(0), size)
            .map_err(|err| FormError::InvalidPage(err.to_string()))?;

        Ok(self
            .sort
            .iter()
            .fold(request, |request, order| request.sort_by(*order)))
    }
}
