//! Page requests, page results and the count-elision rule.
//!
//! A [`Page`] always carries an exact total. A [`DeferredPage`] holds the
//! content of a page together with a not-yet-executed count query; the query
//! only runs when the total is asked for and cannot be inferred from the
//! content itself (see [`known_total`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Column a page may be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Username,
    Age,
    TeamName,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = TypeConstraintError;

    /// Parses `field` or `field,direction`, e.g. `age,desc`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(',').map(str::trim);

        let field = match parts.next().unwrap_or_default() {
            "id" => SortField::Id,
            "username" => SortField::Username,
            "age" => SortField::Age,
            "teamName" | "team_name" => SortField::TeamName,
            other => {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "unknown sort field `{other}`"
                )));
            }
        };

        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(TypeConstraintError::InvalidValue(format!(
                    "unknown sort direction `{other}`"
                )));
            }
        };

        if parts.next().is_some() {
            return Err(TypeConstraintError::InvalidValue(format!(
                "malformed sort `{value}`"
            )));
        }

        Ok(Self { field, direction })
    }
}

/// Zero-based page index, a positive page size and optional sort orders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: usize,
    size: usize,
    sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Fails when `size` is zero or when the page's last row lies beyond
    /// what an SQL `OFFSET`/`LIMIT` can address.
    pub fn new(page: usize, size: usize) -> Result<Self, TypeConstraintError> {
        if size == 0 {
            return Err(TypeConstraintError::InvalidValue(
                "page size must be greater than zero".to_string(),
            ));
        }
        let end = page
            .checked_mul(size)
            .and_then(|offset| offset.checked_add(size))
            .and_then(|end| i64::try_from(end).ok());
        if end.is_none() {
            return Err(TypeConstraintError::InvalidValue(format!(
                "page {page} of size {size} is out of range"
            )));
        }
        Ok(Self {
            page,
            size,
            sort: Vec::new(),
        })
    }

    pub fn sort_by(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    /// Number of rows preceding this page.
    pub fn offset(&self) -> usize {
        self.page * self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

/// Total implied by the page content alone, if any.
///
/// * first page shorter than the page size: the content is everything;
/// * later page that is non-empty but short: it is the last page, so the
///   total is `offset + content_len`;
/// * a full page, or an empty page past the start, proves nothing.
pub fn known_total(request: &PageRequest, content_len: usize) -> Option<usize> {
    let offset = request.offset();
    if offset == 0 {
        return (content_len < request.size()).then_some(content_len);
    }
    (content_len != 0 && content_len < request.size())
        .then_some(offset.saturating_add(content_len))
}

/// Page navigation window of zero-based page indices; `None` marks a gap.
fn page_window(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return vec![];
    }

    let current_page = current_page.min(total_pages - 1);
    let mut pages = Vec::new();

    let left_end = left_edge.min(total_pages);
    pages.extend((0..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(total_pages);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(total_pages.saturating_sub(right_edge));

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..total_pages).map(Some));

    pages
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub pages: Vec<Option<usize>>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total: usize) -> Self {
        let total_pages = total.div_ceil(request.size());
        let page = request.page();

        Self {
            items,
            page,
            size: request.size(),
            total,
            total_pages,
            has_next: page.saturating_add(1) < total_pages,
            pages: page_window(total_pages, page, 2, 2, 4, 2),
        }
    }
}

/// Count query held back by a [`DeferredPage`].
pub type CountQuery<E> = Box<dyn FnOnce() -> Result<usize, E> + Send>;

enum DeferredTotal<E> {
    Known(usize),
    Pending(CountQuery<E>),
}

/// Page content whose total may still require a count query.
pub struct DeferredPage<T, E> {
    items: Vec<T>,
    request: PageRequest,
    total: DeferredTotal<E>,
}

impl<T, E> DeferredPage<T, E> {
    /// Wraps `items`; `count` is dropped unexecuted when the total is implied
    /// by the content.
    pub fn new<F>(items: Vec<T>, request: PageRequest, count: F) -> Self
    where
        F: FnOnce() -> Result<usize, E> + Send + 'static,
    {
        let total = match known_total(&request, items.len()) {
            Some(total) => {
                log::debug!(
                    "count query elided: page {} size {} returned {} rows",
                    request.page(),
                    request.size(),
                    items.len()
                );
                DeferredTotal::Known(total)
            }
            None => DeferredTotal::Pending(Box::new(count)),
        };

        Self {
            items,
            request,
            total,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Whether resolving the total will issue the count query.
    pub fn requires_count(&self) -> bool {
        matches!(self.total, DeferredTotal::Pending(_))
    }

    pub fn known_total(&self) -> Option<usize> {
        match self.total {
            DeferredTotal::Known(total) => Some(total),
            DeferredTotal::Pending(_) => None,
        }
    }

    /// Resolves the total, running the count query if still pending.
    ///
    /// A counted total below `offset + items` of a non-empty page (rows
    /// deleted between the two queries) is raised to that bound.
    pub fn into_page(self) -> Result<Page<T>, E> {
        let total = match self.total {
            DeferredTotal::Known(total) => total,
            DeferredTotal::Pending(count) => {
                let floor = if self.items.is_empty() {
                    0
                } else {
                    self.request.offset().saturating_add(self.items.len())
                };
                let counted = count()?;
                if counted < floor {
                    log::warn!("count query returned {counted} rows, page proves at least {floor}");
                }
                counted.max(floor)
            }
        };

        Ok(Page::new(self.items, &self.request, total))
    }
}

impl<T: fmt::Debug, E> fmt::Debug for DeferredPage<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredPage")
            .field("items", &self.items)
            .field("request", &self.request)
            .field("total", &self.known_total())
            .finish()
    }
}
