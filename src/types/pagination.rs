//! Paging types for list endpoints.
//!
//! Pages are 0-indexed. A `sort` parameter holds one or more orders in the
//! form `property[,asc|desc]`, separated by `;`.

use std::future::Future;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::config::{DEFAULT_PAGE_NUMBER, MAX_PAGE_OFFSET, MAX_PAGE_SIZE, SORT_ORDER_SEPARATOR};
use crate::domain::MemberDto;
use crate::errors::{AppError, AppResult};

/// Paging query parameters (`page`, `size`, `sort`)
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, starting at 0
    #[param(example = 0)]
    pub page: Option<u64>,
    /// Page size; 0 or absent selects the endpoint default
    #[param(example = 20)]
    pub size: Option<u64>,
    /// Sort orders as `property[,asc|desc]`; several orders go in one
    /// parameter separated by `;`, e.g. `username,desc;age`
    #[param(example = "username,desc;age")]
    #[validate(length(min = 1, message = "sort must not be empty"))]
    pub sort: Option<String>,
}

impl PageParams {
    /// Resolve into a request, applying the default size and the size cap.
    pub fn into_request(self, default_size: u64) -> AppResult<PageRequest> {
        let size = match self.size {
            None | Some(0) => default_size,
            Some(size) => size.min(MAX_PAGE_SIZE),
        };
        let sort = match self.sort.as_deref() {
            Some(raw) => SortOrder::parse_all(raw)?,
            None => Vec::new(),
        };

        let page = self.page.unwrap_or(DEFAULT_PAGE_NUMBER);
        match page.checked_mul(size) {
            Some(offset) if offset <= MAX_PAGE_OFFSET => {}
            _ => {
                return Err(AppError::bad_request(format!(
                    "page {} of size {} is out of range",
                    page, size
                )))
            }
        }

        Ok(PageRequest { page, size, sort })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A single `property,direction` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }

    /// Parse one order: `username`, `username,asc` or `username,desc`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().unwrap_or_default();
        if property.is_empty() {
            return Err(AppError::bad_request(format!("sort order '{}' has no property", raw)));
        }

        let direction = match parts.next() {
            None => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(dir) => {
                return Err(AppError::bad_request(format!("unknown sort direction '{}'", dir)))
            }
        };

        if parts.next().is_some() {
            return Err(AppError::bad_request(format!("malformed sort order '{}'", raw)));
        }

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }

    /// Parse every order of a `sort` parameter.
    pub fn parse_all(raw: &str) -> AppResult<Vec<Self>> {
        raw.split(SORT_ORDER_SEPARATOR)
            .filter(|order| !order.trim().is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// Resolved paging request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn of(page: u64, size: u64) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Row offset of the first element of this page
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results together with the total row count
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(MemberDtoPage = Page<MemberDto>)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Page number (0-indexed)
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number_of_elements: u64,
    pub first: bool,
    pub last: bool,
    pub has_next: bool,
    pub has_previous: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let total_pages = if request.size == 0 {
            1
        } else {
            total.div_ceil(request.size)
        };
        let has_next = request.page.saturating_add(1) < total_pages;

        Self {
            number: request.page,
            size: request.size,
            total_elements: total,
            total_pages,
            number_of_elements: content.len() as u64,
            first: request.page == 0,
            last: !has_next,
            has_next,
            has_previous: request.page > 0,
            empty: content.is_empty(),
            content,
        }
    }

    /// Convert every element, keeping the paging metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            has_next: self.has_next,
            has_previous: self.has_previous,
            empty: self.empty,
        }
    }
}

/// A page without a total count; `has_next` comes from fetching one extra row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub number: u64,
    pub size: u64,
    pub number_of_elements: u64,
    pub first: bool,
    pub has_next: bool,
}

impl<T> Slice<T> {
    /// Build from up to `size + 1` fetched rows.
    pub fn new(mut rows: Vec<T>, request: &PageRequest) -> Self {
        let has_next = rows.len() as u64 > request.size;
        rows.truncate(request.size as usize);

        Self {
            number: request.page,
            size: request.size,
            number_of_elements: rows.len() as u64,
            first: request.page == 0,
            has_next,
            content: rows,
        }
    }
}

/// Build a page, running `count` only when the total cannot be inferred.
///
/// A short first page holds every row; a short, non-empty later page is the
/// last one, so its total is `offset + returned`. Anything else needs the
/// count query.
pub async fn page_or_count<T, E, F, Fut>(
    content: Vec<T>,
    request: &PageRequest,
    count: F,
) -> Result<Page<T>, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<u64, E>>,
{
    let returned = content.len() as u64;
    let offset = request.offset();

    let total = if offset == 0 && returned < request.size {
        returned
    } else if offset > 0 && returned > 0 && returned < request.size {
        offset.saturating_add(returned)
    } else {
        count().await?
    };

    Ok(Page::new(content, request, total))
}
