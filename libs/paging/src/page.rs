use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 12;

/// A sanitized page request. Page numbers are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Build a request from raw query-string values. Anything that does not
    /// parse as a positive integer falls back to the defaults (page 1,
    /// limit 12), so "?page=abc&limit=-3" behaves like no parameters at all.
    pub fn coerce(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::coerce_or(page, limit, Self::default())
    }

    /// Like [`coerce`](Self::coerce) but with caller-supplied fallbacks, for
    /// services whose default page size is configurable.
    pub fn coerce_or(page: Option<&str>, limit: Option<&str>, defaults: PageRequest) -> Self {
        Self {
            page: coerce_positive(page, defaults.page),
            limit: coerce_positive(limit, defaults.limit),
        }
    }

    /// Number of items to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn coerce_positive(raw: Option<&str>, default: u32) -> u32 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => match s.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => default,
        },
        None => default,
    }
}

/// One page of results plus the totals the caller needs to render pagination
/// controls: total matching items, total pages, and the echoed page number.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub page: u32,
}

impl<T> Page<T> {
    /// Assemble a page envelope; `total_pages` is `ceil(total_items / limit)`.
    pub fn new(items: Vec<T>, total_items: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.limit)),
            page: request.page,
        }
    }

    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Map items while preserving the totals (domain -> DTO convenience).
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(&mut f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page: self.page,
        }
    }
}
