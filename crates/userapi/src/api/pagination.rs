//! Page/limit parsing and navigation links for list endpoints.

use super::error::{ApiError, ApiResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
/// Larger requested limits are clamped to this, not rejected.
pub const MAX_LIMIT: i64 = 100;

/// Validated paging parameters for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    /// Read `page` and `limit` from the raw query pairs. A key that is absent
    /// takes its default; a key that is present must hold a positive integer.
    pub fn from_query(query: &[(String, String)]) -> ApiResult<Self> {
        let page = positive_param(query, "page", DEFAULT_PAGE)?;
        let limit = positive_param(query, "limit", DEFAULT_LIMIT)?.min(MAX_LIMIT);
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| ApiError::bad_request(format!("invalid page: {page} is out of range")))?;

        Ok(Self {
            page,
            limit,
            offset,
        })
    }

    /// Links to the neighbouring pages, if they exist.
    pub fn links(
        &self,
        path: &str,
        query: &[(String, String)],
        total_pages: i64,
    ) -> (Option<String>, Option<String>) {
        let next = (self.page < total_pages).then(|| page_link(path, query, self.page + 1));
        let prev =
            (self.page > 1 && total_pages > 0).then(|| page_link(path, query, self.page - 1));
        (next, prev)
    }
}

fn positive_param(query: &[(String, String)], key: &str, default: i64) -> ApiResult<i64> {
    let Some((_, raw)) = query.iter().find(|(k, _)| k == key) else {
        return Ok(default);
    };

    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ApiError::bad_request(format!(
            "invalid {key}: expected a positive integer, got '{raw}'"
        ))),
    }
}

/// `ceil(total / limit)` in integer arithmetic. Zero records means zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Rebuild `path?query` with `page` set to `page`. Every other parameter is
/// kept, in its original order.
pub fn page_link(path: &str, query: &[(String, String)], page: i64) -> String {
    let mut page_written = false;
    let mut pairs: Vec<String> = query
        .iter()
        .filter_map(|(key, value)| {
            if key == "page" {
                if page_written {
                    return None;
                }
                page_written = true;
                Some(format!("page={page}"))
            } else {
                Some(format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                ))
            }
        })
        .collect();

    if !page_written {
        pairs.push(format!("page={page}"));
    }

    format!("{}?{}", path, pairs.join("&"))
}
