use serde::Deserialize;
use utoipa::IntoParams;

use crate::dao::rating_store::{PageRequest, SortOrder};

/// Pagination query accepted by listing endpoints: `?page=0&size=20&sort=score,desc`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index.
    pub page: Option<u64>,
    /// Number of items per page.
    pub size: Option<u64>,
    /// Ordering clauses `property[,asc|desc]`; may be repeated.
    #[serde(default)]
    pub sort: Vec<String>,
}

impl PageQuery {
    /// Resolve the query into a page request, applying the default and maximum page sizes.
    pub fn to_page_request(&self, default_size: u64, max_size: u64) -> Result<PageRequest, String> {
        let size = match self.size {
            Some(0) => return Err("page size must be greater than zero".into()),
            Some(size) => size.min(max_size),
            None => default_size,
        };
        let sort = self
            .sort
            .iter()
            .filter(|clause| !clause.trim().is_empty())
            .map(|clause| clause.parse::<SortOrder>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageRequest::new(self.page.unwrap_or(0), size).with_sort(sort))
    }
}
