//! Table operations behind the API: pagination, substring search and
//! frequency counts.

use cadweb_parser::Table;
use polars::prelude::*;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::{FrequencyTable, OperadorasPage};

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Reject pages below 1 and limits outside `1..=max_limit`
    pub fn validate(&self, max_limit: i64) -> CoreResult<()> {
        if self.page < 1 {
            return Err(CoreError::InvalidPagination {
                field: "page".to_string(),
                reason: format!("must be at least 1, got {}", self.page),
            });
        }
        if self.limit < 1 {
            return Err(CoreError::InvalidPagination {
                field: "limit".to_string(),
                reason: format!("must be at least 1, got {}", self.limit),
            });
        }
        if self.limit > max_limit {
            return Err(CoreError::InvalidPagination {
                field: "limit".to_string(),
                reason: format!("must not exceed {}, got {}", max_limit, self.limit),
            });
        }
        Ok(())
    }

    /// Half-open row range `[start, end)`, saturating instead of overflowing
    pub fn bounds(&self) -> (usize, usize) {
        let page = usize::try_from(self.page.max(1)).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit.max(0)).unwrap_or(usize::MAX);
        let start = (page - 1).saturating_mul(limit);
        (start, start.saturating_add(limit))
    }
}

/// Slice one page out of `table`; `total` is always the full row count
pub fn paginate(table: &Table, request: PageRequest) -> OperadorasPage {
    let (start, end) = request.bounds();
    OperadorasPage {
        data: table.slice(start, end),
        total: table.len(),
        page: request.page,
        limit: request.limit,
    }
}

/// Rows where any cell's string form contains `needle`
pub fn filter_contains(table: &Table, needle: &str) -> CoreResult<Table> {
    let frame = table.frame();
    let mut mask = BooleanChunked::full("matches".into(), false, frame.height());
    for column in frame.get_columns() {
        let text = column.as_materialized_series().cast(&DataType::String)?;
        let hits: BooleanChunked = text
            .str()?
            .into_iter()
            .map(|value| value.is_some_and(|s| s.contains(needle)))
            .collect();
        mask = &mask | &hits;
    }
    Ok(table.filter(&mask)?)
}

/// Count the non-missing values of `column`, most frequent first.
///
/// Ties keep the order in which values first appear.
pub fn value_counts(table: &Table, column: &str) -> CoreResult<FrequencyTable> {
    let values = table.column(column).ok_or_else(|| CoreError::MissingColumn {
        column: column.to_string(),
        available: table.columns().iter().map(|c| c.to_string()).collect(),
    })?;

    let text = values.as_materialized_series().drop_nulls().cast(&DataType::String)?;
    // value_counts refuses a count column named like the values column
    let count_name = format!("{}_count", column);
    let counts = text.value_counts(false, false, count_name.as_str().into(), false)?;
    let keys = counts.column(column)?.str()?;
    let totals = counts.column(&count_name)?.as_materialized_series().cast(&DataType::UInt64)?;
    let by_value: HashMap<&str, u64> = keys
        .into_iter()
        .zip(totals.u64()?.into_iter())
        .filter_map(|(key, total)| Some((key?, total?)))
        .collect();

    let first_seen = text.unique_stable()?;
    let mut entries: Vec<(String, usize)> = first_seen
        .str()?
        .into_iter()
        .flatten()
        .map(|value| (value.to_string(), by_value.get(value).copied().unwrap_or(0) as usize))
        .collect();

    // sort_by is stable, so equal counts stay in first-appearance order
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(FrequencyTable::new(entries))
}
