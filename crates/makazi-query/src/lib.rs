#![forbid(unsafe_code)]

use makazi_model::{ListingStatus, Property, PropertyType};
use rusqlite::{params_from_iter, types::Value, Connection};
use serde::{Deserialize, Serialize};

mod row;

pub use row::{decode_property_row, PROPERTY_SELECT_COLUMNS};

pub const CRATE_NAME: &str = "makazi-query";

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const MAX_PAGE_SIZE: usize = 100;
pub const SEARCH_MAX_LEN: usize = 120;

#[derive(Debug)]
pub struct QueryError(pub String);

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for QueryError {}

/// Inclusive price window, both endpoints in the catalog's minor unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    pub fn new(min: i64, max: i64) -> Result<Self, QueryError> {
        if min < 0 {
            return Err(QueryError("price range min must be non-negative".to_string()));
        }
        if max < min {
            return Err(QueryError(
                "price range max must not be below min".to_string(),
            ));
        }
        Ok(Self { min, max })
    }
}

/// Status restriction for a listing query. The public catalog always runs
/// with `ActiveOnly`; the admin listing picks `Any` or `One`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Any,
    One(ListingStatus),
    ActiveOnly,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyFilter {
    /// Case-sensitive substring matched against title, description, or
    /// location (OR-combined).
    pub search: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub price: Option<PriceRange>,
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub page_size: usize,
}

impl Page {
    pub fn new(page: usize, page_size: usize) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError("page must be positive".to_string()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(QueryError(format!(
                "pageSize must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, page_size })
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub total: u64,
    pub pages: u64,
}

impl PageInfo {
    #[must_use]
    pub fn compute(total: u64, page_size: usize) -> Self {
        let size = page_size.max(1) as u64;
        Self {
            total,
            pages: total.div_ceil(size),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyPage {
    pub rows: Vec<Property>,
    pub total: u64,
    pub pages: u64,
}

fn validate_filter(filter: &PropertyFilter) -> Result<(), QueryError> {
    if let Some(search) = &filter.search {
        if search.len() > SEARCH_MAX_LEN {
            return Err(QueryError(format!(
                "search exceeds max length {SEARCH_MAX_LEN}"
            )));
        }
    }
    if let Some(location) = &filter.location {
        if location.len() > SEARCH_MAX_LEN {
            return Err(QueryError(format!(
                "location exceeds max length {SEARCH_MAX_LEN}"
            )));
        }
    }
    Ok(())
}

/// Conjunction of whichever predicates are present; absence of all yields an
/// unconstrained query. `instr` keeps substring matches byte-exact, which
/// SQLite `LIKE` would not.
fn build_where(filter: &PropertyFilter) -> (Vec<String>, Vec<Value>) {
    let mut where_parts: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(search) = &filter.search {
        where_parts.push(
            "(instr(p.title, ?) > 0 OR instr(p.description, ?) > 0 OR instr(p.location, ?) > 0)"
                .to_string(),
        );
        params.push(Value::Text(search.clone()));
        params.push(Value::Text(search.clone()));
        params.push(Value::Text(search.clone()));
    }
    if let Some(location) = &filter.location {
        where_parts.push("instr(p.location, ?) > 0".to_string());
        params.push(Value::Text(location.clone()));
    }
    if let Some(property_type) = filter.property_type {
        where_parts.push("p.property_type = ?".to_string());
        params.push(Value::Text(property_type.as_str().to_string()));
    }
    if let Some(price) = filter.price {
        where_parts.push("p.price BETWEEN ? AND ?".to_string());
        params.push(Value::Integer(price.min));
        params.push(Value::Integer(price.max));
    }
    match filter.status {
        StatusFilter::Any => {}
        StatusFilter::One(status) => {
            where_parts.push("p.status = ?".to_string());
            params.push(Value::Text(status.as_str().to_string()));
        }
        StatusFilter::ActiveOnly => {
            let placeholders = vec!["?"; ListingStatus::ACTIVE.len()].join(", ");
            where_parts.push(format!("p.status IN ({placeholders})"));
            for status in ListingStatus::ACTIVE {
                params.push(Value::Text(status.as_str().to_string()));
            }
        }
    }

    (where_parts, params)
}

fn build_list_sql(filter: &PropertyFilter) -> (String, Vec<Value>) {
    let (where_parts, params) = build_where(filter);
    let mut sql = format!("SELECT {PROPERTY_SELECT_COLUMNS} FROM properties p");
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    // Tie-break on id so pagination stays deterministic when rows share a
    // creation timestamp.
    sql.push_str(" ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?");
    (sql, params)
}

pub fn count_properties(conn: &Connection, filter: &PropertyFilter) -> Result<u64, QueryError> {
    validate_filter(filter)?;
    let (where_parts, params) = build_where(filter);
    let mut sql = "SELECT COUNT(*) FROM properties p".to_string();
    if !where_parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_parts.join(" AND "));
    }
    let mut stmt = conn.prepare(&sql).map_err(|e| QueryError(e.to_string()))?;
    let total: i64 = stmt
        .query_row(params_from_iter(params.iter()), |row| row.get(0))
        .map_err(|e| QueryError(e.to_string()))?;
    Ok(total.max(0) as u64)
}

pub fn list_properties(
    conn: &Connection,
    filter: &PropertyFilter,
    page: &Page,
) -> Result<Vec<Property>, QueryError> {
    validate_filter(filter)?;
    let (sql, mut params) = build_list_sql(filter);
    params.push(Value::Integer(page.page_size as i64));
    params.push(Value::Integer(page.offset() as i64));

    let mut stmt = conn.prepare(&sql).map_err(|e| QueryError(e.to_string()))?;
    let mapped = stmt
        .query_map(params_from_iter(params.iter()), decode_property_row)
        .map_err(|e| QueryError(e.to_string()))?;
    mapped
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| QueryError(e.to_string()))
}

/// Count plus one page in a single call; the shape every listing endpoint
/// returns.
pub fn query_property_page(
    conn: &Connection,
    filter: &PropertyFilter,
    page: &Page,
) -> Result<PropertyPage, QueryError> {
    let total = count_properties(conn, filter)?;
    let info = PageInfo::compute(total, page.page_size);
    let rows = list_properties(conn, filter, page)?;
    Ok(PropertyPage {
        rows,
        total: info.total,
        pages: info.pages,
    })
}

#[cfg(test)]
mod query_tests;
