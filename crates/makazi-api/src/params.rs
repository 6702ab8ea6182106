use crate::errors::ApiError;
use makazi_model::{InquiryStatus, ListingStatus, PropertyType};
use makazi_query::{Page, PriceRange, PropertyFilter, StatusFilter, MAX_PAGE_SIZE};
use std::collections::BTreeMap;

pub const PUBLIC_LIST_KEYS: [&str; 6] = [
    "page",
    "pageSize",
    "location",
    "propertyType",
    "priceRange",
    "search",
];
pub const ADMIN_LIST_KEYS: [&str; 5] = ["page", "pageSize", "search", "status", "type"];
pub const INQUIRY_LIST_KEYS: [&str; 2] = ["search", "status"];
pub const FEATURED_KEYS: [&str; 1] = ["limit"];

pub const FEATURED_DEFAULT_LIMIT: usize = 6;
pub const FEATURED_MAX_LIMIT: usize = 24;

/// The literal clients send to mean "no filter" for an enum-valued key.
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyListParams {
    pub filter: PropertyFilter,
    pub page: Page,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryListParams {
    pub search: Option<String>,
    pub status: Option<InquiryStatus>,
}

fn reject_unrecognized(
    query: &BTreeMap<String, String>,
    allowed: &[&str],
) -> Result<(), ApiError> {
    for key in query.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(ApiError::unrecognized_param(key));
        }
    }
    Ok(())
}

fn parse_page(
    query: &BTreeMap<String, String>,
    default_page_size: usize,
) -> Result<Page, ApiError> {
    let page = match query.get("page") {
        None => 1,
        Some(raw) => {
            let value = raw
                .parse::<usize>()
                .map_err(|_| ApiError::invalid_param("page", raw))?;
            if value == 0 {
                return Err(ApiError::invalid_param("page", raw));
            }
            value
        }
    };
    let page_size = match query.get("pageSize") {
        None => default_page_size,
        Some(raw) => {
            let value = raw
                .parse::<usize>()
                .map_err(|_| ApiError::invalid_param("pageSize", raw))?;
            if value == 0 || value > MAX_PAGE_SIZE {
                return Err(ApiError::invalid_param("pageSize", raw));
            }
            value
        }
    };
    Page::new(page, page_size).map_err(|_| {
        ApiError::invalid_param("pageSize", &page_size.to_string())
    })
}

/// `"min-max"`, both non-negative integers, min <= max, inclusive range.
pub fn parse_price_range(raw: &str) -> Result<PriceRange, ApiError> {
    let (min, max) = raw
        .split_once('-')
        .ok_or_else(|| ApiError::invalid_param("priceRange", raw))?;
    let min = min
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::invalid_param("priceRange", raw))?;
    let max = max
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::invalid_param("priceRange", raw))?;
    PriceRange::new(min, max).map_err(|_| ApiError::invalid_param("priceRange", raw))
}

fn non_empty(query: &BTreeMap<String, String>, key: &str) -> Option<String> {
    query
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Public catalog listing: status is pinned to active listings; the
/// `propertyType` sentinel `"all"` (or absence) means no type filter.
pub fn parse_public_list_params(
    query: &BTreeMap<String, String>,
    default_page_size: usize,
) -> Result<PropertyListParams, ApiError> {
    reject_unrecognized(query, &PUBLIC_LIST_KEYS)?;
    let page = parse_page(query, default_page_size)?;

    let property_type = match non_empty(query, "propertyType") {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case(ALL_SENTINEL) => None,
        Some(raw) => Some(
            PropertyType::parse(&raw).map_err(|_| ApiError::invalid_param("propertyType", &raw))?,
        ),
    };
    let price = match non_empty(query, "priceRange") {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case(ALL_SENTINEL) => None,
        Some(raw) => Some(parse_price_range(&raw)?),
    };

    Ok(PropertyListParams {
        filter: PropertyFilter {
            search: non_empty(query, "search"),
            location: non_empty(query, "location"),
            property_type,
            price,
            status: StatusFilter::ActiveOnly,
        },
        page,
    })
}

/// Admin listing: any status plus the `all` sentinel; `type` mirrors the
/// public `propertyType` key.
pub fn parse_admin_list_params(
    query: &BTreeMap<String, String>,
    default_page_size: usize,
) -> Result<PropertyListParams, ApiError> {
    reject_unrecognized(query, &ADMIN_LIST_KEYS)?;
    let page = parse_page(query, default_page_size)?;

    let property_type = match non_empty(query, "type") {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case(ALL_SENTINEL) => None,
        Some(raw) => {
            Some(PropertyType::parse(&raw).map_err(|_| ApiError::invalid_param("type", &raw))?)
        }
    };
    let status = match non_empty(query, "status") {
        None => StatusFilter::Any,
        Some(raw) if raw.eq_ignore_ascii_case(ALL_SENTINEL) => StatusFilter::Any,
        Some(raw) => StatusFilter::One(
            ListingStatus::parse_normalized(&raw)
                .map_err(|_| ApiError::invalid_param("status", &raw))?,
        ),
    };

    Ok(PropertyListParams {
        filter: PropertyFilter {
            search: non_empty(query, "search"),
            location: None,
            property_type,
            price: None,
            status,
        },
        page,
    })
}

pub fn parse_inquiry_list_params(
    query: &BTreeMap<String, String>,
) -> Result<InquiryListParams, ApiError> {
    reject_unrecognized(query, &INQUIRY_LIST_KEYS)?;
    let status = match non_empty(query, "status") {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case(ALL_SENTINEL) => None,
        Some(raw) => Some(
            InquiryStatus::parse_normalized(&raw)
                .map_err(|_| ApiError::invalid_param("status", &raw))?,
        ),
    };
    Ok(InquiryListParams {
        search: non_empty(query, "search"),
        status,
    })
}

pub fn parse_featured_limit(query: &BTreeMap<String, String>) -> Result<usize, ApiError> {
    reject_unrecognized(query, &FEATURED_KEYS)?;
    match query.get("limit") {
        None => Ok(FEATURED_DEFAULT_LIMIT),
        Some(raw) => {
            let value = raw
                .parse::<usize>()
                .map_err(|_| ApiError::invalid_param("limit", raw))?;
            if value == 0 || value > FEATURED_MAX_LIMIT {
                return Err(ApiError::invalid_param("limit", raw));
            }
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn public_defaults_are_first_page_active_only() {
        let params = parse_public_list_params(&query(&[]), 12).expect("params");
        assert_eq!(params.page.page, 1);
        assert_eq!(params.page.page_size, 12);
        assert_eq!(params.filter.status, StatusFilter::ActiveOnly);
        assert!(params.filter.search.is_none());
    }

    #[test]
    fn price_range_parses_inclusive_bounds() {
        let range = parse_price_range("250000-500000").expect("range");
        assert_eq!(range.min, 250_000);
        assert_eq!(range.max, 500_000);
    }

    #[test]
    fn malformed_price_range_is_a_param_error() {
        for raw in ["cheap", "100-", "-100", "100-abc", "900-100"] {
            assert!(parse_price_range(raw).is_err(), "{raw} must be rejected");
        }
    }

    #[test]
    fn unknown_property_type_is_rejected_not_ignored() {
        let err = parse_public_list_params(&query(&[("propertyType", "castle")]), 12)
            .expect_err("must reject");
        assert_eq!(crate::error_mapping::map_error(&err), 400);
    }

    #[test]
    fn all_sentinel_disables_the_filter() {
        let params =
            parse_public_list_params(&query(&[("propertyType", "all")]), 12).expect("params");
        assert!(params.filter.property_type.is_none());

        let params = parse_admin_list_params(&query(&[("status", "all")]), 12).expect("params");
        assert_eq!(params.filter.status, StatusFilter::Any);
    }

    #[test]
    fn pagination_params_are_validated_never_passed_through() {
        for (key, value) in [("page", "0"), ("page", "-1"), ("page", "x"), ("pageSize", "0")] {
            let err = parse_public_list_params(&query(&[(key, value)]), 12).expect_err("reject");
            assert_eq!(crate::error_mapping::map_error(&err), 400);
        }
        let err = parse_public_list_params(&query(&[("pageSize", "10000")]), 12)
            .expect_err("oversize pageSize");
        assert_eq!(crate::error_mapping::map_error(&err), 400);
    }

    #[test]
    fn unrecognized_keys_are_rejected() {
        let err =
            parse_public_list_params(&query(&[("sort", "price")]), 12).expect_err("must reject");
        assert_eq!(crate::error_mapping::map_error(&err), 400);
    }

    #[test]
    fn admin_status_accepts_legacy_casing() {
        let params =
            parse_admin_list_params(&query(&[("status", "For Sale")]), 12).expect("params");
        assert_eq!(
            params.filter.status,
            StatusFilter::One(makazi_model::ListingStatus::ForSale)
        );
    }

    #[test]
    fn inquiry_params_parse_status_enum() {
        let params =
            parse_inquiry_list_params(&query(&[("status", "resolved")])).expect("params");
        assert_eq!(params.status, Some(InquiryStatus::Resolved));
        assert!(parse_inquiry_list_params(&query(&[("status", "done")])).is_err());
    }

    #[test]
    fn featured_limit_is_bounded() {
        assert_eq!(
            parse_featured_limit(&query(&[])).expect("default"),
            FEATURED_DEFAULT_LIMIT
        );
        assert!(parse_featured_limit(&query(&[("limit", "0")])).is_err());
        assert!(parse_featured_limit(&query(&[("limit", "999")])).is_err());
    }
}
