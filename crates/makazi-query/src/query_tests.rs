use super::*;
use rusqlite::Connection;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open memory db");
    conn.execute_batch(
        "
            CREATE TABLE properties (
              id INTEGER PRIMARY KEY,
              title TEXT NOT NULL,
              description TEXT NOT NULL,
              price INTEGER NOT NULL,
              location TEXT NOT NULL,
              property_type TEXT NOT NULL,
              status TEXT NOT NULL,
              size INTEGER NOT NULL DEFAULT 0,
              bedrooms INTEGER,
              bathrooms INTEGER,
              offices INTEGER,
              parking INTEGER,
              features TEXT NOT NULL DEFAULT '[]',
              images TEXT NOT NULL DEFAULT '[]',
              featured INTEGER NOT NULL DEFAULT 0,
              created_at TEXT NOT NULL
            );
            CREATE INDEX idx_properties_created ON properties(created_at, id);
            CREATE INDEX idx_properties_type ON properties(property_type);
            CREATE INDEX idx_properties_status ON properties(status);
            CREATE INDEX idx_properties_price ON properties(price);
            ",
    )
    .expect("schema");

    let rows: Vec<(i64, &str, &str, i64, &str, &str, &str, &str)> = vec![
        (
            1,
            "Three bedroom maisonette",
            "Gated community home",
            8_100,
            "Kiambu",
            "residential",
            "for-sale",
            "2024-01-01T08:00:00Z",
        ),
        (
            2,
            "CBD office block",
            "Open-plan floors",
            180_000,
            "Nairobi",
            "commercial",
            "for-sale",
            "2024-01-02T08:00:00Z",
        ),
        (
            3,
            "Quarter acre plot",
            "Fronting the tarmac",
            250_000,
            "Nakuru",
            "land",
            "for-sale",
            "2024-01-03T08:00:00Z",
        ),
        (
            4,
            "Warehouse in Industrial Area",
            "High-clearance godown",
            500_000,
            "Nairobi",
            "commercial",
            "for-rent",
            "2024-01-03T08:00:00Z",
        ),
        (
            5,
            "Two bedroom apartment",
            "Near Sarit Centre",
            75_000,
            "Nairobi",
            "residential",
            "sold",
            "2024-01-04T08:00:00Z",
        ),
        (
            6,
            "Beachfront villa",
            "Private access to the beach",
            950_000,
            "Diani",
            "residential",
            "pending",
            "2024-01-05T08:00:00Z",
        ),
    ];
    for r in rows {
        conn.execute(
            "INSERT INTO properties (id, title, description, price, location, property_type, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7],
        )
        .expect("insert row");
    }
    conn
}

fn ids(rows: &[Property]) -> Vec<i64> {
    rows.iter().map(|p| p.id).collect()
}

fn page(page: usize, page_size: usize) -> Page {
    Page::new(page, page_size).expect("page")
}

#[test]
fn unconstrained_filter_returns_everything_newest_first() {
    let conn = setup_db();
    let rows = list_properties(&conn, &PropertyFilter::default(), &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![6, 5, 4, 3, 2, 1]);
}

#[test]
fn created_at_ties_break_on_id_descending() {
    let conn = setup_db();
    // Rows 3 and 4 share a timestamp; 4 must sort first.
    let rows = list_properties(&conn, &PropertyFilter::default(), &page(1, 50)).expect("list");
    let pos3 = rows.iter().position(|p| p.id == 3).expect("row 3");
    let pos4 = rows.iter().position(|p| p.id == 4).expect("row 4");
    assert!(pos4 < pos3);
}

#[test]
fn type_and_location_filters_intersect() {
    let conn = setup_db();
    let by_type = PropertyFilter {
        property_type: Some(PropertyType::Commercial),
        ..Default::default()
    };
    let by_location = PropertyFilter {
        location: Some("Nairobi".to_string()),
        ..Default::default()
    };
    let both = PropertyFilter {
        property_type: Some(PropertyType::Commercial),
        location: Some("Nairobi".to_string()),
        ..Default::default()
    };

    let type_ids = ids(&list_properties(&conn, &by_type, &page(1, 50)).expect("list"));
    let location_ids = ids(&list_properties(&conn, &by_location, &page(1, 50)).expect("list"));
    let both_ids = ids(&list_properties(&conn, &both, &page(1, 50)).expect("list"));

    let expected: Vec<i64> = type_ids
        .iter()
        .copied()
        .filter(|id| location_ids.contains(id))
        .collect();
    assert_eq!(both_ids, expected);
    assert_eq!(both_ids, vec![4, 2]);
}

#[test]
fn price_range_is_inclusive_on_both_endpoints() {
    let conn = setup_db();
    let filter = PropertyFilter {
        price: Some(PriceRange::new(250_000, 500_000).expect("range")),
        ..Default::default()
    };
    let rows = list_properties(&conn, &filter, &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![4, 3]);
}

#[test]
fn price_range_scenario_from_catalog() {
    let conn = setup_db();
    let residential = PropertyFilter {
        property_type: Some(PropertyType::Residential),
        status: StatusFilter::ActiveOnly,
        ..Default::default()
    };
    let rows = list_properties(&conn, &residential, &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![1]);

    let priced = PropertyFilter {
        price: Some(PriceRange::new(100_000, 200_000).expect("range")),
        ..Default::default()
    };
    let rows = list_properties(&conn, &priced, &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![2]);
}

#[test]
fn invalid_price_range_is_rejected() {
    assert!(PriceRange::new(500, 100).is_err());
    assert!(PriceRange::new(-1, 100).is_err());
    assert!(PriceRange::new(250_000, 250_000).is_ok());
}

#[test]
fn search_is_case_sensitive_substring_across_fields() {
    let conn = setup_db();
    let hit = PropertyFilter {
        search: Some("beach".to_string()),
        ..Default::default()
    };
    // "beach" appears in row 6's description, lowercase.
    let rows = list_properties(&conn, &hit, &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![6]);

    let miss = PropertyFilter {
        search: Some("BEACH".to_string()),
        ..Default::default()
    };
    let rows = list_properties(&conn, &miss, &page(1, 50)).expect("list");
    assert!(rows.is_empty());

    let title_hit = PropertyFilter {
        search: Some("Warehouse".to_string()),
        ..Default::default()
    };
    let rows = list_properties(&conn, &title_hit, &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![4]);
}

#[test]
fn active_only_hides_sold_and_pending() {
    let conn = setup_db();
    let filter = PropertyFilter {
        status: StatusFilter::ActiveOnly,
        ..Default::default()
    };
    let rows = list_properties(&conn, &filter, &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![4, 3, 2, 1]);
}

#[test]
fn single_status_filter_matches_exactly() {
    let conn = setup_db();
    let filter = PropertyFilter {
        status: StatusFilter::One(ListingStatus::Sold),
        ..Default::default()
    };
    let rows = list_properties(&conn, &filter, &page(1, 50)).expect("list");
    assert_eq!(ids(&rows), vec![5]);
}

#[test]
fn pagination_offsets_and_page_count() {
    let conn = setup_db();
    let filter = PropertyFilter::default();

    let result = query_property_page(&conn, &filter, &page(1, 4)).expect("page 1");
    assert_eq!(result.total, 6);
    assert_eq!(result.pages, 2);
    assert_eq!(ids(&result.rows), vec![6, 5, 4, 3]);

    let result = query_property_page(&conn, &filter, &page(2, 4)).expect("page 2");
    assert_eq!(ids(&result.rows), vec![2, 1]);
    assert!(result.rows.len() <= 4);
}

#[test]
fn page_beyond_last_is_empty_not_an_error() {
    let conn = setup_db();
    let result =
        query_property_page(&conn, &PropertyFilter::default(), &page(9, 4)).expect("page 9");
    assert_eq!(result.total, 6);
    assert_eq!(result.pages, 2);
    assert!(result.rows.is_empty());
}

#[test]
fn page_validation_rejects_zero_and_oversize() {
    assert!(Page::new(0, 10).is_err());
    assert!(Page::new(1, 0).is_err());
    assert!(Page::new(1, MAX_PAGE_SIZE + 1).is_err());
    assert_eq!(page(3, 12).offset(), 24);
}

#[test]
fn page_info_is_ceiling_division() {
    assert_eq!(PageInfo::compute(0, 12).pages, 0);
    assert_eq!(PageInfo::compute(12, 12).pages, 1);
    assert_eq!(PageInfo::compute(13, 12).pages, 2);
}

#[test]
fn count_matches_list_under_every_filter() {
    let conn = setup_db();
    let filters = [
        PropertyFilter::default(),
        PropertyFilter {
            property_type: Some(PropertyType::Commercial),
            ..Default::default()
        },
        PropertyFilter {
            status: StatusFilter::ActiveOnly,
            search: Some("Nairobi".to_string()),
            ..Default::default()
        },
    ];
    for filter in filters {
        let total = count_properties(&conn, &filter).expect("count");
        let rows = list_properties(&conn, &filter, &page(1, 50)).expect("list");
        assert_eq!(total as usize, rows.len());
    }
}

#[test]
fn overlong_search_is_rejected() {
    let conn = setup_db();
    let filter = PropertyFilter {
        search: Some("x".repeat(SEARCH_MAX_LEN + 1)),
        ..Default::default()
    };
    assert!(list_properties(&conn, &filter, &page(1, 10)).is_err());
    assert!(count_properties(&conn, &filter).is_err());
}
