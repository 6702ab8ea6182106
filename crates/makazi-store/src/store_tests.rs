use crate::{directors, inquiries, properties, schema, sessions, users};
use chrono::{Duration, Utc};
use makazi_model::{
    InquiryStatus, ListingStatus, NewDirector, NewInquiry, NewProperty, PropertyPatch,
    PropertyType,
};
use rusqlite::Connection;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open memory db");
    schema::migrate(&conn).expect("migrate");
    conn
}

fn sample_property() -> NewProperty {
    NewProperty {
        title: "Three bedroom maisonette".to_string(),
        description: "Gated community off Kiambu Road".to_string(),
        price: 8_100,
        location: "Kiambu".to_string(),
        property_type: PropertyType::Residential,
        status: ListingStatus::ForSale,
        size: 180,
        bedrooms: Some(3),
        bathrooms: Some(2),
        offices: None,
        parking: Some(2),
        features: vec!["borehole".to_string(), "solar water heating".to_string()],
        images: vec!["https://cdn.example.com/p1.jpg".to_string()],
        featured: true,
    }
}

fn sample_inquiry() -> NewInquiry {
    NewInquiry {
        name: "A".to_string(),
        email: "a@b.com".to_string(),
        phone: "0712345678".to_string(),
        subject: "Viewing".to_string(),
        message: "Interested, please call".to_string(),
        property_id: None,
    }
}

#[test]
fn property_create_assigns_id_and_round_trips_arrays() {
    let conn = setup_db();
    let created = properties::create(&conn, &sample_property()).expect("create");
    assert!(created.id > 0);
    assert_eq!(created.features.len(), 2);
    assert_eq!(created.images.len(), 1);
    assert_eq!(created.status, ListingStatus::ForSale);

    let fetched = properties::get(&conn, created.id).expect("get").expect("some");
    assert_eq!(fetched, created);
}

#[test]
fn property_update_is_partial_and_null_clears() {
    let conn = setup_db();
    let created = properties::create(&conn, &sample_property()).expect("create");

    let patch = PropertyPatch {
        price: Some(9_000),
        status: Some(ListingStatus::Sold),
        bedrooms: Some(None),
        ..Default::default()
    };
    let updated = properties::update(&conn, created.id, &patch)
        .expect("update")
        .expect("some");
    assert_eq!(updated.price, 9_000);
    assert_eq!(updated.status, ListingStatus::Sold);
    assert_eq!(updated.bedrooms, None);
    // Untouched fields survive.
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.bathrooms, created.bathrooms);
}

#[test]
fn property_update_of_missing_row_is_none() {
    let conn = setup_db();
    let patch = PropertyPatch {
        price: Some(1),
        ..Default::default()
    };
    assert!(properties::update(&conn, 999, &patch).expect("update").is_none());
}

#[test]
fn property_delete_reports_absence_and_leaves_count_alone() {
    let conn = setup_db();
    let created = properties::create(&conn, &sample_property()).expect("create");
    assert_eq!(properties::count_all(&conn).expect("count"), 1);

    assert!(properties::delete(&conn, created.id).expect("delete"));
    assert!(!properties::delete(&conn, created.id).expect("second delete"));
    assert!(!properties::delete(&conn, 12_345).expect("missing delete"));
    assert_eq!(properties::count_all(&conn).expect("count"), 0);
}

#[test]
fn distinct_filter_options_come_back_sorted() {
    let conn = setup_db();
    let mut p = sample_property();
    properties::create(&conn, &p).expect("create");
    p.location = "Nairobi".to_string();
    p.property_type = PropertyType::Commercial;
    properties::create(&conn, &p).expect("create");
    p.location = "Nairobi".to_string();
    properties::create(&conn, &p).expect("create");

    assert_eq!(
        properties::distinct_locations(&conn).expect("locations"),
        vec!["Kiambu".to_string(), "Nairobi".to_string()]
    );
    assert_eq!(
        properties::distinct_types(&conn).expect("types"),
        vec!["commercial".to_string(), "residential".to_string()]
    );
}

#[test]
fn featured_excludes_inactive_statuses() {
    let conn = setup_db();
    let mut p = sample_property();
    let active = properties::create(&conn, &p).expect("create");
    p.status = ListingStatus::Sold;
    properties::create(&conn, &p).expect("create sold");
    p.status = ListingStatus::ForRent;
    p.featured = false;
    properties::create(&conn, &p).expect("create unfeatured");

    let rows = properties::featured(&conn, 10).expect("featured");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, active.id);
}

#[test]
fn inquiry_lifecycle_new_to_resolved() {
    let conn = setup_db();
    let created = inquiries::create(&conn, &sample_inquiry()).expect("create");
    assert_eq!(created.status, InquiryStatus::New);

    let updated = inquiries::update_status(&conn, created.id, InquiryStatus::Resolved)
        .expect("update")
        .expect("some");
    assert_eq!(updated.status, InquiryStatus::Resolved);

    let resolved = inquiries::list(&conn, None, Some(InquiryStatus::Resolved)).expect("list");
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, created.id);

    assert!(inquiries::update_status(&conn, 999, InquiryStatus::Resolved)
        .expect("update missing")
        .is_none());
}

#[test]
fn inquiry_search_scans_free_text_columns() {
    let conn = setup_db();
    inquiries::create(&conn, &sample_inquiry()).expect("create");
    let mut other = sample_inquiry();
    other.name = "Wanjiru".to_string();
    other.message = "Do you have plots in Nakuru?".to_string();
    inquiries::create(&conn, &other).expect("create");

    let hits = inquiries::list(&conn, Some("Nakuru"), None).expect("list");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Wanjiru");

    assert_eq!(inquiries::count_all(&conn).expect("count"), 2);
    assert_eq!(
        inquiries::count_by_status(&conn, InquiryStatus::New).expect("count"),
        2
    );
}

#[test]
fn director_crud_round_trip() {
    let conn = setup_db();
    let new = NewDirector {
        name: "Jane Wanjiku".to_string(),
        position: "Managing Director".to_string(),
        bio: "Twenty years in Kenyan real estate.".to_string(),
        image_url: "https://cdn.example.com/jane.jpg".to_string(),
        linkedin: None,
        email: Some("jane@makazi.co.ke".to_string()),
    };
    let created = directors::create(&conn, &new).expect("create");
    assert_eq!(directors::list(&conn).expect("list").len(), 1);

    let mut renamed = new.clone();
    renamed.position = "Chairperson".to_string();
    let updated = directors::update(&conn, created.id, &renamed)
        .expect("update")
        .expect("some");
    assert_eq!(updated.position, "Chairperson");

    assert!(directors::delete(&conn, created.id).expect("delete"));
    assert!(directors::list(&conn).expect("list").is_empty());
    assert!(directors::update(&conn, created.id, &renamed)
        .expect("update missing")
        .is_none());
}

#[test]
fn duplicate_username_is_a_conflict() {
    let conn = setup_db();
    users::create(&conn, "admin", "hash-a").expect("create");
    let err = users::create(&conn, "admin", "hash-b").expect_err("duplicate");
    assert!(matches!(err, crate::StoreError::Conflict(_)));
    assert_eq!(users::count(&conn).expect("count"), 1);
}

#[test]
fn sessions_expire_and_delete() {
    let conn = setup_db();
    let user = users::create(&conn, "admin", "hash").expect("create user");
    let now = Utc::now();

    sessions::create(&conn, "live-token-hash", user.id, now + Duration::hours(12))
        .expect("create live");
    sessions::create(&conn, "stale-token-hash", user.id, now - Duration::hours(1))
        .expect("create stale");

    let resolved = sessions::get_valid(&conn, "live-token-hash", now)
        .expect("lookup")
        .expect("some");
    assert_eq!(resolved.username, "admin");
    assert!(sessions::get_valid(&conn, "stale-token-hash", now)
        .expect("lookup")
        .is_none());
    assert!(sessions::get_valid(&conn, "unknown", now).expect("lookup").is_none());

    assert_eq!(sessions::purge_expired(&conn, now).expect("purge"), 1);
    assert!(sessions::delete(&conn, "live-token-hash").expect("delete"));
    assert!(!sessions::delete(&conn, "live-token-hash").expect("redelete"));
}
