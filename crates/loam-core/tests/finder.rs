//! Finder algebra scenarios over a small, fully-enumerated universe.

mod common;

use common::{BAZ, FOO, db};
use loam_core::{Error, db::query::Filter, model::Object};

/// (a, b) = (1,1), (1,2), (2,1), (2,2) under ids 1..=4.
fn seeded() -> loam_core::db::Db<loam_core::store::MemoryStore> {
    let db = db();

    for (a, b) in [("1", "1"), ("1", "2"), ("2", "1"), ("2", "2")] {
        let _ = db.create(&BAZ, [("a", a), ("b", b)]).expect("create");
    }

    db
}

#[test]
fn find_narrows_to_matching_ids() {
    let db = seeded();

    assert_eq!(
        db.find(&BAZ, ("a", "1")).expect("indexed").ids().expect("ids"),
        vec!["1".to_string(), "2".to_string()]
    );
}

#[test]
fn combine_broadens_one_field_while_keeping_the_rest() {
    let db = seeded();

    let ids = db
        .find(&BAZ, ("b", "1"))
        .expect("indexed")
        .combine(Filter::new().any("a", ["1", "2"]))
        .expect("indexed")
        .ids()
        .expect("ids");

    assert_eq!(ids, vec!["1".to_string(), "3".to_string()]);
}

#[test]
fn union_covers_both_branches() {
    let db = seeded();

    let ids = db
        .find(&BAZ, ("a", "1"))
        .expect("indexed")
        .union(("a", "2"))
        .expect("indexed")
        .ids()
        .expect("ids");

    assert_eq!(ids.len(), 4);
}

#[test]
fn chained_finds_match_the_combined_filter() {
    let db = seeded();

    let chained = db
        .find(&BAZ, ("a", "1"))
        .expect("indexed")
        .find(("b", "2"))
        .expect("indexed")
        .ids()
        .expect("ids");
    let combined = db
        .find(&BAZ, [("a", "1"), ("b", "2")])
        .expect("indexed")
        .ids()
        .expect("ids");

    assert_eq!(chained, combined);
    assert_eq!(chained, vec!["2".to_string()]);
}

#[test]
fn excepting_a_filter_from_itself_is_empty() {
    let db = seeded();

    let finder = db
        .find(&BAZ, ("a", "1"))
        .expect("indexed")
        .except(("a", "1"))
        .expect("indexed");

    assert_eq!(finder.size().expect("size"), 0);
    assert!(finder.ids().expect("ids").is_empty());
}

#[test]
fn union_results_are_supersets_of_both_sides() {
    let db = seeded();

    let left = db.find(&BAZ, ("a", "1")).expect("indexed");
    let union = left.union(("b", "2")).expect("indexed");

    let union_ids = union.ids().expect("ids");
    for id in left.ids().expect("ids") {
        assert!(union_ids.contains(&id));
    }
    for id in db.find(&BAZ, ("b", "2")).expect("indexed").ids().expect("ids") {
        assert!(union_ids.contains(&id));
    }
}

#[test]
fn size_matches_id_count() {
    let db = seeded();
    let finder = db.find(&BAZ, ("b", "1")).expect("indexed");

    assert_eq!(finder.size().expect("size") as usize, finder.ids().expect("ids").len());
}

#[test]
fn membership_follows_the_instance_lifecycle() {
    let db = db();

    let object = db.create(&FOO, [("a", "1"), ("b", "2")]).expect("create");
    let finder = db.find(&FOO, [("a", "1"), ("b", "2")]).expect("indexed");

    assert!(finder.includes(&object).expect("includes"));

    db.delete(&object).expect("delete");
    assert!(!finder.includes(&object).expect("includes"));
}

#[test]
fn an_unsaved_instance_is_never_included() {
    let db = seeded();

    let unsaved = Object::new(&BAZ);
    assert!(
        !db.all(&BAZ).includes(&unsaved).expect("answered without a store call")
    );
}

#[test]
fn unindexed_filters_fail_immediately() {
    let db = db();
    let _ = db.create(&FOO, [("c", "3")]).expect("create");

    let err = db.find(&FOO, ("c", "3")).expect_err("c is not indexed");
    assert!(matches!(err, Error::IndexNotFound { field } if field == "c"));
}

#[test]
fn all_supports_every_operation() {
    let db = seeded();

    assert_eq!(db.all(&BAZ).size().expect("size"), 4);

    let ids = db
        .all(&BAZ)
        .find(("a", "1"))
        .expect("indexed")
        .except(("b", "2"))
        .expect("indexed")
        .ids()
        .expect("ids");
    assert_eq!(ids, vec!["1".to_string()]);
}

#[test]
fn fetch_hydrates_members_in_one_batch() {
    let db = seeded();

    let objects = db.find(&BAZ, ("a", "1")).expect("indexed").fetch().expect("fetch");

    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].id(), Some("1"));
    assert_eq!(objects[0].get("b"), Some("1"));
    assert_eq!(objects[1].id(), Some("2"));
    assert_eq!(objects[1].get("b"), Some("2"));
}

#[test]
fn first_returns_the_first_hydrated_member() {
    let db = seeded();

    let first = db
        .find(&BAZ, ("a", "2"))
        .expect("indexed")
        .first()
        .expect("fetch")
        .expect("non-empty");
    assert_eq!(first.id(), Some("3"));

    assert!(
        db.find(&BAZ, ("a", "9"))
            .expect("indexed")
            .first()
            .expect("fetch")
            .is_none()
    );
}
