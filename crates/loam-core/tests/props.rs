//! Property tests: finder algebra against naive in-memory evaluation over
//! small generated universes.

mod common;

use common::{BAZ, db};
use loam_core::db::query::Filter;
use proptest::prelude::*;

/// Ids are assigned 1..=n in creation order; with universes this small the
/// store's lexicographic enumeration matches numeric order.
fn seeded(rows: &[(u8, u8)]) -> loam_core::db::Db<loam_core::store::MemoryStore> {
    let db = db();
    for (a, b) in rows {
        let _ = db
            .create(&BAZ, [("a", a.to_string()), ("b", b.to_string())])
            .expect("create");
    }
    db
}

fn naive_ids(rows: &[(u8, u8)], matches: impl Fn(u8, u8) -> bool) -> Vec<String> {
    rows.iter()
        .enumerate()
        .filter(|(_, (a, b))| matches(*a, *b))
        .map(|(i, _)| (i + 1).to_string())
        .collect()
}

fn universe() -> impl Strategy<Value = Vec<(u8, u8)>> {
    proptest::collection::vec((0u8..3, 0u8..2), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn find_matches_naive_filtering(rows in universe(), probe in 0u8..3) {
        let db = seeded(&rows);
        let value = probe.to_string();

        let ids = db.find(&BAZ, ("a", value.as_str())).expect("indexed").ids().expect("ids");

        prop_assert_eq!(ids, naive_ids(&rows, |a, _| a == probe));
    }

    #[test]
    fn chained_finds_match_multi_field_filters(rows in universe(), pa in 0u8..3, pb in 0u8..2) {
        let db = seeded(&rows);
        let (a, b) = (pa.to_string(), pb.to_string());

        let chained = db
            .find(&BAZ, ("a", a.as_str())).expect("indexed")
            .find(("b", b.as_str())).expect("indexed")
            .ids().expect("ids");
        let combined = db
            .find(&BAZ, Filter::new().eq("a", a.as_str()).eq("b", b.as_str()))
            .expect("indexed")
            .ids().expect("ids");

        prop_assert_eq!(&chained, &combined);
        prop_assert_eq!(chained, naive_ids(&rows, |a, b| a == pa && b == pb));
    }

    #[test]
    fn excepting_a_filter_from_itself_is_always_empty(rows in universe(), probe in 0u8..3) {
        let db = seeded(&rows);
        let value = probe.to_string();

        let finder = db
            .find(&BAZ, ("a", value.as_str())).expect("indexed")
            .except(("a", value.as_str())).expect("indexed");

        prop_assert_eq!(finder.size().expect("size"), 0);
        prop_assert!(finder.ids().expect("ids").is_empty());
    }

    #[test]
    fn union_matches_naive_disjunction(rows in universe(), pa in 0u8..3, pb in 0u8..2) {
        let db = seeded(&rows);
        let (a, b) = (pa.to_string(), pb.to_string());

        let ids = db
            .find(&BAZ, ("a", a.as_str())).expect("indexed")
            .union(("b", b.as_str())).expect("indexed")
            .ids().expect("ids");

        prop_assert_eq!(ids, naive_ids(&rows, |a, b| a == pa || b == pb));
    }

    #[test]
    fn combine_matches_naive_any_of(rows in universe(), pb in 0u8..2) {
        let db = seeded(&rows);
        let b = pb.to_string();

        let ids = db
            .find(&BAZ, ("b", b.as_str())).expect("indexed")
            .combine(Filter::new().any("a", ["0", "1"])).expect("indexed")
            .ids().expect("ids");

        prop_assert_eq!(ids, naive_ids(&rows, |a, b| b == pb && (a == 0 || a == 1)));
    }
}
