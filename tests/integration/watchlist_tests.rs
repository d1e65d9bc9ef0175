use super::*;
use book_price_watcher::{utils::error::ValidationError, watchlist};

#[test]
fn test_merging_two_sources_keeps_order_and_duplicates() {
    let first = json_file(
        r#"[
            {"slug": "a-light-in-the-attic_1000/index.html", "asking_price": 50},
            {"slug": "tipping-the-velvet_999/index.html", "asking_price": 40.5}
        ]"#,
    );
    let second = json_file(
        r#"[
            {"slug": "soumission_998/index.html", "asking_price": 45},
            {"slug": "a-light-in-the-attic_1000/index.html", "asking_price": 50}
        ]"#,
    );

    let loaded_first = watchlist::load_file(first.path()).unwrap();
    let loaded_second = watchlist::load_file(second.path()).unwrap();
    let merged = watchlist::merge(loaded_first.clone(), loaded_second.clone());

    assert_eq!(merged.len(), loaded_first.len() + loaded_second.len());
    assert_eq!(&merged[..2], &loaded_first[..]);
    assert_eq!(&merged[2..], &loaded_second[..]);

    let built = Watchlist::from_sources(&[first.path(), second.path()]).unwrap();
    assert_eq!(built.entries(), &merged[..]);
    assert_eq!(built.validate().unwrap().len(), 4);
}

#[test]
fn test_validation_index_spans_sources() {
    let first = json_file(r#"[{"slug": "a", "asking_price": 10}, {"slug": "b", "asking_price": 3}]"#);
    let second = json_file(r#"[{"slug": "c"}]"#);

    let built = Watchlist::from_sources(&[first.path(), second.path()]).unwrap();
    assert_eq!(
        built.validate(),
        Err(ValidationError::MissingField { index: 2, field: "asking_price" })
    );
}
