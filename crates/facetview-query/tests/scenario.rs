//! End-to-end browsing scenarios over the bundled song sample.

use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::Rc;
use std::sync::Arc;

use facetview_query::{
    sample, Browser, BrowserConfig, ColumnConfig, Dir, FacetConfig, FacetKind, Intent,
    QueryError, Record, RecordSource, SortIndicator, SortState, ValueSet,
};

// ============================================================================
// Helpers
// ============================================================================

fn titles(browser: &Browser) -> Vec<String> {
    browser
        .visible_rows()
        .iter()
        .filter_map(|r| r.get("title"))
        .map(str::to_string)
        .collect()
}

fn numbered(n: usize) -> Browser {
    let records = (1..=n)
        .map(|i| {
            Record::from_pairs([
                ("id", format!("{i:03}")),
                ("parity", if i % 2 == 0 { "even" } else { "odd" }.to_string()),
                ("tag", format!("t{}", i % 3)),
            ])
        })
        .collect();
    let config = BrowserConfig::new(["id"])
        .page_size(NonZeroUsize::new(10).unwrap())
        .facet(FacetConfig::new("parity", FacetKind::Single))
        .facet(FacetConfig::new("tag", FacetKind::Multi))
        .column(ColumnConfig::new("id", "Id", true));
    Browser::new(Arc::new(RecordSource::new(records).unwrap()), config).unwrap()
}

// ============================================================================
// Song sample
// ============================================================================

#[test]
fn search_love_finds_whole_lotta_love() {
    let mut b = Browser::songs().unwrap();
    b.set_search_text("love");
    assert_eq!(titles(&b), vec!["Whole Lotta Love"]);
    assert_eq!(b.pagination_info().current_page, 1);
}

#[test]
fn genre_rock_shows_four_tracks_on_one_page() {
    let mut b = Browser::songs().unwrap();
    b.set_single_facet("genre", Some("Rock")).unwrap();

    let mut shown = titles(&b);
    shown.sort();
    assert_eq!(
        shown,
        vec![
            "All Along the Watchtower",
            "Purple Haze",
            "Stairway to Heaven",
            "Whole Lotta Love"
        ]
    );
    assert_eq!(b.pagination_info().total_pages, 1);
    assert_eq!(b.pagination_info().label(), "1 of 1");
}

#[test]
fn facet_options_come_from_records() {
    let b = Browser::songs().unwrap();
    let genres: Vec<&str> = b
        .facet_options("genre")
        .unwrap()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(genres, vec!["Hip-Hop", "Pop", "Rock"]);
    assert_eq!(b.facet_options("artist").unwrap().len(), 5);
}

#[test]
fn search_composes_with_facets() {
    let mut b = Browser::songs().unwrap();
    b.set_search_text("a");
    b.commit_multi_facet("artist", ["Led Zeppelin", "ABBA"].into_iter().collect())
        .unwrap();
    b.set_single_facet("genre", Some("Pop")).unwrap();
    assert_eq!(titles(&b), vec!["Dancing Queen", "Mamma Mia"]);

    b.set_single_facet("genre", None).unwrap();
    assert_eq!(
        titles(&b),
        vec![
            "Dancing Queen",
            "Mamma Mia",
            "Stairway to Heaven",
            "Whole Lotta Love"
        ]
    );
}

#[test]
fn sort_by_artist_is_stable_for_ties() {
    let mut b = Browser::songs().unwrap();
    b.toggle_sort("artist").unwrap();
    assert_eq!(
        titles(&b),
        vec![
            "Dancing Queen",
            "Mamma Mia",
            "Bad Guy",
            "Happier Than Ever",
            "All Along the Watchtower",
            "Purple Haze",
            "DNA.",
            "HUMBLE.",
            "Stairway to Heaven",
            "Whole Lotta Love",
        ]
    );

    b.toggle_sort("artist").unwrap();
    let shown = titles(&b);
    assert_eq!(&shown[..2], &["Stairway to Heaven", "Whole Lotta Love"]);
    assert_eq!(&shown[8..], &["Dancing Queen", "Mamma Mia"]);
}

#[test]
fn switching_sort_column_starts_ascending() {
    let mut b = Browser::songs().unwrap();
    b.toggle_sort("title").unwrap();
    b.toggle_sort("title").unwrap();
    b.toggle_sort("artist").unwrap();
    assert_eq!(b.sort_state(), &SortState::by("artist", Dir::Asc));
    assert_eq!(b.sort_indicator("title"), SortIndicator::Inactive);
    assert_eq!(b.sort_indicator("artist"), SortIndicator::Ascending);
}

#[test]
fn multi_select_staging_flow() {
    let mut b = Browser::songs().unwrap();

    b.open_picker("artist").unwrap();
    b.toggle_draft("artist", "Kendrick Lamar").unwrap();
    b.toggle_draft("artist", "Billie Eilish").unwrap();
    b.set_picker_search("artist", "zep").unwrap();
    let picker = b.picker("artist").unwrap();
    assert_eq!(picker.visible_options().len(), 1);
    assert_eq!(picker.selected_heading(), "Selected (2)");
    assert_eq!(b.facet_label("artist").unwrap(), "Artist");
    assert_eq!(b.filtered_count(), 10);

    b.remove_draft("artist", "Billie Eilish").unwrap();
    b.apply_picker("artist").unwrap();
    assert_eq!(titles(&b), vec!["DNA.", "HUMBLE."]);
    assert_eq!(b.facet_label("artist").unwrap(), "Artist (1)");

    // Reopen, clear, cancel: committed value survives.
    b.open_picker("artist").unwrap();
    assert!(b.picker("artist").unwrap().is_checked("Kendrick Lamar"));
    b.clear_draft("artist").unwrap();
    b.cancel_picker("artist").unwrap();
    let committed: ValueSet = ["Kendrick Lamar"].into_iter().collect();
    assert_eq!(b.multi_facet("artist").unwrap(), &committed);
    assert_eq!(b.filtered_count(), 2);
}

#[test]
fn apply_without_open_fails() {
    let mut b = Browser::songs().unwrap();
    assert!(matches!(
        b.apply_picker("artist"),
        Err(QueryError::PickerClosed(_))
    ));
    assert!(matches!(
        b.open_picker("genre"),
        Err(QueryError::FacetKindMismatch { .. })
    ));
}

// ============================================================================
// Pagination and page reset
// ============================================================================

#[test]
fn twenty_five_rows_make_three_pages() {
    let mut b = numbered(25);
    assert_eq!(b.pagination_info().total_pages, 3);
    assert_eq!(b.visible_rows().len(), 10);

    b.set_page(3);
    let ids: Vec<&str> = b.visible_rows().iter().filter_map(|r| r.get("id")).collect();
    assert_eq!(ids, vec!["021", "022", "023", "024", "025"]);
}

#[test]
fn every_filter_input_resets_page() {
    let mut b = numbered(40);

    b.set_page(3);
    b.set_search_text("0");
    assert_eq!(b.state().page(), 1);

    b.set_page(2);
    b.set_single_facet("parity", Some("odd")).unwrap();
    assert_eq!(b.state().page(), 1);

    b.set_page(2);
    b.commit_multi_facet("tag", ["t1"].into_iter().collect())
        .unwrap();
    assert_eq!(b.state().page(), 1);
}

#[test]
fn draft_edits_do_not_reset_page() {
    let mut b = numbered(40);
    b.set_page(4);
    b.open_picker("tag").unwrap();
    b.toggle_draft("tag", "t0").unwrap();
    b.cancel_picker("tag").unwrap();
    assert_eq!(b.state().page(), 4);
}

#[test]
fn sort_keeps_page_when_still_valid() {
    let mut b = numbered(40);
    b.set_page(4);
    b.toggle_sort("id").unwrap();
    assert_eq!(b.state().page(), 4);
    assert_eq!(b.visible_rows()[0].get("id"), Some("031"));
    b.toggle_sort("id").unwrap();
    assert_eq!(b.visible_rows()[0].get("id"), Some("010"));
}

#[test]
fn no_matches_hides_pager() {
    let mut b = numbered(12);
    b.set_search_text("xyz");
    let info = b.pagination_info();
    assert_eq!(info.total_pages, 1);
    assert_eq!(info.current_page, 1);
    assert!(!info.is_visible());
    assert!(b.visible_rows().is_empty());
}

// ============================================================================
// Observers and dispatch
// ============================================================================

#[test]
fn observers_get_snapshots() {
    let mut b = Browser::songs().unwrap();
    let pages: Rc<RefCell<Vec<(usize, Option<String>)>>> = Rc::default();
    let sink = Rc::clone(&pages);
    b.subscribe(move |snap| {
        sink.borrow_mut()
            .push((snap.filtered_count, snap.filter_summary.clone()));
    });

    b.set_search_text("love");
    b.set_search_text("love");
    b.set_search_text("");

    assert_eq!(
        *pages.borrow(),
        vec![(1, Some("search \"love\"".to_string())), (10, None)]
    );
}

#[test]
fn intents_from_json_drive_the_browser() {
    let script = [
        r#"{"intent":"open_picker","facet":"artist"}"#,
        r#"{"intent":"toggle_draft","facet":"artist","value":"ABBA"}"#,
        r#"{"intent":"toggle_draft","facet":"artist","value":"Led Zeppelin"}"#,
        r#"{"intent":"apply_picker","facet":"artist"}"#,
        r#"{"intent":"choose_single","facet":"genre","value":"Rock"}"#,
        r#"{"intent":"sort","column":"title"}"#,
        r#"{"intent":"sort","column":"title"}"#,
    ];

    let mut b = Browser::songs().unwrap();
    for line in script {
        let intent: Intent = serde_json::from_str(line).unwrap();
        b.dispatch(intent).unwrap();
    }
    assert_eq!(titles(&b), vec!["Whole Lotta Love", "Stairway to Heaven"]);
    assert_eq!(
        b.filter_summary().as_deref(),
        Some("artist in [ABBA, Led Zeppelin], genre = Rock")
    );
}

#[test]
fn sample_records_are_exposed() {
    assert_eq!(sample::song_records().len(), 10);
    assert_eq!(sample::songs().fields(), &["artist", "genre", "title"]);
}
