//! Property-based tests for the query engines and browser using proptest.

use std::num::NonZeroUsize;
use std::sync::Arc;

use proptest::prelude::*;
use facetview_query::{
    paginate, sort, total_pages, Browser, BrowserConfig, ColumnConfig, Dir, FacetConfig,
    FacetKind, Filter, Record, RecordSource, SortState, ValueSet,
};

// ============================================================================
// Test helpers
// ============================================================================

const COLORS: [&str; 3] = ["red", "green", "blue"];

// Strategy to generate homogeneous records with a unique `id`.
fn records_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(("[a-c]{0,4}", 0..COLORS.len()), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, color))| {
                Record::from_pairs([
                    ("id", format!("{i:03}")),
                    ("name", name),
                    ("color", COLORS[color].to_string()),
                ])
            })
            .collect()
    })
}

fn ids(records: &[&Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get("id"))
        .map(str::to_string)
        .collect()
}

fn browser(records: Vec<Record>, page_size: usize) -> Browser {
    let config = BrowserConfig::new(["name"])
        .page_size(NonZeroUsize::new(page_size).unwrap())
        .facet(FacetConfig::new("color", FacetKind::Multi))
        .column(ColumnConfig::new("name", "Name", true));
    Browser::new(Arc::new(RecordSource::new(records).unwrap()), config).unwrap()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Filtering keeps input order and never grows the collection.
    #[test]
    fn filter_is_an_ordered_subsequence(
        records in records_strategy(),
        needle in "[a-c]{0,2}",
    ) {
        let filter = Filter::new().and_search(&needle, ["name"]).build();
        let kept = ids(&filter.apply(&records));
        prop_assert!(kept.len() <= records.len());

        let mut sorted = kept.clone();
        sorted.sort();
        prop_assert_eq!(kept, sorted);
    }

    /// A combined filter keeps exactly the records every part keeps.
    #[test]
    fn clauses_combine_with_and(
        records in records_strategy(),
        needle in "[a-c]{0,2}",
        picked in prop::sample::subsequence(COLORS.to_vec(), 0..=3),
    ) {
        let colors: ValueSet = picked.into_iter().collect();
        let search = Filter::new().and_search(&needle, ["name"]).build();
        let facet = Filter::new().and_in("color", &colors).build();
        let both = Filter::new()
            .and_search(&needle, ["name"])
            .and_in("color", &colors)
            .build();

        for record in &records {
            prop_assert_eq!(
                both.matches(record),
                search.matches(record) && facet.matches(record)
            );
        }
    }

    /// Sorting is a stable permutation in both directions.
    #[test]
    fn sort_is_stable_permutation(records in records_strategy(), desc in any::<bool>()) {
        let dir = if desc { Dir::Desc } else { Dir::Asc };
        let refs: Vec<&Record> = records.iter().collect();
        let sorted = sort(refs, &SortState::by("name", dir));
        prop_assert_eq!(sorted.len(), records.len());

        for pair in sorted.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ka, kb) = (a.get("name"), b.get("name"));
            prop_assert!(dir.orient(ka.cmp(&kb)) != std::cmp::Ordering::Greater);
            if ka == kb {
                prop_assert!(a.get("id") < b.get("id"));
            }
        }
    }

    /// Unsorted leaves order untouched.
    #[test]
    fn unsorted_is_identity(records in records_strategy()) {
        let refs: Vec<&Record> = records.iter().collect();
        let expected = ids(&refs);
        prop_assert_eq!(ids(&sort(refs, &SortState::Unsorted)), expected);
    }

    /// Pages partition the input and every non-final page is full.
    #[test]
    fn pages_partition_input(len in 0usize..60, size in 1usize..15) {
        let items: Vec<usize> = (0..len).collect();
        let size = NonZeroUsize::new(size).unwrap();
        let total = total_pages(len, size);
        prop_assert!(total >= 1);

        let mut seen = Vec::new();
        for page in 1..=total {
            let slice = paginate(&items, size, page);
            prop_assert_eq!(slice.info.current_page, page);
            if page < total {
                prop_assert_eq!(slice.items.len(), size.get());
            }
            seen.extend_from_slice(slice.items);
        }
        prop_assert_eq!(seen, items);
    }

    /// Three activations of one column return to unsorted.
    #[test]
    fn sort_cycle_has_period_three(start in prop::sample::select(vec!["name", "id"])) {
        let mut state = SortState::Unsorted;
        if start == "id" {
            state = SortState::by("id", Dir::Desc);
        }
        let once = state.toggled("name");
        prop_assert_eq!(&once, &SortState::by("name", Dir::Asc));
        let twice = once.toggled("name");
        prop_assert_eq!(&twice, &SortState::by("name", Dir::Desc));
        prop_assert_eq!(twice.toggled("name"), SortState::Unsorted);
    }

    /// Changing a filter input always lands on page 1; visible rows are
    /// always a slice of the ordered rows.
    #[test]
    fn filter_changes_reset_page(
        records in records_strategy(),
        page in 1usize..6,
        needle in "[a-c]{0,2}",
        picked in prop::sample::subsequence(COLORS.to_vec(), 0..=3),
    ) {
        let mut b = browser(records, 5);
        b.set_page(page);
        prop_assert!(b.state().page() <= b.pagination_info().total_pages);

        b.set_search_text(&needle);
        prop_assert_eq!(b.state().page(), 1);

        let known: ValueSet = picked
            .into_iter()
            .filter(|c| b.facet_options("color").unwrap().iter().any(|o| o.value == *c))
            .collect();
        b.set_page(page);
        b.commit_multi_facet("color", known).unwrap();
        prop_assert_eq!(b.state().page(), 1);

        let visible = ids(&b.visible_rows());
        let ordered = ids(&b.ordered_rows());
        prop_assert_eq!(&visible[..], &ordered[..visible.len()]);
        prop_assert_eq!(b.filtered_count(), ordered.len());
    }

    /// Draft edits never change what is on screen.
    #[test]
    fn drafts_do_not_filter(
        records in records_strategy(),
        toggles in prop::collection::vec(prop::sample::select(COLORS.to_vec()), 0..6),
    ) {
        let mut b = browser(records, 5);
        let before = b.snapshot();
        b.open_picker("color").unwrap();
        for color in toggles {
            b.toggle_draft("color", color).ok();
        }
        prop_assert_eq!(b.snapshot(), before.clone());
        b.cancel_picker("color").unwrap();
        prop_assert_eq!(b.snapshot(), before);
    }
}
