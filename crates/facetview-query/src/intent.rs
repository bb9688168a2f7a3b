//! User intents.
//!
//! An [`Intent`] names one mutation entry point of the
//! [`Browser`](crate::Browser). Event-driven hosts feed intents through
//! [`Browser::dispatch`](crate::Browser::dispatch) one at a time; each is
//! handled to completion (update, re-derive, notify) before the next.

use serde::{Deserialize, Serialize};

use crate::selection::ValueSet;

/// One user action.
///
/// Intents deserialize from tagged JSON:
///
/// ```
/// use facetview_query::Intent;
///
/// let intent: Intent = serde_json::from_str(r#"{"intent":"sort","column":"title"}"#).unwrap();
/// assert_eq!(intent, Intent::Sort { column: "title".into() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Replace the search text.
    Search { text: String },
    /// Set or clear a single-select facet.
    SetSingle {
        facet: String,
        value: Option<String>,
    },
    /// Pick a single-select option; picking the selected one clears it.
    ChooseSingle { facet: String, value: String },
    /// Replace a multi-select facet's committed selection.
    CommitMulti { facet: String, values: ValueSet },
    /// Open a closed picker, cancel an open one.
    TogglePicker { facet: String },
    /// Open a picker, seeding its draft.
    OpenPicker { facet: String },
    /// Close a picker without applying its draft.
    CancelPicker { facet: String },
    /// Close a picker and commit its draft.
    ApplyPicker { facet: String },
    /// Flip one value in a picker's draft.
    ToggleDraft { facet: String, value: String },
    /// Drop one value from a picker's draft.
    RemoveDraft { facet: String, value: String },
    /// Empty a picker's draft.
    ClearDraft { facet: String },
    /// Narrow a picker's displayed options.
    PickerSearch { facet: String, text: String },
    /// Activate a column header.
    Sort { column: String },
    /// Jump to a page.
    Page { page: usize },
    NextPage,
    PreviousPage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_unit_intents() {
        let intent: Intent = serde_json::from_str(r#"{"intent":"next_page"}"#).unwrap();
        assert_eq!(intent, Intent::NextPage);
    }

    #[test]
    fn deserialize_commit_multi() {
        let intent: Intent = serde_json::from_str(
            r#"{"intent":"commit_multi","facet":"artist","values":["ABBA","ABBA"]}"#,
        )
        .unwrap();
        match intent {
            Intent::CommitMulti { facet, values } => {
                assert_eq!(facet, "artist");
                assert_eq!(values.len(), 1);
            }
            other => panic!("unexpected intent: {other:?}"),
        }
    }

    #[test]
    fn set_single_accepts_null() {
        let intent: Intent =
            serde_json::from_str(r#"{"intent":"set_single","facet":"genre","value":null}"#)
                .unwrap();
        assert_eq!(
            intent,
            Intent::SetSingle {
                facet: "genre".into(),
                value: None
            }
        );
    }
}
