use triage_core::model::status::{BACKLOG_TAG, DONE_TAG, IN_PROGRESS_TAG, TRIAGE_TAG};
use triage_core::{apply_status, resolve_status, TriageItem, TriageStatus};

fn tag_sets() -> Vec<Vec<&'static str>> {
    vec![
        vec![],
        vec![TRIAGE_TAG],
        vec![TRIAGE_TAG, BACKLOG_TAG],
        vec![TRIAGE_TAG, IN_PROGRESS_TAG, "anamnese"],
        vec!["exam", DONE_TAG, BACKLOG_TAG, IN_PROGRESS_TAG],
        vec!["consent", "consent", TRIAGE_TAG, TRIAGE_TAG],
    ]
}

#[test]
fn resolve_after_apply_returns_applied_status() {
    for tags in tag_sets() {
        for status in TriageStatus::ALL {
            let applied = apply_status(&tags, status);
            assert_eq!(resolve_status(&applied), status, "tags={tags:?}");
        }
    }
}

#[test]
fn apply_keeps_unrelated_tags_and_exactly_one_column_tag() {
    for tags in tag_sets() {
        let mut with_extra = tags.clone();
        with_extra.push("custom-doc");
        for status in TriageStatus::ALL {
            let applied = apply_status(&with_extra, status);
            assert!(applied.iter().any(|tag| tag == "custom-doc"));
            assert!(applied.iter().any(|tag| tag == TRIAGE_TAG));
            for other in TriageStatus::ALL {
                let count = applied.iter().filter(|tag| *tag == other.tag()).count();
                assert_eq!(count, usize::from(other == status), "status={status}");
            }
        }
    }
}

#[test]
fn apply_is_idempotent() {
    for tags in tag_sets() {
        for status in TriageStatus::ALL {
            let once = apply_status(&tags, status);
            let twice = apply_status(&once, status);
            assert_eq!(once, twice);
        }
    }
}

#[test]
fn apply_output_has_no_duplicates() {
    let applied = apply_status(&["a", "b", "a", TRIAGE_TAG, TRIAGE_TAG], TriageStatus::Done);
    assert_eq!(applied, vec!["a", "b", TRIAGE_TAG, DONE_TAG]);
}

#[test]
fn item_tag_view_round_trips_through_projection() {
    let item = TriageItem::from_tags("x", "X", &[TRIAGE_TAG, DONE_TAG, "intake"]);
    let reprojected = TriageItem::from_tags("x", "X", &item.tags());
    assert_eq!(reprojected.status, TriageStatus::Done);
    assert_eq!(reprojected.labels, item.labels);
}

#[test]
fn status_serializes_with_kebab_case() {
    let json = serde_json::to_value(TriageStatus::InProgress).unwrap();
    assert_eq!(json, "in-progress");
    let decoded: TriageStatus = serde_json::from_value(serde_json::json!("done")).unwrap();
    assert_eq!(decoded, TriageStatus::Done);
}
