use triage_core::{filter_items, BoardConfig, BoardFilters, TriageItem, TriageStatus};

fn board() -> Vec<TriageItem> {
    let mut intake = TriageItem::from_tags("p1", "Intake form", &["triage", "Anamnese", "triage-backlog"]);
    intake.template_id = Some("tpl-intake".to_string());
    intake.owner_id = "dr-silva".to_string();
    intake.body = "Patient reports headache".to_string();

    let mut consent = TriageItem::from_tags("p2", "Consent", &["triage", "triage-done", "legal"]);
    consent.template_id = Some("tpl-consent".to_string());
    consent.owner_id = "dr-costa".to_string();

    let mut loose = TriageItem::from_tags("p3", "Loose note", &["triage", "triage-in-progress"]);
    loose.owner_id = "dr-silva".to_string();
    loose.body = "Follow up on HEADACHE".to_string();

    vec![intake, consent, loose]
}

fn ids(items: &[TriageItem]) -> Vec<&str> {
    items.iter().map(|item| item.id.as_str()).collect()
}

fn filters() -> BoardFilters {
    BoardFilters::default()
}

#[test]
fn empty_filters_keep_everything_in_order() {
    let items = board();
    let result = filter_items(&items, &filters(), &BoardConfig::default());
    assert_eq!(ids(&result), vec!["p1", "p2", "p3"]);
}

#[test]
fn all_sentinel_disables_every_predicate() {
    let all = Some("all".to_string());
    let result = filter_items(
        &board(),
        &BoardFilters {
            template_id: all.clone(),
            owner_id: all.clone(),
            tag_query: all.clone(),
            text_query: all,
        },
        &BoardConfig::default(),
    );
    assert_eq!(result.len(), 3);
}

#[test]
fn unclassified_sentinel_matches_items_without_template() {
    let config = BoardConfig::default();
    let manual = filter_items(
        &board(),
        &BoardFilters {
            template_id: Some("manual".to_string()),
            ..filters()
        },
        &config,
    );
    assert_eq!(ids(&manual), vec!["p3"]);

    let intake = filter_items(
        &board(),
        &BoardFilters {
            template_id: Some("tpl-intake".to_string()),
            ..filters()
        },
        &config,
    );
    assert_eq!(ids(&intake), vec!["p1"]);
}

#[test]
fn unclassified_sentinel_is_configurable() {
    let config = BoardConfig {
        unclassified_template_id: "none".to_string(),
        ..BoardConfig::default()
    };
    let result = filter_items(
        &board(),
        &BoardFilters {
            template_id: Some("none".to_string()),
            ..filters()
        },
        &config,
    );
    assert_eq!(ids(&result), vec!["p3"]);
}

#[test]
fn tag_query_is_case_insensitive_substring() {
    let result = filter_items(
        &board(),
        &BoardFilters {
            tag_query: Some("anam".to_string()),
            ..filters()
        },
        &BoardConfig::default(),
    );
    assert_eq!(ids(&result), vec!["p1"]);

    // Column tags are part of the tag view.
    let done = filter_items(
        &board(),
        &BoardFilters {
            tag_query: Some("TRIAGE-DONE".to_string()),
            ..filters()
        },
        &BoardConfig::default(),
    );
    assert_eq!(ids(&done), vec!["p2"]);
}

#[test]
fn text_query_searches_title_and_body() {
    let result = filter_items(
        &board(),
        &BoardFilters {
            text_query: Some("headache".to_string()),
            ..filters()
        },
        &BoardConfig::default(),
    );
    assert_eq!(ids(&result), vec!["p1", "p3"]);
}

#[test]
fn predicates_are_combined() {
    let result = filter_items(
        &board(),
        &BoardFilters {
            owner_id: Some("dr-silva".to_string()),
            text_query: Some("follow".to_string()),
            ..filters()
        },
        &BoardConfig::default(),
    );
    assert_eq!(ids(&result), vec!["p3"]);
    assert_eq!(result[0].status, TriageStatus::InProgress);
}

#[test]
fn filtering_does_not_touch_input() {
    let items = board();
    let before = items.clone();
    let _ = filter_items(
        &items,
        &BoardFilters {
            owner_id: Some("nobody".to_string()),
            ..filters()
        },
        &BoardConfig::default(),
    );
    assert_eq!(items, before);
}
