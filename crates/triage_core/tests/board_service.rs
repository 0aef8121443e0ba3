use rusqlite::Connection;
use triage_core::db::open_db_in_memory;
use triage_core::model::status::IN_PROGRESS_TAG;
use triage_core::{
    BoardConfig, BoardFilters, BoardService, BoardServiceError, DropGesture, EventSource,
    RepoError, RepoResult, SqliteTriageEventRepository, SqliteTriageItemRepository, TriageEvent,
    TriageEventDraft, TriageEventRepository, TriageItem, TriageItemRepository, TriageStatus,
};

type SqliteBoardService<'conn> =
    BoardService<SqliteTriageItemRepository<'conn>, SqliteTriageEventRepository<'conn>>;

const NOW: i64 = 1_760_000_000_000;

fn seed(conn: &Connection) {
    let repo = SqliteTriageItemRepository::try_new(conn).unwrap();
    let items = [
        ("a", TriageStatus::Backlog, 1, None),
        ("b", TriageStatus::Backlog, 2, Some("tpl-intake")),
        ("x", TriageStatus::InProgress, 1, None),
    ];
    for (id, status, rank, template) in items {
        let mut item = TriageItem::new(id, format!("Page {id}"))
            .with_status(status)
            .with_rank(rank)
            .with_timestamps(Some(NOW - 86_400_000), Some(NOW - 86_400_000));
        item.template_id = template.map(str::to_string);
        item.owner_id = "dr-silva".to_string();
        repo.upsert_item(&item).unwrap();
    }
}

fn service(conn: &Connection) -> SqliteBoardService<'_> {
    BoardService::new(
        SqliteTriageItemRepository::try_new(conn).unwrap(),
        SqliteTriageEventRepository::try_new(conn).unwrap(),
        BoardConfig::default(),
    )
}

fn column_ids(service: &SqliteBoardService<'_>, status: TriageStatus) -> Vec<String> {
    service
        .load_board(&BoardFilters::default(), NOW)
        .unwrap()
        .buckets
        .column(status)
        .iter()
        .map(|item| item.id.clone())
        .collect()
}

#[test]
fn load_board_buckets_filters_and_measures() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);

    let view = service.load_board(&BoardFilters::default(), NOW).unwrap();
    assert_eq!(view.total_items, 3);
    assert_eq!(view.buckets.backlog.len(), 2);
    assert_eq!(view.buckets.in_progress.len(), 1);
    assert_eq!(view.metrics.columns[0].average_age_days, 1.0);

    let manual_only = service
        .load_board(
            &BoardFilters {
                template_id: Some("manual".to_string()),
                ..BoardFilters::default()
            },
            NOW,
        )
        .unwrap();
    assert_eq!(manual_only.total_items, 3);
    assert_eq!(manual_only.buckets.len(), 2);
    assert_eq!(manual_only.metrics.columns[0].count, 1);
}

#[test]
fn move_item_persists_plan_and_records_event() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);
    let buckets = service
        .load_board(&BoardFilters::default(), NOW)
        .unwrap()
        .buckets;

    let outcome = service
        .move_item(
            &DropGesture {
                moved_item_id: "b".to_string(),
                source: TriageStatus::Backlog,
                destination: TriageStatus::InProgress,
                destination_index: 0,
            },
            &buckets,
            "dr-costa",
            NOW,
            Some("patient arrived".to_string()),
        )
        .unwrap();

    assert_eq!(outcome.plan.updates.len(), 3);
    assert_eq!(column_ids(&service, TriageStatus::Backlog), vec!["a"]);
    assert_eq!(column_ids(&service, TriageStatus::InProgress), vec!["b", "x"]);

    let event = outcome.event.expect("event recorded");
    assert_eq!(event.draft.item_id, "b");
    assert_eq!(event.draft.template_id.as_deref(), Some("tpl-intake"));
    assert_eq!(event.draft.from_status, TriageStatus::Backlog);
    assert_eq!(event.draft.to_status, TriageStatus::InProgress);
    assert_eq!(event.draft.previous_order, Some(2));
    assert_eq!(event.draft.next_order, Some(1));
    assert_eq!(event.draft.source, EventSource::Drag);
    assert_eq!(event.draft.reason.as_deref(), Some("patient arrived"));
    assert_eq!(event.changed_by, "dr-costa");

    assert_eq!(service.history(None).unwrap(), vec![event]);
}

#[test]
fn stale_gesture_persists_nothing() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);
    let buckets = service
        .load_board(&BoardFilters::default(), NOW)
        .unwrap()
        .buckets;

    let outcome = service
        .move_item(
            &DropGesture {
                moved_item_id: "x".to_string(),
                source: TriageStatus::Done,
                destination: TriageStatus::Backlog,
                destination_index: 0,
            },
            &buckets,
            "dr-costa",
            NOW,
            None,
        )
        .unwrap();

    assert!(outcome.plan.is_noop());
    assert!(outcome.event.is_none());
    assert!(service.history(None).unwrap().is_empty());
    assert_eq!(column_ids(&service, TriageStatus::InProgress), vec!["x"]);
}

#[test]
fn gesture_against_outdated_board_fails_without_partial_write() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);
    let mut buckets = service
        .load_board(&BoardFilters::default(), NOW)
        .unwrap()
        .buckets;
    buckets
        .backlog
        .push(TriageItem::new("deleted", "Deleted elsewhere").with_rank(3));

    let err = service
        .move_item(
            &DropGesture {
                moved_item_id: "a".to_string(),
                source: TriageStatus::Backlog,
                destination: TriageStatus::Done,
                destination_index: 0,
            },
            &buckets,
            "dr-costa",
            NOW,
            None,
        )
        .err()
        .expect("unknown item must fail the batch");

    assert!(matches!(err, BoardServiceError::ItemNotFound(ref id) if id == "deleted"));
    assert_eq!(column_ids(&service, TriageStatus::Backlog), vec!["a", "b"]);
    assert!(service.history(None).unwrap().is_empty());
}

#[test]
fn set_status_appends_to_destination_and_records_manual_event() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);

    let outcome = service
        .set_status("a", TriageStatus::InProgress, "dr-costa", NOW, None)
        .unwrap();

    assert_eq!(column_ids(&service, TriageStatus::InProgress), vec!["x", "a"]);
    assert_eq!(column_ids(&service, TriageStatus::Backlog), vec!["b"]);
    let event = outcome.event.expect("event recorded");
    assert_eq!(event.draft.source, EventSource::Manual);
    assert_eq!(event.draft.next_order, Some(2));
}

#[test]
fn set_status_on_unknown_item_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);

    let err = service
        .set_status("ghost", TriageStatus::Done, "dr-costa", NOW, None)
        .err()
        .expect("missing item");
    assert!(matches!(err, BoardServiceError::ItemNotFound(_)));
}

#[test]
fn history_honours_limit() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = service(&conn);

    service
        .set_status("a", TriageStatus::Done, "dr-costa", NOW, None)
        .unwrap();
    service
        .set_status("b", TriageStatus::Done, "dr-costa", NOW + 1, None)
        .unwrap();

    let latest = service.history(Some(1)).unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].draft.item_id, "b");
    assert_eq!(service.history(None).unwrap().len(), 2);
}

struct UnavailableEventLog;

impl TriageEventRepository for UnavailableEventLog {
    fn record_events(
        &self,
        _drafts: &[TriageEventDraft],
        _changed_by: &str,
        _now_ms: i64,
    ) -> RepoResult<Vec<TriageEvent>> {
        Err(RepoError::InvalidData("event log unavailable".to_string()))
    }

    fn list_events(&self, _limit: Option<u32>) -> RepoResult<Vec<TriageEvent>> {
        Ok(Vec::new())
    }
}

#[test]
fn failed_event_write_keeps_applied_move() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let service = BoardService::new(
        SqliteTriageItemRepository::try_new(&conn).unwrap(),
        UnavailableEventLog,
        BoardConfig::default(),
    );
    let buckets = service
        .load_board(&BoardFilters::default(), NOW)
        .unwrap()
        .buckets;

    let outcome = service
        .move_item(
            &DropGesture {
                moved_item_id: "a".to_string(),
                source: TriageStatus::Backlog,
                destination: TriageStatus::InProgress,
                destination_index: 1,
            },
            &buckets,
            "dr-costa",
            NOW,
            None,
        )
        .unwrap();

    assert!(outcome.event.is_none());
    assert_eq!(outcome.plan.updates.len(), 3);

    let items = SqliteTriageItemRepository::try_new(&conn).unwrap();
    let moved = items.get_item("a").unwrap().expect("moved item");
    assert_eq!(moved.status, TriageStatus::InProgress);
    assert_eq!(moved.rank, Some(2));
    assert!(moved.tags().contains(&IN_PROGRESS_TAG.to_string()));
    assert_eq!(moved.updated_at, Some(NOW));
    assert_eq!(items.get_item("b").unwrap().unwrap().rank, Some(1));
    assert_eq!(items.get_item("x").unwrap().unwrap().rank, Some(1));
}
