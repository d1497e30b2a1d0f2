//! Controller scenarios against in-memory providers.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tablequery_lib::TableController;
use tablequery_lib::config::ControllerConfig;
use tablequery_lib::error::ApiError;
use tablequery_lib::error::Error;
use tablequery_lib::fetch::DispatchOutcome;
use tablequery_lib::fetch::Generation;
use tablequery_lib::model::RecordId;
use tablequery_lib::provider::ProviderResponse;
use tablequery_lib::query::Direction;
use tablequery_lib::query::MatchMode;
use tablequery_lib::query::Pagination;

use common::FnProvider;
use common::GatedProvider;
use common::students;

fn generation(n: u64) -> Generation {
    (0..n).fold(Generation::ZERO, |g, _| g.next())
}

#[tokio::test]
async fn test_initial_page_end_to_end() {
    let provider = FnProvider::new(|_| Ok(ProviderResponse::paged(students(1, 20), 47)));
    let controller = TableController::new(provider, ControllerConfig::default());

    let initial = controller.snapshot();
    assert_eq!(initial.pagination(), Pagination::new(0, 10));
    assert!(initial.sort().is_empty());
    assert_eq!(initial.active_filters().count(), 0);

    let outcome = controller.refresh().await.unwrap();
    assert!(outcome.is_applied());

    let view = controller.view();
    let visible: Vec<_> = view.visible_records().iter().map(|r| r.id.clone()).collect();
    let expected: Vec<_> = (1..=10).map(RecordId::Number).collect();
    assert_eq!(visible, expected);
    assert_eq!(view.total_records(), 47);
    assert_eq!(view.page_count(), 5);
    assert_eq!(view.page_number(), 1);
    assert!(!view.is_loading());

    let requests = controller.orchestrator().provider().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].page_number(), 1);
    assert_eq!(requests[0].page_size(), 10);
    assert_eq!(requests[0].order_by(), "");
    assert_eq!(requests[0].column_filters(), "");
}

#[tokio::test]
async fn test_stale_response_discarded() {
    let (provider, gates) = GatedProvider::new(2);
    let controller = TableController::new(provider, ControllerConfig::default());
    let mut gates = gates.into_iter();
    let first_gate = gates.next().unwrap();
    let second_gate = gates.next().unwrap();

    let release = async {
        second_gate
            .send(Ok(ProviderResponse::paged(students(200, 10), 300)))
            .unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        first_gate
            .send(Ok(ProviderResponse::paged(students(100, 10), 300)))
            .unwrap();
    };

    let (first, second, ()) = tokio::join!(
        controller.set_page(10, 10),
        controller.set_page(20, 10),
        release,
    );

    assert_eq!(
        first.unwrap(),
        DispatchOutcome::Stale {
            generation: generation(1),
            current: generation(2),
        }
    );
    assert!(second.unwrap().is_applied());

    let view = controller.view();
    assert_eq!(view.result_set.records(), students(200, 10).as_slice());
    assert_eq!(view.snapshot.pagination().offset(), 20);
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_loading_flags_during_column_filter() {
    let (provider, gates) = GatedProvider::new(1);
    let controller = TableController::new(provider, ControllerConfig::default());
    let gate = gates.into_iter().next().unwrap();

    let observe = async {
        let view = controller.view();
        assert!(view.is_loading());
        assert!(view.is_column_loading("name"));
        assert!(!view.is_column_loading("address"));
        gate.send(Ok(ProviderResponse::paged(students(1, 3), 3)))
            .unwrap();
    };

    let (outcome, ()) = tokio::join!(
        controller.set_column_filter("name", Some("Stu".to_string()), Some(MatchMode::StartsWith)),
        observe,
    );
    assert!(outcome.unwrap().is_applied());

    let view = controller.view();
    assert!(!view.is_loading());
    assert!(!view.is_column_loading("name"));
    assert_eq!(view.loading.busy_columns().count(), 0);
}

#[tokio::test]
async fn test_column_spinner_owned_by_latest_edit() {
    let (provider, gates) = GatedProvider::new(2);
    let controller = TableController::new(provider, ControllerConfig::default());
    let mut gates = gates.into_iter();
    let first_gate = gates.next().unwrap();
    let second_gate = gates.next().unwrap();

    let release = async {
        first_gate
            .send(Ok(ProviderResponse::paged(students(1, 5), 5)))
            .unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        let view = controller.view();
        assert!(view.is_column_loading("name"));
        assert!(view.is_loading());

        second_gate
            .send(Ok(ProviderResponse::paged(students(1, 2), 2)))
            .unwrap();
    };

    let (first, second, ()) = tokio::join!(
        controller.set_column_filter("name", Some("S".to_string()), Some(MatchMode::Contains)),
        controller.set_column_filter("name", Some("St".to_string()), Some(MatchMode::Contains)),
        release,
    );
    assert!(first.unwrap().is_stale());
    assert!(second.unwrap().is_applied());

    let view = controller.view();
    assert!(!view.is_column_loading("name"));
    assert_eq!(view.total_records(), 2);
}

#[tokio::test]
async fn test_failure_keeps_last_good_result() {
    let provider = FnProvider::new(|request| {
        if request.search_item().is_empty() {
            Ok(ProviderResponse::paged(students(1, 10), 30))
        } else {
            Err(ApiError::http(500, "Internal Server Error"))
        }
    });
    let controller = TableController::new(provider, ControllerConfig::default());
    controller.refresh().await.unwrap();

    let err = controller
        .set_column_filter("address", Some("Road".to_string()), Some(MatchMode::Contains))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Fetch(ApiError::Http { status: 500, .. })
    ));
    assert!(err.is_fetch_failure());

    let view = controller.view();
    assert_eq!(view.result_set.records(), students(1, 10).as_slice());
    assert_eq!(view.total_records(), 30);
    assert!(!view.is_loading());
    assert!(!view.is_column_loading("address"));
    assert_eq!(
        view.snapshot.filter("address").unwrap().value(),
        Some("Road")
    );

    controller
        .set_column_filter("address", None, Some(MatchMode::Contains))
        .await
        .unwrap();
    assert_eq!(controller.view().total_records(), 30);
}

#[tokio::test]
async fn test_stale_failure_is_ignored() {
    let (provider, gates) = GatedProvider::new(2);
    let controller = TableController::new(provider, ControllerConfig::default());
    let mut gates = gates.into_iter();
    let first_gate = gates.next().unwrap();
    let second_gate = gates.next().unwrap();

    let release = async {
        second_gate
            .send(Ok(ProviderResponse::paged(students(1, 4), 4)))
            .unwrap();
        tokio::task::yield_now().await;
        first_gate
            .send(Err(ApiError::http(503, "unavailable")))
            .unwrap();
    };

    let (first, second, ()) = tokio::join!(
        controller.set_sort("name", None),
        controller.set_sort("address", None),
        release,
    );
    assert!(first.unwrap().is_stale());
    assert!(second.unwrap().is_applied());
    assert_eq!(controller.view().total_records(), 4);
}

#[tokio::test]
async fn test_clamp_to_first_page_when_total_shrinks() {
    let provider = FnProvider::new(|request| {
        if request.page_number() == 1 {
            Ok(ProviderResponse::paged(students(1, 5), 5))
        } else {
            Ok(ProviderResponse::paged(Vec::new(), 5))
        }
    });
    let controller = TableController::new(provider, ControllerConfig::default());

    let outcome = controller.set_page(100, 10).await.unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Applied {
            generation: generation(2),
            corrective: None,
        }
    );

    let view = controller.view();
    assert_eq!(view.snapshot.pagination(), Pagination::new(0, 10));
    assert_eq!(view.visible_records().len(), 5);

    let pages: Vec<_> = controller
        .orchestrator()
        .provider()
        .requests()
        .iter()
        .map(|r| r.page_number())
        .collect();
    assert_eq!(pages, [11, 1]);
}

#[tokio::test]
async fn test_timeout_clears_loading() {
    let (provider, _gates) = GatedProvider::new(1);
    let config = ControllerConfig::default().with_request_timeout(Some(Duration::from_millis(50)));
    let controller = TableController::new(provider, config);

    let err = controller.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Fetch(ApiError::Timeout(_))));
    assert!(!controller.view().is_loading());
}

#[tokio::test]
async fn test_cancel_superseded_returns_early() {
    let (provider, gates) = GatedProvider::new(2);
    let config = ControllerConfig::default().with_cancel_superseded(true);
    let controller = TableController::new(provider, config);
    let mut gates = gates.into_iter();
    let _first_gate = gates.next().unwrap();
    let second_gate = gates.next().unwrap();

    let release = async {
        second_gate
            .send(Ok(ProviderResponse::paged(students(1, 1), 1)))
            .unwrap();
    };

    let (first, second, ()) = tokio::join!(
        controller.set_global_search("a"),
        controller.set_global_search("ab"),
        release,
    );
    assert!(first.unwrap().is_stale());
    assert!(second.unwrap().is_applied());
    assert!(!controller.view().is_loading());
}

#[tokio::test]
async fn test_invalid_intents_leave_state_untouched() {
    let provider = FnProvider::new(|_| Ok(ProviderResponse::paged(Vec::new(), 0)));
    let controller = TableController::new(provider, ControllerConfig::default());

    assert!(matches!(
        controller
            .set_column_filter("email", Some("x".to_string()), Some(MatchMode::Contains))
            .await,
        Err(Error::InvalidColumn { .. })
    ));
    assert!(matches!(
        controller.set_page(7, 10).await,
        Err(Error::InvalidPagination { .. })
    ));

    assert_eq!(controller.snapshot().pagination(), Pagination::new(0, 10));
    assert!(controller.orchestrator().provider().requests().is_empty());
    assert_eq!(controller.orchestrator().generation(), Generation::ZERO);
}

#[tokio::test]
async fn test_unpaginated_endpoint_pages_locally() {
    let provider = FnProvider::new(|_| Ok(ProviderResponse::unpaginated(students(1, 25))));
    let controller = TableController::new(provider, ControllerConfig::default());

    controller.set_page(20, 10).await.unwrap();

    let view = controller.view();
    assert_eq!(view.total_records(), 25);
    assert_eq!(view.page_count(), 3);
    assert_eq!(view.page_number(), 3);
    assert_eq!(view.visible_records(), &students(21, 5)[..]);
}

#[tokio::test]
async fn test_unpaginated_endpoint_filters_and_sorts_locally() {
    let provider = FnProvider::new(|_| Ok(ProviderResponse::unpaginated(students(1, 25))));
    let controller = TableController::new(provider, ControllerConfig::default());

    controller
        .set_column_filter("name", Some("Student 7".to_string()), Some(MatchMode::Equals))
        .await
        .unwrap();
    let view = controller.view();
    assert_eq!(view.total_records(), 1);
    assert_eq!(view.visible_records(), &students(7, 1)[..]);

    controller
        .set_column_filter("name", Some("student 1".to_string()), Some(MatchMode::StartsWith))
        .await
        .unwrap();
    controller.set_sort("name", Some(Direction::Desc)).await.unwrap();

    let view = controller.view();
    assert_eq!(view.total_records(), 11);
    assert_eq!(view.page_count(), 2);
    let names: Vec<_> = view
        .visible_records()
        .iter()
        .map(|r| r.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names[0], "Student 19");
    assert_eq!(names[9], "Student 10");

    controller.set_page(10, 10).await.unwrap();
    let view = controller.view();
    assert_eq!(view.visible_records(), &students(1, 1)[..]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_submits_keep_snapshot_and_result_in_step() {
    let provider = FnProvider::new(|request| {
        let id = request.page_number() as i64 * 100;
        Ok(ProviderResponse::paged(students(id, 1), 1_000))
    });
    let controller = Arc::new(TableController::new(provider, ControllerConfig::default()));

    for round in 0..200 {
        let tasks: Vec<_> = [10, 20]
            .into_iter()
            .map(|offset| {
                let controller = controller.clone();
                tokio::spawn(async move { controller.set_page(offset, 10).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let view = controller.view();
        let expected = RecordId::Number(view.page_number() as i64 * 100);
        assert_eq!(view.visible_records()[0].id, expected, "round {}", round);
        assert!(!view.is_loading());
    }
}
