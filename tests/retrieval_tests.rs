//! Log Retrieval Integration Tests
//!
//! Drives `LogRetrieval` against a scripted `LogsApi` to check the queries end to end:
//! pagination across log groups, streams read to their repeated cursor, searches with
//! patterns and time ranges, validation before any remote call, and error propagation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{cursor, events, names, Call, FakeLogs};
use cwlr::app::data_plane::cloudwatch_logs::{
    LogRetrieval, LogStreamRef, Paginator, RetrievalError, RetryPolicy, TimeRange,
};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

fn retrieval(fake: FakeLogs) -> (Arc<FakeLogs>, LogRetrieval<FakeLogs>) {
    let api = Arc::new(fake);
    (Arc::clone(&api), LogRetrieval::new(api))
}

// ============================================================================
// Log groups
// ============================================================================

#[tokio::test]
async fn test_grouped_resources_span_every_page() {
    let (api, retrieval) = retrieval(FakeLogs::new().with_group_pages(&[
        &["/aws/lambda/foo", "/ecs/cluster1"],
        &["/aws/lambda/bar"],
        &["standalone"],
    ]));

    let resources = retrieval.list_grouped_resources().await.unwrap();

    assert_eq!(resources.services(), vec!["/aws/lambda/", "/ecs/", ""]);
    assert_eq!(resources.resources("/aws/lambda/"), ["foo", "bar"]);
    assert_eq!(resources.resources("/ecs/"), ["cluster1"]);
    assert_eq!(resources.resources(""), ["standalone"]);
    assert_eq!(
        api.calls(),
        vec![
            Call::ListGroups(None),
            Call::ListGroups(cursor("g1")),
            Call::ListGroups(cursor("g2")),
        ]
    );
}

#[tokio::test]
async fn test_flat_log_groups_keep_page_order() {
    let (_, retrieval) = retrieval(FakeLogs::new().with_group_pages(&[&["/b", "/a"], &["/c"]]));

    let log_groups = retrieval.list_log_groups().await.unwrap();

    assert_eq!(log_groups, names(&["/b", "/a", "/c"]));
}

#[tokio::test]
async fn test_empty_account_still_makes_one_request() {
    let (api, retrieval) = retrieval(FakeLogs::new().with_group_pages(&[&[]]));

    let resources = retrieval.list_grouped_resources().await.unwrap();

    assert!(resources.is_empty());
    assert!(resources.services().is_empty());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_group_listing_error_propagates_unchanged() {
    let (api, retrieval) = retrieval(
        FakeLogs::new()
            .with_group_pages(&[&["/a/1"], &["/a/2"], &["/a/3"], &["/a/4"], &["/a/5"]])
            .failing_at(cursor("g2"), "AccessDeniedException: not authorized"),
    );

    let err = retrieval.list_grouped_resources().await.unwrap_err();

    assert!(matches!(err, RetrievalError::Remote(_)));
    assert_eq!(err.to_string(), "AccessDeniedException: not authorized");
    assert_eq!(api.calls().len(), 3);
}

// ============================================================================
// Streams
// ============================================================================

#[tokio::test]
async fn test_list_streams_passes_through_remote_order() {
    let streams = vec![
        LogStreamRef::new("newest", Some(3000)),
        LogStreamRef::new("older", Some(1000)),
        LogStreamRef::new("never-written", None),
    ];
    let (api, retrieval) =
        retrieval(FakeLogs::new().with_streams("/aws/lambda/foo", streams.clone()));

    let listed = retrieval.list_streams("/aws/lambda/foo").await.unwrap();

    assert_eq!(listed, streams);
    assert_eq!(
        api.calls(),
        vec![Call::ListStreams("/aws/lambda/foo".to_string())]
    );
}

#[tokio::test]
async fn test_list_streams_requires_log_group() {
    let (api, retrieval) = retrieval(FakeLogs::new());

    let err = retrieval.list_streams("  ").await.unwrap_err();

    assert!(err.is_validation());
    assert!(api.calls().is_empty());
}

// ============================================================================
// Reading a stream
// ============================================================================

#[tokio::test]
async fn test_fetch_events_reads_until_cursor_repeats() {
    let (api, retrieval) = retrieval(FakeLogs::new().with_event_pages(vec![
        events(&[(1, "start"), (2, "working")]),
        events(&[(3, "done")]),
    ]));

    let fetched = retrieval.fetch_events("/aws/lambda/foo", "s1").await.unwrap();

    assert_eq!(fetched, events(&[(1, "start"), (2, "working"), (3, "done")]));

    let sent: Vec<_> = api
        .calls()
        .into_iter()
        .map(|call| match call {
            Call::ListEvents(_, _, sent) => sent,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(sent, vec![None, cursor("f1"), cursor("f2")]);
}

#[tokio::test]
async fn test_fetch_events_of_empty_stream() {
    let (api, retrieval) = retrieval(FakeLogs::new().with_event_pages(vec![]));

    let fetched = retrieval.fetch_events("/ecs/web", "idle").await.unwrap();

    // First call returns "f0" which then repeats
    assert!(fetched.is_empty());
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn test_fetch_events_requires_names() {
    let (api, retrieval) = retrieval(FakeLogs::new());

    let err = retrieval.fetch_events("", "s1").await.unwrap_err();
    assert_eq!(err.to_string(), "log group name must not be empty");

    let err = retrieval.fetch_events("/ecs/web", "").await.unwrap_err();
    assert_eq!(err.to_string(), "log stream name must not be empty");

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_fetch_events_partial_keeps_earlier_pages() {
    let (_, retrieval) = retrieval(
        FakeLogs::new()
            .with_event_pages(vec![events(&[(1, "a")]), events(&[(2, "b")])])
            .failing_at(cursor("f1"), "ThrottlingException"),
    );

    let partial = retrieval
        .fetch_events_partial("/ecs/web", "s1")
        .await
        .unwrap();

    assert_eq!(partial.items, events(&[(1, "a")]));
    assert_eq!(partial.error.unwrap().to_string(), "ThrottlingException");

    let err = retrieval.fetch_events("/ecs/web", "s1").await.unwrap_err();
    assert_eq!(err.to_string(), "ThrottlingException");
}

// ============================================================================
// Searching
// ============================================================================

#[tokio::test]
async fn test_search_drains_null_terminated_pages() {
    let (api, retrieval) = retrieval(FakeLogs::new().with_filter_pages(vec![
        events(&[(10, "ERROR one")]),
        events(&[]),
        events(&[(30, "ERROR two")]),
    ]));
    let range = TimeRange::new(Some(0), Some(100)).unwrap();

    let found = retrieval
        .search_events("/aws/lambda/foo", "ERROR", range)
        .await
        .unwrap();

    assert_eq!(found, events(&[(10, "ERROR one"), (30, "ERROR two")]));
    assert_eq!(
        api.calls(),
        vec![
            Call::FilterEvents(
                "/aws/lambda/foo".to_string(),
                Some("ERROR".to_string()),
                range,
                None
            ),
            Call::FilterEvents(
                "/aws/lambda/foo".to_string(),
                Some("ERROR".to_string()),
                range,
                cursor("s1")
            ),
            Call::FilterEvents(
                "/aws/lambda/foo".to_string(),
                Some("ERROR".to_string()),
                range,
                cursor("s2")
            ),
        ]
    );
}

#[tokio::test]
async fn test_search_partial_keeps_first_page_on_failure() {
    let (api, retrieval) = retrieval(
        FakeLogs::new()
            .with_filter_pages(vec![
                events(&[(10, "ERROR one")]),
                events(&[(20, "ERROR two")]),
                events(&[(30, "ERROR three")]),
            ])
            .failing_at(cursor("s1"), "ServiceUnavailableException"),
    );

    let partial = retrieval
        .search_events_partial("/ecs/web", "ERROR", TimeRange::unbounded())
        .await
        .unwrap();

    assert!(!partial.is_complete());
    assert_eq!(partial.pages, 1);
    assert_eq!(partial.items, events(&[(10, "ERROR one")]));
    assert_eq!(
        partial.error.unwrap().to_string(),
        "ServiceUnavailableException"
    );
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn test_search_stops_at_page_limit() {
    let api = Arc::new(FakeLogs::new().with_filter_pages(vec![
        events(&[(10, "a")]),
        events(&[(20, "b")]),
        events(&[(30, "c")]),
    ]));
    let retrieval = LogRetrieval::with_paginator(
        Arc::clone(&api),
        Paginator::new().with_max_pages(Some(2)),
    );

    let partial = retrieval
        .search_events_partial("/ecs/web", "", TimeRange::unbounded())
        .await
        .unwrap();

    assert_eq!(partial.items, events(&[(10, "a"), (20, "b")]));
    assert!(matches!(partial.error, Some(RetrievalError::PageLimit(2))));
    assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn test_empty_pattern_matches_everything() {
    let (api, retrieval) =
        retrieval(FakeLogs::new().with_filter_pages(vec![events(&[(1, "anything")])]));

    retrieval
        .search_events("/ecs/web", "   ", TimeRange::unbounded())
        .await
        .unwrap();

    assert!(matches!(
        api.calls().as_slice(),
        [Call::FilterEvents(_, None, _, None)]
    ));
}

#[tokio::test]
async fn test_search_rejects_inverted_range_before_any_request() {
    let (api, retrieval) = retrieval(FakeLogs::new().with_filter_pages(vec![events(&[])]));
    let inverted = TimeRange {
        start: Some(2000),
        end: Some(1000),
    };

    let err = retrieval
        .search_events("/ecs/web", "ERROR", inverted)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RetrievalError::InvalidRange {
            start: 2000,
            end: 1000
        }
    ));
    assert!(api.calls().is_empty());
}

// ============================================================================
// Hardening
// ============================================================================

#[tokio::test]
async fn test_cancelled_token_stops_before_first_request() {
    let token = CancellationToken::new();
    token.cancel();

    let api = Arc::new(FakeLogs::new().with_group_pages(&[&["/a/1"]]));
    let retrieval = LogRetrieval::with_paginator(
        Arc::clone(&api),
        Paginator::new().with_cancellation(token),
    );

    let err = retrieval.list_log_groups().await.unwrap_err();

    assert!(matches!(err, RetrievalError::Cancelled { pages: 0 }));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_retry_recovers_with_same_cursor() {
    let api = Arc::new(
        FakeLogs::new()
            .with_filter_pages(vec![events(&[(1, "a")]), events(&[(2, "b")])])
            .failing_once_at(cursor("s1"), "ThrottlingException"),
    );
    let retrieval = LogRetrieval::with_paginator(
        Arc::clone(&api),
        Paginator::new().with_retry(RetryPolicy::new(2, Duration::from_millis(1))),
    );

    let found = retrieval
        .search_events("/ecs/web", "", TimeRange::unbounded())
        .await
        .unwrap();

    assert_eq!(found, events(&[(1, "a"), (2, "b")]));

    let sent: Vec<_> = api
        .calls()
        .into_iter()
        .map(|call| match call {
            Call::FilterEvents(_, _, _, sent) => sent,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(sent, vec![None, cursor("s1"), cursor("s1")]);
}

#[tokio::test]
async fn test_without_retry_transient_error_surfaces() {
    let (_, retrieval) = retrieval(
        FakeLogs::new()
            .with_filter_pages(vec![events(&[(1, "a")]), events(&[(2, "b")])])
            .failing_once_at(cursor("s1"), "ThrottlingException"),
    );

    let err = retrieval
        .search_events("/ecs/web", "", TimeRange::unbounded())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "ThrottlingException");
}
