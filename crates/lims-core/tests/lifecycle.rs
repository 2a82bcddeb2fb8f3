//! Entity lifecycle behavior against a mocked server: lazy loading, dirty
//! tracking, save/conflict semantics and collection operations.

use lims_core::{Entity, EntityExt, EntityHandle, LimsError, QueryParams};
use lims_state::register_cache_item;
use lims_test::{fixtures, start_lims_mock};
use wiremock::{matchers, Mock, ResponseTemplate};

#[derive(Clone, Debug)]
struct Specimen {
    handle: EntityHandle,
}

register_cache_item!(Specimen, "Specimen");

impl Entity for Specimen {
    const URI_SEGMENT: &'static str = "samples";
    const ROOT_PREFIX: &'static str = "smp";
    const ROOT_TAG: &'static str = "sample";

    fn from_handle(handle: EntityHandle) -> Self {
        Specimen { handle }
    }

    fn handle(&self) -> &EntityHandle {
        &self.handle
    }
}

fn sample_mock(base: &str, expected_gets: u64) -> Mock {
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/api/v1/samples/S1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(fixtures::sample_body(base, "S1", "Alpha", "P1")),
        )
        .expect(expected_gets)
}

#[tokio::test]
async fn construction_performs_no_network_call() {
    let (_server, lims) = start_lims_mock(vec![]).await;
    let specimen: Specimen = lims.resolve_by_id("S1");
    assert!(!specimen.is_loaded());
    assert!(!specimen.is_dirty());
    assert_eq!(specimen.id(), "S1");
    assert!(specimen.uri().ends_with("/api/v1/samples/S1"));
}

#[tokio::test]
async fn first_read_loads_exactly_once() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server.register(sample_mock(&server.uri(), 1)).await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    assert_eq!(
        specimen.handle().text("name").await.unwrap().as_deref(),
        Some("Alpha")
    );
    // The second read projects from the held tree; the mock's expect(1)
    // fails the test if another GET goes out.
    assert_eq!(
        specimen
            .handle()
            .date("date-received")
            .await
            .unwrap()
            .unwrap()
            .to_string(),
        "2012-05-01"
    );
    assert!(specimen.is_loaded());
}

#[tokio::test]
async fn requests_carry_basic_auth() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api/v1/samples/S1"))
                .and(matchers::header(
                    "authorization",
                    "Basic YXBpdXNlcjpzZWNyZXQ=",
                ))
                .and(matchers::header("accept", "application/xml"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    fixtures::sample_body(&server.uri(), "S1", "Alpha", "P1"),
                ))
                .expect(1),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    specimen.load().await.unwrap();
}

#[tokio::test]
async fn writes_mark_dirty_and_save_clears() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server.register(sample_mock(&server.uri(), 1)).await;
    server
        .register(
            Mock::given(matchers::method("PUT"))
                .and(matchers::path("/api/v1/samples/S1"))
                .and(matchers::body_string_contains("Beta"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    fixtures::sample_body(&server.uri(), "S1", "Beta", "P1"),
                ))
                .expect(1),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    specimen.load().await.unwrap();
    assert!(!specimen.is_dirty());

    specimen.handle().set_text("name", "Beta").await.unwrap();
    assert!(specimen.is_dirty());
    // The write round-trips locally without any network call.
    assert_eq!(
        specimen.handle().text("name").await.unwrap().as_deref(),
        Some("Beta")
    );

    specimen.save().await.unwrap();
    assert!(!specimen.is_dirty());
}

#[tokio::test]
async fn first_write_loads_the_record_before_editing() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server.register(sample_mock(&server.uri(), 1)).await;
    server
        .register(
            Mock::given(matchers::method("PUT"))
                .and(matchers::path("/api/v1/samples/S1"))
                .and(matchers::body_string_contains("Beta"))
                // The saved document still carries the fields the server
                // sent; the edit never starts from an empty tree.
                .and(matchers::body_string_contains("date-received"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    fixtures::sample_body(&server.uri(), "S1", "Beta", "P1"),
                ))
                .expect(1),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    assert!(!specimen.is_loaded());

    // The write on the unloaded record issues the one lazy GET itself.
    specimen.handle().set_text("name", "Beta").await.unwrap();
    assert!(specimen.is_loaded());
    assert!(specimen.is_dirty());
    assert_eq!(
        specimen
            .handle()
            .date("date-received")
            .await
            .unwrap()
            .unwrap()
            .to_string(),
        "2012-05-01"
    );

    specimen.save().await.unwrap();
}

#[tokio::test]
async fn failed_write_on_an_unloaded_record_does_not_fabricate_a_document() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api/v1/samples/S404"))
                .respond_with(ResponseTemplate::new(404).set_body_string(
                    fixtures::exception_body("Sample not found.", None),
                )),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S404");
    let error = specimen.handle().set_text("name", "Beta").await.unwrap_err();
    assert!(matches!(error, LimsError::NotFound(_)));
    assert!(!specimen.is_loaded());
    assert!(!specimen.is_dirty());
}

#[tokio::test]
async fn save_without_edits_is_a_no_op() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server.register(sample_mock(&server.uri(), 1)).await;
    server
        .register(
            Mock::given(matchers::method("PUT"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<ok/>"))
                .expect(0),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    specimen.load().await.unwrap();
    specimen.save().await.unwrap();
}

#[tokio::test]
async fn conflicted_save_leaves_local_state_dirty_and_unchanged() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server.register(sample_mock(&server.uri(), 1)).await;
    server
        .register(
            Mock::given(matchers::method("PUT"))
                .and(matchers::path("/api/v1/samples/S1"))
                .respond_with(ResponseTemplate::new(409).set_body_string(
                    fixtures::exception_body(
                        "Sample was modified by another user.",
                        Some("Reload and retry."),
                    ),
                ))
                .expect(1),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    specimen.load().await.unwrap();
    specimen.handle().set_text("name", "Beta").await.unwrap();

    let error = specimen.save().await.unwrap_err();
    match error {
        LimsError::Conflict(conflict) => {
            assert!(conflict.message.contains("modified by another user"));
            assert!(conflict.message.contains("Reload and retry."));
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
    assert!(specimen.is_dirty());
    assert_eq!(
        specimen.handle().text("name").await.unwrap().as_deref(),
        Some("Beta")
    );
}

#[tokio::test]
async fn missing_records_surface_not_found() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api/v1/samples/S404"))
                .respond_with(ResponseTemplate::new(404).set_body_string(
                    fixtures::exception_body("Sample not found.", None),
                )),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S404");
    let error = specimen.load().await.unwrap_err();
    assert!(matches!(error, LimsError::NotFound(_)));
    assert!(!specimen.is_loaded());
}

#[tokio::test]
async fn reload_discards_unsaved_edits() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server.register(sample_mock(&server.uri(), 2)).await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    specimen.load().await.unwrap();
    specimen.handle().set_text("name", "Beta").await.unwrap();
    assert!(specimen.is_dirty());

    specimen.reload().await.unwrap();
    assert!(!specimen.is_dirty());
    assert_eq!(
        specimen.handle().text("name").await.unwrap().as_deref(),
        Some("Alpha")
    );
}

#[tokio::test]
async fn identity_holds_for_repeated_resolution() {
    let (_server, lims) = start_lims_mock(vec![]).await;
    let first: Specimen = lims.resolve_by_id("S1");
    let second: Specimen = lims.resolve_by_id("S1");
    assert!(first.same_instance(&second));

    lims.forget::<Specimen>(first.uri());
    let third: Specimen = lims.resolve_by_id("S1");
    assert!(!first.same_instance(&third));
}

#[tokio::test]
async fn list_follows_result_pages() {
    let (server, lims) = start_lims_mock(vec![]).await;
    let base = server.uri();
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api/v1/samples"))
                .and(matchers::query_param("name", "Alpha"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    fixtures::samples_page(&base, &["S1", "S2"], Some(500)),
                )),
        )
        .await;
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api/v1/samples"))
                .and(matchers::query_param("start-index", "500"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    fixtures::samples_page(&base, &["S3"], None),
                )),
        )
        .await;

    let mut query = QueryParams::new();
    query.push("name", "Alpha");
    let specimens: Vec<Specimen> = lims.list(&query).await.unwrap();
    let ids: Vec<&str> = specimens.iter().map(|s| s.id()).collect();
    assert_eq!(ids, ["S1", "S2", "S3"]);
    // None of the listed entities were loaded by the query itself.
    assert!(specimens.iter().all(|s| !s.is_loaded()));
}

#[tokio::test]
async fn list_with_start_index_stays_on_one_page() {
    let (server, lims) = start_lims_mock(vec![]).await;
    let base = server.uri();
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api/v1/samples"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    // The page advertises a follow-up that must not be taken.
                    fixtures::samples_page(&base, &["S1"], Some(500)),
                ))
                .expect(1),
        )
        .await;

    let mut query = QueryParams::new();
    query.push_start_index(0);
    let specimens: Vec<Specimen> = lims.list(&query).await.unwrap();
    assert_eq!(specimens.len(), 1);
}

#[tokio::test]
async fn batch_retrieval_installs_trees_on_cached_instances() {
    let (server, lims) = start_lims_mock(vec![]).await;
    let base = server.uri();
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<smp:details xmlns:smp="http://genologics.com/ri/sample">
{}
{}
</smp:details>"#,
        fixtures::sample_body(&base, "S1", "Alpha", "P1").replace(r#"<?xml version="1.0" encoding="UTF-8"?>"#, ""),
        fixtures::sample_body(&base, "S2", "Gamma", "P1").replace(r#"<?xml version="1.0" encoding="UTF-8"?>"#, ""),
    );
    server
        .register(
            Mock::given(matchers::method("POST"))
                .and(matchers::path("/api/v1/samples/batch/retrieve"))
                .and(matchers::body_string_contains("link"))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .expect(1),
        )
        .await;

    let first: Specimen = lims.resolve_by_id("S1");
    let second: Specimen = lims.resolve_by_id("S2");
    lims.load_batch(&[first.clone(), second.clone()]).await.unwrap();

    assert!(first.is_loaded() && second.is_loaded());
    // Reads after the batch need no further GETs; no GET mock is registered.
    assert_eq!(
        second.handle().text("name").await.unwrap().as_deref(),
        Some("Gamma")
    );
}

#[tokio::test]
async fn check_version_accepts_v1_and_rejects_others() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    fixtures::versions_body(&server.uri(), &["v1", "v2"]),
                )),
        )
        .await;
    lims.check_version().await.unwrap();

    let (server, lims) = start_lims_mock(vec![]).await;
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    fixtures::versions_body(&server.uri(), &["v2"]),
                )),
        )
        .await;
    assert!(matches!(
        lims.check_version().await,
        Err(LimsError::Validation(_))
    ));
}

#[tokio::test]
async fn server_errors_keep_their_message() {
    let (server, lims) = start_lims_mock(vec![]).await;
    server
        .register(
            Mock::given(matchers::method("GET"))
                .and(matchers::path("/api/v1/samples/S1"))
                .respond_with(ResponseTemplate::new(500).set_body_string(
                    fixtures::exception_body("Internal failure.", None),
                )),
        )
        .await;

    let specimen: Specimen = lims.resolve_by_id("S1");
    match specimen.load().await.unwrap_err() {
        LimsError::Transport(transport) => {
            assert!(transport.to_string().contains("Internal failure."));
        }
        other => panic!("expected a transport error, got {other:?}"),
    }
}
