use std::sync::Arc;
use std::time::Duration;

use crex::core::action::Action;
use crex::core::config::CREX_VERSION;
use crex::core::dialog::{DialogButton, DialogKind};
use crex::core::engine::{EngineSettings, NavigationEngine, NavigationOutcome};
use crex::core::screen::ScreenInput;
use crex::fetch::{ContentFetcher, FetchError, HttpFetcher};
use crex::runtime::Runtime;
use crex::templates::{TemplateOptions, default_registry};
use serde_json::{Value, json};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_test::{assert_err, assert_ok};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Engine + runtime wired together the way the TUI loop wires them.
struct Harness {
    engine: NavigationEngine,
    runtime: Runtime,
    rx: UnboundedReceiver<Action>,
}

impl Harness {
    fn new(server: &MockServer) -> Self {
        let root_url = format!("{}/root.json", server.uri());
        let settings = EngineSettings {
            client_version: CREX_VERSION,
            root_url: root_url.clone(),
            root_template: "Menu".to_string(),
            spinner_delay: Duration::from_millis(20),
            animation_time: Duration::from_millis(10),
            content_cache_time: Duration::from_secs(600),
        };
        let registry = default_registry(TemplateOptions {
            client_version: CREX_VERSION,
            resolution_height: 1080,
        });
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let runtime = Runtime::new(
            Arc::new(HttpFetcher::new(Some(Duration::from_secs(5)))),
            Url::parse(&root_url).ok(),
            tx,
        );
        Self {
            engine: NavigationEngine::new(registry, settings),
            runtime,
            rx,
        }
    }

    /// Feeds one action in and executes what comes out. True on exit.
    fn dispatch(&mut self, action: Action) -> bool {
        let effects = self.engine.update(action);
        self.runtime.execute(effects)
    }

    /// Pumps runtime results into the engine until `done` holds.
    async fn settle(&mut self, done: impl Fn(&NavigationEngine) -> bool) {
        while !done(&self.engine) {
            let action = tokio::time::timeout(Duration::from_secs(3), self.rx.recv())
                .await
                .expect("engine did not settle in time")
                .expect("action channel closed");
            self.dispatch(action);
        }
    }

    /// Settles until nothing is in flight and no transition is running.
    async fn settle_idle(&mut self) {
        self.settle(|e| !e.is_busy() && !e.stack().is_transitioning())
            .await;
    }

    fn top_template(&self) -> Option<String> {
        self.engine.stack().top().map(|d| d.template().to_string())
    }
}

fn root_menu() -> Value {
    json!({
        "backgroundImage": { "HD": "http://img.test/bg-720.jpg", "FHD": "http://img.test/bg-1080.jpg" },
        "buttons": [
            { "title": "Movies", "actionUrl": "/movies.json" },
            { "title": "Slow", "actionUrl": "/slow.json" }
        ]
    })
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// HttpFetcher Tests
// ============================================================================

#[tokio::test]
async fn test_http_fetcher_returns_json() {
    let server = MockServer::start().await;
    mount_json(&server, "/root.json", json!({ "template": "Menu", "data": {} })).await;

    let fetcher = HttpFetcher::default();
    let value = assert_ok!(
        fetcher
            .fetch_json(&format!("{}/root.json", server.uri()))
            .await
    );
    assert_eq!(value["template"], "Menu");
}

#[tokio::test]
async fn test_http_fetcher_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::default();
    let url = format!("{}/broken.json", server.uri());
    let err = assert_err!(fetcher.fetch_json(&url).await);
    match err {
        FetchError::Status { status, url: failed } => {
            assert_eq!(status, 500);
            assert_eq!(failed, url);
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_fetcher_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/garbage.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::default();
    let err = assert_err!(
        fetcher
            .fetch_json(&format!("{}/garbage.json", server.uri()))
            .await
    );
    assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_http_fetcher_decodes_regardless_of_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plain.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{ "template": "Video", "data": "http://cdn/x.m3u8" }"#, "text/plain"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty.json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::default();
    let value = assert_ok!(
        fetcher
            .fetch_json(&format!("{}/plain.json", server.uri()))
            .await
    );
    assert_eq!(value["data"], "http://cdn/x.m3u8");

    let err = assert_err!(
        fetcher
            .fetch_json(&format!("{}/empty.json", server.uri()))
            .await
    );
    assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_http_fetcher_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Some(Duration::from_millis(50)));
    let err = assert_err!(
        fetcher
            .fetch_json(&format!("{}/slow.json", server.uri()))
            .await
    );
    assert!(matches!(err, FetchError::Timeout), "got {:?}", err);
}

// ============================================================================
// Engine + Runtime Tests
// ============================================================================

#[tokio::test]
async fn test_menu_to_poster_list_and_back() {
    let server = MockServer::start().await;
    mount_json(&server, "/root.json", root_menu()).await;
    mount_json(
        &server,
        "/movies.json",
        json!({ "template": "PosterList", "data": "/movies/list.json" }),
    )
    .await;
    mount_json(
        &server,
        "/movies/list.json",
        json!({
            "title": "Movies",
            "items": [
                { "title": "Pilot", "actionUrl": "/pilot.json" },
                { "title": "Finale" }
            ]
        }),
    )
    .await;

    let mut harness = Harness::new(&server);
    assert!(!harness.dispatch(Action::Start));
    harness.settle_idle().await;

    assert_eq!(harness.engine.stack().len(), 1);
    assert_eq!(harness.top_template().as_deref(), Some("Menu"));
    let view = harness.engine.stack().top().map(|d| d.screen().view());
    let view = view.expect("root screen");
    assert_eq!(view.items, vec!["Movies", "Slow"]);
    assert_eq!(view.background.as_deref(), Some("http://img.test/bg-1080.jpg"));

    // Relative actionUrl resolves against the root URL
    harness.dispatch(Action::Input(ScreenInput::Select));
    assert!(harness.engine.is_busy());
    harness.settle_idle().await;

    assert_eq!(harness.engine.stack().len(), 2);
    assert_eq!(harness.top_template().as_deref(), Some("PosterList"));
    assert!(matches!(
        harness.engine.last_outcome(),
        Some(NavigationOutcome::Done { template }) if template == "PosterList"
    ));

    assert!(!harness.dispatch(Action::Back));
    harness.settle_idle().await;
    assert_eq!(harness.engine.stack().len(), 1);
    assert_eq!(harness.top_template().as_deref(), Some("Menu"));

    // Back on the root exits
    assert!(harness.dispatch(Action::Back));
    harness.runtime.shutdown();
}

#[tokio::test]
async fn test_server_error_then_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/root.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/root.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(root_menu()))
        .expect(1)
        .mount(&server)
        .await;

    let mut harness = Harness::new(&server);
    harness.dispatch(Action::Start);
    harness.settle(|e| e.dialog().is_some()).await;

    let dialog = harness.engine.dialog().expect("data error dialog");
    assert_eq!(dialog.kind, DialogKind::DataError);
    assert!(dialog.has_button(DialogButton::Retry));
    assert!(harness.engine.stack().is_empty());
    assert!(matches!(
        harness.engine.last_outcome(),
        Some(NavigationOutcome::Failed(_))
    ));

    assert!(!harness.dispatch(Action::DialogResponse(DialogButton::Retry)));
    assert!(harness.engine.dialog().is_none());
    harness.settle_idle().await;

    assert_eq!(harness.engine.stack().len(), 1);
    assert_eq!(harness.top_template().as_deref(), Some("Menu"));
    harness.runtime.shutdown();
}

#[tokio::test]
async fn test_cancel_on_root_failure_exits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/root.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut harness = Harness::new(&server);
    harness.dispatch(Action::Start);
    harness.settle(|e| e.dialog().is_some()).await;

    assert!(harness.dispatch(Action::DialogResponse(DialogButton::Cancel)));
    harness.runtime.shutdown();
}

#[tokio::test]
async fn test_back_during_slow_fetch_cancels() {
    let server = MockServer::start().await;
    mount_json(&server, "/root.json", root_menu()).await;
    Mock::given(method("GET"))
        .and(path("/slow.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "template": "PosterList", "data": {} }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut harness = Harness::new(&server);
    harness.dispatch(Action::Start);
    harness.settle_idle().await;

    harness.dispatch(Action::Input(ScreenInput::Right));
    harness.dispatch(Action::Input(ScreenInput::Select));
    assert!(harness.engine.is_busy());

    // Let the spinner come up, then press Back
    tokio::time::sleep(Duration::from_millis(50)).await;
    while let Ok(action) = harness.rx.try_recv() {
        harness.dispatch(action);
    }
    assert!(!harness.dispatch(Action::Back));

    assert!(!harness.engine.is_busy());
    assert!(matches!(
        harness.engine.last_outcome(),
        Some(NavigationOutcome::Cancelled)
    ));
    assert_eq!(harness.engine.stack().len(), 1);
    assert!(harness.engine.dialog().is_none());

    // Nothing late may sneak a screen in
    tokio::time::sleep(Duration::from_millis(100)).await;
    while let Ok(action) = harness.rx.try_recv() {
        harness.dispatch(action);
    }
    assert_eq!(harness.engine.stack().len(), 1);
    assert_eq!(harness.top_template().as_deref(), Some("Menu"));
    harness.runtime.shutdown();
}
