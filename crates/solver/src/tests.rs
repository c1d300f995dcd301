use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use protocol::{ErrorCode, TaskStatus, TransportError};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::Instant;

use super::*;

// ---------------------------------------------------------------------------
// Scripted transport
// ---------------------------------------------------------------------------

/// A recorded outbound request.
#[derive(Debug, Clone)]
struct Call {
    url: String,
    body: Value,
    at: Instant,
}

/// Replays canned responses in order; once the script is exhausted every
/// further call receives `repeat` (or fails if none was configured).
#[derive(Default)]
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    repeat: Option<Vec<u8>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn respond(self, body: Value) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(body.to_string().into_bytes()));
        self
    }

    fn respond_raw(self, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(body.as_bytes().to_vec()));
        self
    }

    fn fail(self, err: TransportError) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    fn then_repeat(mut self, body: Value) -> Self {
        self.repeat = Some(body.to_string().into_bytes());
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn poll_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.url.ends_with("/getTaskResult"))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_owned(),
            body: serde_json::from_slice(&body).unwrap(),
            at: Instant::now(),
        });
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => self
                .repeat
                .clone()
                .ok_or_else(|| TransportError::network("script exhausted")),
        }
    }
}

fn solver(transport: &Arc<ScriptedTransport>, config: SolverConfig) -> Solver {
    Solver::new(
        transport.clone(),
        ClientKey::new("CAP-TEST").unwrap(),
        config.with_base_url("http://capsolver.test"),
    )
}

fn fast_config() -> SolverConfig {
    SolverConfig::default().with_poll_interval(Duration::ZERO)
}

fn task() -> Value {
    json!({"websiteURL": "https://example.com", "websiteKey": "site-key"})
}

#[test]
fn test_config_is_kept_as_given() {
    let transport = Arc::new(ScriptedTransport::new());
    let solver = solver(&transport, fast_config().with_max_polls(7));

    assert_eq!(solver.config().max_polls, 7);
    assert_eq!(solver.config().poll_interval, Duration::ZERO);
    assert_eq!(solver.config().base_url, "http://capsolver.test");
}

// ---------------------------------------------------------------------------
// drive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_drive_returns_immediately_when_ready_on_submission() {
    let transport = Arc::new(ScriptedTransport::new().respond(json!({
        "status": "ready",
        "solution": {"token": "abc"},
        "taskId": "t1",
        "errorId": 0
    })));

    let result = solver(&transport, SolverConfig::default())
        .drive("AntiTurnstileTaskProxyLess", &task())
        .await
        .unwrap();

    assert!(result.is_ready());
    assert_eq!(result.solution.as_value(), &json!({"token": "abc"}));
    assert_eq!(transport.calls().len(), 1);
    assert!(transport.poll_calls().is_empty());
}

#[tokio::test]
async fn test_drive_polls_until_ready() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(json!({"status": "processing", "taskId": "t2", "errorId": 0}))
            .respond(json!({"status": "processing", "taskId": "t2", "errorId": 0}))
            .respond(json!({
                "status": "ready",
                "solution": {"gRecaptchaResponse": "resp"},
                "taskId": "t2",
                "errorId": 0
            })),
    );

    let result = solver(&transport, fast_config())
        .drive("ReCaptchaV2TaskProxyLess", &task())
        .await
        .unwrap();

    assert!(result.is_ready());
    assert_eq!(
        result.solution.as_value(),
        &json!({"gRecaptchaResponse": "resp"})
    );

    let polls = transport.poll_calls();
    assert_eq!(polls.len(), 2);
    for call in &polls {
        assert_eq!(call.url, "http://capsolver.test/getTaskResult");
        assert_eq!(call.body["taskId"], "t2");
        assert!(call.body.get("task").is_none());
    }
}

#[tokio::test]
async fn test_drive_fails_on_creation_error_without_polling() {
    let transport = Arc::new(ScriptedTransport::new().respond(json!({
        "errorId": 1,
        "errorCode": "ERROR_ZERO_BALANCE",
        "errorDescription": "Insufficient account balance"
    })));

    let err = solver(&transport, fast_config())
        .drive("ImageToTextTask", &task())
        .await
        .unwrap_err();

    let service = err.service_error().expect("service error");
    assert_eq!(service.code, Some(ErrorCode::ZeroBalance));
    assert_eq!(service.description, "Insufficient account balance");
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_drive_fails_on_poll_error_even_if_status_is_ready() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(json!({"status": "idle", "taskId": "t4", "errorId": 0}))
            .respond(json!({
                "status": "ready",
                "taskId": "t4",
                "errorId": 1,
                "errorCode": "ERROR_CAPTCHA_UNSOLVABLE",
                "errorDescription": "unsolvable"
            }))
            .respond(json!({"status": "ready", "taskId": "t4", "errorId": 0})),
    );

    let err = solver(&transport, fast_config())
        .drive("GeeTestTaskProxyLess", &task())
        .await
        .unwrap_err();

    assert_eq!(
        err.service_error().and_then(|e| e.code.clone()),
        Some(ErrorCode::CaptchaUnsolvable)
    );
    assert_eq!(transport.poll_calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_drive_returns_last_result_when_poll_budget_is_spent() {
    let idle = json!({"status": "idle", "taskId": "t3", "errorId": 0});
    let transport = Arc::new(ScriptedTransport::new().respond(idle.clone()).then_repeat(idle));

    let started = Instant::now();
    let result = solver(&transport, SolverConfig::default())
        .drive("MtCaptchaTaskProxyLess", &task())
        .await
        .unwrap();

    assert_eq!(result.status, TaskStatus::Idle);
    assert!(!result.is_ready());
    assert_eq!(result.task_id.as_ref().map(TaskId::as_str), Some("t3"));

    let polls = transport.poll_calls();
    assert_eq!(polls.len(), 120);
    assert!(polls.iter().all(|c| c.body["taskId"] == "t3"));
    assert!(started.elapsed() >= Duration::from_secs(360));
}

#[tokio::test(start_paused = true)]
async fn test_drive_waits_before_every_poll() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(json!({"status": "idle", "taskId": "t5", "errorId": 0}))
            .respond(json!({"status": "processing", "taskId": "t5", "errorId": 0}))
            .respond(json!({"status": "processing", "taskId": "t5", "errorId": 0}))
            .respond(json!({"status": "ready", "solution": {}, "taskId": "t5", "errorId": 0})),
    );

    solver(&transport, SolverConfig::default())
        .drive("ReCaptchaV3TaskProxyLess", &task())
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 4);
    for pair in calls.windows(2) {
        assert!(pair[1].at - pair[0].at >= Duration::from_secs(3));
    }
}

#[tokio::test]
async fn test_drive_respects_small_poll_budget() {
    let idle = json!({"status": "processing", "taskId": "t6", "errorId": 0});
    let transport = Arc::new(ScriptedTransport::new().then_repeat(idle));

    let result = solver(&transport, fast_config().with_max_polls(2))
        .drive("VisionEngine", &task())
        .await
        .unwrap();

    assert_eq!(result.status, TaskStatus::Processing);
    assert_eq!(transport.poll_calls().len(), 2);
}

#[tokio::test]
async fn test_drive_uses_creation_task_id_even_if_poll_echoes_another() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(json!({"status": "idle", "taskId": "first", "errorId": 0}))
            .respond(json!({"status": "processing", "taskId": "other", "errorId": 0}))
            .respond(json!({"status": "ready", "solution": {}, "errorId": 0})),
    );

    solver(&transport, fast_config())
        .drive("AntiAwsWafTaskProxyLess", &task())
        .await
        .unwrap();

    let polls = transport.poll_calls();
    assert_eq!(polls.len(), 2);
    assert!(polls.iter().all(|c| c.body["taskId"] == "first"));
}

#[tokio::test]
async fn test_drive_fails_when_pending_result_has_no_task_id() {
    let transport = Arc::new(
        ScriptedTransport::new().respond(json!({"status": "processing", "errorId": 0})),
    );

    let err = solver(&transport, fast_config())
        .drive("DatadomeSliderTask", &task())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SolveError::MissingTaskId {
            status: TaskStatus::Processing
        }
    ));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_drive_surfaces_transport_failure_during_polling() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(json!({"status": "idle", "taskId": "t7", "errorId": 0}))
            .fail(TransportError::network("connection reset")),
    );

    let err = solver(&transport, fast_config())
        .drive("ImageToTextTask", &task())
        .await
        .unwrap_err();

    assert!(matches!(err, SolveError::Transport(ref e) if e.message == "connection reset"));
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_drive_surfaces_malformed_response() {
    let transport = Arc::new(ScriptedTransport::new().respond_raw("502 Bad Gateway"));

    let err = solver(&transport, fast_config())
        .drive("ImageToTextTask", &task())
        .await
        .unwrap_err();

    assert!(matches!(err, SolveError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_every_envelope_carries_credentials() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(json!({"status": "idle", "taskId": "t8", "errorId": 0}))
            .respond(json!({"status": "ready", "solution": {}, "taskId": "t8", "errorId": 0})),
    );

    solver(&transport, fast_config())
        .drive("ImageToTextTask", &task())
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(call.body["clientKey"], "CAP-TEST");
        assert_eq!(call.body["appId"], protocol::config::DEFAULT_APP_ID);
    }
    assert_eq!(calls[0].url, "http://capsolver.test/createTask");
    assert_eq!(calls[0].body["task"]["type"], "ImageToTextTask");
    assert!(calls[0].body["task"].get("clientKey").is_none());
    assert!(calls[0].body.get("taskId").is_none());
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_cancellation_during_wait_stops_polling() {
    let idle = json!({"status": "idle", "taskId": "t9", "errorId": 0});
    let transport = Arc::new(ScriptedTransport::new().then_repeat(idle));
    let solver = solver(&transport, SolverConfig::default());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(4)).await;
        trigger.cancel();
    });

    let err = solver
        .drive_until("ImageToTextTask", &task(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, SolveError::Cancelled));
    // Submission at t=0 and the first poll at t=3; cancelled during the second wait.
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_already_cancelled_token_sends_nothing() {
    let transport = Arc::new(ScriptedTransport::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = solver(&transport, fast_config())
        .drive_until("ImageToTextTask", &task(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, SolveError::Cancelled));
    assert!(transport.calls().is_empty());
}

/// Never answers; counts how many exchanges were started.
#[derive(Default)]
struct HangingTransport {
    started: Mutex<u32>,
}

#[async_trait]
impl Transport for HangingTransport {
    async fn exchange(&self, _url: &str, _body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        *self.started.lock().unwrap() += 1;
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_during_exchange_drops_request() {
    let transport = Arc::new(HangingTransport::default());
    let solver = Solver::new(
        transport.clone(),
        ClientKey::new("CAP-TEST").unwrap(),
        SolverConfig::default(),
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = solver
        .drive_until("ImageToTextTask", &task(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, SolveError::Cancelled));
    assert_eq!(*transport.started.lock().unwrap(), 1);
    assert!(started.elapsed() < Duration::from_secs(3));
}

// ---------------------------------------------------------------------------
// Typed solving
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TokenTask {
    #[serde(rename = "websiteURL")]
    website_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct TokenSolution {
    token: String,
}

impl CaptchaTask for TokenTask {
    type Solution = TokenSolution;

    fn task_type(&self) -> &str {
        if self.proxy.is_some() {
            "TokenTask"
        } else {
            "TokenTaskProxyLess"
        }
    }
}

fn token_task(proxy: Option<&str>) -> TokenTask {
    TokenTask {
        website_url: "https://example.com".into(),
        proxy: proxy.map(str::to_owned),
    }
}

#[tokio::test]
async fn test_solve_decodes_typed_solution_and_selects_discriminator() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .respond(json!({"status": "processing", "taskId": "t10", "errorId": 0}))
            .respond(json!({"status": "ready", "solution": {"token": "abc"}, "taskId": "t10", "errorId": 0})),
    );

    let solution = solver(&transport, fast_config())
        .solve(&token_task(Some("http://proxy:8080")))
        .await
        .unwrap();

    assert_eq!(
        solution,
        TokenSolution {
            token: "abc".into()
        }
    );
    let create = &transport.calls()[0];
    assert_eq!(create.body["task"]["type"], "TokenTask");
    assert_eq!(create.body["task"]["proxy"], "http://proxy:8080");
}

#[tokio::test]
async fn test_solve_reports_not_ready_when_budget_is_spent() {
    let idle = json!({"status": "idle", "taskId": "t11", "errorId": 0});
    let transport = Arc::new(ScriptedTransport::new().then_repeat(idle));

    let err = solver(&transport, fast_config().with_max_polls(3))
        .solve(&token_task(None))
        .await
        .unwrap_err();

    match err {
        SolveError::NotReady { task_id, status } => {
            assert_eq!(task_id.as_ref().map(TaskId::as_str), Some("t11"));
            assert_eq!(status, TaskStatus::Idle);
        }
        other => panic!("expected NotReady, got {other:?}"),
    }
    assert_eq!(transport.calls()[0].body["task"]["type"], "TokenTaskProxyLess");
}

#[tokio::test]
async fn test_solve_reports_solution_shape_mismatch() {
    let transport = Arc::new(ScriptedTransport::new().respond(json!({
        "status": "ready",
        "solution": {"text": "not a token"},
        "taskId": "t12",
        "errorId": 0
    })));

    let err = solver(&transport, fast_config())
        .solve(&token_task(None))
        .await
        .unwrap_err();

    assert!(
        matches!(err, SolveError::SolutionDecode { ref task_type, .. } if task_type == "TokenTaskProxyLess")
    );
}
