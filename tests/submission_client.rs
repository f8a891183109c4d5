use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use symbis_scan::application::{App, FAILURE_ALERT, SubmissionDispatcher, ViewState};
use symbis_scan::domain::{
    Acknowledgement, Field, IntakeRecord, ReportService, ResponseMode, ResultPayload,
    SubmissionError, SubmissionOutcome,
};
use symbis_scan::infrastructure::{DocumentRepository, HttpReportClient};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn acme_record() -> IntakeRecord {
    IntakeRecord {
        company_name: "Acme".into(),
        url: "https://acme.nl".into(),
        name: "Jan Jansen".into(),
        email: "jan@acme.nl".into(),
        ..IntakeRecord::with_form_defaults()
    }
}

fn app_ready_to_submit(mode: ResponseMode) -> App {
    let record = acme_record();
    let mut app = App::new(mode, ".".into());
    for field in Field::ALL {
        app.fields.set(field, record.get(field));
    }
    for _ in 0..3 {
        app.next_step().expect("step complete");
    }
    app
}

/// The blocking client must be created, used and dropped off the async runtime.
async fn submit(base_url: String, mode: ResponseMode, record: IntakeRecord) -> SubmissionOutcome {
    tokio::task::spawn_blocking(move || {
        let client = HttpReportClient::new(&base_url, mode).expect("client");
        client.submit(&record)
    })
    .await
    .expect("submission task")
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/generate-report"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn posts_every_key_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-report"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let record = IntakeRecord {
        company_name: "Acme".into(),
        ..IntakeRecord::default()
    };
    let outcome = submit(server.uri(), ResponseMode::Informational, record).await;
    assert!(outcome.is_success());

    let requests = server.received_requests().await.expect("recorded requests");
    let body: Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(
        body,
        json!({
            "company_name": "Acme",
            "url": "",
            "employees": "",
            "industry": "",
            "ai_experience": "",
            "chatgpt_policy": "",
            "use_case_preference": "",
            "use_case_text": "",
            "email": "",
            "name": "",
        })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn informational_echo_overrides_submitted_contact() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(202).set_body_json(json!({
            "message": "Bedankt!",
            "company_name": "Acme",
            "email": "a@acme.nl",
        })),
    )
    .await;

    let mut app = app_ready_to_submit(ResponseMode::Informational);
    app.fields.set(Field::CompanyName, "acme bv");
    let submission = app.begin_submission().expect("submission");
    let outcome = submit(server.uri(), ResponseMode::Informational, submission.record).await;
    assert!(app.complete_submission(submission.id, outcome));

    let ViewState::Result(ResultPayload::Informational { message, contact }) = &app.view else {
        panic!("expected informational result, got {}", app.view.name());
    };
    assert_eq!(message, "Bedankt!");
    assert_eq!(contact.company_name(), "Acme");
    assert_eq!(contact.email(), "a@acme.nl");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn document_response_downloads_as_company_file() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/pdf")
            .set_body_bytes(b"%PDF-1.7 report".to_vec()),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut app = app_ready_to_submit(ResponseMode::Document);
    app.download_dir = dir.path().to_path_buf();
    let submission = app.begin_submission().expect("submission");
    let outcome = submit(server.uri(), ResponseMode::Document, submission.record).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Success(Acknowledgement::Document {
            document: b"%PDF-1.7 report".to_vec(),
            company_name: "Acme".into(),
        })
    );
    app.complete_submission(submission.id, outcome);

    let (document, company_name) = app.document_to_download().expect("document on offer");
    let path = DocumentRepository::save_document(document, company_name, dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "Symbis_Scan_Acme.pdf");
    assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.7 report");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_error_returns_to_form_with_body_text() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(500).set_body_string("Server exploded"),
    )
    .await;

    let mut app = app_ready_to_submit(ResponseMode::Document);
    let submission = app.begin_submission().expect("submission");
    let outcome = submit(server.uri(), ResponseMode::Document, submission.record).await;
    app.complete_submission(submission.id, outcome);

    let form = app.form().expect("back on the form");
    assert_eq!(form.error.as_deref(), Some("Server exploded"));
    assert_eq!(app.alerts.len(), 1);
    assert_eq!(app.active_alert(), Some(FAILURE_ALERT));
    assert_eq!(app.fields.get(Field::Email), "jan@acme.nl");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn error_without_body_uses_status_text() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(400)).await;

    let outcome = submit(server.uri(), ResponseMode::Informational, acme_record()).await;
    assert_eq!(
        outcome,
        SubmissionOutcome::Failure(SubmissionError::Service {
            status: 400,
            message: "Error: Bad Request".into(),
        })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn success_with_html_body_is_a_failure() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"),
    )
    .await;

    let outcome = submit(server.uri(), ResponseMode::Informational, acme_record()).await;
    assert!(matches!(
        outcome,
        SubmissionOutcome::Failure(SubmissionError::MalformedResponse(_))
    ));
}

#[test]
fn unreachable_service_is_a_transport_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpReportClient::new(
        &format!("http://127.0.0.1:{}", port),
        ResponseMode::Informational,
    )
    .unwrap();

    let mut app = app_ready_to_submit(ResponseMode::Informational);
    let submission = app.begin_submission().unwrap();
    let outcome = client.submit(&submission.record);
    let SubmissionOutcome::Failure(SubmissionError::Transport(message)) = &outcome else {
        panic!("expected transport failure, got {:?}", outcome);
    };
    assert!(!message.is_empty());

    app.complete_submission(submission.id, outcome.clone());
    assert_eq!(app.form().unwrap().error.as_deref(), Some(message.as_str()));
    assert_eq!(app.alerts.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn loading_holds_while_the_service_is_slow() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(202)
            .set_body_json(json!({ "message": "Bedankt!" }))
            .set_delay(Duration::from_millis(500)),
    )
    .await;
    let base_url = server.uri();

    tokio::task::spawn_blocking(move || {
        let client = HttpReportClient::new(&base_url, ResponseMode::Informational).unwrap();
        let dispatcher = SubmissionDispatcher::new(Arc::new(client));
        let mut app = app_ready_to_submit(ResponseMode::Informational);

        let submission = app.begin_submission().unwrap();
        dispatcher.dispatch(submission);
        assert!(matches!(app.view, ViewState::Loading(_)));
        assert!(dispatcher.next_timeout(Duration::from_millis(50)).is_none());
        assert!(matches!(app.view, ViewState::Loading(_)));

        let (id, outcome) = dispatcher
            .next_timeout(Duration::from_secs(10))
            .expect("outcome");
        assert!(app.complete_submission(id, outcome));
        let ViewState::Result(payload) = &app.view else {
            panic!("expected result view");
        };
        assert_eq!(payload.company_name(), "Acme");
    })
    .await
    .unwrap();
}
