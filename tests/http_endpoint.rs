//! `HttpEndpoint` and the `run` command against a local axum stand-in for
//! the generation service.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use passerelle::config::{Config, Credentials};
use passerelle::endpoint::{CallError, CompletionEndpoint, CompletionRequest, HttpEndpoint};
use passerelle::pipeline;

#[derive(Default)]
struct MockService {
    replies: Mutex<VecDeque<(u16, String)>>,
    /// Authorization header and JSON body of each request, in order.
    seen: Mutex<Vec<(Option<String>, Value)>>,
}

async fn complete(
    State(mock): State<Arc<MockService>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let payload = serde_json::from_str(&body).unwrap_or(Value::Null);
    mock.seen.lock().unwrap().push((auth, payload));

    let (status, body) = mock
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((200, json!({"response": ""}).to_string()));
    (StatusCode::from_u16(status).unwrap(), body)
}

async fn slow() -> (StatusCode, String) {
    tokio::time::sleep(Duration::from_secs(3)).await;
    (StatusCode::OK, json!({"response": "trop tard"}).to_string())
}

/// Start the mock on an ephemeral port; returns its base URL.
async fn start_mock(replies: Vec<(u16, String)>) -> (String, Arc<MockService>) {
    let mock = Arc::new(MockService {
        replies: Mutex::new(replies.into()),
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/generate", post(complete))
        .route("/slow", post(slow))
        .with_state(mock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), mock)
}

fn endpoint(url: String) -> HttpEndpoint {
    HttpEndpoint::new(&Credentials {
        url,
        token: "secret-token".to_string(),
    })
    .unwrap()
}

fn request(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        prompt: prompt.to_string(),
        temperature: 0.7,
        timeout: Duration::from_secs(5),
    }
}

#[tokio::test]
async fn test_sends_prompt_temperature_and_bearer() {
    let (base, mock) = start_mock(vec![(200, json!({"response": "ok"}).to_string())]).await;
    let ep = endpoint(format!("{}/generate", base));

    let body = ep.complete(&request("Bonjour")).await.unwrap();
    assert_eq!(body, r#"{"response":"ok"}"#);

    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0.as_deref(), Some("Bearer secret-token"));
    assert_eq!(seen[0].1["prompt"], "Bonjour");
    assert!((seen[0].1["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-3);
}

#[tokio::test]
async fn test_non_ok_status_is_an_error() {
    let (base, _mock) = start_mock(vec![
        (500, "boom".to_string()),
        (201, json!({"response": "créé"}).to_string()),
    ])
    .await;
    let ep = endpoint(format!("{}/generate", base));

    assert_eq!(ep.complete(&request("x")).await, Err(CallError::Status(500)));
    assert_eq!(ep.complete(&request("x")).await, Err(CallError::Status(201)));
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let (base, _mock) = start_mock(vec![]).await;
    let ep = endpoint(format!("{}/slow", base));
    let mut req = request("x");
    req.timeout = Duration::from_millis(200);

    assert_eq!(ep.complete(&req).await, Err(CallError::Timeout));
}

#[tokio::test]
async fn test_full_run_over_http() {
    let (base, mock) = start_mock(vec![
        (
            200,
            json!({"choices": [{"message": {"content": "Titre : Le budget voté\nChapeau : La ville tranche."}}]})
                .to_string(),
        ),
        (
            200,
            json!({"generations": [{"text": "Premièrement voici un point important."}]}).to_string(),
        ),
        (500, "indisponible".to_string()),
        (200, json!("Ensuite voici un autre point").to_string()),
    ])
    .await;
    let ep = endpoint(format!("{}/generate", base));
    let mut rng = StdRng::seed_from_u64(1);

    let report = pipeline::run(
        &ep,
        &Config::default(),
        &[],
        &mut rng,
        "Le conseil s'est réuni. TRANSITION Le budget est voté. TRANSITION Fin de séance.",
    )
    .await
    .unwrap();

    assert_eq!(report.header_fields.as_ref().unwrap().title, "Le budget voté");
    assert_eq!(
        report.connectives,
        vec![
            "Premièrement voici un point important".to_string(),
            "Ensuite voici un autre point".to_string(),
        ]
    );
    assert_eq!(
        report.article,
        "Le conseil s'est réuni.\n\nPremièrement voici un point important\n\nLe budget est voté.\n\nEnsuite voici un autre point\n\nFin de séance."
    );
    assert!(report.notices.is_empty());

    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    // header, first connective, then the second connective's two attempts
    assert!((seen[0].1["temperature"].as_f64().unwrap() - 0.5).abs() < 1e-3);
    assert!((seen[1].1["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-3);
    assert!((seen[3].1["temperature"].as_f64().unwrap() - 0.5).abs() < 1e-3);
    assert!(seen[3].1["prompt"]
        .as_str()
        .unwrap()
        .contains("EXACTEMENT 5 mots"));
}

fn passerelle_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("passerelle");
    path
}

#[tokio::test]
async fn test_cli_run_json_report() {
    let (base, _mock) = start_mock(vec![
        (200, json!({"response": "Titre : Un titre\nChapeau : Un chapeau"}).to_string()),
        (200, json!({"output": ["Cette décision change la donne"]}).to_string()),
    ])
    .await;

    let tmp = tempfile::TempDir::new().unwrap();
    let root = tmp.path();
    std::fs::write(root.join("transitions.json"), "[]").unwrap();
    std::fs::write(root.join("article.txt"), "Le début.\nTRANSITION\nLa suite.\n").unwrap();
    let config_path = root.join("passerelle.toml");
    std::fs::write(
        &config_path,
        format!(
            "[endpoint]\nsecrets_file = \"{root}/secrets.toml\"\nenv_file = \"{root}/.env\"\n\
             url_env = \"PASSERELLE_HTTP_URL\"\ntoken_env = \"PASSERELLE_HTTP_TOKEN\"\n\n\
             [examples]\npath = \"{root}/transitions.json\"\n",
            root = root.display()
        ),
    )
    .unwrap();

    let output = tokio::process::Command::new(passerelle_binary())
        .arg("--config")
        .arg(&config_path)
        .args(["run", "--json", "--seed", "7"])
        .arg(root.join("article.txt"))
        .env("PASSERELLE_HTTP_URL", format!("{}/generate", base))
        .env("PASSERELLE_HTTP_TOKEN", "secret-token")
        .output()
        .await
        .unwrap();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "run failed: {}", stderr);

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["connectives"], json!(["Cette décision change la donne"]));
    assert_eq!(
        report["article"],
        "Le début.\n\nCette décision change la donne\n\nLa suite."
    );
    assert_eq!(report["header_fields"]["blurb"], "Un chapeau");
    assert_eq!(report["version"].as_str().unwrap().len(), 10);
    assert!(report["run_id"].as_str().is_some());
}
