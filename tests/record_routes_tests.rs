use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use clinicdesk::config::{Config, DEFAULT_CORS_ORIGIN};
use clinicdesk::render::RenderMode;
use clinicdesk::router::{ClinicState, build_app, clinic_router};
use std::{
    collections::HashSet,
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

struct TestStore {
    path: PathBuf,
    state: ClinicState,
}

impl Drop for TestStore {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut side = self.path.clone().into_os_string();
            side.push(suffix);
            let _ = fs::remove_file(side);
        }
    }
}

async fn test_store(tag: &str, mode: RenderMode) -> TestStore {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut path = std::env::temp_dir();
    path.push(format!(
        "clinicdesk-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", path.display());
    let storage = clinicdesk::db::connect(&database_url, 2)
        .await
        .expect("failed to open test store");

    TestStore {
        path,
        state: ClinicState::new(storage, mode),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (
        status,
        String::from_utf8(body.to_vec()).expect("response body was not utf-8"),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .expect("failed to build request")
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("failed to build request")
}

#[tokio::test]
async fn bandages_create_then_count() {
    let store = test_store("bandages", RenderMode::Fragment).await;
    let app = clinic_router(store.state.clone());

    let (status, body) = send(
        &app,
        post_json("/inventory", r#"{"item_name":"Bandages","quantity":50}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.contains("Bandages"));
    assert!(body.contains("50"));

    let (status, body) = send(&app, get("/inventory/count")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1");
}

#[tokio::test]
async fn patient_round_trip_keeps_every_field() {
    let store = test_store("alice", RenderMode::Json).await;
    let app = clinic_router(store.state.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/patients",
            r#"{"name":"Alice","age":30,"email":"a@x.com","phone":"555-1234","history":"none"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&body).unwrap();
    let id = created["id"].as_i64().expect("created record has an id");

    let (status, body) = send(&app, get("/patients/all")).await;
    assert_eq!(status, StatusCode::OK);
    let listed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        listed,
        serde_json::json!([{
            "id": id,
            "name": "Alice",
            "age": 30,
            "email": "a@x.com",
            "phone": "555-1234",
            "history": "none"
        }])
    );
}

#[tokio::test]
async fn created_ids_are_unique() {
    let store = test_store("ids", RenderMode::Json).await;
    let app = clinic_router(store.state.clone());

    let mut ids = HashSet::new();
    for qty in [1, 2, 3] {
        let (status, body) = send(
            &app,
            post_json(
                "/inventory",
                &format!(r#"{{"item_name":"Tape","quantity":{qty}}}"#),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        ids.insert(v["id"].as_i64().unwrap());
    }
    assert_eq!(ids.len(), 3);

    let (_, count) = send(&app, get("/inventory/count")).await;
    assert_eq!(count, "3");
}

#[tokio::test]
async fn invalid_create_is_rejected_and_not_persisted() {
    let store = test_store("invalid", RenderMode::Fragment).await;
    let app = clinic_router(store.state.clone());

    let (status, body) = send(&app, post_json("/patients", r#"{"name":"NoAge"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("missing required field `age`"));

    let (status, _) = send(&app, post_json("/appointments", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, count) = send(&app, get("/patients/count")).await;
    assert_eq!(count, "0");
    let (_, count) = send(&app, get("/appointments/count")).await;
    assert_eq!(count, "0");
}

#[tokio::test]
async fn appointment_with_unknown_patient_is_accepted() {
    let store = test_store("dangling", RenderMode::Table).await;
    let app = clinic_router(store.state.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/appointments",
            r#"{"patient_id":4242,"date":"2024-05-01","time":"10:30","description":"checkup"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.starts_with("<tr>"));

    let (status, body) = send(&app, get("/appointments")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<td>4242</td>"));
    assert!(body.contains("<td>checkup</td>"));
}

#[tokio::test]
async fn negative_quantity_is_accepted() {
    let store = test_store("negative", RenderMode::Fragment).await;
    let app = clinic_router(store.state.clone());

    let (status, body) = send(
        &app,
        post_json("/inventory", r#"{"item_name":"Gloves","quantity":-10}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "<div>Gloves: -10</div>");
}

#[tokio::test]
async fn form_bodies_bind_like_json() {
    let store = test_store("form", RenderMode::Fragment).await;
    let app = clinic_router(store.state.clone());

    let (status, body) = send(
        &app,
        post_form(
            "/patients",
            "name=Bob&age=52&email=bob%40x.com&phone=555-0000&history=asthma",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, "<div>Bob - 52</div>");

    let (status, _) = send(
        &app,
        post_form("/inventory", "item_name=Gauze&quantity=lots"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_aliases_are_stable_between_reads() {
    let store = test_store("aliases", RenderMode::Fragment).await;
    let app = clinic_router(store.state.clone());

    for name in ["Gauze", "Saline"] {
        let (status, _) = send(
            &app,
            post_json(
                "/inventory",
                &format!(r#"{{"item_name":"{name}","quantity":5}}"#),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, first) = send(&app, get("/inventory")).await;
    let (_, all) = send(&app, get("/inventory/all")).await;
    let (_, list) = send(&app, get("/inventory/list")).await;
    assert_eq!(first, "<div>Gauze: 5</div><div>Saline: 5</div>");
    assert_eq!(first, all);
    assert_eq!(first, list);
}

#[tokio::test]
async fn page_mode_renders_full_document() {
    let store = test_store("page", RenderMode::Page).await;
    let app = clinic_router(store.state.clone());

    let (status, body) = send(&app, get("/patients")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("<title>Patients</title>"));
}

#[tokio::test]
async fn cors_allows_only_configured_origin() {
    let store = test_store("cors", RenderMode::Fragment).await;
    let app = build_app(store.state.clone(), &Config::default()).expect("app builds");

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/patients")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "hx-current-url")
            .body(Body::empty())
            .expect("failed to build request")
    };

    let resp = app
        .clone()
        .oneshot(preflight(DEFAULT_CORS_ORIGIN))
        .await
        .expect("request failed");
    let headers = resp.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(DEFAULT_CORS_ORIGIN)
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );

    let resp = app
        .oneshot(preflight("https://elsewhere.example"))
        .await
        .expect("request failed");
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn static_dir_serves_files_without_shadowing_api() {
    let store = test_store("static", RenderMode::Fragment).await;

    let mut dir = store.path.clone().into_os_string();
    dir.push("-public");
    let dir = PathBuf::from(dir);
    fs::create_dir_all(&dir).expect("create static dir");
    fs::write(dir.join("index.html"), "<h1>Front desk</h1>").expect("write static file");

    let cfg = Config {
        static_dir: Some(dir.clone()),
        ..Default::default()
    };
    let app = build_app(store.state.clone(), &cfg).expect("app builds");

    let (status, body) = send(&app, get("/index.html")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Front desk</h1>");

    let (status, _) = send(
        &app,
        post_json("/inventory", r#"{"item_name":"Gauze","quantity":4}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/inventory")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<div>Gauze: 4</div>");

    let (status, _) = send(&app, get("/missing.css")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let _ = fs::remove_dir_all(&dir);
}
