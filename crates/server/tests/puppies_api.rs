use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use models::{Puppy, PuppyData};
use serde_json::{json, Value};
use service::file::puppy_store::FilePuppyStore;
use service::seed::default_puppies;
use tower::Service;
use uuid::Uuid;

use server::routes::{self, ServerState};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

struct TestApp {
    app: Router,
    data_path: PathBuf,
}

impl TestApp {
    fn new(seed: PuppyData) -> Self {
        let data_path = std::env::temp_dir()
            .join(format!("puppies_api_{}", Uuid::new_v4()))
            .join("data.json");
        let state = ServerState { puppy_store: FilePuppyStore::new(&data_path, seed) };
        let app = routes::build_router(state, cors(), None);
        Self { app, data_path }
    }

    async fn with_file(data: &PuppyData) -> anyhow::Result<Self> {
        let app = Self::new(default_puppies());
        write_raw(&app.data_path, &serde_json::to_vec_pretty(data)?).await?;
        Ok(app)
    }

    async fn send(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        let resp = self.app.clone().call(req).await?;
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        Ok((status, body.to_vec()))
    }

    async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty())?).await
    }

    async fn patch_json(&self, uri: &str, body: &Value) -> anyhow::Result<(StatusCode, Vec<u8>)> {
        let req = Request::builder()
            .method("PATCH")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body)?))?;
        self.send(req).await
    }

    async fn cleanup(self) {
        if let Some(dir) = self.data_path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }
}

async fn write_raw(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path.parent().unwrap()).await?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

fn pup(id: i64, name: &str, owner: &str, image: &str, breed: &str) -> Puppy {
    Puppy { id, name: name.into(), breed: breed.into(), owner: owner.into(), image: image.into() }
}

fn three_puppies() -> PuppyData {
    PuppyData::new(vec![
        pup(1, "Coco", "James", "/images/dog1.jpg", "Pug"),
        pup(2, "Fido", "Jimmy", "/images/dog2.jpg", "Dog"),
        pup(3, "Kermit", "Jerm", "/images/dog3.jpg", "Frog"),
    ])
}

fn two_puppies() -> PuppyData {
    PuppyData::new(vec![
        pup(1, "Fido", "Fred", "/images/puppy1.jpg", "Labrador"),
        pup(2, "Coco", "Chloe", "/images/puppy2.jpg", "Labrador"),
    ])
}

fn sam() -> Value {
    json!({"name": "Sam", "breed": "Pug", "owner": "Fred", "image": "/images/puppy3.jpg"})
}

#[tokio::test]
async fn lists_seed_when_no_file_exists() -> anyhow::Result<()> {
    let app = TestApp::new(default_puppies());

    let (status, body) = app.get("/api/v1/puppies").await?;
    assert_eq!(status, StatusCode::OK);
    let data: PuppyData = serde_json::from_slice(&body)?;
    assert_eq!(data, default_puppies());
    // listing never writes
    assert!(tokio::fs::metadata(&app.data_path).await.is_err());

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn lists_the_puppies_in_the_data_file() -> anyhow::Result<()> {
    let app = TestApp::with_file(&three_puppies()).await?;

    let (status, body) = app.get("/api/v1/puppies").await?;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body)?;
    assert_eq!(
        v,
        json!({"puppies": [
            {"id": 1, "name": "Coco", "owner": "James", "breed": "Pug", "image": "/images/dog1.jpg"},
            {"id": 2, "name": "Fido", "owner": "Jimmy", "breed": "Dog", "image": "/images/dog2.jpg"},
            {"id": 3, "name": "Kermit", "owner": "Jerm", "breed": "Frog", "image": "/images/dog3.jpg"},
        ]})
    );

    // repeated listing is byte-identical
    let (_, again) = app.get("/api/v1/puppies").await?;
    assert_eq!(body, again);

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn reads_a_specific_puppy() -> anyhow::Result<()> {
    let app = TestApp::with_file(&three_puppies()).await?;

    let (status, body) = app.get("/api/v1/puppies/1").await?;
    assert_eq!(status, StatusCode::OK);
    let puppy: Puppy = serde_json::from_slice(&body)?;
    assert_eq!(puppy, three_puppies().puppies[0]);

    let (status, body) = app.get("/api/v1/puppies/99").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());

    let (status, body) = app.get("/api/v1/puppies/abc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn updates_the_correct_puppy() -> anyhow::Result<()> {
    let app = TestApp::with_file(&two_puppies()).await?;

    let (status, body) = app.patch_json("/api/v1/puppies/2", &sam()).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let expected = json!({"puppies": [
        {"id": 1, "name": "Fido", "owner": "Fred", "image": "/images/puppy1.jpg", "breed": "Labrador"},
        {"id": 2, "name": "Sam", "breed": "Pug", "owner": "Fred", "image": "/images/puppy3.jpg"},
    ]});

    let (status, body) = app.get("/api/v1/puppies").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body)?, expected);

    // the whole collection is on disk, not just the changed record
    let on_disk: Value = serde_json::from_slice(&tokio::fs::read(&app.data_path).await?)?;
    assert_eq!(on_disk, expected);

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_id_does_not_touch_the_file() -> anyhow::Result<()> {
    let app = TestApp::with_file(&two_puppies()).await?;
    let before = tokio::fs::read(&app.data_path).await?;

    let (status, body) = app.patch_json("/api/v1/puppies/3", &sam()).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
    assert_eq!(tokio::fs::read(&app.data_path).await?, before);

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn rejects_bad_update_requests() -> anyhow::Result<()> {
    let app = TestApp::with_file(&two_puppies()).await?;
    let before = tokio::fs::read(&app.data_path).await?;

    // body id differs from path id
    let mut mismatched = sam();
    mismatched["id"] = json!(1);
    let (status, body) = app.patch_json("/api/v1/puppies/2", &mismatched).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    // missing field
    let (status, _) = app
        .patch_json("/api/v1/puppies/2", &json!({"name": "Sam", "breed": "Pug", "owner": "Fred"}))
        .await?;
    assert!(status.is_client_error());

    // not JSON at all
    let req = Request::builder()
        .method("PATCH")
        .uri("/api/v1/puppies/2")
        .header("content-type", "application/json")
        .body(Body::from("{ name: "))?;
    let (status, body) = app.send(req).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    // non-numeric id
    let (status, _) = app.patch_json("/api/v1/puppies/two", &sam()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(tokio::fs::read(&app.data_path).await?, before);

    // matching body id is accepted
    let mut matching = sam();
    matching["id"] = json!(2);
    let (status, _) = app.patch_json("/api/v1/puppies/2", &matching).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn empty_collection() -> anyhow::Result<()> {
    let app = TestApp::with_file(&PuppyData::default()).await?;

    let (status, body) = app.get("/api/v1/puppies").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body)?, json!({"puppies": []}));

    for id in [1, 2, 7] {
        let (status, _) = app.get(&format!("/api/v1/puppies/{id}")).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.patch_json(&format!("/api/v1/puppies/{id}"), &sam()).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, body) = app.get("/api/v1/puppies").await?;
    assert_eq!(serde_json::from_slice::<Value>(&body)?, json!({"puppies": []}));

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn malformed_data_file_is_a_server_error() -> anyhow::Result<()> {
    let app = TestApp::new(default_puppies());
    write_raw(&app.data_path, b"not json").await?;

    let (status, body) = app.get("/api/v1/puppies").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());

    let (status, _) = app.get("/api/v1/puppies/1").await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = app.patch_json("/api/v1/puppies/1", &sam()).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn failed_write_is_a_server_error_and_keeps_the_file() -> anyhow::Result<()> {
    let app = TestApp::with_file(&two_puppies()).await?;
    let before = tokio::fs::read(&app.data_path).await?;
    // a directory where the staged write goes
    tokio::fs::create_dir_all(app.data_path.with_file_name("data.json.tmp")).await?;

    let (status, body) = app.patch_json("/api/v1/puppies/1", &sam()).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
    assert_eq!(tokio::fs::read(&app.data_path).await?, before);

    let (status, body) = app.get("/api/v1/puppies/1").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Puppy>(&body)?, two_puppies().puppies[0]);

    app.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn concurrent_updates_to_different_puppies_all_land() -> anyhow::Result<()> {
    let app = Arc::new(TestApp::new(default_puppies()));

    let mut handles = Vec::new();
    for id in 1..=7 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let body = json!({"name": format!("Renamed {id}"), "breed": "Mutt", "owner": "Pat", "image": ""});
            app.patch_json(&format!("/api/v1/puppies/{id}"), &body).await
        }));
    }
    for h in handles {
        let (status, _) = h.await??;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, body) = app.get("/api/v1/puppies").await?;
    let data: PuppyData = serde_json::from_slice(&body)?;
    assert_eq!(data.puppies.len(), 7);
    for (i, p) in data.puppies.iter().enumerate() {
        assert_eq!(p.id, i as i64 + 1);
        assert_eq!(p.name, format!("Renamed {}", p.id));
    }

    if let Ok(app) = Arc::try_unwrap(app) {
        app.cleanup().await;
    }
    Ok(())
}

#[tokio::test]
async fn health_and_openapi() -> anyhow::Result<()> {
    let app = TestApp::new(default_puppies());

    let (status, body) = app.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body)?["status"], "ok");

    let (status, body) = app.get("/api-docs/openapi.json").await?;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_slice(&body)?;
    assert!(doc["paths"]["/api/v1/puppies/{id}"]["patch"].is_object());
    Ok(())
}
