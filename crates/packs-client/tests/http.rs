//! `HttpApi` against an axum stub of the packs API on an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::{
  Json, Router,
  extract::{Multipart, Path, State},
  http::{HeaderMap, StatusCode, header},
  routing::{get, put},
};
use packs_client::{ApiConfig, Error, HttpApi};
use packs_core::{
  api::{ClassificationUpdate, ProfileApi},
  draft::{FileUpload, ProfileDraft},
  subject::SubjectType,
  user::{StatusChange, UserStatus},
};
use packs_store::{ProfileStore, StoreError};
use serde_json::{Value, json};
use tokio::net::TcpListener;

// ─── Stub server ─────────────────────────────────────────────────────────────

/// One received multipart field: `(name, file_name, text)`.
type SeenPart = (String, Option<String>, String);

#[derive(Clone, Default)]
struct Seen {
  parts:   Arc<Mutex<Vec<SeenPart>>>,
  cookies: Arc<Mutex<Vec<String>>>,
  json:    Arc<Mutex<Vec<Value>>>,
}

fn creator_json() -> Value {
  json!({
    "id": 7,
    "username": "ana",
    "email": "ana@example.com",
    "type": "Creator",
    "creator": {
      "first_name": "Ana",
      "bio": "",
      "address_2": null,
      "genres": [{ "id": 2, "name": "Pop" }, { "id": 3, "name": "Rock" }],
      "types": [],
      "created_date": "2024-05-01T12:30:00"
    }
  })
}

async fn get_profile(
  State(seen): State<Seen>,
  headers: HeaderMap,
) -> Json<Value> {
  if let Some(cookie) = headers.get(header::COOKIE) {
    seen
      .cookies
      .lock()
      .unwrap()
      .push(cookie.to_str().unwrap().to_owned());
  }
  Json(creator_json())
}

async fn put_profile(
  State(seen): State<Seen>,
  mut multipart: Multipart,
) -> Json<Value> {
  let mut first_name = None;
  while let Some(field) = multipart.next_field().await.unwrap() {
    let name = field.name().unwrap_or_default().to_owned();
    let file_name = field.file_name().map(str::to_owned);
    let bytes = field.bytes().await.unwrap();
    let text = String::from_utf8_lossy(&bytes).into_owned();
    if name == "first_name" {
      first_name = Some(text.clone());
    }
    seen.parts.lock().unwrap().push((name, file_name, text));
  }

  let mut body = creator_json();
  if let Some(first_name) = first_name {
    body["creator"]["first_name"] = json!(first_name);
  }
  Json(body)
}

async fn put_classifications(
  State(seen): State<Seen>,
  Json(update): Json<ClassificationUpdate>,
) -> Json<Value> {
  seen.json.lock().unwrap().push(json!(update));
  let genres: Vec<_> = update
    .genres
    .iter()
    .map(|id| json!({ "id": id, "name": format!("genre {id}") }))
    .collect();
  Json(json!({ "first_name": "Ana", "genres": genres, "types": null }))
}

async fn list_submissions() -> Json<Value> {
  Json(json!([
    {
      "id": 2, "name": "Night Drive", "opportunity_id": 10,
      "opportunity_name": "Sync brief", "status": "Pending",
      "notes": "", "bpm": 92, "collaborators": null,
      "created_date": "2024-06-02T09:15:00"
    },
    {
      "id": 1, "name": "Low Tide", "opportunity_id": 11,
      "opportunity_name": "Label pitch", "status": "Accepted",
      "notes": "Mixed by Sam", "bpm": "120", "collaborators": "Sam"
    }
  ]))
}

async fn get_user(Path(id): Path<i64>) -> Json<Value> {
  Json(json!({
    "id": id, "username": "sam", "email": "sam@example.com",
    "status": "Pre-Apply", "type": "Creator",
    "creator": "No creator information available"
  }))
}

async fn put_status(
  State(seen): State<Seen>,
  Path(id): Path<i64>,
  Json(change): Json<StatusChange>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
  if id == 99 {
    let body = Json(json!({ "error": "Unauthorized" }));
    return Err((StatusCode::FORBIDDEN, body));
  }
  seen.json.lock().unwrap().push(json!(change));
  Ok(Json(json!({
    "id": id, "username": "sam", "email": "sam@example.com",
    "status": change.status, "type": "Creator"
  })))
}

async fn serve(router: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
  format!("http://{addr}")
}

async fn stub() -> (HttpApi, Seen) {
  let seen = Seen::default();
  let router = Router::new()
    .route("/api/profile/", get(get_profile).put(put_profile))
    .route("/api/profile/update_genres_types", put(put_classifications))
    .route("/api/opportunities/submissions/user", get(list_submissions))
    .route("/api/users/{id}", get(get_user))
    .route("/api/users/{id}/status", put(put_status))
    .with_state(seen.clone());
  let base_url = serve(router).await;

  let mut config = ApiConfig::new(base_url);
  config.session_cookie = Some("s3ss10n".into());
  config.csrf_token = Some("csrf".into());
  (HttpApi::new(config).unwrap(), seen)
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_normalises_and_sends_the_session() {
  let (api, seen) = stub().await;
  let record = api.fetch_profile().await.unwrap();

  assert_eq!(record.subject_type(), SubjectType::Creator);
  let creator = record.creator().unwrap();
  assert_eq!(creator.first_name, "Ana");
  assert_eq!(creator.last_name, "");
  assert_eq!(creator.address_2, "");
  assert_eq!(creator.genres.len(), 2);

  let cookies = seen.cookies.lock().unwrap().clone();
  assert_eq!(cookies, ["session=s3ss10n; csrf_token=csrf"]);
}

#[tokio::test]
async fn store_update_sends_one_part_per_list_entry() {
  let (api, seen) = stub().await;
  let store = ProfileStore::new(api);
  let record = store.fetch().await.unwrap();

  let mut draft = ProfileDraft::from_record(&record);
  draft.set_text("first_name", "Ana Paula").unwrap();
  draft.clear("address_2").unwrap();
  let picture = FileUpload::image("me.png", b"png-bytes".to_vec()).unwrap();
  draft.set_file("profile_pic", picture).unwrap();

  let saved = store.update(&draft).await.unwrap();
  assert_eq!(saved.creator().unwrap().first_name, "Ana Paula");
  assert_eq!(store.record(), Some(saved));

  let parts = seen.parts.lock().unwrap().clone();
  let genres: Vec<_> = parts
    .iter()
    .filter(|(name, ..)| name == "genres")
    .map(|(_, _, text)| text.as_str())
    .collect();
  assert_eq!(genres, ["2", "3"]);
  assert!(parts.iter().all(|(name, ..)| name != "address_2"));
  assert!(parts.iter().all(|(name, ..)| name != "types"));

  let (_, file_name, text) = parts
    .iter()
    .find(|(name, ..)| name == "profile_pic")
    .unwrap();
  assert_eq!(file_name.as_deref(), Some("me.png"));
  assert_eq!(text, "png-bytes");
}

#[tokio::test]
async fn classifications_are_sent_as_json() {
  let (api, seen) = stub().await;
  let creator = api
    .update_classifications(ClassificationUpdate {
      genres: vec![1, 4],
      types:  vec![],
    })
    .await
    .unwrap();

  assert_eq!(creator.genres.len(), 2);
  assert!(creator.types.is_empty());
  assert_eq!(seen.json.lock().unwrap()[0], json!({
    "genres": [1, 4],
    "types": []
  }));
}

#[tokio::test]
async fn sparse_write_replies_merge_into_the_store() {
  let router = Router::new()
    .route(
      "/api/profile/",
      get(|| async { Json(creator_json()) }).put(|| async {
        Json(json!({
          "id": 7, "username": "ana", "email": "ana@example.com",
          "type": "Creator"
        }))
      }),
    )
    .route(
      "/api/profile/update_genres_types",
      put(|| async { Json(json!({ "bio": "", "types": [1, 2] })) }),
    );
  let api = HttpApi::new(ApiConfig::new(serve(router).await)).unwrap();
  let store = ProfileStore::new(api);
  let record = store.fetch().await.unwrap();

  let saved = store
    .update(&ProfileDraft::from_record(&record))
    .await
    .unwrap();
  assert_eq!(saved, record);

  let creator = store
    .update_classifications(ClassificationUpdate {
      genres: vec![],
      types:  vec![1, 2],
    })
    .await
    .unwrap();
  let types: Vec<_> = creator.types.iter().map(|t| t.id).collect();
  assert_eq!(types, [1, 2]);
  assert_eq!(creator.first_name, "Ana");
  assert_eq!(creator.genres.len(), 2);
  assert_eq!(store.record().unwrap().creator(), Some(&creator));
}

// ─── Submissions and users ───────────────────────────────────────────────────

#[tokio::test]
async fn submissions_keep_server_order() {
  let (api, _) = stub().await;
  let submissions = api.list_user_submissions().await.unwrap();

  let ids: Vec<_> = submissions.iter().map(|s| s.id).collect();
  assert_eq!(ids, [2, 1]);
  assert_eq!(submissions[0].bpm, "92");
  assert_eq!(submissions[0].collaborators, "");
  assert!(submissions[1].created_date.is_none());
}

#[tokio::test]
async fn user_status_round_trip() {
  let (api, seen) = stub().await;

  let user = api.get_user(5).await.unwrap();
  assert_eq!(user.status, UserStatus::PreApply);
  assert!(user.creator.is_none());

  let updated = api
    .update_user_status(5, UserStatus::PremiumMonthly)
    .await
    .unwrap();
  assert_eq!(updated.status, UserStatus::PremiumMonthly);
  assert_eq!(
    seen.json.lock().unwrap()[0],
    json!({ "status": "Premium Monthly" })
  );
}

#[tokio::test]
async fn rejected_status_change_reports_the_status() {
  let (api, _) = stub().await;
  let err = api
    .update_user_status(99, UserStatus::Accepted)
    .await
    .unwrap_err();

  assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
  match err {
    Error::Status { path, body, .. } => {
      assert_eq!(path, "/users/99/status");
      assert!(body.contains("Unauthorized"));
    }
    other => panic!("unexpected error: {other}"),
  }
}

// ─── Failures through the store ──────────────────────────────────────────────

#[tokio::test]
async fn expired_session_surfaces_as_fetch_failure() {
  let router = Router::new().route(
    "/api/profile/",
    get(|| async { StatusCode::UNAUTHORIZED }),
  );
  let api = HttpApi::new(ApiConfig::new(serve(router).await)).unwrap();
  let store = ProfileStore::new(api);

  let err = store.fetch().await.unwrap_err();
  assert!(matches!(err, StoreError::FetchFailed(_)));
  assert!(err.api_error::<Error>().unwrap().is_unauthorized());
  assert!(store.snapshot().error().is_some());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let api = HttpApi::new(ApiConfig::new(format!("http://{addr}"))).unwrap();
  let err = api.fetch_profile().await.unwrap_err();
  assert!(matches!(err, Error::Transport { .. }));
}
