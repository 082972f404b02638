use booking_desk::domain::ports::ConfigProvider;
use booking_desk::utils::validation::Validate;
use booking_desk::{
    AuthSession, BookingApi, DeskConfig, DeskViews, LocalStorage, ProfileConfig, RestClient,
    SessionStore,
};
use httpmock::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn login_body() -> serde_json::Value {
    json!({
        "token": "tok-42",
        "user": {
            "id": "u1",
            "name": "Laura",
            "email": "laura@salonlaura.es",
            "business": {"id": "b2", "name": "Salón Laura", "slug": "salon-laura", "type": "beauty_salon"}
        }
    })
}

#[tokio::test]
async fn test_login_persist_reload_and_call() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST).path("/api/auth/login");
        then.status(200).json_body(login_body());
    });
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/api/auth/me")
            .header("authorization", "Bearer tok-42")
            .header("x-business-slug", "salon-laura");
        then.status(200).json_body(json!({
            "user": {
                "id": "u1",
                "name": "Laura Martínez",
                "email": "laura@salonlaura.es",
                "business": {"id": "b2", "name": "Salón Laura", "slug": "salon-laura", "type": "beauty_salon"}
            }
        }));
    });

    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(LocalStorage::new(dir.path().to_string_lossy()));

    let client = RestClient::new(server.base_url(), 5).unwrap();
    let response = client
        .login("laura@salonlaura.es", "secret", None)
        .await
        .unwrap();
    let mut session = AuthSession::new();
    session.login(response.user, response.token);
    store.save(&session).await.unwrap();
    login.assert();

    // A fresh process only has the file on disk.
    let restored = store.load().await;
    assert!(restored.is_authenticated());
    assert_eq!(restored.token(), Some("tok-42"));
    assert_eq!(restored.business_slug(), Some("salon-laura"));
    assert_eq!(restored.terminology().bookings, "Citas");

    let client = RestClient::new(server.base_url(), 5)
        .unwrap()
        .with_session(&restored);
    let mut views = DeskViews::new(client, restored);
    let user = views.refresh_user().await.unwrap().clone();

    me.assert();
    assert_eq!(user.name, "Laura Martínez");
    assert!(views.uses_appointments());
    assert!(!views.business().features.waitlist);
}

#[tokio::test]
async fn test_logout_clears_session_file() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(LocalStorage::new(dir.path().to_string_lossy()));

    let mut session = AuthSession::new();
    let response: booking_desk::domain::model::LoginResponse =
        serde_json::from_value(login_body()).unwrap();
    session.login(response.user, response.token);
    store.save(&session).await.unwrap();
    assert!(store.load().await.is_authenticated());

    store.clear().await.unwrap();
    assert!(!store.load().await.is_authenticated());
    // Clearing twice is fine.
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_corrupt_session_file_is_signed_out() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("session.json"), b"{not json").unwrap();
    let store = SessionStore::new(LocalStorage::new(dir.path().to_string_lossy()));

    let session = store.load().await;
    assert!(session.require_authenticated().is_err());
}

#[tokio::test]
async fn test_profile_drives_client() {
    let server = MockServer::start();
    let stats = server.mock(|when, then| {
        when.method(GET)
            .path("/api/analytics/dashboard")
            .header("x-business-slug", "buen-sabor");
        then.status(200)
            .json_body(json!({"todayReservations": 12, "todayCovers": 38, "occupancyRate": 75.5}));
    });

    let dir = TempDir::new().unwrap();
    let profile_path = dir.path().join("desk.toml");
    fs::write(
        &profile_path,
        format!(
            r#"
[api]
base_url = "{}"
timeout_seconds = 10

[tenant]
slug = "buen-sabor"

[display]
calendar_view = "day"
top_customers_limit = 5
"#,
            server.base_url()
        ),
    )
    .unwrap();

    let profile = ProfileConfig::from_file(profile_path.to_str().unwrap()).unwrap();
    profile.validate().unwrap();
    let config = DeskConfig::from_profile(&profile);
    assert_eq!(config.timeout_seconds(), 10);
    assert_eq!(config.top_customers_limit, 5);

    let client = RestClient::from_config(&config).unwrap().with_token("tok");
    let dashboard = client.dashboard_stats().await.unwrap();

    stats.assert();
    assert_eq!(dashboard.today_reservations, 12);
    assert_eq!(dashboard.occupancy_rate, 75.5);
}
