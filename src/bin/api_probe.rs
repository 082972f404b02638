//! Signs in against a live API and calls every read-only endpoint once,
//! printing which ones answer. Usage: `api_probe [profile.toml]` with
//! `BOOKING_DESK_EMAIL` and `BOOKING_DESK_PASSWORD` set.

use anyhow::Context;
use booking_desk::core::calendar::{self, CalendarView};
use booking_desk::domain::model::ListQuery;
use booking_desk::utils::validation::Validate;
use booking_desk::{AuthSession, BookingApi, DeskConfig, ProfileConfig, RestClient};
use chrono::Local;

async fn check<T, F>(name: &str, call: F) -> bool
where
    F: std::future::Future<Output = booking_desk::Result<T>>,
{
    match call.await {
        Ok(_) => {
            println!("  ✅ {}", name);
            true
        }
        Err(e) => {
            println!("  ❌ {}: {}", name, e.user_friendly_message());
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args()
        .nth(1)
        .or_else(|| std::env::var(booking_desk::config::PROFILE_ENV).ok())
    {
        Some(path) => {
            let profile = ProfileConfig::from_file(&path)
                .with_context(|| format!("loading profile {}", path))?;
            profile.validate()?;
            DeskConfig::from_profile(&profile)
        }
        None => DeskConfig::default(),
    };

    let email = std::env::var("BOOKING_DESK_EMAIL").context("BOOKING_DESK_EMAIL is not set")?;
    let password = std::env::var(booking_desk::config::PASSWORD_ENV)
        .context("BOOKING_DESK_PASSWORD is not set")?;

    println!("🚀 Probing {}", config.api_base_url);

    let client = RestClient::from_config(&config)?;
    let response = client
        .login(&email, &password, config.business_slug.as_deref())
        .await
        .context("login failed")?;

    let mut session = AuthSession::new();
    session.login(response.user, response.token);
    let client = client.with_session(&session);
    println!(
        "✅ Signed in, tenant {}",
        session.business_slug().unwrap_or("(none)")
    );

    let (start, end) = calendar::date_range(Local::now().date_naive(), CalendarView::Week);
    let query = ListQuery::default();

    let results = vec![
        check("GET /api/auth/me", client.me()).await,
        check("GET /api/appointments", client.appointments(&query)).await,
        check("GET /api/appointments/today", client.today_appointments()).await,
        check("GET /api/appointments/stats", client.appointment_stats()).await,
        check("GET /api/reservations", client.reservations(&query)).await,
        check("GET /api/reservations/today", client.today_reservations()).await,
        check("GET /api/reservations/calendar", client.calendar_reservations(start, end)).await,
        check("GET /api/reservations/stats", client.reservation_stats()).await,
        check("GET /api/customers", client.customers(&query)).await,
        check("GET /api/customers/stats", client.customer_stats()).await,
        check("GET /api/waitlist", client.waitlist(&query)).await,
        check("GET /api/waitlist/stats", client.waitlist_stats()).await,
        check("GET /api/services", client.services()).await,
        check("GET /api/analytics/dashboard", client.dashboard_stats()).await,
        check("GET /api/analytics/monthly", client.monthly_stats()).await,
        check("GET /api/analytics/top-customers", client.top_customers(10)).await,
    ];

    let ok = results.iter().filter(|r| **r).count();
    println!("\n📊 {}/{} endpoints answered", ok, results.len());

    if session.user().map(|u| u.is_super_admin).unwrap_or(false) {
        check("GET /api/superadmin/businesses", client.list_businesses()).await;
    }

    Ok(())
}
