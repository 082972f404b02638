use crate::core::session::AuthSession;
use crate::domain::model::*;
use crate::domain::ports::{BookingApi, ConfigProvider};
use crate::utils::error::{DeskError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const BUSINESS_SLUG_HEADER: &str = "x-business-slug";
const FALLBACK_ERROR_MESSAGE: &str = "request failed";

/// Thin REST wrapper: attaches the bearer token and tenant header, turns
/// non-2xx responses into `DeskError::ApiError`.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    business_slug: Option<String>,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("booking-desk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            business_slug: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Self::new(config.api_base_url(), config.timeout_seconds())?;
        Ok(match config.business_slug() {
            Some(slug) => client.with_business_slug(slug),
            None => client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_business_slug(mut self, slug: impl Into<String>) -> Self {
        self.business_slug = Some(slug.into());
        self
    }

    /// Picks up the stored token and tenant; a slug already set on the client wins.
    pub fn with_session(mut self, session: &AuthSession) -> Self {
        if let Some(token) = session.token() {
            self.token = Some(token.to_string());
        }
        if self.business_slug.is_none() {
            self.business_slug = session.business_slug().map(str::to_string);
        }
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                DeskError::ConfigError {
                    message: format!("token is not a valid header value: {}", e),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(slug) = &self.business_slug {
            let value = HeaderValue::from_str(slug).map_err(|e| DeskError::ConfigError {
                message: format!("business slug is not a valid header value: {}", e),
            })?;
            headers.insert(BUSINESS_SLUG_HEADER, value);
        }

        Ok(headers)
    }

    fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        tracing::debug!("{} {}", method, self.url(endpoint));
        Ok(self
            .client
            .request(method, self.url(endpoint))
            .headers(self.headers()?))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

        tracing::warn!("API error {}: {}", status.as_u16(), message);
        Err(DeskError::api(status.as_u16(), message))
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.fetch(self.request(Method::GET, endpoint)?).await
    }

    async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<T> {
        self.fetch(self.request(Method::GET, endpoint)?.query(query))
            .await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.fetch(self.request(method, endpoint)?.json(body)).await
    }

    /// Single-record responses come either bare or wrapped as `{ "<key>": {...} }`.
    async fn send_record<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
        key: &str,
    ) -> Result<T> {
        let value: serde_json::Value = self.send_json(method, endpoint, body).await?;
        unwrap_record(value, key)
    }
}

fn unwrap_record<T: DeserializeOwned>(mut value: serde_json::Value, key: &str) -> Result<T> {
    let wrapped = value.get(key).map(|v| v.is_object()).unwrap_or(false);
    let inner = if wrapped { value[key].take() } else { value };
    Ok(serde_json::from_value(inner)?)
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarRange {
    start_date: String,
    end_date: String,
}

#[async_trait]
impl BookingApi for RestClient {
    async fn login(&self, email: &str, password: &str, slug: Option<&str>) -> Result<LoginResponse> {
        tracing::info!("Signing in as {}", email);
        self.send_json(
            Method::POST,
            "/api/auth/login",
            &LoginRequest {
                email,
                password,
                slug,
            },
        )
        .await
    }

    async fn me(&self) -> Result<User> {
        let value: serde_json::Value = self.get("/api/auth/me").await?;
        unwrap_record(value, "user")
    }

    async fn create_business(&self, business: &NewBusiness) -> Result<CreatedBusiness> {
        self.send_json(Method::POST, "/api/superadmin/businesses", business)
            .await
    }

    async fn list_businesses(&self) -> Result<Vec<Business>> {
        let list: BusinessList = self.get("/api/superadmin/businesses").await?;
        Ok(list.businesses)
    }

    async fn appointments(&self, query: &ListQuery) -> Result<Vec<Appointment>> {
        let list: AppointmentList = self.get_with_query("/api/appointments", query).await?;
        Ok(list.appointments)
    }

    async fn today_appointments(&self) -> Result<Vec<Appointment>> {
        let list: AppointmentList = self.get("/api/appointments/today").await?;
        Ok(list.appointments)
    }

    async fn appointment_stats(&self) -> Result<AppointmentStats> {
        self.get("/api/appointments/stats").await
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.send_record(Method::POST, "/api/appointments", appointment, "appointment")
            .await
    }

    async fn update_appointment_status(&self, id: &str, status: ReservationStatus) -> Result<Appointment> {
        self.send_record(
            Method::PATCH,
            &format!("/api/appointments/{}/status", id),
            &StatusUpdate { status },
            "appointment",
        )
        .await
    }

    async fn delete_appointment(&self, id: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, &format!("/api/appointments/{}", id))?)
            .await?;
        Ok(())
    }

    async fn reservations(&self, query: &ListQuery) -> Result<Vec<Reservation>> {
        let list: ReservationList = self.get_with_query("/api/reservations", query).await?;
        Ok(list.reservations)
    }

    async fn today_reservations(&self) -> Result<Vec<Reservation>> {
        let list: ReservationList = self.get("/api/reservations/today").await?;
        Ok(list.reservations)
    }

    async fn calendar_reservations(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>> {
        let range = CalendarRange {
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
        };
        let list: CalendarList = self
            .get_with_query("/api/reservations/calendar", &range)
            .await?;
        Ok(list.reservations)
    }

    async fn reservation_stats(&self) -> Result<ReservationStats> {
        self.get("/api/reservations/stats").await
    }

    async fn create_reservation(&self, reservation: &NewReservation) -> Result<Reservation> {
        self.send_record(Method::POST, "/api/reservations", reservation, "reservation")
            .await
    }

    async fn update_reservation_status(&self, id: &str, status: ReservationStatus) -> Result<Reservation> {
        self.send_record(
            Method::PATCH,
            &format!("/api/reservations/{}/status", id),
            &StatusUpdate { status },
            "reservation",
        )
        .await
    }

    async fn customers(&self, query: &ListQuery) -> Result<Vec<Customer>> {
        let list: CustomerList = self.get_with_query("/api/customers", query).await?;
        Ok(list.customers)
    }

    async fn customer(&self, id: &str) -> Result<Customer> {
        let value: serde_json::Value = self.get(&format!("/api/customers/{}", id)).await?;
        unwrap_record(value, "customer")
    }

    async fn customer_stats(&self) -> Result<CustomerStats> {
        self.get("/api/customers/stats").await
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        self.send_record(Method::POST, "/api/customers", customer, "customer")
            .await
    }

    async fn update_customer(&self, id: &str, update: &CustomerUpdate) -> Result<Customer> {
        self.send_record(
            Method::PATCH,
            &format!("/api/customers/{}", id),
            update,
            "customer",
        )
        .await
    }

    async fn waitlist(&self, query: &ListQuery) -> Result<Vec<WaitlistEntry>> {
        let list: WaitlistList = self.get_with_query("/api/waitlist", query).await?;
        Ok(list.waitlist)
    }

    async fn waitlist_stats(&self) -> Result<WaitlistStats> {
        self.get("/api/waitlist/stats").await
    }

    async fn add_to_waitlist(&self, entry: &NewWaitlistEntry) -> Result<WaitlistEntry> {
        self.send_record(Method::POST, "/api/waitlist", entry, "entry")
            .await
    }

    async fn update_waitlist_status(&self, id: &str, status: WaitlistStatus) -> Result<WaitlistEntry> {
        self.send_record(
            Method::PATCH,
            &format!("/api/waitlist/{}/status", id),
            &StatusUpdate { status },
            "entry",
        )
        .await
    }

    async fn services(&self) -> Result<Vec<Service>> {
        let list: ServiceList = self.get("/api/services").await?;
        Ok(list.services)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get("/api/analytics/dashboard").await
    }

    async fn monthly_stats(&self) -> Result<MonthlyStats> {
        self.get("/api/analytics/monthly").await
    }

    async fn top_customers(&self, limit: u32) -> Result<Vec<TopCustomer>> {
        let list: TopCustomerList = self
            .get_with_query("/api/analytics/top-customers", &[("limit", limit)])
            .await?;
        Ok(list.customers)
    }
}
