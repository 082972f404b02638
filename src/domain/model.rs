use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Lifecycle of a reservation or appointment. Transitions are enforced by
/// the server; the client only displays and requests them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
    #[serde(other)]
    Unknown,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::NoShow => "no_show",
            ReservationStatus::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pendiente",
            ReservationStatus::Confirmed => "Confirmada",
            ReservationStatus::Seated => "Sentados",
            ReservationStatus::Completed => "Completada",
            ReservationStatus::Cancelled => "Cancelada",
            ReservationStatus::NoShow => "No asistió",
            ReservationStatus::Unknown => "Desconocido",
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "seated" => Ok(Self::Seated),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "no_show" | "noshow" => Ok(Self::NoShow),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Waiting,
    Called,
    Seated,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl WaitlistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitlistStatus::Waiting => "waiting",
            WaitlistStatus::Called => "called",
            WaitlistStatus::Seated => "seated",
            WaitlistStatus::Cancelled => "cancelled",
            WaitlistStatus::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for WaitlistStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "waiting" => Ok(Self::Waiting),
            "called" => Ok(Self::Called),
            "seated" => Ok(Self::Seated),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("unknown waitlist status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingSource {
    Whatsapp,
    Manual,
    Web,
    Phone,
    #[serde(other)]
    Other,
}

impl BookingSource {
    pub fn label(&self) -> &'static str {
        match self {
            BookingSource::Whatsapp => "WhatsApp",
            BookingSource::Manual => "Manual",
            BookingSource::Web => "Web",
            BookingSource::Phone => "Teléfono",
            BookingSource::Other => "Otro",
        }
    }
}

/// Customer fields embedded in a reservation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_vip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    #[serde(default, alias = "business_id")]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customers: Option<CustomerSummary>,
    pub reservation_date: String,
    #[serde(default)]
    pub reservation_time: Option<String>,
    #[serde(default = "default_party_size")]
    pub party_size: u32,
    pub status: ReservationStatus,
    #[serde(default)]
    pub source: Option<BookingSource>,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub special_occasion: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub services: Option<ServiceSummary>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub appointment_time: Option<String>,
    #[serde(default)]
    pub google_calendar_event_id: Option<String>,
    #[serde(default)]
    pub sync_calendar: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub confirmed_at: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
}

fn default_party_size() -> u32 {
    1
}

impl Reservation {
    pub fn customer_name(&self) -> &str {
        self.customers
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or("")
    }

    pub fn customer_phone(&self) -> &str {
        self.customers
            .as_ref()
            .and_then(|c| c.phone.as_deref())
            .unwrap_or("")
    }

    pub fn is_vip(&self) -> bool {
        self.customers.as_ref().map(|c| c.is_vip).unwrap_or(false)
    }

    /// Accepts bare dates as well as full timestamps.
    pub fn date(&self) -> Option<NaiveDate> {
        flexible_date::parse(&self.reservation_date)
    }

    /// `HH:MM`, ignoring any seconds suffix.
    pub fn time(&self) -> Option<NaiveTime> {
        let raw = self.reservation_time.as_deref()?.get(..5)?;
        NaiveTime::parse_from_str(raw, "%H:%M").ok()
    }
}

/// Salon and clinic bookings as stored by the appointments endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    #[serde(default, alias = "business_id")]
    pub restaurant_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub client_name: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub scheduled_date: String,
    pub appointment_time: String,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub services: Option<ServiceSummary>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub google_calendar_event_id: Option<String>,
    #[serde(default)]
    pub sync_calendar: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub confirmed_at: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<String>,
}

/// One booking as placed on the calendar grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: String,
    pub customer_name: String,
    #[serde(default)]
    pub is_vip: bool,
    #[serde(default)]
    pub service: String,
    #[serde(with = "flexible_date")]
    pub date: NaiveDate,
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
    pub status: ReservationStatus,
}

pub(crate) fn default_duration() -> u32 {
    60
}

impl CalendarEntry {
    pub fn start(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(self.time.get(..5)?, "%H:%M").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "isVIP")]
    pub is_vip: bool,
    #[serde(default)]
    pub total_visits: u32,
    #[serde(default, with = "flexible_date::option")]
    pub last_visit: Option<NaiveDate>,
    #[serde(default, with = "flexible_date::option")]
    pub first_visit: Option<NaiveDate>,
    #[serde(default)]
    pub avg_spending: Option<f64>,
    #[serde(default, with = "flexible_date::option")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub favorite_table: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: String,
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    pub party_size: u32,
    #[serde(default)]
    pub estimated_wait: u32,
    #[serde(with = "flexible_datetime")]
    pub added_at: NaiveDateTime,
    pub status: WaitlistStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Timestamps arrive either as RFC 3339 (`...Z`) or as naive local time.
pub(crate) mod flexible_datetime {
    use super::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }
}

/// Dates arrive as `YYYY-MM-DD` or as a full timestamp; only the date part is kept.
pub(crate) mod flexible_date {
    use super::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw)))
    }

    pub mod option {
        use super::{parse, NaiveDate};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.is_empty() => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", raw))),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(alias = "type")]
    pub business_type: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminology {
    pub booking: String,
    pub bookings: String,
    pub customer: String,
    pub customers: String,
    pub resource: String,
    pub resources: String,
    pub staff: String,
    pub capacity: String,
    pub service: String,
    pub services: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    #[serde(rename = "type", alias = "business_type")]
    pub business_type: String,
    #[serde(default)]
    pub terminology: Option<Terminology>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "isSuperAdmin", alias = "is_super_admin")]
    pub is_super_admin: bool,
    #[serde(default)]
    pub business: Option<BusinessSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Stats payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub today_reservations: u32,
    pub today_covers: u32,
    pub vip_customers: u32,
    pub occupancy_rate: f64,
    pub upcoming_reservations: u32,
    pub pending_reservations: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationStats {
    pub total: u32,
    pub pending: u32,
    pub confirmed: u32,
    pub seated: u32,
    pub completed: u32,
    pub cancelled: u32,
}

/// Appointments report the same counters as reservations.
pub type AppointmentStats = ReservationStats;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerStats {
    pub total: u32,
    pub vip: u32,
    pub new_this_month: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitlistStats {
    pub waiting: u32,
    pub avg_wait: u32,
    pub total_people: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodStats {
    pub reservations: f64,
    pub covers: f64,
    pub revenue: f64,
    pub avg_ticket: f64,
    pub occupancy: f64,
    pub no_shows: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyStats {
    pub this_month: PeriodStats,
    pub last_month: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub name: String,
    #[serde(default)]
    pub visits: u32,
    #[serde(default)]
    pub total_spent: f64,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub reservation_date: String,
    pub reservation_time: String,
    pub party_size: u32,
    pub special_occasion: String,
    pub special_requests: String,
    pub source: BookingSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub client_name: String,
    pub client_phone: String,
    pub scheduled_date: String,
    pub appointment_time: String,
    pub service_name: String,
    pub service_id: Option<String>,
    pub duration_minutes: u32,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_calendar_event_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub is_vip: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWaitlistEntry {
    pub customer_name: String,
    pub phone: String,
    pub party_size: u32,
    pub estimated_wait: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusiness {
    pub business_type: String,
    pub name: String,
    pub slug: String,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationList {
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarList {
    #[serde(default)]
    pub reservations: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentList {
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerList {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaitlistList {
    #[serde(default, alias = "entries")]
    pub waitlist: Vec<WaitlistEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessList {
    #[serde(default)]
    pub businesses: Vec<Business>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceList {
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopCustomerList {
    #[serde(default, alias = "topCustomers")]
    pub customers: Vec<TopCustomer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAdmin {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub temporary_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedBusiness {
    pub business: Business,
    pub admin: CreatedAdmin,
}

/// Optional filters for list endpoints; unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_deserializes() {
        let status: ReservationStatus = serde_json::from_str("\"rescheduled\"").unwrap();
        assert_eq!(status, ReservationStatus::Unknown);
        let status: ReservationStatus = serde_json::from_str("\"no_show\"").unwrap();
        assert_eq!(status, ReservationStatus::NoShow);
    }

    #[test]
    fn test_reservation_accessors() {
        let json = serde_json::json!({
            "id": "r1",
            "reservation_date": "2025-10-15T00:00:00.000Z",
            "reservation_time": "21:00:00",
            "party_size": 2,
            "status": "confirmed",
            "source": "manual",
            "customers": {"id": "c1", "name": "María García", "phone": "+34 600 789 012", "is_vip": true}
        });
        let reservation: Reservation = serde_json::from_value(json).unwrap();

        assert_eq!(reservation.date(), NaiveDate::from_ymd_opt(2025, 10, 15));
        assert_eq!(reservation.time(), NaiveTime::from_hms_opt(21, 0, 0));
        assert_eq!(reservation.customer_name(), "María García");
        assert!(reservation.is_vip());
    }

    #[test]
    fn test_user_super_admin_flag_accepts_both_spellings() {
        let camel: User = serde_json::from_value(serde_json::json!({
            "id": "u1", "name": "Root", "email": "root@x.io", "isSuperAdmin": true
        }))
        .unwrap();
        let snake: User = serde_json::from_value(serde_json::json!({
            "id": "u1", "name": "Root", "email": "root@x.io", "is_super_admin": true
        }))
        .unwrap();
        assert!(camel.is_super_admin);
        assert!(snake.is_super_admin);
    }

    #[test]
    fn test_waitlist_timestamp_formats() {
        let zulu: WaitlistEntry = serde_json::from_value(serde_json::json!({
            "id": "w1", "customer_name": "Roberto Gómez", "party_size": 4,
            "added_at": "2025-10-14T19:15:00Z", "status": "waiting"
        }))
        .unwrap();
        let naive: WaitlistEntry = serde_json::from_value(serde_json::json!({
            "id": "w2", "customer_name": "Laura Fernández", "party_size": 2,
            "added_at": "2025-10-14T19:15:00", "status": "called"
        }))
        .unwrap();
        assert_eq!(zulu.added_at, naive.added_at);
        assert_eq!(naive.status, WaitlistStatus::Called);
    }

    #[test]
    fn test_customer_dates_accept_timestamps() {
        let list: CustomerList = serde_json::from_value(serde_json::json!({
            "customers": [{
                "id": "c1", "name": "Juan Pérez", "phone": "+34 600 123 456",
                "first_visit": "2024-03-15", "last_visit": "2025-10-10T00:00:00.000Z",
                "birthday": null
            }, {
                "id": "c2", "name": "María García"
            }]
        }))
        .unwrap();

        assert_eq!(list.customers[0].first_visit, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(list.customers[0].last_visit, NaiveDate::from_ymd_opt(2025, 10, 10));
        assert_eq!(list.customers[0].birthday, None);
        assert_eq!(list.customers[1].last_visit, None);
    }

    #[test]
    fn test_calendar_date_accepts_timestamp() {
        let list: CalendarList = serde_json::from_value(serde_json::json!({
            "reservations": [{
                "id": "1", "customerName": "María García", "date": "2025-10-15T00:00:00.000Z",
                "time": "10:00", "status": "confirmed"
            }]
        }))
        .unwrap();

        assert_eq!(list.reservations[0].date, NaiveDate::from_ymd_opt(2025, 10, 15).unwrap());
        let bad: std::result::Result<CalendarList, _> = serde_json::from_value(serde_json::json!({
            "reservations": [{"id": "2", "customerName": "X", "date": "15/10", "time": "10:00", "status": "pending"}]
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Confirmed".parse::<ReservationStatus>(), Ok(ReservationStatus::Confirmed));
        assert_eq!("no-show".parse::<ReservationStatus>(), Ok(ReservationStatus::NoShow));
        assert!("later".parse::<ReservationStatus>().is_err());
    }
}
