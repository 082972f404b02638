use async_trait::async_trait;
use booking_desk::core::adapter::ReservationDraft;
use booking_desk::core::calendar::CalendarView;
use booking_desk::core::forms::{BusinessDraft, WaitlistDraft};
use booking_desk::domain::business_types::BusinessType;
use booking_desk::domain::model::*;
use booking_desk::utils::error::{DeskError, Result};
use booking_desk::{AuthSession, BookingApi, DeskViews, LocalStorage};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use std::sync::Mutex;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

/// In-memory backend that records which endpoints were hit.
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<&'static str>>,
    fail_calendar: bool,
}

impl FakeApi {
    fn hit(&self, endpoint: &'static str) {
        self.calls.lock().unwrap().push(endpoint);
    }

    fn called(&self, endpoint: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| *c == endpoint)
    }
}

fn reservations() -> Vec<Reservation> {
    serde_json::from_value(json!([
        {"id": "1", "reservation_date": "2025-10-15", "reservation_time": "14:00", "party_size": 4,
         "status": "confirmed", "source": "whatsapp",
         "customers": {"id": "c1", "name": "Juan Pérez", "phone": "+34 600 123 456", "is_vip": true}},
        {"id": "2", "reservation_date": "2025-10-15", "reservation_time": "21:00", "party_size": 2,
         "status": "pending", "source": "manual",
         "customers": {"id": "c2", "name": "María García", "phone": "+34 600 789 012"}},
        {"id": "3", "reservation_date": "2025-10-16", "reservation_time": "13:30", "party_size": 6,
         "status": "seated", "source": "whatsapp",
         "customers": {"id": "c3", "name": "Carlos López", "phone": "+34 600 345 678"}}
    ]))
    .unwrap()
}

fn appointments() -> Vec<Appointment> {
    serde_json::from_value(json!([
        {"id": "a1", "client_name": "Isabel Torres", "client_phone": "611",
         "scheduled_date": "2025-10-15T00:00:00.000Z", "appointment_time": "2025-10-15T14:30:00.000Z",
         "service_name": "Corte", "duration_minutes": 30, "status": "confirmed"}
    ]))
    .unwrap()
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn login(&self, _email: &str, _password: &str, _slug: Option<&str>) -> Result<LoginResponse> {
        Err(DeskError::api(401, "not used"))
    }

    async fn me(&self) -> Result<User> {
        self.hit("me");
        Ok(user("restaurant", false))
    }

    async fn create_business(&self, business: &NewBusiness) -> Result<CreatedBusiness> {
        self.hit("create_business");
        Ok(serde_json::from_value(json!({
            "business": {"id": "b9", "name": business.name, "slug": business.slug,
                         "business_type": business.business_type, "is_active": true},
            "admin": {"name": business.admin_name, "email": business.admin_email}
        }))?)
    }

    async fn list_businesses(&self) -> Result<Vec<Business>> {
        self.hit("list_businesses");
        Ok(serde_json::from_value(json!([
            {"id": "1", "name": "El Buen Sabor", "slug": "buen-sabor", "business_type": "restaurant", "is_active": true},
            {"id": "2", "name": "Salón Laura", "slug": "salon-laura", "business_type": "beauty_salon", "is_active": true}
        ]))?)
    }

    async fn appointments(&self, _query: &ListQuery) -> Result<Vec<Appointment>> {
        self.hit("appointments");
        Ok(appointments())
    }

    async fn today_appointments(&self) -> Result<Vec<Appointment>> {
        self.hit("today_appointments");
        Ok(appointments())
    }

    async fn appointment_stats(&self) -> Result<AppointmentStats> {
        self.hit("appointment_stats");
        Ok(AppointmentStats::default())
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.hit("create_appointment");
        Ok(serde_json::from_value(json!({
            "id": "a2",
            "client_name": appointment.client_name,
            "client_phone": appointment.client_phone,
            "scheduled_date": appointment.scheduled_date,
            "appointment_time": appointment.appointment_time,
            "service_name": appointment.service_name,
            "duration_minutes": appointment.duration_minutes,
            "status": "pending"
        }))?)
    }

    async fn update_appointment_status(&self, id: &str, status: ReservationStatus) -> Result<Appointment> {
        self.hit("update_appointment_status");
        let mut a = appointments().remove(0);
        a.id = id.to_string();
        a.status = status;
        Ok(a)
    }

    async fn delete_appointment(&self, _id: &str) -> Result<()> {
        self.hit("delete_appointment");
        Ok(())
    }

    async fn reservations(&self, _query: &ListQuery) -> Result<Vec<Reservation>> {
        self.hit("reservations");
        Ok(reservations())
    }

    async fn today_reservations(&self) -> Result<Vec<Reservation>> {
        self.hit("today_reservations");
        Ok(reservations().into_iter().filter(|r| r.reservation_date == "2025-10-15").collect())
    }

    async fn calendar_reservations(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>> {
        self.hit("calendar_reservations");
        if self.fail_calendar {
            return Err(DeskError::api(500, "calendar unavailable"));
        }
        assert!(start <= end);
        Ok(serde_json::from_value(json!([
            {"id": "1", "customerName": "María García", "isVip": true, "service": "Corte + Tinte",
             "date": "2025-10-15", "time": "10:00", "duration": 90, "status": "confirmed"}
        ]))?)
    }

    async fn reservation_stats(&self) -> Result<ReservationStats> {
        self.hit("reservation_stats");
        Ok(ReservationStats {
            total: 42,
            ..ReservationStats::default()
        })
    }

    async fn create_reservation(&self, reservation: &NewReservation) -> Result<Reservation> {
        self.hit("create_reservation");
        Ok(serde_json::from_value(json!({
            "id": "r10",
            "reservation_date": reservation.reservation_date,
            "reservation_time": reservation.reservation_time,
            "party_size": reservation.party_size,
            "status": "pending",
            "customers": {"name": reservation.customer_name, "phone": reservation.customer_phone}
        }))?)
    }

    async fn update_reservation_status(&self, id: &str, status: ReservationStatus) -> Result<Reservation> {
        self.hit("update_reservation_status");
        let mut r = reservations().remove(0);
        r.id = id.to_string();
        r.status = status;
        Ok(r)
    }

    async fn customers(&self, query: &ListQuery) -> Result<Vec<Customer>> {
        self.hit(if query.search.is_some() { "customers_search" } else { "customers" });
        Ok(serde_json::from_value(json!([
            {"id": "c1", "name": "Juan Pérez", "phone": "+34 600 123 456", "is_vip": true, "first_visit": "2024-03-15"},
            {"id": "c2", "name": "María García", "phone": "+34 600 789 012", "is_vip": false, "first_visit": "2025-10-03"}
        ]))?)
    }

    async fn customer(&self, id: &str) -> Result<Customer> {
        self.hit("customer");
        Err(DeskError::NotFound {
            entity: "customer".to_string(),
            id: id.to_string(),
        })
    }

    async fn customer_stats(&self) -> Result<CustomerStats> {
        self.hit("customer_stats");
        Ok(CustomerStats::default())
    }

    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        self.hit("create_customer");
        Ok(serde_json::from_value(json!({"id": "c9", "name": customer.name, "phone": customer.phone}))?)
    }

    async fn update_customer(&self, id: &str, _update: &CustomerUpdate) -> Result<Customer> {
        self.hit("update_customer");
        Ok(serde_json::from_value(json!({"id": id, "name": "Juan Pérez", "phone": "600", "is_vip": true}))?)
    }

    async fn waitlist(&self, _query: &ListQuery) -> Result<Vec<WaitlistEntry>> {
        self.hit("waitlist");
        Ok(serde_json::from_value(json!([
            {"id": "w1", "customer_name": "Roberto Gómez", "party_size": 4, "estimated_wait": 25,
             "added_at": "2025-10-15T19:15:00", "status": "waiting"},
            {"id": "w2", "customer_name": "Carmen Ruiz", "party_size": 3, "estimated_wait": 20,
             "added_at": "2025-10-15T19:30:00", "status": "called"}
        ]))?)
    }

    async fn waitlist_stats(&self) -> Result<WaitlistStats> {
        self.hit("waitlist_stats");
        Ok(WaitlistStats::default())
    }

    async fn add_to_waitlist(&self, entry: &NewWaitlistEntry) -> Result<WaitlistEntry> {
        self.hit("add_to_waitlist");
        Ok(serde_json::from_value(json!({
            "id": "w3", "customer_name": entry.customer_name, "phone": entry.phone,
            "party_size": entry.party_size, "estimated_wait": entry.estimated_wait,
            "added_at": "2025-10-15T20:00:00", "status": "waiting"
        }))?)
    }

    async fn update_waitlist_status(&self, id: &str, status: WaitlistStatus) -> Result<WaitlistEntry> {
        self.hit("update_waitlist_status");
        let mut entry = self.waitlist(&ListQuery::default()).await?.remove(0);
        entry.id = id.to_string();
        entry.status = status;
        Ok(entry)
    }

    async fn services(&self) -> Result<Vec<Service>> {
        self.hit("services");
        Ok(Vec::new())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.hit("dashboard_stats");
        Ok(DashboardStats {
            today_reservations: 2,
            ..DashboardStats::default()
        })
    }

    async fn monthly_stats(&self) -> Result<MonthlyStats> {
        self.hit("monthly_stats");
        Ok(MonthlyStats::default())
    }

    async fn top_customers(&self, limit: u32) -> Result<Vec<TopCustomer>> {
        self.hit("top_customers");
        assert_eq!(limit, 3);
        Ok(Vec::new())
    }
}

fn user(business_type: &str, super_admin: bool) -> User {
    serde_json::from_value(json!({
        "id": "u1",
        "name": "Admin",
        "email": "admin@example.es",
        "isSuperAdmin": super_admin,
        "business": {"id": "b1", "name": "Mi Negocio", "slug": "mi-negocio", "type": business_type}
    }))
    .unwrap()
}

fn views_for(business_type: &str, super_admin: bool) -> DeskViews<FakeApi> {
    let mut session = AuthSession::new();
    session.login(user(business_type, super_admin), "tok");
    DeskViews::new(FakeApi::default(), session)
}

fn at(date: &str, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M").unwrap()
}

#[tokio::test]
async fn test_signed_out_views_are_refused() {
    let views = DeskViews::new(FakeApi::default(), AuthSession::new());

    let err = views.today(None).await.unwrap_err();
    assert!(matches!(err, DeskError::NotAuthenticated));
    assert!(views.api().calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_restaurant_dashboard_uses_reservations() {
    let views = views_for("restaurant", false);
    let view = views.dashboard(at("2025-10-15", "13:00"), 120).await.unwrap();

    assert_eq!(view.business_name, "Mi Negocio");
    assert_eq!(view.terminology.bookings, "Reservas");
    assert_eq!(view.today.total, 2);
    assert_eq!(view.upcoming.len(), 1);
    assert_eq!(view.summary.bookings.total, 42);
    assert!(view.summary.waitlist.is_some());
    assert!(views.api().called("today_reservations"));
    assert!(!views.api().called("today_appointments"));
}

#[tokio::test]
async fn test_salon_books_through_appointments() {
    let views = views_for("beauty_salon", false);

    let today = views.today(None).await.unwrap();
    assert_eq!(today.reservations.len(), 1);
    assert_eq!(today.reservations[0].customer_name(), "Isabel Torres");
    assert_eq!(today.terminology.booking, "Cita");

    let mut draft = ReservationDraft::for_appointment(NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
    draft.customer_name = "Ana López".to_string();
    draft.customer_phone = "622".to_string();
    let booked = views.book(&draft).await.unwrap();

    assert_eq!(booked.reservation_date, "2025-10-20");
    assert_eq!(booked.reservation_time.as_deref(), Some("10:00"));
    assert!(views.api().called("create_appointment"));
    assert!(!views.api().called("create_reservation"));
}

#[tokio::test]
async fn test_reservations_search_and_grouping() {
    let views = views_for("restaurant", false);
    let view = views.reservations("", Some(ReservationStatus::Pending)).await.unwrap();
    assert_eq!(view.total, 1);
    assert_eq!(view.by_date.len(), 1);

    let view = views.reservations("600", None).await.unwrap();
    assert_eq!(view.total, 3);
    assert_eq!(view.by_date.keys().cloned().collect::<Vec<_>>(), vec!["2025-10-15", "2025-10-16"]);
}

#[tokio::test]
async fn test_customer_picker_needs_two_characters() {
    let views = views_for("restaurant", false);

    assert!(views.find_customers("j").await.unwrap().is_empty());
    assert!(!views.api().called("customers_search"));

    assert_eq!(views.find_customers("ju").await.unwrap().len(), 2);
    assert!(views.api().called("customers_search"));
}

#[tokio::test]
async fn test_customers_view_counts() {
    let views = views_for("restaurant", false);
    let view = views
        .customers("", true, NaiveDate::from_ymd_opt(2025, 10, 19).unwrap())
        .await
        .unwrap();

    assert_eq!(view.customers.len(), 1);
    assert_eq!(view.counts.total, 2);
    assert_eq!(view.counts.new_this_month, 1);
}

#[tokio::test]
async fn test_waitlist_disabled_for_salons() {
    let salon = views_for("beauty_salon", false);
    let err = salon.waitlist(at("2025-10-15", "20:00")).await.unwrap_err();
    assert!(matches!(err, DeskError::PermissionDenied(_)));

    let restaurant = views_for("restaurant", false);
    let view = restaurant.waitlist(at("2025-10-15", "20:00")).await.unwrap();
    assert_eq!(view.active.len(), 1);
    assert_eq!(view.called.len(), 1);
    assert_eq!(view.stats.total_people, 4);

    let entry = restaurant
        .add_to_waitlist(&WaitlistDraft {
            customer_name: "Diego Torres".to_string(),
            phone: "633".to_string(),
            party_size: 2,
            estimated_wait: 10,
            notes: None,
        })
        .await
        .unwrap();
    assert_eq!(entry.customer_name, "Diego Torres");
}

#[tokio::test]
async fn test_calendar_failure_is_not_masked() {
    let mut session = AuthSession::new();
    session.login(user("beauty_salon", false), "tok");
    let views = DeskViews::new(
        FakeApi {
            fail_calendar: true,
            ..FakeApi::default()
        },
        session,
    );

    let anchor = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
    let err = views
        .calendar(anchor, CalendarView::Week, at("2025-10-15", "09:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::ApiError { status: 500, .. }));
}

#[tokio::test]
async fn test_calendar_grid_for_the_week() {
    let views = views_for("beauty_salon", false);
    let anchor = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
    let page = views
        .calendar(anchor, CalendarView::Week, at("2025-10-15", "09:00"))
        .await
        .unwrap();

    assert_eq!(page.grid.days.len(), 7);
    assert_eq!(page.grid.entries.len(), 1);
    assert_eq!(page.grid.entries[0].placement.day_index, 2);
    assert!(page.grid.indicator.is_some());
}

#[tokio::test]
async fn test_analytics_uses_configured_limit() {
    let views = views_for("restaurant", false);
    let view = views.analytics(3).await.unwrap();

    assert_eq!(view.comparison.len(), 6);
    assert_eq!(view.sources[0].source, BookingSource::Whatsapp);
    assert_eq!(view.sources[0].reservations, 2);
    assert_eq!(view.hourly.len(), 3);
}

#[tokio::test]
async fn test_admin_requires_super_admin() {
    let owner = views_for("restaurant", false);
    assert!(matches!(
        owner.admin().await.unwrap_err(),
        DeskError::PermissionDenied(_)
    ));
    assert!(!owner.api().called("list_businesses"));

    let admin = views_for("restaurant", true);
    let view = admin.admin().await.unwrap();
    assert_eq!(view.counts.total, 2);
    assert_eq!(view.counts.restaurants, 1);

    let mut draft = BusinessDraft::named(BusinessType::Barbershop, "Barbería Núñez");
    draft.admin_name = "Pablo".to_string();
    draft.admin_email = "pablo@barberia.es".to_string();
    draft.admin_password = "12345678".to_string();
    let created = admin.create_business(&draft).await.unwrap();
    assert_eq!(created.business.slug, "barberia-nunez");
}

#[tokio::test]
async fn test_status_change_rejects_unknown() {
    let views = views_for("restaurant", false);
    assert_err!(views.set_status("1", ReservationStatus::Unknown).await);

    let updated = assert_ok!(views.set_status("1", ReservationStatus::Seated).await);
    assert_eq!(updated.status, ReservationStatus::Seated);
    assert!(views.api().called("update_reservation_status"));
}

#[tokio::test]
async fn test_export_writes_report_to_disk() {
    let dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(dir.path().to_string_lossy());
    let views = views_for("restaurant", false);

    let written = views.export(&storage, "report.zip").await.unwrap();

    let bytes = std::fs::read(dir.path().join(&written)).unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 3);
}
