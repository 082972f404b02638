use crate::domain::model::*;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove_file(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn business_slug(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn session_dir(&self) -> &str;
}

/// The backend surface the desk talks to.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn login(&self, email: &str, password: &str, slug: Option<&str>) -> Result<LoginResponse>;
    async fn me(&self) -> Result<User>;

    async fn create_business(&self, business: &NewBusiness) -> Result<CreatedBusiness>;
    async fn list_businesses(&self) -> Result<Vec<Business>>;

    async fn appointments(&self, query: &ListQuery) -> Result<Vec<Appointment>>;
    async fn today_appointments(&self) -> Result<Vec<Appointment>>;
    async fn appointment_stats(&self) -> Result<AppointmentStats>;
    async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment>;
    async fn update_appointment_status(&self, id: &str, status: ReservationStatus) -> Result<Appointment>;
    async fn delete_appointment(&self, id: &str) -> Result<()>;

    async fn reservations(&self, query: &ListQuery) -> Result<Vec<Reservation>>;
    async fn today_reservations(&self) -> Result<Vec<Reservation>>;
    async fn calendar_reservations(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CalendarEntry>>;
    async fn reservation_stats(&self) -> Result<ReservationStats>;
    async fn create_reservation(&self, reservation: &NewReservation) -> Result<Reservation>;
    async fn update_reservation_status(&self, id: &str, status: ReservationStatus) -> Result<Reservation>;

    async fn customers(&self, query: &ListQuery) -> Result<Vec<Customer>>;
    async fn customer(&self, id: &str) -> Result<Customer>;
    async fn customer_stats(&self) -> Result<CustomerStats>;
    async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer>;
    async fn update_customer(&self, id: &str, update: &CustomerUpdate) -> Result<Customer>;

    async fn waitlist(&self, query: &ListQuery) -> Result<Vec<WaitlistEntry>>;
    async fn waitlist_stats(&self) -> Result<WaitlistStats>;
    async fn add_to_waitlist(&self, entry: &NewWaitlistEntry) -> Result<WaitlistEntry>;
    async fn update_waitlist_status(&self, id: &str, status: WaitlistStatus) -> Result<WaitlistEntry>;

    async fn services(&self) -> Result<Vec<Service>>;

    async fn dashboard_stats(&self) -> Result<DashboardStats>;
    async fn monthly_stats(&self) -> Result<MonthlyStats>;
    async fn top_customers(&self, limit: u32) -> Result<Vec<TopCustomer>>;
}
