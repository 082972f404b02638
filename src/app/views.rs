//! One method per dashboard page. Each fetches through `BookingApi`, filters
//! in memory and hands back a view model for `render`.

use crate::core::adapter::{appointments_to_reservations, appointment_to_reservation, ReservationDraft};
use crate::core::analytics::{self, ComparisonRow, HourlySlot, SourceShare};
use crate::core::calendar::{self, CalendarGrid, CalendarView};
use crate::core::export::{self, Report};
use crate::core::filters::{self, BusinessCounts, CustomerCounts, StatusFilter, TodayStats};
use crate::core::forms::{BusinessDraft, WaitlistDraft};
use crate::core::session::AuthSession;
use crate::domain::business_types::{BusinessType, BusinessTypeConfig};
use crate::domain::model::*;
use crate::domain::ports::{BookingApi, Storage};
use crate::utils::error::{DeskError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Window the dashboard uses for "upcoming".
pub const UPCOMING_MINUTES: i64 = 120;
pub const TOP_CUSTOMERS_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub business_name: String,
    pub terminology: Terminology,
    pub stats: DashboardStats,
    pub today: TodayStats,
    pub upcoming: Vec<Reservation>,
    pub upcoming_minutes: i64,
    pub summary: Summary,
}

/// Server-side counters shown under the headline cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub bookings: ReservationStats,
    pub customers: CustomerStats,
    pub waitlist: Option<WaitlistStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodayView {
    pub terminology: Terminology,
    pub filter: StatusFilter,
    pub stats: TodayStats,
    pub reservations: Vec<Reservation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationsView {
    pub terminology: Terminology,
    pub search: String,
    pub filter: StatusFilter,
    pub total: usize,
    pub by_date: BTreeMap<String, Vec<Reservation>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomersView {
    pub terminology: Terminology,
    pub counts: CustomerCounts,
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaitlistView {
    pub stats: WaitlistStats,
    pub active: Vec<WaitlistEntry>,
    pub called: Vec<WaitlistEntry>,
    pub now: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub comparison: Vec<ComparisonRow>,
    pub sources: Vec<SourceShare>,
    pub hourly: Vec<HourlySlot>,
    pub top_customers: Vec<TopCustomer>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarPage {
    pub terminology: Terminology,
    pub grid: CalendarGrid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminView {
    pub counts: BusinessCounts,
    pub businesses: Vec<Business>,
}

/// Page controller bound to one signed-in session.
pub struct DeskViews<A: BookingApi> {
    api: A,
    session: AuthSession,
}

impl<A: BookingApi> DeskViews<A> {
    pub fn new(api: A, session: AuthSession) -> Self {
        Self { api, session }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn business(&self) -> BusinessTypeConfig {
        self.session.business_config()
    }

    /// Restaurants book tables through `/reservations`; every other type
    /// books through `/appointments`.
    pub fn uses_appointments(&self) -> bool {
        self.business().kind != BusinessType::Restaurant
    }

    fn business_name(&self) -> String {
        self.session
            .user()
            .and_then(|u| u.business.as_ref())
            .map(|b| b.name.clone())
            .unwrap_or_else(|| self.business().name.to_string())
    }

    async fn todays_bookings(&self) -> Result<Vec<Reservation>> {
        if self.uses_appointments() {
            Ok(appointments_to_reservations(&self.api.today_appointments().await?))
        } else {
            self.api.today_reservations().await
        }
    }

    async fn bookings(&self, query: &ListQuery) -> Result<Vec<Reservation>> {
        if self.uses_appointments() {
            Ok(appointments_to_reservations(&self.api.appointments(query).await?))
        } else {
            self.api.reservations(query).await
        }
    }

    pub async fn summary(&self) -> Result<Summary> {
        let bookings = if self.uses_appointments() {
            self.api.appointment_stats().await?
        } else {
            self.api.reservation_stats().await?
        };
        let waitlist = if self.business().features.waitlist {
            Some(self.api.waitlist_stats().await?)
        } else {
            None
        };
        Ok(Summary {
            bookings,
            customers: self.api.customer_stats().await?,
            waitlist,
        })
    }

    pub async fn dashboard(&self, now: NaiveDateTime, upcoming_minutes: i64) -> Result<DashboardView> {
        self.session.require_authenticated()?;
        tracing::debug!("Loading dashboard");

        let stats = self.api.dashboard_stats().await?;
        let today = self.todays_bookings().await?;
        let upcoming = filters::upcoming(&today, now, upcoming_minutes)
            .into_iter()
            .cloned()
            .collect();

        Ok(DashboardView {
            business_name: self.business_name(),
            terminology: self.session.terminology(),
            stats,
            today: filters::today_stats(&today),
            upcoming,
            upcoming_minutes,
            summary: self.summary().await?,
        })
    }

    pub async fn today(&self, filter: StatusFilter) -> Result<TodayView> {
        self.session.require_authenticated()?;
        let all = self.todays_bookings().await?;
        let mut reservations: Vec<Reservation> =
            filters::by_status(&all, filter).into_iter().cloned().collect();
        reservations.sort_by_key(|r| r.time());

        Ok(TodayView {
            terminology: self.session.terminology(),
            filter,
            stats: filters::today_stats(&all),
            reservations,
        })
    }

    pub async fn reservations(&self, search: &str, filter: StatusFilter) -> Result<ReservationsView> {
        self.session.require_authenticated()?;
        let all = self.bookings(&ListQuery::default()).await?;
        let matched = filters::search_reservations(&all, search, filter);
        let by_date = filters::group_by_date(&matched)
            .into_iter()
            .map(|(date, day)| (date, day.into_iter().cloned().collect()))
            .collect();

        Ok(ReservationsView {
            terminology: self.session.terminology(),
            search: search.to_string(),
            filter,
            total: matched.len(),
            by_date,
        })
    }

    pub async fn customers(&self, search: &str, vip_only: bool, today: NaiveDate) -> Result<CustomersView> {
        self.session.require_authenticated()?;
        let all = self.api.customers(&ListQuery::default()).await?;

        Ok(CustomersView {
            terminology: self.session.terminology(),
            counts: filters::customer_counts(&all, today),
            customers: filters::filter_customers(&all, search, vip_only)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Customer picker for the booking wizard. Terms shorter than two
    /// characters return nothing without calling the API.
    pub async fn find_customers(&self, term: &str) -> Result<Vec<Customer>> {
        self.session.require_authenticated()?;
        if !crate::core::forms::should_search_customers(term) {
            return Ok(Vec::new());
        }
        self.api.customers(&ListQuery::search(term.trim())).await
    }

    pub async fn customer(&self, id: &str) -> Result<Customer> {
        self.session.require_authenticated()?;
        self.api.customer(id).await
    }

    /// Re-reads the signed-in user from the server into the session.
    pub async fn refresh_user(&mut self) -> Result<&User> {
        self.session.require_authenticated()?;
        let user = self.api.me().await?;
        self.session.set_user(user);
        self.session.require_authenticated()
    }

    fn require_waitlist(&self) -> Result<()> {
        let business = self.business();
        if !business.features.waitlist {
            return Err(DeskError::PermissionDenied(format!(
                "the waitlist is not enabled for {}",
                business.name
            )));
        }
        Ok(())
    }

    pub async fn waitlist(&self, now: NaiveDateTime) -> Result<WaitlistView> {
        self.session.require_authenticated()?;
        self.require_waitlist()?;
        let entries = self.api.waitlist(&ListQuery::default()).await?;
        let board = filters::waitlist_board(&entries);

        Ok(WaitlistView {
            stats: board.stats.clone(),
            active: board.active.into_iter().cloned().collect(),
            called: board.called.into_iter().cloned().collect(),
            now,
        })
    }

    pub async fn analytics(&self, top_limit: u32) -> Result<AnalyticsView> {
        self.session.require_authenticated()?;
        let monthly = self.api.monthly_stats().await?;
        let top_customers = self.api.top_customers(top_limit).await?;
        let bookings = self.bookings(&ListQuery::default()).await?;

        Ok(AnalyticsView {
            comparison: analytics::period_comparison(&monthly),
            sources: analytics::source_breakdown(&bookings),
            hourly: analytics::hourly_breakdown(&bookings),
            top_customers,
        })
    }

    /// Fetch failures are returned to the caller; the grid is never filled
    /// with placeholder entries.
    pub async fn calendar(&self, anchor: NaiveDate, view: CalendarView, now: NaiveDateTime) -> Result<CalendarPage> {
        self.session.require_authenticated()?;
        let (start, end) = calendar::date_range(anchor, view);
        tracing::debug!("Loading calendar {} .. {}", start, end);

        let entries = self.api.calendar_reservations(start, end).await?;
        Ok(CalendarPage {
            terminology: self.session.terminology(),
            grid: CalendarGrid::build(anchor, view, &entries, now),
        })
    }

    pub async fn admin(&self) -> Result<AdminView> {
        self.session.require_super_admin()?;
        let businesses = self.api.list_businesses().await?;
        Ok(AdminView {
            counts: filters::business_counts(&businesses),
            businesses,
        })
    }

    pub async fn create_business(&self, draft: &BusinessDraft) -> Result<CreatedBusiness> {
        self.session.require_super_admin()?;
        let payload = draft.to_payload()?;
        let created = self.api.create_business(&payload).await?;
        tracing::info!("Created business {} ({})", created.business.name, created.business.slug);
        Ok(created)
    }

    /// Creates a booking the way the tenant's type expects and returns it in
    /// reservation shape.
    pub async fn book(&self, draft: &ReservationDraft) -> Result<Reservation> {
        self.session.require_authenticated()?;
        if self.uses_appointments() {
            let payload = draft.to_new_appointment()?;
            let created = self.api.create_appointment(&payload).await?;
            appointment_to_reservation(&created)
        } else {
            let payload = draft.to_new_reservation()?;
            self.api.create_reservation(&payload).await
        }
    }

    pub async fn services(&self) -> Result<Vec<Service>> {
        self.session.require_authenticated()?;
        self.api.services().await
    }

    pub async fn set_status(&self, id: &str, status: ReservationStatus) -> Result<Reservation> {
        self.session.require_authenticated()?;
        if status == ReservationStatus::Unknown {
            return Err(DeskError::validation("status", "unknown status"));
        }
        if self.uses_appointments() {
            let updated = self.api.update_appointment_status(id, status).await?;
            appointment_to_reservation(&updated)
        } else {
            self.api.update_reservation_status(id, status).await
        }
    }

    pub async fn cancel_appointment(&self, id: &str) -> Result<()> {
        self.session.require_authenticated()?;
        self.api.delete_appointment(id).await
    }

    pub async fn add_to_waitlist(&self, draft: &WaitlistDraft) -> Result<WaitlistEntry> {
        self.session.require_authenticated()?;
        self.require_waitlist()?;
        self.api.add_to_waitlist(&draft.to_payload()?).await
    }

    pub async fn set_waitlist_status(&self, id: &str, status: WaitlistStatus) -> Result<WaitlistEntry> {
        self.session.require_authenticated()?;
        self.require_waitlist()?;
        self.api.update_waitlist_status(id, status).await
    }

    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer> {
        self.session.require_authenticated()?;
        crate::utils::validation::require_non_empty("name", &customer.name, "El nombre es obligatorio")?;
        crate::utils::validation::require_non_empty("phone", &customer.phone, "El teléfono es obligatorio")?;
        self.api.create_customer(customer).await
    }

    pub async fn update_customer(&self, id: &str, update: &CustomerUpdate) -> Result<Customer> {
        self.session.require_authenticated()?;
        self.api.update_customer(id, update).await
    }

    /// Collects bookings, customers and (when enabled) the waitlist and writes
    /// the archive through `storage`.
    pub async fn export<S: Storage>(&self, storage: &S, file_name: &str) -> Result<String> {
        self.session.require_authenticated()?;
        let report = Report {
            reservations: self.bookings(&ListQuery::default()).await?,
            customers: self.api.customers(&ListQuery::default()).await?,
            waitlist: if self.business().features.waitlist {
                self.api.waitlist(&ListQuery::default()).await?
            } else {
                Vec::new()
            },
        };
        let written = export::write_report(storage, &report, file_name).await?;
        tracing::info!(
            "Exported {} bookings and {} customers to {}",
            report.reservations.len(),
            report.customers.len(),
            written
        );
        Ok(written)
    }
}
