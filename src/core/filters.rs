//! In-memory filtering and headline counts for the list views.

use crate::domain::business_types::BusinessType;
use crate::domain::model::*;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// `None` means "all".
pub type StatusFilter = Option<ReservationStatus>;

pub fn by_status(reservations: &[Reservation], filter: StatusFilter) -> Vec<&Reservation> {
    reservations
        .iter()
        .filter(|r| filter.map_or(true, |status| r.status == status))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodayStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub seated: usize,
}

pub fn today_stats(reservations: &[Reservation]) -> TodayStats {
    let count = |status| reservations.iter().filter(|r| r.status == status).count();
    TodayStats {
        total: reservations.len(),
        pending: count(ReservationStatus::Pending),
        confirmed: count(ReservationStatus::Confirmed),
        seated: count(ReservationStatus::Seated),
    }
}

/// Name matches case-insensitively, phone as a raw substring.
pub fn matches_reservation_search(reservation: &Reservation, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    reservation
        .customer_name()
        .to_lowercase()
        .contains(&term.to_lowercase())
        || reservation.customer_phone().contains(term)
}

pub fn search_reservations<'a>(
    reservations: &'a [Reservation],
    term: &str,
    filter: StatusFilter,
) -> Vec<&'a Reservation> {
    reservations
        .iter()
        .filter(|r| matches_reservation_search(r, term))
        .filter(|r| filter.map_or(true, |status| r.status == status))
        .collect()
}

/// Groups by the raw date string so unparseable dates still show up; keys sort ascending.
pub fn group_by_date<'a>(reservations: &[&'a Reservation]) -> BTreeMap<String, Vec<&'a Reservation>> {
    let mut groups: BTreeMap<String, Vec<&Reservation>> = BTreeMap::new();
    for reservation in reservations {
        let key = reservation
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| reservation.reservation_date.clone());
        groups.entry(key).or_default().push(reservation);
    }
    for day in groups.values_mut() {
        day.sort_by_key(|r| r.time());
    }
    groups
}

/// Only today's bookings can be upcoming, so longer windows are clamped to a day.
pub const MAX_UPCOMING_MINUTES: i64 = 24 * 60;

/// Reservations on `now`'s date starting within the next `window_minutes`.
pub fn upcoming(reservations: &[Reservation], now: NaiveDateTime, window_minutes: i64) -> Vec<&Reservation> {
    let window = chrono::Duration::minutes(window_minutes.clamp(0, MAX_UPCOMING_MINUTES));
    let horizon = now.checked_add_signed(window).unwrap_or(NaiveDateTime::MAX);
    let mut upcoming: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| {
            match (r.date(), r.time()) {
                (Some(date), Some(time)) => {
                    let start = date.and_time(time);
                    date == now.date() && start >= now && start <= horizon
                }
                _ => false,
            }
        })
        .collect();
    upcoming.sort_by_key(|r| r.time());
    upcoming
}

pub fn matches_customer_search(customer: &Customer, term: &str) -> bool {
    let needle = term.to_lowercase();
    customer.name.to_lowercase().contains(&needle)
        || customer.phone.contains(term)
        || customer
            .email
            .as_ref()
            .map(|e| e.to_lowercase().contains(&needle))
            .unwrap_or(false)
}

pub fn filter_customers<'a>(customers: &'a [Customer], term: &str, vip_only: bool) -> Vec<&'a Customer> {
    customers
        .iter()
        .filter(|c| matches_customer_search(c, term))
        .filter(|c| !vip_only || c.is_vip)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomerCounts {
    pub total: usize,
    pub vip: usize,
    pub new_this_month: usize,
}

pub fn customer_counts(customers: &[Customer], today: NaiveDate) -> CustomerCounts {
    CustomerCounts {
        total: customers.len(),
        vip: customers.iter().filter(|c| c.is_vip).count(),
        new_this_month: customers
            .iter()
            .filter(|c| {
                c.first_visit
                    .map(|d| d.month() == today.month() && d.year() == today.year())
                    .unwrap_or(false)
            })
            .count(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaitlistBoard<'a> {
    pub active: Vec<&'a WaitlistEntry>,
    pub called: Vec<&'a WaitlistEntry>,
    pub stats: WaitlistStats,
}

pub fn waitlist_board(entries: &[WaitlistEntry]) -> WaitlistBoard<'_> {
    let active: Vec<&WaitlistEntry> = entries
        .iter()
        .filter(|e| e.status == WaitlistStatus::Waiting)
        .collect();
    let called = entries
        .iter()
        .filter(|e| e.status == WaitlistStatus::Called)
        .collect();

    let avg_wait = if active.is_empty() {
        0
    } else {
        let total: u32 = active.iter().map(|e| e.estimated_wait).sum();
        (total as f64 / active.len() as f64).round() as u32
    };

    let stats = WaitlistStats {
        waiting: active.len() as u32,
        avg_wait,
        total_people: active.iter().map(|e| e.party_size).sum(),
    };

    WaitlistBoard {
        active,
        called,
        stats,
    }
}

/// `N min` under an hour, `Hh Mm` after.
pub fn waited_label(added_at: NaiveDateTime, now: NaiveDateTime) -> String {
    let minutes = (now - added_at).num_minutes().max(0);
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusinessCounts {
    pub total: usize,
    pub active: usize,
    pub restaurants: usize,
    pub other_types: usize,
}

pub fn business_counts(businesses: &[Business]) -> BusinessCounts {
    let restaurants = businesses
        .iter()
        .filter(|b| b.business_type == BusinessType::Restaurant.key())
        .count();
    BusinessCounts {
        total: businesses.len(),
        active: businesses.iter().filter(|b| b.is_active).count(),
        restaurants,
        other_types: businesses.len() - restaurants,
    }
}
