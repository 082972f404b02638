use crate::domain::model::{Customer, Reservation, WaitlistEntry};
use crate::domain::ports::Storage;
use crate::utils::error::{DeskError, Result};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_FILE: &str = "booking_report.zip";

#[derive(Debug, Serialize)]
struct ReservationRow<'a> {
    id: &'a str,
    date: &'a str,
    time: &'a str,
    customer: &'a str,
    phone: &'a str,
    party_size: u32,
    status: &'static str,
    source: &'static str,
    service: &'a str,
    special_requests: &'a str,
}

impl<'a> From<&'a Reservation> for ReservationRow<'a> {
    fn from(r: &'a Reservation) -> Self {
        Self {
            id: &r.id,
            date: r.reservation_date.get(..10).unwrap_or(&r.reservation_date),
            time: r.reservation_time.as_deref().unwrap_or(""),
            customer: r.customer_name(),
            phone: r.customer_phone(),
            party_size: r.party_size,
            status: r.status.as_str(),
            source: r.source.map(|s| s.label()).unwrap_or(""),
            service: r
                .service_name
                .as_deref()
                .or_else(|| r.services.as_ref().and_then(|s| s.name.as_deref()))
                .unwrap_or(""),
            special_requests: r.special_requests.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Serialize)]
struct CustomerRow<'a> {
    id: &'a str,
    name: &'a str,
    phone: &'a str,
    email: &'a str,
    vip: bool,
    total_visits: u32,
    last_visit: String,
    notes: &'a str,
}

impl<'a> From<&'a Customer> for CustomerRow<'a> {
    fn from(c: &'a Customer) -> Self {
        Self {
            id: &c.id,
            name: &c.name,
            phone: &c.phone,
            email: c.email.as_deref().unwrap_or(""),
            vip: c.is_vip,
            total_visits: c.total_visits,
            last_visit: c.last_visit.map(|d| d.to_string()).unwrap_or_default(),
            notes: c.notes.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Serialize)]
struct WaitlistRow<'a> {
    id: &'a str,
    customer: &'a str,
    phone: &'a str,
    party_size: u32,
    estimated_wait: u32,
    added_at: String,
    status: &'static str,
}

impl<'a> From<&'a WaitlistEntry> for WaitlistRow<'a> {
    fn from(w: &'a WaitlistEntry) -> Self {
        Self {
            id: &w.id,
            customer: &w.customer_name,
            phone: &w.phone,
            party_size: w.party_size,
            estimated_wait: w.estimated_wait,
            added_at: w.added_at.format("%Y-%m-%d %H:%M").to_string(),
            status: w.status.as_str(),
        }
    }
}

fn to_csv<'a, T, R>(items: &'a [T]) -> Result<Vec<u8>>
where
    R: Serialize + From<&'a T>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    for item in items {
        writer.serialize(R::from(item))?;
    }
    writer
        .into_inner()
        .map_err(|e| DeskError::IoError(e.into_error()))
}

pub fn reservations_csv(reservations: &[Reservation]) -> Result<Vec<u8>> {
    to_csv::<_, ReservationRow>(reservations)
}

pub fn customers_csv(customers: &[Customer]) -> Result<Vec<u8>> {
    to_csv::<_, CustomerRow>(customers)
}

pub fn waitlist_csv(entries: &[WaitlistEntry]) -> Result<Vec<u8>> {
    to_csv::<_, WaitlistRow>(entries)
}

/// Everything the "Exportar" action writes, gathered before it is archived.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub reservations: Vec<Reservation>,
    pub customers: Vec<Customer>,
    pub waitlist: Vec<WaitlistEntry>,
}

pub fn bundle(report: &Report) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>("reservations.csv", FileOptions::default())?;
    zip.write_all(&reservations_csv(&report.reservations)?)?;

    zip.start_file::<_, ()>("customers.csv", FileOptions::default())?;
    zip.write_all(&customers_csv(&report.customers)?)?;

    if !report.waitlist.is_empty() {
        zip.start_file::<_, ()>("waitlist.csv", FileOptions::default())?;
        zip.write_all(&waitlist_csv(&report.waitlist)?)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Archives the report and writes it through `storage`, returning the file name.
pub async fn write_report<S: Storage>(storage: &S, report: &Report, file_name: &str) -> Result<String> {
    let data = bundle(report)?;
    tracing::debug!("Writing report ({} bytes) to {}", data.len(), file_name);
    storage.write_file(file_name, &data).await?;
    Ok(file_name.to_string())
}
