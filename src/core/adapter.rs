//! Bridges the appointments API (salons, clinics) and the reservation shape
//! the list views and calendar work with.

use crate::domain::model::flexible_datetime;
use crate::domain::model::*;
use crate::utils::error::{DeskError, Result};

const DEFAULT_SERVICE_NAME: &str = "Servicio";
const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Fields collected by the booking wizard before they are turned into a payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationDraft {
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub reservation_date: String,
    pub reservation_time: String,
    pub party_size: u32,
    pub special_occasion: String,
    pub special_requests: String,
    pub service_id: Option<String>,
    pub service_name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub google_calendar_event_id: Option<String>,
}

fn parse_utc(field: &str, raw: &str) -> Result<chrono::NaiveDateTime> {
    flexible_datetime::parse(raw)
        .ok_or_else(|| DeskError::validation(field, format!("'{}' is not a timestamp", raw)))
}

pub fn appointment_to_reservation(appointment: &Appointment) -> Result<Reservation> {
    let scheduled = parse_utc("scheduled_date", &appointment.scheduled_date)?;
    let start = parse_utc("appointment_time", &appointment.appointment_time)?;

    let services = appointment.services.clone().or_else(|| {
        Some(ServiceSummary {
            id: appointment.service_id.clone(),
            name: appointment.service_name.clone(),
        })
    });

    Ok(Reservation {
        id: appointment.id.clone(),
        restaurant_id: appointment.restaurant_id.clone(),
        customer_id: appointment.conversation_id.clone(),
        customers: Some(CustomerSummary {
            id: appointment.conversation_id.clone(),
            name: appointment.client_name.clone(),
            phone: appointment.client_phone.clone(),
            email: None,
            is_vip: false,
        }),
        reservation_date: scheduled.format("%Y-%m-%d").to_string(),
        reservation_time: Some(start.format("%H:%M").to_string()),
        party_size: 1,
        status: appointment.status,
        source: Some(BookingSource::Whatsapp),
        table: None,
        special_occasion: None,
        special_requests: appointment.notes.clone(),
        notes: appointment.notes.clone(),
        service_id: appointment.service_id.clone(),
        services,
        service_name: appointment.service_name.clone(),
        duration_minutes: appointment.duration_minutes,
        scheduled_date: Some(appointment.scheduled_date.clone()),
        appointment_time: Some(appointment.appointment_time.clone()),
        google_calendar_event_id: appointment.google_calendar_event_id.clone(),
        sync_calendar: appointment.sync_calendar,
        created_at: appointment.created_at.clone(),
        updated_at: appointment.updated_at.clone(),
        confirmed_at: appointment.confirmed_at.clone(),
        cancelled_at: appointment.cancelled_at.clone(),
    })
}

/// Records with unparseable timestamps are skipped with a warning.
pub fn appointments_to_reservations(appointments: &[Appointment]) -> Vec<Reservation> {
    appointments
        .iter()
        .filter_map(|a| match appointment_to_reservation(a) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!("Skipping appointment {}: {}", a.id, e);
                None
            }
        })
        .collect()
}

/// `YYYY-MM-DDTHH:MM:00Z`, used for both scheduled date and start time.
pub fn scheduled_timestamp(date: &str, time: &str) -> String {
    format!("{}T{}:00Z", date, time)
}

pub fn reservation_draft_to_appointment(draft: &ReservationDraft) -> NewAppointment {
    let scheduled = scheduled_timestamp(&draft.reservation_date, &draft.reservation_time);

    NewAppointment {
        client_name: draft.customer_name.clone(),
        client_phone: draft.customer_phone.clone(),
        scheduled_date: scheduled.clone(),
        appointment_time: scheduled,
        service_name: draft
            .service_name
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        service_id: draft.service_id.clone(),
        duration_minutes: draft.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
        notes: draft.special_requests.clone(),
        google_calendar_event_id: draft.google_calendar_event_id.clone(),
    }
}

/// Calendar placement needs a date and a start time; anything else is left out.
pub fn reservation_to_calendar_entry(reservation: &Reservation) -> Option<CalendarEntry> {
    let date = reservation.date()?;
    let time = reservation.time()?;
    let service = reservation
        .service_name
        .clone()
        .or_else(|| reservation.services.as_ref().and_then(|s| s.name.clone()))
        .unwrap_or_default();

    Some(CalendarEntry {
        id: reservation.id.clone(),
        customer_name: reservation.customer_name().to_string(),
        is_vip: reservation.is_vip(),
        service,
        date,
        time: time.format("%H:%M").to_string(),
        duration: reservation
            .duration_minutes
            .unwrap_or(DEFAULT_DURATION_MINUTES),
        status: reservation.status,
    })
}
