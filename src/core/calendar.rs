//! Calendar grid layout: 48 half-hour rows by one or seven day columns.
//!
//! Everything here is a pure function of the anchor date, the view, the
//! entries on screen and "now", so callers inject the clock.

use crate::domain::model::{CalendarEntry, ReservationStatus};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

pub const SLOT_MINUTES: u32 = 30;
pub const SLOTS_PER_DAY: usize = 48;
pub const SLOT_HEIGHT_PX: f64 = 60.0;
/// Height of the sticky day header above the first row.
pub const HEADER_OFFSET_PX: f64 = 48.0;
pub const CARD_PADDING_PX: f64 = 8.0;
pub const ENTRY_Z_INDEX: u8 = 5;
/// Column 1 holds the hour labels.
const FIRST_DAY_COLUMN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    #[default]
    Week,
}

impl std::str::FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "dia" | "día" => Ok(CalendarView::Day),
            "week" | "semana" => Ok(CalendarView::Week),
            other => Err(format!("unknown calendar view '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
}

impl TimeSlot {
    pub fn minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn is_full_hour(&self) -> bool {
        self.minute == 0
    }

    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }
}

pub fn time_slots() -> Vec<TimeSlot> {
    (0..24)
        .flat_map(|hour| [TimeSlot { hour, minute: 0 }, TimeSlot { hour, minute: 30 }])
        .collect()
}

/// Monday of the week containing `date`; Sunday belongs to the week before.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn visible_days(anchor: NaiveDate, view: CalendarView) -> Vec<NaiveDate> {
    match view {
        CalendarView::Day => vec![anchor],
        CalendarView::Week => {
            let monday = start_of_week(anchor);
            (0..7).map(|i| monday + Duration::days(i)).collect()
        }
    }
}

/// First and last visible day, sent as `startDate`/`endDate`.
pub fn date_range(anchor: NaiveDate, view: CalendarView) -> (NaiveDate, NaiveDate) {
    match view {
        CalendarView::Day => (anchor, anchor),
        CalendarView::Week => {
            let monday = start_of_week(anchor);
            (monday, monday + Duration::days(6))
        }
    }
}

fn step(view: CalendarView) -> Duration {
    match view {
        CalendarView::Day => Duration::days(1),
        CalendarView::Week => Duration::days(7),
    }
}

/// Moves `offset` screens forward, or back when negative. `None` once the
/// result leaves chrono's date range.
pub fn shift(anchor: NaiveDate, view: CalendarView, offset: i64) -> Option<NaiveDate> {
    let days = step(view).num_days().checked_mul(offset)?;
    anchor.checked_add_signed(Duration::try_days(days)?)
}

pub fn is_today(day: NaiveDate, now: NaiveDateTime) -> bool {
    day == now.date()
}

pub fn is_past_slot(day: NaiveDate, slot: TimeSlot, now: NaiveDateTime) -> bool {
    day.and_time(slot.time()) < now
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// An entry covers `[start, start + duration)` on its own date.
pub fn is_slot_occupied(day: NaiveDate, slot: TimeSlot, entries: &[CalendarEntry]) -> bool {
    let slot_minutes = slot.minutes();
    entries.iter().any(|entry| {
        if entry.date != day {
            return false;
        }
        match entry.start() {
            Some(start) => {
                let start = minutes_of(start);
                slot_minutes >= start && slot_minutes < start + entry.duration
            }
            None => false,
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Past,
    Occupied,
    Free,
}

impl SlotState {
    /// Only free slots take a new booking.
    pub fn accepts_booking(&self) -> bool {
        matches!(self, SlotState::Free)
    }
}

pub fn slot_state(
    day: NaiveDate,
    slot: TimeSlot,
    entries: &[CalendarEntry],
    now: NaiveDateTime,
) -> SlotState {
    if is_past_slot(day, slot, now) {
        SlotState::Past
    } else if is_slot_occupied(day, slot, entries) {
        SlotState::Occupied
    } else {
        SlotState::Free
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub day_index: usize,
    pub top_px: f64,
    pub grid_column: usize,
    pub z_index: u8,
}

pub fn entry_placement(entry: &CalendarEntry, days: &[NaiveDate]) -> Option<Placement> {
    let day_index = days.iter().position(|d| *d == entry.date)?;
    let start = entry.start()?;
    let slot_index = minutes_of(start) as f64 / SLOT_MINUTES as f64;

    Some(Placement {
        day_index,
        top_px: slot_index * SLOT_HEIGHT_PX,
        grid_column: day_index + FIRST_DAY_COLUMN,
        z_index: ENTRY_Z_INDEX,
    })
}

pub fn card_height(duration_minutes: u32) -> f64 {
    duration_minutes as f64 / SLOT_MINUTES as f64 * SLOT_HEIGHT_PX - CARD_PADDING_PX
}

/// Long entries have room for a duration footer.
pub fn shows_duration(entry: &CalendarEntry) -> bool {
    entry.duration >= 60
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeIndicator {
    pub day_index: usize,
    pub top_px: f64,
    pub label: String,
}

pub fn current_time_indicator(days: &[NaiveDate], now: NaiveDateTime) -> Option<TimeIndicator> {
    let day_index = days.iter().position(|d| is_today(*d, now))?;
    let minutes = minutes_of(now.time()) as f64;

    Some(TimeIndicator {
        day_index,
        top_px: minutes / SLOT_MINUTES as f64 * SLOT_HEIGHT_PX + HEADER_OFFSET_PX,
        label: now.format("%H:%M").to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceColor {
    Blue,
    Purple,
    Pink,
    Green,
    Indigo,
    Orange,
    Cyan,
    Gray,
}

const SERVICE_COLORS: &[(&[&str], ServiceColor)] = &[
    (&["corte"], ServiceColor::Blue),
    (&["tinte", "color"], ServiceColor::Purple),
    (&["manicura", "uñas"], ServiceColor::Pink),
    (&["facial", "tratamiento"], ServiceColor::Green),
    (&["masaje"], ServiceColor::Indigo),
    (&["depilación", "laser"], ServiceColor::Orange),
    (&["maquillaje"], ServiceColor::Cyan),
];

/// First keyword match wins, so "Corte + Tinte" is blue.
pub fn service_color(service: &str) -> ServiceColor {
    let service = service.to_lowercase();
    SERVICE_COLORS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| service.contains(k)))
        .map(|(_, color)| *color)
        .unwrap_or(ServiceColor::Gray)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    Dashed,
    Solid,
    Faded,
}

pub fn status_style(status: ReservationStatus) -> StatusStyle {
    match status {
        ReservationStatus::Pending => StatusStyle::Dashed,
        ReservationStatus::Completed => StatusStyle::Faded,
        _ => StatusStyle::Solid,
    }
}

const WEEKDAYS_LONG: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];
const WEEKDAYS_SHORT: [&str; 7] = ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"];
const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];
const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

pub fn weekday_short(day: NaiveDate) -> &'static str {
    WEEKDAYS_SHORT[weekday_index(day.weekday())]
}

/// `lunes, 13 de octubre de 2025`
pub fn long_date(day: NaiveDate) -> String {
    format!(
        "{}, {} de {} de {}",
        WEEKDAYS_LONG[weekday_index(day.weekday())],
        day.day(),
        MONTHS_LONG[day.month0() as usize],
        day.year()
    )
}

fn short_date(day: NaiveDate) -> String {
    format!("{} {}", day.day(), MONTHS_SHORT[day.month0() as usize])
}

pub fn range_label(anchor: NaiveDate, view: CalendarView) -> String {
    match view {
        CalendarView::Day => long_date(anchor),
        CalendarView::Week => {
            let (start, end) = date_range(anchor, view);
            format!("{} - {} {}", short_date(start), short_date(end), end.year())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub slot: TimeSlot,
    pub cells: Vec<SlotState>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedEntry {
    pub entry: CalendarEntry,
    pub placement: Placement,
    pub height_px: f64,
    pub color: ServiceColor,
    pub style: StatusStyle,
}

/// The whole grid for one screen, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarGrid {
    pub view: CalendarView,
    pub anchor: NaiveDate,
    pub days: Vec<NaiveDate>,
    pub rows: Vec<GridRow>,
    pub entries: Vec<PlacedEntry>,
    pub indicator: Option<TimeIndicator>,
}

impl CalendarGrid {
    pub fn build(
        anchor: NaiveDate,
        view: CalendarView,
        entries: &[CalendarEntry],
        now: NaiveDateTime,
    ) -> Self {
        let days = visible_days(anchor, view);

        let rows = time_slots()
            .into_iter()
            .map(|slot| GridRow {
                slot,
                cells: days
                    .iter()
                    .map(|day| slot_state(*day, slot, entries, now))
                    .collect(),
            })
            .collect();

        let placed = entries
            .iter()
            .filter_map(|entry| {
                let placement = entry_placement(entry, &days)?;
                Some(PlacedEntry {
                    entry: entry.clone(),
                    placement,
                    height_px: card_height(entry.duration),
                    color: service_color(&entry.service),
                    style: status_style(entry.status),
                })
            })
            .collect();

        let indicator = current_time_indicator(&days, now);

        Self {
            view,
            anchor,
            days,
            rows,
            entries: placed,
            indicator,
        }
    }

    pub fn title(&self) -> String {
        range_label(self.anchor, self.view)
    }

    /// Entries starting in the given row and day column.
    pub fn entries_starting_at(&self, day_index: usize, slot: TimeSlot) -> Vec<&PlacedEntry> {
        self.entries
            .iter()
            .filter(|p| {
                p.placement.day_index == day_index
                    && p.entry
                        .start()
                        .map(|t| {
                            let m = minutes_of(t);
                            m >= slot.minutes() && m < slot.minutes() + SLOT_MINUTES
                        })
                        .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    fn entry(id: &str, day: NaiveDate, time: &str, duration: u32, service: &str) -> CalendarEntry {
        CalendarEntry {
            id: id.to_string(),
            customer_name: "María García".to_string(),
            is_vip: false,
            service: service.to_string(),
            date: day,
            time: time.to_string(),
            duration,
            status: ReservationStatus::Confirmed,
        }
    }

    #[test]
    fn test_time_slots_cover_the_day() {
        let slots = time_slots();
        assert_eq!(slots.len(), SLOTS_PER_DAY);
        assert_eq!(slots[0].label(), "00:00");
        assert_eq!(slots[1].label(), "00:30");
        assert_eq!(slots[47].label(), "23:30");
        assert!(slots[20].is_full_hour());
        assert!(!slots[21].is_full_hour());
    }

    #[test]
    fn test_week_starts_on_monday() {
        let wednesday = date(2025, 10, 15);
        let days = visible_days(wednesday, CalendarView::Week);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date(2025, 10, 13));
        assert_eq!(days[6], date(2025, 10, 19));
    }

    #[test]
    fn test_sunday_belongs_to_previous_monday() {
        let sunday = date(2025, 10, 19);
        assert_eq!(start_of_week(sunday), date(2025, 10, 13));
        assert_eq!(
            date_range(sunday, CalendarView::Week),
            (date(2025, 10, 13), date(2025, 10, 19))
        );
    }

    #[test]
    fn test_day_view_is_single_column() {
        let day = date(2025, 10, 15);
        assert_eq!(visible_days(day, CalendarView::Day), vec![day]);
        assert_eq!(date_range(day, CalendarView::Day), (day, day));
    }

    #[test]
    fn test_navigation_steps() {
        let day = date(2025, 10, 15);
        assert_eq!(shift(day, CalendarView::Week, 1), Some(date(2025, 10, 22)));
        assert_eq!(shift(day, CalendarView::Week, -1), Some(date(2025, 10, 8)));
        assert_eq!(shift(day, CalendarView::Day, 1), Some(date(2025, 10, 16)));
        assert_eq!(shift(date(2025, 1, 1), CalendarView::Day, -1), Some(date(2024, 12, 31)));
        assert_eq!(shift(day, CalendarView::Day, 0), Some(day));
    }

    #[test]
    fn test_shift_out_of_range() {
        let day = date(2025, 10, 15);
        assert_eq!(shift(day, CalendarView::Week, i32::MAX as i64), None);
        assert_eq!(shift(day, CalendarView::Day, i32::MIN as i64), None);
        assert_eq!(shift(NaiveDate::MAX, CalendarView::Day, 1), None);
        assert_eq!(shift(day, CalendarView::Week, i64::MAX), None);
    }

    #[test]
    fn test_occupancy_is_half_open() {
        let day = date(2025, 10, 15);
        let entries = vec![entry("1", day, "10:00", 90, "Corte + Tinte")];

        let slot = |h, m| TimeSlot { hour: h, minute: m };
        assert!(!is_slot_occupied(day, slot(9, 30), &entries));
        assert!(is_slot_occupied(day, slot(10, 0), &entries));
        assert!(is_slot_occupied(day, slot(11, 0), &entries));
        assert!(!is_slot_occupied(day, slot(11, 30), &entries));
        assert!(!is_slot_occupied(date(2025, 10, 16), slot(10, 0), &entries));
    }

    #[test]
    fn test_odd_duration_covers_partial_slot() {
        let day = date(2025, 10, 15);
        let entries = vec![entry("4", day, "16:30", 50, "Masaje relajante")];
        assert!(is_slot_occupied(day, TimeSlot { hour: 17, minute: 0 }, &entries));
        assert!(!is_slot_occupied(day, TimeSlot { hour: 17, minute: 30 }, &entries));
    }

    #[test]
    fn test_past_slot_is_strict() {
        let day = date(2025, 10, 15);
        let now = at(day, 10, 0);
        assert!(is_past_slot(day, TimeSlot { hour: 9, minute: 30 }, now));
        assert!(!is_past_slot(day, TimeSlot { hour: 10, minute: 0 }, now));
        assert!(is_past_slot(date(2025, 10, 14), TimeSlot { hour: 23, minute: 30 }, now));
    }

    #[test]
    fn test_slot_state_precedence() {
        let day = date(2025, 10, 15);
        let entries = vec![entry("1", day, "09:00", 120, "Corte")];
        let now = at(day, 10, 15);

        assert_eq!(slot_state(day, TimeSlot { hour: 9, minute: 0 }, &entries, now), SlotState::Past);
        assert_eq!(
            slot_state(day, TimeSlot { hour: 10, minute: 30 }, &entries, now),
            SlotState::Occupied
        );
        let free = slot_state(day, TimeSlot { hour: 11, minute: 0 }, &entries, now);
        assert_eq!(free, SlotState::Free);
        assert!(free.accepts_booking());
    }

    #[test]
    fn test_entry_placement() {
        let days = visible_days(date(2025, 10, 15), CalendarView::Week);
        let placed = entry_placement(&entry("1", date(2025, 10, 15), "10:00", 90, "x"), &days).unwrap();

        assert_eq!(placed.day_index, 2);
        assert_eq!(placed.grid_column, 4);
        assert_eq!(placed.top_px, 1200.0);
        assert_eq!(placed.z_index, 5);

        let off_grid = entry("2", date(2025, 10, 20), "10:00", 60, "x");
        assert!(entry_placement(&off_grid, &days).is_none());
    }

    #[test]
    fn test_card_height_and_duration_footer() {
        assert_eq!(card_height(90), 172.0);
        assert_eq!(card_height(30), 52.0);
        let day = date(2025, 10, 15);
        assert!(shows_duration(&entry("1", day, "10:00", 60, "x")));
        assert!(!shows_duration(&entry("1", day, "10:00", 50, "x")));
    }

    #[test]
    fn test_current_time_indicator_only_when_today_visible() {
        let today = date(2025, 10, 15);
        let now = at(today, 14, 15);
        let days = visible_days(today, CalendarView::Week);

        let indicator = current_time_indicator(&days, now).unwrap();
        assert_eq!(indicator.day_index, 2);
        assert_eq!(indicator.top_px, 855.0 / 30.0 * 60.0 + 48.0);
        assert_eq!(indicator.label, "14:15");

        let next_week = visible_days(date(2025, 10, 22), CalendarView::Week);
        assert!(current_time_indicator(&next_week, now).is_none());
    }

    #[test]
    fn test_service_colors() {
        assert_eq!(service_color("Corte + Tinte"), ServiceColor::Blue);
        assert_eq!(service_color("Coloración"), ServiceColor::Purple);
        assert_eq!(service_color("Manicura completa"), ServiceColor::Pink);
        assert_eq!(service_color("Tratamiento facial"), ServiceColor::Green);
        assert_eq!(service_color("MASAJE relajante"), ServiceColor::Indigo);
        assert_eq!(service_color("Depilación láser"), ServiceColor::Orange);
        assert_eq!(service_color("Maquillaje novia"), ServiceColor::Cyan);
        assert_eq!(service_color("Limpieza dental"), ServiceColor::Gray);
    }

    #[test]
    fn test_status_styles() {
        assert_eq!(status_style(ReservationStatus::Pending), StatusStyle::Dashed);
        assert_eq!(status_style(ReservationStatus::Confirmed), StatusStyle::Solid);
        assert_eq!(status_style(ReservationStatus::Completed), StatusStyle::Faded);
        assert_eq!(status_style(ReservationStatus::Cancelled), StatusStyle::Solid);
    }

    #[test]
    fn test_range_labels() {
        let day = date(2025, 10, 13);
        assert_eq!(range_label(day, CalendarView::Day), "lunes, 13 de octubre de 2025");
        assert_eq!(range_label(day, CalendarView::Week), "13 oct - 19 oct 2025");
        assert_eq!(
            range_label(date(2025, 12, 31), CalendarView::Week),
            "29 dic - 4 ene 2026"
        );
        assert_eq!(weekday_short(date(2025, 10, 15)), "mié");
    }

    #[test]
    fn test_grid_build() {
        let today = date(2025, 10, 15);
        let entries = vec![
            entry("1", today, "10:00", 90, "Corte"),
            entry("2", date(2025, 11, 1), "10:00", 60, "Corte"),
        ];
        let grid = CalendarGrid::build(today, CalendarView::Week, &entries, at(today, 8, 0));

        assert_eq!(grid.rows.len(), 48);
        assert!(grid.rows.iter().all(|r| r.cells.len() == 7));
        assert_eq!(grid.entries.len(), 1);
        assert_eq!(grid.rows[20].cells[2], SlotState::Occupied);
        assert_eq!(grid.rows[0].cells[0], SlotState::Past);
        assert_eq!(grid.rows[20].cells[3], SlotState::Free);
        assert!(grid.indicator.is_some());
        assert_eq!(grid.entries_starting_at(2, TimeSlot { hour: 10, minute: 0 }).len(), 1);
        assert_eq!(grid.title(), "13 oct - 19 oct 2025");
    }
}
