//! Plain-text rendering of the view models, worded with the tenant's
//! terminology.

use super::views::*;
use crate::core::analytics::Metric;
use crate::core::calendar::{self, PlacedEntry, SlotState, StatusStyle};
use crate::core::filters;
use crate::domain::business_types::{BusinessType, BusinessTypeConfig};
use crate::domain::model::{Customer, Reservation, Terminology, User, WaitlistEntry};
use std::fmt::Write;

const CELL_WIDTH: usize = 22;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

fn vip_mark(is_vip: bool) -> &'static str {
    if is_vip {
        " ⭐"
    } else {
        ""
    }
}

fn reservation_line(r: &Reservation, terms: &Terminology) -> String {
    let mut line = format!(
        "{}  {}{}  ({} {})  [{}]",
        r.time()
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string()),
        r.customer_name(),
        vip_mark(r.is_vip()),
        r.party_size,
        terms.capacity.to_lowercase(),
        r.status.label()
    );
    if let Some(service) = r
        .service_name
        .as_deref()
        .or_else(|| r.services.as_ref().and_then(|s| s.name.as_deref()))
    {
        let _ = write!(line, "  {}", service);
    }
    if let Some(requests) = r.special_requests.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(line, "\n        📝 {}", requests);
    }
    line
}

pub fn whoami(user: &User, business: &BusinessTypeConfig) -> String {
    let mut out = format!("👤 {} <{}>\n", user.name, user.email);
    if let Some(role) = &user.role {
        let _ = writeln!(out, "   Rol: {}", role);
    }
    if user.is_super_admin {
        out.push_str("   🛡️  Super admin\n");
    }
    if let Some(b) = &user.business {
        let _ = writeln!(
            out,
            "   {} {} ({})",
            business.theme.icon,
            b.name,
            b.slug.as_deref().unwrap_or("-")
        );
    }
    out
}

fn upcoming_heading(minutes: i64) -> String {
    match minutes {
        60 => "Próxima hora".to_string(),
        m if m % 60 == 0 => format!("Próximas {} horas", m / 60),
        m => format!("Próximos {} minutos", m),
    }
}

pub fn dashboard(view: &DashboardView) -> String {
    let t = &view.terminology;
    let mut out = format!("📊 {}\n\n", view.business_name);
    let _ = writeln!(out, "  {} hoy:        {}", t.bookings, view.stats.today_reservations);
    let _ = writeln!(out, "  {} hoy:    {}", t.capacity, view.stats.today_covers);
    let _ = writeln!(out, "  {} VIP:       {}", t.customers, view.stats.vip_customers);
    let _ = writeln!(out, "  Ocupación:        {:.0}%", view.stats.occupancy_rate);
    let _ = writeln!(out, "  Próximas:         {}", view.stats.upcoming_reservations);
    let _ = writeln!(out, "  Pendientes:       {}", view.stats.pending_reservations);

    let _ = writeln!(
        out,
        "\n  Hoy: {} total · {} pendientes · {} confirmadas · {} sentadas",
        view.today.total, view.today.pending, view.today.confirmed, view.today.seated
    );

    let s = &view.summary;
    let _ = writeln!(
        out,
        "  Histórico: {} {} · {} completadas · {} canceladas · {} {} ({} VIP, {} nuevos este mes)",
        s.bookings.total,
        t.bookings.to_lowercase(),
        s.bookings.completed,
        s.bookings.cancelled,
        s.customers.total,
        t.customers.to_lowercase(),
        s.customers.vip,
        s.customers.new_this_month
    );
    if let Some(w) = &s.waitlist {
        let _ = writeln!(out, "  Lista de espera: {} esperando", w.waiting);
    }

    let _ = writeln!(out, "\n⏰ {}", upcoming_heading(view.upcoming_minutes));
    if view.upcoming.is_empty() {
        let _ = writeln!(out, "  No hay {} próximas", t.bookings.to_lowercase());
    }
    for r in &view.upcoming {
        let _ = writeln!(out, "  {}", reservation_line(r, t));
    }
    out
}

pub fn today(view: &TodayView) -> String {
    let t = &view.terminology;
    let mut out = format!("📅 {} de hoy", t.bookings);
    if let Some(status) = view.filter {
        let _ = write!(out, " ({})", status.label());
    }
    let _ = writeln!(
        out,
        "\n  Total {} · Pendientes {} · Confirmadas {} · Sentadas {}\n",
        view.stats.total, view.stats.pending, view.stats.confirmed, view.stats.seated
    );
    if view.reservations.is_empty() {
        let _ = writeln!(out, "  No hay {}", t.bookings.to_lowercase());
    }
    for r in &view.reservations {
        let _ = writeln!(out, "  {}", reservation_line(r, t));
    }
    out
}

pub fn reservations(view: &ReservationsView) -> String {
    let t = &view.terminology;
    let mut out = format!("📋 {} ({})\n", t.bookings, view.total);
    for (date, day) in &view.by_date {
        let heading = day
            .first()
            .and_then(|r| r.date())
            .map(calendar::long_date)
            .unwrap_or_else(|| date.clone());
        let _ = writeln!(out, "\n{}", heading);
        for r in day {
            let _ = writeln!(out, "  {}", reservation_line(r, t));
        }
    }
    if view.total == 0 {
        let _ = writeln!(out, "  Sin resultados");
    }
    out
}

fn customer_card(c: &Customer) -> String {
    let mut card = format!("{}{}  {}", c.name, vip_mark(c.is_vip), c.phone);
    if let Some(email) = &c.email {
        let _ = write!(card, "  {}", email);
    }
    let _ = write!(card, "\n    Visitas: {}", c.total_visits);
    if let Some(last) = c.last_visit {
        let _ = write!(card, " · Última: {}", last);
    }
    if let Some(avg) = c.avg_spending {
        let _ = write!(card, " · Gasto medio: {:.2}€", avg);
    }
    if !c.allergies.is_empty() {
        let _ = write!(card, "\n    ⚠️  Alergias: {}", c.allergies.join(", "));
    }
    if let Some(notes) = c.notes.as_deref().filter(|n| !n.is_empty()) {
        let _ = write!(card, "\n    📝 {}", notes);
    }
    card
}

pub fn customer(c: &Customer) -> String {
    let mut out = customer_card(c);
    if let Some(birthday) = c.birthday {
        let _ = write!(out, "\n    🎂 {}", birthday);
    }
    if let Some(table) = &c.favorite_table {
        let _ = write!(out, "\n    Mesa favorita: {}", table);
    }
    out.push('\n');
    out
}

pub fn customers(view: &CustomersView) -> String {
    let t = &view.terminology;
    let mut out = format!(
        "👥 {}: {} · VIP {} · Nuevos este mes {}\n\n",
        t.customers, view.counts.total, view.counts.vip, view.counts.new_this_month
    );
    for c in &view.customers {
        let _ = writeln!(out, "  {}", customer_card(c).replace('\n', "\n  "));
    }
    out
}

fn waitlist_line(entry: &WaitlistEntry, view: &WaitlistView) -> String {
    format!(
        "{}  {} personas  ~{} min  esperando {}  {}",
        entry.customer_name,
        entry.party_size,
        entry.estimated_wait,
        filters::waited_label(entry.added_at, view.now),
        entry.phone
    )
}

pub fn waitlist(view: &WaitlistView) -> String {
    let mut out = format!(
        "⏳ Lista de espera: {} esperando · espera media {} min · {} personas\n",
        view.stats.waiting, view.stats.avg_wait, view.stats.total_people
    );
    out.push_str("\nEn espera\n");
    for (i, entry) in view.active.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, waitlist_line(entry, view));
    }
    if !view.called.is_empty() {
        out.push_str("\nLlamados\n");
        for entry in &view.called {
            let _ = writeln!(out, "  📣 {}", waitlist_line(entry, view));
        }
    }
    out
}

fn metric_value(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Revenue => format!("{:.0}€", value),
        Metric::AvgTicket => format!("{:.2}€", value),
        Metric::Occupancy => format!("{:.0}%", value),
        _ => format!("{:.0}", value),
    }
}

pub fn analytics(view: &AnalyticsView) -> String {
    let mut out = String::from("📈 Estadísticas\n\n");
    for row in &view.comparison {
        let arrow = if row.change.is_positive { "↑" } else { "↓" };
        let _ = writeln!(
            out,
            "  {} {} {}{}% vs mes anterior",
            pad(row.metric.title(), 20),
            pad(&metric_value(row.metric, row.current), 10),
            arrow,
            row.change.value
        );
    }

    out.push_str("\nPor origen\n");
    for share in &view.sources {
        let _ = writeln!(
            out,
            "  {} {:>4}  {:>5.1}%",
            pad(share.source.label(), 10),
            share.reservations,
            share.percentage
        );
    }

    out.push_str("\nPor franja horaria\n");
    for slot in &view.hourly {
        let _ = writeln!(out, "  {}  {:>4} reservas  {:>5} comensales", slot.slot, slot.reservations, slot.covers);
    }

    out.push_str("\nMejores clientes\n");
    for (i, c) in view.top_customers.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} · {} visitas · {:.0}€", i + 1, c.name, c.visits, c.total_spent);
    }
    out
}

fn entry_cell(placed: &PlacedEntry) -> String {
    let mark = match placed.style {
        StatusStyle::Dashed => "?",
        StatusStyle::Faded => "✓",
        StatusStyle::Solid => "",
    };
    let mut text = format!("{}{}{}", mark, placed.entry.customer_name, vip_mark(placed.entry.is_vip));
    if calendar::shows_duration(&placed.entry) {
        let _ = write!(text, " {}m", placed.entry.duration);
    }
    text
}

/// Rows without anything starting are folded away, except full hours that
/// still take bookings and the row holding the current-time line.
pub fn calendar(page: &CalendarPage) -> String {
    let grid = &page.grid;
    let mut out = format!("🗓️  {} · {}\n\n", page.terminology.bookings, grid.title());

    out.push_str("       ");
    for day in &grid.days {
        let header = format!("{} {}", calendar::weekday_short(*day), day.format("%d"));
        out.push_str(&pad(&header, CELL_WIDTH));
    }
    out.push('\n');

    let indicator_slot = grid.indicator.as_ref().map(|i| {
        ((i.top_px - calendar::HEADER_OFFSET_PX) / calendar::SLOT_HEIGHT_PX).floor() as usize
    });

    for (row_index, row) in grid.rows.iter().enumerate() {
        let starts: Vec<Vec<&PlacedEntry>> = (0..grid.days.len())
            .map(|d| grid.entries_starting_at(d, row.slot))
            .collect();
        let has_start = starts.iter().any(|s| !s.is_empty());
        let is_now = indicator_slot == Some(row_index);
        let open_hour = row.slot.is_full_hour() && row.cells.iter().any(|c| c.accepts_booking());
        if !(has_start || is_now || open_hour) {
            continue;
        }

        let label = if is_now { "▶ ".to_string() } else { "  ".to_string() };
        out.push_str(&label);
        out.push_str(&pad(&row.slot.label(), 5));
        for (d, cell) in row.cells.iter().enumerate() {
            let text = match starts[d].first() {
                Some(placed) => entry_cell(placed),
                None => match cell {
                    SlotState::Past => String::new(),
                    SlotState::Occupied => "│".to_string(),
                    SlotState::Free => "·".to_string(),
                },
            };
            out.push_str(&pad(&text, CELL_WIDTH));
        }
        out.push('\n');
    }
    out
}

pub fn admin(view: &AdminView) -> String {
    let mut out = format!(
        "🛡️  Negocios: {} · activos {} · restaurantes {} · otros {}\n\n",
        view.counts.total, view.counts.active, view.counts.restaurants, view.counts.other_types
    );
    for b in &view.businesses {
        let config = crate::domain::business_types::config_for(&b.business_type);
        let _ = writeln!(
            out,
            "  {} {} ({}) {}{}",
            config.theme.icon,
            b.name,
            b.slug,
            config.name,
            if b.is_active { "" } else { " · inactivo" }
        );
    }
    out
}

pub fn business_types() -> String {
    let mut out = String::new();
    for kind in BusinessType::ALL {
        let c = kind.config();
        let _ = writeln!(
            out,
            "{} {} ({}): {} / {}, {} / {}",
            c.theme.icon,
            c.name,
            kind.key(),
            c.terminology.booking,
            c.terminology.bookings,
            c.terminology.customer,
            c.terminology.resource
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::{CalendarGrid, CalendarView};
    use crate::domain::business_types::config_for;
    use crate::domain::model::CalendarEntry;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate("María García", 5), "Marí…");
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4).chars().count(), 4);
    }

    #[test]
    fn test_calendar_shows_entries_and_now_marker() {
        let day = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let entries = vec![CalendarEntry {
            id: "1".to_string(),
            customer_name: "María García".to_string(),
            is_vip: true,
            service: "Corte + Tinte".to_string(),
            date: day,
            time: "10:00".to_string(),
            duration: 90,
            status: crate::domain::model::ReservationStatus::Confirmed,
        }];
        let now = day.and_hms_opt(9, 10, 0).unwrap();
        let page = CalendarPage {
            terminology: config_for("beauty_salon").terminology,
            grid: CalendarGrid::build(day, CalendarView::Day, &entries, now),
        };

        let text = calendar(&page);
        assert!(text.contains("miércoles, 15 de octubre de 2025"));
        assert!(text.contains("María García ⭐ 90m"));
        assert!(text.contains("▶ 09:00"));
        assert!(!text.contains("03:00"));
    }

    #[test]
    fn test_dashboard_heading_follows_window() {
        let mut view = DashboardView {
            business_name: "El Buen Sabor".to_string(),
            terminology: config_for("restaurant").terminology,
            stats: Default::default(),
            today: Default::default(),
            upcoming: Vec::new(),
            upcoming_minutes: 120,
            summary: Default::default(),
        };
        assert!(dashboard(&view).contains("⏰ Próximas 2 horas"));

        view.upcoming_minutes = 45;
        let text = dashboard(&view);
        assert!(text.contains("⏰ Próximos 45 minutos"));
        assert!(!text.contains("2 horas"));

        assert_eq!(upcoming_heading(60), "Próxima hora");
    }

    #[test]
    fn test_business_types_lists_all() {
        let text = business_types();
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("beauty_salon"));
    }
}
