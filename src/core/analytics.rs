//! Month-over-month comparison and breakdowns for the analytics page.

use crate::domain::model::{BookingSource, MonthlyStats, Reservation};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// Absolute percentage, one decimal.
    pub value: f64,
    pub is_positive: bool,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn change(current: f64, previous: f64) -> Change {
    if previous == 0.0 {
        return Change {
            value: 0.0,
            is_positive: current >= 0.0,
        };
    }
    let pct = (current - previous) / previous * 100.0;
    Change {
        value: round1(pct.abs()),
        is_positive: pct >= 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Reservations,
    Covers,
    Revenue,
    AvgTicket,
    Occupancy,
    NoShows,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Reservations,
        Metric::Covers,
        Metric::Revenue,
        Metric::AvgTicket,
        Metric::Occupancy,
        Metric::NoShows,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Metric::Reservations => "Reservas este mes",
            Metric::Covers => "Comensales totales",
            Metric::Revenue => "Ingresos estimados",
            Metric::AvgTicket => "Ticket promedio",
            Metric::Occupancy => "Tasa de ocupación",
            Metric::NoShows => "No-shows",
        }
    }

    /// Fewer no-shows is the good direction.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Metric::NoShows)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub metric: Metric,
    pub current: f64,
    pub previous: f64,
    pub change: Change,
}

pub fn period_comparison(stats: &MonthlyStats) -> Vec<ComparisonRow> {
    let (now, before) = (&stats.this_month, &stats.last_month);
    Metric::ALL
        .iter()
        .map(|&metric| {
            let (current, previous) = match metric {
                Metric::Reservations => (now.reservations, before.reservations),
                Metric::Covers => (now.covers, before.covers),
                Metric::Revenue => (now.revenue, before.revenue),
                Metric::AvgTicket => (now.avg_ticket, before.avg_ticket),
                Metric::Occupancy => (now.occupancy, before.occupancy),
                Metric::NoShows => (now.no_shows, before.no_shows),
            };
            let change = if metric.lower_is_better() {
                self::change(previous, current)
            } else {
                self::change(current, previous)
            };
            ComparisonRow {
                metric,
                current,
                previous,
                change,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceShare {
    pub source: BookingSource,
    pub reservations: usize,
    pub percentage: f64,
}

/// Reservations without a source count as `Other`.
pub fn source_breakdown(reservations: &[Reservation]) -> Vec<SourceShare> {
    let mut counts: Vec<(BookingSource, usize)> = Vec::new();
    for reservation in reservations {
        let source = reservation.source.unwrap_or(BookingSource::Other);
        match counts.iter_mut().find(|(s, _)| *s == source) {
            Some((_, n)) => *n += 1,
            None => counts.push((source, 1)),
        }
    }

    let total = reservations.len() as f64;
    let mut shares: Vec<SourceShare> = counts
        .into_iter()
        .map(|(source, n)| SourceShare {
            source,
            reservations: n,
            percentage: round1(n as f64 / total * 100.0),
        })
        .collect();
    shares.sort_by(|a, b| b.reservations.cmp(&a.reservations));
    shares
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySlot {
    pub slot: String,
    pub reservations: usize,
    pub covers: u32,
}

pub fn hourly_breakdown(reservations: &[Reservation]) -> Vec<HourlySlot> {
    use chrono::Timelike;

    let mut by_hour: BTreeMap<u32, (usize, u32)> = BTreeMap::new();
    for reservation in reservations {
        let Some(time) = reservation.time() else {
            continue;
        };
        let bucket = by_hour.entry(time.hour()).or_default();
        bucket.0 += 1;
        bucket.1 += reservation.party_size;
    }

    by_hour
        .into_iter()
        .map(|(hour, (count, covers))| HourlySlot {
            slot: format!("{:02}:00-{:02}:00", hour, hour + 1),
            reservations: count,
            covers,
        })
        .collect()
}
