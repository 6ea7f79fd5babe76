//! Grouping of alerts and penalties into per-key summary rows.
//!
//! Sums are accumulated in exact hundredths, so a group's totals do not depend
//! on the order of the input records. Missing numeric fields contribute 0.

use std::collections::BTreeMap;

use crate::export::Tabular;
use crate::models::{Alert, Penalty};
use crate::utils::format::format_number;

/// A record that can be folded into a [`GroupSummary`]
pub trait Aggregate {
    /// Main summed quantity (penalty amount, alert overload)
    fn amount(&self) -> Option<f64>;
    /// Secondary summed quantity (penalty overload, alert weight)
    fn secondary_metric(&self) -> Option<f64>;
    /// Settled records do not count towards the outstanding amount
    fn is_settled(&self) -> bool;
}

impl Aggregate for Penalty {
    fn amount(&self) -> Option<f64> {
        self.amount
    }

    fn secondary_metric(&self) -> Option<f64> {
        self.overload_amount
    }

    fn is_settled(&self) -> bool {
        self.paid
    }
}

impl Aggregate for Alert {
    /// Only the excess over the limit counts
    fn amount(&self) -> Option<f64> {
        Some(self.overload.max(0.0))
    }

    fn secondary_metric(&self) -> Option<f64> {
        Some(self.weight)
    }

    fn is_settled(&self) -> bool {
        self.notified
    }
}

/// Summary of every record sharing one key
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary<T> {
    /// Records in their original relative order
    pub items: Vec<T>,
    pub count: usize,
    pub settled_count: usize,
    pub total_amount: f64,
    pub outstanding_amount: f64,
    pub total_secondary: f64,
}

impl<T> GroupSummary<T> {
    pub fn unsettled_count(&self) -> usize {
        self.count - self.settled_count
    }
}

struct Accumulator<T> {
    items: Vec<T>,
    settled: usize,
    total: i64,
    outstanding: i64,
    secondary: i64,
}

impl<T> Accumulator<T> {
    fn finish(self) -> GroupSummary<T> {
        GroupSummary {
            count: self.items.len(),
            items: self.items,
            settled_count: self.settled,
            total_amount: from_hundredths(self.total),
            outstanding_amount: from_hundredths(self.outstanding),
            total_secondary: from_hundredths(self.secondary),
        }
    }
}

fn to_hundredths(value: Option<f64>) -> i64 {
    value
        .filter(|v| v.is_finite())
        .map(|v| (v * 100.0).round() as i64)
        .unwrap_or(0)
}

fn from_hundredths(value: i64) -> f64 {
    value as f64 / 100.0
}

/// Group `records` by `key_fn`. Empty input yields an empty map.
pub fn group_by<T, K, F>(records: &[T], key_fn: F) -> BTreeMap<K, GroupSummary<T>>
where
    T: Aggregate + Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Accumulator<T>> = BTreeMap::new();
    for record in records {
        let amount = to_hundredths(record.amount());
        let acc = groups.entry(key_fn(record)).or_insert_with(|| Accumulator {
            items: Vec::new(),
            settled: 0,
            total: 0,
            outstanding: 0,
            secondary: 0,
        });
        acc.total += amount;
        acc.secondary += to_hundredths(record.secondary_metric());
        if record.is_settled() {
            acc.settled += 1;
        } else {
            acc.outstanding += amount;
        }
        acc.items.push(record.clone());
    }
    groups.into_iter().map(|(key, acc)| (key, acc.finish())).collect()
}

/// Sum of `total_amount` over `groups`, exact to the hundredth
pub fn grand_total<'a, T: 'a>(groups: impl IntoIterator<Item = &'a GroupSummary<T>>) -> f64 {
    from_hundredths(groups.into_iter().map(|g| to_hundredths(Some(g.total_amount))).sum())
}

/// Sum of `outstanding_amount` over `groups`, exact to the hundredth
pub fn outstanding_total<'a, T: 'a>(groups: impl IntoIterator<Item = &'a GroupSummary<T>>) -> f64 {
    from_hundredths(groups.into_iter().map(|g| to_hundredths(Some(g.outstanding_amount))).sum())
}

/// Penalties of one vehicle, as shown in the grouped penalty table and report
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePenaltySummary {
    pub key: String,
    pub plate: String,
    pub registration: String,
    pub vehicle_name: String,
    pub summary: GroupSummary<Penalty>,
}

impl VehiclePenaltySummary {
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || [&self.plate, &self.registration, &self.vehicle_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Group penalties by vehicle plate; penalties without a plate share `"unknown"`
pub fn group_penalties_by_vehicle(penalties: &[Penalty]) -> Vec<VehiclePenaltySummary> {
    group_by(penalties, |p| p.vehicle.group_key())
        .into_iter()
        .map(|(key, summary)| {
            let vehicle = summary.items.first().map(|p| p.vehicle.clone()).unwrap_or_default();
            VehiclePenaltySummary {
                key,
                plate: vehicle.plate_or_default().to_string(),
                registration: vehicle.registration.unwrap_or_else(|| "N/A".to_string()),
                vehicle_name: vehicle.name.unwrap_or_else(|| "N/A".to_string()),
                summary,
            }
        })
        .collect()
}

/// Group alerts by vehicle plate
pub fn group_alerts_by_vehicle(alerts: &[Alert]) -> BTreeMap<String, GroupSummary<Alert>> {
    group_by(alerts, |a| a.vehicle_plate.clone())
}

impl Tabular for VehiclePenaltySummary {
    fn headers() -> Vec<&'static str> {
        vec![
            "Vehicle ID",
            "Registration",
            "Total Penalties",
            "Paid Penalties",
            "Total Amount (TZS)",
            "Unpaid Amount (TZS)",
            "Total Overload (kg)",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.plate.clone(),
            self.registration.clone(),
            self.summary.count.to_string(),
            self.summary.settled_count.to_string(),
            self.summary.total_amount.to_string(),
            self.summary.outstanding_amount.to_string(),
            self.summary.total_secondary.to_string(),
        ]
    }

    fn display_cells(&self) -> Vec<String> {
        vec![
            format!("{} ({})", self.plate, self.vehicle_name),
            self.registration.clone(),
            self.summary.count.to_string(),
            self.summary.settled_count.to_string(),
            format_number(self.summary.total_amount),
            format_number(self.summary.outstanding_amount),
            format_number(self.summary.total_secondary),
        ]
    }

    fn column_widths() -> Vec<u16> {
        vec![24, 14, 9, 9, 16, 16, 14]
    }
}
