use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::models::availability::{
    AvailabilityKind, AvailabilityRecord, DaySchedule, RawAvailabilityRecord, ResolvedSlot,
    WeekView, WeekWindow,
};
use crate::models::catalog::{self, AppointmentType};

/// Expansion step for recurring start/end ranges. Matches the backend's
/// hourly slot granularity.
pub const SLOT_STEP_MINUTES: u16 = 60;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// When set, records with no resolvable type linkage are dropped instead
    /// of falling back to the first active catalog type.
    pub require_type_match: bool,
}

#[derive(Debug)]
pub struct WeekResolution {
    pub week: WeekView,
    /// Records excluded for being malformed or unmatchable. Diagnostics
    /// only; resolution never aborts over an individual record.
    pub skipped_records: usize,
}

// Turn heterogeneous raw availability into the uniform per-date calendar for
// one 7-day window. Dated records pass through the window filter; recurring
// templates are expanded onto every window date whose day-of-week matches.
// Slot identity is the (date, time) pair and the first record resolved in
// input order wins ties.
pub fn resolve_week(
    records: &[RawAvailabilityRecord],
    catalog: &[AppointmentType],
    window: WeekWindow,
    options: ResolveOptions,
) -> WeekResolution {
    let mut days: Vec<DaySchedule> = window
        .days()
        .iter()
        .map(|date| DaySchedule::empty(*date))
        .collect();
    let mut seen: HashSet<(NaiveDate, String)> = HashSet::new();
    let mut skipped = 0;

    for raw in records {
        let record = match AvailabilityRecord::try_from_raw(raw) {
            Ok(record) => record,
            Err(reason) => {
                warn!("Skipping malformed availability record: {}", reason);
                skipped += 1;
                continue;
            }
        };

        let Some(type_id) = resolve_type(&record, catalog, options) else {
            debug!(
                "Skipping availability record {:?}: no usable appointment type",
                record.source_id
            );
            skipped += 1;
            continue;
        };

        match &record.kind {
            AvailabilityKind::Dated { date, time } => {
                if window.contains(*date) {
                    push_slot(&mut days, &mut seen, &record, &type_id, *date, time.label());
                }
            }
            AvailabilityKind::Recurring {
                day_of_week,
                start,
                end,
            } => {
                for date in window.days() {
                    if date.weekday().num_days_from_sunday() as u8 != *day_of_week {
                        continue;
                    }
                    let mut time = *start;
                    while time < *end {
                        push_slot(&mut days, &mut seen, &record, &type_id, date, time.label());
                        time = time.plus_minutes(SLOT_STEP_MINUTES);
                    }
                }
            }
        }
    }

    for day in &mut days {
        day.slots.sort_by(|a, b| a.time.cmp(&b.time));
    }

    if skipped > 0 {
        debug!("Excluded {} availability record(s) during resolution", skipped);
    }

    WeekResolution {
        week: WeekView { window, days },
        skipped_records: skipped,
    }
}

// Case-sensitive exact match against the record's linked type ids/names,
// falling back to the first active catalog type unless a match is required.
fn resolve_type(
    record: &AvailabilityRecord,
    catalog: &[AppointmentType],
    options: ResolveOptions,
) -> Option<String> {
    for key in &record.appointment_types {
        if let Some(appointment_type) = catalog.iter().find(|t| t.matches(key)) {
            return Some(appointment_type.id.clone());
        }
    }
    if options.require_type_match {
        return None;
    }
    catalog::first_active(catalog).map(|t| t.id.clone())
}

fn push_slot(
    days: &mut [DaySchedule],
    seen: &mut HashSet<(NaiveDate, String)>,
    record: &AvailabilityRecord,
    type_id: &str,
    date: NaiveDate,
    time: String,
) {
    if !seen.insert((date, time.clone())) {
        return;
    }
    let index = (date - days[0].date).num_days() as usize;
    days[index].slots.push(ResolvedSlot {
        date,
        time,
        appointment_type_id: type_id.to_string(),
        specialist_email: record.specialist_email.clone(),
        source_record_id: record.source_id.clone(),
        source_active: record.is_active,
    });
}
