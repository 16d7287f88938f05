use chrono::NaiveDate;
use tracing::debug;

use crate::models::availability::{DaySchedule, ResolvedSlot, WeekView};
use crate::models::catalog::AppointmentType;

/// Booking-eligibility decision for a single resolved slot.
///
/// `today` is the start of day in the viewer's local date. Advance-booking
/// lead time counts plain calendar days with an inclusive minimum: a slot
/// exactly `advance_booking_days` away is still bookable.
pub fn is_bookable(
    slot: &ResolvedSlot,
    appointment_type: &AppointmentType,
    today: NaiveDate,
) -> bool {
    if !appointment_type.is_active {
        return false;
    }
    // Slot already consumed or withdrawn.
    if !slot.source_active {
        return false;
    }
    if slot.date < today {
        return false;
    }
    let lead_days = (slot.date - today).num_days();
    if appointment_type.advance_booking_days > 0
        && lead_days < appointment_type.advance_booking_days as i64
    {
        return false;
    }
    true
}

/// Apply the eligibility rules across a resolved week. Days left with zero
/// bookable slots are omitted entirely, never shown as an empty card.
pub fn filter_week(week: &WeekView, catalog: &[AppointmentType], today: NaiveDate) -> WeekView {
    let before = week.total_slots();

    let days: Vec<DaySchedule> = week
        .days
        .iter()
        .filter_map(|day| {
            let slots: Vec<ResolvedSlot> = day
                .slots
                .iter()
                .filter(|slot| {
                    catalog
                        .iter()
                        .find(|t| t.id == slot.appointment_type_id)
                        .map(|t| is_bookable(slot, t, today))
                        .unwrap_or(false)
                })
                .cloned()
                .collect();

            if slots.is_empty() {
                None
            } else {
                Some(DaySchedule {
                    date: day.date,
                    day_name: day.day_name.clone(),
                    slots,
                })
            }
        })
        .collect();

    let view = WeekView {
        window: week.window,
        days,
    };
    debug!(
        "Eligibility filter kept {} of {} slot(s) for week {}",
        view.total_slots(),
        before,
        week.window.label()
    );
    view
}
