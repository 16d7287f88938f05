use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::catalog::AppointmentType;

/// Maximum number of ranked date/time preferences a custom request carries.
pub const MAX_DATE_PREFERENCES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// One ranked date/time preference on a custom request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePreference {
    pub date: NaiveDate,
    pub time: String,
}

// Everything the wizard has collected so far. Transient view-model; the
// backend is the system of record once the draft is submitted.
#[derive(Debug, Clone, Default)]
pub struct BookingDraft {
    pub appointment_type: Option<AppointmentType>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub customer: CustomerDetails,
    pub preferences: Vec<DatePreference>,
    pub is_custom_request: bool,
    // Linkage back to the consumed availability record, when the slot came
    // from the calendar rather than a custom request.
    pub source_record_id: Option<String>,
    pub specialist_email: Option<String>,
}

impl BookingDraft {
    pub fn has_concrete_slot(&self) -> bool {
        self.appointment_type.is_some() && self.date.is_some() && self.time.is_some()
    }

    /// Customer info may only be entered once a concrete (type, date, time)
    /// triple is chosen, or, for custom requests, a type plus at least one
    /// complete preference.
    pub fn ready_for_customer_info(&self) -> bool {
        if self.is_custom_request {
            self.appointment_type.is_some() && !self.preferences.is_empty()
        } else {
            self.has_concrete_slot()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Provisional,
    PendingVerification,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Provisional => "provisional",
            BookingStatus::PendingVerification => "pending_verification",
        }
    }
}

/// Outbound appointment-creation shape. `google_event_id` and
/// `cancellation_reason` are owned by the backend and sent empty on creation.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentPayload {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub customer_notes: String,
    pub appointment_type: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub duration_minutes: u32,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_specialist: Option<String>,
    // JSON array string of "YYYY-MM-DD at HH:MM" alternatives, custom
    // requests only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_requested_dates: Option<String>,
    pub google_event_id: String,
    pub cancellation_reason: String,
}

/// The created appointment as echoed back by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResult {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub appointment_type: String,
    pub appointment_date: String,
    pub appointment_time: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub verification_code: Option<String>,
}
