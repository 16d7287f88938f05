use serde_json::json;
use tracing::{info, warn};

use crate::client::Base44Api;
use crate::error::WidgetError;
use crate::models::booking::{AppointmentPayload, BookingDraft, BookingResult, BookingStatus};
use crate::verification::VerificationCode;

/// Outcome of a submission. Retiring the consumed availability record is a
/// best-effort side effect with its own failure channel: the booking stands
/// even when the update fails.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub result: BookingResult,
    pub slot_release_error: Option<String>,
}

/// Status precedence: verification-required types always come back
/// `pending_verification`; otherwise custom requests are `provisional` and a
/// concrete picked slot is `confirmed`.
pub fn resolve_status(draft: &BookingDraft) -> BookingStatus {
    match &draft.appointment_type {
        Some(t) if t.requires_verification => BookingStatus::PendingVerification,
        _ if draft.is_custom_request => BookingStatus::Provisional,
        _ => BookingStatus::Confirmed,
    }
}

/// Map a completed draft into the backend's appointment-creation shape.
pub fn build_payload(draft: &BookingDraft) -> Result<AppointmentPayload, WidgetError> {
    let appointment_type = draft
        .appointment_type
        .as_ref()
        .ok_or_else(|| WidgetError::InvalidDraft("no appointment type selected".to_string()))?;

    // For custom requests the first ranked preference is the primary
    // requested slot; the rest travel as serialized alternatives.
    let (date, time) = if draft.is_custom_request {
        let first = draft.preferences.first().ok_or_else(|| {
            WidgetError::InvalidDraft("custom request has no preferred dates".to_string())
        })?;
        (first.date, first.time.clone())
    } else {
        let date = draft
            .date
            .ok_or_else(|| WidgetError::InvalidDraft("no date selected".to_string()))?;
        let time = draft
            .time
            .clone()
            .ok_or_else(|| WidgetError::InvalidDraft("no time selected".to_string()))?;
        (date, time)
    };

    let status = resolve_status(draft);
    let verification_code = if status == BookingStatus::PendingVerification {
        Some(VerificationCode::generate())
    } else {
        None
    };

    let additional_requested_dates = if draft.is_custom_request {
        let alternatives: Vec<String> = draft
            .preferences
            .iter()
            .skip(1)
            .map(|p| format!("{} at {}", p.date.format("%Y-%m-%d"), p.time))
            .collect();
        if alternatives.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&alternatives).map_err(|e| {
                WidgetError::InvalidDraft(format!("failed to serialize alternative dates: {}", e))
            })?)
        }
    } else {
        None
    };

    Ok(AppointmentPayload {
        customer_name: draft.customer.name.clone(),
        customer_email: draft.customer.email.clone(),
        customer_phone: draft.customer.phone.clone().unwrap_or_default(),
        customer_address: draft.customer.address.clone().unwrap_or_default(),
        customer_notes: draft.customer.notes.clone().unwrap_or_default(),
        appointment_type: appointment_type.name.clone(),
        appointment_date: date.format("%Y-%m-%d").to_string(),
        appointment_time: time,
        duration_minutes: appointment_type.duration_minutes,
        status,
        verification_code,
        assigned_specialist: draft.specialist_email.clone(),
        additional_requested_dates,
        google_event_id: String::new(),
        cancellation_reason: String::new(),
    })
}

/// Create the appointment, then best-effort retire the consumed availability
/// record. A create failure propagates; a retire failure is reported through
/// the outcome only.
pub async fn submit_booking<A: Base44Api + ?Sized>(
    api: &A,
    draft: &BookingDraft,
) -> Result<SubmissionOutcome, WidgetError> {
    let payload = build_payload(draft)?;
    info!(
        "Submitting {} booking for {} on {} {}",
        payload.status.as_str(),
        payload.customer_email,
        payload.appointment_date,
        payload.appointment_time
    );

    let result = api.create_appointment(payload).await?;

    let slot_release_error = release_consumed_slot(api, draft).await;

    Ok(SubmissionOutcome {
        result,
        slot_release_error,
    })
}

async fn release_consumed_slot<A: Base44Api + ?Sized>(
    api: &A,
    draft: &BookingDraft,
) -> Option<String> {
    if draft.is_custom_request {
        return None;
    }
    let record_id = draft.source_record_id.as_ref()?;

    match api
        .update_availability_slot(record_id.clone(), json!({ "is_active": false }))
        .await
    {
        Ok(()) => {
            info!("Marked availability record {} inactive", record_id);
            None
        }
        Err(err) => {
            warn!(
                "Failed to mark availability record {} inactive: {}",
                record_id, err
            );
            Some(err.to_string())
        }
    }
}
