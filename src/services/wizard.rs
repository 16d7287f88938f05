use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::booking::{
    BookingDraft, BookingResult, CustomerDetails, DatePreference, MAX_DATE_PREFERENCES,
};
use crate::models::catalog::AppointmentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectType,
    SelectSlot,
    CustomRequest,
    EnterCustomerInfo,
    Submitting,
    Confirmed,
}

#[derive(Debug, Clone)]
pub enum WizardAction {
    TypeSelected(AppointmentType),
    SlotSelected {
        date: NaiveDate,
        time: String,
        source_record_id: Option<String>,
        specialist_email: Option<String>,
    },
    OpenCustomRequest,
    PreferencesEntered(Vec<DatePreference>),
    CustomerInfoEntered(CustomerDetails),
    Back,
    SubmissionStarted,
    SubmissionSucceeded(BookingResult),
    SubmissionFailed(String),
    Reset,
}

/// Immutable wizard state, transitioned only through `reduce`. The draft
/// survives submission failures untouched; `error` carries the message the
/// presentation layer shows inline.
#[derive(Debug, Clone)]
pub struct WizardState {
    pub step: WizardStep,
    pub draft: BookingDraft,
    pub result: Option<BookingResult>,
    pub error: Option<String>,
    // Step to fall back to when a submission fails.
    return_step: WizardStep,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SelectType,
            draft: BookingDraft::default(),
            result: None,
            error: None,
            return_step: WizardStep::SelectType,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.step == WizardStep::Submitting
    }

    /// Apply one action. Total over all (state, action) pairs: invalid
    /// transitions return the state unchanged.
    pub fn reduce(self, action: WizardAction) -> WizardState {
        match action {
            WizardAction::TypeSelected(appointment_type) => self.on_type_selected(appointment_type),
            WizardAction::SlotSelected {
                date,
                time,
                source_record_id,
                specialist_email,
            } => self.on_slot_selected(date, time, source_record_id, specialist_email),
            WizardAction::OpenCustomRequest => self.on_open_custom_request(),
            WizardAction::PreferencesEntered(preferences) => self.on_preferences(preferences),
            WizardAction::CustomerInfoEntered(details) => self.on_customer_info(details),
            WizardAction::Back => self.on_back(),
            WizardAction::SubmissionStarted => self.on_submission_started(),
            WizardAction::SubmissionSucceeded(result) => self.on_submission_succeeded(result),
            WizardAction::SubmissionFailed(message) => self.on_submission_failed(message),
            WizardAction::Reset => WizardState::new(),
        }
    }

    fn on_type_selected(mut self, appointment_type: AppointmentType) -> WizardState {
        if self.step != WizardStep::SelectType {
            return self.rejected("TypeSelected");
        }
        if !appointment_type.is_active {
            self.error = Some("This appointment type is not available".to_string());
            return self;
        }
        self.draft.appointment_type = Some(appointment_type);
        self.draft.date = None;
        self.draft.time = None;
        self.draft.preferences.clear();
        self.draft.is_custom_request = false;
        self.draft.source_record_id = None;
        self.draft.specialist_email = None;
        self.step = WizardStep::SelectSlot;
        self.error = None;
        self
    }

    fn on_slot_selected(
        mut self,
        date: NaiveDate,
        time: String,
        source_record_id: Option<String>,
        specialist_email: Option<String>,
    ) -> WizardState {
        if self.step != WizardStep::SelectSlot {
            return self.rejected("SlotSelected");
        }
        if self.draft.appointment_type.is_none() {
            return self.rejected("SlotSelected without a type");
        }
        self.draft.date = Some(date);
        self.draft.time = Some(time);
        self.draft.source_record_id = source_record_id;
        self.draft.specialist_email = specialist_email;
        self.draft.is_custom_request = false;
        self.draft.preferences.clear();
        self.step = WizardStep::EnterCustomerInfo;
        self.error = None;
        self
    }

    fn on_open_custom_request(mut self) -> WizardState {
        if self.step != WizardStep::SelectSlot {
            return self.rejected("OpenCustomRequest");
        }
        self.draft.is_custom_request = true;
        self.draft.date = None;
        self.draft.time = None;
        self.draft.source_record_id = None;
        self.draft.specialist_email = None;
        self.step = WizardStep::CustomRequest;
        self.error = None;
        self
    }

    fn on_preferences(mut self, preferences: Vec<DatePreference>) -> WizardState {
        if self.step != WizardStep::CustomRequest {
            return self.rejected("PreferencesEntered");
        }
        if preferences.is_empty() {
            self.error = Some("At least one preferred date and time is required".to_string());
            return self;
        }
        let mut preferences = preferences;
        if preferences.len() > MAX_DATE_PREFERENCES {
            warn!(
                "Truncating {} date preferences to the {} allowed",
                preferences.len(),
                MAX_DATE_PREFERENCES
            );
            preferences.truncate(MAX_DATE_PREFERENCES);
        }
        self.draft.preferences = preferences;
        self.step = WizardStep::EnterCustomerInfo;
        self.error = None;
        self
    }

    fn on_customer_info(mut self, details: CustomerDetails) -> WizardState {
        if self.step != WizardStep::EnterCustomerInfo {
            return self.rejected("CustomerInfoEntered");
        }
        if let Err(message) = validate_customer(&details) {
            debug!("Customer details rejected: {}", message);
            self.error = Some(message);
            return self;
        }
        self.draft.customer = details;
        self.error = None;
        self
    }

    fn on_back(mut self) -> WizardState {
        self.step = match self.step {
            WizardStep::SelectSlot => WizardStep::SelectType,
            WizardStep::CustomRequest => WizardStep::SelectSlot,
            WizardStep::EnterCustomerInfo => {
                if self.draft.is_custom_request {
                    WizardStep::CustomRequest
                } else {
                    WizardStep::SelectSlot
                }
            }
            _ => return self.rejected("Back"),
        };
        self.error = None;
        self
    }

    fn on_submission_started(mut self) -> WizardState {
        if self.step != WizardStep::EnterCustomerInfo {
            return self.rejected("SubmissionStarted");
        }
        if !self.draft.ready_for_customer_info() {
            return self.rejected("SubmissionStarted with an incomplete draft");
        }
        if let Err(message) = validate_customer(&self.draft.customer) {
            self.error = Some(message);
            return self;
        }
        self.return_step = self.step;
        self.step = WizardStep::Submitting;
        self.error = None;
        self
    }

    fn on_submission_succeeded(mut self, result: BookingResult) -> WizardState {
        if self.step != WizardStep::Submitting {
            return self.rejected("SubmissionSucceeded");
        }
        self.result = Some(result);
        self.step = WizardStep::Confirmed;
        self.error = None;
        self
    }

    fn on_submission_failed(mut self, message: String) -> WizardState {
        if self.step != WizardStep::Submitting {
            return self.rejected("SubmissionFailed");
        }
        // Back to the interactive step with the draft intact.
        self.step = self.return_step;
        self.error = Some(message);
        self
    }

    fn rejected(self, action: &str) -> WizardState {
        warn!("Ignoring {} in step {:?}", action, self.step);
        self
    }
}

/// Required-field validation before leaving the customer-info step. Name and
/// email must be present; the email check is format-shaped only, not RFC.
pub fn validate_customer(details: &CustomerDetails) -> Result<(), String> {
    if details.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    let email = details.email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && domain.contains('.') => {
            Ok(())
        }
        _ => Err("Email address does not look valid".to_string()),
    }
}
