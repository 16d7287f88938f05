use std::env;

use dotenv::dotenv;

use crate::error::WidgetError;
use crate::models::availability::RawAvailabilityRecord;
use crate::models::booking::BookingResult;
use crate::models::catalog::AppointmentType;

pub type BookingCompleteCallback = Box<dyn Fn(&BookingResult) + Send + Sync>;
pub type ErrorCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Configuration handed over by the host page when mounting the widget.
///
/// Pre-supplied `appointment_types` / `availability_slots` put the widget in
/// static mode: no fetch is issued for the pre-supplied data, which is what
/// demo pages and tests use.
pub struct WidgetConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub appointment_types: Option<Vec<AppointmentType>>,
    pub availability_slots: Option<Vec<RawAvailabilityRecord>>,
    pub on_booking_complete: Option<BookingCompleteCallback>,
    pub on_error: Option<ErrorCallback>,
}

impl WidgetConfig {
    pub fn new(api_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_key: api_key.into(),
            appointment_types: None,
            availability_slots: None,
            on_booking_complete: None,
            on_error: None,
        }
    }

    /// Read backend endpoint and key from the environment (`BASE44_API_URL`,
    /// `BASE44_API_KEY`), loading a `.env` file if one is present.
    pub fn from_env() -> Result<Self, WidgetError> {
        dotenv().ok();

        let api_base_url = env::var("BASE44_API_URL")
            .map_err(|_| WidgetError::Config("BASE44_API_URL must be set".to_string()))?;
        let api_key = env::var("BASE44_API_KEY")
            .map_err(|_| WidgetError::Config("BASE44_API_KEY must be set".to_string()))?;

        Ok(Self::new(api_base_url, api_key))
    }

    pub fn with_appointment_types(mut self, types: Vec<AppointmentType>) -> Self {
        self.appointment_types = Some(types);
        self
    }

    pub fn with_availability_slots(mut self, slots: Vec<RawAvailabilityRecord>) -> Self {
        self.availability_slots = Some(slots);
        self
    }

    pub fn on_booking_complete(
        mut self,
        callback: impl Fn(&BookingResult) + Send + Sync + 'static,
    ) -> Self {
        self.on_booking_complete = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}
