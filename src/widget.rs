use std::sync::Arc;

use chrono::{Local, NaiveDate};
use futures::join;
use tracing::{debug, error, warn};

use crate::client::{Base44Api, Base44Client, FilterParams};
use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::models::availability::{RawAvailabilityRecord, WeekView, WeekWindow};
use crate::models::booking::{CustomerDetails, DatePreference};
use crate::models::catalog::{self, AppointmentType};
use crate::services::availability::{resolve_week, ResolveOptions};
use crate::services::eligibility::filter_week;
use crate::services::submission::submit_booking;
use crate::services::wizard::{WizardAction, WizardState, WizardStep};

/// The mount point a host embeds. Owns the wizard state, the current display
/// window and the fetched data, and pushes results out through the configured
/// callbacks.
///
/// Single-threaded and event-driven: network calls are the only suspension
/// points, and every mutation happens between them. Week navigation uses
/// monotonically increasing fetch tokens so a stale response can never
/// clobber a newer view; hosts driving their own event loop can use the
/// two-phase `begin_week_fetch` / `apply_week_fetch` pair directly.
pub struct BookingWidget<A: Base44Api> {
    api: Arc<A>,
    config: WidgetConfig,
    state: WizardState,
    window: WeekWindow,
    catalog: Vec<AppointmentType>,
    week_view: Option<WeekView>,
    resolve_options: ResolveOptions,
    fetch_seq: u64,
    loading: bool,
    #[cfg(test)]
    today_override: Option<NaiveDate>,
}

impl BookingWidget<Base44Client> {
    /// Mount against the real backend described by the configuration.
    pub fn mount(config: WidgetConfig) -> Self {
        let client = Base44Client::from_config(&config);
        Self::with_api(client, config)
    }
}

impl<A: Base44Api> BookingWidget<A> {
    pub fn with_api(api: A, config: WidgetConfig) -> Self {
        // Pre-supplied catalog puts the widget in static mode for types.
        let catalog = config
            .appointment_types
            .as_deref()
            .map(catalog::active_types)
            .unwrap_or_default();

        Self {
            api: Arc::new(api),
            config,
            state: WizardState::new(),
            window: WeekWindow::containing(Local::now().date_naive()),
            catalog,
            week_view: None,
            resolve_options: ResolveOptions::default(),
            fetch_seq: 0,
            loading: false,
            #[cfg(test)]
            today_override: None,
        }
    }

    // --- accessors -------------------------------------------------------

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn catalog(&self) -> &[AppointmentType] {
        &self.catalog
    }

    pub fn week_view(&self) -> Option<&WeekView> {
        self.week_view.as_ref()
    }

    pub fn window(&self) -> WeekWindow {
        self.window
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // --- data loading ----------------------------------------------------

    /// Load the appointment-type catalog. Called once on mount; also the
    /// retry affordance when the first load failed.
    pub async fn load_catalog(&mut self) {
        self.loading = true;
        let outcome = self.fetch_catalog().await;
        self.loading = false;
        match outcome {
            Ok(types) => {
                debug!("Loaded {} active appointment type(s)", types.len());
                self.catalog = types;
            }
            Err(err) => {
                self.report_error(&format!("Failed to load appointment types: {}", err));
            }
        }
    }

    /// Re-fetch the catalog and the current week's availability as two
    /// independent concurrent requests.
    pub async fn reload(&mut self) {
        let token = self.begin_week_fetch();
        let window = self.window;
        let (types, slots) = join!(self.fetch_catalog(), self.fetch_window_slots());
        match types {
            Ok(types) => self.catalog = types,
            Err(err) => {
                self.report_error(&format!("Failed to load appointment types: {}", err))
            }
        }
        self.apply_week_fetch(token, window, slots);
    }

    async fn fetch_catalog(&self) -> Result<Vec<AppointmentType>, WidgetError> {
        if let Some(types) = &self.config.appointment_types {
            return Ok(catalog::active_types(types));
        }
        let filters: FilterParams = vec![("is_active".to_string(), "true".to_string())];
        let types = self.api.list_appointment_types(filters).await?;
        // The backend is not trusted to honor the filter.
        Ok(catalog::active_types(&types))
    }

    async fn fetch_window_slots(&self) -> Result<Vec<RawAvailabilityRecord>, WidgetError> {
        if let Some(slots) = &self.config.availability_slots {
            return Ok(slots.clone());
        }
        let Some(appointment_type) = &self.state.draft.appointment_type else {
            return Ok(Vec::new());
        };
        let filters: FilterParams = vec![
            ("is_active".to_string(), "true".to_string()),
            (
                "appointment_types".to_string(),
                appointment_type.id.clone(),
            ),
        ];
        self.api.list_availability_slots(filters).await
    }

    // --- week navigation and fetch sequencing ----------------------------

    /// Issue a new fetch token. Any response applied with an older token is
    /// discarded (last-request-wins).
    pub fn begin_week_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.loading = true;
        self.fetch_seq
    }

    /// Apply the outcome of an availability fetch for `window`, unless a
    /// newer fetch has been issued since `token` was handed out.
    pub fn apply_week_fetch(
        &mut self,
        token: u64,
        window: WeekWindow,
        outcome: Result<Vec<RawAvailabilityRecord>, WidgetError>,
    ) {
        if token != self.fetch_seq {
            debug!(
                "Discarding stale availability response (token {}, latest {})",
                token, self.fetch_seq
            );
            return;
        }
        self.loading = false;
        match outcome {
            Ok(records) => {
                let resolution =
                    resolve_week(&records, &self.catalog, window, self.resolve_options);
                self.week_view = Some(filter_week(&resolution.week, &self.catalog, self.today()));
            }
            Err(err) => {
                self.report_error(&format!("Failed to load availability: {}", err));
                // Back to the retryable empty state; the worst case is an
                // empty calendar plus the custom-request path.
                self.week_view = None;
            }
        }
    }

    pub async fn refresh_availability(&mut self) {
        let token = self.begin_week_fetch();
        let window = self.window;
        let outcome = self.fetch_window_slots().await;
        self.apply_week_fetch(token, window, outcome);
    }

    pub async fn previous_week(&mut self) {
        self.window = self.window.previous();
        self.refresh_availability().await;
    }

    pub async fn next_week(&mut self) {
        self.window = self.window.next();
        self.refresh_availability().await;
    }

    pub async fn go_to_today(&mut self) {
        self.window = WeekWindow::containing(self.today());
        self.refresh_availability().await;
    }

    // --- wizard events ---------------------------------------------------

    pub fn dispatch(&mut self, action: WizardAction) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    pub async fn select_type(&mut self, type_id: &str) {
        let Some(appointment_type) = self.catalog.iter().find(|t| t.matches(type_id)).cloned()
        else {
            self.report_error("Selected appointment type is not available");
            return;
        };
        self.dispatch(WizardAction::TypeSelected(appointment_type));
        if self.step() == WizardStep::SelectSlot {
            self.refresh_availability().await;
        }
    }

    /// Select a slot out of the currently displayed week. The slot must
    /// still be present in the eligible view.
    pub fn select_slot(&mut self, date: NaiveDate, time: &str) {
        let Some(slot) = self
            .week_view
            .as_ref()
            .and_then(|week| week.find_slot(date, time))
            .cloned()
        else {
            self.report_error("That time is no longer available");
            return;
        };
        self.dispatch(WizardAction::SlotSelected {
            date: slot.date,
            time: slot.time,
            source_record_id: slot.source_record_id,
            specialist_email: slot.specialist_email,
        });
    }

    pub fn open_custom_request(&mut self) {
        self.dispatch(WizardAction::OpenCustomRequest);
    }

    pub fn enter_preferences(&mut self, preferences: Vec<DatePreference>) {
        self.dispatch(WizardAction::PreferencesEntered(preferences));
    }

    pub fn enter_customer_info(&mut self, details: CustomerDetails) {
        self.dispatch(WizardAction::CustomerInfoEntered(details));
    }

    pub fn back(&mut self) {
        self.dispatch(WizardAction::Back);
    }

    pub fn reset(&mut self) {
        self.dispatch(WizardAction::Reset);
    }

    /// Submit the completed draft. At most one submission is in flight per
    /// draft; duplicate triggers while submitting are ignored.
    pub async fn submit(&mut self) {
        if self.state.is_submitting() {
            warn!("Ignoring duplicate submission trigger");
            return;
        }
        self.dispatch(WizardAction::SubmissionStarted);
        if !self.state.is_submitting() {
            // The reducer refused the transition; a validation message is
            // already on the state.
            return;
        }

        self.loading = true;
        let draft = self.state.draft.clone();
        let outcome = submit_booking(self.api.as_ref(), &draft).await;
        self.loading = false;

        match outcome {
            Ok(outcome) => {
                if let Some(callback) = &self.config.on_booking_complete {
                    callback(&outcome.result);
                }
                self.dispatch(WizardAction::SubmissionSucceeded(outcome.result));
            }
            Err(err) => {
                let message = format!("Failed to create booking: {}", err);
                self.report_error(&message);
                self.dispatch(WizardAction::SubmissionFailed(message));
            }
        }
    }

    // --- helpers ---------------------------------------------------------

    fn today(&self) -> NaiveDate {
        #[cfg(test)]
        if let Some(today) = self.today_override {
            return today;
        }
        Local::now().date_naive()
    }

    #[cfg(test)]
    pub(crate) fn set_today(&mut self, today: NaiveDate) {
        self.today_override = Some(today);
        self.window = WeekWindow::containing(today);
    }

    fn report_error(&self, message: &str) {
        error!("{}", message);
        if let Some(callback) = &self.config.on_error {
            callback(message);
        }
    }
}
