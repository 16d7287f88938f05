//! Base44 Booking Widget Core
//!
//! Headless engine of an embeddable appointment-booking widget. It resolves
//! raw availability records (dated or recurring) into a weekly calendar of
//! bookable slots, enforces booking-eligibility rules, drives the
//! type -> slot -> customer-details -> confirmation wizard, and submits
//! completed drafts to a Base44-style entity backend. The presentation layer
//! is external and renders whatever state this crate produces.
//!
//! # Modules
//!
//! - `widget`: the `BookingWidget` mount point hosts embed
//! - `client`: `Base44Client` for the backend collaborator's entity CRUD
//! - `services`: availability resolution, eligibility rules, the wizard
//!   state machine, and the submission adapter
//! - `verification`: verification-code generation for types that require it

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod verification;
pub mod widget;

#[cfg(test)]
pub mod client_mock;


// Re-export the main API types for ease of use
pub use client::{Base44Api, Base44Client, FilterParams};
pub use config::WidgetConfig;
pub use error::WidgetError;
pub use models::availability::{
    RawAvailabilityRecord, ResolvedSlot, TimeOfDay, WeekView, WeekWindow,
};
pub use models::booking::{
    BookingDraft, BookingResult, BookingStatus, CustomerDetails, DatePreference,
    MAX_DATE_PREFERENCES,
};
pub use models::catalog::AppointmentType;
pub use services::wizard::{WizardAction, WizardState, WizardStep};
pub use verification::VerificationCode;
pub use widget::BookingWidget;
