use std::sync::{Arc, Mutex};

use mockall::mock;

use crate::client::{Base44Api, FilterParams};
use crate::error::WidgetError;
use crate::models::availability::RawAvailabilityRecord;
use crate::models::booking::{AppointmentPayload, BookingResult};
use crate::models::catalog::AppointmentType;

// Mock backend for the Base44 entity API.
mock! {
    pub BackendClient {}

    #[async_trait::async_trait]
    impl Base44Api for BackendClient {
        async fn list_appointment_types(
            &self,
            filters: FilterParams,
        ) -> Result<Vec<AppointmentType>, WidgetError>;

        async fn list_availability_slots(
            &self,
            filters: FilterParams,
        ) -> Result<Vec<RawAvailabilityRecord>, WidgetError>;

        async fn create_appointment(
            &self,
            payload: AppointmentPayload,
        ) -> Result<BookingResult, WidgetError>;

        async fn update_availability_slot(
            &self,
            id: String,
            patch: serde_json::Value,
        ) -> Result<(), WidgetError>;
    }
}

// A simple in-memory store backing the mock client.
pub struct MockBackendStore {
    types: Mutex<Vec<AppointmentType>>,
    slots: Mutex<Vec<RawAvailabilityRecord>>,
    appointments: Mutex<Vec<BookingResult>>,
    released_slots: Mutex<Vec<String>>,
}

impl MockBackendStore {
    pub fn new(types: Vec<AppointmentType>, slots: Vec<RawAvailabilityRecord>) -> Self {
        Self {
            types: Mutex::new(types),
            slots: Mutex::new(slots),
            appointments: Mutex::new(Vec::new()),
            released_slots: Mutex::new(Vec::new()),
        }
    }

    pub fn list_types(&self) -> Vec<AppointmentType> {
        self.types.lock().unwrap().clone()
    }

    pub fn list_slots(&self, filters: &FilterParams) -> Vec<RawAvailabilityRecord> {
        let type_filter = filters
            .iter()
            .find(|(key, _)| key == "appointment_types")
            .map(|(_, value)| value.clone());

        self.slots
            .lock()
            .unwrap()
            .iter()
            .filter(|slot| match &type_filter {
                Some(wanted) => {
                    slot.appointment_types.is_empty() || slot.appointment_types.contains(wanted)
                }
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn create_appointment(&self, payload: &AppointmentPayload) -> BookingResult {
        let mut appointments = self.appointments.lock().unwrap();
        let result = BookingResult {
            id: format!("appt_{}", appointments.len() + 1),
            customer_name: payload.customer_name.clone(),
            customer_email: payload.customer_email.clone(),
            appointment_type: payload.appointment_type.clone(),
            appointment_date: payload.appointment_date.clone(),
            appointment_time: payload.appointment_time.clone(),
            status: payload.status,
            verification_code: payload.verification_code.clone(),
        };
        appointments.push(result.clone());
        result
    }

    pub fn release_slot(&self, id: &str) {
        let mut slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.iter_mut().find(|s| s.id.as_deref() == Some(id)) {
            slot.is_active = false;
        }
        self.released_slots.lock().unwrap().push(id.to_string());
    }

    pub fn created_appointments(&self) -> Vec<BookingResult> {
        self.appointments.lock().unwrap().clone()
    }

    pub fn released_slot_ids(&self) -> Vec<String> {
        self.released_slots.lock().unwrap().clone()
    }
}

/// A mock client wired to serve and record against an in-memory store.
pub fn setup_mock_backend(
    types: Vec<AppointmentType>,
    slots: Vec<RawAvailabilityRecord>,
) -> (MockBackendClient, Arc<MockBackendStore>) {
    let store = Arc::new(MockBackendStore::new(types, slots));
    let mut client = MockBackendClient::new();

    let store_ref = Arc::clone(&store);
    client
        .expect_list_appointment_types()
        .returning(move |_| Ok(store_ref.list_types()));

    let store_ref = Arc::clone(&store);
    client
        .expect_list_availability_slots()
        .returning(move |filters| Ok(store_ref.list_slots(&filters)));

    let store_ref = Arc::clone(&store);
    client
        .expect_create_appointment()
        .returning(move |payload| Ok(store_ref.create_appointment(&payload)));

    let store_ref = Arc::clone(&store);
    client
        .expect_update_availability_slot()
        .returning(move |id, _patch| {
            store_ref.release_slot(&id);
            Ok(())
        });

    (client, store)
}

// --- shared fixtures ------------------------------------------------------

pub fn consultation_type() -> AppointmentType {
    AppointmentType {
        id: "type_consult".to_string(),
        name: "Design Consultation".to_string(),
        duration_minutes: 60,
        price: 0.0,
        description: Some("Initial consultation".to_string()),
        color: Some("#2563eb".to_string()),
        requires_verification: false,
        advance_booking_days: 0,
        is_active: true,
    }
}

pub fn verified_survey_type() -> AppointmentType {
    AppointmentType {
        id: "type_survey".to_string(),
        name: "Home Survey".to_string(),
        duration_minutes: 90,
        price: 50.0,
        description: None,
        color: None,
        requires_verification: true,
        advance_booking_days: 2,
        is_active: true,
    }
}

pub fn sample_catalog() -> Vec<AppointmentType> {
    vec![consultation_type(), verified_survey_type()]
}

pub fn recurring_record(id: &str, day_of_week: u8, start: &str, end: &str) -> RawAvailabilityRecord {
    RawAvailabilityRecord {
        id: Some(id.to_string()),
        day_of_week: Some(day_of_week),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        specialist_email: Some("sam@example.com".to_string()),
        appointment_types: vec!["type_consult".to_string()],
        ..Default::default()
    }
}

pub fn dated_record(id: &str, date: &str, time: &str) -> RawAvailabilityRecord {
    RawAvailabilityRecord {
        id: Some(id.to_string()),
        date: Some(date.to_string()),
        time: Some(time.to_string()),
        appointment_types: vec!["type_consult".to_string()],
        ..Default::default()
    }
}
