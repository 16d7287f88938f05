use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::models::availability::RawAvailabilityRecord;
use crate::models::booking::{AppointmentPayload, BookingResult};
use crate::models::catalog::AppointmentType;

/// Filter key/value pairs passed through to the backend as query parameters.
pub type FilterParams = Vec<(String, String)>;

/// The backend collaborator's entity operations, abstracted so the widget and
/// the submission path can run against a mock in tests.
#[async_trait]
pub trait Base44Api: Send + Sync {
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

/// HTTP client for the Base44 entity API.
///
/// Every entity exposes `list` (GET with query-parameter filters), `create`
/// (POST) and `update` (PUT) under `{base}/{entity}`. Authentication is a
/// bearer API key on every request.
pub struct Base44Client {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Base44Client {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(config.api_base_url.clone(), config.api_key.clone())
    }

    fn entity_url(&self, entity: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), entity)
    }

    async fn list_entity<T: DeserializeOwned>(
        &self,
        entity: &str,
        filters: &FilterParams,
    ) -> Result<Vec<T>, WidgetError> {
        let url = self.entity_url(entity);
        debug!("GET {} with {} filter(s)", url, filters.len());

        let response = self
            .client
            .get(&url)
            .query(filters)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn create_entity<B: Serialize, T: DeserializeOwned>(
        &self,
        entity: &str,
        body: &B,
    ) -> Result<T, WidgetError> {
        let url = self.entity_url(entity);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn update_entity<B: Serialize>(
        &self,
        entity: &str,
        id: &str,
        body: &B,
    ) -> Result<(), WidgetError> {
        let url = format!("{}/{}", self.entity_url(entity), id);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, WidgetError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WidgetError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl Base44Api for Base44Client {
    async fn list_appointment_types(
        &self,
        filters: FilterParams,
    ) -> Result<Vec<AppointmentType>, WidgetError> {
        info!("Listing appointment types");
        let types: Vec<AppointmentType> = self.list_entity("AppointmentType", &filters).await?;
        debug!("Retrieved {} appointment types", types.len());
        Ok(types)
    }

    async fn list_availability_slots(
        &self,
        filters: FilterParams,
    ) -> Result<Vec<RawAvailabilityRecord>, WidgetError> {
        info!("Listing availability slots");
        let slots: Vec<RawAvailabilityRecord> =
            self.list_entity("AvailabilitySlot", &filters).await?;
        debug!("Retrieved {} availability records", slots.len());
        Ok(slots)
    }

    async fn create_appointment(
        &self,
        payload: AppointmentPayload,
    ) -> Result<BookingResult, WidgetError> {
        info!(
            "Creating {} appointment for {} on {} {}",
            payload.status.as_str(),
            payload.customer_email,
            payload.appointment_date,
            payload.appointment_time
        );
        let result: BookingResult = self.create_entity("Appointment", &payload).await?;
        info!("Appointment created with id {}", result.id);
        Ok(result)
    }

    async fn update_availability_slot(
        &self,
        id: String,
        patch: serde_json::Value,
    ) -> Result<(), WidgetError> {
        debug!("Updating availability slot {}", id);
        self.update_entity("AvailabilitySlot", &id, &patch).await
    }
}
