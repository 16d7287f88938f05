use serde::{Deserialize, Serialize};

// Appointment type as served by the backend catalog. Created and managed
// server-side; read-only to the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentType {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub requires_verification: bool,
    #[serde(default)]
    pub advance_booking_days: u32,
    // Records without the flag are treated as active.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl AppointmentType {
    /// Exact, case-sensitive match on either the identifier or the name.
    /// Availability records link to types by whichever of the two they carry.
    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name == key
    }
}

/// First active type in catalog order, used as the fallback when a record
/// carries no resolvable type linkage.
pub fn first_active(catalog: &[AppointmentType]) -> Option<&AppointmentType> {
    catalog.iter().find(|t| t.is_active)
}

/// Types offered for selection. Inactive types are never shown.
pub fn active_types(catalog: &[AppointmentType]) -> Vec<AppointmentType> {
    catalog.iter().filter(|t| t.is_active).cloned().collect()
}
