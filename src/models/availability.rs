use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Raw availability record as received from the backend. Two shapes arrive
/// through the same entity: dated records carry `date` + `time`, recurring
/// templates carry `day_of_week` + `start_time` + `end_time`. Everything is
/// optional at the wire level; `AvailabilityRecord::try_from_raw` decides
/// which shape a record actually is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAvailabilityRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    // 0 = Sunday .. 6 = Saturday, matching the data the backend serves.
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub specialist_email: Option<String>,
    // Type ids or names this record is linked to.
    #[serde(default)]
    pub appointment_types: Vec<String>,
}

fn default_active() -> bool {
    true
}

// Records without the flag are active, in code as on the wire.
impl Default for RawAvailabilityRecord {
    fn default() -> Self {
        Self {
            id: None,
            date: None,
            time: None,
            day_of_week: None,
            start_time: None,
            end_time: None,
            is_active: true,
            specialist_email: None,
            appointment_types: Vec::new(),
        }
    }
}

/// Minute-of-day wrapper so "9:00" and "09:00" compare and print the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn parse(value: &str) -> Result<Self, String> {
        let (hour_str, minute_str) = value
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("time '{}' is not in HH:MM format", value))?;
        let hour: u16 = hour_str
            .parse()
            .map_err(|_| format!("time '{}' has an unparseable hour", value))?;
        let minute: u16 = minute_str
            .parse()
            .map_err(|_| format!("time '{}' has an unparseable minute", value))?;
        if hour > 23 || minute > 59 {
            return Err(format!("time '{}' is out of range", value));
        }
        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }

    pub fn plus_minutes(self, minutes: u16) -> Self {
        Self {
            minutes: self.minutes + minutes,
        }
    }

    /// Zero-padded `HH:MM`, the canonical slot time label. Lexicographic
    /// ordering of labels agrees with chronological ordering.
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Normalized availability shape, resolved from the raw record in one place
// instead of shape-sniffing at every use site.
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityKind {
    Dated {
        date: NaiveDate,
        time: TimeOfDay,
    },
    Recurring {
        day_of_week: u8,
        start: TimeOfDay,
        end: TimeOfDay,
    },
}

#[derive(Debug, Clone)]
pub struct AvailabilityRecord {
    pub kind: AvailabilityKind,
    pub is_active: bool,
    pub specialist_email: Option<String>,
    pub appointment_types: Vec<String>,
    pub source_id: Option<String>,
}

impl AvailabilityRecord {
    /// The single normalization point for both raw shapes. Malformed records
    /// come back as `Err` and are skipped by the resolver, never fatal.
    pub fn try_from_raw(raw: &RawAvailabilityRecord) -> Result<Self, String> {
        let kind = match (&raw.date, &raw.time, raw.day_of_week) {
            (Some(date), Some(time), _) => {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| format!("unparseable date '{}': {}", date, e))?;
                AvailabilityKind::Dated {
                    date,
                    time: TimeOfDay::parse(time)?,
                }
            }
            (_, _, Some(day_of_week)) => {
                if day_of_week > 6 {
                    return Err(format!("day_of_week {} is out of range 0-6", day_of_week));
                }
                let start = raw
                    .start_time
                    .as_deref()
                    .ok_or("recurring record is missing start_time")?;
                let end = raw
                    .end_time
                    .as_deref()
                    .ok_or("recurring record is missing end_time")?;
                let start = TimeOfDay::parse(start)?;
                let end = TimeOfDay::parse(end)?;
                if end <= start {
                    return Err(format!(
                        "recurring record has end_time {} not after start_time {}",
                        end, start
                    ));
                }
                AvailabilityKind::Recurring {
                    day_of_week,
                    start,
                    end,
                }
            }
            _ => return Err("record is neither dated nor recurring".to_string()),
        };

        Ok(Self {
            kind,
            is_active: raw.is_active,
            specialist_email: raw.specialist_email.clone(),
            appointment_types: raw.appointment_types.clone(),
            source_id: raw.id.clone(),
        })
    }
}

/// A concrete bookable (date, time) pair after expansion and type matching.
/// Identity for deduplication and selection is the (date, time) pair.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSlot {
    pub date: NaiveDate,
    pub time: String,
    pub appointment_type_id: String,
    pub specialist_email: Option<String>,
    pub source_record_id: Option<String>,
    pub source_active: bool,
}

/// One window date with its ascending, duplicate-free slot list.
#[derive(Debug, Clone, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub day_name: String,
    pub slots: Vec<ResolvedSlot>,
}

impl DaySchedule {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            day_name: date.format("%A").to_string(),
            slots: Vec::new(),
        }
    }
}

/// A Monday-start 7-day display window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    start: NaiveDate,
}

impl WeekWindow {
    /// The window containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let back = date.weekday().num_days_from_monday() as i64;
        Self {
            start: date - Duration::days(back),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        core::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.end()
    }

    pub fn previous(&self) -> Self {
        Self {
            start: self.start - Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::days(7),
        }
    }

    /// Header label, e.g. "05/01/2026 - 11/01/2026".
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start().format("%d/%m/%Y"),
            self.end().format("%d/%m/%Y")
        )
    }
}

/// The resolved weekly calendar. The resolver emits all seven window days;
/// the eligibility filter drops days left with no bookable slots, so a
/// displayed view only ever contains non-empty days inside the window.
#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    #[serde(skip)]
    pub window: WeekWindow,
    pub days: Vec<DaySchedule>,
}

impl WeekView {
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.slots.is_empty())
    }

    pub fn total_slots(&self) -> usize {
        self.days.iter().map(|d| d.slots.len()).sum()
    }

    pub fn find_slot(&self, date: NaiveDate, time: &str) -> Option<&ResolvedSlot> {
        self.days
            .iter()
            .find(|d| d.date == date)
            .and_then(|d| d.slots.iter().find(|s| s.time == time))
    }
}
