// libs/scheduling-cell/src/models.rs
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// ==============================================================================
// WIRE FORMATS
// ==============================================================================

/// Serde adapter for `HH:MM` time strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional `HH:MM` time strings.
pub mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&t.format(super::hhmm::FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| {
            NaiveTime::parse_from_str(&s, super::hhmm::FORMAT).map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

// ==============================================================================
// APPOINTMENT TYPES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    GeneralConsultation,
    FollowUp,
    PhysicalExam,
    SpecialistConsultation,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 4] = [
        AppointmentType::GeneralConsultation,
        AppointmentType::FollowUp,
        AppointmentType::PhysicalExam,
        AppointmentType::SpecialistConsultation,
    ];

    pub fn duration_minutes(self) -> i64 {
        match self {
            AppointmentType::GeneralConsultation => 30,
            AppointmentType::FollowUp => 15,
            AppointmentType::PhysicalExam => 45,
            AppointmentType::SpecialistConsultation => 60,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentType::GeneralConsultation => "general-consultation",
            AppointmentType::FollowUp => "follow-up",
            AppointmentType::PhysicalExam => "physical-exam",
            AppointmentType::SpecialistConsultation => "specialist-consultation",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Time-of-day buckets used to filter an already-computed slot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePreference {
    Morning,
    Afternoon,
    Evening,
    Any,
}

impl fmt::Display for TimePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePreference::Morning => write!(f, "morning"),
            TimePreference::Afternoon => write!(f, "afternoon"),
            TimePreference::Evening => write!(f, "evening"),
            TimePreference::Any => write!(f, "any"),
        }
    }
}

// ==============================================================================
// SCHEDULE DOCUMENT
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default, with = "hhmm_opt")]
    pub lunch_start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub lunch_end: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSettings {
    pub slot_interval_minutes: i64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            slot_interval_minutes: 15,
        }
    }
}

/// The persistence collaborator's document: working hours keyed by lowercase
/// weekday name, blocked dates, slot stepping, and the booking list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicSchedule {
    pub working_hours: HashMap<String, WorkingHours>,
    #[serde(default)]
    pub blocked_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub settings: ScheduleSettings,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Default for ClinicSchedule {
    fn default() -> Self {
        let weekday = WorkingHours {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            lunch_start: NaiveTime::from_hms_opt(12, 0, 0),
            lunch_end: NaiveTime::from_hms_opt(13, 0, 0),
        };
        let saturday = WorkingHours {
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            lunch_start: None,
            lunch_end: None,
        };

        let mut working_hours = HashMap::new();
        for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
            working_hours.insert(day.to_string(), weekday.clone());
        }
        working_hours.insert("saturday".to_string(), saturday);

        Self {
            working_hours,
            blocked_dates: Vec::new(),
            settings: ScheduleSettings::default(),
            bookings: Vec::new(),
        }
    }
}

// ==============================================================================
// BOOKINGS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl PatientInfo {
    /// Basic contact validation, rejected before any state is touched.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().len() < 2 {
            return Err("Patient name must be at least 2 characters".to_string());
        }
        if !self.email.contains('@') || !self.email.contains('.') {
            return Err(format!("Invalid email address: {}", self.email));
        }
        let digits = self.phone.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < 10 {
            return Err("Phone number must contain at least 10 digits".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub appointment_type: AppointmentType,
    pub patient: PatientInfo,
    pub reason: String,
    pub confirmation_code: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// One bookable interval. Recomputed on every availability query; cached
/// copies are advisory and must be re-validated before booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub appointment_type: AppointmentType,
    pub duration_minutes: i64,
    pub available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub day_name: String,
    pub available_slots: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub appointment_type: AppointmentType,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub patient: PatientInfo,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDetails {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub duration_minutes: i64,
    pub appointment_type: AppointmentType,
    pub patient_name: String,
    pub patient_email: String,
    pub clinic_name: String,
    pub clinic_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub status: BookingStatus,
    pub confirmation_code: String,
    pub details: BookingDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRequest {
    pub booking_id: String,
    pub confirmation_code: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub status: BookingStatus,
    pub booking_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub booking_id: String,
    pub confirmation_code: String,
    pub new_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub new_start_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleResponse {
    pub status: String,
    pub booking_id: String,
    pub new_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub new_start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub new_end_time: NaiveTime,
    pub message: String,
}
