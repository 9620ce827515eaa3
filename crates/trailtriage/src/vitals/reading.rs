//! Vital signs readings.
//!
//! A reading is produced by the note editor and handed to the tracker only as
//! the trigger for a recorded check. It is never stored here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// One timestamped set of vital signs. Every measurement is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    /// Reading identifier.
    pub id: Uuid,
    /// When the reading was taken.
    pub timestamp: DateTime<Utc>,
    /// Beats per minute.
    pub heart_rate: Option<u16>,
    /// Breaths per minute.
    pub respiratory_rate: Option<u16>,
    /// Systolic pressure, mmHg.
    pub blood_pressure_systolic: Option<u16>,
    /// Diastolic pressure, mmHg.
    pub blood_pressure_diastolic: Option<u16>,
    /// Core temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// `SpO2` percentage.
    pub oxygen_saturation: Option<u8>,
    /// Free-text observations.
    pub notes: Option<String>,
}

impl VitalSigns {
    /// An empty reading taken at `timestamp`.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            heart_rate: None,
            respiratory_rate: None,
            blood_pressure_systolic: None,
            blood_pressure_diastolic: None,
            temperature: None,
            oxygen_saturation: None,
            notes: None,
        }
    }

    /// Set the heart rate.
    #[must_use]
    pub fn with_heart_rate(mut self, bpm: u16) -> Self {
        self.heart_rate = Some(bpm);
        self
    }

    /// Set the respiratory rate.
    #[must_use]
    pub fn with_respiratory_rate(mut self, per_minute: u16) -> Self {
        self.respiratory_rate = Some(per_minute);
        self
    }

    /// Set both blood pressure values.
    #[must_use]
    pub fn with_blood_pressure(mut self, systolic: u16, diastolic: u16) -> Self {
        self.blood_pressure_systolic = Some(systolic);
        self.blood_pressure_diastolic = Some(diastolic);
        self
    }

    /// Set the temperature in Celsius.
    #[must_use]
    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    /// Set oxygen saturation.
    #[must_use]
    pub fn with_oxygen_saturation(mut self, percent: u8) -> Self {
        self.oxygen_saturation = Some(percent);
        self
    }

    /// Attach free-text notes. Blank text is ignored.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        if !notes.trim().is_empty() {
            self.notes = Some(notes);
        }
        self
    }

    /// `"120/80"`, only when both values are present.
    #[must_use]
    pub fn blood_pressure(&self) -> Option<String> {
        match (self.blood_pressure_systolic, self.blood_pressure_diastolic) {
            (Some(sys), Some(dia)) => Some(format!("{sys}/{dia}")),
            _ => None,
        }
    }

    /// Temperature converted to Fahrenheit.
    #[must_use]
    pub fn temperature_fahrenheit(&self) -> Option<f64> {
        self.temperature.map(|c| c * 9.0 / 5.0 + 32.0)
    }

    /// True when no measurement and no notes were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none()
            && self.respiratory_rate.is_none()
            && self.blood_pressure_systolic.is_none()
            && self.blood_pressure_diastolic.is_none()
            && self.temperature.is_none()
            && self.oxygen_saturation.is_none()
            && self.notes.is_none()
    }

    /// One-line summary listing only the values that were taken.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(hr) = self.heart_rate {
            parts.push(format!("HR: {hr}"));
        }
        if let Some(rr) = self.respiratory_rate {
            parts.push(format!("RR: {rr}"));
        }
        if let Some(bp) = self.blood_pressure() {
            parts.push(format!("BP: {bp}"));
        }
        if let (Some(c), Some(f)) = (self.temperature, self.temperature_fahrenheit()) {
            parts.push(format!("Temp: {c:.1}°C ({f:.1}°F)"));
        }
        if let Some(spo2) = self.oxygen_saturation {
            parts.push(format!("SpO2: {spo2}%"));
        }

        let mut line = parts.join(" ");
        if let Some(notes) = &self.notes {
            if !line.is_empty() {
                line.push_str(" - ");
            }
            line.push_str(notes);
        }
        line
    }
}

/// Parse `"SYS/DIA"` blood pressure input.
///
/// # Errors
///
/// Returns [`Error::InvalidVital`] if the input is not two slash-separated
/// numbers or the systolic value is not above the diastolic one.
pub fn parse_blood_pressure(input: &str) -> Result<(u16, u16)> {
    let (sys, dia) = input
        .split_once('/')
        .ok_or_else(|| Error::invalid_vital("blood_pressure", "expected SYS/DIA, e.g. 120/80"))?;

    let sys: u16 = sys
        .trim()
        .parse()
        .map_err(|_| Error::invalid_vital("blood_pressure", format!("bad systolic value '{sys}'")))?;
    let dia: u16 = dia.trim().parse().map_err(|_| {
        Error::invalid_vital("blood_pressure", format!("bad diastolic value '{dia}'"))
    })?;

    if sys <= dia {
        return Err(Error::invalid_vital(
            "blood_pressure",
            format!("systolic ({sys}) must be greater than diastolic ({dia})"),
        ));
    }
    Ok((sys, dia))
}
