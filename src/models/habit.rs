use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseModelError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseModelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// How a habit is measured on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingType {
    Boolean,
    Quantity,
    Duration,
    Scale,
}

impl TrackingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingType::Boolean => "boolean",
            TrackingType::Quantity => "quantity",
            TrackingType::Duration => "duration",
            TrackingType::Scale => "scale",
        }
    }

    /// Whether checking in requires a numeric value.
    pub fn wants_value(&self) -> bool {
        !matches!(self, TrackingType::Boolean)
    }
}

impl FromStr for TrackingType {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(TrackingType::Boolean),
            "quantity" => Ok(TrackingType::Quantity),
            "duration" => Ok(TrackingType::Duration),
            "scale" => Ok(TrackingType::Scale),
            _ => Err(ParseModelError::new("tracking type", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    SpecificDays,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::SpecificDays => "specific_days",
        }
    }
}

impl FromStr for Frequency {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "specific_days" => Ok(Frequency::SpecificDays),
            _ => Err(ParseModelError::new("frequency", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Anytime,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Anytime => "anytime",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anytime" => Ok(TimeOfDay::Anytime),
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            _ => Err(ParseModelError::new("time of day", s)),
        }
    }
}

/// Habit-stacking relation: where this habit sits relative to its cue habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueType {
    After,
    Before,
    With,
}

impl CueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CueType::After => "after",
            CueType::Before => "before",
            CueType::With => "with",
        }
    }
}

impl FromStr for CueType {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "after" => Ok(CueType::After),
            "before" => Ok(CueType::Before),
            "with" => Ok(CueType::With),
            _ => Err(ParseModelError::new("cue type", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub tracking_type: TrackingType,
    pub target_value: Option<f64>,
    pub target_unit: Option<String>,
    pub frequency: Frequency,
    /// Weekday numbers (0 = Sunday) when frequency is specific_days.
    pub frequency_days: Option<Vec<u8>>,
    pub time_of_day: TimeOfDay,
    pub cue_habit_id: Option<i64>,
    pub cue_type: Option<CueType>,
    pub archived: bool,
    pub sort_order: i32,
    pub created_at: String,
}

impl Habit {
    pub fn display_icon(&self) -> &str {
        self.icon.as_deref().unwrap_or("•")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_type_round_trips() {
        for s in ["boolean", "quantity", "duration", "scale"] {
            assert_eq!(TrackingType::from_str(s).unwrap().as_str(), s);
        }
        assert!(TrackingType::from_str("photo").is_err());
    }

    #[test]
    fn frequency_uses_snake_case() {
        assert_eq!(
            Frequency::from_str("specific_days").unwrap(),
            Frequency::SpecificDays
        );
        assert_eq!(Frequency::SpecificDays.as_str(), "specific_days");
    }

    #[test]
    fn parse_error_names_the_value() {
        let err = CueType::from_str("besides").unwrap_err();
        assert_eq!(err.to_string(), "unknown cue type 'besides'");
    }
}
