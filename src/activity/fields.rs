use serde::Serialize;

use super::pace::{pace_from_float, pace_to_float};
use super::ActivityRecord;
use crate::lenient::parse_lenient;
use crate::types::units::{from_display, to_display, UnitKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Distance,
    Average,
    Upositive,
    Unegative,
    Maxspeed,
    Maxpace,
    Pace,
    Calories,
    Time,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Distance,
        Field::Average,
        Field::Upositive,
        Field::Unegative,
        Field::Maxspeed,
        Field::Maxpace,
        Field::Pace,
        Field::Calories,
        Field::Time,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        Field::ALL.into_iter().find(|field| field.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Distance => "distance",
            Field::Average => "average",
            Field::Upositive => "upositive",
            Field::Unegative => "unegative",
            Field::Maxspeed => "maxspeed",
            Field::Maxpace => "maxpace",
            Field::Pace => "pace",
            Field::Calories => "calories",
            Field::Time => "time",
        }
    }

    pub fn access(&self) -> &'static FieldAccess {
        match self {
            Field::Distance => &DISTANCE,
            Field::Average => &AVERAGE,
            Field::Upositive => &UPOSITIVE,
            Field::Unegative => &UNEGATIVE,
            Field::Maxspeed => &MAXSPEED,
            Field::Maxpace => &MAXPACE,
            Field::Pace => &PACE,
            Field::Calories => &CALORIES,
            Field::Time => &TIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Zero, empty and missing all mean "nothing recorded". A genuine zero
    /// cannot be told apart from an absent value.
    pub fn is_no_data(&self) -> bool {
        match self {
            FieldValue::Number(value) => *value == 0.0,
            FieldValue::Integer(value) => *value == 0,
            FieldValue::Text(value) => value.is_empty(),
            FieldValue::Missing => true,
        }
    }

    /// Renders the value; `precision` only applies to numbers. Without one,
    /// floats keep at least one decimal (`12.0`).
    pub fn render(&self, precision: Option<usize>) -> String {
        match (self, precision) {
            (FieldValue::Number(value), Some(precision)) => format!("{:.*}", precision, value),
            (FieldValue::Number(value), None) => format!("{:?}", value),
            (FieldValue::Integer(value), Some(precision)) => {
                format!("{:.*}", precision, *value as f64)
            }
            (FieldValue::Integer(value), None) => value.to_string(),
            (FieldValue::Text(value), _) => value.clone(),
            (FieldValue::Missing, _) => String::new(),
        }
    }
}

pub type Getter = fn(&ActivityRecord) -> FieldValue;
/// Returns false when the input could not be used and nothing changed.
pub type Setter = fn(&mut ActivityRecord, &str) -> bool;

/// How one field is read and written, including its unit rule.
pub struct FieldAccess {
    pub unit: Option<UnitKind>,
    pub get: Getter,
    pub set: Option<Setter>,
}

static DISTANCE: FieldAccess = FieldAccess {
    unit: Some(UnitKind::Distance),
    get: |record| FieldValue::Number(record.display(UnitKind::Distance, record.scalars.distance)),
    set: Some(set_distance),
};

static AVERAGE: FieldAccess = FieldAccess {
    unit: Some(UnitKind::Speed),
    get: |record| FieldValue::Number(record.display(UnitKind::Speed, record.scalars.average)),
    set: Some(set_average),
};

static UPOSITIVE: FieldAccess = FieldAccess {
    unit: Some(UnitKind::Elevation),
    get: |record| {
        FieldValue::Number(record.display(UnitKind::Elevation, record.scalars.upositive))
    },
    set: Some(set_upositive),
};

static UNEGATIVE: FieldAccess = FieldAccess {
    unit: Some(UnitKind::Elevation),
    get: |record| {
        FieldValue::Number(record.display(UnitKind::Elevation, record.scalars.unegative))
    },
    set: Some(set_unegative),
};

static MAXSPEED: FieldAccess = FieldAccess {
    unit: Some(UnitKind::Speed),
    get: |record| FieldValue::Number(record.display(UnitKind::Speed, record.scalars.maxspeed)),
    set: Some(set_maxspeed),
};

static MAXPACE: FieldAccess = FieldAccess {
    unit: Some(UnitKind::Pace),
    get: |record| {
        FieldValue::Text(pace_from_float(
            record.display(UnitKind::Pace, record.scalars.maxpace),
        ))
    },
    set: Some(set_maxpace),
};

static PACE: FieldAccess = FieldAccess {
    unit: Some(UnitKind::Pace),
    get: |record| {
        FieldValue::Text(pace_from_float(record.display(UnitKind::Pace, record.scalars.pace)))
    },
    set: Some(set_pace),
};

static CALORIES: FieldAccess = FieldAccess {
    unit: None,
    get: |record| FieldValue::Integer(record.scalars.calories),
    set: None,
};

static TIME: FieldAccess = FieldAccess {
    unit: None,
    get: |record| FieldValue::Text(format_duration(record.scalars.time)),
    set: None,
};

fn set_distance(record: &mut ActivityRecord, value: &str) -> bool {
    record.scalars.distance = record.metric(UnitKind::Distance, parse_lenient(value));
    true
}

fn set_average(record: &mut ActivityRecord, value: &str) -> bool {
    record.scalars.average = record.metric(UnitKind::Speed, parse_lenient(value));
    true
}

fn set_upositive(record: &mut ActivityRecord, value: &str) -> bool {
    record.scalars.upositive = record.metric(UnitKind::Elevation, parse_lenient(value));
    true
}

fn set_unegative(record: &mut ActivityRecord, value: &str) -> bool {
    record.scalars.unegative = record.metric(UnitKind::Elevation, parse_lenient(value));
    true
}

fn set_maxspeed(record: &mut ActivityRecord, value: &str) -> bool {
    record.scalars.maxspeed = record.metric(UnitKind::Speed, parse_lenient(value));
    true
}

fn set_maxpace(record: &mut ActivityRecord, value: &str) -> bool {
    match pace_to_float(value) {
        Some(pace) => {
            record.scalars.maxpace = record.metric(UnitKind::Pace, pace);
            true
        }
        None => false,
    }
}

fn set_pace(record: &mut ActivityRecord, value: &str) -> bool {
    match pace_to_float(value) {
        Some(pace) => {
            record.scalars.pace = record.metric(UnitKind::Pace, pace);
            true
        }
        None => false,
    }
}

/// `MM:SS` under an hour, `H:MM:SS` otherwise, empty for no duration.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return String::new();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours == 0 {
        format!("{:02}:{:02}", minutes, secs)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    }
}

impl ActivityRecord {
    pub(crate) fn display(&self, kind: UnitKind, value: f64) -> f64 {
        to_display(self.measurement_system, kind, value)
    }

    pub(crate) fn metric(&self, kind: UnitKind, value: f64) -> f64 {
        from_display(self.measurement_system, kind, value)
    }

    /// Value of a field by name, converted for display. Unknown names give
    /// [`FieldValue::Missing`].
    pub fn get_value(&self, name: &str) -> FieldValue {
        match Field::from_str(name) {
            Some(field) => self.value(field),
            None => {
                tracing::warn!(
                    "Unable to provide value for unknown parameter ({}) for activity {}",
                    name,
                    self.id
                );
                FieldValue::Missing
            }
        }
    }

    pub fn value(&self, field: Field) -> FieldValue {
        (field.access().get)(self)
    }

    /// Display string for a field; empty when the field holds no data.
    pub fn get_value_formatted(
        &self,
        name: &str,
        precision: Option<usize>,
        with_units: bool,
    ) -> String {
        let value = self.get_value(name);
        if value.is_no_data() {
            return String::new();
        }
        let mut result = value.render(precision);
        if with_units {
            let unit = Field::from_str(name).and_then(|field| field.access().unit);
            if let Some(unit) = unit {
                result.push_str(self.units.label(unit));
            }
        }
        result
    }

    /// Stores a display-unit value as metric. Returns whether anything changed.
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        let setter = Field::from_str(name).and_then(|field| field.access().set);
        let Some(setter) = setter else {
            tracing::warn!(
                "Unable to set value ({}) for unknown parameter ({}) for activity {}",
                value,
                name,
                self.id
            );
            return false;
        };
        let changed = setter(self, value);
        if !changed {
            tracing::warn!("Ignoring unparseable value ({}) for {}", value, name);
        }
        changed
    }
}
