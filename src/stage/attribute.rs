//! Attributes: a declared type, an optional default and sorted time samples.

use serde::{Deserialize, Serialize};

use super::value::{Value, ValueTypeName};
use crate::core::{Interpolation, TimeCode};
use crate::util::{Error, Result};

/// One time-sampled value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSample {
    #[serde(with = "super::non_finite")]
    pub time: f64,
    pub value: Value,
}

/// A typed, optionally time-sampled property of a prim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    type_name: ValueTypeName,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interpolation: Option<Interpolation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    samples: Vec<TimeSample>,
}

impl Attribute {
    pub fn new(type_name: ValueTypeName, custom: bool) -> Self {
        Self {
            type_name,
            custom,
            interpolation: None,
            default: None,
            samples: Vec::new(),
        }
    }

    #[inline]
    pub fn type_name(&self) -> ValueTypeName {
        self.type_name
    }

    /// Custom attributes are user data rather than schema properties.
    #[inline]
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Interpolation metadata, if authored.
    #[inline]
    pub fn interpolation(&self) -> Option<Interpolation> {
        self.interpolation
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = Some(interpolation);
    }

    /// True when a default or at least one sample is authored.
    pub fn has_value(&self) -> bool {
        self.default.is_some() || !self.samples.is_empty()
    }

    /// Resolve the value at `time`.
    ///
    /// The default time code reads only the default slot. A numeric time reads
    /// the last sample at or before it (the first sample when earlier than all
    /// of them) and falls back to the default when nothing is sampled.
    pub fn get(&self, time: TimeCode) -> Option<&Value> {
        match time {
            TimeCode::Default => self.default.as_ref(),
            TimeCode::Time(t) => {
                if self.samples.is_empty() {
                    return self.default.as_ref();
                }
                let after = self.samples.partition_point(|s| s.time <= t);
                let index = after.saturating_sub(1);
                Some(&self.samples[index].value)
            }
        }
    }

    /// Author `value` at `time`, replacing any sample at the same time.
    pub fn set(&mut self, value: Value, time: TimeCode) -> Result<()> {
        if !value.is_compatible_with(&self.type_name) {
            return Err(Error::invalid_argument(format!(
                "cannot store {} in attribute of type {}",
                value.storage_type(),
                self.type_name
            )));
        }
        match time {
            TimeCode::Default => self.default = Some(value),
            TimeCode::Time(t) if !t.is_finite() => {
                return Err(Error::invalid_argument(format!(
                    "cannot author a sample at time {}",
                    t
                )));
            }
            TimeCode::Time(t) => {
                match self.samples.binary_search_by(|s| s.time.total_cmp(&t)) {
                    Ok(i) => self.samples[i].value = value,
                    Err(i) => self.samples.insert(i, TimeSample { time: t, value }),
                }
            }
        }
        Ok(())
    }

    pub fn num_time_samples(&self) -> usize {
        self.samples.len()
    }

    /// Sampled times in ascending order.
    pub fn time_samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    /// Conservative: more than one sample means the value may change.
    pub fn value_might_be_time_varying(&self) -> bool {
        self.samples.len() > 1
    }
}
