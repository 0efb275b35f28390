//! Relays — named binary actuators and their two per-actuator maps.
//!
//! A relay has two independently-meant booleans kept in two separate maps:
//! its current state ([`RelayStates`]) and whether it participates in
//! schedule-driven changes ([`ScheduleEnabled`]). The maps share the same
//! key space but are distinct types so they cannot be mixed up. Only user
//! toggles mutate enablement; the evaluator never does.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Stable string key naming one actuator (`relay1` .. `relay4` by
/// convention). Lowercase alphanumerics, `_` and `-` only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActuatorId(String);

impl ActuatorId {
    /// Validate and wrap a raw key.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyActuatorId`] for an empty string and
    /// [`ValidationError::InvalidActuatorId`] for disallowed characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ValidationError::EmptyActuatorId);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidActuatorId(raw));
        }
        Ok(Self(raw))
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActuatorId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ActuatorId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActuatorId> for String {
    fn from(id: ActuatorId) -> Self {
        id.0
    }
}

macro_rules! define_actuator_map {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name(BTreeMap<ActuatorId, bool>);

        impl $name {
            /// Empty map.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Look up a key; absent keys read as `false`.
            #[must_use]
            pub fn get(&self, id: &ActuatorId) -> bool {
                self.0.get(id).copied().unwrap_or(false)
            }

            /// Set a key.
            pub fn set(&mut self, id: ActuatorId, value: bool) {
                self.0.insert(id, value);
            }

            /// Iterate over the present keys and their values.
            pub fn iter(&self) -> impl Iterator<Item = (&ActuatorId, bool)> {
                self.0.iter().map(|(id, value)| (id, *value))
            }

            /// The keys present in this map.
            pub fn keys(&self) -> impl Iterator<Item = &ActuatorId> {
                self.0.keys()
            }

            /// Whether the map holds no keys at all.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Number of keys present.
            #[must_use]
            pub fn len(&self) -> usize {
                self.0.len()
            }
        }

        impl FromIterator<(ActuatorId, bool)> for $name {
            fn from_iter<I: IntoIterator<Item = (ActuatorId, bool)>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }
    };
}

define_actuator_map!(
    /// Current on/off state per actuator. Mutated by user toggles and by
    /// committed evaluator writes.
    RelayStates
);

define_actuator_map!(
    /// Whether each actuator participates in schedule-driven changes.
    /// Mutated by user toggles only.
    ScheduleEnabled
);

/// Read view of one relay: its state and its enablement flag together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relay {
    pub id: ActuatorId,
    pub state: bool,
    pub schedule_enabled: bool,
}

/// What a user toggle does to the schedule-enabled flag.
///
/// The default couples the two maps: turning a relay on or off also sets
/// its enablement to the same value. The coupling is a stated policy
/// rather than a hidden side effect of the toggle handler, and can be
/// switched off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TogglePolicy {
    /// Setting a relay's state also sets its schedule-enabled flag to the
    /// same value.
    #[default]
    FollowState,
    /// Toggles leave the schedule-enabled flag untouched.
    Independent,
}

impl TogglePolicy {
    /// The enablement value after a toggle to `new_state`, given the
    /// current flag.
    #[must_use]
    pub fn enabled_after_toggle(self, new_state: bool, current_enabled: bool) -> bool {
        match self {
            Self::FollowState => new_state,
            Self::Independent => current_enabled,
        }
    }
}

impl fmt::Display for TogglePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FollowState => f.write_str("follow-state"),
            Self::Independent => f.write_str("independent"),
        }
    }
}
