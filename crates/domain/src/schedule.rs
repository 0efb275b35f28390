//! Schedule rules — persisted time-of-day instructions for all relays.
//!
//! A rule fires when the current minute's `HH:MM` label equals the rule's
//! time, at most once per [`MinuteKey`] bucket. The minute key is the
//! idempotency unit: once a rule carries a stamp for bucket M, no further
//! commit may happen for that rule within M.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::ScheduleId;
use crate::time::Timestamp;

/// Wall-clock time of day, minute precision.
///
/// Parsed from `H:MM` or `HH:MM` (hour 0–23, minute 00–59) at the write
/// boundary; always rendered canonically as `HH:MM`. Matching against the
/// current minute is comparison of canonical labels in the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleTime {
    hour: u8,
    minute: u8,
}

impl ScheduleTime {
    /// Build from validated components.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTime`] when hour or minute is out
    /// of range.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime(format!("{hour}:{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    #[must_use]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Whether this time names the minute of `now`.
    #[must_use]
    pub fn matches<Tz>(self, now: &DateTime<Tz>) -> bool
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.to_string() == now.format("%H:%M").to_string()
    }
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ScheduleTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        if !hour.chars().all(|c| c.is_ascii_digit())
            || !minute.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for ScheduleTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScheduleTime> for String {
    fn from(time: ScheduleTime) -> Self {
        time.to_string()
    }
}

/// The state a rule applies to participating relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchAction {
    #[serde(rename = "ON")]
    On,
    #[serde(rename = "OFF")]
    Off,
}

impl SwitchAction {
    /// The boolean relay state this action drives toward.
    #[must_use]
    pub fn desired_state(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for SwitchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

impl FromStr for SwitchAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            other => Err(ValidationError::InvalidAction(other.to_string())),
        }
    }
}

/// Which relays a rule addresses. The product only ever schedules all
/// relays at once; the wire field stays explicit so per-relay scopes can
/// be added without a schema change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleScope {
    #[default]
    #[serde(rename = "ALL")]
    All,
}

impl fmt::Display for ScheduleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
        }
    }
}

/// `YYYYMMDDHHmm` string identifying one calendar minute in the configured
/// zone. The idempotency unit for rule execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinuteKey(String);

impl MinuteKey {
    /// The minute bucket containing `now`.
    #[must_use]
    pub fn of<Tz>(now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(now.format("%Y%m%d%H%M").to_string())
    }

    /// Wrap an already-formatted key read back from storage.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MinuteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted time-triggered instruction to set all relays to a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRule {
    pub id: ScheduleId,
    pub scope: ScheduleScope,
    pub time: ScheduleTime,
    pub action: SwitchAction,
    /// Creation instant; display ordering only (descending).
    pub created_at: Timestamp,
    /// Last minute bucket in which this rule produced a commit. Absent
    /// until first execution; stamped by the evaluator only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_execution: Option<MinuteKey>,
    /// Last execution instant, for display.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_run_at: Option<Timestamp>,
}

impl ScheduleRule {
    /// Create a fresh rule. Assigns the id; `created_at` is the caller's
    /// clock so creation stays deterministic in tests.
    #[must_use]
    pub fn create(time: ScheduleTime, action: SwitchAction, created_at: Timestamp) -> Self {
        Self {
            id: ScheduleId::new(),
            scope: ScheduleScope::All,
            time,
            action,
            created_at,
            last_execution: None,
            last_run_at: None,
        }
    }

    /// Whether this rule already produced a commit within `minute`.
    #[must_use]
    pub fn is_stamped_for(&self, minute: &MinuteKey) -> bool {
        self.last_execution.as_ref() == Some(minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn should_parse_two_digit_hour_time() {
        let time: ScheduleTime = "07:30".parse().unwrap();
        assert_eq!(time.hour(), 7);
        assert_eq!(time.minute(), 30);
    }

    #[test]
    fn should_parse_single_digit_hour_time() {
        let time: ScheduleTime = "7:05".parse().unwrap();
        assert_eq!(time.to_string(), "07:05");
    }

    #[test]
    fn should_reject_malformed_times() {
        for raw in ["", "0700", "7", "24:00", "12:60", "ab:cd", "1:5", ":30", "007:00", "-1:30"] {
            assert!(
                raw.parse::<ScheduleTime>().is_err(),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn should_render_canonical_label() {
        let time = ScheduleTime::new(0, 0).unwrap();
        assert_eq!(time.to_string(), "00:00");
        let time = ScheduleTime::new(23, 59).unwrap();
        assert_eq!(time.to_string(), "23:59");
    }

    #[test]
    fn should_roundtrip_time_through_serde_json() {
        let time: ScheduleTime = "06:45".parse().unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, "\"06:45\"");
        let parsed: ScheduleTime = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, time);
    }

    #[test]
    fn should_match_when_label_equals_current_minute() {
        let time: ScheduleTime = "07:00".parse().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 31).unwrap();
        assert!(time.matches(&now));
    }

    #[test]
    fn should_not_match_a_different_minute() {
        let time: ScheduleTime = "07:00".parse().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 7, 1, 0).unwrap();
        assert!(!time.matches(&now));
    }

    #[test]
    fn should_match_in_the_zone_of_the_supplied_instant() {
        // 07:00 +08:00 is 23:00 UTC the previous day; matching follows the
        // zone the caller resolved, not UTC.
        let zone = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = zone.with_ymd_and_hms(2025, 1, 2, 7, 0, 0).unwrap();
        let time: ScheduleTime = "07:00".parse().unwrap();
        assert!(time.matches(&now));
        assert!(!time.matches(&now.with_timezone(&Utc)));
    }

    #[test]
    fn should_format_minute_key_in_the_supplied_zone() {
        let zone = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = zone.with_ymd_and_hms(2025, 1, 2, 7, 0, 59).unwrap();
        assert_eq!(MinuteKey::of(&now).as_str(), "202501020700");
        assert_eq!(
            MinuteKey::of(&now.with_timezone(&Utc)).as_str(),
            "202501012300"
        );
    }

    #[test]
    fn should_map_action_to_desired_state() {
        assert!(SwitchAction::On.desired_state());
        assert!(!SwitchAction::Off.desired_state());
    }

    #[test]
    fn should_serialize_action_in_upper_case() {
        assert_eq!(serde_json::to_string(&SwitchAction::On).unwrap(), "\"ON\"");
        assert_eq!(
            serde_json::to_string(&SwitchAction::Off).unwrap(),
            "\"OFF\""
        );
    }

    #[test]
    fn should_parse_action_from_wire_labels() {
        assert_eq!("ON".parse::<SwitchAction>().unwrap(), SwitchAction::On);
        assert_eq!("OFF".parse::<SwitchAction>().unwrap(), SwitchAction::Off);
        assert!("on".parse::<SwitchAction>().is_err());
    }

    #[test]
    fn should_serialize_scope_as_all() {
        assert_eq!(
            serde_json::to_string(&ScheduleScope::All).unwrap(),
            "\"ALL\""
        );
    }

    #[test]
    fn should_create_rule_without_execution_stamp() {
        let rule = ScheduleRule::create(
            "07:00".parse().unwrap(),
            SwitchAction::On,
            crate::time::now(),
        );
        assert!(rule.last_execution.is_none());
        assert!(rule.last_run_at.is_none());
        assert_eq!(rule.scope, ScheduleScope::All);
    }

    #[test]
    fn should_report_stamped_only_for_the_recorded_minute() {
        let mut rule = ScheduleRule::create(
            "07:00".parse().unwrap(),
            SwitchAction::On,
            crate::time::now(),
        );
        rule.last_execution = Some(MinuteKey::from_raw("202501010700"));
        assert!(rule.is_stamped_for(&MinuteKey::from_raw("202501010700")));
        assert!(!rule.is_stamped_for(&MinuteKey::from_raw("202501010701")));
    }

    #[test]
    fn should_roundtrip_rule_through_serde_json() {
        let rule = ScheduleRule::create(
            "18:30".parse().unwrap(),
            SwitchAction::Off,
            crate::time::now(),
        );
        let json = serde_json::to_string(&rule).unwrap();
        let parsed: ScheduleRule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn should_omit_absent_stamp_fields_from_json() {
        let rule = ScheduleRule::create(
            "18:30".parse().unwrap(),
            SwitchAction::Off,
            crate::time::now(),
        );
        let json = serde_json::to_value(&rule).unwrap();
        assert!(json.get("last_execution").is_none());
        assert!(json.get("last_run_at").is_none());
    }
}
