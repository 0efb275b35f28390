//! The schedule evaluator — a pure function from a clock instant and a
//! store snapshot to the minimal set of writes, stamps, and audit entries.
//!
//! Correctness rests on two distinctions:
//!
//! - **"already executed" vs "already satisfied"**: a rule whose minute
//!   stamp equals the current bucket contributes nothing, ever. A rule
//!   that matches but finds no enabled, mismatched relay is skipped
//!   *without* being stamped, so a toggle later in the same minute can
//!   still be caught by a subsequent evaluation.
//! - **gating vs acting**: enablement only decides whether a rule has
//!   work to do. Once triggered, the rule writes the desired state to
//!   *every* relay present in the snapshot.
//!
//! Rules are visited in ascending id order so the outcome is identical
//! for any input ordering; when two triggered rules disagree, the later
//! one wins and the pair is surfaced in [`Evaluation::conflicts`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ScheduleId;
use crate::log::ExecutionEntry;
use crate::relay::{ActuatorId, RelayStates, ScheduleEnabled};
use crate::schedule::{MinuteKey, ScheduleRule};
use crate::time::Timestamp;

/// Execution stamp queued for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStamp {
    pub schedule_id: ScheduleId,
    pub minute_key: MinuteKey,
    pub run_at: Timestamp,
}

/// Output of one evaluation pass. Empty `writes` means nothing to commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Relay writes to apply, last-writer-per-key.
    pub writes: BTreeMap<ActuatorId, bool>,
    /// Minute stamps for every rule that produced writes.
    pub stamps: Vec<RuleStamp>,
    /// Audit entries, one per stamped rule.
    pub entries: Vec<ExecutionEntry>,
    /// Pairs of rules where the second overwrote the first with a
    /// different value within this pass. Ambiguous configuration, not an
    /// error; callers log it distinctly.
    pub conflicts: Vec<(ScheduleId, ScheduleId)>,
}

impl Evaluation {
    /// Number of rules that produced a commit.
    #[must_use]
    pub fn executed(&self) -> usize {
        self.stamps.len()
    }

    /// Whether there is nothing to commit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Evaluate the rule set against one snapshot at one instant.
///
/// `now` must already be resolved into the configured zone; `rules`,
/// `states` and `enabled` must come from a single snapshot read. Calling
/// this twice with identical inputs yields identical output.
#[must_use]
pub fn evaluate<Tz>(
    now: &DateTime<Tz>,
    rules: &[ScheduleRule],
    states: &RelayStates,
    enabled: &ScheduleEnabled,
) -> Evaluation
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let minute_key = MinuteKey::of(now);
    let run_at = now.with_timezone(&Utc);

    let mut ordered: Vec<&ScheduleRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.id);

    let mut evaluation = Evaluation::default();
    let mut last_writer: Option<(ScheduleId, bool)> = None;

    for rule in ordered {
        if !rule.time.matches(now) {
            continue;
        }
        if rule.is_stamped_for(&minute_key) {
            continue;
        }

        let desired = rule.action.desired_state();

        // Work to do = at least one schedule-enabled relay whose snapshot
        // state differs from the desired one. No work: skip WITHOUT
        // stamping, so the rule stays eligible within this minute.
        let has_work = states
            .iter()
            .any(|(id, state)| enabled.get(id) && state != desired);
        if !has_work {
            continue;
        }

        if let Some((previous, previous_desired)) = last_writer
            && previous_desired != desired
        {
            evaluation.conflicts.push((previous, rule.id));
        }
        last_writer = Some((rule.id, desired));

        // Triggered rules act on every relay in the snapshot uniformly.
        for id in states.keys() {
            evaluation.writes.insert(id.clone(), desired);
        }
        evaluation.stamps.push(RuleStamp {
            schedule_id: rule.id,
            minute_key: minute_key.clone(),
            run_at,
        });
        evaluation.entries.push(ExecutionEntry {
            schedule_id: rule.id,
            scope: rule.scope,
            time: rule.time,
            action: rule.action,
            executed_at: run_at,
        });
    }

    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ScheduleScope, ScheduleTime, SwitchAction};
    use chrono::TimeZone as _;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, minute, 0).unwrap()
    }

    fn rule(id: u128, time: &str, action: SwitchAction) -> ScheduleRule {
        ScheduleRule {
            id: ScheduleId::from_uuid(uuid::Uuid::from_u128(id)),
            scope: ScheduleScope::All,
            time: time.parse::<ScheduleTime>().unwrap(),
            action,
            created_at: at(0, 0),
            last_execution: None,
            last_run_at: None,
        }
    }

    fn actuator(id: &str) -> ActuatorId {
        ActuatorId::new(id).unwrap()
    }

    fn states(pairs: &[(&str, bool)]) -> RelayStates {
        pairs
            .iter()
            .map(|(id, value)| (actuator(id), *value))
            .collect()
    }

    fn enabled(pairs: &[(&str, bool)]) -> ScheduleEnabled {
        pairs
            .iter()
            .map(|(id, value)| (actuator(id), *value))
            .collect()
    }

    #[test]
    fn should_return_identical_results_for_identical_inputs() {
        let rules = vec![rule(1, "07:00", SwitchAction::On)];
        let s = states(&[("relay1", false), ("relay2", true)]);
        let e = enabled(&[("relay1", true)]);
        let now = at(7, 0);

        let first = evaluate(&now, &rules, &s, &e);
        let second = evaluate(&now, &rules, &s, &e);
        assert_eq!(first, second);
    }

    #[test]
    fn should_contribute_nothing_when_time_does_not_match() {
        let rules = vec![rule(1, "07:00", SwitchAction::On)];
        let s = states(&[("relay1", false)]);
        let e = enabled(&[("relay1", true)]);

        let result = evaluate(&at(7, 1), &rules, &s, &e);
        assert!(result.is_empty());
        assert!(result.stamps.is_empty());
    }

    #[test]
    fn should_contribute_nothing_when_already_stamped_for_the_minute() {
        // Scenario C: stamp equals the current bucket; states still
        // mismatch, but the guard wins.
        let mut r = rule(1, "07:00", SwitchAction::On);
        r.last_execution = Some(MinuteKey::from_raw("202501010700"));
        let s = states(&[("relay1", false)]);
        let e = enabled(&[("relay1", true)]);

        let result = evaluate(&at(7, 0), &[r], &s, &e);
        assert!(result.is_empty());
        assert_eq!(result.executed(), 0);
    }

    #[test]
    fn should_fire_again_in_a_later_minute_bucket() {
        let mut r = rule(1, "07:00", SwitchAction::On);
        r.last_execution = Some(MinuteKey::from_raw("202412310700"));
        let s = states(&[("relay1", false)]);
        let e = enabled(&[("relay1", true)]);

        let result = evaluate(&at(7, 0), &[r], &s, &e);
        assert_eq!(result.executed(), 1);
    }

    #[test]
    fn should_write_all_relays_when_one_enabled_relay_mismatches() {
        // Scenario A: relay2 is neither enabled nor mismatch-relevant,
        // but a triggered rule writes every relay in the snapshot.
        let rules = vec![rule(1, "07:00", SwitchAction::On)];
        let s = states(&[("relay1", false), ("relay2", false)]);
        let e = enabled(&[("relay1", true), ("relay2", false)]);

        let result = evaluate(&at(7, 0), &rules, &s, &e);
        assert_eq!(result.writes.len(), 2);
        assert_eq!(result.writes.get(&actuator("relay1")), Some(&true));
        assert_eq!(result.writes.get(&actuator("relay2")), Some(&true));
        assert_eq!(result.executed(), 1);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].summary(), "ALL ON");
        assert_eq!(result.stamps[0].minute_key.as_str(), "202501010700");
    }

    #[test]
    fn should_skip_without_stamp_when_no_enabled_relay_mismatches() {
        // Scenario B: nothing enabled → no work → no writes, and
        // critically no stamp, so the minute stays open for re-evaluation.
        let rules = vec![rule(1, "07:00", SwitchAction::On)];
        let s = states(&[("relay1", false), ("relay2", false)]);
        let e = enabled(&[("relay1", false), ("relay2", false)]);

        let result = evaluate(&at(7, 0), &rules, &s, &e);
        assert!(result.is_empty());
        assert!(result.stamps.is_empty());
        assert!(result.entries.is_empty());
    }

    #[test]
    fn should_skip_without_stamp_when_enabled_relays_already_satisfied() {
        let rules = vec![rule(1, "07:00", SwitchAction::On)];
        let s = states(&[("relay1", true), ("relay2", false)]);
        let e = enabled(&[("relay1", true), ("relay2", false)]);

        let result = evaluate(&at(7, 0), &rules, &s, &e);
        assert!(result.is_empty());
        assert!(result.stamps.is_empty());
    }

    #[test]
    fn should_catch_rule_after_enablement_changes_within_the_minute() {
        // The no-stamp skip means a second evaluation in the same minute
        // sees fresh enablement and fires.
        let rules = vec![rule(1, "07:00", SwitchAction::On)];
        let s = states(&[("relay1", false)]);
        let now = at(7, 0);

        let first = evaluate(&now, &rules, &s, &enabled(&[("relay1", false)]));
        assert!(first.stamps.is_empty());

        let second = evaluate(&now, &rules, &s, &enabled(&[("relay1", true)]));
        assert_eq!(second.executed(), 1);
    }

    #[test]
    fn should_produce_no_writes_for_empty_rule_set() {
        let s = states(&[("relay1", false)]);
        let e = enabled(&[("relay1", true)]);
        let result = evaluate(&at(7, 0), &[], &s, &e);
        assert!(result.is_empty());
    }

    #[test]
    fn should_produce_no_writes_when_snapshot_has_no_relays() {
        let rules = vec![rule(1, "07:00", SwitchAction::On)];
        let result = evaluate(&at(7, 0), &rules, &RelayStates::new(), &ScheduleEnabled::new());
        assert!(result.is_empty());
        assert!(result.stamps.is_empty());
    }

    #[test]
    fn should_let_later_rule_win_and_report_the_conflict() {
        let rules = vec![
            rule(1, "07:00", SwitchAction::On),
            rule(2, "07:00", SwitchAction::Off),
        ];
        // relay1 off (work for ON), relay2 on (work for OFF): both fire.
        let s = states(&[("relay1", false), ("relay2", true)]);
        let e = enabled(&[("relay1", true), ("relay2", true)]);

        let result = evaluate(&at(7, 0), &rules, &s, &e);
        assert_eq!(result.executed(), 2);
        // Highest id in visit order wins every key.
        assert_eq!(result.writes.get(&actuator("relay1")), Some(&false));
        assert_eq!(result.writes.get(&actuator("relay2")), Some(&false));
        assert_eq!(result.conflicts.len(), 1);
        let (first, second) = result.conflicts[0];
        assert_eq!(first, rules[0].id);
        assert_eq!(second, rules[1].id);
    }

    #[test]
    fn should_not_report_conflict_when_rules_agree() {
        let rules = vec![
            rule(1, "07:00", SwitchAction::On),
            rule(2, "07:00", SwitchAction::On),
        ];
        let s = states(&[("relay1", false)]);
        let e = enabled(&[("relay1", true)]);

        let result = evaluate(&at(7, 0), &rules, &s, &e);
        assert_eq!(result.executed(), 2);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn should_be_independent_of_input_rule_order() {
        let a = rule(1, "07:00", SwitchAction::On);
        let b = rule(2, "07:00", SwitchAction::Off);
        let s = states(&[("relay1", false), ("relay2", true)]);
        let e = enabled(&[("relay1", true), ("relay2", true)]);
        let now = at(7, 0);

        let forward = evaluate(&now, &[a.clone(), b.clone()], &s, &e);
        let reversed = evaluate(&now, &[b, a], &s, &e);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn should_only_stamp_rules_matching_the_current_minute() {
        let rules = vec![
            rule(1, "07:00", SwitchAction::On),
            rule(2, "08:00", SwitchAction::Off),
        ];
        let s = states(&[("relay1", false)]);
        let e = enabled(&[("relay1", true)]);

        let result = evaluate(&at(7, 0), &rules, &s, &e);
        assert_eq!(result.executed(), 1);
        assert_eq!(result.stamps[0].schedule_id, rules[0].id);
    }
}
