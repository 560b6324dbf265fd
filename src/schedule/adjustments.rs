use chrono::NaiveDate;

use crate::decimal::Money;
use crate::obligation::AdjustmentEvent;

/// point-in-time lookup of a recurring value over its change log.
///
/// Only the current value and the list of changes are stored, so a past
/// value is found by replaying the log forward from the oldest known
/// baseline. The history is sorted on construction; caller order is not
/// trusted.
#[derive(Debug, Clone)]
pub struct AdjustmentHistoryResolver {
    current_value: Money,
    history: Vec<AdjustmentEvent>,
}

impl AdjustmentHistoryResolver {
    pub fn new(current_value: Money, history: &[AdjustmentEvent]) -> Self {
        let mut history = history.to_vec();
        // stable, so same-day events keep their recorded order
        history.sort_by_key(|event| event.changed_at);
        Self {
            current_value,
            history,
        }
    }

    /// resolver with no recorded changes
    pub fn constant(value: Money) -> Self {
        Self {
            current_value: value,
            history: Vec::new(),
        }
    }

    pub fn current_value(&self) -> Money {
        self.current_value
    }

    pub fn history(&self) -> &[AdjustmentEvent] {
        &self.history
    }

    /// value in effect before any adjustment
    pub fn baseline(&self) -> Money {
        match self.history.first() {
            Some(earliest) if earliest.old_value.is_positive() => earliest.old_value,
            _ => self.current_value,
        }
    }

    /// value in effect on `at`
    pub fn value_at(&self, at: NaiveDate) -> Money {
        self.history
            .iter()
            .take_while(|event| event.changed_at <= at)
            .fold(self.baseline(), |_, event| event.new_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn two_step_history() -> Vec<AdjustmentEvent> {
        vec![
            AdjustmentEvent::new(date(2024, 1, 1), money("10"), money("20")),
            AdjustmentEvent::new(date(2024, 6, 1), money("20"), money("30")),
        ]
    }

    #[test]
    fn test_replays_history_forward() {
        let resolver = AdjustmentHistoryResolver::new(money("30"), &two_step_history());

        assert_eq!(resolver.value_at(date(2023, 12, 1)), money("10"));
        assert_eq!(resolver.value_at(date(2024, 3, 1)), money("20"));
        assert_eq!(resolver.value_at(date(2024, 7, 1)), money("30"));
    }

    #[test]
    fn test_change_applies_on_its_own_day() {
        let resolver = AdjustmentHistoryResolver::new(money("30"), &two_step_history());
        assert_eq!(resolver.value_at(date(2024, 1, 1)), money("20"));
        assert_eq!(resolver.value_at(date(2024, 5, 31)), money("20"));
        assert_eq!(resolver.value_at(date(2024, 6, 1)), money("30"));
    }

    #[test]
    fn test_sorts_unordered_history() {
        let mut history = two_step_history();
        history.reverse();
        let resolver = AdjustmentHistoryResolver::new(money("30"), &history);

        assert_eq!(resolver.history()[0].changed_at, date(2024, 1, 1));
        assert_eq!(resolver.value_at(date(2023, 12, 1)), money("10"));
        assert_eq!(resolver.value_at(date(2024, 3, 1)), money("20"));
    }

    #[test]
    fn test_empty_history_returns_current() {
        let resolver = AdjustmentHistoryResolver::new(money("49.90"), &[]);
        assert_eq!(resolver.value_at(date(2000, 1, 1)), money("49.90"));
        assert_eq!(AdjustmentHistoryResolver::constant(money("5")).value_at(date(2024, 1, 1)), money("5"));
    }

    #[test]
    fn test_zero_old_value_falls_back_to_current() {
        let history = vec![AdjustmentEvent::new(date(2024, 6, 1), Money::ZERO, money("25"))];
        let resolver = AdjustmentHistoryResolver::new(money("25"), &history);
        assert_eq!(resolver.baseline(), money("25"));
        assert_eq!(resolver.value_at(date(2024, 1, 1)), money("25"));
    }

    #[test]
    fn test_query_order_does_not_matter() {
        let resolver = AdjustmentHistoryResolver::new(money("30"), &two_step_history());
        let late = resolver.value_at(date(2024, 7, 1));
        let early = resolver.value_at(date(2023, 12, 1));
        assert_eq!(resolver.value_at(date(2024, 7, 1)), late);
        assert_eq!(resolver.value_at(date(2023, 12, 1)), early);
    }
}
