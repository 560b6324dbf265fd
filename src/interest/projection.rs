use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::interest::conversion::RateConverter;
use crate::investment::InvestmentBox;
use crate::types::{BoxId, InvestmentType};

/// progress of a reserve toward its goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSnapshot {
    pub goal_amount: Money,
    pub progress_percent: Decimal,
    pub remaining: Money,
    pub reached: bool,
}

impl GoalSnapshot {
    /// `None` when `goal_amount` is zero or negative
    pub fn evaluate(current_value: Money, goal_amount: Money) -> Option<Self> {
        if !goal_amount.is_positive() {
            return None;
        }
        let progress_percent = current_value.non_negative().percent_of(goal_amount);
        Some(Self {
            goal_amount,
            progress_percent,
            remaining: goal_amount.saturating_sub(current_value),
            reached: progress_percent >= Decimal::ONE_HUNDRED,
        })
    }
}

/// yield snapshot of one reserve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldSnapshot {
    pub box_id: BoxId,
    pub as_of: NaiveDate,
    pub investment_type: InvestmentType,
    /// percent per year
    pub effective_annual_rate: Decimal,
    pub daily_rate: Rate,
    pub estimated_daily_yield: Money,
    /// balance above principal, never negative
    pub accrued_yield: Money,
    pub current_value: Money,
    pub goal: Option<GoalSnapshot>,
}

/// aggregate over a set of reserves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReserveSummary {
    pub box_count: usize,
    pub total_current_value: Money,
    pub total_principal: Money,
    pub total_accrued_yield: Money,
    pub total_daily_yield: Money,
    pub goals_reached: usize,
}

/// projects yield and goal progress for cash reserves
#[derive(Debug, Clone, Copy)]
pub struct YieldProjector {
    converter: RateConverter,
}

impl Default for YieldProjector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl YieldProjector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            converter: RateConverter::new(config.trading_days_per_year),
        }
    }

    pub fn converter(&self) -> &RateConverter {
        &self.converter
    }

    /// effective annual percent for the box; zero for plain reserves
    pub fn effective_annual_rate(&self, reserve: &InvestmentBox) -> Decimal {
        match reserve.investment_type {
            InvestmentType::None => Decimal::ZERO,
            InvestmentType::Indexed => self.converter.effective_annual_rate(
                reserve.benchmark_annual_rate_percent,
                reserve.benchmark_percentage,
            ),
        }
    }

    /// one business day of yield on `current_value`
    pub fn estimated_daily_yield(&self, current_value: Money, effective_annual_rate: Decimal) -> Money {
        let daily = self.converter.annual_to_daily(effective_annual_rate);
        current_value.non_negative() * daily.as_decimal()
    }

    /// balance after compounding the daily rate over `business_days`.
    ///
    /// Saturates at `Money::MAX` once the balance no longer fits a decimal.
    pub fn project_value(&self, reserve: &InvestmentBox, business_days: u32) -> Money {
        let daily = self
            .converter
            .annual_to_daily(self.effective_annual_rate(reserve))
            .as_decimal();
        let current_value = reserve.current_value.non_negative();
        if daily.is_zero() || current_value.is_zero() {
            return current_value;
        }

        let base = Decimal::ONE + daily;
        let mut factor = Decimal::ONE;
        for _ in 0..business_days {
            match factor.checked_mul(base) {
                Some(next) => factor = next,
                None => {
                    warn!("box {}: projection over {business_days} days overflows", reserve.id);
                    return Money::MAX;
                }
            }
        }

        current_value
            .checked_mul(factor)
            .unwrap_or_else(|| {
                warn!("box {}: projection over {business_days} days overflows", reserve.id);
                Money::MAX
            })
    }

    pub fn snapshot(&self, reserve: &InvestmentBox, time: &SafeTimeProvider) -> YieldSnapshot {
        self.snapshot_at(reserve, time.now().date_naive())
    }

    pub fn snapshot_at(&self, reserve: &InvestmentBox, as_of: NaiveDate) -> YieldSnapshot {
        let effective_annual_rate = self.effective_annual_rate(reserve);
        let daily_rate = self.converter.annual_to_daily(effective_annual_rate);
        let current_value = reserve.current_value.non_negative();
        let estimated_daily_yield = self.estimated_daily_yield(current_value, effective_annual_rate);

        debug!(
            "box {}: effective {}% a year, daily yield {}",
            reserve.id, effective_annual_rate, estimated_daily_yield
        );

        YieldSnapshot {
            box_id: reserve.id,
            as_of,
            investment_type: reserve.investment_type,
            effective_annual_rate,
            daily_rate,
            estimated_daily_yield,
            accrued_yield: current_value.saturating_sub(reserve.principal_value),
            current_value,
            goal: GoalSnapshot::evaluate(current_value, reserve.goal_amount),
        }
    }

    pub fn summarize_at(&self, reserves: &[InvestmentBox], as_of: NaiveDate) -> ReserveSummary {
        reserves
            .iter()
            .map(|reserve| (reserve, self.snapshot_at(reserve, as_of)))
            .fold(ReserveSummary::default(), |mut summary, (reserve, snapshot)| {
                summary.box_count += 1;
                summary.total_current_value += snapshot.current_value;
                summary.total_principal += reserve.principal_value.non_negative();
                summary.total_accrued_yield += snapshot.accrued_yield;
                summary.total_daily_yield += snapshot.estimated_daily_yield;
                if snapshot.goal.as_ref().is_some_and(|goal| goal.reached) {
                    summary.goals_reached += 1;
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_goal_snapshot() {
        let goal = GoalSnapshot::evaluate(Money::from_major(4_500), Money::from_major(5_000)).unwrap();
        assert_eq!(goal.progress_percent, dec!(90));
        assert_eq!(goal.remaining, Money::from_major(500));
        assert!(!goal.reached);

        let goal = GoalSnapshot::evaluate(Money::from_major(5_200), Money::from_major(5_000)).unwrap();
        assert_eq!(goal.progress_percent, dec!(100));
        assert_eq!(goal.remaining, Money::ZERO);
        assert!(goal.reached);

        assert!(GoalSnapshot::evaluate(Money::from_major(10), Money::ZERO).is_none());
    }

    #[test]
    fn test_zero_balance_yields_nothing() {
        let projector = YieldProjector::default();
        assert_eq!(projector.estimated_daily_yield(Money::ZERO, dec!(13)), Money::ZERO);
        assert_eq!(projector.estimated_daily_yield(Money::ZERO, dec!(1000)), Money::ZERO);
    }

    #[test]
    fn test_indexed_snapshot() {
        let projector = YieldProjector::default();
        let mut reserve = InvestmentBox::indexed("emergency", Money::from_major(10_000), dec!(13), dec!(100))
            .with_goal(Money::from_major(20_000));
        reserve.current_value = Money::from_major(10_250);

        let snapshot = projector.snapshot_at(&reserve, date(2024, 6, 3));
        assert_eq!(snapshot.effective_annual_rate, dec!(13));
        // 10250 * 0.000485... a day
        assert_eq!(snapshot.estimated_daily_yield, Money::from_str_exact("4.97").unwrap());
        assert_eq!(snapshot.accrued_yield, Money::from_major(250));
        assert_eq!(snapshot.goal.unwrap().progress_percent, dec!(51.25));
    }

    #[test]
    fn test_plain_reserve_has_no_yield() {
        let projector = YieldProjector::default();
        let reserve = InvestmentBox::new("cash", Money::from_major(800));
        let snapshot = projector.snapshot_at(&reserve, date(2024, 6, 3));

        assert_eq!(snapshot.effective_annual_rate, Decimal::ZERO);
        assert_eq!(snapshot.daily_rate, Rate::ZERO);
        assert_eq!(snapshot.estimated_daily_yield, Money::ZERO);
        assert!(snapshot.goal.is_none());
    }

    #[test]
    fn test_withdrawals_never_show_negative_yield() {
        let projector = YieldProjector::default();
        let mut reserve = InvestmentBox::indexed("trip", Money::from_major(1_000), dec!(10), dec!(100));
        reserve.current_value = Money::from_major(700);
        let snapshot = projector.snapshot_at(&reserve, date(2024, 6, 3));
        assert_eq!(snapshot.accrued_yield, Money::ZERO);
    }

    #[test]
    fn test_project_value_over_a_year() {
        let projector = YieldProjector::default();
        let reserve = InvestmentBox::indexed("long", Money::from_major(10_000), dec!(12), dec!(100));
        assert_eq!(projector.project_value(&reserve, 252), Money::from_major(11_200));
        assert_eq!(projector.project_value(&reserve, 0), Money::from_major(10_000));
    }

    #[test]
    fn test_project_value_saturates_over_long_horizons() {
        let projector = YieldProjector::default();
        let reserve = InvestmentBox::indexed("forever", Money::from_major(10_000), dec!(13), dec!(100));

        // 600 years of business days
        assert_eq!(projector.project_value(&reserve, 252 * 600), Money::MAX);

        let plain = InvestmentBox::new("cash", Money::from_major(10_000));
        assert_eq!(projector.project_value(&plain, u32::MAX), Money::from_major(10_000));
    }

    #[test]
    fn test_snapshot_from_time_provider() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap(),
        ));
        let projector = YieldProjector::default();
        let reserve = InvestmentBox::new("cash", Money::from_major(10));
        assert_eq!(projector.snapshot(&reserve, &time).as_of, date(2024, 6, 3));
    }

    #[test]
    fn test_summary() {
        let projector = YieldProjector::default();
        let reached = InvestmentBox::new("done", Money::from_major(600)).with_goal(Money::from_major(500));
        let indexed = InvestmentBox::indexed("grow", Money::from_major(10_000), dec!(13), dec!(100));

        let summary = projector.summarize_at(&[reached, indexed], date(2024, 6, 3));
        assert_eq!(summary.box_count, 2);
        assert_eq!(summary.total_current_value, Money::from_major(10_600));
        assert_eq!(summary.goals_reached, 1);
        assert_eq!(summary.total_daily_yield, Money::from_str_exact("4.85").unwrap());
    }
}
