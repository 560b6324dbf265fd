use log::warn;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::config::BUSINESS_DAYS_PER_YEAR;
use crate::decimal::{non_negative, round2, Rate};

/// precision kept on daily rates coming back from floating point
const DAILY_RATE_SCALE: u32 = 12;

/// converts between the compounding conventions of benchmark and legacy rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateConverter {
    pub trading_days_per_year: u32,
}

impl Default for RateConverter {
    fn default() -> Self {
        Self::new(BUSINESS_DAYS_PER_YEAR)
    }
}

impl RateConverter {
    pub fn new(trading_days_per_year: u32) -> Self {
        Self {
            trading_days_per_year: trading_days_per_year.max(1),
        }
    }

    /// `(1 + annual/100)^(1/days) - 1`, compounded over trading days.
    ///
    /// Zero or negative input yields a zero rate. The result is left
    /// unrounded; only amounts derived from it are rounded to cents.
    pub fn annual_to_daily(&self, annual_percent: Decimal) -> Rate {
        if annual_percent <= Decimal::ZERO {
            return Rate::ZERO;
        }
        let Some(annual) = annual_percent.to_f64() else {
            warn!("annual rate {annual_percent} not representable; using zero");
            return Rate::ZERO;
        };

        let daily = (1.0 + annual / 100.0).powf(1.0 / self.trading_days_per_year as f64) - 1.0;
        Decimal::from_f64(daily)
            .map(|d| Rate::from_decimal(d.round_dp(DAILY_RATE_SCALE)))
            .unwrap_or(Rate::ZERO)
    }

    /// `((1 + monthly/100)^12 - 1) * 100`, for legacy monthly-rate records.
    ///
    /// A rate whose annual equivalent does not fit a decimal yields zero.
    pub fn monthly_to_annual_percent(&self, monthly_percent: Decimal) -> Decimal {
        let base = Decimal::ONE + non_negative(monthly_percent) / Decimal::ONE_HUNDRED;
        let annual = (0..12)
            .try_fold(Decimal::ONE, |factor, _| factor.checked_mul(base))
            .and_then(|factor| (factor - Decimal::ONE).checked_mul(Decimal::ONE_HUNDRED));

        match annual {
            Some(annual) => round2(annual),
            None => {
                warn!("monthly rate {monthly_percent}% overflows when annualized; using zero");
                Decimal::ZERO
            }
        }
    }

    /// benchmark rate scaled by the participation percentage
    pub fn effective_annual_rate(
        &self,
        benchmark_annual_percent: Decimal,
        benchmark_percentage: Decimal,
    ) -> Decimal {
        non_negative(benchmark_annual_percent)
            .checked_mul(non_negative(benchmark_percentage))
            .map(|scaled| round2(scaled / Decimal::ONE_HUNDRED))
            .unwrap_or_else(|| {
                warn!("benchmark {benchmark_annual_percent}% at {benchmark_percentage}% overflows; using zero");
                Decimal::ZERO
            })
    }
}
