use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{non_negative, Money};
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::types::{BoxId, InvestmentType};

/// a cash reserve ("box") with optional benchmark-indexed yield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentBox {
    pub id: BoxId,
    pub name: String,
    pub investment_type: InvestmentType,
    /// benchmark annual rate in percent (e.g. 13.25)
    pub benchmark_annual_rate_percent: Decimal,
    /// participation in the benchmark in percent (100 = 100% of benchmark)
    pub benchmark_percentage: Decimal,
    pub current_value: Money,
    pub principal_value: Money,
    /// zero means no goal
    pub goal_amount: Money,
}

impl InvestmentBox {
    /// plain reserve without yield
    pub fn new(name: impl Into<String>, principal: Money) -> Self {
        let principal = principal.non_negative();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            investment_type: InvestmentType::None,
            benchmark_annual_rate_percent: Decimal::ZERO,
            benchmark_percentage: Decimal::ZERO,
            current_value: principal,
            principal_value: principal,
            goal_amount: Money::ZERO,
        }
    }

    /// reserve yielding a share of a benchmark rate
    pub fn indexed(
        name: impl Into<String>,
        principal: Money,
        benchmark_annual_rate_percent: Decimal,
        benchmark_percentage: Decimal,
    ) -> Self {
        Self {
            investment_type: InvestmentType::Indexed,
            benchmark_annual_rate_percent: non_negative(benchmark_annual_rate_percent),
            benchmark_percentage: non_negative(benchmark_percentage),
            ..Self::new(name, principal)
        }
    }

    pub fn with_goal(mut self, goal_amount: Money) -> Self {
        self.goal_amount = goal_amount.non_negative();
        self
    }

    pub fn has_goal(&self) -> bool {
        self.goal_amount.is_positive()
    }

    pub fn deposit(&mut self, amount: Money, events: &mut EventStore) -> Result<()> {
        validate_amount(amount)?;
        self.current_value += amount;
        self.principal_value += amount;

        events.emit(Event::DepositMade {
            box_id: self.id,
            amount,
            new_balance: self.current_value,
        });
        Ok(())
    }

    /// withdrawals reduce the principal down to zero
    pub fn withdraw(&mut self, amount: Money, events: &mut EventStore) -> Result<()> {
        validate_amount(amount)?;
        if amount > self.current_value {
            return Err(EngineError::InsufficientFunds {
                available: self.current_value,
                requested: amount,
            });
        }
        self.current_value -= amount;
        self.principal_value = self.principal_value.saturating_sub(amount);

        events.emit(Event::WithdrawalMade {
            box_id: self.id,
            amount,
            new_balance: self.current_value,
        });
        Ok(())
    }

    /// credited yield raises the balance but not the principal
    pub fn credit_yield(&mut self, amount: Money, events: &mut EventStore) -> Result<()> {
        validate_amount(amount)?;
        self.current_value += amount;

        events.emit(Event::YieldCredited {
            box_id: self.id,
            amount,
            new_balance: self.current_value,
        });
        Ok(())
    }

    pub fn set_goal(&mut self, goal_amount: Money, events: &mut EventStore) -> Result<()> {
        if goal_amount.is_negative() {
            return Err(EngineError::InvalidAmount { amount: goal_amount });
        }
        let old_goal = self.goal_amount;
        self.goal_amount = goal_amount;

        events.emit(Event::GoalChanged {
            box_id: self.id,
            old_goal,
            new_goal: goal_amount,
        });
        Ok(())
    }
}

fn validate_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount { amount });
    }
    Ok(())
}
