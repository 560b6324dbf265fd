use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{BoxId, ObligationId};

/// events emitted when an obligation or a reserve is mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // obligation events
    PaymentRecorded {
        obligation_id: ObligationId,
        cycle_number: u32,
        amount: Money,
        due_date: Option<NaiveDate>,
        next_due_date: Option<NaiveDate>,
    },
    ObligationPaidOff {
        obligation_id: ObligationId,
        total_paid: Money,
    },
    ValueAdjusted {
        obligation_id: ObligationId,
        old_value: Money,
        new_value: Money,
        changed_at: NaiveDate,
    },

    // reserve events
    DepositMade {
        box_id: BoxId,
        amount: Money,
        new_balance: Money,
    },
    WithdrawalMade {
        box_id: BoxId,
        amount: Money,
        new_balance: Money,
    },
    YieldCredited {
        box_id: BoxId,
        amount: Money,
        new_balance: Money,
    },
    GoalChanged {
        box_id: BoxId,
        old_goal: Money,
        new_goal: Money,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        store.emit(Event::GoalChanged {
            box_id: Uuid::new_v4(),
            old_goal: Money::ZERO,
            new_goal: Money::from_major(1_000),
        });
        assert_eq!(store.len(), 1);

        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.is_empty());
    }
}
