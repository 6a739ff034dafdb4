//! Token ledger rules.
//!
//! The balance has no floor: usage is always debited in full and the turn
//! gate is the caller's job, checked before any model call.

use super::state::InterviewState;

/// Smallest balance that still allows a new turn.
pub const MIN_TURN_BALANCE: i64 = 1;

impl InterviewState {
    /// Debits `amount` tokens and returns the new balance.
    ///
    /// A negative amount credits the balance.
    pub fn debit(&mut self, amount: i64) -> i64 {
        self.tokens_remaining = self.tokens_remaining.saturating_sub(amount);
        self.touch();
        self.tokens_remaining
    }

    /// Administrative top-up, expressed as a negative debit.
    pub fn credit(&mut self, amount: u32) -> i64 {
        self.debit(-i64::from(amount))
    }

    /// True when the balance allows starting another turn.
    pub fn can_start_turn(&self) -> bool {
        self.tokens_remaining >= MIN_TURN_BALANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn debit_reduces_balance() {
        let mut state = InterviewState::new(100);
        assert_eq!(state.debit(15), 85);
        assert_eq!(state.tokens_remaining, 85);
    }

    #[test]
    fn debit_may_go_negative() {
        let mut state = InterviewState::new(10);
        assert_eq!(state.debit(25), -15);
        assert!(!state.can_start_turn());
    }

    #[test]
    fn turn_gate_is_at_one_token() {
        let mut state = InterviewState::new(1);
        assert!(state.can_start_turn());
        state.debit(1);
        assert!(!state.can_start_turn());
    }

    #[test]
    fn credit_is_negative_debit() {
        let mut state = InterviewState::new(-5);
        assert_eq!(state.credit(20), 15);
        assert!(state.can_start_turn());
    }

    proptest! {
        #[test]
        fn debits_are_linear(start in -1_000_000i64..1_000_000, a in -10_000i64..10_000, b in -10_000i64..10_000) {
            let mut split = InterviewState::new(start);
            split.debit(a);
            split.debit(b);

            let mut joined = InterviewState::new(start);
            joined.debit(a + b);

            prop_assert_eq!(split.tokens_remaining, joined.tokens_remaining);
        }

        #[test]
        fn negative_debit_adds_exactly(start in -1_000_000i64..1_000_000, k in 0i64..1_000_000) {
            let mut state = InterviewState::new(start);
            let balance = state.debit(-k);
            prop_assert_eq!(balance, start + k);
        }
    }
}
