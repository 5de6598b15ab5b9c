//! Passive income system: pays out the income of every owned upgrade level.

use rugflip_core::components::GameState;

/// What one income payout did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncomeOutcome {
    /// Amount added. Zero means the state was left untouched.
    pub paid: u64,
    /// The payout carried the market cap to the target.
    pub victory: bool,
}

/// Add the summed upgrade income to the market cap and check for victory.
pub fn run(state: &mut GameState) -> IncomeOutcome {
    let income = state.total_passive_income();
    if income == 0 {
        return IncomeOutcome::default();
    }

    state.market_cap = state.market_cap.saturating_add(income);
    IncomeOutcome {
        paid: income,
        victory: state.check_victory(),
    }
}
