//! Aggregated account state.

use lien_types::Coins;
use serde::{Deserialize, Serialize};

/// The balances of one address, recomputed from scratch on every query and
/// never persisted.
///
/// `liened` is a claim against `total + bonded + unbonding`; the keeper reports
/// the four figures as found and does not check that the claim is covered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Balances held in the bank.
    pub total: Coins,
    /// Active delegations, converted from shares to tokens.
    pub bonded: Coins,
    /// Delegations in their unbonding cooldown.
    pub unbonding: Coins,
    /// The address's current lien.
    pub liened: Coins,
}

impl AccountState {
    pub fn is_empty(&self) -> bool {
        self.total.is_zero()
            && self.bonded.is_zero()
            && self.unbonding.is_zero()
            && self.liened.is_zero()
    }

    /// Everything the lien may be backed by, in `denom`.
    pub fn coverage_of(&self, denom: &str) -> Option<u128> {
        self.total
            .amount_of(denom)
            .checked_add(self.bonded.amount_of(denom))?
            .checked_add(self.unbonding.amount_of(denom))
    }
}
