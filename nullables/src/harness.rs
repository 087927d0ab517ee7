//! A fully wired in-memory ledger.

use lien_keeper::{LienAccountWrapper, LienKeeper, PortHandler, WrappedAccountKeeper};
use std::sync::Arc;

use crate::{NullAccounts, NullBank, NullClock, NullController, NullKv, NullStaking};

/// Every collaborator of the lien keeper, wired the way a host wires them:
/// the lien wrapper is installed into the account keeper, the bank loads
/// accounts through it, and the keeper reads the bank.
pub struct NullLedger {
    pub kv: NullKv,
    pub clock: NullClock,
    pub accounts: Arc<NullAccounts>,
    pub account_keeper: Arc<WrappedAccountKeeper>,
    pub bank: Arc<NullBank>,
    pub staking: Arc<NullStaking>,
    pub controller: Arc<NullController>,
    pub keeper: Arc<LienKeeper>,
    pub handler: PortHandler,
}

impl NullLedger {
    pub fn new() -> Self {
        let accounts = Arc::new(NullAccounts::new());
        let account_keeper = Arc::new(WrappedAccountKeeper::new(
            accounts.clone(),
            Arc::new(LienAccountWrapper::new()),
        ));
        let bank = Arc::new(NullBank::new(account_keeper.clone()));
        let staking = Arc::new(NullStaking::default());
        let controller = Arc::new(NullController::new());
        let keeper = Arc::new(LienKeeper::new(
            bank.clone(),
            staking.clone(),
            controller.clone(),
        ));
        let handler = PortHandler::new(keeper.clone(), account_keeper.clone());
        Self {
            kv: NullKv::new(),
            clock: NullClock::new(0),
            accounts,
            account_keeper,
            bank,
            staking,
            controller,
            keeper,
            handler,
        }
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}
