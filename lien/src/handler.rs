//! Inbound messages from the controller.
//!
//! The controller addresses the lien module with JSON messages tagged by a
//! `type` field. Amounts travel as decimal strings in both directions so they
//! survive hosts whose JSON numbers are doubles.

use std::sync::Arc;

use lien_store::WriteTxn;
use lien_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

use crate::account::WrappedAccountKeeper;
use crate::error::LienError;
use crate::keeper::LienKeeper;

// ── Requests ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum LienMessage {
    #[serde(rename = "LIEN_GET_ACCOUNT_STATE")]
    GetAccountState { address: String, denom: String },

    #[serde(rename = "LIEN_GET_STAKING")]
    GetStaking { addresses: Vec<String>, denom: String },

    #[serde(rename = "LIEN_CHANGE_LIENED")]
    ChangeLiened {
        address: String,
        denom: String,
        amount: String,
    },
}

// ── Responses ────────────────────────────────────────────────────────────

/// One address's balances in a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStateResponse {
    pub current_time: String,
    pub total: String,
    pub bonded: String,
    pub unbonding: String,
    pub liened: String,
    pub locked: String,
}

/// Bonded amounts of several addresses, index-aligned with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingResponse {
    pub epoch_tag: String,
    pub denom: String,
    pub values: Vec<Option<String>>,
}

// ── Handler ──────────────────────────────────────────────────────────────

/// Dispatches controller messages to the keeper.
pub struct PortHandler {
    keeper: Arc<LienKeeper>,
    accounts: Arc<WrappedAccountKeeper>,
}

impl PortHandler {
    pub fn new(keeper: Arc<LienKeeper>, accounts: Arc<WrappedAccountKeeper>) -> Self {
        Self { keeper, accounts }
    }

    /// Handle one message inside `txn` and return the JSON response.
    pub fn receive(
        &self,
        txn: &mut dyn WriteTxn,
        block_time: Timestamp,
        message: &str,
    ) -> Result<String, LienError> {
        let message: LienMessage = serde_json::from_str(message)
            .map_err(|e| LienError::InvalidMessage(e.to_string()))?;
        tracing::debug!(?message, %block_time, "lien port message");
        match message {
            LienMessage::GetAccountState { address, denom } => {
                let response = self.account_state(txn, block_time, &address, &denom)?;
                to_json(&response)
            }
            LienMessage::GetStaking { addresses, denom } => {
                let response = self.staking(txn, block_time, &addresses, denom)?;
                to_json(&response)
            }
            LienMessage::ChangeLiened {
                address,
                denom,
                amount,
            } => {
                let address = parse_address(&address)?;
                let amount = amount
                    .parse::<u128>()
                    .map_err(|e| LienError::InvalidMessage(format!("amount {amount:?}: {e}")))?;
                let new_amount = self.keeper.change_lien(txn, &address, &denom, amount)?;
                to_json(&new_amount.to_string())
            }
        }
    }

    fn account_state(
        &self,
        txn: &dyn WriteTxn,
        block_time: Timestamp,
        address: &str,
        denom: &str,
    ) -> Result<AccountStateResponse, LienError> {
        let address = parse_address(address)?;
        let txn = txn.as_read_txn();
        let state = self.keeper.get_account_state(txn, &address)?;
        let locked = self.accounts.locked_coins(txn, &address, block_time)?;
        Ok(AccountStateResponse {
            current_time: block_time.as_secs().to_string(),
            total: state.total.amount_of(denom).to_string(),
            bonded: state.bonded.amount_of(denom).to_string(),
            unbonding: state.unbonding.amount_of(denom).to_string(),
            liened: state.liened.amount_of(denom).to_string(),
            locked: locked.amount_of(denom).to_string(),
        })
    }

    fn staking(
        &self,
        txn: &dyn WriteTxn,
        block_time: Timestamp,
        addresses: &[String],
        denom: String,
    ) -> Result<StakingResponse, LienError> {
        let txn = txn.as_read_txn();
        let bond_denom = self.keeper.bond_denom(txn)?;
        if denom != bond_denom {
            return Err(LienError::InvalidMessage(format!(
                "staking denom {denom:?} is not the bond denom {bond_denom:?}"
            )));
        }
        let mut values = Vec::with_capacity(addresses.len());
        for text in addresses {
            match Address::from_hex(text) {
                Ok(address) => {
                    let bonded = self.keeper.bonded_coins(txn, &address)?;
                    values.push(Some(bonded.amount_of(&denom).to_string()));
                }
                Err(e) => {
                    tracing::debug!(address = %text, error = %e, "unparsable address in staking query");
                    values.push(None);
                }
            }
        }
        Ok(StakingResponse {
            epoch_tag: block_time.as_secs().to_string(),
            denom,
            values,
        })
    }
}

fn parse_address(text: &str) -> Result<Address, LienError> {
    Address::from_hex(text).map_err(|e| LienError::InvalidMessage(format!("address {text:?}: {e}")))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, LienError> {
    serde_json::to_string(value).map_err(|e| LienError::InvalidMessage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_parse_by_type_tag() {
        let msg: LienMessage = serde_json::from_str(
            r#"{"type":"LIEN_CHANGE_LIENED","address":"0102","denom":"ubld","amount":"12"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            LienMessage::ChangeLiened {
                address: "0102".into(),
                denom: "ubld".into(),
                amount: "12".into(),
            }
        );

        let msg: LienMessage = serde_json::from_str(
            r#"{"type":"LIEN_GET_STAKING","addresses":["01","zz"],"denom":"ubld"}"#,
        )
        .unwrap();
        assert!(matches!(msg, LienMessage::GetStaking { ref addresses, .. } if addresses.len() == 2));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<LienMessage>(r#"{"type":"LIEN_SOMETHING_ELSE"}"#).is_err());
        assert!(serde_json::from_str::<LienMessage>(r#"{"address":"01"}"#).is_err());
    }

    #[test]
    fn responses_are_camel_case() {
        let response = AccountStateResponse {
            current_time: "7".into(),
            total: "1".into(),
            bonded: "2".into(),
            unbonding: "3".into(),
            liened: "4".into(),
            locked: "4".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["currentTime"], "7");
        assert_eq!(json["locked"], "4");

        let response = StakingResponse {
            epoch_tag: "9".into(),
            denom: "ubld".into(),
            values: vec![Some("5".into()), None],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"epochTag":"9","denom":"ubld","values":["5",null]}"#);
    }
}
