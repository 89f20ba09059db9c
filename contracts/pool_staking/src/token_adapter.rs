use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Moves one token between users and this contract.
///
/// Balances are checked up front so a shortfall surfaces as
/// `TransferFailed` instead of a host trap.
pub struct TokenAdapter<'a> {
    env: &'a Env,
    client: token::Client<'a>,
}

impl<'a> TokenAdapter<'a> {
    pub fn new(env: &'a Env, token: &Address) -> Self {
        Self {
            env,
            client: token::Client::new(env, token),
        }
    }

    pub fn balance_of(&self, who: &Address) -> i128 {
        self.client.balance(who)
    }

    /// Pull `amount` from `payer` into the contract.
    pub fn transfer_in(&self, payer: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        if self.balance_of(payer) < amount {
            return Err(ContractError::TransferFailed);
        }
        self.client
            .transfer(payer, &self.env.current_contract_address(), &amount);
        Ok(())
    }

    /// Pay `amount` from the contract to `payee`.
    pub fn transfer_out(&self, payee: &Address, amount: i128) -> Result<(), ContractError> {
        if amount <= 0 {
            return Ok(());
        }
        let this = self.env.current_contract_address();
        if self.balance_of(&this) < amount {
            return Err(ContractError::TransferFailed);
        }
        self.client.transfer(&this, payee, &amount);
        Ok(())
    }
}
