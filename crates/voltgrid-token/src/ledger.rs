use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use voltgrid_core::error::TokenError;
use voltgrid_core::types::{Balance, Principal};

// ── TokenLedger ───────────────────────────────────────────────────────────────

/// The fungible token ledger.
///
/// Custodies balances, allowances, and total supply. Every operation
/// validates fully before its first mutation, so a failed call leaves the
/// ledger exactly as it found it. Invariant: `total_supply` equals the sum
/// of all balances after every operation; it is maintained incrementally by
/// mint/burn, never recomputed by a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenLedger {
    owner: Principal,
    initialized: bool,
    total_supply: Balance,
    balances: BTreeMap<Principal, Balance>,
    /// Keyed by (allowance owner, spender). A row persists at zero once
    /// created; only `revoke_allowance` removes it.
    allowances: BTreeMap<(Principal, Principal), Balance>,
}

impl TokenLedger {
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            initialized: false,
            total_supply: 0,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// One-time supply bootstrap: credits `recipient` with `initial_supply`
    /// and marks the ledger live. Owner-only.
    pub fn initialize(
        &mut self,
        caller: &Principal,
        initial_supply: Balance,
        recipient: &Principal,
    ) -> Result<(), TokenError> {
        if self.initialized {
            return Err(TokenError::AlreadyInitialized);
        }
        if *caller != self.owner {
            return Err(TokenError::Unauthorized);
        }
        self.credit(recipient, initial_supply);
        self.total_supply = initial_supply;
        self.initialized = true;
        info!(supply = initial_supply, recipient = %recipient, "token ledger initialized");
        Ok(())
    }

    /// Move `amount` from `sender` to `recipient`. The caller must be one of
    /// the two parties (a recipient may pull a transfer the sender set up).
    pub fn transfer(
        &mut self,
        caller: &Principal,
        amount: Balance,
        sender: &Principal,
        recipient: &Principal,
    ) -> Result<(), TokenError> {
        self.ensure_initialized()?;
        if caller != sender && caller != recipient {
            return Err(TokenError::Unauthorized);
        }
        let have = self.balance_of(sender);
        if have < amount {
            return Err(TokenError::InsufficientBalance { need: amount, have });
        }
        self.debit(sender, amount);
        self.credit(recipient, amount);
        Ok(())
    }

    /// Set the (caller, spender) allowance to exactly `amount`, overwriting
    /// any existing row. No balance check at approval time.
    pub fn approve(
        &mut self,
        caller: &Principal,
        spender: &Principal,
        amount: Balance,
    ) -> Result<(), TokenError> {
        self.ensure_initialized()?;
        self.allowances
            .insert((caller.clone(), spender.clone()), amount);
        Ok(())
    }

    /// Spend from `owner`'s balance under a previously approved allowance.
    /// The (owner, caller) row must exist and cover `amount`; its remainder
    /// is decremented in place and survives at zero.
    pub fn transfer_from(
        &mut self,
        caller: &Principal,
        owner: &Principal,
        recipient: &Principal,
        amount: Balance,
    ) -> Result<(), TokenError> {
        self.ensure_initialized()?;
        let key = (owner.clone(), caller.clone());
        let allowance = self
            .allowances
            .get(&key)
            .copied()
            .ok_or(TokenError::InsufficientAllowance { need: amount, have: 0 })?;
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                need: amount,
                have: allowance,
            });
        }
        let have = self.balance_of(owner);
        if have < amount {
            return Err(TokenError::InsufficientBalance { need: amount, have });
        }
        self.debit(owner, amount);
        self.credit(recipient, amount);
        self.allowances.insert(key, allowance - amount);
        Ok(())
    }

    /// Create `amount` new tokens for `recipient`. Owner-only.
    pub fn mint(
        &mut self,
        caller: &Principal,
        amount: Balance,
        recipient: &Principal,
    ) -> Result<(), TokenError> {
        self.ensure_initialized()?;
        if *caller != self.owner {
            return Err(TokenError::Unauthorized);
        }
        self.credit(recipient, amount);
        self.total_supply += amount;
        info!(amount, recipient = %recipient, "minted tokens");
        Ok(())
    }

    /// Destroy `amount` of `sender`'s tokens. The caller must be `sender`
    /// themselves or the ledger owner.
    pub fn burn(
        &mut self,
        caller: &Principal,
        amount: Balance,
        sender: &Principal,
    ) -> Result<(), TokenError> {
        self.ensure_initialized()?;
        if caller != sender && *caller != self.owner {
            return Err(TokenError::Unauthorized);
        }
        let have = self.balance_of(sender);
        if have < amount {
            return Err(TokenError::InsufficientBalance { need: amount, have });
        }
        self.debit(sender, amount);
        self.total_supply -= amount;
        info!(amount, sender = %sender, "burned tokens");
        Ok(())
    }

    /// Hand the owner role to `new_owner`. Not gated on initialization, so
    /// ownership can be rotated before the supply bootstrap.
    pub fn set_owner(
        &mut self,
        caller: &Principal,
        new_owner: Principal,
    ) -> Result<(), TokenError> {
        if *caller != self.owner {
            return Err(TokenError::Unauthorized);
        }
        self.owner = new_owner;
        Ok(())
    }

    /// Delete the (caller, spender) allowance row. No-op when absent.
    pub fn revoke_allowance(
        &mut self,
        caller: &Principal,
        spender: &Principal,
    ) -> Result<(), TokenError> {
        self.ensure_initialized()?;
        self.allowances.remove(&(caller.clone(), spender.clone()));
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    /// A zero balance and an absent row are indistinguishable.
    pub fn balance_of(&self, account: &Principal) -> Balance {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance_of(&self, owner: &Principal, spender: &Principal) -> Balance {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn ensure_initialized(&self) -> Result<(), TokenError> {
        if !self.initialized {
            return Err(TokenError::NotInitialized);
        }
        Ok(())
    }

    fn credit(&mut self, account: &Principal, amount: Balance) {
        *self.balances.entry(account.clone()).or_insert(0) += amount;
    }

    /// Caller must have checked the balance covers `amount`.
    fn debit(&mut self, account: &Principal, amount: Balance) {
        *self.balances.entry(account.clone()).or_insert(0) -= amount;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
