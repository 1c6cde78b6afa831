//! voltgrid-token
//!
//! The fungible reward-token ledger: balances, allowances, and supply,
//! with owner-gated mint/burn. All mutation is gated on the authenticated
//! caller the host passes into each operation.

pub mod ledger;

pub use ledger::TokenLedger;
