use voltgrid_core::error::TokenError;
use voltgrid_core::types::{Balance, Principal};
use voltgrid_token::TokenLedger;

/// The credit call the distributor makes when a claim lands. Any failure
/// surfaces to the claimer as `MintFailed` and aborts the claim before the
/// distributor commits its own state.
pub trait RewardMinter {
    fn mint(&mut self, amount: Balance, recipient: &Principal) -> Result<(), TokenError>;
}

/// Mints on a token ledger as a fixed authority principal. The authority
/// must be the ledger's owner for mints to land.
#[derive(Debug)]
pub struct MintAuthority<'a> {
    ledger: &'a mut TokenLedger,
    authority: Principal,
}

impl<'a> MintAuthority<'a> {
    pub fn new(ledger: &'a mut TokenLedger, authority: Principal) -> Self {
        Self { ledger, authority }
    }
}

impl RewardMinter for MintAuthority<'_> {
    fn mint(&mut self, amount: Balance, recipient: &Principal) -> Result<(), TokenError> {
        self.ledger.mint(&self.authority, amount, recipient)
    }
}
