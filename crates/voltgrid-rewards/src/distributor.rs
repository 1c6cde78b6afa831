use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use voltgrid_core::constants::{
    BASE_RATE_PER_KWH, BLOCKS_PER_DAY, BLOCKS_PER_HOUR, DAILY_REWARD_CAP, MAX_KWH_PER_SESSION,
    MULTIPLIER_SCALE, OFF_PEAK_END_HOUR, OFF_PEAK_MULTIPLIER, OFF_PEAK_START_HOUR,
    PEAK_MULTIPLIER, SESSION_WINDOW_BLOCKS,
};
use voltgrid_core::error::RewardsError;
use voltgrid_core::types::{Balance, BlockHeight, Principal, SessionId, SessionProof};

use crate::config::DistributorConfig;
use crate::directory::MemberDirectory;
use crate::minter::RewardMinter;
use crate::proof::session_digest;

// ── Reward schedule ───────────────────────────────────────────────────────────

/// Whether a session timestamp falls in the off-peak window of the in-day
/// clock (hour >= 22 or hour < 6).
pub fn is_off_peak(timestamp: BlockHeight) -> bool {
    let hour = (timestamp % BLOCKS_PER_DAY) / BLOCKS_PER_HOUR;
    hour >= OFF_PEAK_START_HOUR || hour < OFF_PEAK_END_HOUR
}

/// Time-of-use reward for a session: `kwh * base * multiplier / scale`,
/// with off-peak energy rewarded at four times the on-peak rate.
pub fn compute_reward(kwh: u64, off_peak: bool) -> Balance {
    let multiplier = if off_peak {
        OFF_PEAK_MULTIPLIER
    } else {
        PEAK_MULTIPLIER
    };
    Balance::from(kwh) * BASE_RATE_PER_KWH * multiplier / MULTIPLIER_SCALE
}

// ── ChargeSession ─────────────────────────────────────────────────────────────

/// A recorded charging session. Immutable once stored, except for the
/// `claimed` flag, which is set exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeSession {
    pub user: Principal,
    pub station: Principal,
    pub kwh: u64,
    pub timestamp: BlockHeight,
    /// Derived from `timestamp` at submission time.
    pub off_peak: bool,
    pub claimed: bool,
    pub proof: SessionProof,
}

// ── RewardsDistributor ────────────────────────────────────────────────────────

/// The session-rewards state machine.
///
/// Sessions move Submitted → Claimed and nowhere else. The submission
/// nonce is strictly monotonic and doubles as the session id; the proof a
/// submission carries must recompute against that nonce and the submitting
/// block height, which is what makes a captured proof worthless anywhere
/// else.
#[derive(Debug, Clone)]
pub struct RewardsDistributor {
    config: DistributorConfig,
    total_rewards: Balance,
    nonce: SessionId,
    sessions: BTreeMap<SessionId, ChargeSession>,
    /// Cumulative reward credited per (user, day); day = height / 1440.
    /// Rows are created lazily and never removed.
    daily_rewards: BTreeMap<(Principal, u64), Balance>,
}

impl RewardsDistributor {
    pub fn new(config: DistributorConfig) -> Self {
        Self {
            config,
            total_rewards: 0,
            nonce: 0,
            sessions: BTreeMap::new(),
            daily_rewards: BTreeMap::new(),
        }
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// All setters are oracle-gated; with no oracle configured they reject
    /// everyone, so runtime rewiring is only possible when construction
    /// installed an oracle.
    pub fn set_oracle(
        &mut self,
        caller: &Principal,
        new_oracle: Principal,
    ) -> Result<(), RewardsError> {
        self.ensure_oracle(caller)?;
        self.config.oracle = Some(new_oracle);
        Ok(())
    }

    pub fn set_token_contract(
        &mut self,
        caller: &Principal,
        contract: Principal,
    ) -> Result<(), RewardsError> {
        self.ensure_oracle(caller)?;
        self.config.token_contract = contract;
        Ok(())
    }

    pub fn set_station_registry(
        &mut self,
        caller: &Principal,
        registry: Principal,
    ) -> Result<(), RewardsError> {
        self.ensure_oracle(caller)?;
        self.config.station_registry = registry;
        Ok(())
    }

    pub fn set_user_registry(
        &mut self,
        caller: &Principal,
        registry: Principal,
    ) -> Result<(), RewardsError> {
        self.ensure_oracle(caller)?;
        self.config.user_registry = registry;
        Ok(())
    }

    // ── Session lifecycle ─────────────────────────────────────────────────────

    /// Record a charging session for the caller. The proof must byte-equal
    /// the digest over (current nonce, caller, station, kwh, timestamp,
    /// height). Returns the session id.
    pub fn submit_session(
        &mut self,
        caller: &Principal,
        height: BlockHeight,
        station: &Principal,
        kwh: u64,
        timestamp: BlockHeight,
        proof: SessionProof,
        users: &dyn MemberDirectory,
        stations: &dyn MemberDirectory,
    ) -> Result<SessionId, RewardsError> {
        if self.config.oracle.is_none() {
            return Err(RewardsError::OracleNotSet);
        }
        if !users.is_registered(caller) {
            return Err(RewardsError::UserNotRegistered(caller.clone()));
        }
        if !stations.is_registered(station) {
            return Err(RewardsError::StationNotRegistered(station.clone()));
        }
        if kwh == 0 || kwh > MAX_KWH_PER_SESSION {
            return Err(RewardsError::InvalidAmount {
                max: MAX_KWH_PER_SESSION,
            });
        }
        // The session must reference energy delivered within the trailing
        // window and never in the future.
        if timestamp < height.saturating_sub(SESSION_WINDOW_BLOCKS) || timestamp > height {
            return Err(RewardsError::InvalidTimestamp);
        }
        let expected = session_digest(self.nonce, caller, station, kwh, timestamp, height);
        if proof != expected {
            warn!(nonce = self.nonce, user = %caller, "session proof mismatch");
            return Err(RewardsError::InvalidProof);
        }

        let id = self.nonce;
        self.sessions.insert(
            id,
            ChargeSession {
                user: caller.clone(),
                station: station.clone(),
                kwh,
                timestamp,
                off_peak: is_off_peak(timestamp),
                claimed: false,
                proof,
            },
        );
        self.nonce += 1;
        info!(session = id, user = %caller, kwh, "recorded charging session");
        Ok(id)
    }

    /// Claim the reward for a session. Only the session's user may claim,
    /// exactly once, and only while the user's daily bucket has room. The
    /// mint lands first; the bucket, the claimed flag, and the running
    /// total then commit together, so a failed mint leaves the session
    /// claimable.
    pub fn claim_reward(
        &mut self,
        caller: &Principal,
        height: BlockHeight,
        session_id: SessionId,
        minter: &mut dyn RewardMinter,
    ) -> Result<Balance, RewardsError> {
        let (user, reward) = {
            let session = self
                .sessions
                .get(&session_id)
                .ok_or(RewardsError::InvalidSession(session_id))?;
            if session.user != *caller {
                return Err(RewardsError::Unauthorized);
            }
            if session.claimed {
                return Err(RewardsError::AlreadyClaimed);
            }
            (session.user.clone(), compute_reward(session.kwh, session.off_peak))
        };

        let day = height / BLOCKS_PER_DAY;
        let bucket = self
            .daily_rewards
            .get(&(user.clone(), day))
            .copied()
            .unwrap_or(0);
        if bucket + reward > DAILY_REWARD_CAP {
            warn!(session = session_id, user = %caller, reward, bucket, "daily reward cap hit");
            return Err(RewardsError::MaxRewardExceeded {
                cap: DAILY_REWARD_CAP,
            });
        }

        minter
            .mint(reward, &user)
            .map_err(RewardsError::MintFailed)?;

        self.daily_rewards.insert((user, day), bucket + reward);
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.claimed = true;
        }
        self.total_rewards += reward;
        info!(session = session_id, user = %caller, reward, "claimed session reward");
        Ok(reward)
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    /// Preview the reward an unclaimed session would pay. A missing session
    /// reports `AlreadyClaimed`, the same as a claimed one.
    pub fn get_pending_reward(&self, session_id: SessionId) -> Result<Balance, RewardsError> {
        match self.sessions.get(&session_id) {
            Some(session) if !session.claimed => {
                Ok(compute_reward(session.kwh, session.off_peak))
            }
            _ => Err(RewardsError::AlreadyClaimed),
        }
    }

    /// Cumulative reward credited to `user` on the day `height` falls in.
    pub fn get_user_rewards_today(&self, user: &Principal, height: BlockHeight) -> Balance {
        self.daily_rewards
            .get(&(user.clone(), height / BLOCKS_PER_DAY))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_rewards(&self) -> Balance {
        self.total_rewards
    }

    /// The nonce the next submission will be keyed by. Proof issuers need
    /// this to compute the digest a submission must carry.
    pub fn next_nonce(&self) -> SessionId {
        self.nonce
    }

    pub fn session(&self, id: SessionId) -> Option<&ChargeSession> {
        self.sessions.get(&id)
    }

    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    fn ensure_oracle(&self, caller: &Principal) -> Result<(), RewardsError> {
        match &self.config.oracle {
            Some(oracle) if oracle == caller => Ok(()),
            _ => Err(RewardsError::Unauthorized),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
