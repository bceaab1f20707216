//! Bet ledger — recording, settlement, and performance statistics.
//!
//! The ledger is the sole writer of logged bets. Mutations are
//! synchronous single-actor operations: record a wager, settle it
//! (win/loss/push), or delete it permanently. Statistics run over
//! settled bets only. Dollar amounts use `Decimal` so realized profit
//! is exact ($50 at +150 settles to 75.00, not 74.999…).

use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

use crate::types::{LoggedBet, SettlementState};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Validation and lookup failures surfaced to the caller.
/// The ledger never creates a malformed entry.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LedgerError {
    #[error("Bet odds are required")]
    MissingOdds,

    #[error("Stake amount is required")]
    MissingStake,

    #[error("Stake must be a positive amount, got {0}")]
    InvalidStake(Decimal),

    #[error("No bet with id {0}")]
    UnknownBet(i64),
}

// ---------------------------------------------------------------------------
// Input slip
// ---------------------------------------------------------------------------

/// User-entered bet details, as they arrive from a form or a pick
/// converted into a wager. Stake and odds are optional here precisely
/// so the ledger can reject their absence instead of coercing it.
#[derive(Debug, Clone, Deserialize)]
pub struct BetSlip {
    pub date: NaiveDate,
    pub sport: String,
    pub game: String,
    pub pick: String,
    pub odds: Option<i32>,
    pub stake: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Realized performance over settled bets.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerStats {
    /// Settled (non-pending) bet count.
    pub count: usize,
    pub wins: usize,
    pub losses: usize,
    pub pushes: usize,
    /// Wins over all settled bets (pushes count in the denominator).
    /// 0 when nothing is settled.
    pub win_rate_percent: f64,
    pub total_profit: Decimal,
    pub total_staked: Decimal,
    /// Profit over stake. 0 when nothing has been staked.
    pub roi_percent: f64,
}

impl fmt::Display for LedgerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} settled (W{}/L{}/P{}) | win_rate={:.1}% | profit=${} | staked=${} | ROI={:.1}%",
            self.count,
            self.wins,
            self.losses,
            self.pushes,
            self.win_rate_percent,
            self.total_profit,
            self.total_staked,
            self.roi_percent,
        )
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// In-memory bet ledger. Persistence is the caller's concern: the
/// full sequence is rewritten to the bet store after each mutation.
#[derive(Debug, Default)]
pub struct BetLedger {
    bets: Vec<LoggedBet>,
}

impl BetLedger {
    pub fn new() -> Self {
        Self { bets: Vec::new() }
    }

    /// Rehydrate a ledger from a previously stored bet sequence.
    pub fn from_bets(bets: Vec<LoggedBet>) -> Self {
        Self { bets }
    }

    /// All bets, newest first (insertion order is newest-first).
    pub fn bets(&self) -> &[LoggedBet] {
        &self.bets
    }

    /// Record a new wager. Validates the slip and assigns a
    /// creation-time-derived unique id. New bets start pending with
    /// zero profit.
    pub fn record(&mut self, slip: BetSlip) -> Result<&LoggedBet, LedgerError> {
        let odds = slip.odds.ok_or(LedgerError::MissingOdds)?;
        let stake = slip.stake.ok_or(LedgerError::MissingStake)?;
        if stake <= Decimal::ZERO {
            return Err(LedgerError::InvalidStake(stake));
        }

        let mut id = Utc::now().timestamp_millis();
        while self.bets.iter().any(|b| b.id == id) {
            id += 1;
        }

        let bet = LoggedBet {
            id,
            date: slip.date,
            sport: slip.sport,
            game: slip.game,
            pick: slip.pick,
            odds,
            stake,
            state: SettlementState::Pending,
            profit: Decimal::ZERO,
        };

        info!(id = bet.id, pick = %bet.pick, stake = %bet.stake, "Bet recorded");
        self.bets.insert(0, bet);
        Ok(&self.bets[0])
    }

    /// Settle a bet, recomputing its realized profit. Re-settling
    /// overwrites state and profit — last write wins.
    pub fn settle(
        &mut self,
        id: i64,
        outcome: SettlementState,
    ) -> Result<&LoggedBet, LedgerError> {
        let bet = self
            .bets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(LedgerError::UnknownBet(id))?;

        bet.state = outcome;
        bet.profit = realized_profit(bet.odds, bet.stake, outcome);

        debug!(id, state = %bet.state, profit = %bet.profit, "Bet settled");
        Ok(bet)
    }

    /// Permanently remove a bet. No soft-delete, no undo.
    pub fn delete(&mut self, id: i64) -> Result<LoggedBet, LedgerError> {
        let idx = self
            .bets
            .iter()
            .position(|b| b.id == id)
            .ok_or(LedgerError::UnknownBet(id))?;

        let removed = self.bets.remove(idx);
        info!(id, pick = %removed.pick, "Bet deleted");
        Ok(removed)
    }

    /// Realized performance over the settled portion of the ledger.
    /// Both percentages are defined as 0 (not NaN) when their
    /// denominators are zero.
    pub fn statistics(&self) -> LedgerStats {
        let settled: Vec<&LoggedBet> = self.bets.iter().filter(|b| b.state.is_settled()).collect();

        let count = settled.len();
        let wins = settled.iter().filter(|b| b.state == SettlementState::Win).count();
        let losses = settled.iter().filter(|b| b.state == SettlementState::Loss).count();
        let pushes = settled.iter().filter(|b| b.state == SettlementState::Push).count();

        let total_profit: Decimal = settled.iter().map(|b| b.profit).sum();
        let total_staked: Decimal = settled.iter().map(|b| b.stake).sum();

        let win_rate_percent = if count == 0 {
            0.0
        } else {
            wins as f64 / count as f64 * 100.0
        };

        let roi_percent = if total_staked.is_zero() {
            0.0
        } else {
            (total_profit / total_staked).to_f64().unwrap_or(0.0) * 100.0
        };

        LedgerStats {
            count,
            wins,
            losses,
            pushes,
            win_rate_percent,
            total_profit,
            total_staked,
            roi_percent,
        }
    }
}

/// Realized profit for a settled bet, rounded to cents.
///
/// Win pays `stake * odds/100` on underdog pricing and
/// `stake * 100/|odds|` on favorite pricing; a loss forfeits the
/// stake; a push returns it. Pending carries zero.
pub fn realized_profit(odds: i32, stake: Decimal, outcome: SettlementState) -> Decimal {
    match outcome {
        SettlementState::Win => {
            let payout = if odds > 0 {
                stake * Decimal::from(odds) / dec!(100)
            } else {
                stake * dec!(100) / Decimal::from(odds.unsigned_abs())
            };
            payout.round_dp(2)
        }
        SettlementState::Loss => -stake,
        SettlementState::Push | SettlementState::Pending => Decimal::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
