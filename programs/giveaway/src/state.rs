use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use crate::constants::{BPS_DENOMINATOR, MAX_BID, MAX_BIDDERS, MAX_PERIOD_WINNERS, MAX_PRIZE_LEN, MAX_WINS_PER_PERIOD, WINNER_SLOTS};
use crate::errors::ErrorCode;
use crate::utils::{bit_add, bit_prefix_sum, bit_sub, checked_add_u64, checked_sub_u64};

/// Per-slot u64 table (bidder ids, stakes). bytemuck doesn't impl Pod for arbitrary array sizes.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct SlotTable {
    pub data: [u64; MAX_BIDDERS],
}

unsafe impl Pod for SlotTable {}
unsafe impl Zeroable for SlotTable {}

/// Wrapper for Fenwick tree array; bytemuck doesn't impl Pod for arbitrary array sizes.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct FenwickTree {
    pub data: [u64; MAX_BIDDERS + 1],
}

unsafe impl Pod for FenwickTree {}
unsafe impl Zeroable for FenwickTree {}

macro_rules! u64_array_idl {
    ($name:ident, $len:expr) => {
        #[cfg(feature = "idl-build")]
        impl anchor_lang::IdlBuild for $name {
            fn create_type() -> Option<anchor_lang::idl::types::IdlTypeDef> {
                use anchor_lang::idl::types::*;
                Some(IdlTypeDef {
                    name: stringify!($name).to_string(),
                    docs: vec![],
                    serialization: IdlSerialization::Bytemuck,
                    repr: Some(IdlRepr::C(IdlReprModifier { packed: false, align: None })),
                    generics: vec![],
                    ty: IdlTypeDefTy::Struct {
                        fields: Some(IdlDefinedFields::Named(vec![IdlField {
                            name: "data".to_string(),
                            docs: vec![],
                            ty: IdlType::Array(Box::new(IdlType::U64), IdlArrayLen::Value($len)),
                        }])),
                    },
                })
            }
            fn insert_types(types: &mut std::collections::BTreeMap<String, anchor_lang::idl::types::IdlTypeDef>) {
                if let Some(ty) = Self::create_type() {
                    types.insert(stringify!($name).to_string(), ty);
                }
            }
            fn get_full_path() -> String {
                stringify!($name).to_string()
            }
        }
    };
}

u64_array_idl!(SlotTable, MAX_BIDDERS);
u64_array_idl!(FenwickTree, MAX_BIDDERS + 1);

/// Lifecycle shared by `Config.round_state` and `Round.status`.
/// A round account is never `Idle`; that value only describes the config when no round exists yet.
#[repr(u8)]
pub enum RoundStatus {
    Idle = 0,
    Open = 1,
    Closed = 2,
    Drawn = 3,
}

#[account]
pub struct Config {
    pub admin: Pubkey,
    /// Bot key that submits bids, awards points and drives the daily schedule.
    pub authority: Pubkey,
    pub cycle_duration_sec: u32,
    pub paused: bool,
    pub bump: u8,
    pub current_round_id: u64,
    pub round_state: u8,
    /// Bumped on every round transition.
    pub state_version: u64,
    pub reserved: [u8; 32],
}

impl Config {
    pub const SPACE: usize = 8
        + 32 + 32
        + 4
        + 1
        + 1
        + 8
        + 1
        + 8
        + 32;

    /// Idle/Drawn -> Open. Only `current_round_id + 1` may be opened, so two rounds are never open.
    pub fn open_round(&mut self, round_id: u64) -> Result<()> {
        require!(
            self.round_state == RoundStatus::Idle as u8
                || self.round_state == RoundStatus::Drawn as u8,
            ErrorCode::RoundStillActive
        );
        let expected = checked_add_u64(self.current_round_id, 1)?;
        require!(round_id == expected, ErrorCode::InvalidRoundId);

        self.current_round_id = round_id;
        self.advance(RoundStatus::Open)
    }

    pub fn close_round(&mut self, round_id: u64) -> Result<()> {
        self.require_current(round_id)?;
        require!(self.round_state == RoundStatus::Open as u8, ErrorCode::RoundNotOpen);
        self.advance(RoundStatus::Closed)
    }

    pub fn finish_draw(&mut self, round_id: u64) -> Result<()> {
        self.require_current(round_id)?;
        require!(self.round_state == RoundStatus::Closed as u8, ErrorCode::RoundNotClosed);
        self.advance(RoundStatus::Drawn)
    }

    pub fn require_current(&self, round_id: u64) -> Result<()> {
        require!(round_id == self.current_round_id, ErrorCode::NotCurrentRound);
        Ok(())
    }

    fn advance(&mut self, next: RoundStatus) -> Result<()> {
        self.round_state = next as u8;
        self.state_version = checked_add_u64(self.state_version, 1)?;
        Ok(())
    }
}

/// Aggregates re-derived from a round's stake table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundAggregates {
    pub total_entries: u64,
    pub top_bid: u64,
    pub bidders: u16,
}

/// Round account, zero-copy. Holds the whole stake table for the round.
/// All instructions must use `AccountLoader<'info, Round>` and call `.load()` / `.load_mut()`.
#[account(zero_copy)]
#[repr(C)]
pub struct Round {
    pub round_id: u64,
    pub status: u8,
    pub bump: u8,
    pub vrf_pending: u8,
    pub winners_count: u8,
    pub prize_len: u8,
    pub _padding: [u8; 3],

    pub opened_at: i64,
    pub end_ts: i64,
    pub closed_at: i64,
    pub drawn_at: i64,

    pub total_entries: u64,
    pub top_bid: u64,
    pub bidders_count: u16,
    pub refunded_count: u16,
    pub drawn_bidders: u16,
    pub _padding2: [u8; 2],

    pub prize: [u8; MAX_PRIZE_LEN],
    pub randomness: [u8; 32],

    pub winners: [u64; WINNER_SLOTS],
    pub average_bid_x100: u64,
    pub drawn_entries: u64,
    pub drawn_top_bid: u64,
    /// Primary winner's stake when the draw ran.
    pub winning_bid: u64,

    pub bidders: SlotTable,
    pub stakes: SlotTable,
    pub bit: FenwickTree,

    pub reserved: [u8; 32],
}

impl Round {
    pub const SPACE: usize = 8 + core::mem::size_of::<Round>();

    pub fn set_prize(&mut self, prize: &str) -> Result<()> {
        let bytes = prize.as_bytes();
        require!(bytes.len() <= MAX_PRIZE_LEN, ErrorCode::PrizeTooLong);
        self.prize = [0u8; MAX_PRIZE_LEN];
        self.prize[..bytes.len()].copy_from_slice(bytes);
        self.prize_len = bytes.len() as u8;
        Ok(())
    }

    pub fn prize(&self) -> String {
        String::from_utf8_lossy(&self.prize[..self.prize_len as usize]).into_owned()
    }

    pub fn bidder_index(&self, user_id: u64) -> Option<usize> {
        self.bidders.data[..self.bidders_count as usize]
            .iter()
            .position(|id| *id == user_id)
    }

    pub fn stake_of(&self, user_id: u64) -> u64 {
        self.bidder_index(user_id)
            .map(|i| self.stakes.data[i])
            .unwrap_or(0)
    }

    /// Add an already-rectified `delta` to the user's stake, registering the user on first bid.
    /// Returns the new stake.
    pub fn commit_stake(&mut self, user_id: u64, delta: u64) -> Result<u64> {
        let index = match self.bidder_index(user_id) {
            Some(i) => i,
            None => {
                let next = self.bidders_count as usize;
                require!(next < MAX_BIDDERS, ErrorCode::MaxBiddersReached);
                self.bidders.data[next] = user_id;
                self.bidders_count += 1;
                next
            }
        };

        let new_bid = checked_add_u64(self.stakes.data[index], delta)?;
        require!(new_bid <= MAX_BID, ErrorCode::BidAtCap);

        self.stakes.data[index] = new_bid;
        self.total_entries = checked_add_u64(self.total_entries, delta)?;
        self.top_bid = self.top_bid.max(new_bid);
        bit_add(&mut self.bit.data, index + 1, delta)?;

        Ok(new_bid)
    }

    /// Chance of `stake` winning the primary slot, in basis points of the current pool.
    pub fn win_chance_bps(&self, stake: u64) -> u64 {
        if self.total_entries == 0 {
            return 0;
        }
        ((stake as u128 * BPS_DENOMINATOR as u128) / self.total_entries as u128) as u64
    }

    pub fn derive_aggregates(&self) -> Result<RoundAggregates> {
        let mut total_entries = 0u64;
        let mut top_bid = 0u64;
        let mut bidders = 0u16;
        for stake in self.stakes.data[..self.bidders_count as usize].iter().copied() {
            if stake == 0 {
                continue;
            }
            total_entries = checked_add_u64(total_entries, stake)?;
            top_bid = top_bid.max(stake);
            bidders += 1;
        }
        Ok(RoundAggregates { total_entries, top_bid, bidders })
    }

    /// Stake table, stored total and Fenwick total must all agree before a draw.
    pub fn verify_aggregates(&self) -> Result<()> {
        let derived = self.derive_aggregates()?;
        let tree_total = bit_prefix_sum(&self.bit.data, MAX_BIDDERS)?;
        if derived.total_entries != self.total_entries || tree_total != self.total_entries {
            msg!(
                "round {} inconsistent: stakes={} stored={} tree={}",
                self.round_id,
                derived.total_entries,
                self.total_entries,
                tree_total
            );
            return err!(ErrorCode::LedgerInconsistent);
        }
        Ok(())
    }

    /// Rebuild stored aggregates and the Fenwick tree from the stake table, provided the stake
    /// table agrees with the last published summary. Nothing is written on mismatch.
    pub fn rebuild_aggregates(&mut self, summary_total_entries: u64) -> Result<RoundAggregates> {
        let derived = self.derive_aggregates()?;
        if derived.total_entries != summary_total_entries {
            msg!(
                "round {} unrecoverable: stakes={} summary={}",
                self.round_id,
                derived.total_entries,
                summary_total_entries
            );
            return err!(ErrorCode::RecoveryFailed);
        }

        self.bit.data.fill(0);
        for i in 0..self.bidders_count as usize {
            let stake = self.stakes.data[i];
            if stake > 0 {
                bit_add(&mut self.bit.data, i + 1, stake)?;
            }
        }
        self.total_entries = derived.total_entries;
        self.top_bid = derived.top_bid;

        Ok(derived)
    }

    /// Zero the stake of every bidder at the win cap and return what each is owed.
    pub fn exclude_ineligible(&mut self, board: &WinnerBoard) -> Result<Vec<(u64, u64)>> {
        let mut refunds = Vec::new();
        for i in 0..self.bidders_count as usize {
            let stake = self.stakes.data[i];
            let user_id = self.bidders.data[i];
            if stake == 0 || board.is_eligible(user_id) {
                continue;
            }
            bit_sub(&mut self.bit.data, i + 1, stake)?;
            self.stakes.data[i] = 0;
            self.total_entries = checked_sub_u64(self.total_entries, stake)?;
            self.refunded_count += 1;
            refunds.push((user_id, stake));
        }
        if !refunds.is_empty() {
            self.top_bid = self.derive_aggregates()?.top_bid;
        }
        Ok(refunds)
    }

    /// Record the draw result, then zero every stake and live aggregate.
    pub fn complete_draw(
        &mut self,
        winners: &[u64],
        stats: RoundAggregates,
        average_bid_x100: u64,
        randomness: &[u8; 32],
        now: i64,
    ) {
        self.winners = [0u64; WINNER_SLOTS];
        let count = winners.len().min(WINNER_SLOTS);
        self.winners[..count].copy_from_slice(&winners[..count]);
        self.winners_count = count as u8;
        self.average_bid_x100 = average_bid_x100;
        self.drawn_entries = stats.total_entries;
        self.drawn_top_bid = stats.top_bid;
        self.drawn_bidders = stats.bidders;
        self.randomness = *randomness;
        self.winning_bid = winners.first().map(|w| self.stake_of(*w)).unwrap_or(0);

        self.bidders.data.fill(0);
        self.stakes.data.fill(0);
        self.bit.data.fill(0);
        self.bidders_count = 0;
        self.total_entries = 0;
        self.top_bid = 0;

        self.vrf_pending = 0;
        self.drawn_at = now;
        self.status = RoundStatus::Drawn as u8;
    }
}

/// Win counters for the current accounting period. A user without an entry has no wins.
#[account(zero_copy)]
#[repr(C)]
pub struct WinnerBoard {
    pub period_id: u64,
    pub entries_count: u16,
    pub bump: u8,
    pub _padding: [u8; 5],
    pub users: [u64; MAX_PERIOD_WINNERS],
    pub wins: [u8; MAX_PERIOD_WINNERS],
    pub reserved: [u8; 32],
}

impl WinnerBoard {
    pub const SPACE: usize = 8 + core::mem::size_of::<WinnerBoard>();

    fn position(&self, user_id: u64) -> Option<usize> {
        self.users[..self.entries_count as usize]
            .iter()
            .position(|id| *id == user_id)
    }

    pub fn wins_of(&self, user_id: u64) -> u8 {
        self.position(user_id).map(|i| self.wins[i]).unwrap_or(0)
    }

    pub fn is_eligible(&self, user_id: u64) -> bool {
        self.wins_of(user_id) < MAX_WINS_PER_PERIOD
    }

    /// Returns the user's win count after the increment.
    pub fn record_win(&mut self, user_id: u64) -> Result<u8> {
        let index = match self.position(user_id) {
            Some(i) => i,
            None => {
                let next = self.entries_count as usize;
                require!(next < MAX_PERIOD_WINNERS, ErrorCode::WinnerBoardFull);
                self.users[next] = user_id;
                self.wins[next] = 0;
                self.entries_count += 1;
                next
            }
        };
        self.wins[index] = self.wins[index].saturating_add(1).min(MAX_WINS_PER_PERIOD);
        Ok(self.wins[index])
    }

    /// Clear every win counter and move to the next period.
    pub fn start_period(&mut self) -> Result<u64> {
        self.users = [0u64; MAX_PERIOD_WINNERS];
        self.wins = [0u8; MAX_PERIOD_WINNERS];
        self.entries_count = 0;
        self.period_id = checked_add_u64(self.period_id, 1)?;
        Ok(self.period_id)
    }
}

#[account]
#[derive(Default)]
pub struct PointsAccount {
    pub user_id: u64,
    pub balance: u64,
    pub bump: u8,
    pub reserved: [u8; 16],
}

impl PointsAccount {
    pub const SPACE: usize = 8
        + 8 + 8
        + 1
        + 16;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_round() -> Box<Round> {
        let mut round: Box<Round> = Box::new(Zeroable::zeroed());
        round.round_id = 7;
        round.status = RoundStatus::Open as u8;
        round
    }

    fn empty_board() -> Box<WinnerBoard> {
        Box::new(Zeroable::zeroed())
    }

    fn idle_config() -> Config {
        Config {
            admin: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            cycle_duration_sec: 86_400,
            paused: false,
            bump: 255,
            current_round_id: 0,
            round_state: RoundStatus::Idle as u8,
            state_version: 0,
            reserved: [0u8; 32],
        }
    }

    #[test]
    fn config_walks_the_lifecycle_in_order() {
        let mut cfg = idle_config();
        cfg.open_round(1).unwrap();
        assert_eq!(cfg.round_state, RoundStatus::Open as u8);
        assert!(cfg.open_round(2).is_err());

        cfg.close_round(1).unwrap();
        assert!(cfg.close_round(1).is_err());
        cfg.finish_draw(1).unwrap();
        assert!(cfg.finish_draw(1).is_err());

        cfg.open_round(2).unwrap();
        assert_eq!(cfg.current_round_id, 2);
        assert_eq!(cfg.state_version, 4);
    }

    #[test]
    fn config_rejects_skipped_or_stale_round_ids() {
        let mut cfg = idle_config();
        assert!(cfg.open_round(2).is_err());
        cfg.open_round(1).unwrap();
        assert!(cfg.close_round(2).is_err());
        assert_eq!(cfg.state_version, 1);
    }

    #[test]
    fn commit_stake_keeps_aggregates_in_step() {
        let mut round = empty_round();
        assert_eq!(round.commit_stake(11, 500).unwrap(), 500);
        assert_eq!(round.commit_stake(22, 300).unwrap(), 300);
        assert_eq!(round.commit_stake(11, 100).unwrap(), 600);

        assert_eq!(round.bidders_count, 2);
        assert_eq!(round.total_entries, 900);
        assert_eq!(round.top_bid, 600);
        assert_eq!(bit_prefix_sum(&round.bit.data, MAX_BIDDERS).unwrap(), 900);
        round.verify_aggregates().unwrap();
    }

    #[test]
    fn commit_stake_refuses_to_pass_the_cap() {
        let mut round = empty_round();
        round.commit_stake(11, MAX_BID).unwrap();
        assert!(round.commit_stake(11, 1).is_err());
        assert_eq!(round.stake_of(11), MAX_BID);
    }

    #[test]
    fn commit_stake_stops_at_bidder_capacity() {
        let mut round = empty_round();
        for user in 0..MAX_BIDDERS as u64 {
            round.commit_stake(user + 1, 1).unwrap();
        }
        assert!(round.commit_stake(10_000, 1).is_err());
        assert_eq!(round.total_entries, MAX_BIDDERS as u64);
    }

    #[test]
    fn verify_aggregates_catches_drift() {
        let mut round = empty_round();
        round.commit_stake(11, 40).unwrap();
        round.total_entries = 41;
        assert!(round.verify_aggregates().is_err());
    }

    #[test]
    fn rebuild_aggregates_restores_from_matching_summary() {
        let mut round = empty_round();
        round.commit_stake(11, 40).unwrap();
        round.commit_stake(12, 60).unwrap();
        round.total_entries = 0;
        round.top_bid = 0;
        round.bit.data = [0u64; MAX_BIDDERS + 1];

        let derived = round.rebuild_aggregates(100).unwrap();
        assert_eq!(derived, RoundAggregates { total_entries: 100, top_bid: 60, bidders: 2 });
        round.verify_aggregates().unwrap();
    }

    #[test]
    fn rebuild_aggregates_refuses_mismatched_summary() {
        let mut round = empty_round();
        round.commit_stake(11, 40).unwrap();
        round.total_entries = 5;
        assert!(round.rebuild_aggregates(99).is_err());
        assert_eq!(round.total_entries, 5);
    }

    #[test]
    fn exclude_ineligible_zeroes_and_reports_capped_bidders() {
        let mut round = empty_round();
        let mut board = empty_board();
        round.commit_stake(1, 200).unwrap();
        round.commit_stake(2, 900).unwrap();
        for _ in 0..MAX_WINS_PER_PERIOD {
            board.record_win(2).unwrap();
        }

        let refunds = round.exclude_ineligible(&board).unwrap();
        assert_eq!(refunds, vec![(2, 900)]);
        assert_eq!(round.stake_of(2), 0);
        assert_eq!(round.total_entries, 200);
        assert_eq!(round.top_bid, 200);
        assert_eq!(round.refunded_count, 1);
        round.verify_aggregates().unwrap();
    }

    #[test]
    fn complete_draw_resets_stakes_but_keeps_the_result() {
        let mut round = empty_round();
        round.commit_stake(1, 10).unwrap();
        round.commit_stake(2, 30).unwrap();
        let stats = round.derive_aggregates().unwrap();

        round.complete_draw(&[2, 1], stats, 2_000, &[9u8; 32], 1_700_000_000);

        assert_eq!(round.status, RoundStatus::Drawn as u8);
        assert_eq!(round.winners_count, 2);
        assert_eq!(&round.winners[..2], &[2, 1]);
        assert_eq!(round.drawn_entries, 40);
        assert_eq!(round.drawn_top_bid, 30);
        assert_eq!(round.winning_bid, 30);
        assert_eq!(round.total_entries, 0);
        assert_eq!(round.top_bid, 0);
        assert!(round.stakes.data.iter().all(|s| *s == 0));
        round.verify_aggregates().unwrap();
    }

    #[test]
    fn prize_roundtrips_and_rejects_long_text() {
        let mut round = empty_round();
        round.set_prize("Factorio").unwrap();
        assert_eq!(round.prize(), "Factorio");
        assert!(round.set_prize(&"x".repeat(MAX_PRIZE_LEN + 1)).is_err());
    }

    #[test]
    fn board_caps_wins_and_clears_on_new_period() {
        let mut board = empty_board();
        assert!(board.is_eligible(5));
        assert_eq!(board.record_win(5).unwrap(), 1);
        board.record_win(5).unwrap();
        assert_eq!(board.record_win(5).unwrap(), MAX_WINS_PER_PERIOD);
        assert!(!board.is_eligible(5));
        assert_eq!(board.record_win(5).unwrap(), MAX_WINS_PER_PERIOD);

        assert_eq!(board.start_period().unwrap(), 1);
        assert_eq!(board.wins_of(5), 0);
        assert!(board.is_eligible(5));
    }

    #[test]
    fn board_reports_full() {
        let mut board = empty_board();
        for user in 0..MAX_PERIOD_WINNERS as u64 {
            board.record_win(user + 1).unwrap();
        }
        assert!(board.record_win(9_999).is_err());
    }
}
