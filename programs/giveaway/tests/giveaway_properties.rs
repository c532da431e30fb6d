use std::sync::{Arc, Mutex};
use std::thread;

use bytemuck::Zeroable;
use giveaway::constants::{MAX_BID, MAX_WINS_PER_PERIOD};
use giveaway::draw::settle;
use giveaway::ledger::{apply_refunds, place_bid};
use giveaway::state::{PointsAccount, Round, RoundStatus, WinnerBoard};

fn seed(n: u64) -> [u8; 32] {
    *blake3::hash(&n.to_le_bytes()).as_bytes()
}

fn points(user_id: u64, balance: u64) -> PointsAccount {
    PointsAccount {
        user_id,
        balance,
        ..Default::default()
    }
}

fn empty_round() -> Box<Round> {
    let mut round: Box<Round> = Box::new(Zeroable::zeroed());
    round.round_id = 1;
    round.status = RoundStatus::Closed as u8;
    round
}

fn empty_board() -> Box<WinnerBoard> {
    Box::new(Zeroable::zeroed())
}

fn stake_sum(round: &Round) -> u64 {
    round.stakes.data.iter().sum()
}

#[test]
fn total_entries_tracks_every_accepted_bid() {
    let mut round = empty_round();
    let mut board = empty_board();
    let mut wallets: Vec<PointsAccount> = (1..=5).map(|id| points(id, 20_000)).collect();

    for step in 0..40u64 {
        let wallet = &mut wallets[(step % 5) as usize];
        let requested = 1 + (step * 997) % 9_000;
        let _ = place_bid(wallet, &mut round, &board, requested);
        assert_eq!(round.total_entries, stake_sum(&round));
        assert!(round
            .stakes
            .data
            .iter()
            .all(|stake| *stake <= MAX_BID));
    }

    settle(&mut round, &mut board, &seed(1), 0).unwrap();
    assert_eq!(round.total_entries, 0);
    assert_eq!(stake_sum(&round), 0);
}

#[test]
fn balance_is_independent_of_bid_order() {
    let requests = [600u64, 5_000, 1, 32_768, 250, 12_000];
    let mut orders: Vec<Vec<u64>> = vec![requests.to_vec()];
    orders.push(requests.iter().rev().copied().collect());
    let mut rotated = requests.to_vec();
    rotated.rotate_left(2);
    orders.push(rotated);

    let board = empty_board();
    for order in orders {
        let mut wallet = points(7, 40_000);
        let mut round = empty_round();
        let mut accepted = 0u64;
        for requested in order {
            if let Ok(receipt) = place_bid(&mut wallet, &mut round, &board, requested) {
                accepted += receipt.accepted_amount;
            }
        }
        assert_eq!(wallet.balance, 40_000 - accepted);
        assert_eq!(round.stake_of(7), accepted);
    }
}

#[test]
fn concurrent_bids_never_lose_points() {
    // one lock per round, as the runtime's write lock on the round account
    let shared = Arc::new(Mutex::new((points(9, 30_000), empty_round(), 0u64)));
    let board: Arc<WinnerBoard> = Arc::from(empty_board());

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let shared = Arc::clone(&shared);
            let board = Arc::clone(&board);
            thread::spawn(move || {
                for i in 0..25u64 {
                    let requested = 1 + (t * 131 + i * 17) % 700;
                    let mut guard = shared.lock().unwrap();
                    let (wallet, round, accepted) = &mut *guard;
                    if let Ok(receipt) = place_bid(wallet, round, &board, requested) {
                        *accepted += receipt.accepted_amount;
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let guard = shared.lock().unwrap();
    let (wallet, round, accepted) = &*guard;
    assert_eq!(wallet.balance, 30_000 - accepted);
    assert_eq!(round.stake_of(9), *accepted);
    assert!(round.stake_of(9) <= MAX_BID);
    assert_eq!(round.total_entries, *accepted);
}

#[test]
fn zero_request_changes_nothing() {
    let board = empty_board();
    let mut wallet = points(3, 100);
    let mut round = empty_round();
    place_bid(&mut wallet, &mut round, &board, 40).unwrap();

    assert!(place_bid(&mut wallet, &mut round, &board, 0).is_err());
    assert_eq!(wallet.balance, 60);
    assert_eq!(round.stake_of(3), 40);
    assert_eq!(round.total_entries, 40);
}

#[test]
fn capped_user_is_turned_away_at_bid_time() {
    let mut board = empty_board();
    let mut wallet = points(4, 900);
    let mut round = empty_round();
    place_bid(&mut wallet, &mut round, &board, 100).unwrap();
    for _ in 0..MAX_WINS_PER_PERIOD {
        board.record_win(4).unwrap();
    }

    assert!(place_bid(&mut wallet, &mut round, &board, 300).is_err());
    assert_eq!(wallet.balance, 800);
    assert_eq!(round.stake_of(4), 100);
    assert_eq!(round.total_entries, 100);
}

#[test]
fn bid_is_clamped_to_balance() {
    let board = empty_board();
    let mut wallet = points(1, 500);
    let mut round = empty_round();
    let receipt = place_bid(&mut wallet, &mut round, &board, 600).unwrap();
    assert_eq!(receipt.accepted_amount, 500);
    assert_eq!(receipt.new_bid, 500);
    assert_eq!(receipt.new_balance, 0);
}

#[test]
fn bid_is_clamped_to_per_round_cap() {
    let board = empty_board();
    let mut wallet = points(2, 33_000);
    let mut round = empty_round();
    place_bid(&mut wallet, &mut round, &board, 32_000).unwrap();
    assert_eq!(wallet.balance, 1_000);

    let receipt = place_bid(&mut wallet, &mut round, &board, 1_000).unwrap();
    assert_eq!(receipt.accepted_amount, 768);
    assert_eq!(receipt.new_bid, 32_768);
    assert_eq!(receipt.new_balance, 232);
}

#[test]
fn heavy_bidder_wins_in_proportion_to_stake() {
    let trials = 2_000u64;
    let mut heavy_wins = 0u64;

    for n in 0..trials {
        let mut round = empty_round();
        round.commit_stake(1, 500).unwrap();
        round.commit_stake(2, 32_768).unwrap();
        let mut board = empty_board();

        let settlement = settle(&mut round, &mut board, &seed(n), 0).unwrap();
        if settlement.winners[0] == 2 {
            heavy_wins += 1;
        }
    }

    // expected 32768 / 33268 ≈ 0.985
    let share = heavy_wins as f64 / trials as f64;
    assert!((0.97..=0.995).contains(&share), "share {share}");
}

#[test]
fn capped_bidder_is_refunded_and_excluded() {
    let mut round = empty_round();
    round.commit_stake(10, 300).unwrap();
    round.commit_stake(11, 200).unwrap();
    round.commit_stake(12, 50).unwrap();

    let mut board = empty_board();
    for _ in 0..MAX_WINS_PER_PERIOD {
        board.record_win(11).unwrap();
    }

    let mut capped = points(11, 0);
    let settlement = settle(&mut round, &mut board, &seed(42), 0).unwrap();

    assert_eq!(settlement.refunds, vec![(11, 200)]);
    assert!(!settlement.winners.contains(&11));
    assert_eq!(settlement.stats.total_entries, 350);

    let receipts = apply_refunds(&settlement.refunds, &mut [&mut capped]).unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].refunded, 200);
    assert_eq!(capped.balance, 200);
    assert_eq!(round.stake_of(11), 0);
    assert_eq!(round.refunded_count, 1);
}

#[test]
fn drawn_winners_are_always_under_the_cap() {
    for n in 0..200u64 {
        let mut round = empty_round();
        let mut board = empty_board();
        for user in 1..=6u64 {
            round.commit_stake(user, user * 100).unwrap();
            for _ in 0..(user % 4) {
                board.record_win(user).unwrap();
            }
        }
        let before: Vec<u8> = (1..=6u64).map(|u| board.wins_of(u)).collect();

        let settlement = settle(&mut round, &mut board, &seed(n), 0).unwrap();

        for user in &settlement.winners {
            assert!(before[(*user - 1) as usize] < MAX_WINS_PER_PERIOD);
        }
        assert!(settlement.winners.len() <= 3);
    }
}

#[test]
fn draw_without_eligible_bidders_resets_cleanly() {
    let mut round = empty_round();
    round.commit_stake(5, 120).unwrap();
    let mut board = empty_board();
    for _ in 0..MAX_WINS_PER_PERIOD {
        board.record_win(5).unwrap();
    }

    let settlement = settle(&mut round, &mut board, &seed(9), 1_700_000_000).unwrap();

    assert!(settlement.winners.is_empty());
    assert_eq!(settlement.refunds, vec![(5, 120)]);
    assert_eq!(settlement.average_bid_x100, 0);
    assert_eq!(round.status, RoundStatus::Drawn as u8);
    assert_eq!(round.winners_count, 0);
    assert_eq!(round.total_entries, 0);
    assert_eq!(round.bidders_count, 0);
    assert_eq!(round.drawn_at, 1_700_000_000);
}

#[test]
fn empty_round_draws_nobody() {
    let mut round = empty_round();
    let mut board = empty_board();
    let settlement = settle(&mut round, &mut board, &seed(10), 0).unwrap();
    assert!(settlement.winners.is_empty());
    assert!(settlement.refunds.is_empty());
    assert_eq!(round.status, RoundStatus::Drawn as u8);
}
