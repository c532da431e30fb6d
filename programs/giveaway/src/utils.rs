use anchor_lang::prelude::*;
use crate::constants::MAX_BID;
use crate::errors::ErrorCode;

pub fn checked_add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(ErrorCode::MathOverflow.into())
}

pub fn checked_sub_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or(ErrorCode::MathOverflow.into())
}

pub fn checked_add_i64(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b).ok_or(ErrorCode::MathOverflow.into())
}

/// Clamp a requested bid increase to what the user can afford and to the per-round cap.
pub fn rectify_bid(requested: u64, current_bid: u64, balance: u64) -> u64 {
    let delta = requested.min(balance);
    if current_bid.saturating_add(delta) > MAX_BID {
        return MAX_BID.saturating_sub(current_bid);
    }
    delta
}

pub fn bit_add(bit: &mut [u64], mut i: usize, delta: u64) -> Result<()> {
    let n = bit.len() - 1; // 1-indexed
    while i <= n {
        bit[i] = bit[i].checked_add(delta).ok_or(ErrorCode::MathOverflow)?;
        i += i & (!i + 1); // i += lowbit(i)
    }
    Ok(())
}

/// Subtract `delta` from the weight at 1-based index `i` in the Fenwick tree.
/// Used when a stake is refunded or a slot is excluded from a redraw.
pub fn bit_sub(bit: &mut [u64], mut i: usize, delta: u64) -> Result<()> {
    let n = bit.len() - 1;
    while i <= n {
        bit[i] = bit[i].checked_sub(delta).ok_or(ErrorCode::MathOverflow)?;
        i += i & (!i + 1);
    }
    Ok(())
}

/// Sum of weights at 1-based indices `1..=i`.
pub fn bit_prefix_sum(bit: &[u64], mut i: usize) -> Result<u64> {
    let mut sum = 0u64;
    i = i.min(bit.len() - 1);
    while i > 0 {
        sum = sum.checked_add(bit[i]).ok_or(ErrorCode::MathOverflow)?;
        i &= i - 1; // i -= lowbit(i)
    }
    Ok(sum)
}

pub fn bit_find_prefix(bit: &[u64], target: u64) -> Result<usize> {
    let n = bit.len() - 1;
    let mut bit_mask = 1usize;
    while bit_mask <= n {
        bit_mask <<= 1;
    }
    let mut idx = 0usize;
    let mut cur = 0u64;
    let mut step = bit_mask;
    while step > 0 {
        let next = idx + step;
        if next <= n {
            let cand = cur.checked_add(bit[next]).ok_or(ErrorCode::MathOverflow)?;
            if cand < target {
                idx = next;
                cur = cand;
            }
        }
        step >>= 1;
    }
    Ok(idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(weights: &[u64]) -> Vec<u64> {
        let mut bit = vec![0u64; weights.len() + 1];
        for (i, w) in weights.iter().enumerate() {
            bit_add(&mut bit, i + 1, *w).unwrap();
        }
        bit
    }

    #[test]
    fn rectify_limits_to_balance() {
        assert_eq!(rectify_bid(600, 0, 500), 500);
        assert_eq!(rectify_bid(100, 0, 500), 100);
    }

    #[test]
    fn rectify_limits_to_cap() {
        assert_eq!(rectify_bid(1_000, 32_000, 1_000), 768);
        assert_eq!(rectify_bid(1, MAX_BID, 1_000), 0);
    }

    #[test]
    fn rectify_zero_request_is_zero() {
        assert_eq!(rectify_bid(0, 10, 1_000), 0);
        assert_eq!(rectify_bid(50, 10, 0), 0);
    }

    #[test]
    fn prefix_sums_follow_weights() {
        let bit = tree(&[5, 0, 7, 1]);
        assert_eq!(bit_prefix_sum(&bit, 1).unwrap(), 5);
        assert_eq!(bit_prefix_sum(&bit, 2).unwrap(), 5);
        assert_eq!(bit_prefix_sum(&bit, 3).unwrap(), 12);
        assert_eq!(bit_prefix_sum(&bit, 4).unwrap(), 13);
        assert_eq!(bit_prefix_sum(&bit, 99).unwrap(), 13);
    }

    #[test]
    fn find_prefix_maps_tickets_to_owners() {
        let bit = tree(&[5, 0, 7, 1]);
        assert_eq!(bit_find_prefix(&bit, 1).unwrap(), 1);
        assert_eq!(bit_find_prefix(&bit, 5).unwrap(), 1);
        // zero-weight slot 2 is never returned
        assert_eq!(bit_find_prefix(&bit, 6).unwrap(), 3);
        assert_eq!(bit_find_prefix(&bit, 12).unwrap(), 3);
        assert_eq!(bit_find_prefix(&bit, 13).unwrap(), 4);
    }

    #[test]
    fn sub_removes_weight() {
        let mut bit = tree(&[5, 3, 7]);
        bit_sub(&mut bit, 1, 5).unwrap();
        assert_eq!(bit_prefix_sum(&bit, 3).unwrap(), 10);
        assert_eq!(bit_find_prefix(&bit, 1).unwrap(), 2);
        assert!(bit_sub(&mut bit, 2, 4).is_err());
    }
}
