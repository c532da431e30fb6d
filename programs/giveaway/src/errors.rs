use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Giveaway is paused")]
    Paused,
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Invalid admin address")]
    InvalidAdmin,
    #[msg("Invalid authority address")]
    InvalidAuthority,
    #[msg("Invalid cycle duration (must exceed the schedule slack)")]
    InvalidCycleDuration,
    #[msg("Round id must follow the current round")]
    InvalidRoundId,
    #[msg("Round is not the current round")]
    NotCurrentRound,
    #[msg("Previous round has not been drawn yet")]
    RoundStillActive,
    #[msg("Round is not open")]
    RoundNotOpen,
    #[msg("Round is not closed")]
    RoundNotClosed,
    #[msg("Round is not drawn")]
    RoundNotDrawn,
    #[msg("Draw has not been requested for this round")]
    DrawNotRequested,
    #[msg("A closed round is awaiting its draw")]
    DrawPending,
    #[msg("Round bidding window has ended")]
    RoundExpired,
    #[msg("Round bidding window has not ended")]
    RoundNotEnded,
    #[msg("Prize description is too long")]
    PrizeTooLong,
    #[msg("Bid must be a positive number of points")]
    InvalidBidAmount,
    #[msg("No reputation points available to bid")]
    InsufficientFunds,
    #[msg("Bid is already at the per-round maximum")]
    BidAtCap,
    #[msg("Win cap reached for this period, wait for the next period to bid")]
    IneligibleUser,
    #[msg("Too many bidders for this round (400 max)")]
    MaxBiddersReached,
    #[msg("Winner board is full for this period")]
    WinnerBoardFull,
    #[msg("Round stake table does not match its aggregates")]
    LedgerInconsistent,
    #[msg("Refund account missing for an ineligible bidder")]
    MissingRefundAccount,
    #[msg("Refund account does not belong to the bidder")]
    InvalidRefundAccount,
    #[msg("Round aggregates could not be recovered from the summary")]
    RecoveryFailed,
    #[msg("Points account does not belong to the user")]
    PointsAccountMismatch,
    #[msg("Amount must be positive")]
    ZeroAmount,
    #[msg("Math overflow")]
    MathOverflow,
}
