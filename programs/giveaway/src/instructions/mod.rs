pub mod init_config;
pub mod update_config;
pub mod award_points;
pub mod start_round;
pub mod increase_bid;
pub mod check_bid;
pub mod close_round;
pub mod request_draw;
pub mod draw_settlement;
pub mod draw_callback;
#[cfg(feature = "devnet")]
pub mod mock_draw;
pub mod record_win;
pub mod reset_period;
pub mod recover_round;
pub mod reclaim_round;

pub use init_config::*;
pub use update_config::*;
pub use award_points::*;
pub use start_round::*;
pub use increase_bid::*;
pub use check_bid::*;
pub use close_round::*;
pub use request_draw::*;
pub use draw_callback::*;
#[cfg(feature = "devnet")]
pub use mock_draw::*;
pub use record_win::*;
pub use reset_period::*;
pub use recover_round::*;
pub use reclaim_round::*;
