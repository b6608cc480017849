pub mod feed;
pub mod marketplace;
pub mod price;
pub mod telegram;
pub mod types;

pub use feed::{FeedSource, RssFeedClient};
pub use marketplace::{SoldListingsEstimator, ValueEstimator};
pub use telegram::{Notifier, TelegramNotifier};
pub use types::*;
