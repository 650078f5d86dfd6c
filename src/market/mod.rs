pub mod favorites;
pub mod sort;
pub mod view;

pub use favorites::FavoriteSet;
pub use sort::SortConfig;
pub use view::{LoadState, MarketView};
