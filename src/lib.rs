pub mod actions;
pub mod catalog;
pub mod config;
pub mod countdown;
pub mod error;
pub mod model;
pub mod output;
pub mod session;
pub mod source;
pub mod store;
pub mod wishlist;

pub use error::DealHuntError;
