pub mod filter;
pub mod place;
pub mod restaurant;
