//! The income, outcome and net total derived from all transactions.

mod balance_endpoint;
mod core;

pub use balance_endpoint::get_balance_endpoint;
pub use core::{Balance, get_balance};
pub(crate) use core::to_cents;
