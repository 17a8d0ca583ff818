//! Business rules on top of the table clients.

pub mod balances;
pub mod credits;
pub mod limits;
pub mod payments;
pub mod sales;
