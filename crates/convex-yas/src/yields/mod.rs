//! Yield calculation methods.
//!
//! This module provides various yield calculation methodologies:
//!
//! - **Street Convention**: Standard market yield quote
//! - **True Yield**: Accounts for actual settlement conventions
//! - **Current Yield**: Annual coupon / clean price
//! - **Simple Yield**: Simplified yield calculation
//! - **Money Market Yields**: Discount yield, BEY for T-bills

mod current;
mod money_market;
mod simple;
mod street;
mod true_yield;

pub use current::*;
pub use money_market::*;
pub use simple::*;
pub use street::*;
pub use true_yield::*;
