//! Domain types shared by the simulator, the classifier and the service layer.
//!
//! This module provides:
//! - Lane state and fill quotes
//! - Trade attempts and executed transaction records
//! - Primitives: TimeMs, Slot, Signature

pub mod lane;
pub mod primitives;
pub mod quote;
pub mod transaction;

pub use lane::Lane;
pub use primitives::{Signature, Slot, TimeMs};
pub use quote::FillQuote;
pub use transaction::{TradeAttempt, Transaction, TxStatus, TxType, DEFAULT_PROGRAM_ID};
