#![cfg_attr(not(test), no_std)]

//! Umbrella crate re-exporting the Data Matrix encodation workspace.
//!
//! [`dm_encode`] is always available; [`dm_symbol_size`] is gated behind
//! the `symbol_size` feature (on by default) for callers who bring their
//! own [`dm_encode::SymbolSizeTable`] implementation and don't need the
//! standard ISO/IEC 16022 table.

pub use dm_encode;

#[cfg(feature = "symbol_size")]
pub use dm_symbol_size;
