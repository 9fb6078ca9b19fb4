#![cfg_attr(not(test), no_std)]

//! Data Matrix (ISO/IEC 16022) encodation core.
//!
//! This crate turns an input byte slice into the codeword sequence for one
//! chosen encodation scheme (ASCII, C40, Text, X12, EDIFACT or Base256),
//! including scheme latching/unlatching and end-of-symbol padding. It has
//! no knowledge of error-correction, module placement, or rendering — the
//! symbol-size attribute lookup it needs is injected via
//! [`SymbolSizeTable`], so callers can supply the standard ISO/IEC 16022
//! table ([`Iso16022SymbolSizes`]) or a test double.
//!
//! Choosing the best scheme for a given input (the "try everything, keep
//! the shortest" pass ISO/IEC 16022 Annex P describes) is layered on top
//! of [`encode`] by the caller; this crate only runs a single scheme to
//! completion.

extern crate alloc;

mod ascii;
mod base256;
mod ctx;
mod dispatch;
mod edifact;
mod error;
mod randomize;
mod stream;

pub use dm_symbol_size::{SizeHint, SymbolSizeIdx, SymbolSizeTable};

pub use error::{EncodeOutcome, EncodeReason, EncodeStatus};
pub use stream::Scheme;

/// Encodes `input` under `target`, auto-latching in and unlatching out as
/// the scheme requires, against the symbol sizes `table` exposes.
pub fn encode(input: &[u8], target: Scheme, hint: SizeHint, table: &dyn SymbolSizeTable) -> EncodeOutcome {
    dispatch::encode_single_scheme(input, target, hint, table)
}
