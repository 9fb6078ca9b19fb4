//! The mutable record threaded through a single encode.

use alloc::vec::Vec;
use core::fmt;

use dm_symbol_size::{SizeHint, SymbolSizeTable};

use crate::error::{EncodeReason, EncodeStatus};

/// The encodation scheme Data Matrix is in at a given point in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Ascii,
    C40,
    Text,
    X12,
    Edifact,
    Base256,
}

/// Whether leaving the current scheme emits an explicit unlatch codeword
/// or relies on the decoder inferring the boundary from symbol capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitMode {
    Explicit,
    Implicit,
}

/// Up to four buffered C40/Text/X12 values awaiting a triplet flush (four,
/// not three: an extended-ASCII escape pushes Shift2, 30, and then the two
/// values for the recursed byte before the next flush runs).
///
/// Each buffered value remembers which input byte produced it, so that
/// ending mid-triplet can roll `input_next` back to exactly the right
/// place without needing to unwind already-flushed output codewords.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct CtxBuffer {
    values: [u8; 4],
    origins: [usize; 4],
    len: usize,
}

impl CtxBuffer {
    pub(crate) fn push(&mut self, v: u8, origin: usize) {
        self.values[self.len] = v;
        self.origins[self.len] = origin;
        self.len += 1;
    }

    /// Pushes a value with no input byte behind it (the Shift1 padding used
    /// to complete a final two-value triplet).
    pub(crate) fn push_padding(&mut self, v: u8) {
        self.values[self.len] = v;
        self.origins[self.len] = usize::MAX;
        self.len += 1;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Pops the oldest three buffered values and the input-byte origins
    /// that produced them.
    pub(crate) fn take_triplet(&mut self) -> ([u8; 3], [usize; 3]) {
        debug_assert!(self.len >= 3);
        let triplet = [self.values[0], self.values[1], self.values[2]];
        let origins = [self.origins[0], self.origins[1], self.origins[2]];
        self.values.copy_within(3..self.len, 0);
        self.origins.copy_within(3..self.len, 0);
        self.len -= 3;
        (triplet, origins)
    }

    /// Input-byte origin of the oldest buffered value, i.e. the earliest
    /// input position that has not yet been committed to output.
    pub(crate) fn first_origin(&self) -> Option<usize> {
        (self.len > 0).then(|| self.origins[0])
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }
}

/// The mutable state threaded through a single call to
/// [`crate::dispatch::encode_single_scheme`]. See the crate-level docs for
/// the full state machine description.
///
/// Invariants maintained across every mutating call while `status ==
/// Encoding`:
/// 1. `output_chain_word_count` and `output_chain_value_count` reset to
///    zero on every `change_scheme`. For Base256 the difference between
///    them is exactly the current header length (1 or 2); every other
///    scheme's own bookkeeping keeps them in step at its natural
///    granularity (see each scheme module for the precise rule).
/// 2. `input_next` only moves forward, except for the CTX end-of-symbol
///    rollback, which moves it back to the oldest value still sitting
///    unflushed in `ctx_buffer`.
/// 3. Once `status` leaves `Encoding`, nothing mutates the stream again.
pub struct EncodeStream<'a> {
    pub(crate) input: &'a [u8],
    pub(crate) input_next: usize,
    pub(crate) output: Vec<u8>,
    pub(crate) current_scheme: Scheme,
    pub(crate) output_chain_word_count: usize,
    pub(crate) output_chain_value_count: usize,
    pub(crate) status: EncodeStatus,
    pub(crate) ctx_buffer: CtxBuffer,
    /// `(first_origin, last_origin)` of every CTX triplet flushed to
    /// `output` so far in the current chain, oldest first. Lets
    /// end-of-symbol rollback detect and undo a flushed triplet that
    /// straddles the byte it's rolling back to, rather than stranding a
    /// shift code whose operand got discarded. See `ctx::complete_if_done_partial`.
    pub(crate) ctx_flush_log: Vec<(usize, usize)>,
    pub(crate) table: &'a dyn SymbolSizeTable,
}

impl fmt::Debug for EncodeStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodeStream")
            .field("input_next", &self.input_next)
            .field("output", &self.output)
            .field("current_scheme", &self.current_scheme)
            .field("output_chain_word_count", &self.output_chain_word_count)
            .field("output_chain_value_count", &self.output_chain_value_count)
            .field("status", &self.status)
            .field("ctx_flush_log", &self.ctx_flush_log)
            .field("table", &"<dyn SymbolSizeTable>")
            .finish()
    }
}

impl<'a> EncodeStream<'a> {
    pub(crate) fn new(input: &'a [u8], table: &'a dyn SymbolSizeTable) -> Self {
        Self {
            input,
            input_next: 0,
            output: Vec::new(),
            current_scheme: Scheme::Ascii,
            output_chain_word_count: 0,
            output_chain_value_count: 0,
            status: EncodeStatus::Encoding,
            ctx_buffer: CtxBuffer::default(),
            ctx_flush_log: Vec::new(),
            table,
        }
    }

    pub(crate) fn is_encoding(&self) -> bool {
        self.status.is_encoding()
    }

    pub(crate) fn fail_invalid(&mut self, reason: EncodeReason) {
        self.status = EncodeStatus::Invalid(reason);
    }

    pub(crate) fn push_output(&mut self, byte: u8) {
        self.output.push(byte);
        self.output_chain_word_count += 1;
    }

    pub(crate) fn set_output(&mut self, idx: usize, byte: u8) {
        self.output[idx] = byte;
    }

    /// Inserts one byte at absolute output position `idx`, shifting
    /// everything from `idx` onward right by one. Only used for Base256
    /// header growth.
    pub(crate) fn insert_at(&mut self, idx: usize, byte: u8) {
        self.output.insert(idx, byte);
        self.output_chain_word_count += 1;
    }

    /// Removes the byte at absolute output position `idx`, shifting
    /// everything after it left by one. Only used for Base256 header
    /// shrink (the exact-fit collapse).
    pub(crate) fn remove_at(&mut self, idx: usize) -> u8 {
        let byte = self.output.remove(idx);
        self.output_chain_word_count -= 1;
        byte
    }

    /// Absolute output index where the current scheme's chain began.
    pub(crate) fn chain_start(&self) -> usize {
        self.output.len() - self.output_chain_word_count
    }

    /// Looks up the smallest symbol able to hold the current output length
    /// and returns how many data words remain in it, or `None` if no
    /// symbol under `hint` fits.
    pub(crate) fn remaining_capacity(&self, hint: SizeHint) -> Option<(dm_symbol_size::SymbolSizeIdx, usize)> {
        let idx = self.table.find_symbol_size(self.output.len(), hint)?;
        let remaining = self.table.data_words(idx) - self.output.len();
        Some((idx, remaining))
    }

    pub(crate) fn change_scheme(&mut self, target: Scheme, exit: ExitMode) {
        if matches!(exit, ExitMode::Explicit) {
            match self.current_scheme {
                Scheme::C40 | Scheme::Text | Scheme::X12 => {
                    if self.output_chain_value_count % 3 != 0 {
                        self.fail_invalid(EncodeReason::CtxUnlatchOffBoundary);
                        return;
                    }
                    self.push_output(crate::ctx::CTX_UNLATCH);
                }
                Scheme::Edifact => {
                    crate::edifact::push_value(self, crate::edifact::EDIFACT_UNLATCH);
                }
                Scheme::Ascii | Scheme::Base256 => {}
            }
            if !self.is_encoding() {
                return;
            }
        }

        log::trace!("scheme transition: {:?} -> {:?} via {:?}", self.current_scheme, target, exit);

        self.current_scheme = Scheme::Ascii;
        if target != Scheme::Ascii {
            self.push_output(crate::ascii::latch_codeword(target));
        }
        self.current_scheme = target;
        self.output_chain_word_count = 0;
        self.output_chain_value_count = 0;

        if target == Scheme::Base256 {
            self.push_output(0);
            crate::base256::update_chain_header(self);
        }
    }
}
