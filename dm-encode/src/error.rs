//! Status and diagnostic types threaded through an encode.

use dm_symbol_size::SymbolSizeIdx;

/// Diagnostic tag carried by a terminal `Invalid` or `Fatal` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeReason {
    /// No symbol under the requested hint can hold this many data words.
    NoSymbolFits,
    /// An explicit unlatch was attempted with the C40/Text/X12 triplet
    /// buffer not empty.
    CtxUnlatchOffBoundary,
    /// An EDIFACT input byte fell outside the representable range [31, 94].
    EdifactByteOutOfRange,
    /// A byte is not representable in the X12 character set (this
    /// includes every byte above 127 — X12 has no extended-ASCII escape).
    X12ByteNotRepresentable,
    /// `encode_single_scheme` reached `Complete` with unconsumed input.
    IncompleteInput,
}

/// In-progress or terminal state of an [`crate::stream::EncodeStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStatus {
    Encoding,
    Complete(SymbolSizeIdx),
    Invalid(EncodeReason),
    Fatal(EncodeReason),
}

impl EncodeStatus {
    pub(crate) fn is_encoding(&self) -> bool {
        matches!(self, EncodeStatus::Encoding)
    }
}

/// Result of a full `encode_single_scheme` run.
#[derive(Debug, Clone)]
pub enum EncodeOutcome {
    Ok { codewords: alloc::vec::Vec<u8>, size_idx: SymbolSizeIdx },
    Invalid(EncodeReason),
    Fatal(EncodeReason),
}
