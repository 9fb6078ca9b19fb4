//! ASCII encodation: digit pairing, byte passthrough, upper shift, and the
//! terminal padding every other scheme eventually falls back to.

use dm_symbol_size::SizeHint;

use crate::error::EncodeReason;
use crate::randomize::randomize_253;
use crate::stream::{EncodeStream, Scheme};

pub(crate) const UPPER_SHIFT: u8 = 235;
pub(crate) const PAD: u8 = 129;

const LATCH_C40: u8 = 230;
const LATCH_TEXT: u8 = 239;
const LATCH_X12: u8 = 238;
const LATCH_EDIFACT: u8 = 240;
const LATCH_BASE256: u8 = 231;

pub(crate) fn latch_codeword(target: Scheme) -> u8 {
    match target {
        Scheme::C40 => LATCH_C40,
        Scheme::Text => LATCH_TEXT,
        Scheme::X12 => LATCH_X12,
        Scheme::Edifact => LATCH_EDIFACT,
        Scheme::Base256 => LATCH_BASE256,
        Scheme::Ascii => unreachable!("ASCII has no latch codeword"),
    }
}

/// Consumes one (or, for a digit pair, two) input bytes and appends the
/// corresponding codeword(s). A no-op if input is already exhausted.
pub(crate) fn encode_next_chunk(stream: &mut EncodeStream, _hint: SizeHint) {
    let Some(&b0) = stream.input.get(stream.input_next) else { return };

    if b0.is_ascii_digit() {
        if let Some(&b1) = stream.input.get(stream.input_next + 1) {
            if b1.is_ascii_digit() {
                let d1 = (b0 - b'0') as u16;
                let d2 = (b1 - b'0') as u16;
                stream.push_output((10 * d1 + d2 + 130) as u8);
                stream.output_chain_value_count += 1;
                stream.input_next += 2;
                return;
            }
        }
    }

    if b0 < 128 {
        stream.push_output(b0 + 1);
        stream.output_chain_value_count += 1;
    } else {
        stream.push_output(UPPER_SHIFT);
        stream.push_output(b0 - 127);
        stream.output_chain_value_count += 2;
    }
    stream.input_next += 1;
}

/// Resolves the symbol size and pads the remainder once input is
/// exhausted. No-op while input remains.
pub(crate) fn complete_if_done(stream: &mut EncodeStream, hint: SizeHint) {
    if !stream.is_encoding() || stream.input_next != stream.input.len() {
        return;
    }
    pad_remaining_in_ascii(stream, hint);
}

/// Pads the output up to the resolved symbol's data-word capacity and
/// marks the stream `Complete`. The first pad byte is the literal 129;
/// every subsequent one is `randomize_253(129, pos)`.
pub(crate) fn pad_remaining_in_ascii(stream: &mut EncodeStream, hint: SizeHint) {
    let Some((idx, _)) = stream.remaining_capacity(hint) else {
        stream.fail_invalid(EncodeReason::NoSymbolFits);
        return;
    };
    let total = stream.table.data_words(idx);

    if stream.output.len() < total {
        stream.push_output(PAD);
    }
    while stream.output.len() < total {
        let pos = (stream.output.len() + 1) as u32;
        stream.push_output(randomize_253(PAD, pos));
    }
    stream.status = crate::error::EncodeStatus::Complete(idx);
}

/// Outcome of probing how the remaining input would encode in ASCII,
/// without mutating the real stream.
pub(crate) struct ScratchProbe {
    pub(crate) len: usize,
    pub(crate) clean: bool,
}

/// Re-encodes the remaining input as ASCII into a scratch stream bounded
/// to `capacity` codewords, never touching `stream` itself. Used by
/// EDIFACT and CTX to decide whether falling back to ASCII right now would
/// be cheap.
pub(crate) fn encode_tmp_remaining_in_ascii(stream: &EncodeStream, capacity: usize) -> ScratchProbe {
    let mut scratch = EncodeStream {
        input: stream.input,
        input_next: stream.input_next,
        output: alloc::vec::Vec::with_capacity(capacity),
        current_scheme: Scheme::Ascii,
        output_chain_word_count: 0,
        output_chain_value_count: 0,
        status: crate::error::EncodeStatus::Encoding,
        ctx_buffer: Default::default(),
        ctx_flush_log: alloc::vec::Vec::new(),
        table: stream.table,
    };

    loop {
        if scratch.input_next == scratch.input.len() {
            return ScratchProbe { len: scratch.output.len(), clean: true };
        }
        if scratch.output.len() >= capacity {
            return ScratchProbe { len: scratch.output.len(), clean: false };
        }
        encode_next_chunk(&mut scratch, SizeHint::Auto);
        if !scratch.is_encoding() || scratch.output.len() > capacity {
            return ScratchProbe { len: scratch.output.len(), clean: false };
        }
    }
}

/// Drives the real stream through the rest of its (already-ASCII) input to
/// completion: used once another scheme has handed off its tail.
pub(crate) fn finish_remaining_in_ascii(stream: &mut EncodeStream, hint: SizeHint) {
    loop {
        if !stream.is_encoding() {
            return;
        }
        if stream.input_next == stream.input.len() {
            complete_if_done(stream, hint);
            return;
        }
        encode_next_chunk(stream, hint);
    }
}
