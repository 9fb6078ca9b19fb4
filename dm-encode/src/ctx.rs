//! C40, Text and X12 encodation. The three share a packing format (three
//! 0..39 values into two codewords) and differ only in how an input byte
//! maps onto those values.

use dm_symbol_size::SizeHint;

use crate::error::EncodeReason;
use crate::stream::{EncodeStream, ExitMode, Scheme};

pub(crate) const CTX_UNLATCH: u8 = 254;

const SHIFT1: u8 = 0;
const SHIFT2: u8 = 1;
const SHIFT3: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    C40,
    Text,
    X12,
}

impl Variant {
    fn from_scheme(scheme: Scheme) -> Self {
        match scheme {
            Scheme::C40 => Variant::C40,
            Scheme::Text => Variant::Text,
            Scheme::X12 => Variant::X12,
            other => unreachable!("{other:?} is not a CTX variant"),
        }
    }
}

fn x12_value(b: u8) -> Option<u8> {
    match b {
        13 => Some(0),
        b'*' => Some(1),
        b'>' => Some(2),
        b' ' => Some(3),
        b'0'..=b'9' => Some(b - 44),
        b'A'..=b'Z' => Some(b - 51),
        _ => None,
    }
}

/// Pushes the C40/Text value(s) for one basic (< 128) byte. Extended-ASCII
/// (>= 128) is handled one level up via the Shift2+30 escape.
fn push_basic(stream: &mut EncodeStream, variant: Variant, origin: usize, b: u8) {
    if b <= 31 {
        stream.ctx_buffer.push(SHIFT1, origin);
        stream.ctx_buffer.push(b, origin);
    } else if b == b' ' {
        stream.ctx_buffer.push(3, origin);
    } else if b <= 47 {
        stream.ctx_buffer.push(SHIFT2, origin);
        stream.ctx_buffer.push(b - 33, origin);
    } else if b.is_ascii_digit() {
        stream.ctx_buffer.push(b - 44, origin);
    } else if b <= 64 {
        stream.ctx_buffer.push(SHIFT2, origin);
        stream.ctx_buffer.push(b - 43, origin);
    } else {
        match variant {
            Variant::C40 => {
                if b.is_ascii_uppercase() {
                    stream.ctx_buffer.push(b - 51, origin);
                } else if b <= 95 {
                    stream.ctx_buffer.push(SHIFT2, origin);
                    stream.ctx_buffer.push(b - 69, origin);
                } else {
                    stream.ctx_buffer.push(SHIFT3, origin);
                    stream.ctx_buffer.push(b - 96, origin);
                }
            }
            Variant::Text => {
                if b.is_ascii_uppercase() {
                    stream.ctx_buffer.push(SHIFT3, origin);
                    stream.ctx_buffer.push(b - 64, origin);
                } else if b <= 95 {
                    stream.ctx_buffer.push(SHIFT2, origin);
                    stream.ctx_buffer.push(b - 69, origin);
                } else if b == b'`' {
                    stream.ctx_buffer.push(SHIFT3, origin);
                    stream.ctx_buffer.push(0, origin);
                } else if b.is_ascii_lowercase() {
                    stream.ctx_buffer.push(b - 83, origin);
                } else {
                    stream.ctx_buffer.push(SHIFT3, origin);
                    stream.ctx_buffer.push(b - 96, origin);
                }
            }
            Variant::X12 => unreachable!("X12 bytes never reach push_basic"),
        }
    }
}

fn push_values_for_byte(stream: &mut EncodeStream, variant: Variant, origin: usize, b: u8) -> Result<(), EncodeReason> {
    match variant {
        Variant::X12 => {
            let v = x12_value(b).ok_or(EncodeReason::X12ByteNotRepresentable)?;
            stream.ctx_buffer.push(v, origin);
        }
        Variant::C40 | Variant::Text => {
            if b >= 128 {
                stream.ctx_buffer.push(SHIFT2, origin);
                stream.ctx_buffer.push(30, origin);
                push_basic(stream, variant, origin, b - 128);
            } else {
                push_basic(stream, variant, origin, b);
            }
        }
    }
    Ok(())
}

fn flush_triplets(stream: &mut EncodeStream) {
    while stream.ctx_buffer.len() >= 3 {
        let ([v0, v1, v2], origins) = stream.ctx_buffer.take_triplet();
        let p = 1600u16 * v0 as u16 + 40 * v1 as u16 + v2 as u16 + 1;
        stream.push_output((p >> 8) as u8);
        stream.push_output((p & 0xFF) as u8);
        stream.output_chain_value_count += 3;
        stream.ctx_flush_log.push((origins[0], origins[2]));
    }
}

pub(crate) fn encode_next_chunk(stream: &mut EncodeStream, _hint: SizeHint) {
    let Some(&b) = stream.input.get(stream.input_next) else { return };
    let origin = stream.input_next;
    let variant = Variant::from_scheme(stream.current_scheme);

    if let Err(reason) = push_values_for_byte(stream, variant, origin, b) {
        stream.fail_invalid(reason);
        return;
    }
    stream.input_next += 1;
    flush_triplets(stream);
}

pub(crate) fn complete_if_done(stream: &mut EncodeStream, hint: SizeHint) {
    if !stream.is_encoding() || stream.input_next != stream.input.len() {
        return;
    }
    if stream.ctx_buffer.len() == 0 {
        complete_if_done_empty(stream, hint);
    } else {
        complete_if_done_partial(stream, hint);
    }
}

fn complete_if_done_empty(stream: &mut EncodeStream, hint: SizeHint) {
    let Some((idx, remaining)) = stream.remaining_capacity(hint) else {
        stream.fail_invalid(EncodeReason::NoSymbolFits);
        return;
    };
    if remaining == 0 {
        log::trace!("CTX end-of-symbol: buffer empty, symbol exactly full, no unlatch");
        stream.status = crate::error::EncodeStatus::Complete(idx);
    } else {
        log::trace!("CTX end-of-symbol: buffer empty, capacity remains, explicit unlatch to ASCII");
        stream.change_scheme(Scheme::Ascii, ExitMode::Explicit);
        if !stream.is_encoding() {
            return;
        }
        crate::ascii::pad_remaining_in_ascii(stream, hint);
    }
}

/// Reconstructs the end-of-symbol handling for a CTX chain with one or two
/// values still sitting unflushed (ISO/IEC 16022 §5.2.5.2). The historical
/// C source left this path commented out; the rule implemented here is:
/// pad a two-value C40/Text tail with a trailing Shift1 when exactly two
/// codewords of capacity remain, otherwise roll back to the oldest
/// unflushed input byte and finish the tail in ASCII (implicitly, when the
/// tail is a single clean ASCII codeword with exactly one codeword of room
/// left; explicitly otherwise).
///
/// X12 has no shift codes, so value `0` is a literal CR rather than a
/// discardable filler — the Shift1-pad shortcut never applies to it, and
/// it always takes the rollback path regardless of `remaining`.
fn complete_if_done_partial(stream: &mut EncodeStream, hint: SizeHint) {
    let leftover = stream.ctx_buffer.len();
    let variant = Variant::from_scheme(stream.current_scheme);
    let Some((idx, remaining)) = stream.remaining_capacity(hint) else {
        stream.fail_invalid(EncodeReason::NoSymbolFits);
        return;
    };

    if variant != Variant::X12 && remaining == 2 && leftover == 2 {
        log::trace!("CTX end-of-symbol: two leftover values, two codewords left, pad with Shift1");
        stream.ctx_buffer.push_padding(SHIFT1);
        flush_triplets(stream);
        stream.status = crate::error::EncodeStatus::Complete(idx);
        return;
    }

    let mut rollback_to = stream.ctx_buffer.first_origin().expect("partial completion requires a nonempty buffer");
    stream.ctx_buffer.clear();

    // A flushed triplet can straddle the byte we're rolling back to (e.g. it
    // carries a shift code whose operand is the value we're about to
    // discard). Undo any such triplet too, walking further back as needed,
    // rather than leave a dangling shift with no operand in the output.
    while let Some(&(first_origin, last_origin)) = stream.ctx_flush_log.last() {
        if last_origin < rollback_to {
            break;
        }
        stream.ctx_flush_log.pop();
        let truncated_len = stream.output.len() - 2;
        stream.output.truncate(truncated_len);
        stream.output_chain_word_count -= 2;
        stream.output_chain_value_count -= 3;
        rollback_to = rollback_to.min(first_origin);
    }
    stream.input_next = rollback_to;

    let Some((_, remaining)) = stream.remaining_capacity(hint) else {
        stream.fail_invalid(EncodeReason::NoSymbolFits);
        return;
    };

    let probe = crate::ascii::encode_tmp_remaining_in_ascii(stream, remaining.max(1));
    let exit = if remaining == 1 && probe.clean && probe.len == 1 {
        ExitMode::Implicit
    } else {
        ExitMode::Explicit
    };
    log::trace!("CTX end-of-symbol: rolling back to input byte {rollback_to}, finishing via {exit:?}");

    stream.change_scheme(Scheme::Ascii, exit);
    if !stream.is_encoding() {
        return;
    }
    crate::ascii::finish_remaining_in_ascii(stream, hint);
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::dispatch::encode_single_scheme;
    use crate::error::EncodeOutcome;
    use dm_symbol_size::Iso16022SymbolSizes;

    #[test]
    fn aim_packs_into_one_triplet() {
        let table = Iso16022SymbolSizes::new();
        let outcome = encode_single_scheme(b"AIM", Scheme::C40, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => {
                // latch, then the (91, 11) pair for values (14, 22, 26).
                assert_eq!(&codewords[..3], &[230, 91, 11]);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn x12_rejects_extended_ascii() {
        let table = Iso16022SymbolSizes::new();
        let outcome = encode_single_scheme(&[0xE9], Scheme::X12, SizeHint::Auto, &table);
        assert!(matches!(outcome, EncodeOutcome::Invalid(EncodeReason::X12ByteNotRepresentable)));
    }

    #[test]
    fn two_leftover_values_pad_with_shift1_when_exactly_two_codewords_remain() {
        let table = Iso16022SymbolSizes::new();
        // "AI" packs two C40 values (14, 22) with nothing to flush. The
        // smallest symbol (10x10, 3 data words) has exactly two codewords
        // left after the latch, so the tail is padded with a Shift1 rather
        // than falling back to ASCII.
        let outcome = encode_single_scheme(b"AI", Scheme::C40, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, size_idx } => {
                assert_eq!(codewords, alloc::vec![230, 90, 241]);
                assert_eq!(table.data_words(size_idx), 3);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn straddled_shift_triplet_is_undone_on_rollback() {
        let table = Iso16022SymbolSizes::new();
        // "00" packs two clean single-value C40 values; "!" pushes a
        // Shift2 and its 0 operand, which only completes a triplet
        // together with both "0"s: (4, 4, Shift2). The operand (0) is left
        // buffered alone and must be rolled back — which means the
        // triplet carrying the now-orphaned Shift2 has to be undone too,
        // not just the dangling operand.
        let outcome = encode_single_scheme(b"00!", Scheme::C40, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => {
                // No trace of the (4, 4, Shift2) triplet's codewords (25,
                // 162) survives: everything re-encodes in ASCII instead.
                assert_eq!(codewords, alloc::vec![230, 254, 130, 34, 129]);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn x12_never_pads_leftover_values_with_shift1() {
        let table = Iso16022SymbolSizes::new();
        // "AB" packs two clean X12 values (14, 15) with two codewords of
        // capacity left in a 10x10 symbol — the same shape that triggers
        // the Shift1-pad shortcut for C40/Text. X12 has no shift codes, so
        // a padding value of 0 would decode as a literal CR; it must roll
        // back to ASCII instead.
        let outcome = encode_single_scheme(b"AB", Scheme::X12, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => {
                assert_eq!(codewords, alloc::vec![238, 254, 66, 67, 129]);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn lone_leftover_value_rolls_back_and_finishes_in_ascii() {
        let table = Iso16022SymbolSizes::new();
        // "AIX" packs (14, 22) into a flushed triplet only once a third
        // value arrives; feed one value that never completes a triplet on
        // its own by using a target symbol wide enough that "A" alone (one
        // leftover C40 value) must finish via the rollback path.
        let outcome = encode_single_scheme(b"A", Scheme::C40, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, size_idx } => {
                assert_eq!(codewords[0], 230);
                assert_eq!(table.data_words(size_idx), codewords.len());
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }
}
