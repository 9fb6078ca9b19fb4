//! EDIFACT encodation: four 6-bit values packed into three bytes.

use dm_symbol_size::SizeHint;

use crate::error::EncodeReason;
use crate::stream::{EncodeStream, ExitMode, Scheme};

pub(crate) const EDIFACT_UNLATCH: u8 = 31;

/// Packs one EDIFACT value (already masked to 6 bits by the caller, or a
/// raw byte masked here) into the chain, following the four-phase
/// rotation described in the encodation spec. Shared by the normal
/// per-byte encoder and the unlatch codeword, which is packed exactly
/// like any other value.
pub(crate) fn push_value(stream: &mut EncodeStream, b: u8) {
    let ev: u8 = (b & 0x3F) << 2;
    let phase = stream.output_chain_value_count % 4;

    match phase {
        0 => stream.push_output(ev),
        1 => {
            let last = stream.output.last_mut().expect("EDIFACT phase 1 requires a preceding byte");
            *last |= ev >> 6;
            stream.push_output(ev << 2);
        }
        2 => {
            let last = stream.output.last_mut().expect("EDIFACT phase 2 requires a preceding byte");
            *last |= ev >> 4;
            stream.push_output(ev << 4);
        }
        3 => {
            let last = stream.output.last_mut().expect("EDIFACT phase 3 requires a preceding byte");
            *last |= ev >> 2;
        }
        _ => unreachable!(),
    }

    stream.output_chain_value_count += 1;
}

pub(crate) fn encode_next_chunk(stream: &mut EncodeStream, _hint: SizeHint) {
    let Some(&b) = stream.input.get(stream.input_next) else { return };
    if !(31..=94).contains(&b) {
        stream.fail_invalid(EncodeReason::EdifactByteOutOfRange);
        return;
    }
    push_value(stream, b);
    stream.input_next += 1;
}

pub(crate) fn complete_if_done(stream: &mut EncodeStream, hint: SizeHint) {
    if !stream.is_encoding() {
        return;
    }

    let no_input_left = stream.input_next == stream.input.len();
    let boundary_clean = stream.output_chain_value_count % 4 == 0;

    let Some((idx, remaining)) = stream.remaining_capacity(hint) else {
        stream.fail_invalid(EncodeReason::NoSymbolFits);
        return;
    };

    if no_input_left {
        if remaining == 0 && boundary_clean {
            log::trace!("EDIFACT end-of-symbol: input exhausted, symbol exactly full");
            stream.status = crate::error::EncodeStatus::Complete(idx);
        } else {
            log::trace!("EDIFACT end-of-symbol: input exhausted, explicit unlatch then pad");
            stream.change_scheme(Scheme::Ascii, ExitMode::Explicit);
            if !stream.is_encoding() {
                return;
            }
            crate::ascii::pad_remaining_in_ascii(stream, hint);
        }
        return;
    }

    let probe = crate::ascii::encode_tmp_remaining_in_ascii(stream, 3);
    if probe.clean && (1..=2).contains(&probe.len) && probe.len <= remaining && boundary_clean {
        log::trace!("EDIFACT end-of-symbol: remaining input fits cheaply in ASCII, implicit unlatch");
        stream.change_scheme(Scheme::Ascii, ExitMode::Implicit);
        if !stream.is_encoding() {
            return;
        }
        crate::ascii::finish_remaining_in_ascii(stream, hint);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::dispatch::encode_single_scheme;
    use crate::error::EncodeOutcome;
    use dm_symbol_size::Iso16022SymbolSizes;

    #[test]
    fn four_values_pack_into_three_bytes() {
        let table = Iso16022SymbolSizes::new();
        // Four letters: ASCII can't pair them the way digits pair, so the
        // clean-boundary probe (bounded to 3 codewords) never reports a
        // short-enough tail and the chain actually packs into EDIFACT
        // instead of bailing out immediately. Digits would instead take
        // the cheap pre-consume ASCII path (digit pairing beats EDIFACT's
        // 4-values-per-3-bytes ratio), which is exercised separately.
        let outcome = encode_single_scheme(b"ABCD", Scheme::Edifact, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => {
                // latch + 3 packed bytes, no unlatch needed if it fits exactly.
                assert_eq!(codewords[0], 240);
                assert!(codewords.len() >= 4);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn short_digit_run_bails_to_ascii_before_ever_latching_values() {
        let table = Iso16022SymbolSizes::new();
        // "1234" packs into just two ASCII digit-pair codewords, within
        // the clean-boundary probe's bound — so the chain bails to ASCII
        // right after latching, before packing a single EDIFACT value.
        let outcome = encode_single_scheme(b"1234", Scheme::Edifact, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => {
                assert_eq!(codewords, alloc::vec![240, 142, 164]);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn single_byte_input_takes_the_implicit_clean_boundary_path() {
        let table = Iso16022SymbolSizes::new();
        // A single byte is a clean 4-value boundary (value_count == 0)
        // the moment the chain latches in, before anything is consumed.
        // The dispatcher must probe for the implicit bailout to ASCII at
        // that point, not only after committing a value, or this path is
        // never reachable for short inputs: the latch codeword (240) is
        // followed directly by ASCII-encoded "A" and a pad, with no
        // EDIFACT value ever packed and no unlatch codeword spent.
        let outcome = encode_single_scheme(b"A", Scheme::Edifact, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => {
                assert_eq!(codewords, alloc::vec![240, 66, 129]);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn byte_out_of_range_is_invalid() {
        let table = Iso16022SymbolSizes::new();
        let outcome = encode_single_scheme(&[200], Scheme::Edifact, SizeHint::Auto, &table);
        assert!(matches!(outcome, EncodeOutcome::Invalid(EncodeReason::EdifactByteOutOfRange)));
    }
}
