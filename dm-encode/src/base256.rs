//! Base256 encodation: raw bytes obfuscated by `randomize_255`, prefixed
//! by an adaptive 1- or 2-byte length header.

use dm_symbol_size::SizeHint;

use crate::randomize::randomize_255;
use crate::stream::{EncodeStream, ExitMode, Scheme};

/// Grows or shrinks the chain's header as payload length crosses the
/// 249/250 boundary, then rewrites the header byte(s) in place.
///
/// The current header length is always `output_chain_word_count -
/// output_chain_value_count` (payload bytes are counted as values, header
/// bytes are not), so no separate field is needed to track it.
pub(crate) fn update_chain_header(stream: &mut EncodeStream) {
    let chain_start = stream.chain_start();
    let payload_len = stream.output_chain_value_count;
    let current_header_len = stream.output_chain_word_count - payload_len;
    let needed_header_len = if payload_len <= 249 { 1 } else { 2 };

    if needed_header_len > current_header_len {
        log::trace!("Base256 header growing to {needed_header_len} bytes at payload length {payload_len}");
        stream.insert_at(chain_start + 1, 0);
    }

    write_header(stream, chain_start, payload_len, false);
}

fn write_header(stream: &mut EncodeStream, chain_start: usize, payload_len: usize, exact_fit: bool) {
    if exact_fit {
        let pos = (chain_start + 1) as u32;
        stream.set_output(chain_start, randomize_255(0, pos));
        return;
    }

    if payload_len <= 249 {
        let pos = (chain_start + 1) as u32;
        stream.set_output(chain_start, randomize_255(payload_len as u8, pos));
    } else {
        let h0 = (payload_len / 250 + 249) as u8;
        let h1 = (payload_len % 250) as u8;
        stream.set_output(chain_start, randomize_255(h0, (chain_start + 1) as u32));
        stream.set_output(chain_start + 1, randomize_255(h1, (chain_start + 2) as u32));
    }
}

pub(crate) fn encode_next_chunk(stream: &mut EncodeStream, _hint: SizeHint) {
    let Some(&v) = stream.input.get(stream.input_next) else { return };
    let pos = (stream.output.len() + 1) as u32;
    stream.push_output(randomize_255(v, pos));
    stream.output_chain_value_count += 1;
    stream.input_next += 1;
    update_chain_header(stream);
}

pub(crate) fn complete_if_done(stream: &mut EncodeStream, hint: SizeHint) {
    if !stream.is_encoding() || stream.input_next != stream.input.len() {
        return;
    }

    let header_len = stream.output_chain_word_count - stream.output_chain_value_count;
    if header_len == 2 {
        // Probe whether shedding the second header byte (the "runs to the
        // end of the symbol" sentinel) lands exactly on a symbol boundary.
        let final_len_if_collapsed = stream.output.len() - 1;
        if let Some(idx) = stream.table.find_symbol_size(final_len_if_collapsed, hint) {
            if stream.table.data_words(idx) == final_len_if_collapsed {
                log::trace!("Base256 end-of-symbol: exact fit, collapsing to single zero header byte");
                let chain_start = stream.chain_start();
                stream.remove_at(chain_start + 1);
                write_header(stream, chain_start, 0, true);
                stream.status = crate::error::EncodeStatus::Complete(idx);
                return;
            }
        }
    }

    stream.change_scheme(Scheme::Ascii, ExitMode::Implicit);
    if !stream.is_encoding() {
        return;
    }
    crate::ascii::pad_remaining_in_ascii(stream, hint);
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::dispatch::encode_single_scheme;
    use crate::error::EncodeOutcome;
    use dm_symbol_size::Iso16022SymbolSizes;

    #[test]
    fn single_byte_header_encodes_length_directly() {
        let table = Iso16022SymbolSizes::new();
        let outcome = encode_single_scheme(&[0x41], Scheme::Base256, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => {
                assert_eq!(codewords[0], 231);
                assert_eq!(codewords[1], randomize_255(1, 2));
                assert_eq!(codewords[2], randomize_255(0x41, 3));
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn header_grows_to_two_bytes_past_249_payload_bytes() {
        let table = Iso16022SymbolSizes::new();
        let payload = alloc::vec![0x41u8; 250];
        let outcome = encode_single_scheme(&payload, Scheme::Base256, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, size_idx } => {
                assert!(table.data_words(size_idx) >= 252);
                // latch + 2 header bytes + 250 payload bytes, at minimum.
                assert!(codewords.len() >= 253);
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn small_exact_fit_payload_completes_without_extra_padding() {
        let table = Iso16022SymbolSizes::new();
        // Smallest symbol after the Base256 latch is 10x10 (3 data words):
        // one header byte plus two payload bytes fits exactly, so no pad
        // codewords are appended.
        let payload = [0x41u8, 0x42];
        let outcome = encode_single_scheme(&payload, Scheme::Base256, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, size_idx } => {
                assert_eq!(table.data_words(size_idx), codewords.len());
            }
            other => panic!("expected Ok, got {other:?}"),
        }
    }
}
