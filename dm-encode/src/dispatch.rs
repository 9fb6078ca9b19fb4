//! Ties the per-scheme encoders together into a single run against a
//! caller-chosen target scheme.

use dm_symbol_size::{SizeHint, SymbolSizeTable};

use crate::error::{EncodeOutcome, EncodeStatus};
use crate::stream::{EncodeStream, ExitMode, Scheme};

/// Encodes `input` entirely under `target`, auto-latching into it at the
/// start and unlatching (explicitly or implicitly, per scheme) once input
/// is exhausted or the resolved symbol fills up.
///
/// This is the "single scheme" encoder the higher-level scheme-selection
/// pass (which tries several schemes and keeps the shortest result) calls
/// once per candidate.
pub fn encode_single_scheme(input: &[u8], target: Scheme, hint: SizeHint, table: &dyn SymbolSizeTable) -> EncodeOutcome {
    let mut stream = EncodeStream::new(input, table);

    if target != Scheme::Ascii {
        stream.change_scheme(target, ExitMode::Implicit);
    }

    while stream.is_encoding() {
        step(&mut stream, hint);
    }

    match stream.status {
        EncodeStatus::Complete(size_idx) => EncodeOutcome::Ok { codewords: stream.output, size_idx },
        EncodeStatus::Invalid(reason) => EncodeOutcome::Invalid(reason),
        EncodeStatus::Fatal(reason) => EncodeOutcome::Fatal(reason),
        EncodeStatus::Encoding => unreachable!("loop only exits once status leaves Encoding"),
    }
}

/// Runs one (input-byte-consuming or completion-checking) step of whatever
/// scheme `stream.current_scheme` currently holds.
fn step(stream: &mut EncodeStream, hint: SizeHint) {
    let input_exhausted = stream.input_next == stream.input.len();

    match stream.current_scheme {
        Scheme::Ascii => {
            if input_exhausted {
                crate::ascii::complete_if_done(stream, hint);
            } else {
                crate::ascii::encode_next_chunk(stream, hint);
                crate::ascii::complete_if_done(stream, hint);
            }
        }
        Scheme::C40 | Scheme::Text | Scheme::X12 => {
            if input_exhausted {
                crate::ctx::complete_if_done(stream, hint);
            } else {
                crate::ctx::encode_next_chunk(stream, hint);
                crate::ctx::complete_if_done(stream, hint);
            }
        }
        Scheme::Edifact => {
            // Probe for a clean implicit exit to ASCII *before* consuming
            // the next byte, not just after: the only point a chain is
            // ever at a clean 4-value boundary with input still
            // remaining is right after latching in (value_count == 0),
            // and consuming a byte first would always dirty that
            // boundary, making the cheap-tail bailout unreachable for any
            // input short enough to never reach a later boundary.
            crate::edifact::complete_if_done(stream, hint);
            if stream.is_encoding() && stream.current_scheme == Scheme::Edifact && !input_exhausted {
                crate::edifact::encode_next_chunk(stream, hint);
                crate::edifact::complete_if_done(stream, hint);
            }
        }
        Scheme::Base256 => {
            if input_exhausted {
                crate::base256::complete_if_done(stream, hint);
            } else {
                crate::base256::encode_next_chunk(stream, hint);
                crate::base256::complete_if_done(stream, hint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use dm_symbol_size::Iso16022SymbolSizes;

    #[test]
    fn ascii_target_never_latches() {
        let table = Iso16022SymbolSizes::new();
        let outcome = encode_single_scheme(b"5", Scheme::Ascii, SizeHint::Auto, &table);
        match outcome {
            EncodeOutcome::Ok { codewords, .. } => assert_eq!(codewords[0], b'5' + 1),
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    #[test]
    fn no_symbol_fits_reports_invalid() {
        let table = Iso16022SymbolSizes::new();
        let huge = alloc::vec![b'A'; 10_000];
        let outcome = encode_single_scheme(&huge, Scheme::Ascii, SizeHint::Auto, &table);
        assert!(matches!(outcome, EncodeOutcome::Invalid(_)));
    }
}
