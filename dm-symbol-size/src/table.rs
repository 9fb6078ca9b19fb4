//! ISO/IEC 16022 symbol-size attribute lookup.
//!
//! This crate stands in for the "FindSymbolSize / dmtxGetSymbolAttribute"
//! collaborator that the encodation core treats as an external, pure
//! dependency: given a count of data codewords and a size hint, it finds
//! the smallest symbol able to hold them. It has no knowledge of
//! encodation schemes, randomization, or the output buffer.

#![cfg_attr(not(test), no_std)]

/// Opaque handle into the symbol-size table.
///
/// Callers never construct this directly; it is only produced by
/// [`SymbolSizeTable::find_symbol_size`] and consumed by
/// [`SymbolSizeTable::data_words`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolSizeIdx(usize);

/// Requested symbol size: either let the table pick the smallest size that
/// fits, or pin to one specific size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeHint {
    Auto,
    Specific(SymbolSizeIdx),
}

/// The external symbol-size collaborator. Implementations must be pure and
/// referentially transparent: same inputs, same outputs, no side effects.
pub trait SymbolSizeTable {
    /// Returns the smallest symbol able to hold `data_word_count` data
    /// codewords, honoring `hint`. `None` means no symbol under the hint
    /// can hold that many words.
    fn find_symbol_size(&self, data_word_count: usize, hint: SizeHint) -> Option<SymbolSizeIdx>;

    /// Total data codeword capacity of `size_idx`.
    fn data_words(&self, size_idx: SymbolSizeIdx) -> usize;
}

/// One row of the ISO/IEC 16022 Table 7 symbol attributes, restricted to
/// the fields this crate's callers need: the shape and the data codeword
/// capacity.
#[derive(Debug, Clone, Copy)]
struct Attribute {
    rows: u16,
    cols: u16,
    data_words: u16,
}

/// Symbol attributes in increasing order of data codeword capacity. Square
/// sizes first (10x10 .. 144x144), then the six rectangular sizes.
///
/// Source: ISO/IEC 16022:2006, Table 7 ("Data Matrix ECC 200 symbol
/// attributes"), data codeword column.
const ATTRIBUTES: &[Attribute] = &[
    Attribute { rows: 10, cols: 10, data_words: 3 },
    Attribute { rows: 12, cols: 12, data_words: 5 },
    Attribute { rows: 8, cols: 18, data_words: 5 },
    Attribute { rows: 14, cols: 14, data_words: 8 },
    Attribute { rows: 8, cols: 32, data_words: 10 },
    Attribute { rows: 16, cols: 16, data_words: 12 },
    Attribute { rows: 12, cols: 26, data_words: 16 },
    Attribute { rows: 18, cols: 18, data_words: 18 },
    Attribute { rows: 12, cols: 36, data_words: 22 },
    Attribute { rows: 20, cols: 20, data_words: 22 },
    Attribute { rows: 22, cols: 22, data_words: 30 },
    Attribute { rows: 16, cols: 36, data_words: 32 },
    Attribute { rows: 24, cols: 24, data_words: 36 },
    Attribute { rows: 26, cols: 26, data_words: 44 },
    Attribute { rows: 16, cols: 48, data_words: 49 },
    Attribute { rows: 32, cols: 32, data_words: 62 },
    Attribute { rows: 36, cols: 36, data_words: 86 },
    Attribute { rows: 40, cols: 40, data_words: 114 },
    Attribute { rows: 44, cols: 44, data_words: 144 },
    Attribute { rows: 48, cols: 48, data_words: 174 },
    Attribute { rows: 52, cols: 52, data_words: 204 },
    Attribute { rows: 64, cols: 64, data_words: 280 },
    Attribute { rows: 72, cols: 72, data_words: 368 },
    Attribute { rows: 80, cols: 80, data_words: 456 },
    Attribute { rows: 88, cols: 88, data_words: 576 },
    Attribute { rows: 96, cols: 96, data_words: 696 },
    Attribute { rows: 104, cols: 104, data_words: 816 },
    Attribute { rows: 120, cols: 120, data_words: 1050 },
    Attribute { rows: 132, cols: 132, data_words: 1304 },
    Attribute { rows: 144, cols: 144, data_words: 1558 },
];

/// The standard ISO/IEC 16022 ECC200 symbol-size table.
#[derive(Debug, Default, Clone, Copy)]
pub struct Iso16022SymbolSizes;

impl Iso16022SymbolSizes {
    pub fn new() -> Self {
        Self
    }

    /// Row/column shape of `size_idx`, e.g. `(26, 26)` or `(16, 48)`.
    pub fn shape(&self, size_idx: SymbolSizeIdx) -> (u16, u16) {
        let attr = ATTRIBUTES[size_idx.0];
        (attr.rows, attr.cols)
    }
}

impl SymbolSizeTable for Iso16022SymbolSizes {
    fn find_symbol_size(&self, data_word_count: usize, hint: SizeHint) -> Option<SymbolSizeIdx> {
        match hint {
            SizeHint::Specific(idx) => {
                let attr = ATTRIBUTES.get(idx.0)?;
                if data_word_count <= attr.data_words as usize { Some(idx) } else { None }
            }
            SizeHint::Auto => ATTRIBUTES
                .iter()
                .position(|attr| data_word_count <= attr.data_words as usize)
                .map(SymbolSizeIdx),
        }
    }

    fn data_words(&self, size_idx: SymbolSizeIdx) -> usize {
        ATTRIBUTES[size_idx.0].data_words as usize
    }
}
