//! # Alphabet builder and `DecodeTable`.
//!
//! Assigns initial symbol IDs to the distinct characters of the training
//! corpus (in order of first appearance), reserves an `unknown` symbol, and
//! produces the initial [`DecodeTable`] the trainer extends with each merge.

use crate::types::{CommonHashMap, SymbolId};
use compact_str::CompactString;

/// A mapping `SymbolId -> string`.
///
/// For base characters the value is the single character; for `unknown`, a
/// placeholder character; for a derived symbol, the concatenation of its
/// parents' decoded forms at merge time. Distinct IDs always map to distinct
/// strings.
#[derive(Debug, Clone, Default)]
pub struct DecodeTable {
    entries: CommonHashMap<SymbolId, CompactString>,
}

impl DecodeTable {
    /// The decoded string for a symbol, if known.
    pub fn get(
        &self,
        id: SymbolId,
    ) -> Option<&str> {
        self.entries.get(&id).map(|s| s.as_str())
    }

    /// Insert (or overwrite) the decoded string for a symbol.
    pub fn insert(
        &mut self,
        id: SymbolId,
        value: CompactString,
    ) {
        self.entries.insert(id, value);
    }

    /// The number of symbols with a decoded form.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(symbol, decoded string)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.entries.iter().map(|(&id, s)| (id, s.as_str()))
    }

    /// Whether every value in the table is pairwise distinct.
    ///
    /// This is the decode-uniqueness invariant; exposed for tests
    /// rather than enforced on every `insert`, since merge-time
    /// concatenation of distinct parents is true by construction (see
    /// [`Alphabet::build`] and `Trainer::train`).
    pub fn all_distinct(&self) -> bool {
        let mut seen = crate::types::CommonHashSet::default();
        self.entries.values().all(|v| seen.insert(v.as_str()))
    }
}

/// The alphabet learned from a training corpus: a `char -> SymbolId` map,
/// the reserved `unknown` symbol, and the initial [`DecodeTable`].
#[derive(Debug, Clone)]
pub struct Alphabet {
    char_to_id: CommonHashMap<char, SymbolId>,
    unknown_id: SymbolId,
    decode_table: DecodeTable,
}

impl Alphabet {
    /// Build an alphabet from the distinct characters of a training corpus,
    /// in order of first appearance, followed by a reserved `unknown`
    /// symbol decoding to `placeholder`.
    pub fn build<S: AsRef<str>>(
        corpus: &[S],
        placeholder: char,
    ) -> Self {
        let mut char_to_id = CommonHashMap::default();
        let mut decode_table = DecodeTable::default();
        let mut next_id: SymbolId = 0;

        for s in corpus {
            for ch in s.as_ref().chars() {
                char_to_id.entry(ch).or_insert_with(|| {
                    let id = next_id;
                    decode_table.insert(id, CompactString::from(ch.to_string()));
                    next_id += 1;
                    id
                });
            }
        }

        let unknown_id = next_id;
        decode_table.insert(unknown_id, CompactString::from(placeholder.to_string()));

        Self {
            char_to_id,
            unknown_id,
            decode_table,
        }
    }

    /// The reserved `unknown` symbol id.
    pub fn unknown_id(&self) -> SymbolId {
        self.unknown_id
    }

    /// The number of distinct base characters, not counting `unknown`.
    pub fn base_char_count(&self) -> usize {
        self.char_to_id.len()
    }

    /// The total alphabet size, including `unknown`.
    pub fn alphabet_size(&self) -> usize {
        self.char_to_id.len() + 1
    }

    /// Look up the symbol for a character, falling back to `unknown`.
    pub fn symbol_for(
        &self,
        ch: char,
    ) -> SymbolId {
        self.char_to_id.get(&ch).copied().unwrap_or(self.unknown_id)
    }

    /// Map a string to its initial sequence of base symbols, substituting
    /// `unknown` for out-of-alphabet characters.
    pub fn encode_to_symbols(
        &self,
        s: &str,
    ) -> Vec<SymbolId> {
        s.chars().map(|ch| self.symbol_for(ch)).collect()
    }

    /// Borrow the initial `DecodeTable` built so far.
    pub fn decode_table(&self) -> &DecodeTable {
        &self.decode_table
    }

    /// Consume this alphabet and a (possibly merge-extended) `DecodeTable`
    /// to build the encode/decode-facing [`Vocabulary`].
    ///
    /// The `decode_table` passed in is typically the trainer's own table
    /// after the merge loop has grown it past this alphabet's initial
    /// entries; `char_to_id`/`unknown_id` never change after the alphabet
    /// step, so they carry over unmodified.
    pub fn into_vocabulary(
        self,
        decode_table: DecodeTable,
    ) -> Vocabulary {
        Vocabulary {
            char_to_id: self.char_to_id,
            unknown_id: self.unknown_id,
            decode_table,
        }
    }
}

/// The trained vocabulary: the `char -> SymbolId` alphabet map, the reserved
/// `unknown` symbol, and the (merge-extended) `DecodeTable`.
///
/// Produced once by [`crate::training::Trainer::train`] and then shared
/// read-only by any number of [`crate::encoder::Encoder`]/
/// [`crate::decoder::Decoder`] instances built from it.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    char_to_id: CommonHashMap<char, SymbolId>,
    unknown_id: SymbolId,
    decode_table: DecodeTable,
}

impl Vocabulary {
    /// The reserved `unknown` symbol id.
    pub fn unknown_id(&self) -> SymbolId {
        self.unknown_id
    }

    /// Look up the symbol for a character, falling back to `unknown`.
    pub fn symbol_for(
        &self,
        ch: char,
    ) -> SymbolId {
        self.char_to_id.get(&ch).copied().unwrap_or(self.unknown_id)
    }

    /// Map a string to its initial sequence of base symbols, substituting
    /// `unknown` for out-of-alphabet characters.
    ///
    /// Used by [`crate::encoder::Encoder`] only to decide whether a
    /// character is in-alphabet; the encoder itself walks the
    /// [`DecodeTable`]-derived trie rather than this symbol list.
    pub fn encode_to_symbols(
        &self,
        s: &str,
    ) -> Vec<SymbolId> {
        s.chars().map(|ch| self.symbol_for(ch)).collect()
    }

    /// The trained `DecodeTable`.
    pub fn decode_table(&self) -> &DecodeTable {
        &self.decode_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_assigns_ids_in_first_appearance_order() {
        let alphabet = Alphabet::build(&["aaabdaaabac"], '\u{FFFD}');
        // a, b, d, c in order of first appearance, then unknown.
        assert_eq!(alphabet.symbol_for('a'), 0);
        assert_eq!(alphabet.symbol_for('b'), 1);
        assert_eq!(alphabet.symbol_for('d'), 2);
        assert_eq!(alphabet.symbol_for('c'), 3);
        assert_eq!(alphabet.unknown_id(), 4);
        assert_eq!(alphabet.alphabet_size(), 5);
    }

    #[test]
    fn test_unknown_fallback() {
        let alphabet = Alphabet::build(&["abc"], '\u{FFFD}');
        assert_eq!(alphabet.symbol_for('z'), alphabet.unknown_id());
        assert_eq!(
            alphabet.encode_to_symbols("abz"),
            vec![0, 1, alphabet.unknown_id()]
        );
    }

    #[test]
    fn test_decode_table_values_distinct() {
        let alphabet = Alphabet::build(&["aaabdaaabac"], '\u{FFFD}');
        assert!(alphabet.decode_table().all_distinct());
    }

    #[test]
    fn test_empty_corpus() {
        let alphabet = Alphabet::build::<&str>(&[], '\u{FFFD}');
        assert_eq!(alphabet.base_char_count(), 0);
        assert_eq!(alphabet.unknown_id(), 0);
    }

    #[test]
    fn test_into_vocabulary_preserves_alphabet_mapping() {
        let alphabet = Alphabet::build(&["abc"], '\u{FFFD}');
        let unknown = alphabet.unknown_id();
        let mut decode_table = alphabet.decode_table().clone();
        decode_table.insert(99, CompactString::from("ab"));

        let vocabulary = alphabet.into_vocabulary(decode_table);
        assert_eq!(vocabulary.symbol_for('a'), 0);
        assert_eq!(vocabulary.unknown_id(), unknown);
        assert_eq!(vocabulary.decode_table().get(99), Some("ab"));
    }
}
