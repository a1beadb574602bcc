//! # Decoder: concatenation of `DecodeTable` entries.

use crate::alphabet::Vocabulary;
use crate::types::SymbolId;

/// Decodes token-ID sequences back to strings via a trained [`Vocabulary`].
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Decoder<'v> {
    /// Build a decoder borrowing a trained [`Vocabulary`].
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Decode one token sequence, concatenating `decode_table[t]` for each
    /// `t`. Unknown tokens decode to the reserved placeholder character.
    pub fn decode(
        &self,
        tokens: &[SymbolId],
    ) -> String {
        let mut out = String::new();
        for &token in tokens {
            let decoded = self
                .vocabulary
                .decode_table()
                .get(token)
                .or_else(|| self.vocabulary.decode_table().get(self.vocabulary.unknown_id()))
                .unwrap_or("");
            out.push_str(decoded);
        }
        out
    }

    /// Decode a batch of independent token sequences.
    pub fn decode_batch(
        &self,
        token_lists: &[Vec<SymbolId>],
    ) -> Vec<String> {
        token_lists.iter().map(|tokens| self.decode(tokens)).collect()
    }
}
