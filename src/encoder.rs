//! # Encoder: longest-prefix-match tokenization over a `DecodeTable` trie.
//!
//! Built once from a trained [`Vocabulary`], then immutable: no incremental
//! vocabulary growth is in scope. The trie is an arena
//! (`Vec<TrieNode>`) indexed by node id, in the same tombstone-free-arena
//! idiom as [`crate::sequence::LinkedSequence`]'s backing array.

use crate::alphabet::{DecodeTable, Vocabulary};
use crate::types::{CommonHashMap, SymbolId};

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: CommonHashMap<char, usize>,
    token: Option<SymbolId>,
}

/// Longest-prefix-match encoder over a trained [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct Encoder {
    arena: Vec<TrieNode>,
    unknown_id: SymbolId,
}

impl Encoder {
    /// Build an encoder from a trained [`Vocabulary`].
    pub fn from_vocabulary(vocabulary: &Vocabulary) -> Self {
        Self::from_decode_table(vocabulary.decode_table(), vocabulary.unknown_id())
    }

    /// Build an encoder directly from a `DecodeTable` and its `unknown`
    /// symbol, without going through a full [`Vocabulary`].
    pub fn from_decode_table(
        decode_table: &DecodeTable,
        unknown_id: SymbolId,
    ) -> Self {
        let mut arena = vec![TrieNode::default()];

        for (id, decoded) in decode_table.iter() {
            let mut node = 0usize;
            for ch in decoded.chars() {
                node = match arena[node].children.get(&ch) {
                    Some(&next) => next,
                    None => {
                        let next = arena.len();
                        arena.push(TrieNode::default());
                        arena[node].children.insert(ch, next);
                        next
                    }
                };
            }
            arena[node].token = Some(id);
        }

        Self { arena, unknown_id }
    }

    /// Tokenize one string via repeated longest-prefix match.
    ///
    /// A single unmatched character yields the `unknown` token and advances
    /// by one; base characters always match (length-1), so the walk always
    /// makes forward progress.
    pub fn encode(
        &self,
        s: &str,
    ) -> Vec<SymbolId> {
        let chars: Vec<char> = s.chars().collect();
        let mut out = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let mut node = 0usize;
            let mut best: Option<(SymbolId, usize)> = None;
            let mut j = i;

            loop {
                if let Some(token) = self.arena[node].token {
                    best = Some((token, j - i));
                }
                let Some(&ch) = chars.get(j) else { break };
                let Some(&next) = self.arena[node].children.get(&ch) else {
                    break;
                };
                node = next;
                j += 1;
            }

            match best {
                Some((token, len)) if len > 0 => {
                    out.push(token);
                    i += len;
                }
                _ => {
                    out.push(self.unknown_id);
                    i += 1;
                }
            }
        }

        out
    }

    /// Tokenize each input string independently.
    pub fn encode_batch<S: AsRef<str>>(
        &self,
        strings: &[S],
    ) -> Vec<Vec<SymbolId>> {
        strings.iter().map(|s| self.encode(s.as_ref())).collect()
    }
}
