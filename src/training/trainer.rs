//! # Trainer: the merge loop.
//!
//! Orchestrates [`crate::sequence::LinkedSequence`] and
//! [`crate::heap::IndexedMaxHeap`]: repeatedly pops the most-frequent pair,
//! collapses every live occurrence in place, and pushes a merge rule. Each
//! merge step costs time proportional to the chosen pair's occurrence count,
//! not the corpus size.

use crate::alphabet::{Alphabet, DecodeTable, Vocabulary};
use crate::error::{Error, Result};
use crate::heap::IndexedMaxHeap;
use crate::sequence::LinkedSequence;
use crate::training::stats::{Occurrence, StatsEntry};
use crate::types::{CommonHashMap, MergeRule, Pair, SymbolId};
use compact_str::CompactString;

/// Options for [`Trainer`].
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// Desired vocabulary size: base characters + `unknown` + merges.
    pub target_vocab_size: usize,

    /// The character `unknown` decodes to. Defaults to `U+FFFD` (the Unicode
    /// replacement character).
    pub unknown_placeholder: char,
}

impl TrainerOptions {
    /// Options targeting `target_vocab_size`, with the default `unknown`
    /// placeholder.
    pub fn new(target_vocab_size: usize) -> Self {
        Self {
            target_vocab_size,
            unknown_placeholder: '\u{FFFD}',
        }
    }

    /// Sets the character `unknown` decodes to.
    pub fn with_unknown_placeholder(
        self,
        placeholder: char,
    ) -> Self {
        Self {
            unknown_placeholder: placeholder,
            ..self
        }
    }

    /// Initializes a [`Trainer`] from these options.
    pub fn init(self) -> Trainer {
        Trainer::new(self)
    }
}

/// The outcome of one [`Trainer::train`] call.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Merge rules, in the order they were performed.
    pub merges: Vec<MergeRule>,

    /// How many merges were actually performed. Equal to
    /// `merges.len()`; may be less than requested if `stats` ran empty
    /// before the target was reached (not an error).
    pub merges_performed: usize,

    /// The trained vocabulary: alphabet map plus the merge-extended
    /// `DecodeTable`.
    pub vocabulary: Vocabulary,
}

/// Orchestrates the merge loop: repeatedly pops the most-frequent pair,
/// collapses every live occurrence, and emits a merge rule.
#[derive(Debug, Clone)]
pub struct Trainer {
    options: TrainerOptions,
}

impl Trainer {
    /// Construct a trainer from `options`.
    pub fn new(options: TrainerOptions) -> Self {
        Self { options }
    }

    /// Train on `corpus`, producing an ordered list of merges and a
    /// [`Vocabulary`].
    ///
    /// Runs the alphabet build and the full merge loop in one call; there is
    /// no incremental `update_from_samples` accumulation step (streaming/
    /// online training is out of scope for this crate).
    ///
    /// ## Errors
    /// Propagates [`Error`] from the underlying [`LinkedSequence`]/
    /// [`IndexedMaxHeap`] operations; a correctly-invoked training run
    /// produces none.
    pub fn train<S: AsRef<str>>(
        &mut self,
        corpus: &[S],
    ) -> Result<TrainingOutcome> {
        let alphabet = Alphabet::build(corpus, self.options.unknown_placeholder);
        let alphabet_size = alphabet.alphabet_size();
        let mut decode_table = alphabet.decode_table().clone();

        let mut sequences: Vec<LinkedSequence> = corpus
            .iter()
            .map(|s| LinkedSequence::new(&alphabet.encode_to_symbols(s.as_ref())))
            .collect();

        let target_merges = self.options.target_vocab_size.saturating_sub(alphabet_size);

        let mut stats = Self::initial_stats(&sequences)?;

        log::info!(
            "Starting BPE merge loop: {target_merges} merges to compute over {} sequences",
            sequences.len()
        );

        let mut merges = Vec::with_capacity(target_merges);
        let mut next_token: SymbolId = alphabet_size as SymbolId;
        let mut last_log_percent = 0usize;

        for _ in 0..target_merges {
            let Ok(mut entry) = stats.pop_max() else {
                break;
            };
            let (a, b) = entry.pair();
            let target = next_token;

            let snapshot: Vec<Occurrence> = entry.positions().iter().copied().collect();
            for (k, p) in snapshot {
                if !entry.positions().contains(&(k, p)) {
                    // Invalidated by an earlier iteration of this same step
                    // (the snapshot guard: overlapping occurrences, e.g.
                    // `a b a b`, can be consumed by a neighbor update below).
                    continue;
                }

                let left = sequences[k].prev(p)?;
                let right = sequences[k].second_next(p)?;

                if let Some(l) = left {
                    let x = sequences[k].get(l)?;
                    Self::remove_position(&mut stats, &mut entry, (x, a), (k, l))?;
                    Self::add_position(&mut stats, (x, target), (k, l))?;
                }

                if let Some(r) = right {
                    let y = sequences[k].get(r)?;
                    let partner = sequences[k]
                        .next(p)?
                        .ok_or(Error::InvariantViolation(
                            "entry occurrence has no successor to collapse",
                        ))?;
                    Self::remove_position(&mut stats, &mut entry, (b, y), (k, partner))?;
                    Self::add_position(&mut stats, (target, y), (k, p))?;
                }

                sequences[k].replace_pair(p, target)?;
                entry.remove(&(k, p));
            }

            let rule = MergeRule::new(a, b, target);
            let (ra, rb) = rule.pair();
            decode_table.insert(target, Self::concat(&decode_table, ra, rb)?);
            log::trace!("Merged pair {:?} -> {target}", rule.pair());
            merges.push(rule);
            next_token += 1;

            let done = merges.len();
            let percent = done * 100 / target_merges.max(1);
            if percent > last_log_percent {
                log::info!("BPE training progress: {percent}% ({done}/{target_merges})");
                last_log_percent = percent;
            }
        }

        log::info!("Finished BPE training: {} merges completed", merges.len());

        Ok(TrainingOutcome {
            merges_performed: merges.len(),
            merges,
            vocabulary: alphabet.into_vocabulary(decode_table),
        })
    }

    /// Scan every sequence once, recording `(k, i)` for each adjacent pair
    /// `(seq[k][i], seq[k][i+1])`, and push one entry per distinct pair.
    fn initial_stats(sequences: &[LinkedSequence]) -> Result<IndexedMaxHeap<StatsEntry>> {
        let mut building: CommonHashMap<Pair, StatsEntry> = CommonHashMap::default();

        for (k, seq) in sequences.iter().enumerate() {
            let mut cur = seq.head();
            while let Some(i) = cur {
                let Some(j) = seq.next(i)? else { break };
                let pair = (seq.get(i)?, seq.get(j)?);
                building.entry(pair).or_insert_with(|| StatsEntry::new(pair)).insert((k, i));
                cur = Some(j);
            }
        }

        let mut stats = IndexedMaxHeap::with_capacity(building.len());
        for entry in building.into_values() {
            stats.push(entry)?;
        }
        Ok(stats)
    }

    /// `pair Q` is losing `occurrence`. If `Q` is the pair the caller is
    /// currently merging (`entry`), it is not in the heap: remove from
    /// `entry` directly. Otherwise pull `Q`'s entry out of the heap, drop
    /// the occurrence, and reinsert unless it emptied out.
    fn remove_position(
        stats: &mut IndexedMaxHeap<StatsEntry>,
        entry: &mut StatsEntry,
        pair: Pair,
        occurrence: Occurrence,
    ) -> Result<()> {
        if pair == entry.pair() {
            entry.remove(&occurrence);
        } else {
            let mut other = stats.delete_by_key(&pair)?;
            other.remove(&occurrence);
            if !other.is_empty() {
                stats.push(other)?;
            }
        }
        Ok(())
    }

    /// `pair Q` is gaining `occurrence`. `Q` may already be tracked (pull it
    /// out, extend, reinsert) or may be new to the heap this step.
    fn add_position(
        stats: &mut IndexedMaxHeap<StatsEntry>,
        pair: Pair,
        occurrence: Occurrence,
    ) -> Result<()> {
        if stats.contains(&pair) {
            let mut existing = stats.delete_by_key(&pair)?;
            existing.insert(occurrence);
            stats.push(existing)?;
        } else {
            let mut fresh = StatsEntry::new(pair);
            fresh.insert(occurrence);
            stats.push(fresh)?;
        }
        Ok(())
    }

    /// `decode_table[a] ++ decode_table[b]`, the derived-symbol decoding
    /// rule.
    fn concat(
        decode_table: &DecodeTable,
        a: SymbolId,
        b: SymbolId,
    ) -> Result<CompactString> {
        let da = decode_table
            .get(a)
            .ok_or(Error::InvariantViolation("decode table missing merge parent"))?;
        let db = decode_table
            .get(b)
            .ok_or(Error::InvariantViolation("decode table missing merge parent"))?;
        let mut out = CompactString::with_capacity(da.len() + db.len());
        out.push_str(da);
        out.push_str(db);
        Ok(out)
    }
}
