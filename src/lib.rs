//! # `bpe-trainer`
//!
//! An incremental Byte-Pair-Encoding training engine: the merge loop that,
//! given a corpus of strings and a target vocabulary size, learns an ordered
//! sequence of pair-merge rules and a decode table.
//!
//! Each merge step costs time proportional to the chosen pair's occurrence
//! count, not the corpus size, via two cooperating structures:
//!
//! * [`sequence::LinkedSequence`]: an arena-backed doubly-linked view of
//!   one input, with stable indices and O(1) pair-collapse.
//! * [`heap::IndexedMaxHeap`]: a max-priority queue keyed by pair identity,
//!   with O(log n) `push`/`pop_max`/`contains`/`delete_by_key`.
//!
//! ## Quick start
//!
//! ```
//! use bpe_trainer::{Decoder, Encoder, TrainerOptions};
//!
//! let corpus = ["aaabdaaabac"];
//! let mut trainer = TrainerOptions::new(8).init();
//! let outcome = trainer.train(&corpus).unwrap();
//!
//! let encoder = Encoder::from_vocabulary(&outcome.vocabulary);
//! let decoder = Decoder::new(&outcome.vocabulary);
//!
//! let tokens = encoder.encode("aaabdaaabac");
//! assert_eq!(decoder.decode(&tokens), "aaabdaaabac");
//! ```
//!
//! ## Scope
//!
//! In scope: the training algorithm, its two supporting data structures,
//! and longest-prefix-match encoding/decoding against the learned
//! vocabulary. Out of scope: input acquisition, file/IO, CLI, logging
//! sinks, model serialization, Unicode normalization, and parallelization
//! across the corpus: this crate is a library, not a binary.

#![warn(missing_docs, unused)]

pub mod alphabet;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod heap;
pub mod sequence;
pub mod training;
pub mod types;

#[doc(inline)]
pub use alphabet::{Alphabet, DecodeTable, Vocabulary};
#[doc(inline)]
pub use decoder::Decoder;
#[doc(inline)]
pub use encoder::Encoder;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use heap::{IndexedHeapItem, IndexedMaxHeap};
#[doc(inline)]
pub use sequence::LinkedSequence;
#[doc(inline)]
pub use training::{Trainer, TrainerOptions, TrainingOutcome};
#[doc(inline)]
pub use types::{CommonHashMap, CommonHashSet, MergeRule, Pair, SymbolId};
