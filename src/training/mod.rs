//! # Training
//!
//! The incremental BPE merge loop: [`Trainer`] orchestrates a
//! [`crate::sequence::LinkedSequence`] per input and a single
//! [`crate::heap::IndexedMaxHeap`] of [`stats::StatsEntry`], repeatedly
//! collapsing the most-frequent pair until `target_vocab_size` is reached or
//! no pairs remain.
//!
//! ```
//! use bpe_trainer::training::TrainerOptions;
//!
//! let mut trainer = TrainerOptions::new(10).init();
//! let outcome = trainer.train(&["low lower lowest"]).unwrap();
//! assert!(outcome.merges_performed <= 10);
//! ```

mod stats;
mod trainer;

#[doc(inline)]
pub use stats::{Occurrence, StatsEntry};
#[doc(inline)]
pub use trainer::{Trainer, TrainerOptions, TrainingOutcome};
