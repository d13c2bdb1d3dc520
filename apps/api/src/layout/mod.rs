//! Fitting generated text into fixed-size template boxes.

pub mod enforcer;

pub use enforcer::{count_words, enforce_all};
