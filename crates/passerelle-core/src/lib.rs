//! # Passerelle Core
//!
//! Pure logic for Passerelle: segment splitting, prompt construction,
//! response-shape decoding, connective validation and repair, and article
//! reassembly.
//!
//! This crate performs no network or filesystem I/O and has no async
//! runtime dependency. Randomised choices take an injected [`rand::Rng`]
//! so callers (and tests) control the seed.

pub mod fallback;
pub mod header;
pub mod layout;
pub mod models;
pub mod prompt;
pub mod repair;
pub mod response;
pub mod text;

/// Literal token marking an insertion point in the source document.
pub const DEFAULT_MARKER: &str = "TRANSITION";

/// Number of words every accepted connective must contain.
pub const CONNECTIVE_WORDS: usize = 5;
