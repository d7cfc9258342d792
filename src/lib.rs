//! # Passerelle
//!
//! Fills `TRANSITION` markers in a French article with five-word connectives
//! produced by a text-generation endpoint, and writes the article's title
//! and blurb.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌─────────────┐   ┌──────────┐
//! │  Input   │──▶│  Generation  │──▶│   Repair    │──▶│  Layout  │
//! │ article  │   │ retry+shapes │   │ 5 words,    │   │ rebuild  │
//! └────┬─────┘   └──────┬───────┘   │ uniqueness  │   └────┬─────┘
//!      │                │           └─────────────┘        │
//!      │                ▼                                  ▼
//!      │         ┌──────────────┐                    ┌──────────┐
//!      └────────▶│    Header    │───────────────────▶│ Display  │
//!                │ Titre/Chapeau│                    │ text/JSON│
//!                └──────────────┘                    └──────────┘
//! ```
//!
//! The pure text logic (prompts, response decoding, repair, layout) lives
//! in `passerelle-core`; this crate adds configuration, the HTTP endpoint,
//! the async run and the CLI.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and credential resolution |
//! | [`endpoint`] | `CompletionEndpoint` trait and its HTTP implementation |
//! | [`generation`] | Per-marker connective generation with retries |
//! | [`header`] | Title and blurb generation |
//! | [`pipeline`] | One end-to-end run |
//! | [`examples`] | Few-shot dataset loading |
//! | [`display`] | Text rendering of a run |
//! | [`version`] | Content-hash fingerprint |
//! | [`logging`] | Tracing subscriber setup |

pub mod config;
pub mod display;
pub mod endpoint;
pub mod examples;
pub mod generation;
pub mod header;
pub mod logging;
pub mod pipeline;
pub mod version;
