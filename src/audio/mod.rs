//! Optional audio narration integration.
//!
//! The narration service is an external local process that may be
//! entirely absent; everything in this module degrades gracefully. The
//! client probes availability and fetches clips, the narrator owns the
//! background playback worker, and the cursor tracks which clip index
//! pairs with the walkthrough position.

pub mod client;
pub mod cursor;
pub mod narrator;
pub mod player;

pub use client::{AudioClient, Availability};
pub use cursor::NarrationCursor;
pub use narrator::{Narrator, PlaybackEvent};
