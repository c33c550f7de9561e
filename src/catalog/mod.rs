//! Static item catalogs: who gets scanned, in which order, with which words.
//!
//! Order is part of the data. Lists are constructed once, never reordered,
//! and every list that supports upward navigation ends with its back entry.

pub mod keyboard;
pub mod needs;
pub mod pain;
