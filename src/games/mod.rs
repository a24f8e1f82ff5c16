//! Contains implementations of the `Game` trait.

/// A `Game` implementation for English draughts.
pub mod draughts;
