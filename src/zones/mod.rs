//! Shared card zones: the draw and discard piles.

pub mod piles;

pub use piles::Piles;
