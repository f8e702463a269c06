//! Rule predicates and effect computation.
//!
//! Validation and effect computation are deliberately pure: the validator
//! never mutates anything, and the effect processor only computes a
//! descriptor. The `Game` aggregate commits both in a single step, keeping
//! the validate/mutate boundary auditable.

pub mod effect;
pub mod validate;

pub use effect::{compute_effect, PlayEffect};
pub use validate::{
    playable_from_hand, validate_card_stacking, validate_ownership, validate_play, TableState,
};
