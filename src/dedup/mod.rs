//! Duplicate detection for objects the host has renamed with a `.NNN` suffix.
//!
//! [`classify_equivalence`] decides whether two objects are the same logical
//! asset under an [`EquivalenceProfile`], and [`resolve_canonical_name`] folds a
//! suffixed duplicate back onto its base name when the two are equivalent.
//! Both are total: nothing here can fail.

pub mod canonical;
pub mod equivalence;
pub mod profile;
pub mod view;

pub use canonical::{resolve_canonical_name, split_duplicate_suffix};
pub use equivalence::classify_equivalence;
pub use profile::{EquivalenceCheck, EquivalenceProfile};
pub use view::{SceneIndex, SceneObjectView};
