//! # cscribe-core
//!
//! Reshape atomic descriptor output into the layouts expected by learning code.
//!
//! __cscribe-core__ provides:
//! * A [`StructureCollection`] of independent atomic structures and the
//!   [`AtomsByStructure`] read interface the conversions work against
//! * [`to_local`], which splits a flat per-atom array into per-structure arrays
//! * [`in_blocks`], which moves every atom's features into the zero-padded
//!   block of its own element
//!
//! The descriptors themselves are computed elsewhere; see `cscribe-descriptors`.
//!
mod collection;
mod conversion;
mod elements;
mod error;

pub use self::collection::{AtomsByStructure, Cell, Structure, StructureCollection};
pub use self::conversion::{in_blocks, in_blocks_with, to_local, to_local_for};
pub use self::elements::{element_symbol, ElementId, ElementIndex};
pub use self::error::{ConversionError, DatasetError};
