//! Convert descriptor backend output into the layouts used by the learning toolkit.
//!
//! - [`to_local`]: flat `(n_total_atoms, dim)` array → one array per structure
//! - [`in_blocks`]: per-structure arrays → element-stratified, zero-padded blocks
//!
//! Both are pure: they allocate new arrays and never touch their inputs.
mod blocks;
mod local;

pub use self::blocks::{in_blocks, in_blocks_with};
pub use self::local::{to_local, to_local_for};
