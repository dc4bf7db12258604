//! vivado-split - Patch generated Vivado sources for a split OpenTitan build
//!
//! The DLA accelerator is moved off the Earl Grey FPGA onto a second board
//! that talks to it over an AXI chip-to-chip link on the FMC connector. This
//! crate rewrites the affected RTL and constraint files of a generated
//! Vivado project so both halves build.
//!
//! Each file is described by a [`PatchTarget`]: a list of positional line
//! [`Edit`]s applied to the pristine source, with the result written over the
//! generated copy (which is kept as `<file>.orig`). The edits are literal and
//! only valid against the exact upstream revision they were written for.
//! Running twice over the same source produces the same output; running over
//! an already patched file does not.

pub mod edit;
pub mod error;
pub mod selection;
pub mod target;

pub use edit::{Edit, LineBuffer};
pub use error::{PatchError, Result};
pub use selection::Selection;
pub use target::{PatchDb, PatchTarget, Roots, Step};
