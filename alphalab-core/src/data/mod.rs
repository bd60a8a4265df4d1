//! Series alignment across instruments.

pub mod align;

pub use align::{align_pair, align_returns, AlignedReturns};
