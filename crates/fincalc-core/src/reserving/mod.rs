//! Actuarial loss reserving over claims development triangles.

pub mod bornhuetter_ferguson;
pub mod chain_ladder;
pub mod triangle;

pub use bornhuetter_ferguson::{bornhuetter_ferguson, BornhuetterFergusonInput, BornhuetterFergusonOutput};
pub use chain_ladder::{chain_ladder, ChainLadderOutput};
pub use triangle::{development_factors, ClaimsTriangle};
