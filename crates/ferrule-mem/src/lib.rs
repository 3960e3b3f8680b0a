//! Ferrule memory management infrastructure.
//!
//! - **Arena allocation**: [`LocalArena`], a single-threaded bump arena that
//!   owns every node of a compilation unit and frees them together
//! - **Identifier interning**: [`StringInterner`] and [`Symbol`] (feature
//!   `string-interner`, on by default)

pub mod arena;
pub mod symbol;

#[cfg(feature = "string-interner")]
pub mod interner;

pub use arena::{ArenaStats, LocalArena, SYNTAX_CHUNK_SIZE};
pub use symbol::Symbol;

#[cfg(feature = "string-interner")]
pub use interner::StringInterner;
