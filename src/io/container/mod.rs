//! Container formats that split a buffer into member files.
//!
//! - [`stm`] (`.STM`): explicit `(offset, size)` table with a final-entry flag
//! - [`map`] (`.MAP` and `MAPX`): offset-only tables, sizes inferred from gaps

pub mod map;
pub mod stm;

pub use map::{quickcheck_mapx, MapContainer, MapHeader};
pub use stm::{StmContainer, StmEntry};
