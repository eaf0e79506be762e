//! Storage modes for maze configs and layouts.
//!
//! Every config and layout type is generic over a [`Mode`], which picks the
//! grid and element-set representation. `Mutable` data is exclusively
//! owned and editable; `Frozen` data is immutable and cheap to clone.

use std::fmt;

use crate::element::ElementKind;
use crate::element_set::{ElementLookup, ElementSet, FrozenElementSet};
use crate::grid::{FrozenGrid, Grid, GridView};

pub trait Mode: Copy + Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    type Grid: GridView + Clone + fmt::Debug + PartialEq;
    type Elements<K: ElementKind>: ElementLookup<K> + Clone + fmt::Debug + PartialEq;
}

/// Draft storage: owned `Vec`-backed grids and element sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutable;

/// Frozen storage: `Arc`-backed grids and element sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frozen;

impl Mode for Mutable {
    type Grid = Grid;
    type Elements<K: ElementKind> = ElementSet<K>;
}

impl Mode for Frozen {
    type Grid = FrozenGrid;
    type Elements<K: ElementKind> = FrozenElementSet<K>;
}
