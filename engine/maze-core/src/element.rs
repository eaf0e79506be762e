//! Maze elements: named, single-character tokens with integer values.
//!
//! The element kind is a type parameter so cell and wall vocabularies can
//! never be mixed inside one set.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::error::{MazeError, Result};

/// Grid row separator in headered grid text; never a valid token
pub const ROW_SEPARATOR: char = '|';

/// Marker trait for element kinds
pub trait ElementKind:
    Copy + Clone + fmt::Debug + PartialEq + Eq + Hash + Send + Sync + 'static
{
    /// Human-readable kind used in log output
    const LABEL: &'static str;
}

/// Elements that fill cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell;

/// Elements that fill wall slots between cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wall;

/// Combined cell and wall vocabulary of an occupancy grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Merged;

impl ElementKind for Cell {
    const LABEL: &'static str = "cell";
}

impl ElementKind for Wall {
    const LABEL: &'static str = "wall";
}

impl ElementKind for Merged {
    const LABEL: &'static str = "merged";
}

/// A grid alphabet entry. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element<K: ElementKind> {
    name: String,
    token: char,
    value: i64,
    kind: PhantomData<K>,
}

pub type CellElement = Element<Cell>;
pub type WallElement = Element<Wall>;
pub type MazeElement = Element<Merged>;

impl<K: ElementKind> Element<K> {
    /// Create an element, checking the name is non-empty and the token is
    /// neither whitespace nor the row separator.
    pub fn new(name: impl Into<String>, token: char, value: i64) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(MazeError::InvalidElement {
                reason: "name must be non-empty".into(),
            });
        }
        if token.is_whitespace() {
            return Err(MazeError::InvalidElement {
                reason: format!("token for '{name}' must not be whitespace"),
            });
        }
        if token == ROW_SEPARATOR {
            return Err(MazeError::InvalidElement {
                reason: format!("token for '{name}' must not be '{ROW_SEPARATOR}'"),
            });
        }
        Ok(Self {
            name,
            token,
            value,
            kind: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn token(&self) -> char {
        self.token
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Copy this element into another kind under a new name.
    pub(crate) fn retag<J: ElementKind>(&self, name: String) -> Element<J> {
        Element {
            name,
            token: self.token,
            value: self.value,
            kind: PhantomData,
        }
    }
}

impl<K: ElementKind> fmt::Display for Element<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}('{}'={})", self.name, self.token, self.value)
    }
}
