//! The per-maze-type handler interface.
//!
//! Each maze type implements [`MazeTypeHandler`] once. Configs and layouts
//! are generic over the storage [`Mode`], so one definition serves both
//! drafts and frozen mazes. Handlers are stateless; every capability is an
//! associated function.

use std::fmt;

use serde_json::Value;

use crate::content::MazeContent;
use crate::error::Result;
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;

pub trait MazeTypeHandler {
    /// Canonical maze type this handler parses
    const MAZE_TYPE: MazeType;

    type Config<M: Mode>: Clone + fmt::Debug + PartialEq;
    type Layout<M: Mode>: Clone + fmt::Debug + PartialEq;

    /// Parse the `config` mapping.
    fn parse_config(spec: &Value) -> Result<Self::Config<Mutable>>;

    /// Parse the `layout` mapping against a parsed config.
    fn parse_layout(spec: &Value, config: &Self::Config<Mutable>) -> Result<Self::Layout<Mutable>>;

    /// Check every cross-field invariant of a config/layout pair.
    fn validate<M: Mode>(config: &Self::Config<M>, layout: &Self::Layout<M>) -> Result<()>;

    /// Deep copy into frozen storage. Callers validate first.
    fn freeze(
        config: &Self::Config<Mutable>,
        layout: &Self::Layout<Mutable>,
    ) -> (Self::Config<Frozen>, Self::Layout<Frozen>);

    /// Deep copy into independent mutable storage.
    fn thaw(
        config: &Self::Config<Frozen>,
        layout: &Self::Layout<Frozen>,
    ) -> (Self::Config<Mutable>, Self::Layout<Mutable>);

    fn config_to_spec<M: Mode>(config: &Self::Config<M>) -> Value;

    fn layout_to_spec<M: Mode>(
        layout: &Self::Layout<M>,
        config: &Self::Config<M>,
        with_grid_numbers: bool,
    ) -> Value;

    /// Wrap a config/layout pair in its [`MazeContent`] variant.
    fn into_content<M: Mode>(config: Self::Config<M>, layout: Self::Layout<M>) -> MazeContent<M>;

    /// Parse config then layout into draft content.
    fn parse(config: &Value, layout: &Value) -> Result<MazeContent<Mutable>> {
        let config = Self::parse_config(config)?;
        let layout = Self::parse_layout(layout, &config)?;
        Ok(Self::into_content(config, layout))
    }
}
