//! Kuusi turns a reading community's year-end book data into decorative
//! "reading forest" imagery.
//!
//! Each group of readers becomes a stylized Christmas tree: titles stack into
//! a triangular silhouette, a zig-zag ribbon of cubic Bézier curves threads
//! through the bracket glyphs, and randomized ornament dots decorate the
//! ribbon. Scenes are emitted as SVG and rasterized to PNG.
//!
//! - [`model`]: the record dataset and grouping
//! - [`layout`]: the pure geometry engine
//! - [`scene`] / [`card`]: SVG scene construction
//! - [`render`]: SVG-to-PNG rasterization
#![forbid(unsafe_code)]

pub mod card;
pub mod core;
pub mod error;
pub mod layout;
pub mod model;
pub mod palette;
pub mod pipeline;
pub mod render;
pub mod scene;
pub mod snow;

pub use card::{CardTheme, ReadingCard, card_svg};
pub use crate::core::Canvas;
pub use error::{KuusiError, KuusiResult};
pub use layout::{
    AnchorSide, CharCountEstimator, ConnectorSegment, LayoutParams, Ornament, RowLayout,
    TreeLayout, WidthEstimator, layout_tree,
};
pub use model::{
    EMBEDDED_RECORDS, ReadingRecord, TreeGroup, display_title, group_records, parse_records,
};
pub use pipeline::{forest_scene, layout_forest, tree_scene};
pub use render::{RasterImage, RenderOptions, rasterize_svg, render_svg_to_png};
pub use scene::{ForestScene, forest_canvas, forest_svg, tree_svg};
pub use snow::{Snowfield, Snowflake};
