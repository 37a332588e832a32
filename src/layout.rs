use kurbo::{CubicBez, ParamCurve, Point};
use rand::Rng;

/// Tuning constants for one tree's label stack, in the stack's local
/// coordinate space (x grows right, y grows down).
///
/// The defaults mirror the card the presentation was tuned against: 44 px
/// rows, ~20 px per CJK glyph, a 340 px wide container.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayoutParams {
    /// Vertical distance between consecutive row centers.
    pub row_height: f64,
    /// Estimated advance of one character.
    pub char_width: f64,
    /// Half the container width; rows are centered on this x.
    pub half_container: f64,
    /// Vertical offset of row 0's text center.
    pub y_offset: f64,
    /// Extra half-width covering the `《…》` bracket glyphs.
    pub bracket_padding: f64,
    /// Horizontal control-handle length, applied outward from each anchor.
    pub handle_len: f64,
    /// Vertical control-handle drop toward the segment midline.
    pub handle_drop: f64,
    /// Ornaments per segment, sampled uniformly (inclusive bounds).
    pub ornament_count: (u32, u32),
    /// Curve-parameter range ornaments are sampled from.
    pub ornament_t: (f64, f64),
    /// Ornament radius range in pixels.
    pub ornament_size: (f64, f64),
    /// Ornament opacity range.
    pub ornament_opacity: (f64, f64),
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            row_height: 44.0,
            char_width: 20.0,
            half_container: 170.0,
            y_offset: 20.0,
            bracket_padding: 16.0,
            handle_len: 20.0,
            handle_drop: 10.0,
            ornament_count: (1, 2),
            ornament_t: (0.2, 0.8),
            ornament_size: (3.0, 7.0),
            ornament_opacity: (0.4, 0.8),
        }
    }
}

/// Estimates half the rendered width of a title.
///
/// Character counting is a heuristic stand-in for real font metrics; callers
/// that can measure rendered glyphs may substitute their own estimator.
pub trait WidthEstimator {
    fn half_width(&self, title: &str) -> f64;
}

/// Default estimator: `chars * char_width / 2 + bracket_padding`.
#[derive(Clone, Copy, Debug)]
pub struct CharCountEstimator {
    pub char_width: f64,
    pub bracket_padding: f64,
}

impl CharCountEstimator {
    pub fn from_params(params: &LayoutParams) -> Self {
        Self {
            char_width: params.char_width,
            bracket_padding: params.bracket_padding,
        }
    }
}

impl WidthEstimator for CharCountEstimator {
    fn half_width(&self, title: &str) -> f64 {
        (title.chars().count() as f64 * self.char_width) / 2.0 + self.bracket_padding
    }
}

/// Which bracket glyph a curve anchor sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AnchorSide {
    Left,
    Right,
}

impl AnchorSide {
    fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// One title's placement: vertical center plus the bracket anchor points the
/// connector ribbon threads through.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RowLayout {
    pub title: String,
    pub y: f64,
    pub left: Point,
    pub right: Point,
}

/// A decorative dot sampled along a connector curve.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct Ornament {
    /// Curve parameter the dot was sampled at.
    pub t: f64,
    pub pos: Point,
    pub size: f64,
    pub opacity: f64,
}

/// A decorative curve linking two adjacent rows.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ConnectorSegment {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
    pub start_side: AnchorSide,
    pub ornaments: Vec<Ornament>,
}

impl ConnectorSegment {
    /// The segment as a kurbo curve, for evaluation and path building.
    pub fn curve(&self) -> CubicBez {
        CubicBez::new(self.start, self.control1, self.control2, self.end)
    }
}

/// The geometry of one tree: a row stack plus the ribbon segments.
///
/// Pure data; color, font and markup are the scene layer's business.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TreeLayout {
    pub rows: Vec<RowLayout>,
    pub segments: Vec<ConnectorSegment>,
}

impl TreeLayout {
    /// Total height of the stack, from the top edge to below the last row.
    pub fn stack_height(&self, params: &LayoutParams) -> f64 {
        self.rows.len() as f64 * params.row_height + params.y_offset
    }
}

/// Lay out one tree's sorted titles.
///
/// `titles` must already be ordered the way the rows should stack (ascending
/// display length, see [`TreeGroup::sorted_titles`]). Ornament placement
/// draws from `rng`, so two passes over the same input agree on rows and
/// curves but not on ornaments; seed the generator when reproducibility
/// matters.
///
/// [`TreeGroup::sorted_titles`]: crate::model::TreeGroup::sorted_titles
pub fn layout_tree(
    titles: &[String],
    params: &LayoutParams,
    estimator: &dyn WidthEstimator,
    rng: &mut impl Rng,
) -> TreeLayout {
    let rows: Vec<RowLayout> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let half_text_width = estimator.half_width(title);
            let y = i as f64 * params.row_height + params.y_offset;
            RowLayout {
                title: title.clone(),
                y,
                left: Point::new(params.half_container - half_text_width, y),
                right: Point::new(params.half_container + half_text_width, y),
            }
        })
        .collect();

    let mut segments = Vec::with_capacity(rows.len().saturating_sub(1));
    for i in 0..rows.len().saturating_sub(1) {
        // Even segments run left-to-right, odd ones right-to-left, so the
        // ribbon crosses the stack in a continuous zig-zag.
        let start_side = if i % 2 == 0 {
            AnchorSide::Left
        } else {
            AnchorSide::Right
        };
        let end_side = start_side.flipped();

        let start = anchor(&rows[i], start_side);
        let end = anchor(&rows[i + 1], end_side);

        // Horizontal handles biased outward from each anchor, with a small
        // vertical drop toward the midline, yielding a flattened S-curve.
        let p1 = Point::new(
            start.x + handle_dx(start_side, params.handle_len),
            start.y + params.handle_drop,
        );
        let p2 = Point::new(
            end.x + handle_dx(end_side, params.handle_len),
            end.y - params.handle_drop,
        );
        let curve = CubicBez::new(start, p1, p2, end);

        let ornaments = sample_ornaments(&curve, params, rng);
        segments.push(ConnectorSegment {
            start,
            control1: p1,
            control2: p2,
            end,
            start_side,
            ornaments,
        });
    }

    TreeLayout { rows, segments }
}

fn anchor(row: &RowLayout, side: AnchorSide) -> Point {
    match side {
        AnchorSide::Left => row.left,
        AnchorSide::Right => row.right,
    }
}

fn handle_dx(side: AnchorSide, handle_len: f64) -> f64 {
    match side {
        AnchorSide::Left => -handle_len,
        AnchorSide::Right => handle_len,
    }
}

fn sample_ornaments(
    curve: &CubicBez,
    params: &LayoutParams,
    rng: &mut impl Rng,
) -> Vec<Ornament> {
    let (lo, hi) = params.ornament_count;
    let count = rng.random_range(lo..=hi.max(lo));
    (0..count)
        .map(|_| {
            let t = rng.random_range(params.ornament_t.0..=params.ornament_t.1);
            Ornament {
                t,
                pos: curve.eval(t),
                size: rng.random_range(params.ornament_size.0..=params.ornament_size.1),
                opacity: rng.random_range(params.ornament_opacity.0..=params.ornament_opacity.1),
            }
        })
        .collect()
}
