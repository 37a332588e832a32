//! SVG scene construction.
//!
//! The layout engine hands over pure geometry; this module is the only place
//! that knows about color, fonts and markup. Scenes are emitted as SVG text
//! and rasterized by [`crate::render`].

use std::fmt::Write as _;

use crate::{
    core::Canvas,
    layout::{LayoutParams, TreeLayout},
    model::{TreeGroup, display_title},
    palette::{self, TreeScheme},
    snow::Snowfield,
};

const TREE_WIDTH: f64 = 340.0;
const STAR_ZONE: f64 = 70.0;
const TRUNK_GAP: f64 = 16.0;
const TRUNK_WIDTH: f64 = 48.0;
const TRUNK_HEIGHT: f64 = 64.0;
const CAPTION_ZONE: f64 = 64.0;
const TITLE_FONT_SIZE: f64 = 19.0;
const FONT_STACK: &str = "'KingHwaOldSong', 'Microsoft YaHei', 'Noto Serif CJK SC', serif";

/// One tree as a standalone SVG document.
pub fn tree_svg(group: &TreeGroup, layout: &TreeLayout, params: &LayoutParams) -> String {
    let scheme = palette::scheme_for(&group.id);
    let height = tree_height(layout, params);
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{TREE_WIDTH}" height="{height}" viewBox="0 0 {TREE_WIDTH} {height}">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        palette::NIGHT
    );
    svg.push_str(&tree_markup(group, layout, &scheme, params));
    svg.push_str("</svg>\n");
    svg
}

/// Height of one tree's full markup block (star, stack, trunk, caption).
pub fn tree_height(layout: &TreeLayout, params: &LayoutParams) -> f64 {
    STAR_ZONE + layout.stack_height(params) + TRUNK_GAP + TRUNK_HEIGHT + CAPTION_ZONE
}

/// One tree's markup in local coordinates, embeddable via a `translate`
/// transform.
pub fn tree_markup(
    group: &TreeGroup,
    layout: &TreeLayout,
    scheme: &TreeScheme,
    params: &LayoutParams,
) -> String {
    let id = &group.id;
    let grad_id = format!("ribbon-{id}");
    let trunk_id = format!("trunk-{id}");
    let mut out = String::new();

    let _ = writeln!(out, "<defs>");
    let _ = writeln!(
        out,
        r#"<linearGradient id="{}" x1="0" y1="0" x2="0" y2="1">
<stop offset="0%" stop-color="white" stop-opacity="0.6"/>
<stop offset="100%" stop-color="white" stop-opacity="0.05"/>
</linearGradient>"#,
        xml_escape(&grad_id)
    );
    let _ = writeln!(
        out,
        r#"<linearGradient id="{}" x1="0" y1="0" x2="0" y2="1">
<stop offset="0%" stop-color="{}"/>
<stop offset="100%" stop-color="{}"/>
</linearGradient>"#,
        xml_escape(&trunk_id),
        palette::WARM_WOOD,
        palette::DARK_TRUFFLE
    );
    let _ = writeln!(out, "</defs>");

    // Star above the stack.
    let _ = writeln!(
        out,
        r#"<path d="{}" fill="{}" opacity="0.95"/>"#,
        star_path(TREE_WIDTH / 2.0, STAR_ZONE / 2.0, 22.0, 9.0),
        scheme.accent
    );

    // Ribbon and rows, shifted below the star zone.
    let _ = writeln!(out, r#"<g transform="translate(0 {STAR_ZONE})">"#);
    for seg in &layout.segments {
        let _ = writeln!(
            out,
            r#"<path d="M {} {} C {} {}, {} {}, {} {}" fill="none" stroke="url(#{})" stroke-width="1.5" stroke-linecap="round"/>"#,
            fmt(seg.start.x),
            fmt(seg.start.y),
            fmt(seg.control1.x),
            fmt(seg.control1.y),
            fmt(seg.control2.x),
            fmt(seg.control2.y),
            fmt(seg.end.x),
            fmt(seg.end.y),
            xml_escape(&grad_id)
        );
        for o in &seg.ornaments {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="white" fill-opacity="{}"/>"#,
                fmt(o.pos.x),
                fmt(o.pos.y),
                fmt(o.size),
                fmt(o.opacity)
            );
        }
    }
    for (idx, row) in layout.rows.iter().enumerate() {
        let color = scheme.palette[idx % scheme.palette.len()];
        // Baseline sits a little under the row's vertical center.
        let baseline = row.y + TITLE_FONT_SIZE * 0.35;
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="{FONT_STACK}" font-size="{TITLE_FONT_SIZE}" font-weight="bold" fill="{}">{}</text>"#,
            fmt(params.half_container),
            fmt(baseline),
            color,
            xml_escape(&display_title(&row.title))
        );
    }
    let _ = writeln!(out, "</g>");

    // Trunk and caption under the stack.
    let trunk_y = STAR_ZONE + layout.stack_height(params) + TRUNK_GAP;
    let _ = writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{TRUNK_WIDTH}" height="{TRUNK_HEIGHT}" rx="6" fill="url(#{})" opacity="0.8"/>"#,
        fmt((TREE_WIDTH - TRUNK_WIDTH) / 2.0),
        fmt(trunk_y),
        xml_escape(&trunk_id)
    );
    let caption_y = trunk_y + TRUNK_HEIGHT + 28.0;
    let _ = writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{FONT_STACK}" font-size="26" fill="{}">Tree {}</text>"#,
        fmt(TREE_WIDTH / 2.0),
        fmt(caption_y),
        scheme.accent,
        xml_escape(group.id.trim_end_matches('号'))
    );
    let _ = writeln!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{FONT_STACK}" font-size="10" letter-spacing="3" fill="{}" opacity="0.6">{} COLLECTED VOLUMES</text>"#,
        fmt(TREE_WIDTH / 2.0),
        fmt(caption_y + 18.0),
        palette::CANDLE,
        layout.rows.len()
    );
    out
}

/// Forest composition: header, trees two per row with an odd last tree
/// centered, snow overlay, footer.
pub struct ForestScene {
    pub svg: String,
    pub canvas: Canvas,
}

const FOREST_MARGIN_X: f64 = 40.0;
const FOREST_GAP_X: f64 = 64.0;
const FOREST_GAP_Y: f64 = 120.0;
const HEADER_ZONE: f64 = 200.0;
const FOOTER_ZONE: f64 = 150.0;

/// Forest dimensions in scene units. Bands hold two trees; a band is as
/// tall as its taller tree.
fn forest_dimensions(trees: &[(TreeGroup, TreeLayout)], params: &LayoutParams) -> (f64, f64) {
    let width = FOREST_MARGIN_X * 2.0 + TREE_WIDTH * 2.0 + FOREST_GAP_X;
    let mut height = HEADER_ZONE;
    for band in trees.chunks(2) {
        let band_h = band
            .iter()
            .map(|(_, l)| tree_height(l, params))
            .fold(0.0, f64::max);
        height += band_h + FOREST_GAP_Y;
    }
    height += FOOTER_ZONE;
    (width, height)
}

/// Pixel canvas the forest scene will occupy, computable before the scene
/// itself so overlays like snow can be sized up front.
pub fn forest_canvas(trees: &[(TreeGroup, TreeLayout)], params: &LayoutParams) -> Canvas {
    let (width, height) = forest_dimensions(trees, params);
    Canvas {
        width: width.ceil() as u32,
        height: height.ceil() as u32,
    }
}

pub fn forest_svg(
    trees: &[(TreeGroup, TreeLayout)],
    snow: &Snowfield,
    params: &LayoutParams,
) -> ForestScene {
    let (width, height) = forest_dimensions(trees, params);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        fmt(width),
        fmt(height),
        fmt(width),
        fmt(height)
    );
    let _ = writeln!(
        svg,
        r#"<defs>
<radialGradient id="night" cx="0.5" cy="0.5" r="0.8">
<stop offset="0%" stop-color="{}"/>
<stop offset="100%" stop-color="{}"/>
</radialGradient>
</defs>"#,
        palette::MISTLETOE_SHADOW,
        palette::NIGHT
    );
    let _ = writeln!(svg, r##"<rect width="100%" height="100%" fill="url(#night)"/>"##);

    // Header.
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="90" text-anchor="middle" font-family="{FONT_STACK}" font-size="64" fill="{}">The Reading Forest</text>"#,
        fmt(width / 2.0),
        palette::CANDLE_GLOW
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="140" text-anchor="middle" font-family="{FONT_STACK}" font-size="22" letter-spacing="8" fill="{}" opacity="0.8">圣诞树共读活动</text>"#,
        fmt(width / 2.0),
        palette::CANDLE
    );

    let mut y = HEADER_ZONE;
    for band in trees.chunks(2) {
        let band_h = band
            .iter()
            .map(|(_, l)| tree_height(l, params))
            .fold(0.0, f64::max);
        for (i, (group, layout)) in band.iter().enumerate() {
            let x = if band.len() == 1 {
                // Odd last tree is centered.
                (width - TREE_WIDTH) / 2.0
            } else {
                FOREST_MARGIN_X + i as f64 * (TREE_WIDTH + FOREST_GAP_X)
            };
            // Trees in a band share a bottom edge.
            let tree_y = y + band_h - tree_height(layout, params);
            let scheme = palette::scheme_for(&group.id);
            let _ = writeln!(
                svg,
                r#"<g transform="translate({} {})">"#,
                fmt(x),
                fmt(tree_y)
            );
            svg.push_str(&tree_markup(group, layout, &scheme, params));
            let _ = writeln!(svg, "</g>");
        }
        y += band_h + FOREST_GAP_Y;
    }

    // Footer.
    let footer_y = height - FOOTER_ZONE + 50.0;
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{FONT_STACK}" font-size="16" fill="white" opacity="0.7">与月言书 · 明亮的夜晚</text>"#,
        fmt(width / 2.0),
        fmt(footer_y)
    );
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="{FONT_STACK}" font-size="14" letter-spacing="6" fill="white" opacity="0.4">MERRY CHRISTMAS · 2025</text>"#,
        fmt(width / 2.0),
        fmt(footer_y + 34.0)
    );

    // Snow overlay on top of everything.
    svg.push_str(&snow_markup(snow));
    svg.push_str("</svg>\n");

    ForestScene {
        svg,
        canvas: forest_canvas(trees, params),
    }
}

/// Snow flakes as plain white circles.
pub fn snow_markup(snow: &Snowfield) -> String {
    let mut out = String::new();
    let _ = writeln!(out, r#"<g fill="white" opacity="0.8">"#);
    for f in snow.flakes() {
        let _ = writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}"/>"#,
            fmt(f.pos.x),
            fmt(f.pos.y),
            fmt(f.radius)
        );
    }
    let _ = writeln!(out, "</g>");
    out
}

pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn fmt(v: f64) -> String {
    // Two decimals keeps the markup readable and is well below a pixel.
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn star_path(cx: f64, cy: f64, outer: f64, inner: f64) -> String {
    let mut d = String::new();
    for i in 0..10 {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = std::f64::consts::PI * (-0.5 + i as f64 / 5.0);
        let (x, y) = (cx + r * angle.cos(), cy + r * angle.sin());
        if i == 0 {
            let _ = write!(d, "M {} {}", fmt(x), fmt(y));
        } else {
            let _ = write!(d, " L {} {}", fmt(x), fmt(y));
        }
    }
    d.push_str(" Z");
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CharCountEstimator, layout_tree};
    use crate::model::ReadingRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_group() -> (TreeGroup, TreeLayout, LayoutParams) {
        let group = TreeGroup {
            id: "1号".to_string(),
            records: vec![
                ReadingRecord {
                    group_id: "1号".to_string(),
                    member: "阿月".to_string(),
                    word_count: 120_000,
                    title: "雪国".to_string(),
                    review: None,
                },
                ReadingRecord {
                    group_id: "1号".to_string(),
                    member: "青豆".to_string(),
                    word_count: 300_000,
                    title: "百年孤独".to_string(),
                    review: Some("魔幻".to_string()),
                },
            ],
        };
        let params = LayoutParams::default();
        let estimator = CharCountEstimator::from_params(&params);
        let mut rng = StdRng::seed_from_u64(11);
        let layout = layout_tree(&group.sorted_titles(), &params, &estimator, &mut rng);
        (group, layout, params)
    }

    #[test]
    fn tree_svg_contains_rows_ribbon_and_caption() {
        let (group, layout, params) = sample_group();
        let svg = tree_svg(&group, &layout, &params);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("《雪国》"));
        assert!(svg.contains("《百年孤独》"));
        assert!(svg.contains("C "), "ribbon cubic path missing");
        assert!(svg.contains("2 COLLECTED VOLUMES"));
        assert!(svg.contains("Tree 1"));
    }

    #[test]
    fn titles_are_xml_escaped() {
        assert_eq!(xml_escape("R&D <tag>"), "R&amp;D &lt;tag&gt;");
    }

    #[test]
    fn fmt_trims_trailing_zeroes() {
        assert_eq!(fmt(44.0), "44");
        assert_eq!(fmt(12.5), "12.5");
        assert_eq!(fmt(0.666), "0.67");
    }

    #[test]
    fn forest_canvas_matches_scene_dimensions() {
        let (group, layout, params) = sample_group();
        let trees = vec![(group, layout)];
        let canvas = forest_canvas(&trees, &params);
        let mut rng = StdRng::seed_from_u64(5);
        let snow = Snowfield::new(canvas, 10, &mut rng);
        let scene = forest_svg(&trees, &snow, &params);
        assert_eq!(scene.canvas, canvas);
    }

    #[test]
    fn forest_scene_reports_canvas_dimensions() {
        let (group, layout, params) = sample_group();
        let canvas = Canvas::new(824, 600).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let snow = Snowfield::new(canvas, 40, &mut rng);
        let scene = forest_svg(&[(group, layout)], &snow, &params);
        assert!(scene.svg.contains("The Reading Forest"));
        assert!(scene.canvas.width > 0 && scene.canvas.height > 0);
    }
}
