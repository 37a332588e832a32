//! End-to-end smoke tests: embedded dataset through layout, scene and raster.

use kuusi::{LayoutParams, RenderOptions};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

#[test]
fn forest_scene_rasterizes_to_opaque_pixels() {
    let records = kuusi::parse_records(kuusi::EMBEDDED_RECORDS).unwrap();
    let mut rng = StdRng::seed_from_u64(2025);
    let scene = kuusi::forest_scene(&records, &LayoutParams::default(), &mut rng).unwrap();

    let image = kuusi::rasterize_svg(&scene.svg, RenderOptions { scale: 0.5 }).unwrap();
    assert_eq!(image.width, scene.canvas.width / 2);
    assert!(image.data.len() as u32 == image.width * image.height * 4);

    // The night background guarantees opaque coverage even if no system
    // fonts are installed for the title text.
    let opaque = image
        .data
        .chunks_exact(4)
        .filter(|px| px[3] == 255)
        .count();
    assert!(
        opaque * 10 >= (image.width * image.height) as usize * 9,
        "background fill missing from raster"
    );
}

#[test]
fn single_tree_scene_rasterizes() {
    let records = kuusi::parse_records(kuusi::EMBEDDED_RECORDS).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let svg = kuusi::tree_scene(&records, "1号", &LayoutParams::default(), &mut rng).unwrap();
    let image = kuusi::rasterize_svg(&svg, RenderOptions { scale: 1.0 }).unwrap();
    assert_eq!(image.width, 340);
    assert!(image.height > 340, "five rows plus chrome should be tall");
}

#[test]
fn card_scene_rasterizes_for_every_theme() {
    for theme in [
        kuusi::CardTheme::Moonlight,
        kuusi::CardTheme::Silver,
        kuusi::CardTheme::Paper,
    ] {
        let card = kuusi::ReadingCard {
            name: "鹿鸣".to_string(),
            community_name: "与月言书·明亮的夜晚".to_string(),
            book_count: Some("18 本".to_string()),
            favorite_book: Some("斯通纳".to_string()),
            memorable_quote: Some("你得弄明白自己是谁。".to_string()),
            theme,
            ..kuusi::ReadingCard::default()
        };
        let image = kuusi::rasterize_svg(&kuusi::card_svg(&card), RenderOptions { scale: 1.0 })
            .unwrap_or_else(|e| panic!("theme {theme:?} failed: {e}"));
        assert_eq!(image.width, 420);
    }
}

#[test]
fn layout_geometry_serializes_to_json() {
    let records = kuusi::parse_records(kuusi::EMBEDDED_RECORDS).unwrap();
    let groups = kuusi::group_records(&records);
    let params = LayoutParams::default();
    let estimator = kuusi::CharCountEstimator::from_params(&params);
    let mut rng = StdRng::seed_from_u64(3);

    let layout = kuusi::layout_tree(&groups[0].sorted_titles(), &params, &estimator, &mut rng);
    let json = serde_json::to_string_pretty(&layout).unwrap();
    let back: kuusi::TreeLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(back.rows.len(), layout.rows.len());
    assert_eq!(back.segments.len(), layout.segments.len());
}
