//! High-level wiring from records to finished scenes.

use rand::Rng;
use tracing::info;

use crate::{
    error::{KuusiError, KuusiResult},
    layout::{CharCountEstimator, LayoutParams, TreeLayout, layout_tree},
    model::{ReadingRecord, TreeGroup, group_records},
    scene::{self, ForestScene},
    snow::Snowfield,
};

/// Snow flakes scattered over the forest scene.
const SNOW_COUNT: usize = 100;
/// Frames to advance the snow field before a still render.
const SNOW_SETTLE_FRAMES: u32 = 240;

/// Group the records and lay out every tree.
pub fn layout_forest(
    records: &[ReadingRecord],
    params: &LayoutParams,
    rng: &mut impl Rng,
) -> Vec<(TreeGroup, TreeLayout)> {
    let estimator = CharCountEstimator::from_params(params);
    group_records(records)
        .into_iter()
        .map(|group| {
            let layout = layout_tree(&group.sorted_titles(), params, &estimator, rng);
            (group, layout)
        })
        .collect()
}

/// Build the full forest scene: grouped trees, snow overlay, chrome.
pub fn forest_scene(
    records: &[ReadingRecord],
    params: &LayoutParams,
    rng: &mut impl Rng,
) -> KuusiResult<ForestScene> {
    if records.is_empty() {
        return Err(KuusiError::validation("no records to render"));
    }
    let trees = layout_forest(records, params, rng);
    info!(groups = trees.len(), records = records.len(), "laid out forest");

    // Snow circles live in scene coordinates, so size the field from the
    // forest canvas before building the scene.
    let mut snow = Snowfield::new(scene::forest_canvas(&trees, params), SNOW_COUNT, rng);
    snow.settle(SNOW_SETTLE_FRAMES, rng);
    Ok(scene::forest_svg(&trees, &snow, params))
}

/// Build a single group's tree scene.
pub fn tree_scene(
    records: &[ReadingRecord],
    group_id: &str,
    params: &LayoutParams,
    rng: &mut impl Rng,
) -> KuusiResult<String> {
    let estimator = CharCountEstimator::from_params(params);
    let group = group_records(records)
        .into_iter()
        .find(|g| g.id == group_id)
        .ok_or_else(|| KuusiError::validation(format!("unknown group '{group_id}'")))?;
    let layout = layout_tree(&group.sorted_titles(), params, &estimator, rng);
    info!(group = %group.id, rows = layout.rows.len(), "laid out tree");
    Ok(scene::tree_svg(&group, &layout, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EMBEDDED_RECORDS, parse_records};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn forest_scene_covers_every_group() {
        let records = parse_records(EMBEDDED_RECORDS).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let scene = forest_scene(&records, &LayoutParams::default(), &mut rng).unwrap();
        for group in group_records(&records) {
            assert!(
                scene.svg.contains(&format!("Tree {}", group.id.trim_end_matches('号'))),
                "group {} missing from forest scene",
                group.id
            );
        }
    }

    #[test]
    fn forest_scene_rejects_empty_dataset() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(forest_scene(&[], &LayoutParams::default(), &mut rng).is_err());
    }

    #[test]
    fn tree_scene_rejects_unknown_group() {
        let records = parse_records(EMBEDDED_RECORDS).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let err = tree_scene(&records, "42号", &LayoutParams::default(), &mut rng).unwrap_err();
        assert!(err.to_string().contains("unknown group"));
    }
}
