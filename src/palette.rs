//! Vintage Christmas-card colors and the per-tree schemes built from them.

pub const POINSETTA_RED: &str = "#b3302e";
pub const RUSTIC_WOOD: &str = "#a4652f";
pub const DARK_TRUFFLE: &str = "#3e2723";
pub const MISTLETOE_SHADOW: &str = "#1c2b21";
pub const DARK_CHOCOLATE: &str = "#4a2c20";
pub const BOW: &str = "#c94f4f";
pub const WARM_WOOD: &str = "#8a5a33";
pub const CANDLE: &str = "#f6e7c1";
pub const LEAF: &str = "#4f7942";
pub const JUNIPER: &str = "#3a5a40";
pub const COOKIES: &str = "#d9b382";
pub const BERRY_KISS: &str = "#8e2f3c";
pub const CANDLE_GLOW: &str = "#f5d491";
pub const WINTER_GARDEN: &str = "#6b8f71";

/// Night-sky background the forest sits on.
pub const NIGHT: &str = "#050505";

/// Row colors plus the accent used for the star and caption of one tree.
#[derive(Clone, Copy, Debug)]
pub struct TreeScheme {
    pub palette: &'static [&'static str],
    pub accent: &'static str,
}

const BASE: TreeScheme = TreeScheme {
    palette: &[POINSETTA_RED, RUSTIC_WOOD, LEAF, BERRY_KISS, JUNIPER, BOW],
    accent: CANDLE_GLOW,
};

/// The fixed scheme for a group id; unknown ids fall back to the base
/// palette.
pub fn scheme_for(group_id: &str) -> TreeScheme {
    match group_id {
        "1号" => TreeScheme {
            palette: &[POINSETTA_RED, BERRY_KISS, BOW, DARK_CHOCOLATE],
            accent: CANDLE_GLOW,
        },
        "2号" => TreeScheme {
            palette: &[LEAF, JUNIPER, MISTLETOE_SHADOW, WINTER_GARDEN],
            accent: CANDLE,
        },
        "3号" => TreeScheme {
            palette: &[RUSTIC_WOOD, DARK_TRUFFLE, WARM_WOOD, COOKIES],
            accent: CANDLE_GLOW,
        },
        "4号" => TreeScheme {
            palette: &[BOW, POINSETTA_RED, DARK_CHOCOLATE, BERRY_KISS],
            accent: CANDLE,
        },
        "5号" => TreeScheme {
            palette: &[WINTER_GARDEN, JUNIPER, LEAF, MISTLETOE_SHADOW],
            accent: CANDLE_GLOW,
        },
        _ => BASE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_groups_have_distinct_schemes() {
        let a = scheme_for("1号");
        let b = scheme_for("2号");
        assert_ne!(a.palette[0], b.palette[0]);
    }

    #[test]
    fn unknown_group_falls_back_to_base() {
        let s = scheme_for("9号");
        assert_eq!(s.palette[0], POINSETTA_RED);
        assert_eq!(s.accent, CANDLE_GLOW);
    }

    #[test]
    fn fallback_palette_keeps_all_six_colors() {
        let s = scheme_for("临时组");
        assert_eq!(s.palette.len(), 6);
        assert!(s.palette.contains(&JUNIPER));
        assert!(s.palette.contains(&BOW));
    }
}
