use crate::catalog::AssetVariant;

/* ───────────────────────── breakpoints ──────────────────────────── */

pub const NARROW_BREAKPOINT_PX: f32 = 768.0;
pub const WIDE_BREAKPOINT_PX: f32 = 1024.0;

/// Breakpoint bucket for the current window width. Controls column
/// count and which asset variant the grid requests.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayoutMode {
    Narrow,
    Medium,
    Wide,
}

impl LayoutMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Narrow => "Narrow",
            Self::Medium => "Medium",
            Self::Wide => "Wide",
        }
    }
}

/// Pure function of the current width only; no history.
pub fn select_layout(viewport_width_px: f32) -> LayoutMode {
    if viewport_width_px < NARROW_BREAKPOINT_PX {
        LayoutMode::Narrow
    } else if viewport_width_px < WIDE_BREAKPOINT_PX {
        LayoutMode::Medium
    } else {
        LayoutMode::Wide
    }
}

/* ───────────────────────── partitioning ─────────────────────────── */

/// Columns for a displayed set of `displayed_len` items. Wide layouts
/// collapse when there is too little to fill three columns.
pub fn column_count(mode: LayoutMode, displayed_len: usize) -> usize {
    match mode {
        LayoutMode::Narrow => 1,
        LayoutMode::Medium => 2,
        LayoutMode::Wide => match displayed_len {
            0 | 1 => 1,
            2 => 2,
            _ => 3,
        },
    }
}

/// Assign tile positions to columns by `index mod columns`. Stable,
/// content-independent; columns end up equal in cardinality ± 1, not
/// equal in height.
pub fn partition_columns(displayed_len: usize, columns: usize) -> Vec<Vec<usize>> {
    let columns = columns.max(1);
    let mut out = vec![Vec::new(); columns];
    for tile in 0..displayed_len {
        out[tile % columns].push(tile);
    }
    out
}

/// Which rendition the grid loads. The single-column Wide case shows
/// one large tile and still uses the reduced asset; only the full
/// three-column grid pays for full-size images.
pub fn asset_variant(mode: LayoutMode, columns: usize) -> AssetVariant {
    match mode {
        LayoutMode::Narrow => AssetVariant::Full,
        LayoutMode::Medium => AssetVariant::Small,
        LayoutMode::Wide => {
            if columns >= 3 {
                AssetVariant::Full
            } else {
                AssetVariant::Small
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_buckets_are_history_free() {
        assert_eq!(select_layout(1200.0), LayoutMode::Wide);
        assert_eq!(select_layout(900.0), LayoutMode::Medium);
        assert_eq!(select_layout(600.0), LayoutMode::Narrow);
        // boundaries: 768 is Medium, 1024 is Wide
        assert_eq!(select_layout(767.9), LayoutMode::Narrow);
        assert_eq!(select_layout(768.0), LayoutMode::Medium);
        assert_eq!(select_layout(1023.9), LayoutMode::Medium);
        assert_eq!(select_layout(1024.0), LayoutMode::Wide);
    }

    #[test]
    fn wide_column_count_depends_on_displayed_len() {
        assert_eq!(column_count(LayoutMode::Wide, 1), 1);
        assert_eq!(column_count(LayoutMode::Wide, 2), 2);
        assert_eq!(column_count(LayoutMode::Wide, 3), 3);
        assert_eq!(column_count(LayoutMode::Wide, 13), 3);
        assert_eq!(column_count(LayoutMode::Medium, 13), 2);
        assert_eq!(column_count(LayoutMode::Narrow, 13), 1);
    }

    #[test]
    fn partition_mod3_balances_cardinality() {
        let cols = partition_columns(13, 3);
        assert_eq!(cols.len(), 3);
        let sizes: Vec<usize> = cols.iter().map(Vec::len).collect();
        assert_eq!(sizes, [5, 4, 4]);
        for (c, col) in cols.iter().enumerate() {
            assert!(col.iter().all(|&t| t % 3 == c));
            assert!(col.windows(2).all(|w| w[0] < w[1]), "order preserved");
        }
        let mut union: Vec<usize> = cols.into_iter().flatten().collect();
        union.sort_unstable();
        assert_eq!(union, (0..13).collect::<Vec<_>>());
    }

    #[test]
    fn partition_cardinality_within_one() {
        for n in 0..40 {
            for c in 1..=3 {
                let sizes: Vec<usize> =
                    partition_columns(n, c).iter().map(Vec::len).collect();
                let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
                assert!(max - min <= 1, "n={n} c={c} sizes={sizes:?}");
            }
        }
    }

    #[test]
    fn variant_follows_mode_and_columns() {
        assert_eq!(asset_variant(LayoutMode::Narrow, 1), AssetVariant::Full);
        assert_eq!(asset_variant(LayoutMode::Medium, 2), AssetVariant::Small);
        assert_eq!(asset_variant(LayoutMode::Wide, 1), AssetVariant::Small);
        assert_eq!(asset_variant(LayoutMode::Wide, 2), AssetVariant::Small);
        assert_eq!(asset_variant(LayoutMode::Wide, 3), AssetVariant::Full);
    }
}
