use std::collections::HashSet;

use crate::layout::LayoutMode;

/// Intersection ratio at which a tile counts as "entered the viewport".
pub const VISIBILITY_THRESHOLD: f32 = 0.4;

/// Remembers which tile positions have been seen on screen during the
/// current rendering epoch, to drive a one-shot reveal fade per tile.
///
/// Tile indices are positions within the displayed set, so they are
/// only meaningful while (layout mode, displayed set) is unchanged.
/// The tracker owns that epoch key and clears itself when either part
/// changes; callers just keep calling [`sync_epoch`](Self::sync_epoch)
/// every frame and can never leak stale indices across a rebuild.
#[derive(Default)]
pub struct VisibilityTracker {
    epoch: Option<(LayoutMode, Vec<usize>)>,
    revealed: HashSet<usize>,
    generation: u64,
}

impl VisibilityTracker {
    /// Compare against the current (mode, displayed) epoch and clear
    /// the revealed set when it changed.
    pub fn sync_epoch(&mut self, mode: LayoutMode, displayed: &[usize]) {
        let changed = match &self.epoch {
            Some((m, d)) => *m != mode || d.as_slice() != displayed,
            None => true,
        };
        if changed {
            self.revealed.clear();
            self.generation = self.generation.wrapping_add(1);
            self.epoch = Some((mode, displayed.to_vec()));
        }
    }

    /// Record one viewport observation for a tile. Idempotent: a tile
    /// that re-enters neither duplicates nor toggles off.
    pub fn observe(&mut self, tile: usize, intersection_ratio: f32) {
        if intersection_ratio >= VISIBILITY_THRESHOLD {
            self.revealed.insert(tile);
        }
    }

    pub fn is_active(&self, tile: usize) -> bool {
        self.revealed.contains(&tile)
    }

    /// Bumped on every epoch reset; used to key per-epoch animations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    fn revealed_sorted(&self) -> Vec<usize> {
        let mut v: Vec<usize> = self.revealed.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_is_monotonic_and_idempotent() {
        let mut tracker = VisibilityTracker::default();
        tracker.sync_epoch(LayoutMode::Wide, &[0, 1, 2, 3]);

        tracker.observe(2, 0.9);
        tracker.observe(2, 0.5); // re-entering does not toggle off
        tracker.observe(0, 1.0);
        assert_eq!(tracker.revealed_sorted(), [0, 2]);
        assert!(tracker.is_active(2));
    }

    #[test]
    fn observations_below_threshold_are_ignored() {
        let mut tracker = VisibilityTracker::default();
        tracker.sync_epoch(LayoutMode::Narrow, &[0, 1]);

        tracker.observe(0, 0.39);
        assert!(!tracker.is_active(0));
        tracker.observe(0, 0.4);
        assert!(tracker.is_active(0));
    }

    #[test]
    fn displayed_change_clears_revealed_set() {
        let mut tracker = VisibilityTracker::default();
        tracker.sync_epoch(LayoutMode::Wide, &[0, 1, 2]);
        tracker.observe(2, 1.0);

        // filter change: different displayed set, then tile 0 revealed
        tracker.sync_epoch(LayoutMode::Wide, &[1, 2]);
        tracker.observe(0, 1.0);
        assert_eq!(tracker.revealed_sorted(), [0]);
    }

    #[test]
    fn layout_change_clears_revealed_set() {
        let mut tracker = VisibilityTracker::default();
        tracker.sync_epoch(LayoutMode::Wide, &[0, 1, 2]);
        tracker.observe(1, 1.0);
        let gen = tracker.generation();

        tracker.sync_epoch(LayoutMode::Medium, &[0, 1, 2]);
        assert!(!tracker.is_active(1));
        assert_ne!(tracker.generation(), gen);
    }

    #[test]
    fn unchanged_epoch_keeps_revealed_set() {
        let mut tracker = VisibilityTracker::default();
        tracker.sync_epoch(LayoutMode::Medium, &[3, 4]);
        tracker.observe(0, 0.8);

        tracker.sync_epoch(LayoutMode::Medium, &[3, 4]);
        assert!(tracker.is_active(0));
    }
}
