use log::debug;

use crate::catalog::CatalogItem;

/// Horizontal distance a drag must cover to count as a swipe.
pub const MIN_SWIPE_DISTANCE_PX: f32 = 50.0;

/* ───────────────────────── navigator ────────────────────────────── */

/// Full-view overlay state: closed, or open on one item of the
/// displayed set. Selection is by identity (name), so the subject
/// survives layout changes; position lookups are a linear scan over
/// the displayed set (tens of items at most).
#[derive(Default)]
pub struct Lightbox {
    selected: Option<String>,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Open on `name`, but only if it is currently displayed.
    pub fn open(&mut self, catalog: &[CatalogItem], displayed: &[usize], name: &str) {
        if position_of(catalog, displayed, name).is_some() {
            self.selected = Some(name.to_owned());
        }
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Advance to the following displayed item; no-op on the last one
    /// (clamps, never wraps).
    pub fn next(&mut self, catalog: &[CatalogItem], displayed: &[usize]) {
        let Some(pos) = self.position(catalog, displayed) else {
            return;
        };
        if pos + 1 < displayed.len() {
            self.selected = Some(catalog[displayed[pos + 1]].name.to_owned());
        }
    }

    /// Step back; no-op on the first displayed item.
    pub fn previous(&mut self, catalog: &[CatalogItem], displayed: &[usize]) {
        let Some(pos) = self.position(catalog, displayed) else {
            return;
        };
        if pos > 0 {
            self.selected = Some(catalog[displayed[pos - 1]].name.to_owned());
        }
    }

    /// Position of the subject within the displayed set.
    pub fn position(&self, catalog: &[CatalogItem], displayed: &[usize]) -> Option<usize> {
        position_of(catalog, displayed, self.selected.as_deref()?)
    }

    /// 1-based position and total, for the `3/13` counter.
    pub fn counter(&self, catalog: &[CatalogItem], displayed: &[usize]) -> Option<(usize, usize)> {
        self.position(catalog, displayed)
            .map(|pos| (pos + 1, displayed.len()))
    }

    /// The displayed set changed underneath us. If the subject was
    /// filtered out, auto-close rather than keep a dangling selection.
    pub fn revalidate(&mut self, catalog: &[CatalogItem], displayed: &[usize]) {
        if self.selected.is_some() && self.position(catalog, displayed).is_none() {
            debug!("lightbox subject filtered out; closing");
            self.selected = None;
        }
    }
}

fn position_of(catalog: &[CatalogItem], displayed: &[usize], name: &str) -> Option<usize> {
    displayed.iter().position(|&i| catalog[i].name == name)
}

/* ───────────────────────── swipe gesture ────────────────────────── */

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwipeNav {
    Next,
    Previous,
}

/// Tracks one horizontal drag: the x coordinate at gesture start and
/// the latest x seen while moving. The latest coordinate is cleared at
/// the start of every gesture so a stale value from the previous drag
/// can never fire a swipe.
#[derive(Default)]
pub struct SwipeState {
    start_x: Option<f32>,
    latest_x: Option<f32>,
}

impl SwipeState {
    pub fn begin(&mut self, x: f32) {
        self.latest_x = None;
        self.start_x = Some(x);
    }

    pub fn update(&mut self, x: f32) {
        if self.start_x.is_some() {
            self.latest_x = Some(x);
        }
    }

    /// End the gesture. A leftward drag (start right of end) advances;
    /// rightward steps back; short drags and gestures missing either
    /// coordinate do nothing.
    pub fn finish(&mut self) -> Option<SwipeNav> {
        let start = self.start_x.take()?;
        let end = self.latest_x.take()?;
        let distance = start - end;
        if distance > MIN_SWIPE_DISTANCE_PX {
            Some(SwipeNav::Next)
        } else if distance < -MIN_SWIPE_DISTANCE_PX {
            Some(SwipeNav::Previous)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    fn all_displayed() -> Vec<usize> {
        (0..CATALOG.len()).collect()
    }

    #[test]
    fn open_requires_membership_in_displayed_set() {
        let displayed = vec![0, 1, 2]; // beaches only
        let mut lb = Lightbox::default();

        lb.open(CATALOG, &displayed, "rolex");
        assert!(!lb.is_open());

        lb.open(CATALOG, &displayed, "beach");
        assert_eq!(lb.selected(), Some("beach"));
    }

    #[test]
    fn next_and_previous_step_by_identity() {
        let displayed = all_displayed();
        let mut lb = Lightbox::default();
        lb.open(CATALOG, &displayed, "beach-with-palms");

        lb.next(CATALOG, &displayed);
        assert_eq!(lb.selected(), Some("beach-with-palms2"));
        lb.previous(CATALOG, &displayed);
        assert_eq!(lb.selected(), Some("beach-with-palms"));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let displayed = all_displayed();
        let mut lb = Lightbox::default();

        lb.open(CATALOG, &displayed, "beach-with-palms");
        lb.previous(CATALOG, &displayed);
        assert_eq!(lb.selected(), Some("beach-with-palms"));

        lb.open(CATALOG, &displayed, "tissot-watch");
        lb.next(CATALOG, &displayed);
        assert_eq!(lb.selected(), Some("tissot-watch"));
    }

    #[test]
    fn counter_is_one_based() {
        let displayed = all_displayed();
        let mut lb = Lightbox::default();
        lb.open(CATALOG, &displayed, "beach");
        assert_eq!(lb.counter(CATALOG, &displayed), Some((3, 13)));
    }

    #[test]
    fn revalidate_closes_when_subject_is_filtered_out() {
        let mut lb = Lightbox::default();
        let displayed = all_displayed();
        lb.open(CATALOG, &displayed, "rolex");

        let beaches = vec![0, 1, 2];
        lb.revalidate(CATALOG, &beaches);
        assert!(!lb.is_open());
    }

    #[test]
    fn revalidate_keeps_a_still_displayed_subject() {
        let mut lb = Lightbox::default();
        lb.open(CATALOG, &all_displayed(), "beach");
        lb.revalidate(CATALOG, &[0, 1, 2]);
        assert_eq!(lb.selected(), Some("beach"));
    }

    #[test]
    fn leftward_swipe_advances_rightward_steps_back() {
        let mut swipe = SwipeState::default();
        swipe.begin(300.0);
        swipe.update(200.0);
        assert_eq!(swipe.finish(), Some(SwipeNav::Next));

        swipe.begin(200.0);
        swipe.update(300.0);
        assert_eq!(swipe.finish(), Some(SwipeNav::Previous));
    }

    #[test]
    fn short_drags_do_not_navigate() {
        let mut swipe = SwipeState::default();
        swipe.begin(300.0);
        swipe.update(260.0); // 40 px < threshold
        assert_eq!(swipe.finish(), None);
    }

    #[test]
    fn gesture_without_movement_is_ignored() {
        let mut swipe = SwipeState::default();
        swipe.begin(300.0);
        assert_eq!(swipe.finish(), None);
        // no begin at all
        swipe.update(10.0);
        assert_eq!(swipe.finish(), None);
    }

    #[test]
    fn new_gesture_resets_stale_end_coordinate() {
        let mut swipe = SwipeState::default();
        swipe.begin(300.0);
        swipe.update(100.0);
        assert_eq!(swipe.finish(), Some(SwipeNav::Next));

        // a plain tap right after: must not reuse the old end x
        swipe.begin(320.0);
        assert_eq!(swipe.finish(), None);
    }
}
