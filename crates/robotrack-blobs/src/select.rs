use serde::{Deserialize, Serialize};

use crate::component::Component;

/// Inclusive plausible pixel-count range for a marker.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SizeWindow {
    pub min: u32,
    pub max: u32,
}

impl Default for SizeWindow {
    fn default() -> Self {
        Self { min: 320, max: 520 }
    }
}

impl SizeWindow {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, pixel_count: u32) -> bool {
        pixel_count >= self.min && pixel_count <= self.max
    }

    pub fn is_valid(&self) -> bool {
        self.max > 0 && self.min <= self.max
    }
}

/// How many components of one color survive selection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstancePolicy {
    /// Body colors: keep the largest survivor.
    Single,
    /// Heading markers: keep the first `k` survivors in scan order.
    ///
    /// Not the `k` largest: when noise passes the size window ahead of a real
    /// marker, the marker is dropped.
    FirstK(usize),
}

/// Outcome of selecting the components of one color.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub kept: Vec<Component>,
    /// Components offered before the size filter.
    pub candidates: usize,
    /// Components inside the size window.
    pub in_window: usize,
}

impl Selection {
    /// Nothing survived: the color is not detected this frame.
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// More plausible components than slots; resolved by the policy.
    pub fn is_ambiguous(&self) -> bool {
        self.in_window > self.kept.len()
    }
}

/// Largest survivor of the size window; the earliest one wins ties.
pub fn select_largest(components: &[Component], window: SizeWindow) -> Option<Component> {
    let mut best: Option<Component> = None;
    for c in components.iter().filter(|c| window.contains(c.pixel_count)) {
        match best {
            Some(b) if b.pixel_count >= c.pixel_count => {}
            _ => best = Some(*c),
        }
    }
    best
}

/// First `k` survivors of the size window, in input order.
pub fn select_first_k(components: &[Component], window: SizeWindow, k: usize) -> Vec<Component> {
    components
        .iter()
        .filter(|c| window.contains(c.pixel_count))
        .take(k)
        .copied()
        .collect()
}

/// Filter `components` by size and reduce them according to `policy`.
pub fn select(components: &[Component], window: SizeWindow, policy: InstancePolicy) -> Selection {
    let in_window = components
        .iter()
        .filter(|c| window.contains(c.pixel_count))
        .count();
    let kept = match policy {
        InstancePolicy::Single => select_largest(components, window).into_iter().collect(),
        InstancePolicy::FirstK(k) => select_first_k(components, window, k),
    };
    Selection {
        kept,
        candidates: components.len(),
        in_window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use robotrack_core::BoundingBox;

    fn blob(pixel_count: u32, x: f32) -> Component {
        Component {
            pixel_count,
            centroid: Point2::new(x, 0.0),
            bbox: BoundingBox::from_point(x as u32, 0),
        }
    }

    #[test]
    fn single_instance_keeps_the_largest_plausible_blob() {
        let blobs = [blob(200, 10.0), blob(400, 50.0)];
        let sel = select(&blobs, SizeWindow::new(320, 520), InstancePolicy::Single);
        assert_eq!(sel.kept, vec![blobs[1]]);
        assert_eq!(sel.candidates, 2);
        assert_eq!(sel.in_window, 1);
        assert!(!sel.is_ambiguous());
    }

    #[test]
    fn labeled_mask_drops_the_small_blob() {
        use crate::label::label_components;
        use crate::roi::foreground_roi;
        use robotrack_core::Mask;

        let mut m = Mask::new(60, 40);
        m.fill_rect(2, 2, 11, 21); // 10 x 20 = 200 px
        m.fill_rect(30, 5, 49, 24); // 20 x 20 = 400 px
        let roi = foreground_roi(&m.view()).expect("roi");
        let components = label_components(&m.view(), roi).components;
        assert_eq!(components.len(), 2);

        let sel = select(&components, SizeWindow::new(320, 520), InstancePolicy::Single);
        assert_eq!(sel.kept.len(), 1);
        assert_eq!(sel.kept[0].pixel_count, 400);
        assert_eq!(sel.kept[0].centroid, Point2::new(39.5, 14.5));
    }

    #[test]
    fn single_instance_prefers_earliest_on_ties() {
        let blobs = [blob(330, 1.0), blob(500, 2.0), blob(500, 3.0)];
        let sel = select(&blobs, SizeWindow::default(), InstancePolicy::Single);
        assert_eq!(sel.kept, vec![blobs[1]]);
        assert!(sel.is_ambiguous());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let w = SizeWindow::new(320, 520);
        assert!(w.contains(320));
        assert!(w.contains(520));
        assert!(!w.contains(319));
        assert!(!w.contains(521));
    }

    #[test]
    fn nothing_in_window_means_not_detected() {
        let blobs = [blob(12, 1.0), blob(9000, 2.0)];
        let sel = select(&blobs, SizeWindow::default(), InstancePolicy::Single);
        assert!(sel.is_empty());
        assert!(select(&[], SizeWindow::default(), InstancePolicy::FirstK(3)).is_empty());
    }

    #[test]
    fn first_k_follows_scan_order_not_size() {
        let blobs = [
            blob(330, 1.0),
            blob(100, 2.0),
            blob(340, 3.0),
            blob(350, 4.0),
            blob(510, 5.0),
        ];
        let sel = select(&blobs, SizeWindow::default(), InstancePolicy::FirstK(3));
        let xs: Vec<f32> = sel.kept.iter().map(|c| c.centroid.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 4.0]);
        assert_eq!(sel.in_window, 4);
        assert!(sel.is_ambiguous());
    }
}
