use nalgebra::Point2;
use robotrack_core::Mask;
use robotrack_pose::{
    ExtractionStrategy, FrameIssue, FrameResult, HeadingSearchMode, RobotTracker, TrackerParams,
};

const W: usize = 640;
const H: usize = 480;
const RADIUS: i64 = 11;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Masks for red, green, blue (bodies) and yellow (heading), in that order.
struct Scene {
    masks: Vec<Mask>,
    body_pixels: Vec<usize>,
}

impl Scene {
    fn new() -> Self {
        Self {
            masks: (0..4).map(|_| Mask::new(W, H)).collect(),
            body_pixels: vec![0; 3],
        }
    }

    fn body(&mut self, slot: usize, cx: i64, cy: i64) -> &mut Self {
        self.body_pixels[slot] += self.masks[slot].fill_disk(cx, cy, RADIUS);
        self
    }

    fn marker(&mut self, cx: i64, cy: i64) -> &mut Self {
        self.masks[3].fill_disk(cx, cy, RADIUS);
        self
    }

    fn track(&self, params: TrackerParams) -> FrameResult {
        init_logging();
        let tracker = RobotTracker::new(params).expect("valid params");
        let views: Vec<_> = self.masks.iter().map(Mask::view).collect();
        tracker.track(&views).expect("well-formed frame")
    }
}

/// Robots spread over the frame; markers 22px from their bodies.
/// red: marker below (heading 0), green: marker left (90), blue: marker above (180).
fn spread_scene() -> Scene {
    let mut s = Scene::new();
    s.body(0, 100, 100).marker(100, 122);
    s.body(1, 320, 240).marker(298, 240);
    s.body(2, 500, 380).marker(500, 358);
    s
}

fn headings(frame: &FrameResult) -> Vec<Option<u16>> {
    frame.poses.iter().map(|p| p.orientation_deg).collect()
}

#[test]
fn spread_robots_use_labeling() {
    let scene = spread_scene();
    let frame = scene.track(TrackerParams::default());

    assert_eq!(frame.strategy, Some(ExtractionStrategy::Labeling));
    assert_eq!(frame.detected_count(), 3);
    assert_eq!(headings(&frame), vec![Some(0), Some(90), Some(180)]);
    assert!(frame.issues.is_empty(), "issues: {:?}", frame.issues);

    let red = &frame.poses[0];
    assert_eq!(red.channel, "red");
    assert_eq!(red.position, Point2::new(100.0, 100.0));
    assert_eq!(red.pixel_count as usize, scene.body_pixels[0]);
    let bbox = red.bounding_box.expect("red box");
    assert_eq!((bbox.min_x, bbox.max_x), (89, 111));
}

#[test]
fn clustered_robots_use_direct_counting() {
    // ROI 146 x 104, under a quarter of 640 x 480
    let mut scene = Scene::new();
    scene.body(0, 250, 200).marker(228, 200);
    scene.body(1, 330, 200).marker(352, 200);
    scene.body(2, 290, 260).marker(290, 282);
    let frame = scene.track(TrackerParams::default());

    assert_eq!(frame.strategy, Some(ExtractionStrategy::DirectCount));
    assert_eq!(headings(&frame), vec![Some(90), Some(270), Some(0)]);
    for (pose, &pixels) in frame.poses.iter().zip(&scene.body_pixels) {
        assert_eq!(pose.pixel_count as usize, pixels);
    }
    assert_eq!(frame.searches.len(), 3);
    assert!(frame.searches.iter().all(|s| !s.clipped));
}

#[test]
fn global_search_agrees_with_local_search() {
    let scene = spread_scene();
    let mut params = TrackerParams::default();
    params.heading_search.mode = HeadingSearchMode::Global;
    let global = scene.track(params);
    let local = scene.track(TrackerParams::default());

    assert!(global.searches.is_empty());
    assert_eq!(global.headings.len(), 3);
    assert_eq!(headings(&global), headings(&local));
    // scan order: the top-most marker comes first
    assert_eq!(global.headings[0].correspondence, Some(0));
}

#[test]
fn empty_frame_reports_sentinels() {
    let frame = Scene::new().track(TrackerParams::default());
    assert_eq!(frame.roi, None);
    assert_eq!(frame.poses.len(), 3);
    for pose in &frame.poses {
        assert!(!pose.detected);
        assert_eq!(pose.position, Point2::new(320.0, 240.0));
        assert_eq!(pose.orientation_deg, None);
    }
    let missing: Vec<&FrameIssue> = frame
        .issues
        .iter()
        .filter(|i| matches!(i, FrameIssue::NoForegroundPixels { .. }))
        .collect();
    assert_eq!(missing.len(), 3);
}

#[test]
fn window_at_the_frame_corner_is_clipped() {
    let mut scene = spread_scene();
    scene.masks[0] = Mask::new(W, H);
    scene.body(0, 12, 12).marker(12, 34);
    let frame = scene.track(TrackerParams::default());

    assert!(frame.searches[0].clipped);
    assert!(frame
        .issues
        .contains(&FrameIssue::WindowOutOfBounds { slot: 0 }));
    assert_eq!(frame.poses[0].orientation_deg, Some(0));
}

#[test]
fn distant_marker_invalidates_heading_only() {
    let mut scene = Scene::new();
    scene.body(0, 100, 100).marker(100, 140);
    scene.body(1, 320, 240).marker(298, 240);
    scene.body(2, 500, 380).marker(500, 358);
    let mut params = TrackerParams::default();
    params.heading_search.mode = HeadingSearchMode::Global;
    let frame = scene.track(params);

    let red = &frame.poses[0];
    assert!(red.detected);
    assert_eq!(red.position, Point2::new(100.0, 100.0));
    assert_eq!(red.orientation_deg, None);
    assert!(frame.issues.iter().any(|i| matches!(
        i,
        FrameIssue::LowConfidenceMatch { slot: 0, .. }
    )));
    assert_eq!(headings(&frame)[1..], [Some(90), Some(180)]);
}

#[test]
fn implausible_body_size_is_not_detected() {
    let mut scene = spread_scene();
    scene.masks[1] = Mask::new(W, H);
    scene.masks[1].fill_disk(320, 240, 5);
    let frame = scene.track(TrackerParams::default());

    let green = &frame.poses[1];
    assert!(!green.detected);
    assert_eq!(green.position, Point2::new(320.0, 240.0));
    assert_eq!(green.orientation_deg, None);
    assert!(frame.issues.contains(&FrameIssue::NoForegroundPixels {
        channel: "green".into()
    }));
    assert_eq!(frame.poses[0].orientation_deg, Some(0));
}

#[test]
fn duplicate_body_color_keeps_the_larger_blob() {
    let mut scene = spread_scene();
    scene.masks[2].fill_disk(560, 80, RADIUS + 1);
    let frame = scene.track(TrackerParams::default());

    assert_eq!(frame.poses[2].position, Point2::new(560.0, 80.0));
    assert!(frame.issues.contains(&FrameIssue::AmbiguousCandidateSet {
        channel: "blue".into(),
        candidates: 2,
        kept: 1
    }));
}

#[test]
fn calibration_divides_positions() {
    let scene = spread_scene();
    let params = TrackerParams {
        pixels_per_unit: Some(2.0),
        ..TrackerParams::default()
    };
    let frame = scene.track(params);
    assert_eq!(frame.poses[1].position, Point2::new(160.0, 120.0));
    assert_eq!(frame.poses[1].position_px, Point2::new(320.0, 240.0));
}

#[test]
fn frames_are_independent() {
    let scene = spread_scene();
    init_logging();
    let tracker = RobotTracker::new(TrackerParams::default()).expect("valid params");
    let views: Vec<_> = scene.masks.iter().map(Mask::view).collect();
    let first = tracker.track(&views).expect("frame");

    let blank: Vec<Mask> = (0..4).map(|_| Mask::new(W, H)).collect();
    let blank_views: Vec<_> = blank.iter().map(Mask::view).collect();
    tracker.track(&blank_views).expect("blank frame");

    let again = tracker.track(&views).expect("frame");
    assert_eq!(first, again);
}

#[test]
fn frame_result_serializes() {
    let frame = spread_scene().track(TrackerParams::default());
    let json = serde_json::to_value(&frame).expect("json");
    assert_eq!(json["poses"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["strategy"], "labeling");
}
