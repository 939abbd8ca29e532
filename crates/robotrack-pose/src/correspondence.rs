//! Pairing heading markers with body blobs and turning each pair into a
//! compass heading.
//!
//! Angles use an upward y axis: the image row coordinate is flipped against
//! the frame height before `atan2`. The compass heading is 0° straight up
//! and grows clockwise.

use nalgebra::Point2;
use robotrack_blobs::Component;
use serde::{Deserialize, Serialize};

/// Angle in degrees, in `(-180, 180]`, of the vector from `marker` to `body`
/// with the y axis pointing up.
pub fn direction_angle_deg(marker: &Point2<f32>, body: &Point2<f32>, frame_height: usize) -> f32 {
    let h = frame_height as f64;
    let dx = body.x as f64 - marker.x as f64;
    let dy = (h - body.y as f64) - (h - marker.y as f64);
    dy.atan2(dx).to_degrees() as f32
}

/// Map a math angle (0° = +x, counter-clockwise) to a compass heading in `[0, 360)`.
pub fn compass_heading(angle_deg: f32) -> f32 {
    if (0.0..=90.0).contains(&angle_deg) {
        90.0 - angle_deg
    } else if angle_deg > 90.0 {
        360.0 + (90.0 - angle_deg)
    } else {
        90.0 + (-angle_deg)
    }
}

/// [`compass_heading`] truncated to whole degrees.
pub fn heading_degrees(angle_deg: f32) -> u16 {
    (compass_heading(angle_deg).trunc() as u16).min(359)
}

/// Slot and distance of the detected body closest to `point`.
///
/// The lowest slot wins ties. `None` when no body is detected.
pub fn nearest_body(point: &Point2<f32>, bodies: &[Option<Component>]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (slot, body) in bodies.iter().enumerate() {
        let Some(body) = body else { continue };
        let d = nalgebra::distance(point, &body.centroid);
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((slot, d)),
        }
    }
    best
}

/// One heading marker assigned to its nearest body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadingMatch {
    /// Index into the marker list handed to [`match_headings`].
    pub marker: usize,
    pub slot: usize,
    pub distance: f32,
    pub angle_deg: f32,
    /// `None` when `distance` exceeds the validity threshold.
    pub heading: Option<u16>,
}

impl HeadingMatch {
    pub fn is_confident(&self) -> bool {
        self.heading.is_some()
    }
}

/// Assign every marker to its nearest detected body.
///
/// Markers with no detected body at all are dropped.
pub fn match_headings(
    markers: &[Component],
    bodies: &[Option<Component>],
    frame_height: usize,
    max_distance: f32,
) -> Vec<HeadingMatch> {
    markers
        .iter()
        .enumerate()
        .filter_map(|(i, marker)| {
            let (slot, distance) = nearest_body(&marker.centroid, bodies)?;
            let body = bodies[slot].as_ref()?;
            let angle_deg = direction_angle_deg(&marker.centroid, &body.centroid, frame_height);
            let heading = (distance <= max_distance).then(|| heading_degrees(angle_deg));
            Some(HeadingMatch {
                marker: i,
                slot,
                distance,
                angle_deg,
                heading,
            })
        })
        .collect()
}

/// Per slot, the closest marker assigned to it (earlier marker on ties).
pub fn resolve_body_headings(matches: &[HeadingMatch], slots: usize) -> Vec<Option<HeadingMatch>> {
    let mut out: Vec<Option<HeadingMatch>> = vec![None; slots];
    for m in matches {
        let Some(entry) = out.get_mut(m.slot) else {
            continue;
        };
        match entry {
            Some(best) if best.distance <= m.distance => {}
            _ => *entry = Some(*m),
        }
    }
    out
}
