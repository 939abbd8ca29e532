use nalgebra::Point2;
use robotrack_blobs::Component;
use robotrack_core::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::correspondence::HeadingMatch;
use crate::params::MarkerRole;

/// Per-frame state of one body slot or one heading marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedMarker {
    /// Body slot, or index of the heading marker in this frame.
    pub slot: usize,
    pub role: MarkerRole,
    pub pixel_count: u32,
    pub centroid: Option<Point2<f32>>,
    pub bounding_box: Option<BoundingBox>,
    /// Body: the heading marker assigned to it. Heading: its body slot.
    pub correspondence: Option<usize>,
    /// Body only; `None` when no confident heading marker was found.
    pub orientation_deg: Option<u16>,
}

impl TrackedMarker {
    pub fn body(slot: usize, blob: Option<&Component>, heading: Option<&HeadingMatch>) -> Self {
        Self {
            slot,
            role: MarkerRole::Body,
            pixel_count: blob.map_or(0, |b| b.pixel_count),
            centroid: blob.map(|b| b.centroid),
            bounding_box: blob.map(|b| b.bbox),
            correspondence: heading.map(|m| m.marker),
            orientation_deg: heading.and_then(|m| m.heading),
        }
    }

    pub fn heading(index: usize, blob: &Component, matched: Option<&HeadingMatch>) -> Self {
        Self {
            slot: index,
            role: MarkerRole::Heading,
            pixel_count: blob.pixel_count,
            centroid: Some(blob.centroid),
            bounding_box: Some(blob.bbox),
            correspondence: matched.map(|m| m.slot),
            orientation_deg: None,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.centroid.is_some()
    }
}

/// Final per-robot output of one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub slot_id: usize,
    /// Name of the body channel for this slot.
    pub channel: String,
    pub detected: bool,
    /// Body centroid in calibrated units (pixels when no calibration is set).
    /// The frame center when the body was not detected.
    pub position: Point2<f32>,
    pub position_px: Point2<f32>,
    /// Compass heading in `[0, 360)`; `None` when invalid.
    pub orientation_deg: Option<u16>,
    pub bounding_box: Option<BoundingBox>,
    pub pixel_count: u32,
}

/// Position reported for a robot whose body marker was not found.
pub fn sentinel_position(frame_width: usize, frame_height: usize) -> Point2<f32> {
    Point2::new(frame_width as f32 / 2.0, frame_height as f32 / 2.0)
}

/// One [`Pose`] per body slot, in slot order.
///
/// `channels[i]` names slot `i`; positions are divided by `pixels_per_unit`
/// when it is set.
pub fn assemble_poses(
    bodies: &[TrackedMarker],
    channels: &[&str],
    frame_width: usize,
    frame_height: usize,
    pixels_per_unit: Option<f32>,
) -> Vec<Pose> {
    let scale = pixels_per_unit.map_or(1.0, |ppu| 1.0 / ppu);
    bodies
        .iter()
        .enumerate()
        .map(|(slot, body)| {
            let position_px = body
                .centroid
                .unwrap_or_else(|| sentinel_position(frame_width, frame_height));
            Pose {
                slot_id: slot,
                channel: channels.get(slot).copied().unwrap_or_default().to_string(),
                detected: body.is_detected(),
                position: Point2::from(position_px.coords * scale),
                position_px,
                orientation_deg: body.orientation_deg.filter(|_| body.is_detected()),
                bounding_box: body.bounding_box,
                pixel_count: body.pixel_count,
            }
        })
        .collect()
}

/// Rectangle to draw, tagged with the role of the marker it outlines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayBox {
    pub bbox: BoundingBox,
    pub role: MarkerRole,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayText {
    pub anchor: Point2<f32>,
    pub text: String,
}

/// Drawing primitives for an external renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub boxes: Vec<OverlayBox>,
    pub labels: Vec<OverlayText>,
    /// Frame inset by the extent of the largest body blob.
    pub work_area: Option<BoundingBox>,
}

const POSITION_LABEL_X: f32 = 15.0;
const POSITION_LABEL_Y: f32 = 35.0;
const POSITION_LABEL_STEP: f32 = 20.0;

pub fn build_overlay(
    bodies: &[TrackedMarker],
    headings: &[TrackedMarker],
    poses: &[Pose],
    heading_channel: &str,
    frame_width: usize,
    frame_height: usize,
) -> Overlay {
    let mut overlay = Overlay::default();

    for (body, pose) in bodies.iter().zip(poses) {
        if let Some(bbox) = body.bounding_box {
            overlay.boxes.push(OverlayBox {
                bbox,
                role: MarkerRole::Body,
                label: pose.channel.clone(),
            });
        }
    }
    for h in headings {
        if let Some(bbox) = h.bounding_box {
            overlay.boxes.push(OverlayBox {
                bbox,
                role: MarkerRole::Heading,
                label: heading_channel.to_string(),
            });
        }
    }

    for pose in poses {
        let text = match pose.orientation_deg {
            Some(deg) => format!("{deg}"),
            None => "not detected".to_string(),
        };
        overlay.labels.push(OverlayText {
            anchor: pose.position_px,
            text,
        });
    }
    for pose in poses {
        overlay.labels.push(OverlayText {
            anchor: Point2::new(
                POSITION_LABEL_X,
                POSITION_LABEL_Y + POSITION_LABEL_STEP * pose.slot_id as f32,
            ),
            text: format!(
                "{} = ({:.0}, {:.0})",
                pose.channel, pose.position.x, pose.position.y
            ),
        });
    }

    overlay.work_area = work_area(bodies, frame_width, frame_height);
    overlay
}

/// Frame minus a margin equal to the spans of the body box with the largest
/// span area (first one on ties).
fn work_area(bodies: &[TrackedMarker], frame_width: usize, frame_height: usize) -> Option<BoundingBox> {
    let mut largest: Option<BoundingBox> = None;
    for bbox in bodies.iter().filter_map(|b| b.bounding_box) {
        match largest {
            Some(l) if l.span_area() >= bbox.span_area() => {}
            _ => largest = Some(bbox),
        }
    }
    let largest = largest?;
    let (w, h) = (frame_width as i64, frame_height as i64);
    let (mx, my) = (largest.width_span() as i64, largest.height_span() as i64);
    let (x1, y1) = (w - 1 - mx, h - 1 - my);
    if x1 < mx || y1 < my {
        return None;
    }
    Some(BoundingBox {
        min_x: mx as u32,
        min_y: my as u32,
        max_x: x1 as u32,
        max_y: y1 as u32,
    })
}
