use std::collections::HashSet;

use robotrack_blobs::SizeWindow;
use serde::{Deserialize, Serialize};

/// What a color channel marks on a robot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    /// Primary patch, one color per robot: gives the position.
    Body,
    /// Secondary patch shared by all robots: gives the facing direction.
    Heading,
}

/// One color channel; masks are passed to the tracker in channel order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,
    pub role: MarkerRole,
}

impl ChannelSpec {
    pub fn body(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: MarkerRole::Body,
        }
    }

    pub fn heading(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: MarkerRole::Heading,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingSearchMode {
    /// Direct count of the heading mask in a window around each body blob.
    Local,
    /// Label the heading mask over the frame ROI, keep the first K plausible blobs.
    Global,
}

/// Heading-marker search settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingSearchParams {
    pub mode: HeadingSearchMode,
    /// Window half-extent as a multiple of the body blob's own box extent.
    pub window_scale: f32,
    /// Added to `window_scale`.
    pub window_margin: f32,
}

impl Default for HeadingSearchParams {
    fn default() -> Self {
        Self {
            mode: HeadingSearchMode::Local,
            window_scale: 1.5,
            window_margin: 0.1,
        }
    }
}

impl HeadingSearchParams {
    /// Factor applied to the body box width/height to get the window half-extent.
    pub fn half_extent_factor(&self) -> f32 {
        self.window_scale + self.window_margin
    }
}

/// Configuration of the per-frame tracker.
///
/// Deserializing fills missing fields from [`TrackerParams::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Channel order of the masks handed to [`RobotTracker::track`](crate::RobotTracker::track).
    pub channels: Vec<ChannelSpec>,
    /// Number of robot slots; must equal the number of body channels.
    pub robot_count: usize,
    /// Plausible blob size for body markers, in pixels.
    pub size_window: SizeWindow,
    /// Plausible blob size for heading markers; `size_window` when unset.
    pub heading_size_window: Option<SizeWindow>,
    /// Heading markers kept by the global search; `robot_count` when unset.
    pub heading_count: Option<usize>,
    /// Marker-to-body distance above which the heading is reported invalid.
    pub max_heading_distance_px: f32,
    /// Pixels per unit length (e.g. px/cm). Positions stay in pixels when unset.
    pub pixels_per_unit: Option<f32>,
    /// Direct counting is used when the ROI spans less than `1/divisor` of the frame.
    pub direct_count_divisor: u32,
    pub heading_search: HeadingSearchParams,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            channels: vec![
                ChannelSpec::body("red"),
                ChannelSpec::body("green"),
                ChannelSpec::body("blue"),
                ChannelSpec::heading("yellow"),
            ],
            robot_count: 3,
            size_window: SizeWindow::default(),
            heading_size_window: None,
            heading_count: None,
            max_heading_distance_px: 30.0,
            pixels_per_unit: None,
            direct_count_divisor: 4,
            heading_search: HeadingSearchParams::default(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("no color channels configured")]
    NoChannels,
    #[error("duplicate channel name `{0}`")]
    DuplicateChannel(String),
    #[error("no body channel configured")]
    NoBodyChannel,
    #[error("expected exactly one heading channel, found {0}")]
    HeadingChannelCount(usize),
    #[error("robot count {robot_count} does not match {body_channels} body channels")]
    RobotCountMismatch {
        robot_count: usize,
        body_channels: usize,
    },
    #[error("invalid size window [{min}, {max}]")]
    InvalidSizeWindow { min: u32, max: u32 },
    #[error("heading count must be at least 1")]
    ZeroHeadingCount,
    #[error("pixels per unit must be finite and positive, got {0}")]
    InvalidPixelsPerUnit(f32),
    #[error("heading distance threshold must be finite and non-negative, got {0}")]
    InvalidHeadingDistance(f32),
    #[error("direct-count divisor must be at least 1")]
    ZeroDivisor,
    #[error("heading search window factor must be finite and positive, got {0}")]
    InvalidWindowFactor(f32),
}

impl TrackerParams {
    /// Check internal consistency; called once by [`RobotTracker::new`](crate::RobotTracker::new).
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.channels.is_empty() {
            return Err(ParamsError::NoChannels);
        }
        let mut seen = HashSet::new();
        for ch in &self.channels {
            if !seen.insert(ch.name.as_str()) {
                return Err(ParamsError::DuplicateChannel(ch.name.clone()));
            }
        }

        let body_channels = self.body_channels().count();
        if body_channels == 0 {
            return Err(ParamsError::NoBodyChannel);
        }
        let heading_channels = self
            .channels
            .iter()
            .filter(|c| c.role == MarkerRole::Heading)
            .count();
        if heading_channels != 1 {
            return Err(ParamsError::HeadingChannelCount(heading_channels));
        }
        if self.robot_count != body_channels {
            return Err(ParamsError::RobotCountMismatch {
                robot_count: self.robot_count,
                body_channels,
            });
        }

        for w in std::iter::once(self.size_window).chain(self.heading_size_window) {
            if !w.is_valid() {
                return Err(ParamsError::InvalidSizeWindow {
                    min: w.min,
                    max: w.max,
                });
            }
        }
        if self.heading_count == Some(0) {
            return Err(ParamsError::ZeroHeadingCount);
        }
        if let Some(ppu) = self.pixels_per_unit {
            if !(ppu.is_finite() && ppu > 0.0) {
                return Err(ParamsError::InvalidPixelsPerUnit(ppu));
            }
        }
        let d = self.max_heading_distance_px;
        if !(d.is_finite() && d >= 0.0) {
            return Err(ParamsError::InvalidHeadingDistance(d));
        }
        if self.direct_count_divisor == 0 {
            return Err(ParamsError::ZeroDivisor);
        }
        let f = self.heading_search.half_extent_factor();
        if !(f.is_finite() && f > 0.0) {
            return Err(ParamsError::InvalidWindowFactor(f));
        }
        Ok(())
    }

    /// `(channel index, spec)` of each body channel; the n-th one is robot slot n.
    pub fn body_channels(&self) -> impl Iterator<Item = (usize, &ChannelSpec)> {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, c)| c.role == MarkerRole::Body)
    }

    /// Index of the heading channel (first one, if misconfigured).
    pub fn heading_channel(&self) -> Option<usize> {
        self.channels
            .iter()
            .position(|c| c.role == MarkerRole::Heading)
    }

    pub fn heading_window(&self) -> SizeWindow {
        self.heading_size_window.unwrap_or(self.size_window)
    }

    pub fn heading_count(&self) -> usize {
        self.heading_count.unwrap_or(self.robot_count)
    }
}
