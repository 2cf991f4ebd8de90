// Layout measurement for the video display box

use kinoview_core::VideoSize;

/// Constraint mode imposed by the parent layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureMode {
    /// Parent imposes no constraint; take the desired size
    Unspecified,
    /// Parent caps the size; do not exceed it
    AtMost,
    /// Parent dictates the size exactly
    Exactly,
}

/// One axis of a measurement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureSpec {
    pub mode: MeasureMode,
    pub size: u32,
}

impl MeasureSpec {
    pub fn unspecified() -> Self {
        Self {
            mode: MeasureMode::Unspecified,
            size: 0,
        }
    }

    pub fn at_most(size: u32) -> Self {
        Self {
            mode: MeasureMode::AtMost,
            size,
        }
    }

    pub fn exactly(size: u32) -> Self {
        Self {
            mode: MeasureMode::Exactly,
            size,
        }
    }
}

/// Base size for one axis: the desired size when unconstrained, otherwise
/// whatever the constraint carries.
pub fn default_size(desired: u32, spec: MeasureSpec) -> u32 {
    match spec.mode {
        MeasureMode::Unspecified => desired,
        MeasureMode::AtMost | MeasureMode::Exactly => spec.size,
    }
}

/// Resolve a desired size against a constraint: caps clamp, exact wins.
pub fn resolve_adjusted_size(desired: u32, spec: MeasureSpec) -> u32 {
    match spec.mode {
        MeasureMode::Unspecified => desired,
        MeasureMode::AtMost => desired.min(spec.size),
        MeasureMode::Exactly => spec.size,
    }
}

/// Negotiate the display box for a video of the given natural size.
///
/// Starts from the per-axis defaults, then shrinks one axis so the box keeps
/// the media's aspect ratio whenever the natural size is known.
pub fn measure(natural: VideoSize, width_spec: MeasureSpec, height_spec: MeasureSpec) -> VideoSize {
    let mut width = default_size(natural.width, width_spec);
    let mut height = default_size(natural.height, height_spec);

    if natural.is_known() {
        let nw = natural.width as u64;
        let nh = natural.height as u64;

        if nw * height as u64 > width as u64 * nh {
            // box too tall for the media, shrink the height
            height = (width as u64 * nh / nw) as u32;
        } else if nw * (height as u64) < (width as u64) * nh {
            // box too wide for the media, shrink the width
            width = (height as u64 * nw / nh) as u32;
        }
    }

    VideoSize::new(width, height)
}
