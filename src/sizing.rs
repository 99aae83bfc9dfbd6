//! Measure-pass and scale calculations for fitting a movie into its layout box.

/// How the host constrains one dimension during the measure pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeasureMode {
    /// The host dictates the size exactly
    Exactly,
    /// The view may be as large as it wants up to the given size
    AtMost,
    /// No constraint
    #[default]
    Unspecified,
}

/// A measure constraint for one dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeasureSpec {
    pub mode: MeasureMode,
    pub size: u32,
}

impl MeasureSpec {
    pub fn exactly(size: u32) -> Self {
        Self {
            mode: MeasureMode::Exactly,
            size,
        }
    }

    pub fn at_most(size: u32) -> Self {
        Self {
            mode: MeasureMode::AtMost,
            size,
        }
    }

    pub fn unspecified() -> Self {
        Self::default()
    }
}

/// Padding insets in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Padding {
    /// Same inset on all four sides.
    pub fn uniform(inset: u32) -> Self {
        Self {
            left: inset,
            top: inset,
            right: inset,
            bottom: inset,
        }
    }
}

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Resolve the desired size of one dimension.
///
/// ## Arguments
///
/// * `spec` - Constraint from the host
/// * `intrinsic` - Intrinsic size of the content
/// * `leading` - Padding before the content (left or top)
/// * `trailing` - Padding after the content (right or bottom)
///
/// ## Returns
///
/// `spec.size` under [`MeasureMode::Exactly`], otherwise
/// `intrinsic + leading + trailing`. `AtMost` does not cap the result.
///
/// ## Example
///
/// ```rust
/// use gif_movie_view::{MeasureSpec, sizing::resolve_size};
///
/// assert_eq!(resolve_size(MeasureSpec::exactly(300), 100, 4, 4), 300);
/// assert_eq!(resolve_size(MeasureSpec::unspecified(), 100, 4, 6), 110);
/// ```
pub fn resolve_size(spec: MeasureSpec, intrinsic: u32, leading: u32, trailing: u32) -> u32 {
    match spec.mode {
        MeasureMode::Exactly => spec.size,
        MeasureMode::AtMost | MeasureMode::Unspecified => {
            intrinsic.saturating_add(leading).saturating_add(trailing)
        }
    }
}

/// Resolve both dimensions independently.
pub fn measure(width_spec: MeasureSpec, height_spec: MeasureSpec, intrinsic: Size, padding: Padding) -> Size {
    Size {
        width: resolve_size(width_spec, intrinsic.width, padding.left, padding.right),
        height: resolve_size(height_spec, intrinsic.height, padding.top, padding.bottom),
    }
}

/// Stretch-to-fit scale factors `(layout / intrinsic)` per axis.
///
/// Aspect ratio is not preserved. An axis with a zero intrinsic size is left
/// unscaled.
#[inline]
pub fn scale_factors(layout: Size, intrinsic: Size) -> (f32, f32) {
    (
        axis_scale(layout.width, intrinsic.width),
        axis_scale(layout.height, intrinsic.height),
    )
}

#[inline]
fn axis_scale(layout: u32, intrinsic: u32) -> f32 {
    if intrinsic == 0 {
        1.0
    } else {
        layout as f32 / intrinsic as f32
    }
}
