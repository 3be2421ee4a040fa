/// Upper bound applied to the host's device pixel ratio before sizing the
/// backing store. Higher densities cost fill-rate without a visible gain for a
/// full-screen procedural pattern.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Raw viewport readings taken from the host environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical (CSS pixel) width of the viewport.
    pub width: f64,
    /// Logical (CSS pixel) height of the viewport.
    pub height: f64,
    /// Physical-to-logical pixel ratio reported by the host.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }
}

/// Resolved drawable-surface dimensions.
///
/// `backing_*` is always `logical * pixel_ratio`, truncated toward zero the way
/// the DOM truncates assignments to a canvas `width`/`height` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceState {
    pub logical_width: f64,
    pub logical_height: f64,
    pub pixel_ratio: f64,
    pub backing_width: u32,
    pub backing_height: u32,
}

impl SurfaceState {
    /// Recomputes the whole state from a viewport reading.
    pub fn from_viewport(viewport: Viewport, max_pixel_ratio: f64) -> Self {
        let pixel_ratio = clamp_pixel_ratio(viewport.device_pixel_ratio, max_pixel_ratio);
        let logical_width = sanitize_extent(viewport.width);
        let logical_height = sanitize_extent(viewport.height);
        Self {
            logical_width,
            logical_height,
            pixel_ratio,
            backing_width: (logical_width * pixel_ratio) as u32,
            backing_height: (logical_height * pixel_ratio) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.backing_width == 0 || self.backing_height == 0
    }
}

fn clamp_pixel_ratio(ratio: f64, max: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(max)
    } else {
        1.0
    }
}

fn sanitize_extent(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Shader stage requested from the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderKind::Vertex => f.write_str("vertex"),
            ShaderKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Cap applied to the device pixel ratio. Fixed at [`MAX_PIXEL_RATIO`].
    pub max_pixel_ratio: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: MAX_PIXEL_RATIO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_above_cap_is_clamped() {
        let state = SurfaceState::from_viewport(Viewport::new(800.0, 600.0, 3.0), MAX_PIXEL_RATIO);
        assert_eq!(state.pixel_ratio, 2.0);
        assert_eq!((state.backing_width, state.backing_height), (1600, 1200));
    }

    #[test]
    fn invalid_ratio_falls_back_to_one() {
        for ratio in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            let state = SurfaceState::from_viewport(Viewport::new(640.0, 480.0, ratio), 2.0);
            assert_eq!(state.pixel_ratio, 1.0, "ratio {ratio}");
            assert_eq!((state.backing_width, state.backing_height), (640, 480));
        }
    }

    #[test]
    fn fractional_backing_size_truncates() {
        let state = SurfaceState::from_viewport(Viewport::new(101.0, 33.0, 1.5), 2.0);
        assert_eq!((state.backing_width, state.backing_height), (151, 49));
        assert!(!state.is_empty());
    }

    #[test]
    fn default_config_only_carries_the_ratio_cap() {
        let config = RendererConfig::default();
        assert_eq!(config, RendererConfig { max_pixel_ratio: MAX_PIXEL_RATIO });
    }

    #[test]
    fn zero_sized_viewport_is_empty() {
        let state = SurfaceState::from_viewport(Viewport::new(0.0, 720.0, 1.0), 2.0);
        assert!(state.is_empty());
    }
}
