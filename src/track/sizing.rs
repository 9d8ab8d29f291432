// sizing.rs - Responsive plane dimensions
//
// Screen sizes are CSS pixels, everything else is world units.
// Planes are portrait 9:16; height tracks the viewport with a device-class
// multiplier and a hard cap so very large screens don't get giant cards.

/// Below this container width the track is flattened and planes shrink.
pub const COMPACT_WIDTH: f32 = 640.0;

/// Below this window width the device is treated as mobile for decode,
/// easing and geometry budgets.
pub const MOBILE_WIDTH: f32 = 768.0;

const PLANE_ASPECT: f32 = 9.0 / 16.0;
const COMPACT_SIZE_MULTIPLIER: f32 = 0.9;
const COMPACT_PADDING: f32 = 0.9;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 { self.width / self.height } else { 1.0 }
    }
}

#[inline]
pub fn is_compact(screen_width: f32) -> bool {
    screen_width < COMPACT_WIDTH
}

#[inline]
pub fn is_mobile(screen_width: f32) -> bool {
    screen_width < MOBILE_WIDTH
}

/// Narrow containers always use a slightly smaller card.
#[inline]
pub fn device_size_multiplier(screen_width: f32, configured: f32) -> f32 {
    if is_compact(screen_width) { COMPACT_SIZE_MULTIPLIER } else { configured }
}

/// Plane dimensions plus the gap to its neighbour
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaneLayout {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl PlaneLayout {
    /// Horizontal distance between neighbouring plane centres
    pub fn slot(&self) -> f32 {
        self.width + self.padding
    }
}

pub fn plane_layout(screen: Size, viewport: Size, size_multiplier: f32) -> PlaneLayout {
    let compact = is_compact(screen.width);
    let multiplier = if size_multiplier > 0.0 { size_multiplier } else { 1.0 };

    let responsive = if compact { 0.75 } else { (screen.width / 1920.0).clamp(0.8, 1.5) };
    // 900px of a 1500px-tall reference screen, scaled to the viewport
    let base_height = viewport.height * (900.0 / 1500.0) * responsive;
    let max_height = viewport.height * if compact { 0.5 } else { 0.6 };
    let height = (base_height * multiplier).min(max_height);

    let padding = if compact { COMPACT_PADDING } else { (2.0 / multiplier).clamp(0.4, 1.2) };

    PlaneLayout { width: height * PLANE_ASPECT, height, padding }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn portrait_nine_by_sixteen() {
        let l = plane_layout(Size::new(1440.0, 900.0), Size::new(26.5, 16.5), 1.0);
        assert!(close(l.width / l.height, 9.0 / 16.0));
    }

    #[test]
    fn desktop_height_is_capped() {
        let vp = Size::new(30.0, 16.0);
        let l = plane_layout(Size::new(3840.0, 2160.0), vp, 3.0);
        assert!(close(l.height, vp.height * 0.6));
    }

    #[test]
    fn compact_screens_use_mobile_rules() {
        let vp = Size::new(7.5, 16.5);
        let l = plane_layout(Size::new(390.0, 844.0), vp, 0.9);
        assert!(close(l.height, vp.height * 0.6 * 0.75 * 0.9));
        assert!(l.height <= vp.height * 0.5);
        assert_eq!(l.padding, COMPACT_PADDING);
    }

    #[test]
    fn padding_shrinks_as_cards_grow() {
        let screen = Size::new(1920.0, 1080.0);
        let vp = Size::new(29.3, 16.5);
        let small = plane_layout(screen, vp, 0.5);
        let big = plane_layout(screen, vp, 4.0);
        assert_eq!(small.padding, 1.2);
        assert_eq!(big.padding, 0.5);
        assert!(close(plane_layout(screen, vp, 10.0).padding, 0.4));
        assert!(close(big.slot(), big.width + 0.5));
    }

    #[test]
    fn device_classes() {
        assert!(is_compact(639.0) && !is_compact(640.0));
        assert!(is_mobile(767.0) && !is_mobile(768.0));
        assert_eq!(device_size_multiplier(500.0, 2.0), 0.9);
        assert_eq!(device_size_multiplier(1200.0, 2.0), 2.0);
    }
}
