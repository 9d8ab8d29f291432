// arc.rs - Bending the row of planes onto a circle
//
// The track is the chord of a circle whose sagitta at the viewport edge is
// |bend|. A plane at horizontal offset x sits on that circle: it drops (or
// rises, for negative bend) by the arc height and tilts to follow the
// tangent.

/// Vertical offset and z-rotation for a plane on the arc
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArcPlacement {
    pub y: f32,
    pub rotation: f32,
}

/// Radius of the circle through both viewport edges with sagitta |bend|
#[inline]
pub fn arc_radius(half_width: f32, bend: f32) -> f32 {
    let b = bend.abs();
    (half_width * half_width + b * b) / (2.0 * b)
}

/// Place a plane whose centre is `x` world units from the screen centre.
/// Offsets past the viewport edge are clamped to it, so the square root
/// never sees a negative argument.
pub fn place_on_arc(x: f32, half_width: f32, bend: f32) -> ArcPlacement {
    if bend == 0.0 {
        return ArcPlacement::default();
    }

    let r = arc_radius(half_width, bend);
    let ex = x.abs().min(half_width.max(0.0));
    let arc = (r - (r * r - ex * ex).max(0.0).sqrt()).max(0.0);
    let tilt = (ex / r).min(1.0).asin();

    if bend > 0.0 {
        ArcPlacement { y: -arc, rotation: -x.signum() * tilt }
    } else {
        ArcPlacement { y: arc, rotation: x.signum() * tilt }
    }
}

/// Narrow screens get a flatter track.
#[inline]
pub fn effective_bend(bend: f32, compact: bool) -> f32 {
    if compact { bend.min(0.5) } else { bend }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_when_bend_is_zero() {
        assert_eq!(place_on_arc(3.0, 10.0, 0.0), ArcPlacement::default());
    }

    #[test]
    fn edge_sits_exactly_bend_below_centre() {
        let h = 12.0;
        let p = place_on_arc(h, h, 2.0);
        assert!((p.y + 2.0).abs() < 1e-4, "{p:?}");
        let centre = place_on_arc(0.0, h, 2.0);
        assert_eq!(centre.y, 0.0);
        assert_eq!(centre.rotation, 0.0);
    }

    #[test]
    fn arc_height_is_finite_and_non_negative() {
        let h = 9.5;
        for bend in [-7.0, -1.0, -0.01, 0.01, 0.5, 1.0, 3.0, 40.0] {
            for step in -40..=40 {
                let x = h * 1.5 * step as f32 / 40.0;
                let p = place_on_arc(x, h, bend);
                let arc = if bend > 0.0 { -p.y } else { p.y };
                assert!(arc.is_finite() && arc >= 0.0, "bend={bend} x={x} arc={arc}");
                assert!(p.rotation.is_finite());
            }
        }
    }

    #[test]
    fn clamps_beyond_the_edge() {
        assert_eq!(place_on_arc(50.0, 10.0, 1.0), place_on_arc(10.0, 10.0, 1.0));
    }

    #[test]
    fn negative_bend_mirrors() {
        let up = place_on_arc(4.0, 10.0, -1.5);
        let down = place_on_arc(4.0, 10.0, 1.5);
        assert_eq!(up.y, -down.y);
        assert_eq!(up.rotation, -down.rotation);
    }

    #[test]
    fn tilt_follows_side() {
        assert!(place_on_arc(5.0, 10.0, 1.0).rotation < 0.0);
        assert!(place_on_arc(-5.0, 10.0, 1.0).rotation > 0.0);
    }

    #[test]
    fn compact_screens_flatten() {
        assert_eq!(effective_bend(3.0, true), 0.5);
        assert_eq!(effective_bend(0.2, true), 0.2);
        assert_eq!(effective_bend(3.0, false), 3.0);
    }
}
