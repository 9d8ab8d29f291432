// render.rs - Plane mesh, transforms and shaders
//
// Everything the GPU needs that can be computed without a GL context.
// Each item is drawn as the same unit plane, scaled to its layout and
// posed on the arc by its model matrix.
//
// Fragment shader inputs:
//   tMap / tPoster      primary media and poster, crossfaded by uMix
//   uPlaneSizes         plane size in world units
//   uImageSizes         media pixel size, for cover-fit cropping
//   uBorderRadius       corner radius in plane UV units

use glam::{Mat4, Quat, Vec3};

use crate::media::PlaneState;

/// 2x2 RGBA of #111111, shown until real media arrives
pub const PLACEHOLDER_RGBA: [u8; 16] = [
    0x11, 0x11, 0x11, 0xff, 0x11, 0x11, 0x11, 0xff,
    0x11, 0x11, 0x11, 0xff, 0x11, 0x11, 0x11, 0xff,
];
pub const PLACEHOLDER_SIZE: i32 = 2;

/// Unit plane in the XY plane, centred on the origin.
/// UV (0, 0) is bottom-left; textures are uploaded flipped to match.
#[derive(Clone, Debug)]
pub struct PlaneGeometry {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u16>,
}

impl PlaneGeometry {
    pub fn new(width_segments: u16, height_segments: u16) -> Self {
        let ws = width_segments.max(1);
        let hs = height_segments.max(1);
        let gx = ws + 1;
        let gy = hs + 1;

        let mut positions = Vec::with_capacity(gx as usize * gy as usize * 3);
        let mut uvs = Vec::with_capacity(gx as usize * gy as usize * 2);
        for iy in 0..gy {
            let v = iy as f32 / hs as f32;
            for ix in 0..gx {
                let u = ix as f32 / ws as f32;
                positions.extend_from_slice(&[u - 0.5, 0.5 - v, 0.0]);
                uvs.extend_from_slice(&[u, 1.0 - v]);
            }
        }

        let mut indices = Vec::with_capacity(ws as usize * hs as usize * 6);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = ix + gx * iy;
                let b = ix + gx * (iy + 1);
                let c = ix + 1 + gx * (iy + 1);
                let d = ix + 1 + gx * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { positions, uvs, indices }
    }

    /// Fewer segments on phones to save vertex work
    pub fn for_device(mobile: bool) -> Self {
        if mobile { Self::new(24, 12) } else { Self::new(60, 30) }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

pub fn model_matrix(plane: &PlaneState) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::new(plane.scale_x, plane.scale_y, 1.0),
        Quat::from_rotation_z(plane.rotation),
        Vec3::new(plane.x, plane.y, 0.0),
    )
}

pub const VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 position;
in vec2 uv;

uniform mat4 uModelView;
uniform mat4 uProjection;

out vec2 vUv;

void main() {
    vUv = uv;
    gl_Position = uProjection * uModelView * vec4(position.xy, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec2 uImageSizes;
uniform vec2 uPlaneSizes;
uniform sampler2D tMap;
uniform sampler2D tPoster;
uniform float uBorderRadius;
uniform float uMix;

in vec2 vUv;
out vec4 outColor;

float roundedBoxSDF(vec2 p, vec2 b, float r) {
    vec2 d = abs(p) - b;
    return length(max(d, vec2(0.0))) + min(max(d.x, d.y), 0.0) - r;
}

void main() {
    vec2 ratio = vec2(
        min((uPlaneSizes.x / uPlaneSizes.y) / (uImageSizes.x / uImageSizes.y), 1.0),
        min((uPlaneSizes.y / uPlaneSizes.x) / (uImageSizes.y / uImageSizes.x), 1.0)
    );
    vec2 uv = vUv * ratio + (1.0 - ratio) * 0.5;

    vec4 poster = texture(tPoster, uv);
    vec4 media = texture(tMap, uv);
    vec4 color = mix(poster, media, clamp(uMix, 0.0, 1.0));

    float d = roundedBoxSDF(vUv - 0.5, vec2(0.5 - uBorderRadius), uBorderRadius);
    float edge = 0.002;
    float alpha = 1.0 - smoothstep(-edge, edge, d);

    outColor = vec4(color.rgb, alpha);
}
"#;
