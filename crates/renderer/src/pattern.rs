//! The fixed radial-ring shaders and a host-side mirror of the fragment stage.
//!
//! The GLSL targets naga's GLSL 450 front end, so inputs, outputs and the
//! uniform block carry explicit `layout` qualifiers. In the fragment body the
//! ring test runs first and the "outside the disk" test overrides it
//! unconditionally afterwards; the output depends on that order.

/// Name of the vertex attribute carrying the quad corners.
pub const POSITION_ATTRIBUTE: &str = "a_position";

/// Name of the elapsed-time uniform (seconds).
pub const TIME_UNIFORM: &str = "u_time";

/// Width of the red ring band, in clip-space units.
pub const RING_WIDTH: f32 = 0.002;

/// Passes the quad corner through and forwards it as the `pos` varying.
pub const VERTEX_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec2 a_position;
layout(location = 0) out vec4 pos;

void main() {
    vec4 position = vec4(a_position, 0.0, 1.0);
    gl_Position = position;
    pos = position;
}
";

/// Shades the ring, the interior gradient and the black exterior.
pub const FRAGMENT_SHADER_GLSL: &str = r"#version 450
layout(location = 0) in vec4 pos;
layout(location = 0) out vec4 fragColor;

layout(std140, set = 0, binding = 0) uniform FrameParams {
    float u_time;
} frame;

void main() {
    float x = (sin(frame.u_time) + 1.0) / 2.0;
    float r = sqrt(pos.y * pos.y + pos.x * pos.x);
    if (r > (x - 0.002) && r < x) {
        fragColor = vec4(1.0, 0.0, 0.0, 1.0);
    } else {
        fragColor = vec4(x - sin(frame.u_time) * r, 0.0, 0.0, 1.0);
    }
    if (r > x) {
        fragColor = vec4(0.0, 0.0, 0.0, 1.0);
    }
}
";

/// Radius of the ring at `time` seconds: `(sin(t) + 1) / 2`.
pub fn ring_radius(time: f32) -> f32 {
    (time.sin() + 1.0) / 2.0
}

/// Evaluates the fragment stage on the host for a clip-space position.
///
/// Mirrors [`FRAGMENT_SHADER_GLSL`] statement for statement, including the
/// override order.
pub fn shade(time: f32, position: [f32; 2]) -> [f32; 4] {
    let x = ring_radius(time);
    let [px, py] = position;
    let r = (py * py + px * px).sqrt();

    let mut color = if r > x - RING_WIDTH && r < x {
        [1.0, 0.0, 0.0, 1.0]
    } else {
        [x - time.sin() * r, 0.0, 0.0, 1.0]
    };
    if r > x {
        color = [0.0, 0.0, 0.0, 1.0];
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn fragment_source_uses_the_host_ring_width() {
        let band = format!("r > (x - {RING_WIDTH})");
        assert!(FRAGMENT_SHADER_GLSL.contains(&band), "missing `{band}`");
    }

    fn assert_close(actual: [f32; 4], expected: [f32; 4]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-5, "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn scenario_at_time_zero() {
        assert!((ring_radius(0.0) - 0.5).abs() < f32::EPSILON);
        assert_close(shade(0.0, [0.6, 0.0]), BLACK);
        assert_close(shade(0.0, [0.3, 0.0]), [0.5, 0.0, 0.0, 1.0]);
        assert_close(shade(0.0, [0.499, 0.0]), RED);
        assert_close(shade(0.0, [0.0, -0.499]), RED);
    }

    #[test]
    fn exterior_is_always_black() {
        for step in 0..200 {
            let time = step as f32 * 0.173;
            let radius = ring_radius(time);
            for sample in 0..64 {
                let angle = sample as f32 * std::f32::consts::TAU / 64.0;
                for offset in [1e-3_f32, 0.05, 0.4, 1.0] {
                    let r = radius + offset;
                    let point = [r * angle.cos(), r * angle.sin()];
                    let measured = (point[0] * point[0] + point[1] * point[1]).sqrt();
                    if measured > radius {
                        assert_eq!(shade(time, point), BLACK, "t={time} r={measured}");
                    }
                }
            }
        }
    }

    #[test]
    fn interior_shading_follows_formula() {
        let time = 1.2_f32;
        let radius = ring_radius(time);
        let r = radius * 0.25;
        let expected = radius - time.sin() * r;
        assert_close(shade(time, [0.0, r]), [expected, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn ring_band_is_red_and_opaque() {
        let time = 2.0_f32;
        let radius = ring_radius(time);
        let r = radius - RING_WIDTH / 2.0;
        assert_close(shade(time, [r, 0.0]), RED);
    }
}
