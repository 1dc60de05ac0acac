//! Low-discrepancy sampling and the split-sum BRDF integration.
//!
//! CPU reference implementations of the math the environment capture shaders
//! encode. The BRDF integrator also backs the CPU lookup-table path in
//! [`crate::renderer::ibl`].

use glam::{Vec2, Vec3};

/// Van der Corput radical inverse in base 2.
#[must_use]
pub fn radical_inverse_vdc(mut bits: u32) -> f32 {
    bits = bits.rotate_left(16);
    bits = ((bits & 0x5555_5555) << 1) | ((bits & 0xAAAA_AAAA) >> 1);
    bits = ((bits & 0x3333_3333) << 2) | ((bits & 0xCCCC_CCCC) >> 2);
    bits = ((bits & 0x0F0F_0F0F) << 4) | ((bits & 0xF0F0_F0F0) >> 4);
    bits = ((bits & 0x00FF_00FF) << 8) | ((bits & 0xFF00_FF00) >> 8);
    bits as f32 * 2.328_306_4e-10 // 1 / 2^32
}

/// The i-th point of an n-point Hammersley sequence on the unit square.
#[must_use]
pub fn hammersley(i: u32, n: u32) -> Vec2 {
    Vec2::new(i as f32 / n as f32, radical_inverse_vdc(i))
}

/// Importance-sample the GGX normal distribution around normal `n`.
///
/// `xi` is a low-discrepancy point; `roughness` drives the lobe width
/// (alpha = roughness²). Returns a world-space half vector.
#[must_use]
pub fn importance_sample_ggx(xi: Vec2, n: Vec3, roughness: f32) -> Vec3 {
    let a = roughness * roughness;

    let phi = 2.0 * std::f32::consts::PI * xi.x;
    let cos_theta = ((1.0 - xi.y) / (1.0 + (a * a - 1.0) * xi.y)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    // Spherical to tangent-space cartesian
    let h = Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta);

    // Tangent basis around n
    let up = if n.z.abs() < 0.999 { Vec3::Z } else { Vec3::X };
    let tangent = up.cross(n).normalize();
    let bitangent = n.cross(tangent);

    (tangent * h.x + bitangent * h.y + n * h.z).normalize()
}

/// Schlick-GGX geometry term with the IBL remapping k = roughness² / 2.
#[must_use]
pub fn geometry_schlick_ggx(n_dot_v: f32, roughness: f32) -> f32 {
    let a = roughness;
    let k = (a * a) / 2.0;
    n_dot_v / (n_dot_v * (1.0 - k) + k)
}

/// Smith height-correlated shadow-masking from the two Schlick-GGX terms.
#[must_use]
pub fn geometry_smith(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
    let n_dot_v = n.dot(v).max(0.0);
    let n_dot_l = n.dot(l).max(0.0);
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

/// Samples used by [`integrate_brdf`].
pub const BRDF_INTEGRATION_SAMPLES: u32 = 1024;

/// Integrate the split-sum BRDF for one (N·V, roughness) pair.
///
/// Returns the Fresnel (scale, bias) pair stored in the BRDF lookup table.
#[must_use]
pub fn integrate_brdf(n_dot_v: f32, roughness: f32) -> (f32, f32) {
    let n_dot_v = n_dot_v.max(1e-3);
    let v = Vec3::new((1.0 - n_dot_v * n_dot_v).sqrt(), 0.0, n_dot_v);
    let n = Vec3::Z;

    let mut scale = 0.0;
    let mut bias = 0.0;

    for i in 0..BRDF_INTEGRATION_SAMPLES {
        let xi = hammersley(i, BRDF_INTEGRATION_SAMPLES);
        let h = importance_sample_ggx(xi, n, roughness);
        let l = (2.0 * v.dot(h) * h - v).normalize();

        let n_dot_l = l.z.max(0.0);
        if n_dot_l <= 0.0 {
            continue;
        }

        let n_dot_h = h.z.max(0.0);
        let v_dot_h = v.dot(h).max(0.0);

        let g = geometry_smith(n, v, l, roughness);
        let g_vis = (g * v_dot_h) / (n_dot_h * n_dot_v).max(1e-6);
        let fc = (1.0 - v_dot_h).powi(5);

        scale += (1.0 - fc) * g_vis;
        bias += fc * g_vis;
    }

    let inv = 1.0 / BRDF_INTEGRATION_SAMPLES as f32;
    (scale * inv, bias * inv)
}

/// Roughness encoded by a prefiltered-environment mip level:
/// mip / (mip_count - 1), so mip 0 is mirror and the last mip fully rough.
#[must_use]
pub fn roughness_for_mip(mip: u32, mip_count: u32) -> f32 {
    if mip_count <= 1 {
        return 0.0;
    }
    mip as f32 / (mip_count - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radical_inverse_first_values() {
        // base-2 radical inverse: 0 → 0, 1 → 0.5, 2 → 0.25, 3 → 0.75
        assert!(radical_inverse_vdc(0).abs() < 1e-6);
        assert!((radical_inverse_vdc(1) - 0.5).abs() < 1e-6);
        assert!((radical_inverse_vdc(2) - 0.25).abs() < 1e-6);
        assert!((radical_inverse_vdc(3) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn hammersley_stays_in_unit_square() {
        for i in 0..64 {
            let p = hammersley(i, 64);
            assert!((0.0..1.0).contains(&p.x), "x out of range: {p:?}");
            assert!((0.0..1.0).contains(&p.y), "y out of range: {p:?}");
        }
    }

    #[test]
    fn ggx_sample_is_unit_length_and_upper_hemisphere() {
        let n = Vec3::Z;
        for i in 0..32 {
            let h = importance_sample_ggx(hammersley(i, 32), n, 0.5);
            assert!((h.length() - 1.0).abs() < 1e-4);
            assert!(h.dot(n) >= 0.0, "sample below the hemisphere: {h:?}");
        }
    }

    #[test]
    fn ggx_zero_roughness_collapses_to_normal() {
        let n = Vec3::Z;
        let h = importance_sample_ggx(Vec2::new(0.3, 0.7), n, 0.0);
        assert!(h.dot(n) > 0.999, "mirror lobe should align with n, got {h:?}");
    }

    #[test]
    fn roughness_mip_mapping_endpoints() {
        assert!(roughness_for_mip(0, 5).abs() < 1e-6);
        assert!((roughness_for_mip(4, 5) - 1.0).abs() < 1e-6);
        assert!((roughness_for_mip(2, 5) - 0.5).abs() < 1e-6);
    }
}
