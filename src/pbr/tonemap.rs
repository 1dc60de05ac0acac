//! Tone operators, color grading and the bloom threshold curve.
//!
//! These are the CPU reference implementations of the post-process math; the
//! tone-mapping shader selects the same operator by the integer mode the
//! pipeline uploads as `u_ToneMappingMode`.

use glam::{Mat3, Vec3};

/// Tone operator selection. The discriminants are the wire values of
/// `u_ToneMappingMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ToneMappingMode {
    Reinhard = 0,
    ReinhardExtended = 1,
    Exposure = 2,
    #[default]
    AcesFilmic = 3,
    Uncharted2 = 4,
}

impl ToneMappingMode {
    /// Integer wire value.
    #[must_use]
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Inverse of [`ToneMappingMode::index`]; unknown values map to `None`.
    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Reinhard),
            1 => Some(Self::ReinhardExtended),
            2 => Some(Self::Exposure),
            3 => Some(Self::AcesFilmic),
            4 => Some(Self::Uncharted2),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Reinhard => "Reinhard",
            Self::ReinhardExtended => "Reinhard Extended",
            Self::Exposure => "Exposure",
            Self::AcesFilmic => "ACES Filmic",
            Self::Uncharted2 => "Uncharted 2",
        }
    }
}

/// Rec. 709 relative luminance.
#[must_use]
pub fn luminance(color: Vec3) -> f32 {
    color.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

/// Classic Reinhard: c / (1 + c).
#[must_use]
pub fn reinhard(color: Vec3) -> Vec3 {
    color / (Vec3::ONE + color)
}

/// White-point parameterized Reinhard: maps `white_point` to exactly 1.
#[must_use]
pub fn reinhard_extended(color: Vec3, white_point: f32) -> Vec3 {
    let w2 = (white_point * white_point).max(1e-4);
    color * (Vec3::ONE + color / w2) / (Vec3::ONE + color)
}

/// Exponential exposure compression: 1 - exp(-c * exposure).
#[must_use]
pub fn exposure_compress(color: Vec3, exposure: f32) -> Vec3 {
    Vec3::ONE - (-color * exposure).map(f32::exp)
}

// Fitted ACES (Stephen Hill's RRT+ODT approximation). The matrices convert
// Rec.709 into the ACES rendering space and back; stored column-major.
const ACES_INPUT: Mat3 = Mat3::from_cols_array(&[
    0.59719, 0.07600, 0.02840, // column 0
    0.35458, 0.90834, 0.13383, // column 1
    0.04823, 0.01566, 0.83777, // column 2
]);

const ACES_OUTPUT: Mat3 = Mat3::from_cols_array(&[
    1.60475, -0.10208, -0.00327, // column 0
    -0.53108, 1.10813, -0.07276, // column 1
    -0.07367, -0.00605, 1.07602, // column 2
]);

fn rrt_and_odt_fit(v: Vec3) -> Vec3 {
    let a = v * (v + Vec3::splat(0.024_578_6)) - Vec3::splat(0.000_090_537);
    let b = v * (v * 0.983_729 + Vec3::splat(0.432_951)) + Vec3::splat(0.238_081);
    a / b
}

/// ACES filmic tone operator (fitted RRT + ODT).
#[must_use]
pub fn aces_filmic(color: Vec3) -> Vec3 {
    let v = ACES_INPUT * color;
    let v = rrt_and_odt_fit(v);
    (ACES_OUTPUT * v).clamp(Vec3::ZERO, Vec3::ONE)
}

// Hable's filmic curve constants (Uncharted 2).
const HABLE_A: f32 = 0.15;
const HABLE_B: f32 = 0.50;
const HABLE_C: f32 = 0.10;
const HABLE_D: f32 = 0.20;
const HABLE_E: f32 = 0.02;
const HABLE_F: f32 = 0.30;

fn hable_partial(x: Vec3) -> Vec3 {
    ((x * (x * HABLE_A + Vec3::splat(HABLE_C * HABLE_B)) + Vec3::splat(HABLE_D * HABLE_E))
        / (x * (x * HABLE_A + Vec3::splat(HABLE_B)) + Vec3::splat(HABLE_D * HABLE_F)))
        - Vec3::splat(HABLE_E / HABLE_F)
}

fn hable_partial_scalar(x: f32) -> f32 {
    ((x * (x * HABLE_A + HABLE_C * HABLE_B) + HABLE_D * HABLE_E)
        / (x * (x * HABLE_A + HABLE_B) + HABLE_D * HABLE_F))
        - HABLE_E / HABLE_F
}

/// Uncharted 2 filmic operator, normalized so `white_point` maps to 1.
#[must_use]
pub fn uncharted2(color: Vec3, white_point: f32) -> Vec3 {
    let white_scale = 1.0 / hable_partial_scalar(white_point.max(1e-4));
    hable_partial(color) * white_scale
}

/// Apply the selected tone operator. Exposure scales the input for every
/// operator except `Exposure`, which folds it into its own curve. The result
/// is clamped to [0,1]³.
#[must_use]
pub fn apply(mode: ToneMappingMode, hdr: Vec3, exposure: f32, white_point: f32) -> Vec3 {
    let scaled = hdr * exposure;
    let mapped = match mode {
        ToneMappingMode::Reinhard => reinhard(scaled),
        ToneMappingMode::ReinhardExtended => reinhard_extended(scaled, white_point),
        ToneMappingMode::Exposure => exposure_compress(hdr, exposure),
        ToneMappingMode::AcesFilmic => aces_filmic(scaled),
        ToneMappingMode::Uncharted2 => uncharted2(scaled, white_point),
    };
    mapped.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Parametric grading: saturation as a luminance-gray mix, contrast about a
/// 0.5 pivot, brightness as an additive offset. Clamped to [0,1]³.
#[must_use]
pub fn apply_grading(color: Vec3, saturation: f32, contrast: f32, brightness: f32) -> Vec3 {
    let gray = Vec3::splat(luminance(color));
    let color = gray.lerp(color, saturation);
    let color = (color - Vec3::splat(0.5)) * contrast + Vec3::splat(0.5);
    (color + Vec3::splat(brightness)).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Gamma-encode a linear color.
#[must_use]
pub fn gamma_encode(color: Vec3, gamma: f32) -> Vec3 {
    color.powf(1.0 / gamma.max(1e-4))
}

/// Soft (quadratic-knee) bloom threshold: the fraction of a pixel's color
/// that survives extraction, so scaling by it preserves hue.
///
/// `contribution = max(soft_knee(l), l - threshold) / l`, where the knee
/// ramps quadratically over [threshold - knee, threshold + knee].
#[must_use]
pub fn extract_contribution(lum: f32, threshold: f32, knee: f32) -> f32 {
    let soft = (lum - threshold + knee).clamp(0.0, 2.0 * knee);
    let soft = soft * soft / (4.0 * knee + 1e-5);
    let contribution = soft.max(lum - threshold);
    (contribution / lum.max(1e-5)).max(0.0)
}
