//! Pipeline state enums shared by the device abstraction.
//!
//! These mirror the fixed-function state a forward pipeline toggles between
//! passes: depth/stencil comparisons, stencil actions, blend factors, face
//! culling and texture storage descriptions.

/// Depth / stencil comparison function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Action applied to the stencil buffer on test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    Increment,
    IncrementWrap,
    Decrement,
    DecrementWrap,
    Invert,
}

/// Blend factor for source / destination color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Which faces are culled when face culling is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullFace {
    Front,
    Back,
}

/// One face of a cubemap, in the conventional +X .. -Z order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// All six faces in attachment order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Face index 0..6 matching [`CubeFace::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }
}

/// Texel storage format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA, display-referred.
    Rgba8,
    /// 16-bit float RGB, the HDR working format.
    Rgb16F,
    /// 16-bit float RG, used by the BRDF lookup table (scale + bias).
    Rg16F,
    /// 24-bit depth, shadow maps.
    Depth24,
    /// Combined 24-bit depth + 8-bit stencil, the HDR target's depth buffer.
    Depth24Stencil8,
}

/// Texture coordinate wrap mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureWrap {
    Repeat,
    ClampToEdge,
    ClampToBorder,
}

/// Texture minification / magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

/// Creation parameters for a 2D texture.
#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub wrap: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    /// Border color sampled outside [0,1] when `wrap` is `ClampToBorder`.
    pub border_color: Option<[f32; 4]>,
    pub mip_levels: u32,
}

impl TextureDesc {
    #[must_use]
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            format,
            wrap: TextureWrap::ClampToEdge,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            border_color: None,
            mip_levels: 1,
        }
    }

    #[must_use]
    pub fn with_wrap(mut self, wrap: TextureWrap) -> Self {
        self.wrap = wrap;
        self
    }

    #[must_use]
    pub fn with_border_color(mut self, color: [f32; 4]) -> Self {
        self.border_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }
}
