/// Pixel formats shared by attachments, surfaces and texture buffers

/// Graphics pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum GfxFormat {
    /// No format / invalid
    Unknown,

    // Color formats
    R8G8B8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32_UINT,
    R32G32B32A32_SFLOAT,

    // Block-compressed formats
    BC1_RGB,
    BC3,

    // Depth/stencil formats
    D16,
    X8D24,
    D24S8,
    D32_FLOAT,
    S8,
    D32S8_FLOAT,
}

impl GfxFormat {
    /// Returns true for any format with a depth and/or stencil component
    pub fn is_depth_stencil(&self) -> bool {
        matches!(
            self,
            GfxFormat::D16
                | GfxFormat::X8D24
                | GfxFormat::D24S8
                | GfxFormat::D32_FLOAT
                | GfxFormat::S8
                | GfxFormat::D32S8_FLOAT
        )
    }

    /// Returns true for block-compressed formats
    pub fn is_compressed(&self) -> bool {
        matches!(self, GfxFormat::BC1_RGB | GfxFormat::BC3)
    }

    /// Returns false only for [`GfxFormat::Unknown`]
    pub fn is_valid(&self) -> bool {
        *self != GfxFormat::Unknown
    }

    /// Size of a single element in bytes
    ///
    /// Block-compressed formats have no per-element size and return 0.
    pub fn size(&self) -> u32 {
        match self {
            GfxFormat::Unknown => 0,
            GfxFormat::R8G8B8_UNORM => 3,
            GfxFormat::R8G8B8A8_UNORM
            | GfxFormat::R8G8B8A8_SRGB
            | GfxFormat::B8G8R8A8_UNORM => 4,
            GfxFormat::R16G16B16A16_SFLOAT => 8,
            GfxFormat::R32_SFLOAT | GfxFormat::R32_UINT => 4,
            GfxFormat::R32G32B32A32_SFLOAT => 16,
            GfxFormat::BC1_RGB | GfxFormat::BC3 => 0,
            GfxFormat::D16 => 2,
            GfxFormat::X8D24 | GfxFormat::D24S8 | GfxFormat::D32_FLOAT => 4,
            GfxFormat::S8 => 1,
            GfxFormat::D32S8_FLOAT => 5,
        }
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
