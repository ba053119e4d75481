//! Declarations common to all contexts.

use crate::info::GLVersion;

use bitflags::bitflags;

bitflags! {
    /// Buffers a headless context's config must provide.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ContextAttributeFlags: u8 {
        const ALPHA   = 0x01;
        const DEPTH   = 0x02;
        const STENCIL = 0x04;
    }
}

/// Attributes used to pick an EGL config and create a context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextAttributes {
    pub version: GLVersion,
    pub flags: ContextAttributeFlags,
}

impl Default for ContextAttributes {
    /// GLES 2 with alpha and stencil, which is what Skia's GPU backend wants for a render target.
    fn default() -> ContextAttributes {
        ContextAttributes {
            version: GLVersion::default(),
            flags: ContextAttributeFlags::ALPHA | ContextAttributeFlags::STENCIL,
        }
    }
}
