// plywood-gl/src/skia/texture.rs
//
//! Importing GLES textures into Skia.

use crate::Error;

use euclid::default::Size2D;
use skia_safe::gpu::gl::TextureInfo;
use skia_safe::gpu::{backend_textures, images, DirectContext, Mipmapped, SurfaceOrigin};
use skia_safe::{AlphaType, ColorType, Image};

/// An existing GLES texture, as a client renderer hands it out.
///
/// The texture stays owned by whoever created it; Skia only borrows it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GLESTexture {
    /// `GL_TEXTURE_2D`, or `GL_TEXTURE_EXTERNAL_OES` for imported buffers.
    pub target: u32,
    pub id: u32,
    pub size: Size2D<i32>,
}

impl GLESTexture {
    pub fn new(target: u32, id: u32, size: Size2D<i32>) -> GLESTexture {
        GLESTexture { target, id, size }
    }

    // Skia asserts on empty textures, so those never reach it.
    fn is_importable(&self) -> bool {
        self.id != 0 && self.size.width > 0 && self.size.height > 0
    }

    /// The texture as Skia describes it: RGBA8 storage behind the given target and name.
    pub fn texture_info(&self) -> TextureInfo {
        let mut info = TextureInfo::from_target_and_id(self.target, self.id);
        info.format = glow::RGBA8;
        info
    }

    /// Borrows the texture as a Skia image that draws with `context`.
    ///
    /// The texture must stay alive and unchanged for as long as the image is used.
    pub fn to_image(&self, context: &mut DirectContext) -> Result<Image, Error> {
        if !self.is_importable() {
            warn!("refusing to import empty texture {:?}", self);
            return Err(Error::TextureImportFailed);
        }

        let backend_texture = unsafe {
            backend_textures::make_gl(
                (self.size.width, self.size.height),
                Mipmapped::No,
                &self.texture_info(),
                "client texture",
            )
        };
        if !backend_texture.is_valid() {
            warn!("Skia rejected texture {:?}", self);
            return Err(Error::TextureImportFailed);
        }

        images::borrow_texture_from(
            context,
            &backend_texture,
            SurfaceOrigin::TopLeft,
            ColorType::RGBA8888,
            AlphaType::Premul,
            None,
        )
        .ok_or(Error::TextureImportFailed)
    }
}
