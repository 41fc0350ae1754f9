//! Rendering abstractions
//!
//! The overlay code does not own a renderer. It draws into whatever frame the
//! host compositor is currently rendering, through the [`Frame`] trait.

use std::error::Error;

use crate::utils::{Logical, Rectangle, Size};

#[cfg(any(test, feature = "renderer_test"))]
pub mod test;

/// A texture that can be drawn into a [`Frame`]
pub trait Texture {
    /// Size of the texture plane (w x h)
    fn size(&self) -> Size<i32, Logical> {
        (self.width() as i32, self.height() as i32).into()
    }

    /// Width of the texture plane
    fn width(&self) -> u32;
    /// Height of the texture plane
    fn height(&self) -> u32;
}

/// A frame currently being rendered
///
/// The stage hands the frame to the host for drawing the scene first, overlays
/// are drawn last.
pub trait Frame {
    /// Error type returned by the rendering operations of this frame.
    type Error: Error;
    /// Texture Handle type used by this frame.
    type TextureId: Texture;

    /// Draw a texture stretched onto the destination rectangle
    fn render_texture_at(
        &mut self,
        texture: &Self::TextureId,
        dst: Rectangle<i32, Logical>,
    ) -> Result<(), Self::Error>;
}
