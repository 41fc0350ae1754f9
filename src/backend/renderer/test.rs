#![allow(missing_docs)]
//! Recording renderer for tests

use crate::{
    backend::renderer::{Frame, Texture},
    utils::{Logical, Rectangle},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyTexture {
    width: u32,
    height: u32,
}

impl DummyTexture {
    pub fn new(width: u32, height: u32) -> DummyTexture {
        DummyTexture { width, height }
    }
}

impl Texture for DummyTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Dummy frame failed to draw")]
pub struct DummyError;

/// A frame remembering every draw call
#[derive(Debug, Default)]
pub struct DummyFrame {
    pub draws: Vec<Rectangle<i32, Logical>>,
    pub fail: bool,
}

impl DummyFrame {
    pub fn new() -> DummyFrame {
        DummyFrame::default()
    }

    pub fn failing() -> DummyFrame {
        DummyFrame {
            draws: Vec::new(),
            fail: true,
        }
    }
}

impl Frame for DummyFrame {
    type Error = DummyError;
    type TextureId = DummyTexture;

    fn render_texture_at(
        &mut self,
        _texture: &DummyTexture,
        dst: Rectangle<i32, Logical>,
    ) -> Result<(), DummyError> {
        if self.fail {
            return Err(DummyError);
        }
        self.draws.push(dst);
        Ok(())
    }
}
