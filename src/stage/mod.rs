//! The compositor stage
//!
//! The [`Stage`] owns the overlays painted on top of the scene. Right now this
//! is exactly one overlay, the cursor. Updating it through
//! [`Stage::set_cursor`] immediately invalidates the screen areas the cursor
//! leaves and enters, using the host's [`RedrawQueue`]. Once per frame the host
//! calls [`Stage::paint`], which draws the scene first and the cursor last.
//!
//! The cursor overlay writes straight into the frame the compositor presents,
//! which is only valid while running as the display server. Enabling or
//! painting it with a nested backend is a programming error and handled
//! according to the configured [`PreconditionPolicy`].
//!
//! ```
//! use std::sync::Arc;
//! use barricade::{
//!     backend::{renderer::{Frame, Texture}, BackendKind, PreconditionPolicy},
//!     stage::Stage,
//!     utils::{Logical, Rectangle},
//! };
//! # struct CursorTexture;
//! # impl Texture for CursorTexture {
//! #     fn width(&self) -> u32 { 24 }
//! #     fn height(&self) -> u32 { 24 }
//! # }
//! # struct HostFrame;
//! # impl Frame for HostFrame {
//! #     type Error = std::convert::Infallible;
//! #     type TextureId = CursorTexture;
//! #     fn render_texture_at(
//! #         &mut self,
//! #         _: &CursorTexture,
//! #         _: Rectangle<i32, Logical>,
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//!
//! let mut stage = Stage::new(BackendKind::Native, PreconditionPolicy::Report);
//! let mut damage: Vec<Rectangle<i32, Logical>> = Vec::new();
//!
//! stage.set_cursor(
//!     Some(Arc::new(CursorTexture)),
//!     Rectangle::new((10, 10).into(), (24, 24).into()),
//!     &mut damage,
//! )?;
//! assert_eq!(damage.len(), 1);
//!
//! stage.paint(&mut HostFrame, |_scene| Ok(()))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod overlay;

use std::sync::Arc;

use tracing::error;

use crate::{
    backend::{renderer::Frame, renderer::Texture, BackendConfig, BackendKind, PreconditionPolicy},
    utils::{Logical, Rectangle},
};

pub use self::overlay::{Overlay, OverlayDamage};

/// Errors of stage operations
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    /// The cursor overlay needs exclusive access to the presented framebuffer
    #[error("The cursor overlay is only available when running as the display server")]
    NotDisplayServer,
}

/// Errors of [`Stage::paint`]
#[derive(Debug, thiserror::Error)]
pub enum PaintError<E: std::error::Error> {
    /// A stage precondition was violated
    #[error(transparent)]
    Stage(#[from] StageError),
    /// The frame failed to draw
    #[error("Rendering the stage failed: {0}")]
    Render(E),
}

/// Primitive of the host's damage tracking, invalidating part of the stage
pub trait RedrawQueue {
    /// Queue a redraw of the given area
    fn queue_redraw_with_clip(&mut self, clip: Rectangle<i32, Logical>);
}

impl RedrawQueue for Vec<Rectangle<i32, Logical>> {
    fn queue_redraw_with_clip(&mut self, clip: Rectangle<i32, Logical>) {
        self.push(clip);
    }
}

/// The top-level paint target of the compositor
#[derive(Debug)]
pub struct Stage<T> {
    kind: BackendKind,
    preconditions: PreconditionPolicy,
    cursor_overlay: Overlay<T>,
}

impl<T: Texture> Stage<T> {
    /// Create the stage for a backend of the given kind
    pub fn new(kind: BackendKind, preconditions: PreconditionPolicy) -> Stage<T> {
        Stage {
            kind,
            preconditions,
            cursor_overlay: Overlay::new(),
        }
    }

    /// Create the stage matching a backend configuration
    pub fn from_config(config: &BackendConfig) -> Stage<T> {
        Stage::new(config.kind, config.preconditions)
    }

    /// The cursor overlay
    pub fn cursor_overlay(&self) -> &Overlay<T> {
        &self.cursor_overlay
    }

    /// Update the cursor image and placement
    ///
    /// Queues redraws for the area the cursor was last painted at and the area
    /// it is placed at now. Passing `None` hides the cursor, which is valid in
    /// any mode.
    pub fn set_cursor<Q>(
        &mut self,
        image: Option<Arc<T>>,
        rect: Rectangle<i32, Logical>,
        queue: &mut Q,
    ) -> Result<(), StageError>
    where
        Q: RedrawQueue + ?Sized,
    {
        if image.is_some() {
            self.check_display_server()?;
        }

        self.cursor_overlay.set(image, rect);
        for clip in self.cursor_overlay.compute_damage() {
            queue.queue_redraw_with_clip(clip);
        }
        Ok(())
    }

    /// Paint the stage
    ///
    /// `scene` draws the regular stage content, the overlays are drawn on top.
    #[profiling::function]
    pub fn paint<F, S>(&mut self, frame: &mut F, scene: S) -> Result<(), PaintError<F::Error>>
    where
        F: Frame<TextureId = T>,
        S: FnOnce(&mut F) -> Result<(), F::Error>,
    {
        scene(frame).map_err(PaintError::Render)?;

        if self.cursor_overlay.is_enabled() {
            self.check_display_server()?;
        }
        self.cursor_overlay.paint(frame).map_err(PaintError::Render)
    }

    fn check_display_server(&self) -> Result<(), StageError> {
        if self.kind.is_display_server() {
            return Ok(());
        }

        let err = StageError::NotDisplayServer;
        match self.preconditions {
            PreconditionPolicy::Abort => panic!("{}", err),
            PreconditionPolicy::Report => {
                error!(kind = ?self.kind, "{}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::renderer::test::{DummyError, DummyFrame, DummyTexture};

    fn rect(x: i32, y: i32) -> Rectangle<i32, Logical> {
        Rectangle::new((x, y).into(), (32, 32).into())
    }

    #[test]
    fn cursor_damage_sequence() {
        let mut stage = Stage::new(BackendKind::Native, PreconditionPolicy::Report);
        let mut frame = DummyFrame::new();
        let mut damage: Vec<Rectangle<i32, Logical>> = Vec::new();
        let cursor = Arc::new(DummyTexture::new(32, 32));

        stage
            .set_cursor(Some(cursor.clone()), rect(0, 0), &mut damage)
            .unwrap();
        assert_eq!(damage, vec![rect(0, 0)]);
        damage.clear();

        stage.paint(&mut frame, |_| Ok(())).unwrap();
        assert_eq!(stage.cursor_overlay().previous_rect(), Some(rect(0, 0)));

        stage.set_cursor(Some(cursor), rect(8, 8), &mut damage).unwrap();
        assert_eq!(damage, vec![rect(0, 0), rect(8, 8)]);
        assert_eq!(stage.cursor_overlay().previous_rect(), None);
    }

    #[test]
    fn hiding_cursor_damages_old_position_only() {
        let mut stage = Stage::new(BackendKind::Native, PreconditionPolicy::Report);
        let mut frame = DummyFrame::new();
        let mut damage: Vec<Rectangle<i32, Logical>> = Vec::new();

        stage
            .set_cursor(Some(Arc::new(DummyTexture::new(32, 32))), rect(4, 4), &mut damage)
            .unwrap();
        stage.paint(&mut frame, |_| Ok(())).unwrap();
        damage.clear();

        stage.set_cursor(None, rect(4, 4), &mut damage).unwrap();
        assert_eq!(damage, vec![rect(4, 4)]);
        assert!(!stage.cursor_overlay().is_enabled());
    }

    #[test]
    fn overlay_is_painted_after_scene() {
        let mut stage = Stage::new(BackendKind::Native, PreconditionPolicy::Report);
        let mut frame = DummyFrame::new();
        let mut damage: Vec<Rectangle<i32, Logical>> = Vec::new();
        let background = Rectangle::new((0, 0).into(), (640, 480).into());

        stage
            .set_cursor(Some(Arc::new(DummyTexture::new(32, 32))), rect(1, 2), &mut damage)
            .unwrap();
        stage
            .paint(&mut frame, |frame| {
                frame.render_texture_at(&DummyTexture::new(640, 480), background)
            })
            .unwrap();

        assert_eq!(frame.draws, vec![background, rect(1, 2)]);
    }

    #[test]
    fn scene_errors_skip_overlay() {
        let mut stage = Stage::new(BackendKind::Native, PreconditionPolicy::Report);
        let mut frame = DummyFrame::new();
        let mut damage: Vec<Rectangle<i32, Logical>> = Vec::new();

        stage
            .set_cursor(Some(Arc::new(DummyTexture::new(32, 32))), rect(1, 2), &mut damage)
            .unwrap();
        let result = stage.paint(&mut frame, |_| Err(DummyError));

        assert!(matches!(result, Err(PaintError::Render(DummyError))));
        assert!(frame.draws.is_empty());
        assert_eq!(stage.cursor_overlay().previous_rect(), None);
    }

    #[test]
    fn nested_mode_reports_cursor_image() {
        let mut stage = Stage::new(BackendKind::Nested, PreconditionPolicy::Report);
        let mut damage: Vec<Rectangle<i32, Logical>> = Vec::new();

        assert_eq!(
            stage.set_cursor(Some(Arc::new(DummyTexture::new(32, 32))), rect(0, 0), &mut damage),
            Err(StageError::NotDisplayServer)
        );
        assert!(damage.is_empty());
        assert!(!stage.cursor_overlay().is_enabled());

        // hiding is always fine
        stage.set_cursor(None, rect(0, 0), &mut damage).unwrap();
        stage.paint(&mut DummyFrame::new(), |_| Ok(())).unwrap();
    }

    #[test]
    #[should_panic(expected = "only available when running as the display server")]
    fn nested_mode_aborts() {
        let mut stage = Stage::new(BackendKind::Nested, PreconditionPolicy::Abort);
        let mut damage: Vec<Rectangle<i32, Logical>> = Vec::new();

        let _ = stage.set_cursor(Some(Arc::new(DummyTexture::new(32, 32))), rect(0, 0), &mut damage);
    }
}
