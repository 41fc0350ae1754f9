//! Overlays drawn on top of the stage
//!
//! An [`Overlay`] is a single image composited over the scene once per frame,
//! used for the software cursor. It tracks where it was last painted so the
//! stage can invalidate exactly the screen areas that change:
//!
//! - [`set`](Overlay::set) updates image and placement,
//! - [`paint`](Overlay::paint) draws the image and remembers where,
//! - [`compute_damage`](Overlay::compute_damage) reports the previously painted
//!   rectangle (once) and the current one.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::{
    backend::renderer::{Frame, Texture},
    utils::{Logical, Rectangle},
};

/// Damage produced by a single overlay update, at most two rectangles
pub type OverlayDamage = SmallVec<[Rectangle<i32, Logical>; 2]>;

/// State of an overlay
#[derive(Debug)]
pub struct Overlay<T> {
    enabled: bool,
    image: Option<Arc<T>>,
    current_rect: Rectangle<i32, Logical>,
    previous_rect: Rectangle<i32, Logical>,
    previous_is_valid: bool,
}

impl<T> Default for Overlay<T> {
    fn default() -> Self {
        Overlay {
            enabled: false,
            image: None,
            current_rect: Rectangle::default(),
            previous_rect: Rectangle::default(),
            previous_is_valid: false,
        }
    }
}

impl<T: Texture> Overlay<T> {
    /// Create a disabled overlay without image
    pub fn new() -> Overlay<T> {
        Overlay::default()
    }

    /// Update image and placement
    ///
    /// Images are compared by identity. Changing the image enables the overlay
    /// if there is a new image and disables it otherwise. The placement is
    /// always replaced, also when the image stays the same.
    pub fn set(&mut self, image: Option<Arc<T>>, rect: Rectangle<i32, Logical>) {
        let changed = match (&self.image, &image) {
            (Some(old), Some(new)) => !Arc::ptr_eq(old, new),
            (None, None) => false,
            _ => true,
        };

        if changed {
            self.enabled = image.is_some();
            self.image = image;
            trace!(enabled = self.enabled, "Overlay image changed");
        }

        self.current_rect = rect;
    }

    /// Draw the overlay into the frame
    ///
    /// Does nothing while the overlay is disabled. The painted rectangle is only
    /// recorded if drawing succeeded.
    pub fn paint<F>(&mut self, frame: &mut F) -> Result<(), F::Error>
    where
        F: Frame<TextureId = T>,
    {
        if !self.enabled {
            return Ok(());
        }
        let Some(image) = self.image.as_ref() else {
            return Ok(());
        };

        frame.render_texture_at(image, self.current_rect)?;

        self.previous_rect = self.current_rect;
        self.previous_is_valid = true;
        Ok(())
    }

    /// Rectangles to redraw after the overlay changed
    ///
    /// The previously painted rectangle is reported once and then forgotten,
    /// the current one is reported whenever the overlay is enabled.
    pub fn compute_damage(&mut self) -> OverlayDamage {
        let mut damage = OverlayDamage::new();

        if self.previous_is_valid {
            damage.push(self.previous_rect);
            self.previous_is_valid = false;
        }

        if self.enabled {
            damage.push(self.current_rect);
        }

        damage
    }

    /// Whether the overlay is painted
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The current image
    pub fn image(&self) -> Option<&Arc<T>> {
        self.image.as_ref()
    }

    /// Where the overlay is placed now
    pub fn current_rect(&self) -> Rectangle<i32, Logical> {
        self.current_rect
    }

    /// Where the overlay was last painted, if that area was not invalidated yet
    pub fn previous_rect(&self) -> Option<Rectangle<i32, Logical>> {
        self.previous_is_valid.then_some(self.previous_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::renderer::test::{DummyFrame, DummyTexture};

    fn rect(x: i32, y: i32) -> Rectangle<i32, Logical> {
        Rectangle::new((x, y).into(), (24, 24).into())
    }

    fn image() -> Arc<DummyTexture> {
        Arc::new(DummyTexture::new(24, 24))
    }

    #[test]
    fn set_enables_and_moves() {
        let mut overlay = Overlay::new();
        let img = image();

        overlay.set(Some(img.clone()), rect(0, 0));
        overlay.set(Some(img.clone()), rect(10, 10));

        assert!(overlay.is_enabled());
        assert_eq!(overlay.current_rect(), rect(10, 10));
        assert_eq!(overlay.previous_rect(), None);
    }

    #[test]
    fn same_image_keeps_enabled_state() {
        let mut overlay = Overlay::new();
        let img = image();

        overlay.set(Some(img.clone()), rect(0, 0));
        overlay.enabled = false;
        overlay.set(Some(img), rect(1, 1));
        assert!(!overlay.is_enabled());
    }

    #[test]
    fn identity_not_equality() {
        let mut overlay = Overlay::new();
        overlay.set(Some(image()), rect(0, 0));
        let first = overlay.image().cloned().unwrap();

        overlay.set(Some(image()), rect(0, 0));
        assert!(!Arc::ptr_eq(&first, overlay.image().unwrap()));
    }

    #[test]
    fn unsetting_image_disables() {
        let mut overlay = Overlay::new();
        let mut frame = DummyFrame::new();

        overlay.set(Some(image()), rect(0, 0));
        overlay.paint(&mut frame).unwrap();
        overlay.set(None, rect(5, 5));

        assert!(!overlay.is_enabled());
        assert_eq!(overlay.current_rect(), rect(5, 5));
        assert_eq!(overlay.compute_damage().as_slice(), &[rect(0, 0)]);
        assert!(overlay.compute_damage().is_empty());

        overlay.paint(&mut frame).unwrap();
        assert_eq!(frame.draws, vec![rect(0, 0)]);
    }

    #[test]
    fn paint_damage_sequence() {
        let mut overlay = Overlay::new();
        let mut frame = DummyFrame::new();
        let img = image();

        overlay.set(Some(img.clone()), rect(0, 0));
        assert_eq!(overlay.compute_damage().as_slice(), &[rect(0, 0)]);

        overlay.paint(&mut frame).unwrap();
        assert_eq!(frame.draws, vec![rect(0, 0)]);
        assert_eq!(overlay.previous_rect(), Some(rect(0, 0)));

        overlay.set(Some(img), rect(30, 40));
        assert_eq!(overlay.compute_damage().as_slice(), &[rect(0, 0), rect(30, 40)]);
        assert_eq!(overlay.previous_rect(), None);
        assert_eq!(overlay.compute_damage().as_slice(), &[rect(30, 40)]);
    }

    #[test]
    fn set_keeps_painted_rect_until_damage_is_computed() {
        let mut overlay = Overlay::new();
        let mut frame = DummyFrame::new();
        let img = image();

        overlay.set(Some(img.clone()), rect(0, 0));
        overlay.paint(&mut frame).unwrap();

        overlay.set(Some(img.clone()), rect(10, 10));
        overlay.set(Some(img), rect(20, 20));
        assert!(overlay.is_enabled());
        assert_eq!(overlay.current_rect(), rect(20, 20));
        assert_eq!(overlay.previous_rect(), Some(rect(0, 0)));

        assert_eq!(overlay.compute_damage().as_slice(), &[rect(0, 0), rect(20, 20)]);
        assert_eq!(overlay.previous_rect(), None);
    }

    #[test]
    fn only_last_set_before_paint_is_recorded() {
        let mut overlay = Overlay::new();
        let mut frame = DummyFrame::new();
        let img = image();

        overlay.set(Some(img.clone()), rect(0, 0));
        overlay.set(Some(img.clone()), rect(1, 1));
        overlay.set(Some(img), rect(2, 2));
        overlay.paint(&mut frame).unwrap();

        assert_eq!(overlay.previous_rect(), Some(rect(2, 2)));
    }

    #[test]
    fn disabled_overlay_without_history_has_no_damage() {
        let mut overlay = Overlay::<DummyTexture>::new();
        overlay.set(None, rect(3, 3));
        assert!(overlay.compute_damage().is_empty());
    }

    #[test]
    fn failed_paint_is_not_recorded() {
        let mut overlay = Overlay::new();
        let mut frame = DummyFrame::failing();

        overlay.set(Some(image()), rect(0, 0));
        assert!(overlay.paint(&mut frame).is_err());
        assert_eq!(overlay.previous_rect(), None);
    }
}
