//! Stroke style and color.

use super::strip::StripSide;
use crate::error::{OutlineError, Result};
use crate::primitives::{Affine2, Vec2};

/// Straight (non-premultiplied) RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from straight components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Stroke style of one outline.
///
/// `half_width` is expressed in the outline's local units; the render batch
/// applies `scale`, `rotation` and `translation` when placing the strips.
///
/// # Example
///
/// ```
/// use seamline::outline::{OutlineStyle, Rgba};
///
/// let style = OutlineStyle::default()
///     .with_half_width(0.1)
///     .with_color(Rgba::new(0.2, 0.6, 0.2, 1.0))
///     .with_draw_inside(false);
/// assert!(style.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineStyle {
    /// Half of the visual stroke thickness.
    pub half_width: f32,
    /// Stroke boldness multiplier forwarded to the render batch.
    pub weight: f32,
    pub color: Rgba,
    /// Uniform scale applied to the local loop.
    pub scale: f32,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f32,
    pub translation: Vec2<f32>,
    /// Overall opacity in `[0, 1]`, multiplied with `color.a` by the batch.
    pub opacity: f32,
    /// Draw the strip toward the polygon interior.
    pub draw_inside: bool,
    /// Draw the strip toward the polygon exterior.
    pub draw_outside: bool,
    /// Treat the loop as closed (last vertex connects to the first).
    pub closed: bool,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            half_width: 0.05,
            weight: 1.0,
            color: Rgba::BLACK,
            scale: 1.0,
            rotation: 0.0,
            translation: Vec2::zero(),
            opacity: 1.0,
            draw_inside: true,
            draw_outside: true,
            closed: true,
        }
    }
}

impl OutlineStyle {
    /// Creates the default style with the given half-width.
    pub fn with_half_width_of(half_width: f32) -> Self {
        Self {
            half_width,
            ..Default::default()
        }
    }

    /// Sets the half-width. Checked by [`validate`](Self::validate), not here.
    pub fn with_half_width(mut self, half_width: f32) -> Self {
        self.half_width = half_width;
        self
    }

    /// Sets the stroke weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the stroke color.
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Sets the uniform local-to-world scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the rotation in radians.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the world translation.
    ///
    /// # Example
    ///
    /// ```
    /// use seamline::outline::OutlineStyle;
    /// use seamline::{Point2, Vec2};
    ///
    /// let style = OutlineStyle::default()
    ///     .with_scale(2.0)
    ///     .with_translation(Vec2::new(1.0, 0.0));
    /// let p = style.transform().apply_point(Point2::new(1.0, 1.0));
    /// assert_eq!(p, Point2::new(3.0, 2.0));
    /// ```
    pub fn with_translation(mut self, translation: Vec2<f32>) -> Self {
        self.translation = translation;
        self
    }

    /// Sets the overall opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Enables or disables the inside strip.
    pub fn with_draw_inside(mut self, draw_inside: bool) -> Self {
        self.draw_inside = draw_inside;
        self
    }

    /// Enables or disables the outside strip.
    pub fn with_draw_outside(mut self, draw_outside: bool) -> Self {
        self.draw_outside = draw_outside;
        self
    }

    /// Chooses between a closed loop and an open polyline with round caps.
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    /// Checks every numeric field.
    pub fn validate(&self) -> Result<()> {
        validate_half_width(self.half_width)?;
        validate_weight(self.weight)?;
        validate_scale(self.scale)?;
        validate_opacity(self.opacity)?;
        validate_transform(self.rotation, self.translation)
    }

    /// Returns `true` if the given strip side is enabled.
    #[inline]
    pub fn draws(&self, side: StripSide) -> bool {
        match side {
            StripSide::Inside => self.draw_inside,
            StripSide::Outside => self.draw_outside,
        }
    }

    /// `false` when nothing would be visible: non-positive width, weight,
    /// scale, alpha or opacity, or both sides disabled.
    pub fn is_drawable(&self) -> bool {
        self.half_width > 0.0
            && self.weight > 0.0
            && self.scale > 0.0
            && self.color.a > 0.0
            && self.opacity > 0.0
            && (self.draw_inside || self.draw_outside)
    }

    /// Local-to-world transform: scale, then rotate, then translate.
    pub fn transform(&self) -> Affine2<f32> {
        Affine2::similarity(self.scale, self.rotation, self.translation)
    }
}

fn positive_finite(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

pub(crate) fn validate_half_width(v: f32) -> Result<()> {
    if positive_finite(v) {
        Ok(())
    } else {
        Err(OutlineError::InvalidHalfWidth(v))
    }
}

pub(crate) fn validate_weight(v: f32) -> Result<()> {
    if positive_finite(v) {
        Ok(())
    } else {
        Err(OutlineError::InvalidWeight(v))
    }
}

pub(crate) fn validate_scale(v: f32) -> Result<()> {
    if positive_finite(v) {
        Ok(())
    } else {
        Err(OutlineError::InvalidScale(v))
    }
}

pub(crate) fn validate_opacity(v: f32) -> Result<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(OutlineError::InvalidOpacity(v))
    }
}

pub(crate) fn validate_transform(rotation: f32, translation: Vec2<f32>) -> Result<()> {
    if rotation.is_finite() && translation.x.is_finite() && translation.y.is_finite() {
        Ok(())
    } else {
        Err(OutlineError::InvalidTransform)
    }
}
