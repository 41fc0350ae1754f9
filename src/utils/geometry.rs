use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Sub};

/// Type-level marker for the logical coordinate space
///
/// The global monitor layout, pointer positions and the stage all live in this space.
#[derive(Debug)]
pub struct Logical;

/// Numeric type usable as a coordinate of [`Point`], [`Size`] and [`Rectangle`]
///
/// Implemented for `i32` (pixel grid) and `f64` (sub-pixel pointer positions).
pub trait Coordinate:
    Sized + Add<Self, Output = Self> + Sub<Self, Output = Self> + PartialOrd + Default + Copy + fmt::Debug
{
    /// Zero
    const ZERO: Self;
    /// The extent of a single pixel
    const ONE: Self;
    /// Lossless widening to f64
    fn to_f64(self) -> f64;
    /// Half of the value, truncated for integers
    fn halve(self) -> Self;
    /// Addition clamped to the range of the type
    fn saturating_add(self, other: Self) -> Self;
    /// Subtraction clamped to the range of the type
    fn saturating_sub(self, other: Self) -> Self;

    /// The smaller of both values
    fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// The larger of both values
    fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }
}

impl Coordinate for i32 {
    const ZERO: i32 = 0;
    const ONE: i32 = 1;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn halve(self) -> i32 {
        self / 2
    }

    #[inline]
    fn saturating_add(self, other: i32) -> i32 {
        i32::saturating_add(self, other)
    }

    #[inline]
    fn saturating_sub(self, other: i32) -> i32 {
        i32::saturating_sub(self, other)
    }
}

impl Coordinate for f64 {
    const ZERO: f64 = 0.0;
    const ONE: f64 = 1.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn halve(self) -> f64 {
        self / 2.0
    }

    #[inline]
    fn saturating_add(self, other: f64) -> f64 {
        self + other
    }

    #[inline]
    fn saturating_sub(self, other: f64) -> f64 {
        self - other
    }
}

/*
 * Point
 */

/// A point as defined by its x and y coordinates
///
/// Operations on points are saturating.
pub struct Point<N, Kind> {
    /// horizontal coordinate
    pub x: N,
    /// vertical coordinate
    pub y: N,
    _kind: PhantomData<Kind>,
}

impl<N: Coordinate, Kind> Point<N, Kind> {
    /// Convert the underlying numerical type to f64
    #[inline]
    pub fn to_f64(self) -> Point<f64, Kind> {
        (self.x.to_f64(), self.y.to_f64()).into()
    }
}

impl<Kind> Point<f64, Kind> {
    /// The pixel this point lies in
    #[inline]
    pub fn to_i32_floor(self) -> Point<i32, Kind> {
        (self.x.floor() as i32, self.y.floor() as i32).into()
    }
}

impl<N: fmt::Debug, Kind> fmt::Debug for Point<N, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Point<{}>", std::any::type_name::<Kind>()))?;
        f.debug_struct("")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<N, Kind> From<(N, N)> for Point<N, Kind> {
    #[inline]
    fn from((x, y): (N, N)) -> Point<N, Kind> {
        Point {
            x,
            y,
            _kind: PhantomData,
        }
    }
}

impl<N: Coordinate, Kind> Add for Point<N, Kind> {
    type Output = Point<N, Kind>;
    #[inline]
    fn add(self, other: Point<N, Kind>) -> Point<N, Kind> {
        (self.x.saturating_add(other.x), self.y.saturating_add(other.y)).into()
    }
}

impl<N: Coordinate, Kind> Sub for Point<N, Kind> {
    type Output = Point<N, Kind>;
    #[inline]
    fn sub(self, other: Point<N, Kind>) -> Point<N, Kind> {
        (self.x.saturating_sub(other.x), self.y.saturating_sub(other.y)).into()
    }
}

impl<N: Copy, Kind> Clone for Point<N, Kind> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Copy, Kind> Copy for Point<N, Kind> {}

impl<N: PartialEq, Kind> PartialEq for Point<N, Kind> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<N: Eq, Kind> Eq for Point<N, Kind> {}

impl<N: Default, Kind> Default for Point<N, Kind> {
    #[inline]
    fn default() -> Self {
        (N::default(), N::default()).into()
    }
}

/*
 * Size
 */

/// A size as defined by its width and height
///
/// Constructing a size with a negative extent is caught by a `debug_assert!()`.
pub struct Size<N, Kind> {
    /// horizontal extent
    pub w: N,
    /// vertical extent
    pub h: N,
    _kind: PhantomData<Kind>,
}

impl<N: Coordinate, Kind> Size<N, Kind> {
    /// Convert the underlying numerical type to f64
    #[inline]
    pub fn to_f64(self) -> Size<f64, Kind> {
        (self.w.to_f64(), self.h.to_f64()).into()
    }
}

impl<N: fmt::Debug, Kind> fmt::Debug for Size<N, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Size<{}>", std::any::type_name::<Kind>()))?;
        f.debug_struct("")
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl<N: Coordinate, Kind> From<(N, N)> for Size<N, Kind> {
    #[inline]
    fn from((w, h): (N, N)) -> Size<N, Kind> {
        debug_assert!(
            w >= N::ZERO && h >= N::ZERO,
            "Attempting to create a `Size` of negative size: {:?}",
            (w, h)
        );
        Size {
            w,
            h,
            _kind: PhantomData,
        }
    }
}

impl<N: Copy, Kind> Clone for Size<N, Kind> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Copy, Kind> Copy for Size<N, Kind> {}

impl<N: PartialEq, Kind> PartialEq for Size<N, Kind> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w && self.h == other.h
    }
}

impl<N: Eq, Kind> Eq for Size<N, Kind> {}

impl<N: Default, Kind> Default for Size<N, Kind> {
    #[inline]
    fn default() -> Self {
        Size {
            w: N::default(),
            h: N::default(),
            _kind: PhantomData,
        }
    }
}

/*
 * Rectangle
 */

/// A rectangle defined by its top-left corner and dimensions
pub struct Rectangle<N, Kind> {
    /// Location of the top-left corner of the rectangle
    pub loc: Point<N, Kind>,
    /// Size of the rectangle, as (width, height)
    pub size: Size<N, Kind>,
}

impl<N: Coordinate, Kind> Rectangle<N, Kind> {
    /// Create a new [`Rectangle`] from the coordinates of its top-left corner and its dimensions
    #[inline]
    pub fn new(loc: Point<N, Kind>, size: Size<N, Kind>) -> Self {
        Rectangle { loc, size }
    }

    /// Convert the underlying numerical type to f64
    #[inline]
    pub fn to_f64(self) -> Rectangle<f64, Kind> {
        Rectangle {
            loc: self.loc.to_f64(),
            size: self.size.to_f64(),
        }
    }

    /// Left edge, inclusive
    #[inline]
    pub fn left(&self) -> N {
        self.loc.x
    }

    /// Top edge, inclusive
    #[inline]
    pub fn top(&self) -> N {
        self.loc.y
    }

    /// Right edge, exclusive
    #[inline]
    pub fn right(&self) -> N {
        self.loc.x.saturating_add(self.size.w)
    }

    /// Bottom edge, exclusive
    #[inline]
    pub fn bottom(&self) -> N {
        self.loc.y.saturating_add(self.size.h)
    }

    /// Checks whether given [`Point`] is inside the rectangle
    ///
    /// The test is half-open: the left and top edges belong to the rectangle,
    /// the right and bottom edges do not.
    #[inline]
    pub fn contains<P: Into<Point<N, Kind>>>(self, point: P) -> bool {
        let p: Point<N, Kind> = point.into();
        (p.x >= self.left()) && (p.x < self.right()) && (p.y >= self.top()) && (p.y < self.bottom())
    }

    /// Clamp a [`Point`] onto the pixels covered by this rectangle
    ///
    /// Unlike [`contains`](Rectangle::contains) the bounds are inclusive: each
    /// axis ends up in `[left, right - 1]` and `[top, bottom - 1]`.
    #[inline]
    pub fn clamp_point<P: Into<Point<N, Kind>>>(self, point: P) -> Point<N, Kind> {
        let p: Point<N, Kind> = point.into();
        let last_x = self.right().saturating_sub(N::ONE);
        let last_y = self.bottom().saturating_sub(N::ONE);
        (p.x.max(self.left()).min(last_x), p.y.max(self.top()).min(last_y)).into()
    }

    /// Center of the rectangle, truncated towards the top-left corner for integer coordinates
    #[inline]
    pub fn center(self) -> Point<N, Kind> {
        (
            self.loc.x.saturating_add(self.size.w.halve()),
            self.loc.y.saturating_add(self.size.h.halve()),
        )
            .into()
    }
}

impl<N: fmt::Debug, Kind> fmt::Debug for Rectangle<N, Kind> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Rectangle<{}>", std::any::type_name::<Kind>()))?;
        f.debug_struct("")
            .field("x", &self.loc.x)
            .field("y", &self.loc.y)
            .field("width", &self.size.w)
            .field("height", &self.size.h)
            .finish()
    }
}

impl<N: Copy, Kind> Clone for Rectangle<N, Kind> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Copy, Kind> Copy for Rectangle<N, Kind> {}

impl<N: PartialEq, Kind> PartialEq for Rectangle<N, Kind> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.loc == other.loc && self.size == other.size
    }
}

impl<N: Eq, Kind> Eq for Rectangle<N, Kind> {}

impl<N: Default, Kind> Default for Rectangle<N, Kind> {
    #[inline]
    fn default() -> Self {
        Rectangle {
            loc: Point::default(),
            size: Size::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Logical, Point, Rectangle};

    fn monitor() -> Rectangle<i32, Logical> {
        Rectangle::new((100, 50).into(), (1920, 1080).into())
    }

    #[test]
    fn contains_is_half_open() {
        let rect = monitor();

        assert!(rect.contains((100, 50)));
        assert!(rect.contains((2019, 1129)));
        assert!(!rect.contains((2020, 60)));
        assert!(!rect.contains((110, 1130)));
        assert!(!rect.contains((99, 60)));
        assert!(!rect.contains((110, 49)));
    }

    #[test]
    fn contains_fractional_points() {
        let rect = monitor().to_f64();

        assert!(rect.contains((2019.99, 1129.99)));
        assert!(!rect.contains((2020.0, 500.0)));
        assert!(!rect.contains((99.5, 500.0)));
    }

    #[test]
    fn clamp_point_uses_inclusive_pixel_bounds() {
        let rect = monitor();

        assert_eq!(rect.clamp_point((5000, -20)), Point::from((2019, 50)));
        assert_eq!(rect.clamp_point((0, 4000)), Point::from((100, 1129)));
        assert_eq!(rect.clamp_point((500, 500)), Point::from((500, 500)));
    }

    #[test]
    fn clamp_point_float() {
        let rect = monitor().to_f64();

        assert_eq!(rect.clamp_point((2019.5, 2000.0)), Point::from((2019.0, 1129.0)));
    }

    #[test]
    fn center_truncates() {
        let rect = Rectangle::<i32, Logical>::new((0, 0).into(), (1281, 1025).into());
        assert_eq!(rect.center(), Point::from((640, 512)));
        assert_eq!(monitor().center(), Point::from((1060, 590)));
    }

    #[test]
    fn pixel_of_fractional_point() {
        let p: Point<f64, Logical> = (10.7, -0.5).into();
        assert_eq!(p.to_i32_floor(), Point::from((10, -1)));
    }
}
