//! Scalar and point types shared by the layout code.
//!
//! Lengths at the fragment level are plain `f64` points on the baseline
//! coordinate system: x grows rightward, y grows downward, and a fragment's
//! origin sits on its baseline at its left edge. Font-relative lengths are
//! expressed in [`Em`] until a font size turns them into points.

use std::fmt::{self, Debug, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

/// Geometric tolerance for inset clamping and edge comparisons.
pub const TOLERANCE: f64 = 1e-6;

/// A length relative to the font size.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Em(f64);

impl Em {
    /// The zero length.
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Create a font-relative length.
    pub const fn new(em: f64) -> Self {
        Self(em)
    }

    /// A thin space, a sixth of an em.
    pub const THIN: Self = Self(1.0 / 6.0);

    /// A medium space, two ninths of an em.
    pub const MEDIUM: Self = Self(2.0 / 9.0);

    /// A thick space, five eighteenths of an em.
    pub const THICK: Self = Self(5.0 / 18.0);

    /// The number of em units.
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Resolve to points at the given font size.
    pub fn at(self, font_size: f64) -> f64 {
        self.0 * font_size
    }
}

impl Add for Em {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Em {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Em {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Neg for Em {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

/// A point on the baseline coordinate system.
#[derive(Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin point.
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The same point with a replaced y coordinate.
    pub fn with_y(self, y: f64) -> Self {
        Self { x: self.x, y }
    }

    /// The same point with a replaced x coordinate.
    pub fn with_x(self, x: f64) -> Self {
        Self { x, y: self.y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// The axis along which a glyph is stretched.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// A corner of a glyph's bounding box, used for math kerning.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// The diagonally opposite corner.
    pub fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }
}

/// An ink color carried by the style context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(0xff, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// Clamps `x` into `[lo + inset, hi - inset]`.
///
/// Used when proposing ray-shoot entry points so that the resulting point
/// lies strictly inside the target box.
pub(crate) fn clamp_inset(x: f64, lo: f64, hi: f64, inset: f64) -> f64 {
    debug_assert!(lo <= hi);
    let (lo, hi) = if hi - lo >= 2.0 * inset { (lo + inset, hi - inset) } else { (lo, hi) };
    x.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn em_resolution() {
        assert_eq!(Em::new(0.5).at(10.0), 5.0);
        assert_eq!(Em::THIN.at(18.0), 3.0);
        assert_eq!(Em::MEDIUM.at(18.0), 4.0);
        assert_eq!(Em::THICK.at(18.0), 5.0);
    }

    #[test]
    fn corner_opposition() {
        assert_eq!(Corner::TopRight.opposite(), Corner::BottomLeft);
        assert_eq!(Corner::BottomRight.opposite(), Corner::TopLeft);
    }

    #[test]
    fn inset_clamping() {
        assert_eq!(clamp_inset(5.0, 0.0, 10.0, 1.0), 5.0);
        assert_eq!(clamp_inset(-3.0, 0.0, 10.0, 1.0), 1.0);
        assert_eq!(clamp_inset(42.0, 0.0, 10.0, 1.0), 9.0);
        // Degenerate boxes stay within their own bounds.
        assert_eq!(clamp_inset(7.0, 2.0, 3.0, 1.0), 3.0);
    }
}
