//! # Common Foundation Crate
//!
//! Shared primitives for the document engine: integer geometry, colors, the
//! position-tracked stream reader both lexers run on, and the diagnostic record
//! every lexer and parser reports through.

#![forbid(unsafe_code)]

pub mod stream;

use core::fmt;
use std::ops::{Add, Sub};

pub use stream::{StreamPosition, StreamReader, Symbol};

// ─────────────────────────────────────────────────────────────────────────────
// Diagnostic
// ─────────────────────────────────────────────────────────────────────────────

/// A recoverable problem found while reading input.
///
/// Lexers and parsers never abort on malformed input; they record one of these
/// and keep going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: StreamPosition,
    pub message: String,
}

impl Diagnostic {
    pub fn new(position: StreamPosition, message: impl fmt::Display) -> Self {
        Self {
            position,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
    #[error("hex color must have 6 or 8 digits, found {0}")]
    InvalidLength(usize),
}

/// An 8-bit-per-channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with or without a leading `#`.
    /// Six digits produce a fully opaque color.
    pub fn from_hex(s: &str) -> Result<Self, ColorError> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let digits = s
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidDigit(c)))
            .collect::<Result<Vec<u8>, _>>()?;
        let channel = |i: usize| digits[i] << 4 | digits[i + 1];
        match digits.len() {
            6 => Ok(Self::rgb(channel(0), channel(2), channel(4))),
            8 => Ok(Self::rgba(channel(0), channel(2), channel(4), channel(6))),
            n => Err(ColorError::InvalidLength(n)),
        }
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec2 / Size
// ─────────────────────────────────────────────────────────────────────────────

/// A point in window pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self { width: 0, height: 0 };

    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rect
// ─────────────────────────────────────────────────────────────────────────────

/// An axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Edges are inclusive on both sides.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edges<T>
// ─────────────────────────────────────────────────────────────────────────────

/// Per-side values such as margins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Edges<T> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> Edges<T> {
    pub const fn all(v: T) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl<T: Copy + Add<Output = T>> Edges<T> {
    #[inline]
    pub fn horizontal(&self) -> T {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> T {
        self.top + self.bottom
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_six_digits_is_opaque() {
        assert_eq!(Color::from_hex("#ff0000"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("00ff00"), Ok(Color::rgb(0, 255, 0)));
    }

    #[test]
    fn color_from_eight_digits_keeps_alpha() {
        assert_eq!(Color::from_hex("#11223344"), Ok(Color::rgba(0x11, 0x22, 0x33, 0x44)));
    }

    #[test]
    fn color_rejects_other_lengths_and_digits() {
        assert_eq!(Color::from_hex("#fff"), Err(ColorError::InvalidLength(3)));
        assert_eq!(Color::from_hex("#gg0000"), Err(ColorError::InvalidDigit('g')));
    }

    #[test]
    fn color_display_round_trips() {
        let c = Color::rgba(4, 97, 208, 255);
        assert_eq!(c.to_string(), "#0461d0ff");
        assert_eq!(Color::from_hex(&c.to_string()), Ok(c));
    }

    #[test]
    fn rect_contains_is_inclusive() {
        let r = Rect::new(10, 10, 20, 5);
        assert!(r.contains(Vec2::new(10, 10)));
        assert!(r.contains(Vec2::new(30, 15)));
        assert!(!r.contains(Vec2::new(31, 15)));
        assert!(!r.contains(Vec2::new(9, 12)));
    }

    #[test]
    fn edges_sums() {
        let e = Edges { top: 1, right: 2, bottom: 3, left: 4 };
        assert_eq!(e.horizontal(), 6);
        assert_eq!(e.vertical(), 4);
        assert_eq!(Edges::all(2).vertical(), 4);
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::new(StreamPosition { row: 1, column: 4 }, "unexpected '>'");
        assert_eq!(d.to_string(), "2:5: unexpected '>'");
    }
}
