/// Straight (non-premultiplied) RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

pub const BLACK: Color = Color(0, 0, 0, 255);
pub const WHITE: Color = Color(255, 255, 255, 255);
pub const TRANSPARENT: Color = Color(0, 0, 0, 0);

// Scene palette.
pub const SKY_HIGH: Color = Color::rgb(0xdf, 0xf3, 0xff);
pub const SKY_MID: Color = Color::rgb(0x9a, 0xd2, 0xff);
pub const SKY_LOW: Color = Color::rgb(0x4f, 0x74, 0xe7);
pub const WATER_TOP: Color = Color::rgb(0x26, 0x60, 0xa4);
pub const WATER_MID: Color = Color::rgb(0x05, 0x3f, 0x6b);
pub const WATER_DEEP: Color = Color::rgb(0x01, 0x22, 0x3b);
pub const HULL: Color = Color::rgb(0x56, 0x24, 0x03);
pub const MAST: Color = Color::rgb(0x70, 0x42, 0x14);
pub const SAIL_BRIGHT: Color = Color::rgb(0xfe, 0xfe, 0xfe);
pub const SAIL_MID: Color = Color::rgb(0xef, 0xf4, 0xff);
pub const SAIL_PALE: Color = Color::rgb(0xd4, 0xe5, 0xff);
pub const FLAG: Color = Color::rgb(0xff, 0x61, 0x50);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Color(r, g, b, 255) }

    /// Colour with a fractional opacity in [0, 1] (clamped).
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Color(r, g, b, unit_to_u8(alpha))
    }

    pub fn alpha(&self) -> f64 { f64::from(self.3) / 255.0 }

    /// Channels as floats in [0, 1].
    pub fn to_unit(self) -> [f32; 4] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
            f32::from(self.3) / 255.0,
        ]
    }
}

#[inline]
fn unit_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A point in logical (user) or device space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// 2×3 affine matrix in canvas order:
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self { Self::IDENTITY }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn from_scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Translation applied first to incoming points (canvas `translate`).
    pub fn translated(self, tx: f64, ty: f64) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..self
        }
    }

    /// Scaling applied first to incoming points (canvas `scale`).
    pub fn scaled(self, sx: f64, sy: f64) -> Self {
        Self { a: self.a * sx, b: self.b * sx, c: self.c * sy, d: self.d * sy, ..self }
    }

    /// Matrix product `self · other` (apply `other` first).
    pub fn then_apply(self, other: Transform) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    pub fn determinant(&self) -> f64 { self.a * self.d - self.b * self.c }

    /// Average linear scale factor, used to size strokes in device space.
    pub fn linear_scale(&self) -> f64 { self.determinant().abs().sqrt() }

    pub fn inverse(&self) -> Option<Transform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() { return None; }
        let inv = 1.0 / det;
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Some(Transform {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }

    pub fn is_identity(&self) -> bool { *self == Self::IDENTITY }
}
