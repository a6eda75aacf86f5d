//! The drawing-surface seam between the scene and whatever consumes its primitives.
//!
//! The capability set mirrors a 2D canvas context: path construction, fills and
//! strokes, solid or gradient paints, an affine transform and a global alpha, all
//! saved and restored as one unit.

pub mod raster;
pub mod recording;

use std::ops::{Deref, DerefMut};

use crate::utils::render2d::{BLACK, Color, Point, Transform};

pub use raster::RasterSurface;
pub use recording::{Command, RecordingSurface};

/// How open stroke ends are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// One colour stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Linear gradient between two points, in the coordinate space current at paint time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { start: Point::new(x0, y0), end: Point::new(x1, y1), stops: Vec::new() }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        push_stop(&mut self.stops, offset, color);
        self
    }

    /// Gradient parameter at `p`, or `None` when the gradient has zero length.
    pub fn param_at(&self, p: Point) -> Option<f64> {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 { return None; }
        Some(((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len2)
    }
}

/// Two-circle radial gradient.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadialGradient {
    pub inner: Point,
    pub inner_radius: f64,
    pub outer: Point,
    pub outer_radius: f64,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        Self {
            inner: Point::new(x0, y0),
            inner_radius: r0,
            outer: Point::new(x1, y1),
            outer_radius: r1,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        push_stop(&mut self.stops, offset, color);
        self
    }

    /// Largest ω such that `p` lies on the circle interpolated at ω with a
    /// non-negative radius.
    pub fn param_at(&self, p: Point) -> Option<f64> {
        let cdx = self.outer.x - self.inner.x;
        let cdy = self.outer.y - self.inner.y;
        let dr = self.outer_radius - self.inner_radius;
        let pdx = p.x - self.inner.x;
        let pdy = p.y - self.inner.y;
        let a = cdx * cdx + cdy * cdy - dr * dr;
        let b = pdx * cdx + pdy * cdy + self.inner_radius * dr;
        let c = pdx * pdx + pdy * pdy - self.inner_radius * self.inner_radius;
        let radius_ok = |w: f64| self.inner_radius + w * dr >= 0.0;

        if a.abs() < 1e-12 {
            if b == 0.0 { return None; }
            let w = c / (2.0 * b);
            return radius_ok(w).then_some(w);
        }
        let disc = b * b - a * c;
        if disc < 0.0 { return None; }
        let root = disc.sqrt();
        let (w1, w2) = ((b + root) / a, (b - root) / a);
        let (hi, lo) = if w1 >= w2 { (w1, w2) } else { (w2, w1) };
        if radius_ok(hi) {
            Some(hi)
        } else if radius_ok(lo) {
            Some(lo)
        } else {
            None
        }
    }
}

fn push_stop(stops: &mut Vec<ColorStop>, offset: f64, color: Color) {
    let offset = offset.clamp(0.0, 1.0);
    // Equal offsets keep insertion order.
    let idx = stops.partition_point(|s| s.offset <= offset);
    stops.insert(idx, ColorStop { offset, color });
}

/// Premultiplied colour of a stop list at parameter `t`, clamped to the end stops.
pub fn sample_stops(stops: &[ColorStop], t: f64) -> [f32; 4] {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return [0.0; 4],
    };
    if t <= first.offset { return premultiply(first.color); }
    if t >= last.offset { return premultiply(last.color); }
    for pair in stops.windows(2) {
        let (s0, s1) = (pair[0], pair[1]);
        if t >= s0.offset && t <= s1.offset {
            let span = s1.offset - s0.offset;
            if span <= 0.0 { return premultiply(s1.color); }
            let k = ((t - s0.offset) / span) as f32;
            let (c0, c1) = (premultiply(s0.color), premultiply(s1.color));
            return [
                c0[0] + (c1[0] - c0[0]) * k,
                c0[1] + (c1[1] - c0[1]) * k,
                c0[2] + (c1[2] - c0[2]) * k,
                c0[3] + (c1[3] - c0[3]) * k,
            ];
        }
    }
    premultiply(last.color)
}

#[inline]
pub fn premultiply(color: Color) -> [f32; 4] {
    let [r, g, b, a] = color.to_unit();
    [r * a, g * a, b * a, a]
}

/// What a fill or stroke is painted with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Default for Paint {
    fn default() -> Self { Paint::Solid(BLACK) }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self { Paint::Solid(c) }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self { Paint::Linear(g) }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self { Paint::Radial(g) }
}

impl Paint {
    /// Premultiplied colour at a user-space point.
    pub fn sample(&self, p: Point) -> [f32; 4] {
        match self {
            Paint::Solid(c) => premultiply(*c),
            Paint::Linear(g) => g.param_at(p).map_or([0.0; 4], |t| sample_stops(&g.stops, t)),
            Paint::Radial(g) => g.param_at(p).map_or([0.0; 4], |t| sample_stops(&g.stops, t)),
        }
    }
}

/// Everything `save` captures and `restore` brings back.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawState {
    pub transform: Transform,
    pub global_alpha: f64,
    pub fill: Paint,
    pub stroke: Paint,
    pub line_width: f64,
    pub line_cap: LineCap,
}

impl DrawState {
    pub fn with_transform(transform: Transform) -> Self {
        Self {
            transform,
            global_alpha: 1.0,
            fill: Paint::default(),
            stroke: Paint::default(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
        }
    }
}

impl Default for DrawState {
    fn default() -> Self { Self::with_transform(Transform::IDENTITY) }
}

/// A 2D drawing context. Coordinates are logical units; the surface maps them to
/// its backing store.
pub trait DrawingSurface {
    /// Logical width and height.
    fn size(&self) -> (f64, f64);

    /// Erase everything and reset the drawing state.
    fn clear(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    /// Clockwise arc around `(x, y)` from `start` to `end` radians.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64);
    fn close_path(&mut self);

    fn fill(&mut self);
    fn stroke(&mut self);
    /// Fill an axis-aligned rectangle without touching the current path.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_fill_style(&mut self, paint: Paint);
    fn set_stroke_style(&mut self, paint: Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);

    fn save(&mut self);
    /// Pop the last saved state; a no-op when nothing is saved.
    fn restore(&mut self);

    fn transform(&self) -> Transform;
    fn set_transform(&mut self, transform: Transform);
    fn global_alpha(&self) -> f64;
    fn set_global_alpha(&mut self, alpha: f64);

    fn translate(&mut self, tx: f64, ty: f64) {
        let t = self.transform().translated(tx, ty);
        self.set_transform(t);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.transform().scaled(sx, sy);
        self.set_transform(t);
    }
}

/// Scoped drawing state: saves on creation and restores when dropped, so the
/// state comes back on every exit path.
pub struct StateGuard<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> StateGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for StateGuard<'_, S> {
    type Target = S;
    fn deref(&self) -> &S { self.surface }
}

impl<S: DrawingSurface + ?Sized> DerefMut for StateGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S { self.surface }
}

impl<S: DrawingSurface + ?Sized> Drop for StateGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
