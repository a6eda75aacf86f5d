//! Software rasterizer implementing [`DrawingSurface`].
//!
//! Paths are flattened into device-space polygons as they are issued. Fills use the
//! nonzero rule with vertical supersampling and exact horizontal span coverage;
//! strokes are expanded into quads with round joins. Pixels are kept premultiplied
//! in `f32` and converted to straight RGBA8 on snapshot.

use std::f64::consts::TAU;

use crate::core::{CANVAS_HEIGHT, CANVAS_WIDTH, RenderFrame, Result, SceneError};
use crate::utils::render2d::{Color, Point, Transform};

use super::{DrawState, DrawingSurface, LineCap, Paint};

/// Sub-scanlines sampled per pixel row.
const SUBSAMPLES: usize = 4;
/// Max distance (device pixels) between a curve and its flattening.
const FLATTEN_TOLERANCE: f64 = 0.1;
/// Largest backing store side we agree to allocate.
const MAX_BACKING_SIDE: u32 = 16_384;

#[derive(Clone, Debug, Default)]
struct SubPath {
    points: Vec<Point>,
    closed: bool,
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    winding: i32,
}

impl Edge {
    fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y || !(a.y.is_finite() && b.y.is_finite() && a.x.is_finite() && b.x.is_finite()) {
            return None;
        }
        Some(if a.y < b.y {
            Edge { x0: a.x, y0: a.y, x1: b.x, y1: b.y, winding: 1 }
        } else {
            Edge { x0: b.x, y0: b.y, x1: a.x, y1: a.y, winding: -1 }
        })
    }

    #[inline]
    fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

/// RGBA raster target with a logical size and a device-pixel-ratio backing store.
pub struct RasterSurface {
    pub width: u32,
    pub height: u32,
    logical_width: f64,
    logical_height: f64,
    pixel_ratio: f64,
    pixels: Vec<[f32; 4]>, // premultiplied RGBA
    path: Vec<SubPath>,
    state: DrawState,
    saved: Vec<DrawState>,
    coverage: Vec<f32>,
}

impl RasterSurface {
    /// Standard 960×600 canvas at the given device pixel ratio.
    pub fn new(pixel_ratio: f64) -> Result<Self> {
        Self::with_size(CANVAS_WIDTH, CANVAS_HEIGHT, pixel_ratio)
    }

    pub fn with_size(logical_width: u32, logical_height: u32, pixel_ratio: f64) -> Result<Self> {
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(SceneError::InvalidDimensions(format!("pixel ratio must be positive, got {}", pixel_ratio)));
        }
        if logical_width == 0 || logical_height == 0 {
            return Err(SceneError::InvalidDimensions(format!(
                "logical size must be non-zero, got {}x{}",
                logical_width, logical_height
            )));
        }
        let width = (f64::from(logical_width) * pixel_ratio).ceil();
        let height = (f64::from(logical_height) * pixel_ratio).ceil();
        if width > f64::from(MAX_BACKING_SIDE) || height > f64::from(MAX_BACKING_SIDE) {
            return Err(SceneError::InvalidDimensions(format!(
                "backing store {}x{} exceeds {} pixels per side",
                width, height, MAX_BACKING_SIDE
            )));
        }
        let (width, height) = (width as u32, height as u32);
        let mut surface = Self {
            width,
            height,
            logical_width: f64::from(logical_width),
            logical_height: f64::from(logical_height),
            pixel_ratio,
            pixels: vec![[0.0; 4]; (width as usize) * (height as usize)],
            path: Vec::new(),
            state: DrawState::default(),
            saved: Vec::new(),
            coverage: vec![0.0; width as usize + 2],
        };
        surface.clear();
        Ok(surface)
    }

    pub fn pixel_ratio(&self) -> f64 { self.pixel_ratio }

    /// Transform every render starts from: logical units to device pixels.
    pub fn base_transform(&self) -> Transform {
        Transform::from_scale(self.pixel_ratio, self.pixel_ratio)
    }

    /// Straight RGBA colour of a backing-store pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height { return None; }
        let [r, g, b, a] = unpremultiply(self.pixels[(y * self.width + x) as usize]);
        Some(Color(r, g, b, a))
    }

    /// Straight RGBA8 bytes, row-major.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            out.extend_from_slice(&unpremultiply(*px));
        }
        out
    }

    /// Copy of the current pixels as a frame; the surface stays usable.
    pub fn snapshot(&self) -> RenderFrame {
        RenderFrame::Pixels { width: self.width, height: self.height, data: self.to_rgba() }
    }

    pub fn into_render_frame(self) -> RenderFrame {
        let data = self.to_rgba();
        RenderFrame::Pixels { width: self.width, height: self.height, data }
    }

    fn current_subpath(&mut self) -> Option<&mut SubPath> {
        self.path.last_mut().filter(|s| !s.closed)
    }

    fn ensure_subpath(&mut self, device: Point) {
        if self.current_subpath().is_none() {
            self.path.push(SubPath { points: vec![device], closed: false });
        }
    }

    fn last_point(&self) -> Option<Point> {
        self.path.last().filter(|s| !s.closed).and_then(|s| s.points.last().copied())
    }

    fn push_point(&mut self, device: Point) {
        match self.current_subpath() {
            Some(sub) => sub.points.push(device),
            None => self.path.push(SubPath { points: vec![device], closed: false }),
        }
    }

    fn fill_polygons(&mut self, polygons: &[Vec<Point>], paint: &Paint) {
        let mut edges = Vec::new();
        for poly in polygons {
            if poly.len() < 3 { continue; }
            for i in 0..poly.len() {
                if let Some(e) = Edge::new(poly[i], poly[(i + 1) % poly.len()]) {
                    edges.push(e);
                }
            }
        }
        if edges.is_empty() { return; }
        let user_from_device = match self.state.transform.inverse() {
            Some(inv) => inv,
            None => return,
        };
        let alpha = self.state.global_alpha as f32;
        if alpha <= 0.0 { return; }
        let solid = match paint {
            Paint::Solid(c) => Some(super::premultiply(*c)),
            _ => None,
        };

        let y_min = edges.iter().map(|e| e.y0).fold(f64::INFINITY, f64::min).floor().max(0.0) as usize;
        let y_max = edges.iter().map(|e| e.y1).fold(f64::NEG_INFINITY, f64::max).ceil().min(f64::from(self.height)) as usize;
        let width = self.width as usize;
        let mut crossings: Vec<(f64, i32)> = Vec::with_capacity(16);

        for py in y_min..y_max {
            let mut lo = width;
            let mut hi = 0usize;
            for s in 0..SUBSAMPLES {
                let sy = py as f64 + (s as f64 + 0.5) / SUBSAMPLES as f64;
                crossings.clear();
                for e in &edges {
                    if sy >= e.y0 && sy < e.y1 {
                        crossings.push((e.x_at(sy), e.winding));
                    }
                }
                if crossings.is_empty() { continue; }
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));
                let mut winding = 0;
                let mut span_start = 0.0;
                for &(x, w) in &crossings {
                    let was_inside = winding != 0;
                    winding += w;
                    if !was_inside && winding != 0 {
                        span_start = x;
                    } else if was_inside && winding == 0 {
                        if let Some((a, b)) = add_span(&mut self.coverage, width, span_start, x, 1.0 / SUBSAMPLES as f32) {
                            lo = lo.min(a);
                            hi = hi.max(b);
                        }
                    }
                }
            }
            if lo > hi { continue; }
            for px in lo..=hi.min(width - 1) {
                let cov = self.coverage[px].min(1.0);
                self.coverage[px] = 0.0;
                if cov <= 0.0 { continue; }
                let src = match solid {
                    Some(c) => c,
                    None => {
                        let device = Point::new(px as f64 + 0.5, py as f64 + 0.5);
                        paint.sample(user_from_device.apply(device))
                    }
                };
                let k = cov * alpha;
                let dst = &mut self.pixels[py * width + px];
                let sa = src[3] * k;
                let inv = 1.0 - sa;
                dst[0] = src[0] * k + dst[0] * inv;
                dst[1] = src[1] * k + dst[1] * inv;
                dst[2] = src[2] * k + dst[2] * inv;
                dst[3] = sa + dst[3] * inv;
            }
        }
    }

    fn stroke_polygons(&self) -> Vec<Vec<Point>> {
        let half = 0.5 * self.state.line_width * self.state.transform.linear_scale();
        let mut polygons = Vec::new();
        if !(half > 0.0) { return polygons; }
        for sub in &self.path {
            let mut pts: Vec<Point> = Vec::with_capacity(sub.points.len());
            for p in &sub.points {
                if pts.last() != Some(p) { pts.push(*p); }
            }
            if sub.closed && pts.len() > 1 && pts.first() == pts.last() {
                pts.pop();
            }
            if pts.len() < 2 { continue; }
            let seg_count = if sub.closed { pts.len() } else { pts.len() - 1 };
            for i in 0..seg_count {
                let (p, q) = (pts[i], pts[(i + 1) % pts.len()]);
                polygons.push(segment_quad(p, q, half));
            }
            let joins = if sub.closed { 0..pts.len() } else { 1..pts.len() - 1 };
            for i in joins {
                polygons.push(circle_polygon(pts[i], half));
            }
            if !sub.closed && self.state.line_cap == LineCap::Round {
                polygons.push(circle_polygon(pts[0], half));
                polygons.push(circle_polygon(pts[pts.len() - 1], half));
            }
        }
        polygons
    }
}

/// Add horizontal coverage for `[a, b)` scaled by `weight`; returns touched pixel range.
fn add_span(coverage: &mut [f32], width: usize, a: f64, b: f64, weight: f32) -> Option<(usize, usize)> {
    let a = a.clamp(0.0, width as f64);
    let b = b.clamp(0.0, width as f64);
    if b <= a { return None; }
    let ia = a.floor() as usize;
    let ib = b.floor() as usize;
    if ia == ib {
        coverage[ia] += ((b - a) as f32) * weight;
        return Some((ia, ia));
    }
    coverage[ia] += ((ia as f64 + 1.0 - a) as f32) * weight;
    for c in &mut coverage[ia + 1..ib] {
        *c += weight;
    }
    if ib < width {
        coverage[ib] += ((b - ib as f64) as f32) * weight;
        Some((ia, ib))
    } else {
        Some((ia, width - 1))
    }
}

/// Quad covering a stroked segment, wound so that its signed area is positive.
fn segment_quad(p: Point, q: Point, half: f64) -> Vec<Point> {
    let (dx, dy) = (q.x - p.x, q.y - p.y);
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = (-dy / len * half, dx / len * half);
    let quad = vec![
        Point::new(p.x + nx, p.y + ny),
        Point::new(q.x + nx, q.y + ny),
        Point::new(q.x - nx, q.y - ny),
        Point::new(p.x - nx, p.y - ny),
    ];
    orient_positive(quad)
}

fn circle_polygon(center: Point, radius: f64) -> Vec<Point> {
    let n = arc_segments(TAU, radius);
    (0..n)
        .map(|i| {
            let t = TAU * i as f64 / n as f64;
            Point::new(center.x + radius * t.cos(), center.y + radius * t.sin())
        })
        .collect()
}

fn orient_positive(mut poly: Vec<Point>) -> Vec<Point> {
    let mut area = 0.0;
    for i in 0..poly.len() {
        let (a, b) = (poly[i], poly[(i + 1) % poly.len()]);
        area += a.x * b.y - b.x * a.y;
    }
    if area < 0.0 { poly.reverse(); }
    poly
}

/// Segments needed to keep an arc of `sweep` radians within tolerance.
fn arc_segments(sweep: f64, radius: f64) -> usize {
    if radius <= FLATTEN_TOLERANCE { return 8; }
    let step = 2.0 * (1.0 - FLATTEN_TOLERANCE / radius).acos();
    ((sweep.abs() / step).ceil() as usize).clamp(8, 512)
}

#[inline]
fn unpremultiply(px: [f32; 4]) -> [u8; 4] {
    let a = px[3].clamp(0.0, 1.0);
    if a <= 0.0 { return [0, 0, 0, 0]; }
    let to_u8 = |v: f32| ((v / a).clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_u8(px[0]), to_u8(px[1]), to_u8(px[2]), (a * 255.0).round() as u8]
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> (f64, f64) { (self.logical_width, self.logical_height) }

    fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = [0.0; 4]);
        self.path.clear();
        self.saved.clear();
        self.state = DrawState::with_transform(self.base_transform());
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.state.transform.apply(Point::new(x, y));
        self.path.push(SubPath { points: vec![p], closed: false });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.state.transform.apply(Point::new(x, y));
        self.push_point(p);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        let c = self.state.transform.apply(Point::new(cpx, cpy));
        let end = self.state.transform.apply(Point::new(x, y));
        self.ensure_subpath(c);
        let start = self.last_point().unwrap_or(c);
        let ddx = start.x - 2.0 * c.x + end.x;
        let ddy = start.y - 2.0 * c.y + end.y;
        let dd = (ddx * ddx + ddy * ddy).sqrt();
        let n = ((dd / (8.0 * FLATTEN_TOLERANCE)).sqrt().ceil() as usize).clamp(1, 256);
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let mt = 1.0 - t;
            self.push_point(Point::new(
                mt * mt * start.x + 2.0 * mt * t * c.x + t * t * end.x,
                mt * mt * start.y + 2.0 * mt * t * c.y + t * t * end.y,
            ));
        }
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        if !(radius >= 0.0) { return; }
        let sweep = if end - start >= TAU { TAU } else { (end - start).rem_euclid(TAU) };
        let n = arc_segments(sweep, radius * self.state.transform.linear_scale());
        let t = self.state.transform;
        for i in 0..=n {
            let angle = start + sweep * i as f64 / n as f64;
            let p = t.apply(Point::new(x + radius * angle.cos(), y + radius * angle.sin()));
            self.push_point(p);
        }
    }

    fn close_path(&mut self) {
        let start = match self.path.last_mut() {
            Some(sub) if !sub.closed => {
                sub.closed = true;
                sub.points.first().copied()
            }
            _ => None,
        };
        if let Some(p) = start {
            self.path.push(SubPath { points: vec![p], closed: false });
        }
    }

    fn fill(&mut self) {
        let polygons: Vec<Vec<Point>> = self.path.iter().map(|s| s.points.clone()).collect();
        let paint = self.state.fill.clone();
        self.fill_polygons(&polygons, &paint);
    }

    fn stroke(&mut self) {
        let polygons = self.stroke_polygons();
        let paint = self.state.stroke.clone();
        self.fill_polygons(&polygons, &paint);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let t = self.state.transform;
        let rect = vec![
            t.apply(Point::new(x, y)),
            t.apply(Point::new(x + width, y)),
            t.apply(Point::new(x + width, y + height)),
            t.apply(Point::new(x, y + height)),
        ];
        let paint = self.state.fill.clone();
        self.fill_polygons(&[rect], &paint);
    }

    fn set_fill_style(&mut self, paint: Paint) { self.state.fill = paint; }
    fn set_stroke_style(&mut self, paint: Paint) { self.state.stroke = paint; }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 { self.state.line_width = width; }
    }

    fn set_line_cap(&mut self, cap: LineCap) { self.state.line_cap = cap; }

    fn save(&mut self) { self.saved.push(self.state.clone()); }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn transform(&self) -> Transform { self.state.transform }
    fn set_transform(&mut self, transform: Transform) { self.state.transform = transform; }
    fn global_alpha(&self) -> f64 { self.state.global_alpha }

    fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::LinearGradient;
    use crate::utils::render2d::{BLACK, WHITE};

    fn small(ratio: f64) -> RasterSurface {
        RasterSurface::with_size(20, 10, ratio).unwrap()
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(RasterSurface::with_size(0, 10, 1.0), Err(SceneError::InvalidDimensions(_))));
        assert!(matches!(RasterSurface::new(0.0), Err(SceneError::InvalidDimensions(_))));
        assert!(matches!(RasterSurface::new(f64::NAN), Err(SceneError::InvalidDimensions(_))));
    }

    #[test]
    fn backing_store_scales_with_ratio() {
        let s = RasterSurface::new(2.0).unwrap();
        assert_eq!((s.width, s.height), (1920, 1200));
        assert_eq!(s.size(), (960.0, 600.0));
        assert_eq!(s.transform(), Transform::from_scale(2.0, 2.0));
    }

    #[test]
    fn fill_rect_covers_whole_pixels() {
        let mut s = small(1.0);
        s.set_fill_style(WHITE.into());
        s.fill_rect(2.0, 3.0, 4.0, 2.0);
        assert_eq!(s.pixel(2, 3), Some(WHITE));
        assert_eq!(s.pixel(5, 4), Some(WHITE));
        assert_eq!(s.pixel(6, 4), Some(Color(0, 0, 0, 0)));
        assert_eq!(s.pixel(2, 5), Some(Color(0, 0, 0, 0)));
    }

    #[test]
    fn half_covered_pixel_gets_half_alpha() {
        let mut s = small(1.0);
        s.set_fill_style(BLACK.into());
        s.fill_rect(0.5, 0.0, 1.0, 1.0);
        assert_eq!(s.pixel(0, 0).unwrap().3, 128);
        assert_eq!(s.pixel(1, 0).unwrap().3, 128);
    }

    #[test]
    fn nonzero_rule_keeps_overlap_filled() {
        let mut s = small(1.0);
        s.set_fill_style(WHITE.into());
        s.begin_path();
        s.move_to(0.0, 0.0);
        for (x, y) in [(10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] { s.line_to(x, y); }
        s.close_path();
        s.move_to(2.0, 2.0);
        for (x, y) in [(8.0, 2.0), (8.0, 8.0), (2.0, 8.0)] { s.line_to(x, y); }
        s.close_path();
        s.fill();
        assert_eq!(s.pixel(5, 5), Some(WHITE));
    }

    #[test]
    fn global_alpha_scales_source() {
        let mut s = small(1.0);
        s.set_global_alpha(0.5);
        s.set_fill_style(WHITE.into());
        s.fill_rect(0.0, 0.0, 20.0, 10.0);
        assert_eq!(s.pixel(4, 4), Some(Color(255, 255, 255, 128)));
    }

    #[test]
    fn source_over_composites() {
        let mut s = small(1.0);
        s.set_fill_style(Paint::Solid(Color(0, 0, 255, 255)));
        s.fill_rect(0.0, 0.0, 20.0, 10.0);
        s.set_fill_style(Paint::Solid(Color(255, 0, 0, 128)));
        s.fill_rect(0.0, 0.0, 20.0, 10.0);
        let px = s.pixel(3, 3).unwrap();
        assert_eq!(px.3, 255);
        assert!(px.0 > 120 && px.0 < 135);
        assert!(px.2 > 120 && px.2 < 135);
    }

    #[test]
    fn stroke_with_round_caps_extends_past_endpoints() {
        let mut s = small(1.0);
        s.set_stroke_style(WHITE.into());
        s.set_line_width(4.0);
        s.begin_path();
        s.move_to(5.0, 5.0);
        s.line_to(15.0, 5.0);
        s.stroke();
        assert_eq!(s.pixel(4, 5).unwrap().3, 0);
        s.set_line_cap(LineCap::Round);
        s.stroke();
        assert!(s.pixel(4, 5).unwrap().3 > 200);
        assert_eq!(s.pixel(10, 5), Some(WHITE));
        assert_eq!(s.pixel(10, 8).unwrap().3, 0);
    }

    #[test]
    fn arc_fills_a_disc() {
        let mut s = small(1.0);
        s.set_fill_style(WHITE.into());
        s.begin_path();
        s.arc(10.0, 5.0, 4.0, 0.0, TAU);
        s.fill();
        assert_eq!(s.pixel(10, 5), Some(WHITE));
        assert_eq!(s.pixel(0, 0).unwrap().3, 0);
    }

    #[test]
    fn mirrored_transform_flips_drawing() {
        let mut s = small(1.0);
        s.save();
        s.translate(0.0, 10.0);
        s.scale(1.0, -1.0);
        s.set_fill_style(WHITE.into());
        s.fill_rect(0.0, 0.0, 3.0, 2.0);
        s.restore();
        // y in [0, 2) lands on device rows 8 and 9
        assert_eq!(s.pixel(1, 9), Some(WHITE));
        assert_eq!(s.pixel(1, 0).unwrap().3, 0);
        assert_eq!(s.transform(), Transform::IDENTITY);
    }

    #[test]
    fn gradients_are_evaluated_in_user_space() {
        let mut s = RasterSurface::with_size(10, 10, 2.0).unwrap();
        let g = LinearGradient::new(0.0, 0.0, 10.0, 0.0)
            .with_stop(0.0, BLACK)
            .with_stop(1.0, WHITE);
        s.set_fill_style(g.into());
        s.fill_rect(0.0, 0.0, 10.0, 10.0);
        let left = s.pixel(0, 0).unwrap();
        let right = s.pixel(19, 0).unwrap();
        assert!(left.0 < 10 && right.0 > 245);
    }

    #[test]
    fn clear_resets_pixels_and_state() {
        let mut s = small(1.0);
        s.set_fill_style(WHITE.into());
        s.fill_rect(0.0, 0.0, 5.0, 5.0);
        s.save();
        s.set_global_alpha(0.2);
        s.clear();
        assert_eq!(s.pixel(1, 1).unwrap().3, 0);
        assert_eq!(s.global_alpha(), 1.0);
        assert_eq!(s.to_rgba().len(), 20 * 10 * 4);
    }
}
