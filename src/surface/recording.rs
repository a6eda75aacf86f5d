//! A surface that rasterizes nothing and remembers everything it was asked to do.

use crate::core::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::utils::render2d::{Point, Transform};

use super::{DrawState, DrawingSurface, LineCap, Paint};

/// One primitive issued against a surface, in logical coordinates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Clear,
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    QuadraticCurveTo { control: Point, to: Point },
    Arc { center: Point, radius: f64, start: f64, end: f64 },
    ClosePath,
    Fill,
    Stroke,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    SetFillStyle(Paint),
    SetStrokeStyle(Paint),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    Save,
    Restore,
    SetTransform(Transform),
    SetGlobalAlpha(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawKind {
    Fill,
    Stroke,
    FillRect,
}

/// A fill or stroke together with the path and state it was painted with.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawCall {
    pub kind: DrawKind,
    pub path: Vec<Command>,
    pub state: DrawState,
    /// Save-stack depth at the time of the call.
    pub depth: usize,
}

impl DrawCall {
    pub fn paint(&self) -> &Paint {
        match self.kind {
            DrawKind::Stroke => &self.state.stroke,
            DrawKind::Fill | DrawKind::FillRect => &self.state.fill,
        }
    }

    /// First point of the path, if it starts with a `MoveTo`.
    pub fn start(&self) -> Option<Point> {
        match self.path.first() {
            Some(Command::MoveTo(p)) => Some(*p),
            _ => None,
        }
    }
}

/// In-memory fake surface.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<Command>,
    draws: Vec<DrawCall>,
    path: Vec<Command>,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl Default for RecordingSurface {
    fn default() -> Self { Self::new() }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::with_size(f64::from(CANVAS_WIDTH), f64::from(CANVAS_HEIGHT))
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            draws: Vec::new(),
            path: Vec::new(),
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[Command] { &self.commands }
    pub fn into_commands(self) -> Vec<Command> { self.commands }
    pub fn draws(&self) -> &[DrawCall] { &self.draws }
    pub fn state(&self) -> &DrawState { &self.state }
    pub fn depth(&self) -> usize { self.saved.len() }

    fn push_segment(&mut self, cmd: Command) {
        self.path.push(cmd.clone());
        self.commands.push(cmd);
    }

    fn record_draw(&mut self, kind: DrawKind, path: Vec<Command>) {
        self.draws.push(DrawCall { kind, path, state: self.state.clone(), depth: self.saved.len() });
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) { (self.width, self.height) }

    fn clear(&mut self) {
        self.commands.push(Command::Clear);
        self.path.clear();
        self.saved.clear();
        self.state = DrawState::default();
    }

    fn begin_path(&mut self) {
        self.commands.push(Command::BeginPath);
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push_segment(Command::MoveTo(Point::new(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push_segment(Command::LineTo(Point::new(x, y)));
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.push_segment(Command::QuadraticCurveTo { control: Point::new(cpx, cpy), to: Point::new(x, y) });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) {
        self.push_segment(Command::Arc { center: Point::new(x, y), radius, start, end });
    }

    fn close_path(&mut self) {
        self.push_segment(Command::ClosePath);
    }

    fn fill(&mut self) {
        self.commands.push(Command::Fill);
        let path = self.path.clone();
        self.record_draw(DrawKind::Fill, path);
    }

    fn stroke(&mut self) {
        self.commands.push(Command::Stroke);
        let path = self.path.clone();
        self.record_draw(DrawKind::Stroke, path);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(Command::FillRect { x, y, width, height });
        let path = vec![
            Command::MoveTo(Point::new(x, y)),
            Command::LineTo(Point::new(x + width, y)),
            Command::LineTo(Point::new(x + width, y + height)),
            Command::LineTo(Point::new(x, y + height)),
            Command::ClosePath,
        ];
        self.record_draw(DrawKind::FillRect, path);
    }

    fn set_fill_style(&mut self, paint: Paint) {
        self.commands.push(Command::SetFillStyle(paint.clone()));
        self.state.fill = paint;
    }

    fn set_stroke_style(&mut self, paint: Paint) {
        self.commands.push(Command::SetStrokeStyle(paint.clone()));
        self.state.stroke = paint;
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(Command::SetLineWidth(width));
        self.state.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(Command::SetLineCap(cap));
        self.state.line_cap = cap;
    }

    fn save(&mut self) {
        self.commands.push(Command::Save);
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        self.commands.push(Command::Restore);
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn transform(&self) -> Transform { self.state.transform }

    fn set_transform(&mut self, transform: Transform) {
        self.commands.push(Command::SetTransform(transform));
        self.state.transform = transform;
    }

    fn global_alpha(&self) -> f64 { self.state.global_alpha }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(Command::SetGlobalAlpha(alpha));
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::render2d::WHITE;

    #[test]
    fn records_paths_with_state() {
        let mut s = RecordingSurface::new();
        s.set_fill_style(WHITE.into());
        s.begin_path();
        s.move_to(1.0, 2.0);
        s.line_to(3.0, 4.0);
        s.close_path();
        s.fill();
        assert_eq!(s.draws().len(), 1);
        let draw = &s.draws()[0];
        assert_eq!(draw.kind, DrawKind::Fill);
        assert_eq!(draw.start(), Some(Point::new(1.0, 2.0)));
        assert_eq!(draw.path.len(), 3);
        assert_eq!(draw.paint(), &Paint::Solid(WHITE));
    }

    #[test]
    fn begin_path_discards_segments() {
        let mut s = RecordingSurface::new();
        s.move_to(1.0, 1.0);
        s.begin_path();
        s.move_to(2.0, 2.0);
        s.stroke();
        assert_eq!(s.draws()[0].path, vec![Command::MoveTo(Point::new(2.0, 2.0))]);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut s = RecordingSurface::new();
        s.set_global_alpha(0.5);
        s.restore();
        assert_eq!(s.global_alpha(), 0.5);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn out_of_range_alpha_is_ignored() {
        let mut s = RecordingSurface::new();
        s.set_global_alpha(1.5);
        s.set_global_alpha(f64::NAN);
        assert_eq!(s.global_alpha(), 1.0);
    }
}
