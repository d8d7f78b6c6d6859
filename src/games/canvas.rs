// src/games/canvas.rs
// Free-hand drawing data produced by the pointer surface

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stroke {
    pub points: Vec<Point>,
}

/// Strokes in drawing order. At most one stroke is open (pen down) at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Canvas {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    pen_down: bool,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down. Closes any stroke left open by a missed pointer-up.
    pub fn begin_stroke(&mut self, at: Point) {
        self.strokes.push(Stroke { points: vec![at] });
        self.pen_down = true;
    }

    /// Pointer move; ignored unless a stroke is open.
    pub fn extend_stroke(&mut self, to: Point) {
        if !self.pen_down {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.points.push(to);
        }
    }

    /// Pointer up or leave.
    pub fn end_stroke(&mut self) {
        self.pen_down = false;
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.pen_down = false;
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_blank(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.pen_down
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_lifecycle() {
        let mut canvas = Canvas::new();
        canvas.extend_stroke(Point::new(1.0, 1.0));
        assert!(canvas.is_blank(), "move without pen down draws nothing");

        canvas.begin_stroke(Point::new(0.0, 0.0));
        canvas.extend_stroke(Point::new(1.0, 1.0));
        canvas.extend_stroke(Point::new(2.0, 1.0));
        canvas.end_stroke();
        canvas.extend_stroke(Point::new(9.0, 9.0));

        assert_eq!(canvas.strokes().len(), 1);
        assert_eq!(canvas.point_count(), 3);
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn test_clear() {
        let mut canvas = Canvas::new();
        canvas.begin_stroke(Point::new(0.0, 0.0));
        canvas.clear();

        assert!(canvas.is_blank());
        assert!(!canvas.is_drawing());
    }
}
