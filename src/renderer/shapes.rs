//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in world pixels (top-left
//! origin, y down). The pipeline maps the finished batch to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::font;
use super::vertex::Vertex;

/// Per-frame collection of triangles, filled by whatever is drawing
#[derive(Debug, Default, Clone)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned filled rectangle; non-positive sizes draw nothing
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.quad(
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x, y + h),
            Vec2::new(x + w, y + h),
            color,
        );
    }

    /// Rectangle outline drawn inside the given bounds
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, thickness: f32, color: [f32; 4]) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let t = thickness.min(w / 2.0).min(h / 2.0);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y + t, t, h - 2.0 * t, color);
        self.fill_rect(x + w - t, y + t, t, h - 2.0 * t, color);
    }

    /// Line segment as a quad of width `thickness`
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, thickness: f32, color: [f32; 4]) {
        let p1 = Vec2::new(x1, y1);
        let p2 = Vec2::new(x2, y2);
        let dir = (p2 - p1).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let perp = Vec2::new(-dir.y, dir.x) * (thickness / 2.0);
        self.quad(p1 + perp, p1 - perp, p2 + perp, p2 - perp, color);
    }

    /// Hollow circle
    pub fn ring(
        &mut self,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        color: [f32; 4],
        segments: u32,
    ) {
        let segments = segments.max(3);
        self.vertices.reserve((segments * 6) as usize);

        for i in 0..segments {
            let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
            let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
            let d1 = Vec2::new(theta1.cos(), theta1.sin());
            let d2 = Vec2::new(theta2.cos(), theta2.sin());

            self.quad(
                center + d1 * inner_radius,
                center + d1 * outer_radius,
                center + d2 * inner_radius,
                center + d2 * outer_radius,
                color,
            );
        }
    }

    /// Text in the built-in bitmap font, 8 px per character
    pub fn text(&mut self, text: &str, x: f32, y: f32, color: [f32; 4]) {
        self.text_scaled(text, x, y, 1.0, color);
    }

    pub fn text_scaled(&mut self, text: &str, x: f32, y: f32, scale: f32, color: [f32; 4]) {
        for (i, c) in text.chars().enumerate() {
            let cell_x = x + i as f32 * font::CELL_WIDTH * scale;
            for (row, bits) in font::glyph(c).iter().enumerate() {
                let py = y + row as f32 * scale;
                for (col, len) in font::row_runs(*bits) {
                    self.fill_rect(
                        cell_x + col as f32 * scale,
                        py,
                        len as f32 * scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }

    /// Text horizontally centred on `center_x`
    pub fn text_centered(&mut self, text: &str, center_x: f32, y: f32, scale: f32, color: [f32; 4]) {
        let x = center_x - font::text_width(text, scale) / 2.0;
        self.text_scaled(text, x, y, scale, color);
    }

    /// Two triangles; `a b` is one edge and `c d` the opposite one
    fn quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
        self.vertices.push(Vertex::new(a.x, a.y, color));
        self.vertices.push(Vertex::new(b.x, b.y, color));
        self.vertices.push(Vertex::new(c.x, c.y, color));

        self.vertices.push(Vertex::new(c.x, c.y, color));
        self.vertices.push(Vertex::new(b.x, b.y, color));
        self.vertices.push(Vertex::new(d.x, d.y, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;

    #[test]
    fn test_fill_rect_is_two_triangles() {
        let mut batch = ShapeBatch::new();
        batch.fill_rect(10.0, 20.0, 30.0, 40.0, colors::WHITE);
        assert_eq!(batch.vertices().len(), 6);

        let xs: Vec<f32> = batch.vertices().iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = batch.vertices().iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_degenerate_shapes_emit_nothing() {
        let mut batch = ShapeBatch::new();
        batch.fill_rect(0.0, 0.0, 0.0, 10.0, colors::WHITE);
        batch.stroke_rect(0.0, 0.0, -4.0, 10.0, 1.0, colors::WHITE);
        batch.line(5.0, 5.0, 5.0, 5.0, 2.0, colors::WHITE);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_stroke_rect_has_four_sides() {
        let mut batch = ShapeBatch::new();
        batch.stroke_rect(0.0, 0.0, 100.0, 50.0, 2.0, colors::CYAN);
        assert_eq!(batch.vertices().len(), 24);
    }

    #[test]
    fn test_line_width() {
        let mut batch = ShapeBatch::new();
        batch.line(0.0, 0.0, 0.0, 100.0, 4.0, colors::GREY);
        let xs: Vec<f32> = batch.vertices().iter().map(|v| v.position[0]).collect();
        assert!(xs.iter().all(|x| (x.abs() - 2.0).abs() < 1e-5));
    }

    #[test]
    fn test_ring_vertices_stay_within_radii() {
        let mut batch = ShapeBatch::new();
        let center = Vec2::new(480.0, 270.0);
        batch.ring(center, 100.0, 104.0, colors::CYAN, 32);
        assert_eq!(batch.vertices().len(), 32 * 6);
        for v in batch.vertices() {
            let d = Vec2::from(v.position).distance(center);
            assert!((99.99..=104.01).contains(&d));
        }
    }

    #[test]
    fn test_text_emits_one_quad_per_run() {
        let mut batch = ShapeBatch::new();
        // 'I': full top and bottom bars plus one centre pixel on five rows
        batch.text("I", 0.0, 0.0, colors::WHITE);
        assert_eq!(batch.vertices().len(), 7 * 6);

        batch.clear();
        batch.text("   ", 0.0, 0.0, colors::WHITE);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_text_advance() {
        let mut batch = ShapeBatch::new();
        batch.text("II", 100.0, 0.0, colors::WHITE);
        let max_x = batch
            .vertices()
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        // Second glyph starts at 108; its bars end at column 4
        assert_eq!(max_x, 112.0);
    }

    #[test]
    fn test_text_centered() {
        let mut batch = ShapeBatch::new();
        batch.text_centered("-", 480.0, 0.0, 2.0, colors::WHITE);
        let min_x = batch
            .vertices()
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MAX, f32::min);
        // Cell is 16 px wide at scale 2, starting at 472
        assert_eq!(min_x, 472.0);
    }
}
