//! Retained-mode drawing surface
//!
//! The presentation layer creates shapes once and then moves or deletes them
//! through their handle. `Canvas` keeps the shapes in creation order, which is
//! also the order they are painted in.

use std::collections::BTreeMap;

use crate::geom::Rect;

/// Handle of a shape on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u64);

/// Paint role of a filled shape; the renderer picks the colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Body,
    Pipe,
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Small text anchored at its top-left corner
    Label,
    /// Small centred text
    Caption,
    /// Large centred headline
    Banner,
    /// Centred text drawn on top of a button
    Button,
}

impl TextStyle {
    pub fn is_centered(self) -> bool {
        !matches!(self, TextStyle::Label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rect(Style),
    Ellipse(Style),
    Text { text: String, style: TextStyle },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Text shapes have a zero-sized box at their anchor point
    pub bbox: Rect,
}

/// Operations the game needs from whatever it draws on
pub trait Surface {
    fn create_rect(&mut self, bbox: Rect, style: Style) -> ShapeId;
    fn create_ellipse(&mut self, bbox: Rect, style: Style) -> ShapeId;
    fn translate(&mut self, id: ShapeId, dx: f64, dy: f64);
    /// `None` once the shape has been deleted
    fn bounding_box(&self, id: ShapeId) -> Option<Rect>;
    fn delete(&mut self, id: ShapeId);
    /// Every shape whose box intersects `area`, in paint order
    fn overlapping(&self, area: Rect) -> Vec<ShapeId>;
    fn render_text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) -> ShapeId;
    fn set_text(&mut self, id: ShapeId, text: &str);

    /// Translate a shape so its box starts at `target`'s top-left corner
    fn move_to(&mut self, id: ShapeId, target: Rect) {
        if let Some(current) = self.bounding_box(id) {
            let (dx, dy) = (target.x1 - current.x1, target.y1 - current.y1);
            if dx != 0.0 || dy != 0.0 {
                self.translate(id, dx, dy);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    next_id: u64,
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in paint order
    pub fn shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    fn insert(&mut self, kind: ShapeKind, bbox: Rect) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.insert(id, Shape { kind, bbox });
        id
    }
}

impl Surface for Canvas {
    fn create_rect(&mut self, bbox: Rect, style: Style) -> ShapeId {
        self.insert(ShapeKind::Rect(style), bbox)
    }

    fn create_ellipse(&mut self, bbox: Rect, style: Style) -> ShapeId {
        self.insert(ShapeKind::Ellipse(style), bbox)
    }

    fn translate(&mut self, id: ShapeId, dx: f64, dy: f64) {
        if let Some(shape) = self.shapes.get_mut(&id) {
            shape.bbox.translate(dx, dy);
        }
    }

    fn bounding_box(&self, id: ShapeId) -> Option<Rect> {
        self.shapes.get(&id).map(|s| s.bbox)
    }

    fn delete(&mut self, id: ShapeId) {
        self.shapes.remove(&id);
    }

    fn overlapping(&self, area: Rect) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|(_, shape)| shape.bbox.overlaps(&area))
            .map(|(id, _)| *id)
            .collect()
    }

    fn render_text(&mut self, x: f64, y: f64, text: &str, style: TextStyle) -> ShapeId {
        let kind = ShapeKind::Text {
            text: text.to_string(),
            style,
        };
        self.insert(kind, Rect::point(x, y))
    }

    fn set_text(&mut self, id: ShapeId, new_text: &str) {
        if let Some(Shape {
            kind: ShapeKind::Text { text, .. },
            ..
        }) = self.shapes.get_mut(&id)
        {
            *text = new_text.to_string();
        }
    }
}
