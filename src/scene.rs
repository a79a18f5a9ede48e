//! Mirrors simulation state into shapes on a `Surface`

use crate::geom::Rect;
use crate::sim::{GameEvent, GameState, PairId};
use crate::surface::{ShapeId, Style, Surface, TextStyle};

/// Half extents of the restart button
const BUTTON_HALF_W: f64 = 60.0;
const BUTTON_HALF_H: f64 = 18.0;

#[derive(Debug, Clone, Copy)]
struct PairShapes {
    id: PairId,
    top: ShapeId,
    bottom: ShapeId,
}

/// Shapes shown while the game is over
#[derive(Debug, Clone, Copy)]
struct Overlay {
    banner: ShapeId,
    final_score: ShapeId,
    button: ShapeId,
    button_label: ShapeId,
}

impl Overlay {
    fn shapes(&self) -> [ShapeId; 4] {
        [self.banner, self.final_score, self.button, self.button_label]
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    body: ShapeId,
    pairs: Vec<PairShapes>,
    score_label: ShapeId,
    overlay: Option<Overlay>,
}

impl Scene {
    pub fn new(surface: &mut impl Surface, state: &GameState) -> Self {
        let body = surface.create_ellipse(state.body.rect(), Style::Body);
        let score_label = surface.render_text(10.0, 10.0, &score_text(state.score), TextStyle::Label);
        Self {
            body,
            pairs: Vec::new(),
            score_label,
            overlay: None,
        }
    }

    pub fn body(&self) -> ShapeId {
        self.body
    }

    pub fn score_label(&self) -> ShapeId {
        self.score_label
    }

    /// Handle of the restart button, present only while the game is over
    pub fn restart_button(&self) -> Option<ShapeId> {
        self.overlay.map(|o| o.button)
    }

    pub fn pair_shapes(&self, id: PairId) -> Option<(ShapeId, ShapeId)> {
        self.pairs.iter().find(|p| p.id == id).map(|p| (p.top, p.bottom))
    }

    /// React to `events`, then move every tracked shape to where the
    /// simulation says it is.
    pub fn apply(&mut self, surface: &mut impl Surface, state: &GameState, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Spawned(id) => {
                    if let Some(pair) = state.pair(id) {
                        let top = surface.create_rect(pair.top, Style::Pipe);
                        let bottom = surface.create_rect(pair.bottom, Style::Pipe);
                        self.pairs.push(PairShapes { id, top, bottom });
                    }
                }
                GameEvent::Retired(id) => {
                    if let Some(index) = self.pairs.iter().position(|p| p.id == id) {
                        let shapes = self.pairs.remove(index);
                        surface.delete(shapes.top);
                        surface.delete(shapes.bottom);
                    }
                }
                GameEvent::Scored(score) => surface.set_text(self.score_label, &score_text(score)),
                GameEvent::GameOver { score } => {
                    if self.overlay.is_none() {
                        self.overlay = Some(show_overlay(surface, state, score));
                    }
                }
                GameEvent::Restarted => self.reset(surface, state),
                GameEvent::Jumped => {}
            }
        }
        self.follow(surface, state);
    }

    fn reset(&mut self, surface: &mut impl Surface, state: &GameState) {
        for shapes in self.pairs.drain(..) {
            surface.delete(shapes.top);
            surface.delete(shapes.bottom);
        }
        if let Some(overlay) = self.overlay.take() {
            for id in overlay.shapes() {
                surface.delete(id);
            }
        }
        surface.delete(self.body);
        self.body = surface.create_ellipse(state.body.rect(), Style::Body);
        surface.set_text(self.score_label, &score_text(state.score));
    }

    fn follow(&self, surface: &mut impl Surface, state: &GameState) {
        surface.move_to(self.body, state.body.rect());
        for shapes in &self.pairs {
            if let Some(pair) = state.pair(shapes.id) {
                surface.move_to(shapes.top, pair.top);
                surface.move_to(shapes.bottom, pair.bottom);
            }
        }
    }
}

fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

fn show_overlay(surface: &mut impl Surface, state: &GameState, score: u32) -> Overlay {
    let cx = state.rules.width / 2.0;
    let cy = state.rules.height / 2.0;
    let banner = surface.render_text(cx, cy - 40.0, "GAME OVER", TextStyle::Banner);
    let final_score = surface.render_text(cx, cy - 10.0, &format!("Final Score: {score}"), TextStyle::Caption);
    let button = surface.create_rect(
        Rect::new(cx - BUTTON_HALF_W, cy + 30.0 - BUTTON_HALF_H, cx + BUTTON_HALF_W, cy + 30.0 + BUTTON_HALF_H),
        Style::Button,
    );
    let button_label = surface.render_text(cx, cy + 30.0, "Restart", TextStyle::Button);
    Overlay {
        banner,
        final_score,
        button,
        button_label,
    }
}
