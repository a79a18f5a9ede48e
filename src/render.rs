//! Half-block terminal renderer
//!
//! Every terminal cell holds two square-ish pixels (upper half block with
//! separate fg/bg colours). The 400x600 world is letterboxed into the largest
//! 2:3 viewport that fits the terminal.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color as CColor},
};

use crate::consts::{HEIGHT, WIDTH};
use crate::geom::Rect;
use crate::surface::{Canvas, ShapeKind, Style, TextStyle};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const LETTERBOX: Rgb = Rgb(18, 18, 24);
const SKY_TOP: Rgb = Rgb(110, 190, 225);
const SKY_BOT: Rgb = Rgb(175, 225, 240);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const OUTLINE: Rgb = Rgb(20, 20, 20);
const BIRD_Y: Rgb = Rgb(245, 220, 50);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BUTTON: Rgb = Rgb(220, 195, 120);
const BUTTON_EDGE: Rgb = Rgb(150, 125, 60);
const TEXT: Rgb = Rgb(15, 15, 15);

// ── Viewport ────────────────────────────────────────────────────────────────

/// Maps world coordinates onto the pixel buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixels per world unit
    pub scale: f64,
    pub ox: f64,
    pub oy: f64,
}

impl Viewport {
    /// Largest centred world view that fits a `pw` x `ph` pixel buffer
    pub fn fit(pw: usize, ph: usize) -> Self {
        let scale = (pw as f64 / WIDTH).min(ph as f64 / HEIGHT);
        Self {
            scale,
            ox: ((pw as f64 - WIDTH * scale) / 2.0).floor(),
            oy: ((ph as f64 - HEIGHT * scale) / 2.0).floor(),
        }
    }

    /// Viewport for a terminal of `cols` x `rows` cells
    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::fit(cols as usize, rows as usize * 2)
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (self.ox + x * self.scale, self.oy + y * self.scale)
    }

    pub fn to_world(&self, px: f64, py: f64) -> (f64, f64) {
        if self.scale <= 0.0 {
            return (f64::NAN, f64::NAN);
        }
        ((px - self.ox) / self.scale, (py - self.oy) / self.scale)
    }

    /// World point under the centre of a terminal cell
    pub fn cell_to_world(&self, col: u16, row: u16) -> (f64, f64) {
        self.to_world(col as f64 + 0.5, row as f64 * 2.0 + 1.0)
    }

    /// Pixel-space box covered by a world box: `(x, y, w, h)`
    fn pixel_box(&self, r: &Rect) -> (i32, i32, i32, i32) {
        let (x1, y1) = self.to_pixel(r.x1, r.y1);
        let (x2, y2) = self.to_pixel(r.x2, r.y2);
        let (x1, y1) = (x1.round() as i32, y1.round() as i32);
        let (x2, y2) = (x2.round() as i32, y2.round() as i32);
        (x1, y1, (x2 - x1).max(1), (y2 - y1).max(1))
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn for_terminal(cols: u16, rows: u16) -> Self {
        Self::new(cols as usize, rows as usize * 2)
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, LETTERBOX);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dx in 0..w {
            self.set(x + dx, y, c);
            self.set(x + dx, y + h - 1, c);
        }
        for dy in 0..h {
            self.set(x, y + dy, c);
            self.set(x + w - 1, y + dy, c);
        }
    }

    /// Filled ellipse inscribed in the box, with a one pixel rim
    fn fill_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32, fill: Rgb, rim: Rgb) {
        let (rx, ry) = (w as f64 / 2.0, h as f64 / 2.0);
        let (cx, cy) = (x as f64 + rx, y as f64 + ry);
        for py in y..y + h {
            for px in x..x + w {
                let nx = (px as f64 + 0.5 - cx) / rx;
                let ny = (py as f64 + 0.5 - cy) / ry;
                let d = nx * nx + ny * ny;
                if d <= 1.0 {
                    let inner_x = (px as f64 + 0.5 - cx) / (rx - 1.0).max(0.5);
                    let inner_y = (py as f64 + 0.5 - cy) / (ry - 1.0).max(0.5);
                    let edge = inner_x * inner_x + inner_y * inner_y > 1.0;
                    self.set(px, py, if edge { rim } else { fill });
                }
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(out, style::SetBackgroundColor(top.term()))?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(out, style::SetForegroundColor(top.term()))?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(out, style::SetBackgroundColor(bot.term()))?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── Canvas drawing ──────────────────────────────────────────────────────────

/// Paint the sky and every filled shape of the canvas into `buf`
pub fn draw(canvas: &Canvas, view: &Viewport, buf: &mut PixelBuf) {
    let (w, h) = (buf.w as i32, buf.h as i32);
    buf.fill_rect(0, 0, w, h, LETTERBOX);
    draw_sky(view, buf);

    for (_, shape) in canvas.shapes() {
        match shape.kind {
            ShapeKind::Rect(Style::Pipe) => draw_pipe(buf, view, &shape.bbox),
            ShapeKind::Rect(style) | ShapeKind::Ellipse(style) if style == Style::Button => {
                let (x, y, w, h) = view.pixel_box(&shape.bbox);
                buf.fill_rect(x, y, w, h, BUTTON);
                buf.outline_rect(x, y, w, h, BUTTON_EDGE);
            }
            ShapeKind::Rect(_) => {
                let (x, y, w, h) = view.pixel_box(&shape.bbox);
                buf.fill_rect(x, y, w, h, BIRD_Y);
                buf.outline_rect(x, y, w, h, OUTLINE);
            }
            ShapeKind::Ellipse(_) => draw_body(buf, view, &shape.bbox),
            ShapeKind::Text { .. } => {}
        }
    }
}

fn draw_sky(view: &Viewport, buf: &mut PixelBuf) {
    let (x, y, w, h) = view.pixel_box(&Rect::new(0.0, 0.0, WIDTH, HEIGHT));
    for dy in 0..h {
        let t = (dy as u32 * 256 / h.max(1) as u32) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for dx in 0..w {
            buf.set(x + dx, y + dy, c);
        }
    }
}

fn draw_pipe(buf: &mut PixelBuf, view: &Viewport, bbox: &Rect) {
    let (x, y, w, h) = view.pixel_box(bbox);
    for dx in 0..w {
        let c = pipe_shade(dx, w);
        for dy in 0..h {
            buf.set(x + dx, y + dy, c);
        }
    }
    buf.outline_rect(x, y, w, h, OUTLINE);
}

fn draw_body(buf: &mut PixelBuf, view: &Viewport, bbox: &Rect) {
    let (x, y, w, h) = view.pixel_box(bbox);
    buf.fill_ellipse(x, y, w, h, BIRD_Y, OUTLINE);
    if w >= 4 && h >= 4 {
        buf.set(x + w * 2 / 3, y + h / 3, BIRD_EYE);
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

// ── Text overlay ────────────────────────────────────────────────────────────

/// Terminal cell where a text shape starts, clipped to the buffer.
/// `None` if the anchor is off screen.
pub fn text_cell(view: &Viewport, buf: &PixelBuf, x: f64, y: f64, len: usize, style: TextStyle) -> Option<(u16, u16)> {
    let (px, py) = view.to_pixel(x, y);
    let (cols, rows) = (buf.w as i32, (buf.h / 2) as i32);
    let row = (py / 2.0).floor() as i32;
    let mut col = px.floor() as i32;
    if style.is_centered() {
        col -= len as i32 / 2;
    }
    if row < 0 || row >= rows || cols == 0 {
        return None;
    }
    let col = col.clamp(0, (cols - len as i32).max(0));
    Some((col as u16, row as u16))
}

/// Print text shapes over the already rendered pixels
pub fn draw_text(canvas: &Canvas, view: &Viewport, buf: &PixelBuf, out: &mut impl Write) -> io::Result<()> {
    for (_, shape) in canvas.shapes() {
        let ShapeKind::Text { text, style } = &shape.kind else {
            continue;
        };
        let len = text.chars().count();
        let Some((col, row)) = text_cell(view, buf, shape.bbox.x1, shape.bbox.y1, len, *style) else {
            continue;
        };
        let visible: String = text.chars().take(buf.w.saturating_sub(col as usize)).collect();
        let bg = buf.get(col as usize, row as usize * 2 + 1);
        queue!(
            out,
            cursor::MoveTo(col, row),
            style::SetForegroundColor(TEXT.term()),
            style::SetBackgroundColor(bg.term())
        )?;
        if *style == TextStyle::Banner {
            queue!(out, style::SetAttribute(Attribute::Bold))?;
        }
        queue!(out, style::Print(visible), style::SetAttribute(Attribute::Reset), style::ResetColor)?;
    }
    out.flush()
}
