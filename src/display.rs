//! Glyph displays. The game draws through the [`Display`] trait so the same
//! logic runs against the browser canvas or an in-memory buffer.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::GameConfig;
use crate::objects::{DEFAULT_BG, ObjectKind};

pub trait Display {
    fn draw(&mut self, x: usize, y: usize, symbol: char, fg: &str, bg: &str);
    fn clear(&mut self);
}

/// Look up an object's symbol and color by kind and draw it. An empty
/// background counts as no background.
pub fn draw_object(display: &mut dyn Display, x: usize, y: usize, kind: ObjectKind, bg: Option<&str>) {
    let def = kind.def();
    let bg = bg.filter(|c| !c.is_empty()).unwrap_or(DEFAULT_BG);
    display.draw(x, y, def.symbol, def.fg(), bg);
}

// --- In-memory buffer -------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub symbol: char,
    pub fg: String,
    pub bg: String,
}

impl Default for Glyph {
    fn default() -> Self {
        Self { symbol: ' ', fg: "#fff".to_string(), bg: DEFAULT_BG.to_string() }
    }
}

/// Character grid used natively and in tests.
pub struct BufferDisplay {
    width: usize,
    height: usize,
    glyphs: Vec<Glyph>,
    draws: usize,
}

impl BufferDisplay {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, glyphs: vec![Glyph::default(); width * height], draws: 0 }
    }

    pub fn glyph(&self, x: usize, y: usize) -> &Glyph {
        &self.glyphs[y * self.width + x]
    }

    pub fn symbol(&self, x: usize, y: usize) -> char {
        self.glyph(x, y).symbol
    }

    pub fn row(&self, y: usize) -> String {
        (0..self.width).map(|x| self.symbol(x, y)).collect()
    }

    /// Total `draw` calls since creation.
    pub fn draw_count(&self) -> usize {
        self.draws
    }
}

impl Display for BufferDisplay {
    fn draw(&mut self, x: usize, y: usize, symbol: char, fg: &str, bg: &str) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.draws += 1;
        self.glyphs[y * self.width + x] = Glyph { symbol, fg: fg.to_string(), bg: bg.to_string() };
    }

    fn clear(&mut self) {
        self.glyphs.iter_mut().for_each(|g| *g = Glyph::default());
    }
}

// --- Canvas -----------------------------------------------------------------

pub struct CanvasDisplay {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    cell: f64,
}

impl CanvasDisplay {
    pub fn new(canvas: HtmlCanvasElement, config: &GameConfig) -> Result<Self, JsValue> {
        let cell = config.font_size as f64;
        canvas.set_width((config.width as f64 * cell) as u32);
        canvas.set_height((config.height as f64 * cell) as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        ctx.set_font(&format!("bold {}px 'Fira Code', monospace", config.font_size));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let mut display = Self { canvas, ctx, cell };
        display.clear();
        Ok(display)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Display for CanvasDisplay {
    fn draw(&mut self, x: usize, y: usize, symbol: char, fg: &str, bg: &str) {
        let px = x as f64 * self.cell;
        let py = y as f64 * self.cell;
        self.ctx.set_fill_style_str(bg);
        self.ctx.fill_rect(px, py, self.cell, self.cell);
        if symbol != ' ' {
            self.ctx.set_fill_style_str(fg);
            let mut buf = [0u8; 4];
            let _ = self.ctx.fill_text(symbol.encode_utf8(&mut buf), px + self.cell / 2.0, py + self.cell / 2.0);
        }
    }

    fn clear(&mut self) {
        self.ctx.set_fill_style_str(DEFAULT_BG);
        self.ctx.fill_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_object_applies_color_defaults() {
        let mut buf = BufferDisplay::new(3, 1);
        draw_object(&mut buf, 0, 0, ObjectKind::Block, None);
        draw_object(&mut buf, 1, 0, ObjectKind::Empty, Some("#222"));
        assert_eq!(*buf.glyph(0, 0), Glyph { symbol: '#', fg: "#f00".into(), bg: "#000".into() });
        assert_eq!(*buf.glyph(1, 0), Glyph { symbol: ' ', fg: "#fff".into(), bg: "#222".into() });
    }

    #[test]
    fn empty_background_draws_black() {
        let mut buf = BufferDisplay::new(1, 1);
        draw_object(&mut buf, 0, 0, ObjectKind::Tree, Some(""));
        assert_eq!(buf.glyph(0, 0).bg, "#000");
    }

    #[test]
    fn out_of_range_draws_are_dropped() {
        let mut buf = BufferDisplay::new(2, 2);
        buf.draw(5, 0, '@', "#0f0", "#000");
        assert_eq!(buf.draw_count(), 0);
        buf.draw(1, 1, '@', "#0f0", "#000");
        assert_eq!(buf.row(1), " @");
        buf.clear();
        assert_eq!(buf.row(1), "  ");
    }
}
