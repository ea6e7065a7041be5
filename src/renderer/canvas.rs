//! Canvas2D painter for the web build

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Sprite, SpriteKind, css_color, sprites};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

const BACKGROUND: &str = "#0a0014";
const GRID: &str = "rgba(0, 255, 255, 0.1)";
const GRID_SPACING: f64 = 50.0;
const EYE_AVATAR: &str = "#00ffff";
const EYE_HOSTILE: &str = "#ffff00";

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Paint one frame
    pub fn render(&self, state: &GameState, settings: &Settings) -> Result<(), JsValue> {
        let (w, h) = (state.tuning.arena.width as f64, state.tuning.arena.height as f64);
        let ctx = &self.ctx;

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);
        if settings.quality.grid_enabled() {
            self.draw_grid(w, h);
        }

        let glow = settings.glow_blur();
        for sprite in sprites(state) {
            self.draw_sprite(&sprite, glow)?;
        }

        if state.phase == GamePhase::Paused {
            ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str(EYE_AVATAR);
            ctx.set_font("bold 36px \"Courier New\", monospace");
            ctx.set_text_align("center");
            ctx.fill_text("PAUSED", w / 2.0, h / 2.0)?;
        }
        Ok(())
    }

    fn draw_grid(&self, w: f64, h: f64) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(GRID);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        let mut x = 0.0;
        while x < w {
            ctx.move_to(x, 0.0);
            ctx.line_to(x, h);
            x += GRID_SPACING;
        }
        let mut y = 0.0;
        while y < h {
            ctx.move_to(0.0, y);
            ctx.line_to(w, y);
            y += GRID_SPACING;
        }
        ctx.stroke();
    }

    fn draw_sprite(&self, sprite: &Sprite, glow: f64) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let color = css_color(sprite.color);
        let r = (sprite.size / 2.0) as f64;

        ctx.save();
        ctx.translate(sprite.pos.x as f64, sprite.pos.y as f64)?;
        ctx.rotate(sprite.rotation as f64)?;
        ctx.set_global_alpha(sprite.alpha as f64);
        ctx.set_shadow_color(&color);
        ctx.set_shadow_blur(if sprite.kind == SpriteKind::Particle {
            glow / 2.0
        } else {
            glow
        });

        ctx.set_fill_style_str(&color);
        self.disc(0.0, 0.0, r)?;

        match sprite.kind {
            SpriteKind::Avatar => {
                ctx.set_fill_style_str(EYE_AVATAR);
                ctx.set_shadow_color(EYE_AVATAR);
                self.eyes(r, r / 4.0)?;
                // Nose
                ctx.begin_path();
                ctx.move_to(-r / 5.0, r / 6.0);
                ctx.line_to(r / 5.0, r / 6.0);
                ctx.line_to(0.0, r / 2.0);
                ctx.close_path();
                ctx.fill();
            }
            SpriteKind::Hostile => {
                ctx.set_fill_style_str(EYE_HOSTILE);
                ctx.set_shadow_color(EYE_HOSTILE);
                self.eyes(r, r / 5.0)?;
            }
            SpriteKind::Projectile | SpriteKind::Particle => {}
        }

        ctx.restore();
        Ok(())
    }

    fn disc(&self, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, r.max(0.0), 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }

    fn eyes(&self, r: f64, eye_r: f64) -> Result<(), JsValue> {
        self.disc(-r / 3.0, -r / 4.0, eye_r)?;
        self.disc(r / 3.0, -r / 4.0, eye_r)
    }
}
