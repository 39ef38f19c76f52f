//! Receipt rasterization
//!
//! Draws a [`ReceiptLayout`] onto an RGBA canvas using a fixed 8x8
//! bitmap font scaled by integer factors. Text must be ASCII; anything
//! outside the basic range falls back to '?'.

use super::layout::{self, Align, CopyKind, Ink, ReceiptLayout, TextRun};
use crate::db::models::ResolvedOrder;
use font8x8::legacy::BASIC_LEGACY;
use image::{Rgba, RgbaImage};
use thiserror::Error;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 119, 0, 255]);
const RED: Rgba<u8> = Rgba([170, 0, 0, 255]);

const GLYPH_SIZE: u32 = 8;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Malformed order line: {0}")]
    MalformedLine(String),
}

/// Renders receipt copies for one shop
#[derive(Clone)]
pub struct ReceiptRenderer {
    shop_name: String,
}

impl ReceiptRenderer {
    pub fn new(shop_name: impl Into<String>) -> Self {
        Self {
            shop_name: shop_name.into(),
        }
    }

    /// Render one copy of an order receipt
    pub fn render(&self, order: &ResolvedOrder, copy: CopyKind) -> Result<RgbaImage, RenderError> {
        for line in &order.lines {
            if line.item_name.trim().is_empty() {
                return Err(RenderError::MalformedLine(format!(
                    "empty item name in order {}",
                    order.id
                )));
            }
            if line.quantity == 0 {
                return Err(RenderError::MalformedLine(format!(
                    "zero quantity for '{}' in order {}",
                    line.item_name, order.id
                )));
            }
        }

        let receipt = layout::build(order, copy, &self.shop_name, chrono::Local::now());
        Ok(rasterize(&receipt))
    }

    /// Banner image with the shop name, printed above every receipt
    pub fn banner(&self) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(layout::CANVAS_WIDTH, 60, WHITE);
        draw_run(
            &mut canvas,
            &TextRun {
                text: self.shop_name.clone(),
                x: layout::CANVAS_WIDTH / 2,
                y: 10,
                align: Align::Center,
                size: 32,
                ink: Ink::Normal,
            },
        );
        canvas
    }
}

fn ink_color(ink: Ink) -> Rgba<u8> {
    match ink {
        Ink::Normal => BLACK,
        Ink::FreeAddon => GREEN,
        Ink::PaidAddon => RED,
    }
}

fn rasterize(receipt: &ReceiptLayout) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(receipt.width, receipt.height, WHITE);
    for rule in &receipt.rules {
        draw_rule(&mut canvas, rule.y);
    }
    for run in &receipt.runs {
        draw_run(&mut canvas, run);
    }
    canvas
}

fn draw_rule(canvas: &mut RgbaImage, y: u32) {
    let (width, height) = canvas.dimensions();
    for dy in 0..2 {
        let py = y + dy;
        if py >= height {
            continue;
        }
        for px in 20..width.saturating_sub(20) {
            canvas.put_pixel(px, py, BLACK);
        }
    }
}

fn draw_run(canvas: &mut RgbaImage, run: &TextRun) {
    let scale = (run.size / GLYPH_SIZE).max(1);
    let text_width = run.text.chars().count() as u32 * GLYPH_SIZE * scale;

    let start_x = match run.align {
        Align::Left => run.x as i64,
        Align::Center => run.x as i64 - (text_width / 2) as i64,
        Align::Right => run.x as i64 - text_width as i64,
    };

    let color = ink_color(run.ink);
    for (i, ch) in run.text.chars().enumerate() {
        let glyph_x = start_x + (i as u32 * GLYPH_SIZE * scale) as i64;
        draw_glyph(canvas, ch, glyph_x, run.y as i64, scale, color);
    }
}

fn draw_glyph(canvas: &mut RgbaImage, ch: char, x: i64, y: i64, scale: u32, color: Rgba<u8>) {
    let index = ch as usize;
    let glyph = if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    };

    let (width, height) = canvas.dimensions();
    for (row_idx, row) in glyph.iter().enumerate() {
        for bit in 0..8u32 {
            if row >> bit & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + (bit * scale + dx) as i64;
                    let py = y + (row_idx as u32 * scale + dy) as i64;
                    if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                        canvas.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderLine, SizeVariant};
    use rust_decimal::Decimal;

    fn order_with(lines: Vec<OrderLine>) -> ResolvedOrder {
        let total = lines.iter().map(|l| l.line_total()).sum();
        ResolvedOrder {
            id: "28-8-2026@1".to_string(),
            day_key: "28-8-2026".to_string(),
            sequence: 1,
            created_at: 1_700_000_000_000,
            lines,
            total,
            delivery_fee: Decimal::ZERO,
            client: crate::db::models::NO_CLIENT.to_string(),
            client_name: None,
            client_address: None,
            alt_number: None,
            display_number: None,
            estimated_minutes: 20,
            notes: None,
        }
    }

    fn line(name: &str, qty: u32) -> OrderLine {
        OrderLine {
            item_name: name.to_string(),
            size: SizeVariant::Normal,
            price: "5.00".parse().unwrap(),
            quantity: qty,
            free_addons: vec![],
            paid_addons: vec![],
        }
    }

    #[test]
    fn test_render_produces_expected_canvas() {
        let renderer = ReceiptRenderer::new("Kebab Pacifico");
        let order = order_with(vec![line("Durum", 1)]);
        let img = renderer.render(&order, CopyKind::Kitchen).unwrap();

        assert_eq!(img.width(), layout::CANVAS_WIDTH);
        assert_eq!(img.height(), layout::canvas_height(&order));
        // Something was drawn
        assert!(img.pixels().any(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_empty_item_name_rejected() {
        let renderer = ReceiptRenderer::new("Kebab Pacifico");
        let order = order_with(vec![line("  ", 1)]);
        assert!(matches!(
            renderer.render(&order, CopyKind::Kitchen),
            Err(RenderError::MalformedLine(_))
        ));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let renderer = ReceiptRenderer::new("Kebab Pacifico");
        let order = order_with(vec![line("Durum", 0)]);
        assert!(matches!(
            renderer.render(&order, CopyKind::Kitchen),
            Err(RenderError::MalformedLine(_))
        ));
    }

    #[test]
    fn test_copies_render_differently() {
        let renderer = ReceiptRenderer::new("Kebab Pacifico");
        let order = order_with(vec![line("Durum", 1)]);
        let kitchen = renderer.render(&order, CopyKind::Kitchen).unwrap();
        let customer = renderer.render(&order, CopyKind::Customer).unwrap();
        assert_ne!(kitchen.as_raw(), customer.as_raw());
    }

    #[test]
    fn test_banner_has_ink() {
        let renderer = ReceiptRenderer::new("Kebab Pacifico");
        let banner = renderer.banner();
        assert_eq!(banner.width(), layout::CANVAS_WIDTH);
        assert!(banner.pixels().any(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_non_ascii_falls_back_without_panic() {
        let renderer = ReceiptRenderer::new("Café Pacífico");
        let order = order_with(vec![line("Döner", 1)]);
        assert!(renderer.render(&order, CopyKind::Kitchen).is_ok());
    }
}
