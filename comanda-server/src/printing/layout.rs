//! Receipt layout engine
//!
//! Turns a resolved order into a display list of positioned text runs
//! and divider rules on a fixed-width canvas. Canvas height is computed
//! up front from the order contents so the paper cut lands right after
//! the footer. Pure: no I/O, the clock is passed in.

use crate::db::models::{NO_ALT_NUMBER, NO_CLIENT, ResolvedOrder};
use chrono::{DateTime, Local};
use rust_decimal::Decimal;

/// Canvas width in pixels
pub const CANVAS_WIDTH: u32 = 550;

/// Height reserved per item or add-on row
pub const LINE_HEIGHT: u32 = 50;

/// Height of the header block (shop name, order number, times)
pub const HEADER_HEIGHT: u32 = 150;

/// Height of the footer block (client, totals, notes, copy glyph)
pub const FOOTER_HEIGHT: u32 = 350;

/// Vertical advance between printed rows in the item table
pub const ROW_SPACING: u32 = 30;

/// Extra footer height per optional footer line
const FOOTER_LINE_EXTRA: u32 = 23;

/// Extra footer height when the order carries notes
const NOTES_EXTRA: u32 = 30;

/// Base footer slack, always present
const BASE_EXTRA: u32 = 20;

/// Gap between the item table and the footer block
const TABLE_GAP: u32 = 40;

/// First row of the item table, below the column headers
const TABLE_START_Y: u32 = HEADER_HEIGHT + 55;

/// Column anchors, right to left: price, quantity, product
const COL_PRICE_X: u32 = CANVAS_WIDTH - 20;
const COL_QTY_X: u32 = CANVAS_WIDTH / 2 + 20;
const COL_PRODUCT_X: u32 = 100;

/// Which copy of the receipt is being printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    Kitchen,
    Customer,
}

impl CopyKind {
    /// Suffix printed after the large order number at the bottom
    pub fn label(&self) -> &'static str {
        match self {
            CopyKind::Kitchen => "COCINA",
            CopyKind::Customer => "CLIENTE",
        }
    }
}

/// Ink color of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Normal,
    /// Free add-ons print green
    FreeAddon,
    /// Paid add-ons print red
    PaidAddon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One positioned piece of text
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub align: Align,
    /// Glyph height in pixels
    pub size: u32,
    pub ink: Ink,
}

/// Horizontal divider line
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub y: u32,
}

/// Complete layout for one receipt copy
#[derive(Debug, Clone)]
pub struct ReceiptLayout {
    pub width: u32,
    pub height: u32,
    pub runs: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

impl ReceiptLayout {
    fn text(&mut self, text: impl Into<String>, x: u32, y: u32, align: Align, size: u32, ink: Ink) {
        self.runs.push(TextRun {
            text: text.into(),
            x,
            y,
            align,
            size,
            ink,
        });
    }

    fn rule(&mut self, y: u32) {
        self.rules.push(Rule { y });
    }
}

/// Extra footer height from the optional footer lines
///
/// TODO: a positive delivery fee adds FOOTER_LINE_EXTRA twice here.
/// Printed receipts depend on the resulting height, so compare cut
/// positions on real paper before collapsing the two branches.
fn footer_extra(order: &ResolvedOrder) -> u32 {
    let mut extra = BASE_EXTRA;

    if order.notes.as_deref().is_some_and(|n| !n.is_empty()) {
        extra += NOTES_EXTRA;
    }
    if order.delivery_fee > Decimal::ZERO {
        extra += FOOTER_LINE_EXTRA;
    }
    if order.client != NO_CLIENT || order.display_number.is_some() {
        extra += FOOTER_LINE_EXTRA;
    }
    if order
        .alt_number
        .as_deref()
        .is_some_and(|n| n != NO_ALT_NUMBER && !n.is_empty())
    {
        extra += FOOTER_LINE_EXTRA;
    }
    if order.delivery_fee > Decimal::ZERO {
        extra += FOOTER_LINE_EXTRA;
    }

    extra
}

/// Total canvas height for an order
///
/// Every item row reserves a full LINE_HEIGHT even though rows advance
/// by ROW_SPACING, leaving slack before the cut. A line with free
/// add-ons takes one extra row, a line with paid add-ons another.
pub fn canvas_height(order: &ResolvedOrder) -> u32 {
    let item_rows = order.lines.len() as u32;
    let addon_rows: u32 = order.lines.iter().map(|l| l.addon_rows() as u32).sum();

    HEADER_HEIGHT
        + item_rows * LINE_HEIGHT
        + addon_rows * LINE_HEIGHT
        + footer_extra(order)
        + TABLE_GAP
        + FOOTER_HEIGHT
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Build the display list for one receipt copy
pub fn build(
    order: &ResolvedOrder,
    copy: CopyKind,
    shop_name: &str,
    printed_at: DateTime<Local>,
) -> ReceiptLayout {
    let mut layout = ReceiptLayout {
        width: CANVAS_WIDTH,
        height: canvas_height(order),
        runs: Vec::new(),
        rules: Vec::new(),
    };

    // === Header ===
    layout.text(shop_name, CANVAS_WIDTH / 2, 10, Align::Center, 24, Ink::Normal);
    layout.text(
        format!("#{}", order.printed_number()),
        CANVAS_WIDTH / 2,
        45,
        Align::Center,
        32,
        Ink::Normal,
    );
    layout.text(
        printed_at.format("%H:%M").to_string(),
        20,
        95,
        Align::Left,
        16,
        Ink::Normal,
    );
    layout.text(
        format!(
            "{} - {} min",
            order.estimated_minutes,
            order.estimated_minutes + 5
        ),
        CANVAS_WIDTH - 20,
        95,
        Align::Right,
        16,
        Ink::Normal,
    );
    layout.rule(HEADER_HEIGHT - 25);

    // === Item table ===
    // Column headers, right to left
    let header_y = HEADER_HEIGHT + 10;
    layout.text("Precio", COL_PRICE_X, header_y, Align::Right, 16, Ink::Normal);
    layout.text("Cant", COL_QTY_X, header_y, Align::Left, 16, Ink::Normal);
    layout.text("Producto", COL_PRODUCT_X, header_y, Align::Left, 16, Ink::Normal);

    let mut y = TABLE_START_Y;
    for line in &order.lines {
        layout.text(
            format!("{} - {}", line.item_name, line.size.label()),
            COL_PRODUCT_X,
            y,
            Align::Left,
            16,
            Ink::Normal,
        );
        layout.text(
            line.quantity.to_string(),
            COL_QTY_X,
            y,
            Align::Left,
            16,
            Ink::Normal,
        );
        layout.text(
            money(line.line_total()),
            COL_PRICE_X,
            y,
            Align::Right,
            16,
            Ink::Normal,
        );
        y += ROW_SPACING;

        if !line.free_addons.is_empty() {
            layout.text(
                format!("+ {}", line.free_addons.join(", ")),
                COL_PRODUCT_X + 20,
                y,
                Align::Left,
                16,
                Ink::FreeAddon,
            );
            y += ROW_SPACING;
        }
        if !line.paid_addons.is_empty() {
            let listed = line
                .paid_addons
                .iter()
                .map(|a| format!("{} {}", a.name, money(a.price)))
                .collect::<Vec<_>>()
                .join(", ");
            layout.text(
                format!("+ {}", listed),
                COL_PRODUCT_X + 20,
                y,
                Align::Left,
                16,
                Ink::PaidAddon,
            );
            y += ROW_SPACING;
        }
    }

    // === Footer ===
    // Fixed order; every line is conditional on its data being present
    let mut y = y + TABLE_GAP;
    layout.rule(y);
    y += 15;

    if let Some(name) = order.client_name.as_deref() {
        layout.text(name, 20, y, Align::Left, 16, Ink::Normal);
        y += ROW_SPACING;
    }
    if let Some(address) = order.client_address.as_deref()
        && !address.is_empty()
    {
        layout.text(address, 20, y, Align::Left, 16, Ink::Normal);
        y += ROW_SPACING;
    }

    // Phone line: resolved client id, else the typed display number
    let phone = if order.client != NO_CLIENT {
        Some(order.client.as_str())
    } else {
        order.display_number.as_deref()
    };
    if let Some(phone) = phone {
        layout.text(
            format!("Tel: {}", phone),
            20,
            y,
            Align::Left,
            16,
            Ink::Normal,
        );
        y += ROW_SPACING;
    }

    if let Some(alt) = order.alt_number.as_deref()
        && alt != NO_ALT_NUMBER
        && !alt.is_empty()
    {
        layout.text(
            format!("Tel 2: {}", alt),
            20,
            y,
            Align::Left,
            16,
            Ink::Normal,
        );
        y += ROW_SPACING;
    }

    if order.delivery_fee > Decimal::ZERO {
        layout.text(
            format!("Envio: {}", money(order.delivery_fee)),
            20,
            y,
            Align::Left,
            16,
            Ink::Normal,
        );
        y += ROW_SPACING;
    }

    layout.text(
        format!("Pedido: {}", order.id),
        20,
        y,
        Align::Left,
        16,
        Ink::Normal,
    );
    y += ROW_SPACING;

    layout.text(
        format!("TOTAL: {} EUR", money(order.total)),
        CANVAS_WIDTH - 20,
        y,
        Align::Right,
        24,
        Ink::Normal,
    );
    y += ROW_SPACING + 10;

    if order.delivery_fee > Decimal::ZERO {
        layout.text(
            format!("TOTAL + ENVIO: {} EUR", money(order.total_with_delivery())),
            CANVAS_WIDTH - 20,
            y,
            Align::Right,
            24,
            Ink::Normal,
        );
        y += ROW_SPACING + 10;
    }

    layout.rule(y);
    y += 15;

    if let Some(notes) = order.notes.as_deref()
        && !notes.is_empty()
    {
        layout.text(format!("Nota: {}", notes), 20, y, Align::Left, 16, Ink::Normal);
        y += ROW_SPACING;
    }

    layout.text(
        "Gracias por su pedido!",
        CANVAS_WIDTH / 2,
        y,
        Align::Center,
        16,
        Ink::Normal,
    );
    y += ROW_SPACING + 10;

    layout.text(
        format!("{} {}", order.printed_number(), copy.label()),
        CANVAS_WIDTH / 2,
        y,
        Align::Center,
        40,
        Ink::Normal,
    );

    layout
}
