//! Invoice rendering
//!
//! Writes a single A4 page PDF with the built-in Helvetica fonts. Text is
//! limited to printable ASCII; anything else is replaced by `?`.

use std::fmt::Write as _;

use rust_decimal::Decimal;

use crate::models::order::{OrderItemDetail, OrderOverview};

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;
const LINE_HEIGHT: u32 = 16;
const MAX_LINES: usize = 30;

pub fn invoice_filename(order_number: &str) -> String {
    format!("invoice-{}.pdf", order_number)
}

/// Escapes a PDF literal string
fn pdf_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

struct PageContent {
    ops: String,
}

impl PageContent {
    fn new() -> Self {
        Self { ops: String::new() }
    }

    fn text(&mut self, x: u32, y: u32, bold: bool, size: u32, value: &str) {
        let font = if bold { "F2" } else { "F1" };
        let _ = writeln!(
            self.ops,
            "BT /{} {} Tf {} {} Td ({}) Tj ET",
            font,
            size,
            x,
            y,
            pdf_text(value)
        );
    }

    fn rule(&mut self, y: u32) {
        let _ = writeln!(self.ops, "{} {} m {} {} l S", MARGIN, y, PAGE_WIDTH - MARGIN, y);
    }
}

fn money(value: Decimal) -> String {
    format!("${:.2}", value)
}

fn layout(order: &OrderOverview, items: &[OrderItemDetail]) -> String {
    let mut page = PageContent::new();
    let mut y = PAGE_HEIGHT - MARGIN - 10;

    page.text(MARGIN, y, true, 20, "TruXtoK Invoice");
    y -= 28;
    page.text(MARGIN, y, false, 11, &format!("Order: {}", order.order_number));
    page.text(330, y, false, 11, &format!("Date: {}", order.created_at.format("%Y-%m-%d")));
    y -= LINE_HEIGHT;
    page.text(MARGIN, y, false, 11, &format!("Technician: {}", order.technician_name));
    page.text(330, y, false, 11, &format!("Truck: {}", order.truck_number));
    y -= LINE_HEIGHT;
    page.text(MARGIN, y, false, 11, &format!("Supply house: {}", order.supply_house_name));
    page.text(330, y, false, 11, &format!("Status: {}", order.status));
    y -= 24;

    page.text(MARGIN, y, true, 10, "SKU");
    page.text(150, y, true, 10, "Item");
    page.text(370, y, true, 10, "Qty");
    page.text(420, y, true, 10, "Unit");
    page.text(490, y, true, 10, "Total");
    y -= 6;
    page.rule(y);
    y -= LINE_HEIGHT;

    for item in items.iter().take(MAX_LINES) {
        page.text(MARGIN, y, false, 10, &truncate(&item.sku, 16));
        page.text(150, y, false, 10, &truncate(&item.name, 36));
        page.text(370, y, false, 10, &item.quantity.to_string());
        page.text(420, y, false, 10, &money(item.unit_price));
        page.text(490, y, false, 10, &money(item.total_price));
        y -= LINE_HEIGHT;
    }
    if items.len() > MAX_LINES {
        page.text(150, y, false, 10, &format!("... and {} more lines", items.len() - MAX_LINES));
        y -= LINE_HEIGHT;
    }

    page.rule(y + 10);
    y -= 8;
    page.text(370, y, true, 11, "Total");
    page.text(490, y, true, 11, &money(order.total_amount));

    if let Some(notes) = order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        y -= 2 * LINE_HEIGHT;
        page.text(MARGIN, y, false, 10, &format!("Notes: {}", truncate(notes, 90)));
    }

    page.ops
}

/// Renders the invoice for an order
pub fn render_invoice(order: &OrderOverview, items: &[OrderItemDetail]) -> Vec<u8> {
    let content = layout(order, items);

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        let _ = write!(pdf, "{} 0 obj\n{}\nendobj\n", index + 1, body);
    }

    let xref_offset = pdf.len();
    let _ = write!(pdf, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(pdf, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        pdf,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    );

    pdf.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn order() -> OrderOverview {
        OrderOverview {
            id: Uuid::new_v4(),
            order_number: "ORD-20240307-1A2B3C4D".into(),
            technician_id: Uuid::new_v4(),
            technician_name: "Dana (Lead) Tech".into(),
            truck_id: Uuid::new_v4(),
            truck_number: "T1".into(),
            supply_house_id: Uuid::new_v4(),
            supply_house_name: "Ferguson HVAC".into(),
            status: "confirmed".into(),
            total_amount: dec!(62.50),
            commission_amount: dec!(6.25),
            total_credit: dec!(3.13),
            notes: Some("Leave at dock".into()),
            item_count: 1,
            created_at: Utc::now(),
            confirmed_at: None,
        }
    }

    fn line() -> OrderItemDetail {
        OrderItemDetail {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            sku: "INV-42".into(),
            name: "Capacitor 45/5 MFD".into(),
            bin_id: None,
            quantity: 5,
            unit_price: dec!(12.50),
            total_price: dec!(62.50),
        }
    }

    #[test]
    fn escapes_literal_strings() {
        assert_eq!(pdf_text(r"a(b)c\d"), r"a\(b\)c\\d");
        assert_eq!(pdf_text("café"), "caf?");
    }

    #[test]
    fn renders_a_well_formed_pdf() {
        let bytes = render_invoice(&order(), &[line()]);
        let pdf = String::from_utf8(bytes).unwrap();

        assert!(pdf.starts_with("%PDF-1.4\n"));
        assert!(pdf.ends_with("%%EOF\n"));
        assert!(pdf.contains("(Order: ORD-20240307-1A2B3C4D)"));
        assert!(pdf.contains(r"(Technician: Dana \(Lead\) Tech)"));
        assert!(pdf.contains("($62.50)"));

        // startxref points at the xref table and every entry at its object
        let startxref: usize = pdf
            .rsplit("startxref\n")
            .next()
            .and_then(|tail| tail.lines().next())
            .unwrap()
            .parse()
            .unwrap();
        assert!(pdf[startxref..].starts_with("xref\n0 7\n"));

        let entries: Vec<&str> = pdf[startxref..].lines().skip(3).take(6).collect();
        for (index, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            assert!(pdf[offset..].starts_with(&format!("{} 0 obj", index + 1)));
        }
    }

    #[test]
    fn stream_length_matches_content() {
        let pdf = String::from_utf8(render_invoice(&order(), &[])).unwrap();
        let start = pdf.find("stream\n").unwrap() + "stream\n".len();
        let end = pdf.find("endstream").unwrap();
        let declared: usize = pdf
            .split("/Length ")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(end - start, declared);
    }
}
