//! PDF report rendering.
//!
//! A report is a pure function of one [`UploadRecord`]: a title, a metadata
//! table, the three rounded averages, and the equipment type distribution.
//! Nothing is computed here; every value is read off the record.

use anyhow::anyhow;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use crate::error::Result;
use crate::record::UploadRecord;

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;
const VALUE_COLUMN_MM: f32 = MARGIN_MM + 80.0;

/// Render the PDF report for a record.
pub fn render(record: &UploadRecord) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Chemical Equipment Parameter Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("failed to load report font: {e}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("failed to load report font: {e}"))?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut writer = PageWriter {
        doc,
        layer,
        font,
        bold,
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    writer.title("Chemical Equipment Parameter Report");

    let uploaded = record.uploaded_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let total = record.total_records.to_string();
    writer.key_value_rows(&[
        ("Filename:", record.filename.as_str()),
        ("Upload Date:", uploaded.as_str()),
        ("Total Records:", total.as_str()),
    ]);

    writer.heading("Summary Statistics");
    writer.table_header("Parameter", "Average Value");
    writer.table_row("Flowrate", &format_average(record.avg_flowrate));
    writer.table_row("Pressure", &format_average(record.avg_pressure));
    writer.table_row("Temperature", &format_average(record.avg_temperature));

    writer.heading("Equipment Type Distribution");
    writer.table_header("Equipment Type", "Count");
    for (label, count) in record.distribution_by_count() {
        writer.table_row(label, &count.to_string());
    }

    writer.into_bytes()
}

/// Cursor-based page writer; breaks to a fresh page when a row would cross
/// the bottom margin.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn title(&mut self, text: &str) {
        self.layer
            .use_text(text, 18.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT_MM * 2.0;
    }

    fn heading(&mut self, text: &str) {
        // Keep the heading attached to at least its table header row.
        self.ensure_room(LINE_HEIGHT_MM * 3.0);
        self.y -= LINE_HEIGHT_MM;
        self.layer
            .use_text(text, 14.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT_MM;
    }

    fn key_value_rows(&mut self, rows: &[(&str, &str)]) {
        for (label, value) in rows {
            self.ensure_room(LINE_HEIGHT_MM);
            self.layer
                .use_text(*label, 10.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
            self.layer
                .use_text(*value, 10.0, Mm(VALUE_COLUMN_MM), Mm(self.y), &self.font);
            self.y -= LINE_HEIGHT_MM;
        }
    }

    fn table_header(&mut self, left: &str, right: &str) {
        self.ensure_room(LINE_HEIGHT_MM * 2.0);
        self.layer
            .use_text(left, 12.0, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.layer
            .use_text(right, 12.0, Mm(VALUE_COLUMN_MM), Mm(self.y), &self.bold);
        self.rule(self.y - 2.0);
        self.y -= LINE_HEIGHT_MM;
    }

    fn table_row(&mut self, left: &str, right: &str) {
        self.ensure_room(LINE_HEIGHT_MM);
        self.layer
            .use_text(left, 10.0, Mm(MARGIN_MM), Mm(self.y), &self.font);
        self.layer
            .use_text(right, 10.0, Mm(VALUE_COLUMN_MM), Mm(self.y), &self.font);
        self.y -= LINE_HEIGHT_MM;
    }

    fn rule(&self, y: f32) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None)));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn into_bytes(self) -> Result<Vec<u8>> {
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| anyhow!("failed to serialize report: {e}"))?;
        Ok(bytes)
    }
}

/// Averages always show a decimal point, matching how they are stored
/// (two decimals, trailing zeros elided down to one).
fn format_average(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn record(types: usize) -> UploadRecord {
        let mut type_distribution = HashMap::new();
        for i in 0..types {
            type_distribution.insert(format!("Type{i}"), (i as u64) + 1);
        }
        UploadRecord {
            id: 7,
            filename: "plant.csv".to_string(),
            uploaded_at: Utc::now(),
            avg_flowrate: 15.0,
            avg_pressure: 25.47,
            avg_temperature: 35.0,
            type_distribution,
            total_records: (1..=types as u64).sum(),
        }
    }

    #[test]
    fn renders_a_pdf() {
        let bytes = render(&record(3)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn two_renders_of_one_record_agree_in_size() {
        let record = record(4);
        let first = render(&record).unwrap();
        let second = render(&record).unwrap();
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn large_distribution_spills_onto_further_pages() {
        let small = render(&record(2)).unwrap();
        let large = render(&record(120)).unwrap();
        assert!(large.starts_with(b"%PDF"));
        assert!(large.len() > small.len());
    }

    #[test]
    fn averages_keep_a_decimal_point() {
        assert_eq!(format_average(15.0), "15.0");
        assert_eq!(format_average(25.47), "25.47");
        assert_eq!(format_average(0.5), "0.5");
    }
}
