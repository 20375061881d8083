//! Appointment report
//!
//! [`build_report`] turns the appointment listing into display strings and a
//! summary; [`render_pdf`] lays that out as a paginated A4 table. Neither
//! touches the store.

use chrono::{NaiveDate, NaiveDateTime};
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, ObjectId, Stream, StringFormat,
};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{AtendimentoComCliente, AtendimentoStatus},
};

pub const TITLE: &str = "Relatório de Atendimentos";
pub const COLUMNS: [&str; 5] = ["Cliente", "Data/Hora", "Tipo", "Status", "Valor"];

const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";
const MISSING: &str = "N/A";

/// Report content, already formatted for display
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub generated_line: String,
    pub rows: Vec<[String; 5]>,
    pub total: usize,
    pub total_valor: Decimal,
    /// Per-status counts in order of first appearance
    pub status_counts: Vec<(AtendimentoStatus, usize)>,
}

impl Report {
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Total de atendimentos: {}", self.total),
            format!("Valor total: {}", currency(self.total_valor)),
            "Status:".to_string(),
        ];
        lines.extend(
            self.status_counts
                .iter()
                .map(|(status, count)| format!("  - {}: {}", status.label(), count)),
        );
        lines
    }
}

pub fn build_report(atendimentos: &[AtendimentoComCliente], generated_at: NaiveDateTime) -> Report {
    let mut status_counts: Vec<(AtendimentoStatus, usize)> = Vec::new();
    let mut total_valor = Decimal::ZERO;

    let rows = atendimentos
        .iter()
        .map(|item| {
            let a = &item.atendimento;
            match status_counts.iter_mut().find(|(status, _)| *status == a.status) {
                Some((_, count)) => *count += 1,
                None => status_counts.push((a.status, 1)),
            }
            if let Some(valor) = a.valor {
                total_valor += valor;
            }
            [
                item.clientes
                    .as_ref()
                    .map(|c| c.nome.clone())
                    .unwrap_or_else(|| MISSING.to_string()),
                a.data_atendimento.format(DISPLAY_FORMAT).to_string(),
                a.tipo.clone(),
                a.status.label().to_string(),
                a.valor.map(currency).unwrap_or_else(|| MISSING.to_string()),
            ]
        })
        .collect();

    Report {
        generated_line: format!("Gerado em: {}", generated_at.format(DISPLAY_FORMAT)),
        rows,
        total: atendimentos.len(),
        total_valor,
        status_counts,
    }
}

/// Download file name for a report generated on `date`
pub fn file_name(date: NaiveDate) -> String {
    format!("relatorio-atendimentos-{}.pdf", date.format("%Y-%m-%d"))
}

fn currency(value: Decimal) -> String {
    format!("R$ {:.2}", value.round_dp(2))
}

// Page geometry, in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_X: i64 = 40;
const MARGIN_BOTTOM: i64 = 50;
const ROW_HEIGHT: i64 = 18;
const LINE_HEIGHT: i64 = 20;
const COLUMN_WIDTHS: [i64; 5] = [113, 99, 85, 99, 71];
const TABLE_FONT_SIZE: i64 = 9;

const ACCENT: (f32, f32, f32) = (0.749, 0.553, 0.188);
const MUTED: (f32, f32, f32) = (0.392, 0.392, 0.392);

/// Accumulates drawing operations page by page
struct Pages {
    done: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl Pages {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - 57,
        }
    }

    fn ensure_room(&mut self, height: i64) -> bool {
        if self.y - height < MARGIN_BOTTOM {
            self.done.push(std::mem::take(&mut self.current));
            self.y = PAGE_HEIGHT - 50;
            true
        } else {
            false
        }
    }

    fn text(&mut self, font: &str, size: i64, color: (f32, f32, f32), x: i64, y: i64, text: &str) {
        self.current.extend([
            Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), size.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![pdf_string(text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn cell(&mut self, x: i64, width: i64, fill: Option<(f32, f32, f32)>) {
        let rect = vec![x.into(), (self.y - ROW_HEIGHT).into(), width.into(), ROW_HEIGHT.into()];
        if let Some(color) = fill {
            self.current.extend([
                Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]),
                Operation::new("re", rect.clone()),
                Operation::new("f", vec![]),
            ]);
        }
        self.current.extend([
            Operation::new("RG", vec![0.8f32.into(), 0.8f32.into(), 0.8f32.into()]),
            Operation::new("re", rect),
            Operation::new("S", vec![]),
        ]);
    }

    fn row(&mut self, values: &[&str], header: bool) {
        let mut x = MARGIN_X;
        for (value, width) in values.iter().zip(COLUMN_WIDTHS) {
            let (font, fill, color) = if header {
                ("F2", Some(ACCENT), (1.0, 1.0, 1.0))
            } else {
                ("F1", None, (0.0, 0.0, 0.0))
            };
            self.cell(x, width, fill);
            let text = fit(value, width - 8, TABLE_FONT_SIZE);
            self.text(font, TABLE_FONT_SIZE, color, x + 4, self.y - 12, &text);
            x += width;
        }
        self.y -= ROW_HEIGHT;
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        self.done.push(self.current);
        self.done
    }
}

/// Render the report as a PDF document
pub fn render_pdf(report: &Report) -> AppResult<Vec<u8>> {
    let mut pages = Pages::new();

    pages.text("F1", 18, ACCENT, MARGIN_X, pages.y, TITLE);
    pages.y -= 23;
    pages.text("F1", 10, MUTED, MARGIN_X, pages.y, &report.generated_line);
    pages.y -= 20;

    pages.row(&COLUMNS, true);
    for row in &report.rows {
        if pages.ensure_room(ROW_HEIGHT) {
            pages.row(&COLUMNS, true);
        }
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        pages.row(&cells, false);
    }

    let summary = report.summary_lines();
    pages.y -= 28;
    pages.ensure_room(LINE_HEIGHT * (summary.len() as i64 + 1));
    pages.text("F2", 12, ACCENT, MARGIN_X, pages.y, "Resumo");
    for line in &summary {
        pages.y -= LINE_HEIGHT;
        pages.text("F1", 10, (0.0, 0.0, 0.0), MARGIN_X, pages.y, line);
    }

    write_document(pages.finish())
}

fn write_document(pages: Vec<Vec<Operation>>) -> AppResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(font("Helvetica"));
    let bold = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations }
            .encode()
            .map_err(|e| AppError::Internal(format!("Failed to encode report page: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| AppError::Internal(format!("Failed to write report: {}", e)))?;
    Ok(bytes)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Encode text for a WinAnsi font; characters outside Latin-1 become `?`
fn pdf_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

/// Truncate text to roughly fit `width` points at `size`
fn fit(text: &str, width: i64, size: i64) -> String {
    // Average Helvetica glyph is about half the font size wide
    let max_chars = (width * 2 / size).max(4) as usize;
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", kept)
    }
}
