//! Document rendering — converts one `ProductRecord` into a formatted .docx
//! file named after the product title. Rendering always overwrites an
//! existing file (regeneration semantics) and runs detached from the HTTP
//! request that triggered it; failures land in the tracker and the logs,
//! never on the triggering response.

use std::fs::File;
use std::path::{Path, PathBuf};

use docx_rs::{AlignmentType, Docx, Paragraph, Run, Table, TableCell, TableRow};
use thiserror::Error;
use tracing::{error, info};

use crate::documents::document_filename;
use crate::models::product::ProductRecord;

pub mod tracker;

pub use tracker::{RenderStatus, RenderTracker};

// Run sizes are half-points.
const TITLE_SIZE: usize = 48;
const SECTION_SIZE: usize = 28;
const SUBSECTION_SIZE: usize = 24;
const BODY_SIZE: usize = 22;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document assembly failed for {path}: {source}")]
    Docx {
        path: PathBuf,
        #[source]
        source: docx_rs::DocxError,
    },
}

/// Renders `record` into `dir`, returning the path of the written document.
pub fn render_document(record: &ProductRecord, dir: &Path) -> Result<PathBuf, RenderError> {
    let path = dir.join(document_filename(&record.title));
    let io_err = |source| RenderError::Io {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut doc = Docx::new()
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(record.title.as_str()).size(TITLE_SIZE).bold())
                .align(AlignmentType::Center),
        )
        .add_paragraph(heading(&record.sku, SECTION_SIZE))
        .add_paragraph(labeled("Scientific Name / Mix %", &record.scientific_name_or_mix))
        .add_paragraph(labeled("Description", &record.seo_description));

    doc = add_two_column_table(doc, "Growing Conditions", &record.growing_conditions());

    for (title, body) in record.why_choose() {
        doc = doc
            .add_paragraph(heading(title, SUBSECTION_SIZE))
            .add_paragraph(body_paragraph(body));
    }

    doc = add_two_column_table(doc, "Plant Characteristics", &record.characteristics());

    if !record.planting_steps().is_empty() {
        doc = doc.add_paragraph(heading("Planting Guide", SECTION_SIZE));
        for (i, step) in record.planting_steps().into_iter().enumerate() {
            doc = doc
                .add_paragraph(heading(&format!("Step {}", i + 1), SUBSECTION_SIZE))
                .add_paragraph(body_paragraph(step));
        }
    }

    if !record.faqs().is_empty() {
        doc = doc.add_paragraph(heading("Frequently Asked Questions", SECTION_SIZE));
        for (i, faq) in record.faqs().into_iter().enumerate() {
            doc = doc.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(format!("Q{}: ", i + 1)).size(BODY_SIZE).bold())
                    .add_run(Run::new().add_text(faq).size(BODY_SIZE)),
            );
        }
    }

    // File::create truncates, so regeneration overwrites in place.
    let file = File::create(&path).map_err(io_err)?;
    doc.build().pack(file).map_err(|e| RenderError::Docx {
        path: path.clone(),
        source: e.into(),
    })?;

    Ok(path)
}

/// Kicks off a render on a blocking task detached from the caller.
/// Progress is recorded in the tracker; failure is logged, never returned.
pub fn spawn_render(record: ProductRecord, dir: PathBuf, tracker: RenderTracker) {
    let filename = document_filename(&record.title);
    tracker.mark_pending(&filename);
    tokio::task::spawn_blocking(move || match render_document(&record, &dir) {
        Ok(path) => {
            info!("rendered {}", path.display());
            tracker.mark_completed(&filename);
        }
        Err(e) => {
            error!("render failed for {filename}: {e}");
            tracker.mark_failed(&filename, e.to_string());
        }
    });
}

fn heading(text: &str, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).size(size).bold())
}

fn body_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).size(BODY_SIZE))
}

fn labeled(label: &str, value: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(format!("{label}: ")).size(BODY_SIZE).bold())
        .add_run(Run::new().add_text(value).size(BODY_SIZE))
}

/// Section heading plus a two-column label/value table.
fn add_two_column_table(doc: Docx, title: &str, rows: &[(&'static str, &str)]) -> Docx {
    if rows.is_empty() {
        return doc;
    }
    let table_rows = rows
        .iter()
        .map(|(label, value)| {
            TableRow::new(vec![
                TableCell::new().add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(*label).size(BODY_SIZE).bold()),
                ),
                TableCell::new().add_paragraph(body_paragraph(value)),
            ])
        })
        .collect::<Vec<_>>();
    doc.add_paragraph(heading(title, SECTION_SIZE))
        .add_table(Table::new(table_rows))
        .add_paragraph(Paragraph::new())
}
