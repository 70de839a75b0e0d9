//! Court report rendering from `.docx` templates.
//!
//! A `.docx` file is a zip archive of XML parts. Rendering copies the template
//! archive and substitutes `{{placeholder}}` tokens in the `word/*.xml` parts
//! (body, headers, footers). Other parts are copied byte for byte.
//! A placeholder must sit inside a single text run to be recognised.

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::markup;
use crate::error::{AppError, AppResult};
use crate::models::ReportContext;

/// Renders a template with a case's data into document bytes.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, template_path: &Path, context: &ReportContext) -> AppResult<Vec<u8>>;
}

/// Renderer for Word templates on the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct DocxTemplateRenderer;

#[async_trait]
impl ReportRenderer for DocxTemplateRenderer {
    async fn render(&self, template_path: &Path, context: &ReportContext) -> AppResult<Vec<u8>> {
        let template_path: PathBuf = template_path.to_path_buf();
        let context = context.clone();

        tokio::task::spawn_blocking(move || {
            let template = std::fs::read(&template_path).map_err(|e| {
                AppError::Render(format!(
                    "Failed to read template {}: {}",
                    template_path.display(),
                    e
                ))
            })?;
            debug!(
                template = %template_path.display(),
                bytes = template.len(),
                "Rendering court report"
            );
            fill_template(&template, &context)
        })
        .await
        .map_err(|e| AppError::Render(format!("Render task failed: {}", e)))?
    }
}

/// Whether a part of the archive may contain placeholders.
fn is_text_part(name: &str) -> bool {
    name.starts_with("word/") && name.ends_with(".xml")
}

/// Replace every `{{name}}` / `{{ name }}` token with its escaped value.
fn substitute(xml: &str, placeholders: &[(&'static str, String)]) -> String {
    let mut out = xml.to_string();
    for (name, value) in placeholders {
        let value = markup::escape(value);
        out = out
            .replace(&format!("{{{{{}}}}}", name), &value)
            .replace(&format!("{{{{ {} }}}}", name), &value);
    }
    out
}

/// Produce a filled-in copy of a `.docx` template held in memory.
pub fn fill_template(template: &[u8], context: &ReportContext) -> AppResult<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(template))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let placeholders = context.placeholders();
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let name = archive.by_index_raw(i)?.name().to_string();

        if is_text_part(&name) {
            let mut xml = String::new();
            archive
                .by_index(i)?
                .read_to_string(&mut xml)
                .map_err(|e| AppError::Render(format!("Failed to read part {}: {}", name, e)))?;

            writer.start_file(name.as_str(), options)?;
            writer
                .write_all(substitute(&xml, &placeholders).as_bytes())
                .map_err(|e| AppError::Render(format!("Failed to write part {}: {}", name, e)))?;
        } else {
            writer.raw_copy_file(archive.by_index_raw(i)?)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}
