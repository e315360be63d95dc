mod block;
mod config;
mod docx;
mod error;
mod inline;
mod parser;

pub use block::{Block, ListKind, Run};
pub use config::{Config, FontConfig, PathsConfig, TableConfig};
pub use error::{Error, Result};
pub use inline::{format, paragraph_runs};
pub use parser::translate;

use std::fs;
use std::path::Path;

use tracing::info;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Convert markdown to `word/document.xml` markup using default config.
pub fn markdown_to_document_xml(markdown: &str) -> String {
    docx::blocks_to_document_xml(&parse(markdown), &Config::compiled_default())
}

/// Convert markdown to docx bytes using default config.
pub fn markdown_to_docx(markdown: &str) -> Result<Vec<u8>> {
    markdown_to_docx_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to docx bytes with custom config.
pub fn markdown_to_docx_with_config(markdown: &str, config: &Config) -> Result<Vec<u8>> {
    docx::blocks_to_docx(&parse(markdown), config, None)
}

/// Fail fast before reading anything: the input must be a file and the
/// output's directory must already exist.
pub fn preflight(input: &Path, output: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(Error::MissingInput(input.to_path_buf()));
    }
    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            return Err(Error::OutputDirMissing(dir.to_path_buf()));
        }
    }
    Ok(())
}

/// Convert one markdown file into one docx file, overwriting the output.
///
/// The archive is built in memory first, so nothing is written unless the
/// whole conversion succeeds.
pub fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<()> {
    preflight(input, output)?;

    let markdown = fs::read_to_string(input).map_err(|source| Error::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let blocks = parse(&markdown);
    info!(input = %input.display(), blocks = blocks.len(), "parsed markdown");

    let title = input.file_stem().and_then(|s| s.to_str());
    let bytes = docx::blocks_to_docx(&blocks, config, title)?;

    fs::write(output, bytes).map_err(|source| Error::Write {
        path: output.to_path_buf(),
        source,
    })?;
    info!(output = %output.display(), "wrote docx");
    Ok(())
}
