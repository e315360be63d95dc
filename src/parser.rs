use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::block::{Block, ListKind};
use crate::inline;

static NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s").unwrap());

const FENCE: &str = "```";

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    translate(markdown.split('\n'))
}

/// Translate lines into blocks in a single pass.
pub fn translate<'a, I>(lines: I) -> Vec<Block>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut translator = Translator::default();
    for line in lines {
        translator.line(line);
    }
    translator.finish()
}

/// Table being accumulated. Only the header exists until the first data row.
#[derive(Debug)]
struct TableBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    fn build(self) -> Block {
        Block::Table {
            header: self.header,
            rows: self.rows,
        }
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Normal,
    InTable(TableBuilder),
    InCodeBlock(Vec<String>),
}

#[derive(Default)]
struct Translator {
    state: State,
    blocks: Vec<Block>,
}

impl Translator {
    fn line(&mut self, raw: &str) {
        let line = raw.trim_end();
        let trimmed = line.trim();

        if trimmed.starts_with(FENCE) {
            self.fence();
            return;
        }

        if let State::InCodeBlock(lines) = &mut self.state {
            lines.push(line.to_string());
            return;
        }

        if trimmed.is_empty() {
            return;
        }

        if trimmed.starts_with('|') {
            self.table_row(trimmed);
            return;
        }

        // Every other kind of line ends the table in progress.
        self.end_table();

        if let Some((level, text)) = heading(line) {
            if level == 2 && is_separator_marker(text) {
                return;
            }
            self.blocks.push(Block::Heading {
                level,
                text: text.to_string(),
            });
        } else if is_separator_marker(trimmed) {
            // Horizontal rule
        } else if let Some(rest) = trimmed.strip_prefix("- ") {
            self.blocks.push(Block::ListItem {
                kind: ListKind::Bullet,
                runs: inline::format(rest.trim()),
            });
        } else if let Some(m) = NUMBERED_ITEM.find(trimmed) {
            self.blocks.push(Block::ListItem {
                kind: ListKind::Numbered,
                runs: inline::format(&trimmed[m.end()..]),
            });
        } else {
            self.blocks.push(Block::Paragraph {
                runs: inline::paragraph_runs(trimmed),
            });
        }
    }

    fn fence(&mut self) {
        match std::mem::take(&mut self.state) {
            State::InCodeBlock(lines) => self.push_code_block(lines),
            State::InTable(table) => {
                self.push_table(table);
                self.state = State::InCodeBlock(Vec::new());
            }
            State::Normal => self.state = State::InCodeBlock(Vec::new()),
        }
    }

    fn table_row(&mut self, trimmed: &str) {
        if is_separator_row(trimmed) {
            match std::mem::take(&mut self.state) {
                // Conventional header / separator / body shape
                State::InTable(table) if table.rows.is_empty() => {
                    self.state = State::InTable(table);
                }
                State::InTable(table) => self.push_table(table),
                other => self.state = other,
            }
            return;
        }

        let cells = split_cells(trimmed);
        if cells.len() < 2 {
            return;
        }

        match &mut self.state {
            State::InTable(table) => table.rows.push(cells),
            _ => {
                debug!(columns = cells.len(), "starting table");
                self.state = State::InTable(TableBuilder {
                    header: cells,
                    rows: Vec::new(),
                });
            }
        }
    }

    fn end_table(&mut self) {
        if let State::InTable(_) = self.state {
            if let State::InTable(table) = std::mem::take(&mut self.state) {
                self.push_table(table);
            }
        }
    }

    fn push_table(&mut self, table: TableBuilder) {
        debug!(rows = table.rows.len(), "flushing table");
        self.blocks.push(table.build());
    }

    fn push_code_block(&mut self, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        debug!(lines = lines.len(), "flushing code block");
        self.blocks.push(Block::CodeBlock { lines });
    }

    fn finish(mut self) -> Vec<Block> {
        match std::mem::take(&mut self.state) {
            State::Normal => {}
            State::InTable(table) => self.push_table(table),
            State::InCodeBlock(lines) => {
                warn!(lines = lines.len(), "dropping unterminated code fence at end of input");
            }
        }
        self.blocks
    }
}

/// Level and trimmed text of a `#`-style heading with one to four hashes.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if !(1..=4).contains(&hashes) {
        return None;
    }
    let rest = line[hashes..].strip_prefix(' ')?;
    Some((hashes as u8, rest.trim()))
}

/// Three or more hyphens and nothing else.
fn is_separator_marker(text: &str) -> bool {
    text.len() >= 3 && text.bytes().all(|b| b == b'-')
}

fn is_separator_row(trimmed: &str) -> bool {
    trimmed
        .chars()
        .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Trimmed cells of a row, without the empty cells produced by the outer pipes.
fn split_cells(trimmed: &str) -> Vec<String> {
    let mut cells: Vec<&str> = trimmed.split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(str::to_string).collect()
}
