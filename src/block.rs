/// A contiguous span of text sharing one formatting attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

/// Marker style of a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Numbered,
}

/// Block-level elements produced from Markdown lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Levels 1 through 4.
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        runs: Vec<Run>,
    },
    ListItem {
        kind: ListKind,
        runs: Vec<Run>,
    },
    /// Lines between a pair of fences, trailing whitespace removed.
    CodeBlock {
        lines: Vec<String>,
    },
    /// Header cells render bold. Data rows may be shorter or longer than the header.
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}
