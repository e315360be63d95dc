use std::sync::LazyLock;

use regex::Regex;

use crate::block::Run;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*.*?\*\*").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

/// Split text into alternating plain and bold runs on `**` pairs.
///
/// Text outside a matched pair is kept verbatim, so an unmatched `**` stays
/// literal. Empty runs are omitted.
pub fn format(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for m in BOLD.find_iter(text) {
        push_run(&mut runs, &text[cursor..m.start()], false);
        push_run(&mut runs, &text[m.start() + 2..m.end() - 2], true);
        cursor = m.end();
    }
    push_run(&mut runs, &text[cursor..], false);

    runs
}

fn push_run(runs: &mut Vec<Run>, text: &str, bold: bool) {
    if text.is_empty() {
        return;
    }
    runs.push(Run {
        text: text.to_string(),
        bold,
    });
}

/// Unwrap `` `code` `` spans to their contents.
pub fn strip_inline_code(text: &str) -> String {
    INLINE_CODE.replace_all(text, "$1").into_owned()
}

/// Collapse `[label](target)` links to their label.
pub fn collapse_links(text: &str) -> String {
    LINK.replace_all(text, "$1").into_owned()
}

/// Runs for a paragraph line.
///
/// Code and link cleanup only happens when the line has no `**`, so a line
/// mixing bold with code or links keeps the raw syntax.
pub fn paragraph_runs(text: &str) -> Vec<Run> {
    if text.contains("**") {
        return format(text);
    }
    let cleaned = collapse_links(&strip_inline_code(text));
    if cleaned.is_empty() {
        Vec::new()
    } else {
        vec![Run::plain(cleaned)]
    }
}
