//! # Per-file Diff Reconstruction
//!
//! A unified diff produced with enough context already interleaves both
//! versions of a file. This module splits one file's diff into its header and
//! body and rebuilds the two sides from the body alone:
//!
//! ```text
//! old document = context + removed lines
//! new document = context + added lines
//! ```
//!
//! Hunk headers (`@@ ... @@`) and `\ No newline at end of file` markers are
//! never part of either document; the latter only clears the trailing newline
//! of the side its preceding line belongs to.

/// One line of a unified diff body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    Added(&'a str),
    Removed(&'a str),
    Context(&'a str),
    /// `@@ -a,b +c,d @@` hunk header
    HunkHeader(&'a str),
    /// `\ No newline at end of file`
    NoNewline,
}

impl<'a> DiffLine<'a> {
    /// Classify a body line by its leading marker character.
    pub fn parse(line: &'a str) -> Self {
        if line.starts_with("@@") {
            return DiffLine::HunkHeader(line);
        }
        match line.as_bytes().first() {
            Some(b'+') => DiffLine::Added(&line[1..]),
            Some(b'-') => DiffLine::Removed(&line[1..]),
            Some(b'\\') => DiffLine::NoNewline,
            Some(b' ') => DiffLine::Context(&line[1..]),
            // Some tools strip the trailing space of blank context lines.
            None => DiffLine::Context(""),
            Some(_) => DiffLine::Context(line),
        }
    }
}

/// One side of a file, rebuilt from diff lines only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntheticDocument {
    lines: Vec<String>,
    missing_final_newline: bool,
}

impl SyntheticDocument {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            missing_final_newline: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn first_line(&self) -> Option<&str> {
        self.lines.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Full text of the document, with the original final-newline state.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !self.lines.is_empty() && !self.missing_final_newline {
            text.push('\n');
        }
        text
    }

    fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.missing_final_newline = false;
    }
}

/// The raw diff text of a single file, split into header and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch<'a> {
    header: Vec<&'a str>,
    body: Vec<&'a str>,
}

impl<'a> FilePatch<'a> {
    /// Everything before the first hunk header is header (`diff --git`,
    /// mode lines, `index`, `---`, `+++`). A diff without hunks (binary or
    /// mode-only changes) is all header.
    pub fn parse(raw: &'a str) -> Self {
        let lines: Vec<&str> = raw.split_terminator('\n').collect();
        let split = lines
            .iter()
            .position(|line| line.starts_with("@@"))
            .unwrap_or(lines.len());
        let (header, body) = lines.split_at(split);
        Self {
            header: header.to_vec(),
            body: body.to_vec(),
        }
    }

    pub fn header_len(&self) -> usize {
        self.header.len()
    }

    /// Header lines joined back together, newline-terminated.
    pub fn header_text(&self) -> String {
        join_lines(&self.header)
    }

    pub fn has_hunks(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn body(&self) -> impl Iterator<Item = DiffLine<'a>> + '_ {
        self.body.iter().copied().map(DiffLine::parse)
    }

    /// Rebuild the old and new documents from the body lines, preserving
    /// their order.
    pub fn reconstruct(&self) -> (SyntheticDocument, SyntheticDocument) {
        let mut old = SyntheticDocument::default();
        let mut new = SyntheticDocument::default();
        // Which side(s) the previous content line went to.
        let mut last = (false, false);

        for line in self.body() {
            match line {
                DiffLine::Context(text) => {
                    old.push(text);
                    new.push(text);
                    last = (true, true);
                }
                DiffLine::Removed(text) => {
                    old.push(text);
                    last = (true, false);
                }
                DiffLine::Added(text) => {
                    new.push(text);
                    last = (false, true);
                }
                DiffLine::NoNewline => {
                    if last.0 {
                        old.missing_final_newline = true;
                    }
                    if last.1 {
                        new.missing_final_newline = true;
                    }
                }
                DiffLine::HunkHeader(_) => last = (false, false),
            }
        }

        (old, new)
    }
}

/// First `n` lines of `text`, newline-terminated.
pub fn leading_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.split_terminator('\n').take(n).collect();
    join_lines(&lines)
}

fn join_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
