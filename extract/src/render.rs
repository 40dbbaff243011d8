//! Output formats.

use std::io::{self, Write};
use std::str::FromStr;

use vokabel::{SentenceRecord, VocabularyEntry};

/// Output format on stdout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    /// One lemma per line, followed by its gloss.
    #[default]
    List,
    /// Tab-separated columns with a header line.
    Tsv,
    /// A standalone HTML table.
    Html,
    /// Each lemma followed by the sentences around its first occurrence.
    Context,
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" | "plain" => Ok(Self::List),
            "tsv" => Ok(Self::Tsv),
            "html" => Ok(Self::Html),
            "context" => Ok(Self::Context),
            _ => Err("Could not parse a format"),
        }
    }
}

/// Line-aligned parallel texts shown next to each entry in triple mode.
#[derive(Clone, Debug, Default)]
pub struct ParallelTexts {
    texts: Vec<Vec<String>>,
}

impl ParallelTexts {
    pub fn new<I>(texts: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            texts: texts
                .into_iter()
                .map(|t| t.lines().map(|l| l.trim().to_string()).collect())
                .collect(),
        }
    }

    /// Gets line `i` of every parallel text; missing lines are empty.
    fn lines(&self, i: usize) -> Vec<&str> {
        self.texts
            .iter()
            .map(|t| t.get(i).map_or("", String::as_str))
            .collect()
    }

    fn len(&self) -> usize {
        self.texts.len()
    }
}

pub struct Renderer {
    format: Format,
    parallel: ParallelTexts,
}

impl Renderer {
    pub fn new(format: Format, parallel: ParallelTexts) -> Self {
        Self { format, parallel }
    }

    pub fn render_words<W>(&self, mut wtr: W, entries: &[VocabularyEntry]) -> io::Result<()>
    where
        W: Write,
    {
        match self.format {
            Format::List => {
                for e in entries {
                    write!(wtr, "{}", e.lemma)?;
                    if let Some(gloss) = &e.gloss {
                        write!(wtr, "\t{gloss}")?;
                    }
                    for line in self.parallel.lines(e.first_seen.sentence) {
                        write!(wtr, "\t{line}")?;
                    }
                    writeln!(wtr)?;
                }
            }
            Format::Tsv => {
                write!(wtr, "lemma\tpos\tgloss\tform\tcount\tsentence")?;
                for i in 0..self.parallel.len() {
                    write!(wtr, "\ttext{}", i + 2)?;
                }
                writeln!(wtr)?;
                for e in entries {
                    write!(
                        wtr,
                        "{}\t{}\t{}\t{}\t{}\t{}",
                        tsv_field(&e.lemma),
                        e.pos,
                        tsv_field(e.gloss.as_deref().unwrap_or("")),
                        tsv_field(e.shortest_form()),
                        e.occurrences,
                        tsv_field(e.context.as_ref().map_or("", |c| c.sentence.as_str())),
                    )?;
                    for line in self.parallel.lines(e.first_seen.sentence) {
                        write!(wtr, "\t{}", tsv_field(line))?;
                    }
                    writeln!(wtr)?;
                }
            }
            Format::Html => {
                writeln!(wtr, "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Vocabulary</title></head>\n<body>\n<table>")?;
                writeln!(wtr, "<tr><th>Lemma</th><th>Gloss</th><th>Form</th><th>Context</th></tr>")?;
                for e in entries {
                    let context = e.context.as_ref().map_or(String::new(), |c| {
                        [c.left_text(), c.sentence.clone(), c.right_text()]
                            .into_iter()
                            .filter(|s| !s.is_empty())
                            .collect::<Vec<_>>()
                            .join(" ")
                    });
                    write!(
                        wtr,
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                        escape_html(&e.lemma),
                        escape_html(e.gloss.as_deref().unwrap_or("")),
                        escape_html(e.shortest_form()),
                        escape_html(&context),
                    )?;
                    for line in self.parallel.lines(e.first_seen.sentence) {
                        write!(wtr, "<td>{}</td>", escape_html(line))?;
                    }
                    writeln!(wtr, "</tr>")?;
                }
                writeln!(wtr, "</table>\n</body>\n</html>")?;
            }
            Format::Context => {
                for e in entries {
                    writeln!(wtr, "{}", e.lemma)?;
                    if let Some(c) = &e.context {
                        for s in c.left.iter().chain([&c.sentence]).chain(c.right.iter()) {
                            writeln!(wtr, "  {s}")?;
                        }
                    }
                    for line in self.parallel.lines(e.first_seen.sentence) {
                        writeln!(wtr, "  = {line}")?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn render_sentences<W>(&self, mut wtr: W, records: &[SentenceRecord]) -> io::Result<()>
    where
        W: Write,
    {
        match self.format {
            Format::Html => {
                writeln!(wtr, "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Sentences</title></head>\n<body>\n<table>")?;
                for r in records {
                    write!(
                        wtr,
                        "<tr><td>{}</td><td>{}</td>",
                        escape_html(&r.text),
                        escape_html(&r.words.join(", ")),
                    )?;
                    for line in self.parallel.lines(r.index) {
                        write!(wtr, "<td>{}</td>", escape_html(line))?;
                    }
                    writeln!(wtr, "</tr>")?;
                }
                writeln!(wtr, "</table>\n</body>\n</html>")?;
            }
            _ => {
                for r in records {
                    write!(wtr, "{}\t{}", tsv_field(&r.text), tsv_field(&r.words.join(", ")))?;
                    for line in self.parallel.lines(r.index) {
                        write!(wtr, "\t{}", tsv_field(line))?;
                    }
                    writeln!(wtr)?;
                }
            }
        }
        Ok(())
    }
}

/// Replaces tabs and newlines, which would break the columns.
fn tsv_field(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
