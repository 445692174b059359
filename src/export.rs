//! Writers for the structured, flat corpus and labeled corpus outputs

use crate::body::{FallbackJoin, extract_body};
use crate::error::Result;
use crate::label::Label;
use crate::record::NormalizedRecord;
use crate::tree::MessageTree;
use std::io::Write;
use tracing::info;

/// Write records as a pretty-printed JSON array
pub fn write_json<W: Write>(records: &[NormalizedRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Wrote {} records as JSON", records.len());
    Ok(())
}

/// Reduce a body to the classifier's pre-stemming form: lowercase, ASCII
/// punctuation removed, whitespace runs collapsed to single spaces.
#[must_use]
pub fn normalize_corpus_text(body: &str) -> String {
    let lowered: String = body
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flat corpus line for one message
#[must_use]
pub fn corpus_line(tree: &MessageTree) -> String {
    normalize_corpus_text(&extract_body(tree, FallbackJoin::Space))
}

/// Write one corpus line per message
pub fn write_corpus<W, S>(lines: &[S], mut writer: W) -> Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.flush()?;
    info!("Wrote {} corpus lines", lines.len());
    Ok(())
}

/// A corpus line paired with its class label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledLine {
    pub label: Label,
    pub text: String,
}

impl LabeledLine {
    #[must_use]
    pub fn from_tree(tree: &MessageTree, default: Label, trust_headers: bool) -> Self {
        Self {
            label: Label::infer(tree, default, trust_headers),
            text: corpus_line(tree),
        }
    }
}

/// Write `label,text,label_num` rows under a header line.
///
/// Corpus text has no punctuation, so fields never need quoting.
pub fn write_labeled_csv<W: Write>(rows: &[LabeledLine], mut writer: W) -> Result<()> {
    writeln!(writer, "label,text,label_num")?;
    for row in rows {
        writeln!(writer, "{},{},{}", row.label, row.text, row.label.as_num())?;
    }
    writer.flush()?;
    info!("Wrote {} labeled rows", rows.len());
    Ok(())
}
