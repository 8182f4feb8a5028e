//! Output side: serialize the accepted list as echo XML, Topics XML or JSON Lines,
//! always through a temp file that is promoted only after a clean flush.

use crate::error::{ExtractError, Result};
use crate::record::Record;
use crate::streaming::CancelFlag;
use crate::tags::joined_tags;
use crate::util::{create_with_backoff, partial_path_for, remove_with_backoff, replace_file_atomic_backoff};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Serializer for a finished, read-only accepted list.
pub trait OutputFormatter {
    /// Write the whole document; returns the number of record elements emitted.
    fn write_to(&self, records: &[Record], out: &mut dyn Write) -> io::Result<usize>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `<posts>` with one `<row/>` per record, attributes verbatim.
    #[default]
    Echo,
    /// `<Topics>` with one `<Topic number="A.n">` per question.
    Topics,
    /// One JSON object per line.
    Jsonl,
}

impl OutputFormat {
    pub fn formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Echo => Box::new(EchoFormatter),
            Self::Topics => Box::new(TopicsFormatter),
            Self::Jsonl => Box::new(JsonlFormatter),
        }
    }

    pub fn default_output(self) -> &'static str {
        match self {
            Self::Echo => "extracted_posts.xml",
            Self::Topics => "extracted_topics.xml",
            Self::Jsonl => "extracted_posts.jsonl",
        }
    }
}

// quick-xml writer results converted without caring which error type the writer uses
fn xml_io<E>(e: E) -> io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    io::Error::new(io::ErrorKind::Other, e)
}

fn write_decl<W: Write>(w: &mut Writer<W>) -> io::Result<()> {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))).map_err(xml_io)
}

/// Escape an attribute value so that a conforming parser reads back the exact string
/// (attribute-value normalization would otherwise fold `\n`, `\r`, `\t` into spaces).
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }
    Cow::Owned(escaped.replace('\n', "&#10;").replace('\r', "&#13;").replace('\t', "&#9;"))
}

/// Collapse every whitespace run to a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct EchoFormatter;

impl OutputFormatter for EchoFormatter {
    fn write_to(&self, records: &[Record], out: &mut dyn Write) -> io::Result<usize> {
        let mut w = Writer::new_with_indent(out, b' ', 2);
        write_decl(&mut w)?;
        w.write_event(Event::Start(BytesStart::new("posts"))).map_err(xml_io)?;
        for rec in records {
            let escaped: Vec<(&str, Cow<'_, str>)> = rec.iter().map(|(k, v)| (k, escape_attr(v))).collect();
            let mut row = BytesStart::new("row");
            for (k, v) in &escaped {
                row.push_attribute((k.as_bytes(), v.as_bytes()));
            }
            w.write_event(Event::Empty(row)).map_err(xml_io)?;
        }
        w.write_event(Event::End(BytesEnd::new("posts"))).map_err(xml_io)?;
        w.get_mut().write_all(b"\n")?;
        Ok(records.len())
    }
}

pub struct TopicsFormatter;

impl TopicsFormatter {
    fn text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
        w.create_element(name)
            .write_text_content(BytesText::new(text))
            .map_err(xml_io)?;
        Ok(())
    }
}

impl OutputFormatter for TopicsFormatter {
    fn write_to(&self, records: &[Record], out: &mut dyn Write) -> io::Result<usize> {
        let mut w = Writer::new_with_indent(out, b' ', 3);
        write_decl(&mut w)?;
        w.write_event(Event::Start(BytesStart::new("Topics"))).map_err(xml_io)?;

        let mut written = 0usize;
        for rec in records.iter().filter(|r| r.is_question()) {
            written += 1;
            let number = format!("A.{written}");
            let topic = BytesStart::new("Topic").with_attributes([("number", number.as_str())]);
            w.write_event(Event::Start(topic)).map_err(xml_io)?;

            Self::text_element(&mut w, "Title", &collapse_whitespace(rec.get_or("Title", "Untitled Question")))?;
            Self::text_element(&mut w, "Question", &collapse_whitespace(rec.get_or("Body", "")))?;
            Self::text_element(&mut w, "Tags", &joined_tags(rec.get_or("Tags", "")))?;

            w.write_event(Event::End(BytesEnd::new("Topic"))).map_err(xml_io)?;
        }

        w.write_event(Event::End(BytesEnd::new("Topics"))).map_err(xml_io)?;
        w.get_mut().write_all(b"\n")?;
        if written == 0 && !records.is_empty() {
            tracing::warn!("none of the {} accepted records is a question; Topics output is empty", records.len());
        }
        Ok(written)
    }
}

pub struct JsonlFormatter;

impl OutputFormatter for JsonlFormatter {
    fn write_to(&self, records: &[Record], out: &mut dyn Write) -> io::Result<usize> {
        for rec in records {
            serde_json::to_writer(&mut *out, rec)?;
            out.write_all(b"\n")?;
        }
        Ok(records.len())
    }
}

fn write_via_partial(
    formatter: &dyn OutputFormatter,
    records: &[Record],
    tmp: &Path,
    dest: &Path,
    write_buf: usize,
    cancel: Option<&CancelFlag>,
) -> io::Result<usize> {
    let file = create_with_backoff(tmp, 16, 50)?;
    let mut w = BufWriter::with_capacity(write_buf.max(8 * 1024), file);
    let n = formatter.write_to(records, &mut w)?;
    w.flush()?;
    w.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    // last point where the destination is still untouched
    if cancel.is_some_and(CancelFlag::is_cancelled) {
        return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled before the output was promoted"));
    }
    replace_file_atomic_backoff(tmp, dest)?;
    Ok(n)
}

/// Consume the accepted list and persist it at `dest` in `format`.
/// `dest` is either the complete document or untouched; the temp file is cleaned up on failure.
/// A raised `cancel` flag aborts before promotion with an `Interrupted` source.
pub fn write_output(
    format: OutputFormat,
    records: Vec<Record>,
    dest: &Path,
    write_buf: usize,
    cancel: Option<&CancelFlag>,
) -> Result<usize> {
    let tmp = partial_path_for(dest);
    match write_via_partial(format.formatter().as_ref(), &records, &tmp, dest, write_buf, cancel) {
        Ok(n) => {
            tracing::debug!("wrote {} elements to {}", n, dest.display());
            Ok(n)
        }
        Err(source) => {
            let _ = remove_with_backoff(&tmp, 4, 25);
            Err(ExtractError::WriteFailure { path: dest.to_path_buf(), accepted: records.len(), source })
        }
    }
}
