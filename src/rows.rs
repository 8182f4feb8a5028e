//! Input side: open a dump (plain or `.zst`) as a buffered byte stream and pull
//! `<row/>` records out of it one at a time with quick-xml.
//!
//! Only one event buffer is alive at a time; it is cleared before every read, so
//! resident memory does not grow with the size of the input.

use crate::error::{ExtractError, Result};
use crate::record::Record;
use crate::util::open_with_backoff;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

const ROW: &[u8] = b"row";

/// A `Read` wrapper that counts (compressed) bytes read from disk.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

#[inline]
pub fn is_zst(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("zst"))
}

/// Open `path` for streaming. `.zst` inputs are decoded on the fly; `counter`
/// receives the number of bytes read from the file itself.
pub fn open_source(
    path: &Path,
    read_buf_bytes: usize,
    counter: Arc<AtomicU64>,
) -> Result<Box<dyn BufRead + Send>> {
    let file = open_with_backoff(path, 16, 50).map_err(|e| ExtractError::open(path, e))?;
    let counted = CountingReader { inner: file, counter };
    let cap = read_buf_bytes.max(8 * 1024);

    if is_zst(path) {
        let io_err = |source| ExtractError::Io { path: path.to_path_buf(), source };
        let mut decoder = Decoder::new(counted).map_err(io_err)?;
        // avoid "Frame requires too much memory" on dumps compressed with --long
        decoder.window_log_max(31).map_err(io_err)?;
        Ok(Box::new(BufReader::with_capacity(cap, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(cap, counted)))
    }
}

/// Pull parser yielding one `Record` per `row` element.
///
/// Both `<row .../>` and `<row ...>...</row>` are records (content of the latter
/// is skipped). Any other element is structural and ignored.
pub struct RowReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    skip_buf: Vec<u8>,
    depth: usize,
    seen_element: bool,
    root_closed: bool,
    origin: PathBuf,
}

impl<R: BufRead> RowReader<R> {
    pub fn new(src: R) -> Self {
        Self::with_origin(src, PathBuf::from("<stream>"))
    }

    /// `origin` only labels I/O errors.
    pub fn with_origin(src: R, origin: impl Into<PathBuf>) -> Self {
        let mut reader = Reader::from_reader(src);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::with_capacity(16 * 1024),
            skip_buf: Vec::new(),
            depth: 0,
            seen_element: false,
            root_closed: false,
            origin: origin.into(),
        }
    }

    /// Bytes consumed by the XML reader so far.
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    /// Next record in stream order, or `None` at a well-formed end of input.
    pub fn next_row(&mut self) -> Result<Option<Record>> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(ev) => ev,
                Err(e) => return Err(fail(&self.reader, &self.origin, e)),
            };
            match event {
                Event::Empty(ref e) => {
                    if self.root_closed {
                        return Err(junk(&self.reader));
                    }
                    self.seen_element = true;
                    self.root_closed = self.depth == 0;
                    if e.name().as_ref() == ROW {
                        let rec = record_from(e).map_err(|err| fail(&self.reader, &self.origin, err))?;
                        return Ok(Some(rec));
                    }
                }
                Event::Start(ref e) => {
                    if self.root_closed {
                        return Err(junk(&self.reader));
                    }
                    self.seen_element = true;
                    if e.name().as_ref() == ROW {
                        let rec = record_from(e).map_err(|err| fail(&self.reader, &self.origin, err))?;
                        let end = e.to_end().into_owned();
                        self.skip_buf.clear();
                        if let Err(err) = self.reader.read_to_end_into(end.name(), &mut self.skip_buf) {
                            return Err(fail(&self.reader, &self.origin, err));
                        }
                        self.root_closed = self.depth == 0;
                        return Ok(Some(rec));
                    }
                    self.depth += 1;
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    self.root_closed = self.depth == 0;
                }
                Event::Text(ref t) if self.root_closed && !is_blank(t) => {
                    return Err(junk(&self.reader));
                }
                Event::CData(_) if self.root_closed => {
                    return Err(junk(&self.reader));
                }
                Event::Eof => {
                    if !self.seen_element {
                        return Err(truncated(&self.reader, "no root element found"));
                    }
                    if self.depth > 0 {
                        return Err(truncated(&self.reader, "unexpected end of input inside an open element"));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

fn fail<R>(reader: &Reader<R>, origin: &Path, err: quick_xml::Error) -> ExtractError {
    match err {
        quick_xml::Error::Io(e) => ExtractError::Io {
            path: origin.to_path_buf(),
            source: io::Error::new(e.kind(), e.to_string()),
        },
        source => ExtractError::MalformedInput { position: reader.buffer_position() as u64, source },
    }
}

fn malformed<R>(reader: &Reader<R>, kind: io::ErrorKind, what: &str) -> ExtractError {
    ExtractError::MalformedInput {
        position: reader.buffer_position() as u64,
        source: quick_xml::Error::from(io::Error::new(kind, what.to_string())),
    }
}

fn truncated<R>(reader: &Reader<R>, what: &str) -> ExtractError {
    malformed(reader, io::ErrorKind::UnexpectedEof, what)
}

// content after the root element closed
fn junk<R>(reader: &Reader<R>) -> ExtractError {
    malformed(reader, io::ErrorKind::InvalidData, "junk after document element")
}

fn is_blank(text: &[u8]) -> bool {
    text.iter().all(|b| b.is_ascii_whitespace())
}

/// Attribute-value normalization: literal `\r\n`, `\n`, `\r` and `\t` read as a space.
/// Character references such as `&#10;` are decoded afterwards and survive as-is.
fn normalize_attr_whitespace(raw: &[u8]) -> Cow<'_, [u8]> {
    if !raw.iter().any(|b| matches!(b, b'\n' | b'\r' | b'\t')) {
        return Cow::Borrowed(raw);
    }
    let mut out = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        match b {
            b'\r' => {
                if bytes.peek() == Some(&b'\n') {
                    bytes.next();
                }
                out.push(b' ');
            }
            b'\n' | b'\t' => out.push(b' '),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

fn record_from(e: &BytesStart<'_>) -> std::result::Result<Record, quick_xml::Error> {
    let mut rec = Record::with_capacity(16);
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = normalize_attr_whitespace(&attr.value);
        let value = unescape(&String::from_utf8_lossy(&raw))?.into_owned();
        rec.insert(key, value);
    }
    Ok(rec)
}
