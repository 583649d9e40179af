//! Streaming scanner for `messages.htm` archives.
//!
//! The archive is structured as:
//! ```html
//! <div class="thread">Alice, Bob
//!   <div class="message">
//!     <div class="message_header">
//!       <span class="user">Alice</span>
//!       <span class="meta">Monday, August 10, 2015 at 10:40pm EDT</span>
//!     </div>
//!   </div>
//!   <p>message text</p>
//! </div>
//! ```
//!
//! The scanner pulls markup events one at a time and only keeps the thread
//! currently being read, so memory use is bounded by the largest fragment
//! rather than by the archive.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};
use tracing::debug;

use crate::error::{Result, ThreadpackError};

use super::{StreamingConfig, ThreadIterator};

/// One thread fragment as it appears in the archive, before any message is
/// assembled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawThread {
    /// Text preceding the first child element (`"Alice, Bob"`), trimmed.
    pub title: String,
    /// Message headers and bodies in document order.
    pub nodes: Vec<RawNode>,
}

/// A message-level element inside a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNode {
    /// A `div.message` with its `span.user` and `span.meta` text.
    Header {
        user: Option<String>,
        meta: Option<String>,
    },
    /// A `p` element. `None` when it carries no text at all.
    Body(Option<String>),
}

/// Opens archives for streaming.
///
/// # Example
///
/// ```rust,no_run
/// use threadpack::streaming::ArchiveScanner;
///
/// let scanner = ArchiveScanner::new();
/// for thread in scanner.scan("messages.htm").unwrap() {
///     let thread = thread.unwrap();
///     println!("{} ({} nodes)", thread.title, thread.nodes.len());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveScanner {
    config: StreamingConfig,
}

impl ArchiveScanner {
    /// Creates a scanner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scanner with custom configuration.
    pub fn with_config(config: StreamingConfig) -> Self {
        Self { config }
    }

    /// Opens `path` and returns an iterator over its thread fragments.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadpackError::Io`] if the file cannot be opened.
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<ThreadNodes<BufReader<File>>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let reader = BufReader::with_capacity(self.config.effective_buffer_size(), file);

        Ok(ThreadNodes::new(reader, path, Some(file_size)))
    }

    /// Returns an iterator over the thread fragments in `markup`.
    pub fn scan_str(markup: &str) -> ThreadNodes<&[u8]> {
        ThreadNodes::new(markup.as_bytes(), "<memory>", Some(markup.len() as u64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Thread,
    Message,
    User,
    Meta,
    Body,
    Other,
}

#[derive(Debug, Default)]
struct OpenThread {
    title: String,
    title_done: bool,
    nodes: Vec<RawNode>,
    user: Option<String>,
    meta: Option<String>,
    body: String,
}

/// Iterator over the raw thread fragments of one archive.
///
/// Finite and not restartable: scan the file again to start over. After a
/// markup error is yielded the iterator is exhausted.
pub struct ThreadNodes<R: BufRead> {
    reader: Reader<R>,
    path: PathBuf,
    buf: Vec<u8>,
    stack: Vec<Frame>,
    current: Option<OpenThread>,
    total_bytes: Option<u64>,
    finished: bool,
}

impl<R: BufRead> ThreadNodes<R> {
    fn new(reader: R, path: impl Into<PathBuf>, total_bytes: Option<u64>) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            path: path.into(),
            buf: Vec::with_capacity(4096),
            stack: Vec::new(),
            current: None,
            total_bytes,
            finished: false,
        }
    }

    fn markup_error(&self, source: quick_xml::Error) -> ThreadpackError {
        ThreadpackError::markup(&self.path, self.reader.buffer_position(), source)
    }

    fn open_element(&mut self, e: &BytesStart<'_>) -> Frame {
        let name = e.local_name();
        let name = name.as_ref();

        let Some(thread) = self.current.as_mut() else {
            if name.eq_ignore_ascii_case(b"div") && has_class(e, b"thread") {
                self.current = Some(OpenThread::default());
                return Frame::Thread;
            }
            return Frame::Other;
        };

        thread.title_done = true;

        if name.eq_ignore_ascii_case(b"div") && has_class(e, b"message") {
            thread.user = None;
            thread.meta = None;
            Frame::Message
        } else if name.eq_ignore_ascii_case(b"p") {
            thread.body.clear();
            Frame::Body
        } else if self.stack.contains(&Frame::Message) {
            if has_class(e, b"user") {
                Frame::User
            } else if has_class(e, b"meta") {
                Frame::Meta
            } else {
                Frame::Other
            }
        } else {
            Frame::Other
        }
    }

    /// Handles a closing tag; returns the finished thread when it closes one.
    fn close_element(&mut self, frame: Frame) -> Option<RawThread> {
        let thread = self.current.as_mut()?;
        match frame {
            Frame::Message => {
                thread.nodes.push(RawNode::Header {
                    user: non_empty(thread.user.take()),
                    meta: non_empty(thread.meta.take()),
                });
            }
            Frame::Body => {
                let body = std::mem::take(&mut thread.body);
                thread
                    .nodes
                    .push(RawNode::Body((!body.is_empty()).then_some(body)));
            }
            Frame::Thread => {
                let thread = self.current.take()?;
                debug!(title = %thread.title.trim(), nodes = thread.nodes.len(), "scanned thread fragment");
                return Some(RawThread {
                    title: thread.title.trim().to_string(),
                    nodes: thread.nodes,
                });
            }
            Frame::User | Frame::Meta | Frame::Other => {}
        }
        None
    }

    fn push_text(&mut self, text: &str) {
        let Some(thread) = self.current.as_mut() else {
            return;
        };
        let target = self
            .stack
            .iter()
            .rev()
            .find(|f| matches!(f, Frame::User | Frame::Meta | Frame::Body | Frame::Thread))
            .copied();
        match target {
            Some(Frame::User) => thread.user.get_or_insert_with(String::new).push_str(text),
            Some(Frame::Meta) => thread.meta.get_or_insert_with(String::new).push_str(text),
            Some(Frame::Body) => thread.body.push_str(text),
            Some(Frame::Thread) if !thread.title_done => thread.title.push_str(text),
            _ => {}
        }
    }

    fn next_thread(&mut self) -> Result<Option<RawThread>> {
        loop {
            let read = self
                .reader
                .read_event_into(&mut self.buf)
                .map(|event| event.into_owned());
            self.buf.clear();
            let event = match read {
                Ok(event) => event,
                Err(e) => return Err(self.markup_error(e)),
            };

            match event {
                Event::Start(e) => {
                    let frame = self.open_element(&e);
                    self.stack.push(frame);
                }
                Event::Empty(e) => {
                    let frame = self.open_element(&e);
                    if let Some(thread) = self.close_element(frame) {
                        return Ok(Some(thread));
                    }
                }
                Event::End(_) => {
                    if let Some(frame) = self.stack.pop() {
                        if let Some(thread) = self.close_element(frame) {
                            return Ok(Some(thread));
                        }
                    }
                }
                Event::Text(t) => {
                    let text = decode_text(&t);
                    self.push_text(&text);
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    self.push_text(&text);
                }
                Event::Eof => {
                    if self.current.is_some() {
                        return Err(self.markup_error(quick_xml::Error::UnexpectedEof(
                            "unclosed thread element".to_string(),
                        )));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for ThreadNodes<R> {
    type Item = Result<RawThread>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_thread() {
            Ok(Some(thread)) => Some(Ok(thread)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> ThreadIterator for ThreadNodes<R> {
    fn bytes_processed(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }
}

fn has_class(e: &BytesStart<'_>, class: &[u8]) -> bool {
    match e.try_get_attribute("class") {
        Ok(Some(attr)) => attr
            .value
            .split(|b| b.is_ascii_whitespace())
            .any(|c| c == class),
        _ => false,
    }
}

// Archives exported through HTML tooling may contain named entities XML
// does not define; keep the raw text for those instead of failing.
fn decode_text<'a>(t: &'a BytesText<'a>) -> Cow<'a, str> {
    t.unescape()
        .unwrap_or_else(|_| String::from_utf8_lossy(t))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
