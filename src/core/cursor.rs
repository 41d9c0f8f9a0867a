//! Token cursor over nested markup.
//!
//! A cursor turns raw input into a forward-only stream of structural
//! [`Token`]s. The decoder only ever sees tokens, so any input that can be
//! expressed as start tags, end tags and character data can be decoded
//! (see [`super::JsonCursor`] for the JSON form).

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::Attributes;
use crate::util::{Error, Result};

/// Start tag with its attributes. Namespace prefixes are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StartTag {
    /// Local element name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Attributes,
}

impl StartTag {
    /// Create a start tag without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }
}

/// One structural event of the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Element opened.
    Start(StartTag),
    /// Element closed (local name).
    End(String),
    /// Character data, already unescaped.
    Text(String),
    /// Input exhausted.
    Eof,
}

/// Forward-only source of tokens.
pub trait TokenSource {
    /// Read the next token. Malformed input fails with
    /// [`Error::MalformedInput`]; after [`Token::Eof`] every call returns
    /// `Eof` again.
    fn next_token(&mut self) -> Result<Token>;

    /// Byte offset (or token index) reached so far, for error reporting.
    fn position(&self) -> u64;
}

/// Token cursor over XML text backed by `quick-xml`.
pub struct XmlCursor<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<'a> XmlCursor<&'a [u8]> {
    /// Create a cursor over in-memory XML text.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }

    /// Create a cursor over in-memory XML bytes.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: BufRead> XmlCursor<R> {
    /// Create a cursor over any buffered reader.
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        // `<a/>` arrives as Start + End so every element closes explicitly.
        config.expand_empty_elements = true;
        // Tag balance is validated by the walker, which knows the path.
        config.check_end_names = false;
        config.trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn start_tag(e: &BytesStart<'_>) -> Result<StartTag> {
        let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
        let mut attributes = Attributes::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| Error::malformed(format!("<{name}>: {err}")))?;
            let local = attr.key.local_name();
            let key = std::str::from_utf8(local.as_ref())?;
            let raw = std::str::from_utf8(&attr.value)?;
            let value = quick_xml::escape::unescape(raw)
                .map_err(|err| Error::malformed(format!("<{name} {key}>: {err}")))?;
            attributes.set(key, value.into_owned());
        }
        Ok(StartTag { name, attributes })
    }
}

impl<R: BufRead> TokenSource for XmlCursor<R> {
    fn next_token(&mut self) -> Result<Token> {
        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => Token::Start(Self::start_tag(&e)?),
                Event::Empty(e) => {
                    // Only reachable if empty-element expansion is turned off.
                    let tag = Self::start_tag(&e)?;
                    return Err(Error::malformed(format!("unexpanded empty element <{}>", tag.name)));
                }
                Event::End(e) => Token::End(std::str::from_utf8(e.local_name().as_ref())?.to_string()),
                Event::Text(e) => Token::Text(std::str::from_utf8(e.as_ref())?.to_string()),
                Event::CData(e) => Token::Text(std::str::from_utf8(e.as_ref())?.to_string()),
                Event::GeneralRef(e) => {
                    let entity = format!("&{};", std::str::from_utf8(e.as_ref())?);
                    let text = quick_xml::escape::unescape(&entity)
                        .map_err(|err| Error::malformed(format!("{entity}: {err}")))?;
                    Token::Text(text.into_owned())
                }
                Event::Eof => Token::Eof,
                // Declarations, comments, processing instructions, doctype
                _ => continue,
            };
            return Ok(token);
        }
    }

    fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }
}
