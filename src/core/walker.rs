//! Child iteration over a token stream.
//!
//! [`Walker::next_child`] is the one primitive every builder uses: given an
//! open container it yields the container's immediate children one at a
//! time, then `None` once the container's end tag has been consumed. A
//! child the builder did not descend into (or only partly read) is skipped
//! in full before the next sibling is returned, however deep it nests.
//!
//! The walker keeps the stack of open element names, so it can:
//! - validate tag balance (`</b>` must close the innermost open `<b>`)
//! - report the element path of a failure
//! - enforce the nesting limit

use super::{CancelToken, StartTag, Token, TokenSource, DEFAULT_MAX_DEPTH};
use crate::util::{Error, Result};

/// An open element as handed to a builder.
///
/// `text` holds the character data immediately following the start tag,
/// captured in the same step so text-only elements lose nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Start tag (name and attributes).
    pub tag: StartTag,
    /// Character data directly after the start tag.
    pub text: String,
    /// Index of this element in the open-element stack (root = 0).
    pub depth: usize,
}

impl Element {
    /// Local element name.
    pub fn name(&self) -> &str {
        &self.tag.name
    }

    /// Optional attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.tag.attributes.get(key)
    }

    /// Optional attribute as an owned string.
    pub fn attr_string(&self, key: &str) -> Option<String> {
        self.tag.attributes.string(key)
    }

    /// Mandatory attribute.
    pub fn required(&self, key: &str) -> Result<&str> {
        self.tag.attributes.required(&self.tag.name, key)
    }

    /// Optional attribute parsed as `T`.
    pub fn parse_attr<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.tag.attributes.parse(&self.tag.name, key)
    }

    /// Mandatory attribute parsed as `T`.
    pub fn parse_required<T: std::str::FromStr>(&self, key: &str) -> Result<T> {
        self.tag.attributes.parse_required(&self.tag.name, key)
    }

    /// Character data, or `None` if empty.
    pub fn text_opt(&self) -> Option<String> {
        (!self.text.is_empty()).then(|| self.text.clone())
    }
}

/// Depth-tracking walker over a [`TokenSource`].
pub struct Walker<S> {
    source: S,
    /// Names of currently open elements, outermost first.
    open: Vec<String>,
    /// One token of lookahead, not yet applied to `open`.
    peeked: Option<Token>,
    max_depth: usize,
    trim_text: bool,
    cancel: Option<CancelToken>,
}

impl<S: TokenSource> Walker<S> {
    /// Create a walker with the default depth limit.
    pub fn new(source: S) -> Self {
        Self {
            source,
            open: Vec::new(),
            peeked: None,
            max_depth: DEFAULT_MAX_DEPTH,
            trim_text: true,
            cancel: None,
        }
    }

    /// Set the maximum nesting depth (root included).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Keep or trim whitespace around captured text.
    pub fn with_trim_text(mut self, trim: bool) -> Self {
        self.trim_text = trim;
        self
    }

    /// Attach a cancellation token checked on every iteration step.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Slash-separated path of open elements.
    pub fn path(&self) -> String {
        self.open.join("/")
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Position reached in the underlying source.
    pub fn position(&self) -> u64 {
        self.source.position()
    }

    /// Read up to and including the document element's start tag.
    ///
    /// Text before the root is ignored; an empty document or a stray end tag
    /// is malformed.
    pub fn root(&mut self) -> Result<Element> {
        loop {
            match self.bump()? {
                Token::Start(tag) => return self.finish_start(tag),
                Token::Text(_) => continue,
                Token::End(name) => {
                    return Err(Error::malformed(format!("end tag </{name}> before any element")));
                }
                Token::Eof => return Err(Error::malformed("document contains no element")),
            }
        }
    }

    /// Next immediate child of `container`, or `None` once its end tag has
    /// been consumed.
    ///
    /// Anything left of the previously returned child's subtree is skipped
    /// first. Fails with [`Error::UnexpectedEndOfInput`] if the input ends
    /// before `container` is closed.
    pub fn next_child(&mut self, container: &Element) -> Result<Option<Element>> {
        self.check_cancelled()?;
        if self.open.len() <= container.depth || self.open[container.depth] != container.tag.name {
            // Container already closed: it has no further children.
            return Ok(None);
        }
        self.unwind_to(container.depth + 1)?;

        loop {
            match self.bump()? {
                Token::Start(tag) => return self.finish_start(tag).map(Some),
                // Mixed content between children is ignored.
                Token::Text(_) => continue,
                Token::End(_) => return Ok(None),
                Token::Eof => {
                    return Err(Error::UnexpectedEndOfInput {
                        open: container.tag.name.clone(),
                    })
                }
            }
        }
    }

    /// Skip the rest of `element`'s subtree, consuming its end tag.
    /// Returns the number of nested elements skipped.
    pub fn skip(&mut self, element: &Element) -> Result<usize> {
        if self.open.len() <= element.depth || self.open[element.depth] != element.tag.name {
            return Ok(0);
        }
        self.unwind_to(element.depth)
    }

    /// Consume tokens until only `depth` elements remain open.
    fn unwind_to(&mut self, depth: usize) -> Result<usize> {
        let mut skipped = 0;
        while self.open.len() > depth {
            if let Token::Start(_) = self.bump()? {
                skipped += 1;
            }
        }
        Ok(skipped)
    }

    /// Collect the character data following a start tag into an element.
    fn finish_start(&mut self, tag: StartTag) -> Result<Element> {
        let depth = self.open.len() - 1;
        let mut text = String::new();
        while let Token::Text(_) = self.peek()? {
            if let Some(Token::Text(chunk)) = self.peeked.take() {
                text.push_str(&chunk);
            }
        }
        if self.trim_text {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                text = trimmed.to_string();
            }
        }
        Ok(Element { tag, text, depth })
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.peeked.is_none() {
            self.peeked = Some(self.source.next_token()?);
        }
        Ok(self.peeked.get_or_insert(Token::Eof))
    }

    /// Consume one token and apply it to the open-element stack.
    fn bump(&mut self) -> Result<Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.source.next_token()?,
        };
        match &token {
            Token::Start(tag) => {
                if self.open.len() >= self.max_depth {
                    return Err(Error::DepthLimitExceeded { limit: self.max_depth });
                }
                self.open.push(tag.name.clone());
            }
            Token::End(name) => match self.open.last() {
                Some(expected) if expected == name => {
                    self.open.pop();
                }
                Some(expected) => {
                    return Err(Error::MismatchedEndTag {
                        expected: expected.clone(),
                        found: name.clone(),
                    });
                }
                None => return Err(Error::malformed(format!("unmatched end tag </{name}>"))),
            },
            Token::Eof => {
                if let Some(open) = self.open.last() {
                    return Err(Error::UnexpectedEndOfInput { open: open.clone() });
                }
            }
            Token::Text(_) => {}
        }
        Ok(token)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::XmlCursor;

    fn walker(xml: &str) -> Walker<XmlCursor<&[u8]>> {
        Walker::new(XmlCursor::from_text(xml))
    }

    fn child_names(xml: &str) -> Vec<String> {
        let mut w = walker(xml);
        let root = w.root().unwrap();
        let mut names = Vec::new();
        while let Some(child) = w.next_child(&root).unwrap() {
            names.push(child.tag.name.clone());
        }
        names
    }

    #[test]
    fn test_immediate_children_only() {
        let names = child_names("<r><a><x><y/></x></a><b/>text<c>t</c></r>");
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_text_captured_with_start_tag() {
        let mut w = walker("<r><init_from> tex.png </init_from><ref>a<i/>b</ref></r>");
        let root = w.root().unwrap();

        let first = w.next_child(&root).unwrap().unwrap();
        assert_eq!(first.text, "tex.png");

        let second = w.next_child(&root).unwrap().unwrap();
        assert_eq!(second.text, "a");
        assert!(w.next_child(&root).unwrap().is_none());
    }

    #[test]
    fn test_skip_counts_nested() {
        let mut w = walker("<r><u><a><b/></a><c/></u><k/></r>");
        let root = w.root().unwrap();
        let unknown = w.next_child(&root).unwrap().unwrap();
        assert_eq!(w.skip(&unknown).unwrap(), 3);
        assert_eq!(w.skip(&unknown).unwrap(), 0);
        assert_eq!(w.next_child(&root).unwrap().unwrap().tag.name, "k");
        assert!(w.next_child(&root).unwrap().is_none());
    }

    #[test]
    fn test_no_more_children_after_close() {
        let mut w = walker("<r><a/></r>");
        let root = w.root().unwrap();
        assert!(w.next_child(&root).unwrap().is_some());
        assert!(w.next_child(&root).unwrap().is_none());
        assert!(w.next_child(&root).unwrap().is_none());
        assert_eq!(w.depth(), 0);
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let mut w = walker("<r><a><b></b>");
        let root = w.root().unwrap();
        let err = loop {
            match w.next_child(&root) {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("container reported closed"),
                Err(e) => break e,
            }
        };
        assert!(matches!(err, Error::UnexpectedEndOfInput { ref open } if open == "a"));
        assert_eq!(w.path(), "r/a");
    }

    #[test]
    fn test_mismatched_end_tag() {
        let mut w = walker("<r><a><b></a></b></r>");
        let root = w.root().unwrap();
        let a = w.next_child(&root).unwrap().unwrap();
        let _b = w.next_child(&a).unwrap().unwrap();
        let err = w.next_child(&root).unwrap_err();
        assert!(matches!(
            err,
            Error::MismatchedEndTag { ref expected, ref found } if expected == "b" && found == "a"
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut w = walker("<r><a><b><c/></b></a></r>").with_max_depth(3);
        let root = w.root().unwrap();
        let err = w.next_child(&root).and_then(|_| w.next_child(&root)).unwrap_err();
        assert!(matches!(err, Error::DepthLimitExceeded { limit: 3 }));
    }

    #[test]
    fn test_cancellation() {
        let token = CancelToken::new();
        let mut w = walker("<r><a/><b/></r>").with_cancel(token.clone());
        let root = w.root().unwrap();
        assert!(w.next_child(&root).unwrap().is_some());
        token.cancel();
        assert!(matches!(w.next_child(&root), Err(Error::Cancelled)));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(walker("").root(), Err(Error::MalformedInput(_))));
        assert!(matches!(walker("<?xml version=\"1.0\"?>").root(), Err(Error::MalformedInput(_))));
    }
}
