//! Token cursor over a JSON document.
//!
//! JSON-based siblings of the XML format map onto the same tokens, with the
//! object key playing the role of the tag name:
//!
//! ```text
//! { "COLLADA": {                         <COLLADA version="1.4.1">
//!     "@version": "1.4.1",                 <library_images>
//!     "library_images": {                    <image id="a"><init_from>a.png</init_from></image>
//!       "image": [                           <image id="b"/>
//!         { "@id": "a", "init_from": "a.png" },
//!         { "@id": "b" } ] } } }           </library_images></COLLADA>
//! ```
//!
//! - `@name` members become attributes
//! - `#text` becomes character data (arrays of scalars are space-joined)
//! - arrays expand into repeated sibling elements
//! - scalar members become elements holding only text, `null` an empty element

use std::collections::VecDeque;

use serde_json::{Map, Value};

use super::{Attributes, StartTag, Token, TokenSource};
use crate::util::{Error, Result};

const TEXT_KEY: &str = "#text";

struct Frame {
    /// `None` for the document frame, which has no end tag.
    name: Option<String>,
    members: std::vec::IntoIter<(String, Value)>,
}

/// Token cursor over an in-memory `serde_json::Value`.
pub struct JsonCursor {
    stack: Vec<Frame>,
    queued: VecDeque<Token>,
    emitted: u64,
}

impl JsonCursor {
    /// Create a cursor over a parsed JSON document (must be an object).
    pub fn new(document: Value) -> Result<Self> {
        let Value::Object(map) = document else {
            return Err(Error::malformed("JSON document must be an object"));
        };
        let (attributes, text, members) = expand(map)?;
        if !attributes.is_empty() || text.is_some() {
            return Err(Error::malformed("JSON document root cannot carry attributes or text"));
        }
        Ok(Self {
            stack: vec![Frame {
                name: None,
                members: members.into_iter(),
            }],
            queued: VecDeque::new(),
            emitted: 0,
        })
    }

    /// Parse JSON text and create a cursor over it.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(serde_json::from_str(text)?)
    }

    fn advance(&mut self) -> Result<Token> {
        if let Some(token) = self.queued.pop_front() {
            return Ok(token);
        }
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(Token::Eof);
            };
            match frame.members.next() {
                Some((key, Value::Object(map))) => {
                    let (attributes, text, members) = expand(map)?;
                    if let Some(text) = text {
                        self.queued.push_back(Token::Text(text));
                    }
                    self.stack.push(Frame {
                        name: Some(key.clone()),
                        members: members.into_iter(),
                    });
                    return Ok(Token::Start(StartTag { name: key, attributes }));
                }
                Some((key, Value::Null)) => {
                    self.queued.push_back(Token::End(key.clone()));
                    return Ok(Token::Start(StartTag::new(key)));
                }
                Some((key, Value::Array(_))) => {
                    return Err(Error::malformed(format!("nested array under '{key}'")));
                }
                Some((key, scalar)) => {
                    self.queued.push_back(Token::Text(scalar_text(&key, &scalar)?));
                    self.queued.push_back(Token::End(key.clone()));
                    return Ok(Token::Start(StartTag::new(key)));
                }
                None => {
                    let finished = self.stack.pop().and_then(|f| f.name);
                    if let Some(name) = finished {
                        return Ok(Token::End(name));
                    }
                }
            }
        }
    }
}

impl TokenSource for JsonCursor {
    fn next_token(&mut self) -> Result<Token> {
        let token = self.advance()?;
        if token != Token::Eof {
            self.emitted += 1;
        }
        Ok(token)
    }

    fn position(&self) -> u64 {
        self.emitted
    }
}

/// Split an object into attributes, text and child members.
fn expand(map: Map<String, Value>) -> Result<(Attributes, Option<String>, Vec<(String, Value)>)> {
    let mut attributes = Attributes::new();
    let mut text = None;
    let mut members = Vec::new();

    for (key, value) in map {
        if let Some(attr) = key.strip_prefix('@') {
            attributes.set(attr, scalar_text(&key, &value)?);
        } else if key == TEXT_KEY {
            text = Some(match value {
                Value::Array(items) => items
                    .iter()
                    .map(|v| scalar_text(&key, v))
                    .collect::<Result<Vec<_>>>()?
                    .join(" "),
                other => scalar_text(&key, &other)?,
            });
        } else if let Value::Array(items) = value {
            members.extend(items.into_iter().map(|item| (key.clone(), item)));
        } else {
            members.push((key, value));
        }
    }
    Ok((attributes, text, members))
}

fn scalar_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(Error::malformed(format!("'{key}' must be a scalar"))),
    }
}
