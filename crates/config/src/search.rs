//! Recursive key lookup over the configuration tree.
//!
//! [`find_all`] walks records depth-first in document order and yields every
//! value stored under `key`: a whole record when its class tag is `key`, or an
//! attribute value when an object's attributes contain `key`. A matching
//! record is yielded as-is and not descended into; its siblings are still
//! searched. Attributes of an object are inspected before its children.
//!
//! The walk is lazy and allocation-light (one explicit stack); it terminates
//! on any tree because the decoded model cannot contain cycles.

use serde_json::Value;

use crate::model::{ManagedObject, Record};

/// A value found by [`find_all`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Match<'a> {
    /// A record whose class tag equals the key
    Object(&'a Record),
    /// An attribute value stored under the key
    Attribute(&'a Value),
}

impl<'a> Match<'a> {
    /// The matched value as a string, for string attributes.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Match::Attribute(value) => value.as_str(),
            Match::Object(_) => None,
        }
    }
}

enum Frame<'a> {
    Records(std::slice::Iter<'a, Record>),
    Object(&'a ManagedObject),
}

/// Lazy pre-order search iterator. See the module docs.
pub struct FindAll<'a> {
    key: &'a str,
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for FindAll<'a> {
    type Item = Match<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            match frame {
                Frame::Records(iter) => match iter.next() {
                    Some(record) if record.class.as_str() == self.key => {
                        return Some(Match::Object(record));
                    }
                    Some(record) => self.stack.push(Frame::Object(&record.object)),
                    None => {
                        self.stack.pop();
                    }
                },
                Frame::Object(object) => {
                    let object = *object;
                    self.stack.pop();
                    self.stack.push(Frame::Records(object.children.iter()));
                    if let Some(value) = object.attributes.get(self.key) {
                        return Some(Match::Attribute(value));
                    }
                }
            }
        }
    }
}

/// Search a sequence of records.
pub fn find_all<'a>(key: &'a str, records: &'a [Record]) -> FindAll<'a> {
    FindAll {
        key,
        stack: vec![Frame::Records(records.iter())],
    }
}

/// Search a sequence of object bodies (records already unwrapped from their tag).
pub fn find_all_in<'a, I>(key: &'a str, objects: I) -> FindAll<'a>
where
    I: IntoIterator<Item = &'a ManagedObject>,
{
    let mut stack: Vec<Frame<'a>> = objects.into_iter().map(Frame::Object).collect();
    stack.reverse();
    FindAll { key, stack }
}
