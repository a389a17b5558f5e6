//! Output formatting modes for regex extraction.
//!
//! A regex query captures a list of matches with find-all semantics; the
//! query's mode then reshapes that list into a typed [`Value`].

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::error::FormatError;

/// One find-all match.
///
/// Patterns with zero or one group yield [`Capture::Text`] (the whole
/// match or the group); patterns with several groups yield
/// [`Capture::Groups`]. A text capture behaves as a one-element tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Capture {
    Text(String),
    Groups(Vec<String>),
}

impl Capture {
    /// Get the element at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            Capture::Text(text) => (index == 0).then_some(text.as_str()),
            Capture::Groups(groups) => groups.get(index).map(String::as_str),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Capture::Text(_) => 1,
            Capture::Groups(groups) => groups.len(),
        }
    }

    /// Check if the capture has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All elements as owned strings.
    pub fn to_groups(&self) -> Vec<String> {
        match self {
            Capture::Text(text) => vec![text.clone()],
            Capture::Groups(groups) => groups.clone(),
        }
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capture::Text(text) => f.write_str(text),
            Capture::Groups(groups) => f.write_str(&groups.join(" ")),
        }
    }
}

impl From<&str> for Capture {
    fn from(text: &str) -> Self {
        Capture::Text(text.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for Capture {
    fn from(groups: [&str; N]) -> Self {
        Capture::Groups(groups.iter().map(|g| g.to_string()).collect())
    }
}

/// Run `pattern` over `text` and collect every non-overlapping match.
pub fn find_all(pattern: &Regex, text: &str) -> Vec<Capture> {
    match pattern.captures_len() - 1 {
        0 => pattern
            .find_iter(text)
            .map(|m| Capture::Text(m.as_str().to_string()))
            .collect(),
        1 => pattern
            .captures_iter(text)
            .map(|caps| Capture::Text(caps.get(1).map_or("", |m| m.as_str()).to_string()))
            .collect(),
        _ => pattern
            .captures_iter(text)
            .map(|caps| {
                Capture::Groups(
                    caps.iter()
                        .skip(1)
                        .map(|m| m.map_or("", |m| m.as_str()).to_string())
                        .collect(),
                )
            })
            .collect(),
    }
}

/// Value produced by a format mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// No output or no capture.
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Capture>),
    Tuple(Vec<String>),
    Dict(IndexMap<String, String>),
    /// Forward and reversed mappings.
    DictPair(IndexMap<String, String>, IndexMap<String, String>),
}

impl Value {
    /// Truthiness used by capability checks: empty values are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(list) => !list.is_empty(),
            Value::Tuple(tuple) => !tuple.is_empty(),
            Value::Dict(map) => !map.is_empty(),
            Value::DictPair(..) => true,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Capture]> {
        match self {
            Value::List(list) => Some(list.as_slice()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&IndexMap<String, String>> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }
}

/// Format modes of the regex query notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Bool,
    Str,
    StrLower,
    StrUpper,
    StrJoin,
    StrNewlineJoin,
    Int,
    List,
    ListReverse,
    ListDiagonal,
    Tuple,
    Dict,
    DictReverse,
    DictBoth,
    DictDiagonal,
    DictSequence,
}

impl FormatMode {
    /// Mode name as written in a query.
    pub fn name(&self) -> &'static str {
        match self {
            FormatMode::Bool => "bool",
            FormatMode::Str => "str",
            FormatMode::StrLower => "str-lower",
            FormatMode::StrUpper => "str-upper",
            FormatMode::StrJoin => "str-join",
            FormatMode::StrNewlineJoin => "str-nwlnjoin",
            FormatMode::Int => "int",
            FormatMode::List => "list",
            FormatMode::ListReverse => "list-reverse",
            FormatMode::ListDiagonal => "list-diagonal",
            FormatMode::Tuple => "tuple",
            FormatMode::Dict => "dict",
            FormatMode::DictReverse => "dict-reverse",
            FormatMode::DictBoth => "dict-both",
            FormatMode::DictDiagonal => "dict-diagonal",
            FormatMode::DictSequence => "dict-sequence",
        }
    }

    /// Parse an optional mode name; missing or empty means raw captures.
    pub fn parse_optional(mode: Option<&str>) -> Result<Option<Self>, FormatError> {
        match mode {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }

    /// Reshape captures according to this mode.
    pub fn apply(self, captures: Vec<Capture>) -> Result<Value, FormatError> {
        let value = match self {
            FormatMode::Bool => Value::Bool(!captures.is_empty()),
            FormatMode::Str => first_text(&captures).map_or(Value::None, Value::Str),
            FormatMode::StrLower => {
                first_text(&captures).map_or(Value::None, |s| Value::Str(s.to_lowercase()))
            }
            FormatMode::StrUpper => {
                first_text(&captures).map_or(Value::None, |s| Value::Str(s.to_uppercase()))
            }
            FormatMode::StrJoin => Value::Str(join(&captures, "")),
            FormatMode::StrNewlineJoin => Value::Str(join(&captures, "\n")),
            FormatMode::Int => match first_text(&captures) {
                None => Value::None,
                Some(text) => Value::Int(
                    text.trim()
                        .parse()
                        .map_err(|_| FormatError::InvalidInteger { value: text })?,
                ),
            },
            FormatMode::List => Value::List(captures),
            FormatMode::ListReverse => Value::List(captures.into_iter().rev().collect()),
            FormatMode::ListDiagonal => Value::List(
                captures
                    .iter()
                    .enumerate()
                    .map(|(i, capture)| self.element(capture, i, i).map(Capture::from))
                    .collect::<Result<_, _>>()?,
            ),
            FormatMode::Tuple => {
                Value::Tuple(captures.first().map(Capture::to_groups).unwrap_or_default())
            }
            FormatMode::Dict => Value::Dict(self.mapping(&captures, false)?),
            FormatMode::DictReverse => Value::Dict(self.mapping(&captures, true)?),
            FormatMode::DictBoth => {
                Value::DictPair(self.mapping(&captures, false)?, self.mapping(&captures, true)?)
            }
            FormatMode::DictDiagonal => {
                let mut map = IndexMap::new();
                for (i, capture) in captures.iter().enumerate() {
                    let key = self.element(capture, i, i * 2)?;
                    let value = self.element(capture, i, i * 2 + 1)?;
                    map.insert(key.to_string(), value.to_string());
                }
                Value::Dict(map)
            }
            FormatMode::DictSequence => {
                let mut map = IndexMap::new();
                for i in 0..captures.len() / 2 {
                    let key = self.element(&captures[i * 2], i * 2, 0)?;
                    let value = self.element(&captures[i * 2 + 1], i * 2 + 1, 1)?;
                    map.insert(key.to_string(), value.to_string());
                }
                Value::Dict(map)
            }
        };
        Ok(value)
    }

    fn element<'a>(
        &self,
        capture: &'a Capture,
        index: usize,
        element: usize,
    ) -> Result<&'a str, FormatError> {
        capture.get(element).ok_or_else(|| FormatError::CaptureShape {
            mode: self.name().to_string(),
            index,
            expected: element + 1,
        })
    }

    fn mapping(
        &self,
        captures: &[Capture],
        reversed: bool,
    ) -> Result<IndexMap<String, String>, FormatError> {
        let mut map = IndexMap::new();
        for (i, capture) in captures.iter().enumerate() {
            if capture.len() != 2 {
                return Err(FormatError::CaptureShape {
                    mode: self.name().to_string(),
                    index: i,
                    expected: 2,
                });
            }
            let (key, value) = (self.element(capture, i, 0)?, self.element(capture, i, 1)?);
            let (key, value) = if reversed { (value, key) } else { (key, value) };
            map.insert(key.to_string(), value.to_string());
        }
        Ok(map)
    }
}

impl FromStr for FormatMode {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s {
            "bool" => FormatMode::Bool,
            "str" => FormatMode::Str,
            "str-lower" => FormatMode::StrLower,
            "str-upper" => FormatMode::StrUpper,
            "str-join" => FormatMode::StrJoin,
            "str-nwlnjoin" => FormatMode::StrNewlineJoin,
            "int" => FormatMode::Int,
            "list" => FormatMode::List,
            "list-reverse" => FormatMode::ListReverse,
            "list-diagonal" => FormatMode::ListDiagonal,
            "tuple" => FormatMode::Tuple,
            "dict" => FormatMode::Dict,
            "dict-reverse" => FormatMode::DictReverse,
            "dict-both" => FormatMode::DictBoth,
            "dict-diagonal" => FormatMode::DictDiagonal,
            "dict-sequence" => FormatMode::DictSequence,
            other => {
                return Err(FormatError::InvalidMode {
                    mode: other.to_string(),
                });
            }
        };
        Ok(mode)
    }
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Format captures with an optional mode name.
pub fn format_captures(captures: Vec<Capture>, mode: Option<&str>) -> Result<Value, FormatError> {
    match FormatMode::parse_optional(mode)? {
        Some(mode) => mode.apply(captures),
        None => Ok(Value::List(captures)),
    }
}

fn first_text(captures: &[Capture]) -> Option<String> {
    captures.first().map(Capture::to_string)
}

fn join(captures: &[Capture], separator: &str) -> String {
    captures
        .iter()
        .map(Capture::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
