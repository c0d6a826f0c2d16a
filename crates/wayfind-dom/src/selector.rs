//! CSS selector subset
//!
//! Supports type, `#id`, `.class`, `[attr]`, `[attr="v"]`, `[attr*="v"]`,
//! `[attr^="v"]`, `:not(<compound>)`, the descendant combinator and
//! comma-separated selector lists. That covers every target the tour,
//! tab list and tooltip bindings address.

use std::fmt;
use std::str::FromStr;

use crate::{Dom, DomError, NodeId};

/// Parsed selector list
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

/// Compounds joined by descendant combinators, outermost first
#[derive(Debug, Clone, PartialEq)]
struct Complex {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
    negations: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, PartialEq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
}

impl Selector {
    /// Parse a selector list
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let mut parser = Parser::new(source);
        let alternatives = parser.parse_list()?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// Original selector text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `node` matches any alternative
    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(dom, node))
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl Complex {
    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        let Some((last, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(dom, node) {
            return false;
        }

        // Descendant-only chains: nearest matching ancestor is always safe
        let mut current = node;
        for compound in ancestors.iter().rev() {
            loop {
                match dom.parent(current) {
                    Some(parent) => {
                        current = parent;
                        if compound.matches(dom, current) {
                            break;
                        }
                    }
                    None => return false,
                }
            }
        }
        true
    }
}

impl Compound {
    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        let Some(tag) = dom.tag_name(node) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if expected != tag {
                return false;
            }
        }
        if self.ids.iter().any(|id| dom.attr(node, "id") != Some(id.as_str())) {
            return false;
        }
        if self.classes.iter().any(|c| !dom.has_class(node, c)) {
            return false;
        }
        if !self.attrs.iter().all(|a| a.matches(dom.attr(node, &a.name))) {
            return false;
        }
        !self.negations.iter().any(|n| n.matches(dom, node))
    }
}

impl AttrMatch {
    fn matches(&self, value: Option<&str>) -> bool {
        match (&self.op, value) {
            (_, None) => false,
            (AttrOp::Exists, Some(_)) => true,
            (AttrOp::Equals(expected), Some(v)) => v == expected,
            (AttrOp::Contains(needle), Some(v)) => !needle.is_empty() && v.contains(needle.as_str()),
            (AttrOp::Prefix(prefix), Some(v)) => !prefix.is_empty() && v.starts_with(prefix.as_str()),
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::InvalidSelector {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), DomError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}` at {}", c, self.pos)))
        }
    }

    /// Skip whitespace, reporting whether any was skipped
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn parse_list(&mut self) -> Result<Vec<Complex>, DomError> {
        let mut list = Vec::new();
        loop {
            self.skip_ws();
            list.push(self.parse_complex()?);
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            if self.peek().is_none() {
                return Ok(list);
            }
            return Err(self.error(format!("unexpected `{}`", self.peek().unwrap_or(' '))));
        }
    }

    fn parse_complex(&mut self) -> Result<Complex, DomError> {
        let mut compounds = vec![self.parse_compound()?];
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') | Some('+') | Some('~') => {
                    return Err(self.error("only the descendant combinator is supported"));
                }
                Some(_) if had_ws => compounds.push(self.parse_compound()?),
                Some(c) => return Err(self.error(format!("unexpected `{}`", c))),
            }
        }
        Ok(Complex { compounds })
    }

    fn parse_compound(&mut self) -> Result<Compound, DomError> {
        let mut compound = Compound::default();
        let mut any = false;

        if self.eat('*') {
            any = true;
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
            any = true;
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attr()?);
                }
                Some(':') => {
                    self.pos += 1;
                    let name = self.ident()?;
                    if name != "not" {
                        return Err(self.error(format!("unsupported pseudo-class `:{}`", name)));
                    }
                    self.expect('(')?;
                    self.skip_ws();
                    let inner = self.parse_compound()?;
                    self.skip_ws();
                    self.expect(')')?;
                    compound.negations.push(inner);
                }
                _ => break,
            }
            any = true;
        }

        if any {
            Ok(compound)
        } else {
            Err(self.error(format!("expected a selector at {}", self.pos)))
        }
    }

    fn attr(&mut self) -> Result<AttrMatch, DomError> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();
        if self.eat(']') {
            return Ok(AttrMatch { name, op: AttrOp::Exists });
        }

        let op = match self.peek() {
            Some('=') => {
                self.pos += 1;
                0
            }
            Some('*') => {
                self.pos += 1;
                self.expect('=')?;
                1
            }
            Some('^') => {
                self.pos += 1;
                self.expect('=')?;
                2
            }
            _ => return Err(self.error("unsupported attribute operator")),
        };
        self.skip_ws();
        let value = self.value()?;
        self.skip_ws();
        self.expect(']')?;

        let op = match op {
            0 => AttrOp::Equals(value),
            1 => AttrOp::Contains(value),
            _ => AttrOp::Prefix(value),
        };
        Ok(AttrMatch { name, op })
    }

    fn value(&mut self) -> Result<String, DomError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == quote {
                        let value: String = self.chars[start..self.pos].iter().collect();
                        self.pos += 1;
                        return Ok(value);
                    }
                    self.pos += 1;
                }
                Err(self.error("unterminated string"))
            }
            _ => self.ident(),
        }
    }

    fn ident(&mut self) -> Result<String, DomError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error(format!("expected an identifier at {}", start)));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
