//! Structural model of a DynamoDB update expression
//!
//! An update expression is a sequence of clauses (`SET`, `REMOVE`, `ADD`,
//! `DELETE`), each followed by a comma separated list of actions. Keywords
//! are only recognised at parenthesis depth 0 and at word boundaries, so
//! function arguments and placeholders (`#set`, `:add`) are never mistaken
//! for a clause.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Kind of an update clause
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseKind {
    /// `SET path = value, ...`
    Set,
    /// `REMOVE path, ...`
    Remove,
    /// `ADD path value, ...`
    Add,
    /// `DELETE path value, ...`
    Delete,
}

impl ClauseKind {
    fn keyword(self) -> &'static str {
        match self {
            ClauseKind::Set => "SET",
            ClauseKind::Remove => "REMOVE",
            ClauseKind::Add => "ADD",
            ClauseKind::Delete => "DELETE",
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        [
            ClauseKind::Set,
            ClauseKind::Remove,
            ClauseKind::Add,
            ClauseKind::Delete,
        ]
        .into_iter()
        .find(|kind| kind.keyword().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One clause of an update expression
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    /// Clause keyword
    pub kind: ClauseKind,
    /// Action list, verbatim and trimmed
    pub body: String,
}

/// A parsed update expression
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateExpression {
    clauses: Vec<Clause>,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_token_char(c: char) -> bool {
    is_word_char(c) || c == '#' || c == ':' || c == '.'
}

/// Split `text` at top-level commas
fn split_actions(text: &str) -> Vec<&str> {
    let mut actions = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in text.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                actions.push(text[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    actions.push(text[start..].trim());
    actions
}

impl UpdateExpression {
    /// Parse an update expression into clauses
    ///
    /// An empty (or blank) expression yields no clauses.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut keywords: Vec<(usize, usize, ClauseKind)> = Vec::new();
        let mut depth = 0usize;
        let mut prev: Option<char> = None;
        let mut chars = text.char_indices().peekable();

        while let Some((index, c)) = chars.next() {
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                _ => {}
            }

            let at_boundary = prev.is_none_or(|p| !is_token_char(p));
            if depth == 0 && at_boundary && c.is_ascii_alphabetic() {
                let mut end = index + c.len_utf8();
                let mut last = c;
                while let Some(&(next_index, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    end = next_index + next.len_utf8();
                    last = next;
                    let _ = chars.next();
                }

                let followed_by_token = text[end..].chars().next().is_some_and(is_token_char);
                if !followed_by_token {
                    if let Some(kind) = ClauseKind::from_word(&text[index..end]) {
                        keywords.push((index, end, kind));
                    }
                }
                prev = Some(last);
                continue;
            }

            prev = Some(c);
        }

        let leading = match keywords.first() {
            Some(&(start, _, _)) => &text[..start],
            None => text,
        };
        if !leading.trim().is_empty() {
            return Err(Error::InvalidUpdateExpression(format!(
                "`{}` does not start with SET, REMOVE, ADD or DELETE",
                text.trim()
            )));
        }

        let mut clauses = Vec::with_capacity(keywords.len());
        for (position, &(_, end, kind)) in keywords.iter().enumerate() {
            let body_end = keywords
                .get(position + 1)
                .map(|&(start, _, _)| start)
                .unwrap_or(text.len());
            let body = text[end..body_end].trim();

            if body.is_empty() {
                return Err(Error::InvalidUpdateExpression(format!(
                    "{kind} clause without actions in `{}`",
                    text.trim()
                )));
            }

            clauses.push(Clause {
                kind,
                body: body.to_string(),
            });
        }

        Ok(Self { clauses })
    }

    /// The clauses in source order
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether any SET action assigns `attribute`
    ///
    /// The target may be written bare or through a name placeholder bound
    /// in `names`.
    pub fn assigns(&self, attribute: &str, names: &HashMap<String, String>) -> bool {
        self.clauses
            .iter()
            .filter(|clause| clause.kind == ClauseKind::Set)
            .flat_map(|clause| split_actions(&clause.body))
            .filter_map(|action| action.split_once('=').map(|(target, _)| target.trim()))
            .any(|target| {
                target == attribute || names.get(target).is_some_and(|name| name == attribute)
            })
    }

    /// Whether `placeholder` (`#name` or `:value`) appears in any clause
    pub fn references(&self, placeholder: &str) -> bool {
        self.clauses.iter().any(|clause| {
            clause
                .body
                .split(|c: char| !(is_word_char(c) || c == '#' || c == ':'))
                .any(|token| token == placeholder)
        })
    }

    /// Add a `path = value` action to the SET clause
    ///
    /// Appends to the first SET clause, or prepends a new one when the
    /// expression has none. Other clauses are left untouched.
    pub fn push_set(&mut self, action: &str) {
        match self
            .clauses
            .iter_mut()
            .find(|clause| clause.kind == ClauseKind::Set)
        {
            Some(clause) => clause.body = format!("{}, {}", clause.body, action),
            None => self.clauses.insert(
                0,
                Clause {
                    kind: ClauseKind::Set,
                    body: action.to_string(),
                },
            ),
        }
    }
}

impl FromStr for UpdateExpression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UpdateExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, clause) in self.clauses.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{} {}", clause.kind, clause.body)?;
        }
        Ok(())
    }
}
