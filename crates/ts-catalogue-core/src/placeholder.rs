//! Positional `%N` placeholders.
//!
//! `%1` through `%99` refer to render arguments. `%n` is the plural count and
//! is only substituted when a count is supplied. Anything else following a
//! `%` is literal text.

use std::collections::BTreeSet;
use std::fmt::Display;
use thiserror::Error;

/// A piece of a message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    /// One-based argument index.
    Arg(usize),
    Count,
}

/// Splits a template into literal text and placeholder tokens.
pub fn segments(template: &str) -> Segments<'_> {
    Segments { rest: template }
}

pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let mut searched = 0;
        while let Some(offset) = self.rest[searched..].find('%') {
            let percent = searched + offset;
            if let Some((token, len)) = token_at(&self.rest.as_bytes()[percent + 1..]) {
                if percent > 0 {
                    let (literal, rest) = self.rest.split_at(percent);
                    self.rest = rest;
                    return Some(Segment::Literal(literal));
                }
                self.rest = &self.rest[1 + len..];
                return Some(token);
            }
            searched = percent + 1;
        }

        let literal = self.rest;
        self.rest = "";
        Some(Segment::Literal(literal))
    }
}

fn token_at(after: &[u8]) -> Option<(Segment<'static>, usize)> {
    match after {
        [b'n', ..] => Some((Segment::Count, 1)),
        [tens @ b'1'..=b'9', units @ b'0'..=b'9', ..] => Some((
            Segment::Arg(usize::from(*tens - b'0') * 10 + usize::from(*units - b'0')),
            2,
        )),
        [digit @ b'1'..=b'9', ..] => Some((Segment::Arg(usize::from(*digit - b'0')), 1)),
        _ => None,
    }
}

/// The set of argument indices a template refers to.
pub fn placeholders(template: &str) -> BTreeSet<usize> {
    segments(template)
        .filter_map(|segment| match segment {
            Segment::Arg(index) => Some(index),
            _ => None,
        })
        .collect()
}

/// A placeholder that had no matching argument at render time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("placeholder %{placeholder} has no argument ({supplied} supplied)")]
pub struct PlaceholderMismatch {
    pub placeholder: usize,
    pub supplied: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub mismatches: Vec<PlaceholderMismatch>,
}

/// Substitutes `args` into `template`.
///
/// Out-of-range placeholders render as empty text and are reported in
/// [`Rendered::mismatches`], once per placeholder.
pub fn render(template: &str, args: &[&dyn Display], count: Option<i64>) -> Rendered {
    let mut rendered = Rendered {
        text: String::with_capacity(template.len()),
        mismatches: Vec::new(),
    };

    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => rendered.text.push_str(text),
            Segment::Arg(index) => match args.get(index - 1) {
                Some(arg) => rendered.text.push_str(&arg.to_string()),
                None => {
                    if !rendered
                        .mismatches
                        .iter()
                        .any(|mismatch| mismatch.placeholder == index)
                    {
                        rendered.mismatches.push(PlaceholderMismatch {
                            placeholder: index,
                            supplied: args.len(),
                        });
                    }
                },
            },
            Segment::Count => match count {
                Some(n) => rendered.text.push_str(&n.to_string()),
                None => rendered.text.push_str("%n"),
            },
        }
    }

    rendered
}

/// [`render`], logging every mismatch instead of returning it.
pub fn render_logged(template: &str, args: &[&dyn Display], count: Option<i64>) -> String {
    let rendered = render(template, args, count);
    for mismatch in &rendered.mismatches {
        tracing::warn!("Rendering '{}': {}", template, mismatch);
    }
    rendered.text
}
