//! Line templates for `expire next`.

use std::path::Path;

use anyhow::bail;
use chrono::{DateTime, Utc};
use expire_types::{format_duration, format_timestamp, ExpirationRecord};

pub const DEFAULT_TEMPLATE: &str = "{contextual} - {relative}";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Target,
    Contextual,
    Expires,
    Relative,
    Duration,
    Reset,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "target" => Field::Target,
            "contextual" => Field::Contextual,
            "expires" => Field::Expires,
            "relative" => Field::Relative,
            "duration" => Field::Duration,
            "reset" => Field::Reset,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed template. `{name}` is a field, `{{` and `}}` are literal braces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> anyhow::Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => bail!("unterminated '{{' in template {source:?}"),
                        }
                    }
                    let Some(field) = Field::from_name(name.trim()) else {
                        bail!("unknown template field {{{name}}} in {source:?}");
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => bail!("unmatched '}}' in template {source:?}"),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, record: &ExpirationRecord, cwd: &Path, now: DateTime<Utc>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::Target) => out.push_str(&record.target),
                Segment::Field(Field::Contextual) => out.push_str(&record.target_contextual(cwd)),
                Segment::Field(Field::Expires) => out.push_str(&format_timestamp(&record.expires)),
                Segment::Field(Field::Relative) => {
                    out.push_str(&record.expiration_relative(now))
                }
                Segment::Field(Field::Duration) => out.push_str(&format_duration(record.duration)),
                Segment::Field(Field::Reset) => {
                    out.push_str(if record.reset_on_touch { "yes" } else { "no" })
                }
            }
        }
        out
    }
}
