//! Attribute list parsing for embed directives.
//!
//! Parses the inside of a tag like `<Embed filePath="a.py" language="python" />`
//! into ordered key/value pairs. Accepted value forms:
//! `key="value"` (with backslash escapes), `key='value'`, `key={expr}`,
//! `key=value`, and a bare `key` meaning `true`.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_till, take_while1},
    character::complete::{char, multispace0, none_of},
    combinator::{map, opt, value},
    multi::many0,
    sequence::{delimited, preceded},
};

/// Check if a character is valid in an attribute name.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == ':' || c == '.'
}

/// Check if a character can appear in an unquoted value.
fn is_bare_value_char(c: char) -> bool {
    !c.is_whitespace() && c != '/' && c != '>' && c != '"' && c != '\''
}

fn parse_name(input: &str) -> IResult<&str, &str> {
    take_while1(is_name_char).parse(input)
}

/// Parse a double-quoted value with escape handling.
fn parse_double_quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        map(
            opt(escaped_transform(
                none_of("\\\""),
                '\\',
                alt((
                    value("\\", tag("\\")),
                    value("\"", tag("\"")),
                    value("\n", tag("n")),
                    value("\t", tag("t")),
                )),
            )),
            Option::unwrap_or_default,
        ),
        char('"'),
    )
    .parse(input)
}

fn parse_single_quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('\''), take_till(|c| c == '\''), char('\'')),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

/// Parse a JSX expression value such as `{false}` or `{"a.py"}`.
fn parse_expression(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('{'), take_till(|c| c == '}'), char('}')),
        |s: &str| strip_quotes(s.trim()).to_string(),
    )
    .parse(input)
}

fn parse_bare_value(input: &str) -> IResult<&str, String> {
    map(take_while1(is_bare_value_char), |s: &str| s.to_string()).parse(input)
}

fn parse_value(input: &str) -> IResult<&str, String> {
    alt((
        parse_double_quoted,
        parse_single_quoted,
        parse_expression,
        parse_bare_value,
    ))
    .parse(input)
}

/// Parse `key=value` or a bare `key`.
fn parse_attribute(input: &str) -> IResult<&str, (String, String)> {
    map(
        (
            parse_name,
            opt(preceded((multispace0, char('='), multispace0), parse_value)),
        ),
        |(key, val)| (key.to_string(), val.unwrap_or_else(|| "true".to_string())),
    )
    .parse(input)
}

fn parse_attributes_inner(input: &str) -> IResult<&str, Vec<(String, String)>> {
    many0(delimited(multispace0, parse_attribute, multispace0)).parse(input)
}

/// Strip matching outer quotes.
fn strip_quotes(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Parsed attribute list with convenient accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// All attributes in source order.
    pub items: Vec<(String, String)>,
}

impl Attributes {
    /// Parses an attribute list.
    pub fn parse(input: &str) -> Result<Self, String> {
        match parse_attributes_inner(input) {
            Ok((remaining, items)) if remaining.trim().is_empty() => Ok(Self { items }),
            Ok((remaining, _)) => Err(format!("Unexpected input: '{}'", remaining.trim())),
            Err(e) => Err(format!("Parse error: {}", e)),
        }
    }

    /// Gets an attribute value by key. The first occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Gets an attribute as a boolean, treating `false`, `0`, `no` and `off`
    /// as false and anything else as true.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).map(|v| {
            !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            )
        })
    }

    /// Returns true if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
