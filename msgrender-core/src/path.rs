//! Property paths: locate a value inside a JSON record.
//!
//! # Syntax
//!
//! ```text
//! user.name          member "name" of member "user"
//! [object].property  bracketed head, then a dotted member
//! orders[0].id       array element 0, then member "id"
//! a[b][c]            brackets chain without dots
//! ```
//!
//! Brackets and dotted names are interchangeable on lookup: both address an
//! object member, and both address an array element when the key is a
//! non-negative integer.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::char,
    combinator::map,
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};
use serde_json::Value;

use crate::error::PathError;

/// A parsed property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parse `raw` into a path. Fails only on syntax errors.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(malformed(raw, "path is empty"));
        }
        match path(raw) {
            Ok(("", segments)) => Ok(Self {
                raw: raw.to_owned(),
                segments,
            }),
            Ok((rest, _)) => Err(malformed(
                raw,
                format!(
                    "unexpected input at offset {}: '{}'",
                    raw.len() - rest.len(),
                    rest
                ),
            )),
            Err(e) => Err(malformed(raw, e.to_string())),
        }
    }

    /// The path segments in traversal order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk `data` along the path.
    ///
    /// Returns `None` when a segment does not exist or when an intermediate
    /// value is a scalar that cannot be traversed further.
    pub fn evaluate<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(data, |node, key| step(node, key))
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.raw.fmt(f)
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn step<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn malformed(raw: &str, reason: impl Into<String>) -> PathError {
    PathError::Malformed {
        path: raw.to_owned(),
        reason: reason.into(),
    }
}

// --- Combinators ---

fn name(input: &str) -> IResult<&str, String> {
    map(
        take_while1(|c: char| !matches!(c, '.' | '[' | ']') && !c.is_whitespace()),
        String::from,
    )
    .parse(input)
}

fn bracket(input: &str) -> IResult<&str, String> {
    map(delimited(char('['), is_not("[]"), char(']')), String::from).parse(input)
}

fn segment(input: &str) -> IResult<&str, String> {
    alt((preceded(char('.'), name), bracket)).parse(input)
}

fn path(input: &str) -> IResult<&str, Vec<String>> {
    map((alt((name, bracket)), many0(segment)), |(head, mut rest)| {
        let mut segments = Vec::with_capacity(rest.len() + 1);
        segments.push(head);
        segments.append(&mut rest);
        segments
    })
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("user", &["user"])]
    #[case("user.name", &["user", "name"])]
    #[case("[object].property", &["object", "property"])]
    #[case("orders[0].id", &["orders", "0", "id"])]
    #[case("a[b][c]", &["a", "b", "c"])]
    #[case("[first name]", &["first name"])]
    fn parses_valid_paths(#[case] raw: &str, #[case] expected: &[&str]) {
        let path = PropertyPath::parse(raw).expect("valid path");
        assert_eq!(path.segments(), expected);
        assert_eq!(path.to_string(), raw);
    }

    #[rstest]
    #[case("")]
    #[case(".user")]
    #[case("user.")]
    #[case("user..name")]
    #[case("user[]")]
    #[case("user[0")]
    #[case("user]")]
    #[case("user name")]
    fn rejects_malformed_paths(#[case] raw: &str) {
        let err = PropertyPath::parse(raw).unwrap_err();
        assert!(matches!(err, PathError::Malformed { .. }), "got: {err}");
    }

    #[test]
    fn evaluates_nested_members_and_indices() {
        let data = json!({ "orders": [{ "id": "A" }, { "id": "B" }] });
        let path: PropertyPath = "orders[1].id".parse().unwrap();
        assert_eq!(path.evaluate(&data), Some(&json!("B")));
    }

    #[test]
    fn missing_member_is_absent() {
        let data = json!({ "user": {} });
        let path = PropertyPath::parse("user.name").unwrap();
        assert_eq!(path.evaluate(&data), None);
    }

    #[test]
    fn traversal_through_scalar_is_absent() {
        let data = json!({ "user": "Ann" });
        let path = PropertyPath::parse("user.name.first").unwrap();
        assert_eq!(path.evaluate(&data), None);
    }

    #[test]
    fn non_numeric_key_on_array_is_absent() {
        let data = json!({ "items": [1, 2] });
        let path = PropertyPath::parse("items.first").unwrap();
        assert_eq!(path.evaluate(&data), None);
    }

    #[test]
    fn out_of_range_index_is_absent() {
        let data = json!([1, 2]);
        let path = PropertyPath::parse("[5]").unwrap();
        assert_eq!(path.evaluate(&data), None);
    }
}
