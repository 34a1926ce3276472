//! Directive mini-language embedded in handler doc comments.
//!
//! Each comment line is either a directive (case-sensitive keyword followed by
//! a colon) or free description text:
//!
//! ```text
//! response: Widget,ErrorBody
//! request: WidgetUpdate*, the fields to change
//! query: +*page{1;2;3},search
//! header: X-Request-Id
//! tag: widgets
//! Anything else becomes the operation description.
//! ```
//!
//! Parameter specs follow `[+][*]name[{enum;enum;...}]`: `+` marks a numeric
//! type, `*` marks required, and braces supply an enumerated value set. The
//! enum braces are stripped first, then `+`, then `*`.

use once_cell::sync::Lazy;
use regex::Regex;

static ENUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]*)\}").unwrap());

/// One decoded comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `response:` - registered schema names to document as responses.
    Response(Vec<String>),
    /// `request:` - the request body schema, required flag, and description.
    Request {
        schema: String,
        required: bool,
        description: Option<String>,
    },
    /// `query:` - query parameters.
    Query(Vec<ParamSpec>),
    /// `header:` - header parameters.
    Header(Vec<ParamSpec>),
    /// `tag:` - the operation's tag list (overwrites any previous value).
    Tag(Vec<String>),
    /// Any other non-empty line; joined into the operation description.
    Text(String),
}

/// A decoded query/header parameter spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub required: bool,
    pub numeric: bool,
    pub enum_values: Vec<String>,
}

/// Decodes a doc comment into directives, one per line. Empty lines are
/// dropped; unrecognized lines come back as [`Directive::Text`] in order.
pub fn parse_comment(comment: &str) -> Vec<Directive> {
    let mut directives = Vec::new();
    for line in comment.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("response:") {
            directives.push(Directive::Response(split_names(rest)));
        } else if let Some(rest) = line.strip_prefix("request:") {
            directives.push(parse_request(rest));
        } else if let Some(rest) = line.strip_prefix("query:") {
            directives.push(Directive::Query(parse_param_specs(rest)));
        } else if let Some(rest) = line.strip_prefix("header:") {
            directives.push(Directive::Header(parse_param_specs(rest)));
        } else if let Some(rest) = line.strip_prefix("tag:") {
            let tags = split_names(rest);
            if !tags.is_empty() {
                directives.push(Directive::Tag(tags));
            }
        } else {
            directives.push(Directive::Text(line.to_string()));
        }
    }
    directives
}

/// Decodes a comma-separated list of `[+][*]name[{enum;...}]` specs.
pub fn parse_param_specs(list: &str) -> Vec<ParamSpec> {
    let list: String = list.chars().filter(|c| !c.is_whitespace()).collect();
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(parse_param_spec)
        .collect()
}

fn parse_param_spec(spec: &str) -> ParamSpec {
    let mut spec = spec.to_string();
    let mut enum_values = Vec::new();
    if let Some(caps) = ENUM_RE.captures(&spec) {
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if !inner.is_empty() {
            enum_values = inner.split(';').map(str::to_string).collect();
        }
        let whole = caps.get(0).unwrap().as_str().to_string();
        spec = spec.replace(&whole, "");
    }
    let numeric = spec.contains('+');
    spec = spec.replace('+', "");
    let required = spec.contains('*');
    spec = spec.replace('*', "");
    ParamSpec {
        name: spec,
        required,
        numeric,
        enum_values,
    }
}

fn parse_request(rest: &str) -> Directive {
    let (name_part, description) = match rest.split_once(',') {
        Some((name, desc)) => {
            let desc = desc.trim();
            (
                name,
                if desc.is_empty() {
                    None
                } else {
                    Some(desc.to_string())
                },
            )
        }
        None => (rest, None),
    };
    let mut schema: String = name_part.chars().filter(|c| !c.is_whitespace()).collect();
    let required = schema.contains('*');
    if required {
        schema = schema.replace('*', "");
    }
    Directive::Request {
        schema,
        required,
        description,
    }
}

fn split_names(rest: &str) -> Vec<String> {
    let rest: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
    rest.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_directive_splits_names() {
        let directives = parse_comment("response: Widget, ErrorBody");
        assert_eq!(
            directives,
            vec![Directive::Response(vec![
                "Widget".to_string(),
                "ErrorBody".to_string()
            ])]
        );
    }

    #[test]
    fn test_request_directive_with_required_and_description() {
        let directives = parse_comment("request: WidgetUpdate*, the fields to change");
        assert_eq!(
            directives,
            vec![Directive::Request {
                schema: "WidgetUpdate".to_string(),
                required: true,
                description: Some("the fields to change".to_string()),
            }]
        );
    }

    #[test]
    fn test_request_directive_bare() {
        let directives = parse_comment("request: Widget");
        assert_eq!(
            directives,
            vec![Directive::Request {
                schema: "Widget".to_string(),
                required: false,
                description: None,
            }]
        );
    }

    #[test]
    fn test_query_spec_strips_enum_then_plus_then_star() {
        let specs = parse_param_specs("+*page{1;2;3}");
        assert_eq!(
            specs,
            vec![ParamSpec {
                name: "page".to_string(),
                required: true,
                numeric: true,
                enum_values: vec!["1".to_string(), "2".to_string(), "3".to_string()],
            }]
        );
    }

    #[test]
    fn test_query_multiple_specs() {
        let specs = parse_param_specs("+*page{1;2;3}, search");
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].name, "search");
        assert!(!specs[1].required);
        assert!(!specs[1].numeric);
        assert!(specs[1].enum_values.is_empty());
    }

    #[test]
    fn test_free_text_lines_kept_in_order() {
        let directives = parse_comment("Lists widgets.\n\ntag: widgets\nSlowly.");
        assert_eq!(
            directives,
            vec![
                Directive::Text("Lists widgets.".to_string()),
                Directive::Tag(vec!["widgets".to_string()]),
                Directive::Text("Slowly.".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_directive() {
        let directives = parse_comment("header: X-Request-Id");
        match &directives[0] {
            Directive::Header(specs) => assert_eq!(specs[0].name, "X-Request-Id"),
            other => panic!("unexpected directive: {:?}", other),
        }
    }

    #[test]
    fn test_directive_keywords_are_case_sensitive() {
        let directives = parse_comment("Response: Widget");
        assert_eq!(
            directives,
            vec![Directive::Text("Response: Widget".to_string())]
        );
    }
}
