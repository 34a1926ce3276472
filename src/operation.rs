//! Builds one [`Operation`] for a resolved handler.
//!
//! The builder is best-effort by design: a handler that cannot be located, or
//! whose comment is missing or unreadable, still yields an operation with
//! whatever could be derived. Only structural-tag errors (handled upstream in
//! schema materialization) are fatal to a build.

use http::StatusCode;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

use crate::annotations::{parse_comment, Directive, ParamSpec};
use crate::builder::DocBuilder;
use crate::document::{Content, Operation, ParamSchema, Parameter, RequestBody, Response};
use crate::router::Handler;
use crate::source;

static PATH_PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]*)\}").unwrap());

/// Builds the operation for `endpoint` registered at `path` under `method`.
/// `verb_count` is the number of verbs on the originating leaf.
pub fn build_operation(
    ctx: &mut DocBuilder,
    endpoint: &Handler,
    path: &str,
    method: &str,
    verb_count: usize,
) -> Operation {
    debug!("building operation {} {}", method, path);
    let mut op = Operation::default();

    // Indirectly registered handlers: the route tree points at a generic
    // wrapper and the real implementation sits in the helper queue.
    let endpoint = resolve_helper(ctx, endpoint, method, verb_count);
    let located = ctx.sources.locate(&endpoint).cloned();

    op.parameters = path_parameters(path);

    if ctx.auth_active {
        let mut requirement = BTreeMap::new();
        requirement.insert("bearerAuth".to_string(), Vec::new());
        op.security = vec![requirement];
    }

    op.summary = match &located {
        Some(src) => derive_summary(&src.function_path, Some(src.file.as_path())),
        None => {
            warn!("handler {} has no source entry", endpoint.id());
            derive_summary(endpoint.id(), None)
        }
    };

    let mut description_lines = Vec::new();
    if let Some(src) = &located {
        if let Some(comment) = source::func_comment(&src.file, src.line) {
            for directive in parse_comment(&comment) {
                apply_directive(ctx, &mut op, &mut description_lines, directive);
            }
        }
    }
    op.description = description_lines.join("\n");

    // Synthesize the default response when none was explicit.
    if !op.responses.contains_key("default") {
        if let Some(name) = &ctx.default_response {
            op.responses.insert(
                "default".to_string(),
                Response {
                    description: "Default Response".to_string(),
                    content: Content::schema_ref(name),
                },
            );
        }
    }

    op
}

fn apply_directive(
    ctx: &DocBuilder,
    op: &mut Operation,
    description_lines: &mut Vec<String>,
    directive: Directive,
) {
    match directive {
        Directive::Response(names) => {
            for name in names {
                match ctx.classifications.get(&name) {
                    Some(status) if status == "default" => {}
                    Some(status) => {
                        op.responses.insert(
                            status.clone(),
                            Response {
                                description: reason_phrase(status),
                                content: Content::schema_ref(&name),
                            },
                        );
                    }
                    None => warn!("response directive names unregistered type {:?}", name),
                }
            }
        }
        Directive::Request {
            schema,
            required,
            description,
        } => {
            op.request_body = Some(RequestBody {
                required,
                content: Content::schema_ref(&schema),
                description,
            });
        }
        Directive::Query(specs) => {
            op.parameters
                .extend(specs.into_iter().map(|s| to_parameter(s, "query")));
        }
        Directive::Header(specs) => {
            op.parameters
                .extend(specs.into_iter().map(|s| to_parameter(s, "header")));
        }
        Directive::Tag(names) => op.tags = names,
        Directive::Text(line) => description_lines.push(line),
    }
}

/// Substitutes the real handler when the route entry is the known generic
/// wrapper: first the queued pair whose verb matches, else the queue head,
/// but only when the leaf carries a single verb. A consumed entry is removed.
fn resolve_helper(
    ctx: &mut DocBuilder,
    endpoint: &Handler,
    method: &str,
    verb_count: usize,
) -> Handler {
    let wrapper = match &ctx.helper_wrapper {
        Some(w) => w.clone(),
        None => return endpoint.clone(),
    };
    let is_wrapper = ctx
        .sources
        .locate(endpoint)
        .map(|src| src.function_path == wrapper)
        .unwrap_or_else(|| endpoint.id() == wrapper);
    if !is_wrapper {
        return endpoint.clone();
    }
    if let Some(pos) = ctx.helpers.iter().position(|(m, _)| m == method) {
        return ctx.helpers.remove(pos).map(|(_, h)| h).unwrap_or_else(|| endpoint.clone());
    }
    if verb_count == 1 {
        if let Some((_, handler)) = ctx.helpers.pop_front() {
            return handler;
        }
    }
    warn!("no helper registration matches {} for {}", method, endpoint.id());
    endpoint.clone()
}

/// Infers path parameters from `{...}` placeholders. A `:pattern` suffix is
/// stripped from the name; a digit-only pattern makes the parameter numeric.
/// Path parameters are required by construction.
fn path_parameters(path: &str) -> Vec<Parameter> {
    PATH_PARAM_RE
        .captures_iter(path)
        .map(|caps| {
            let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let (name, pattern) = match inner.split_once(':') {
                Some((name, pattern)) => (name, Some(pattern)),
                None => (inner, None),
            };
            let param_type = match pattern {
                Some(p) if is_digit_pattern(p) => "number",
                _ => "string",
            };
            Parameter {
                name: name.to_string(),
                location: "path".to_string(),
                required: true,
                schema: ParamSchema {
                    param_type: param_type.to_string(),
                    enum_values: Vec::new(),
                },
            }
        })
        .collect()
}

fn is_digit_pattern(pattern: &str) -> bool {
    matches!(pattern, "[0-9]+" | r"\d+" | "[[:digit:]]+")
}

fn to_parameter(spec: ParamSpec, location: &str) -> Parameter {
    let param_type = if spec.numeric { "number" } else { "string" };
    Parameter {
        name: spec.name,
        location: location.to_string(),
        required: spec.required,
        schema: ParamSchema {
            param_type: param_type.to_string(),
            enum_values: spec.enum_values,
        },
    }
}

/// The HTTP reason phrase for a numeric status string, or empty when the
/// status is unknown.
fn reason_phrase(status: &str) -> String {
    status
        .parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
        .to_string()
}

/// Derives the operation summary from a qualified function path: the leading
/// module prefix is stripped up through the package segment, the last
/// dot-separated component remains, and an auto-generated method-value suffix
/// is dropped.
fn derive_summary(function_path: &str, file: Option<&Path>) -> String {
    let mut summary = function_path.to_string();
    if let Some(file) = file {
        if let Some(pkg) = source::package_name(file) {
            let marker = format!("/{}", pkg);
            if let Some(idx) = summary.find(&marker) {
                summary = summary[idx + marker.len()..]
                    .trim_start_matches('.')
                    .to_string();
            }
        }
    }
    let last = summary.rsplit('.').next().unwrap_or(&summary);
    last.strip_suffix("-fm").unwrap_or(last).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_path_parameter() {
        let params = path_parameters("/widgets/{id:[0-9]+}");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "id");
        assert_eq!(params[0].location, "path");
        assert!(params[0].required);
        assert_eq!(params[0].schema.param_type, "number");
    }

    #[test]
    fn test_string_path_parameter_with_pattern() {
        let params = path_parameters("/widgets/{slug:[a-z-]+}");
        assert_eq!(params[0].name, "slug");
        assert_eq!(params[0].schema.param_type, "string");
    }

    #[test]
    fn test_multiple_path_parameters() {
        let params = path_parameters("/shops/{shop}/widgets/{id:[0-9]+}");
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["shop", "id"]);
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(reason_phrase("200"), "OK");
        assert_eq!(reason_phrase("404"), "Not Found");
        assert_eq!(reason_phrase("default"), "");
    }

    #[test]
    fn test_derive_summary_without_package() {
        assert_eq!(
            derive_summary("example.com/project/api.ListWidgets", None),
            "ListWidgets"
        );
    }

    #[test]
    fn test_derive_summary_strips_method_value_suffix() {
        assert_eq!(
            derive_summary("example.com/project/api.Server.Get-fm", None),
            "Get"
        );
    }
}
