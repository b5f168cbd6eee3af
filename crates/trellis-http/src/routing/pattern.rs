//! Path template compilation
//!
//! A template is either
//! - empty, which matches every path,
//! - a raw regular expression starting with `^`, used as written, or
//! - a literal path where every `[name]` placeholder captures `.+`.
//!
//! Whatever the form, the compiled matcher is anchored at both ends and
//! case-insensitive, so a candidate path either matches completely or not at
//! all.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\w+)\]").expect("placeholder expression is valid"));

/// Errors that can occur while compiling a path template
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Path template '{template}' repeats parameter '{name}'")]
    RepeatParameters { template: String, name: String },

    #[error("Path template '{template}' produced invalid expression '{expression}': {source}")]
    Compilation {
        template: String,
        expression: String,
        #[source]
        source: regex::Error,
    },
}

/// Compiled path template with its ordered parameter names
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    expression: String,
    matcher: Regex,
    params: Vec<String>,
    groups: Vec<String>,
}

impl PathPattern {
    /// Compile a path template
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        if template.is_empty() {
            return Self::build(template, String::from(".*"), Vec::new(), false);
        }

        if let Some(raw) = template.strip_prefix('^') {
            return Self::build(template, strip_end_anchor(raw).to_string(), Vec::new(), true);
        }

        let mut params = Vec::new();
        let mut seen = HashSet::new();
        let mut body = String::with_capacity(template.len() + 16);
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(template) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let name = captures[1].to_string();

            if !seen.insert(name.clone()) {
                return Err(PatternError::RepeatParameters {
                    template: template.to_string(),
                    name,
                });
            }

            body.push_str(&template[last..whole.start()]);
            body.push_str(&format!("(?P<{}>.+)", group_name(params.len())));
            params.push(name);
            last = whole.end();
        }
        body.push_str(&template[last..]);

        let body = strip_end_anchor(&body).to_string();
        Self::build(template, body, params, false)
    }

    fn build(
        template: &str,
        body: String,
        params: Vec<String>,
        raw: bool,
    ) -> Result<Self, PatternError> {
        let expression = format!("^{}$", body);
        let matcher = RegexBuilder::new(&format!("^(?:{})$", body))
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Compilation {
                template: template.to_string(),
                expression: expression.clone(),
                source,
            })?;

        let (params, groups) = if raw {
            let names: Vec<String> = matcher.capture_names().flatten().map(String::from).collect();
            (names.clone(), names)
        } else {
            let groups = (0..params.len()).map(group_name).collect();
            (params, groups)
        };

        Ok(Self {
            template: template.to_string(),
            expression,
            matcher,
            params,
            groups,
        })
    }

    /// The template this pattern was compiled from
    pub fn template(&self) -> &str {
        &self.template
    }

    /// The assembled, anchored regular expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Parameter names in declaration order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// True when the pattern matches every path
    pub fn matches_everything(&self) -> bool {
        self.template.is_empty()
    }

    /// Check whether the whole path matches
    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Match the path and return its parameters in declaration order
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let captures = self.matcher.captures(path)?;
        Some(
            self.params
                .iter()
                .zip(&self.groups)
                .filter_map(|(name, group)| {
                    captures
                        .name(group)
                        .map(|value| (name.clone(), value.as_str().to_string()))
                })
                .collect(),
        )
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

fn group_name(index: usize) -> String {
    format!("p{}", index)
}

/// Drop a trailing `$` unless it is escaped
fn strip_end_anchor(body: &str) -> &str {
    match body.strip_suffix('$') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_template_matches_anything() {
        let pattern = PathPattern::compile("").unwrap();
        assert!(pattern.matches_everything());
        assert!(pattern.is_match(""));
        assert!(pattern.is_match("/any/thing/at/all"));
        assert_eq!(pattern.expression(), "^.*$");
        assert!(pattern.params().is_empty());
    }

    #[test]
    fn test_placeholders_become_captures() {
        let pattern = PathPattern::compile("/users/[id]/posts/[slug]").unwrap();
        assert_eq!(pattern.params(), &["id".to_string(), "slug".to_string()]);
        assert_eq!(pattern.expression(), "^/users/(?P<p0>.+)/posts/(?P<p1>.+)$");

        let params = pattern.captures("/users/123/posts/hello-world").unwrap();
        assert_eq!(
            params,
            vec![
                ("id".to_string(), "123".to_string()),
                ("slug".to_string(), "hello-world".to_string()),
            ]
        );
    }

    #[test]
    fn test_round_trip_with_substituted_values() {
        let pattern = PathPattern::compile("/a/[a]/b/[b]").unwrap();
        for (a, b) in [("x", "y"), ("1234", "hello-there"), ("A.B", "c_d")] {
            let path = format!("/a/{}/b/{}", a, b);
            let params = pattern.captures(&path).unwrap();
            assert_eq!(params[0], ("a".to_string(), a.to_string()));
            assert_eq!(params[1], ("b".to_string(), b.to_string()));
        }
    }

    #[test]
    fn test_placeholder_capture_may_span_slashes() {
        let pattern = PathPattern::compile("/files/[path]").unwrap();
        let params = pattern.captures("/files/docs/readme.md").unwrap();
        assert_eq!(params[0].1, "docs/readme.md");
    }

    #[test]
    fn test_matching_is_anchored() {
        let pattern = PathPattern::compile("/users").unwrap();
        assert!(pattern.is_match("/users"));
        assert!(!pattern.is_match("/users/1"));
        assert!(!pattern.is_match("/api/users"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let pattern = PathPattern::compile("/Users/[id]").unwrap();
        assert!(pattern.is_match("/users/5"));
        assert!(pattern.is_match("/USERS/5"));
    }

    #[test]
    fn test_repeated_parameter_is_rejected() {
        let error = PathPattern::compile("/x/[id]/[id]").unwrap_err();
        assert!(matches!(
            error,
            PatternError::RepeatParameters { ref name, .. } if name == "id"
        ));
    }

    #[test]
    fn test_raw_expression_is_used_verbatim() {
        let pattern = PathPattern::compile("^/api/v[0-9]+/status$").unwrap();
        assert_eq!(pattern.expression(), "^/api/v[0-9]+/status$");
        assert!(pattern.is_match("/api/v2/status"));
        assert!(!pattern.is_match("/api/vx/status"));

        let unterminated = PathPattern::compile("^/api/v[0-9]+").unwrap();
        assert_eq!(unterminated.expression(), "^/api/v[0-9]+$");
        assert!(!unterminated.is_match("/api/v2/extra"));
    }

    #[test]
    fn test_raw_alternation_still_matches_whole_path() {
        let pattern = PathPattern::compile("^/a|/b").unwrap();
        assert!(pattern.is_match("/a"));
        assert!(pattern.is_match("/b"));
        assert!(!pattern.is_match("/a/more"));
        assert!(!pattern.is_match("/prefix/b"));
    }

    #[test]
    fn test_raw_named_groups_become_parameters() {
        let pattern = PathPattern::compile(r"^/orders/(?P<order>\d+)$").unwrap();
        assert_eq!(pattern.params(), &["order".to_string()]);
        let params = pattern.captures("/orders/981").unwrap();
        assert_eq!(params, vec![("order".to_string(), "981".to_string())]);
        assert!(pattern.captures("/orders/abc").is_none());
    }

    #[test]
    fn test_invalid_expression_reports_template_and_expression() {
        let error = PathPattern::compile("^/broken/(unclosed").unwrap_err();
        match error {
            PatternError::Compilation {
                template,
                expression,
                ..
            } => {
                assert_eq!(template, "^/broken/(unclosed");
                assert_eq!(expression, "^/broken/(unclosed$");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_explicit_end_anchor_is_not_doubled() {
        let pattern = PathPattern::compile("/ping$").unwrap();
        assert_eq!(pattern.expression(), "^/ping$");
        assert!(pattern.is_match("/ping"));
    }
}
