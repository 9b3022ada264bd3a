/// Pattern compilation
///
/// Turns a path pattern plus compile options into a [`CompiledMatcher`]: an
/// anchored regex with one capture group per declared parameter, the ordered
/// parameter names, and the tokens needed to run the pattern backwards for
/// path generation.
///
/// Compilation is pure. Callers normally go through [`PatternCache`] so that
/// a static route table is compiled once per process.
pub mod cache;
pub mod token;

pub use cache::{PatternCache, DEFAULT_CACHE_LIMIT};
pub use token::{tokenize, ParamToken, Token};

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{NavigatorError, Result};

/// Flags that change the generated regex
///
/// `end` is what route declarations call `exact`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Anchor at the end of the input
    pub end: bool,
    /// Trailing slashes must match literally
    pub strict: bool,
    /// Case-sensitive comparison
    pub sensitive: bool,
}

/// How the end of a match is bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// Regex is anchored with `$`
    Anchored,
    /// Pattern ends in a literal delimiter, nothing follows
    Open,
    /// Followed by a delimiter or end of input; a delimiter that is the last
    /// character of the input is part of the match
    Segment,
    /// Followed by a delimiter that starts another segment, or end of input
    StrictSegment,
}

/// Raw result of testing a pathname
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured<'p> {
    /// The matched prefix of the pathname
    pub matched: &'p str,
    /// One entry per parameter, `None` for optional parameters that did not participate
    pub values: Vec<Option<&'p str>>,
}

/// A compiled, immutable pattern
#[derive(Debug)]
pub struct CompiledMatcher {
    source: String,
    options: CompileOptions,
    regex: Regex,
    boundary: Boundary,
    tokens: Vec<Token>,
    param_names: Vec<String>,
    validators: Vec<Regex>,
}

impl CompiledMatcher {
    /// Compiles a pattern
    ///
    /// Fails only when a custom group does not form a valid regex.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_navigator::pattern::{CompileOptions, CompiledMatcher};
    ///
    /// let matcher = CompiledMatcher::compile("/one/:id", CompileOptions::default()).unwrap();
    /// let captured = matcher.exec("/one/two/three").unwrap();
    /// assert_eq!(captured.matched, "/one/two");
    /// assert_eq!(captured.values, vec![Some("two")]);
    /// ```
    pub fn compile(pattern: &str, options: CompileOptions) -> Result<Self> {
        let tokens = tokenize(pattern);
        let mut route = String::new();
        let mut param_names = Vec::new();
        let mut validators = Vec::new();

        for token in &tokens {
            match token {
                Token::Literal(text) => route.push_str(&regex::escape(text)),
                Token::Param(param) => {
                    param_names.push(param.name.clone());
                    validators.push(build_validator(pattern, param, options.sensitive)?);
                    route.push_str(&param_capture(param));
                }
            }
        }

        let ends_with_delimiter = route.ends_with('/');
        if !options.strict && ends_with_delimiter {
            route.pop();
        }

        let boundary = match (options.end, options.strict) {
            (true, _) => Boundary::Anchored,
            (false, true) if ends_with_delimiter => Boundary::Open,
            (false, true) => Boundary::StrictSegment,
            (false, false) => Boundary::Segment,
        };

        let tail = match (boundary, options.strict) {
            (Boundary::Anchored, false) => "/?$",
            (Boundary::Anchored, true) => "$",
            (Boundary::Open, _) => "",
            (Boundary::Segment, _) => "(/|$)",
            (Boundary::StrictSegment, _) => "((?s:/.)|$)",
        };

        let flags = if options.sensitive { "" } else { "(?i)" };
        let regex = Regex::new(&format!("{flags}^{route}{tail}"))
            .map_err(|e| NavigatorError::invalid_pattern(pattern, e))?;

        Ok(Self {
            source: pattern.to_string(),
            options,
            regex,
            boundary,
            tokens,
            param_names,
            validators,
        })
    }

    /// The pattern this matcher was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Parameter names in capture order
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tests a pathname, returning the matched prefix and captured values
    pub fn exec<'p>(&self, pathname: &'p str) -> Option<Captured<'p>> {
        let caps = self.regex.captures(pathname)?;
        let whole = caps.get(0)?;
        let tail = caps.get(self.param_names.len() + 1);

        let end = match (self.boundary, tail) {
            (Boundary::Segment, Some(tail))
                if tail.as_str() == "/" && tail.end() < pathname.len() =>
            {
                tail.start()
            }
            (Boundary::StrictSegment, Some(tail)) => tail.start(),
            _ => whole.end(),
        };

        let values = (1..=self.param_names.len())
            .map(|i| caps.get(i).map(|m| m.as_str()))
            .collect();

        Some(Captured {
            matched: &pathname[..end],
            values,
        })
    }

    /// Builds a path from parameter values (inverse of [`exec`](Self::exec))
    ///
    /// Values are percent-encoded. Wildcard and repeating values keep their
    /// delimiters. Optional parameters that are absent or empty are left out.
    pub fn generate(&self, params: &HashMap<String, String>) -> Result<String> {
        let mut path = String::new();
        let mut validators = self.validators.iter();

        for token in &self.tokens {
            let param = match token {
                Token::Literal(text) => {
                    path.push_str(text);
                    continue;
                }
                Token::Param(param) => param,
            };
            let Some(validator) = validators.next() else {
                break;
            };

            let value = params
                .get(&param.name)
                .filter(|v| !(param.optional && v.is_empty()));

            let Some(value) = value else {
                if !param.optional {
                    return Err(NavigatorError::MissingParam {
                        pattern: self.source.clone(),
                        name: param.name.clone(),
                    });
                }
                if param.partial {
                    path.push_str(&param.prefix);
                }
                continue;
            };

            let pieces: Vec<&str> = if param.repeat {
                value.split(param.delimiter).collect()
            } else {
                vec![value.as_str()]
            };

            for (i, piece) in pieces.iter().enumerate() {
                let segment = if param.asterisk {
                    piece
                        .split('/')
                        .map(|part| urlencoding::encode(part).into_owned())
                        .collect::<Vec<_>>()
                        .join("/")
                } else {
                    urlencoding::encode(piece).into_owned()
                };

                if !validator.is_match(&segment) {
                    return Err(NavigatorError::InvalidParam {
                        pattern: self.source.clone(),
                        name: param.name.clone(),
                        value: value.clone(),
                    });
                }

                if i == 0 {
                    path.push_str(&param.prefix);
                } else {
                    path.push(param.delimiter);
                }
                path.push_str(&segment);
            }
        }

        Ok(path)
    }
}

/// Regex fragment for one parameter, including its prefix and modifiers
fn param_capture(param: &ParamToken) -> String {
    let prefix = regex::escape(&param.prefix);
    let mut capture = format!("(?:{})", param.pattern);

    if param.repeat {
        capture = format!("{capture}(?:{prefix}{capture})*");
    }

    match (param.optional, param.partial) {
        (true, false) => format!("(?:{prefix}({capture}))?"),
        (true, true) => format!("{prefix}({capture})?"),
        (false, _) => format!("{prefix}({capture})"),
    }
}

fn build_validator(pattern: &str, param: &ParamToken, sensitive: bool) -> Result<Regex> {
    let flags = if sensitive { "" } else { "(?i)" };
    Regex::new(&format!("{flags}^(?:{})$", param.pattern))
        .map_err(|e| NavigatorError::invalid_pattern(pattern, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(pattern: &str, end: bool, strict: bool, sensitive: bool) -> CompiledMatcher {
        CompiledMatcher::compile(
            pattern,
            CompileOptions {
                end,
                strict,
                sensitive,
            },
        )
        .unwrap()
    }

    fn matched<'p>(matcher: &CompiledMatcher, path: &'p str) -> Option<&'p str> {
        matcher.exec(path).map(|c| c.matched)
    }

    #[test]
    fn test_prefix_match_stops_at_segment_boundary() {
        let m = compile("/one", false, false, false);
        assert_eq!(matched(&m, "/one"), Some("/one"));
        assert_eq!(matched(&m, "/one/two"), Some("/one"));
        assert_eq!(matched(&m, "/one/"), Some("/one/"));
        assert_eq!(matched(&m, "/onetwo"), None);
    }

    #[test]
    fn test_end_anchors_the_match() {
        let m = compile("/one", true, false, false);
        assert_eq!(matched(&m, "/one"), Some("/one"));
        assert_eq!(matched(&m, "/one/"), Some("/one/"));
        assert_eq!(matched(&m, "/one/two"), None);
    }

    #[test]
    fn test_strict_rejects_unmatched_trailing_slash() {
        let m = compile("/one", false, true, false);
        assert_eq!(matched(&m, "/one"), Some("/one"));
        assert_eq!(matched(&m, "/one/two"), Some("/one"));
        assert_eq!(matched(&m, "/one/"), None);

        let m = compile("/one/", false, true, false);
        assert_eq!(matched(&m, "/one/"), Some("/one/"));
        assert_eq!(matched(&m, "/one"), None);
    }

    #[test]
    fn test_root_pattern_matches_empty_prefix() {
        let m = compile("/", false, false, false);
        assert_eq!(matched(&m, "/"), Some("/"));
        assert_eq!(matched(&m, "/anything"), Some(""));
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(compile("/abc", false, false, false).exec("/ABC").is_some());
        assert!(compile("/abc", false, false, true).exec("/ABC").is_none());
    }

    #[test]
    fn test_optional_param_not_captured() {
        let m = compile("/posts/:id?", true, false, false);
        assert_eq!(m.exec("/posts").unwrap().values, vec![None]);
        assert_eq!(m.exec("/posts/7").unwrap().values, vec![Some("7")]);
    }

    #[test]
    fn test_repeat_and_wildcard_capture_remaining_segments() {
        let m = compile("/docs/:path+", true, false, false);
        assert_eq!(m.exec("/docs/a/b/c").unwrap().values, vec![Some("a/b/c")]);
        assert!(m.exec("/docs").is_none());

        let m = compile("/files/*", false, false, false);
        assert_eq!(m.exec("/files/x/y.txt").unwrap().values, vec![Some("x/y.txt")]);
    }

    #[test]
    fn test_custom_group_constrains_value() {
        let m = compile(r"/users/:id(\d+)", true, false, false);
        assert!(m.exec("/users/42").is_some());
        assert!(m.exec("/users/abc").is_none());
    }

    #[test]
    fn test_malformed_custom_group_fails() {
        let err = CompiledMatcher::compile("/users/:id([)", CompileOptions::default());
        assert!(matches!(err, Err(NavigatorError::InvalidPattern { .. })));
    }

    #[test]
    fn test_generate_substitutes_params() {
        let m = compile("/users/:id/posts/:post?", false, false, false);
        let mut params = HashMap::new();
        params.insert("id".to_string(), "a b".to_string());
        assert_eq!(m.generate(&params).unwrap(), "/users/a%20b/posts");

        params.insert("post".to_string(), "9".to_string());
        assert_eq!(m.generate(&params).unwrap(), "/users/a%20b/posts/9");
    }

    #[test]
    fn test_generate_missing_and_invalid_params() {
        let m = compile(r"/users/:id(\d+)", false, false, false);
        assert!(matches!(
            m.generate(&HashMap::new()),
            Err(NavigatorError::MissingParam { .. })
        ));

        let mut params = HashMap::new();
        params.insert("id".to_string(), "abc".to_string());
        assert!(matches!(
            m.generate(&params),
            Err(NavigatorError::InvalidParam { .. })
        ));
    }

    #[test]
    fn test_generate_keeps_wildcard_slashes() {
        let m = compile("/files/*", false, false, false);
        let mut params = HashMap::new();
        params.insert("0".to_string(), "a/b c".to_string());
        assert_eq!(m.generate(&params).unwrap(), "/files/a/b%20c");
    }
}
