//! Public path resolution
//!
//! [`PathMatcher`] resolves a pathname against one pattern or a list of
//! alternatives and produces a [`MatchResult`]. It can be used on its own,
//! outside any navigation tree.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::NavigatorConfig;
use crate::error::Result;
use crate::pattern::{CompileOptions, PatternCache};

/// Matching flags for a route declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// The match must cover the whole pathname
    pub exact: bool,
    /// Trailing slashes must match literally
    pub strict: bool,
    /// Case-sensitive comparison
    pub sensitive: bool,
}

impl MatchOptions {
    pub fn compile_options(self) -> CompileOptions {
        CompileOptions {
            end: self.exact,
            strict: self.strict,
            sensitive: self.sensitive,
        }
    }
}

/// One pattern or an ordered list of alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathPattern {
    One(String),
    Many(Vec<String>),
}

impl PathPattern {
    /// Candidates in declaration order
    pub fn candidates(&self) -> &[String] {
        match self {
            PathPattern::One(pattern) => std::slice::from_ref(pattern),
            PathPattern::Many(patterns) => patterns,
        }
    }

    /// `true` for the empty single pattern, which declarations treat as "no pattern"
    pub fn is_blank(&self) -> bool {
        matches!(self, PathPattern::One(pattern) if pattern.is_empty())
    }
}

impl From<&str> for PathPattern {
    fn from(pattern: &str) -> Self {
        PathPattern::One(pattern.to_string())
    }
}

impl From<String> for PathPattern {
    fn from(pattern: String) -> Self {
        PathPattern::One(pattern)
    }
}

impl From<Vec<String>> for PathPattern {
    fn from(patterns: Vec<String>) -> Self {
        PathPattern::Many(patterns)
    }
}

impl From<Vec<&str>> for PathPattern {
    fn from(patterns: Vec<&str>) -> Self {
        PathPattern::Many(patterns.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathPattern {
    fn from(patterns: [&str; N]) -> Self {
        PathPattern::Many(patterns.iter().map(|p| p.to_string()).collect())
    }
}

/// Pattern plus options, the argument to [`PathMatcher::match_path`]
///
/// Bare patterns convert into a spec with default options:
///
/// ```
/// use rhtmx_navigator::{match_path, MatchSpec};
///
/// assert!(match_path("/a", "/a").unwrap().is_some());
/// assert!(match_path("/b", ["/a", "/b"]).unwrap().is_some());
/// assert!(match_path("/a/b", MatchSpec::new("/a").exact()).unwrap().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchSpec {
    /// `None` means no pattern is configured and nothing can match
    pub path: Option<PathPattern>,
    pub options: MatchOptions,
}

impl MatchSpec {
    pub fn new(path: impl Into<PathPattern>) -> Self {
        Self {
            path: Some(path.into()),
            options: MatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn exact(mut self) -> Self {
        self.options.exact = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.options.sensitive = true;
        self
    }
}

impl From<&str> for MatchSpec {
    fn from(pattern: &str) -> Self {
        MatchSpec::new(pattern)
    }
}

impl From<String> for MatchSpec {
    fn from(pattern: String) -> Self {
        MatchSpec::new(pattern)
    }
}

impl From<PathPattern> for MatchSpec {
    fn from(pattern: PathPattern) -> Self {
        MatchSpec::new(pattern)
    }
}

impl From<Vec<&str>> for MatchSpec {
    fn from(patterns: Vec<&str>) -> Self {
        MatchSpec::new(patterns)
    }
}

impl From<Vec<String>> for MatchSpec {
    fn from(patterns: Vec<String>) -> Self {
        MatchSpec::new(patterns)
    }
}

impl<const N: usize> From<[&str; N]> for MatchSpec {
    fn from(patterns: [&str; N]) -> Self {
        MatchSpec::new(patterns)
    }
}

/// Result of matching a pathname against a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// The alternative that matched
    pub pattern: String,
    /// The matched portion of the pathname
    pub url: String,
    /// Whether `url` is the entire pathname
    pub is_exact: bool,
    /// One entry per declared parameter; optional parameters that did not
    /// participate map to an empty string
    pub params: HashMap<String, String>,
}

impl MatchResult {
    /// The match every navigation tree starts from
    ///
    /// ```
    /// use rhtmx_navigator::MatchResult;
    ///
    /// let root = MatchResult::root("/");
    /// assert_eq!(root.url, "/");
    /// assert!(root.is_exact);
    /// assert!(!MatchResult::root("/users").is_exact);
    /// ```
    pub fn root(pathname: &str) -> Self {
        Self {
            pattern: "/".to_string(),
            url: "/".to_string(),
            is_exact: pathname == "/",
            params: HashMap::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Resolves pathnames through a [`PatternCache`]
///
/// Cloning is cheap; clones share the cache.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    cache: Arc<PatternCache>,
}

impl PathMatcher {
    /// Matcher backed by the process-wide cache
    pub fn new() -> Self {
        Self::with_cache(PatternCache::shared())
    }

    pub fn with_cache(cache: Arc<PatternCache>) -> Self {
        Self { cache }
    }

    /// Matcher with a dedicated cache sized from configuration
    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self::with_cache(Arc::new(PatternCache::with_limit(config.cache.limit)))
    }

    pub fn cache(&self) -> &Arc<PatternCache> {
        &self.cache
    }

    /// Returns the first alternative in `spec` that matches `pathname`
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_navigator::PathMatcher;
    ///
    /// let matcher = PathMatcher::new();
    /// let found = matcher.match_path("/one/two", "/one/:id").unwrap().unwrap();
    /// assert_eq!(found.url, "/one/two");
    /// assert_eq!(found.param("id"), Some("two"));
    /// assert!(found.is_exact);
    /// ```
    pub fn match_path(
        &self,
        pathname: &str,
        spec: impl Into<MatchSpec>,
    ) -> Result<Option<MatchResult>> {
        let spec = spec.into();
        match &spec.path {
            Some(path) => self.match_pattern(pathname, path, spec.options),
            None => Ok(None),
        }
    }

    /// Like [`match_path`](Self::match_path) without building a [`MatchSpec`]
    pub fn match_pattern(
        &self,
        pathname: &str,
        path: &PathPattern,
        options: MatchOptions,
    ) -> Result<Option<MatchResult>> {
        let compile_options = options.compile_options();

        for candidate in path.candidates() {
            let compiled = self.cache.get_or_compile(candidate, compile_options)?;
            let Some(captured) = compiled.exec(pathname) else {
                continue;
            };

            let is_exact = captured.matched == pathname;
            if options.exact && !is_exact {
                continue;
            }

            let url = if candidate == "/" && captured.matched.is_empty() {
                "/"
            } else {
                captured.matched
            };

            debug_assert_eq!(compiled.param_names().len(), captured.values.len());
            let params = compiled
                .param_names()
                .iter()
                .zip(captured.values)
                .map(|(name, value)| (name.clone(), value.unwrap_or_default().to_string()))
                .collect();

            return Ok(Some(MatchResult {
                pattern: candidate.clone(),
                url: url.to_string(),
                is_exact,
                params,
            }));
        }

        Ok(None)
    }

    /// Builds a path from a pattern and parameter values
    ///
    /// ```
    /// use rhtmx_navigator::PathMatcher;
    /// use std::collections::HashMap;
    ///
    /// let mut params = HashMap::new();
    /// params.insert("id".to_string(), "42".to_string());
    /// let path = PathMatcher::new().generate_path("/users/:id", &params).unwrap();
    /// assert_eq!(path, "/users/42");
    /// ```
    pub fn generate_path(&self, pattern: &str, params: &HashMap<String, String>) -> Result<String> {
        if pattern == "/" {
            return Ok(pattern.to_string());
        }
        self.cache
            .get_or_compile(pattern, CompileOptions::default())?
            .generate(params)
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Matches against the process-wide cache
pub fn match_path(pathname: &str, spec: impl Into<MatchSpec>) -> Result<Option<MatchResult>> {
    PathMatcher::new().match_path(pathname, spec)
}

/// Generates a path using the process-wide cache
pub fn generate_path(pattern: &str, params: &HashMap<String, String>) -> Result<String> {
    PathMatcher::new().generate_path(pattern, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matcher() -> PathMatcher {
        PathMatcher::with_cache(Arc::new(PatternCache::new()))
    }

    #[test]
    fn test_missing_path_never_matches() {
        assert_eq!(matcher().match_path("/", MatchSpec::default()).unwrap(), None);
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let found = matcher().match_path("/anything", "").unwrap().unwrap();
        assert_eq!(found.url, "");
        assert!(!found.is_exact);
    }

    #[test]
    fn test_exact_miss_falls_through_to_next_alternative() {
        let spec = MatchSpec::new(["/a", "/a/b"]).exact();
        let found = matcher().match_path("/a/b", spec).unwrap().unwrap();
        assert_eq!(found.pattern, "/a/b");
    }

    #[test]
    fn test_first_alternative_wins() {
        let found = matcher()
            .match_path("/a/b", ["/a", "/a/:x"])
            .unwrap()
            .unwrap();
        assert_eq!(found.pattern, "/a");
        assert!(found.params.is_empty());
    }

    #[test]
    fn test_unmatched_optional_param_is_present_and_empty() {
        let found = matcher().match_path("/posts", "/posts/:id?").unwrap().unwrap();
        assert_eq!(found.param("id"), Some(""));
    }

    #[test]
    fn test_match_result_json_shape() {
        let found = matcher().match_path("/one/two", "/one/:id").unwrap().unwrap();
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "pattern": "/one/:id",
                "url": "/one/two",
                "isExact": true,
                "params": { "id": "two" }
            })
        );

        let back: MatchResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, found);
    }

    #[test]
    fn test_match_options_deserialize_with_defaults() {
        let options: MatchOptions = toml::from_str("exact = true").unwrap();
        assert_eq!(
            options,
            MatchOptions {
                exact: true,
                ..MatchOptions::default()
            }
        );
    }
}
