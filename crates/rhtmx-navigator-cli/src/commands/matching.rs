use anyhow::Result;
use rhtmx_navigator::{MatchOptions, MatchSpec, NavigatorConfig, PathMatcher};

/// Command-line switches; each one can only turn an option on
pub struct Flags {
    pub exact: bool,
    pub strict: bool,
    pub sensitive: bool,
}

impl Flags {
    fn apply(&self, defaults: MatchOptions) -> MatchOptions {
        MatchOptions {
            exact: defaults.exact || self.exact,
            strict: defaults.strict || self.strict,
            sensitive: defaults.sensitive || self.sensitive,
        }
    }
}

/// Returns the match as pretty JSON, or `null`
pub fn execute(
    config: &NavigatorConfig,
    pathname: &str,
    patterns: Vec<String>,
    flags: Flags,
) -> Result<String> {
    let options = flags.apply(config.matching);
    let matcher = PathMatcher::from_config(config);

    tracing::debug!(pathname, ?patterns, ?options, "matching");
    let found = matcher.match_path(pathname, MatchSpec::new(patterns).with_options(options))?;

    Ok(serde_json::to_string_pretty(&found)?)
}
