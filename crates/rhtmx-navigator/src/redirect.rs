/// Redirect declarations
///
/// A redirect never navigates by itself. Resolving one yields the target
/// location and whether it should be pushed or replace the current entry;
/// the history backend decides what to do with that.
use crate::context::ResolutionContext;
use crate::error::{NavigatorError, Result};
use crate::location::Location;
use crate::matcher::{MatchOptions, MatchResult, PathPattern};

/// Where to go and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectOutcome {
    pub location: Location,
    /// `true` to push a new entry, `false` to replace the current one
    pub push: bool,
}

/// A redirect, optionally guarded by a `from` pattern inside a [`Switch`](crate::Switch)
///
/// `to` is kept as written. It is only split into a [`Location`] after
/// parameters are substituted, so pattern modifiers such as `/:id?` survive.
#[derive(Debug, Clone)]
pub struct Redirect {
    from: Option<PathPattern>,
    to: String,
    push: bool,
    options: MatchOptions,
}

impl Redirect {
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            from: None,
            to: to.into(),
            push: false,
            options: MatchOptions::default(),
        }
    }

    pub fn with_from(mut self, from: impl Into<PathPattern>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn push(mut self) -> Self {
        self.push = true;
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

    pub fn from_pattern(&self) -> Option<&PathPattern> {
        self.from.as_ref()
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Resolves a redirect declared directly under a controller or route
    ///
    /// Outside a switch `from` is not consulted and `to` is used as declared.
    pub fn resolve(&self, parent: Option<&ResolutionContext>) -> Result<RedirectOutcome> {
        let parent = parent.ok_or(NavigatorError::OutsideController)?;
        self.resolve_with(parent, None)
    }

    /// Resolves with the match a switch computed for this redirect
    ///
    /// Parameters of `computed_match` are substituted into `to` before it is
    /// parsed into a location.
    pub(crate) fn resolve_with(
        &self,
        parent: &ResolutionContext,
        computed_match: Option<&MatchResult>,
    ) -> Result<RedirectOutcome> {
        let target = match computed_match {
            Some(found) => parent.matcher().generate_path(&self.to, &found.params)?,
            None => self.to.clone(),
        };
        let location = Location::parse(&target);

        tracing::debug!(to = %location.href(), push = self.push, "redirect resolved");
        Ok(RedirectOutcome {
            location,
            push: self.push,
        })
    }
}
