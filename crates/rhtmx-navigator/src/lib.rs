//! # RHTMX Navigator
//!
//! Declarative client-side route resolution:
//! - Path patterns (`/users/:id`, `/posts/:slug?`, `/files/:path*`, `/docs/*`)
//! - Prefix and exact matching, trailing-slash strictness, case sensitivity
//! - Nested routes inheriting their ancestor's match
//! - Exclusive selection among siblings with [`Switch`]
//! - Redirect targets built from matched parameters
//!
//! ## Resolution Model
//!
//! A [`NavigationController`] owns the current [`Location`] and listens to a
//! [`LocationFeed`]. Every declaration below it resolves against a
//! [`ResolutionContext`] handed down explicitly:
//! - **Routes** compute their match (or inherit it) and pick one render strategy
//! - **Switches** resolve only the first matching child
//! - **Redirects** return a target location; navigating is left to the backend
//!
//! ## Pattern Cache
//!
//! Compiled patterns are memoized per option set in a bounded
//! [`PatternCache`](pattern::PatternCache). Once full it stops inserting and
//! compiles on every call.
//!
//! ## Example
//!
//! ```
//! use rhtmx_navigator::{LocationChannel, NavigationController, Route, Switch};
//! use std::rc::Rc;
//!
//! let channel = Rc::new(LocationChannel::new("/users/42"));
//! let controller = NavigationController::create(channel.clone());
//! controller.activate();
//!
//! let switch = Switch::new()
//!     .with_route(Route::at("/users").exact().with_render(|_| "user list".to_string()))
//!     .with_route(Route::at("/users/:id").with_render(|ctx| {
//!         format!("user {}", ctx.param("id").unwrap_or_default())
//!     }));
//!
//! let outcome = switch.resolve(Some(&controller.context())).unwrap();
//! assert_eq!(outcome.route().and_then(|r| r.output.clone()), Some("user 42".to_string()));
//!
//! channel.emit("/users");
//! let outcome = switch.resolve(Some(&controller.context())).unwrap();
//! assert_eq!(outcome.index(), Some(0));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
mod context;
mod controller;
mod diagnostics;
mod error;
mod feed;
mod location;
mod matcher;
pub mod pattern;
mod redirect;
mod route;
mod switch;

pub use config::NavigatorConfig;
pub use context::ResolutionContext;
pub use controller::{Lifecycle, NavigationController, NavigationState};
pub use diagnostics::{Diagnostics, Element, Warning};
pub use error::{NavigatorError, Result};
pub use feed::{Listener, LocationChannel, LocationFeed, NavigationHandle, Unsubscribe};
pub use location::Location;
pub use matcher::{
    generate_path, match_path, MatchOptions, MatchResult, MatchSpec, PathMatcher, PathPattern,
};
pub use redirect::{Redirect, RedirectOutcome};
pub use route::{
    Children, ChildrenFn, Component, RenderFn, RenderStrategy, Route, RouteOutcome, StrategyKind,
};
pub use switch::{Selection, Switch, SwitchChild, SwitchOutcome};
