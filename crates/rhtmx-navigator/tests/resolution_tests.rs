//! Integration tests for route resolution
//!
//! Covers:
//! - Switch selection and evaluation order
//! - Controller lifecycle and location buffering
//! - Render strategy priority
//! - Nested match inheritance
//! - Redirects
//! - Warnings

use pretty_assertions::assert_eq;
use rhtmx_navigator::*;
use rstest::rstest;
use std::rc::Rc;

fn mounted(path: &str) -> (Rc<LocationChannel>, NavigationController) {
    let channel = Rc::new(LocationChannel::new(path));
    let controller =
        NavigationController::with_parts(channel.clone(), PathMatcher::new(), Diagnostics::enabled());
    controller.activate();
    (channel, controller)
}

fn route_at<O>(switch: &Switch<O>, index: usize) -> &Route<O> {
    match switch.child(index) {
        Some(SwitchChild::Route(route)) => route,
        _ => panic!("child {index} is not a route"),
    }
}

// ============================================================================
// Switch
// ============================================================================

#[test]
fn test_switch_resolves_only_first_match() {
    let (_channel, controller) = mounted("/x/42");
    let switch = Switch::new()
        .with_route(Route::at("/x").exact().with_children("list"))
        .with_route(Route::at("/x/:id").with_render(|ctx| {
            if ctx.param("id") == Some("42") {
                "detail"
            } else {
                "wrong"
            }
        }))
        .with_route(Route::new().with_children("fallback"));

    let outcome = switch.resolve(Some(&controller.context())).unwrap();

    assert_eq!(outcome.index(), Some(1));
    assert_eq!(outcome.route().and_then(|r| r.output), Some("detail"));
    assert_eq!(route_at(&switch, 0).resolutions(), 0);
    assert_eq!(route_at(&switch, 1).resolutions(), 1);
    assert_eq!(route_at(&switch, 2).resolutions(), 0);
}

#[test]
fn test_switch_fallback_inherits_match() {
    let (_channel, controller) = mounted("/missing");
    let switch = Switch::new()
        .with_route(Route::at("/x").with_children("x"))
        .with_route(Route::new().with_children("fallback"));

    let outcome = switch.resolve(Some(&controller.context())).unwrap();
    let route = outcome.route().unwrap();
    assert_eq!(route.output, Some("fallback"));
    assert_eq!(route.route_match(), Some(&controller.root_match()));
}

#[test]
fn test_switch_redirect_uses_from_and_params() {
    let (_channel, controller) = mounted("/old/7");
    let switch: Switch<&str> = Switch::new()
        .with_route(Route::at("/new/:id").with_children("new"))
        .with_redirect(Redirect::new("/new/:id").with_from("/old/:id").push());

    let outcome = switch.resolve(Some(&controller.context())).unwrap();
    assert_eq!(outcome.index(), Some(1));
    assert_eq!(
        outcome.redirect(),
        Some(&RedirectOutcome {
            location: Location::new("/new/7"),
            push: true,
        })
    );
}

#[test]
fn test_switch_redirect_with_absent_optional_param() {
    let (_channel, controller) = mounted("/old");
    let switch: Switch<&str> =
        Switch::new().with_redirect(Redirect::new("/users/:id?").with_from("/old/:id?"));

    let outcome = switch.resolve(Some(&controller.context())).unwrap();
    assert_eq!(
        outcome.redirect().map(|r| r.location.clone()),
        Some(Location::new("/users"))
    );

    let (_channel, controller) = mounted("/old/5");
    let outcome = switch.resolve(Some(&controller.context())).unwrap();
    assert_eq!(outcome.redirect().map(|r| r.location.pathname.as_str()), Some("/users/5"));
}

#[test]
fn test_switch_follows_location_changes() {
    let (channel, controller) = mounted("/a");
    let switch = Switch::new()
        .with_route(Route::at("/a").with_children("a"))
        .with_route(Route::at("/b").with_children("b"));

    assert_eq!(switch.resolve(Some(&controller.context())).unwrap().index(), Some(0));
    channel.emit("/b");
    assert_eq!(switch.resolve(Some(&controller.context())).unwrap().index(), Some(1));
}

// ============================================================================
// Controller
// ============================================================================

#[test]
fn test_controller_buffers_until_activation() {
    let channel = Rc::new(LocationChannel::new("/"));
    let controller = NavigationController::create(channel.clone());

    channel.emit("/first");
    channel.emit("/second");
    assert_eq!(controller.location().pathname, "/");
    assert_eq!(controller.pending_location().map(|l| l.pathname), Some("/second".to_string()));

    controller.activate();
    assert_eq!(controller.location().pathname, "/second");
    assert_eq!(controller.lifecycle(), Lifecycle::Mounted);

    channel.emit("/third");
    assert_eq!(controller.location().pathname, "/third");
}

#[test]
fn test_descendant_navigation_during_setup_is_kept() {
    let channel = Rc::new(LocationChannel::new("/"));
    let controller = NavigationController::create(channel.clone());

    let route = Route::at("/").with_render(|_| ());
    route.resolve(Some(&controller.context())).unwrap();
    channel.emit("/redirected");

    controller.activate();
    assert_eq!(controller.context().location().pathname, "/redirected");
}

#[test]
fn test_controller_config_disables_warnings() {
    let config = NavigatorConfig::parse("[diagnostics]\nwarnings = false\n").unwrap();
    let controller =
        NavigationController::with_config(Rc::new(LocationChannel::new("/")), &config);
    controller.activate();

    let route = Route::at("/")
        .with_component(Component::new("Home", |_| "component"))
        .with_render(|_| "render");
    let outcome = route.resolve(Some(&controller.context())).unwrap();
    assert_eq!(outcome.output, Some("component"));
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_root_match_shape() {
    let (channel, controller) = mounted("/");
    assert_eq!(controller.root_match().params.len(), 0);
    assert!(controller.root_match().is_exact);

    channel.emit("/deep/path");
    let root = controller.root_match();
    assert_eq!((root.pattern.as_str(), root.url.as_str(), root.is_exact), ("/", "/", false));
}

// ============================================================================
// Routes
// ============================================================================

#[test]
fn test_resolve_outside_controller_is_fatal() {
    let route: Route<()> = Route::at("/");
    assert!(matches!(route.resolve(None), Err(NavigatorError::OutsideController)));
}

#[rstest]
#[case("/a", Some(StrategyKind::ChildrenFunction), Some("fn:true"))]
#[case("/b", Some(StrategyKind::ChildrenFunction), Some("fn:false"))]
fn test_children_function_runs_regardless_of_match(
    #[case] pathname: &str,
    #[case] strategy: Option<StrategyKind>,
    #[case] output: Option<&str>,
) {
    let (_channel, controller) = mounted(pathname);
    let route = Route::at("/a")
        .with_children_fn(|ctx| {
            Some(if ctx.route_match().is_some() {
                "fn:true"
            } else {
                "fn:false"
            })
        })
        .with_render(|_| "render");

    let outcome = route.resolve(Some(&controller.context())).unwrap();
    assert_eq!(outcome.strategy, strategy);
    assert_eq!(outcome.output, output);
}

#[test]
fn test_no_output_without_match() {
    let (_channel, controller) = mounted("/b");
    let route = Route::at("/a")
        .with_children("children")
        .with_component(Component::new("A", |_| "component"));

    let outcome = route.resolve(Some(&controller.context())).unwrap();
    assert!(!outcome.is_match());
    assert_eq!(outcome.strategy, None);
    assert_eq!(outcome.output, None);
}

#[test]
fn test_render_priority_and_conflict_warnings() {
    let (_channel, controller) = mounted("/a");
    let route = Route::at("/a")
        .with_component(Component::new("A", |_| "component"))
        .with_render(|_| "render");

    let outcome = route.resolve(Some(&controller.context())).unwrap();
    assert_eq!(outcome.strategy, Some(StrategyKind::NamedComponent));
    assert_eq!(outcome.output, Some("component"));
    assert_eq!(
        outcome.warnings,
        vec![Warning::RenderIgnored {
            kept: StrategyKind::NamedComponent,
            ignored: StrategyKind::RenderFunction,
        }]
    );
}

#[test]
fn test_nested_routes_inherit_and_narrow() {
    let (_channel, controller) = mounted("/users/9/settings");

    let users = Route::at("/users").with_render(|ctx| ctx.route_match().map(|m| m.url.clone()));
    let outer = users.resolve(Some(&controller.context())).unwrap();
    assert_eq!(outer.output, Some(Some("/users".to_string())));

    let pathless: Route<Option<String>> =
        Route::new().with_render(|ctx| ctx.route_match().map(|m| m.url.clone()));
    let inherited = pathless.resolve(Some(&outer.context)).unwrap();
    assert_eq!(inherited.output, Some(Some("/users".to_string())));

    let detail: Route<Option<String>> =
        Route::at("/users/:id").with_render(|ctx| ctx.param("id").map(str::to_string));
    let inner = detail.resolve(Some(&inherited.context)).unwrap();
    assert_eq!(inner.output, Some(Some("9".to_string())));
    assert!(!inner.route_match().unwrap().is_exact);
}

#[test]
fn test_route_location_override() {
    let (_channel, controller) = mounted("/real");
    let route = Route::at("/virtual")
        .with_location("/virtual?x=1")
        .with_render(|ctx| ctx.location().search.clone());

    let outcome = route.resolve(Some(&controller.context())).unwrap();
    assert_eq!(outcome.output, Some("?x=1".to_string()));
}

#[test]
fn test_route_location_toggle_warns() {
    let (_channel, controller) = mounted("/a");
    let mut route: Route<()> = Route::at("/a").with_render(|_| ());

    assert!(route.resolve(Some(&controller.context())).unwrap().warnings.is_empty());

    route.set_location(Some(Location::new("/a")));
    let outcome = route.resolve(Some(&controller.context())).unwrap();
    assert_eq!(
        outcome.warnings,
        vec![Warning::LocationControlToggled {
            element: Element::Route,
            now_controlled: true,
        }]
    );
    assert_eq!(route.resolutions(), 2);
}

#[test]
fn test_standalone_redirect() {
    let (_channel, controller) = mounted("/anywhere");
    let outcome = Redirect::new("/login#top").resolve(Some(&controller.context())).unwrap();
    assert_eq!(outcome.location.pathname, "/login");
    assert_eq!(outcome.location.hash, "#top");
    assert!(!outcome.push);
}
