//! Advisory warnings
//!
//! Warnings never change resolution. They are collected on the outcome that
//! produced them and logged through `tracing` when diagnostics are enabled.

use std::fmt;

use thiserror::Error;

use crate::config::NavigatorConfig;
use crate::route::StrategyKind;

/// Which declaration kind a drift warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Route,
    Switch,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Route => f.write_str("route"),
            Element::Switch => f.write_str("switch"),
        }
    }
}

/// A non-fatal misuse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// Two mutually exclusive render strategies on one declaration
    #[error("route declares both {kept} and {ignored}; {ignored} will be ignored")]
    RenderIgnored {
        kept: StrategyKind,
        ignored: StrategyKind,
    },

    /// A location override appeared or disappeared between resolutions
    #[error(
        "{element} changed from {} to {}; a location override should be set for the whole lifetime or never",
        previous_control(.now_controlled),
        current_control(.now_controlled)
    )]
    LocationControlToggled { element: Element, now_controlled: bool },

    /// The controller was handed a different history backend
    #[error("the navigation backend of a controller cannot change; keeping the original")]
    HistoryChanged,
}

fn current_control(now_controlled: &bool) -> &'static str {
    if *now_controlled {
        "controlled"
    } else {
        "uncontrolled"
    }
}

fn previous_control(now_controlled: &bool) -> &'static str {
    current_control(&!*now_controlled)
}

/// Switch for emitting warnings
///
/// Enabled by default only in debug builds, so release builds skip the
/// checks entirely unless configuration turns them back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self {
            enabled: config.diagnostics.warnings,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs `warning` and records it in `sink`
    pub fn report(&self, sink: &mut Vec<Warning>, warning: Warning) {
        if !self.enabled {
            return;
        }
        tracing::warn!(target: "rhtmx_navigator", "{}", warning);
        sink.push(warning);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
        }
    }
}
