//! Colour-scheme settings for the HTML views.
//!
//! The explicit preference and the last reported system scheme live in one
//! [`ThemeSettings`] object that is passed to whoever renders; the resolved scheme is
//! published on a `watch` channel so subscribers learn about changes from either source.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub const fn resolve(self, system: ColorScheme) -> ColorScheme {
        match self {
            Self::Light => ColorScheme::Light,
            Self::Dark => ColorScheme::Dark,
            Self::System => system,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme preference `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// CSS colours for one scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
}

impl ColorScheme {
    pub const fn palette(self) -> Palette {
        match self {
            Self::Light => Palette {
                background: "#f8fafc",
                surface: "#ffffff",
                text: "#0f172a",
                muted: "#64748b",
                border: "#e2e8f0",
                accent: "#0056ff",
            },
            Self::Dark => Palette {
                background: "#0b1120",
                surface: "#111827",
                text: "#e2e8f0",
                muted: "#94a3b8",
                border: "#1f2937",
                accent: "#4d8dff",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeSnapshot {
    pub preference: ThemePreference,
    pub system: ColorScheme,
    pub resolved: ColorScheme,
}

#[derive(Debug, Clone, Copy)]
struct ThemeState {
    preference: ThemePreference,
    system: ColorScheme,
}

#[derive(Debug)]
pub struct ThemeSettings {
    state: Mutex<ThemeState>,
    sender: watch::Sender<ColorScheme>,
}

impl ThemeSettings {
    pub fn new(preference: ThemePreference, system: ColorScheme) -> Self {
        let (sender, _) = watch::channel(preference.resolve(system));
        Self {
            state: Mutex::new(ThemeState { preference, system }),
            sender,
        }
    }

    pub fn resolved(&self) -> ColorScheme {
        *self.sender.borrow()
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        let state = *self.state.lock().unwrap_or_else(PoisonError::into_inner);
        ThemeSnapshot {
            preference: state.preference,
            system: state.system,
            resolved: state.preference.resolve(state.system),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ColorScheme> {
        self.sender.subscribe()
    }

    pub fn set_preference(&self, preference: ThemePreference) -> ColorScheme {
        self.update(|state| state.preference = preference)
    }

    /// Record a change of the operating-system scheme reported by a client.
    pub fn system_changed(&self, system: ColorScheme) -> ColorScheme {
        self.update(|state| state.system = system)
    }

    fn update(&self, change: impl FnOnce(&mut ThemeState)) -> ColorScheme {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut state);
        let next = state.preference.resolve(state.system);

        let changed = self.sender.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            info!(preference = %state.preference, resolved = ?next, "theme changed");
        }
        next
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::new(ThemePreference::System, ColorScheme::Light)
    }
}
