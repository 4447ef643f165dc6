//! Saving and loading the app settings, currently just the colour theme.

use std::{env, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, SETTINGS_KEY, save};

/// The user's app settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// Whether to use the dark colour theme.
    pub dark_mode: bool,
}

impl AppSettings {
    /// The colour theme for these settings.
    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// A partial [AppSettings] for changing only some settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    /// The new value for [AppSettings::dark_mode], if it should change.
    pub dark_mode: Option<bool>,
}

/// The colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Dark text on a light background.
    Light,
    /// Light text on a dark background.
    Dark,
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// The app settings, persisted to a [KeyValueStore] on every change.
#[derive(Debug)]
pub struct Settings<S> {
    store: S,
    settings: AppSettings,
}

impl<S: KeyValueStore> Settings<S> {
    /// Load the settings from `store`.
    ///
    /// Saved settings are merged over the defaults so that settings added
    /// later get their default value. If nothing has been saved yet,
    /// `system_prefers_dark` decides the theme. Saved settings that cannot be
    /// parsed are logged and replaced by the defaults.
    pub fn load(store: S, system_prefers_dark: bool) -> Self {
        let settings = match store.get(SETTINGS_KEY) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|error| {
                tracing::warn!("Failed to parse saved settings, using defaults: {error}");
                AppSettings::default()
            }),
            Ok(None) => AppSettings {
                dark_mode: system_prefers_dark,
            },
            Err(error) => {
                tracing::error!("Could not read settings from storage: {error}");
                AppSettings::default()
            }
        };

        Self { store, settings }
    }

    /// The current settings.
    pub fn get(&self) -> AppSettings {
        self.settings
    }

    /// Change the settings set in `patch` and save them.
    pub fn update(&mut self, patch: SettingsPatch) {
        if let Some(dark_mode) = patch.dark_mode {
            self.settings.dark_mode = dark_mode;
        }

        if let Err(error) = save(&self.store, SETTINGS_KEY, &self.settings) {
            tracing::error!("Could not save settings: {error}");
        }
    }

    /// Switch between the light and dark themes and return the new theme.
    pub fn toggle_dark_mode(&mut self) -> Theme {
        self.update(SettingsPatch {
            dark_mode: Some(!self.settings.dark_mode),
        });

        self.settings.theme()
    }
}

/// Guess whether the terminal uses a dark background.
///
/// Reads the `COLORFGBG` environment variable (e.g. `15;0`) set by many
/// terminal emulators, where the last number is the background colour.
pub fn system_prefers_dark() -> bool {
    env::var("COLORFGBG")
        .map(|value| is_dark_background(&value))
        .unwrap_or(false)
}

fn is_dark_background(colorfgbg: &str) -> bool {
    colorfgbg
        .rsplit(';')
        .next()
        .and_then(|background| background.trim().parse::<u8>().ok())
        .is_some_and(|background| matches!(background, 0..=6 | 8))
}
