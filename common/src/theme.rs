use std::fmt;

/// Local-storage key holding the saved preference.
pub const THEME_KEY: &str = "theme";

/// Class toggled on the document root when dark mode is on.
pub const DARK_CLASS: &str = "theme-dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// A saved `"dark"`/`"light"` wins; otherwise follow the platform hint.
    pub fn resolve(saved: Option<&str>, prefers_dark: bool) -> Self {
        match saved.map(str::trim) {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ if prefers_dark => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
