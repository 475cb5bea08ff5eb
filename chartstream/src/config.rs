use chartstream_core::{RenderConfig, Viewport};

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// Replay settings, loaded from user preferences or an explicit path.
/// Missing keys take their defaults.
#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Bytes offered to the engine on the first attempt of each pass.
    pub initial_capacity: usize,
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    /// Area the demo chart is laid out in.
    pub viewport: Viewport,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_capacity: RenderConfig::default().initial_capacity,
            log_level: "info".to_owned(),
            viewport: Viewport::from_size(640.0, 360.0),
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "replay.toml";
    /// Load from `path`, or from the preferences dir if `None`.
    /// Never fails - unreadable settings are reported and defaulted.
    #[must_use]
    pub fn load(path: Option<&std::path::Path>) -> Self {
        if let Some(path) = path {
            return Self::load_or_default(path);
        }
        match preferences_dir() {
            None => {
                log::warn!("No preferences dir, using default settings.");
                Self::default()
            }
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                if dir.exists() {
                    Self::load_or_default(&dir)
                } else {
                    log::debug!("{} not found, using default settings", dir.display());
                    Self::default()
                }
            }
        }
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let settings : Self = toml::from_str(&string)?;

            Ok(settings)
        };
        match settings {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to load {}, using defaults:\n{e:#}", path.display());
                Self::default()
            }
        }
    }
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            initial_capacity: self.initial_capacity,
        }
    }
    /// Parsed `log_level`, falling back to `Info` if unrecognized.
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level {:?}", self.log_level);
            log::LevelFilter::Info
        })
    }
}

#[cfg(test)]
mod test {
    use super::Settings;

    #[test]
    fn partial_file() {
        let settings: Settings = toml::from_str(
            r#"
            initial_capacity = 4096

            [viewport]
            width = 100.0
            height = 50.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.initial_capacity, 4096);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.viewport.width, 100.0);
        assert_eq!(settings.viewport.x, 0.0);
        assert_eq!(settings.render_config().initial_capacity, 4096);
    }

    #[test]
    fn empty_file_is_default() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn unreadable_path_defaults() {
        let settings = Settings::load(Some(std::path::Path::new(
            "this/path/does/not/exist/replay.toml",
        )));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn level_filter() {
        let mut settings = Settings::default();
        settings.log_level = "Trace".to_owned();
        assert_eq!(settings.level_filter(), log::LevelFilter::Trace);
        settings.log_level = "loud".to_owned();
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
    }
}
