use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, RwLock};

use configparser::ini::Ini;
use lazy_static::lazy_static;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use thiserror::Error;

pub const CONFIG_FILE: &str = "bruce-app.ini";

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("[{section}] {key}: expected an unsigned integer, got {value:?}")]
    InvalidNumber {
        section: String,
        key: String,
        value: String,
    },

    #[error("[{section}] {key}: unknown color {value:?}")]
    InvalidColor {
        section: String,
        key: String,
        value: String,
    },

    #[error("[log] level: unknown level {0:?}")]
    InvalidLevel(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// An opaque RGB color as written in the `[style]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const PURPLE: Rgb = Rgb(0x80, 0x00, 0x80);
    pub const GRAY: Rgb = Rgb(0x80, 0x80, 0x80);

    /// Accepts `#rrggbb` or a handful of CSS color names.
    pub fn parse(value: &str) -> Option<Rgb> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some(Rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        match value.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "purple" => Some(Self::PURPLE),
            "gray" | "grey" => Some(Self::GRAY),
            "red" => Some(Rgb(0xFF, 0x00, 0x00)),
            "green" => Some(Rgb(0x00, 0x80, 0x00)),
            "blue" => Some(Rgb(0x00, 0x00, 0xFF)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    pub path: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub background: Rgb,
    pub label_text: Rgb,
    pub button_text: Rgb,
    pub button_background: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Console only unless `[log] file` is set.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub image: ImageConfig,
    pub style: StyleConfig,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig {
                title: "Bruce app".to_string(),
                width: 400,
                height: 300,
            },
            image: ImageConfig {
                path: PathBuf::from("assets/bruce_menu.jpg"),
                max_width: 400,
                max_height: 200,
            },
            style: StyleConfig {
                background: Rgb::BLACK,
                label_text: Rgb::WHITE,
                button_text: Rgb::PURPLE,
                button_background: Rgb::GRAY,
            },
            log: LogConfig {
                level: LevelFilter::Info,
                file: None,
            },
        }
    }
}

impl AppConfig {
    /// Reads an ini file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse_named(&text, &path.display().to_string())
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::parse_named(text, "<string>")
    }

    fn parse_named(text: &str, name: &str) -> Result<Self, ConfigError> {
        let mut ini = Ini::new();
        // `#` starts a color value, not a comment.
        ini.set_comment_symbols(&[';']);
        ini.read(text.to_string())
            .map_err(|reason| ConfigError::Load {
                path: name.to_string(),
                reason,
            })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(title) = ini.get("window", "title") {
            config.window.title = title;
        }
        read_u32(ini, "window", "width", &mut config.window.width)?;
        read_u32(ini, "window", "height", &mut config.window.height)?;

        if let Some(path) = ini.get("image", "path") {
            config.image.path = PathBuf::from(path);
        }
        read_u32(ini, "image", "max_width", &mut config.image.max_width)?;
        read_u32(ini, "image", "max_height", &mut config.image.max_height)?;

        read_color(ini, "background", &mut config.style.background)?;
        read_color(ini, "label_text", &mut config.style.label_text)?;
        read_color(ini, "button_text", &mut config.style.button_text)?;
        read_color(ini, "button_background", &mut config.style.button_background)?;

        if let Some(level) = ini.get("log", "level") {
            config.log.level =
                LevelFilter::from_str(level.trim()).map_err(|_| ConfigError::InvalidLevel(level))?;
        }
        if let Some(file) = ini.get("log", "file") {
            config.log.file = Some(PathBuf::from(file));
        }

        Ok(config)
    }
}

fn read_u32(ini: &Ini, section: &str, key: &str, slot: &mut u32) -> Result<(), ConfigError> {
    let Some(value) = ini.get(section, key) else {
        return Ok(());
    };
    *slot = value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidNumber {
            section: section.to_string(),
            key: key.to_string(),
            value,
        })?;
    Ok(())
}

fn read_color(ini: &Ini, key: &str, slot: &mut Rgb) -> Result<(), ConfigError> {
    let Some(value) = ini.get("style", key) else {
        return Ok(());
    };
    *slot = Rgb::parse(&value).ok_or_else(|| ConfigError::InvalidColor {
        section: "style".to_string(),
        key: key.to_string(),
        value,
    })?;
    Ok(())
}

lazy_static! {
    static ref CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::default());
    static ref LOG_HANDLE: Mutex<Option<log4rs::Handle>> = Mutex::new(None);
}

/// Loads `bruce-app.ini` from the working directory and sets up logging.
///
/// A broken config file is reported on stderr and replaced by the defaults,
/// so the window is always shown.
pub fn init_config() {
    let config = match AppConfig::load(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{CONFIG_FILE}: {e}, using defaults");
            AppConfig::default()
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("{e}");
    }
    log::info!("config loaded: {:?}", config);

    match CONFIG.write() {
        Ok(mut global) => *global = config,
        Err(e) => log::error!("config lock poisoned: {}", e),
    }
}

pub fn get_config() -> AppConfig {
    CONFIG
        .read()
        .map(|config| config.clone())
        .unwrap_or_default()
}

/// Console logging, plus a file when one is configured. Calling it again
/// replaces the active config.
pub fn init_logging(log: &LogConfig) -> Result<(), ConfigError> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    let mut builder =
        Config::builder().appender(Appender::builder().build("console", Box::new(console)));
    let mut root = Root::builder().appender("console");

    if let Some(path) = &log.file {
        match FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(path)
        {
            Ok(file) => {
                builder = builder.appender(Appender::builder().build("file", Box::new(file)));
                root = root.appender("file");
            }
            Err(e) => eprintln!("cannot open log file {}: {}", path.display(), e),
        }
    }

    let config = builder
        .build(root.build(log.level))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    let mut handle = LOG_HANDLE
        .lock()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;
    match handle.as_ref() {
        Some(handle) => handle.set_config(config),
        None => {
            *handle =
                Some(log4rs::init_config(config).map_err(|e| ConfigError::Logging(e.to_string()))?)
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_fixed_window() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "Bruce app");
        assert_eq!((config.window.width, config.window.height), (400, 300));
        assert_eq!(config.image.path, PathBuf::from("assets/bruce_menu.jpg"));
        assert_eq!((config.image.max_width, config.image.max_height), (400, 200));
        assert_eq!(config.style.background, Rgb::BLACK);
        assert_eq!(config.style.button_text, Rgb::PURPLE);
        assert_eq!(config.style.button_background, Rgb::GRAY);
        assert_eq!(config.log.file, None);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.ini")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[Window]\nTitle = Bruce\nwidth = 640\n\n[style]\nbutton_text = #112233\n\n[log]\nlevel = debug"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.window.title, "Bruce");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 300);
        assert_eq!(config.style.button_text, Rgb(0x11, 0x22, 0x33));
        assert_eq!(config.style.button_background, Rgb::GRAY);
        assert_eq!(config.log.level, LevelFilter::Debug);
    }

    #[test]
    fn bad_number_is_rejected() {
        let err = AppConfig::parse("[image]\nmax_width = wide\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { ref key, .. } if key == "max_width"));
    }

    #[test]
    fn bad_color_is_rejected() {
        let err = AppConfig::parse("[style]\nbackground = #12345\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidColor { ref value, .. } if value == "#12345")
        );
    }

    #[test]
    fn hex_colors_survive_ini_parsing() {
        let config = AppConfig::parse(
            "; comment\n[style]\nbackground = #0A0b0C\nlabel_text = #ffffff\n[log]\nfile = app.log\n",
        )
        .unwrap();
        assert_eq!(config.style.background, Rgb(0x0A, 0x0B, 0x0C));
        assert_eq!(config.style.label_text, Rgb::WHITE);
        assert_eq!(config.log.file, Some(PathBuf::from("app.log")));
    }

    #[test]
    fn bad_level_is_rejected() {
        let err = AppConfig::parse("[log]\nlevel = loud\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));
    }

    #[test]
    fn color_names_and_hex() {
        assert_eq!(Rgb::parse("Purple"), Some(Rgb::PURPLE));
        assert_eq!(Rgb::parse("grey"), Some(Rgb::GRAY));
        assert_eq!(Rgb::parse(" #FFffFF "), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse("#gg0000"), None);
        assert_eq!(Rgb::parse("#+1+2+3"), None);
        assert_eq!(Rgb::parse("#ff00+1"), None);
        assert_eq!(Rgb::parse("teal"), None);
    }

    #[test]
    fn logging_can_be_reinitialized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("test.log");
        let default_log = AppConfig::default().log;

        assert!(default_log.file.is_none());
        init_logging(&default_log).unwrap();
        log::info!("console only");

        let log = LogConfig {
            level: LevelFilter::Debug,
            file: Some(path.clone()),
        };
        init_logging(&log).unwrap();
        log::debug!("logging reinitialized");
        assert!(path.exists());

        init_logging(&default_log).unwrap();
    }
}
