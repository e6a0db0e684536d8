//! User settings for labelpress
//!
//! Settings live in a flat `key: value` text file inside the config
//! directory. Lines starting with `#` are comments; unknown keys are
//! ignored so old config files keep working.

use std::path::{Path, PathBuf};

use super::paths::LabelPaths;
use crate::error::{LabelError, LabelResult};
use crate::storage::file_io;

/// Where a rendered label body is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrinterType {
    /// A printer shared by another host, spooled through the system
    Shared,
    /// A locally attached printer, spooled through the system
    Local,
    /// A network printer reached over raw TCP
    Network,
    /// Print to the screen instead of a printer (default)
    #[default]
    Screen,
}

impl PrinterType {
    /// Parse a printer type from a config value
    ///
    /// Accepts both words and the numeric codes used by older config files
    /// (0 = shared, 1 = local, 2 = network, 3 = screen). Anything else
    /// falls back to screen output.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" | "shared" => Self::Shared,
            "1" | "local" => Self::Local,
            "2" | "network" => Self::Network,
            _ => Self::Screen,
        }
    }

    /// The config-file spelling of this printer type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Local => "local",
            Self::Network => "network",
            Self::Screen => "screen",
        }
    }
}

impl std::fmt::Display for PrinterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default clamp for the `<pocet>` quantity token
pub const DEFAULT_MAX_QUANTITY: u32 = 50;

/// User settings for labelpress
#[derive(Debug, Clone)]
pub struct Settings {
    /// IP address or host name of the printer
    pub printer_address: String,

    /// Where rendered bodies are sent
    pub printer_type: PrinterType,

    /// Directory with label template files (empty = config directory)
    pub templates_dir: String,

    /// Substring filter applied to template names at startup
    pub filter: String,

    /// Print the first matching template and exit
    pub print_one_file: bool,

    /// Require user identification at startup; gates the `<uzivatel>` token
    pub login: bool,

    /// Path to the primary data file (empty = no primary data)
    pub primary_data: String,

    /// Master template path for single-template mode (empty = directory mode)
    pub master_template: String,

    /// Input rows for master mode
    pub master_data: String,

    /// Print journal location (empty = journal disabled)
    pub log_file: String,

    /// Maximum label count one fill may request
    pub max_quantity: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            printer_address: String::new(),
            printer_type: PrinterType::Screen,
            templates_dir: String::new(),
            filter: String::new(),
            print_one_file: false,
            login: false,
            primary_data: String::new(),
            master_template: String::new(),
            master_data: String::new(),
            log_file: String::new(),
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

impl Settings {
    /// Parse settings from config file content
    ///
    /// Unknown keys are ignored; missing keys keep their defaults.
    pub fn parse_content(content: &str) -> Self {
        let mut settings = Settings::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "printer_address" => settings.printer_address = value.to_string(),
                "printer_type" => settings.printer_type = PrinterType::parse(value),
                "templates_dir" => settings.templates_dir = value.to_string(),
                "filter" => settings.filter = value.to_string(),
                "print_one_file" => settings.print_one_file = parse_bool(value),
                "login" => settings.login = parse_bool(value),
                "primary_data" => settings.primary_data = value.to_string(),
                "master_template" => settings.master_template = value.to_string(),
                "master_data" => settings.master_data = value.to_string(),
                "log_file" => settings.log_file = value.to_string(),
                "max_quantity" => {
                    settings.max_quantity = value.parse().unwrap_or(DEFAULT_MAX_QUANTITY)
                }
                _ => {}
            }
        }

        settings
    }

    /// Render the settings back into config file content
    ///
    /// Each key is preceded by a comment describing it, matching the layout
    /// of a freshly generated config file.
    pub fn to_content(&self) -> String {
        let entries: [(&str, String, &str); 11] = [
            (
                "printer_address",
                self.printer_address.clone(),
                "IP address or host name of the printer",
            ),
            (
                "printer_type",
                self.printer_type.to_string(),
                "printer type: shared, local, network or screen",
            ),
            (
                "templates_dir",
                self.templates_dir.clone(),
                "directory with label template files (empty = config directory)",
            ),
            (
                "filter",
                self.filter.clone(),
                "substring filter applied to template names",
            ),
            (
                "print_one_file",
                self.print_one_file.to_string(),
                "print the first matching template and exit",
            ),
            (
                "login",
                self.login.to_string(),
                "require user identification at startup",
            ),
            (
                "primary_data",
                self.primary_data.clone(),
                "path to the primary data file (key: value lines)",
            ),
            (
                "master_template",
                self.master_template.clone(),
                "template used in single-template mode",
            ),
            (
                "master_data",
                self.master_data.clone(),
                "input rows for single-template mode",
            ),
            (
                "log_file",
                self.log_file.clone(),
                "print journal location (empty = disabled)",
            ),
            (
                "max_quantity",
                self.max_quantity.to_string(),
                "maximum label count one fill may request",
            ),
        ];

        let mut content = String::new();
        for (key, value, description) in entries {
            content.push_str(&format!("# {}\n{}: {}\n", description, key, value));
        }
        content
    }

    /// Load settings from the named file in the config directory, creating a
    /// default config file on first run
    pub fn load_or_create(paths: &LabelPaths, file_name: &str) -> LabelResult<Self> {
        let settings_path = paths.config_file(file_name);

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LabelError::Io(format!("Failed to read config file: {}", e)))?;
            Ok(Self::parse_content(&contents))
        } else {
            let settings = Settings::default();
            settings.save(paths, file_name)?;
            Ok(settings)
        }
    }

    /// Save settings to the named file in the config directory
    pub fn save(&self, paths: &LabelPaths, file_name: &str) -> LabelResult<()> {
        paths.ensure_directories()?;

        let settings_path = paths.config_file(file_name);
        file_io::write_text_atomic(&settings_path, &self.to_content())
    }

    /// Resolve the templates directory, falling back to the config directory
    pub fn templates_dir(&self, paths: &LabelPaths) -> PathBuf {
        if self.templates_dir.is_empty() {
            paths.default_templates_dir()
        } else {
            Path::new(&self.templates_dir).to_path_buf()
        }
    }

    /// Whether templates come from a master template instead of a directory
    pub fn master_mode(&self) -> bool {
        !self.master_template.is_empty()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}
