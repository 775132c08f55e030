//! Accordion configuration system
//!
//! This crate provides the option set recognised by the accordion widget,
//! loading settings from `accordion.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// The settings file is not valid TOML for [`Settings`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// `panel_width` must be a percentage in `(0, 100]`.
    #[error("panel_width must be within (0, 100], got {0}")]
    PanelWidth(f64),

    /// A class name option is empty or contains whitespace.
    #[error("option `{option}` is not a usable class name: {value:?}")]
    ClassName { option: &'static str, value: String },

    /// An id prefix or tag option is empty.
    #[error("option `{0}` must not be empty")]
    Empty(&'static str),

    /// A slide duration is negative or not finite.
    #[error("option `{option}` has an invalid duration: {value}")]
    Duration { option: &'static str, value: f32 },
}

/// Top-level settings file (`accordion.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Widget options
    pub accordion: AccordionConfig,
    /// Demo binary settings
    pub demo: DemoConfig,
}

/// Demo binary configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DemoConfig {
    /// HTML file containing the accordion markup
    pub markup: Option<PathBuf>,
    /// Id of the container element; the first `div` child of the root is used when absent
    pub container: Option<String>,
    /// Scripted interactions, e.g. `click:0`, `key:1:ArrowDown`, `tick:400`, `resize`
    pub script: Vec<String>,
}

/// Resolved accordion options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccordionConfig {
    /// Hide the active control from the tab order and disallow closing
    pub active_control_hidden: bool,
    /// 0-based index of the panel opened at initialization
    pub default_panel: Option<usize>,
    /// Class applied to the container
    pub container_class: String,
    /// Class applied to the container in horizontal mode
    pub container_class_horizontal: String,
    /// Lay panels out side by side as tabs
    pub horizontal: bool,
    /// Tag of the direct children treated as panels
    pub panel_container_tag: String,
    /// Optional class a panel child must carry
    pub panel_container_class: Option<String>,
    /// Class applied to each panel
    pub panel_class: String,
    /// Prefix for generated panel ids
    pub panel_id: String,
    /// Class applied to each control
    pub panel_control_class: String,
    /// Class applied to the pressed control
    pub panel_control_active_class: String,
    /// Class applied to the tab-hidden control (horizontal + active_control_hidden)
    pub panel_control_hidden_class: String,
    /// Prefix for generated control ids
    pub panel_control_id: String,
    /// Class applied to synthesized panel headings
    pub panel_title_class: String,
    /// Panel width in percent (horizontal mode)
    pub panel_width: f64,
    /// Scroll the viewport onto the opened panel's control
    pub scroll_to_panel: bool,
    /// Scroll to the panel body instead of its control
    pub scroll_to_anchor: bool,
    /// Scroll animation duration in milliseconds
    pub scroll_to_panel_speed: u32,
    /// Animate panel reveal
    pub slide_down: bool,
    pub slide_down_options: SlideOptions,
    /// Animate panel collapse
    pub slide_up: bool,
    pub slide_up_options: SlideOptions,
    /// Decorative open/close indicators
    pub state_indicators: StateIndicatorConfig,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            active_control_hidden: false,
            default_panel: None,
            container_class: "js-accordion".to_string(),
            container_class_horizontal: "js-accordion--horizontal".to_string(),
            horizontal: false,
            panel_container_tag: "div".to_string(),
            panel_container_class: None,
            panel_class: "js-accordion_panel".to_string(),
            panel_id: "js-accordion_panel--".to_string(),
            panel_control_class: "js-accordion_control".to_string(),
            panel_control_active_class: "js-accordion_control--active".to_string(),
            panel_control_hidden_class: "js-accordion_control--hidden".to_string(),
            panel_control_id: "js-accordion_control--".to_string(),
            panel_title_class: "js-accordion_panel-title".to_string(),
            panel_width: 33.0,
            scroll_to_panel: false,
            scroll_to_anchor: false,
            scroll_to_panel_speed: 200,
            slide_down: false,
            slide_down_options: SlideOptions::default(),
            slide_up: false,
            slide_up_options: SlideOptions::default(),
            state_indicators: StateIndicatorConfig::default(),
        }
    }
}

/// Timing for a slide animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideOptions {
    pub duration_ms: f32,
    pub easing: SlideEasing,
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self {
            duration_ms: 400.0,
            easing: SlideEasing::Swing,
        }
    }
}

/// Named easing curves accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideEasing {
    Swing,
    Linear,
    Ease,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Default for SlideEasing {
    fn default() -> Self {
        SlideEasing::Swing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StateIndicatorConfig {
    pub elements: IndicatorElements,
}

impl StateIndicatorConfig {
    /// Indicators are only rendered when both templates are supplied.
    pub fn enabled(&self) -> bool {
        !self.elements.open.is_empty() && !self.elements.close.is_empty()
    }
}

/// Indicator templates (HTML fragments) and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorElements {
    pub class_name: String,
    pub open: String,
    pub close: String,
    pub position: IndicatorPosition,
}

impl Default for IndicatorElements {
    fn default() -> Self {
        Self {
            class_name: "js-accordion-state-indicator".to_string(),
            open: String::new(),
            close: String::new(),
            position: IndicatorPosition::After,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorPosition {
    /// Appended as the control's last child
    After,
    /// Prepended as the control's first child
    Before,
}

impl Default for IndicatorPosition {
    fn default() -> Self {
        IndicatorPosition::After
    }
}

impl AccordionConfig {
    /// Check option values the widget cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.panel_width.is_finite() || self.panel_width <= 0.0 || self.panel_width > 100.0 {
            return Err(ConfigError::PanelWidth(self.panel_width));
        }

        let classes = [
            ("container_class", &self.container_class),
            ("container_class_horizontal", &self.container_class_horizontal),
            ("panel_class", &self.panel_class),
            ("panel_control_class", &self.panel_control_class),
            ("panel_control_active_class", &self.panel_control_active_class),
            ("panel_control_hidden_class", &self.panel_control_hidden_class),
            ("panel_title_class", &self.panel_title_class),
            (
                "state_indicators.elements.class_name",
                &self.state_indicators.elements.class_name,
            ),
        ];
        for (option, value) in classes {
            check_class_name(option, value)?;
        }
        if let Some(class) = &self.panel_container_class {
            check_class_name("panel_container_class", class)?;
        }

        if self.panel_id.is_empty() {
            return Err(ConfigError::Empty("panel_id"));
        }
        if self.panel_control_id.is_empty() {
            return Err(ConfigError::Empty("panel_control_id"));
        }
        if self.panel_container_tag.is_empty() {
            return Err(ConfigError::Empty("panel_container_tag"));
        }

        check_duration("slide_down_options.duration_ms", self.slide_down_options.duration_ms)?;
        check_duration("slide_up_options.duration_ms", self.slide_up_options.duration_ms)?;
        Ok(())
    }
}

fn check_class_name(option: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::ClassName {
            option,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn check_duration(option: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Duration { option, value });
    }
    Ok(())
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|val| val == "1" || val.eq_ignore_ascii_case("true"))
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load settings from `accordion.toml` in the current directory,
    /// or return defaults if the file doesn't exist or doesn't parse
    pub fn load_or_default() -> Self {
        Self::load_from_file("accordion.toml").unwrap_or_default()
    }

    /// Merge settings with environment variables
    ///
    /// Environment variables take precedence over file values.
    pub fn merge_with_env(&mut self) {
        if let Some(flag) = env_flag("ACCORDION_HORIZONTAL") {
            self.accordion.horizontal = flag;
        }
        if let Some(flag) = env_flag("ACCORDION_ACTIVE_CONTROL_HIDDEN") {
            self.accordion.active_control_hidden = flag;
        }
        if let Ok(val) = std::env::var("ACCORDION_DEFAULT_PANEL") {
            if val.eq_ignore_ascii_case("none") || val.is_empty() {
                self.accordion.default_panel = None;
            } else if let Ok(index) = val.parse::<usize>() {
                self.accordion.default_panel = Some(index);
            }
        }
        if let Ok(val) = std::env::var("ACCORDION_PANEL_WIDTH") {
            if let Ok(width) = val.parse::<f64>() {
                self.accordion.panel_width = width;
            }
        }
        if let Some(flag) = env_flag("ACCORDION_SLIDE") {
            self.accordion.slide_down = flag;
            self.accordion.slide_up = flag;
        }
        if let Ok(path) = std::env::var("ACCORDION_MARKUP") {
            self.demo.markup = Some(PathBuf::from(path));
        }
    }

    /// Load settings with environment variable overrides
    ///
    /// 1. Load from accordion.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut settings = Self::load_or_default();
        settings.merge_with_env();
        settings
    }
}
