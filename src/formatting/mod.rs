//! Human-readable rendering of counts, ages, and severities.
//!
//! The pure formatters (`compact`, `age_label`, ...) have no terminal
//! dependency. Color and emoji decisions live in [`FormattingConfig`] and
//! [`Painter`] and are only consulted by the terminal writer.

mod numbers;
mod recency;

pub use numbers::{compact, group_thousands, percent};
pub use recency::{age_label, format_timestamp, recency_label};

use crate::core::{AlertSeverity, RiskTier};
use crate::priority::ProbabilityBand;
use colored::{Color, Colorize};
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiMode {
    Auto,
    Always,
    Never,
}

impl EmojiMode {
    pub fn should_use_emoji(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattingConfig {
    pub color: ColorMode,
    pub emoji: EmojiMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            emoji: EmojiMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Check NO_COLOR environment variable (per no-color.org standard)
        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    /// ASCII-only, no colors, no emoji
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
            emoji: EmojiMode::Never,
        }
    }
}

/// Presentation color for each risk tier.
pub fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Medium => Color::Yellow,
        RiskTier::High => Color::TrueColor {
            r: 249,
            g: 115,
            b: 22,
        },
        RiskTier::Critical => Color::Red,
    }
}

/// Presentation color for each alert severity.
pub fn severity_color(severity: AlertSeverity) -> Color {
    match severity {
        AlertSeverity::Info => Color::Blue,
        AlertSeverity::Medium => Color::Yellow,
        AlertSeverity::High => Color::TrueColor {
            r: 249,
            g: 115,
            b: 22,
        },
        AlertSeverity::Critical => Color::Red,
    }
}

pub fn band_color(band: ProbabilityBand) -> Color {
    match band {
        ProbabilityBand::Unlikely => Color::Green,
        ProbabilityBand::Possible => Color::Yellow,
        ProbabilityBand::Elevated => Color::TrueColor {
            r: 249,
            g: 115,
            b: 22,
        },
        ProbabilityBand::Likely => Color::Red,
    }
}

/// Applies [`FormattingConfig`] to text.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
    emoji: bool,
}

impl Painter {
    pub fn new(config: FormattingConfig) -> Self {
        Self {
            color: config.color.should_use_color(),
            emoji: config.emoji.should_use_emoji(),
        }
    }

    pub fn uses_color(&self) -> bool {
        self.color
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn tier(&self, tier: RiskTier) -> String {
        self.paint(tier.label(), tier_color(tier))
    }

    pub fn severity(&self, severity: AlertSeverity) -> String {
        let label = severity.as_str().to_uppercase();
        self.paint(&label, severity_color(severity))
    }

    pub fn header(&self, text: &str) -> String {
        if self.color {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn emoji<'a>(&self, emoji: &'a str, fallback: &'a str) -> &'a str {
        if self.emoji {
            emoji
        } else {
            fallback
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
