//! Engine timing and curve configuration (parsed from TOML)

use bubble_core::{BubbleError, Result};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Timing, scale, opacity and drift settings shared by every bubble of an engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleConfig {
    /// Total lifetime of one bubble
    pub duration_ms: u32,
    /// Tick period
    pub step_ms: u32,
    pub scale_init: f32,
    pub scale_target: f32,
    pub alpha_init: u8,
    pub alpha_target: u8,
    /// Horizontal drift, in multiples of the bubble width
    pub horizontal_offset: f32,
    /// Vertical drift, in multiples of the bubble height
    pub vertical_offset: f32,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            step_ms: 30,
            scale_init: 0.3,
            scale_target: 1.3,
            alpha_init: 255,
            alpha_target: 0,
            horizontal_offset: 2.0,
            vertical_offset: 2.0,
        }
    }
}

impl BubbleConfig {
    /// Parse from a TOML table. Unknown or mistyped keys keep their defaults.
    ///
    /// Keys may sit at the top level or under a `[bubble]` table.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let table = table
            .get("bubble")
            .and_then(|v| v.as_table())
            .unwrap_or(table);
        let mut config = Self::default();

        if let Some(v) = table.get("duration_ms") {
            config.duration_ms = toml_u32(v, config.duration_ms);
        }
        if let Some(v) = table.get("step_ms") {
            config.step_ms = toml_u32(v, config.step_ms);
        }
        if let Some(v) = table.get("scale_init") {
            config.scale_init = toml_f32(v, config.scale_init);
        }
        if let Some(v) = table.get("scale_target") {
            config.scale_target = toml_f32(v, config.scale_target);
        }
        if let Some(v) = table.get("alpha_init") {
            config.alpha_init = toml_u8(v, config.alpha_init);
        }
        if let Some(v) = table.get("alpha_target") {
            config.alpha_target = toml_u8(v, config.alpha_target);
        }
        if let Some(v) = table.get("horizontal_offset") {
            config.horizontal_offset = toml_f32(v, config.horizontal_offset);
        }
        if let Some(v) = table.get("vertical_offset") {
            config.vertical_offset = toml_f32(v, config.vertical_offset);
        }

        config
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(source)?;
        let config = Self::from_toml(&table);
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), ?config, "loaded bubble config");
        Ok(config)
    }

    /// Render as a TOML document under a `[bubble]` table
    pub fn to_toml_string(&self) -> Result<String> {
        let mut root = toml::value::Table::new();
        let value = toml::Value::try_from(self)
            .map_err(|e| BubbleError::Config(e.to_string()))?;
        root.insert("bubble".to_string(), value);
        toml::to_string_pretty(&root).map_err(|e| BubbleError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_ms == 0 {
            return Err(BubbleError::Config("duration_ms must be positive".into()));
        }
        if self.step_ms == 0 || self.step_ms > self.duration_ms {
            return Err(BubbleError::ValueOutOfRange {
                field: "step_ms".into(),
                min: 1.0,
                max: self.duration_ms as f64,
                value: self.step_ms as f64,
            });
        }
        if !self.scale_init.is_finite() || !self.scale_target.is_finite() {
            return Err(BubbleError::Config("scale range must be finite".into()));
        }
        if self.scale_init > self.scale_target {
            return Err(BubbleError::Config(format!(
                "scale_init ({}) must not exceed scale_target ({})",
                self.scale_init, self.scale_target
            )));
        }
        if self.alpha_target > self.alpha_init {
            return Err(BubbleError::Config(format!(
                "alpha_target ({}) must not exceed alpha_init ({})",
                self.alpha_target, self.alpha_init
            )));
        }
        for (field, value) in [
            ("horizontal_offset", self.horizontal_offset),
            ("vertical_offset", self.vertical_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BubbleError::Config(format!(
                    "{field} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Start of the fade phase
    pub fn half_duration_ms(&self) -> u32 {
        self.duration_ms / 2
    }

    /// The tick on which a bubble's age first exceeds its lifetime and it is evicted
    pub fn eviction_tick(&self) -> u32 {
        self.duration_ms / self.step_ms + 1
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_u32(v: &toml::Value, default: u32) -> u32 {
    v.as_integer()
        .and_then(|i| u32::try_from(i).ok())
        .unwrap_or(default)
}

fn toml_u8(v: &toml::Value, default: u8) -> u8 {
    v.as_integer()
        .map(|i| i.clamp(0, u8::MAX as i64) as u8)
        .unwrap_or(default)
}
