use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::view::{DEFAULT_STEP_COLUMNS, GlyphSet};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub ui: UiConfig,
    pub theme: ThemeConfig,
    pub report: ReportConfig,
    pub input: InputConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
    pub steps_columns: usize,
    pub bar_width: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeConfig {
    pub glyphs: GlyphSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    pub include_transcript: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputConfig {
    pub strict: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                color: true,
                steps_columns: DEFAULT_STEP_COLUMNS,
                bar_width: 24,
            },
            theme: ThemeConfig {
                glyphs: GlyphSet::Unicode,
            },
            report: ReportConfig {
                include_transcript: true,
            },
            input: InputConfig { strict: false },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    ui: Option<RawUiConfig>,
    theme: Option<RawThemeConfig>,
    report: Option<RawReportConfig>,
    input: Option<RawInputConfig>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
    steps_columns: Option<usize>,
    bar_width: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawThemeConfig {
    glyphs: Option<GlyphSet>,
}

#[derive(Debug, Deserialize)]
struct RawReportConfig {
    include_transcript: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawInputConfig {
    strict: Option<bool>,
}

pub fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("환경 변수 HOME이 설정되어 있지 않습니다"))
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/credview/config.toml")
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("설정 파일을 읽지 못했습니다: {}", path.display()))?;
        let raw: RawConfig =
            toml::from_str(&s).context("설정 파일(TOML)을 해석하지 못했습니다")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
        tracing::debug!(path = %path.display(), "config file applied");
    } else if config_path.is_some() {
        return Err(anyhow!("설정 파일이 존재하지 않습니다: {}", path.display()));
    }

    apply_env_overrides(&mut cfg)?;
    validate(&cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
        if let Some(steps_columns) = ui.steps_columns {
            cfg.ui.steps_columns = steps_columns;
        }
        if let Some(bar_width) = ui.bar_width {
            cfg.ui.bar_width = bar_width;
        }
    }

    if let Some(theme) = raw.theme {
        if let Some(glyphs) = theme.glyphs {
            cfg.theme.glyphs = glyphs;
        }
    }

    if let Some(report) = raw.report {
        if let Some(include_transcript) = report.include_transcript {
            cfg.report.include_transcript = include_transcript;
        }
    }

    if let Some(input) = raw.input {
        if let Some(strict) = input.strict {
            cfg.input.strict = strict;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("CREDVIEW_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "CREDVIEW_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("CREDVIEW_UI_STEPS_COLUMNS") {
        cfg.ui.steps_columns = v
            .trim()
            .parse::<usize>()
            .with_context(|| "CREDVIEW_UI_STEPS_COLUMNS")?;
    }
    if let Ok(v) = std::env::var("CREDVIEW_UI_BAR_WIDTH") {
        cfg.ui.bar_width = v
            .trim()
            .parse::<usize>()
            .with_context(|| "CREDVIEW_UI_BAR_WIDTH")?;
    }
    if let Ok(v) = std::env::var("CREDVIEW_THEME_GLYPHS") {
        cfg.theme.glyphs = v
            .parse::<GlyphSet>()
            .map_err(anyhow::Error::msg)
            .with_context(|| "CREDVIEW_THEME_GLYPHS")?;
    }
    if let Ok(v) = std::env::var("CREDVIEW_REPORT_INCLUDE_TRANSCRIPT") {
        cfg.report.include_transcript =
            parse_bool(&v).with_context(|| "CREDVIEW_REPORT_INCLUDE_TRANSCRIPT")?;
    }
    if let Ok(v) = std::env::var("CREDVIEW_INPUT_STRICT") {
        cfg.input.strict = parse_bool(&v).with_context(|| "CREDVIEW_INPUT_STRICT")?;
    }

    Ok(())
}

fn validate(cfg: &EffectiveConfig) -> Result<()> {
    if cfg.ui.steps_columns == 0 {
        return Err(anyhow!("ui.steps_columns는 1 이상이어야 합니다"));
    }
    if !(4..=200).contains(&cfg.ui.bar_width) {
        return Err(anyhow!(
            "ui.bar_width는 4..=200 범위여야 합니다: {}",
            cfg.ui.bar_width
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!(
            "불리언 값이 올바르지 않습니다: {s}(true|false|1|0|yes|no|on|off 중 하나를 지정하세요)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for s in ["1", "true", " YES ", "on"] {
            assert!(parse_bool(s).expect("bool"), "{s}");
        }
        for s in ["0", "false", "No", "off"] {
            assert!(!parse_bool(s).expect("bool"), "{s}");
        }
        let err = parse_bool("maybe").unwrap_err().to_string();
        assert!(err.contains("(true|false|1|0|yes|no|on|off"), "{err}");
    }

    #[test]
    fn raw_config_overrides_only_present_keys() {
        let raw: RawConfig = toml::from_str(
            r#"
[ui]
steps_columns = 3

[theme]
glyphs = "ascii"
"#,
        )
        .expect("toml");
        let mut cfg = EffectiveConfig::default();
        apply_raw_config(&mut cfg, raw);
        assert_eq!(cfg.ui.steps_columns, 3);
        assert!(cfg.ui.color);
        assert_eq!(cfg.ui.bar_width, 24);
        assert_eq!(cfg.theme.glyphs, GlyphSet::Ascii);
        assert!(cfg.report.include_transcript);
    }

    #[test]
    fn validate_rejects_zero_columns_and_tiny_bars() {
        let mut cfg = EffectiveConfig::default();
        assert!(validate(&cfg).is_ok());
        cfg.ui.steps_columns = 0;
        assert!(validate(&cfg).is_err());
        cfg.ui.steps_columns = 6;
        cfg.ui.bar_width = 2;
        assert!(validate(&cfg).is_err());
    }
}
