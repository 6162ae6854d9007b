use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{Polarity, StatusTier};

/// Semantic colour role. Presenters resolve it through a [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Caution,
    Negative,
    Info,
    Accent,
    Warm,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    CheckCircle,
    AlertTriangle,
    XCircle,
    TrendingUp,
    TrendingDown,
    Brain,
    Shield,
    FileSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub tone: Tone,
    pub icon: Icon,
    pub label: &'static str,
}

pub const fn status_style(tier: StatusTier) -> StatusStyle {
    match tier {
        StatusTier::Trusted => StatusStyle {
            tone: Tone::Positive,
            icon: Icon::CheckCircle,
            label: "신뢰할 수 있음",
        },
        StatusTier::Suspicious => StatusStyle {
            tone: Tone::Caution,
            icon: Icon::AlertTriangle,
            label: "의심스러움",
        },
        StatusTier::Untrusted => StatusStyle {
            tone: Tone::Negative,
            icon: Icon::XCircle,
            label: "신뢰할 수 없음",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolarityStyle {
    pub tone: Tone,
    pub icon: Icon,
    pub label: &'static str,
}

pub const fn polarity_style(polarity: Polarity) -> PolarityStyle {
    match polarity {
        Polarity::Positive => PolarityStyle {
            tone: Tone::Positive,
            icon: Icon::TrendingUp,
            label: "긍정적",
        },
        Polarity::Negative => PolarityStyle {
            tone: Tone::Negative,
            icon: Icon::TrendingDown,
            label: "부정적",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyFake,
    Trustworthy,
}

impl Verdict {
    pub const fn from_flag(is_fake: bool) -> Self {
        if is_fake {
            Verdict::LikelyFake
        } else {
            Verdict::Trustworthy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerdictStyle {
    pub tone: Tone,
    pub icon: Icon,
    pub title: &'static str,
    pub message: &'static str,
}

pub const fn verdict_style(verdict: Verdict) -> VerdictStyle {
    match verdict {
        Verdict::LikelyFake => VerdictStyle {
            tone: Tone::Negative,
            icon: Icon::XCircle,
            title: "가짜 정보일 가능성이 높습니다",
            message: "분석 결과, 이 콘텐츠는 신뢰도가 낮아 가짜 정보일 가능성이 높습니다. 여러 근거를 바탕으로 판단한 결과이니 참고하시기 바랍니다.",
        },
        Verdict::Trustworthy => VerdictStyle {
            tone: Tone::Positive,
            icon: Icon::CheckCircle,
            title: "신뢰할 수 있는 정보입니다",
            message: "분석 결과, 이 콘텐츠는 신뢰할 수 있는 정보로 판단됩니다. 다만, 항상 여러 출처를 교차 검증하는 것이 좋습니다.",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphSet {
    #[default]
    Unicode,
    Ascii,
}

impl GlyphSet {
    pub const fn as_str(self) -> &'static str {
        match self {
            GlyphSet::Unicode => "unicode",
            GlyphSet::Ascii => "ascii",
        }
    }
}

impl fmt::Display for GlyphSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlyphSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unicode" => Ok(GlyphSet::Unicode),
            "ascii" => Ok(GlyphSet::Ascii),
            _ => Err(format!(
                "글리프 설정이 올바르지 않습니다: {s}(unicode|ascii 중 하나를 지정하세요)"
            )),
        }
    }
}

/// Design-system values shared by every presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
    pub glyphs: GlyphSet,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            color: true,
            glyphs: GlyphSet::Unicode,
        }
    }
}

impl Theme {
    pub fn new(color: bool, glyphs: GlyphSet) -> Self {
        Self { color, glyphs }
    }

    pub fn plain() -> Self {
        Self::new(false, GlyphSet::Unicode)
    }

    pub const fn ansi_code(tone: Tone) -> &'static str {
        match tone {
            Tone::Positive => "32",
            Tone::Caution => "33",
            Tone::Negative => "31",
            Tone::Info => "34",
            Tone::Accent => "35",
            Tone::Warm => "38;5;208",
            Tone::Muted => "90",
        }
    }

    pub const fn tui_color(tone: Tone) -> Color {
        match tone {
            Tone::Positive => Color::Green,
            Tone::Caution => Color::Yellow,
            Tone::Negative => Color::Red,
            Tone::Info => Color::Blue,
            Tone::Accent => Color::Magenta,
            Tone::Warm => Color::LightRed,
            Tone::Muted => Color::DarkGray,
        }
    }

    pub fn paint(&self, tone: Tone, s: &str) -> String {
        if !self.color {
            return s.to_string();
        }
        format!("\x1b[{}m{s}\x1b[0m", Self::ansi_code(tone))
    }

    pub fn paint_bold(&self, tone: Tone, s: &str) -> String {
        if !self.color {
            return s.to_string();
        }
        format!("\x1b[1;{}m{s}\x1b[0m", Self::ansi_code(tone))
    }

    pub fn glyph(&self, icon: Icon) -> &'static str {
        match self.glyphs {
            GlyphSet::Unicode => match icon {
                Icon::CheckCircle => "✔",
                Icon::AlertTriangle => "⚠",
                Icon::XCircle => "✖",
                Icon::TrendingUp => "▲",
                Icon::TrendingDown => "▼",
                Icon::Brain => "◆",
                Icon::Shield => "◇",
                Icon::FileSearch => "▣",
            },
            GlyphSet::Ascii => match icon {
                Icon::CheckCircle => "[OK]",
                Icon::AlertTriangle => "[!]",
                Icon::XCircle => "[X]",
                Icon::TrendingUp => "[+]",
                Icon::TrendingDown => "[-]",
                Icon::Brain => "[AI]",
                Icon::Shield => "[#]",
                Icon::FileSearch => "[T]",
            },
        }
    }

    /// Filled/empty cells for bars and gauges.
    pub fn bar_cells(&self) -> (&'static str, &'static str) {
        match self.glyphs {
            GlyphSet::Unicode => ("█", "░"),
            GlyphSet::Ascii => ("#", "."),
        }
    }

    pub fn rule(&self) -> &'static str {
        match self.glyphs {
            GlyphSet::Unicode => "─",
            GlyphSet::Ascii => "-",
        }
    }
}
