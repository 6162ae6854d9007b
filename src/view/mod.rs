//! Pure mapping from an [`AnalysisResult`] to a presentable view tree.
//!
//! Nothing here touches the terminal, the filesystem or the theme.
//! Presenters in `ui`, `report` and `tui` walk the [`ResultView`].

mod style;

pub use style::{
    GlyphSet, Icon, PolarityStyle, StatusStyle, Theme, Tone, Verdict, VerdictStyle,
    polarity_style, status_style, verdict_style,
};

use serde::Serialize;

use crate::core::{AnalysisResult, Evidence, ProcessingStep, StatusTier, clamp_percent};

pub const DEFAULT_STEP_COLUMNS: usize = 6;

/// Suffix the pipeline appends to a running step's label.
const IN_PROGRESS_MARKER: &str = " 중...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub step_columns: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            step_columns: DEFAULT_STEP_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub header: Header,
    pub score_chart: DonutChart,
    pub impact_chart: BarChart,
    pub steps: StepStrip,
    pub transcript: TextPanel,
    pub summary: TextPanel,
    pub evidence: EvidenceSection,
    pub verdict: VerdictPanel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub title: &'static str,
    pub filename: String,
    pub status: StatusBadge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub tier: StatusTier,
    pub tone: Tone,
    pub icon: Icon,
    pub label: &'static str,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonutChart {
    pub title: &'static str,
    pub center_label: String,
    pub caption: &'static str,
    pub segments: [Segment; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub label: &'static str,
    pub value: u8,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub title: &'static str,
    pub value_label: &'static str,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u8,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStrip {
    pub title: &'static str,
    pub columns: usize,
    pub cells: Vec<StepCell>,
}

impl StepStrip {
    /// Cells grouped into display rows of `columns` cells.
    pub fn rows(&self) -> std::slice::Chunks<'_, StepCell> {
        self.cells.chunks(self.columns.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCell {
    pub icon: Icon,
    pub label: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPanel {
    pub title: &'static str,
    pub description: &'static str,
    pub icon: Icon,
    pub tone: Tone,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceSection {
    pub title: &'static str,
    pub subtitle: String,
    pub icon: Icon,
    pub tone: Tone,
    pub items: Vec<EvidenceNode>,
}

impl EvidenceSection {
    pub fn blocks(&self) -> impl Iterator<Item = &EvidenceBlock> {
        self.items.iter().filter_map(|node| match node {
            EvidenceNode::Block(block) => Some(block),
            EvidenceNode::Divider => None,
        })
    }

    pub fn divider_count(&self) -> usize {
        self.items
            .iter()
            .filter(|node| matches!(node, EvidenceNode::Divider))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvidenceNode {
    Block(EvidenceBlock),
    Divider,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceBlock {
    pub category: String,
    pub description: String,
    pub tone: Tone,
    pub icon: Icon,
    pub badge: &'static str,
    pub impact_caption: &'static str,
    pub impact_label: String,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictPanel {
    pub verdict: Verdict,
    pub tone: Tone,
    pub icon: Icon,
    pub title: &'static str,
    pub message: &'static str,
}

pub fn render(data: &AnalysisResult, options: &ViewOptions) -> ResultView {
    ResultView {
        header: header(data),
        score_chart: donut_chart(data.credibility_score),
        impact_chart: impact_chart(&data.evidences),
        steps: step_strip(&data.processing_steps, options.step_columns),
        transcript: TextPanel {
            title: "추출된 텍스트",
            description: "영상에서 음성을 추출하여 변환한 텍스트입니다",
            icon: Icon::FileSearch,
            tone: Tone::Info,
            body: data.transcribed_text.clone(),
        },
        summary: TextPanel {
            title: "AI 요약",
            description: "텍스트 내용을 AI가 분석하여 요약한 결과입니다",
            icon: Icon::Brain,
            tone: Tone::Accent,
            body: data.summary.clone(),
        },
        evidence: evidence_section(data.credibility_score, &data.evidences),
        verdict: verdict_panel(data.is_fake),
    }
}

pub fn status_badge(score: i32) -> StatusBadge {
    let tier = StatusTier::from_score(score);
    let style = status_style(tier);
    StatusBadge {
        tier,
        tone: style.tone,
        icon: style.icon,
        label: style.label,
        score,
    }
}

fn header(data: &AnalysisResult) -> Header {
    Header {
        title: "분석 결과",
        filename: data.filename.clone(),
        status: status_badge(data.credibility_score),
    }
}

pub fn donut_chart(score: i32) -> DonutChart {
    let credibility = clamp_percent(score);
    DonutChart {
        title: "전체 신뢰도 점수",
        center_label: format!("{credibility}%"),
        caption: "신뢰도",
        segments: [
            Segment {
                label: "신뢰도",
                value: credibility,
                tone: Tone::Positive,
            },
            Segment {
                label: "의심도",
                value: 100 - credibility,
                tone: Tone::Negative,
            },
        ],
    }
}

pub fn impact_chart(evidences: &[Evidence]) -> BarChart {
    BarChart {
        title: "판단 근거별 영향도",
        value_label: "영향도",
        bars: evidences
            .iter()
            .map(|ev| Bar {
                label: ev.category.clone(),
                value: clamp_percent(ev.impact),
                tone: polarity_style(ev.polarity).tone,
            })
            .collect(),
    }
}

pub fn step_strip(steps: &[ProcessingStep], columns: usize) -> StepStrip {
    StepStrip {
        title: "처리 과정",
        columns: columns.max(1),
        cells: steps
            .iter()
            .map(|s| StepCell {
                icon: Icon::CheckCircle,
                label: display_step_label(&s.step),
                timestamp: s.timestamp.clone(),
            })
            .collect(),
    }
}

/// Drops the first in-progress marker from a step label.
pub fn display_step_label(label: &str) -> String {
    label.replacen(IN_PROGRESS_MARKER, "", 1)
}

pub fn evidence_section(score: i32, evidences: &[Evidence]) -> EvidenceSection {
    let mut items = Vec::with_capacity(evidences.len().saturating_mul(2));
    for (idx, ev) in evidences.iter().enumerate() {
        if idx > 0 {
            items.push(EvidenceNode::Divider);
        }
        items.push(EvidenceNode::Block(evidence_block(ev)));
    }

    EvidenceSection {
        title: "신뢰도 판단 근거",
        subtitle: format!("AI가 {score}% 신뢰도를 도출한 상세 근거입니다"),
        icon: Icon::Shield,
        tone: Tone::Warm,
        items,
    }
}

fn evidence_block(ev: &Evidence) -> EvidenceBlock {
    let style = polarity_style(ev.polarity);
    let impact = clamp_percent(ev.impact);
    EvidenceBlock {
        category: ev.category.clone(),
        description: ev.description.clone(),
        tone: style.tone,
        icon: style.icon,
        badge: style.label,
        impact_caption: "영향도",
        impact_label: format!("{impact}%"),
        progress: impact,
    }
}

pub fn verdict_panel(is_fake: bool) -> VerdictPanel {
    let verdict = Verdict::from_flag(is_fake);
    let style = verdict_style(verdict);
    VerdictPanel {
        verdict,
        tone: style.tone,
        icon: style.icon,
        title: style.title,
        message: style.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Evidence, Polarity};

    fn sample(score: i32, is_fake: bool, evidences: Vec<Evidence>) -> AnalysisResult {
        AnalysisResult {
            filename: "interview.mp4".to_string(),
            credibility_score: score,
            is_fake,
            transcribed_text: "원문 텍스트".to_string(),
            summary: "요약".to_string(),
            processing_steps: vec![
                ProcessingStep {
                    step: "음성 추출 중...".to_string(),
                    timestamp: "10:00:01".to_string(),
                },
                ProcessingStep {
                    step: "텍스트 변환 중...".to_string(),
                    timestamp: "10:00:05".to_string(),
                },
            ],
            evidences,
        }
    }

    fn mixed_evidences() -> Vec<Evidence> {
        vec![
            Evidence::positive("출처 신뢰성", 80, "공신력 있는 출처가 인용되었습니다"),
            Evidence::negative("감정적 표현", 40, "과장된 표현이 다수 포함되어 있습니다"),
            Evidence::positive("사실 일치", 65, "공개 자료와 일치합니다"),
        ]
    }

    #[test]
    fn trusted_scores_use_trusted_badge_and_donut_value() {
        for s in [70, 71, 85, 99, 100] {
            let view = render(&sample(s, false, vec![]), &ViewOptions::default());
            assert_eq!(view.header.status.tier, StatusTier::Trusted);
            assert_eq!(view.header.status.tone, Tone::Positive);
            assert_eq!(view.header.status.icon, Icon::CheckCircle);
            assert_eq!(view.score_chart.segments[0].value as i32, s);
        }
    }

    #[test]
    fn suspicious_and_untrusted_ranges() {
        for s in [50, 55, 69] {
            assert_eq!(status_badge(s).tier, StatusTier::Suspicious, "score={s}");
        }
        for s in [0, 30, 49] {
            assert_eq!(status_badge(s).tier, StatusTier::Untrusted, "score={s}");
        }
    }

    #[test]
    fn donut_segments_sum_to_100() {
        for s in 0..=100 {
            let chart = donut_chart(s);
            let sum: u32 = chart.segments.iter().map(|seg| seg.value as u32).sum();
            assert_eq!(sum, 100, "score={s}");
            assert_eq!(chart.segments[1].value as i32, 100 - s);
        }
    }

    #[test]
    fn donut_clamps_out_of_range_scores() {
        let chart = donut_chart(140);
        assert_eq!(chart.segments[0].value, 100);
        assert_eq!(chart.segments[1].value, 0);
        assert_eq!(chart.center_label, "100%");

        let chart = donut_chart(-3);
        assert_eq!(chart.segments[0].value, 0);
        assert_eq!(chart.segments[1].value, 100);
    }

    #[test]
    fn evidence_blocks_follow_input_order_and_polarity() {
        let evidences = mixed_evidences();
        let section = evidence_section(72, &evidences);

        let blocks: Vec<&EvidenceBlock> = section.blocks().collect();
        assert_eq!(blocks.len(), evidences.len());
        for (block, ev) in blocks.iter().zip(&evidences) {
            assert_eq!(block.category, ev.category);
            let expected = if ev.polarity == Polarity::Positive {
                Tone::Positive
            } else {
                Tone::Negative
            };
            assert_eq!(block.tone, expected);
        }
        assert_eq!(blocks[1].icon, Icon::TrendingDown);
        assert_eq!(blocks[1].badge, "부정적");
        assert_eq!(blocks[0].impact_label, "80%");
        assert_eq!(section.subtitle, "AI가 72% 신뢰도를 도출한 상세 근거입니다");
    }

    #[test]
    fn dividers_only_between_blocks() {
        for n in 1..=4 {
            let evidences: Vec<Evidence> = (0..n)
                .map(|i| Evidence::positive(format!("c{i}"), 10, "d"))
                .collect();
            let section = evidence_section(50, &evidences);
            assert_eq!(section.divider_count(), n - 1);
            assert!(matches!(section.items.first(), Some(EvidenceNode::Block(_))));
            assert!(matches!(section.items.last(), Some(EvidenceNode::Block(_))));
        }
    }

    #[test]
    fn bar_chart_keeps_duplicates_and_order() {
        let evidences = vec![
            Evidence::negative("출처", 30, "a"),
            Evidence::positive("출처", 90, "b"),
            Evidence::negative("표현", 120, "c"),
        ];
        let chart = impact_chart(&evidences);
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["출처", "출처", "표현"]);
        assert_eq!(chart.bars[0].tone, Tone::Negative);
        assert_eq!(chart.bars[1].tone, Tone::Positive);
        assert_eq!(chart.bars[2].value, 100);
    }

    #[test]
    fn evidence_blocks_clamp_out_of_range_impact() {
        let section = evidence_section(
            60,
            &[
                Evidence::positive("과장", 120, "a"),
                Evidence::negative("누락", -4, "b"),
            ],
        );
        let blocks: Vec<&EvidenceBlock> = section.blocks().collect();
        assert_eq!(blocks[0].progress, 100);
        assert_eq!(blocks[0].impact_label, "100%");
        assert_eq!(blocks[1].progress, 0);
        assert_eq!(blocks[1].impact_label, "0%");
    }

    #[test]
    fn step_labels_drop_in_progress_marker_only_for_display() {
        let data = sample(80, false, vec![]);
        let view = render(&data, &ViewOptions::default());
        assert_eq!(view.steps.cells[0].label, "음성 추출");
        assert_eq!(view.steps.cells[1].timestamp, "10:00:05");
        assert_eq!(data.processing_steps[0].step, "음성 추출 중...");
        assert_eq!(display_step_label("완료"), "완료");
    }

    #[test]
    fn step_rows_wrap_at_column_count() {
        let steps: Vec<ProcessingStep> = (0..7)
            .map(|i| ProcessingStep {
                step: format!("s{i}"),
                timestamp: String::new(),
            })
            .collect();
        let strip = step_strip(&steps, 3);
        let sizes: Vec<usize> = strip.rows().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);

        let strip = step_strip(&steps, 0);
        assert_eq!(strip.columns, 1);
    }

    #[test]
    fn scenario_a_trusted_and_trustworthy() {
        let view = render(&sample(85, false, mixed_evidences()), &ViewOptions::default());
        assert_eq!(view.header.status.label, "신뢰할 수 있음");
        assert_eq!(view.verdict.verdict, Verdict::Trustworthy);
        assert_eq!(view.verdict.tone, Tone::Positive);
        assert_eq!(view.verdict.title, "신뢰할 수 있는 정보입니다");
    }

    #[test]
    fn scenario_b_suspicious() {
        let view = render(&sample(55, false, mixed_evidences()), &ViewOptions::default());
        assert_eq!(view.header.status.label, "의심스러움");
        assert_eq!(view.header.status.tone, Tone::Caution);
    }

    #[test]
    fn scenario_c_untrusted_and_fake() {
        let view = render(&sample(30, true, mixed_evidences()), &ViewOptions::default());
        assert_eq!(view.header.status.label, "신뢰할 수 없음");
        assert_eq!(view.verdict.verdict, Verdict::LikelyFake);
        assert_eq!(view.verdict.tone, Tone::Negative);
        assert_eq!(view.verdict.title, "가짜 정보일 가능성이 높습니다");
    }

    #[test]
    fn scenario_d_empty_evidences() {
        let view = render(&sample(60, false, vec![]), &ViewOptions::default());
        assert!(view.impact_chart.bars.is_empty());
        assert!(view.evidence.items.is_empty());
        assert_eq!(view.evidence.divider_count(), 0);
    }

    #[test]
    fn verdict_follows_flag_not_score() {
        assert_eq!(verdict_panel(true).verdict, Verdict::LikelyFake);
        assert_eq!(verdict_panel(false).verdict, Verdict::Trustworthy);
        let view = render(&sample(95, true, vec![]), &ViewOptions::default());
        assert_eq!(view.verdict.verdict, Verdict::LikelyFake);
    }

    #[test]
    fn render_is_idempotent() {
        let data = sample(64, false, mixed_evidences());
        let options = ViewOptions::default();
        let a = render(&data, &options);
        let b = render(&data, &options);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).expect("serialize"),
            serde_json::to_string(&b).expect("serialize")
        );
    }
}
