use std::fmt::Write as _;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::view::{EvidenceNode, ResultView, TextPanel};

#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    pub include_transcript: bool,
    pub generated_at: String,
}

impl MarkdownOptions {
    pub fn now(include_transcript: bool) -> Self {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            include_transcript,
            generated_at,
        }
    }
}

pub fn format_markdown(view: &ResultView, opts: &MarkdownOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}", view.header.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "- 파일: `{}`", view.header.filename);
    let _ = writeln!(out, "- 생성 시각: {}", opts.generated_at);
    let _ = writeln!(
        out,
        "- 상태: **{}** ({})",
        view.header.status.label, view.header.status.tier
    );
    let _ = writeln!(out, "- 판정: {}", view.verdict.title);

    let chart = &view.score_chart;
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", chart.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "| 항목 | 값 |");
    let _ = writeln!(out, "| --- | ---: |");
    for seg in &chart.segments {
        let _ = writeln!(out, "| {} | {}% |", seg.label, seg.value);
    }

    let bars = &view.impact_chart;
    let _ = writeln!(out);
    let _ = writeln!(out, "## {} ({})", bars.title, bars.bars.len());
    let _ = writeln!(out);
    if bars.bars.is_empty() {
        let _ = writeln!(out, "_근거가 없습니다._");
    } else {
        let _ = writeln!(out, "| 근거 | {} |", bars.value_label);
        let _ = writeln!(out, "| --- | ---: |");
        for bar in &bars.bars {
            let _ = writeln!(out, "| {} | {}% |", escape_cell(&bar.label), bar.value);
        }
    }

    let steps = &view.steps;
    let _ = writeln!(out);
    let _ = writeln!(out, "## {} ({})", steps.title, steps.cells.len());
    let _ = writeln!(out);
    if steps.cells.is_empty() {
        let _ = writeln!(out, "_처리 기록이 없습니다._");
    } else {
        let _ = writeln!(out, "| 단계 | 시각 |");
        let _ = writeln!(out, "| --- | --- |");
        for cell in &steps.cells {
            let _ = writeln!(
                out,
                "| {} | {} |",
                escape_cell(&cell.label),
                escape_cell(&cell.timestamp)
            );
        }
    }

    if opts.include_transcript {
        write_text_panel(&mut out, &view.transcript);
    }
    write_text_panel(&mut out, &view.summary);

    let evidence = &view.evidence;
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", evidence.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", evidence.subtitle);
    if evidence.items.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "_근거가 없습니다._");
    }
    for node in &evidence.items {
        match node {
            EvidenceNode::Block(block) => {
                let _ = writeln!(out);
                let _ = writeln!(out, "### {} ({})", block.category, block.badge);
                let _ = writeln!(out);
                let description = block.description.trim();
                if !description.is_empty() {
                    let _ = writeln!(out, "{description}");
                    let _ = writeln!(out);
                }
                let _ = writeln!(out, "- {}: {}", block.impact_caption, block.impact_label);
            }
            EvidenceNode::Divider => {
                let _ = writeln!(out);
                let _ = writeln!(out, "---");
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", view.verdict.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", view.verdict.message);

    out
}

fn write_text_panel(out: &mut String, panel: &TextPanel) {
    let _ = writeln!(out);
    let _ = writeln!(out, "## {}", panel.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "_{}_", panel.description);
    let _ = writeln!(out);
    let body = panel.body.trim();
    if body.is_empty() {
        let _ = writeln!(out, "_비어 있습니다._");
    } else {
        for line in body.lines() {
            let _ = writeln!(out, "> {}", line.trim_end());
        }
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisResult, Evidence, ProcessingStep};
    use crate::view::{ViewOptions, render};

    fn opts(include_transcript: bool) -> MarkdownOptions {
        MarkdownOptions {
            include_transcript,
            generated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn view(evidences: Vec<Evidence>) -> ResultView {
        render(
            &AnalysisResult {
                filename: "debate.mp4".to_string(),
                credibility_score: 85,
                is_fake: false,
                transcribed_text: "전사 본문".to_string(),
                summary: "요약 본문".to_string(),
                processing_steps: vec![ProcessingStep {
                    step: "요약 생성 중...".to_string(),
                    timestamp: "09:30".to_string(),
                }],
                evidences,
            },
            &ViewOptions::default(),
        )
    }

    #[test]
    fn now_stamps_an_rfc3339_time() {
        let opts = MarkdownOptions::now(true);
        assert_ne!(opts.generated_at, "unknown");
        assert!(opts.generated_at.contains('T'), "{}", opts.generated_at);
        assert!(opts.generated_at.ends_with('Z'), "{}", opts.generated_at);
    }

    #[test]
    fn markdown_contains_all_sections() {
        let md = format_markdown(
            &view(vec![
                Evidence::positive("출처 | 인용", 80, "인용이 정확합니다"),
                Evidence::negative("어조", 15, "다소 단정적입니다"),
            ]),
            &opts(true),
        );
        assert!(md.starts_with("# 분석 결과\n"));
        assert!(md.contains("- 생성 시각: 2026-01-01T00:00:00Z"));
        assert!(md.contains("- 상태: **신뢰할 수 있음** (trusted)"));
        assert!(md.contains("| 신뢰도 | 85% |"));
        assert!(md.contains("| 의심도 | 15% |"));
        assert!(md.contains("## 판단 근거별 영향도 (2)"));
        assert!(md.contains("| 출처 \\| 인용 | 80% |"));
        assert!(md.contains("| 요약 생성 | 09:30 |"));
        assert!(md.contains("## 추출된 텍스트"));
        assert!(md.contains("> 전사 본문"));
        assert!(md.contains("> 요약 본문"));
        assert!(md.contains("### 어조 (부정적)"));
        assert_eq!(md.matches("\n---\n").count(), 1);
        assert!(md.contains("## 신뢰할 수 있는 정보입니다"));
    }

    #[test]
    fn transcript_can_be_omitted() {
        let md = format_markdown(&view(vec![]), &opts(false));
        assert!(!md.contains("## 추출된 텍스트"));
        assert!(md.contains("## AI 요약"));
        assert!(md.contains("_근거가 없습니다._"));
        assert!(!md.contains("\n---\n"));
    }
}
