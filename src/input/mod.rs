use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::AnalysisResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `None` and `-` both mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => InputSource::Stdin,
            Some(p) if p.as_os_str() == "-" => InputSource::Stdin,
            Some(p) => InputSource::File(p.to_path_buf()),
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, InputSource::Stdin)
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

pub fn load(source: &InputSource) -> Result<AnalysisResult> {
    let raw = match source {
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut buf)
                .context("표준 입력을 읽지 못했습니다")?;
            buf
        }
        InputSource::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("입력 파일을 읽지 못했습니다: {}", path.display()))?,
    };

    let data = parse(&raw).with_context(|| format!("분석 결과를 해석하지 못했습니다: {source}"))?;
    tracing::debug!(
        source = %source,
        filename = %data.filename,
        score = data.credibility_score,
        evidences = data.evidences.len(),
        steps = data.processing_steps.len(),
        "analysis result loaded"
    );
    Ok(data)
}

pub fn parse(raw: &str) -> Result<AnalysisResult> {
    let data: AnalysisResult =
        serde_json::from_str(raw).context("JSON 형식이 올바르지 않습니다")?;
    Ok(data)
}

/// A data-model invariant the producer did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputWarning {
    ScoreOutOfRange { score: i32 },
    ImpactOutOfRange { index: usize, category: String, impact: i32 },
    NoEvidence,
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::ScoreOutOfRange { score } => {
                write!(f, "신뢰도 점수가 0..=100 범위를 벗어났습니다: {score}")
            }
            InputWarning::ImpactOutOfRange {
                index,
                category,
                impact,
            } => write!(
                f,
                "근거 #{index}({category})의 영향도가 0..=100 범위를 벗어났습니다: {impact}"
            ),
            InputWarning::NoEvidence => f.write_str("판단 근거가 비어 있습니다"),
        }
    }
}

pub fn inspect(data: &AnalysisResult) -> Vec<InputWarning> {
    let mut warnings = Vec::new();

    if !(0..=100).contains(&data.credibility_score) {
        warnings.push(InputWarning::ScoreOutOfRange {
            score: data.credibility_score,
        });
    }
    for (index, ev) in data.evidences.iter().enumerate() {
        if !(0..=100).contains(&ev.impact) {
            warnings.push(InputWarning::ImpactOutOfRange {
                index,
                category: ev.category.clone(),
                impact: ev.impact,
            });
        }
    }
    if data.evidences.is_empty() {
        warnings.push(InputWarning::NoEvidence);
    }

    for w in &warnings {
        tracing::warn!("{w}");
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Polarity;

    const SAMPLE: &str = r#"{
        "filename": "clip.mp4",
        "credibilityScore": 72,
        "isFake": false,
        "transcribedText": "hello",
        "summary": "greeting",
        "processingSteps": [{ "step": "음성 추출 중...", "timestamp": "00:01" }],
        "evidences": [
            { "category": "출처", "type": "positive", "impact": 60, "description": "ok" },
            { "category": "표현", "type": "negative", "impact": 20, "description": "hmm" }
        ]
    }"#;

    #[test]
    fn parse_reads_camel_case_document() {
        let data = parse(SAMPLE).expect("parse");
        assert_eq!(data.filename, "clip.mp4");
        assert_eq!(data.credibility_score, 72);
        assert!(!data.is_fake);
        assert_eq!(data.processing_steps.len(), 1);
        assert_eq!(data.evidences[1].polarity, Polarity::Negative);
        assert!(inspect(&data).is_empty());
    }

    #[test]
    fn parse_rejects_unknown_evidence_type() {
        let raw = SAMPLE.replace("\"negative\"", "\"neutral\"");
        assert!(parse(&raw).is_err());
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(parse(r#"{ "filename": "x" }"#).is_err());
    }

    #[test]
    fn inspect_reports_out_of_range_values_and_empty_evidence() {
        let mut data = parse(SAMPLE).expect("parse");
        data.credibility_score = 120;
        data.evidences[1].impact = -4;
        let warnings = inspect(&data);
        assert_eq!(
            warnings,
            vec![
                InputWarning::ScoreOutOfRange { score: 120 },
                InputWarning::ImpactOutOfRange {
                    index: 1,
                    category: "표현".to_string(),
                    impact: -4,
                },
            ]
        );

        data.evidences.clear();
        assert!(inspect(&data).contains(&InputWarning::NoEvidence));
    }

    #[test]
    fn impact_warning_names_index_and_category() {
        let w = InputWarning::ImpactOutOfRange {
            index: 2,
            category: "출처".to_string(),
            impact: 130,
        };
        assert_eq!(
            w.to_string(),
            "근거 #2(출처)의 영향도가 0..=100 범위를 벗어났습니다: 130"
        );
    }

    #[test]
    fn source_from_arg_treats_dash_as_stdin() {
        assert!(InputSource::from_arg(None).is_stdin());
        assert!(InputSource::from_arg(Some(Path::new("-"))).is_stdin());
        assert_eq!(
            InputSource::from_arg(Some(Path::new("a.json"))),
            InputSource::File(PathBuf::from("a.json"))
        );
    }
}
