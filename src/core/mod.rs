mod analysis;
mod evidence;
mod tier;

pub use analysis::{AnalysisResult, ProcessingStep};
pub use evidence::{Evidence, Polarity};
pub use tier::{StatusTier, clamp_percent};
