use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub category: String,
    #[serde(rename = "type")]
    pub polarity: Polarity,
    pub impact: i32,
    pub description: String,
}

impl Evidence {
    pub fn positive(category: impl Into<String>, impact: i32, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            polarity: Polarity::Positive,
            impact,
            description: description.into(),
        }
    }

    pub fn negative(category: impl Into<String>, impact: i32, description: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            polarity: Polarity::Negative,
            impact,
            description: description.into(),
        }
    }
}
