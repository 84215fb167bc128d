use serde::{Deserialize, Serialize};

use crate::error::{PaperdeskError, Result};

/// Target paper length. Travels over the wire as the page count string ("5").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaperLength {
    #[serde(rename = "3")]
    Three,
    #[default]
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "15")]
    Fifteen,
}

impl PaperLength {
    pub fn pages(&self) -> u8 {
        match self {
            PaperLength::Three => 3,
            PaperLength::Five => 5,
            PaperLength::Eight => 8,
            PaperLength::Ten => 10,
            PaperLength::Fifteen => 15,
        }
    }

    /// Get all lengths for display.
    pub fn all() -> &'static [PaperLength] {
        &[
            PaperLength::Three,
            PaperLength::Five,
            PaperLength::Eight,
            PaperLength::Ten,
            PaperLength::Fifteen,
        ]
    }
}

impl std::fmt::Display for PaperLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pages", self.pages())
    }
}

impl std::str::FromStr for PaperLength {
    type Err = PaperdeskError;

    fn from_str(s: &str) -> Result<Self> {
        let pages: u8 = s.trim().parse().map_err(|_| {
            PaperdeskError::validation("Invalid Length", format!("'{s}' is not a page count"))
        })?;
        PaperLength::all()
            .iter()
            .copied()
            .find(|len| len.pages() == pages)
            .ok_or_else(|| {
                PaperdeskError::validation(
                    "Invalid Length",
                    format!("{pages} pages is not offered; choose 3, 5, 8, 10 or 15"),
                )
            })
    }
}

/// Document template the paper is laid out in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaperStyle {
    #[default]
    Ieee,
    Arxiv,
    Springer,
}

impl PaperStyle {
    pub fn id(&self) -> &'static str {
        match self {
            PaperStyle::Ieee => "ieee",
            PaperStyle::Arxiv => "arxiv",
            PaperStyle::Springer => "springer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaperStyle::Ieee => "IEEE",
            PaperStyle::Arxiv => "arXiv",
            PaperStyle::Springer => "Springer",
        }
    }
}

impl std::fmt::Display for PaperStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PaperStyle {
    type Err = PaperdeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ieee" => Ok(PaperStyle::Ieee),
            "arxiv" => Ok(PaperStyle::Arxiv),
            "springer" => Ok(PaperStyle::Springer),
            other => Err(PaperdeskError::validation(
                "Invalid Style",
                format!("unknown style '{other}'; choose ieee, arxiv or springer"),
            )),
        }
    }
}

/// Paper-generation parameters, posted verbatim to the generation endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    pub topic: String,
    pub research_question: String,
    pub methodology: String,
    pub length: PaperLength,
    pub domain: String,
    pub style: PaperStyle,
    pub institution: String,
    pub city: String,
    pub country: String,
    pub email: String,
}

impl GenerationInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    /// Reject locally when the topic is blank.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(PaperdeskError::validation(
                "Topic Required",
                "Please enter a research topic to generate a paper.",
            ));
        }
        Ok(())
    }
}
