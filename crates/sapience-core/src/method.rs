//! Analysis method catalog.
//!
//! Every window is bound to one analysis method. The wire identifiers are
//! stable and appear verbatim in exported project documents.

use serde::{Deserialize, Serialize};

/// The analysis methods the workbench can open a window for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    #[serde(rename = "tfidf")]
    TfIdf,
    #[serde(rename = "freq")]
    Frequency,
    #[serde(rename = "collocation")]
    Collocation,
    #[serde(rename = "lda")]
    Lda,
    #[serde(rename = "nmf")]
    Nmf,
    #[serde(rename = "bertopic")]
    BerTopic,
    #[serde(rename = "lsa")]
    Lsa,
    #[serde(rename = "llmbased")]
    LlmSentiment,
    #[serde(rename = "rulebasedsa")]
    RuleBasedSentiment,
    #[serde(rename = "dlbasedsa")]
    DeepLearningSentiment,
    #[serde(rename = "zeroshotSentiment")]
    ZeroShotSentiment,
    #[serde(rename = "absa")]
    AspectBasedSentiment,
    #[serde(rename = "semanticwc")]
    SemanticWordCloud,
    #[serde(rename = "topicspecificwc")]
    TopicSpecificWordCloud,
}

impl MethodKind {
    /// The stable wire identifier used in project documents.
    pub fn id(&self) -> &'static str {
        match self {
            Self::TfIdf => "tfidf",
            Self::Frequency => "freq",
            Self::Collocation => "collocation",
            Self::Lda => "lda",
            Self::Nmf => "nmf",
            Self::BerTopic => "bertopic",
            Self::Lsa => "lsa",
            Self::LlmSentiment => "llmbased",
            Self::RuleBasedSentiment => "rulebasedsa",
            Self::DeepLearningSentiment => "dlbasedsa",
            Self::ZeroShotSentiment => "zeroshotSentiment",
            Self::AspectBasedSentiment => "absa",
            Self::SemanticWordCloud => "semanticwc",
            Self::TopicSpecificWordCloud => "topicspecificwc",
        }
    }

    /// Human-readable name, used for tray entries and notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::TfIdf => "Term Frequency-Inverse Document Frequency (TF-IDF)",
            Self::Frequency => "Frequency Analysis",
            Self::Collocation => "Collocation Analysis",
            Self::Lda => "Latent Dirichlet Allocation (LDA)",
            Self::Nmf => "Non-negative Matrix Factorization (NMF)",
            Self::BerTopic => "BERTopic",
            Self::Lsa => "Latent Semantic Analysis (LSA)",
            Self::LlmSentiment => "LLM-Based Sentiment Analysis",
            Self::RuleBasedSentiment => "Rule-Based Sentiment Analysis",
            Self::DeepLearningSentiment => "Deep Learning-Based Sentiment Analysis",
            Self::ZeroShotSentiment => "Zero-Shot Sentiment Analysis",
            Self::AspectBasedSentiment => "Aspect-Based Sentiment Analysis (ABSA)",
            Self::SemanticWordCloud => "Semantic Word Cloud",
            Self::TopicSpecificWordCloud => "Topic-Specific Word Cloud",
        }
    }

    /// The presentation template a window for this method is built from.
    ///
    /// Returns `None` for methods that are listed in the catalog but have
    /// no template; opening a window for them fails.
    pub fn template_name(&self) -> Option<&'static str> {
        match self {
            Self::TfIdf => Some("tfidfModal"),
            Self::Frequency => Some("freqModal"),
            Self::Collocation => Some("collocationModal"),
            Self::Lda => Some("ldaModal"),
            Self::Nmf => Some("nmfModal"),
            Self::BerTopic => Some("bertopicModal"),
            Self::Lsa => Some("lsaModal"),
            Self::LlmSentiment => Some("llmbasedModal"),
            Self::RuleBasedSentiment => Some("rulebasedsaModal"),
            Self::DeepLearningSentiment => Some("dlbasedsaModal"),
            Self::ZeroShotSentiment => Some("zeroshotSentimentModal"),
            Self::AspectBasedSentiment => Some("absaModal"),
            Self::SemanticWordCloud => Some("semanticwcModal"),
            Self::TopicSpecificWordCloud => None,
        }
    }
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
