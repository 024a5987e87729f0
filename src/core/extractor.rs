//! Derives headline, summary, and tags from a transcript.
//!
//! Three remote scoring passes feed the derived metadata: a 4-sentence
//! summary, a 1-sentence headline, and the combined category/topic analysis.
//! All of them run for every transcript; a degraded (empty) result from any
//! engine is an acceptable output, never a blocking error.

use std::sync::Arc;

use anyhow::Result;

use crate::adapters::{Summarizer, TopicAnalysis, TopicAnalyzer};

/// Category tags need a score strictly above this to be kept
const CATEGORY_SCORE_FLOOR: f64 = 0.5;

/// Metadata derived from one transcript
#[derive(Debug, Clone)]
pub struct DerivedMetadata {
    /// One-sentence headline, trailing period stripped
    pub headline: String,

    /// Four-sentence summary, untruncated
    pub summary: String,

    /// Display tags: category tags first, then topic tags, duplicates kept
    pub tags: Vec<String>,
}

/// Combines the summarization and topic engines into derived metadata
pub struct MetadataExtractor {
    summarizer: Arc<dyn Summarizer>,
    analyzer: Arc<dyn TopicAnalyzer>,
}

impl MetadataExtractor {
    pub fn new(summarizer: Arc<dyn Summarizer>, analyzer: Arc<dyn TopicAnalyzer>) -> Self {
        Self {
            summarizer,
            analyzer,
        }
    }

    /// Run all scoring passes over a transcript.
    ///
    /// Only transport failures error out; they abort the event upstream.
    pub async fn extract(&self, transcript: &str) -> Result<DerivedMetadata> {
        let summary = self.summarizer.summarize(transcript, 4).await?;
        let analysis = self.analyzer.analyze(transcript).await?;
        let headline = self.summarizer.summarize(transcript, 1).await?;

        Ok(DerivedMetadata {
            headline: strip_trailing_period(&headline),
            summary,
            tags: format_tags(&analysis),
        })
    }
}

/// Remove a single trailing period from a one-sentence headline
pub fn strip_trailing_period(headline: &str) -> String {
    headline.strip_suffix('.').unwrap_or(headline).to_string()
}

/// Turn scored labels into display tags.
///
/// Categories: leaf segment of the hierarchical label, kept when scoring
/// strictly above 0.5. Topics: kept only at the maximum score of exactly 1.0;
/// this is intentionally strict, not a threshold. The two lists are
/// concatenated without deduplication, categories first.
pub fn format_tags(analysis: &TopicAnalysis) -> Vec<String> {
    let mut tags = Vec::new();

    for category in &analysis.categories {
        if category.score > CATEGORY_SCORE_FLOOR {
            let leaf = category.label.split('>').last().unwrap_or_default();
            let tag = normalize_label(leaf);
            if !tag.is_empty() {
                tags.push(format!("#{}", tag));
            }
        }
    }

    for topic in &analysis.topics {
        // Maximum-confidence topics only
        if topic.score == 1.0 {
            tags.push(format!("#{}", normalize_label(&topic.label)));
        }
    }

    tags
}

/// Collapse runs of whitespace and ampersands to a single underscore, then
/// lowercase
fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut in_run = false;

    for c in label.chars() {
        if c.is_whitespace() || c == '&' {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ScoredLabel;

    fn label(label: &str, score: f64) -> ScoredLabel {
        ScoredLabel {
            label: label.to_string(),
            score,
        }
    }

    #[test]
    fn test_strip_trailing_period() {
        assert_eq!(strip_trailing_period("Hello world."), "Hello world");
        assert_eq!(strip_trailing_period("Hello world"), "Hello world");
        assert_eq!(strip_trailing_period(""), "");
        // Only one period comes off
        assert_eq!(strip_trailing_period("Wait.."), "Wait.");
    }

    #[test]
    fn test_category_tag_uses_leaf_segment() {
        let analysis = TopicAnalysis {
            categories: vec![label("Arts>Music>Jazz", 0.8)],
            topics: vec![],
        };
        assert_eq!(format_tags(&analysis), vec!["#jazz"]);
    }

    #[test]
    fn test_category_below_floor_dropped() {
        let analysis = TopicAnalysis {
            categories: vec![label("Arts>Music>Jazz", 0.4), label("News", 0.5)],
            topics: vec![],
        };
        assert!(format_tags(&analysis).is_empty());
    }

    #[test]
    fn test_topic_requires_exact_max_score() {
        let analysis = TopicAnalysis {
            categories: vec![],
            topics: vec![label("Climate Change", 1.0), label("Economics", 0.99)],
        };
        assert_eq!(format_tags(&analysis), vec!["#climate_change"]);
    }

    #[test]
    fn test_category_tags_precede_topic_tags_no_dedup() {
        let analysis = TopicAnalysis {
            categories: vec![label("Arts>Music>Jazz", 0.9)],
            topics: vec![label("Jazz", 1.0)],
        };
        assert_eq!(format_tags(&analysis), vec!["#jazz", "#jazz"]);
    }

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize_label("Food & Drink"), "food_drink");
        assert_eq!(normalize_label("Climate Change"), "climate_change");
        assert_eq!(normalize_label("A  &  B"), "a_b");
    }

    #[test]
    fn test_empty_category_leaf_dropped() {
        let analysis = TopicAnalysis {
            categories: vec![label("Arts>Music>", 0.9)],
            topics: vec![],
        };
        assert!(format_tags(&analysis).is_empty());
    }
}
