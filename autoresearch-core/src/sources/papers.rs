use super::{PaperRecord, PaperSource};

/// Number of records every search returns
pub const PAPERS_PER_SEARCH: usize = 3;

/// Synthesizes a fixed set of papers whose text is templated from the topic.
///
/// Deterministic: the same topic always yields structurally identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePaperSource;

impl TemplatePaperSource {
    pub fn new() -> Self {
        Self
    }
}

impl PaperSource for TemplatePaperSource {
    fn search(&self, topic: &str) -> Vec<PaperRecord> {
        tracing::debug!(topic, "Searching for papers");

        let papers = vec![
            PaperRecord {
                title: format!("Recent Advances in {}: A Comprehensive Study", topic),
                summary: format!(
                    "This groundbreaking paper explores {} using innovative methodologies and \
                     demonstrates significant improvements over existing approaches.",
                    topic
                ),
                source: "Nature AI".to_string(),
                year: "2024".to_string(),
            },
            PaperRecord {
                title: format!("Understanding {}: Theory and Practice", topic),
                summary: format!(
                    "An in-depth analysis of {} with practical applications, showing real-world \
                     impact and future research directions.",
                    topic
                ),
                source: "Science Direct".to_string(),
                year: "2024".to_string(),
            },
            PaperRecord {
                title: format!("{}: State of the Art Review", topic),
                summary: format!(
                    "A comprehensive review of current research in {}, identifying key trends, \
                     challenges, and opportunities.",
                    topic
                ),
                source: "IEEE Xplore".to_string(),
                year: "2024".to_string(),
            },
        ];
        debug_assert_eq!(papers.len(), PAPERS_PER_SEARCH);

        tracing::debug!(count = papers.len(), "Found relevant papers");
        papers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_returns_three_records_mentioning_topic() {
        for topic in ["Quantum Computing", "", "Café ☕ & Co."] {
            let papers = TemplatePaperSource::new().search(topic);
            assert_eq!(papers.len(), PAPERS_PER_SEARCH);
            for paper in &papers {
                assert!(paper.title.contains(topic));
                assert!(paper.summary.contains(topic));
                assert_eq!(paper.year, "2024");
            }
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let source = TemplatePaperSource::new();
        assert_eq!(source.search("Space Exploration"), source.search("Space Exploration"));
    }

    #[test]
    fn test_sources_are_distinct() {
        let papers = TemplatePaperSource::new().search("x");
        let sources: Vec<_> = papers.iter().map(|p| p.source.as_str()).collect();
        assert_eq!(sources, vec!["Nature AI", "Science Direct", "IEEE Xplore"]);
    }
}
