//! Fixture news source
//!
//! A `NewsSource` backed by static per-category articles. Serves as the
//! fallback when the live API is unreachable, and as a network-free source
//! for tests.

use crate::error::Result;
use crate::store::types::Article;

use super::traits::NewsSource;
use super::types::Category;

/// Static news source that always succeeds
pub struct MockNewsSource;

impl MockNewsSource {
    pub fn new() -> Self {
        Self
    }

    fn articles_for(category: Category) -> Vec<Article> {
        match category {
            Category::General => vec![
                Article::new(
                    "Breaking: Major Tech Conference Announces Revolutionary AI Breakthrough",
                    "https://example.com/tech-breakthrough",
                )
                .with_description(
                    "Scientists reveal groundbreaking artificial intelligence technology that \
                     could transform multiple industries.",
                )
                .with_published_at("2024-05-01T10:00:00Z")
                .with_source_opt(Some("Tech Daily".to_string()))
                .with_author_opt(Some("Sarah Johnson".to_string())),
                Article::new(
                    "Global Climate Summit Reaches Historic Agreement",
                    "https://example.com/climate-summit",
                )
                .with_description(
                    "World leaders unite on comprehensive climate action plan with ambitious \
                     2030 targets.",
                )
                .with_published_at("2024-05-01T08:00:00Z")
                .with_source_opt(Some("Global News".to_string()))
                .with_author_opt(Some("Michael Chen".to_string())),
                Article::new(
                    "Space Mission Successfully Lands on Mars",
                    "https://example.com/mars-landing",
                )
                .with_description(
                    "Historic space exploration mission achieves successful landing on Martian \
                     surface.",
                )
                .with_published_at("2024-05-01T06:00:00Z")
                .with_source_opt(Some("Space Today".to_string()))
                .with_author_opt(Some("Dr. Emily Rodriguez".to_string())),
            ],
            Category::Business => vec![
                Article::new(
                    "Stock Markets Reach Record Highs Amid Economic Growth",
                    "https://example.com/stock-markets",
                )
                .with_description(
                    "Major indices surge as quarterly earnings exceed expectations across \
                     multiple sectors.",
                )
                .with_published_at("2024-05-01T11:00:00Z")
                .with_source_opt(Some("Business Wire".to_string()))
                .with_author_opt(Some("James Patterson".to_string())),
                Article::new(
                    "Tech Giant Announces Major Acquisition Deal",
                    "https://example.com/acquisition",
                )
                .with_description(
                    "Industry leader acquires innovative startup in billion-dollar transaction.",
                )
                .with_published_at("2024-05-01T09:00:00Z")
                .with_source_opt(Some("Market Watch".to_string()))
                .with_author_opt(Some("Lisa Wong".to_string())),
            ],
            Category::Entertainment => vec![Article::new(
                "Film Festival Announces Award Winners",
                "https://example.com/film-festival",
            )
            .with_description("Independent films take center stage at international festival.")
            .with_published_at("2024-05-01T08:00:00Z")
            .with_source_opt(Some("Entertainment Weekly".to_string()))
            .with_author_opt(Some("Amanda Foster".to_string()))],
            Category::Health => vec![Article::new(
                "Medical Research Reveals Promising Treatment for Rare Disease",
                "https://example.com/medical-breakthrough",
            )
            .with_description("Clinical trials show significant improvement in patient outcomes.")
            .with_published_at("2024-05-01T10:00:00Z")
            .with_source_opt(Some("Health Today".to_string()))
            .with_author_opt(Some("Dr. Maria Garcia".to_string()))],
            Category::Science => vec![Article::new(
                "Astronomers Discover New Exoplanet in Habitable Zone",
                "https://example.com/exoplanet",
            )
            .with_description(
                "Earth-like planet found orbiting nearby star could potentially support life.",
            )
            .with_published_at("2024-05-01T07:00:00Z")
            .with_source_opt(Some("Science Daily".to_string()))
            .with_author_opt(Some("Dr. Robert Kim".to_string()))],
            Category::Sports => vec![Article::new(
                "Championship Finals Set Record Viewership Numbers",
                "https://example.com/championship",
            )
            .with_description("Historic sports event draws millions of viewers worldwide.")
            .with_published_at("2024-05-01T09:00:00Z")
            .with_source_opt(Some("Sports Network".to_string()))
            .with_author_opt(Some("Tom Bradley".to_string()))],
            Category::Technology => vec![Article::new(
                "Revolutionary Quantum Computer Achieves New Milestone",
                "https://example.com/quantum-computer",
            )
            .with_description(
                "Breakthrough in quantum computing brings us closer to solving complex problems.",
            )
            .with_published_at("2024-05-01T11:00:00Z")
            .with_source_opt(Some("Tech Review".to_string()))
            .with_author_opt(Some("Alex Kumar".to_string()))],
        }
    }
}

impl Default for MockNewsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NewsSource for MockNewsSource {
    fn name(&self) -> &'static str {
        "Demo data"
    }

    fn id(&self) -> &'static str {
        "mock"
    }

    fn top_headlines(&self, category: Category) -> Result<Vec<Article>> {
        Ok(Self::articles_for(category))
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Article>> {
        let needle = query.to_lowercase();
        let mut matches = Vec::new();

        for category in Category::ALL {
            for article in Self::articles_for(category) {
                let haystack = format!(
                    "{} {}",
                    article.title,
                    article.description.as_deref().unwrap_or("")
                )
                .to_lowercase();
                if haystack.contains(&needle) {
                    matches.push(article);
                }
            }
        }

        matches.truncate(limit);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_articles() {
        let source = MockNewsSource::new();
        for category in Category::ALL {
            let articles = source.top_headlines(category).unwrap();
            assert!(!articles.is_empty(), "no fixtures for {:?}", category);
            for article in &articles {
                assert!(!article.url.is_empty());
                assert!(article.source_name.is_some());
            }
        }
    }

    #[test]
    fn test_search_matches_titles() {
        let source = MockNewsSource::new();
        let results = source.search("quantum", 10).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].title.contains("Quantum"));
    }

    #[test]
    fn test_search_respects_limit() {
        let source = MockNewsSource::new();
        let all = source.search("e", 100).unwrap();
        let limited = source.search("e", 2).unwrap();
        assert!(all.len() > 2);
        assert_eq!(limited.len(), 2);
    }
}
