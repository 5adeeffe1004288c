//! Pure transforms from server payloads to display-ready view models.
//!
//! These functions do no I/O and touch no UI: the embedding application
//! owns the actual rendering and feeds these models to it. An empty input
//! produces an empty output, which renderers treat as "leave the current
//! view alone".

use vitalsync_events::{QuickRecommendations, RecommendationsUpdate, SearchSuggestions};

/// Character limit for recommendation summaries.
const SUMMARY_MAX_CHARS: usize = 150;

/// One content recommendation prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationCard {
    /// Category with underscores replaced by spaces.
    pub category: String,
    pub content_type: String,
    pub title: String,
    /// Description truncated to a display-friendly length.
    pub summary: String,
    /// Relative link to the content page.
    pub url: String,
}

/// One quick recommendation prepared for a compact list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickRecommendationRow {
    pub category: String,
    pub title: String,
}

/// One search suggestion prepared for the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionEntry {
    pub text: String,
    /// Category when the server provides one, otherwise the suggestion kind.
    pub label: String,
}

/// Builds display cards from a recommendations update.
#[must_use]
pub fn recommendation_cards(update: &RecommendationsUpdate) -> Vec<RecommendationCard> {
    update
        .content_recommendations
        .iter()
        .map(|content| RecommendationCard {
            category: content.category.replace('_', " "),
            content_type: content.content_type.clone(),
            title: content.title.clone(),
            summary: truncate_summary(&content.description),
            url: format!("/content/{}", content.id),
        })
        .collect()
}

/// Builds compact rows from a quick recommendations update.
#[must_use]
pub fn quick_recommendation_rows(update: &QuickRecommendations) -> Vec<QuickRecommendationRow> {
    update
        .recommendations
        .iter()
        .map(|rec| QuickRecommendationRow {
            category: rec.category.clone(),
            title: rec.title.clone(),
        })
        .collect()
}

/// Builds dropdown entries from a suggestions payload.
#[must_use]
pub fn suggestion_entries(update: &SearchSuggestions) -> Vec<SuggestionEntry> {
    update
        .suggestions
        .iter()
        .map(|suggestion| SuggestionEntry {
            text: suggestion.text.clone(),
            label: suggestion
                .category
                .clone()
                .unwrap_or_else(|| suggestion.kind.clone()),
        })
        .collect()
}

/// Whether the suggestions dropdown should be shown at all.
#[must_use]
pub fn suggestions_visible(update: &SearchSuggestions) -> bool {
    !update.suggestions.is_empty()
}

/// Banner text to show when an update carries fresh AI recommendations.
#[must_use]
pub fn update_notice(update: &RecommendationsUpdate) -> Option<String> {
    if update.ai_recommendations.is_empty() {
        None
    } else {
        Some("New health recommendations available!".to_string())
    }
}

fn truncate_summary(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((boundary, _)) => format!("{}...", &text[..boundary]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use vitalsync_events::{Envelope, ServerEvent};

    use super::*;

    fn sample_update() -> RecommendationsUpdate {
        let event = ServerEvent::from_envelope(Envelope::new(
            "recommendations_update",
            json!({
                "ai_recommendations": [
                    { "title": "Hydrate", "description": "Drink water", "category": "nutrition",
                      "priority": "high", "confidence": 0.9 }
                ],
                "content_recommendations": [
                    { "id": 42, "title": "Beginner Yoga", "category": "physical_activity",
                      "content_type": "video", "description": "A gentle start",
                      "difficulty_level": "easy", "duration": 10 }
                ],
                "timestamp": "2025-06-01T00:00:00.000Z",
            }),
        ))
        .unwrap();
        match event {
            ServerEvent::RecommendationsUpdate(update) => update,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_cards_map_fields() {
        let cards = recommendation_cards(&sample_update());
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].category, "physical activity");
        assert_eq!(cards[0].content_type, "video");
        assert_eq!(cards[0].title, "Beginner Yoga");
        assert_eq!(cards[0].summary, "A gentle start");
        assert_eq!(cards[0].url, "/content/42");
    }

    #[test]
    fn test_summary_truncated_at_limit() {
        let short = "a".repeat(150);
        assert_eq!(truncate_summary(&short), short);

        let long = "a".repeat(151);
        let truncated = truncate_summary(&long);
        assert_eq!(truncated.chars().count(), 153);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_summary_truncation_respects_char_boundaries() {
        let long = "å".repeat(200);
        let truncated = truncate_summary(&long);
        assert!(truncated.starts_with('å'));
        assert_eq!(truncated.chars().count(), 153);
    }

    #[test]
    fn test_empty_update_yields_no_cards() {
        let update = RecommendationsUpdate::default();
        assert!(recommendation_cards(&update).is_empty());
        assert!(update_notice(&update).is_none());
    }

    #[test]
    fn test_notice_present_when_ai_recommendations_exist() {
        let notice = update_notice(&sample_update());
        assert_eq!(notice.as_deref(), Some("New health recommendations available!"));
    }

    #[test]
    fn test_suggestion_label_falls_back_to_kind() {
        let event = ServerEvent::from_envelope(Envelope::new(
            "search_suggestions",
            json!({
                "suggestions": [
                    { "text": "yoga for beginners", "type": "content", "category": "fitness" },
                    { "text": "yoga poses", "type": "query" },
                ],
            }),
        ))
        .unwrap();
        let update = match event {
            ServerEvent::SearchSuggestions(update) => update,
            other => panic!("unexpected event: {other:?}"),
        };

        let entries = suggestion_entries(&update);
        assert_eq!(entries[0].label, "fitness");
        assert_eq!(entries[1].label, "query");
        assert!(suggestions_visible(&update));
    }

    #[test]
    fn test_empty_suggestions_hidden() {
        let update = SearchSuggestions { suggestions: Vec::new() };
        assert!(!suggestions_visible(&update));
        assert!(suggestion_entries(&update).is_empty());
    }
}
