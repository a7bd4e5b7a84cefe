//! QA tests for the card pipeline: extraction, store, grouping and reveal.
//!
//! These run against scripted model output and need no API key.

use infographic_core::card::{ChartCard, ChartType, KpiCard, KpiItem, Source, TextCard};
use infographic_core::testing::{
    assert_card_count, assert_error_contains, assert_kinds, assert_no_error, assert_visible,
    FeedHarness,
};
use infographic_core::{flatten, Card, CardKind, Completion, Layout, Width};

fn half_text(content: &str) -> Card {
    Card::Text(TextCard {
        content: content.to_string(),
        sources: vec![Source::new("Encyclopedia", "https://example.com/a")],
        ..Default::default()
    })
    .with_width(Width::Half)
}

fn half_chart(title: &str) -> Card {
    Card::Chart(ChartCard {
        chart_type: ChartType::Bar,
        title: title.to_string(),
        ..Default::default()
    })
    .with_width(Width::Half)
}

fn kpi() -> Card {
    Card::Kpi(KpiCard {
        items: vec![KpiItem {
            icon: None,
            value: "71%".to_string(),
            label: "Surface covered by ocean".to_string(),
        }],
        ..Default::default()
    })
}

// =============================================================================
// Rounds and layout
// =============================================================================

#[tokio::test]
async fn test_rounds_append_in_order() {
    let mut harness = FeedHarness::new();
    harness
        .expect_cards(vec![Card::title("Oceans"), half_text("Deep"), half_chart("Depth")])
        .expect_cards(vec![kpi(), Card::title("Currents")]);

    harness.submit("Oceans").await.unwrap();
    harness.reveal_all();
    let second = harness.more().await.unwrap();
    assert_eq!(second, Some(Completion::Appended(2)));

    assert_kinds(
        &harness.feed,
        &[
            CardKind::Title,
            CardKind::Text,
            CardKind::Chart,
            CardKind::Kpi,
            CardKind::Title,
        ],
    );

    // The second request carried the whole first round as history.
    let calls = harness.generator.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].history.is_empty());
    assert_eq!(calls[1].history.len(), 3);
    assert_eq!(calls[1].topic, "Oceans");
    assert_eq!(harness.generator.remaining(), 0);
}

#[tokio::test]
async fn test_groups_pair_adjacent_halves() {
    let mut harness = FeedHarness::new();
    harness.expect_cards(vec![
        Card::title("Oceans"),
        half_text("Deep"),
        half_chart("Depth"),
        half_text("Alone"),
        kpi(),
    ]);
    harness.submit("Oceans").await.unwrap();

    let groups = harness.feed.groups();
    let layouts: Vec<Layout> = groups.iter().map(|g| g.layout).collect();
    assert_eq!(
        layouts,
        vec![Layout::Full, Layout::Grid, Layout::Full, Layout::Full]
    );
    assert_eq!(groups[1].start, 1);
    assert_eq!(groups[2].start, 3);

    let flat: Vec<Card> = flatten(&groups).into_iter().cloned().collect();
    assert_eq!(flat, harness.feed.cards());
}

#[tokio::test]
async fn test_reveal_restarts_each_round() {
    let mut harness = FeedHarness::new();
    harness
        .expect_cards(vec![Card::title("A"), Card::text("a")])
        .expect_cards(vec![Card::text("b")]);

    harness.submit("Letters").await.unwrap();
    assert_visible(&harness.feed, 0);
    assert_eq!(harness.reveal_all(), 2);

    let job = harness.feed.load_more().unwrap();
    assert_visible(&harness.feed, 0);
    assert!(!harness.feed.tick(), "no reveal while generating");

    harness.run(job).await.unwrap();
    assert_eq!(harness.reveal_all(), 3);
    assert_visible(&harness.feed, 3);
}

// =============================================================================
// Model output quirks
// =============================================================================

#[tokio::test]
async fn test_prose_around_unfenced_array() {
    let mut harness = FeedHarness::new();
    harness.expect_raw(
        "Sure! Here you go: [{\"type\":\"title\",\"title\":\"X\"}, {\"type\":\"quote\",\"content\":\"q\",\"author\":\"a\",\"sources\":null}] thanks",
    );
    harness.submit("X").await.unwrap();
    assert_kinds(&harness.feed, &[CardKind::Title, CardKind::Quote]);
    assert!(harness.feed.cards()[1].sources().is_empty());
}

#[tokio::test]
async fn test_refusal_text_surfaces_error() {
    let mut harness = FeedHarness::new();
    harness
        .expect_cards(vec![Card::title("A")])
        .expect_raw("I cannot produce that infographic.");

    harness.submit("A").await.unwrap();
    assert!(harness.more().await.is_err());
    assert_error_contains(&harness.feed, "Could not find a valid JSON block");
    assert_card_count(&harness.feed, 1);
}

#[tokio::test]
async fn test_object_instead_of_array() {
    let mut harness = FeedHarness::new();
    harness.expect_raw("{\"type\": \"title\", \"title\": \"Solo\"}");
    assert!(harness.submit("Solo").await.is_err());
    assert_error_contains(&harness.feed, "not an array");
    assert_card_count(&harness.feed, 0);
}

#[tokio::test]
async fn test_unknown_card_types_skipped() {
    let mut harness = FeedHarness::new();
    harness.expect_raw(
        "```json\n[{\"type\":\"video\",\"url\":\"x\"},{\"type\":\"timeline\",\"title\":\"T\",\"events\":[{\"date\":1969,\"title\":\"Moon\",\"description\":\"Landing\"}]}]\n```",
    );
    harness.submit("Space").await.unwrap();
    assert_kinds(&harness.feed, &[CardKind::Timeline]);
    assert_no_error(&harness.feed);
}

// =============================================================================
// Delete and regenerate
// =============================================================================

#[tokio::test]
async fn test_regenerate_uses_position_and_keeps_others() {
    let mut harness = FeedHarness::new();
    harness
        .expect_cards(vec![Card::title("A"), Card::text("old"), Card::text("c")])
        .expect_cards(vec![Card::text("new")]);

    harness.submit("Letters").await.unwrap();
    let completion = harness.regenerate(1).await.unwrap();
    assert_eq!(completion, Some(Completion::Replaced(1)));
    assert_eq!(
        harness.feed.cards(),
        &[Card::title("A"), Card::text("new"), Card::text("c")]
    );
    assert_eq!(harness.generator.calls()[1].regenerate, Some(1));
}

#[tokio::test]
async fn test_regenerate_failure_is_harmless() {
    let mut harness = FeedHarness::new();
    harness
        .expect_cards(vec![Card::title("A"), Card::text("keep")])
        .expect_failure("network down");

    harness.submit("Letters").await.unwrap();
    harness.reveal_all();
    assert!(harness.regenerate(1).await.is_err());

    assert_eq!(harness.feed.cards()[1], Card::text("keep"));
    assert_eq!(harness.feed.regenerating_index(), None);
    assert_visible(&harness.feed, 2);
    assert_error_contains(&harness.feed, "network down");
}

#[tokio::test]
async fn test_delete_then_more_sends_shorter_history() {
    let mut harness = FeedHarness::new();
    harness
        .expect_cards(vec![Card::title("A"), Card::text("b"), Card::text("c")])
        .expect_cards(vec![Card::text("d")]);

    harness.submit("Letters").await.unwrap();
    harness.reveal_all();
    harness.feed.delete(1).unwrap();
    assert_visible(&harness.feed, 2);

    harness.more().await.unwrap();
    assert_eq!(harness.generator.calls()[1].history.len(), 2);
    assert_card_count(&harness.feed, 3);
}
