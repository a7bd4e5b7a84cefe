//! Card data model.
//!
//! A [`Card`] is one visual element of an infographic. The model emits cards
//! as JSON objects discriminated by a `type` field; every payload field
//! defaults when missing so that partially-formed cards still render.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Layout width of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    #[default]
    Full,
    Half,
}

/// A citation attached to a factual card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uri: String,
}

impl Source {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }

    /// Host part of the URI, or the whole URI if it has no recognisable host.
    pub fn host(&self) -> &str {
        let rest = self
            .uri
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.uri);
        let host = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(rest);
        let host = host.rsplit('@').next().unwrap_or(host);
        if host.is_empty() {
            &self.uri
        } else {
            host
        }
    }
}

/// Chart rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
}

impl ChartType {
    /// The chart types a viewer can switch between.
    pub const SWITCHABLE: [ChartType; 3] = [ChartType::Bar, ChartType::Line, ChartType::Pie];

    pub fn name(&self) -> &'static str {
        match self {
            ChartType::Bar => "Bar",
            ChartType::Line => "Line",
            ChartType::Pie => "Pie",
            ChartType::Doughnut => "Doughnut",
        }
    }

    /// Next entry in [`ChartType::SWITCHABLE`]; doughnut cycles to bar.
    pub fn next(&self) -> ChartType {
        match self {
            ChartType::Bar => ChartType::Line,
            ChartType::Line => ChartType::Pie,
            ChartType::Pie | ChartType::Doughnut => ChartType::Bar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartDataset {
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_numbers")]
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient_datasets")]
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KpiItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

// ============================================================================
// Factual cards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TitleCard {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_sources", skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiCard {
    #[serde(default)]
    pub items: Vec<KpiItem>,
    #[serde(default, deserialize_with = "lenient_sources", skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartCard {
    #[serde(rename = "chartType", default, deserialize_with = "lenient_chart_type")]
    pub chart_type: ChartType,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_chart_data")]
    pub data: ChartData,
    #[serde(default, deserialize_with = "lenient_sources", skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteCard {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_sources", skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineCard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
    #[serde(default, deserialize_with = "lenient_sources", skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

// ============================================================================
// Creative cards
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimileCard {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub similes: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExplodeCard {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub fragments: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnexpectCard {
    #[serde(default)]
    pub scene: String,
    #[serde(default)]
    pub twists: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChainCard {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PovCard {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub perspectives: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlliterationCard {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub letter: String,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AcronymCard {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub expansions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuseCard {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub second: String,
    #[serde(default)]
    pub fusions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneCard {
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnfoldCard {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default, deserialize_with = "lenient_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,
}

// ============================================================================
// Card
// ============================================================================

/// One infographic card, discriminated by its JSON `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Card {
    Title(TitleCard),
    Text(TextCard),
    Kpi(KpiCard),
    Chart(ChartCard),
    Quote(QuoteCard),
    Timeline(TimelineCard),
    Simile(SimileCard),
    Explode(ExplodeCard),
    Unexpect(UnexpectCard),
    Chain(ChainCard),
    Pov(PovCard),
    Alliteration(AlliterationCard),
    Acronym(AcronymCard),
    Fuse(FuseCard),
    Scene(SceneCard),
    Unfold(UnfoldCard),
}

/// The discriminant of a [`Card`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    Title,
    Text,
    Kpi,
    Chart,
    Quote,
    Timeline,
    Simile,
    Explode,
    Unexpect,
    Chain,
    Pov,
    Alliteration,
    Acronym,
    Fuse,
    Scene,
    Unfold,
}

impl CardKind {
    pub const ALL: [CardKind; 16] = [
        CardKind::Title,
        CardKind::Text,
        CardKind::Kpi,
        CardKind::Chart,
        CardKind::Quote,
        CardKind::Timeline,
        CardKind::Simile,
        CardKind::Explode,
        CardKind::Unexpect,
        CardKind::Chain,
        CardKind::Pov,
        CardKind::Alliteration,
        CardKind::Acronym,
        CardKind::Fuse,
        CardKind::Scene,
        CardKind::Unfold,
    ];

    /// The JSON `type` tag.
    pub fn tag(&self) -> &'static str {
        match self {
            CardKind::Title => "title",
            CardKind::Text => "text",
            CardKind::Kpi => "kpi",
            CardKind::Chart => "chart",
            CardKind::Quote => "quote",
            CardKind::Timeline => "timeline",
            CardKind::Simile => "simile",
            CardKind::Explode => "explode",
            CardKind::Unexpect => "unexpect",
            CardKind::Chain => "chain",
            CardKind::Pov => "pov",
            CardKind::Alliteration => "alliteration",
            CardKind::Acronym => "acronym",
            CardKind::Fuse => "fuse",
            CardKind::Scene => "scene",
            CardKind::Unfold => "unfold",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Creative cards come from the word-play tools rather than the model.
    pub fn is_creative(&self) -> bool {
        !matches!(
            self,
            CardKind::Title
                | CardKind::Text
                | CardKind::Kpi
                | CardKind::Chart
                | CardKind::Quote
                | CardKind::Timeline
        )
    }
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Card {
    /// A full-width title card.
    pub fn title(title: impl Into<String>) -> Self {
        Card::Title(TitleCard {
            title: title.into(),
            width: None,
        })
    }

    /// A text card with no icon or sources.
    pub fn text(content: impl Into<String>) -> Self {
        Card::Text(TextCard {
            content: content.into(),
            ..Default::default()
        })
    }

    pub fn kind(&self) -> CardKind {
        match self {
            Card::Title(_) => CardKind::Title,
            Card::Text(_) => CardKind::Text,
            Card::Kpi(_) => CardKind::Kpi,
            Card::Chart(_) => CardKind::Chart,
            Card::Quote(_) => CardKind::Quote,
            Card::Timeline(_) => CardKind::Timeline,
            Card::Simile(_) => CardKind::Simile,
            Card::Explode(_) => CardKind::Explode,
            Card::Unexpect(_) => CardKind::Unexpect,
            Card::Chain(_) => CardKind::Chain,
            Card::Pov(_) => CardKind::Pov,
            Card::Alliteration(_) => CardKind::Alliteration,
            Card::Acronym(_) => CardKind::Acronym,
            Card::Fuse(_) => CardKind::Fuse,
            Card::Scene(_) => CardKind::Scene,
            Card::Unfold(_) => CardKind::Unfold,
        }
    }

    fn width_slot(&self) -> &Option<Width> {
        match self {
            Card::Title(c) => &c.width,
            Card::Text(c) => &c.width,
            Card::Kpi(c) => &c.width,
            Card::Chart(c) => &c.width,
            Card::Quote(c) => &c.width,
            Card::Timeline(c) => &c.width,
            Card::Simile(c) => &c.width,
            Card::Explode(c) => &c.width,
            Card::Unexpect(c) => &c.width,
            Card::Chain(c) => &c.width,
            Card::Pov(c) => &c.width,
            Card::Alliteration(c) => &c.width,
            Card::Acronym(c) => &c.width,
            Card::Fuse(c) => &c.width,
            Card::Scene(c) => &c.width,
            Card::Unfold(c) => &c.width,
        }
    }

    fn width_slot_mut(&mut self) -> &mut Option<Width> {
        match self {
            Card::Title(c) => &mut c.width,
            Card::Text(c) => &mut c.width,
            Card::Kpi(c) => &mut c.width,
            Card::Chart(c) => &mut c.width,
            Card::Quote(c) => &mut c.width,
            Card::Timeline(c) => &mut c.width,
            Card::Simile(c) => &mut c.width,
            Card::Explode(c) => &mut c.width,
            Card::Unexpect(c) => &mut c.width,
            Card::Chain(c) => &mut c.width,
            Card::Pov(c) => &mut c.width,
            Card::Alliteration(c) => &mut c.width,
            Card::Acronym(c) => &mut c.width,
            Card::Fuse(c) => &mut c.width,
            Card::Scene(c) => &mut c.width,
            Card::Unfold(c) => &mut c.width,
        }
    }

    /// Effective width; an absent width is full.
    pub fn width(&self) -> Width {
        self.width_slot().unwrap_or_default()
    }

    pub fn is_half(&self) -> bool {
        self.width() == Width::Half
    }

    pub fn set_width(&mut self, width: Width) {
        *self.width_slot_mut() = Some(width);
    }

    pub fn with_width(mut self, width: Width) -> Self {
        self.set_width(width);
        self
    }

    /// Citations for factual cards; empty for title and creative cards.
    pub fn sources(&self) -> &[Source] {
        match self {
            Card::Text(c) => &c.sources,
            Card::Kpi(c) => &c.sources,
            Card::Chart(c) => &c.sources,
            Card::Quote(c) => &c.sources,
            Card::Timeline(c) => &c.sources,
            _ => &[],
        }
    }

    /// A one-line summary for lists and status messages.
    pub fn headline(&self) -> String {
        let text = match self {
            Card::Title(c) => c.title.clone(),
            Card::Text(c) => c.content.clone(),
            Card::Kpi(c) => c
                .items
                .iter()
                .map(|i| format!("{} {}", i.value, i.label))
                .collect::<Vec<_>>()
                .join(" | "),
            Card::Chart(c) => format!("{} ({})", c.title, c.chart_type.name()),
            Card::Quote(c) => format!("\"{}\" - {}", c.content, c.author),
            Card::Timeline(c) => format!("{} ({} events)", c.title, c.events.len()),
            Card::Simile(c) => format!("Similes for {}", c.word),
            Card::Explode(c) => format!("{} exploded", c.word),
            Card::Unexpect(c) => format!("Unexpected {}", c.scene),
            Card::Chain(c) => format!("Chain from {}", c.word),
            Card::Pov(c) => format!("Points of view on {}", c.topic),
            Card::Alliteration(c) => format!("{} in {}", c.topic, c.letter),
            Card::Acronym(c) => format!("{} as an acronym", c.word),
            Card::Fuse(c) => format!("{} + {}", c.first, c.second),
            Card::Scene(c) => format!("Sensing {}", c.place),
            Card::Unfold(c) => format!("{} unfolded", c.word),
        };
        truncate_chars(&text, 80)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

// ============================================================================
// Lenient field readers
// ============================================================================

/// Unknown width strings read as absent rather than rejecting the card.
fn lenient_width<'de, D>(deserializer: D) -> Result<Option<Width>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value.as_ref().and_then(|v| v.as_str()) {
        Some("half") => Some(Width::Half),
        Some("full") => Some(Width::Full),
        _ => None,
    })
}

/// Models often emit years and KPI values as bare numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(value_to_string).unwrap_or_default())
}

fn value_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Chart labels are frequently years, so numbers are kept as text.
fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items.into_iter().map(value_to_string).collect(),
        _ => Vec::new(),
    })
}

/// Numbers and numeric strings are read as-is; anything else plots as zero.
fn lenient_numbers<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
                serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
                _ => 0.0,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_datasets<'de, D>(deserializer: D) -> Result<Vec<ChartDataset>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<ChartDataset>(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_chart_data<'de, D>(deserializer: D) -> Result<ChartData, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value::<ChartData>(v).ok())
        .unwrap_or_default())
}

/// Chart types the terminal cannot draw fall back to a bar chart.
fn lenient_chart_type<'de, D>(deserializer: D) -> Result<ChartType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value::<ChartType>(v).ok())
        .unwrap_or_default())
}

/// `null` and malformed source entries are dropped; a missing list is empty.
fn lenient_sources<'de, D>(deserializer: D) -> Result<Vec<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Source>(item).ok())
            .filter(|s| !s.uri.is_empty() || !s.title.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_title() {
        let card: Card = serde_json::from_value(json!({"type": "title", "title": "X"})).unwrap();
        assert_eq!(card, Card::title("X"));
        assert_eq!(card.width(), Width::Full);
        assert!(card.sources().is_empty());
    }

    #[test]
    fn test_deserialize_chart() {
        let card: Card = serde_json::from_value(json!({
            "type": "chart",
            "chartType": "line",
            "title": "Population",
            "data": {
                "labels": ["1990", "2000"],
                "datasets": [{"label": "Millions", "data": [53, 62.5], "borderColor": "red"}]
            },
            "sources": [{"title": "Census", "uri": "https://census.example/data"}],
            "width": "half"
        }))
        .unwrap();

        let Card::Chart(chart) = &card else {
            panic!("expected chart card");
        };
        assert_eq!(chart.chart_type, ChartType::Line);
        assert_eq!(chart.data.datasets[0].data, vec![53.0, 62.5]);
        assert!(card.is_half());
        assert_eq!(card.sources()[0].host(), "census.example");
    }

    #[test]
    fn test_missing_fields_default() {
        let card: Card = serde_json::from_value(json!({"type": "timeline"})).unwrap();
        let Card::Timeline(timeline) = card else {
            panic!("expected timeline card");
        };
        assert!(timeline.title.is_empty());
        assert!(timeline.events.is_empty());
        assert!(timeline.sources.is_empty());
    }

    #[test]
    fn test_unknown_width_reads_as_absent() {
        let card: Card =
            serde_json::from_value(json!({"type": "text", "content": "a", "width": "third"}))
                .unwrap();
        assert_eq!(card.width(), Width::Full);
        assert!(serde_json::to_value(&card).unwrap().get("width").is_none());
    }

    #[test]
    fn test_numeric_dates_and_values() {
        let card: Card = serde_json::from_value(json!({
            "type": "timeline",
            "title": "T",
            "events": [{"date": 1991, "title": "Web", "description": "d"}]
        }))
        .unwrap();
        let Card::Timeline(timeline) = card else {
            panic!("expected timeline card");
        };
        assert_eq!(timeline.events[0].date, "1991");

        let card: Card = serde_json::from_value(json!({
            "type": "kpi",
            "items": [{"value": 300, "label": "Growth"}]
        }))
        .unwrap();
        let Card::Kpi(kpi) = card else {
            panic!("expected kpi card");
        };
        assert_eq!(kpi.items[0].value, "300");
    }

    fn parse_chart(value: serde_json::Value) -> ChartCard {
        match serde_json::from_value::<Card>(value).unwrap() {
            Card::Chart(chart) => chart,
            other => panic!("expected chart card, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_numeric_chart_labels() {
        let chart = parse_chart(json!({
            "type": "chart",
            "data": {
                "labels": [2019, 2020, "2021", null],
                "datasets": [{"label": 7, "data": [1, 2, 3, 4]}]
            }
        }));
        assert_eq!(chart.data.labels, vec!["2019", "2020", "2021", ""]);
        assert_eq!(chart.data.datasets[0].label, "7");
    }

    #[test]
    fn test_chart_points_read_leniently() {
        let chart = parse_chart(json!({
            "type": "chart",
            "data": {
                "labels": ["a", "b", "c", "d"],
                "datasets": [{"label": "x", "data": [1, null, "2.5", "n/a"]}, "junk"]
            }
        }));
        assert_eq!(chart.data.datasets.len(), 1);
        assert_eq!(chart.data.datasets[0].data, vec![1.0, 0.0, 2.5, 0.0]);

        let chart = chart_with_data(json!(null));
        assert!(chart.data.labels.is_empty());
        assert!(chart.data.datasets.is_empty());
    }

    fn chart_with_data(data: serde_json::Value) -> ChartCard {
        parse_chart(json!({"type": "chart", "title": "t", "data": data}))
    }

    #[test]
    fn test_unknown_chart_type_falls_back_to_bar() {
        for chart_type in [json!("radar"), json!(null), json!(3)] {
            let chart = parse_chart(json!({"type": "chart", "chartType": chart_type, "title": "t"}));
            assert_eq!(chart.chart_type, ChartType::Bar);
            assert_eq!(chart.title, "t");
        }
        let chart = parse_chart(json!({"type": "chart", "chartType": "doughnut"}));
        assert_eq!(chart.chart_type, ChartType::Doughnut);
    }

    #[test]
    fn test_null_and_empty_sources_are_absent() {
        for sources in [json!(null), json!([]), json!([null, 3])] {
            let card: Card = serde_json::from_value(
                json!({"type": "quote", "content": "c", "author": "a", "sources": sources}),
            )
            .unwrap();
            assert!(card.sources().is_empty());
            assert!(serde_json::to_value(&card).unwrap().get("sources").is_none());
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(serde_json::from_value::<Card>(json!({"type": "video"})).is_err());
        assert!(serde_json::from_value::<Card>(json!({"title": "no tag"})).is_err());
    }

    #[test]
    fn test_serialize_keeps_wire_names() {
        let card = Card::Chart(ChartCard {
            chart_type: ChartType::Pie,
            title: "Share".into(),
            ..Default::default()
        })
        .with_width(Width::Half);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["type"], "chart");
        assert_eq!(json["chartType"], "pie");
        assert_eq!(json["width"], "half");
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in CardKind::ALL {
            assert_eq!(CardKind::from_tag(kind.tag()), Some(kind));
        }
        assert!(CardKind::Fuse.is_creative());
        assert!(!CardKind::Timeline.is_creative());
    }

    #[test]
    fn test_creative_card_deserializes() {
        let card: Card = serde_json::from_value(json!({
            "type": "simile",
            "word": "city",
            "similes": ["as busy as a beehive"]
        }))
        .unwrap();
        assert_eq!(card.kind(), CardKind::Simile);
        assert!(card.headline().contains("city"));
    }

    #[test]
    fn test_source_host() {
        assert_eq!(Source::new("t", "https://www.example.com/a/b?q=1").host(), "www.example.com");
        assert_eq!(Source::new("t", "example.org").host(), "example.org");
        assert_eq!(Source::new("t", "").host(), "");
    }

    #[test]
    fn test_chart_type_cycle() {
        assert_eq!(ChartType::Bar.next(), ChartType::Line);
        assert_eq!(ChartType::Pie.next(), ChartType::Bar);
        assert_eq!(ChartType::Doughnut.next(), ChartType::Bar);
    }

    #[test]
    fn test_headline_truncates() {
        let card = Card::text("x".repeat(200));
        assert_eq!(card.headline().chars().count(), 80);
    }
}
