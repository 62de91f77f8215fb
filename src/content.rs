//! The content descriptor model.
//!
//! A descriptor names one slide and the content it should receive, tagged
//! by kind. Descriptors are immutable request input: the engine reads them
//! and writes shapes, never the reverse. The serde surface uses a `kind`
//! tag and camelCase field names.

use crate::mutate::MutationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The ten slide kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKind {
    Points,
    ImageText,
    Table,
    Phases,
    Statistics,
    People,
    Cover,
    Contact,
    Images,
    Graph,
}

impl SlideKind {
    /// The wire name of the kind, as used in the `kind` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::ImageText => "image_text",
            Self::Table => "table",
            Self::Phases => "phases",
            Self::Statistics => "statistics",
            Self::People => "people",
            Self::Cover => "cover",
            Self::Contact => "contact",
            Self::Images => "images",
            Self::Graph => "graph",
        }
    }
}

impl std::fmt::Display for SlideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideKind {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(Self::Points),
            "image_text" => Ok(Self::ImageText),
            "table" => Ok(Self::Table),
            "phases" => Ok(Self::Phases),
            "statistics" => Ok(Self::Statistics),
            "people" => Ok(Self::People),
            "cover" => Ok(Self::Cover),
            "contact" => Ok(Self::Contact),
            "images" => Ok(Self::Images),
            "graph" => Ok(Self::Graph),
            other => Err(MutationError::UnsupportedKind(other.to_string())),
        }
    }
}

/// A content descriptor: one slide's desired content, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideContent {
    Points(PointsContent),
    ImageText(ImageTextContent),
    Table(TableContent),
    Phases(PhasesContent),
    Statistics(StatisticsContent),
    People(PeopleContent),
    Cover(CoverContent),
    Contact(ContactContent),
    Images(ImagesContent),
    Graph(GraphContent),
}

impl SlideContent {
    /// The kind of this descriptor.
    pub fn kind(&self) -> SlideKind {
        match self {
            Self::Points(_) => SlideKind::Points,
            Self::ImageText(_) => SlideKind::ImageText,
            Self::Table(_) => SlideKind::Table,
            Self::Phases(_) => SlideKind::Phases,
            Self::Statistics(_) => SlideKind::Statistics,
            Self::People(_) => SlideKind::People,
            Self::Cover(_) => SlideKind::Cover,
            Self::Contact(_) => SlideKind::Contact,
            Self::Images(_) => SlideKind::Images,
            Self::Graph(_) => SlideKind::Graph,
        }
    }

    /// The 1-based target slide number.
    pub fn slide_number(&self) -> u32 {
        match self {
            Self::Points(c) => c.slide_number,
            Self::ImageText(c) => c.slide_number,
            Self::Table(c) => c.slide_number,
            Self::Phases(c) => c.slide_number,
            Self::Statistics(c) => c.slide_number,
            Self::People(c) => c.slide_number,
            Self::Cover(c) => c.slide_number,
            Self::Contact(c) => c.slide_number,
            Self::Images(c) => c.slide_number,
            Self::Graph(c) => c.slide_number,
        }
    }

    /// Check the kind-specific required fields.
    pub fn validate(&self) -> Result<(), MutationError> {
        match self {
            Self::Points(c) => {
                require(!c.header.is_empty(), "points.header")?;
                require(!c.description.is_empty(), "points.description")
            },
            Self::ImageText(c) => {
                require(!c.title.is_empty(), "image_text.title")?;
                require(!c.text.is_empty(), "image_text.text")
            },
            Self::Table(c) => {
                require(!c.title.is_empty(), "table.title")?;
                require(
                    c.table_data.iter().any(|row| !row.is_empty()),
                    "table.tableData",
                )
            },
            Self::Phases(c) => {
                require(!c.title.is_empty(), "phases.title")?;
                require(!c.phases.is_empty(), "phases.phases")
            },
            Self::Statistics(c) => {
                require(!c.title.is_empty(), "statistics.title")?;
                require(!c.stats.is_empty(), "statistics.stats")
            },
            Self::People(c) => {
                require(!c.title.is_empty(), "people.title")?;
                require(!c.names.is_empty(), "people.names")
            },
            Self::Cover(c) => {
                require(!c.title.is_empty(), "cover.title")?;
                require(!c.company_name.is_empty(), "cover.companyName")
            },
            Self::Contact(c) => {
                require(!c.title.is_empty(), "contact.title")?;
                require(!c.slide_name.is_empty(), "contact.slideName")?;
                require(!c.website_link.is_empty(), "contact.websiteLink")
            },
            Self::Images(c) => {
                require(!c.slide_name.is_empty(), "images.slideName")?;
                require(!c.title.is_empty(), "images.title")
            },
            Self::Graph(c) => {
                require(!c.title.is_empty(), "graph.title")?;
                require(!c.charts.is_empty(), "graph.charts")
            },
        }
    }
}

fn require(ok: bool, field: &str) -> Result<(), MutationError> {
    if ok {
        Ok(())
    } else {
        Err(MutationError::InvalidContent(format!(
            "required field '{field}' is empty"
        )))
    }
}

/// One bullet point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletPoint {
    pub text: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
}

/// Bullet list slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsContent {
    pub slide_number: u32,
    pub header: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub points: Vec<BulletPoint>,
    #[serde(default)]
    pub header_color: Option<String>,
    #[serde(default)]
    pub description_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
}

/// Image beside text slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageTextContent {
    pub slide_number: u32,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub title_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}

/// Table slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableContent {
    pub slide_number: u32,
    pub title: String,
    /// Row-major cell text; clipped to the template's grid
    pub table_data: Vec<Vec<String>>,
    #[serde(default = "default_true")]
    pub header_row: bool,
    #[serde(default)]
    pub header_color: Option<String>,
}

/// One timeline phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Timeline / phases slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasesContent {
    pub slide_number: u32,
    pub title: String,
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub timeline_color: Option<String>,
}

/// One statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub font_size: Option<f32>,
}

/// Statistics slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsContent {
    pub slide_number: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub title_color: Option<String>,
    #[serde(default)]
    pub description_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
}

/// Team / people slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeopleContent {
    pub slide_number: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub names: Vec<String>,
    #[serde(default)]
    pub designations: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub title_color: Option<String>,
    #[serde(default)]
    pub description_color: Option<String>,
    #[serde(default)]
    pub background_color: Option<String>,
}

/// A named color scheme attached to cover and contact slides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Cover slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverContent {
    pub slide_number: u32,
    pub title: String,
    pub company_name: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub colors: ColorScheme,
}

/// Contact slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactContent {
    pub slide_number: u32,
    pub title: String,
    pub slide_name: String,
    pub website_link: String,
    #[serde(default)]
    pub linkedin_link: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub colors: ColorScheme,
}

/// Image gallery slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesContent {
    pub slide_number: u32,
    pub slide_name: String,
    pub title: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One data series of a chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: String,
    #[serde(default)]
    pub data: Vec<f64>,
}

/// One chart on a graph slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartContent {
    pub title: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub series: Vec<ChartSeries>,
}

/// Chart / graph slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphContent {
    pub slide_number: u32,
    pub title: String,
    pub charts: Vec<ChartContent>,
    #[serde(default)]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub chart_options: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_dispatch() {
        let json = r#"{"kind": "points", "slideNumber": 2, "header": "H", "description": "D"}"#;
        let content: SlideContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.kind(), SlideKind::Points);
        assert_eq!(content.slide_number(), 2);
    }

    #[test]
    fn test_unknown_kind_fails_deserialization() {
        let json = r#"{"kind": "wordcloud", "slideNumber": 1}"#;
        assert!(serde_json::from_str::<SlideContent>(json).is_err());

        assert!(matches!(
            "wordcloud".parse::<SlideKind>(),
            Err(MutationError::UnsupportedKind(_))
        ));
        assert_eq!("image_text".parse::<SlideKind>().unwrap(), SlideKind::ImageText);
    }

    #[test]
    fn test_camel_case_surface() {
        let json = r##"{
            "kind": "table",
            "slideNumber": 3,
            "title": "Revenue",
            "tableData": [["a", "b"], ["c", "d"]],
            "headerRow": false,
            "headerColor": "#FFFFFF"
        }"##;
        let content: SlideContent = serde_json::from_str(json).unwrap();
        let SlideContent::Table(table) = content else {
            panic!("wrong variant");
        };
        assert!(!table.header_row);
        assert_eq!(table.header_color.as_deref(), Some("#FFFFFF"));
    }

    #[test]
    fn test_header_row_defaults_true() {
        let json = r#"{"kind": "table", "slideNumber": 1, "title": "T", "tableData": [["x"]]}"#;
        let SlideContent::Table(table) = serde_json::from_str(json).unwrap() else {
            panic!("wrong variant");
        };
        assert!(table.header_row);
    }

    #[test]
    fn test_validate_required_fields() {
        let json = r#"{"kind": "points", "slideNumber": 1, "header": "", "description": "D"}"#;
        let content: SlideContent = serde_json::from_str(json).unwrap();
        assert!(matches!(
            content.validate(),
            Err(MutationError::InvalidContent(_))
        ));

        let json = r#"{"kind": "table", "slideNumber": 1, "title": "T", "tableData": []}"#;
        let content: SlideContent = serde_json::from_str(json).unwrap();
        assert!(content.validate().is_err());

        let json = r#"{"kind": "graph", "slideNumber": 1, "title": "T",
                       "charts": [{"title": "C", "labels": ["a"], "series": [{"label": "s", "data": [1.0]}]}]}"#;
        let content: SlideContent = serde_json::from_str(json).unwrap();
        assert!(content.validate().is_ok());
    }
}
