use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

pub const FALLBACK_COLOR: &str = "#ccc";
pub const FALLBACK_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDetail {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateCatalog {
    pub states: Vec<StateDetail>,
    #[serde(default)]
    pub emergency_index: Option<usize>,
}

impl StateCatalog {
    pub fn new(states: Vec<StateDetail>) -> Self {
        Self {
            states,
            emergency_index: None,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StateDetail> {
        self.states.get(index)
    }

    pub fn name_of(&self, index: usize) -> &str {
        self.get(index).map_or(FALLBACK_NAME, |state| state.name.as_str())
    }

    pub fn color_of(&self, index: usize) -> &str {
        self.get(index).map_or(FALLBACK_COLOR, |state| state.color.as_str())
    }

    pub fn is_emergency(&self, index: usize) -> bool {
        self.emergency_index == Some(index)
    }
}

impl Default for StateCatalog {
    fn default() -> Self {
        let states = DEFAULT_STATES
            .iter()
            .map(|(emoji, name, color, description)| StateDetail {
                name: name.to_string(),
                color: color.to_string(),
                emoji: emoji.to_string(),
                description: description.to_string(),
            })
            .collect::<Vec<_>>();
        let emergency_index = states.iter().position(|state| state.name == "Emergency");
        Self {
            states,
            emergency_index,
        }
    }
}

pub async fn load_catalog(path: Option<&Path>) -> Result<StateCatalog, std::io::Error> {
    let Some(path) = path else {
        return Ok(StateCatalog::default());
    };

    let bytes = fs::read(path).await?;
    let catalog: StateCatalog = serde_json::from_slice(&bytes)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    if catalog.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "state catalog has no states",
        ));
    }
    Ok(catalog)
}

const DEFAULT_STATES: [(&str, &str, &str, &str); 15] = [
    (
        "📚",
        "Study",
        "#4a71ea",
        "Academic study, including coursework and focused interview preparation.",
    ),
    (
        "💼",
        "Work",
        "#d4b37f",
        "Professional work, in the office or remote.",
    ),
    (
        "🚃",
        "Commute",
        "#ff8c00",
        "Regular travel to and from a fixed destination such as office or class.",
    ),
    (
        "💻",
        "Projects",
        "#c49aff",
        "Independent, non-coursework projects, personal or group.",
    ),
    (
        "📺",
        "Entertainment",
        "#ffe066",
        "Entertainment and leisure, indoors or outdoors.",
    ),
    (
        "💡",
        "Exploration",
        "#2ecc71",
        "Casual, interest-driven learning: explanatory videos, blog posts, documentaries.",
    ),
    (
        "🥪",
        "Maintenance",
        "#b56a3b",
        "Food, drinks and quick personal breaks. Only the first hour of a long meal counts here.",
    ),
    (
        "🛏️",
        "Sleep",
        "#ffd6e8",
        "Time in bed for sleep or rest, naps included.",
    ),
    (
        "👔",
        "Mission",
        "#008080",
        "Personal responsibilities and duties to family, friends or others.",
    ),
    (
        "📆",
        "Appointment",
        "#6f42c1",
        "Scheduled appointments and meetings outside routine work meetings.",
    ),
    (
        "💬",
        "Social",
        "#ff6b6b",
        "Actively socialising with friends or acquaintances.",
    ),
    (
        "🚣",
        "Sports",
        "#e74c3c",
        "Physical and sporting activities, training and competition.",
    ),
    (
        "🌴",
        "Holiday",
        "#fff9ba",
        "Spontaneous trips and events, including travel to and from them.",
    ),
    (
        "⚫",
        "Other",
        "#000000",
        "Anything uncategorised, or a temporary marker for a special event.",
    ),
    (
        "🚨",
        "Emergency",
        "#ff0000",
        "Emergencies that disrupt normal schedules. Leave as soon as things settle.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_marks_emergency() {
        let catalog = StateCatalog::default();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.emergency_index, Some(14));
        assert!(catalog.is_emergency(14));
        assert!(!catalog.is_emergency(0));
    }

    #[test]
    fn out_of_range_lookup_falls_back() {
        let catalog = StateCatalog::default();
        assert_eq!(catalog.color_of(99), FALLBACK_COLOR);
        assert_eq!(catalog.name_of(99), FALLBACK_NAME);
        assert_eq!(catalog.name_of(1), "Work");
    }

    #[test]
    fn catalog_file_fields_are_optional() {
        let catalog: StateCatalog = serde_json::from_str(
            r##"{"states":[{"name":"working","color":"#123"},{"name":"resting","color":"#456"}]}"##,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.emergency_index, None);
        assert_eq!(catalog.states[1].emoji, "");
    }

    #[tokio::test]
    async fn missing_path_uses_builtin_catalog() {
        let catalog = load_catalog(None).await.unwrap();
        assert_eq!(catalog, StateCatalog::default());
    }
}
