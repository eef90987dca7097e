//! Mindmap depth selection
//!
//! Maps a complexity score (or an explicit user choice) onto the shape of the
//! mindmap we ask the model for.

use serde::{Deserialize, Serialize};

/// How much detail the generated mindmap should carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Basic,
    Moderate,
    Detailed,
    Comprehensive,
}

impl DetailLevel {
    /// Pick a detail level from a complexity score
    pub fn from_score(score: f64) -> Self {
        if score < 5.0 {
            Self::Basic
        } else if score < 15.0 {
            Self::Moderate
        } else if score < 30.0 {
            Self::Detailed
        } else {
            Self::Comprehensive
        }
    }

    /// Maximum heading depth in the outline
    pub fn max_levels(self) -> u8 {
        match self {
            Self::Basic => 3,
            Self::Moderate => 4,
            Self::Detailed => 5,
            Self::Comprehensive => 6,
        }
    }

    /// How many levels the viewer expands on first render
    pub fn expand_level(self) -> u8 {
        match self {
            Self::Basic | Self::Moderate => 2,
            Self::Detailed | Self::Comprehensive => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Moderate => "moderate",
            Self::Detailed => "detailed",
            Self::Comprehensive => "comprehensive",
        }
    }

    /// Capitalised label for display
    pub fn title(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Moderate => "Moderate",
            Self::Detailed => "Detailed",
            Self::Comprehensive => "Comprehensive",
        }
    }
}

/// Requested detail level: automatic or forced by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailChoice {
    #[default]
    Auto,
    Basic,
    Moderate,
    Detailed,
    Comprehensive,
}

impl DetailChoice {
    /// The forced level, or `None` when detection is automatic
    pub fn forced(self) -> Option<DetailLevel> {
        match self {
            Self::Auto => None,
            Self::Basic => Some(DetailLevel::Basic),
            Self::Moderate => Some(DetailLevel::Moderate),
            Self::Detailed => Some(DetailLevel::Detailed),
            Self::Comprehensive => Some(DetailLevel::Comprehensive),
        }
    }
}

/// Shape of the mindmap to generate and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapConfig {
    pub detail_level: DetailLevel,
    pub max_levels: u8,
    pub expand_level: u8,
}

impl MindmapConfig {
    pub fn for_level(level: DetailLevel) -> Self {
        Self {
            detail_level: level,
            max_levels: level.max_levels(),
            expand_level: level.expand_level(),
        }
    }

    /// Configuration recommended for a complexity score
    pub fn from_score(score: f64) -> Self {
        Self::for_level(DetailLevel::from_score(score))
    }

    /// Resolve a user choice, falling back to the score when automatic
    pub fn resolve(choice: DetailChoice, score: f64) -> Self {
        match choice.forced() {
            Some(level) => Self::for_level(level),
            None => Self::from_score(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_thresholds() {
        assert_eq!(DetailLevel::from_score(0.0), DetailLevel::Basic);
        assert_eq!(DetailLevel::from_score(4.99), DetailLevel::Basic);
        assert_eq!(DetailLevel::from_score(5.0), DetailLevel::Moderate);
        assert_eq!(DetailLevel::from_score(14.9), DetailLevel::Moderate);
        assert_eq!(DetailLevel::from_score(15.0), DetailLevel::Detailed);
        assert_eq!(DetailLevel::from_score(30.0), DetailLevel::Comprehensive);
    }

    #[test]
    fn test_level_shapes() {
        let basic = MindmapConfig::for_level(DetailLevel::Basic);
        assert_eq!((basic.max_levels, basic.expand_level), (3, 2));

        let comprehensive = MindmapConfig::for_level(DetailLevel::Comprehensive);
        assert_eq!((comprehensive.max_levels, comprehensive.expand_level), (6, 1));
    }

    #[test]
    fn test_forced_choice_overrides_score() {
        let config = MindmapConfig::resolve(DetailChoice::Detailed, 1.0);
        assert_eq!(config.detail_level, DetailLevel::Detailed);
        assert_eq!(config.max_levels, 5);

        let auto = MindmapConfig::resolve(DetailChoice::Auto, 1.0);
        assert_eq!(auto.detail_level, DetailLevel::Basic);
    }

    #[test]
    fn test_choice_deserializes_lowercase() {
        let choice: DetailChoice = serde_json::from_str("\"comprehensive\"").unwrap();
        assert_eq!(choice, DetailChoice::Comprehensive);
    }
}
