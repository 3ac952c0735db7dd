use serde::{Deserialize, Serialize};

/// Kind of a catalog entry as it appears in search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Tv,
    Person,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
        }
    }

    /// Display label used in synthesized subtitles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Tv => "TV",
            Self::Person => "Person",
        }
    }

    /// Parse a provider `media_type` tag. Unknown or empty tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            "person" => Some(Self::Person),
            _ => None,
        }
    }

    /// Whether titles of this kind can carry watch-provider data.
    pub fn is_title(self) -> bool {
        matches!(self, Self::Movie | Self::Tv)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search scope requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Multi,
    Movie,
    Tv,
    Person,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Multi => "multi",
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Person => "person",
        }
    }

    /// Lenient parse of the `type` query parameter; anything unrecognised is `Multi`.
    pub fn normalize(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Multi;
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "movie" => Self::Movie,
            "tv" | "tvshow" | "television" => Self::Tv,
            "person" => Self::Person,
            _ => Self::Multi,
        }
    }

    /// The media kind implied by a typed search, if any.
    pub fn implied_kind(self) -> Option<MediaKind> {
        match self {
            Self::Movie => Some(MediaKind::Movie),
            Self::Tv => Some(MediaKind::Tv),
            Self::Person => Some(MediaKind::Person),
            Self::Multi => None,
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_type_normalization() {
        assert_eq!(SearchType::normalize(None), SearchType::Multi);
        assert_eq!(SearchType::normalize(Some("  ")), SearchType::Multi);
        assert_eq!(SearchType::normalize(Some("media")), SearchType::Multi);
        assert_eq!(SearchType::normalize(Some("MOVIE")), SearchType::Movie);
        assert_eq!(SearchType::normalize(Some("tvshow")), SearchType::Tv);
        assert_eq!(SearchType::normalize(Some("Television")), SearchType::Tv);
        assert_eq!(SearchType::normalize(Some("person")), SearchType::Person);
        assert_eq!(SearchType::normalize(Some("episode")), SearchType::Multi);
    }

    #[test]
    fn media_kind_tags() {
        assert_eq!(MediaKind::from_tag(" TV "), Some(MediaKind::Tv));
        assert_eq!(MediaKind::from_tag(""), None);
        assert_eq!(MediaKind::from_tag("collection"), None);
        assert_eq!(
            serde_json::to_string(&MediaKind::Movie).unwrap(),
            "\"movie\""
        );
        assert!(!MediaKind::Person.is_title());
    }
}
