use serde::{Deserialize, Serialize};

/// The kinds of catalog content a migration can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "movies", alias = "movie")]
    Movies,
    #[serde(rename = "tv_shows", alias = "tv_show")]
    TvShows,
    #[serde(rename = "episodes", alias = "episode")]
    Episodes,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [Self::Movies, Self::TvShows, Self::Episodes];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Movies => "movies",
            Self::TvShows => "tv_shows",
            Self::Episodes => "episodes",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "movies" | "movie" => Some(Self::Movies),
            "tv_shows" | "tv_show" => Some(Self::TvShows),
            "episodes" | "episode" => Some(Self::Episodes),
            _ => None,
        }
    }

    /// Encode an ordered selection as stored in `migration_jobs.content_types`.
    pub fn join(kinds: &[ContentKind]) -> String {
        kinds
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Decode a stored selection. Unknown names are dropped.
    pub fn split(stored: &str) -> Vec<ContentKind> {
        let mut kinds = Vec::new();
        for kind in stored.split(',').filter_map(Self::from_str) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }

    /// Drop repeated kinds, keeping the first occurrence of each.
    pub fn dedup(kinds: &[ContentKind]) -> Vec<ContentKind> {
        let mut unique = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if !unique.contains(kind) {
                unique.push(*kind);
            }
        }
        unique
    }
}

impl From<ContentKind> for String {
    fn from(kind: ContentKind) -> String {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_split_keep_order() {
        let kinds = vec![ContentKind::Episodes, ContentKind::Movies];
        let stored = ContentKind::join(&kinds);

        assert_eq!(stored, "episodes,movies");
        assert_eq!(ContentKind::split(&stored), kinds);
    }

    #[test]
    fn test_split_ignores_unknown_and_repeated_names() {
        let kinds = ContentKind::split("movies,books, tv_shows,movies");
        assert_eq!(kinds, vec![ContentKind::Movies, ContentKind::TvShows]);
    }

    #[test]
    fn test_singular_aliases_deserialize() {
        let kinds: Vec<ContentKind> =
            serde_json::from_str(r#"["movie", "tv_shows", "episode"]"#).unwrap();
        assert_eq!(kinds, ContentKind::ALL.to_vec());
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let kinds = ContentKind::dedup(&[
            ContentKind::TvShows,
            ContentKind::Movies,
            ContentKind::TvShows,
        ]);
        assert_eq!(kinds, vec![ContentKind::TvShows, ContentKind::Movies]);
    }
}
