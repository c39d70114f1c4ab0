use serde::Deserialize;

/// `GET /api/v3/parse` response from Radarr.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrParseResponse {
    pub movie: Option<ArrMedia>,
}

/// `GET /api/v3/parse` response from Sonarr.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrParseResponse {
    pub series: Option<ArrMedia>,
}

/// The movie or series a parse call matched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrMedia {
    pub title: Option<String>,
    pub imdb_id: Option<String>,
    pub original_language: Option<ArrLanguage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrLanguage {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// What a library service knows about a file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTitle {
    pub title: Option<String>,
    /// External catalog id, e.g. `tt0111161`.
    pub imdb_id: Option<String>,
    /// Language name as the service spells it (`"English"`).
    pub language_name: Option<String>,
}

impl From<ArrMedia> for ParsedTitle {
    fn from(media: ArrMedia) -> Self {
        Self {
            title: media.title,
            imdb_id: media.imdb_id.filter(|id| !id.trim().is_empty()),
            language_name: media.original_language.and_then(|l| l.name),
        }
    }
}
