//! Learned listening preferences.
//!
//! One JSON document holds the append-only mood and feedback histories plus a
//! per-mood profile of queries that worked and videos the listener rated.
//! Everything is keyed by the normalized mood text.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use utils::assets::ensure_parent_dir;

/// Store handle shared by every request in the process.
pub type SharedPreferenceStore = Arc<RwLock<PreferenceStore>>;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to write preferences to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Lowercased, trimmed mood text: the join key for history and profiles.
pub fn normalize_mood_key(mood_text: &str) -> String {
    mood_text.trim().to_lowercase()
}

/// Like / dislike, or anything else a client sent (kept in history only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FeedbackKind {
    Like,
    Dislike,
    Other(String),
}

impl FeedbackKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "like" => FeedbackKind::Like,
            "dislike" => FeedbackKind::Dislike,
            _ => FeedbackKind::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FeedbackKind::Like => "like",
            FeedbackKind::Dislike => "dislike",
            FeedbackKind::Other(raw) => raw,
        }
    }
}

impl From<String> for FeedbackKind {
    fn from(raw: String) -> Self {
        FeedbackKind::parse(&raw)
    }
}

impl From<FeedbackKind> for String {
    fn from(kind: FeedbackKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub mood: String,
    #[serde(default)]
    pub mood_normalized: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub industry: Option<String>,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub mood: String,
    #[serde(default)]
    pub mood_normalized: String,
    pub feedback: FeedbackKind,
    pub query: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub video_id: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub video_title: Option<String>,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// A rated video inside a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub video_id: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(with = "timestamp", default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodProfile {
    #[serde(default)]
    pub successful_queries: Vec<String>,
    #[serde(default)]
    pub liked_videos: Vec<VideoRef>,
    #[serde(default)]
    pub disliked_videos: Vec<VideoRef>,
}

impl MoodProfile {
    fn add_successful_query(&mut self, query: &str) {
        if !self.successful_queries.iter().any(|q| q == query) {
            self.successful_queries.push(query.to_string());
        }
    }

    fn add_video(videos: &mut Vec<VideoRef>, video_id: &str, title: Option<&str>) {
        if videos.iter().any(|v| v.video_id == video_id) {
            return;
        }
        videos.push(VideoRef {
            video_id: video_id.to_string(),
            title: title.map(str::to_string),
            timestamp: Utc::now(),
        });
    }

    pub fn disliked_ids(&self) -> HashSet<String> {
        self.disliked_videos
            .iter()
            .map(|v| v.video_id.clone())
            .collect()
    }
}

/// On-disk document shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceData {
    #[serde(default)]
    pub mood_history: Vec<MoodRecord>,
    #[serde(default)]
    pub feedback_history: Vec<FeedbackRecord>,
    #[serde(default)]
    pub refined_keywords: BTreeMap<String, MoodProfile>,
}

impl PreferenceData {
    /// Fill in keys that older documents did not store.
    fn backfill_keys(&mut self) {
        for record in &mut self.mood_history {
            if record.mood_normalized.is_empty() {
                record.mood_normalized = normalize_mood_key(&record.mood);
            }
        }
        for record in &mut self.feedback_history {
            if record.mood_normalized.is_empty() {
                record.mood_normalized = normalize_mood_key(&record.mood);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    data: PreferenceData,
}

impl PreferenceStore {
    /// Empty store that will save to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: PreferenceData::default(),
        }
    }

    /// Load from `path`. A missing, unreadable, or corrupt file yields an
    /// empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No preferences at {} - starting fresh", path.display());
                return Self::new(path);
            }
            Err(e) => {
                tracing::warn!("Could not read preferences at {}: {}", path.display(), e);
                return Self::new(path);
            }
        };

        match serde_json::from_str::<PreferenceData>(&contents) {
            Ok(mut data) => {
                data.backfill_keys();
                tracing::info!(
                    "Loaded preferences from {} ({} moods, {} feedback, {} profiles)",
                    path.display(),
                    data.mood_history.len(),
                    data.feedback_history.len(),
                    data.refined_keywords.len()
                );
                Self { path, data }
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unparsable preferences at {}: {}",
                    path.display(),
                    e
                );
                Self::new(path)
            }
        }
    }

    pub fn into_shared(self) -> SharedPreferenceStore {
        Arc::new(RwLock::new(self))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &PreferenceData {
        &self.data
    }

    pub fn mood_history(&self) -> &[MoodRecord] {
        &self.data.mood_history
    }

    pub fn feedback_history(&self) -> &[FeedbackRecord] {
        &self.data.feedback_history
    }

    pub fn profile(&self, mood_key: &str) -> Option<&MoodProfile> {
        self.data.refined_keywords.get(&normalize_mood_key(mood_key))
    }

    /// Write the whole document. Goes through a sibling temp file and a
    /// rename so a crash never leaves a half-written document behind.
    pub fn save(&self) -> Result<(), PreferenceError> {
        let io_error = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        ensure_parent_dir(&self.path).map_err(io_error)?;
        let serialized = serde_json::to_string_pretty(&self.data)?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, serialized).map_err(io_error)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_error)?;

        tracing::debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }

    pub fn record_mood(&mut self, mood_text: &str, genre: Option<&str>, industry: Option<&str>) {
        self.data.mood_history.push(MoodRecord {
            mood: mood_text.to_string(),
            mood_normalized: normalize_mood_key(mood_text),
            genre: non_blank(genre),
            industry: non_blank(industry),
            timestamp: Utc::now(),
        });
    }

    pub fn record_feedback(
        &mut self,
        mood_text: &str,
        feedback: FeedbackKind,
        query: &str,
        video_id: Option<&str>,
        video_title: Option<&str>,
    ) {
        let mood_key = normalize_mood_key(mood_text);
        let video_id = non_blank(video_id);
        let video_title = non_blank(video_title);

        self.data.feedback_history.push(FeedbackRecord {
            mood: mood_text.to_string(),
            mood_normalized: mood_key.clone(),
            feedback: feedback.clone(),
            query: query.to_string(),
            video_id: video_id.clone(),
            video_title: video_title.clone(),
            timestamp: Utc::now(),
        });

        let profile = self.data.refined_keywords.entry(mood_key).or_default();
        match feedback {
            FeedbackKind::Like => {
                profile.add_successful_query(query);
                if let Some(id) = video_id.as_deref() {
                    MoodProfile::add_video(&mut profile.liked_videos, id, video_title.as_deref());
                }
            }
            FeedbackKind::Dislike => {
                if let Some(id) = video_id.as_deref() {
                    MoodProfile::add_video(
                        &mut profile.disliked_videos,
                        id,
                        video_title.as_deref(),
                    );
                }
            }
            FeedbackKind::Other(ref raw) => {
                tracing::debug!("Feedback kind '{}' recorded without learning", raw);
            }
        }
    }

    /// A previously liked query for this mood, chosen uniformly at random.
    pub fn best_known_query(&self, mood_key: &str) -> Option<String> {
        self.profile(mood_key)?
            .successful_queries
            .choose(&mut rand::thread_rng())
            .cloned()
    }

    pub fn disliked_video_ids(&self, mood_key: &str) -> HashSet<String> {
        self.profile(mood_key)
            .map(MoodProfile::disliked_ids)
            .unwrap_or_default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// RFC 3339 on write; RFC 3339 or naive ISO-8601 (read as UTC) on load.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, PreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::load(dir.path().join("user_preferences.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_yields_empty_skeleton() {
        let (_dir, store) = temp_store();
        assert!(store.mood_history().is_empty());
        assert!(store.feedback_history().is_empty());
        assert!(store.data().refined_keywords.is_empty());
    }

    #[test]
    fn test_corrupt_file_yields_empty_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_preferences.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = PreferenceStore::load(&path);

        assert_eq!(store.data(), &PreferenceData::default());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_empty_object_fills_all_collections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{}").unwrap();

        let store = PreferenceStore::load(&path);
        store.save().unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["mood_history"], serde_json::json!([]));
        assert_eq!(saved["feedback_history"], serde_json::json!([]));
        assert_eq!(saved["refined_keywords"], serde_json::json!({}));
    }

    #[test]
    fn test_like_twice_keeps_one_query() {
        let (_dir, mut store) = temp_store();
        store.record_feedback("Happy", FeedbackKind::Like, "pop hits", None, None);
        store.record_feedback("happy ", FeedbackKind::Like, "pop hits", None, None);

        let profile = store.profile("happy").unwrap();
        assert_eq!(profile.successful_queries, vec!["pop hits".to_string()]);
        assert_eq!(store.feedback_history().len(), 2);
    }

    #[test]
    fn test_dislike_twice_keeps_one_video() {
        let (_dir, mut store) = temp_store();
        for _ in 0..2 {
            store.record_feedback(
                "gloomy",
                FeedbackKind::Dislike,
                "sad songs",
                Some("v1"),
                Some("Song"),
            );
        }

        let profile = store.profile("gloomy").unwrap();
        assert_eq!(profile.disliked_videos.len(), 1);
        assert!(profile.successful_queries.is_empty());
        assert_eq!(
            store.disliked_video_ids("gloomy"),
            HashSet::from(["v1".to_string()])
        );
    }

    #[test]
    fn test_like_with_video_tracks_liked_video_once() {
        let (_dir, mut store) = temp_store();
        store.record_feedback("calm", FeedbackKind::Like, "lofi", Some("a"), Some("A"));
        store.record_feedback("calm", FeedbackKind::Like, "piano", Some("a"), Some("A"));
        store.record_feedback("calm", FeedbackKind::Like, "lofi", Some("b"), None);

        let profile = store.profile("calm").unwrap();
        assert_eq!(profile.successful_queries, vec!["lofi", "piano"]);
        let ids: Vec<_> = profile.liked_videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_feedback_is_history_only() {
        let (_dir, mut store) = temp_store();
        store.record_feedback("meh", FeedbackKind::parse("skip"), "q", Some("v9"), None);

        assert_eq!(store.feedback_history().len(), 1);
        assert_eq!(store.feedback_history()[0].feedback.as_str(), "skip");
        let profile = store.profile("meh").unwrap();
        assert_eq!(profile, &MoodProfile::default());
    }

    #[test]
    fn test_blank_video_id_is_absent() {
        let (_dir, mut store) = temp_store();
        store.record_feedback("x", FeedbackKind::Dislike, "q", Some(""), Some(""));

        assert_eq!(store.feedback_history()[0].video_id, None);
        assert!(store.disliked_video_ids("x").is_empty());
    }

    #[test]
    fn test_best_known_query_draws_from_successful_queries() {
        let (_dir, mut store) = temp_store();
        let liked = ["lofi beats", "rainy jazz", "soft piano"];
        for query in liked {
            store.record_feedback("Studying Late", FeedbackKind::Like, query, None, None);
        }

        for _ in 0..100 {
            let query = store.best_known_query("studying late").unwrap();
            assert!(liked.contains(&query.as_str()));
        }
    }

    #[test]
    fn test_best_known_query_none_without_likes() {
        let (_dir, mut store) = temp_store();
        assert_eq!(store.best_known_query("anything"), None);

        store.record_feedback("anything", FeedbackKind::Dislike, "q", Some("v"), None);
        assert_eq!(store.best_known_query("anything"), None);
    }

    #[test]
    fn test_disliked_ids_empty_without_profile() {
        let (_dir, store) = temp_store();
        assert!(store.disliked_video_ids("unknown").is_empty());
    }

    #[test]
    fn test_record_mood_is_not_persisted_automatically() {
        let (_dir, mut store) = temp_store();
        store.record_mood("  Chill Evening ", Some("jazz"), Some(""));

        let record = &store.mood_history()[0];
        assert_eq!(record.mood_normalized, "chill evening");
        assert_eq!(record.genre.as_deref(), Some("jazz"));
        assert_eq!(record.industry, None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, mut store) = temp_store();
        store.record_mood("happy", Some("pop"), Some("hollywood"));
        store.record_feedback("happy", FeedbackKind::Like, "pop hits", Some("v1"), Some("One"));
        store.record_feedback("sad", FeedbackKind::Dislike, "sad songs", Some("v2"), None);
        store.save().unwrap();

        let reloaded = PreferenceStore::load(store.path());

        assert_eq!(reloaded.data(), store.data());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (dir, store) = temp_store();
        store.save().unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["user_preferences.json".to_string()]);
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested/state/prefs.json"));
        store.save().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_loads_document_written_by_earlier_versions() {
        let legacy = r#"{
          "mood_history": [
            {"mood": "Feeling Great", "genre": "any", "industry": "any", "timestamp": "2024-05-01T10:15:30.123456"}
          ],
          "feedback_history": [
            {"mood": "Feeling Great", "mood_normalized": "feeling great", "feedback": "like",
             "query": "upbeat happy energetic music", "video_id": "", "video_title": "",
             "timestamp": "2024-05-01T10:16:00"}
          ],
          "refined_keywords": {
            "feeling great": {
              "liked_keywords": [], "disliked_keywords": [],
              "successful_queries": ["upbeat happy energetic music"],
              "liked_videos": [], "disliked_videos": [
                {"video_id": "abc", "title": null, "timestamp": "2024-05-01T10:17:00.5"}
              ]
            }
          }
        }"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, legacy).unwrap();

        let store = PreferenceStore::load(&path);

        assert_eq!(store.mood_history().len(), 1);
        assert_eq!(store.mood_history()[0].mood_normalized, "feeling great");
        assert_eq!(store.feedback_history()[0].video_id, None);
        assert_eq!(store.feedback_history()[0].feedback, FeedbackKind::Like);
        assert_eq!(
            store.best_known_query("Feeling Great").as_deref(),
            Some("upbeat happy energetic music")
        );
        assert!(store.disliked_video_ids("feeling great").contains("abc"));
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(timestamp::parse("2024-05-01T10:15:30+02:00").is_some());
        assert!(timestamp::parse("2024-05-01T10:15:30.123456").is_some());
        assert!(timestamp::parse("2024-05-01T10:15:30").is_some());
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_feedback_kind_parsing() {
        assert_eq!(FeedbackKind::parse(" LIKE "), FeedbackKind::Like);
        assert_eq!(FeedbackKind::parse("dislike"), FeedbackKind::Dislike);
        assert_eq!(
            FeedbackKind::parse("meh"),
            FeedbackKind::Other("meh".to_string())
        );
        assert_eq!(
            serde_json::to_string(&FeedbackKind::Dislike).unwrap(),
            "\"dislike\""
        );
    }
}
