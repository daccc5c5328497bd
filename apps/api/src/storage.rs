//! Flat-file persistence of the profile record (JSON) and the user's
//! narrative (plain text). Paths are injected at construction; nothing else
//! about them is part of the pipeline's contract.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::schema::IdentifiedProfile;

#[derive(Debug, Clone)]
pub struct ProfileStore {
    profile_path: PathBuf,
    narrative_path: PathBuf,
}

impl ProfileStore {
    pub fn new(profile_path: PathBuf, narrative_path: PathBuf) -> Self {
        Self {
            profile_path,
            narrative_path,
        }
    }

    /// Loads the stored profile, or `None` if none has been saved yet.
    pub async fn load_profile(&self) -> Result<Option<IdentifiedProfile>> {
        match tokio::fs::read(&self.profile_path).await {
            Ok(bytes) => {
                let profile = serde_json::from_slice(&bytes).with_context(|| {
                    format!("stored profile at {:?} is not valid", self.profile_path)
                })?;
                Ok(Some(profile))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {:?}", self.profile_path)),
        }
    }

    pub async fn save_profile(&self, profile: &IdentifiedProfile) -> Result<()> {
        let json = serde_json::to_vec_pretty(profile)?;
        if let Some(parent) = self.profile_path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        tokio::fs::write(&self.profile_path, json)
            .await
            .with_context(|| format!("failed to write {:?}", self.profile_path))?;
        info!("profile saved to {:?}", self.profile_path);
        Ok(())
    }

    /// Loads the narrative, or an empty string if none has been saved.
    pub async fn load_narrative(&self) -> Result<String> {
        match tokio::fs::read_to_string(&self.narrative_path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e).with_context(|| format!("failed to read {:?}", self.narrative_path)),
        }
    }

    pub async fn save_narrative(&self, narrative: &str) -> Result<()> {
        if let Some(parent) = self.narrative_path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        tokio::fs::write(&self.narrative_path, narrative)
            .await
            .with_context(|| format!("failed to write {:?}", self.narrative_path))?;
        info!("narrative saved to {:?}", self.narrative_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ProfileRecord, SkillGroup};

    fn sample_profile() -> IdentifiedProfile {
        IdentifiedProfile::from_record(
            ProfileRecord {
                title: "Engineer".to_string(),
                summary: "Summary.".to_string(),
                experiences: vec![],
                certificates: vec![],
                languages: vec![],
                education: vec![],
                volunteer: vec![],
                skills: vec![SkillGroup {
                    category: "Core".to_string(),
                    skills: vec!["Rust".to_string()],
                }],
            },
            "Jane Doe".to_string(),
            "jane@x.com".to_string(),
            "+1 555 0100".to_string(),
            vec![],
        )
    }

    fn store_in(dir: &tempfile::TempDir) -> ProfileStore {
        ProfileStore::new(
            dir.path().join("cv.json"),
            dir.path().join("user_story.txt"),
        )
    }

    #[tokio::test]
    async fn profile_save_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let profile = sample_profile();
        store.save_profile(&profile).await.unwrap();
        let loaded = store.load_profile().await.unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn missing_profile_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load_profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_narrative_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load_narrative().await.unwrap(), "");
    }

    #[tokio::test]
    async fn narrative_save_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save_narrative("I led the migration.").await.unwrap();
        assert_eq!(
            store.load_narrative().await.unwrap(),
            "I led the migration."
        );
    }

    #[tokio::test]
    async fn corrupt_profile_file_is_an_error_not_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        tokio::fs::write(dir.path().join("cv.json"), b"{not json")
            .await
            .unwrap();
        assert!(store.load_profile().await.is_err());
    }
}
