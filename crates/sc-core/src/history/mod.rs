//! In-memory clip history.
//!
//! [`ClipHistory`] holds the clip list (newest first) together with the
//! current selection. Every mutation the application performs goes through
//! here; the result is mirrored to storage by the application layer.

use thiserror::Error;

use crate::analysis::AnalysisResult;
use crate::clip::{Clip, ClipKind};
use crate::device::LocalDevice;
use crate::ids::ClipId;

pub const ANALYZING_TEXT: &str = "Analyzing Text...";
pub const ANALYZING_IMAGE: &str = "Analyzing Image...";

pub const WELCOME_CLIP_ID: &str = "welcome-1";

/// Content captured locally, before it becomes a [`Clip`].
#[derive(Debug, Clone)]
pub struct ClipDraft {
    pub content: String,
    pub kind: ClipKind,
    pub created_at_ms: i64,
    pub expires_at_ms: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddRejection {
    #[error("content is blank")]
    Blank,

    #[error("content repeats the most recent clip")]
    ConsecutiveDuplicate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipHistory {
    items: Vec<Clip>,
    selected: Option<ClipId>,
    /// Bumped whenever the clip list changes; selection changes do not count.
    revision: u64,
}

impl ClipHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Clip>) -> Self {
        Self {
            items,
            selected: None,
            revision: 0,
        }
    }

    /// A fresh history holding only the welcome clip, selected.
    pub fn seeded(now_ms: i64) -> Self {
        let welcome = welcome_clip(now_ms);
        let selected = Some(welcome.id.clone());
        Self {
            items: vec![welcome],
            selected,
            revision: 0,
        }
    }

    pub fn items(&self) -> &[Clip] {
        &self.items
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ClipId) -> Option<&Clip> {
        self.items.iter().find(|clip| &clip.id == id)
    }

    pub fn contains(&self, id: &ClipId) -> bool {
        self.get(id).is_some()
    }

    pub fn selected_id(&self) -> Option<&ClipId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Clip> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Selects a clip; returns false when it is not in the history.
    pub fn select(&mut self, id: &ClipId) -> bool {
        if self.contains(id) {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Resolves a user reference: a 1-based list position, a full id, or a
    /// unique id prefix.
    pub fn find_by_reference(&self, reference: &str) -> Option<&Clip> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        if let Ok(position) = reference.parse::<usize>() {
            if position >= 1 {
                if let Some(clip) = self.items.get(position - 1) {
                    return Some(clip);
                }
            }
        }

        if let Some(clip) = self.items.iter().find(|clip| clip.id.as_str() == reference) {
            return Some(clip);
        }

        let mut matches = self
            .items
            .iter()
            .filter(|clip| clip.id.as_str().starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(clip), None) => Some(clip),
            _ => None,
        }
    }

    /// Adds a locally captured clip at the top of the history and selects it.
    ///
    /// Blank content is rejected, and so is text identical to the newest clip.
    pub fn add_local(&mut self, draft: ClipDraft, device: &LocalDevice) -> Result<Clip, AddRejection> {
        if draft.content.trim().is_empty() {
            return Err(AddRejection::Blank);
        }

        if draft.kind == ClipKind::Text
            && self
                .items
                .first()
                .is_some_and(|newest| newest.content == draft.content)
        {
            return Err(AddRejection::ConsecutiveDuplicate);
        }

        let placeholder = if draft.kind.is_image() {
            ANALYZING_IMAGE
        } else {
            ANALYZING_TEXT
        };

        let clip = Clip {
            id: ClipId::new(),
            content: draft.content,
            kind: draft.kind,
            timestamp: draft.created_at_ms,
            device_id: device.device_id.clone(),
            device_name: device.device_name.clone(),
            summary: Some(placeholder.to_string()),
            tags: Vec::new(),
            is_favorite: false,
            expires_at: draft.expires_at_ms,
        };

        self.items.insert(0, clip.clone());
        self.selected = Some(clip.id.clone());
        self.revision += 1;
        Ok(clip)
    }

    /// Inserts a clip received from a peer. Returns false for an id already present.
    pub fn insert_remote(&mut self, clip: Clip) -> bool {
        if self.contains(&clip.id) {
            return false;
        }
        self.items.insert(0, clip);
        self.revision += 1;
        true
    }

    pub fn remove(&mut self, id: &ClipId) -> Option<Clip> {
        let index = self.items.iter().position(|clip| &clip.id == id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.revision += 1;
        Some(self.items.remove(index))
    }

    /// Flips the favorite flag; returns the new value.
    pub fn toggle_favorite(&mut self, id: &ClipId) -> Option<bool> {
        let clip = self.items.iter_mut().find(|clip| &clip.id == id)?;
        clip.is_favorite = !clip.is_favorite;
        let favorite = clip.is_favorite;
        self.revision += 1;
        Some(favorite)
    }

    /// Merges an analysis into the clip. Returns false when the clip is gone.
    pub fn apply_analysis(&mut self, id: &ClipId, result: &AnalysisResult) -> bool {
        match self.items.iter_mut().find(|clip| &clip.id == id) {
            Some(clip) => {
                clip.apply_analysis(result);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Drops expired ephemeral clips and returns their ids.
    pub fn sweep_expired(&mut self, now_ms: i64) -> Vec<ClipId> {
        let removed: Vec<ClipId> = self
            .items
            .iter()
            .filter(|clip| clip.is_expired(now_ms))
            .map(|clip| clip.id.clone())
            .collect();

        if removed.is_empty() {
            return removed;
        }

        self.items.retain(|clip| !clip.is_expired(now_ms));
        self.revision += 1;
        if self
            .selected
            .as_ref()
            .is_some_and(|selected| removed.contains(selected))
        {
            self.selected = None;
        }
        removed
    }

    /// Trims the history to `max` clips, dropping the oldest non-favorites
    /// first. Favorites are only dropped once nothing else is left to drop.
    pub fn enforce_capacity(&mut self, max: usize) -> Vec<ClipId> {
        let mut removed = Vec::new();

        while self.items.len() > max {
            let index = self
                .items
                .iter()
                .rposition(|clip| !clip.is_favorite)
                .unwrap_or(self.items.len() - 1);
            let clip = self.items.remove(index);
            if self.selected.as_ref() == Some(&clip.id) {
                self.selected = None;
            }
            removed.push(clip.id);
            self.revision += 1;
        }

        removed
    }
}

/// First-run clip shown when no history has been stored yet.
pub fn welcome_clip(now_ms: i64) -> Clip {
    Clip {
        id: ClipId::from(WELCOME_CLIP_ID),
        content: "Welcome to SyncClip AI! Support for Text, URLs, Code, and Images.".to_string(),
        kind: ClipKind::Text,
        timestamp: now_ms,
        device_id: "system".to_string(),
        device_name: "System".to_string(),
        summary: Some("Welcome Message".to_string()),
        tags: vec!["guide".to_string(), "start".to_string()],
        is_favorite: false,
        expires_at: None,
    }
}
