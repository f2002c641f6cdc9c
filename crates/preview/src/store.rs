//! Edit store for the campaign preview. Holds an immutable snapshot and a
//! mutable working copy, applies targeted edits, and tracks unsaved changes.
//!
//! All mutators are synchronous and take `&mut self`: there is exactly one
//! logical writer (the UI event loop), so no locking is needed. An edit whose
//! target id cannot be resolved is a silent no-op, since a concurrent
//! deletion can race with a queued edit.

use crate::types::{AdGroupPreviewRow, AdRow, CampaignPreviewData};
use crate::validate::{validate_campaign_preview, ValidationResult};
use adforge_core::types::{AdDescription, AdHeadline, MatchType};
use tracing::debug;

#[derive(Debug, Default)]
pub struct PreviewStore {
    /// Last saved/loaded snapshot.
    preview_data: Option<CampaignPreviewData>,
    /// Working copy the edits apply to.
    edited: Option<CampaignPreviewData>,
    validation: Option<ValidationResult>,
    has_unsaved_changes: bool,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── State access ──────────────────────────────────────────────────

    pub fn preview_data(&self) -> Option<&CampaignPreviewData> {
        self.preview_data.as_ref()
    }

    pub fn edited(&self) -> Option<&CampaignPreviewData> {
        self.edited.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    // ─── Lifecycle ─────────────────────────────────────────────────────

    /// Load a projection: the snapshot and a deep working copy, clean.
    pub fn set_preview_data(&mut self, data: CampaignPreviewData) {
        self.edited = Some(data.clone());
        self.preview_data = Some(data);
        self.validation = None;
        self.has_unsaved_changes = false;
    }

    /// Promote the working copy to be the new snapshot. No I/O happens here;
    /// persisting the draft is the caller's concern.
    pub fn save_draft(&mut self) {
        if let Some(edited) = &self.edited {
            self.preview_data = Some(edited.clone());
            self.has_unsaved_changes = false;
        }
    }

    pub fn reset(&mut self) {
        self.preview_data = None;
        self.edited = None;
        self.validation = None;
        self.has_unsaved_changes = false;
    }

    /// Re-validate the working copy and cache the report. Pull-based: the
    /// report is not maintained incrementally across edits.
    pub fn validate_campaign(&mut self) -> ValidationResult {
        let result = match &self.edited {
            Some(edited) => validate_campaign_preview(edited),
            None => ValidationResult::default(),
        };
        self.validation = Some(result.clone());
        result
    }

    // ─── Ad group edits ────────────────────────────────────────────────

    pub fn update_ad_group_name(&mut self, ad_group_id: &str, name: &str) {
        if let Some(ad_group) = self.ad_group_mut(ad_group_id) {
            ad_group.name = name.to_string();
            self.mark_dirty();
        }
    }

    // ─── Keyword edits ─────────────────────────────────────────────────

    pub fn update_keyword_text(&mut self, ad_group_id: &str, keyword_id: &str, text: &str) {
        if let Some(keyword) = self.keyword_mut(ad_group_id, keyword_id) {
            keyword.text = text.to_string();
            self.mark_dirty();
        }
    }

    pub fn update_keyword_match_type(
        &mut self,
        ad_group_id: &str,
        keyword_id: &str,
        match_type: MatchType,
    ) {
        if let Some(keyword) = self.keyword_mut(ad_group_id, keyword_id) {
            keyword.match_type = match_type;
            self.mark_dirty();
        }
    }

    /// Delete a keyword. Remaining siblings re-index; no other ad group's
    /// contents change.
    pub fn delete_keyword(&mut self, ad_group_id: &str, keyword_id: &str) {
        let Some(ad_group) = self.ad_group_mut(ad_group_id) else {
            return;
        };
        let before = ad_group.keywords.len();
        ad_group.keywords.retain(|kw| kw.id != keyword_id);
        if ad_group.keywords.len() == before {
            debug!(ad_group_id, keyword_id, "delete target not found, ignoring");
            return;
        }
        self.recompute_totals();
        self.mark_dirty();
    }

    // ─── Ad edits ──────────────────────────────────────────────────────

    pub fn update_headline(&mut self, ad_group_id: &str, ad_id: &str, index: usize, text: &str) {
        if let Some(ad) = self.ad_mut(ad_group_id, ad_id) {
            if let Some(headline) = ad.headlines.get_mut(index) {
                headline.text = text.to_string();
                self.mark_dirty();
            }
        }
    }

    pub fn update_description(
        &mut self,
        ad_group_id: &str,
        ad_id: &str,
        index: usize,
        text: &str,
    ) {
        if let Some(ad) = self.ad_mut(ad_group_id, ad_id) {
            if let Some(description) = ad.descriptions.get_mut(index) {
                description.text = text.to_string();
                self.mark_dirty();
            }
        }
    }

    pub fn update_final_url(&mut self, ad_group_id: &str, ad_id: &str, url: &str) {
        if let Some(ad) = self.ad_mut(ad_group_id, ad_id) {
            ad.final_url = url.to_string();
            self.mark_dirty();
        }
    }

    /// Delete an ad. The store does not enforce the headline/description
    /// floors on the remaining ads; callers check before deleting.
    pub fn delete_rsa(&mut self, ad_group_id: &str, ad_id: &str) {
        let Some(ad_group) = self.ad_group_mut(ad_group_id) else {
            return;
        };
        let before = ad_group.ads.len();
        ad_group.ads.retain(|ad| ad.id != ad_id);
        if ad_group.ads.len() == before {
            debug!(ad_group_id, ad_id, "delete target not found, ignoring");
            return;
        }
        self.recompute_totals();
        self.mark_dirty();
    }

    pub fn add_headline(&mut self, ad_group_id: &str, ad_id: &str, text: &str) {
        if let Some(ad) = self.ad_mut(ad_group_id, ad_id) {
            let position = ad.headlines.len();
            ad.headlines.push(AdHeadline {
                text: text.to_string(),
                pinned: Some(false),
                position: Some(position),
            });
            self.mark_dirty();
        }
    }

    pub fn add_description(&mut self, ad_group_id: &str, ad_id: &str, text: &str) {
        if let Some(ad) = self.ad_mut(ad_group_id, ad_id) {
            ad.descriptions.push(AdDescription {
                text: text.to_string(),
            });
            self.mark_dirty();
        }
    }

    /// Delete one headline by index. The caller enforces the ≥3 floor before
    /// invoking this.
    pub fn delete_headline(&mut self, ad_group_id: &str, ad_id: &str, index: usize) {
        if let Some(ad) = self.ad_mut(ad_group_id, ad_id) {
            if index < ad.headlines.len() {
                ad.headlines.remove(index);
                self.mark_dirty();
            }
        }
    }

    pub fn delete_description(&mut self, ad_group_id: &str, ad_id: &str, index: usize) {
        if let Some(ad) = self.ad_mut(ad_group_id, ad_id) {
            if index < ad.descriptions.len() {
                ad.descriptions.remove(index);
                self.mark_dirty();
            }
        }
    }

    // ─── Internals ─────────────────────────────────────────────────────

    fn mark_dirty(&mut self) {
        self.has_unsaved_changes = true;
    }

    fn recompute_totals(&mut self) {
        if let Some(edited) = &mut self.edited {
            edited.recompute_totals();
        }
    }

    fn ad_group_mut(&mut self, ad_group_id: &str) -> Option<&mut AdGroupPreviewRow> {
        let found = self
            .edited
            .as_mut()?
            .ad_groups
            .iter_mut()
            .find(|ag| ag.id == ad_group_id);
        if found.is_none() {
            debug!(ad_group_id, "ad group not found, ignoring edit");
        }
        found
    }

    fn keyword_mut(
        &mut self,
        ad_group_id: &str,
        keyword_id: &str,
    ) -> Option<&mut crate::types::KeywordRow> {
        let found = self
            .ad_group_mut(ad_group_id)?
            .keywords
            .iter_mut()
            .find(|kw| kw.id == keyword_id);
        if found.is_none() {
            debug!(ad_group_id, keyword_id, "keyword not found, ignoring edit");
        }
        found
    }

    fn ad_mut(&mut self, ad_group_id: &str, ad_id: &str) -> Option<&mut AdRow> {
        let found = self
            .ad_group_mut(ad_group_id)?
            .ads
            .iter_mut()
            .find(|ad| ad.id == ad_id);
        if found.is_none() {
            debug!(ad_group_id, ad_id, "ad not found, ignoring edit");
        }
        found
    }
}
