//! Tags and notes on a lead's profile page.

use uuid::Uuid;

use crate::error::ValidationError;
use crate::types::{Lead, LeadNote};

/// Date shown on a note until the page is reloaded.
pub const JUST_NOW: &str = "Just now";

/// A note with a fresh id, or `NoteRequired` when `text` is blank.
pub fn new_note(text: &str) -> Result<LeadNote, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::NoteRequired);
    }
    Ok(LeadNote {
        id: format!("n{}", Uuid::new_v4().simple()),
        text: text.to_string(),
        date: JUST_NOW.to_string(),
    })
}

impl Lead {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Appends the trimmed tag. Returns false when it is blank or already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    pub fn prepend_note(&mut self, note: LeadNote) {
        self.notes.insert(0, note);
    }

    pub fn add_note(&mut self, text: &str) -> Result<&LeadNote, ValidationError> {
        let note = new_note(text)?;
        self.prepend_note(note);
        Ok(&self.notes[0])
    }
}
