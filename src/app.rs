use crate::config::SessionConfig;
use crate::ids::IdGenerator;
use crate::store::NoteStore;
use crate::{Note, NotePreview, Result, SessionError, markup, palette};
use log::{debug, info, trace, warn};

/// Unsaved note being composed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub content: String,
    pub color: Option<String>,
}

/// Working copy of the note that is currently open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: i64,
    pub content: String,
    pub color: Option<String>,
}

/// What the user is currently doing with notes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Idle,
    Composing,
    Editing,
}

/// Owns the in-memory notes plus the draft, selection and palette state, and is the
/// only writer of the note store. Every mutation is written through before returning;
/// a failed write rolls the in-memory change back.
pub struct NoteSession {
    store: NoteStore,
    config: SessionConfig,
    ids: IdGenerator,
    notes: Vec<Note>,
    draft: Draft,
    selection: Option<Selection>,
    palette_visible: bool,
}

impl NoteSession {
    /// Loads the stored notes and starts idle with an empty draft.
    #[must_use]
    pub fn init(store: NoteStore, config: SessionConfig) -> Self {
        Self::with_id_generator(store, config, IdGenerator::default())
    }

    #[must_use]
    pub fn with_id_generator(store: NoteStore, config: SessionConfig, mut ids: IdGenerator) -> Self {
        let notes = store.load();
        for note in &notes {
            ids.observe(note.id);
        }
        let draft = Self::empty_draft(&config);
        info!("Session started with {} notes", notes.len());

        Self {
            store,
            config,
            ids,
            notes,
            draft,
            selection: None,
            palette_visible: false,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        if self.selection.is_some() {
            Focus::Editing
        } else if self.draft.content.is_empty() {
            Focus::Idle
        } else {
            Focus::Composing
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// All saved notes in the order they were created
    #[must_use]
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// Preview rows for the notes grid
    #[must_use]
    pub fn previews(&self) -> Vec<NotePreview> {
        self.notes
            .iter()
            .map(|note| NotePreview {
                id: note.id,
                color: note
                    .color
                    .as_deref()
                    .map_or_else(|| "-".to_string(), markup::strip_controls),
                preview: markup::preview(
                    &note.content,
                    self.config.preview_lines,
                    self.config.preview_width,
                ),
            })
            .collect()
    }

    // --- draft ---

    pub fn set_draft_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
        trace!("Draft is now {} bytes", self.draft.content.len());
    }

    /// Sets the color the next saved note gets. Callers are expected to pass a palette entry.
    pub fn set_draft_color(&mut self, color: &str) {
        if !self.config.enable_color {
            warn!("Coloring is disabled, ignoring color {color}");
            return;
        }
        if !palette::contains(color) {
            warn!("Color {color} is not in the palette");
        }
        self.draft.color = Some(color.to_string());
    }

    #[must_use]
    pub const fn palette_visible(&self) -> bool {
        self.palette_visible
    }

    pub fn toggle_palette(&mut self) {
        self.palette_visible = self.config.enable_color && !self.palette_visible;
        trace!("Palette visible: {}", self.palette_visible);
    }

    /// Choosing a swatch sets the draft color and hides the palette
    pub fn pick_color(&mut self, color: &str) {
        self.set_draft_color(color);
        self.palette_visible = false;
    }

    /// Commits the draft as a new note and resets the draft.
    ///
    /// # Errors
    ///
    /// - `SessionError::EmptyDraft` if the draft has no visible content
    /// - `SessionError::IdsExhausted` if no ID above the largest stored one is left
    /// - Backend errors from the write. The note is not kept and the draft survives
    pub fn save(&mut self) -> Result<Note> {
        if markup::is_blank(&self.draft.content) {
            return Err(SessionError::EmptyDraft.into());
        }

        let id = self.ids.next_id().ok_or(SessionError::IdsExhausted)?;
        let note = Note {
            id,
            content: self.draft.content.clone(),
            color: self.draft.color.clone(),
        };
        self.notes.push(note.clone());

        if let Err(e) = self.store.save_all(&self.notes) {
            self.notes.pop();
            return Err(e);
        }

        self.draft = Self::empty_draft(&self.config);
        info!("Saved note with ID: {}", note.id);
        Ok(note)
    }

    // --- selection ---

    /// Opens a note for editing. Any other open note is closed and its edits are lost.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` if no note has this ID
    pub fn open(&mut self, id: i64) -> Result<&Selection> {
        let Some(note) = self.notes.iter().find(|n| n.id == id) else {
            return Err(SessionError::NotFound(id).into());
        };

        if let Some(previous) = &self.selection {
            debug!("Discarding open note {} to open {id}", previous.id);
        }

        let selection = Selection {
            id: note.id,
            content: note.content.clone(),
            color: note.color.clone(),
        };
        trace!("Opened note {id}");
        Ok(&*self.selection.insert(selection))
    }

    /// Changes the working copy of the open note. Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if no note is open
    pub fn set_selection_content(&mut self, content: impl Into<String>) -> Result<()> {
        let selection = self.selection.as_mut().ok_or(SessionError::NoSelection)?;
        selection.content = content.into();
        Ok(())
    }

    /// Writes the open note's content back and closes it. The color is left as stored.
    ///
    /// # Errors
    ///
    /// - `SessionError::NoSelection` if no note is open
    /// - Backend errors from the write. The stored note is unchanged and the note stays open
    pub fn update(&mut self) -> Result<()> {
        let selection = self.selection.as_ref().ok_or(SessionError::NoSelection)?;
        let id = selection.id;

        let Some(idx) = self.notes.iter().position(|n| n.id == id) else {
            self.selection = None;
            return Err(SessionError::NotFound(id).into());
        };

        let previous = std::mem::replace(&mut self.notes[idx].content, selection.content.clone());
        if let Err(e) = self.store.save_all(&self.notes) {
            self.notes[idx].content = previous;
            return Err(e);
        }

        self.selection = None;
        info!("Updated note with ID: {id}");
        Ok(())
    }

    /// Removes a note. Deleting a missing ID does nothing. If the note is open it is closed.
    ///
    /// # Errors
    ///
    /// Backend errors from the write. The note is put back and stays open if it was
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let Some(idx) = self.notes.iter().position(|n| n.id == id) else {
            debug!("No note with ID {id} to delete");
            return Ok(());
        };

        let removed = self.notes.remove(idx);
        if let Err(e) = self.store.save_all(&self.notes) {
            self.notes.insert(idx, removed);
            return Err(e);
        }

        if self.selection.as_ref().is_some_and(|s| s.id == id) {
            self.selection = None;
        }
        info!("Deleted note with ID: {id}");
        Ok(())
    }

    /// Closes the open note without saving its edits.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if no note is open
    pub fn close(&mut self) -> Result<()> {
        let selection = self.selection.take().ok_or(SessionError::NoSelection)?;
        trace!("Closed note {}", selection.id);
        Ok(())
    }

    /// Deletes every note and removes the storage key.
    ///
    /// # Errors
    ///
    /// Backend errors from the removal. Nothing is dropped in that case
    pub fn clear_all(&mut self) -> Result<()> {
        let notes = std::mem::take(&mut self.notes);
        if let Err(e) = self.store.clear() {
            self.notes = notes;
            return Err(e);
        }
        self.selection = None;
        info!("Cleared {} notes", notes.len());
        Ok(())
    }

    fn empty_draft(config: &SessionConfig) -> Draft {
        Draft {
            content: String::new(),
            color: config
                .enable_color
                .then(|| palette::DEFAULT_COLOR.to_string()),
        }
    }
}
