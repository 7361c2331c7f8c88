use noteboard::backends::{FilesystemBackend, MemoryBackend, SqliteBackend};
use noteboard::ids::IdGenerator;
use noteboard::store::DEFAULT_STORAGE_KEY;
use noteboard::{
    BackendError, Note, NoteError, NoteSession, NoteStore, Result, SessionConfig, SessionError,
    StorageBackend,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use tempfile::TempDir;

fn frozen() -> i64 {
    1_700_000_000_000
}

fn store_on(backend: &MemoryBackend) -> NoteStore {
    NoteStore::new(Box::new(backend.clone()), DEFAULT_STORAGE_KEY)
}

fn session_on(backend: &MemoryBackend) -> NoteSession {
    NoteSession::with_id_generator(
        store_on(backend),
        SessionConfig::default(),
        IdGenerator::new(frozen),
    )
}

/// What a fresh session would see
fn reloaded(backend: &MemoryBackend) -> Vec<Note> {
    store_on(backend).load()
}

fn save(session: &mut NoteSession, content: &str) -> Note {
    session.set_draft_content(content);
    session.save().unwrap()
}

#[test]
fn full_lifecycle_scenario() {
    let backend = MemoryBackend::new();
    assert!(reloaded(&backend).is_empty());

    let mut session = session_on(&backend);
    let note = save(&mut session, "<p>hi</p>");
    assert_eq!(session.list(), [note.clone()]);
    assert_eq!(note.content, "<p>hi</p>");
    assert_eq!(note.color.as_deref(), Some("#ffffff"));

    session.open(note.id).unwrap();
    session.set_selection_content("<p>bye</p>").unwrap();
    session.update().unwrap();
    assert_eq!(session.list()[0].id, note.id);
    assert_eq!(session.list()[0].content, "<p>bye</p>");
    assert!(session.selection().is_none());

    session.delete(note.id).unwrap();
    assert!(session.list().is_empty());
    let err = session.open(note.id).unwrap_err();
    assert!(matches!(
        err,
        NoteError::Session(SessionError::NotFound(id)) if id == note.id
    ));
}

#[test]
fn rapid_saves_in_one_tick_get_distinct_ids() {
    let backend = MemoryBackend::new();
    let mut session = session_on(&backend);

    let ids: Vec<i64> = (0..50)
        .map(|i| save(&mut session, &format!("<p>{i}</p>")).id)
        .collect();
    let unique: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn ids_stay_unique_across_sessions_on_a_frozen_clock() {
    let backend = MemoryBackend::new();
    let first = save(&mut session_on(&backend), "<p>a</p>").id;
    let second = save(&mut session_on(&backend), "<p>b</p>").id;
    assert!(second > first);
    assert_eq!(reloaded(&backend).len(), 2);
}

#[test]
fn list_length_is_saves_minus_deletes() {
    let backend = MemoryBackend::new();
    let mut session = session_on(&backend);

    let notes: Vec<Note> = (0..6)
        .map(|i| save(&mut session, &format!("<p>{i}</p>")))
        .collect();
    session.delete(notes[1].id).unwrap();
    session.delete(notes[4].id).unwrap();

    assert_eq!(session.list().len(), 4);
    let order: Vec<i64> = session.list().iter().map(|n| n.id).collect();
    assert_eq!(
        order,
        [notes[0].id, notes[2].id, notes[3].id, notes[5].id]
    );
}

#[test]
fn open_then_close_never_writes() {
    let backend = MemoryBackend::new();
    let mut session = session_on(&backend);
    let note = save(&mut session, "<p>a</p>");
    let before = backend.get(DEFAULT_STORAGE_KEY).unwrap();

    session.open(note.id).unwrap();
    session.set_selection_content("<p>scratch</p>").unwrap();
    session.close().unwrap();

    assert_eq!(backend.get(DEFAULT_STORAGE_KEY).unwrap(), before);
    assert_eq!(session.list()[0].content, "<p>a</p>");
}

#[test]
fn delete_is_idempotent() {
    let backend = MemoryBackend::new();
    let mut session = session_on(&backend);
    let keep = save(&mut session, "<p>keep</p>");
    let gone = save(&mut session, "<p>gone</p>");

    session.delete(gone.id).unwrap();
    let once = (session.list().to_vec(), reloaded(&backend));
    session.delete(gone.id).unwrap();
    let twice = (session.list().to_vec(), reloaded(&backend));

    assert_eq!(once, twice);
    assert_eq!(twice.0, [keep]);
}

#[test]
fn storage_matches_memory_after_every_mutation() {
    let backend = MemoryBackend::new();
    let mut session = session_on(&backend);

    let a = save(&mut session, "<p>a</p>");
    assert_eq!(reloaded(&backend), session.list());

    session.set_draft_content("<p>b</p>");
    session.pick_color("#fbbc04");
    session.save().unwrap();
    assert_eq!(reloaded(&backend), session.list());

    session.open(a.id).unwrap();
    session.set_selection_content("<p>a2</p>").unwrap();
    session.update().unwrap();
    assert_eq!(reloaded(&backend), session.list());

    session.delete(a.id).unwrap();
    assert_eq!(reloaded(&backend), session.list());

    session.clear_all().unwrap();
    assert_eq!(reloaded(&backend), session.list());
    assert!(backend.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
}

#[test]
fn draft_is_not_persisted_until_saved() {
    let backend = MemoryBackend::new();
    let mut session = session_on(&backend);
    session.set_draft_content("<p>pending</p>");
    assert!(reloaded(&backend).is_empty());
    assert!(session.list().is_empty());
}

#[test]
fn malformed_storage_starts_an_empty_session() {
    let backend = MemoryBackend::new();
    backend.set(DEFAULT_STORAGE_KEY, "{ definitely not notes").unwrap();

    let mut session = session_on(&backend);
    assert!(session.list().is_empty());

    save(&mut session, "<p>fresh</p>");
    assert_eq!(reloaded(&backend).len(), 1);
}

#[test]
fn notes_written_by_the_browser_widget_load() {
    let backend = MemoryBackend::new();
    backend
        .set(
            DEFAULT_STORAGE_KEY,
            r##"[{"id":1718000000000,"content":"<p>one</p>","color":"#f28b82"},{"id":1718000000001,"content":"<p>two</p>"}]"##,
        )
        .unwrap();

    let session = session_on(&backend);
    assert_eq!(session.list().len(), 2);
    assert_eq!(session.list()[0].color.as_deref(), Some("#f28b82"));
    assert_eq!(session.list()[1].color, None);
}

#[test]
fn save_fails_cleanly_once_ids_run_out() {
    let backend = MemoryBackend::new();
    let stored = format!(r#"[{{"id":{},"content":"<p>x</p>"}}]"#, i64::MAX);
    backend.set(DEFAULT_STORAGE_KEY, &stored).unwrap();

    let mut session = session_on(&backend);
    session.set_draft_content("<p>y</p>");
    let err = session.save().unwrap_err();
    assert!(matches!(err, NoteError::Session(SessionError::IdsExhausted)));
    assert_eq!(session.list().len(), 1);
    assert_eq!(session.draft().content, "<p>y</p>");
    assert_eq!(backend.get(DEFAULT_STORAGE_KEY).unwrap(), Some(stored));
}

/// Wraps a memory backend and refuses writes while `full` is set
struct QuotaBackend {
    inner: MemoryBackend,
    full: Rc<Cell<bool>>,
}

impl StorageBackend for QuotaBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.full.get() {
            return Err(BackendError::StorageFull.into());
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.full.get() {
            return Err(BackendError::PermissionDenied.into());
        }
        self.inner.remove(key)
    }
}

fn quota_session() -> (NoteSession, MemoryBackend, Rc<Cell<bool>>) {
    let inner = MemoryBackend::new();
    let full = Rc::new(Cell::new(false));
    let backend = QuotaBackend {
        inner: inner.clone(),
        full: Rc::clone(&full),
    };
    let session = NoteSession::with_id_generator(
        NoteStore::new(Box::new(backend), DEFAULT_STORAGE_KEY),
        SessionConfig::default(),
        IdGenerator::new(frozen),
    );
    (session, inner, full)
}

#[test]
fn failed_writes_roll_back_memory() {
    let (mut session, inner, full) = quota_session();
    let a = save(&mut session, "<p>a</p>");
    full.set(true);

    // save keeps the draft for a retry
    session.set_draft_content("<p>b</p>");
    let err = session.save().unwrap_err();
    assert!(matches!(err, NoteError::Backend(BackendError::StorageFull)));
    assert_eq!(session.list(), [a.clone()]);
    assert_eq!(session.draft().content, "<p>b</p>");

    // update keeps the note open with its edits
    session.open(a.id).unwrap();
    session.set_selection_content("<p>a2</p>").unwrap();
    assert!(session.update().is_err());
    assert_eq!(session.list()[0].content, "<p>a</p>");
    assert_eq!(
        session.selection().map(|s| s.content.as_str()),
        Some("<p>a2</p>")
    );

    // delete puts the note back and leaves it open
    assert!(session.delete(a.id).is_err());
    assert_eq!(session.list(), [a.clone()]);
    assert!(session.selection().is_some());

    assert!(session.clear_all().is_err());
    assert_eq!(session.list(), [a]);
    assert_eq!(reloaded(&inner), session.list());

    full.set(false);
    session.update().unwrap();
    session.save().unwrap();
    assert_eq!(reloaded(&inner), session.list());
    assert_eq!(session.list().len(), 2);
}

#[test]
fn filesystem_backend_survives_restart() {
    let dir = TempDir::new().unwrap();
    let open = || {
        NoteSession::init(
            NoteStore::new(
                Box::new(FilesystemBackend::new(dir.path()).unwrap()),
                DEFAULT_STORAGE_KEY,
            ),
            SessionConfig::default(),
        )
    };

    let mut first = open();
    let note = save(&mut first, "<p>persisted</p>");
    drop(first);

    let second = open();
    assert_eq!(second.list(), [note]);
}

#[test]
fn sqlite_backend_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.db");
    let path = path.to_str().unwrap().to_string();
    let open = || {
        NoteSession::init(
            NoteStore::new(
                Box::new(SqliteBackend::new(&path).unwrap()),
                DEFAULT_STORAGE_KEY,
            ),
            SessionConfig {
                enable_color: false,
                ..SessionConfig::default()
            },
        )
    };

    let mut first = open();
    let a = save(&mut first, "<p>a</p>");
    let b = save(&mut first, "<p>b</p>");
    first.delete(a.id).unwrap();
    drop(first);

    let second = open();
    assert_eq!(second.list(), [b]);
    assert_eq!(second.list()[0].color, None);
}
