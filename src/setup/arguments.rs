use crate::backends::{FilesystemBackend, MemoryBackend, SqliteBackend};
use crate::config::SessionConfig;
use crate::store::{DEFAULT_STORAGE_KEY, NoteStore};
use crate::{Result, StorageBackend};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Args {
    /// Storage key holding the notes
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,
    /// Plain notes without background colors
    #[arg(long)]
    no_color: bool,
    /// Leave the image-resize module out of the editor toolbar
    #[arg(long)]
    no_image_resize: bool,
    /// Lines shown per note in the list
    #[arg(long, default_value_t = 3)]
    preview_lines: usize,
    /// Characters shown per preview line
    #[arg(long, default_value_t = 40)]
    preview_width: usize,
    #[command(subcommand)]
    backend: Backend,
}

#[derive(Subcommand, Debug)]
enum Backend {
    /// Keep notes only for this run
    Memory,
    Filesystem {
        #[arg(short, long)]
        path: String,
    },
    Sqlite {
        #[arg(short, long)]
        path: String,
    },
}

impl Args {
    fn config(&self) -> SessionConfig {
        SessionConfig {
            enable_color: !self.no_color,
            enable_image_resize: !self.no_image_resize,
            preview_lines: self.preview_lines,
            preview_width: self.preview_width,
        }
    }
}

/// Parses command-line arguments into a `NoteStore` on the chosen backend and the session settings.
///
/// # Errors
///
/// Tries creating a `StorageBackend` instance based on the specified backend type. Any errors are forwarded
pub fn handle_args() -> Result<(NoteStore, SessionConfig)> {
    from_args(Args::parse())
}

fn from_args(args: Args) -> Result<(NoteStore, SessionConfig)> {
    let config = args.config();

    // Allow any struct that implements StorageBackend, and store on heap because size is unknown at compile time
    let backend: Box<dyn StorageBackend> = match args.backend {
        Backend::Memory => Box::new(MemoryBackend::new()),
        Backend::Filesystem { path } => Box::new(FilesystemBackend::new(&path)?),
        Backend::Sqlite { path } => Box::new(SqliteBackend::new(&path)?),
    };

    Ok((NoteStore::new(backend, args.storage_key), config))
}
