use super::{MenuError, NoteError, NotePreview, Result};
use crate::app::NoteSession;
use crate::setup::{arguments, logging};
use crate::ui::cli;
use crate::{markup, palette};

use log::{debug, error, info, warn};
use std::fmt;

/// Abstraction for input/output
pub trait IO {
    /// Read a trimmed line of input ending at newline
    fn get_input(&self) -> Result<String>;
    /// Read multiple lines until a trimmed line equals `stop_at`
    fn get_input_until(&self, stop_at: &str) -> Result<String>;
    /// Display a list of selectable options
    fn show_menu(&self, options: &[impl fmt::Display]);
    /// Display a bolded title
    fn show_title(&self, title: &str);
    /// Render a table of note previews
    fn show_notes_list(&self, previews: Vec<NotePreview>);
    /// Print a plain text message
    fn show_text(&self, msg: &str);
}

/// The rich-text editing surface. Content is an opaque markup string.
pub trait RichTextEditor {
    /// Presents `current` for editing and hands every change to `on_change` as the
    /// full new content.
    fn render(&self, current: &str, on_change: &mut dyn FnMut(String)) -> Result<()>;
}

/// Actions available from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Compose = 1,
    Save = 2,
    List = 3,
    Open = 4,
    Palette = 5,
    Clear = 6,
    Quit = 7,
}

/// All menu options in display order
pub const ALL_MENU_OPTIONS: [MenuOption; 7] = [
    MenuOption::Compose,
    MenuOption::Save,
    MenuOption::List,
    MenuOption::Open,
    MenuOption::Palette,
    MenuOption::Clear,
    MenuOption::Quit,
];

/// Convert a numeric choice into a `MenuOption`
impl TryFrom<u8> for MenuOption {
    type Error = ();

    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Compose),
            2 => Ok(Self::Save),
            3 => Ok(Self::List),
            4 => Ok(Self::Open),
            5 => Ok(Self::Palette),
            6 => Ok(Self::Clear),
            7 => Ok(Self::Quit),
            _ => Err(()),
        }
    }
}

/// Show the option number and label, e.g. `(1) Compose note`
impl fmt::Display for MenuOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Compose => "Compose note",
            Self::Save => "Save note",
            Self::List => "List notes",
            Self::Open => "Open note",
            Self::Palette => "Toggle color palette",
            Self::Clear => "Delete all notes",
            Self::Quit => "Quit",
        };
        write!(f, "({}) {}", *self as u8, label)
    }
}

/// Actions on the open note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    Edit = 1,
    Update = 2,
    Delete = 3,
    Close = 4,
}

pub const ALL_NOTE_ACTIONS: [NoteAction; 4] = [
    NoteAction::Edit,
    NoteAction::Update,
    NoteAction::Delete,
    NoteAction::Close,
];

impl TryFrom<u8> for NoteAction {
    type Error = ();

    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Edit),
            2 => Ok(Self::Update),
            3 => Ok(Self::Delete),
            4 => Ok(Self::Close),
            _ => Err(()),
        }
    }
}

impl fmt::Display for NoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Edit => "Edit content",
            Self::Update => "Save changes",
            Self::Delete => "Delete note",
            Self::Close => "Close without saving",
        };
        write!(f, "({}) {}", *self as u8, label)
    }
}

/// Initialize logging, parse args, load the notes and run the menu until the user quits
///
/// # Errors
///
/// Returns an error if the storage backend cannot be set up
pub fn run() -> Result<()> {
    logging::setup_log();
    let (store, config) = arguments::handle_args()?;
    debug!("Editor modules: {}", config.editor_modules().join(", "));

    let mut session = NoteSession::init(store, config);
    event_loop(&cli::Cli, &mut session)
}

/// Show the main menu and dispatch choices until `Quit` or end of input
///
/// Menu and session errors are logged and the loop continues.
///
/// # Errors
///
/// Currently always returns `Ok`; end of input counts as quitting
pub fn event_loop(ui: &(impl IO + RichTextEditor), session: &mut NoteSession) -> Result<()> {
    loop {
        ui.show_menu(&ALL_MENU_OPTIONS);
        let result = match get_option(ui) {
            Ok(MenuOption::Quit) => return Ok(()),
            Ok(option) => handle_menu_option(ui, session, option),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {}
            Err(NoteError::Menu(MenuError::EndOfInput)) => {
                info!("End of input, bye");
                return Ok(());
            }
            Err(e) => error!("{e}"),
        }
    }
}

/// Dispatch chosen `MenuOption` to its handler
fn handle_menu_option(
    ui: &(impl IO + RichTextEditor),
    session: &mut NoteSession,
    option: MenuOption,
) -> Result<()> {
    match option {
        MenuOption::Compose => handle_compose(ui, session),
        MenuOption::Save => handle_save(session),
        MenuOption::List => {
            handle_list(ui, session);
            Ok(())
        }
        MenuOption::Open => handle_open(ui, session),
        MenuOption::Palette => handle_palette(ui, session),
        MenuOption::Clear => handle_clear(ui, session),
        MenuOption::Quit => Ok(()),
    }
}

/// Try parsing input as a numbered option or return an error
///
/// # Errors
///
/// Returns `NoteError::Menu(MenuError::ParseError)` if input is not an integer
/// Returns `NoteError::Menu(MenuError::InvalidOption)` if integer is out of range
fn get_option<T: TryFrom<u8>>(io: &impl IO) -> Result<T> {
    let input = io.get_input()?;
    let n = input
        .parse::<u8>()
        .map_err(|_| MenuError::ParseError(input.clone()))?;
    T::try_from(n).map_err(|_| NoteError::Menu(MenuError::InvalidOption(n)))
}

fn get_id(io: &impl IO) -> Result<i64> {
    io.show_text("ID:");
    let input = io.get_input()?;
    input
        .parse::<i64>()
        .map_err(|_| NoteError::Menu(MenuError::ParseError(input)))
}

fn confirm(io: &impl IO, question: &str) -> Result<bool> {
    loop {
        io.show_text(&format!("{question} (y/n):"));
        match io.get_input()?.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => warn!("Invalid input. Please enter 'y' or 'n'"),
        }
    }
}

fn color_label(color: Option<&str>) -> String {
    color.map_or_else(
        || "none".to_string(),
        |c| {
            let name = palette::name(c).unwrap_or("custom");
            format!("{name} ({})", markup::strip_controls(c))
        },
    )
}

/// Edit the draft in the editor
fn handle_compose(ui: &(impl IO + RichTextEditor), session: &mut NoteSession) -> Result<()> {
    ui.show_title("Compose note");
    if session.config().enable_color {
        ui.show_text(&format!(
            "Color: {}",
            color_label(session.draft().color.as_deref())
        ));
    }

    let current = session.draft().content.clone();
    ui.render(&current, &mut |content| session.set_draft_content(content))
}

/// Commit the draft as a new note
fn handle_save(session: &mut NoteSession) -> Result<()> {
    let note = session.save()?;
    info!("Note saved with ID: {}", note.id);
    Ok(())
}

/// Show every note as a truncated preview
fn handle_list(io: &impl IO, session: &NoteSession) {
    if session.list().is_empty() {
        io.show_text("No saved notes");
        return;
    }
    io.show_notes_list(session.previews());
}

/// Toggle the swatches and, while they are shown, let the user pick one
fn handle_palette(io: &impl IO, session: &mut NoteSession) -> Result<()> {
    if !session.config().enable_color {
        warn!("Colors are disabled for this notebook");
        return Ok(());
    }

    session.toggle_palette();
    if !session.palette_visible() {
        io.show_text("Palette hidden");
        return Ok(());
    }

    io.show_title("Pick a color");
    let swatches: Vec<String> = palette::PALETTE
        .iter()
        .enumerate()
        .map(|(i, c)| format!("({}) {}", i + 1, color_label(Some(*c))))
        .collect();
    io.show_menu(swatches.as_slice());

    let input = io.get_input()?;
    let color = input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| palette::PALETTE.get(i).copied());
    match color {
        Some(color) => {
            session.pick_color(color);
            info!("Draft color set to {}", color_label(Some(color)));
            Ok(())
        }
        None => Err(MenuError::ParseError(input).into()),
    }
}

/// Open a note and run its edit modal until it is updated, deleted or closed
fn handle_open(ui: &(impl IO + RichTextEditor), session: &mut NoteSession) -> Result<()> {
    ui.show_title("Open note");
    let id = get_id(ui)?;
    session.open(id)?;

    while let Some(selection) = session.selection() {
        ui.show_title(&format!("Edit note #{}", selection.id));
        if session.config().enable_color {
            ui.show_text(&format!("Color: {}", color_label(selection.color.as_deref())));
        }
        ui.show_text(&markup::to_plain_text(&selection.content));
        ui.show_menu(&ALL_NOTE_ACTIONS);

        let result = match get_option(ui) {
            Ok(NoteAction::Edit) => {
                let current = selection.content.clone();
                ui.render(&current, &mut |content| {
                    if let Err(e) = session.set_selection_content(content) {
                        error!("{e}");
                    }
                })
            }
            Ok(NoteAction::Update) => session
                .update()
                .map(|()| info!("Successfully updated note with ID: {id}")),
            Ok(NoteAction::Delete) => confirm(ui, "Are you sure?").and_then(|sure| {
                if sure {
                    session
                        .delete(id)
                        .map(|()| info!("Successfully deleted note with ID: {id}"))
                } else {
                    info!("Not deleting note with ID: {id}");
                    Ok(())
                }
            }),
            Ok(NoteAction::Close) => session.close(),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {}
            Err(e @ NoteError::Menu(MenuError::EndOfInput)) => {
                if session.selection().is_some() {
                    session.close()?;
                }
                return Err(e);
            }
            Err(e) => error!("{e}"),
        }
    }
    Ok(())
}

/// Delete every note after confirmation
fn handle_clear(io: &impl IO, session: &mut NoteSession) -> Result<()> {
    io.show_title("Delete all notes");
    if confirm(io, "This removes every saved note. Continue?")? {
        session.clear_all()?;
        info!("All notes deleted");
    }
    Ok(())
}
