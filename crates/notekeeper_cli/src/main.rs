//! Command-line front end for notekeeper.
//!
//! # Responsibility
//! - Map subcommands onto `NoteKeeper` actions.
//! - Ask for confirmation on stdin before destructive actions unless
//!   `--yes` is given.

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use notekeeper_core::{
    init_logging, load_config, open_backend, resolve, AlwaysConfirm, BackendKind, Confirm,
    ConfigOverrides, DeleteOutcome, KeeperError, KeyValueBackend, NoteCard, NoteKeeper, NoteStore,
    RenderedView, SaveOutcome, SortMode, SystemClock,
};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "notekeeper", version, about = "Keep short text notes")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Config file (defaults to <config_dir>/notekeeper/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the note store and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Storage backend: file, sqlite or memory
    #[arg(long, global = true)]
    backend: Option<BackendKind>,
    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a note
    Add {
        #[arg(short, long, default_value = "")]
        title: String,
        content: String,
    },
    /// Edit an existing note; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete one note
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete all notes
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    /// List notes, optionally filtered by a search query
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        /// Sort by creation time: new or old
        #[arg(long, default_value_t = SortMode::Newest)]
        sort: SortMode,
    },
    /// Show one note
    Show { id: String },
}

/// Reads a y/N answer from stdin.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_affirmative(&answer)
    }
}

/// Only `y`/`yes` (any case, surrounding whitespace ignored) approves.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

type Keeper = NoteKeeper<Box<dyn KeyValueBackend>, SystemClock>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let file_config = load_config(cli.global.config.as_deref())?;
    let overrides = ConfigOverrides {
        data_dir: cli.global.data_dir,
        backend: cli.global.backend,
        log_level: cli.global.log_level,
    };
    let config = resolve(&file_config, &overrides);

    // Logging is best effort: a broken log dir must not block note access.
    match std::path::absolute(&config.log_dir) {
        Ok(log_dir) => {
            if let Err(err) = init_logging(&config.log_level, &log_dir) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }

    let backend = open_backend(&config)?;
    let store = NoteStore::new(backend).with_key(config.storage_key.clone());
    let mut keeper = NoteKeeper::new(store);
    let status = keeper.load();
    info!("event=cli_start module=cli status=ok load_status={status:?}");

    match cli.command {
        Command::Add { title, content } => add(&mut keeper, &title, &content),
        Command::Edit { id, title, content } => edit(&mut keeper, &id, title, content),
        Command::Delete { id, yes } => {
            let outcome = if yes {
                keeper.delete(&id, &mut AlwaysConfirm)?
            } else {
                keeper.delete(&id, &mut StdinConfirm)?
            };
            report_delete(outcome, &format!("note not found: {id}"));
            Ok(())
        }
        Command::Clear { yes } => {
            let outcome = if yes {
                keeper.clear_all(&mut AlwaysConfirm)?
            } else {
                keeper.clear_all(&mut StdinConfirm)?
            };
            report_delete(outcome, "no notes to delete");
            Ok(())
        }
        Command::List { search, sort } => {
            print_view(&keeper.render(&search, sort));
            Ok(())
        }
        Command::Show { id } => match keeper.store().get(&id) {
            Some(note) => {
                print_card(&NoteCard::from_note(note));
                Ok(())
            }
            None => Err(format!("note not found: {id}").into()),
        },
    }
}

fn add(keeper: &mut Keeper, title: &str, content: &str) -> Result<(), Box<dyn Error>> {
    match keeper.save(title, content) {
        Ok(SaveOutcome::Created(note)) => {
            println!("{}", note.id);
            Ok(())
        }
        Ok(other) => Err(format!("unexpected save outcome: {other:?}").into()),
        Err(err) => Err(validation_or(err)),
    }
}

fn edit(
    keeper: &mut Keeper,
    id: &str,
    title: Option<String>,
    content: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let Some(draft) = keeper.start_edit(id) else {
        return Err(format!("note not found: {id}").into());
    };
    let title = title.unwrap_or(draft.title);
    let content = content.unwrap_or(draft.content);

    match keeper.save(&title, &content) {
        Ok(SaveOutcome::Updated(note)) => {
            println!("{}", note.id);
            Ok(())
        }
        Ok(SaveOutcome::EditTargetMissing(id)) => Err(format!("note not found: {id}").into()),
        Ok(other) => Err(format!("unexpected save outcome: {other:?}").into()),
        Err(err) => Err(validation_or(err)),
    }
}

fn validation_or(err: KeeperError) -> Box<dyn Error> {
    if let KeeperError::Invalid(message) = err {
        warn!("event=cli_save module=cli status=rejected reason=validation");
        return message.into();
    }
    Box::new(err)
}

fn report_delete(outcome: DeleteOutcome, nothing_message: &str) {
    match outcome {
        DeleteOutcome::Deleted(count) => println!("deleted {count}"),
        DeleteOutcome::Declined => println!("cancelled"),
        DeleteOutcome::NothingToDelete => println!("{nothing_message}"),
    }
}

fn print_view(view: &RenderedView) {
    match view {
        RenderedView::Empty { message } => println!("{message}"),
        RenderedView::Cards(cards) => {
            for (index, card) in cards.iter().enumerate() {
                if index > 0 {
                    println!();
                }
                print_card(card);
            }
        }
    }
}

fn print_card(card: &NoteCard) {
    println!("{}  [{}]  {}", card.timestamp_label, card.id, card.title);
    for line in card.content.lines() {
        println!("    {line}");
    }
}
