//! Application run modes: logger init, command dispatch, reply/ask generation.

use std::error::Error;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;

use clap::CommandFactory;

use crate::cli::{
    Args, Commands, ConfigSubcommand, GenerateArgs, HistorySubcommand, QuestionArgs, ReplyArgs,
};
use crate::core;
use crate::core::backend::Backend;
use crate::core::config::Config;
use crate::core::generate::{self, GenerateError};
use crate::core::history::{HistoryRecord, HistoryStore};
use crate::core::kv::FileStore;
use crate::core::persistence;
use crate::core::prompt;
use crate::core::settings::{QuestionSettings, ReplySettings, Settings};

type RunResult = Result<(), Box<dyn Error>>;

/// Initialize env_logger on stderr so stdout only carries results.
pub fn init_logger(args: &Args) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .target(env_logger::Target::Stderr)
    .try_init();
}

/// The key-value store under the data directory.
fn open_store() -> Result<FileStore, Box<dyn Error>> {
    let dir = core::paths::data_dir().ok_or("No data directory available")?;
    Ok(FileStore::new(dir))
}

/// Run the parsed command.
pub async fn dispatch(args: Args) -> RunResult {
    if let Commands::Completions { shell } = args.command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        crate::cli::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config = core::config::load()?;
    let store = open_store()?;
    let history = HistoryStore::new(&store, config.max_history);

    match args.command {
        Commands::Reply { form, run } => run_reply(form, run, &config, &store, &history).await,
        Commands::Ask { form, run } => run_ask(form, run, &config, &store, &history).await,
        Commands::Models {
            query,
            select,
            api_key,
        } => {
            core::cli::run_models(
                &config,
                &store,
                query.as_deref(),
                select.as_deref(),
                api_key.as_deref(),
            )
            .await
        }
        Commands::History { subcommand } => match subcommand {
            HistorySubcommand::List { limit } => {
                core::cli::run_history_list(&history, limit);
                Ok(())
            }
            HistorySubcommand::Show { index, json } => {
                core::cli::run_history_show(&history, index, json)
            }
            HistorySubcommand::Delete { index, yes } => {
                let confirm = (!yes).then(core::confirm::default_confirm);
                core::cli::run_history_delete(&history, index, confirm)
            }
        },
        Commands::Config { subcommand } => match subcommand {
            None => {
                core::cli::run_config(&config, &store);
                Ok(())
            }
            Some(ConfigSubcommand::SetApiKey { key }) => {
                core::cli::run_config_set_api_key(&store, key)
            }
        },
        Commands::Completions { .. } => Ok(()),
    }
}

/// Inline text, or the contents of a file (`-` reads stdin).
fn read_text_arg(text: Option<String>, file: Option<&Path>) -> io::Result<Option<String>> {
    match (text, file) {
        (Some(t), _) => Ok(Some(t)),
        (None, Some(p)) if p == Path::new("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(Some(buf))
        }
        (None, Some(p)) => fs::read_to_string(p).map(Some),
        (None, None) => Ok(None),
    }
}

/// Restored settings must belong to the form being filled.
fn mode_mismatch(index: usize, found: &Settings) -> Box<dyn Error> {
    format!(
        "History entry {} is a {} entry; use `{}` to restore it",
        index,
        found.mode(),
        if matches!(found, Settings::Reply(_)) { "reply" } else { "ask" },
    )
    .into()
}

async fn run_reply(
    mut form: ReplyArgs,
    run: GenerateArgs,
    config: &Config,
    store: &FileStore,
    history: &HistoryStore<&FileStore>,
) -> RunResult {
    let message = read_text_arg(form.message.take(), form.message_file.take().as_deref())?;
    let base = match run.from_history {
        Some(index) => match core::cli::restore(history, index)?.settings {
            Settings::Reply(s) => s,
            other => return Err(mode_mismatch(index, &other)),
        },
        None => ReplySettings::default(),
    };
    let mut settings = form.into_form(message, run.model.clone()).apply(base);
    if settings.selected_model.is_empty() {
        settings.selected_model = persistence::load_selected_model(store).unwrap_or_default();
    }
    execute(Settings::Reply(settings), &run, config, store, history).await
}

async fn run_ask(
    mut form: QuestionArgs,
    run: GenerateArgs,
    config: &Config,
    store: &FileStore,
    history: &HistoryStore<&FileStore>,
) -> RunResult {
    let question = read_text_arg(form.question.take(), form.question_file.take().as_deref())?;
    let base = match run.from_history {
        Some(index) => match core::cli::restore(history, index)?.settings {
            Settings::Question(s) => s,
            other => return Err(mode_mismatch(index, &other)),
        },
        None => QuestionSettings::default(),
    };
    let mut settings = form.into_form(question, run.model.clone()).apply(base);
    if settings.selected_model.is_empty() {
        settings.selected_model = persistence::load_selected_model(store).unwrap_or_default();
    }
    execute(Settings::Question(settings), &run, config, store, history).await
}

/// Loading indicator on stderr. Cleared on drop, so every exit path removes it.
struct Loading {
    shown: bool,
}

impl Loading {
    fn start(message: &str) -> Self {
        let shown = io::stderr().is_terminal();
        if shown {
            let mut err = io::stderr();
            let _ = write!(err, "⏳ {}", message);
            let _ = err.flush();
        }
        Self { shown }
    }
}

impl Drop for Loading {
    fn drop(&mut self) {
        if self.shown {
            let mut err = io::stderr();
            let _ = write!(err, "\r\x1b[2K");
            let _ = err.flush();
        }
    }
}

fn print_generation(record: &HistoryRecord) {
    println!("{}", record.ai_reply);
    core::cli::print_reply_extras(record);
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(text.to_string())) {
        Ok(()) => eprintln!("Copied to clipboard."),
        Err(e) => log::warn!("Failed to copy to clipboard: {}", e),
    }
}

/// Validate, remember preferences, generate, print.
async fn execute(
    settings: Settings,
    run: &GenerateArgs,
    config: &Config,
    store: &FileStore,
    history: &HistoryStore<&FileStore>,
) -> RunResult {
    if run.dry_run {
        println!("{}", prompt::build_prompt(&settings));
        return Ok(());
    }

    let api_key = generate::resolve_api_key(
        run.api_key.as_deref(),
        config.env_api_key.as_deref(),
        persistence::load_api_key(store),
    )
    .ok_or(GenerateError::MissingApiKey)?;
    generate::validate(&settings, &api_key)?;

    if let Some(key) = run.api_key.as_deref()
        && let Err(e) = persistence::save_api_key(store, key)
    {
        log::warn!("Failed to save API key: {}", e);
    }
    if let Some(model) = run.model.as_deref()
        && let Err(e) = persistence::save_selected_model(store, model)
    {
        log::warn!("Failed to save selected model: {}", e);
    }

    if run.show_prompt {
        eprintln!("--- Prompt ---\n{}\n--------------", prompt::build_prompt(&settings));
    }

    let backend = Backend::from_config(config)?;
    let model = core::models::short_name(settings.selected_model()).to_string();
    let result = {
        let _loading = Loading::start(&format!("Generating with {}...", model));
        generate::generate(&backend, history, settings, &api_key).await
    };

    match result {
        Ok(record) => {
            print_generation(&record);
            if run.copy {
                copy_to_clipboard(&record.ai_reply);
            }
            Ok(())
        }
        Err(GenerateError::Backend(e)) => {
            eprintln!("{}", e.status_line());
            match e.code() {
                Some(code) => log::debug!("Backend failure ({}): {:?}", code, e),
                None => log::debug!("Backend failure: {:?}", e),
            }
            Err(GenerateError::Backend(e).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_text_prefers_inline_text() {
        let out = read_text_arg(Some("inline".to_string()), Some(Path::new("missing.txt"))).unwrap();
        assert_eq!(out.as_deref(), Some("inline"));
    }

    #[test]
    fn read_text_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("msg.txt");
        fs::write(&path, "from file").unwrap();
        let out = read_text_arg(None, Some(&path)).unwrap();
        assert_eq!(out.as_deref(), Some("from file"));
    }

    #[test]
    fn read_text_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_text_arg(None, Some(&dir.path().join("nope.txt"))).is_err());
    }

    #[test]
    fn mode_mismatch_names_the_right_command() {
        let found = Settings::Question(QuestionSettings::default());
        let err = mode_mismatch(2, &found);
        assert_eq!(
            err.to_string(),
            "History entry 2 is a question entry; use `ask` to restore it"
        );
    }
}
