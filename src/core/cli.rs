//! Plain-text commands: config info, model list, history list/show/delete.

use std::error::Error;
use std::io::{self, Read};

use crate::core::app;
use crate::core::backend::{Backend, GenerationBackend};
use crate::core::config::{BackendKind, Config};
use crate::core::confirm::Confirm;
use crate::core::generate::{self, GenerateError};
use crate::core::history::{HistoryRecord, HistoryStore};
use crate::core::kv::{FileStore, KeyValueStore};
use crate::core::models::{self, ModelDescriptor};
use crate::core::persistence;
use crate::core::settings::Settings;
use crate::core::util;

type CliResult = Result<(), Box<dyn Error>>;

const PREVIEW_CHARS: usize = 100;

/// Run the `config` command: data dir, backend, API key status, selected model.
pub fn run_config(config: &Config, store: &FileStore) {
    let backend_detail = match config.backend {
        BackendKind::Gemini => format!("{} ({})", config.backend, config.gemini_base_url),
        BackendKind::Proxy => match &config.proxy_auth {
            Some(auth) => format!("{} ({}, as {})", config.backend, config.proxy_url, auth.user),
            None => format!("{} ({})", config.backend, config.proxy_url),
        },
    };
    let api_key_status = if config.env_api_key.is_some() {
        "set ✓ (from GEMINI_API_KEY)"
    } else if persistence::load_api_key(store).is_some() {
        "set ✓ (saved)"
    } else {
        "not set"
    };
    let model = persistence::load_selected_model(store).unwrap_or_else(|| "—".to_string());

    println!("Version:      {} {}", app::NAME, app::VERSION);
    println!("Data:         {}", store.dir().display());
    println!("Backend:      {}", backend_detail);
    println!("API key:      {}", api_key_status);
    println!("Model:        {}", model);
    println!("History cap:  {}", config.max_history);
}

/// Run the `config set-api-key` command: store the key given, or read it from stdin.
pub fn run_config_set_api_key(store: &impl KeyValueStore, api_key: Option<String>) -> CliResult {
    let key = match api_key {
        Some(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            let trimmed = buf.trim().to_string();
            if trimmed.is_empty() {
                return Err("no API key provided".into());
            }
            trimmed
        }
    };
    persistence::save_api_key(store, &key)?;
    println!("API key saved.");
    Ok(())
}

/// Find a ranked model by its full or short name.
fn find_model<'a>(models: &'a [ModelDescriptor], name: &str) -> Option<&'a ModelDescriptor> {
    let name = name.trim();
    models
        .iter()
        .find(|m| m.name == name || models::short_name(&m.name) == models::short_name(name))
}

/// Render the ranked list; the current selection is marked with `*`.
fn format_model_list(models: &[&ModelDescriptor], selected: Option<&str>) -> Vec<String> {
    models
        .iter()
        .map(|m| {
            let marker = if Some(m.name.as_str()) == selected { '*' } else { ' ' };
            format!("{} {}", marker, m.display_text)
        })
        .collect()
}

/// The model `reply`/`ask` will use: the saved one if it is still listed, else the top
/// ranked one, which is then saved.
fn adopt_selection<'a>(
    store: &impl KeyValueStore,
    ranked: &'a [ModelDescriptor],
) -> Option<&'a ModelDescriptor> {
    let saved = persistence::load_selected_model(store);
    let model = models::default_selection(ranked, saved.as_deref())?;
    if saved.as_deref() != Some(model.name.as_str()) {
        log::info!("No usable saved model; selecting {}", model.name);
        if let Err(e) = persistence::save_selected_model(store, &model.name) {
            log::warn!("Failed to save selected model: {}", e);
        }
    }
    Some(model)
}

/// Run the `models` command: fetch, rank, optionally filter, optionally remember a selection.
pub async fn run_models(
    config: &Config,
    store: &impl KeyValueStore,
    query: Option<&str>,
    select: Option<&str>,
    cli_api_key: Option<&str>,
) -> CliResult {
    let api_key = generate::resolve_api_key(
        cli_api_key,
        config.env_api_key.as_deref(),
        persistence::load_api_key(store),
    )
    .ok_or(GenerateError::MissingApiKey)?;
    if let Some(key) = cli_api_key
        && let Err(e) = persistence::save_api_key(store, key)
    {
        log::warn!("Failed to save API key: {}", e);
    }

    let backend = Backend::from_config(config)?;
    let names = backend
        .list_models(&api_key)
        .await
        .map_err(|e| format!("Failed to fetch the model list: {}", e.user_message()))?;
    let ranked = models::rank(&names);

    if let Some(wanted) = select {
        let model = find_model(&ranked, wanted)
            .ok_or_else(|| format!("Model `{}` is not in the list of available models", wanted))?;
        persistence::save_selected_model(store, &model.name)?;
        println!("Selected {}", model.display_text);
        return Ok(());
    }

    let selected = adopt_selection(store, &ranked).map(|m| m.name.as_str());
    let filtered = models::filter_models(&ranked, query.unwrap_or(""));
    if filtered.is_empty() {
        println!("No models found.");
        return Ok(());
    }

    for line in format_model_list(&filtered, selected) {
        println!("{}", line);
    }
    println!("\n{} model(s) listed", filtered.len());
    Ok(())
}

/// One tab-separated history line: index, mode, time, model, reply preview.
fn format_history_line(index: usize, record: &HistoryRecord) -> String {
    let model = models::short_name(record.settings.selected_model());
    let model = if model.is_empty() { "N/A" } else { model };
    let reply = if record.ai_reply.trim().is_empty() {
        "(no reply)"
    } else {
        record.ai_reply.as_str()
    };
    format!(
        "{}\t{}\t{}\t{}\t{}",
        index,
        record.settings.mode().label(),
        util::format_timestamp(&record.timestamp),
        model,
        util::preview(reply, PREVIEW_CHARS)
    )
}

/// Run the `history list` command.
pub fn run_history_list<S: KeyValueStore>(history: &HistoryStore<S>, limit: Option<usize>) {
    let records = history.list();
    if records.is_empty() {
        println!("No history yet.");
        return;
    }
    let take = limit.unwrap_or(records.len());
    for (i, record) in records.iter().enumerate().take(take) {
        println!("{}", format_history_line(i, record));
    }
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "—" } else { s }
}

/// Labeled settings fields, in form order.
fn describe_settings(settings: &Settings) -> Vec<(&'static str, String)> {
    let urls = if settings.reference_urls().is_empty() {
        "—".to_string()
    } else {
        settings.reference_urls().join(", ")
    };
    match settings {
        Settings::Reply(s) => vec![
            ("Received message", or_dash(&s.received_message).to_string()),
            ("Role", or_dash(&s.user_role).to_string()),
            ("Relationship", format!("{} ({})", s.relationship, s.relationship_choice.as_str())),
            ("Sentiment", s.sentiment.to_string()),
            ("Politeness", s.politeness.to_string()),
            ("Length", s.char_count.clone().unwrap_or_else(|| "—".to_string())),
            ("Punctuation", s.punctuation.describe().to_string()),
            ("Follow-ups", if s.show_extra { "yes" } else { "no" }.to_string()),
            ("Content", or_dash(&s.reply_content).to_string()),
            ("References", urls),
            ("Model", or_dash(&s.selected_model).to_string()),
        ],
        Settings::Question(s) => vec![
            ("Question", or_dash(&s.question).to_string()),
            ("Expertise", or_dash(&s.expertise).to_string()),
            ("Format", or_dash(&s.output_format).to_string()),
            ("Urgency", or_dash(&s.urgency).to_string()),
            ("Assumptions", or_dash(&s.assumptions).to_string()),
            ("References", urls),
            ("Model", or_dash(&s.selected_model).to_string()),
        ],
    }
}

/// Print a record: settings, prompt, reply, sources, and follow-up questions.
pub fn print_record(record: &HistoryRecord) {
    println!(
        "{} {}",
        record.settings.mode().label(),
        util::format_timestamp(&record.timestamp)
    );
    println!("--- Settings ---");
    for (label, value) in describe_settings(&record.settings) {
        println!("{:<17} {}", format!("{}:", label), value);
    }
    println!("\n--- Prompt ---\n{}", record.prompt);
    println!("\n--- Reply ---\n{}", or_dash(&record.ai_reply));
    print_reply_extras(record);
}

/// Sources and follow-up questions, when present.
pub fn print_reply_extras(record: &HistoryRecord) {
    if let Some(citations) = record.ai_citations.as_ref().filter(|c| !c.is_empty()) {
        println!("\n--- Sources ---");
        for uri in citations {
            println!("- {}", uri);
        }
    }
    if let Some(questions) = record.additional_questions.as_deref() {
        println!("\n--- Follow-up questions ---");
        for q in questions.lines().map(str::trim).filter(|q| !q.is_empty()) {
            println!("- {}", q.trim_start_matches(['-', '*', ' ']));
        }
    }
}

fn missing_entry<S: KeyValueStore>(history: &HistoryStore<S>, index: usize) -> Box<dyn Error> {
    format!(
        "No history entry at index {} ({} stored)",
        index,
        history.list().len()
    )
    .into()
}

/// Look up a history entry for restoring a form.
pub fn restore<S: KeyValueStore>(
    history: &HistoryStore<S>,
    index: usize,
) -> Result<HistoryRecord, Box<dyn Error>> {
    history
        .restore_at(index)
        .ok_or_else(|| missing_entry(history, index))
}

/// Run the `history show` command.
pub fn run_history_show<S: KeyValueStore>(
    history: &HistoryStore<S>,
    index: usize,
    json: bool,
) -> CliResult {
    let record = restore(history, index)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }
    Ok(())
}

/// Run the `history delete` command. Asks first unless `confirm` is `None`.
pub fn run_history_delete<S: KeyValueStore>(
    history: &HistoryStore<S>,
    index: usize,
    confirm: Option<Confirm>,
) -> CliResult {
    let record = restore(history, index)?;
    if let Some(confirm) = confirm {
        let question = format!(
            "Delete history entry {} {} from {}?",
            index,
            record.settings.mode().label(),
            util::format_timestamp(&record.timestamp)
        );
        if !confirm(&question) {
            println!("Cancelled.");
            return Ok(());
        }
    }
    if !history.delete_at(index)? {
        return Err(missing_entry(history, index));
    }
    println!("Deleted history entry {}.", index);
    Ok(())
}
