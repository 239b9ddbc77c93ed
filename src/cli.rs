//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::settings::{Punctuation, QuestionForm, RelationshipChoice, ReplyForm};

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  reply-forge reply -M \"Are you free Friday?\" --relationship colleague --politeness 80
  reply-forge reply --message-file msg.txt --extra --copy
  reply-forge ask -Q \"How do I renew a passport?\" --format \"numbered steps\"
  reply-forge reply --from-history 0 --sentiment 90   Reuse a past form, tweak one field
  reply-forge models                                   List models, best first
  reply-forge models --select gemini-1.5-flash         Remember a model
  reply-forge history list                             Show past generations
  reply-forge config set-api-key                       Read API key from stdin and save it
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compose reply and question prompts, send them to Gemini, and keep a local history",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a reply to a message you received
    Reply {
        #[command(flatten)]
        form: ReplyArgs,
        #[command(flatten)]
        run: GenerateArgs,
    },
    /// Ask a question and get an expert answer
    Ask {
        #[command(flatten)]
        form: QuestionArgs,
        #[command(flatten)]
        run: GenerateArgs,
    },
    /// List available models, best first
    Models {
        /// Filter models by name
        #[arg(long)]
        query: Option<String>,
        /// Remember this model for later generations
        #[arg(long, value_name = "NAME")]
        select: Option<String>,
        /// API key (saved for later runs)
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Manage generation history
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
    /// Show configuration, or store the API key
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// List past generations, newest first
    List {
        /// Maximum number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one entry in full
    Show {
        /// Entry index (0 = newest)
        index: usize,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one entry
    Delete {
        /// Entry index (0 = newest)
        index: usize,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Store the API key (reads stdin when KEY is omitted)
    SetApiKey { key: Option<String> },
}

/// Flags shared by `reply` and `ask`.
#[derive(ClapArgs, Debug, Default)]
pub struct GenerateArgs {
    /// Model to use (saved for later runs)
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// API key (saved for later runs)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Start from the settings of a history entry (0 = newest)
    #[arg(long, value_name = "INDEX")]
    pub from_history: Option<usize>,

    /// Print the prompt and exit without calling the model
    #[arg(long)]
    pub dry_run: bool,

    /// Also print the prompt (to stderr) before generating
    #[arg(long)]
    pub show_prompt: bool,

    /// Copy the reply to the clipboard
    #[arg(long)]
    pub copy: bool,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ReplyArgs {
    /// The message you received
    #[arg(short = 'M', long, conflicts_with = "message_file")]
    pub message: Option<String>,

    /// Read the received message from a file ('-' for stdin)
    #[arg(long, value_name = "PATH")]
    pub message_file: Option<PathBuf>,

    /// Your role (e.g. "team lead", "customer support")
    #[arg(long)]
    pub role: Option<String>,

    /// Your relationship to the sender
    #[arg(long, value_enum)]
    pub relationship: Option<RelationshipChoice>,

    /// Free-text relationship (implies --relationship other)
    #[arg(long, value_name = "TEXT")]
    pub relationship_other: Option<String>,

    /// 0 = negative, 100 = positive
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub sentiment: Option<u8>,

    /// 0 = casual, 100 = formal
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub politeness: Option<u8>,

    /// Approximate reply length in characters
    #[arg(long = "chars", value_name = "N")]
    pub char_count: Option<String>,

    #[arg(long, value_enum)]
    pub punctuation: Option<Punctuation>,

    /// Also ask for follow-up questions that could improve the reply
    #[arg(long, overrides_with = "no_extra")]
    pub extra: bool,

    #[arg(long, overrides_with = "extra", hide = true)]
    pub no_extra: bool,

    /// What the reply should say or include
    #[arg(long)]
    pub content: Option<String>,

    /// Reference URL (repeatable)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,
}

impl ReplyArgs {
    /// `received_message` is passed separately since it may come from a file.
    pub fn into_form(self, received_message: Option<String>, model: Option<String>) -> ReplyForm {
        let show_extra = match (self.extra, self.no_extra) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        ReplyForm {
            received_message,
            user_role: self.role,
            relationship: self.relationship,
            relationship_other: self.relationship_other,
            sentiment: self.sentiment,
            politeness: self.politeness,
            char_count: self.char_count,
            punctuation: self.punctuation,
            show_extra,
            reply_content: self.content,
            reference_urls: self.urls,
            selected_model: model,
        }
    }
}

#[derive(ClapArgs, Debug, Default)]
pub struct QuestionArgs {
    /// The question to ask
    #[arg(short = 'Q', long, conflicts_with = "question_file")]
    pub question: Option<String>,

    /// Read the question from a file ('-' for stdin)
    #[arg(long, value_name = "PATH")]
    pub question_file: Option<PathBuf>,

    /// Field of expertise the answer should come from
    #[arg(long)]
    pub expertise: Option<String>,

    /// Preferred answer format (e.g. "bullet points", "table")
    #[arg(long = "format")]
    pub output_format: Option<String>,

    #[arg(long)]
    pub urgency: Option<String>,

    /// Assumptions and context the answer should take into account
    #[arg(long)]
    pub assumptions: Option<String>,

    /// Reference URL (repeatable)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,
}

impl QuestionArgs {
    pub fn into_form(self, question: Option<String>, model: Option<String>) -> QuestionForm {
        QuestionForm {
            question,
            expertise: self.expertise,
            output_format: self.output_format,
            urgency: self.urgency,
            assumptions: self.assumptions,
            reference_urls: self.urls,
            selected_model: model,
        }
    }
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
