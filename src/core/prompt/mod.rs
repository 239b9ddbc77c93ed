//! Prompt templates: pure functions from settings to the text sent to the model.
//!
//! Every optional field has an explicit fallback so no section is ever left empty.

use crate::core::settings::{QuestionSettings, ReplySettings, Settings};

/// Markers the model is asked to wrap its answer in when follow-up questions are requested.
pub const REPLY_START: &str = "[REPLY_START]";
pub const REPLY_END: &str = "[REPLY_END]";
pub const QUESTIONS_START: &str = "[QUESTIONS_START]";
pub const QUESTIONS_END: &str = "[QUESTIONS_END]";

const NOT_SPECIFIED: &str = "Not specified";
const EMPTY_MESSAGE: &str = "(No message was provided.)";
const EMPTY_QUESTION: &str = "(No question was provided.)";
const DEFAULT_EXPERTISE: &str = "General knowledge";

/// Build the prompt for the settings' mode.
pub fn build_prompt(settings: &Settings) -> String {
    match settings {
        Settings::Reply(s) => build_reply_prompt(s),
        Settings::Question(s) => build_question_prompt(s),
    }
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn references_section(urls: &[String]) -> String {
    if urls.is_empty() {
        return NOT_SPECIFIED.to_string();
    }
    let mut out = urls
        .iter()
        .map(|u| format!("- {}", u))
        .collect::<Vec<_>>()
        .join("\n");
    out.push_str(
        "\n(Before relying on a reference URL, confirm the URL is actually searchable \
         and its content is available. Ignore any URL you cannot read.)",
    );
    out
}

fn extra_suggestions_section() -> String {
    format!(
        "\n\nAfter the reply, also suggest up to three follow-up questions the user could ask \
         to improve the reply, one per line.\n\
         Format your whole answer exactly like this:\n\
         {REPLY_START}\n(the reply)\n{REPLY_END}\n\
         {QUESTIONS_START}\n(one question per line)\n{QUESTIONS_END}"
    )
}

pub fn build_reply_prompt(s: &ReplySettings) -> String {
    let char_count = s
        .char_count
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NOT_SPECIFIED);

    let mut prompt = format!(
        "You are an excellent copywriter.\n\
         Write a chat reply to the message below, following the settings that come after it.\n\
         \n\
         --- Received message ---\n\
         {message}\n\
         ------------------------\n\
         \n\
         Settings:\n\
         - **Role**: {role}\n\
         - **Relationship to the sender**: {relationship}\n\
         - **Sentiment (0 = negative, 100 = positive)**: {sentiment}\n\
         - **Politeness (0 = casual, 100 = formal)**: {politeness}\n\
         - **Approximate length in characters**: {char_count}\n\
         - **Punctuation**: {punctuation}\n\
         - **Content the reply must include**: {content}\n\
         - **References**:\n\
         {references}\n\
         \n\
         Using the information above, write a natural and appropriate reply.",
        message = or_fallback(&s.received_message, EMPTY_MESSAGE),
        role = or_fallback(&s.user_role, NOT_SPECIFIED),
        relationship = or_fallback(&s.relationship, NOT_SPECIFIED),
        sentiment = s.sentiment,
        politeness = s.politeness,
        char_count = char_count,
        punctuation = s.punctuation.describe(),
        content = or_fallback(&s.reply_content, NOT_SPECIFIED),
        references = references_section(&s.reference_urls),
    );
    if s.show_extra {
        prompt.push_str(&extra_suggestions_section());
    }
    prompt
}

pub fn build_question_prompt(s: &QuestionSettings) -> String {
    format!(
        "You are an expert in the field named below.\n\
         Answer the question below accurately and clearly, following the settings that come after it.\n\
         \n\
         --- Question ---\n\
         {question}\n\
         ----------------\n\
         \n\
         Settings:\n\
         - **Field of expertise**: {expertise}\n\
         - **Preferred answer format**: {format}\n\
         - **Urgency**: {urgency}\n\
         - **Assumptions and context**: {assumptions}\n\
         - **References**:\n\
         {references}\n\
         \n\
         Using the information above, write a high-quality answer.",
        question = or_fallback(&s.question, EMPTY_QUESTION),
        expertise = or_fallback(&s.expertise, DEFAULT_EXPERTISE),
        format = or_fallback(&s.output_format, NOT_SPECIFIED),
        urgency = or_fallback(&s.urgency, NOT_SPECIFIED),
        assumptions = or_fallback(&s.assumptions, NOT_SPECIFIED),
        references = references_section(&s.reference_urls),
    )
}
