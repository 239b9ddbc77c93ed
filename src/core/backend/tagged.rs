//! Splitting a tagged model answer into the reply and the follow-up questions.

use crate::core::prompt::{QUESTIONS_END, QUESTIONS_START, REPLY_END, REPLY_START};

fn cut_at<'a>(text: &'a str, marker: &str) -> &'a str {
    text.split_once(marker).map_or(text, |(before, _)| before)
}

/// Returns `(reply, additional_questions)`. Untagged text is all reply.
pub(super) fn split_tagged_reply(text: &str) -> (String, String) {
    let Some((_, after_start)) = text.split_once(REPLY_START) else {
        return (text.trim().to_string(), String::new());
    };
    match after_start.split_once(QUESTIONS_START) {
        Some((reply_part, questions_part)) => {
            let reply = cut_at(reply_part.trim(), REPLY_END).trim();
            let questions = cut_at(questions_part.trim(), QUESTIONS_END).trim();
            (reply.to_string(), questions.to_string())
        }
        None => {
            let reply = cut_at(after_start.trim(), REPLY_END).trim();
            (reply.to_string(), String::new())
        }
    }
}
