//! Prompt construction for the text-generation capability.
//!
//! Both builders are pure: identical input always yields identical prompts.

use crate::parser::FLASHCARDS_KEY;
use crate::types::{AnswerLength, Card, Difficulty, GenerationRequest, MAX_SOURCE_CHARS};

/// A system instruction paired with the user query it governs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the card generation prompt for a request.
///
/// The system block fixes the output shape and the exact card count. The user
/// query embeds at most [`MAX_SOURCE_CHARS`] characters of the source text.
pub fn build_generation_prompt(request: &GenerationRequest) -> Prompt {
    let count = request.card_count.get();
    let language = request.language.as_str();

    let mut system = format!(
        "You are an assistant that writes high-quality study flashcards in {language} \
from the text you are given. Follow these instructions strictly.

### Role
- Extract only genuine subject matter: academic concepts, definitions and facts.

### Forbidden
- Ignore course logistics: syllabus, grading, references, schedules, lecture numbers, \
dates, page numbers, instructor names or contact details, greetings and small talk.
- Output nothing except the JSON object. No preamble, no closing remarks, no explanations.
- Write every card in {language}. Do not mix languages.

### Rules
1. Card quality:
   - \"frontText\" must be a complete question (for example \"What is ...?\" or \
\"Explain ...\"), never a bare word or phrase.
   - \"backText\" must be the key term or one short sentence that directly answers \
the question. No lengthy explanations.
   - Do not produce vocabulary-style cards that merely pair a word with its meaning.
2. Produce exactly {count} flashcards.
3. Strict JSON format:
   - The output must be a single JSON object.
   - The object must have the single key \"{FLASHCARDS_KEY}\".
   - Its value must be an array of objects, each with exactly the string keys \
\"frontText\" and \"backText\".
   - Example: {{\"{FLASHCARDS_KEY}\": [{{\"frontText\": \"Question 1\", \"backText\": \"Answer 1\"}}]}}
"
    );

    // Optional rules continue the numbering after the three fixed ones.
    let mut rule = 3;
    if let Some(difficulty) = request.difficulty {
        rule += 1;
        system.push_str(&format!(
            "{}. Difficulty: {}\n",
            rule,
            difficulty_instruction(difficulty)
        ));
    }
    if let Some(length) = request.length {
        rule += 1;
        system.push_str(&format!(
            "{}. Answer length: {}\n",
            rule,
            length_instruction(length)
        ));
    }

    system.push_str(&format!(
        "\n### Task\nFollowing the instructions above, create {count} flashcards from the provided text."
    ));

    let user = format!(
        "Analyze the following text and create {count} flashcards (question and answer) \
covering its main concepts:\n\n{}",
        truncate_chars(&request.source_text, MAX_SOURCE_CHARS)
    );

    Prompt { system, user }
}

/// Build the explanation prompt for a single card.
///
/// The answer is requested as markdown with a one-sentence conclusion section
/// followed by a 2 to 3 point explanation section.
pub fn build_explanation_prompt(card: &Card, language: &str) -> Prompt {
    let system = format!(
        "You are an expert who explains complex ideas to beginners in {language}. \
Using the question and answer of a flashcard, write a detailed explanation in markdown. \
Follow these instructions strictly.

### Role
- Act as a friendly but precise tutor, writing only in {language}.

### Forbidden
- Do not answer in any language other than {language}.
- Do not use any format other than the markdown structure below.
- Avoid vague wording and unexplained jargon.
- Do not add greetings or text beyond the explanation.

### Structure
1. Conclusion (H2 heading):
   - Use the heading `## Conclusion 💡`.
   - State the gist of the answer in one sentence.
2. Explanation (H2 heading):
   - Use the heading `## Explanation 📝`.
   - Emphasize key terms with `**bold**`.
   - Explain in 2 to 3 bullet points (`* item`) using plain words, adding emoji where they help.

### Task
Write the explanation for the given question and answer in {language}."
    );

    let user = format!(
        "Please explain the following.\n\nQuestion: {}\nAnswer: {}",
        card.front_text, card.back_text
    );

    Prompt { system, user }
}

/// Return the prefix of `text` holding at most `max_chars` characters.
///
/// Cuts on a character boundary, not a word boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn difficulty_instruction(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "ask about basic definitions and the most prominent facts.",
        Difficulty::Normal => "balance definitions with questions about how concepts relate.",
        Difficulty::Hard => "favor questions that require applying or comparing concepts.",
    }
}

fn length_instruction(length: AnswerLength) -> &'static str {
    match length {
        AnswerLength::Short => "keep every answer to a few words.",
        AnswerLength::Normal => "keep every answer to one short sentence.",
        AnswerLength::Long => "answers may use up to two sentences.",
    }
}
