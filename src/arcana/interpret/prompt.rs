//! Prompt text shared by every backend.
//!
//! Chat backends send [`system_message`] and [`user_message`] separately;
//! the local backend concatenates them with [`full_prompt`].

use super::InterpretationRequest;
use crate::model::Language;

pub fn system_message(language: Language) -> String {
    format!(
        "You are an experienced tarot reader. Give a thoughtful, grounded reading \
of the spread you are shown.\n\
\n\
Structure your answer with these sections, each under a `##` header:\n\
1. Individual cards: the meaning of each card in its position.\n\
2. Spread context: how the cards relate to each other across the spread.\n\
3. Situation analysis: what the reading says about the querent's situation{question_hint}.\n\
4. Practical advice: concrete, compassionate next steps.\n\
\n\
Write card names in **bold**. Respond in {language}.",
        question_hint = ", answering their question when one is given",
        language = language.english_name(),
    )
}

pub fn user_message(request: &InterpretationRequest) -> String {
    let mut message = format!("Spread type: {}\n", request.spread_name);
    match request.question.as_deref() {
        Some(question) => message.push_str(&format!("Question: {}\n", question)),
        None => message.push_str("No specific question. Provide a general life reading.\n"),
    }
    message.push_str("\nCards drawn (in spread order):\n");
    for card in &request.cards {
        message.push_str(&format!("- Position [{}]: {}\n", card.position, card.card));
    }
    message
}

pub fn full_prompt(request: &InterpretationRequest) -> String {
    format!(
        "{}\n\n{}",
        system_message(request.language),
        user_message(request)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReadingCard;

    fn request() -> InterpretationRequest {
        InterpretationRequest::new(
            "Three Card",
            vec![
                ReadingCard::new("Past", "The Tower"),
                ReadingCard::new("Present", "Three of Cups"),
                ReadingCard::new("Future", "The Star"),
            ],
        )
    }

    #[test]
    fn lists_cards_in_spread_order() {
        let message = user_message(&request());
        let past = message.find("Position [Past]: The Tower").unwrap();
        let present = message.find("Position [Present]: Three of Cups").unwrap();
        let future = message.find("Position [Future]: The Star").unwrap();
        assert!(past < present && present < future);
        assert!(message.starts_with("Spread type: Three Card"));
    }

    #[test]
    fn general_reading_without_question() {
        assert!(user_message(&request()).contains("general life reading"));
    }

    #[test]
    fn includes_question_when_present() {
        let request = request().with_question(Some("Will the move go well?".into()));
        let message = user_message(&request);
        assert!(message.contains("Question: Will the move go well?"));
        assert!(!message.contains("general life reading"));
    }

    #[test]
    fn system_message_names_output_language() {
        assert!(system_message(Language::Ko).contains("Respond in Korean."));
        assert!(system_message(Language::En).contains("Respond in English."));
    }

    #[test]
    fn full_prompt_contains_both_parts() {
        let prompt = full_prompt(&request());
        assert!(prompt.contains("Practical advice"));
        assert!(prompt.contains("Spread type: Three Card"));
    }
}
