use crate::commands::{CmdMessage, CmdResult};
use crate::deck::Deck;

/// Lists the deck, or the cards matching `query`.
pub fn run(deck: &Deck, query: Option<&str>) -> CmdResult {
    let query = query.map(str::trim).filter(|q| !q.is_empty());
    let cards: Vec<_> = match query {
        Some(q) => deck.find(q).into_iter().cloned().collect(),
        None => deck.all_cards().to_vec(),
    };

    let mut result = CmdResult::default();
    if cards.is_empty() {
        if let Some(q) = query {
            result.add_message(CmdMessage::info(format!("No cards match \"{}\".", q)));
        }
    }
    result.with_cards(cards)
}
