use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ArcanaError, Result};
use crate::session::DrawSession;

/// Draws the next card of the session.
pub fn next(session: &mut DrawSession<'_>) -> Result<CmdResult> {
    let drawn = session.draw_next()?.clone();
    let mut result = CmdResult::default().with_drawn_cards(vec![drawn]);
    if session.is_exhausted() {
        result.add_message(CmdMessage::info("All positions are filled."));
    }
    Ok(result)
}

/// Draws until `stop_after` cards are on the table, or every position when
/// `stop_after` is `None`. Returns the cards drawn by this call; a session
/// with no open positions is `SessionExhausted`.
pub fn run(session: &mut DrawSession<'_>, stop_after: Option<usize>) -> Result<CmdResult> {
    let count = session.spread().count();
    if session.is_exhausted() {
        return Err(ArcanaError::SessionExhausted { count });
    }
    let target = match stop_after {
        Some(k) if k > count => {
            tracing::debug!(requested = k, count, "stop-after exceeds spread size");
            count
        }
        Some(k) => k,
        None => count,
    };

    let already = session.drawn().len();
    let mut result = CmdResult::default().with_spread(session.spread().clone());
    for _ in already..target {
        let drawn = session.draw_next()?.clone();
        result.drawn_cards.push(drawn);
    }

    if stop_after.is_some_and(|k| k > count) {
        result.add_message(CmdMessage::warning(format!(
            "{} has only {} position(s); drew them all.",
            session.spread().name,
            count
        )));
    }
    Ok(result)
}
