//! Interactive draw session.
//!
//! The loop owns the draw session and the API (and through it the history
//! store). Interpretations run on spawned tasks that hold only the
//! interpreter and a copy of the request; their results come back over a
//! channel, so drawing and saving keep working while a model is thinking.

use super::commands::{print_interpretation_result, AppContext};
use super::print::{print_drawn, print_messages, print_spread_header};
use arcana::commands::{CmdMessage, CmdResult};
use arcana::error::{ArcanaError, Result};
use arcana::model::Language;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const SESSION_HELP: &str = "\
Commands:
  draw, d              draw the next card
  all                  draw every remaining position
  show                 show the cards drawn so far
  save [note]          save the reading to history
  interpret [question] interpret the reading in the background
  reset                put every card back and start over
  help                 show this help
  quit, q              leave the session";

enum Input<'a> {
    Draw,
    All,
    Show,
    Save(&'a str),
    Interpret(Option<&'a str>),
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "" => Input::Empty,
        "draw" | "d" => Input::Draw,
        "all" => Input::All,
        "show" => Input::Show,
        "save" => Input::Save(rest),
        "interpret" | "i" => Input::Interpret(Some(rest).filter(|r| !r.is_empty())),
        "reset" => Input::Reset,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        _ => Input::Unknown(word),
    }
}

struct Finished {
    ticket: usize,
    result: Result<String>,
}

pub(super) async fn run_session(ctx: &mut AppContext, key: &str, count: Option<usize>) -> Result<()> {
    let language = ctx.api.language();
    let mut session = ctx.api.start_session(key, count)?;
    let interactive = std::io::stdin().is_terminal();

    print_spread_header(session.spread());
    println!("Type `draw` to reveal a card, `help` for more.");

    let (tx, mut rx) = mpsc::unbounded_channel::<Finished>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut question: Option<String> = None;
    let mut next_ticket = 1;
    let mut pending = 0usize;

    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed: let running interpretations finish first
                    while pending > 0 {
                        match rx.recv().await {
                            Some(done) => {
                                pending -= 1;
                                report(done);
                            }
                            None => break,
                        }
                    }
                    break;
                };

                match parse_input(&line) {
                    Input::Draw => show_outcome(ctx.api.draw_next(&mut session), language),
                    Input::All => show_outcome(ctx.api.draw(&mut session, None), language),
                    Input::Show => {
                        print_spread_header(session.spread());
                        print_drawn(session.drawn(), language);
                        print_messages(&[CmdMessage::info(format!(
                            "{} position(s) left.",
                            session.positions_left()
                        ))]);
                    }
                    Input::Save(note) => {
                        let outcome = ctx.api.save_reading(&session, note, question.clone());
                        show_outcome(outcome, language);
                    }
                    Input::Interpret(asked) => {
                        if let Some(asked) = asked {
                            question = Some(asked.to_string());
                        }
                        if session.drawn().is_empty() {
                            print_messages(&[CmdMessage::warning(ArcanaError::EmptyReading.to_string())]);
                            continue;
                        }
                        let interpreter = match ctx.api.interpreter() {
                            Ok(interpreter) => interpreter,
                            Err(e) => {
                                print_messages(&[CmdMessage::error(e.to_string())]);
                                continue;
                            }
                        };
                        let request = ctx.api.session_request(&session, question.clone());
                        let cards = request.cards.len();
                        let ticket = next_ticket;
                        next_ticket += 1;
                        pending += 1;
                        let tx = tx.clone();
                        tracing::debug!(ticket, backend = interpreter.name(), "interpretation spawned");
                        tokio::spawn(async move {
                            let result = interpreter.interpret(&request).await;
                            let _ = tx.send(Finished { ticket, result });
                        });
                        print_messages(&[CmdMessage::info(format!(
                            "Interpretation #{} started with {} card(s); keep drawing if you like.",
                            ticket, cards
                        ))]);
                    }
                    Input::Reset => {
                        session.reset();
                        question = None;
                        print_messages(&[CmdMessage::success("Cards returned to the deck.")]);
                    }
                    Input::Help => println!("{}", SESSION_HELP),
                    Input::Quit => {
                        if pending > 0 {
                            print_messages(&[CmdMessage::warning(format!(
                                "Abandoning {} running interpretation(s).",
                                pending
                            ))]);
                        }
                        break;
                    }
                    Input::Empty => {}
                    Input::Unknown(word) => print_messages(&[CmdMessage::warning(format!(
                        "Unknown command: {} (type `help`)",
                        word
                    ))]),
                }
            }
            Some(done) = rx.recv() => {
                pending = pending.saturating_sub(1);
                report(done);
            }
        }
    }
    Ok(())
}

/// Prints a command outcome. Errors are shown and the session goes on.
fn show_outcome(outcome: Result<CmdResult>, language: Language) {
    match outcome {
        Ok(result) => {
            print_drawn(&result.drawn_cards, language);
            print_messages(&result.messages);
        }
        Err(e) => print_messages(&[CmdMessage::error(e.to_string())]),
    }
}

fn report(done: Finished) {
    println!();
    print_messages(&[CmdMessage::info(format!("Interpretation #{}:", done.ticket))]);
    let mut result = CmdResult::default();
    match done.result {
        Ok(text) => result = result.with_interpretation(text),
        Err(e) => result.add_message(CmdMessage::error(e.to_string())),
    }
    print_interpretation_result(&result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_arguments() {
        assert!(matches!(parse_input("draw"), Input::Draw));
        assert!(matches!(parse_input("  D "), Input::Draw));
        assert!(matches!(parse_input("save  by the window "), Input::Save("by the window")));
        assert!(matches!(parse_input("save"), Input::Save("")));
        assert!(matches!(parse_input("interpret"), Input::Interpret(None)));
        assert!(matches!(
            parse_input("interpret will it rain?"),
            Input::Interpret(Some("will it rain?"))
        ));
        assert!(matches!(parse_input(""), Input::Empty));
        assert!(matches!(parse_input("shuffle"), Input::Unknown("shuffle")));
        assert!(matches!(parse_input("quit"), Input::Quit));
    }
}
