//! Headless mode for the facts feed.
//!
//! A line-oriented interface over stdin/stdout for scripts and automated
//! testing. It drives the same feed and observer logic as the TUI.

use std::io::{self, BufRead, Write};

use facts_core::{FactProvider, FactsConfig, FeedStatus, HeadlessFeed, TutorSession};

const HELP: &str = "\
  #next          - Show the next card
  #prev          - Show the previous card
  #tutor         - Learn more about the current card's topic
  #restart       - Dismiss the feed and open a fresh one
  #status        - Show feed status
  #help          - Show this help
  #quit          - Exit
  Any other line is a follow-up question for the open tutor.";

/// Run the feed in headless mode until `#quit` or end of input.
pub async fn run_headless<P, R, W>(
    provider: P,
    config: FactsConfig,
    input: R,
    mut out: W,
) -> io::Result<()>
where
    P: FactProvider,
    R: BufRead,
    W: Write,
{
    let mut feed = HeadlessFeed::new(provider, config);
    let mut tutor: Option<TutorSession> = None;

    writeln!(out, "=== Facts Headless Mode ===")?;
    writeln!(out, "Commands:")?;
    writeln!(out, "{HELP}")?;
    writeln!(out)?;

    feed.start().await;
    print_card(&feed, &mut out)?;

    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(command) = line.strip_prefix('#') else {
            match tutor.as_mut() {
                Some(session) => ask(session, line, &mut out).await?,
                None => writeln!(out, "[ERROR] No tutor open. Use #tutor first.")?,
            }
            continue;
        };

        match command.split_whitespace().next() {
            Some("quit") | Some("exit") => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            Some("next") => {
                tutor = None;
                if !feed.next().await {
                    writeln!(out, "[INFO] Already at the last card")?;
                }
                print_card(&feed, &mut out)?;
            }
            Some("prev") => {
                tutor = None;
                if !feed.prev().await {
                    writeln!(out, "[INFO] Already at the first card")?;
                }
                print_card(&feed, &mut out)?;
            }
            Some("restart") => {
                tutor = None;
                feed.remount();
                feed.start().await;
                print_card(&feed, &mut out)?;
            }
            Some("tutor") => match feed.tutor() {
                Some(mut session) => {
                    writeln!(out, "[TUTOR] {}", session.topic())?;
                    let opening = session.opening_question();
                    ask(&mut session, &opening, &mut out).await?;
                    tutor = Some(session);
                }
                None => writeln!(out, "[ERROR] No card to learn about")?,
            },
            Some("status") => {
                let state = feed.feed();
                let status = match state.status() {
                    FeedStatus::Loading => "loading",
                    FeedStatus::Success => "idle",
                    FeedStatus::FetchingMore => "fetching more",
                };
                writeln!(out, "[STATUS]")?;
                writeln!(out, "  Card: {} of {}", state.current_index() + 1, state.len())?;
                writeln!(out, "  Feed: {status}")?;
                writeln!(out, "  Fetches: {}", feed.fetch_count())?;
                if let Some(session) = &tutor {
                    writeln!(
                        out,
                        "  Tutor: {} ({} exchanges)",
                        session.topic(),
                        session.turns().len()
                    )?;
                }
            }
            Some("help") => {
                writeln!(out, "[HELP]")?;
                writeln!(out, "{HELP}")?;
            }
            _ => writeln!(out, "[ERROR] Unknown command: {line}. Try #help")?,
        }
        out.flush()?;
    }

    Ok(())
}

fn print_card<P: FactProvider, W: Write>(feed: &HeadlessFeed<P>, out: &mut W) -> io::Result<()> {
    let state = feed.feed();
    match state.current() {
        Some(fact) => {
            writeln!(
                out,
                "[FACT {}/{}] {}",
                state.current_index() + 1,
                state.len(),
                fact.topic
            )?;
            writeln!(out, "{}", fact.fact)?;
        }
        None => writeln!(out, "[INFO] No facts loaded")?,
    }
    writeln!(out)?;
    out.flush()
}

/// Ask the tutor and stream the answer to `out`.
async fn ask<W: Write>(session: &mut TutorSession, question: &str, out: &mut W) -> io::Result<()> {
    let mut write_error = None;
    let result = session
        .ask(question, |text| {
            if write_error.is_none() {
                if let Err(e) = write!(out, "{text}").and_then(|()| out.flush()) {
                    write_error = Some(e);
                }
            }
        })
        .await;

    if let Some(e) = write_error {
        return Err(e);
    }
    match result {
        Ok(_) => writeln!(out)?,
        Err(e) => writeln!(out, "[ERROR] Tutor failed: {e}")?,
    }
    writeln!(out)?;
    out.flush()
}
