//! Host input reader: turns crossterm events into widget and host events.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::keys::encode_key;
use crate::bridge::{HostEvent, TermEvent};

/// Spawn the task reading host terminal input.
///
/// Key presses and pastes become [`TermEvent::Data`], terminal resizes
/// become [`HostEvent::WindowResize`], and Ctrl+`detach` becomes
/// [`HostEvent::Quit`], after which the reader stops.
pub fn spawn_input_reader(
    detach: Option<char>,
    term_tx: mpsc::UnboundedSender<TermEvent>,
    host_tx: mpsc::UnboundedSender<HostEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Failed to read terminal input");
                    let _ = host_tx.send(HostEvent::Quit);
                    return;
                }
            };

            match translate(&event, detach) {
                Some(Input::Term(term_event)) => {
                    if term_tx.send(term_event).is_err() {
                        return;
                    }
                }
                Some(Input::Host(host_event)) => {
                    let quit = host_event == HostEvent::Quit;
                    if host_tx.send(host_event).is_err() || quit {
                        return;
                    }
                }
                None => {}
            }
        }
        debug!("Terminal input stream ended");
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Term(TermEvent),
    Host(HostEvent),
}

fn translate(event: &Event, detach: Option<char>) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            if is_detach(key, detach) {
                return Some(Input::Host(HostEvent::Quit));
            }
            encode_key(key).map(|data| Input::Term(TermEvent::Data(data)))
        }
        Event::Paste(text) => Some(Input::Term(TermEvent::Data(text.clone()))),
        Event::Resize(_, _) => Some(Input::Host(HostEvent::WindowResize)),
        _ => None,
    }
}

fn is_detach(key: &KeyEvent, detach: Option<char>) -> bool {
    let Some(detach) = detach else {
        return false;
    };
    control_key(key) == Some(detach)
}

/// The character held with Ctrl, as written in `input.detach_key`.
///
/// Legacy terminals send Ctrl with the symbols `\ ] ^ _` as the bytes
/// 0x1C..=0x1F, which crossterm reports as Ctrl+`4`..`7`; Ctrl-@ arrives as
/// Ctrl+Space and Ctrl-[ as a bare Esc.
fn control_key(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Esc => Some('['),
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(match ch {
                '4' => '\\',
                '5' => ']',
                '6' => '^',
                '7' => '_',
                ' ' | '2' => '@',
                other => other.to_ascii_lowercase(),
            })
        }
        _ => None,
    }
}
