use std::io;
use std::time::Duration;

use crossterm::event::{self, KeyEvent, MouseEventKind};

pub enum Event {
    Key(KeyEvent),
    /// Mouse button press, the terminal stand-in for a touch.
    Pointer,
}

/// Where the tick loop gets its input from.
pub trait EventSource {
    /// Wait up to `timeout` for the next relevant event.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Reads keyboard and mouse events from the controlling terminal.
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            crossterm::event::Event::Key(key) => Ok(Some(Event::Key(key))),
            crossterm::event::Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                Ok(Some(Event::Pointer))
            }
            _ => Ok(None),
        }
    }
}
