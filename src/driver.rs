use std::io;

use ratatui::backend::Backend;
use ratatui::Terminal;

use crate::app::App;
use crate::clock::{Clock, FrameScheduler};
use crate::event::{Event, EventSource};
use crate::ui;

/// Single-threaded main loop: input, fixed-rate ticks, redraw.
pub struct Driver<E, C> {
    events: E,
    scheduler: FrameScheduler<C>,
    ticks: u64,
}

impl<E: EventSource, C: Clock> Driver<E, C> {
    pub fn new(events: E, scheduler: FrameScheduler<C>) -> Self {
        Self {
            events,
            scheduler,
            ticks: 0,
        }
    }

    /// Total ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// One loop iteration. Waits for input no longer than the next frame
    /// deadline, then runs whatever ticks are due and redraws if anything
    /// changed.
    pub fn pump<B: Backend>(&mut self, app: &mut App, terminal: &mut Terminal<B>) -> io::Result<()> {
        let event = self.events.poll(self.scheduler.until_next_frame())?;
        let had_event = event.is_some();
        match event {
            Some(Event::Key(key)) => app.on_key(key),
            Some(Event::Pointer) => app.on_pointer(),
            None => {}
        }

        let due = self.scheduler.due_frames();
        for _ in 0..due {
            app.on_tick();
        }
        self.ticks += due as u64;

        if (due > 0 || had_event) && !app.should_quit {
            terminal.draw(|frame| ui::render(frame, app))?;
        }
        Ok(())
    }
}
