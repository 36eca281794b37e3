mod app;
mod clock;
mod driver;
mod error;
mod event;
mod games;
mod gate;
mod input;
mod scores;
mod settings;
mod sim;
mod ui;

use std::fs::File;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use app::App;
use clock::{FrameScheduler, SystemClock};
use driver::Driver;
use event::TerminalEvents;
use settings::Settings;

/// Logs go to a file: the terminal belongs to the UI.
fn init_logging(settings: &Settings) {
    let file = match File::create(&settings.log_file) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("logging disabled, cannot open {}: {}", settings.log_file.display(), e);
            return;
        }
    };
    let result = env_logger::Builder::new()
        .parse_filters(&settings.log_level)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    if let Err(e) = result {
        eprintln!("logging disabled: {}", e);
    }
}

fn main() -> io::Result<()> {
    let (settings, settings_problem) = Settings::load();
    init_logging(&settings);
    if let Some(problem) = settings_problem {
        log::warn!("{}", problem);
    }
    log::info!("neoncade {} starting", env!("CARGO_PKG_VERSION"));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    // Key release events make held keys exact; without them KeySet falls
    // back to its expiry window.
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    log::debug!("keyboard release events: {}", enhanced);

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run(&settings, &mut terminal);

    // Restore terminal even if the loop failed
    if enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("main loop failed: {}", e);
    }
    log::info!("neoncade exiting");
    result
}

fn run<B: Backend>(settings: &Settings, terminal: &mut Terminal<B>) -> io::Result<()> {
    let mut app = App::new(settings);
    let scheduler = FrameScheduler::new(SystemClock::new(), Duration::from_millis(settings.tick_ms));
    let mut driver = Driver::new(TerminalEvents, scheduler);

    terminal.draw(|frame| ui::render(frame, &mut app))?;
    while !app.should_quit {
        driver.pump(&mut app, terminal)?;
    }
    log::info!("ran {} frames", driver.ticks());
    Ok(())
}
