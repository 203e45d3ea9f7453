//! A deck of full-height cards that stack over each other as you scroll.
//!
//! Run the binary to browse the deck.  Run with `--print-config` to see the
//! effective configuration in file format.

mod app;
mod config;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;

use crate::app::{
    cards::{CardsAdapter, DEFAULT_PALETTE},
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::config::AppConfig;
use crate::ui::{card_stack::CardStackWidget, layout::AppLayout, theme::Theme};

/// Frame interval while idle; animations also advance at this rate.
const TICK_RATE: Duration = Duration::from_millis(16);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Stacked card deck viewer")]
struct Cli {
    /// Number of cards (defaults to one per colour).
    #[arg(long)]
    items: Option<usize>,

    /// Card colours as `#rrggbb`, comma separated.
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    /// Rows kept free below every card.
    #[arg(long)]
    bottom_offset: Option<i32>,

    /// How much a covered card shrinks, 0.0 to 1.0.
    #[arg(long)]
    scale_factor: Option<f32>,

    /// Card to open the deck on.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    save_config: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(bottom_offset) = self.bottom_offset {
            config.bottom_offset = bottom_offset.max(0);
        }
        if let Some(scale_factor) = self.scale_factor {
            config.scale_factor = scale_factor;
        }
    }

    fn cards(&self) -> Result<CardsAdapter> {
        let palette: Vec<String> = if self.colors.is_empty() {
            DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect()
        } else {
            if let Some(bad) = self.colors.iter().find(|c| app::cards::parse_hex(c).is_none()) {
                bail!("invalid colour {bad:?}, expected #rrggbb");
            }
            self.colors.clone()
        };
        let count = self.items.unwrap_or(palette.len());
        Ok(CardsAdapter::from_palette(count, &palette))
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // Never pollute the terminal UI on stdout.
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn status_line(state: &AppState) -> Line<'_> {
    let position = match state.first_visible() {
        Some(first) => format!(
            " {}/{}  +{:.0} ",
            first + 1,
            state.item_count(),
            state.scroll_offset()
        ),
        None => " empty ".to_string(),
    };
    let position = match state.animation.target_position() {
        Some(target) => format!("{position}-> {} ", target + 1),
        None => position,
    };
    Line::from(vec![
        Span::styled(position, Theme::status_position_style()),
        Span::styled(state.config.status_bar_hint(), Theme::status_bar_style()),
    ])
}

fn dispatch(state: &mut AppState, event: AppEvent, now: Instant) {
    match event {
        AppEvent::Key(k) => handler::handle_key(state, k, now),
        AppEvent::Mouse(m) => handler::handle_mouse(state, m, now),
        // Resizes are picked up from the terminal size before each frame.
        AppEvent::Resize(_, _) | AppEvent::Tick => {}
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut config = AppConfig::load();
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }
    if cli.save_config {
        let path = config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let cards = cli.cards()?;
    info!(cards = cards.len(), start = cli.start, "starting deck");
    let mut state = AppState::new(cards, config)?;
    if cli.start > 0 {
        state.jump_to(cli.start);
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(TICK_RATE);

    // ── event loop ────────────────────────────────────────────
    loop {
        let size = terminal.size()?;
        let layout = AppLayout::from_area(Rect::new(0, 0, size.width, size.height));
        state.on_resize(layout.deck_area);
        state.tick(Instant::now());

        terminal.draw(|frame| {
            let placed = state.deck.host().placed_cards();
            frame.render_widget(
                CardStackWidget::new(&placed, state.item_count()),
                layout.deck_area,
            );
            let status = Paragraph::new(status_line(&state)).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        let Some(event) = events.recv().await else {
            break;
        };
        let now = Instant::now();
        dispatch(&mut state, event, now);
        // Drain queued input before the next frame.
        while let Ok(event) = events.try_recv() {
            dispatch(&mut state, event, now);
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    Ok(())
}
