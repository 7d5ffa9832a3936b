//! Terminal match-3 runner (default binary).
//!
//! Usage: `tui-match3 [--level <file.json>] [--seed <n>]`
//!
//! The seed comes from `--seed`, then the `MATCH3_SEED` environment variable,
//! then the level file, then the clock.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use tui_match3::core::{LevelConfig, LevelSession};
use tui_match3::input::{handle_key_event, should_quit, BoardCursor, CursorOutcome};
use tui_match3::term::{BoardOverlay, CascadeReplay, Flash, FrameBuffer, GameView, TerminalRenderer};
use tui_match3::types::{Coord, GameAction, TICK_MS};

#[derive(Debug, Default)]
struct RunOptions {
    level: Option<PathBuf>,
    seed: Option<u32>,
}

impl RunOptions {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut opts = RunOptions::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--level" => {
                    let path = args.next().context("--level needs a path")?;
                    opts.level = Some(PathBuf::from(path));
                }
                "--seed" => {
                    let raw = args.next().context("--seed needs a number")?;
                    let seed = raw
                        .parse()
                        .with_context(|| format!("invalid seed {:?}", raw))?;
                    opts.seed = Some(seed);
                }
                other => bail!("unknown argument {:?} (expected --level or --seed)", other),
            }
        }
        if opts.seed.is_none() {
            opts.seed = std::env::var("MATCH3_SEED")
                .ok()
                .and_then(|s| s.trim().parse().ok());
        }
        Ok(opts)
    }

    fn level_config(&self) -> Result<LevelConfig> {
        let mut config = match &self.level {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading level {}", path.display()))?;
                serde_json::from_str::<LevelConfig>(&text)
                    .with_context(|| format!("parsing level {}", path.display()))?
            }
            None => LevelConfig::default(),
        };
        config.seed = self.seed.or(config.seed).or_else(|| Some(clock_seed()));
        Ok(config)
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

/// Front-end state around one session
struct App {
    session: LevelSession,
    cursor: BoardCursor,
    replay: CascadeReplay,
    flash: Flash,
    hint: Option<(Coord, Coord)>,
}

impl App {
    fn new(session: LevelSession) -> Self {
        let cursor = BoardCursor::new(session.grid().rows(), session.grid().cols());
        Self {
            session,
            cursor,
            replay: CascadeReplay::idle(),
            flash: Flash::default(),
            hint: None,
        }
    }

    fn handle(&mut self, action: GameAction) -> Result<()> {
        // Input arriving mid-replay is dropped, not queued.
        if self.replay.is_active() {
            return Ok(());
        }
        match action {
            GameAction::Pause => {
                self.session.toggle_pause();
            }
            GameAction::Restart => {
                self.session.restart()?;
                self.session.take_events();
                self.cursor
                    .resize(self.session.grid().rows(), self.session.grid().cols());
                self.hint = None;
            }
            GameAction::Hint => {
                self.hint = self.session.hint();
            }
            _ => {
                if let CursorOutcome::SwapRequested(from, to) = self.cursor.apply(action) {
                    self.swap(from, to)?;
                }
            }
        }
        Ok(())
    }

    fn swap(&mut self, from: Coord, to: Coord) -> Result<()> {
        let outcome = self.session.attempt_swap(from, to)?;
        if outcome.accepted {
            self.hint = None;
            self.replay = CascadeReplay::new(&outcome.cascade);
        } else {
            self.flash.trigger(from, to);
        }
        // Events only drive visuals that the snapshot already covers.
        self.session.take_events();
        Ok(())
    }

    fn tick(&mut self, elapsed_ms: u32) {
        self.flash.tick(elapsed_ms);
        if self.replay.is_active() {
            self.replay.tick(elapsed_ms);
        } else {
            self.session.tick(elapsed_ms);
        }
    }

    fn overlay(&self) -> BoardOverlay<'_> {
        BoardOverlay {
            cursor: Some(self.cursor.position()),
            selected: self.cursor.selected(),
            hint: self.hint,
            rejected: self.flash.cells(),
            replay: self.replay.current(),
        }
    }
}

fn main() -> Result<()> {
    let opts = RunOptions::parse(std::env::args().skip(1))?;
    let session = LevelSession::load_level(opts.level_config()?)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, App::new(session));

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, mut app: App) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snapshot = app.session.snapshot();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        app.session.snapshot_into(&mut snapshot);
        view.render_into(&snapshot, &app.overlay(), term.viewport(), &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        app.handle(action)?;
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            app.tick(TICK_MS);
        }
    }
}
