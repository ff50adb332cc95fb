//! Terminal runner (default binary).
//!
//! Owns the real event loop: crossterm key events go through the held-key handler into the
//! driver, wall-clock timestamps drive `frame`, and the view is redrawn every frame.

use std::fs::{self, File};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use trixel::core::GameDriver;
use trixel::input::{should_quit, InputHandler, KeyMap};
use trixel::store::{load_config, JsonFileStore};
use trixel::term::{Frame, GameView, TerminalRenderer, Viewport};

const FRAME_MS: u64 = 16;

#[derive(Parser, Debug)]
#[command(name = "trixel", about = "Falling-block puzzle game for the terminal")]
struct Args {
    /// JSON config file (timing overrides, fixed seed, key bindings)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the saved game, best score and log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Bag seed (overrides the config file)
    #[arg(long)]
    seed: Option<u32>,

    /// Ignore any saved game
    #[arg(long)]
    fresh: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;
    init_logging(&data_dir)?;

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => Default::default(),
    };
    let seed = args.seed.or(config.seed).unwrap_or_else(clock_seed);
    info!("starting with seed {} in {}", seed, data_dir.display());

    let keys = KeyMap::from_bindings(&config.keys);
    let store = JsonFileStore::new(&data_dir);
    let mut driver = GameDriver::start(store, seed, config.timing, args.fresh);

    let mut term = TerminalRenderer::new();
    term.enter()?;
    info!("key release events: {}", term.key_releases());

    let result = run(&mut term, &mut driver, keys);

    // Always try to restore terminal state.
    driver.shutdown();
    let _ = term.exit();
    result
}

fn run(
    term: &mut TerminalRenderer,
    driver: &mut GameDriver<JsonFileStore>,
    keys: KeyMap,
) -> Result<()> {
    let view = GameView::default();
    let started = Instant::now();
    let mut input = InputHandler::new(started).with_key_map(keys);
    let mut frame = Frame::new(0, 0);
    let frame_duration = Duration::from_millis(FRAME_MS);
    let mut last_frame = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(driver.session(), Viewport::new(w, h), &mut frame);
        term.draw(&frame)?;

        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(event) = input.handle_key_press(key, Instant::now()) {
                            driver.input(event);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(event) = input.handle_key_release(key) {
                            driver.input(event);
                        }
                    }
                },
                Event::Resize(..) => term.invalidate(),
                Event::FocusLost => {
                    for event in input.reset(Instant::now()) {
                        driver.input(event);
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        if now.duration_since(last_frame) >= frame_duration {
            last_frame = now;
            for event in input.update(now) {
                driver.input(event);
            }
            driver.frame(now.duration_since(started).as_millis() as u64);
        }
    }
}

fn init_logging(data_dir: &std::path::Path) -> Result<()> {
    let path = data_dir.join("trixel.log");
    let file = File::create(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".local/share/trixel"),
        None => PathBuf::from(".trixel"),
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}
