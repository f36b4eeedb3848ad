//! App: terminal init, frame loop, key and mouse handling.

use crate::game::{GameState, Phase};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, ScreenLayout};
use crate::{Args, GameConfig};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tracing::{debug, info};

const DEFAULT_FRAME_RATE: f64 = 60.0;
const MIN_FRAME_RATE: f64 = 1.0;
const MAX_FRAME_RATE: f64 = 1000.0;

/// Frame budget for `rate` frames per second. Non-positive or non-finite rates
/// fall back to the default; the rest are clamped to 1..=1000.
fn frame_duration(rate: f64) -> Duration {
    let rate = if rate.is_finite() && rate > 0.0 {
        rate.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE)
    } else {
        DEFAULT_FRAME_RATE
    };
    Duration::from_secs_f64(1.0 / rate)
}

pub struct App {
    state: GameState,
    theme: Theme,
    frame_duration: Duration,
    animate: bool,
    /// Board fade-in, created when a game starts.
    start_effect: Option<Effect>,
    /// Last time the fade was advanced (for delta).
    effect_process_time: Option<Instant>,
    last_frame: Instant,
}

impl App {
    pub fn new(args: &Args, config: &GameConfig, theme: Theme) -> Result<Self> {
        let state = GameState::new(config).context("invalid game configuration")?;
        let mut app = Self {
            state,
            theme,
            frame_duration: frame_duration(args.frame_rate),
            animate: !args.no_animation,
            start_effect: None,
            effect_process_time: None,
            last_frame: Instant::now(),
        };
        if args.autostart {
            app.apply_action(Action::Toggle);
        }
        Ok(app)
    }

    /// Apply one action. Returns false when the app should exit.
    fn apply_action(&mut self, action: Action) -> bool {
        if action.is_command() && !self.state.is_running() {
            return true;
        }
        match action {
            Action::Quit => return false,
            Action::Toggle => {
                if self.state.toggle() == Phase::Running && self.animate {
                    self.start_effect = Some(ui::start_fade(&self.theme));
                    self.effect_process_time = None;
                } else {
                    self.start_effect = None;
                }
            }
            Action::MoveLeft => self.state.player_move(-1),
            Action::MoveRight => self.state.player_move(1),
            Action::SoftDrop => self.state.player_drop(),
            Action::RotateCw => self.state.player_rotate(1),
            Action::RotateCcw => self.state.player_rotate(-1),
            Action::None => {}
        }
        true
    }

    /// Map a left click to the button under it, if any.
    fn click_action(&self, area: Rect, mouse: MouseEvent) -> Action {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Action::None;
        }
        let arena = self.state.arena();
        ScreenLayout::new(area, arena.width(), arena.height())
            .button_at(mouse.column, mouse.row)
            .map_or(Action::None, |b| b.action())
    }

    /// Advance gravity by the time since the previous frame.
    fn tick(&mut self, now: Instant) {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.state.update(delta);
        if self.start_effect.as_ref().is_some_and(Effect::done) {
            self.start_effect = None;
            self.effect_process_time = None;
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal =
            DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        info!("terminal ready");

        let result = self.run_loop(&mut terminal);

        // Restore
        execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        terminal.show_cursor()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.last_frame = Instant::now();
        loop {
            let now = Instant::now();
            self.tick(now);

            terminal.draw(|f| {
                ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    &mut self.start_effect,
                    &mut self.effect_process_time,
                    now,
                );
            })?;

            let timeout = self.frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let action = match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => key_to_action(key),
                        Event::Mouse(mouse) => {
                            let (cols, rows) = crossterm::terminal::size()?;
                            self.click_action(Rect::new(0, 0, cols, rows), mouse)
                        }
                        _ => Action::None,
                    };
                    if action != Action::None {
                        debug!(?action, "input");
                    }
                    if !self.apply_action(action) {
                        info!("quit");
                        return Ok(());
                    }
                }
            }
        }
    }
}
