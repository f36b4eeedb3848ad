//! Game state: arena, active piece, drop timer, lifecycle.

use crate::GameConfig;
use crate::arena::{Arena, Position};
use crate::error::GameError;
use crate::piece::{Cell, Matrix, PieceKind, create_piece};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Gravity interval: one row per second.
pub const DEFAULT_DROP_INTERVAL: Duration = Duration::from_millis(1000);

/// Largest accepted width or height, in cells.
pub const MAX_BOARD_SIZE: usize = 200;

/// Lifecycle phase. There is no pause and no game-over phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Stopped,
    Running,
}

/// The falling piece. Its matrix is an owned copy, rotated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub kind: PieceKind,
    pub matrix: Matrix,
    pub color: Cell,
    pub pos: Position,
}

/// Game state: arena, current piece, drop counter and running flag.
#[derive(Debug)]
pub struct GameState {
    arena: Arena,
    player: Option<Player>,
    phase: Phase,
    /// Time accumulated towards the next gravity drop.
    drop_counter: Duration,
    drop_interval: Duration,
    /// Kind of the first piece after each start; random when `None`.
    first_piece: Option<PieceKind>,
    rng: StdRng,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = Self::with_rng(config.width, config.height, config.drop_interval, rng)?;
        state.first_piece = config.first_piece;
        Ok(state)
    }

    /// Deterministic state for a given seed.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(
            width,
            height,
            DEFAULT_DROP_INTERVAL,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        width: usize,
        height: usize,
        drop_interval: Duration,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        // Every piece must fit across the board, or spawning tops out forever.
        let widest = PieceKind::ALL
            .iter()
            .map(|k| k.template().len())
            .max()
            .unwrap_or(0);
        let allowed = widest..=MAX_BOARD_SIZE;
        if !allowed.contains(&width) || !allowed.contains(&height) {
            return Err(GameError::InvalidDimensions { width, height });
        }
        Ok(Self {
            arena: Arena::new(width, height)?,
            player: None,
            phase: Phase::Stopped,
            drop_counter: Duration::ZERO,
            drop_interval,
            first_piece: None,
            rng,
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.phase = Phase::Running;
        self.arena.clear();
        self.drop_counter = Duration::ZERO;
        match self.first_piece {
            Some(kind) => self.spawn_kind(kind),
            None => self.spawn(),
        }
        info!("game started");
    }

    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = Phase::Stopped;
        self.arena.clear();
        self.player = None;
        self.drop_counter = Duration::ZERO;
        info!("game stopped");
    }

    /// Flip Stopped <-> Running. Returns the new phase.
    pub fn toggle(&mut self) -> Phase {
        match self.phase {
            Phase::Stopped => self.start(),
            Phase::Running => self.stop(),
        }
        self.phase
    }

    /// Advance the drop timer by `delta`. Returns true if gravity moved the piece this call.
    pub fn update(&mut self, delta: Duration) -> bool {
        if !self.is_running() {
            return false;
        }
        self.drop_counter += delta;
        if self.drop_counter > self.drop_interval {
            self.player_drop();
            self.drop_counter = Duration::ZERO;
            return true;
        }
        false
    }

    /// Move down one row; lock, respawn and sweep if blocked.
    pub fn player_drop(&mut self) {
        if !self.is_running() {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.pos.y += 1;
        if self.arena.collides(&player.matrix, player.pos) {
            player.pos.y -= 1;
            self.arena.merge(&player.matrix, player.pos, player.color);
            trace!(kind = ?player.kind, x = player.pos.x, y = player.pos.y, "piece locked");
            self.spawn();
            let removed = self.arena.sweep();
            if removed > 0 {
                debug!(rows = removed, "rows swept");
            }
        }
    }

    /// Shift one column left (`direction < 0`) or right; reverted if blocked.
    pub fn player_move(&mut self, direction: i32) {
        if !self.is_running() {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.pos.x += direction;
            if self.arena.collides(&player.matrix, player.pos) {
                player.pos.x -= direction;
            }
        }
    }

    /// Rotate with a horizontal kick search: steps of +1, -2, +3, ... from the
    /// current x, abandoned once the next step is larger than the matrix.
    pub fn player_rotate(&mut self, direction: i32) {
        if !self.is_running() {
            return;
        }
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let original_x = player.pos.x;
        let mut offset: i32 = 1;
        player.matrix.rotate(direction);
        while self.arena.collides(&player.matrix, player.pos) {
            player.pos.x += offset;
            offset = -(offset + offset.signum());
            if offset > player.matrix.size() as i32 {
                player.matrix.rotate(-direction);
                player.pos.x = original_x;
                return;
            }
        }
    }

    /// Replace the active piece with a random one centred on the top row.
    /// A spawn that collides wipes the arena and play continues.
    pub fn spawn(&mut self) {
        let kind = PieceKind::ALL[self.rng.gen_range(0..PieceKind::ALL.len())];
        self.spawn_kind(kind);
    }

    pub fn spawn_kind(&mut self, kind: PieceKind) {
        let piece = create_piece(kind);
        let x = spawn_x(self.arena.width(), piece.matrix.size());
        let player = Player {
            kind: piece.kind,
            matrix: piece.matrix,
            color: piece.color,
            pos: Position::new(x, 0),
        };
        if self.arena.collides(&player.matrix, player.pos) {
            info!(kind = ?kind, "topped out, clearing arena");
            self.arena.clear();
        }
        self.player = Some(player);
    }
}

/// Horizontal spawn offset: floor(arena / 2) - floor(piece / 2).
pub fn spawn_x(arena_width: usize, piece_width: usize) -> i32 {
    (arena_width / 2) as i32 - (piece_width / 2) as i32
}
