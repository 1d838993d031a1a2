//! One running game: state, fixed-timestep accumulator and the best-score
//! boundary.  Several sessions can exist side by side; none of them touch
//! global state.

use std::time::Duration;

use rand::Rng;

use crate::compute::{init_state, step};
use crate::config::GameConfig;
use crate::entities::{GameState, InputState, Variant, WeaponKind};
use crate::store::ScoreStore;

pub struct Session<S: ScoreStore, R: Rng> {
    state: GameState,
    config: GameConfig,
    store: S,
    rng: R,
    /// Wall-clock time not yet consumed by a fixed step.
    accumulator: Duration,
    /// Best score as last written to (or read from) the store.
    saved_best: u32,
    /// Weapon switch seen by `advance` but not yet consumed by a step.
    pending_weapon: Option<WeaponKind>,
}

impl<S: ScoreStore, R: Rng> Session<S, R> {
    /// Start a game. The stored best score is read exactly once, here.
    pub fn new(variant: Variant, config: GameConfig, store: S, rng: R) -> Self {
        let saved_best = store.load_or_zero();
        let state = init_state(variant, &config, saved_best);
        log::info!("new {:?} session, best score {}", variant, saved_best);
        Self {
            state,
            config,
            store,
            rng,
            accumulator: Duration::ZERO,
            saved_best,
            pending_weapon: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios and tests.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn saved_best(&self) -> u32 {
        self.saved_best
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Feed wall-clock time into the accumulator and run every whole fixed
    /// step it now holds.  Returns the number of steps taken.
    ///
    /// At most `timing.max_steps_per_advance` steps run per call; older
    /// backlog is dropped.  A weapon switch in `input` is kept until a step
    /// runs, even if this call runs none.
    pub fn advance(&mut self, elapsed: Duration, input: &InputState) -> u32 {
        if input.weapon_select.is_some() {
            self.pending_weapon = input.weapon_select;
        }
        let input = InputState { weapon_select: None, ..input.clone() };
        let dt = self.config.step_duration();
        let max_steps = self.config.timing.max_steps_per_advance.max(1);

        self.accumulator += elapsed;
        let backlog = dt * max_steps;
        if self.accumulator > backlog {
            log::debug!("dropping {:?} of frame backlog", self.accumulator - backlog);
            self.accumulator = backlog;
        }

        let mut steps = 0;
        while self.accumulator >= dt {
            self.accumulator -= dt;
            self.step(&input);
            steps += 1;
        }
        steps
    }

    /// Run exactly one fixed step and persist a new best score if one was set.
    pub fn step(&mut self, input: &InputState) {
        if self.state.is_over() {
            return;
        }
        let pending = self.pending_weapon.take();
        let input = InputState {
            weapon_select: input.weapon_select.or(pending),
            ..input.clone()
        };
        self.state = step(&self.state, &input, &self.config, &mut self.rng);
        self.persist_best();
    }

    fn persist_best(&mut self) {
        let score = self.state.score;
        if score <= self.saved_best {
            return;
        }
        self.saved_best = score;
        match self.store.save(score) {
            Ok(()) => log::info!("new best score {}", score),
            Err(e) => log::warn!("could not save best score {}: {}", score, e),
        }
    }
}
