//! Browser session: one core wired to a frame clock, a pull-style render sink
//! and the local record, plus the account flow around it.

use chrono::{DateTime, Utc};

use crate::auth;
use crate::error::{AuthError, RulesError, StoreError};
use crate::game::SimulationCore;
use crate::grid::Direction;
use crate::palette::ColorCycle;
use crate::rules::Rules;
use crate::scheduler::FrameClock;
use crate::snapshot::{GameState, LatestFrame, Snapshot};
use crate::store::{timestamp, LeaderboardEntry, LocalStore, ScoreEntry};

/// Minimum drag, in CSS pixels, that counts as a swipe.
pub const SWIPE_MIN_DISTANCE: f64 = 30.0;

pub type BrowserCore = SimulationCore<FrameClock, LatestFrame, LocalStore>;

#[derive(Debug)]
pub struct App {
    core: BrowserCore,
    colors: ColorCycle,
}

impl App {
    /// Restore from the stored record (if any). A remembered user whose
    /// account still exists is signed back in.
    pub fn new(rules: Rules, saved: Option<&str>, seed: u64) -> Result<Self, RulesError> {
        let store = LocalStore::load(saved);
        let restored = store.current_user().map(str::to_owned);
        let mut core = SimulationCore::new(rules, seed, FrameClock::new(), LatestFrame::new(), store)?;
        core.reset();
        core.bind_user(restored.as_deref());
        Ok(Self {
            core,
            colors: ColorCycle::default(),
        })
    }

    #[must_use]
    pub fn core(&self) -> &BrowserCore {
        &self.core
    }

    /// Called once per animation frame. Steps the game when a tick is due and
    /// returns whether there is a new frame to draw.
    ///
    /// `now_ms` is the monotonic frame timestamp that paces ticks (the value
    /// `requestAnimationFrame` passes, relative to page load). `epoch_ms` is
    /// wall-clock time since the Unix epoch (`Date.now()`) and dates any score
    /// recorded during this frame.
    pub fn frame(&mut self, now_ms: f64, epoch_ms: f64) -> bool {
        self.core.store_mut().set_now(timestamp(epoch_ms));
        if self.core.scheduler_mut().poll(now_ms) {
            self.core.step();
        }
        let dirty = self.core.renderer_mut().take_dirty();
        if dirty {
            self.colors.advance();
        }
        dirty
    }

    pub fn start(&mut self) {
        self.core.start();
    }

    pub fn toggle_pause(&mut self) {
        self.core.toggle_pause();
    }

    /// Abandon the run and return to the idle board. The signed-in user stays
    /// signed in.
    pub fn reset(&mut self) {
        let user = self.core.user().map(str::to_owned);
        self.core.reset();
        self.core.bind_user(user.as_deref());
    }

    /// Returns `true` when the key steers the snake, so the host can suppress
    /// the browser's default (page scrolling).
    pub fn key_down(&mut self, key: &str) -> bool {
        if self.core.state() != GameState::Playing {
            return false;
        }
        match Direction::from_key(key) {
            Some(direction) => {
                self.core.set_pending_direction(direction);
                true
            }
            None => false,
        }
    }

    pub fn swipe(&mut self, dx: f64, dy: f64) -> bool {
        Direction::from_swipe(dx, dy, SWIPE_MIN_DISTANCE)
            .is_some_and(|d| self.core.set_pending_direction(d))
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.core.snapshot()
    }

    /// CSS colours for the current snake, head first.
    #[must_use]
    pub fn segment_colors(&self) -> Vec<String> {
        self.colors.colors(self.core.snake().len())
    }

    pub fn register(&mut self, username: &str, password: &str, now_ms: f64) -> Result<String, AuthError> {
        let name = auth::register(self.core.store_mut(), username, password, timestamp(now_ms))?;
        self.core.bind_user(Some(&name));
        Ok(name)
    }

    pub fn login(&mut self, username: &str, password: &str, now_ms: f64) -> Result<String, AuthError> {
        let name = auth::login(self.core.store_mut(), username, password, timestamp(now_ms))?;
        self.core.bind_user(Some(&name));
        Ok(name)
    }

    /// Sign out and drop back to an idle board.
    pub fn logout(&mut self) {
        auth::logout(self.core.store_mut());
        self.core.reset();
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.core.user()
    }

    #[must_use]
    pub fn score_history(&self) -> Vec<ScoreEntry> {
        self.current_user()
            .map(|u| self.core.store().score_history(u))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn login_history(&self) -> Vec<DateTime<Utc>> {
        self.current_user()
            .map(|u| self.core.store().login_history(u))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.core.store().leaderboard(limit)
    }

    /// The record to write back to `localStorage`.
    pub fn save_data(&self) -> Result<String, StoreError> {
        self.core.store().to_json()
    }
}
