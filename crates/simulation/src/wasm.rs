//! JavaScript bindings. Thin wrappers over [`App`]; errors cross the boundary
//! as message strings.

use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::rules::Rules;
use crate::store::DEFAULT_LEADERBOARD_LIMIT;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

#[wasm_bindgen]
#[derive(Debug)]
pub struct SnakeGame {
    app: App,
}

#[wasm_bindgen]
impl SnakeGame {
    /// `saved` is the raw `localStorage` record, `seed` any number (e.g.
    /// `Date.now()`), `rules` an optional JSON override of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(saved: Option<String>, seed: f64, rules: Option<String>) -> Result<SnakeGame, JsValue> {
        let rules = match rules {
            Some(raw) => Rules::from_json(&raw).map_err(js_err)?,
            None => Rules::default(),
        };
        let app = App::new(rules, saved.as_deref(), seed as u64).map_err(js_err)?;
        Ok(Self { app })
    }

    /// Call from `requestAnimationFrame` with its timestamp and `Date.now()`;
    /// `true` means redraw.
    pub fn frame(&mut self, now_ms: f64, epoch_ms: f64) -> bool {
        self.app.frame(now_ms, epoch_ms)
    }

    pub fn start(&mut self) {
        self.app.start();
    }

    pub fn toggle_pause(&mut self) {
        self.app.toggle_pause();
    }

    pub fn reset(&mut self) {
        self.app.reset();
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.app.key_down(key)
    }

    pub fn swipe(&mut self, dx: f64, dy: f64) -> bool {
        self.app.swipe(dx, dy)
    }

    /// 0 idle, 1 playing, 2 paused, 3 over.
    pub fn state(&self) -> u8 {
        self.app.core().state() as u8
    }

    /// 0 up, 1 down, 2 left, 3 right.
    pub fn direction(&self) -> u8 {
        self.app.core().direction() as u8
    }

    pub fn score(&self) -> u32 {
        self.app.core().score()
    }

    pub fn high_score(&self) -> u32 {
        self.app.core().high_score()
    }

    pub fn speed_ms(&self) -> u32 {
        self.app.core().speed_ms()
    }

    pub fn grid_count(&self) -> i32 {
        self.app.core().rules().grid_count
    }

    /// Flattened `[x0, y0, x1, y1, ...]`, head first.
    pub fn snake_cells(&self) -> Vec<i32> {
        self.app
            .core()
            .snake()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    /// Food cell as `[x, y]`, empty when there is none.
    pub fn food(&self) -> Vec<i32> {
        self.app.core().food().map(|f| vec![f.x, f.y]).unwrap_or_default()
    }

    pub fn segment_colors(&self) -> Vec<String> {
        self.app.segment_colors()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        to_json(&self.app.snapshot())
    }

    /// Overlay for the current state as JSON, or `null` while playing.
    pub fn overlay_json(&self) -> Result<String, JsValue> {
        to_json(&self.app.snapshot().overlay())
    }

    pub fn register(&mut self, username: &str, password: &str, now_ms: f64) -> Result<String, JsValue> {
        self.app.register(username, password, now_ms).map_err(js_err)
    }

    pub fn login(&mut self, username: &str, password: &str, now_ms: f64) -> Result<String, JsValue> {
        self.app.login(username, password, now_ms).map_err(js_err)
    }

    pub fn logout(&mut self) {
        self.app.logout();
    }

    pub fn current_user(&self) -> Option<String> {
        self.app.current_user().map(str::to_owned)
    }

    pub fn score_history_json(&self) -> Result<String, JsValue> {
        to_json(&self.app.score_history())
    }

    pub fn login_history_json(&self) -> Result<String, JsValue> {
        to_json(&self.app.login_history())
    }

    /// `limit` of 0 means the default of ten entries.
    pub fn leaderboard_json(&self, limit: usize) -> Result<String, JsValue> {
        let limit = if limit == 0 { DEFAULT_LEADERBOARD_LIMIT } else { limit };
        to_json(&self.app.leaderboard(limit))
    }

    /// Record to persist under `storage_key()`.
    pub fn save_data(&self) -> Result<String, JsValue> {
        self.app.save_data().map_err(js_err)
    }

    pub fn storage_key() -> String {
        crate::store::STORAGE_KEY.to_owned()
    }
}
