//! Pre-snap play menu: cursor over the catalog, wrap-around, rate-limited.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct PlaySelector {
    len: usize,
    cursor: usize,
    visible: bool,
    selected: Option<usize>,
    cooldown: f32,
    cooldown_remaining: f32,
}

impl PlaySelector {
    pub fn new(len: usize, cooldown: f32) -> Self {
        Self { len, cursor: 0, visible: false, selected: None, cooldown, cooldown_remaining: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Catalog size changed (extra plays loaded).
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.cursor >= len {
            self.cursor = 0;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.cursor = 0;
        self.selected = None;
        self.cooldown_remaining = 0.0;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn step(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    pub fn navigate_up(&mut self) -> bool {
        self.navigate(|cursor, len| (cursor + len - 1) % len)
    }

    pub fn navigate_down(&mut self) -> bool {
        self.navigate(|cursor, len| (cursor + 1) % len)
    }

    fn navigate(&mut self, next: impl Fn(usize, usize) -> usize) -> bool {
        if !self.visible || self.len == 0 || self.cooldown_remaining > 0.0 {
            return false;
        }
        self.cursor = next(self.cursor, self.len);
        self.cooldown_remaining = self.cooldown;
        debug!("play menu cursor at {}", self.cursor);
        true
    }

    /// Picks the highlighted play and closes the menu.
    pub fn select(&mut self) -> Option<usize> {
        if !self.visible || self.len == 0 {
            return None;
        }
        self.selected = Some(self.cursor);
        self.visible = false;
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_wraps_both_ways() {
        let mut menu = PlaySelector::new(3, 0.0);
        menu.show();
        assert!(menu.navigate_up());
        assert_eq!(menu.cursor(), 2);
        assert!(menu.navigate_down());
        assert!(menu.navigate_down());
        assert_eq!(menu.cursor(), 1);
    }

    #[test]
    fn navigation_is_rate_limited() {
        let mut menu = PlaySelector::new(2, 0.2);
        menu.show();
        assert!(menu.navigate_down());
        assert!(!menu.navigate_down());
        menu.step(0.1);
        assert!(!menu.navigate_down());
        menu.step(0.11);
        assert!(menu.navigate_down());
        assert_eq!(menu.cursor(), 0);
    }

    #[test]
    fn show_resets_cursor_and_selection() {
        let mut menu = PlaySelector::new(2, 0.0);
        menu.show();
        menu.navigate_down();
        assert_eq!(menu.select(), Some(1));
        assert!(!menu.is_visible());
        menu.show();
        assert_eq!(menu.cursor(), 0);
        assert_eq!(menu.selected(), None);
    }

    #[test]
    fn hidden_menu_ignores_input() {
        let mut menu = PlaySelector::new(2, 0.0);
        assert!(!menu.navigate_down());
        assert_eq!(menu.select(), None);
    }
}
