//! Callback set fired by the keyboard view.

use super::KeyCode;

/// Receives key and gesture callbacks from a [`KeyboardView`](super::KeyboardView).
///
/// Only [`on_key`](Self::on_key) is required; every other capability
/// defaults to doing nothing.
pub trait KeyboardActionListener {
    /// A key was tapped.
    fn on_key(&mut self, code: KeyCode);

    /// A key went down (before `on_key`).
    fn on_press(&mut self, _code: KeyCode) {}

    /// A key was released (after `on_key`).
    fn on_release(&mut self, _code: KeyCode) {}

    /// A key carrying a whole text string was tapped.
    fn on_text(&mut self, _text: &str) {}

    fn swipe_left(&mut self) {}
    fn swipe_right(&mut self) {}
    fn swipe_down(&mut self) {}
    fn swipe_up(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<KeyCode>);

    impl KeyboardActionListener for Recorder {
        fn on_key(&mut self, code: KeyCode) {
            self.0.push(code);
        }
    }

    #[test]
    fn default_capabilities_are_noops() {
        let mut rec = Recorder::default();
        rec.on_press(KeyCode::from_char('a'));
        rec.on_release(KeyCode::from_char('a'));
        rec.on_text("abc");
        rec.swipe_left();
        rec.swipe_right();
        rec.swipe_down();
        rec.swipe_up();
        assert!(rec.0.is_empty());

        rec.on_key(KeyCode::from_char('a'));
        assert_eq!(rec.0, vec![KeyCode::from_char('a')]);
    }
}
