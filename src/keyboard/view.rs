//! Keyboard view: the rendering surface's model of the layout.
//!
//! The view holds the layout behind an `Arc` so the renderer and the key
//! handler read the same immutable map.  Geometry is expressed in
//! normalised view coordinates: `(0, 0)` is the top-left corner and
//! `(1, 1)` the bottom-right.  Rows share the height equally; keys share
//! their row's width in proportion to [`Key::width`].

use std::sync::Arc;

use super::{Key, KeyCode, Layout};

/// Normalised rectangle `(left, top, width, height)` of a key.
pub type KeyRect = (f32, f32, f32, f32);

/// The keyboard view built for one input session.
#[derive(Debug, Clone)]
pub struct KeyboardView {
    layout: Arc<Layout>,
}

impl KeyboardView {
    pub fn new(layout: Arc<Layout>) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// The key under the tap at `(x, y)`, or `None` outside the view.
    pub fn key_at(&self, x: f32, y: f32) -> Option<&Key> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }

        let rows = &self.layout.rows;
        let row_idx = ((y * rows.len() as f32) as usize).min(rows.len().checked_sub(1)?);
        let row = &rows[row_idx];

        let target = x * row.total_width();
        let mut edge = 0.0;
        for key in &row.keys {
            edge += key.width;
            if target < edge {
                return Some(key);
            }
        }
        // x == 1.0 lands on the right edge of the last key.
        row.keys.last()
    }

    /// The code of the key under `(x, y)`.
    pub fn code_at(&self, x: f32, y: f32) -> Option<KeyCode> {
        self.key_at(x, y).map(|k| k.code)
    }

    /// Every key with its normalised rectangle, in row order.
    pub fn key_rects(&self) -> Vec<(&Key, KeyRect)> {
        let rows = &self.layout.rows;
        let row_h = 1.0 / rows.len().max(1) as f32;

        let mut out = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            let total = row.total_width();
            let mut left = 0.0;
            for key in &row.keys {
                let w = key.width / total;
                out.push((key, (left, r as f32 * row_h, w, row_h)));
                left += w;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qwerty_view() -> KeyboardView {
        KeyboardView::new(Arc::new(Layout::qwerty()))
    }

    #[test]
    fn top_left_is_q() {
        assert_eq!(qwerty_view().code_at(0.0, 0.0), Some(KeyCode::from_char('q')));
    }

    #[test]
    fn top_right_edge_is_p() {
        assert_eq!(qwerty_view().code_at(1.0, 0.1), Some(KeyCode::from_char('p')));
    }

    #[test]
    fn middle_of_bottom_row_is_space() {
        assert_eq!(qwerty_view().code_at(0.5, 0.9), Some(KeyCode::from_char(' ')));
    }

    #[test]
    fn delete_and_done_are_on_the_right() {
        let view = qwerty_view();
        assert_eq!(view.code_at(0.95, 0.6), Some(KeyCode::DELETE));
        assert_eq!(view.code_at(0.95, 0.99), Some(KeyCode::DONE));
    }

    #[test]
    fn outside_the_view_is_none() {
        let view = qwerty_view();
        assert!(view.key_at(-0.1, 0.5).is_none());
        assert!(view.key_at(0.5, 1.01).is_none());
    }

    #[test]
    fn rects_cover_each_row() {
        let view = qwerty_view();
        let rects = view.key_rects();
        assert_eq!(rects.len(), view.layout().keys().count());

        for r in 0..view.layout().rows.len() {
            let top = r as f32 / view.layout().rows.len() as f32;
            let width: f32 = rects
                .iter()
                .filter(|(_, rect)| (rect.1 - top).abs() < 1e-6)
                .map(|(_, rect)| rect.2)
                .sum();
            assert!((width - 1.0).abs() < 1e-4, "row {r} width {width}");
        }
    }

    #[test]
    fn layout_is_shared_not_copied() {
        let layout = Arc::new(Layout::qwerty());
        let view = KeyboardView::new(Arc::clone(&layout));
        assert!(Arc::ptr_eq(view.layout(), &layout));
    }
}
