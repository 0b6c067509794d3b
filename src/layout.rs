use crate::config::{Config, Theme};
use ratatui::layout::{Position, Rect, Size};
use time::Month;

/// Columns per month cell; the grid is three cells wide and four rows tall.
const CELL_WIDTH: u16 = 12;
const CELL_WIDTH_COMPACT: u16 = 10;
const GRID_COLS: u16 = 3;
const GRID_ROWS: u16 = 4;

/// Lines between the bottom of the anchor container and the popover.
const ANCHOR_GAP: u16 = 1;

/// Width of each year-nav arrow's clickable region.
const NAV_WIDTH: u16 = 3;

/// Something clickable inside an open popover.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Hit {
    PrevYear,
    NextYear,
    Cell(Month),
    Today,
    Clear,
    /// Inside the popover but not on any control.
    Inside,
}

/// Computed geometry of an open popover: where it sits and which rectangles
/// respond to clicks.  Recomputed on open and on viewport resize.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PickerLayout {
    popover: Rect,
    prev_year: Option<Rect>,
    next_year: Option<Rect>,
    year_label: Rect,
    cells: [Rect; 12],
    today_btn: Option<Rect>,
    clear_btn: Option<Rect>,
    overlay: bool,
}

impl PickerLayout {
    /// Places the popover for `container` and lays out its controls.
    ///
    /// With `overlay` set (narrow viewport and `mobile_overlay` enabled) the
    /// popover is centered in the viewport over a backdrop; otherwise it is
    /// anchored below the container, clamped so it stays on screen.
    pub(crate) fn compute(config: &Config, container: Rect, viewport: Size, overlay: bool) -> Self {
        let cell_width = match config.theme {
            Theme::Compact => CELL_WIDTH_COMPACT,
            _ => CELL_WIDTH,
        };
        let has_actions = config.show_today_btn || config.show_clear_btn;
        let inner_width = cell_width * GRID_COLS;
        let inner_height = 1 + GRID_ROWS + u16::from(has_actions);
        let width = inner_width + 2;
        let height = inner_height + 2;

        let (x, y) = if overlay {
            (
                viewport.width.saturating_sub(width) / 2,
                viewport.height.saturating_sub(height) / 2,
            )
        } else {
            (
                container
                    .x
                    .min(viewport.width.saturating_sub(width)),
                (container.y + container.height + ANCHOR_GAP)
                    .min(viewport.height.saturating_sub(height)),
            )
        };
        let popover = Rect::new(x, y, width, height);
        let inner = Rect::new(x + 1, y + 1, inner_width, inner_height);

        let nav_y = inner.y;
        let prev_year = config
            .show_year_nav
            .then(|| Rect::new(inner.x, nav_y, NAV_WIDTH, 1));
        let next_year = config
            .show_year_nav
            .then(|| Rect::new(inner.x + inner.width - NAV_WIDTH, nav_y, NAV_WIDTH, 1));
        let year_label = Rect::new(inner.x + (inner.width.saturating_sub(4)) / 2, nav_y, 4, 1);

        let grid_y = inner.y + 1;
        let mut cells = [Rect::ZERO; 12];
        for (i, cell) in cells.iter_mut().enumerate() {
            let col = u16::try_from(i).unwrap_or(0) % GRID_COLS;
            let row = u16::try_from(i).unwrap_or(0) / GRID_COLS;
            *cell = Rect::new(inner.x + col * cell_width, grid_y + row, cell_width, 1);
        }

        let actions_y = grid_y + GRID_ROWS;
        let half = inner.width / 2;
        let (today_btn, clear_btn) = match (config.show_today_btn, config.show_clear_btn) {
            (true, true) => (
                Some(Rect::new(inner.x, actions_y, half, 1)),
                Some(Rect::new(inner.x + half, actions_y, inner.width - half, 1)),
            ),
            (true, false) => (Some(Rect::new(inner.x, actions_y, inner.width, 1)), None),
            (false, true) => (None, Some(Rect::new(inner.x, actions_y, inner.width, 1))),
            (false, false) => (None, None),
        };

        PickerLayout {
            popover,
            prev_year,
            next_year,
            year_label,
            cells,
            today_btn,
            clear_btn,
            overlay,
        }
    }

    pub fn popover(&self) -> Rect {
        self.popover
    }

    pub fn is_overlay(&self) -> bool {
        self.overlay
    }

    pub(crate) fn prev_year(&self) -> Option<Rect> {
        self.prev_year
    }

    pub(crate) fn next_year(&self) -> Option<Rect> {
        self.next_year
    }

    pub(crate) fn year_label(&self) -> Rect {
        self.year_label
    }

    pub(crate) fn cell(&self, month: Month) -> Rect {
        self.cells[usize::from(u8::from(month)) - 1]
    }

    pub(crate) fn today_btn(&self) -> Option<Rect> {
        self.today_btn
    }

    pub(crate) fn clear_btn(&self) -> Option<Rect> {
        self.clear_btn
    }

    /// Resolves a click position against the popover's controls.  `None`
    /// means the click was outside the popover entirely.
    pub(crate) fn hit(&self, pos: Position) -> Option<Hit> {
        if !self.popover.contains(pos) {
            return None;
        }
        if self.prev_year.is_some_and(|r| r.contains(pos)) {
            return Some(Hit::PrevYear);
        }
        if self.next_year.is_some_and(|r| r.contains(pos)) {
            return Some(Hit::NextYear);
        }
        if self.today_btn.is_some_and(|r| r.contains(pos)) {
            return Some(Hit::Today);
        }
        if self.clear_btn.is_some_and(|r| r.contains(pos)) {
            return Some(Hit::Clear);
        }
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.contains(pos) {
                let offset = u8::try_from(i).unwrap_or(0);
                return Some(Hit::Cell(Month::January.nth_next(offset)));
            }
        }
        Some(Hit::Inside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn test_anchored_below_container() {
        let container = Rect::new(5, 3, 30, 3);
        let layout =
            PickerLayout::compute(&config(), container, Size::new(120, 40), false);
        assert_eq!(layout.popover().x, 5);
        assert_eq!(layout.popover().y, 7);
        assert!(!layout.is_overlay());
    }

    #[test]
    fn test_anchored_clamps_to_viewport() {
        let container = Rect::new(100, 36, 30, 3);
        let viewport = Size::new(120, 40);
        let layout = PickerLayout::compute(&config(), container, viewport, false);
        let popover = layout.popover();
        assert!(popover.x + popover.width <= viewport.width);
        assert!(popover.y + popover.height <= viewport.height);
    }

    #[test]
    fn test_overlay_is_centered() {
        let container = Rect::new(0, 0, 30, 3);
        let layout = PickerLayout::compute(&config(), container, Size::new(100, 41), true);
        let popover = layout.popover();
        assert!(layout.is_overlay());
        assert_eq!(popover.x, (100 - popover.width) / 2);
        assert_eq!(popover.y, (41 - popover.height) / 2);
    }

    #[test]
    fn test_hit_month_cells() {
        let layout =
            PickerLayout::compute(&config(), Rect::new(0, 0, 30, 3), Size::new(120, 40), false);
        let jan = layout.cell(Month::January);
        assert_eq!(
            layout.hit(Position::new(jan.x, jan.y)),
            Some(Hit::Cell(Month::January))
        );
        let dec = layout.cell(Month::December);
        assert_eq!(
            layout.hit(Position::new(dec.x + dec.width - 1, dec.y)),
            Some(Hit::Cell(Month::December))
        );
    }

    #[test]
    fn test_hit_nav_and_actions() {
        let layout =
            PickerLayout::compute(&config(), Rect::new(0, 0, 30, 3), Size::new(120, 40), false);
        let prev = layout.prev_year().unwrap();
        assert_eq!(layout.hit(prev.as_position()), Some(Hit::PrevYear));
        let next = layout.next_year().unwrap();
        assert_eq!(layout.hit(next.as_position()), Some(Hit::NextYear));
        let today = layout.today_btn().unwrap();
        assert_eq!(layout.hit(today.as_position()), Some(Hit::Today));
        let clear = layout.clear_btn().unwrap();
        assert_eq!(layout.hit(clear.as_position()), Some(Hit::Clear));
    }

    #[test]
    fn test_hit_outside_is_none() {
        let layout =
            PickerLayout::compute(&config(), Rect::new(0, 0, 30, 3), Size::new(120, 40), false);
        assert_eq!(layout.hit(Position::new(119, 39)), None);
    }

    #[test]
    fn test_disabled_toggles_remove_regions() {
        let config = Config {
            show_year_nav: false,
            show_today_btn: false,
            show_clear_btn: false,
            ..Config::default()
        };
        let layout =
            PickerLayout::compute(&config, Rect::new(0, 0, 30, 3), Size::new(120, 40), false);
        assert!(layout.prev_year().is_none());
        assert!(layout.next_year().is_none());
        assert!(layout.today_btn().is_none());
        assert!(layout.clear_btn().is_none());
        // Without an action row the popover is one line shorter.
        assert_eq!(layout.popover().height, 7);
    }
}
