use crate::layout::PickerLayout;
use crate::picker::Picker;
use crate::registry::Registry;
use crate::theme::{palette, Palette};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Clear, Widget},
};

const ARROW_CLOSED: &str = "▼";
const ARROW_OPEN: &str = "▲";
const ICON: &str = "▦";
const NAV_PREV: &str = "◀";
const NAV_NEXT: &str = "▶";

/// Draws every live picker: headers (and any visible error message) first,
/// then the backdrop and popover of the open instance on top.
impl Widget for &Registry {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for id in self.live_ids() {
            if let Some(picker) = self.picker(id) {
                render_header(&picker, self, buf);
            }
        }
        let Some(open_id) = self.currently_open() else {
            return;
        };
        let Some(picker) = self.picker(open_id) else {
            return;
        };
        let pal = palette(picker.config().theme);
        if let Some(layout) = picker.layout() {
            if layout.is_overlay() {
                buf.set_style(area, pal.backdrop);
            }
            render_popover(&picker, layout, pal, buf);
        }
    }
}

fn render_header(picker: &Picker<'_>, registry: &Registry, buf: &mut Buffer) {
    let config = picker.config();
    let pal = palette(config.theme);
    let Some(container) = registry.page().container(picker.container_id()) else {
        return;
    };
    let area = container.area();
    if area.width < 4 || area.height == 0 {
        return;
    }
    let style = if config.disabled {
        pal.header_disabled
    } else if picker.is_open() {
        pal.header_active
    } else {
        pal.header
    };
    let border_style = if container.has_error() { pal.error } else { style };
    let bordered = area.height >= 3;
    if bordered {
        Block::bordered().style(border_style).render(area, buf);
    } else {
        buf.set_style(area, style);
    }
    let inset = u16::from(bordered);
    let y = area.y + inset;
    let mut x = area.x + inset + 1;
    let right = area.x + area.width - inset - 1;
    if config.show_icon {
        buf.set_stringn(x, y, ICON, 1, style);
        x += 2;
    }
    let (text, text_style) = if picker.year_month().is_some() {
        (picker.display_value(), style)
    } else {
        (config.placeholder.as_str(), pal.placeholder)
    };
    let text_width = usize::from(right.saturating_sub(x + 2));
    buf.set_stringn(x, y, text, text_width, text_style);
    let arrow = if picker.is_open() { ARROW_OPEN } else { ARROW_CLOSED };
    buf.set_stringn(right.saturating_sub(1), y, arrow, 1, style);

    if let Some(msg) = container.message().filter(|m| m.is_visible()) {
        buf.set_stringn(
            area.x,
            area.y + area.height,
            msg.text(),
            usize::from(area.width),
            pal.error,
        );
    }
}

fn render_popover(picker: &Picker<'_>, layout: &PickerLayout, pal: &Palette, buf: &mut Buffer) {
    let config = picker.config();
    let popover = layout.popover();
    Clear.render(popover, buf);
    Block::bordered().style(pal.base).render(popover, buf);

    if let Some(prev) = layout.prev_year() {
        let style = if picker.view_year() <= config.min_year {
            pal.nav_disabled
        } else {
            pal.nav
        };
        buf.set_stringn(prev.x + 1, prev.y, NAV_PREV, 1, style);
    }
    if let Some(next) = layout.next_year() {
        let style = if picker.view_year() >= config.max_year {
            pal.nav_disabled
        } else {
            pal.nav
        };
        buf.set_stringn(next.x + 1, next.y, NAV_NEXT, 1, style);
    }
    let year_label = layout.year_label();
    buf.set_stringn(
        year_label.x,
        year_label.y,
        &picker.view_year().to_string(),
        usize::from(year_label.width),
        pal.year,
    );

    for cell in picker.grid() {
        let rect = layout.cell(cell.month);
        let style = if cell.is_disabled {
            pal.cell_disabled
        } else if cell.is_selected {
            pal.cell_selected
        } else if cell.is_today {
            pal.cell_today
        } else {
            pal.cell
        };
        let name = config.locale.month_name(cell.month);
        buf.set_style(rect, style);
        buf.set_stringn(
            rect.x + 1,
            rect.y,
            name,
            usize::from(rect.width.saturating_sub(1)),
            style,
        );
    }

    if let Some(rect) = layout.today_btn() {
        render_action(config.locale.today_label(), rect, pal, buf);
    }
    if let Some(rect) = layout.clear_btn() {
        render_action(config.locale.clear_label(), rect, pal, buf);
    }
}

fn render_action(label: &str, rect: Rect, pal: &Palette, buf: &mut Buffer) {
    let text = format!("[{label}]");
    let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let x = rect.x + rect.width.saturating_sub(width) / 2;
    buf.set_stringn(x, rect.y, &text, usize::from(rect.width), pal.action);
}
