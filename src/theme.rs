use crate::config::Theme;
use ratatui::style::{Color, Modifier, Style};

/// The styles a theme tag resolves to.  Purely presentational; the state
/// machine never reads these.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    pub base: Style,
    pub header: Style,
    pub header_active: Style,
    pub header_disabled: Style,
    pub placeholder: Style,
    pub year: Style,
    pub nav: Style,
    pub nav_disabled: Style,
    pub cell: Style,
    pub cell_today: Style,
    pub cell_selected: Style,
    pub cell_disabled: Style,
    pub action: Style,
    pub error: Style,
    pub backdrop: Style,
}

const DEFAULT_PALETTE: Palette = Palette {
    base: Style::new().fg(Color::Black).bg(Color::White),
    header: Style::new().fg(Color::Black).bg(Color::White),
    header_active: Style::new()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD),
    header_disabled: Style::new().fg(Color::DarkGray).bg(Color::White),
    placeholder: Style::new().fg(Color::DarkGray).bg(Color::White),
    year: Style::new()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD),
    nav: Style::new().fg(Color::Blue).bg(Color::White),
    nav_disabled: Style::new().fg(Color::DarkGray).bg(Color::White),
    cell: Style::new().fg(Color::Black).bg(Color::White),
    cell_today: Style::new()
        .fg(Color::Blue)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD),
    cell_selected: Style::new().fg(Color::White).bg(Color::Blue),
    cell_disabled: Style::new().fg(Color::DarkGray).bg(Color::White),
    action: Style::new()
        .fg(Color::Blue)
        .bg(Color::White)
        .add_modifier(Modifier::UNDERLINED),
    error: Style::new().fg(Color::Red).bg(Color::White),
    backdrop: Style::new().fg(Color::DarkGray).bg(Color::Black),
};

const DARK_PALETTE: Palette = Palette {
    base: Style::new().fg(Color::White).bg(Color::Black),
    header: Style::new().fg(Color::White).bg(Color::Black),
    header_active: Style::new()
        .fg(Color::White)
        .bg(Color::Black)
        .add_modifier(Modifier::BOLD),
    header_disabled: Style::new().fg(Color::DarkGray).bg(Color::Black),
    placeholder: Style::new().fg(Color::DarkGray).bg(Color::Black),
    year: Style::new()
        .fg(Color::White)
        .bg(Color::Black)
        .add_modifier(Modifier::BOLD),
    nav: Style::new().fg(Color::LightBlue).bg(Color::Black),
    nav_disabled: Style::new().fg(Color::DarkGray).bg(Color::Black),
    cell: Style::new().fg(Color::White).bg(Color::Black),
    cell_today: Style::new()
        .fg(Color::LightYellow)
        .bg(Color::Black)
        .add_modifier(Modifier::BOLD),
    cell_selected: Style::new().fg(Color::Black).bg(Color::LightBlue),
    cell_disabled: Style::new().fg(Color::DarkGray).bg(Color::Black),
    action: Style::new()
        .fg(Color::LightBlue)
        .bg(Color::Black)
        .add_modifier(Modifier::UNDERLINED),
    error: Style::new().fg(Color::LightRed).bg(Color::Black),
    backdrop: Style::new().fg(Color::DarkGray).bg(Color::Black),
};

// Compact shares the default colors; its difference is the tighter popover
// geometry applied in the layout module.
const COMPACT_PALETTE: Palette = DEFAULT_PALETTE;

pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Default => &DEFAULT_PALETTE,
        Theme::Dark => &DARK_PALETTE,
        Theme::Compact => &COMPACT_PALETTE,
    }
}
