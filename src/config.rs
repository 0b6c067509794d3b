use crate::ym::BoundSpec;
use std::fmt;
use time::{Date, Month};

/// Callbacks a host can attach to a picker.  All methods default to doing
/// nothing, so implementors only override what they care about and
/// [`NoHooks`] serves as the null object for unconfigured instances.
///
/// Hooks fire only after the picker and its page are fully updated, and they
/// receive plain values rather than any handle back into the widget system.
#[allow(unused_variables)]
pub trait Hooks {
    /// The selection changed.  `value` is the `"YYYY-MM"` interchange string
    /// (empty after a clear) and `date` the first day of the selected month.
    fn on_change(&mut self, value: &str, date: Option<Date>) {}

    fn on_open(&mut self) {}

    fn on_close(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoHooks;

impl Hooks for NoHooks {}

/// Month names, button labels, and display formatting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Locale {
    #[default]
    Es,
    En,
}

static MONTHS_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

static MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

impl Locale {
    pub fn month_name(&self, month: Month) -> &'static str {
        let names = match self {
            Locale::Es => &MONTHS_ES,
            Locale::En => &MONTHS_EN,
        };
        names[usize::from(u8::from(month)) - 1]
    }

    pub fn today_label(&self) -> &'static str {
        match self {
            Locale::Es => "Mes actual",
            Locale::En => "Current month",
        }
    }

    pub fn clear_label(&self) -> &'static str {
        match self {
            Locale::Es => "Limpiar",
            Locale::En => "Clear",
        }
    }

    /// Human-readable form of a selection, e.g. `"Marzo de 2024"` or
    /// `"March 2024"`.
    pub fn display(&self, month: Month, year: i32) -> String {
        match self {
            Locale::Es => format!("{} de {year}", self.month_name(month)),
            Locale::En => format!("{} {year}", self.month_name(month)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Compact,
}

/// Per-instance configuration, fixed at construction.
///
/// The one sanctioned runtime mutation is the `disabled` flag, which
/// `disable()`/`enable()` flip; everything else is a snapshot.
pub struct Config {
    /// Shown in the header while nothing is selected.
    pub placeholder: String,
    /// Delegated to the bound input's constraint validation.
    pub required: bool,
    pub locale: Locale,
    /// Lower selectable bound; unresolvable text means "no bound".
    pub min_date: Option<BoundSpec>,
    /// Upper selectable bound; unresolvable text means "no bound".
    pub max_date: Option<BoundSpec>,
    /// Clamp for year navigation.
    pub min_year: i32,
    pub max_year: i32,
    pub disabled: bool,
    pub show_icon: bool,
    pub show_today_btn: bool,
    pub show_clear_btn: bool,
    pub show_year_nav: bool,
    /// Use a centered popover over a dimmed backdrop on narrow viewports.
    pub mobile_overlay: bool,
    /// Viewport width at or under which the overlay layout applies.
    pub mobile_width_threshold: u16,
    pub close_on_click_outside: bool,
    /// Opening this picker first closes any other open one.
    pub auto_close_other_pickers: bool,
    pub theme: Theme,
    pub hooks: Box<dyn Hooks>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            placeholder: String::from("Selecciona un mes"),
            required: false,
            locale: Locale::Es,
            min_date: None,
            max_date: None,
            min_year: 1900,
            max_year: 2100,
            disabled: false,
            show_icon: true,
            show_today_btn: true,
            show_clear_btn: true,
            show_year_nav: true,
            mobile_overlay: true,
            mobile_width_threshold: 768,
            close_on_click_outside: true,
            auto_close_other_pickers: true,
            theme: Theme::Default,
            hooks: Box::new(NoHooks),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("placeholder", &self.placeholder)
            .field("required", &self.required)
            .field("locale", &self.locale)
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .field("min_year", &self.min_year)
            .field("max_year", &self.max_year)
            .field("disabled", &self.disabled)
            .field("show_icon", &self.show_icon)
            .field("show_today_btn", &self.show_today_btn)
            .field("show_clear_btn", &self.show_clear_btn)
            .field("show_year_nav", &self.show_year_nav)
            .field("mobile_overlay", &self.mobile_overlay)
            .field("mobile_width_threshold", &self.mobile_width_threshold)
            .field("close_on_click_outside", &self.close_on_click_outside)
            .field("auto_close_other_pickers", &self.auto_close_other_pickers)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}
