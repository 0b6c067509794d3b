//! Popover month picker for ratatui terminals.
//!
//! A [`Registry`] owns a [`Page`] (containers and text inputs addressed by
//! id) and any number of picker instances created against pairs of those
//! elements.  Each picker is a small open/closed state machine around a
//! nullable year-month selection; by default opening one picker closes any
//! other open one, and the registry routes the page-level events they share
//! (outside clicks, Escape, viewport resizes, form resets).
//!
//! The selected value travels as the string `"YYYY-MM"`, written to and read
//! from the bound input.
//!
//! ```
//! use monthpick::{Config, Page, Registry, TextInput};
//! use ratatui::layout::{Rect, Size};
//! use time::macros::date;
//!
//! let mut page = Page::new(Size::new(120, 40));
//! page.insert_container("when", Rect::new(2, 2, 30, 3));
//! page.insert_input("when-input", TextInput::new());
//! let mut registry = Registry::new(page, date!(2024 - 06 - 15));
//! let id = registry.create("when", "when-input", Config::default());
//! registry.picker_mut(id).unwrap().set_value("2024-03");
//! assert_eq!(registry.picker(id).unwrap().value(), "2024-03");
//! ```

mod config;
mod layout;
mod page;
mod picker;
mod registry;
mod theme;
mod widget;
mod ym;

pub use crate::config::{Config, Hooks, Locale, NoHooks, Theme};
pub use crate::layout::{Hit, PickerLayout};
pub use crate::page::{Container, InputEvent, Message, Page, TextInput};
pub use crate::picker::{CellState, Picker, PickerMut, Refresh, SetValueError};
pub use crate::registry::{PageEvent, PickerId, Registry};
pub use crate::theme::{palette, Palette};
pub use crate::ym::{BoundSpec, MonthRange, ParseYearMonthError, YearMonth};
