use crate::config::Config;
use crate::page::Page;
use crate::picker::{CellState, Picker, PickerMut, PickerState};
use crate::ym::{MonthRange, YearMonth};
use ratatui::layout::{Position, Size};
use time::{Date, Month};

/// Handle to a picker instance.  Slots are never reused within a registry's
/// lifetime, so a handle kept across `destroy()` simply stops resolving.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PickerId(usize);

/// A page-level happening the host forwards to the registry, standing in
/// for the document-level listeners of a browser build: outside clicks,
/// Escape, viewport resizes, and form resets.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PageEvent {
    Click(Position),
    Escape,
    Resize(Size),
    FormReset(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Deferred {
    /// A form reset clears bound pickers on the next tick, not within the
    /// reset notification itself.
    Clear(PickerId),
}

/// Page-wide coordinator: owns the page and every live picker, tracks which
/// instance was opened last, and routes the shared page-level events.
///
/// Invariant, re-checked at every open/close boundary: `currently_open` is
/// either `None` or a live instance whose open flag is set.  With the
/// default `auto_close_other_pickers` every open first closes the rest, so
/// at most one instance is open at a time; opting out of auto-close opts
/// out of that exclusivity, not of the tracking.
#[derive(Debug)]
pub struct Registry {
    page: Page,
    today: Date,
    slots: Vec<Option<PickerState>>,
    currently_open: Option<PickerId>,
    listeners_armed: bool,
    deferred: Vec<Deferred>,
}

impl Registry {
    pub fn new(page: Page, today: Date) -> Registry {
        Registry {
            page,
            today,
            slots: Vec::new(),
            currently_open: None,
            listeners_armed: false,
            deferred: Vec::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn today_ym(&self) -> YearMonth {
        YearMonth::containing(self.today)
    }

    /// Arms the shared page-level listeners.  Idempotent; creating the
    /// first picker arms them automatically.
    pub fn initialize(&mut self) {
        self.listeners_armed = true;
    }

    /// Page-unload teardown: destroys every instance and disarms the
    /// shared listeners.  Leaves the registry reusable for tests.
    pub fn shutdown(&mut self) {
        self.destroy_all();
        self.listeners_armed = false;
    }

    /// Creates a picker bound to the elements at `container_id` and
    /// `input_id`.
    ///
    /// A live instance already holding the same binding key is destroyed
    /// first.  If either element is missing the new instance is inert:
    /// construction is logged as an error and every operation on the
    /// returned id is a no-op.
    pub fn create(&mut self, container_id: &str, input_id: &str, config: Config) -> PickerId {
        if let Some(existing) = self.find(container_id, input_id) {
            log::warn!(
                "monthpick: {container_id:?}/{input_id:?} is already bound, destroying the previous instance"
            );
            PickerMut::new(self, existing).destroy();
        }
        self.initialize();

        let container_gen = self.page.container(container_id).map(|c| c.generation());
        let input_gen = self.page.input(input_id).map(|i| i.generation());
        let inert = container_gen.is_none() || input_gen.is_none();
        if inert {
            log::error!("monthpick: elements {container_id:?}/{input_id:?} not found");
        }

        let range = MonthRange::new(
            config.min_date.as_ref().and_then(|b| b.resolve()),
            config.max_date.as_ref().and_then(|b| b.resolve()),
        );
        let today = self.today_ym();
        let view_year = today.year();
        let mobile = self.page.viewport().width <= config.mobile_width_threshold;
        let initially_disabled = config.disabled;
        let mut state = PickerState {
            container_id: container_id.to_owned(),
            input_id: input_id.to_owned(),
            container_gen: container_gen.unwrap_or_default(),
            input_gen: input_gen.unwrap_or_default(),
            config,
            range,
            selected: None,
            view_year,
            open: false,
            mobile,
            inert,
            grid: [CellState {
                month: Month::January,
                is_today: false,
                is_selected: false,
                is_disabled: false,
            }; 12],
            layout: None,
            display: String::new(),
        };
        state.rebuild_grid(today);
        let id = PickerId(self.slots.len());
        self.slots.push(Some(state));

        // A pre-filled input is applied through the regular value path so
        // that the same validation and notifications fire.
        if !inert {
            let initial = self
                .page
                .input_value(input_id)
                .unwrap_or_default()
                .to_owned();
            if !initial.is_empty() {
                PickerMut::new(self, id).set_value(&initial);
            }
            if initially_disabled {
                PickerMut::new(self, id).disable();
            }
        }
        id
    }

    /// Live instance bound to the given key, if any.
    pub fn find(&self, container_id: &str, input_id: &str) -> Option<PickerId> {
        self.slots.iter().enumerate().find_map(|(i, slot)| {
            slot.as_ref()
                .filter(|s| s.container_id == container_id && s.input_id == input_id)
                .map(|_| PickerId(i))
        })
    }

    pub fn picker(&self, id: PickerId) -> Option<Picker<'_>> {
        self.state(id).map(|_| Picker::new(self, id))
    }

    pub fn picker_mut(&mut self, id: PickerId) -> Option<PickerMut<'_>> {
        if self.state(id).is_some() {
            Some(PickerMut::new(self, id))
        } else {
            None
        }
    }

    pub fn live_ids(&self) -> Vec<PickerId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| PickerId(i)))
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// The single open instance, if any.
    pub fn currently_open(&self) -> Option<PickerId> {
        self.currently_open
    }

    /// Closes every open instance other than `except`.
    pub fn close_others(&mut self, except: PickerId) {
        for id in self.live_ids() {
            if id != except && self.state(id).is_some_and(|s| s.open) {
                PickerMut::new(self, id).close();
            }
        }
    }

    /// Closes every live instance.
    pub fn close_all(&mut self) {
        for id in self.live_ids() {
            PickerMut::new(self, id).close();
        }
    }

    /// Closes and tears down every live instance.
    pub fn destroy_all(&mut self) {
        for id in self.live_ids() {
            PickerMut::new(self, id).destroy();
        }
    }

    /// Routes a page-level event.  Inactive until the listener latch is
    /// armed (which creating any picker does).
    pub fn handle_event(&mut self, event: PageEvent) {
        if !self.listeners_armed {
            return;
        }
        match event {
            PageEvent::Click(pos) => self.handle_click(pos),
            PageEvent::Escape => {
                if let Some(id) = self.currently_open {
                    PickerMut::new(self, id).close();
                }
            }
            PageEvent::Resize(size) => self.handle_resize(size),
            PageEvent::FormReset(form_id) => {
                for id in self.live_ids() {
                    let bound = self
                        .state(id)
                        .map(|s| s.input_id.clone())
                        .and_then(|input_id| self.page.input(&input_id).and_then(|i| i.form_id().map(str::to_owned)));
                    if bound.as_deref() == Some(form_id.as_str()) {
                        self.deferred.push(Deferred::Clear(id));
                    }
                }
            }
        }
    }

    /// Runs actions deferred by earlier events (form-reset clears).
    pub fn tick(&mut self) {
        for action in std::mem::take(&mut self.deferred) {
            match action {
                Deferred::Clear(id) => {
                    if let Some(mut picker) = self.picker_mut(id) {
                        picker.clear();
                    }
                }
            }
        }
    }

    fn handle_click(&mut self, pos: Position) {
        // Controls of the open popover sit on top of everything else.
        if let Some(open_id) = self.currently_open {
            if let Some(hit) = self
                .state(open_id)
                .and_then(|s| s.layout)
                .and_then(|layout| layout.hit(pos))
            {
                let mut picker = PickerMut::new(self, open_id);
                match hit {
                    crate::layout::Hit::PrevYear => picker.prev_year(),
                    crate::layout::Hit::NextYear => picker.next_year(),
                    crate::layout::Hit::Cell(month) => picker.select_month(month),
                    crate::layout::Hit::Today => picker.select_today(),
                    crate::layout::Hit::Clear => picker.clear(),
                    crate::layout::Hit::Inside => {}
                }
                return;
            }
        }
        // A raised backdrop sits over every other header, so a click that
        // misses the popover can only dismiss the overlay picker owning it.
        if let Some(owner) = self.page.backdrop().map(str::to_owned) {
            let owning = self.live_ids().into_iter().find(|&id| {
                self.state(id)
                    .is_some_and(|s| s.open && s.container_id == owner)
            });
            if let Some(id) = owning {
                PickerMut::new(self, id).close();
            }
            return;
        }
        // Header activation toggles the picker under the click.
        for id in self.live_ids() {
            let on_header = self
                .state(id)
                .and_then(|s| self.page.container(&s.container_id))
                .is_some_and(|c| c.area().contains(pos));
            if on_header {
                let mut picker = PickerMut::new(self, id);
                if picker.is_open() {
                    picker.close();
                } else {
                    picker.open();
                }
                return;
            }
        }
        // Anywhere else: outside click, honoured per configuration.
        if let Some(open_id) = self.currently_open {
            if self
                .state(open_id)
                .is_some_and(|s| s.config.close_on_click_outside)
            {
                PickerMut::new(self, open_id).close();
            }
        }
    }

    /// Viewport resize: recompute the open picker's mobile flag and
    /// reposition its popover.
    fn handle_resize(&mut self, size: Size) {
        self.page.set_viewport(size);
        let Some(open_id) = self.currently_open else {
            return;
        };
        let Some(state) = self.state(open_id) else {
            return;
        };
        let mobile = size.width <= state.config.mobile_width_threshold;
        let overlay = mobile && state.config.mobile_overlay;
        let anchor = self
            .page
            .container(&state.container_id)
            .map(|c| c.area())
            .unwrap_or_default();
        let Some(state) = self.state_mut(open_id) else {
            return;
        };
        state.mobile = mobile;
        state.layout = Some(crate::layout::PickerLayout::compute(
            &state.config,
            anchor,
            size,
            overlay,
        ));
    }

    pub(crate) fn state(&self, id: PickerId) -> Option<&PickerState> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn state_mut(&mut self, id: PickerId) -> Option<&mut PickerState> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// After a backdrop is dropped, re-raises it for any picker still open
    /// in overlay mode.  The page holds a single backdrop slot, so with
    /// auto-close opted out a second overlay open takes the slot over and
    /// the close path hands it back here.
    pub(crate) fn reraise_backdrop(&mut self) {
        if self.page.backdrop().is_some() {
            return;
        }
        let owner = self
            .slots
            .iter()
            .flatten()
            .find(|s| s.open && s.mobile && s.config.mobile_overlay)
            .map(|s| s.container_id.clone());
        if let Some(owner) = owner {
            self.page.raise_backdrop(&owner);
        }
    }

    pub(crate) fn set_currently_open(&mut self, id: Option<PickerId>) {
        self.currently_open = id;
    }

    /// Clears the open slot if it points at `id`.
    pub(crate) fn release_currently_open(&mut self, id: PickerId) {
        if self.currently_open == Some(id) {
            self.currently_open = None;
        }
    }

    /// Vacates a slot.  The index is never handed out again.
    pub(crate) fn vacate(&mut self, id: PickerId) {
        self.release_currently_open(id);
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = None;
        }
    }

    pub(crate) fn check_open_invariant(&self) {
        debug_assert!(
            self.currently_open
                .is_none_or(|id| self.state(id).is_some_and(|s| s.open)),
            "currently_open must reference a live, open instance"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Hooks;
    use crate::page::{InputEvent, TextInput};
    use crate::picker::{Refresh, SetValueError};
    use crate::ym::ParseYearMonthError;
    use ratatui::layout::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::date;

    fn page() -> Page {
        let mut page = Page::new(Size::new(120, 40));
        page.insert_container("c1", Rect::new(2, 1, 30, 3));
        page.insert_input("m1", TextInput::new());
        page.insert_container("c2", Rect::new(40, 1, 30, 3));
        page.insert_input("m2", TextInput::new());
        page
    }

    fn registry() -> Registry {
        Registry::new(page(), date!(2024 - 06 - 15))
    }

    /// Default configuration evaluated against a terminal-sized viewport
    /// counts as mobile; tests of the anchored path lower the threshold.
    fn anchored() -> Config {
        Config {
            mobile_width_threshold: 40,
            ..Config::default()
        }
    }

    #[derive(Clone, Debug, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Recorder {
        fn log(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    impl Hooks for Recorder {
        fn on_change(&mut self, value: &str, date: Option<Date>) {
            self.0
                .borrow_mut()
                .push(format!("change:{value}:{}", date.is_some()));
        }

        fn on_open(&mut self) {
            self.0.borrow_mut().push(String::from("open"));
        }

        fn on_close(&mut self) {
            self.0.borrow_mut().push(String::from("close"));
        }
    }

    #[test]
    fn test_set_value_round_trip() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().set_value("2024-03");
        assert_eq!(registry.picker(id).unwrap().value(), "2024-03");
        assert_eq!(
            registry.picker(id).unwrap().year_month(),
            Some(YearMonth::new(2024, Month::March))
        );
        assert_eq!(
            registry.picker(id).unwrap().date(),
            Some(date!(2024 - 03 - 01))
        );
    }

    #[test]
    fn test_set_value_rejects_bad_format() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().set_value("2024-03");
        let err = registry
            .picker_mut(id)
            .unwrap()
            .try_set_value("March 2024")
            .unwrap_err();
        assert_eq!(err, SetValueError::Parse(ParseYearMonthError::BadFormat));
        // A rejected value leaves prior state intact.
        assert_eq!(registry.picker(id).unwrap().value(), "2024-03");
    }

    #[test]
    fn test_set_value_rejects_month_out_of_range() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        let err = registry
            .picker_mut(id)
            .unwrap()
            .try_set_value("2024-13")
            .unwrap_err();
        assert_eq!(
            err,
            SetValueError::Parse(ParseYearMonthError::MonthOutOfRange(13))
        );
        assert_eq!(registry.picker(id).unwrap().year_month(), None);
    }

    #[test]
    fn test_bounded_range_scenario() {
        let mut registry = registry();
        let config = Config {
            min_date: Some("2024-03".into()),
            max_date: Some("2024-06".into()),
            ..Config::default()
        };
        let id = registry.create("c1", "m1", config);
        let err = registry
            .picker_mut(id)
            .unwrap()
            .try_set_value("2024-02")
            .unwrap_err();
        assert_eq!(
            err,
            SetValueError::OutOfRange(YearMonth::new(2024, Month::February))
        );
        assert_eq!(registry.picker(id).unwrap().value(), "");
        registry.picker_mut(id).unwrap().set_value("2024-03");
        assert_eq!(registry.picker(id).unwrap().value(), "2024-03");
    }

    #[test]
    fn test_clear() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().set_value("2024-03");
        registry.page_mut().take_events("m1");
        registry.picker_mut(id).unwrap().clear();
        let picker = registry.picker(id).unwrap();
        assert_eq!(picker.value(), "");
        assert_eq!(picker.year_month(), None);
        assert_eq!(picker.display_value(), "");
        assert_eq!(
            registry.page_mut().take_events("m1"),
            vec![InputEvent::Change, InputEvent::Edit]
        );
    }

    #[test]
    fn test_select_month_updates_input_and_closes() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().open();
        registry.picker_mut(id).unwrap().select_month(Month::March);
        let picker = registry.picker(id).unwrap();
        assert!(!picker.is_open());
        assert_eq!(picker.value(), "2024-03");
        assert_eq!(picker.display_value(), "Marzo de 2024");
        assert_eq!(
            registry.page_mut().take_events("m1"),
            vec![InputEvent::Change, InputEvent::Edit]
        );
        assert_eq!(registry.currently_open(), None);
    }

    #[test]
    fn test_select_disabled_month_is_silent_noop() {
        let mut registry = registry();
        let config = Config {
            min_date: Some("2024-03".into()),
            ..Config::default()
        };
        let id = registry.create("c1", "m1", config);
        registry.picker_mut(id).unwrap().open();
        registry.picker_mut(id).unwrap().select_month(Month::January);
        let picker = registry.picker(id).unwrap();
        assert_eq!(picker.year_month(), None);
        assert_eq!(picker.value(), "");
        // An interactive rejection does not even close the popover.
        assert!(picker.is_open());
    }

    #[test]
    fn test_select_today() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().select_today();
        assert_eq!(
            registry.picker(id).unwrap().year_month(),
            Some(YearMonth::new(2024, Month::June))
        );
        assert_eq!(registry.picker(id).unwrap().value(), "2024-06");
    }

    #[test]
    fn test_select_today_out_of_range_is_noop() {
        let mut registry = registry();
        let config = Config {
            max_date: Some("2023-12".into()),
            ..Config::default()
        };
        let id = registry.create("c1", "m1", config);
        registry.picker_mut(id).unwrap().select_today();
        assert_eq!(registry.picker(id).unwrap().year_month(), None);
    }

    #[test]
    fn test_set_value_keeps_popover_open() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().open();
        registry.picker_mut(id).unwrap().set_value("2024-03");
        assert!(registry.picker(id).unwrap().is_open());
    }

    #[test]
    fn test_open_is_exclusive_with_auto_close() {
        let mut registry = registry();
        let a = registry.create("c1", "m1", Config::default());
        let b = registry.create("c2", "m2", Config::default());
        registry.picker_mut(a).unwrap().open();
        assert_eq!(registry.currently_open(), Some(a));
        registry.picker_mut(b).unwrap().open();
        assert!(!registry.picker(a).unwrap().is_open());
        assert!(registry.picker(b).unwrap().is_open());
        assert_eq!(registry.currently_open(), Some(b));
        let open = registry
            .live_ids()
            .into_iter()
            .filter(|&id| registry.picker(id).is_some_and(|p| p.is_open()))
            .count();
        assert_eq!(open, 1);
    }

    #[test]
    fn test_auto_close_opt_out_leaves_both_open() {
        let mut registry = registry();
        let config = || Config {
            auto_close_other_pickers: false,
            ..Config::default()
        };
        let a = registry.create("c1", "m1", config());
        let b = registry.create("c2", "m2", config());
        registry.picker_mut(a).unwrap().open();
        registry.picker_mut(b).unwrap().open();
        assert!(registry.picker(a).unwrap().is_open());
        assert!(registry.picker(b).unwrap().is_open());
        assert_eq!(registry.currently_open(), Some(b));
    }

    #[test]
    fn test_escape_closes_open_picker() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().open();
        registry.handle_event(PageEvent::Escape);
        assert!(!registry.picker(id).unwrap().is_open());
    }

    #[test]
    fn test_outside_click_closes_anchored_picker() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", anchored());
        registry.picker_mut(id).unwrap().open();
        assert!(!registry.picker(id).unwrap().layout().unwrap().is_overlay());
        registry.handle_event(PageEvent::Click(Position::new(119, 39)));
        assert!(!registry.picker(id).unwrap().is_open());
    }

    #[test]
    fn test_outside_click_respects_opt_out() {
        let mut registry = registry();
        let config = Config {
            close_on_click_outside: false,
            ..anchored()
        };
        let id = registry.create("c1", "m1", config);
        registry.picker_mut(id).unwrap().open();
        registry.handle_event(PageEvent::Click(Position::new(119, 39)));
        assert!(registry.picker(id).unwrap().is_open());
    }

    #[test]
    fn test_backdrop_click_closes_unconditionally() {
        let mut registry = registry();
        // Default threshold makes a 120-column viewport a mobile one.
        let config = Config {
            close_on_click_outside: false,
            ..Config::default()
        };
        let id = registry.create("c1", "m1", config);
        registry.picker_mut(id).unwrap().open();
        assert_eq!(registry.page().backdrop(), Some("c1"));
        assert!(registry.page().is_scroll_locked());
        registry.handle_event(PageEvent::Click(Position::new(119, 39)));
        assert!(!registry.picker(id).unwrap().is_open());
        assert_eq!(registry.page().backdrop(), None);
        assert!(!registry.page().is_scroll_locked());
    }

    #[test]
    fn test_header_click_toggles() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.handle_event(PageEvent::Click(Position::new(3, 2)));
        assert!(registry.picker(id).unwrap().is_open());
        registry.handle_event(PageEvent::Click(Position::new(3, 2)));
        assert!(!registry.picker(id).unwrap().is_open());
    }

    #[test]
    fn test_clicking_other_header_switches_pickers() {
        let mut registry = registry();
        let a = registry.create("c1", "m1", anchored());
        let b = registry.create("c2", "m2", anchored());
        registry.picker_mut(a).unwrap().open();
        registry.handle_event(PageEvent::Click(Position::new(41, 2)));
        assert!(!registry.picker(a).unwrap().is_open());
        assert!(registry.picker(b).unwrap().is_open());
    }

    #[test]
    fn test_backdrop_absorbs_other_header_click() {
        let mut registry = registry();
        let a = registry.create("c1", "m1", Config::default());
        let b = registry.create("c2", "m2", Config::default());
        registry.picker_mut(a).unwrap().open();
        assert!(registry.page().backdrop().is_some());
        // The other header sits under the overlay, so the click dismisses
        // instead of switching.
        registry.handle_event(PageEvent::Click(Position::new(41, 2)));
        assert!(!registry.picker(a).unwrap().is_open());
        assert!(!registry.picker(b).unwrap().is_open());
    }

    #[test]
    fn test_backdrop_survives_closing_one_of_two_overlays() {
        let mut registry = registry();
        let config = || Config {
            auto_close_other_pickers: false,
            ..Config::default()
        };
        let a = registry.create("c1", "m1", config());
        let b = registry.create("c2", "m2", config());
        registry.picker_mut(a).unwrap().open();
        registry.picker_mut(b).unwrap().open();
        assert_eq!(registry.page().backdrop(), Some("c2"));
        registry.picker_mut(b).unwrap().close();
        // The remaining overlay picker keeps the page dimmed and locked.
        assert_eq!(registry.page().backdrop(), Some("c1"));
        assert!(registry.page().is_scroll_locked());
        registry.picker_mut(a).unwrap().close();
        assert_eq!(registry.page().backdrop(), None);
        assert!(!registry.page().is_scroll_locked());
    }

    #[test]
    fn test_close_all_closes_opted_out_pickers() {
        let mut registry = registry();
        let config = || Config {
            auto_close_other_pickers: false,
            ..anchored()
        };
        let a = registry.create("c1", "m1", config());
        let b = registry.create("c2", "m2", config());
        registry.picker_mut(a).unwrap().open();
        registry.picker_mut(b).unwrap().open();
        registry.close_all();
        assert!(!registry.picker(a).unwrap().is_open());
        assert!(!registry.picker(b).unwrap().is_open());
        assert_eq!(registry.currently_open(), None);
    }

    #[test]
    fn test_click_month_cell_selects() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().open();
        let cell = registry.picker(id).unwrap().layout().unwrap().cell(Month::June);
        registry.handle_event(PageEvent::Click(Position::new(cell.x, cell.y)));
        assert_eq!(registry.picker(id).unwrap().value(), "2024-06");
        assert!(!registry.picker(id).unwrap().is_open());
    }

    #[test]
    fn test_year_navigation_clamps() {
        let mut registry = registry();
        let config = Config {
            min_year: 2023,
            max_year: 2025,
            ..Config::default()
        };
        let id = registry.create("c1", "m1", config);
        let mut picker = registry.picker_mut(id).unwrap();
        picker.prev_year();
        picker.prev_year();
        picker.prev_year();
        assert_eq!(registry.picker(id).unwrap().view_year(), 2023);
        let mut picker = registry.picker_mut(id).unwrap();
        picker.next_year();
        picker.next_year();
        picker.next_year();
        picker.next_year();
        assert_eq!(registry.picker(id).unwrap().view_year(), 2025);
    }

    #[test]
    fn test_open_resets_view_year_to_selection() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().set_value("2022-05");
        let mut picker = registry.picker_mut(id).unwrap();
        picker.open();
        picker.next_year();
        picker.close();
        picker.open();
        assert_eq!(registry.picker(id).unwrap().view_year(), 2022);
    }

    #[test]
    fn test_open_without_selection_shows_current_year() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        let mut picker = registry.picker_mut(id).unwrap();
        picker.open();
        picker.prev_year();
        picker.close();
        picker.open();
        assert_eq!(registry.picker(id).unwrap().view_year(), 2024);
    }

    #[test]
    fn test_disable_forces_close_enable_does_not_reopen() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().open();
        registry.picker_mut(id).unwrap().disable();
        assert!(!registry.picker(id).unwrap().is_open());
        assert!(registry.page().input("m1").unwrap().is_disabled());
        // A disabled picker refuses to open.
        registry.picker_mut(id).unwrap().open();
        assert!(!registry.picker(id).unwrap().is_open());
        registry.picker_mut(id).unwrap().enable();
        assert!(!registry.picker(id).unwrap().is_open());
        assert!(!registry.page().input("m1").unwrap().is_disabled());
    }

    #[test]
    fn test_duplicate_binding_replaces_previous_instance() {
        let mut registry = registry();
        let first = registry.create("c1", "m1", Config::default());
        let second = registry.create("c1", "m1", Config::default());
        assert!(registry.picker(first).is_none());
        assert!(registry.picker(second).is_some());
        assert_eq!(registry.picker_mut(second).unwrap().id(), second);
        assert_eq!(registry.find("c1", "m1"), Some(second));
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn test_missing_elements_make_inert_instance() {
        let mut registry = registry();
        let id = registry.create("c1", "nope", Config::default());
        assert!(registry.picker(id).unwrap().is_inert());
        let mut picker = registry.picker_mut(id).unwrap();
        picker.open();
        picker.set_value("2024-03");
        picker.select_month(Month::March);
        let picker = registry.picker(id).unwrap();
        assert!(!picker.is_open());
        assert_eq!(picker.year_month(), None);
    }

    #[test]
    fn test_prefilled_input_is_applied_and_canonicalized() {
        let mut registry = registry();
        registry
            .page_mut()
            .insert_input("m1", TextInput::new().value("2024-03-15"));
        let id = registry.create("c1", "m1", Config::default());
        let picker = registry.picker(id).unwrap();
        assert_eq!(picker.year_month(), Some(YearMonth::new(2024, Month::March)));
        assert_eq!(picker.value(), "2024-03");
    }

    #[test]
    fn test_prefilled_garbage_is_left_alone() {
        let mut registry = registry();
        registry
            .page_mut()
            .insert_input("m1", TextInput::new().value("next spring"));
        let id = registry.create("c1", "m1", Config::default());
        assert_eq!(registry.picker(id).unwrap().year_month(), None);
        assert_eq!(registry.page().input_value("m1"), Some("next spring"));
    }

    #[test]
    fn test_form_reset_clears_on_tick() {
        let mut registry = registry();
        registry
            .page_mut()
            .insert_input("m1", TextInput::new().form("f1"));
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().set_value("2024-03");
        registry.handle_event(PageEvent::FormReset(String::from("f1")));
        // The clear is deferred to the next tick.
        assert_eq!(registry.picker(id).unwrap().value(), "2024-03");
        registry.tick();
        assert_eq!(registry.picker(id).unwrap().value(), "");
        assert_eq!(registry.picker(id).unwrap().year_month(), None);
    }

    #[test]
    fn test_form_reset_ignores_other_forms() {
        let mut registry = registry();
        registry
            .page_mut()
            .insert_input("m1", TextInput::new().form("f1"));
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().set_value("2024-03");
        registry.handle_event(PageEvent::FormReset(String::from("other")));
        registry.tick();
        assert_eq!(registry.picker(id).unwrap().value(), "2024-03");
    }

    #[test]
    fn test_destroy_vacates_slot() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().open();
        registry.picker_mut(id).unwrap().destroy();
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.currently_open(), None);
        assert!(registry.picker(id).is_none());
        assert!(registry.picker_mut(id).is_none());
    }

    #[test]
    fn test_destroy_all_and_shutdown() {
        let mut registry = registry();
        let a = registry.create("c1", "m1", Config::default());
        registry.create("c2", "m2", Config::default());
        registry.picker_mut(a).unwrap().open();
        registry.shutdown();
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.currently_open(), None);
        assert_eq!(registry.page().backdrop(), None);
        // The listener latch is disarmed until another picker is created.
        registry.handle_event(PageEvent::Resize(Size::new(50, 20)));
        assert_eq!(registry.page().viewport(), Size::new(120, 40));
    }

    #[test]
    fn test_refresh_outcomes() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().set_value("2024-03");
        let outcome = registry.picker_mut(id).unwrap().refresh();
        assert_eq!(outcome, Refresh::Unchanged);
        assert!(outcome.is_usable());

        // Swapping the input under the same id re-binds and re-applies the
        // selection to the fresh element.
        registry.page_mut().insert_input("m1", TextInput::new());
        assert_eq!(
            registry.picker_mut(id).unwrap().refresh(),
            Refresh::Reinitialized
        );
        assert_eq!(registry.page().input_value("m1"), Some("2024-03"));
        assert_eq!(
            registry.picker(id).unwrap().year_month(),
            Some(YearMonth::new(2024, Month::March))
        );

        registry.page_mut().remove_input("m1");
        let outcome = registry.picker_mut(id).unwrap().refresh();
        assert_eq!(outcome, Refresh::NotUsable);
        assert!(!outcome.is_usable());
        assert!(registry.picker(id).is_none());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_resize_switches_anchored_popover_to_overlay() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", anchored());
        registry.picker_mut(id).unwrap().open();
        assert!(!registry.picker(id).unwrap().layout().unwrap().is_overlay());
        registry.handle_event(PageEvent::Resize(Size::new(39, 40)));
        assert!(registry.picker(id).unwrap().layout().unwrap().is_overlay());
        assert_eq!(registry.page().viewport(), Size::new(39, 40));
    }

    #[test]
    fn test_hook_ordering_on_interactive_selection() {
        let recorder = Recorder::default();
        let mut registry = registry();
        let config = Config {
            hooks: Box::new(recorder.clone()),
            ..Config::default()
        };
        let id = registry.create("c1", "m1", config);
        registry.picker_mut(id).unwrap().open();
        registry.picker_mut(id).unwrap().select_month(Month::March);
        assert_eq!(
            recorder.log(),
            vec!["open", "change:2024-03:true", "close"]
        );
    }

    #[test]
    fn test_clear_hook_payload() {
        let recorder = Recorder::default();
        let mut registry = registry();
        let config = Config {
            hooks: Box::new(recorder.clone()),
            ..Config::default()
        };
        let id = registry.create("c1", "m1", config);
        registry.picker_mut(id).unwrap().set_value("2024-03");
        registry.picker_mut(id).unwrap().clear();
        assert_eq!(recorder.log(), vec!["change:2024-03:true", "change::false"]);
    }

    #[test]
    fn test_is_valid_tracks_required_input() {
        let mut registry = registry();
        registry
            .page_mut()
            .insert_input("m1", TextInput::new().required(true));
        let id = registry.create("c1", "m1", Config::default());
        assert!(!registry.picker(id).unwrap().is_valid());
        registry.picker_mut(id).unwrap().set_value("2024-03");
        assert!(registry.picker(id).unwrap().is_valid());
    }

    #[test]
    fn test_error_display() {
        let mut registry = registry();
        let id = registry.create("c1", "m1", Config::default());
        registry.picker_mut(id).unwrap().show_error("Campo requerido");
        let container = registry.page().container("c1").unwrap();
        assert!(container.has_error());
        assert_eq!(container.message().unwrap().text(), "Campo requerido");
        assert!(container.message().unwrap().is_visible());
        registry.picker_mut(id).unwrap().hide_error();
        let container = registry.page().container("c1").unwrap();
        assert!(!container.has_error());
        assert!(!container.message().unwrap().is_visible());
    }
}
