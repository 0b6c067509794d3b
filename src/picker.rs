use crate::config::Config;
use crate::layout::PickerLayout;
use crate::registry::{PickerId, Registry};
use crate::ym::{MonthRange, ParseYearMonthError, YearMonth};
use thiserror::Error;
use time::{Date, Month};

/// Why a programmatic `set_value` was rejected.  Every rejection leaves the
/// picker, its input, and the page untouched.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SetValueError {
    #[error(transparent)]
    Parse(#[from] ParseYearMonthError),
    #[error("{0} is outside the allowed range")]
    OutOfRange(YearMonth),
}

/// Outcome of [`PickerMut::refresh`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Refresh {
    /// The bound elements are the ones we already knew.
    Unchanged,
    /// The host swapped the elements under the same ids; the picker rebound
    /// and rebuilt itself.
    Reinitialized,
    /// The elements are gone; the picker destroyed itself.
    NotUsable,
}

impl Refresh {
    pub fn is_usable(&self) -> bool {
        !matches!(self, Refresh::NotUsable)
    }
}

/// Derived per-month grid flags, rebuilt whenever the view changes.  The
/// renderer reads these; the state machine writes them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CellState {
    pub month: Month,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
}

/// Internal state of one picker instance.
#[derive(Debug)]
pub(crate) struct PickerState {
    pub(crate) container_id: String,
    pub(crate) input_id: String,
    pub(crate) container_gen: u64,
    pub(crate) input_gen: u64,
    pub(crate) config: Config,
    pub(crate) range: MonthRange,
    pub(crate) selected: Option<YearMonth>,
    pub(crate) view_year: i32,
    pub(crate) open: bool,
    pub(crate) mobile: bool,
    /// Construction found no elements to bind to; every operation no-ops.
    pub(crate) inert: bool,
    pub(crate) grid: [CellState; 12],
    pub(crate) layout: Option<PickerLayout>,
    pub(crate) display: String,
}

impl PickerState {
    pub(crate) fn rebuild_grid(&mut self, today: YearMonth) {
        for (i, cell) in self.grid.iter_mut().enumerate() {
            let month = Month::January.nth_next(u8::try_from(i).unwrap_or(0));
            let ym = YearMonth::new(self.view_year, month);
            *cell = CellState {
                month,
                is_today: ym == today,
                is_selected: self.selected == Some(ym),
                is_disabled: self.range.disallows(ym),
            };
        }
    }

    pub(crate) fn refresh_display(&mut self) {
        self.display = match self.selected {
            Some(ym) => self.config.locale.display(ym.month(), ym.year()),
            None => String::new(),
        };
    }
}

/// Read-only view of a picker instance.
#[derive(Clone, Copy, Debug)]
pub struct Picker<'a> {
    registry: &'a Registry,
    id: PickerId,
}

impl<'a> Picker<'a> {
    pub(crate) fn new(registry: &'a Registry, id: PickerId) -> Picker<'a> {
        Picker { registry, id }
    }

    fn state(&self) -> &'a PickerState {
        self.registry
            .state(self.id)
            .unwrap_or_else(|| unreachable!("Picker only built for live ids"))
    }

    /// The `"YYYY-MM"` interchange string currently held by the bound input
    /// (empty when unselected or unbound).
    pub fn value(&self) -> String {
        self.registry
            .page()
            .input_value(&self.state().input_id)
            .unwrap_or_default()
            .to_owned()
    }

    /// Locale-formatted selection, e.g. `"Marzo de 2024"`; empty when
    /// nothing is selected.
    pub fn display_value(&self) -> &'a str {
        &self.state().display
    }

    /// First day of the selected month.
    pub fn date(&self) -> Option<Date> {
        self.state().selected.map(|ym| ym.first_day())
    }

    pub fn year_month(&self) -> Option<YearMonth> {
        self.state().selected
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    pub fn is_disabled(&self) -> bool {
        self.state().config.disabled
    }

    pub fn is_inert(&self) -> bool {
        self.state().inert
    }

    /// The year currently shown in the grid, independent of the selection.
    pub fn view_year(&self) -> i32 {
        self.state().view_year
    }

    pub fn grid(&self) -> &'a [CellState; 12] {
        &self.state().grid
    }

    /// Geometry of the open popover; `None` while closed.
    pub fn layout(&self) -> Option<&'a PickerLayout> {
        self.state().layout.as_ref()
    }

    pub fn config(&self) -> &'a Config {
        &self.state().config
    }

    pub fn container_id(&self) -> &'a str {
        &self.state().container_id
    }

    pub fn input_id(&self) -> &'a str {
        &self.state().input_id
    }

    /// True iff the bound input has a value and passes its constraint
    /// validation.
    pub fn is_valid(&self) -> bool {
        self.registry
            .page()
            .input(&self.state().input_id)
            .is_some_and(|input| !input.get_value().is_empty() && input.check_validity())
    }
}

/// Mutable handle to a picker instance: the public operation surface.
///
/// The handle borrows the registry exclusively, so a hook invoked from any
/// operation can never re-enter the widget system mid-transition.
#[derive(Debug)]
pub struct PickerMut<'a> {
    registry: &'a mut Registry,
    id: PickerId,
}

impl<'a> PickerMut<'a> {
    pub(crate) fn new(registry: &'a mut Registry, id: PickerId) -> PickerMut<'a> {
        PickerMut { registry, id }
    }

    pub fn id(&self) -> PickerId {
        self.id
    }

    pub fn as_picker(&self) -> Picker<'_> {
        Picker::new(self.registry, self.id)
    }

    pub fn value(&self) -> String {
        self.as_picker().value()
    }

    pub fn display_value(&self) -> String {
        self.as_picker().display_value().to_owned()
    }

    pub fn date(&self) -> Option<Date> {
        self.as_picker().date()
    }

    pub fn year_month(&self) -> Option<YearMonth> {
        self.as_picker().year_month()
    }

    pub fn is_open(&self) -> bool {
        self.as_picker().is_open()
    }

    pub fn is_valid(&self) -> bool {
        self.as_picker().is_valid()
    }

    fn state(&self) -> &PickerState {
        self.registry
            .state(self.id)
            .unwrap_or_else(|| unreachable!("PickerMut only built for live ids"))
    }

    fn state_mut(&mut self) -> &mut PickerState {
        self.registry
            .state_mut(self.id)
            .unwrap_or_else(|| unreachable!("PickerMut only built for live ids"))
    }

    /// Opens the popover.  No-op when already open, disabled, or inert.
    pub fn open(&mut self) {
        {
            let state = self.state();
            if state.open || state.config.disabled || state.inert {
                return;
            }
            if state.config.auto_close_other_pickers {
                self.registry.close_others(self.id);
            }
        }
        let viewport = self.registry.page().viewport();
        let today = self.registry.today_ym();
        let state = self.state_mut();
        state.open = true;
        state.view_year = state.selected.map_or(today.year(), |ym| ym.year());
        state.mobile = viewport.width <= state.config.mobile_width_threshold;
        state.rebuild_grid(today);
        let overlay = state.mobile && state.config.mobile_overlay;
        let container_id = state.container_id.clone();
        self.registry.set_currently_open(Some(self.id));
        if overlay {
            self.registry.page_mut().raise_backdrop(&container_id);
        }
        let anchor = self
            .registry
            .page()
            .container(&container_id)
            .map(|c| c.area())
            .unwrap_or_default();
        let state = self.state_mut();
        state.layout = Some(PickerLayout::compute(&state.config, anchor, viewport, overlay));
        log::debug!("monthpick: opened picker bound to {container_id:?}");
        state.config.hooks.on_open();
        self.registry.check_open_invariant();
    }

    /// Closes the popover.  No-op when already closed.
    pub fn close(&mut self) {
        if !self.state().open {
            return;
        }
        let state = self.state_mut();
        state.open = false;
        state.layout = None;
        let container_id = state.container_id.clone();
        self.registry.release_currently_open(self.id);
        self.registry.page_mut().drop_backdrop(&container_id);
        self.registry.reraise_backdrop();
        log::debug!("monthpick: closed picker bound to {container_id:?}");
        self.state_mut().config.hooks.on_close();
        self.registry.check_open_invariant();
    }

    /// Selects `(view_year, month)`.  A month outside the configured range
    /// is silently ignored.  Selecting closes the popover.
    pub fn select_month(&mut self, month: Month) {
        if self.state().inert {
            return;
        }
        let today = self.registry.today_ym();
        let state = self.state_mut();
        let ym = YearMonth::new(state.view_year, month);
        if state.range.disallows(ym) {
            return;
        }
        state.selected = Some(ym);
        state.refresh_display();
        state.rebuild_grid(today);
        let input_id = state.input_id.clone();
        let value = ym.to_string();
        if let Some(input) = self.registry.page_mut().input_mut(&input_id) {
            input.write_value(&value);
            input.notify();
        }
        self.state_mut()
            .config
            .hooks
            .on_change(&value, Some(ym.first_day()));
        self.close();
    }

    /// Jumps the view to the current month and selects it; no-op when today
    /// is outside the configured range.
    pub fn select_today(&mut self) {
        if self.state().inert {
            return;
        }
        let today = self.registry.today_ym();
        let state = self.state_mut();
        if state.range.disallows(today) {
            return;
        }
        state.view_year = today.year();
        self.select_month(today.month());
    }

    /// Drops the selection and empties the bound input.
    pub fn clear(&mut self) {
        if self.state().inert {
            return;
        }
        let today = self.registry.today_ym();
        let state = self.state_mut();
        state.selected = None;
        state.refresh_display();
        state.rebuild_grid(today);
        let input_id = state.input_id.clone();
        let container_id = state.container_id.clone();
        if let Some(input) = self.registry.page_mut().input_mut(&input_id) {
            input.write_value("");
            input.notify();
        }
        if let Some(container) = self.registry.page_mut().container_mut(&container_id) {
            container.set_error(false);
        }
        self.state_mut().config.hooks.on_change("", None);
    }

    /// Programmatic setter for the `"YYYY-MM"` interchange string.  An empty
    /// value clears; a rejected value is logged and changes nothing.  Unlike
    /// `select_month`, this never closes an open popover.
    pub fn set_value(&mut self, value: &str) -> &mut Self {
        if let Err(e) = self.try_set_value(value) {
            log::error!("monthpick: rejected value {value:?}: {e}");
        }
        self
    }

    /// Like [`set_value`](Self::set_value) but reporting why a value was
    /// rejected instead of logging.
    pub fn try_set_value(&mut self, value: &str) -> Result<(), SetValueError> {
        if self.state().inert {
            return Ok(());
        }
        if value.is_empty() {
            self.clear();
            return Ok(());
        }
        let ym = YearMonth::parse_prefix(value)?;
        let today = self.registry.today_ym();
        let state = self.state_mut();
        if state.range.disallows(ym) {
            return Err(SetValueError::OutOfRange(ym));
        }
        state.selected = Some(ym);
        state.view_year = ym.year();
        state.refresh_display();
        state.rebuild_grid(today);
        let input_id = state.input_id.clone();
        let canonical = ym.to_string();
        if let Some(input) = self.registry.page_mut().input_mut(&input_id) {
            input.write_value(&canonical);
        }
        self.state_mut()
            .config
            .hooks
            .on_change(&canonical, Some(ym.first_day()));
        Ok(())
    }

    /// Shows the previous year in the grid, clamped at the configured
    /// minimum.
    pub fn prev_year(&mut self) {
        if self.state().inert {
            return;
        }
        let today = self.registry.today_ym();
        let state = self.state_mut();
        if state.view_year > state.config.min_year {
            state.view_year -= 1;
            state.rebuild_grid(today);
        }
    }

    /// Shows the next year in the grid, clamped at the configured maximum.
    pub fn next_year(&mut self) {
        if self.state().inert {
            return;
        }
        let today = self.registry.today_ym();
        let state = self.state_mut();
        if state.view_year < state.config.max_year {
            state.view_year += 1;
            state.rebuild_grid(today);
        }
    }

    /// Disables the picker and its input, forcing the popover closed.
    pub fn disable(&mut self) {
        if self.state().inert {
            return;
        }
        let state = self.state_mut();
        state.config.disabled = true;
        let input_id = state.input_id.clone();
        if let Some(input) = self.registry.page_mut().input_mut(&input_id) {
            input.set_disabled(true);
        }
        self.close();
    }

    /// Re-enables a disabled picker.  Does not reopen it.
    pub fn enable(&mut self) {
        if self.state().inert {
            return;
        }
        let state = self.state_mut();
        state.config.disabled = false;
        let input_id = state.input_id.clone();
        if let Some(input) = self.registry.page_mut().input_mut(&input_id) {
            input.set_disabled(false);
        }
    }

    /// Flags the container as erroneous and shows `message` next to it,
    /// creating the message element on first use.
    pub fn show_error(&mut self, message: &str) {
        if self.state().inert {
            return;
        }
        let container_id = self.state().container_id.clone();
        if let Some(container) = self.registry.page_mut().container_mut(&container_id) {
            container.set_error(true);
            container.show_message(message);
        }
    }

    pub fn hide_error(&mut self) {
        if self.state().inert {
            return;
        }
        let container_id = self.state().container_id.clone();
        if let Some(container) = self.registry.page_mut().container_mut(&container_id) {
            container.set_error(false);
            container.hide_message();
        }
    }

    /// Tears the instance down: closes, releases the registry slot, and
    /// clears the container's error state.  The id goes stale; operations
    /// through a stale id degrade to no-ops.
    pub fn destroy(mut self) {
        self.close();
        let container_id = self.state().container_id.clone();
        if let Some(container) = self.registry.page_mut().container_mut(&container_id) {
            container.set_error(false);
        }
        self.registry.vacate(self.id);
        log::debug!("monthpick: destroyed picker bound to {container_id:?}");
    }

    /// Re-binds to whatever elements currently live at the configured ids.
    pub fn refresh(&mut self) -> Refresh {
        let (container_id, input_id) = {
            let state = self.state();
            (state.container_id.clone(), state.input_id.clone())
        };
        let container_gen = self
            .registry
            .page()
            .container(&container_id)
            .map(|c| c.generation());
        let input_gen = self.registry.page().input(&input_id).map(|i| i.generation());
        let (Some(container_gen), Some(input_gen)) = (container_gen, input_gen) else {
            log::warn!("monthpick: elements {container_id:?}/{input_id:?} are gone, destroying");
            PickerMut::new(self.registry, self.id).destroy();
            return Refresh::NotUsable;
        };
        let state = self.state();
        if container_gen == state.container_gen && input_gen == state.input_gen {
            return Refresh::Unchanged;
        }
        log::warn!("monthpick: elements {container_id:?}/{input_id:?} changed, reinitializing");
        self.close();
        let today = self.registry.today_ym();
        let state = self.state_mut();
        state.container_gen = container_gen;
        state.input_gen = input_gen;
        state.inert = false;
        state.refresh_display();
        state.rebuild_grid(today);
        let value = state.selected.map(|ym| ym.to_string()).unwrap_or_default();
        if let Some(input) = self.registry.page_mut().input_mut(&input_id) {
            input.write_value(&value);
        }
        Refresh::Reinitialized
    }
}
