use ratatui::layout::{Rect, Size};
use std::collections::HashMap;

/// Change notifications queued on a text input, the stand-in for DOM
/// `change`/`input` events.  Hosts drain them with [`Page::take_events`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    Change,
    Edit,
}

/// A text input a picker can bind to.  The picker writes the `"YYYY-MM"`
/// interchange string into it; everything else (required flag, form
/// membership) belongs to the host.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TextInput {
    value: String,
    required: bool,
    disabled: bool,
    form: Option<String>,
    generation: u64,
    events: Vec<InputEvent>,
}

impl TextInput {
    pub fn new() -> TextInput {
        TextInput::default()
    }

    pub fn value(mut self, value: &str) -> TextInput {
        self.value = value.to_owned();
        self
    }

    pub fn required(mut self, required: bool) -> TextInput {
        self.required = required;
        self
    }

    /// Marks the input as belonging to the named form, so that a
    /// form reset reaches the picker bound to it.
    pub fn form(mut self, form: &str) -> TextInput {
        self.form = Some(form.to_owned());
        self
    }

    pub fn get_value(&self) -> &str {
        &self.value
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Native-style constraint validation: a required input with an empty
    /// value is invalid, anything else is valid.
    pub fn check_validity(&self) -> bool {
        !(self.required && self.value.is_empty())
    }

    pub(crate) fn write_value(&mut self, value: &str) {
        value.clone_into(&mut self.value);
    }

    pub(crate) fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub(crate) fn notify(&mut self) {
        self.events.push(InputEvent::Change);
        self.events.push(InputEvent::Edit);
    }
}

/// Error message element adjacent to a container, created lazily on the
/// first `show_error`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Message {
    text: String,
    visible: bool,
}

impl Message {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The anchor element a picker renders into.  Its area supplies the
/// bounding geometry for popover placement.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Container {
    area: Rect,
    generation: u64,
    error: bool,
    message: Option<Message>,
}

impl Container {
    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub(crate) fn set_error(&mut self, error: bool) {
        self.error = error;
    }

    pub(crate) fn show_message(&mut self, text: &str) {
        let msg = self.message.get_or_insert_with(Message::default);
        text.clone_into(&mut msg.text);
        msg.visible = true;
    }

    pub(crate) fn hide_message(&mut self) {
        if let Some(msg) = self.message.as_mut() {
            msg.visible = false;
        }
    }
}

/// The host "document": containers and inputs addressed by id, the viewport
/// size, and the page-level overlay state (backdrop plus scroll lock).
///
/// Inserting an element under an id that already exists models the host
/// swapping the element out (e.g. an SPA re-render): the stored element is
/// replaced and its generation bumped, which is what `refresh()` detects.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Page {
    viewport: Size,
    containers: HashMap<String, Container>,
    inputs: HashMap<String, TextInput>,
    scroll_locked: bool,
    backdrop: Option<String>,
    next_generation: u64,
}

impl Page {
    pub fn new(viewport: Size) -> Page {
        Page {
            viewport,
            ..Page::default()
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn insert_container(&mut self, id: &str, area: Rect) {
        self.next_generation += 1;
        self.containers.insert(
            id.to_owned(),
            Container {
                area,
                generation: self.next_generation,
                error: false,
                message: None,
            },
        );
    }

    pub fn insert_input(&mut self, id: &str, mut input: TextInput) {
        self.next_generation += 1;
        input.generation = self.next_generation;
        self.inputs.insert(id.to_owned(), input);
    }

    pub fn remove_container(&mut self, id: &str) {
        self.containers.remove(id);
    }

    pub fn remove_input(&mut self, id: &str) {
        self.inputs.remove(id);
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub(crate) fn container_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }

    pub fn input(&self, id: &str) -> Option<&TextInput> {
        self.inputs.get(id)
    }

    pub(crate) fn input_mut(&mut self, id: &str) -> Option<&mut TextInput> {
        self.inputs.get_mut(id)
    }

    /// Convenience accessor for the bound value of an input; `None` if no
    /// such input exists.
    pub fn input_value(&self, id: &str) -> Option<&str> {
        self.inputs.get(id).map(TextInput::get_value)
    }

    /// Drains the queued change notifications of an input.
    pub fn take_events(&mut self, id: &str) -> Vec<InputEvent> {
        self.inputs
            .get_mut(id)
            .map(|input| std::mem::take(&mut input.events))
            .unwrap_or_default()
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Container id owning the current backdrop, if one is raised.
    pub fn backdrop(&self) -> Option<&str> {
        self.backdrop.as_deref()
    }

    pub(crate) fn raise_backdrop(&mut self, owner: &str) {
        self.backdrop = Some(owner.to_owned());
        self.scroll_locked = true;
    }

    pub(crate) fn drop_backdrop(&mut self, owner: &str) {
        if self.backdrop.as_deref() == Some(owner) {
            self.backdrop = None;
            self.scroll_locked = false;
        }
    }
}
