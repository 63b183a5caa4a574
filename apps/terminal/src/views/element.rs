//! Rendered output of a view.
//!
//! An [`Element`] is plain text plus the controls the user can act on. A
//! control carries the exact intent it emits; the shell publishes that
//! intent verbatim when the control is pressed.

use std::fmt;

use storefront_core::{BuyerField, StoreEvent};

/// Something the user can act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Pressed with `press <key>`.
    Button {
        key: String,
        label: String,
        intent: StoreEvent,
        enabled: bool,
    },
    /// Filled with `fill <field> <value>`.
    Input { field: BuyerField, value: String },
}

impl Control {
    pub fn button(key: impl Into<String>, label: impl Into<String>, intent: StoreEvent) -> Self {
        Control::Button {
            key: key.into(),
            label: label.into(),
            intent,
            enabled: true,
        }
    }

    pub fn input(field: BuyerField, value: Option<String>) -> Self {
        Control::Input {
            field,
            value: value.unwrap_or_default(),
        }
    }

    /// Sets the enabled flag on a button. Inputs are always enabled.
    pub fn enabled(mut self, on: bool) -> Self {
        if let Control::Button { enabled, .. } = &mut self {
            *enabled = on;
        }
        self
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Control::Button { key, .. } => Some(key),
            Control::Input { .. } => None,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Control::Button {
                key,
                label,
                enabled: true,
                ..
            } => write!(f, "[{}] {}", key, label),
            Control::Button { key, label, .. } => write!(f, "({}) {} (disabled)", key, label),
            Control::Input { field, value } => write!(f, "{}: {}", field, value),
        }
    }
}

/// One rendered region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub title: Option<String>,
    pub lines: Vec<String>,
    pub controls: Vec<Control>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Element {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn control(mut self, control: Control) -> Self {
        self.controls.push(control);
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn push_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    pub fn button(&self, key: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.key() == Some(key))
    }

    pub fn input(&self, field: BuyerField) -> Option<&Control> {
        self.controls
            .iter()
            .find(|c| matches!(c, Control::Input { field: f, .. } if *f == field))
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.lines.is_empty() && self.controls.is_empty()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "== {} ==", title)?;
        }
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        for control in &self.controls {
            writeln!(f, "  {}", control)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let element = Element::titled("Basket")
            .line("1. Lamp  100")
            .control(Control::button("checkout", "Checkout", StoreEvent::OrderFormOpened).enabled(false))
            .control(Control::input(BuyerField::Email, Some("y@z".into())));

        assert_eq!(
            element.to_string(),
            "== Basket ==\n1. Lamp  100\n  (checkout) Checkout (disabled)\n  email: y@z\n"
        );
    }

    #[test]
    fn test_lookup() {
        let element = Element::new()
            .control(Control::button("buy", "Buy", StoreEvent::PreviewToggle))
            .control(Control::input(BuyerField::Phone, None));

        assert!(element.button("buy").is_some());
        assert!(element.button("pay").is_none());
        assert!(element.input(BuyerField::Phone).is_some());
        assert!(element.input(BuyerField::Email).is_none());
    }
}
