use std::rc::Rc;

/// A control that can be put into the busy state: disabled, optionally
/// with a different label.
pub trait BusyControl {
    fn label(&self) -> String;
    fn set_label(&self, label: &str);
    fn set_disabled(&self, disabled: bool);

    /// Label shown while busy. Renderers may decorate it (spinner).
    fn set_busy_label(&self, label: &str) {
        self.set_label(label);
    }
}

/// Holds a control busy until dropped; restores the original label and
/// re-enables the control on every exit path.
#[must_use = "the control is released as soon as the guard is dropped"]
pub struct BusyGuard {
    control: Rc<dyn BusyControl>,
    original_label: Option<String>,
}

impl BusyGuard {
    pub fn acquire(control: Rc<dyn BusyControl>, busy_label: Option<&str>) -> Self {
        let original_label = busy_label.map(|label| {
            let original = control.label();
            control.set_busy_label(label);
            original
        });
        control.set_disabled(true);

        Self {
            control,
            original_label,
        }
    }

    /// Disable without touching the label.
    pub fn disable(control: Rc<dyn BusyControl>) -> Self {
        Self::acquire(control, None)
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(original) = self.original_label.take() {
            self.control.set_label(&original);
        }
        self.control.set_disabled(false);
    }
}
