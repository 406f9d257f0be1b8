use crate::listing::EntryPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Enabled,
    Disabled,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    // stays until the user closes it
    pub persistent: bool,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
            persistent: false,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Warning,
            message: message.into(),
            persistent: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
            persistent: true,
        }
    }
}

/// Whatever shows the list to the user.
///
/// The pager keeps the window state itself and only ever pushes to the
/// renderer, it never reads back what was displayed.
pub trait PageRenderer {
    /// Drop every rendered item, the next inserts start a fresh list.
    fn clear_list(&self);

    /// Append one item after the ones already shown.
    fn insert(&self, entry: &EntryPayload);

    fn set_busy(&self, busy: bool);

    fn set_trigger(&self, state: TriggerState);

    fn toast(&self, toast: Toast);
}
