//! Alerts modeled as data so reducers can present and test them.

/// Visual role of an alert button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Default,
    Destructive,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertButton<A> {
    pub label: String,
    pub role: ButtonRole,
    /// `None` for buttons that only dismiss the alert.
    pub action: Option<A>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState<A> {
    pub title: String,
    pub message: String,
    pub buttons: Vec<AlertButton<A>>,
}

impl<A> AlertState<A> {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: Vec::new(),
        }
    }

    pub fn button(mut self, label: impl Into<String>, role: ButtonRole, action: Option<A>) -> Self {
        self.buttons.push(AlertButton {
            label: label.into(),
            role,
            action,
        });
        self
    }
}

/// Interaction with a presented alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction<A> {
    /// A button carrying an action was tapped.
    Presented(A),
    /// The alert went away without an action (cancel button or swipe).
    Dismissed,
}
