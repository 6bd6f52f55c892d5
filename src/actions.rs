use color_eyre::eyre::Context;
use strum::Display;

use crate::{
    component::input::InputAction,
    page::{help_popup::HelpPopupAction, login::LoginAction},
    utils::help_msg::HelpMsg,
};

#[derive(Clone, Debug)]
pub enum Action {
    Tick,
    Render,
    Quit,
    Suspend,
    Resume,

    SwitchInputMode(bool),
    Layer(LayerManageAction),

    Login(LoginAction),
    HelpPopup(HelpPopupAction),

    Comp((CompAction, u64)),
}

/// Layers the shell knows how to build
#[derive(Clone, Debug, Display)]
pub enum Layers {
    Help(HelpMsg),
}

#[derive(Clone, Debug)]
pub struct TargetLayer {
    pub layer: Layers,
    /// Whether the layer below keeps rendering (popups keep the page visible)
    pub render_self: bool,
}

#[derive(Clone, Debug)]
pub enum LayerManageAction {
    Push(TargetLayer),
    Pop,
}

impl From<LayerManageAction> for Action {
    fn from(value: LayerManageAction) -> Self {
        Action::Layer(value)
    }
}

#[derive(Clone, Debug)]
pub enum CompAction {
    Input(InputAction),
}

#[derive(Clone, Debug)]
pub struct ActionSender(pub tokio::sync::mpsc::UnboundedSender<Action>);

impl ActionSender {
    pub fn send<T: Into<Action>>(&self, action: T) {
        self.0
            .send(action.into())
            .with_context(|| {
                "Action Receiver is dropped or closed, which should not happen if app is still running."
            })
            .unwrap();
    }
}

impl From<tokio::sync::mpsc::UnboundedSender<Action>> for ActionSender {
    fn from(value: tokio::sync::mpsc::UnboundedSender<Action>) -> Self {
        ActionSender(value)
    }
}
