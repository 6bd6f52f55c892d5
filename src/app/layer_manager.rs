use std::ops::{Deref, DerefMut};

use crate::{
    actions::{Action, LayerManageAction, Layers},
    libs::login_form::LoginFormState,
    page::{EventLoopParticipant, Layer, WidgetExt, help_popup::HelpPopup, login::Login},
    tui::Event,
};
use ratatui::Frame;
use tracing::{info, warn};

use super::RootState;

/// Whether a layer used an event or wants the shell to look at it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandlingStatus {
    Consumed,
    ShouldPropagate,
}

pub(super) struct BoxedLayer(Box<dyn Layer>);
impl Deref for BoxedLayer {
    type Target = dyn Layer;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
impl DerefMut for BoxedLayer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}
impl From<Box<dyn Layer>> for BoxedLayer {
    fn from(layer: Box<dyn Layer>) -> Self {
        Self(layer)
    }
}
impl BoxedLayer {
    fn into_layer_config(self, render: bool) -> LayerConfig {
        LayerConfig {
            layer: self,
            render,
        }
    }
}

pub(super) struct LayerConfig {
    layer: BoxedLayer,
    render: bool,
}

impl Deref for LayerConfig {
    type Target = BoxedLayer;

    fn deref(&self) -> &Self::Target {
        &self.layer
    }
}
impl DerefMut for LayerConfig {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.layer
    }
}

/// The shell's stack of layers. Only the top layer receives events and
/// actions; every layer marked for rendering is drawn, bottom first.
pub(super) struct LayerManager {
    layers: Vec<LayerConfig>,
}

impl Deref for LayerManager {
    type Target = Vec<LayerConfig>;

    fn deref(&self) -> &Self::Target {
        &self.layers
    }
}

impl LayerManager {
    pub(super) fn new(state: &RootState) -> Self {
        Self {
            layers: vec![Self::login_layer(state).into_layer_config(true)],
        }
    }

    pub(super) fn render(&mut self, f: &mut Frame) {
        let area = f.area();
        self.layers
            .iter_mut()
            .filter(|layer| layer.render)
            .for_each(|layer| layer.render(f, area));
    }

    pub(super) fn handle_event(&self, event: &Event) -> EventHandlingStatus {
        match self.layers.last() {
            Some(layer) => layer.handle_events(event),
            None => EventHandlingStatus::ShouldPropagate,
        }
    }

    /// Apply a [`LayerManageAction`], updating the layer stack
    pub(super) fn handle_layer_action(&mut self, action: &LayerManageAction, state: &RootState) {
        match action {
            LayerManageAction::Push(target) => {
                let Some(layer) = Self::get_layer(&target.layer, state) else {
                    return;
                };
                if let Some(current) = self.layers.last_mut() {
                    current.render = target.render_self;
                }
                self.layers.push(layer.into_layer_config(true));
                info!(
                    "Pushing a {} page, current page will {} render, new layer stack length {}",
                    target.layer,
                    if target.render_self { "still" } else { "not" },
                    self.layers.len()
                );
            }
            LayerManageAction::Pop => {
                self.layers.pop();
                if self.layers.is_empty() {
                    self.layers
                        .push(Self::login_layer(state).into_layer_config(true));
                }
                if let Some(top) = self.layers.last_mut() {
                    top.render = true;
                }
                info!(
                    "Popping page, current layer stack length {}",
                    self.layers.len()
                );
            }
        }
    }

    /// Pass an action to the top layer
    pub(super) fn handle_action(&mut self, action: Action) {
        if let Some(layer) = self.layers.last_mut() {
            layer.update(action);
        }
    }

    /// Form state of the login page at the bottom of the stack
    pub(super) fn login_form(&self) -> Option<&LoginFormState> {
        self.layers.first()?.downcast_ref::<Login>().map(Login::form)
    }

    fn login_layer(state: &RootState) -> BoxedLayer {
        let mut page: Box<dyn Layer> = Box::new(Login::new(
            state.action_tx.clone().into(),
            state.config.login.mask_char(),
            state.input_mode,
        ));
        page.init();
        page.into()
    }

    /// Get a new layer based on the given layer type
    fn get_layer(layer: &Layers, state: &RootState) -> Option<BoxedLayer> {
        let mut page: Box<dyn Layer> = match layer {
            Layers::Help(help_msg) => {
                match HelpPopup::new(state.action_tx.clone().into(), help_msg.clone()) {
                    Some(help) => Box::new(help),
                    None => {
                        warn!("Help message is empty");
                        return None;
                    }
                }
            }
        };
        page.init();
        Some(page.into())
    }
}
