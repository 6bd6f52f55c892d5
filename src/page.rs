//! Pages and popups that the shell stacks on top of each other.

use downcast_rs::{DowncastSync, impl_downcast};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::actions::Action;
use crate::app::layer_manager::EventHandlingStatus;
use crate::tui::Event;

pub(crate) mod help_popup;
pub(crate) mod login;

/// A UI layer in the shell's stack: something that draws itself and takes
/// part in the event loop.
pub trait Layer: WidgetExt + EventLoopParticipant + DowncastSync {
    /// Called once, right after the layer is built
    fn init(&mut self) {}
}
impl_downcast!(sync Layer);

pub trait WidgetExt {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Event handling is split in two steps: `handle_events` only reads state and
/// sends actions, `update` applies those actions.
pub trait EventLoopParticipant {
    #[must_use]
    fn handle_events(&self, event: &Event) -> EventHandlingStatus;

    fn update(&mut self, action: Action);

    /// Handle one event, then apply every action it caused (recursively).
    #[cfg(test)]
    fn event_loop_once(
        &mut self,
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<Action>,
        event: Event,
    ) -> EventHandlingStatus {
        let status = self.handle_events(&event);
        while let Ok(action) = rx.try_recv() {
            self.update(action);
        }
        status
    }
}
