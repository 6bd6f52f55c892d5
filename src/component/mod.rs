pub(crate) mod input;

use color_eyre::eyre::Result;

use crate::{actions::Action, page::WidgetExt, tui::Event};

/// A widget living inside a layer.
///
/// Components talk to their owner only through actions tagged with their id,
/// so a layer can hold several components of the same kind.
pub(crate) trait Component: WidgetExt {
    fn handle_events(&self, event: &Event) -> Result<()>;

    fn update(&mut self, action: &Action) -> Result<()>;
}
