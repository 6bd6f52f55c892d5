pub(crate) mod layer_manager;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use layer_manager::{EventHandlingStatus, LayerManager};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use crate::{actions::Action, config::Config, libs::login_form::LoginFormState, tui};

pub struct RootState {
    pub should_quit: bool,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
    /// A text input is being edited, so plain keys belong to it
    pub input_mode: bool,

    pub config: Config,
}

impl RootState {
    pub fn new(config: Config) -> Self {
        let (action_tx, action_rx) = unbounded_channel();
        Self {
            should_quit: false,
            action_tx,
            action_rx,
            input_mode: false,
            config,
        }
    }
}

/// The shell: hosts the layer stack (the login page, plus the help popup when
/// open) and drives the event loop.
pub struct App {
    layers: LayerManager,
    pub state: RootState,
    pub tui: tui::TuiEnum,
}

impl App {
    pub fn new(state: RootState, tui: tui::TuiEnum) -> Self {
        Self {
            layers: LayerManager::new(&state),
            state,
            tui,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        info!("Login page ready");

        loop {
            let e = self.tui.next().await?;
            self.handle_event(e)?;

            while let Ok(action) = self.state.action_rx.try_recv() {
                self.perform_action(action)?;
            }

            if self.state.should_quit {
                break;
            }
        }

        self.tui.exit()?;
        if let Some(form) = self.login_form() {
            info!(
                email_filled = !form.email().is_empty(),
                password_filled = !form.password().is_empty(),
                "Leaving login page"
            );
        }
        info!("Bye");
        Ok(())
    }

    /// What has been typed into the login page so far
    pub fn login_form(&self) -> Option<&LoginFormState> {
        self.layers.login_form()
    }

    /// Turn a [`tui::Event`] into actions.
    ///
    /// `Ctrl-c` always quits. Other keys go to the top layer first; the shell
    /// only acts on what the layer leaves alone.
    fn handle_event(&mut self, event: tui::Event) -> Result<()> {
        let action = match &event {
            tui::Event::Tick => Some(Action::Tick),
            tui::Event::Render | tui::Event::Resize(_, _) => Some(Action::Render),
            tui::Event::Error => {
                warn!("Terminal reported an error, quitting");
                Some(Action::Quit)
            }
            tui::Event::Init
            | tui::Event::FocusGained
            | tui::Event::FocusLost => None,
            tui::Event::Key(key)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c') =>
            {
                Some(Action::Quit)
            }
            tui::Event::Key(_) | tui::Event::Paste(_) => match self.layers.handle_event(&event) {
                EventHandlingStatus::Consumed => None,
                EventHandlingStatus::ShouldPropagate => self.global_action(&event),
            },
        };
        if let Some(action) = action {
            self.state.action_tx.send(action)?;
        }
        Ok(())
    }

    fn global_action(&self, event: &tui::Event) -> Option<Action> {
        let tui::Event::Key(key) = event else {
            return None;
        };
        match (key.modifiers, key.code) {
            (m, KeyCode::Char('z')) if m.contains(KeyModifiers::CONTROL) => Some(Action::Suspend),
            (_, KeyCode::Char('q')) if !self.state.input_mode => Some(Action::Quit),
            _ => None,
        }
    }

    /// Change the application state. This is the only place where it happens.
    fn perform_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.state.should_quit = true;
            }
            Action::Tick => {}
            Action::Render => {
                self.tui.draw(|f| self.layers.render(f))?;
            }
            Action::Suspend => {
                self.tui.suspend()?;
                self.state.action_tx.send(Action::Resume)?;
            }
            Action::Resume => {
                self.tui.resume()?;
                self.state.action_tx.send(Action::Render)?;
            }
            Action::SwitchInputMode(mode) => {
                self.state.input_mode = mode;
                self.layers.handle_action(Action::SwitchInputMode(mode));
            }
            Action::Layer(layer_action) => {
                self.layers.handle_layer_action(&layer_action, &self.state);
            }
            action => self.layers.handle_action(action),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;

    use crate::{
        tui::{Event, TestTui},
        utils::key_events::test_utils::{get_char_evt, get_ctrl_evt, get_key_evt},
    };

    use super::*;

    fn get_app() -> App {
        let mut app = App::new(
            RootState::new(Config::default()),
            TestTui::new(60, 20).into(),
        );
        app.drain();
        app
    }

    impl App {
        fn drain(&mut self) {
            while let Ok(action) = self.state.action_rx.try_recv() {
                self.perform_action(action).unwrap();
            }
        }

        fn step(&mut self, event: Event) {
            self.handle_event(event).unwrap();
            self.drain();
        }

        fn screen(&mut self) -> String {
            self.step(Event::Render);
            self.tui.backend().to_string()
        }
    }

    #[test]
    fn renders_login_page() {
        let mut app = get_app();
        let screen = app.screen();
        assert!(screen.contains("Medi Center"));
        assert!(screen.contains("Email"));
        assert!(screen.contains("Password"));
        assert!(screen.contains("[ ] Show password"));
    }

    #[test]
    fn q_quits_outside_input() {
        let mut app = get_app();
        app.step(get_char_evt('q'));
        assert!(app.state.should_quit);
    }

    #[test]
    fn q_is_typed_while_editing() {
        let mut app = get_app();
        app.step(get_key_evt(KeyCode::Enter));
        assert!(app.state.input_mode);
        app.step(get_char_evt('q'));
        assert!(!app.state.should_quit);
        assert!(app.screen().contains("│q"));

        app.step(get_ctrl_evt('c'));
        assert!(app.state.should_quit);
    }

    #[test]
    fn password_masked_until_toggled() {
        let mut app = get_app();
        app.step(get_char_evt('j'));
        app.step(get_key_evt(KeyCode::Enter));
        for c in "abc123".chars() {
            app.step(get_char_evt(c));
        }
        app.step(get_key_evt(KeyCode::Enter));
        assert!(!app.state.input_mode);

        let screen = app.screen();
        assert!(screen.contains("••••••"));
        assert!(!screen.contains("abc123"));

        app.step(get_char_evt('s'));
        assert!(app.screen().contains("abc123"));
    }

    #[test]
    fn login_form_is_reachable_under_popup() {
        let mut app = get_app();
        app.step(get_key_evt(KeyCode::Enter));
        for c in "a@b.c".chars() {
            app.step(get_char_evt(c));
        }
        app.step(get_key_evt(KeyCode::Esc));
        app.step(get_char_evt('s'));
        app.step(get_char_evt('?'));
        assert_eq!(app.layers.len(), 2);

        let form = app.login_form().unwrap();
        assert_eq!(form.email(), "a@b.c");
        assert_eq!(form.password(), "");
        assert!(form.is_password_visible());
    }

    #[test]
    fn help_popup_opens_and_closes() {
        let mut app = get_app();
        app.step(get_char_evt('?'));
        assert_eq!(app.layers.len(), 2);
        assert!(app.screen().contains("Go Down: j"));

        // keys the popup does not use reach the shell
        app.step(Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(!app.state.should_quit);

        app.step(get_key_evt(KeyCode::Esc));
        assert_eq!(app.layers.len(), 1);
        assert!(!app.screen().contains("Go Down: j"));
    }

    #[test]
    fn popping_last_layer_rebuilds_login() {
        let mut app = get_app();
        app.perform_action(Action::Layer(crate::actions::LayerManageAction::Pop))
            .unwrap();
        app.drain();
        assert_eq!(app.layers.len(), 1);
        assert!(app.screen().contains("Show password"));
    }

    #[test]
    fn ctrl_z_suspends_while_editing() {
        let mut app = get_app();
        app.step(get_key_evt(KeyCode::Enter));
        assert!(app.state.input_mode);

        app.handle_event(get_ctrl_evt('z')).unwrap();
        let mut queued = vec![];
        while let Ok(action) = app.state.action_rx.try_recv() {
            queued.push(action);
        }
        assert!(queued.iter().any(|a| matches!(a, Action::Suspend)));
        assert!(!queued.iter().any(|a| matches!(a, Action::Comp(_))));

        for action in queued {
            app.perform_action(action).unwrap();
        }
        app.drain();
        assert!(app.state.input_mode);
        assert!(app.screen().contains("Medi Center"));
    }

    #[test]
    fn suspend_and_resume_on_test_backend() {
        let mut app = get_app();
        app.step(get_ctrl_evt('z'));
        assert!(!app.state.should_quit);
        assert!(app.screen().contains("Medi Center"));
    }
}
