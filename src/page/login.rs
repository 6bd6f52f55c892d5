use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use strum::Display;
use tracing::{debug, error, info};

use crate::{
    actions::{Action, ActionSender, LayerManageAction, Layers, TargetLayer},
    app::layer_manager::EventHandlingStatus,
    component::{
        Component,
        input::{InputComp, InputCompCtrlKeys, InputMode},
    },
    libs::login_form::LoginFormState,
    tui::Event,
    utils::{
        help_msg::{HelpEntry, HelpMsg},
        key_events::KeyEvent,
    },
};

use super::{EventLoopParticipant, Layer, WidgetExt};

/// The login page: an email field, a password field and a button that
/// switches the password between masked and plain text.
///
/// Both fields write every change straight into [`LoginFormState`].
pub struct Login {
    form: LoginFormState,
    focus: Focus,
    input_mode: bool,
    mask_char: char,

    email_input: InputComp,
    password_input: InputComp,

    tx: ActionSender,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
pub enum Focus {
    #[default]
    Email,
    Password,
    ShowToggle,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Email => Focus::Password,
            Focus::Password => Focus::ShowToggle,
            Focus::ShowToggle => Focus::Email,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Email => Focus::ShowToggle,
            Focus::Password => Focus::Email,
            Focus::ShowToggle => Focus::Password,
        }
    }
}

#[derive(Clone, Debug)]
pub enum LoginAction {
    MoveFocus(Focus),
    ToggleShow,
}

impl From<LoginAction> for Action {
    fn from(value: LoginAction) -> Self {
        Action::Login(value)
    }
}

impl Login {
    pub fn new(tx: ActionSender, mask_char: char, input_mode: bool) -> Self {
        let email_id = rand::random::<u64>();
        let password_id = loop {
            let id = rand::random::<u64>();
            if id != email_id {
                break id;
            }
        };
        let form = LoginFormState::new();

        let mut email_input = InputComp::new(
            email_id,
            Some(form.email()),
            "Email",
            InputCompCtrlKeys::form_field(),
            tx.clone(),
        )
        .set_auto_submit(true);
        let mut password_input = InputComp::new(
            password_id,
            Some(form.password()),
            "Password",
            InputCompCtrlKeys::form_field(),
            tx.clone(),
        )
        .set_auto_submit(true)
        .with_mask(Some(mask_char));

        if input_mode {
            email_input
                .update(&Action::SwitchInputMode(true))
                .unwrap_or_else(|e| error!("Unable to sync input mode: {:?}", e));
            password_input
                .update(&Action::SwitchInputMode(true))
                .unwrap_or_else(|e| error!("Unable to sync input mode: {:?}", e));
        }

        Self {
            form,
            focus: Focus::default(),
            input_mode,
            mask_char,
            email_input,
            password_input,
            tx,
        }
    }

    pub fn form(&self) -> &LoginFormState {
        &self.form
    }

    fn password_mask(&self) -> Option<char> {
        if self.form.is_password_visible() {
            None
        } else {
            Some(self.mask_char)
        }
    }

    fn toggle_label(&self) -> &'static str {
        if self.form.is_password_visible() {
            "Hide password"
        } else {
            "Show password"
        }
    }

    fn focused_input(&self) -> Option<&InputComp> {
        match self.focus {
            Focus::Email => Some(&self.email_input),
            Focus::Password => Some(&self.password_input),
            Focus::ShowToggle => None,
        }
    }

    fn forward_to_inputs(&self, event: &Event) {
        for input in [&self.email_input, &self.password_input] {
            if let Err(e) = input.handle_events(event) {
                error!("Input failed to handle event: {:?}", e);
            }
        }
    }

    pub fn get_help_msg(&self) -> HelpMsg {
        let focused_help = self
            .focused_input()
            .map(InputComp::get_help_msg)
            .unwrap_or_default();
        if self.input_mode {
            return focused_help.extend_ret(
                &vec![HelpEntry::new(
                    KeyEvent::with_modifiers(KeyCode::Char('t'), KeyModifiers::CONTROL),
                    self.toggle_label(),
                )]
                .into(),
            );
        }

        let mut msg: HelpMsg = vec![HelpEntry::new_plain("j/k", "Move focus")].into();
        msg.extend(focused_help.iter().cloned());
        if self.focus == Focus::ShowToggle {
            msg.push(HelpEntry::new(KeyCode::Enter, self.toggle_label()));
        }
        msg.push(HelpEntry::new('s', self.toggle_label()));
        msg.push(HelpEntry::new('?', "Help"));
        msg.push(HelpEntry::new('q', "Quit"));
        msg
    }

    fn render_toggle(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::ShowToggle;
        let checkbox = if self.form.is_password_visible() {
            "[x]"
        } else {
            "[ ]"
        };
        let button = Paragraph::new(format!("{checkbox} Show password"))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .style(Style::default().fg(if focused { Color::Cyan } else { Color::Reset }));
        frame.render_widget(button, area);
    }
}

impl Layer for Login {
    fn init(&mut self) {
        self.tx
            .send(self.email_input.get_switch_mode_action(InputMode::Focused));
    }
}

impl EventLoopParticipant for Login {
    fn handle_events(&self, event: &Event) -> EventHandlingStatus {
        if self.input_mode {
            if let Event::Key(key) = event {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match key.code {
                        KeyCode::Char('t') => {
                            self.tx.send(LoginAction::ToggleShow);
                            return EventHandlingStatus::Consumed;
                        }
                        // suspend belongs to the shell even while typing
                        KeyCode::Char('z') => return EventHandlingStatus::ShouldPropagate,
                        _ => {}
                    }
                }
            }
            self.forward_to_inputs(event);
            return EventHandlingStatus::Consumed;
        }

        let Event::Key(key) = event else {
            return EventHandlingStatus::ShouldPropagate;
        };
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                self.tx.send(LoginAction::MoveFocus(self.focus.next()))
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                self.tx.send(LoginAction::MoveFocus(self.focus.prev()))
            }
            KeyCode::Char('s') => self.tx.send(LoginAction::ToggleShow),
            KeyCode::Enter | KeyCode::Char(' ') if self.focus == Focus::ShowToggle => {
                self.tx.send(LoginAction::ToggleShow)
            }
            KeyCode::Char('?') => self.tx.send(LayerManageAction::Push(TargetLayer {
                layer: Layers::Help(self.get_help_msg()),
                render_self: true,
            })),
            KeyCode::Enter => self.forward_to_inputs(event),
            _ => return EventHandlingStatus::ShouldPropagate,
        }
        EventHandlingStatus::Consumed
    }

    fn update(&mut self, action: Action) {
        match &action {
            Action::SwitchInputMode(mode) => {
                self.input_mode = *mode;
            }
            Action::Login(LoginAction::MoveFocus(focus)) => {
                self.focus = *focus;
                debug!("Login focus moved to {}", focus);
                let mode_for = |target: Focus| {
                    if *focus == target {
                        InputMode::Focused
                    } else {
                        InputMode::Idle
                    }
                };
                self.tx.send(
                    self.email_input
                        .get_switch_mode_action(mode_for(Focus::Email)),
                );
                self.tx.send(
                    self.password_input
                        .get_switch_mode_action(mode_for(Focus::Password)),
                );
            }
            Action::Login(LoginAction::ToggleShow) => {
                self.form.toggle_show();
                self.password_input.set_mask(self.password_mask());
                info!(
                    visible = self.form.is_password_visible(),
                    "Password visibility toggled"
                );
            }
            _ => {}
        }

        if let Some(email) = self.email_input.parse_submit_action(&action) {
            self.form.set_email(email);
        }
        if let Some(password) = self.password_input.parse_submit_action(&action) {
            self.form.set_password(password);
        }

        for input in [&mut self.email_input, &mut self.password_input] {
            if let Err(e) = input.update(&action) {
                error!("Input failed to apply action: {:?}", e);
            }
        }
    }
}

impl WidgetExt for Login {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

        let [form_area] = Layout::vertical([Constraint::Length(11)])
            .flex(Flex::Center)
            .areas(main_area);
        let [form_area] = Layout::horizontal([Constraint::Max(50)])
            .flex(Flex::Center)
            .areas(form_area);

        let block = Block::default()
            .title("Medi Center")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(Color::Reset));
        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let [email_area, password_area, toggle_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .areas(inner);

        self.email_input.render(frame, email_area);
        self.password_input.render(frame, password_area);
        self.render_toggle(frame, toggle_area);

        self.get_help_msg().render(frame, help_area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    use crate::utils::key_events::test_utils::{get_char_evt, get_ctrl_evt, get_key_evt};

    use super::*;

    fn get_test_objs() -> (Login, UnboundedReceiver<Action>) {
        let (tx, mut rx) = unbounded_channel();
        let mut page = Login::new(tx.into(), '•', false);
        page.init();
        while let Ok(action) = rx.try_recv() {
            page.update(action);
        }
        (page, rx)
    }

    fn type_str(page: &mut Login, rx: &mut UnboundedReceiver<Action>, s: &str) {
        for c in s.chars() {
            let _ = page.event_loop_once(rx, get_char_evt(c));
        }
    }

    fn screen(page: &mut Login) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| page.render(f, f.area())).unwrap();
        terminal.backend().to_string()
    }

    #[test]
    fn starts_hidden_on_email() {
        let (page, _rx) = get_test_objs();
        assert!(!page.form().is_password_visible());
        assert_eq!(page.focus, Focus::Email);
        assert_eq!(page.email_input.get_mode(), InputMode::Focused);
        assert_eq!(page.password_input.get_mode(), InputMode::Idle);
    }

    #[test]
    fn typing_updates_form() {
        let (mut page, mut rx) = get_test_objs();

        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        assert!(page.input_mode);
        type_str(&mut page, &mut rx, "a@b.c");
        assert_eq!(page.form().email(), "a@b.c");

        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        assert!(!page.input_mode);
        assert_eq!(page.form().email(), "a@b.c");

        let _ = page.event_loop_once(&mut rx, get_char_evt('j'));
        assert_eq!(page.focus, Focus::Password);
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        type_str(&mut page, &mut rx, "abc123");
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Esc));
        assert_eq!(page.form().password(), "abc123");
        assert_eq!(page.form().email(), "a@b.c");
    }

    #[test]
    fn paste_updates_form() {
        let (mut page, mut rx) = get_test_objs();
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        let _ = page.event_loop_once(&mut rx, Event::Paste("doc@clinic.org".into()));
        assert_eq!(page.form().email(), "doc@clinic.org");
    }

    #[test]
    fn toggle_keeps_password_and_changes_rendering() {
        let (mut page, mut rx) = get_test_objs();
        let _ = page.event_loop_once(&mut rx, get_char_evt('j'));
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        type_str(&mut page, &mut rx, "abc123");
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));

        let hidden = screen(&mut page);
        assert!(hidden.contains("••••••"));
        assert!(!hidden.contains("abc123"));
        assert!(hidden.contains("[ ] Show password"));

        let status = page.event_loop_once(&mut rx, get_char_evt('s'));
        assert!(matches!(status, EventHandlingStatus::Consumed));
        assert!(page.form().is_password_visible());
        assert_eq!(page.form().password(), "abc123");

        let shown = screen(&mut page);
        assert!(shown.contains("abc123"));
        assert!(!shown.contains("•"));
        assert!(shown.contains("[x] Show password"));

        let _ = page.event_loop_once(&mut rx, get_char_evt('s'));
        assert!(!page.form().is_password_visible());
        assert_eq!(page.form().password(), "abc123");
        assert!(!screen(&mut page).contains("abc123"));
    }

    #[test]
    fn toggle_button() {
        let (mut page, mut rx) = get_test_objs();
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Up));
        assert_eq!(page.focus, Focus::ShowToggle);
        assert_eq!(page.email_input.get_mode(), InputMode::Idle);

        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        assert!(page.form().is_password_visible());
        assert!(!page.input_mode);

        let _ = page.event_loop_once(&mut rx, get_char_evt(' '));
        assert!(!page.form().is_password_visible());
    }

    #[test]
    fn ctrl_t_toggles_while_typing() {
        let (mut page, mut rx) = get_test_objs();
        let _ = page.event_loop_once(&mut rx, get_char_evt('j'));
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        type_str(&mut page, &mut rx, "pw");
        let _ = page.event_loop_once(&mut rx, get_ctrl_evt('t'));

        assert!(page.form().is_password_visible());
        assert!(page.input_mode);
        assert_eq!(page.form().password(), "pw");
    }

    #[test]
    fn focus_cycles() {
        let (mut page, mut rx) = get_test_objs();
        for expected in [Focus::Password, Focus::ShowToggle, Focus::Email] {
            let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Tab));
            assert_eq!(page.focus, expected);
        }
        for expected in [Focus::ShowToggle, Focus::Password, Focus::Email] {
            let _ = page.event_loop_once(&mut rx, get_char_evt('k'));
            assert_eq!(page.focus, expected);
        }
        assert_eq!(page.email_input.get_mode(), InputMode::Focused);
        assert_eq!(page.password_input.get_mode(), InputMode::Idle);
    }

    #[test]
    fn quit_key_only_propagates_outside_input() {
        let (mut page, mut rx) = get_test_objs();
        let status = page.event_loop_once(&mut rx, get_char_evt('q'));
        assert!(matches!(status, EventHandlingStatus::ShouldPropagate));

        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        let status = page.event_loop_once(&mut rx, get_char_evt('q'));
        assert!(matches!(status, EventHandlingStatus::Consumed));
        assert_eq!(page.form().email(), "q");
    }

    #[test]
    fn question_mark_opens_help() {
        let (page, mut rx) = get_test_objs();
        let status = page.handle_events(&get_char_evt('?'));
        assert!(matches!(status, EventHandlingStatus::Consumed));
        match rx.try_recv().unwrap() {
            Action::Layer(LayerManageAction::Push(target)) => {
                assert!(target.render_self);
                let Layers::Help(msg) = target.layer;
                assert!(msg.to_string().contains("Show password: s"));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn help_msg_follows_state() {
        let (mut page, mut rx) = get_test_objs();
        assert_eq!(
            page.get_help_msg().to_string(),
            "Move focus: j/k | Start input: enter | Show password: s | Help: ? | Quit: q"
        );

        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Enter));
        assert_eq!(
            page.get_help_msg().to_string(),
            "Stop input: enter/esc | Show password: ctrl-t"
        );

        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::Esc));
        let _ = page.event_loop_once(&mut rx, get_key_evt(KeyCode::BackTab));
        let _ = page.event_loop_once(&mut rx, get_char_evt('s'));
        assert_eq!(
            page.get_help_msg().to_string(),
            "Move focus: j/k | Hide password: enter | Hide password: s | Help: ? | Quit: q"
        );
    }
}
