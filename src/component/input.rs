use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::{Input, InputRequest, backend::crossterm::EventHandler};
use unicode_width::UnicodeWidthChar;

use crate::{
    actions::{Action, ActionSender, CompAction},
    page::WidgetExt,
    tui::Event,
    utils::help_msg::{HelpEntry, HelpMsg},
    utils::key_events::KeyEvent,
};

/// A single line text input
///
/// Set the focus state: send a [`InputComp::get_switch_mode_action()`] Action
///
/// Get value: parse an action with [`InputComp::parse_submit_action`]
///
/// With a mask set, the value is drawn as one mask symbol per character. The
/// stored value is never altered by masking.
#[derive(Clone, Debug)]
pub(crate) struct InputComp {
    id: u64,
    input: Input,
    /// Last submitted value, restored when editing is abandoned
    committed: String,
    mode: InputMode,
    /// Mirrors the app wide input mode
    input_mode: bool,

    title: String,
    mask: Option<char>,

    auto_submit: bool,
    control_keys: InputCompCtrlKeys,
    tx: ActionSender,
}

#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputMode {
    #[default]
    Idle,
    Focused,
}

#[derive(Clone, Debug)]
pub(crate) struct InputCompCtrlKeys {
    enter_keys: Vec<KeyEvent>,
    submit_keys: Vec<KeyEvent>,
    exit_keys: Vec<KeyEvent>,
}

impl Default for InputCompCtrlKeys {
    fn default() -> Self {
        Self {
            enter_keys: vec![KeyCode::Enter.into()],
            submit_keys: vec![KeyCode::Enter.into()],
            exit_keys: vec![KeyCode::Esc.into()],
        }
    }
}

impl InputCompCtrlKeys {
    /// Default keys, plus `Tab` to leave editing with the value kept
    pub fn form_field() -> Self {
        Self {
            submit_keys: vec![KeyCode::Enter.into(), KeyCode::Tab.into()],
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum InputAction {
    SwitchMode(InputMode),
    HandleKey(KeyEvent),
    HandlePaste(String),
    Exit,
    DirectExit,
    SubmitExit(String),

    /// the event owner should pay attention to
    Submit(String),
}

impl InputComp {
    pub fn new<T: Into<String>, K: Into<String>>(
        id: u64,
        from: Option<T>,
        title: K,
        ctrl_keys: InputCompCtrlKeys,
        tx: ActionSender,
    ) -> Self {
        let committed: String = from.map(Into::into).unwrap_or_default();
        Self {
            id,
            input: Input::from(committed.clone()),
            committed,
            mode: InputMode::default(),
            input_mode: false,
            title: title.into(),
            mask: None,
            auto_submit: false,
            control_keys: ctrl_keys,
            tx,
        }
    }

    pub fn set_auto_submit(self, b: bool) -> Self {
        Self {
            auto_submit: b,
            ..self
        }
    }

    pub fn with_mask(mut self, mask: Option<char>) -> Self {
        self.set_mask(mask);
        self
    }

    pub fn set_mask(&mut self, mask: Option<char>) {
        self.mask = mask;
    }

    pub fn get_switch_mode_action(&self, mode: InputMode) -> Action {
        self.get_action(InputAction::SwitchMode(mode))
    }

    pub fn parse_submit_action(&self, action: &Action) -> Option<String> {
        match self.unwrap_action(action)? {
            InputAction::Submit(s) => Some(s),
            _ => None,
        }
    }

    fn get_action(&self, action: InputAction) -> Action {
        Action::Comp((CompAction::Input(action), self.id))
    }

    fn unwrap_action(&self, action: &Action) -> Option<InputAction> {
        match action {
            Action::Comp((CompAction::Input(action), id)) if *id == self.id => Some(action.clone()),
            _ => None,
        }
    }

    fn send_submit_if_auto(&mut self) {
        if self.auto_submit {
            self.committed = self.input.value().to_string();
            self.tx
                .send(self.get_action(InputAction::Submit(self.committed.clone())));
        }
    }

    pub fn get_help_msg(&self) -> HelpMsg {
        let mut msg = HelpMsg::default();
        if self.mode != InputMode::Focused {
            return msg;
        }
        if self.input_mode {
            if self.auto_submit {
                // nothing to discard, so every control key just stops editing
                msg.push(HelpEntry::new_plain(
                    format!(
                        "{}/{}",
                        self.control_keys.submit_keys[0], self.control_keys.exit_keys[0]
                    ),
                    "Stop input",
                ));
            } else {
                msg.push(HelpEntry::new(
                    self.control_keys.exit_keys[0].clone(),
                    "Discard input",
                ));
                msg.push(HelpEntry::new(
                    self.control_keys.submit_keys[0].clone(),
                    "Submit input",
                ));
            }
        } else {
            msg.push(HelpEntry::new(
                self.control_keys.enter_keys[0].clone(),
                "Start input",
            ));
        }
        msg
    }

    /// Text to draw, horizontal scroll and cursor column for a field `width` wide
    fn visible_text(&self, width: usize) -> (String, usize, usize) {
        match self.mask {
            Some(mask) => {
                let masked: String = self.input.value().chars().map(|_| mask).collect();
                // columns, not chars: the mask may be a wide symbol
                let mask_width = mask.width().unwrap_or(1).max(1);
                let cursor = self.input.cursor() * mask_width;
                let scroll = (cursor.max(width) - width).div_ceil(mask_width) * mask_width;
                (masked, scroll, cursor)
            }
            None => (
                self.input.value().to_string(),
                self.input.visual_scroll(width),
                self.input.visual_cursor(),
            ),
        }
    }
}

impl super::Component for InputComp {
    fn handle_events(&self, event: &Event) -> Result<()> {
        if self.mode != InputMode::Focused {
            return Ok(());
        }
        if self.input_mode {
            match event {
                Event::Key(key) => {
                    let key: KeyEvent = (*key).into();
                    let action = if self.control_keys.submit_keys.contains(&key) {
                        InputAction::SubmitExit(self.input.value().to_string())
                    } else if self.control_keys.exit_keys.contains(&key) {
                        InputAction::DirectExit
                    } else {
                        InputAction::HandleKey(key)
                    };
                    self.tx.send(self.get_action(action));
                }
                Event::Paste(s) => self
                    .tx
                    .send(self.get_action(InputAction::HandlePaste(s.clone()))),
                _ => (),
            }
        } else if let Event::Key(key) = event {
            if self.control_keys.enter_keys.contains(&(*key).into()) {
                self.tx.send(Action::SwitchInputMode(true))
            }
        }
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<()> {
        if let Action::SwitchInputMode(mode) = action {
            self.input_mode = *mode;
            return Ok(());
        }
        let Some(action) = self.unwrap_action(action) else {
            return Ok(());
        };

        match action {
            InputAction::SwitchMode(input_mode) => {
                self.mode = input_mode;
            }
            InputAction::HandleKey(key_event) => {
                self.input
                    .handle_event(&crossterm::event::Event::Key(key_event.into()));
                self.send_submit_if_auto();
            }
            InputAction::HandlePaste(string) => {
                string.chars().for_each(|c| {
                    self.input.handle(InputRequest::InsertChar(c));
                });
                self.send_submit_if_auto();
            }
            InputAction::SubmitExit(string) => {
                self.committed = string.clone();
                self.tx.send(self.get_action(InputAction::Submit(string)));
                self.tx.send(self.get_action(InputAction::Exit));
            }
            InputAction::DirectExit => {
                if !self.auto_submit {
                    self.input = Input::from(self.committed.clone());
                }
                self.tx.send(self.get_action(InputAction::Exit));
            }
            InputAction::Exit => {
                self.tx.send(Action::SwitchInputMode(false));
            }
            InputAction::Submit(_) => {}
        }
        Ok(())
    }
}

impl WidgetExt for InputComp {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.max(3) - 3;
        let (text, scroll, cursor) = self.visible_text(width as usize);
        let editing = self.mode == InputMode::Focused && self.input_mode;
        let style = match self.mode {
            InputMode::Focused if editing => Color::Yellow.into(),
            InputMode::Focused => Color::Cyan.into(),
            InputMode::Idle => Style::default(),
        };

        let input_widget = Paragraph::new(text)
            .style(style)
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(self.title.as_str()),
            );
        frame.render_widget(input_widget, area);

        if editing {
            // Ratatui hides the cursor unless it's explicitly set. Position the cursor past the
            // end of the input text and one line down from the border to the input line
            let x = cursor.max(scroll) - scroll + 1;
            frame.set_cursor_position((area.x + x as u16, area.y + 1))
        }
    }
}

#[cfg(test)]
impl InputComp {
    pub fn get_mode(&self) -> InputMode {
        self.mode.clone()
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }
}
