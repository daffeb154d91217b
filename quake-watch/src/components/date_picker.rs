use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, TextInput, TextInputProps,
    TextInputStyle, centered_rect,
};

use super::Component;
use crate::action::Action;

const PLACEHOLDER: &str = "YYYY-MM-DD";

/// Where the picker sits inside `area`.
pub fn modal_area(area: Rect) -> Rect {
    centered_rect(40, 7, area)
}

pub struct DatePicker {
    input: TextInput,
    modal: Modal,
    was_open: bool,
}

pub struct DatePickerProps<'a> {
    pub input: &'a str,
    pub error: Option<&'a str>,
    pub is_focused: bool,
    pub on_change: fn(String) -> Action,
    pub on_submit: fn(String) -> Action,
}

impl Default for DatePicker {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

impl DatePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the cursor when the picker opens.
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
        }
        self.was_open = is_open;
    }
}

impl Component<Action> for DatePicker {
    type Props<'a> = DatePickerProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc => return vec![Action::DatePickerClose],
            KeyCode::Enter => return vec![(props.on_submit)(props.input.to_string())],
            _ => {}
        }

        let input_props = TextInputProps {
            value: props.input,
            placeholder: PLACEHOLDER,
            is_focused: true,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::new(1, 0, 1, 0),
                    bg: None,
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_change,
            on_submit: props.on_submit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        let DatePicker { input, modal, .. } = self;
        let modal_area = modal_area(area);
        let error = props.error;

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Input
                Constraint::Length(1), // Error
                Constraint::Length(1), // Hint
            ])
            .split(content_area);

            let input_props = TextInputProps {
                value: props.input,
                placeholder: PLACEHOLDER,
                is_focused: props.is_focused,
                style: TextInputStyle {
                    base: BaseStyle {
                        border: None,
                        padding: Padding::all(1),
                        bg: Some(Color::Rgb(50, 50, 60)),
                        fg: None,
                    },
                    placeholder_style: None,
                    cursor_style: None,
                },
                on_change: props.on_change,
                on_submit: props.on_submit,
                on_cursor_move: Some(|_| Action::Render),
            };
            input.render(frame, chunks[0], input_props);

            if let Some(error) = error {
                let line = Line::from(error).style(Style::default().fg(Color::Red));
                frame.render_widget(Paragraph::new(line), chunks[1]);
            }

            let hint = Line::from("enter apply \u{b7} esc cancel")
                .style(Style::default().fg(Color::DarkGray))
                .centered();
            frame.render_widget(Paragraph::new(hint), chunks[2]);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(Color::Rgb(35, 35, 45)),
                        padding: Padding::default(),
                        border: None,
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DatePickerClose,
                render_content: &mut render_content,
            },
        );
    }
}
