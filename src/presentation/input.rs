use crate::application::{App, Submission, ViewState};
use crate::infrastructure::DocumentRepository;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    /// Applies one key press to the app.
    ///
    /// Returns a submission when the key started one; the caller is
    /// responsible for dispatching it.
    pub fn handle_key_event(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<Submission> {
        if app.active_alert().is_some() {
            Self::handle_alert(app, key);
            return None;
        }

        match app.view {
            ViewState::Form(_) => Self::handle_form(app, key, modifiers),
            ViewState::Loading(_) => None,
            ViewState::Result(_) => {
                Self::handle_result(app, key);
                None
            }
        }
    }

    fn handle_alert(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc) {
            app.dismiss_alert();
        }
    }

    fn handle_form(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Option<Submission> {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match key {
            KeyCode::Enter => return app.confirm_step(),
            KeyCode::Esc => {
                app.previous_step();
            }
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Left => app.move_left(),
            KeyCode::Right => app.move_right(),
            KeyCode::Home => app.cursor_home(),
            KeyCode::End => app.cursor_end(),
            KeyCode::Backspace => app.delete_backward(),
            KeyCode::Delete => app.delete_forward(),
            KeyCode::Char(c) => app.insert_char(c),
            _ => {}
        }
        None
    }

    fn handle_result(app: &mut App, key: KeyCode) {
        if let KeyCode::Char('d') = key {
            if let Some((document, company_name)) = app.document_to_download() {
                let result =
                    DocumentRepository::save_document(document, company_name, &app.download_dir);
                app.set_download_result(result);
            }
        }
    }
}
