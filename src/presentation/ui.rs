use crate::application::{App, FormState, ViewState};
use crate::domain::{
    Field, FieldKind, ResultPayload, UseCasePreference, MAX_AI_EXPERIENCE,
};
use crate::infrastructure::DocumentRepository;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const VALUE_INDENT: &str = "    ";

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    match &app.view {
        ViewState::Form(form) => render_form(f, app, form, chunks[1]),
        ViewState::Loading(_) => render_loading(f, app, chunks[1]),
        ViewState::Result(payload) => render_result(f, app, payload, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);
    render_footer(f, chunks[3]);

    if let Some(alert) = app.active_alert() {
        render_alert_popup(f, alert);
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("SYMBIS | AI SCAN")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new("© Symbis B.V. - Automation & AI Consult")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, area);
}

fn render_form(f: &mut Frame, app: &App, form: &FormState, area: Rect) {
    let step = form.wizard.step();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Stap {}/4", step.number()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let progress = Gauge::default()
        .gauge_style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
        .ratio(form.wizard.progress())
        .label(format!("{}%", form.wizard.progress_percent()));
    f.render_widget(progress, chunks[0]);

    let mut lines = vec![
        Line::default(),
        Line::styled(step.title(), Style::default().add_modifier(Modifier::BOLD)),
        Line::styled(step.subtitle(), Style::default().fg(Color::Gray)),
        Line::default(),
    ];

    let focused = app.focused_field();
    let mut cursor = None;
    for field in form.wizard.visible_fields(&app.fields) {
        let is_focused = Some(field) == focused;
        lines.push(field_label(field, step.required().contains(&field), is_focused));

        if is_focused && field.is_editable_text() {
            let value = app.fields.get(field);
            let before: String = value.chars().take(app.cursor_position).collect();
            let x = VALUE_INDENT.chars().count() + before.chars().count();
            cursor = Some((x as u16, lines.len() as u16));
        }
        lines.extend(field_value_lines(app, field, is_focused));
        lines.push(Line::default());
    }

    if let Some(error) = &form.error {
        lines.push(Line::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ));
    }

    let body = chunks[1];
    f.render_widget(Paragraph::new(lines), body);

    if app.active_alert().is_none() {
        if let Some((x, y)) = cursor {
            if y < body.height && x < body.width {
                f.set_cursor_position((body.x + x, body.y + y));
            }
        }
    }
}

fn field_label(field: Field, required: bool, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let suffix = if required { " *" } else { "" };
    let style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::styled(format!("{}{}{}", marker, field.label(), suffix), style)
}

fn field_value_lines(app: &App, field: Field, focused: bool) -> Vec<Line<'static>> {
    let value = app.fields.get(field);
    let highlight = if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    match field.kind() {
        FieldKind::Text | FieldKind::LongText => {
            if value.is_empty() {
                let placeholder = field.placeholder().unwrap_or("");
                vec![Line::styled(
                    format!("{}{}", VALUE_INDENT, placeholder),
                    Style::default().fg(Color::DarkGray),
                )]
            } else {
                vec![Line::styled(format!("{}{}", VALUE_INDENT, value), highlight)]
            }
        }
        FieldKind::Choice => vec![Line::styled(
            format!("{}◀ {} ▶", VALUE_INDENT, value),
            highlight,
        )],
        FieldKind::Range => {
            let level = value.parse::<usize>().unwrap_or(0);
            let max = MAX_AI_EXPERIENCE as usize;
            let filled = level.min(max);
            vec![
                Line::styled(
                    format!(
                        "{}[{}{}] {}/{}",
                        VALUE_INDENT,
                        "■".repeat(filled),
                        "·".repeat(max - filled),
                        value,
                        max
                    ),
                    highlight,
                ),
                Line::styled(
                    format!("{}Startpunt (1)  In de flow (5)  Agents (10)", VALUE_INDENT),
                    Style::default().fg(Color::DarkGray),
                ),
            ]
        }
        FieldKind::Preference => {
            let chosen = app.fields.use_case_preference();
            [UseCasePreference::Ideas, UseCasePreference::Inspiration]
                .into_iter()
                .map(|option| {
                    let mark = if chosen == Some(option) { "(•)" } else { "( )" };
                    let style = if chosen == Some(option) {
                        highlight
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    Line::styled(format!("{}{} {}", VALUE_INDENT, mark, option.label()), style)
                })
                .collect()
        }
    }
}

fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let caption = app.loading_caption(now).unwrap_or_default();
    let frame = match &app.view {
        ViewState::Loading(loading) => {
            let ticks = now.saturating_duration_since(loading.started).as_millis() / 250;
            SPINNER[(ticks as usize) % SPINNER.len()]
        }
        _ => SPINNER[0],
    };

    let lines = vec![
        Line::default(),
        Line::styled(frame, Style::default().fg(Color::Yellow)),
        Line::default(),
        Line::styled(caption, Style::default().add_modifier(Modifier::BOLD)),
        Line::default(),
        Line::styled(
            "Dit duurt ongeveer 30 seconden...",
            Style::default().fg(Color::Gray),
        ),
    ];
    let loading = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

fn render_result(f: &mut Frame, app: &App, payload: &ResultPayload, area: Rect) {
    let heading = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::default(), Line::styled("✔ Klaar!", heading), Line::default()];

    match payload {
        ResultPayload::Informational { message, contact } => {
            lines.push(Line::from(message.clone()));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::raw("De AI-scan voor "),
                Span::styled(
                    contact.company_name().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" is aangevraagd."),
            ]));
            if !contact.email().is_empty() {
                lines.push(Line::styled(
                    format!("Het rapport wordt verstuurd naar {}.", contact.email()),
                    Style::default().fg(Color::Gray),
                ));
            }
        }
        ResultPayload::Document { company_name, .. } => {
            lines.push(Line::from(vec![
                Span::raw("De AI-scan voor "),
                Span::styled(
                    company_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(" is gereed."),
            ]));
            lines.push(Line::default());
            lines.push(Line::styled(
                format!(
                    "[d] Download PDF Rapport ({})",
                    DocumentRepository::file_name(company_name)
                ),
                Style::default().fg(Color::Yellow),
            ));
            if let Some(path) = &app.saved_document {
                lines.push(Line::from(format!("Opgeslagen: {}", path.display())));
            }
            lines.push(Line::default());
            lines.push(Line::styled(
                "Er is ook een kopie verstuurd naar je email.",
                Style::default().fg(Color::Gray),
            ));
        }
    }

    let result = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(result, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.active_alert().is_some() {
        "Enter/Esc: sluiten".to_string()
    } else if let Some(status) = &app.status_message {
        status.clone()
    } else {
        match &app.view {
            ViewState::Form(form) if form.wizard.is_last() => {
                "Tab/↑↓: veld | Enter: start analyse | Esc: terug | Ctrl+C: stoppen".to_string()
            }
            ViewState::Form(_) => {
                "Tab/↑↓: veld | ←→: kiezen | Enter: volgende stap | Esc: terug | Ctrl+C: stoppen"
                    .to_string()
            }
            ViewState::Loading(_) => "Even geduld... | Ctrl+C: stoppen".to_string(),
            ViewState::Result(ResultPayload::Document { .. }) => {
                "d: download rapport | q: afsluiten".to_string()
            }
            ViewState::Result(_) => "q: afsluiten".to_string(),
        }
    };

    let style = match &app.view {
        ViewState::Form(form) if form.error.is_some() => Style::default().fg(Color::Red),
        ViewState::Form(_) => Style::default(),
        ViewState::Loading(_) => Style::default().fg(Color::Cyan),
        ViewState::Result(_) => Style::default().fg(Color::Green),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_alert_popup(f: &mut Frame, message: &str) {
    let area = f.area();
    let width = (area.width * 3 / 5).max(20).min(area.width);
    let height = 5.min(area.height);
    let popup_area = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    f.render_widget(Clear, popup_area);
    let alert = Paragraph::new(vec![Line::from(message.to_string()), Line::from("[Enter] OK")])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Melding")
                .style(Style::default().fg(Color::Red)),
        );
    f.render_widget(alert, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Acknowledgement, ResponseMode, SubmissionError, SubmissionOutcome,
    };
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::PathBuf;

    fn render_to_string(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn submitted_app(mode: ResponseMode) -> App {
        let mut app = App::new(mode, PathBuf::from("."));
        app.fields.set(Field::CompanyName, "Acme");
        app.fields.set(Field::Url, "https://acme.nl");
        app.fields.set(Field::Name, "Jan");
        app.fields.set(Field::Email, "jan@acme.nl");
        for _ in 0..3 {
            app.next_step().unwrap();
        }
        app
    }

    #[test]
    fn test_first_step_renders_fields_and_progress() {
        let app = App::default();
        let screen = render_to_string(&app);
        assert!(screen.contains("SYMBIS | AI SCAN"));
        assert!(screen.contains("Stap 1/4"));
        assert!(screen.contains("Start jouw AI Scan"));
        assert!(screen.contains("Bedrijfsnaam *"));
        assert!(screen.contains("Bijv. Symbis"));
        assert!(screen.contains("25%"));
        assert!(screen.contains("Zakelijke dienstverlening"));
    }

    #[test]
    fn test_use_case_description_hidden_until_ideas_chosen() {
        let mut app = submitted_app(ResponseMode::Informational);
        app.previous_step();
        let screen = render_to_string(&app);
        assert!(screen.contains("Nee, ik wil inspiratie"));
        assert!(!screen.contains("Beschrijf kort je use cases"));

        app.choose_use_case(UseCasePreference::Ideas);
        let screen = render_to_string(&app);
        assert!(screen.contains("Beschrijf kort je use cases"));
    }

    #[test]
    fn test_loading_view() {
        let mut app = submitted_app(ResponseMode::Informational);
        app.begin_submission().unwrap();
        let screen = render_to_string(&app);
        assert!(screen.contains("Dit duurt ongeveer 30 seconden..."));
        assert!(screen.contains("Website scannen..."));
        assert!(!screen.contains("Bedrijfsnaam"));
    }

    #[test]
    fn test_failure_shows_inline_error_and_alert() {
        let mut app = submitted_app(ResponseMode::Informational);
        let submission = app.begin_submission().unwrap();
        app.complete_submission(
            submission.id,
            SubmissionOutcome::Failure(SubmissionError::Service {
                status: 500,
                message: "Server exploded".into(),
            }),
        );
        let screen = render_to_string(&app);
        assert!(screen.contains("Server exploded"));
        assert!(screen.contains("Melding"));

        app.dismiss_alert();
        let screen = render_to_string(&app);
        assert!(screen.contains("Server exploded"));
        assert!(!screen.contains("Melding"));
    }

    #[test]
    fn test_informational_result_mentions_email_only_when_known() {
        let mut app = submitted_app(ResponseMode::Informational);
        app.fields.set(Field::Email, "jan@acme.nl");
        let submission = app.begin_submission().unwrap();
        app.complete_submission(
            submission.id,
            SubmissionOutcome::Success(Acknowledgement::Informational {
                message: "Bedankt!".into(),
                company_name: Some("Acme BV".into()),
                email: None,
            }),
        );
        let screen = render_to_string(&app);
        assert!(screen.contains("Bedankt!"));
        assert!(screen.contains("Acme BV"));
        assert!(screen.contains("verstuurd naar jan@acme.nl"));
    }

    #[test]
    fn test_document_result_offers_download() {
        let mut app = submitted_app(ResponseMode::Document);
        let submission = app.begin_submission().unwrap();
        app.complete_submission(
            submission.id,
            SubmissionOutcome::Success(Acknowledgement::Document {
                document: b"%PDF".to_vec(),
                company_name: "Acme".into(),
            }),
        );
        let screen = render_to_string(&app);
        assert!(screen.contains("Symbis_Scan_Acme.pdf"));
        assert!(screen.contains("d: download rapport"));
    }
}
