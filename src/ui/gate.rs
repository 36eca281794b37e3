use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::help_line;
use crate::gate::{Field, GateForm};

const ACCENT: Color = Color::Rgb(200, 120, 255);

fn input_box<'a>(label: &'a str, value: String, focused: bool) -> Paragraph<'a> {
    let border = if focused { Color::Rgb(0, 255, 255) } else { Color::Rgb(70, 70, 90) };
    let mut spans = vec![Span::styled(value, Style::default().fg(Color::White))];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(border).add_modifier(Modifier::SLOW_BLINK)));
    }
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(label),
    )
}

pub fn render_gate(frame: &mut Frame, area: Rect, form: &GateForm) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(" 🔐 Assignment Gate ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.min(60);
    let column = Rect::new(inner.x + (inner.width - width) / 2, inner.y, width, inner.height);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(column);

    frame.render_widget(
        Paragraph::new(format!("{} assignments available", form.gate.len())).style(Style::default().fg(Color::Gray)),
        rows[0],
    );
    frame.render_widget(
        input_box(" Assignment ", form.assignment.clone(), form.focus == Field::Assignment),
        rows[1],
    );
    // Never echo the password itself
    let masked = "•".repeat(form.password.chars().count());
    frame.render_widget(input_box(" Password ", masked, form.focus == Field::Password), rows[2]);

    let result = match &form.result {
        Some(Ok(url)) => Paragraph::new(vec![
            Line::styled("Redirect to:", Style::default().fg(Color::Rgb(0, 255, 0)).add_modifier(Modifier::BOLD)),
            Line::styled(url.clone(), Style::default().fg(Color::Rgb(0, 255, 255)).add_modifier(Modifier::UNDERLINED)),
        ]),
        Some(Err(msg)) => Paragraph::new(Line::styled(msg.clone(), Style::default().fg(Color::Rgb(255, 69, 0)))),
        None => Paragraph::new(""),
    };
    frame.render_widget(result.wrap(Wrap { trim: false }), rows[3]);

    frame.render_widget(
        Paragraph::new(help_line(&[("Enter", "Next / Submit"), ("Backspace", "Delete"), ("Tab", "Next tab"), ("Esc", "Menu")])),
        rows[5],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::PasswordGate;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_password_is_masked() {
        let mut form = GateForm::new(PasswordGate::builtin());
        for c in "912dj".chars() {
            form.push(c);
        }
        form.enter();
        for c in "hunter2".chars() {
            form.push(c);
        }
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| render_gate(f, f.area(), &form)).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("912dj"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("•••••••"));
    }
}
