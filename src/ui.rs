use ratatui::{prelude::*, widgets::*};

use crate::models::{PresenceStatus, Theme};

/// Colors a theme paints the chrome with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub background: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            accent: Color::Blue,
            text: Color::Black,
            muted: Color::DarkGray,
            background: Color::White,
        },
        Theme::Dark => Palette {
            accent: Color::Cyan,
            text: Color::White,
            muted: Color::DarkGray,
            background: Color::Reset,
        },
        Theme::Blue => Palette {
            accent: Color::LightBlue,
            text: Color::White,
            muted: Color::Gray,
            background: Color::Reset,
        },
        Theme::Green => Palette {
            accent: Color::Green,
            text: Color::White,
            muted: Color::DarkGray,
            background: Color::Reset,
        },
        Theme::Red => Palette {
            accent: Color::LightRed,
            text: Color::White,
            muted: Color::DarkGray,
            background: Color::Reset,
        },
    }
}

/// Presence dot color
pub fn presence_color(status: PresenceStatus) -> Color {
    match status {
        PresenceStatus::Online => Color::Green,
        PresenceStatus::Away => Color::Yellow,
        PresenceStatus::Busy => Color::Red,
        PresenceStatus::Offline => Color::DarkGray,
    }
}

/// Renders a text input field; the cursor is drawn as a reversed cell
pub fn render_input<'a>(
    content: &'a str,
    title: &'a str,
    is_focused: bool,
    cursor_pos: Option<usize>,
    palette: Palette,
) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(palette.muted)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    let line = match cursor_pos {
        Some(pos) if is_focused && pos <= content.len() => {
            let (before, rest) = content.split_at(pos);
            let mut chars = rest.chars();
            let under = chars.next().map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
            Line::from(vec![
                Span::raw(before),
                Span::styled(under, Style::default().add_modifier(Modifier::REVERSED)),
                Span::raw(chars.as_str()),
            ])
        }
        _ => Line::from(content),
    };

    Paragraph::new(line).block(block)
}

/// Renders a selectable list with the chrome's accent color
pub fn render_list<'a>(items: Vec<ListItem<'a>>, title: String, palette: Palette) -> List<'a> {
    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .title(title),
        )
        .highlight_style(Style::default().fg(palette.accent).bold())
        .highlight_symbol("> ")
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize, palette: Palette) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(palette.muted))
        .highlight_style(Style::default().fg(palette.accent).bold())
        .divider("|")
}

/// Rect centered in `r`, sized by percentages
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
