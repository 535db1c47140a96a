//! chatdesk - Actor-based terminal chat client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async backend calls

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use chatdesk::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME, USER_ID_ENV};
use chatdesk::dialogs::DialogView;
use chatdesk::messages::ui_events::{key_to_ui_event, InputMode, ScreenKind};
use chatdesk::navigation::{AppTab, Route, SettingsItem};
use chatdesk::ui::{centered_rect, palette, presence_color, render_input, render_list, render_tabs, Palette};
use chatdesk::{
    ApiClient, AppActor, Config, GroupService, LocalStore, NetworkActor, NetworkCommand,
    NetworkResponse, RenderState, UiEvent, UserService,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;

    // Initialize logging to file; the terminal belongs to the UI
    let file_appender = tracing_appender::rolling::never(&config.data_dir, LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let store = Arc::new(LocalStore::open(config.storage_path()));
    if let Ok(user_id) = std::env::var(USER_ID_ENV) {
        if !user_id.trim().is_empty() {
            store.set_user_id(&user_id)?;
        }
    }
    tracing::info!(base_url = %config.api_base_url, user = ?store.user_id(), "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let api = ApiClient::new(config.api_base_url.clone());
    let network_actor = NetworkActor::new(
        GroupService::new(api.clone(), Arc::clone(&store)),
        UserService::new(api),
        net_resp_tx,
    );
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(store, config.api_base_url.clone(), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();
    let colors = palette(state.theme);
    f.render_widget(Block::default().style(Style::default().bg(colors.background).fg(colors.text)), area);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, colors, main_chunks[0]);

    match &state.route {
        Route::ChatList => draw_chat_list(f, state, colors, main_chunks[1]),
        Route::Conversation(_) => draw_conversation(f, state, colors, main_chunks[1]),
        Route::Search => draw_search(f, state, colors, main_chunks[1]),
        Route::SettingsList => draw_settings(f, state, colors, main_chunks[1]),
        Route::Account => draw_account(f, state, colors, main_chunks[1]),
        Route::About => draw_about(f, colors, main_chunks[1]),
    }

    draw_status_bar(f, state, colors, main_chunks[2]);

    if let Some(dialog) = &state.dialog {
        draw_dialog(f, dialog, colors, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, colors: Palette, area: Rect) {
    let titles: Vec<String> = AppTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!(" {}:{} ", i + 1, tab.title()))
        .collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    let selected = AppTab::ALL.iter().position(|t| *t == state.tab).unwrap_or(0);
    f.render_widget(render_tabs(&titles, selected, colors), area);
}

fn draw_chat_list(f: &mut Frame, state: &RenderState, colors: Palette, area: Rect) {
    let items: Vec<ListItem> = state
        .groups
        .iter()
        .map(|group| {
            let members = if group.members.is_empty() {
                String::new()
            } else {
                format!("  ({} members)", group.members.len())
            };
            ListItem::new(Line::from(vec![
                Span::styled("# ", Style::default().fg(colors.accent)),
                Span::raw(group.name.clone()),
                Span::styled(members, Style::default().fg(colors.muted)),
            ]))
        })
        .collect();

    let title = if state.groups_loading {
        String::from(" Groups (loading...) ")
    } else {
        format!(" Groups ({}) ", state.groups.len())
    };

    let mut list_state = ListState::default();
    if !state.groups.is_empty() {
        list_state.select(Some(state.selected_group));
    }
    f.render_stateful_widget(render_list(items, title, colors), area, &mut list_state);
}

fn draw_conversation(f: &mut Frame, state: &RenderState, colors: Palette, area: Rect) {
    let Route::Conversation(recipient) = &state.route else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Messages
            Constraint::Length(3), // Composer
        ])
        .split(area);

    let kind = if recipient.is_group() { "group" } else { "contact" };
    let header = Line::from(vec![
        Span::styled("● ", Style::default().fg(presence_color(recipient.status))),
        Span::styled(recipient.title().to_string(), Style::default().fg(colors.accent).bold()),
        Span::styled(format!("  [{}]", kind), Style::default().fg(colors.muted)),
    ]);
    f.render_widget(Paragraph::new(header), chunks[0]);

    let own_id = state.user_id.as_deref().unwrap_or_default();
    let lines: Vec<Line> = state
        .messages
        .iter()
        .map(|msg| {
            let who = if msg.sender_id == own_id { "you" } else { msg.sender_id.as_str() };
            let mut spans = vec![
                Span::styled(
                    format!("{} ", msg.timestamp.with_timezone(&chrono::Local).format("%H:%M")),
                    Style::default().fg(colors.muted),
                ),
                Span::styled(format!("{}: ", who), Style::default().fg(colors.accent)),
            ];
            let body_style = if msg.is_deleted {
                Style::default().fg(colors.muted).italic()
            } else {
                Style::default()
            };
            spans.push(Span::styled(msg.display_body(), body_style));
            for (emoji, count) in msg.reaction_counts() {
                spans.push(Span::styled(format!("  {}{}", emoji, count), Style::default().fg(Color::Yellow)));
            }
            Line::from(spans)
        })
        .collect();

    // Keep the newest messages in view
    let visible = chunks[1].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Messages "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(log, chunks[1]);

    let editing = state.key_context.input_mode == InputMode::Editing;
    let composer = render_input(
        &state.composer,
        " Message (i: type, Enter: send) ",
        editing,
        Some(state.composer_cursor),
        colors,
    );
    f.render_widget(composer, chunks[2]);
}

fn draw_search(f: &mut Frame, state: &RenderState, colors: Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = state.key_context.input_mode == InputMode::Editing;
    f.render_widget(
        render_input(&state.search_query, " Tag name (/ to type) ", editing, Some(state.search_cursor), colors),
        chunks[0],
    );

    if state.search_results.is_empty() {
        let text = if state.search_loading {
            String::from("Searching...")
        } else {
            state.search_notice.clone().unwrap_or_default()
        };
        let notice = Paragraph::new(text)
            .style(Style::default().fg(colors.muted))
            .block(Block::default().borders(Borders::ALL).title(" Results "));
        f.render_widget(notice, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .search_results
        .iter()
        .map(|user| {
            let tag = user.tag_name.as_deref().unwrap_or(&user.username);
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(presence_color(user.status))),
                Span::raw(user.shown_name().to_string()),
                Span::styled(format!("  @{}", tag), Style::default().fg(colors.muted)),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_result));
    let title = format!(" Results ({}) ", state.search_results.len());
    f.render_stateful_widget(render_list(items, title, colors), chunks[1], &mut list_state);
}

fn draw_settings(f: &mut Frame, state: &RenderState, colors: Palette, area: Rect) {
    let items: Vec<ListItem> = SettingsItem::ALL
        .iter()
        .map(|item| {
            let value = match item {
                SettingsItem::Theme => format!("  [{}]", state.theme),
                _ => String::new(),
            };
            ListItem::new(vec![
                Line::from(vec![Span::raw(item.label()), Span::styled(value, Style::default().fg(colors.accent))]),
                Line::styled(format!("  {}", item.description()), Style::default().fg(colors.muted)),
            ])
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(state.settings_selected));
    f.render_stateful_widget(render_list(items, String::from(" Settings "), colors), area, &mut list_state);
}

fn draw_account(f: &mut Frame, state: &RenderState, colors: Palette, area: Rect) {
    let user = state.user_id.as_deref().unwrap_or("(not signed in)");
    let lines = vec![
        Line::from(vec![Span::styled("User id:  ", Style::default().fg(colors.muted)), Span::raw(user)]),
        Line::from(vec![
            Span::styled("Backend:  ", Style::default().fg(colors.muted)),
            Span::raw(state.api_base_url.as_str()),
        ]),
        Line::from(""),
        Line::styled(
            format!("Set {} before launch to sign in as another user.", USER_ID_ENV),
            Style::default().fg(colors.muted),
        ),
    ];
    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Account "));
    f.render_widget(body, area);
}

fn draw_about(f: &mut Frame, colors: Palette, area: Rect) {
    let lines = vec![
        Line::styled(format!("{} {}", APP_NAME, APP_VERSION), Style::default().fg(colors.accent).bold()),
        Line::from("Terminal client for the group chat backend."),
    ];
    let body = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" About "));
    f.render_widget(body, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, colors: Palette, area: Rect) {
    let hints = if state.key_context.dialog.is_some() {
        "Enter:confirm | Esc:cancel"
    } else if state.key_context.input_mode == InputMode::Editing {
        "Esc:stop editing | Enter:submit | arrows:move"
    } else {
        match state.key_context.screen {
            ScreenKind::ChatList => "Enter:open | r:refresh | n:new group | ?:help | q:quit",
            ScreenKind::Conversation { is_group: true } => "i:type | a:attach | d:delete | +:react | R:rename | Esc:back",
            ScreenKind::Conversation { is_group: false } => "i:type | a:attach | d:delete | +:react | N:nickname | Esc:back",
            ScreenKind::Search => "/:type | Enter:open chat | ?:help | q:quit",
            ScreenKind::SettingsList => "Enter:select | ?:help | q:quit",
            ScreenKind::Detail => "Esc:back",
        }
    };

    let bar = Line::from(vec![
        Span::styled(format!(" {} ", state.status), Style::default().fg(colors.accent)),
        Span::styled(format!(" {} ", hints), Style::default().fg(colors.muted)),
    ]);
    f.render_widget(Paragraph::new(bar), area);
}

fn draw_dialog(f: &mut Frame, dialog: &DialogView, colors: Palette, area: Rect) {
    match dialog {
        DialogView::TextPrompt { title, label, value, cursor } => {
            let popup = centered_rect(50, 20, area);
            f.render_widget(Clear, popup);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.accent))
                .title(title.as_str());
            let inner = block.inner(popup);
            f.render_widget(block, popup);
            let field_area = Rect { height: inner.height.min(3), ..inner };
            let label = format!(" {} ", label);
            f.render_widget(render_input(value, &label, true, Some(*cursor), colors), field_area);
        }
        DialogView::Choice { title, options, selected } => {
            let popup = centered_rect(30, 40, area);
            f.render_widget(Clear, popup);
            let items: Vec<ListItem> = options.iter().map(|o| ListItem::new(o.as_str())).collect();
            let mut list_state = ListState::default();
            list_state.select(Some(*selected));
            f.render_stateful_widget(render_list(items, title.clone(), colors), popup, &mut list_state);
        }
        DialogView::Preview { title, lines } => {
            let popup = centered_rect(60, 30, area);
            f.render_widget(Clear, popup);
            let mut text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
            text.push(Line::from(""));
            text.push(Line::styled("Enter/y: attach   Esc/n: discard", Style::default().fg(colors.muted)));
            let body = Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.accent))
                    .title(title.as_str()),
            );
            f.render_widget(body, popup);
        }
    }
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 CHATDESK - Keyboard Shortcuts

 NAVIGATION
   1 / 2 / 3          Chats / Search / Settings
   ↑ ↓ (j k)          Move selection
   Enter              Open selected item
   Esc / Backspace    Back

 CHATS
   r                  Refresh groups
   n                  New group

 CONVERSATION
   i / e              Type a message, Enter sends
   a                  Attach a file
   d                  Delete your last message
   +                  React to the last message
   N / R              Nickname (contact) / Rename (group)

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
