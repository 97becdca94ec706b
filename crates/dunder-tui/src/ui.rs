use chrono::Datelike;
use dunder_core::{AgentConfig, ChatMessage, ChatRole, Page, Route};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{block::Title, Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, ChatPage, ConversationView, FocusPane, InputMode};
use crate::markdown::render_markdown;
use unicode_width::UnicodeWidthChar;

const SIDEBAR_WIDTH: u16 = 34;
const WRAP: Wrap = Wrap { trim: false };

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [sidebar_area, main_area] = Layout::horizontal([
        Constraint::Length(SIDEBAR_WIDTH),
        Constraint::Min(0),
    ])
    .areas(body_area);

    render_header(frame, header_area);
    render_sidebar(app, frame, sidebar_area);

    match app.route.page() {
        Page::About => {
            app.thread_area = None;
            render_about(frame, main_area);
        }
        Page::Chat(_) => render_chat_page(app, frame, main_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" DUNDER MIFFLIN ", Style::default().fg(Color::White).bold()),
        Span::styled("· DunderAI ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let busy = app.chat.as_ref().map_or(false, |c| c.is_busy());
    let (mode_text, hints) = match (app.input_mode, app.focus) {
        (InputMode::Editing, _) if busy => (" AGUARDE ", " Esc: sair da edição "),
        (InputMode::Editing, _) => (" EDITAR ", " Enter: enviar  Esc: sair da edição "),
        (InputMode::Normal, FocusPane::Sidebar) => (
            " MENU ",
            " j/k: mover  Enter: abrir  1-6: atalho  Tab: conversa  q: sair ",
        ),
        (InputMode::Normal, FocusPane::Chat) => (
            " CHAT ",
            " i: escrever  j/k: mensagens  r: replay áudio  t: relatório  PgUp/PgDn/End: rolar  Tab: menu ",
        ),
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(" {} ", app.dispatcher.base_url()),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

fn render_sidebar(app: &mut App, frame: &mut Frame, area: Rect) {
    app.sidebar_area = Some(area);

    let focused = app.focus == FocusPane::Sidebar;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Dunder Mifflin ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [nav_area, copyright_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(inner);

    let rule = "─".repeat(inner.width.saturating_sub(2) as usize);
    let mut lines = vec![
        Line::from(Span::styled(
            "Limitless Paper in a Paperless World",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
        Line::default(),
    ];

    for (i, route) in Route::all().into_iter().enumerate() {
        if let Some(section) = route.section() {
            lines.push(Line::from(Span::styled(
                rule.clone(),
                Style::default().fg(Color::DarkGray),
            )));
            if !section.is_empty() {
                lines.push(Line::from(Span::styled(
                    section.to_uppercase(),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
                )));
            }
        }

        let active = route == app.route;
        let marker = if active { "▌" } else { " " };
        let mut style = if active {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if focused && i == app.sidebar_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{} {}", route.icon(), route.label().to_uppercase()), style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(WRAP), nav_area);

    let copyright = Paragraph::new(vec![
        Line::from(format!("© {} Dunder Mifflin Inc.", chrono::Local::now().year())),
        Line::from("Scranton Branch"),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(copyright, copyright_area);
}

fn render_about(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Sobre a Dunder Mifflin ".bold());

    let text = Text::from(vec![
        Line::from(Span::styled(
            "SOBRE A DUNDER MIFFLIN",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
        Line::default(),
        Line::from(Span::styled(
            "\"Pessoas compram de pessoas.\"",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(
            "Fundada em 1949 por Robert Dunder e Robert Mifflin, a Dunder Mifflin Inc. começou como \
             uma fornecedora de suportes metálicos para construção civil. No entanto, a verdadeira \
             paixão dos fundadores sempre foi o papel.",
        ),
        Line::default(),
        Line::from(
            "Hoje, somos uma empresa de médio porte fornecedora de papel regional com orgulho, \
             sediada no nordeste dos Estados Unidos. Nossa filial de Scranton, PA, sob a gerência \
             regional (muitas vezes questionável) de Michael Scott, consistentemente supera as \
             expectativas, provando que o toque humano ainda importa num mundo cada vez mais digital.",
        ),
        Line::default(),
        Line::from(Span::styled(
            "NOSSA MISSÃO",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(
            "Fornecer papel de qualidade superior para empresas locais, superando as grandes cadeias \
             através de um serviço ao cliente inigualável, entrega rápida e, ocasionalmente, cestas \
             de presentes com descontos questionáveis.",
        ),
        Line::default(),
        Line::from(Span::styled(
            "Escolha um departamento no menu para falar com a DunderAI.",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ]);

    frame.render_widget(Paragraph::new(text).block(block).wrap(WRAP), area);
}

fn render_chat_page(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Chat;
    let editing = app.input_mode == InputMode::Editing;
    let frame_no = app.animation_frame;
    let Some(page) = app.chat.as_mut() else {
        return;
    };
    let agent = page.agent();

    let intro = agent.description.or(agent.quote);
    let intro_height = if intro.is_some() { 4 } else { 2 };

    let [intro_area, thread_area, input_area] = Layout::vertical([
        Constraint::Length(intro_height),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    render_page_intro(agent, frame, intro_area);

    app.thread_area = Some(thread_area);
    render_thread(page, focused, frame_no, frame, thread_area);
    render_input(page, editing, frame, input_area);
}

fn render_page_intro(agent: &AgentConfig, frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        format!("{} {}", agent.icon, agent.heading.to_uppercase()),
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))];
    if let Some(description) = agent.description {
        lines.push(Line::default());
        lines.push(Line::from(description));
    } else if let Some(quote) = agent.quote {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            quote,
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(WRAP), area);
}

/// The lines for one message, label first, followed by a blank separator.
fn message_lines(
    agent: &AgentConfig,
    msg: &ChatMessage,
    selected: bool,
    expanded: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let (label, label_style, base) = match (msg.role, msg.is_error) {
        (ChatRole::User, _) => (
            "Você ◂".to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Cyan),
        ),
        (ChatRole::Assistant, true) => (
            format!("⚠ {}", agent.title),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Red),
        ),
        (ChatRole::Assistant, false) => (
            format!("{} {}", agent.icon, agent.title),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default(),
        ),
    };
    let label_style = if selected {
        label_style.add_modifier(Modifier::REVERSED)
    } else {
        label_style
    };
    let alignment = match msg.role {
        ChatRole::User => Alignment::Right,
        ChatRole::Assistant => Alignment::Left,
    };

    lines.push(Line::from(Span::styled(label, label_style)).alignment(alignment));
    for line in render_markdown(&msg.content, base) {
        lines.push(line.alignment(alignment));
    }

    if msg.audio.is_some() {
        lines.push(Line::from(Span::styled(
            "▶ Replay Áudio [r]",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
    }

    if let Some(details) = &msg.technical_data {
        let arrow = if expanded { "▾" } else { "▸" };
        lines.push(Line::from(Span::styled(
            format!("{} Ver Relatório Técnico (Confidencial) [t]", arrow),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        )));
        if expanded {
            for detail in details.lines() {
                lines.push(Line::from(Span::styled(
                    format!("│ {}", detail),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }

    lines.push(Line::default());
    lines
}

fn processing_lines(agent: &AgentConfig, frame_no: u8) -> Vec<Line<'static>> {
    // Animated ellipsis: cycles through ".", "..", "..."
    let dots = ".".repeat(frame_no as usize + 1);
    vec![
        Line::from(Span::styled(
            format!("{} {}", agent.icon, agent.title),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("● ● ● Processando requisição{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ]
}

fn wrapped_height(lines: &[Line<'static>], width: u16) -> u16 {
    let count = Paragraph::new(lines.to_vec()).wrap(WRAP).line_count(width);
    u16::try_from(count).unwrap_or(u16::MAX)
}

fn render_thread(page: &mut ChatPage, focused: bool, frame_no: u8, frame: &mut Frame, area: Rect) {
    let agent = page.agent();
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" {} {} ", agent.icon, agent.title),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    if let Some(file) = agent.portrait_file() {
        block = block.title(
            Title::from(Span::styled(
                format!(" retrato: {} ", file),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Right),
        );
    }
    let inner = block.inner(area);

    let view: &mut ConversationView = &mut page.view;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut offsets = Vec::with_capacity(page.widget.session().messages().len());
    let mut total: u16 = 0;

    for (i, msg) in page.widget.session().messages().iter().enumerate() {
        let chunk = message_lines(
            agent,
            msg,
            view.selected == Some(i),
            view.expanded.contains(&i),
        );
        offsets.push(total);
        total = total.saturating_add(wrapped_height(&chunk, inner.width));
        lines.extend(chunk);
    }

    if page.widget.is_busy() {
        let chunk = processing_lines(agent, frame_no);
        total = total.saturating_add(wrapped_height(&chunk, inner.width));
        lines.extend(chunk);
    }

    view.height = inner.height;
    view.max_scroll = total.saturating_sub(inner.height);
    view.message_offsets = offsets;
    view.scroll = if view.follow {
        view.max_scroll
    } else {
        view.scroll.min(view.max_scroll)
    };

    let thread = Paragraph::new(lines)
        .block(block)
        .wrap(WRAP)
        .scroll((view.scroll, 0));
    frame.render_widget(thread, area);
}

fn render_input(page: &ChatPage, editing: bool, frame: &mut Frame, area: Rect) {
    let busy = page.is_busy();
    let border_color = if busy {
        Color::DarkGray
    } else if editing {
        Color::Yellow
    } else {
        Color::Gray
    };
    let title = if busy { " Aguarde a resposta... " } else { " Mensagem (i para escrever) " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_x) = input_window(&page.input, page.cursor, inner_width);

    let content = if page.input.is_empty() {
        Span::styled(page.agent().placeholder(), Style::default().fg(Color::DarkGray))
    } else {
        let color = if busy { Color::DarkGray } else { Color::Cyan };
        Span::styled(visible, Style::default().fg(color))
    };

    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if editing && !busy {
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

/// Part of `input` that fits in `width` columns with the cursor in view, plus
/// the cursor column inside it. Widths are display cells, not chars.
fn input_window(input: &str, cursor: usize, width: usize) -> (String, u16) {
    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    let cells = |c: &char| c.width().unwrap_or(0);

    // Scroll right until the text before the cursor plus the cursor cell fits
    let mut start = 0;
    let mut before: usize = chars[..cursor].iter().map(cells).sum();
    while start < cursor && before + 1 > width {
        before -= cells(&chars[start]);
        start += 1;
    }

    let mut used = 0;
    let visible: String = chars[start..]
        .iter()
        .take_while(|c| {
            used += cells(*c);
            used <= width
        })
        .collect();
    (visible, before as u16)
}
