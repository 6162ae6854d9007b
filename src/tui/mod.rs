use std::io;
use std::panic;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, Paragraph, Tabs, Wrap,
};

use crate::view::{EvidenceNode, EvidenceSection, ResultView, TextPanel, Theme, Tone, VerdictPanel};

pub fn run(view: ResultView, theme: Theme) -> Result<()> {
    enable_raw_mode().context("raw 모드 활성화")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("대체 화면 전환")?;

    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("터미널 초기화")?;
    terminal.clear().ok();

    let res = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        run_app(&mut terminal, &view, &theme)
    }));

    let _ = terminal.show_cursor();
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);

    match res {
        Ok(res) => res,
        Err(_) => Err(anyhow::anyhow!(
            "TUI 내부에서 panic이 발생했습니다(터미널 상태는 복구되었습니다)"
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Transcript = 0,
    Summary = 1,
    Evidence = 2,
    Verdict = 3,
}

/// Step rows shown before the strip clips.
const MAX_STEP_ROWS: usize = 8;

const TAB_TITLES: [&str; 4] = ["1 텍스트", "2 요약", "3 근거", "4 판정"];

impl Tab {
    fn next(self) -> Self {
        match self {
            Tab::Transcript => Tab::Summary,
            Tab::Summary => Tab::Evidence,
            Tab::Evidence => Tab::Verdict,
            Tab::Verdict => Tab::Transcript,
        }
    }

    fn prev(self) -> Self {
        match self {
            Tab::Transcript => Tab::Verdict,
            Tab::Summary => Tab::Transcript,
            Tab::Evidence => Tab::Summary,
            Tab::Verdict => Tab::Evidence,
        }
    }

    fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Tab::Transcript),
            '2' => Some(Tab::Summary),
            '3' => Some(Tab::Evidence),
            '4' => Some(Tab::Verdict),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct App {
    tab: Tab,
    scroll: u16,
    show_help: bool,
}

impl App {
    fn new() -> Self {
        Self {
            tab: Tab::Transcript,
            scroll: 0,
            show_help: false,
        }
    }

    fn select_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.scroll = 0;
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &ResultView,
    theme: &Theme,
) -> Result<()> {
    let mut app = App::new();
    let tick_rate = Duration::from_millis(200);

    loop {
        terminal
            .draw(|f| draw(f, &app, view, theme))
            .context("화면 그리기")?;

        if event::poll(tick_rate).context("이벤트 대기")? {
            if let Event::Key(key) = event::read().context("이벤트 읽기")? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key) {
                    break;
                }
            }
        }
    }

    tracing::debug!("viewer closed");
    Ok(())
}

/// Returns true when the viewer should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.select_tab(app.tab.next()),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.select_tab(app.tab.prev()),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(tab) = Tab::from_digit(c) {
                app.select_tab(tab);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll = app.scroll.saturating_add(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll = app.scroll.saturating_sub(1),
        KeyCode::PageDown => app.scroll = app.scroll.saturating_add(10),
        KeyCode::PageUp => app.scroll = app.scroll.saturating_sub(10),
        KeyCode::Home | KeyCode::Char('g') => app.scroll = 0,
        _ => {}
    }
    false
}

fn draw(f: &mut ratatui::Frame, app: &App, view: &ResultView, theme: &Theme) {
    let step_rows = view.steps.rows().count().clamp(1, MAX_STEP_ROWS) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Length(2 + step_rows * 2),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_header(f, chunks[0], view, theme);
    draw_charts(f, chunks[1], view, theme);
    draw_steps(f, chunks[2], view, theme);

    let tabs = Tabs::new(TAB_TITLES)
        .select(app.tab as usize)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
    f.render_widget(tabs, chunks[3]);

    let (title, body) = match app.tab {
        Tab::Transcript => (view.transcript.title, panel_text(&view.transcript, theme)),
        Tab::Summary => (view.summary.title, panel_text(&view.summary, theme)),
        Tab::Evidence => (view.evidence.title, evidence_text(&view.evidence, theme)),
        Tab::Verdict => ("최종 판정", verdict_text(&view.verdict, theme)),
    };
    let w = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(w, chunks[4]);

    let footer = Line::from(Span::styled(
        "Tab/←→: 탭 전환  ↑↓/j/k: 스크롤  ?: 도움말  q: 종료",
        Style::default().fg(Theme::tui_color(Tone::Muted)),
    ));
    f.render_widget(Paragraph::new(footer), chunks[5]);

    if app.show_help {
        draw_help(f, f.size());
    }
}

fn draw_header(f: &mut ratatui::Frame, area: Rect, view: &ResultView, theme: &Theme) {
    let badge = &view.header.status;
    let line = Line::from(vec![
        Span::styled(view.header.title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!("{} {} ({}%)", theme.glyph(badge.icon), badge.label, badge.score),
            tone_style(badge.tone, theme).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            view.header.filename.clone(),
            Style::default().fg(Theme::tui_color(Tone::Muted)),
        ),
    ]);
    let w = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(w, area);
}

fn draw_charts(f: &mut ratatui::Frame, area: Rect, view: &ResultView, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let donut = &view.score_chart;
    let [trusted, doubt] = &donut.segments;
    let gauge_style = if theme.color {
        Style::default()
            .fg(Theme::tui_color(trusted.tone))
            .bg(Theme::tui_color(doubt.tone))
    } else {
        Style::default()
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(donut.title))
        .gauge_style(gauge_style)
        .percent(u16::from(trusted.value))
        .label(format!(
            "{} {}  ({} {})",
            donut.center_label, donut.caption, doubt.label, doubt.value
        ));
    f.render_widget(gauge, cols[0]);

    let chart = &view.impact_chart;
    let block = Block::default().borders(Borders::ALL).title(chart.title);
    if chart.bars.is_empty() {
        let w = Paragraph::new("(근거 없음)").block(block);
        f.render_widget(w, cols[1]);
        return;
    }

    let bar_width = chart
        .bars
        .iter()
        .map(|b| crate::ui::visible_width_ansi(&b.label))
        .max()
        .unwrap_or(3)
        .clamp(3, 12) as u16;
    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .map(|b| {
            Bar::default()
                .value(u64::from(b.value))
                .text_value(format!("{}%", b.value))
                .label(Line::from(b.label.clone()))
                .style(tone_style(b.tone, theme))
        })
        .collect();
    let w = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(100);
    f.render_widget(w, cols[1]);
}

fn draw_steps(f: &mut ratatui::Frame, area: Rect, view: &ResultView, theme: &Theme) {
    let steps = &view.steps;
    let mut lines = Vec::<Line>::new();
    if steps.cells.is_empty() {
        lines.push(Line::from("(처리 기록 없음)"));
    }
    for row in steps.rows() {
        let mut labels = Vec::<Span>::new();
        let mut stamps = Vec::<Span>::new();
        for cell in row {
            labels.push(Span::styled(
                format!("{} ", theme.glyph(cell.icon)),
                tone_style(Tone::Positive, theme),
            ));
            labels.push(Span::raw(format!("{}   ", cell.label)));
            stamps.push(Span::styled(
                format!("{}   ", cell.timestamp),
                Style::default().fg(Theme::tui_color(Tone::Muted)),
            ));
        }
        lines.push(Line::from(labels));
        lines.push(Line::from(stamps));
    }

    let w = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(steps.title));
    f.render_widget(w, area);
}

fn panel_text(panel: &TextPanel, theme: &Theme) -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", theme.glyph(panel.icon), panel.description),
            tone_style(panel.tone, theme),
        )),
        Line::from(""),
    ];
    if panel.body.trim().is_empty() {
        lines.push(Line::from("(비어 있음)"));
    } else {
        lines.extend(panel.body.lines().map(|l| Line::from(l.to_string())));
    }
    Text::from(lines)
}

fn evidence_text(section: &EvidenceSection, theme: &Theme) -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", theme.glyph(section.icon), section.subtitle),
            tone_style(section.tone, theme),
        )),
        Line::from(""),
    ];
    if section.items.is_empty() {
        lines.push(Line::from("(근거 없음)"));
    }

    let (fill, empty) = theme.bar_cells();
    for node in &section.items {
        match node {
            EvidenceNode::Block(block) => {
                let style = tone_style(block.tone, theme);
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", theme.glyph(block.icon)), style),
                    Span::styled(
                        block.category.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" "),
                    Span::styled(format!("[{}]", block.badge), style),
                ]));
                lines.extend(
                    block
                        .description
                        .lines()
                        .map(|l| Line::from(format!("  {l}"))),
                );
                let filled = crate::ui::scaled_cells(block.progress, 20);
                lines.push(Line::from(vec![
                    Span::raw(format!("  {} {:>4}  ", block.impact_caption, block.impact_label)),
                    Span::styled(fill.repeat(filled), style),
                    Span::styled(
                        empty.repeat(20 - filled),
                        Style::default().fg(Theme::tui_color(Tone::Muted)),
                    ),
                ]));
            }
            EvidenceNode::Divider => lines.push(Line::from(Span::styled(
                theme.rule().repeat(40),
                Style::default().fg(Theme::tui_color(Tone::Muted)),
            ))),
        }
    }
    Text::from(lines)
}

fn verdict_text(panel: &VerdictPanel, theme: &Theme) -> Text<'static> {
    Text::from(vec![
        Line::from(Span::styled(
            format!("{} {}", theme.glyph(panel.icon), panel.title),
            tone_style(panel.tone, theme).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(panel.message),
    ])
}

fn draw_help(f: &mut ratatui::Frame, area: Rect) {
    let text = Text::from(vec![
        Line::from(Span::styled(
            "credview 뷰어",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  Tab / → / l     : 다음 탭"),
        Line::from("  Shift-Tab / ← / h: 이전 탭"),
        Line::from("  1-4             : 탭 바로 선택"),
        Line::from("  ↑↓ / j/k        : 스크롤"),
        Line::from("  PgUp / PgDn     : 10줄 스크롤"),
        Line::from("  g / Home        : 맨 위로"),
        Line::from("  ?               : 도움말 닫기"),
        Line::from("  q / Esc         : 종료"),
        Line::from("  Ctrl-C          : 강제 종료"),
    ]);

    let popup = centered_rect(60, 60, area);
    f.render_widget(Clear, popup);
    let w = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("도움말"))
        .wrap(Wrap { trim: false });
    f.render_widget(w, popup);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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

fn tone_style(tone: Tone, theme: &Theme) -> Style {
    if !theme.color {
        return Style::default();
    }
    Style::default().fg(Theme::tui_color(tone))
}
