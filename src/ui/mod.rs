use anyhow::{Error, Result};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;

use crate::view::{
    BarChart, DonutChart, EvidenceBlock, EvidenceNode, EvidenceSection, Header, ResultView,
    StatusBadge, StepStrip, TextPanel, Theme, Tone, VerdictPanel,
};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub theme: Theme,
    pub bar_width: usize,
    pub stdin_is_tty: bool,
    pub stdout_is_tty: bool,
    pub quiet: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "오류:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "원인:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "다음:");
    let _ = writeln!(
        stderr,
        "  - 자세한 로그를 보려면 `--verbose`를 붙여 다시 실행하세요"
    );
    let _ = writeln!(
        stderr,
        "  - 사용 가능한 명령/옵션은 `credview --help`를 참고하세요"
    );
}

pub fn print_result(view: &ResultView, cfg: &UiConfig) -> Result<()> {
    if cfg.quiet {
        return Ok(());
    }
    let mut out = io::stdout().lock();
    ignore_broken_pipe(write_result(&mut out, view, cfg))
}

pub fn print_status(badge: &StatusBadge, cfg: &UiConfig) -> Result<()> {
    if cfg.quiet {
        return Ok(());
    }
    let mut out = io::stdout().lock();
    ignore_broken_pipe(writeln!(out, "{}", format_badge(badge, &cfg.theme)))
}

pub(crate) fn ignore_broken_pipe(res: io::Result<()>) -> Result<()> {
    match res {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}

pub fn write_result(out: &mut dyn Write, view: &ResultView, cfg: &UiConfig) -> io::Result<()> {
    let theme = &cfg.theme;

    write_header(out, &view.header, theme)?;
    writeln!(out)?;
    write_donut(out, &view.score_chart, theme, cfg.bar_width)?;
    writeln!(out)?;
    write_bars(out, &view.impact_chart, theme, cfg.bar_width)?;
    writeln!(out)?;
    write_steps(out, &view.steps, theme)?;
    writeln!(out)?;
    write_text_panel(out, &view.transcript, theme)?;
    writeln!(out)?;
    write_text_panel(out, &view.summary, theme)?;
    writeln!(out)?;
    write_evidence(out, &view.evidence, theme, cfg.bar_width)?;
    writeln!(out)?;
    write_verdict(out, &view.verdict, theme)
}

pub fn format_badge(badge: &StatusBadge, theme: &Theme) -> String {
    let text = format!(
        "{} {} ({}%)",
        theme.glyph(badge.icon),
        badge.label,
        badge.score
    );
    theme.paint_bold(badge.tone, &text)
}

fn write_header(out: &mut dyn Write, header: &Header, theme: &Theme) -> io::Result<()> {
    writeln!(
        out,
        "{}  {}",
        bold(header.title, theme),
        format_badge(&header.status, theme)
    )?;
    writeln!(out, "{}", theme.paint(Tone::Muted, &header.filename))
}

fn write_section_title(out: &mut dyn Write, title: &str, theme: &Theme) -> io::Result<()> {
    writeln!(out, "{}", bold(title, theme))
}

fn write_donut(
    out: &mut dyn Write,
    chart: &DonutChart,
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    write_section_title(out, chart.title, theme)?;

    let (fill, _) = theme.bar_cells();
    let [trusted, doubt] = &chart.segments;
    let trusted_cells = scaled_cells(trusted.value, width);
    let doubt_cells = width.saturating_sub(trusted_cells);
    writeln!(
        out,
        "  {}{}  {} {}",
        theme.paint(trusted.tone, &fill.repeat(trusted_cells)),
        theme.paint(doubt.tone, &fill.repeat(doubt_cells)),
        bold(&chart.center_label, theme),
        chart.caption
    )?;
    writeln!(
        out,
        "  {} {}  {} {}",
        theme.paint(trusted.tone, trusted.label),
        trusted.value,
        theme.paint(doubt.tone, doubt.label),
        doubt.value
    )
}

fn write_bars(out: &mut dyn Write, chart: &BarChart, theme: &Theme, width: usize) -> io::Result<()> {
    write_section_title(out, chart.title, theme)?;
    if chart.bars.is_empty() {
        return writeln!(out, "  {}", theme.paint(Tone::Muted, "(근거 없음)"));
    }

    let label_w = chart
        .bars
        .iter()
        .map(|b| visible_width_ansi(&b.label))
        .max()
        .unwrap_or(0);
    for bar in &chart.bars {
        writeln!(
            out,
            "  {}  {}  {:>3}%",
            pad_end_display(&bar.label, label_w),
            progress_bar(bar.value, bar.tone, theme, width),
            bar.value
        )?;
    }
    Ok(())
}

fn write_steps(out: &mut dyn Write, steps: &StepStrip, theme: &Theme) -> io::Result<()> {
    write_section_title(out, steps.title, theme)?;
    if steps.cells.is_empty() {
        return writeln!(out, "  {}", theme.paint(Tone::Muted, "(처리 기록 없음)"));
    }

    let icon = |cell: &crate::view::StepCell| theme.paint(Tone::Positive, theme.glyph(cell.icon));
    let cell_texts: Vec<String> = steps
        .cells
        .iter()
        .map(|c| format!("{} {}", icon(c), c.label))
        .collect();
    let cell_w = cell_texts
        .iter()
        .map(|s| visible_width_ansi(s))
        .max()
        .unwrap_or(0);

    for (row_idx, row) in steps.rows().enumerate() {
        let start = row_idx * steps.columns;
        let mut labels = Vec::with_capacity(row.len());
        let mut stamps = Vec::with_capacity(row.len());
        for (offset, cell) in row.iter().enumerate() {
            let w = cell_w.max(visible_width_ansi(&cell.timestamp));
            labels.push(pad_end_display(&cell_texts[start + offset], w));
            stamps.push(pad_end_display(&cell.timestamp, w));
        }
        writeln!(out, "  {}", labels.join("   ").trim_end())?;
        writeln!(
            out,
            "  {}",
            theme.paint(Tone::Muted, stamps.join("   ").trim_end())
        )?;
    }
    Ok(())
}

fn write_text_panel(out: &mut dyn Write, panel: &TextPanel, theme: &Theme) -> io::Result<()> {
    let title = format!("{} {}", theme.glyph(panel.icon), panel.title);
    writeln!(out, "{}", theme.paint_bold(panel.tone, &title))?;
    writeln!(out, "{}", theme.paint(Tone::Muted, panel.description))?;
    write_body(out, &panel.body, theme)
}

fn write_body(out: &mut dyn Write, body: &str, theme: &Theme) -> io::Result<()> {
    if body.trim().is_empty() {
        return writeln!(out, "  {}", theme.paint(Tone::Muted, "(비어 있음)"));
    }
    for line in body.lines() {
        writeln!(out, "  {}", line.trim_end())?;
    }
    Ok(())
}

fn write_evidence(
    out: &mut dyn Write,
    section: &EvidenceSection,
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    let title = format!("{} {}", theme.glyph(section.icon), section.title);
    writeln!(out, "{}", theme.paint_bold(section.tone, &title))?;
    writeln!(out, "{}", theme.paint(Tone::Muted, &section.subtitle))?;
    if section.items.is_empty() {
        return writeln!(out, "  {}", theme.paint(Tone::Muted, "(근거 없음)"));
    }

    for node in &section.items {
        match node {
            EvidenceNode::Block(block) => write_evidence_block(out, block, theme, width)?,
            EvidenceNode::Divider => writeln!(
                out,
                "  {}",
                theme.paint(Tone::Muted, &theme.rule().repeat(width + 8))
            )?,
        }
    }
    Ok(())
}

fn write_evidence_block(
    out: &mut dyn Write,
    block: &EvidenceBlock,
    theme: &Theme,
    width: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "  {} {} [{}]",
        theme.paint(block.tone, theme.glyph(block.icon)),
        bold(&block.category, theme),
        theme.paint(block.tone, block.badge)
    )?;
    for line in block.description.lines() {
        writeln!(out, "    {}", line.trim_end())?;
    }
    writeln!(
        out,
        "    {} {}  {}",
        block.impact_caption,
        pad_start_display(&block.impact_label, 4),
        progress_bar(block.progress, block.tone, theme, width)
    )
}

fn write_verdict(out: &mut dyn Write, panel: &VerdictPanel, theme: &Theme) -> io::Result<()> {
    let title = format!("{} {}", theme.glyph(panel.icon), panel.title);
    writeln!(out, "{}", theme.paint_bold(panel.tone, &title))?;
    writeln!(out, "  {}", panel.message)
}

fn progress_bar(value: u8, tone: Tone, theme: &Theme, width: usize) -> String {
    let (fill, empty) = theme.bar_cells();
    let filled = scaled_cells(value, width);
    format!(
        "{}{}",
        theme.paint(tone, &fill.repeat(filled)),
        theme.paint(Tone::Muted, &empty.repeat(width.saturating_sub(filled)))
    )
}

/// Cells out of `width` for a percentage, rounded half up.
pub fn scaled_cells(percent: u8, width: usize) -> usize {
    let percent = usize::from(percent.min(100));
    (percent * width + 50) / 100
}

fn bold(s: &str, theme: &Theme) -> String {
    if !theme.color {
        return s.to_string();
    }
    format!("\x1b[1m{s}\x1b[0m")
}

fn pad_end_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - w))
}

fn pad_start_display(s: &str, width: usize) -> String {
    let w = visible_width_ansi(s);
    if w >= width {
        return s.to_string();
    }
    format!("{}{}", " ".repeat(width - w), s)
}

pub fn visible_width_ansi(s: &str) -> usize {
    let mut width: usize = 0;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for ch2 in chars.by_ref() {
                if ch2 == 'm' {
                    break;
                }
            }
            continue;
        }
        width = width.saturating_add(UnicodeWidthChar::width(ch).unwrap_or(0));
    }
    width
}
