use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::Serialize;

use crate::config::EffectiveConfig;
use crate::core::{AnalysisResult, StatusTier};
use crate::input::InputSource;
use crate::report::MarkdownOptions;
use crate::ui::UiConfig;
use crate::view::{GlyphSet, ResultView, Theme, ViewOptions};

#[derive(Debug, Parser)]
#[command(
    name = "credview",
    version,
    about = "미디어 신뢰도 분석 결과(JSON)를 터미널/Markdown/JSON 뷰로 보여줍니다"
)]
pub struct Cli {
    #[arg(long, global = true)]
    pub json: bool,
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
    #[arg(long, global = true)]
    pub verbose: bool,
    #[arg(long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true)]
    pub strict: bool,
    #[arg(long, global = true)]
    pub glyphs: Option<GlyphSet>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Show(InputArgs),
    Status(InputArgs),
    Report(ReportArgs),
    Ui(InputArgs),
    Completion(CompletionArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Analysis result JSON; `-` or omitted reads stdin.
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    pub input: Option<PathBuf>,
    #[arg(long)]
    pub no_transcript: bool,
}

#[derive(Debug, Args)]
pub struct CompletionArgs {
    pub shell: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(long)]
    pub show: bool,
}

#[derive(Debug, Serialize)]
struct StatusSummary {
    tier: StatusTier,
    label: &'static str,
    score: i32,
    is_fake: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose, cli.quiet);

    let stdin_is_tty = io::stdin().is_terminal();
    let stdout_is_tty = io::stdout().is_terminal();

    let home_dir = crate::config::home_dir().map_err(crate::exit::invalid_args_err)?;
    let env_config_path = std::env::var_os("CREDVIEW_CONFIG").map(PathBuf::from);
    let cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(crate::exit::invalid_args_err)?;

    let color = stdout_is_tty && cfg.ui.color && !cli.no_color;
    let glyphs = cli.glyphs.unwrap_or(cfg.theme.glyphs);
    let ui_cfg = UiConfig {
        theme: Theme::new(color, glyphs),
        bar_width: cfg.ui.bar_width,
        stdin_is_tty,
        stdout_is_tty,
        quiet: cli.quiet,
    };
    let strict = cli.strict || cfg.input.strict;
    let view_opts = ViewOptions {
        step_columns: cfg.ui.steps_columns,
    };
    tracing::debug!(color, glyphs = %glyphs, strict, "settings resolved");

    match cli.command {
        Commands::Show(args) => {
            let data = load_input(args.input.as_deref(), strict)?;
            let view = crate::view::render(&data, &view_opts);
            if cli.json {
                write_json(&view)?;
            } else {
                crate::ui::print_result(&view, &ui_cfg)?;
            }
        }
        Commands::Status(args) => {
            let data = load_input(args.input.as_deref(), strict)?;
            let badge = crate::view::status_badge(data.credibility_score);
            if cli.json {
                write_json(&StatusSummary {
                    tier: badge.tier,
                    label: badge.label,
                    score: data.credibility_score,
                    is_fake: data.is_fake,
                })?;
            } else {
                crate::ui::print_status(&badge, &ui_cfg)?;
            }
        }
        Commands::Report(args) => {
            if cli.json {
                return Err(crate::exit::invalid_args(
                    "report는 --json과 함께 사용할 수 없습니다(show --json을 사용하세요)",
                ));
            }
            let data = load_input(args.input.as_deref(), strict)?;
            let view = crate::view::render(&data, &view_opts);
            let include_transcript = cfg.report.include_transcript && !args.no_transcript;
            write_markdown(&view, &MarkdownOptions::now(include_transcript), &ui_cfg)?;
        }
        Commands::Ui(args) => {
            if cli.json {
                return Err(crate::exit::invalid_args("ui는 --json과 함께 사용할 수 없습니다"));
            }
            let source = InputSource::from_arg(args.input.as_deref());
            if source.is_stdin() {
                return Err(crate::exit::invalid_args(
                    "ui는 입력 파일 경로가 필요합니다(표준 입력은 키 입력에 사용됩니다)",
                ));
            }
            if !(ui_cfg.stdin_is_tty && ui_cfg.stdout_is_tty) {
                return Err(crate::exit::invalid_args(
                    "ui는 TTY가 필요합니다(stdin + stdout)",
                ));
            }
            let data = load_source(&source, strict)?;
            let view = crate::view::render(&data, &view_opts);
            let theme = Theme::new(cfg.ui.color && !cli.no_color, glyphs);
            crate::tui::run(view, theme)?;
        }
        Commands::Completion(args) => {
            let shell = parse_shell(&args.shell)?;
            let mut cmd = Cli::command();
            let mut out = std::io::stdout().lock();
            clap_complete::generate(shell, &mut cmd, "credview", &mut out);
        }
        Commands::Config(args) => {
            if args.show {
                show_config(&cfg, cli.json)?;
            } else if !ui_cfg.quiet {
                eprintln!("config: `credview config --show`를 사용하세요");
            }
        }
    }

    Ok(())
}

fn load_input(path: Option<&Path>, strict: bool) -> Result<AnalysisResult> {
    load_source(&InputSource::from_arg(path), strict)
}

fn load_source(source: &InputSource, strict: bool) -> Result<AnalysisResult> {
    let data = crate::input::load(source).map_err(crate::exit::invalid_input_err)?;
    let warnings = crate::input::inspect(&data);
    if strict && !warnings.is_empty() {
        let lines: Vec<String> = warnings.iter().map(|w| format!("- {w}")).collect();
        return Err(crate::exit::invalid_input(format!(
            "--strict: 입력이 데이터 조건을 만족하지 않습니다({}건)\n{}",
            warnings.len(),
            lines.join("\n")
        )));
    }
    Ok(data)
}

fn write_json<T: Serialize>(value: &T) -> Result<()> {
    use std::io::Write;

    let buf = serde_json::to_vec_pretty(value)?;

    let mut stdout = std::io::stdout().lock();
    crate::ui::ignore_broken_pipe(
        stdout
            .write_all(&buf)
            .and_then(|()| stdout.write_all(b"\n")),
    )
}

fn write_markdown(view: &ResultView, opts: &MarkdownOptions, ui_cfg: &UiConfig) -> Result<()> {
    use std::io::Write;

    if ui_cfg.quiet {
        return Ok(());
    }
    let markdown = crate::report::format_markdown(view, opts);
    let mut stdout = std::io::stdout().lock();
    crate::ui::ignore_broken_pipe(stdout.write_all(markdown.as_bytes()))
}

fn show_config(cfg: &EffectiveConfig, json: bool) -> Result<()> {
    if json {
        return write_json(cfg);
    }
    let s = toml::to_string_pretty(cfg).context("설정을 TOML로 직렬화하지 못했습니다")?;
    println!("{s}");
    Ok(())
}

fn parse_shell(s: &str) -> Result<clap_complete::Shell> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "bash" => Ok(clap_complete::Shell::Bash),
        "zsh" => Ok(clap_complete::Shell::Zsh),
        "fish" => Ok(clap_complete::Shell::Fish),
        other => Err(crate::exit::invalid_args(format!(
            "지원하지 않는 셸입니다: {other}(bash|zsh|fish 중 하나를 지정하세요)"
        ))),
    }
}
