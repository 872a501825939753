//! Koala Wrap CLI
//!
//! Breaks plain text into lines with the Koala inline line breaker.
//!
//! Without `--font`, every character is one unit wide and `--width` is a
//! column count. With a font file, widths are pixels at `--font-size`.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use koala_common::warning::warning_count;
use koala_inline::{
    BlockContainer, FragmentContent, InlineLayout, InlineNode, InlineNodeBuilder, InlineStyle,
    IntrinsicAtomicLayout, LineBox, LineBreakContext, WhiteSpace, WordBreak,
};
use koala_text::{FontdueFontMetrics, MetricsShaper, MonospaceMetrics, Shaper, UnicodeBreakOracle};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Koala Wrap: break text into lines the way Koala lays out inline content
#[derive(Parser, Debug)]
#[command(name = "koala-wrap")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Wrap a file to 60 columns
    koala-wrap --width 60 notes.txt

    # Wrap standard input, keeping newlines and spaces
    cat poem.txt | koala-wrap --white-space pre-wrap

    # Show line widths and overflowing lines
    koala-wrap --annotate --width 20 --text 'Supercalifragilistic words'

    # Break with a real font, 400px lines, JSON output
    koala-wrap --font DejaVuSans.ttf --font-size 16 --width 400 --json page.txt
"#)]
struct Cli {
    /// Text file to wrap; standard input if omitted or `-`
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Wrap this string instead of reading a file
    #[arg(long, value_name = "TEXT", conflicts_with = "path")]
    text: Option<String>,

    /// Line width, in columns or in pixels with --font
    #[arg(short, long, default_value = "80")]
    width: f32,

    /// TrueType or OpenType font used to measure text
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Font size in pixels, used with --font
    #[arg(long, default_value = "16")]
    font_size: f32,

    /// CSS white-space: normal, pre, nowrap, pre-wrap or pre-line
    #[arg(long, default_value = "normal")]
    white_space: WhiteSpace,

    /// CSS word-break: normal, break-all, keep-all or break-word
    #[arg(long, default_value = "normal")]
    word_break: WordBreak,

    /// Content language (BCP 47), e.g. `ja`
    #[arg(long, value_name = "TAG")]
    lang: Option<String>,

    /// Tab stop spacing, in spaces
    #[arg(long, default_value = "8")]
    tab_size: u32,

    /// Prefix every line with its width and mark overflowing lines
    #[arg(short, long)]
    annotate: bool,

    /// Print line boxes as JSON
    #[arg(long, conflicts_with = "annotate")]
    json: bool,
}

/// A paragraph and the line boxes it broke into.
#[derive(Debug, Serialize)]
struct Paragraph {
    text: String,
    lines: Vec<LineBox>,
}

/// Everything `--json` prints.
#[derive(Debug, Serialize)]
struct Output {
    width: f32,
    white_space: WhiteSpace,
    word_break: WordBreak,
    paragraphs: Vec<Paragraph>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.width.is_nan() || cli.width <= 0.0 {
        anyhow::bail!("--width must be a positive number, got {}", cli.width);
    }

    let input = read_input(&cli)?;
    let font = cli.font.as_deref().map(load_font).transpose()?;
    let paragraphs = match &font {
        Some(font) => wrap(&cli, &MetricsShaper::new(FontdueFontMetrics::new(font)), &input)?,
        None => wrap(&cli, &MetricsShaper::new(MonospaceMetrics::default()), &input)?,
    };

    if cli.json {
        let output = Output {
            width: cli.width,
            white_space: cli.white_space,
            word_break: cli.word_break,
            paragraphs,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("serializing line boxes")?
        );
        return Ok(());
    }

    for (i, paragraph) in paragraphs.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in &paragraph.lines {
            print_line(line, cli.annotate);
        }
    }
    if cli.annotate && warning_count() > 0 {
        eprintln!(
            "{}",
            format!("{} layout warning(s)", warning_count()).yellow()
        );
    }
    Ok(())
}

/// Read the text to wrap from `--text`, a file or standard input.
fn read_input(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    match &cli.path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut input = String::new();
            let _ = io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

fn load_font(path: &Path) -> Result<fontdue::Font> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| anyhow::anyhow!("failed to parse font {}: {e}", path.display()))
}

/// Break `input` into paragraphs of line boxes.
///
/// When newlines collapse, blank lines separate paragraphs. When they are
/// preserved the whole input is one paragraph and newlines force breaks.
fn wrap(cli: &Cli, shaper: &dyn Shaper, input: &str) -> Result<Vec<Paragraph>> {
    let style = InlineStyle {
        font_size: cli.font_size,
        white_space: cli.white_space,
        word_break: cli.word_break,
        locale: cli.lang.clone(),
        tab_size: cli.tab_size,
        ..InlineStyle::default()
    };

    let sources: Vec<&str> = if cli.white_space.preserve_newline() {
        vec![input.strip_suffix('\n').unwrap_or(input)]
    } else {
        input
            .split("\n\n")
            .filter(|paragraph| !paragraph.trim().is_empty())
            .collect()
    };

    sources
        .into_iter()
        .map(|source| -> Result<Paragraph> {
            let mut builder = InlineNodeBuilder::new(style.clone());
            builder.append_text(source);
            let node = builder.finish().context("failed to build inline content")?;
            Ok(Paragraph {
                text: node.text().to_string(),
                lines: layout_lines(shaper, cli.width, &node),
            })
        })
        .collect()
}

fn layout_lines(shaper: &dyn Shaper, width: f32, node: &InlineNode) -> Vec<LineBox> {
    let line_height = shaper.line_height(node.root_style().font_size);
    let mut oracle = UnicodeBreakOracle::new(node.text());
    let mut container = BlockContainer::new(width).with_line_height(line_height);
    let mut atomic_layout = IntrinsicAtomicLayout;
    let mut ctx = LineBreakContext {
        shaper,
        oracle: &mut oracle,
        container: &mut container,
        atomic_layout: &mut atomic_layout,
    };

    let mut layout = InlineLayout::new(0.0);
    layout.layout(node, &mut ctx);
    layout.line_boxes
}

fn print_line(line: &LineBox, annotate: bool) {
    let text: String = line
        .fragments
        .iter()
        .filter_map(|fragment| match &fragment.content {
            FragmentContent::Text { text, .. } => Some(text.as_str()),
            FragmentContent::Tab { .. } => Some("\t"),
            _ => None,
        })
        .collect();

    if !annotate {
        println!("{text}");
        return;
    }
    let width = format!("{:>8.2}", line.bounds.width);
    if line.has_overflow {
        println!("{} {} {}", width.red(), "│".dimmed(), text.red());
    } else {
        println!("{} {} {text}", width.dimmed(), "│".dimmed());
    }
}
