use std::path::PathBuf;

use clap::{Parser, Subcommand};

use offgen::text_fit::Canvas;
use offgen::{
    BarChart, OutputDir, SlideshowOpts, SpeechOpts, TextCardOpts, parse_labels, parse_values,
    render_slideshow, write_chart, write_docx, write_pdf, write_text_card,
};

#[derive(Parser, Debug)]
#[command(name = "offgen", version)]
struct Cli {
    /// Directory that receives generated artifacts.
    #[arg(long, global = true, default_value = "./outputs")]
    out_dir: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render text centered on a solid canvas as a PNG.
    Image(ImageArgs),
    /// Render a bar chart from comma-separated values as a PNG.
    Chart(ChartArgs),
    /// Write a DOCX with a bold title and justified body.
    Docx(DocArgs),
    /// Write a PDF with a bold title and justified body.
    Pdf(DocArgs),
    /// Render an MP4 slideshow, one slide per line (requires `ffmpeg`).
    Video(VideoArgs),
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// Text to render. Newlines force line breaks.
    text: String,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,
    /// Canvas height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,
    /// Margin on all four sides in pixels.
    #[arg(long, default_value_t = 20)]
    margin: u32,
    /// TrueType font file. A fixed-metric fallback is used if it cannot load.
    #[arg(long, default_value = "arial.ttf")]
    font: PathBuf,
}

#[derive(Parser, Debug)]
struct ChartArgs {
    /// Comma-separated integer bar values, e.g. "5, 3, 7".
    values: String,

    /// Comma-separated bar labels. Defaults to "Item 0", "Item 1", ...
    #[arg(long, default_value = "")]
    labels: String,
    /// TrueType font file for the title and labels.
    #[arg(long, default_value = "arial.ttf")]
    font: PathBuf,
}

#[derive(Parser, Debug)]
struct DocArgs {
    /// Document title.
    title: String,
    /// Document body. Newlines separate paragraphs.
    body: String,
}

#[derive(Parser, Debug)]
struct VideoArgs {
    /// Slideshow text, one slide per line.
    text: String,

    /// Narration text synthesized with espeak and muxed in. Omit for a
    /// silent video.
    #[arg(long)]
    narration_text: Option<String>,
    /// Seconds each slide stays on screen.
    #[arg(long, default_value_t = 2)]
    seconds_per_slide: u32,
    /// Output frame rate.
    #[arg(long, default_value_t = 24)]
    fps: u32,
    /// Narration rate in words per minute.
    #[arg(long, default_value_t = 150)]
    rate_wpm: u32,
    /// TrueType font file for the slides.
    #[arg(long, default_value = "arial.ttf")]
    font: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let out = OutputDir::new(&cli.out_dir)?;

    let path = match cli.cmd {
        Command::Image(args) => {
            let opts = TextCardOpts {
                canvas: Canvas::new(args.width, args.height, args.margin)?,
                font_path: args.font,
                ..TextCardOpts::default()
            };
            write_text_card(&args.text, &opts, &out)?
        }
        Command::Chart(args) => {
            let chart = BarChart::new(parse_values(&args.values)?, parse_labels(&args.labels))?;
            write_chart(&chart, &args.font, &out)?
        }
        Command::Docx(args) => write_docx(&args.title, &args.body, &out)?,
        Command::Pdf(args) => write_pdf(&args.title, &args.body, &out)?,
        Command::Video(args) => {
            let opts = SlideshowOpts {
                card: TextCardOpts {
                    font_path: args.font,
                    ..TextCardOpts::default()
                },
                fps: args.fps,
                seconds_per_slide: args.seconds_per_slide,
                narration: args.narration_text,
                speech: SpeechOpts {
                    rate_wpm: args.rate_wpm,
                    voice: None,
                },
            };
            render_slideshow(&args.text, &opts, &out)?
        }
    };

    println!("{}", path.display());
    Ok(())
}
