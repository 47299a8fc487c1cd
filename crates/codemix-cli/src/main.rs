use analyzers::{handle_analyze, AnalyzeOpts, AnalyzeRequest, InputPayload, OutputArtifact, Task};
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use frame_core::load_frame;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use text_features::Lexicon;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// codemix – code-mixing and engagement measurements for social-media data.
/// Commands:
///   - cmr / roots   --text "..." | --input table.csv   (text on STDIN otherwise)
///   - engagement    --input table.csv | --likes N --comments N --views N
///   - eda / qc      --input table.csv
#[derive(Parser, Debug)]
#[command(
    name = "codemix",
    version,
    about = "Code-mixing ratio, English roots and engagement rates"
)]
struct Cli {
    /// Directory the result files (csv/json) are written to
    #[arg(long, global = true, default_value = "outputs")]
    out_dir: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct TextInput {
    /// The text; read from STDIN when neither --text nor --input is given
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,

    /// Table (.csv or .json) with one text per row
    #[arg(long)]
    input: Option<PathBuf>,

    /// Column holding the text
    #[arg(long, default_value = "text")]
    text_column: String,

    /// Column carried through to every result row (e.g. video_id)
    #[arg(long)]
    id_column: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Share of English tokens per text
    Cmr {
        #[command(flatten)]
        input: TextInput,

        /// English word list, one word per line; narrows what counts as English
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Name of the text column in the output table
        #[arg(long)]
        output_text_column: Option<String>,
    },

    /// English roots inside hybrid tokens (like'ladım, save'ledim)
    Roots {
        #[command(flatten)]
        input: TextInput,

        /// Only lowercase, do not stem
        #[arg(long)]
        no_stem: bool,
    },

    /// (likes + comments) / views * 100, for one video or every table row
    Engagement {
        /// Table with likes, comments and views columns
        #[arg(long, conflicts_with_all = ["likes", "comments", "views"])]
        input: Option<PathBuf>,

        #[arg(long, requires_all = ["comments", "views"])]
        likes: Option<f64>,

        #[arg(long, requires_all = ["likes", "views"])]
        comments: Option<f64>,

        #[arg(long, requires_all = ["likes", "comments"], allow_negative_numbers = true)]
        views: Option<f64>,
    },

    /// Token and character length statistics of a text column
    Eda {
        #[arg(long)]
        input: PathBuf,

        #[arg(long, default_value = "text")]
        text_column: String,
    },

    /// Descriptive statistics, rate averages and Spearman correlations of an engagement table
    Qc {
        #[arg(long)]
        input: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn write_artifacts(
    out_dir: &Path,
    prefix: &str,
    artifacts: &[OutputArtifact],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("failed creating {}", out_dir.display()))?;
    let mut written = Vec::with_capacity(artifacts.len());
    for (i, art) in artifacts.iter().enumerate() {
        let p = match art {
            OutputArtifact::Json { data } => {
                let p = out_dir.join(format!("{}_{}.json", prefix, i));
                fs::write(&p, serde_json::to_string_pretty(data)?)?;
                p
            }
            OutputArtifact::Csv { data } => {
                let p = out_dir.join(format!("{}_{}.csv", prefix, i));
                fs::write(&p, data)?;
                p
            }
        };
        eprintln!("✓ wrote {}", p.display());
        written.push(p);
    }
    Ok(written)
}

fn read_stdin_string() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("failed reading STDIN")?;
    Ok(buf)
}

fn read_table(path: &Path) -> Result<InputPayload> {
    let frame = load_frame(path)
        .with_context(|| format!("failed reading table: {}", path.display()))?;
    Ok(InputPayload::Frame { frame })
}

fn text_payload(input: &TextInput) -> Result<InputPayload> {
    match (&input.text, &input.input) {
        (_, Some(path)) => read_table(path),
        (Some(t), None) => Ok(InputPayload::Text { text: t.clone() }),
        (None, None) => Ok(InputPayload::Text { text: read_stdin_string()? }),
    }
}

fn load_lexicon(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading lexicon: {}", path.display()))?;
    let lexicon = Lexicon::parse(&raw);
    tracing::info!(words = lexicon.len(), path = %path.display(), "lexicon loaded");
    Ok(lexicon.iter().map(str::to_owned).collect())
}

fn run(task: Task, options: AnalyzeOpts, payload: InputPayload, out_dir: &Path) -> Result<()> {
    let single = !matches!(payload, InputPayload::Frame { .. });
    let resp = handle_analyze(AnalyzeRequest { task, options, payload })?;
    if single {
        for art in &resp.artifacts {
            if let OutputArtifact::Json { data } = art {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
        }
    }
    write_artifacts(out_dir, &task.to_string(), &resp.artifacts)?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Cmr { input, lexicon, output_text_column } => {
            let options = AnalyzeOpts {
                lexicon: lexicon.as_deref().map(load_lexicon).transpose()?,
                text_column: Some(input.text_column.clone()),
                output_text_column,
                id_column: input.id_column.clone(),
                ..AnalyzeOpts::default()
            };
            run(Task::Cmr, options, text_payload(&input)?, &cli.out_dir)?;
        }

        Commands::Roots { input, no_stem } => {
            let options = AnalyzeOpts {
                use_stemming: Some(!no_stem),
                text_column: Some(input.text_column.clone()),
                id_column: input.id_column.clone(),
                ..AnalyzeOpts::default()
            };
            run(Task::Roots, options, text_payload(&input)?, &cli.out_dir)?;
        }

        Commands::Engagement { input, likes, comments, views } => {
            let payload = match (input, likes, comments, views) {
                (Some(path), ..) => read_table(&path)?,
                (None, Some(likes), Some(comments), Some(views)) => {
                    InputPayload::Counts { likes, comments, views }
                }
                _ => bail!("pass --input <table> or all of --likes, --comments and --views"),
            };
            run(Task::Engagement, AnalyzeOpts::default(), payload, &cli.out_dir)?;
        }

        Commands::Eda { input, text_column } => {
            let options = AnalyzeOpts { text_column: Some(text_column), ..AnalyzeOpts::default() };
            run(Task::Eda, options, read_table(&input)?, &cli.out_dir)?;
        }

        Commands::Qc { input } => {
            run(Task::Qc, AnalyzeOpts::default(), read_table(&input)?, &cli.out_dir)?;
        }
    }

    Ok(())
}
