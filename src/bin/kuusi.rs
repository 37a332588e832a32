use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use kuusi::{LayoutParams, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "kuusi", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the whole reading forest as a PNG.
    Forest(ForestArgs),
    /// Render one group's tree as a PNG.
    Tree(TreeArgs),
    /// Render a year-in-reading summary card from a JSON questionnaire.
    Card(CardArgs),
    /// Dump one group's computed geometry as JSON.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct ForestArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Dataset TSV (group, member, word count, title, review); defaults to
    /// the embedded dataset.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Raster scale factor.
    #[arg(long, default_value_t = 2.0)]
    scale: f64,

    /// Seed for ornament and snow randomness (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct TreeArgs {
    /// Group id (e.g. 1号).
    #[arg(long)]
    group: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Dataset TSV; defaults to the embedded dataset.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Raster scale factor.
    #[arg(long, default_value_t = 2.0)]
    scale: f64,

    /// Seed for ornament randomness (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct CardArgs {
    /// Input questionnaire JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Raster scale factor.
    #[arg(long, default_value_t = 2.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Group id (e.g. 1号).
    #[arg(long)]
    group: String,

    /// Dataset TSV; defaults to the embedded dataset.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for ornament randomness (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Forest(args) => cmd_forest(args),
        Command::Tree(args) => cmd_tree(args),
        Command::Card(args) => cmd_card(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn read_records(data: Option<&PathBuf>) -> anyhow::Result<Vec<kuusi::ReadingRecord>> {
    let text = match data {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read dataset '{}'", path.display()))?,
        None => kuusi::EMBEDDED_RECORDS.to_string(),
    };
    Ok(kuusi::parse_records(&text)?)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn cmd_forest(args: ForestArgs) -> anyhow::Result<()> {
    let records = read_records(args.data.as_ref())?;
    let mut rng = make_rng(args.seed);
    let scene = kuusi::forest_scene(&records, &LayoutParams::default(), &mut rng)?;
    kuusi::render_svg_to_png(&scene.svg, RenderOptions { scale: args.scale }, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_tree(args: TreeArgs) -> anyhow::Result<()> {
    let records = read_records(args.data.as_ref())?;
    let mut rng = make_rng(args.seed);
    let svg = kuusi::tree_scene(&records, &args.group, &LayoutParams::default(), &mut rng)?;
    kuusi::render_svg_to_png(&svg, RenderOptions { scale: args.scale }, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_card(args: CardArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read card '{}'", args.in_path.display()))?;
    let card = kuusi::ReadingCard::from_json(&text)?;
    if card.name.trim().is_empty() {
        anyhow::bail!("card 'name' must be non-empty");
    }
    let svg = kuusi::card_svg(&card);
    kuusi::render_svg_to_png(&svg, RenderOptions { scale: args.scale }, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let records = read_records(args.data.as_ref())?;
    let params = LayoutParams::default();
    let estimator = kuusi::CharCountEstimator::from_params(&params);
    let mut rng = make_rng(args.seed);

    let group = kuusi::group_records(&records)
        .into_iter()
        .find(|g| g.id == args.group)
        .with_context(|| format!("unknown group '{}'", args.group))?;
    let layout = kuusi::layout_tree(&group.sorted_titles(), &params, &estimator, &mut rng);
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
