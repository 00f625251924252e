use bubblenet::{FieldLayout, Item, LayoutOptions, Viewport, Weighted};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Layout(bubblenet::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<bubblenet::Error> for CliError {
    fn from(value: bubblenet::Error) -> Self {
        Self::Layout(value)
    }
}

/// One upstream record. Everything beyond `id` and `weight` is carried through untouched so
/// renderers downstream of the CLI keep their metadata.
#[derive(Debug, Deserialize)]
struct InputRecord {
    id: String,
    #[serde(default)]
    weight: f64,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
struct Payload {
    weight: f64,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

impl Weighted for Payload {
    fn weight(&self) -> f64 {
        self.weight
    }
}

#[derive(Serialize)]
struct StatsOut<'a> {
    skipped: usize,
    bubbles: &'a [bubblenet::PlacedBubble<Payload>],
}

#[derive(Debug)]
struct Args {
    input: Option<String>,
    width: f64,
    height: f64,
    max_visible: Option<usize>,
    seed: Option<u64>,
    pretty: bool,
    with_stats: bool,
}

fn usage() -> &'static str {
    "bubblenet-cli\n\
\n\
USAGE:\n\
  bubblenet-cli [--width <w>] [--height <h>] [--max-visible <n>] [--seed <n>] [--pretty] [--stats] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON array of records: [{\"id\": \"BTC\", \"weight\": 123.4, ...}, ...].\n\
  - Output is a JSON array of placements; --stats wraps it with the skipped-item count.\n\
  - The viewport defaults to 1280x800.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        input: None,
        width: 1280.0,
        height: 800.0,
        max_visible: None,
        seed: None,
        pretty: false,
        with_stats: false,
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--stats" => args.with_stats = true,
            "--width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.width = w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.height = h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--max-visible" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.max_visible = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--seed" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = Some(n.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            other if other.starts_with("--") => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let records: Vec<InputRecord> = serde_json::from_str(&text)?;

    let items: Vec<Item<Payload>> = records
        .into_iter()
        .map(|r| {
            Item::new(
                r.id,
                Payload {
                    weight: r.weight,
                    extra: r.extra,
                },
            )
        })
        .collect();

    let mut opts = LayoutOptions::default();
    if let Some(n) = args.max_visible {
        opts.max_visible = n;
    }
    if let Some(seed) = args.seed {
        opts.seed = seed;
    }

    let field: FieldLayout<Payload> =
        bubblenet::layout(&items, Viewport::new(args.width, args.height), &opts)?;

    if args.with_stats {
        write_json(
            &StatsOut {
                skipped: field.skipped,
                bubbles: &field.bubbles,
            },
            args.pretty,
        )
    } else {
        write_json(&field.bubbles, args.pretty)
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
