use std::env;
use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fruitopia_contracts::chat::{
    parse_chat_input, BoundedHistoryStore, ChatInput, ChatMessage, FileKeyValueStore, Sender,
    CHAT_HELP_COMMANDS, QUICK_ACTIONS,
};
use fruitopia_contracts::recommend::RecommendationQuery;
use fruitopia_contracts::vision::{Classification, ImageUpload, LOW_CONFIDENCE_THRESHOLD};
use fruitopia_engine::{ChatSession, ClientConfig, ExploreOutcome, ExploreView, FruitopiaClient};
use serde_json::{json, Map, Value};

const DEFAULT_HISTORY_FILE: &str = "fruitopia_chat_history.json";

#[derive(Debug, Parser)]
#[command(name = "fruitopia", version, about = "Fruitopia API client")]
struct Cli {
    /// Base URL for same-origin routes and static explore assets.
    #[arg(long, global = true)]
    origin: Option<String>,
    /// Backend API base URL.
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Chat history file.
    #[arg(long, global = true)]
    history: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a fruit's detail record, nutrition breakdown, and gallery.
    Explore(ExploreArgs),
    /// Classify a fruit photo.
    Classify(ClassifyArgs),
    Samples(SamplesArgs),
    Recommend(RecommendArgs),
    Diseases,
    Classes,
    /// Every class with its sample file names.
    Gallery,
    Fruits(FruitsArgs),
    Chat,
    History(HistoryArgs),
}

#[derive(Debug, Parser)]
struct ExploreArgs {
    name: String,
    /// Block until the sample gallery is known.
    #[arg(long)]
    wait: bool,
}

#[derive(Debug, Parser)]
struct ClassifyArgs {
    #[arg(long)]
    image: PathBuf,
}

#[derive(Debug, Parser)]
struct SamplesArgs {
    #[arg(long = "class")]
    class_name: String,
    #[arg(long)]
    count: Option<u32>,
}

#[derive(Debug, Parser)]
struct RecommendArgs {
    /// Disease picked from the list.
    #[arg(long, default_value = "")]
    disease: String,
    /// Free-text disease; wins over --disease.
    #[arg(long)]
    typed: Option<String>,
    /// Fruits already at hand.
    #[arg(long, value_delimiter = ',')]
    have: Vec<String>,
}

#[derive(Debug, Parser)]
struct FruitsArgs {
    #[arg(long)]
    category: Option<String>,
}

#[derive(Debug, Parser)]
struct HistoryArgs {
    #[command(subcommand)]
    action: HistoryAction,
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    Show,
    Clear,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("fruitopia error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ClientConfig::from_env()
        .with_origin(cli.origin.as_deref())
        .with_api_base(cli.api_base.as_deref());
    let history_path = history_path(cli.history);
    let client = FruitopiaClient::new(config);

    match cli.command {
        Command::Explore(args) => run_explore(&client, args),
        Command::Classify(args) => run_classify(&client, args),
        Command::Samples(args) => {
            let count = args.count.unwrap_or(client.config().sample_count);
            let samples = client.samples(&args.class_name, count)?;
            print_json(&json!({ "samples": samples }))
        }
        Command::Recommend(args) => {
            let query = RecommendationQuery::new(&args.disease, args.typed.as_deref(), args.have);
            let response = client.recommend(&query)?;
            if let Some(message) = response.message.as_deref() {
                println!("{message}");
            }
            for item in &response.recommendations {
                let reason = item.reason.as_deref().unwrap_or("");
                match item.sample_image_url(&client.config().api_base) {
                    Some(url) => println!("{}: {reason} ({url})", item.class_name),
                    None => println!("{}: {reason}", item.class_name),
                }
            }
            Ok(0)
        }
        Command::Diseases => {
            let diseases = client.diseases()?;
            print_json(&json!({ "diseases": diseases }))
        }
        Command::Classes => {
            let classes = client.classes()?;
            print_json(&json!({ "classes": classes }))
        }
        Command::Gallery => {
            let gallery = client
                .class_gallery()?
                .into_iter()
                .map(|(class_name, samples)| (class_name, json!(samples)))
                .collect::<Map<String, Value>>();
            print_json(&Value::Object(gallery))
        }
        Command::Fruits(args) => print_json(&client.fruits(args.category.as_deref())?),
        Command::Chat => run_chat(client, history_path),
        Command::History(args) => run_history(history_path, args.action),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn history_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| {
        env::var("FRUITOPIA_HISTORY_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
    .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE))
}

fn print_json(value: &Value) -> Result<i32> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(0)
}

fn run_explore(client: &FruitopiaClient, args: ExploreArgs) -> Result<i32> {
    match client.explore(&args.name)? {
        ExploreOutcome::NoData { key, tried } => {
            for attempt in &tried {
                log::debug!("{}: {}", attempt.locator, attempt.failure);
            }
            println!("Could not load data for {key}");
            Ok(2)
        }
        ExploreOutcome::Ready {
            mut view,
            mut pending,
            source,
        } => {
            log::info!("loaded from {source}");
            if args.wait {
                pending.wait(&mut view);
            } else {
                pending.try_merge(&mut view);
            }
            print_json(&view_summary(&view))
        }
    }
}

fn view_summary(view: &ExploreView) -> Value {
    json!({
        "name": view.record.display_name(),
        "macros": view.nutrition.macros,
        "percentages": view.percentages,
        "arcs": view.arcs,
        "gradient": view.gradient,
        "vitamins": view.nutrition.vitamins,
        "minerals": view.nutrition.minerals,
        "map": view.map,
        "pairings": view.pairings,
        "propagation": view.propagation,
        "gallery": view.gallery,
        "hero_image": view.gallery.as_ref().and_then(|gallery| gallery.hero_image()),
    })
}

fn run_classify(client: &FruitopiaClient, args: ClassifyArgs) -> Result<i32> {
    let upload = ImageUpload::from_path(&args.image)?;
    let predictions = client.classify(&upload)?;
    if let Some(source) = predictions.source.as_deref() {
        log::info!("prediction source: {source}");
    }
    match predictions.gate(LOW_CONFIDENCE_THRESHOLD) {
        Classification::Confident(list) => {
            for prediction in list {
                println!("{} {:.0}%", prediction.class, prediction.score * 100.0);
            }
            Ok(0)
        }
        Classification::LowConfidence { top } => {
            println!(
                "This does not look like a fruit (best guess {} at {:.0}%).",
                top.class,
                top.score * 100.0
            );
            Ok(3)
        }
        Classification::NoPredictions => {
            println!("No predictions returned.");
            Ok(3)
        }
    }
}

fn run_chat(client: FruitopiaClient, history_path: PathBuf) -> Result<i32> {
    let mut session = ChatSession::new(client, FileKeyValueStore::new(history_path));
    session.open();
    for message in session.messages() {
        print_message(message);
    }
    for (idx, action) in QUICK_ACTIONS.iter().enumerate() {
        println!("  /quick {} {}", idx + 1, action.label);
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match stdin.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        match parse_chat_input(line.trim_end_matches(['\n', '\r'])) {
            ChatInput::Noop => {}
            ChatInput::Message(text) => {
                if let Some(reply) = session.send(&text) {
                    print_message(reply);
                }
            }
            ChatInput::Quick(index) => {
                if let Some(reply) = session.send_quick_action(index) {
                    print_message(reply);
                }
            }
            ChatInput::Clear => {
                session.clear()?;
                for message in session.messages() {
                    print_message(message);
                }
            }
            ChatInput::History => {
                for message in session.full_history() {
                    print_message(message);
                }
            }
            ChatInput::Minimize => {
                session.minimize();
                let state = if session.panel().minimized {
                    "minimized"
                } else {
                    "restored"
                };
                println!("Chat {state}.");
            }
            ChatInput::Close => break,
            ChatInput::Help => println!("Commands: {}", CHAT_HELP_COMMANDS.join(" ")),
            ChatInput::Unknown { command, .. } => {
                println!("Unknown command /{command}. Type /help for commands.");
            }
        }
    }
    session.close()?;
    Ok(0)
}

fn run_history(history_path: PathBuf, action: HistoryAction) -> Result<i32> {
    let mut history = BoundedHistoryStore::new(FileKeyValueStore::new(history_path));
    match action {
        HistoryAction::Show => {
            if history.load().is_empty() {
                println!("No chat history.");
            }
            for message in history.history() {
                print_message(message);
            }
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("Chat history cleared.");
        }
    }
    Ok(0)
}

fn print_message(message: &ChatMessage) {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    let stamp = message.timestamp.format("%H:%M");
    println!("[{stamp}] {who}: {}", message.text);
    if let Some(card) = message.card() {
        println!("    {} ({:.0}%): {}", card.name, card.score * 100.0, card.reason);
    }
}
