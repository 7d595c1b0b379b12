mod output;
mod telemetry;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracedeck_core::config::Config;
use tracedeck_core::ids::{ConversationId, TraceId};
use tracedeck_core::model::turn::Neighbors;
use tracedeck_core::source::{TraceSource, fetch_conversation, fetch_trace};
use tracedeck_core::view::{DetailView, LoadState, SpanViewState, ViewMode};
use tracedeck_source::ConfiguredSource;

use crate::output::{
    Printer, print_conversation_human, print_conversations_human, print_span_human,
    print_tools_human, print_trace_human,
};
use crate::telemetry::init_cli_tracing;

#[derive(Parser, Debug)]
#[command(name = "tracedeck")]
#[command(about = "Inspect AI agent traces as terminal timelines")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true, conflicts_with = "file", help = "Dashboard base URL")]
    url: Option<String>,

    #[arg(long, global = true, help = "Read traces from a snapshot file")]
    file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ExpandArgs {
    #[arg(long = "expand", value_name = "SPAN_ID", help = "Show content of a span")]
    expand: Vec<String>,
    #[arg(long, help = "Show content of every span")]
    expand_all: bool,
    #[arg(long, default_value = "pretty", help = "pretty or json")]
    view: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "List conversations")]
    Conversations,
    #[command(about = "Show every turn of a conversation on one timeline")]
    Conversation {
        id: String,
        #[command(flatten)]
        expand: ExpandArgs,
    },
    #[command(about = "Show a single trace")]
    Trace {
        id: String,
        #[command(flatten)]
        expand: ExpandArgs,
    },
    #[command(about = "List the tools the agent can call")]
    Tools,
    #[command(about = "Show one span's content")]
    Span {
        trace_id: String,
        span_id: String,
        #[arg(long, default_value = "pretty")]
        view: String,
    },
}

#[derive(Serialize)]
struct DetailOutput<'a, T: Serialize> {
    #[serde(flatten)]
    data: &'a T,
    neighbors: Option<&'a Neighbors>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    let cfg = load_config(cli.url.clone(), cli.file.clone())?;
    let source = ConfiguredSource::from_config(&cfg)
        .await
        .context("open trace source")?;
    let printer = Printer {
        track_width: cfg.track_width,
        color: std::io::stdout().is_terminal(),
    };

    match cli.command {
        Commands::Conversations => {
            let list = source
                .conversations()
                .await
                .context("failed to load conversations")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                print_conversations_human(&list);
            }
            Ok(())
        }
        Commands::Tools => {
            let tools = source.tools().await.context("failed to load tools")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else {
                print_tools_human(&tools);
            }
            Ok(())
        }
        Commands::Conversation { id, expand } => {
            let id = ConversationId::parse(&id)?;
            let mut view = DetailView::new();
            let ticket = view.navigate(id.as_str());
            let (data, neighbors) = fetch_conversation(&source, &id).await;
            view.apply_data(&ticket, data);
            view.apply_neighbors(&ticket, neighbors);

            let timeline = ready(view.state(), "conversation", id.as_str())?;
            let toggles = span_toggles(&expand, timeline.spans().map(|s| s.span.id.as_str()))?;
            *view.spans_mut() = toggles;

            let timeline = ready(view.state(), "conversation", id.as_str())?;
            if cli.json {
                print_json(timeline, view.neighbors())?;
            } else {
                print_conversation_human(&printer, timeline, view.neighbors(), view.spans());
            }
            Ok(())
        }
        Commands::Trace { id, expand } => {
            let id = TraceId::parse(&id)?;
            let mut view = DetailView::new();
            let ticket = view.navigate(id.as_str());
            let (data, neighbors) = fetch_trace(&source, &id).await;
            view.apply_data(&ticket, data);
            view.apply_neighbors(&ticket, neighbors);

            let timeline = ready(view.state(), "trace", id.as_str())?;
            let toggles = span_toggles(&expand, timeline.spans.iter().map(|s| s.span.id.as_str()))?;
            *view.spans_mut() = toggles;

            let timeline = ready(view.state(), "trace", id.as_str())?;
            if cli.json {
                print_json(timeline, view.neighbors())?;
            } else {
                print_trace_human(&printer, timeline, view.neighbors(), view.spans());
            }
            Ok(())
        }
        Commands::Span {
            trace_id,
            span_id,
            view,
        } => {
            let id = TraceId::parse(&trace_id)?;
            let mode = ViewMode::from_str(&view)?;
            let (timeline, _) = fetch_trace(&source, &id).await;
            let timeline = timeline.with_context(|| format!("failed to load trace {id}"))?;
            let Some(span) = timeline.span(&span_id) else {
                bail!("span {span_id} not found in trace {id}");
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(span)?);
            } else {
                print_span_human(&printer, span, mode);
            }
            Ok(())
        }
    }
}

fn load_config(url: Option<String>, file: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut cfg = Config::load()?;
    if let Some(url) = url {
        cfg.source_url = url;
        cfg.source_file = None;
    }
    if let Some(file) = file {
        cfg.source_file = Some(file);
    }
    Ok(cfg)
}

fn ready<'a, T>(state: &'a LoadState<T>, what: &str, id: &str) -> anyhow::Result<&'a T> {
    match state {
        LoadState::Ready(value) => Ok(value),
        LoadState::Failed(message) => bail!("failed to load {what} {id}: {message}"),
        LoadState::Loading => bail!("{what} {id} did not finish loading"),
    }
}

fn span_toggles<'a>(
    args: &ExpandArgs,
    span_ids: impl Iterator<Item = &'a str>,
) -> anyhow::Result<SpanViewState> {
    let mode = ViewMode::from_str(&args.view)?;
    let known: Vec<&str> = span_ids.collect();
    let mut toggles = SpanViewState::default();

    let selected: Vec<&str> = if args.expand_all {
        known.clone()
    } else {
        args.expand.iter().map(String::as_str).collect()
    };
    for span_id in selected {
        if !known.contains(&span_id) {
            tracing::warn!(span_id, "--expand names a span that is not displayed");
            continue;
        }
        toggles.set_expanded(span_id, true);
        toggles.set_view_mode(span_id, mode);
    }
    Ok(toggles)
}

fn print_json<T: Serialize>(data: &T, neighbors: Option<&Neighbors>) -> anyhow::Result<()> {
    let out = DetailOutput { data, neighbors };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
