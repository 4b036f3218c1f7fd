//! MovieScope CLI — search titles from the terminal.
//!
//! Runs the same query pipeline as the search widget against the search service.

use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, LocalSet};
use tracing::debug;

use moviescope_core::debounce::Debounced;
use moviescope_core::{
    fetch_and_render, load_config_file, load_moviescope_config, Dispatch, HttpSearchClient, Query,
    ResultsState, ResultsView, SearchBackend, SearchPipeline, WidgetConfig,
};

/// MovieScope CLI — title search with inline `year:` and `type:` filters.
#[derive(Parser)]
#[command(name = "ms", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ./.moviescope.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Search service origin, e.g. http://127.0.0.1:3000
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search titles, e.g. `ms search batman year:2008 type:movie`
    Search {
        /// Query words; `year:` and `type:` words become filters
        #[arg(required = true)]
        words: Vec<String>,

        /// Print the results container as an HTML fragment
        #[arg(long)]
        html: bool,
    },
    /// Show the request a query would send, without sending it
    Parse {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Read title input line by line from stdin and search as you type
    Watch {
        /// Quiet period before a search is sent
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Fetch the detail record of one title
    Item {
        /// Title identifier, e.g. tt0133093
        tconst: String,
    },
    /// Check that the search service is up
    Health,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn resolve_config(cli: &Cli) -> anyhow::Result<WidgetConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            load_config_file(path)
        }
        None => {
            let cwd = std::env::current_dir().context("Could not determine current directory")?;
            load_moviescope_config(&cwd)
        }
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    Ok(config)
}

/// Human-readable result lines: label, then link.
fn result_lines(view: &ResultsView) -> Vec<String> {
    view.links().iter().map(|link| format!("{:<60} {}", link.text, link.href)).collect()
}

fn results_json(view: &ResultsView) -> serde_json::Value {
    view.links()
        .iter()
        .map(|link| {
            serde_json::json!({
                "id": link.id,
                "text": link.text,
                "href": link.href,
            })
        })
        .collect()
}

fn print_view(view: &ResultsView, json: bool) -> anyhow::Result<()> {
    if let ResultsState::Failed(message) = view.state() {
        eprintln!("error: {message}");
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&results_json(view))?)?;
    } else {
        for line in result_lines(view) {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "-- {} results", view.links().len())?;
    }
    Ok(())
}

async fn run_search(config: &WidgetConfig, words: &[String], json: bool, html: bool) -> anyhow::Result<()> {
    let mut pipeline = SearchPipeline::new(Query::with_title_type(config.default_title_type.clone()));
    let dispatch = pipeline.handle_submit(&words.join(" "));
    let Some(dispatch) = dispatch else {
        eprintln!("Nothing to search for: the title is empty");
        std::process::exit(1);
    };

    let client = HttpSearchClient::new(config);
    let mut view = ResultsView::new(config.item_link_prefix.clone());
    fetch_and_render(&client, &dispatch, &mut view).await;

    match view.state() {
        ResultsState::Failed(message) => bail!("{message}"),
        _ if html => println!("{}", view.to_html()),
        _ if view.links().is_empty() && !json => {
            eprintln!("No results for '{}'", dispatch.query.title);
            std::process::exit(1);
        }
        _ => print_view(&view, json)?,
    }
    Ok(())
}

fn run_parse(config: &WidgetConfig, words: &[String], json: bool) -> anyhow::Result<()> {
    let mut pipeline = SearchPipeline::new(Query::with_title_type(config.default_title_type.clone()));
    let dispatch = pipeline.handle_submit(&words.join(" "));
    let body = serde_json::to_string_pretty(pipeline.query())?;

    if json {
        let issues: Vec<String> = pipeline.issues().iter().map(|i| i.to_string()).collect();
        let output = serde_json::json!({
            "body": pipeline.query(),
            "dispatch": dispatch.is_some(),
            "issues": issues,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("POST {}{}", config.base_url, config.search_path);
        println!("{body}");
        if dispatch.is_none() {
            println!("(title is empty, nothing would be sent)");
        }
    }
    Ok(())
}

/// Searches started by `ms watch`. Lives on one thread, so backends need not be `Send`.
struct WatchSession<B, F> {
    pipeline: SearchPipeline,
    view: Rc<RefCell<ResultsView>>,
    backend: Rc<B>,
    report: Rc<F>,
    in_flight: Vec<JoinHandle<()>>,
}

impl<B, F> WatchSession<B, F>
where
    B: SearchBackend + 'static,
    F: Fn(&Dispatch, &ResultsView) + 'static,
{
    fn new(config: &WidgetConfig, backend: Rc<B>, report: F) -> Self {
        Self {
            pipeline: SearchPipeline::new(Query::with_title_type(config.default_title_type.clone())),
            view: Rc::new(RefCell::new(ResultsView::new(config.item_link_prefix.clone()))),
            backend,
            report: Rc::new(report),
            in_flight: Vec::new(),
        }
    }

    /// A line that survived the quiet period becomes the title field's value.
    fn accept(&mut self, line: &str) {
        let Some(dispatch) = self.pipeline.handle_input("title", line) else {
            debug!("Empty title, waiting for more input");
            return;
        };

        self.view.borrow_mut().begin(dispatch.seq);
        let backend = Rc::clone(&self.backend);
        let view = Rc::clone(&self.view);
        let report = Rc::clone(&self.report);
        self.in_flight.retain(|task| !task.is_finished());
        self.in_flight.push(tokio::task::spawn_local(async move {
            let outcome = backend.search(&dispatch.query).await;
            let mut view = view.borrow_mut();
            if view.complete(dispatch.seq, outcome) {
                (*report)(&dispatch, &*view);
            }
        }));
    }

    async fn finish(self) -> anyhow::Result<()> {
        for task in self.in_flight {
            task.await?;
        }
        Ok(())
    }
}

/// Each input line replaces the title field's value, as if typed; searches go out
/// once input has been quiet for the debounce wait. Must run inside a [`LocalSet`].
async fn watch<R, B, F>(input: R, backend: Rc<B>, config: &WidgetConfig, report: F) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    B: SearchBackend + 'static,
    F: Fn(&Dispatch, &ResultsView) + 'static,
{
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<String>();
    let debounced = Debounced::new(config.debounce(), move |line: String| {
        // Fails only after the session has shut down.
        let _ = settled_tx.send(line);
    });
    let mut session = WatchSession::new(config, backend, report);

    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => debounced.call(line),
                None => break,
            },
            Some(line) = settled_rx.recv() => session.accept(&line),
        }
    }

    // Let the last pending call fire, then wait for the searches it started.
    if let Some(pending) = debounced.flush() {
        pending.await?;
    }
    drop(debounced);
    while let Ok(line) = settled_rx.try_recv() {
        session.accept(&line);
    }
    session.finish().await
}

async fn run_watch(config: &WidgetConfig, json: bool) -> anyhow::Result<()> {
    let client = Rc::new(HttpSearchClient::new(config));
    let stdin = BufReader::new(tokio::io::stdin());
    let report = move |dispatch: &Dispatch, view: &ResultsView| {
        println!("> {}", dispatch.query.title);
        if let Err(e) = print_view(view, json) {
            eprintln!("error: {e}");
        }
    };
    LocalSet::new().run_until(watch(stdin, client, config, report)).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("moviescope=warn".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = resolve_config(&cli)?;

    match &cli.command {
        Commands::Search { words, html } => run_search(&config, words, cli.json, *html).await?,
        Commands::Parse { words } => run_parse(&config, words, cli.json)?,
        Commands::Watch { debounce_ms } => {
            if let Some(ms) = debounce_ms {
                config.debounce_ms = *ms;
            }
            run_watch(&config, cli.json).await?;
        }
        Commands::Item { tconst } => {
            let client = HttpSearchClient::new(&config);
            let detail = client.item(tconst).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Commands::Health => {
            let client = HttpSearchClient::new(&config);
            let status = client.health().await?;
            if cli.json {
                println!("{}", serde_json::json!({ "status": status.status }));
            } else {
                println!("{}: {}", config.base_url, status.status);
            }
            if !status.is_ok() {
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "ms", &mut std::io::stdout());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use moviescope_core::types::TitleItem;
    use moviescope_core::SearchError;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    #[derive(Default)]
    struct RecordingBackend {
        seen: RefCell<Vec<Query>>,
    }

    impl SearchBackend for RecordingBackend {
        async fn search(&self, query: &Query) -> Result<Vec<TitleItem>, SearchError> {
            self.seen.borrow_mut().push(query.clone());
            Ok(vec![TitleItem {
                tconst: "tt0000001".into(),
                title_type: query.title_type.clone(),
                start_year: query.year.unwrap_or(2000).into(),
                primary_title: query.title.clone(),
            }])
        }
    }

    /// Run a watch session over `input`; returns "title -> result count" per report.
    async fn watched<R>(input: R, backend: Rc<RecordingBackend>) -> Vec<String>
    where
        R: AsyncBufRead + Unpin,
    {
        let reported = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&reported);
        let report = move |dispatch: &Dispatch, view: &ResultsView| {
            sink.borrow_mut().push(format!("{} -> {}", dispatch.query.title, view.links().len()));
        };
        LocalSet::new()
            .run_until(watch(input, backend, &WidgetConfig::default(), report))
            .await
            .unwrap();
        let lines = reported.borrow().clone();
        lines
    }

    fn rendered() -> ResultsView {
        let mut view = ResultsView::new("/movie");
        view.complete(
            1,
            Ok(vec![TitleItem {
                tconst: "tt0133093".into(),
                title_type: "movie".into(),
                start_year: 1999,
                primary_title: "The Matrix".into(),
            }]),
        );
        view
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_words_are_collected() {
        let cli = Cli::try_parse_from(["ms", "search", "batman", "year:2008", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Search { words, html } => {
                assert_eq!(words.join(" "), "batman year:2008");
                assert!(!html);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn explicit_config_must_exist_and_base_url_wins() {
        let dir = std::env::temp_dir().join("moviescope-cli-missing.toml");
        let cli = Cli::try_parse_from([
            "ms",
            "--base-url",
            "http://films.local/",
            "--config",
            dir.to_str().unwrap(),
            "health",
        ])
        .unwrap();
        assert!(resolve_config(&cli).is_err());

        let cli = Cli::try_parse_from(["ms", "--base-url", "http://films.local/", "health"]).unwrap();
        assert_eq!(resolve_config(&cli).unwrap().base_url, "http://films.local");
    }

    #[test]
    fn results_print_label_and_link() {
        let view = rendered();
        let lines = result_lines(&view);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("movie 1999 The Matrix"));
        assert!(lines[0].ends_with("/movie/tt0133093"));

        let json = results_json(&view);
        assert_eq!(json[0]["id"], "tt0133093");
    }

    #[tokio::test(start_paused = true)]
    async fn watch_searches_once_for_a_burst_ending_in_eof() {
        let backend = Rc::new(RecordingBackend::default());
        let reported = watched(&b"m\nma\nmatrix year:1999\n"[..], Rc::clone(&backend)).await;

        let seen = backend.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "matrix");
        assert_eq!(seen[0].year, Some(1999));
        assert_eq!(reported, vec!["matrix -> 1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_searches_again_after_a_quiet_period() {
        let (mut writer, reader) = tokio::io::duplex(64);
        tokio::spawn(async move {
            writer.write_all(b"alien\n").await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
            writer.write_all(b"heat\nheat year:1995\n").await.unwrap();
        });

        let backend = Rc::new(RecordingBackend::default());
        let reported = watched(BufReader::new(reader), Rc::clone(&backend)).await;

        let titles: Vec<_> = backend.seen.borrow().iter().map(|q| (q.title.clone(), q.year)).collect();
        assert_eq!(titles, vec![("alien".to_string(), None), ("heat".to_string(), Some(1995))]);
        assert_eq!(reported, vec!["alien -> 1", "heat -> 1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_never_searches_without_a_title() {
        let backend = Rc::new(RecordingBackend::default());
        let reported = watched(&b"matrix\nyear:1999\n"[..], Rc::clone(&backend)).await;
        assert!(backend.seen.borrow().is_empty());
        assert!(reported.is_empty());
    }
}
