use std::sync::Arc;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use recipe_sniper::SniperClient;
use recipe_sniper::tui::app::{self, ApiRequest, App, AppEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let base_url = std::env::var("RECIPE_SNIPER_API_URL")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    tracing::info!("Using API at {}", base_url);
    let client = Arc::new(SniperClient::new(base_url));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, client).await;

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    client: Arc<SniperClient>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = unbounded_channel::<AppEvent>();
    spawn_input_thread(tx.clone());

    let (mut app, initial) = App::new();
    dispatch(&client, &tx, initial);
    terminal.draw(|frame| app.render(frame))?;

    while let Some(event) = rx.recv().await {
        let requests = app.handle_event(event);
        if app.should_quit {
            break;
        }
        dispatch(&client, &tx, requests);
        terminal.draw(|frame| app.render(frame))?;
    }

    Ok(())
}

/// Run each call on the runtime; the settled outcome comes back as an event.
fn dispatch(client: &Arc<SniperClient>, tx: &UnboundedSender<AppEvent>, requests: Vec<ApiRequest>) {
    for request in requests {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = app::execute(&client, request).await;
            let _ = tx.send(AppEvent::Api(outcome));
        });
    }
}

/// Blocking reader for terminal events, decoupled from the async loop.
fn spawn_input_thread(tx: UnboundedSender<AppEvent>) {
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Input(key)).is_err() {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Log to a file when RUST_LOG is set; stdout belongs to the TUI.
fn init_logging() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = std::fs::File::create("recipe-sniper.log")?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
        .init();
    Ok(())
}
