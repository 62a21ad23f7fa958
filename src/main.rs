use std::io::{self, Write};
use std::sync::Arc;

use chronoauth::adapters::ReqwestHttpClient;
use chronoauth::api::{ApiError, ChronoApiClient, DEFAULT_BASE_URL};
use chronoauth::app::{App, AppMessage};
use chronoauth::clipboard::SystemClipboard;
use chronoauth::countdown::CountdownScheduler;
use chronoauth::qr::RqrrDecoder;
use chronoauth::{app, ui};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::{
    cursor::Show,
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

type ChronoApp = App<ReqwestHttpClient>;

/// Resolve the backend base URL: `--server <url>` flag, then the
/// `CHRONOAUTH_SERVER` environment variable, then the local default.
fn resolve_base_url() -> String {
    let args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args.iter().position(|a| a == "--server") {
        if let Some(url) = args.get(pos + 1) {
            return url.clone();
        }
        eprintln!("--server requires a URL argument");
        std::process::exit(2);
    }
    std::env::var("CHRONOAUTH_SERVER").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// Set up file logging when `CHRONOAUTH_LOG` names a path.
///
/// The TUI owns the terminal, so logs never go to stdout; without the
/// env var, tracing stays uninitialized and all spans are no-ops.
fn init_logging() {
    let Ok(path) = std::env::var("CHRONOAUTH_LOG") else {
        return;
    };
    match std::fs::File::create(&path) {
        Ok(file) => {
            let filter = tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chronoauth=debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {}", path, e);
        }
    }
}

/// Interactive sign-in before the TUI starts.
///
/// Re-prompts on rejected credentials; aborts on transport failures so
/// the user sees the connection problem instead of an empty dashboard.
fn run_login(
    runtime: &tokio::runtime::Runtime,
    api: &mut ChronoApiClient<ReqwestHttpClient>,
) -> Result<String> {
    println!("ChronoAuth · sign in to access your OTPs ({})\n", api.base_url());

    loop {
        print!("Username: ");
        io::stdout().flush()?;
        let mut username = String::new();
        io::stdin().read_line(&mut username)?;
        let username = username.trim().to_string();
        if username.is_empty() {
            continue;
        }

        let password = rpassword::prompt_password("Password: ")?;

        match runtime.block_on(api.login(&username, &password)) {
            Ok(()) => {
                println!("✓ Signed in as {}\n", username);
                return Ok(username);
            }
            Err(ApiError::Unauthorized) => {
                eprintln!("Invalid credentials. Try again.\n");
            }
            Err(e) => {
                return Err(eyre!("cannot reach the ChronoAuth server: {}", e));
            }
        }
    }
}

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("chronoauth {}", VERSION);
        std::process::exit(0);
    }

    color_eyre::install()?;
    init_logging();
    setup_panic_hook();

    let runtime = tokio::runtime::Runtime::new()?;

    // Pre-flight sign-in runs before the TUI takes over the terminal.
    let base_url = resolve_base_url();
    let mut api = ChronoApiClient::new(ReqwestHttpClient::new(), base_url);
    let username = run_login(&runtime, &mut api)?;
    let api = Arc::new(api);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = ChronoApp::new(
        api.clone(),
        username,
        Arc::new(RqrrDecoder),
        Box::new(SystemClipboard),
    );

    let result = runtime.block_on(run_app(&mut terminal, &mut app));

    restore_terminal(&mut terminal)?;

    // Best-effort server-side logout; the session token dies with us
    // either way.
    if let Err(e) = runtime.block_on(api.logout()) {
        tracing::debug!(error = %e, "logout failed");
    }

    result
}

/// Setup panic hook to restore terminal on panic.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        let _ = execute!(io::stdout(), Show);
        original_hook(panic_info);
    }));
}

/// Restore terminal to normal mode.
fn restore_terminal<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut ChronoApp,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    // Initial listing; each listed entry's code is fetched immediately.
    app::spawn_entry_load(app.api.clone(), app.message_tx.clone());

    // The one shared countdown timer. Ticks and boundary crossings come
    // back through the message channel so all state stays on this loop.
    let mut scheduler = CountdownScheduler::new();
    {
        let tick_tx = app.message_tx.clone();
        let boundary_tx = app.message_tx.clone();
        scheduler
            .start(
                move |seconds_remaining| {
                    let _ = tick_tx.send(AppMessage::CountdownTick { seconds_remaining });
                },
                move || {
                    let _ = boundary_tx.send(AppMessage::StepBoundary);
                },
            )
            .map_err(|e| eyre!(e))?;
    }

    let mut event_stream = EventStream::new();
    let mut message_rx: mpsc::UnboundedReceiver<AppMessage> = app
        .message_rx
        .take()
        .ok_or_else(|| eyre!("message receiver already taken"))?;

    loop {
        if app.needs_redraw {
            terminal.draw(|f| ui::render(f, &*app))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            event_result = event_stream.next() => {
                if let Some(Ok(event)) = event_result {
                    match event {
                        Event::Resize(_, _) => app.mark_dirty(),
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            handle_key(app, key.code, key.modifiers);
                        }
                        Event::Paste(text) => {
                            if let Some(dialog) = app.add_dialog.as_mut() {
                                dialog.paste(&text);
                                app.mark_dirty();
                            }
                        }
                        _ => {}
                    }
                }
            }

            message = message_rx.recv() => {
                if let Some(message) = message {
                    app.handle_message(message);
                }
            }
        }

        if app.should_quit {
            scheduler.stop();
            return Ok(());
        }
    }
}

fn handle_key(app: &mut ChronoApp, code: KeyCode, modifiers: KeyModifiers) {
    // Ctrl+C always quits.
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    // The add dialog captures everything while open.
    if app.add_dialog.is_some() {
        handle_dialog_key(app, code);
        return;
    }

    // Delete confirmation next.
    if app.pending_delete.is_some() {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
        return;
    }

    match app.screen {
        chronoauth::app::Screen::Dashboard => match code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('a') => app.open_add_dialog(),
            KeyCode::Char('d') => app.request_delete(),
            KeyCode::Char('c') => app.copy_selected_code(),
            KeyCode::Char('l') => app.toggle_logs(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            _ => {}
        },
        chronoauth::app::Screen::Logs => match code {
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('l') | KeyCode::Esc => app.toggle_logs(),
            _ => {}
        },
    }
}

fn handle_dialog_key(app: &mut ChronoApp, code: KeyCode) {
    let Some(dialog) = app.add_dialog.as_mut() else {
        return;
    };
    match code {
        KeyCode::Esc => app.close_add_dialog(),
        KeyCode::Tab => {
            dialog.toggle_tab();
            app.mark_dirty();
        }
        KeyCode::Enter => app.submit_add(),
        KeyCode::Up | KeyCode::Down => {
            dialog.next_field();
            app.mark_dirty();
        }
        KeyCode::Backspace => {
            dialog.backspace();
            app.mark_dirty();
        }
        KeyCode::Char(c) => {
            dialog.push_char(c);
            app.mark_dirty();
        }
        _ => {}
    }
}
