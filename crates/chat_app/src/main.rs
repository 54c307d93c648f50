use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard};

use chat_app::app::ChatSession;
use chat_app::bridge::NoBridge;
use chat_app::config::AppConfig;
use chat_app::providers;
use chat_app::runtime::RequestController;
use chat_app::shell::{locale_from_env, Shell};
use chat_app::view::ChatView;
use conversation_log::RandomIdGenerator;
use miniapp_chat::config::EnvConfig;
use miniapp_chat::Theme;

enum UiEvent {
    Line(String),
    InputClosed,
    Settled,
}

fn main() -> io::Result<()> {
    miniapp_chat::logging::init();

    let env = EnvConfig::from_env();
    let config = AppConfig::from_env().map_err(io::Error::other)?;
    let provider = providers::provider_from_env(&config).map_err(io::Error::other)?;

    let theme = if env.light_theme {
        Theme::Light
    } else {
        Theme::Dark
    };
    let bridge = NoBridge;
    let shell = Shell::bootstrap(
        &bridge,
        locale_from_env().as_deref(),
        config.title.as_deref(),
        theme,
    );
    let session = Arc::new(Mutex::new(
        ChatSession::with_collaborators(
            &config,
            Box::new(RandomIdGenerator::new()),
            Box::new(bridge),
        )
        .with_shell(shell),
    ));

    let (events, inbox) = mpsc::channel();
    let settled = events.clone();
    let controller = RequestController::with_notify(Arc::clone(&session), provider, move || {
        let _ = settled.send(UiEvent::Settled);
    });
    spawn_input_reader(events)?;

    let styled = io::stdout().is_terminal();
    let mut view = ChatView::new();
    view.tree_mut().set_styled(styled);
    draw(&mut view, &session, env.width, styled)?;

    let mut host = Arc::clone(&controller);
    let mut input_closed = false;
    while let Ok(event) = inbox.recv() {
        match event {
            UiEvent::Line(line) => {
                let mut session = lock_unpoisoned(&session);
                session.on_input_replace(line);
                session.on_submit(&mut host);
            }
            UiEvent::InputClosed => input_closed = true,
            UiEvent::Settled => {
                controller.flush_pending_events();
            }
        }

        if controller.take_render_request() {
            draw(&mut view, &session, env.width, styled)?;
        }

        let sending = lock_unpoisoned(&session).is_sending();
        if controller.stop_requested() || (input_closed && !sending) {
            break;
        }
    }

    Ok(())
}

fn spawn_input_reader(events: mpsc::Sender<UiEvent>) -> io::Result<()> {
    std::thread::Builder::new()
        .name("miniapp-chat-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if events.send(UiEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = events.send(UiEvent::InputClosed);
        })
        .map(|_| ())
}

fn draw(
    view: &mut ChatView,
    session: &Arc<Mutex<ChatSession>>,
    width: usize,
    styled: bool,
) -> io::Result<()> {
    let lines = {
        let mut session = lock_unpoisoned(session);
        view.sync(&mut session);
        view.render(&session, width)
    };

    let mut stdout = io::stdout().lock();
    if styled {
        write!(stdout, "\x1b[2J\x1b[H")?;
    }
    for line in lines {
        writeln!(stdout, "{line}")?;
    }
    stdout.flush()
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
