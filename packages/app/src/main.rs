use std::sync::Arc;

use nextoddlers_core::{CategoryGroup, Language, ListenHandle};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinError;

use nextoddlers_app::logging::init_tracing;
use nextoddlers_app::platform::{
    HeadlessTts, ListenRequest, LoggingCelebration, RecognitionError, RecognitionSink,
    SpeechRecognizer,
};
use nextoddlers_app::{App, AppConfig, PracticeSession, Platform, RunnerInput, RunnerView, SessionOutcome};

/// Typed lines stand in for the microphone: `say <words>` answers the open window.
#[derive(Default)]
struct ConsoleRecognizer {
    pending: Mutex<Option<RecognitionSink>>,
}

impl ConsoleRecognizer {
    fn say(&self, words: &str) -> bool {
        let sink = self.pending.lock().take();
        match sink {
            Some(sink) => {
                sink.deliver(Ok(words.to_string()));
                true
            }
            None => false,
        }
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&self, request: ListenRequest, sink: RecognitionSink) -> Result<(), RecognitionError> {
        tracing::debug!(handle = request.handle.0, language = %request.language, "console listening");
        *self.pending.lock() = Some(sink);
        Ok(())
    }

    fn cancel(&self, handle: ListenHandle) {
        let mut pending = self.pending.lock();
        if pending.as_ref().map(RecognitionSink::handle) == Some(handle) {
            pending.take();
        }
    }
}

enum ConsoleEvent {
    Line(Option<String>),
    ViewChanged,
    Finished(Result<SessionOutcome, JoinError>),
}

async fn next_practice_event(practice: &mut Option<PracticeSession>) -> ConsoleEvent {
    let Some(session) = practice.as_mut() else {
        return std::future::pending().await;
    };
    let changed = tokio::select! {
        biased;
        outcome = &mut session.outcome => return ConsoleEvent::Finished(outcome),
        changed = session.handle.changed() => changed,
    };
    if changed {
        ConsoleEvent::ViewChanged
    } else {
        // view channel closed, the runner is finishing
        ConsoleEvent::Finished((&mut session.outcome).await)
    }
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();
    let _log_guard = init_tracing(&config);

    let recognizer = Arc::new(ConsoleRecognizer::default());
    let platform = Platform {
        tts: Arc::new(HeadlessTts::new()),
        recognizer: recognizer.clone(),
        celebration: Arc::new(LoggingCelebration),
    };

    let mut app = match App::bootstrap(config, platform) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = %err, "failed to open the session store");
            std::process::exit(1);
        }
    };

    print_help();
    println!("screen: {}", app.route().path());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut practice: Option<PracticeSession> = None;

    loop {
        let event = tokio::select! {
            line = lines.next_line() => ConsoleEvent::Line(line.ok().flatten()),
            event = next_practice_event(&mut practice) => event,
        };

        match event {
            ConsoleEvent::Line(None) => break,
            ConsoleEvent::Line(Some(line)) => {
                let line = line.trim();
                let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
                let rest = rest.trim();

                if let Some(session) = practice.as_ref() {
                    if command == "say" {
                        if !recognizer.say(rest) {
                            println!("not listening, use `listen` first");
                        }
                    } else if let Some(input) = practice_input(command, rest, &session.handle.view()) {
                        session.handle.send(input);
                    } else {
                        println!("commands: listen, say <words>, again, tile <n>, undo <n>, skip, exit");
                    }
                    continue;
                }

                if !handle_command(&mut app, &mut practice, command, rest) {
                    break;
                }
            }
            ConsoleEvent::ViewChanged => {
                if let Some(session) = practice.as_ref() {
                    print_view(&session.handle.view());
                }
            }
            ConsoleEvent::Finished(outcome) => {
                practice = None;
                let outcome = outcome.unwrap_or_else(|err| {
                    tracing::error!(error = %err, "activity runner crashed");
                    SessionOutcome::Exited
                });
                let route = app.finish_practice(outcome);
                println!("screen: {}", route.path());
                if let SessionOutcome::Completed(report) = outcome {
                    println!("finished {} with {} stars (`again` or `home`)", report.topic, report.stars);
                }
            }
        }
    }
}

/// Returns false on `quit`.
fn handle_command(
    app: &mut App,
    practice: &mut Option<PracticeSession>,
    command: &str,
    rest: &str,
) -> bool {
    match command {
        "" => {}
        "help" => print_help(),
        "quit" => return false,
        "login" => {
            let (code, nickname) = rest.split_once(' ').unwrap_or((rest, ""));
            match app.login(code, nickname) {
                Ok(()) => println!("hello, {}", app.store().lock().state().nickname.clone().unwrap_or_default()),
                Err(_) => {
                    if let Some(feedback) = app.login_error() {
                        println!("{}", feedback.message);
                    }
                }
            }
        }
        "logout" => {
            app.logout();
        }
        "home" => {
            app.go_home();
        }
        "category" => match CategoryGroup::from_id(rest) {
            Some(group) => {
                app.open_category(group);
                let topics: Vec<&str> = group.topics().iter().map(|topic| topic.id()).collect();
                println!("topics: {}", topics.join(", "));
            }
            None => println!("unknown category"),
        },
        "practice" | "again" => {
            let started = if command == "again" {
                app.play_again()
            } else {
                app.start_practice(rest)
            };
            match started {
                Ok(session) => {
                    print_view(&session.handle.view());
                    *practice = Some(session);
                }
                Err(err) => println!("{err}"),
            }
        }
        "stars" => println!("stars: {}", app.store().lock().stars()),
        "lang" => match rest.parse::<Language>() {
            Ok(language) => app.set_language(language),
            Err(err) => println!("{err}"),
        },
        "duration" => match rest.parse::<u32>() {
            Ok(minutes) => app.set_session_duration(minutes),
            Err(_) => println!("usage: duration <minutes>"),
        },
        "rate" => match rest.parse::<f32>() {
            Ok(rate) => app.set_tts_rate(rate),
            Err(_) => println!("usage: rate <speed>"),
        },
        "clear" => {
            if let Err(err) = app.store().lock().clear_storage() {
                tracing::warn!(error = %err, "failed to clear storage");
            }
            app.logout();
        }
        _ => println!("unknown command, try `help`"),
    }
    println!("screen: {}", app.route().path());
    true
}

fn practice_input(command: &str, rest: &str, view: &RunnerView) -> Option<RunnerInput> {
    let position = rest.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
    match command {
        "listen" => Some(RunnerInput::StartListening),
        "again" => Some(RunnerInput::SpeakAgain),
        "skip" => Some(RunnerInput::Skip),
        "exit" => Some(RunnerInput::Exit),
        "tile" => position
            .and_then(|n| view.session.tiles.iter().filter(|tile| !tile.is_placed).nth(n))
            .map(|tile| RunnerInput::SelectTile(tile.id)),
        "undo" => position
            .and_then(|n| view.session.answer.get(n))
            .map(|tile| RunnerInput::RetractTile(tile.id)),
        _ => None,
    }
}

fn print_view(view: &RunnerView) {
    let session = &view.session;
    println!(
        "[{}/{}] {} stars:{} phase:{:?}",
        session.index + 1,
        session.total,
        session.card_label().unwrap_or("?"),
        session.tally,
        session.phase
    );
    if let Some(feedback) = &session.feedback {
        println!("  {}", feedback.message);
    }
    if !session.tiles.is_empty() {
        let bank: Vec<String> = session
            .tiles
            .iter()
            .filter(|tile| !tile.is_placed)
            .map(|tile| tile.ch.to_string())
            .collect();
        let answer: String = session.answer.iter().map(|tile| tile.ch).collect();
        println!("  bank: {}  answer: {}", bank.join(" "), answer);
    }
    if let Some(notice) = &view.notice {
        println!("  {notice}");
    }
}

fn print_help() {
    println!("login <code> [nickname] | logout | home | category <id> | practice <topic> | again | stars | clear | quit");
    println!("lang <en|ru|tr> | duration <minutes> | rate <speed>");
}
