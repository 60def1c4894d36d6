use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tianzige::app::{Feedback, Session};
use tianzige::command::parse_command;
use tianzige::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_CONFIG_FILE: &str = "tianzige.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=info", env!("CARGO_PKG_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = load_config()?;
    let mut session = Session::new(config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        run_interactive(&mut session)?;
    } else {
        // Each argument is one command line
        for line in &args {
            report(session.handle_event(parse_command(line)));
            if session.should_quit() {
                break;
            }
        }
    }

    Ok(())
}

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let path = match std::env::var_os("TIANZIGE_CONFIG") {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    };

    match path {
        Some(path) => {
            let config = Config::from_file(&path)?;
            info!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

fn run_interactive(session: &mut Session) -> io::Result<()> {
    println!("tianzige {}  (:h for help, :q to quit)", env!("CARGO_PKG_VERSION"));
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        report(session.handle_event(parse_command(&line)));
        if session.should_quit() {
            break;
        }
    }
    Ok(())
}

fn report(feedback: Option<Feedback>) {
    match feedback {
        Some(Feedback::Info(message)) => println!("{}", message),
        Some(Feedback::Warning(message)) => println!("warning: {}", message),
        Some(Feedback::Error(message)) => eprintln!("error: {}", message),
        None => {}
    }
}
