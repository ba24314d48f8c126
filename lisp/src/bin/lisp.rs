use lisp::{LispContext, Value};
use rustyline::error::ReadlineError;
use std::path::PathBuf;

// Logging is off unless RUST_LOG is set, eg: RUST_LOG=lisp=debug
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".lisp_history"))
}

fn print_value(value: &Value) {
    if !matches!(value, Value::Unspecified) {
        println!("{}", value);
    }
}

fn main() -> Result<(), String> {
    init_tracing();
    let cx = LispContext::new();

    if std::env::args().len() > 1 {
        let input = std::env::args().skip(1).collect::<Vec<String>>().join(" ");
        return match cx.eval_str(&input) {
            Ok(value) => {
                print_value(&value);
                Ok(())
            }
            Err(e) => Err(format!("{}: {}", e.kind(), e)),
        };
    }

    let config = rustyline::Config::builder()
        .max_history_size(1000)
        .map_err(|e| e.to_string())?
        .build();
    let mut rl = rustyline::DefaultEditor::with_config(config).map_err(|e| e.to_string())?;
    let history = history_path();
    if let Some(path) = &history {
        if let Err(e) = rl.load_history(path) {
            tracing::debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }
    loop {
        match rl.readline("~> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if let Some(path) = &history {
                    if let Err(e) = rl.save_history(path) {
                        tracing::warn!(path = %path.display(), error = %e, "failed to save history");
                    }
                }
                match cx.eval_str(&line) {
                    Err(e) => println!("{}: {}", e.kind(), e),
                    Ok(value) => print_value(&value),
                }
            }
        }
    }
}
