use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

use pagedom::{to_html, Event};
use rollcall::Page;
use rollcall_dashboard::{layout, paths, Dashboard, DashboardConfig};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of input.
enum Command {
    Event(Event),
    Html,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    match words.next()? {
        "click" => Some(Command::Event(match words.next() {
            Some(target) => Event::click(target),
            None => Event::click_background(),
        })),
        "change" => {
            let target = words.next()?;
            let value = words.collect::<Vec<_>>().join(" ");
            Some(Command::Event(Event::change(target, value)))
        }
        "html" => Some(Command::Html),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn init_logging() {
    paths::rotate_logs();
    let path = paths::log_file()
        .filter(|p| p.parent().is_some_and(|dir| fs::create_dir_all(dir).is_ok()))
        .unwrap_or_else(|| PathBuf::from("rollcall.log"));

    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("could not create log file {}: {e}", path.display()),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let session = std::env::args().nth(1).map(PathBuf::from).or_else(paths::session_file);
    let config = match session {
        Some(path) if path.exists() => DashboardConfig::load(&path)?,
        _ => {
            log::info!("no session file, using defaults");
            DashboardConfig::default()
        }
    };

    let root = layout::page_for(config.role, &config.attendance_table);
    let mut dashboard = Dashboard::new(config, Page::new(root))?;
    dashboard.start().await;
    println!("{}", to_html(dashboard.page().root()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        dashboard.tick(Instant::now());
        match parse_command(&line) {
            Some(Command::Event(event)) => {
                for notification in dashboard.handle(&event).await {
                    println!("{notification:?}");
                }
                if let Some(toast) = dashboard.notifier().current() {
                    println!("[{}] {}", toast.level.as_str(), toast.message);
                }
            }
            Some(Command::Html) => println!("{}", to_html(dashboard.page().root())),
            Some(Command::Quit) => break,
            None => eprintln!("commands: click [id] | change <id> <value> | html | quit"),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        log::error!("{e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
