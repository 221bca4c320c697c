//! Command-line probe for the Deskmate core.
//!
//! # Responsibility
//! - Drive the core managers from a shell without the desktop shell.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `deskmate <command> [args...]`; run `deskmate help` for the list.

use deskmate_core::config::default_config_path;
use deskmate_core::input::{combine, parse_date, require_not_past, timer_duration};
use deskmate_core::model::timestamp::local_now;
use deskmate_core::{
    init_logging, AppConfig, CalendarManager, Calculator, NoteManager, Priority,
    RecordId, Store, TaskManager, TimerScheduler,
};
use log::{error, info};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

type CliResult = Result<(), Box<dyn Error>>;

const USAGE: &str = "\
usage: deskmate <command> [args...]

commands:
  ping
  version
  calc <expression>
  note add <title> <content>
  note list
  note rm <id>
  task add <title> <high|medium|low> <YYYY-MM-DD> <HH:MM>
  task list
  task toggle <id>
  task rm <id>
  event add <title> <YYYY-MM-DD> <HH:MM> [description]
  event list
  event rm <id>
  timer <seconds> <message>";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let words: Vec<&str> = args.iter().map(String::as_str).collect();

    match words.as_slice() {
        [] | ["help"] | ["--help"] | ["-h"] => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        ["ping"] => {
            println!("deskmate_core ping={}", deskmate_core::ping());
            return ExitCode::SUCCESS;
        }
        ["version"] => {
            println!("deskmate_core version={}", deskmate_core::core_version());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    // Logging is best effort for a probe; commands still run without it.
    if let Err(err) = init_logging(&config.log_level, &absolute(config.log_dir())) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&config, &words) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<AppConfig, Box<dyn Error>> {
    let mut config = AppConfig::load(default_config_path())?;
    config.data_dir = absolute(config.data_dir);
    Ok(config)
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

fn run(config: &AppConfig, words: &[&str]) -> CliResult {
    match words {
        ["calc", expression @ ..] if !expression.is_empty() => calc(&expression.join(" ")),
        ["note", rest @ ..] => note_command(&config.notes_path(), rest),
        ["task", rest @ ..] => task_command(&config.tasks_path(), rest),
        ["event", rest @ ..] => event_command(config, rest),
        ["timer", seconds, message @ ..] if !message.is_empty() => {
            timer_command(config, seconds, &message.join(" "))
        }
        _ => Err(format!("unrecognized command\n{USAGE}").into()),
    }
}

fn parse_id(value: &str) -> Result<RecordId, Box<dyn Error>> {
    value
        .parse::<RecordId>()
        .map_err(|_| format!("invalid id `{value}`").into())
}

fn calc(expression: &str) -> CliResult {
    let mut calculator = Calculator::new();
    let value = calculator.calculate(expression);
    match calculator.error_message() {
        Some(message) => Err(message.into()),
        None => {
            println!("{value}");
            Ok(())
        }
    }
}

fn note_command(path: &Path, args: &[&str]) -> CliResult {
    let notes = NoteManager::open(Store::open(path)?)?;
    match args {
        ["add", title, content] => {
            let note = notes.create_note(*title, *content)?;
            println!("created note {}", note.id);
        }
        ["list"] => {
            for note in notes.get_all_notes()? {
                println!("{}\t{}\t{}", note.id, note.title, note.content);
            }
        }
        ["rm", id] => notes.delete_note(parse_id(id)?)?,
        _ => return Err(format!("invalid note command\n{USAGE}").into()),
    }
    Ok(())
}

fn task_command(path: &Path, args: &[&str]) -> CliResult {
    let tasks = TaskManager::open(Store::open(path)?)?;
    match args {
        ["add", title, priority, date, time] => {
            let priority: Priority = priority.parse()?;
            let due = combine(parse_date(date)?, time)?;
            let task = tasks.create_task(*title, priority, due)?;
            println!("created task {}", task.id);
        }
        ["list"] => {
            for task in tasks.get_all_tasks()? {
                let mark = if task.is_completed { "x" } else { " " };
                println!(
                    "{}\t[{}]\t{}\t{}\t{}",
                    task.id,
                    mark,
                    task.priority.label(),
                    task.due_date.format("%Y-%m-%d %H:%M"),
                    task.title
                );
            }
        }
        ["toggle", id] => tasks.toggle_task_status(parse_id(id)?)?,
        ["rm", id] => tasks.delete_task(parse_id(id)?)?,
        _ => return Err(format!("invalid task command\n{USAGE}").into()),
    }
    Ok(())
}

fn event_command(config: &AppConfig, args: &[&str]) -> CliResult {
    // One-shot commands announce nothing; the poller belongs to long-lived hosts.
    let calendar = CalendarManager::open_manual(
        Store::open(config.calendar_path())?,
        config.notification_center(),
    )?;
    match args {
        ["add", title, date, time, description @ ..] => {
            let when = combine(parse_date(date)?, time)?;
            require_not_past(when, local_now())?;
            let event = calendar.add_event(*title, description.join(" "), when)?;
            println!("created event {}", event.id);
        }
        ["list"] => {
            for event in calendar.get_all_events() {
                let mark = if event.notified { "*" } else { " " };
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    event.id,
                    mark,
                    event.event_datetime.format("%Y-%m-%d %H:%M"),
                    event.title,
                    event.description
                );
            }
        }
        ["rm", id] => calendar.delete_event(parse_id(id)?)?,
        _ => return Err(format!("invalid event command\n{USAGE}").into()),
    }
    Ok(())
}

fn timer_command(config: &AppConfig, seconds: &str, message: &str) -> CliResult {
    let seconds: u64 = seconds
        .parse()
        .map_err(|_| format!("invalid seconds `{seconds}`"))?;
    let duration = timer_duration(0, 0, seconds)?;

    let timers = TimerScheduler::new(config.notification_center())?;
    let id = timers.start_timer(duration, message)?;
    info!("event=cli_timer module=cli status=ok id={id}");
    println!("timer {id} started for {seconds}s");

    while !timers.get_active_timers().is_empty() {
        std::thread::sleep(Duration::from_millis(200));
    }
    Ok(())
}
