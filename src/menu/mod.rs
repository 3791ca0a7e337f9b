#![forbid(unsafe_code)]

use std::io;
use std::io::IsTerminal as _;
use std::io::Write as _;

use crossterm::style::{Color, Stylize as _};

use crate::config::Config;
use crate::task::model::{Task, TaskStatus};
use crate::task::store::TaskStore;

#[must_use]
pub fn is_tty() -> bool {
    io::stdout().is_terminal()
}

/// Blocking menu loop. One command runs to completion (including its
/// write-through) before the next prompt is shown.
pub fn run(cfg: &Config, store: &mut TaskStore) -> anyhow::Result<()> {
    loop {
        println!();
        println!("=== ttrack ===");
        println!("1. Add task");
        println!("2. List tasks");
        println!("3. Complete task");
        println!("4. Remove task");
        println!("5. Edit task");
        println!("6. Mark task ongoing");
        println!("0. Quit");
        let Some(choice) = prompt("Choose an option: ")? else {
            return Ok(());
        };
        match choice.trim() {
            "1" => add_task(cfg, store)?,
            "2" => list_tasks(cfg, store)?,
            "3" => complete_task(cfg, store)?,
            "4" => remove_task(cfg, store)?,
            "5" => edit_task(cfg, store)?,
            "6" => mark_ongoing(cfg, store)?,
            "0" => return Ok(()),
            other => print_error(cfg, &format!("invalid option '{other}', try again")),
        }
    }
}

fn add_task(cfg: &Config, store: &mut TaskStore) -> anyhow::Result<()> {
    loop {
        let Some(input) = prompt("Task description: ")? else {
            return Ok(());
        };
        if input.trim().is_empty() {
            print_warn(cfg, "description must not be empty");
            continue;
        }
        let task = store.add(&input)?;
        print_ok(cfg, &format!("Added task {}", task.id));
        return Ok(());
    }
}

fn list_tasks(cfg: &Config, store: &mut TaskStore) -> anyhow::Result<()> {
    loop {
        println!();
        println!("Filter tasks by:");
        println!("1. All");
        println!("2. Pending");
        println!("3. Ongoing");
        println!("4. Completed");
        println!("0. Back");
        let Some(choice) = prompt("Choose an option: ")? else {
            return Ok(());
        };
        let (filter, title) = match choice.trim() {
            "1" => (None, "All tasks"),
            "2" => (Some(TaskStatus::Pending), "Pending tasks"),
            "3" => (Some(TaskStatus::Ongoing), "Ongoing tasks"),
            "4" => (Some(TaskStatus::Completed), "Completed tasks"),
            "0" => return Ok(()),
            other => {
                print_error(cfg, &format!("invalid option '{other}', try again"));
                continue;
            }
        };

        if store.tasks().is_empty() {
            print_warn(cfg, "No tasks yet.");
            return Ok(());
        }

        let filtered: Vec<Task> = store
            .tasks()
            .iter()
            .filter(|t| filter.is_none_or(|f| t.status == f))
            .cloned()
            .collect();

        println!();
        println!("{}", paint(cfg, &format!("{title}:"), Color::Cyan));
        if filtered.is_empty() {
            print_warn(cfg, "No tasks match this filter.");
            continue;
        }

        for task in &filtered {
            let line = format!(
                "{}: {} {} (created {})",
                task.id,
                status_marker(cfg, task.status),
                task.description,
                created_date(&task.created_at),
            );
            println!("{}", paint(cfg, &line, status_color(task.status)));
        }

        // Shortcut out of the list view: completion here goes through the
        // unrestricted status assignment, so it also closes ongoing tasks.
        let Some(resp) = prompt("\nMark one of these as completed? (y/N): ")? else {
            return Ok(());
        };
        if !is_yes(&resp) {
            continue;
        }
        let Some(id) = read_id(cfg)? else {
            continue;
        };
        match filtered.iter().find(|t| t.id == id) {
            Some(task) if task.status != TaskStatus::Completed => {
                store.set_status(id, TaskStatus::Completed)?;
                print_ok(cfg, &format!("Task {id} marked completed"));
            }
            Some(_) => print_warn(cfg, "task is already completed"),
            None => print_warn(cfg, &format!("task {id} is not in this view")),
        }
    }
}

fn complete_task(cfg: &Config, store: &mut TaskStore) -> anyhow::Result<()> {
    let Some(id) = read_id(cfg)? else {
        return Ok(());
    };
    if store.complete(id)? {
        print_ok(cfg, &format!("Task {id} completed"));
    } else {
        print_warn(cfg, &format!("task {id} not found or not pending"));
    }
    Ok(())
}

fn remove_task(cfg: &Config, store: &mut TaskStore) -> anyhow::Result<()> {
    let Some(id) = read_id(cfg)? else {
        return Ok(());
    };
    let Some(description) = store
        .tasks()
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.description.clone())
    else {
        print_warn(cfg, &format!("task {id} not found"));
        return Ok(());
    };

    let Some(resp) = prompt(&format!("Remove task \"{description}\"? (y/N): "))? else {
        return Ok(());
    };
    if !is_yes(&resp) {
        println!("Removal cancelled.");
        return Ok(());
    }

    store.remove(id)?;
    print_ok(cfg, &format!("Task {id} removed"));
    Ok(())
}

fn edit_task(cfg: &Config, store: &mut TaskStore) -> anyhow::Result<()> {
    let Some(id) = read_id(cfg)? else {
        return Ok(());
    };
    let Some(current) = store
        .tasks()
        .iter()
        .find(|t| t.id == id)
        .map(|t| t.description.clone())
    else {
        print_warn(cfg, &format!("task {id} not found"));
        return Ok(());
    };
    println!("Current description: {current}");

    loop {
        let Some(input) = prompt("New description: ")? else {
            return Ok(());
        };
        if input.trim().is_empty() {
            print_warn(cfg, "description must not be empty");
            continue;
        }
        if store.edit(id, &input)? {
            print_ok(cfg, &format!("Task {id} updated"));
        } else {
            print_error(cfg, &format!("failed to edit task {id}"));
        }
        return Ok(());
    }
}

fn mark_ongoing(cfg: &Config, store: &mut TaskStore) -> anyhow::Result<()> {
    let Some(id) = read_id(cfg)? else {
        return Ok(());
    };
    if store.set_status(id, TaskStatus::Ongoing)? {
        print_ok(cfg, &format!("Task {id} marked ongoing"));
    } else {
        print_warn(cfg, &format!("task {id} not found"));
    }
    Ok(())
}

/// Prompts on stdout and reads one line. `None` means stdin was closed;
/// callers unwind back to the main menu, which then exits.
fn prompt(message: &str) -> anyhow::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut input = String::new();
    let n = io::stdin().read_line(&mut input)?;
    if n == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(['\r', '\n']).to_owned()))
}

/// `None` covers both a closed stdin and an unparsable id; the latter is
/// reported before returning.
fn read_id(cfg: &Config) -> anyhow::Result<Option<u64>> {
    let Some(input) = prompt("Task id: ")? else {
        return Ok(None);
    };
    match input.trim().parse::<u64>() {
        Ok(id) => Ok(Some(id)),
        Err(_) => {
            print_error(cfg, &format!("invalid task id '{}'", input.trim()));
            Ok(None)
        }
    }
}

fn is_yes(input: &str) -> bool {
    let resp = input.trim().to_lowercase();
    resp == "y" || resp == "yes"
}

fn status_marker(cfg: &Config, status: TaskStatus) -> String {
    if cfg.ui.icons {
        match status {
            TaskStatus::Pending => "○",
            TaskStatus::Ongoing => "●",
            TaskStatus::Completed => "✓",
        }
        .to_owned()
    } else {
        format!("[{}]", status.as_str())
    }
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::DarkYellow,
        TaskStatus::Ongoing => Color::Blue,
        TaskStatus::Completed => Color::Green,
    }
}

fn created_date(created_at: &str) -> &str {
    created_at.split('T').next().unwrap_or(created_at)
}

fn paint(cfg: &Config, text: &str, color: Color) -> String {
    if cfg.ui.colors {
        text.with(color).to_string()
    } else {
        text.to_owned()
    }
}

fn print_ok(cfg: &Config, message: &str) {
    println!("{}", paint(cfg, message, Color::Green));
}

fn print_warn(cfg: &Config, message: &str) {
    println!("{}", paint(cfg, message, Color::DarkYellow));
}

fn print_error(cfg: &Config, message: &str) {
    println!("{}", paint(cfg, &format!("Error: {message}"), Color::Red));
}
