#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::{CommandFactory as _, Parser, Subcommand};

use crate::config;
use crate::menu;
use crate::output::table::Table;
use crate::task::model::{Task, TaskStatus};
use crate::task::storage::TaskStorage;
use crate::task::store::TaskStore;

#[derive(Debug, Parser)]
#[command(name = "ttrack", version, about = "Local task tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Add(AddArgs),
    List(ListArgs),
    Done(DoneArgs),
    Start(StartArgs),
    Status(StatusArgs),
    Edit(EditArgs),
    #[command(alias = "rm")]
    Remove(RemoveArgs),
    Config(ConfigArgs),
    Completion(CompletionArgs),
    Version,
}

#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Task description
    #[arg(required = true)]
    pub description: Vec<String>,
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Filter by status (pending, ongoing, completed)
    #[arg(short = 's', long = "status", default_value = "")]
    pub status: String,
    /// Output in JSON format
    #[arg(long = "json")]
    pub json: bool,
    /// Output in CSV format
    #[arg(long = "csv")]
    pub csv: bool,
    /// Show exact creation timestamps
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct DoneArgs {
    /// Task id
    pub id: u64,
}

#[derive(Debug, Parser)]
pub struct StartArgs {
    /// Task id
    pub id: u64,
}

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Task id
    pub id: u64,
    /// New status (pending, ongoing, completed)
    pub status: String,
}

#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Task id
    pub id: u64,
    /// New description
    #[arg(required = true)]
    pub description: Vec<String>,
}

#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Skip the confirmation prompt
    #[arg(short = 'f', long = "force")]
    pub force: bool,
    /// Task id
    pub id: u64,
}

#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub cmd: ConfigCmd,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCmd {
    List,
    Set(ConfigSetArgs),
    Get(ConfigGetArgs),
}

#[derive(Debug, Parser)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Parser)]
pub struct ConfigGetArgs {
    pub key: String,
}

#[derive(Debug, Parser)]
pub struct CompletionArgs {
    pub shell: clap_complete::Shell,
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        None => cmd_default(),
        Some(Commands::Completion(args)) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "ttrack", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config(args)) => match args.cmd {
            ConfigCmd::List => {
                print!("{}", config::list_resolved_toml()?);
                Ok(ExitCode::SUCCESS)
            }
            ConfigCmd::Set(set) => {
                config::set_value_string(&set.key, &set.value)?;
                println!("Set {} = {}", set.key, set.value);
                Ok(ExitCode::SUCCESS)
            }
            ConfigCmd::Get(get) => {
                let val = config::get_value_string(&get.key)?;
                match val {
                    Some(v) => {
                        println!("{v}");
                        Ok(ExitCode::SUCCESS)
                    }
                    None => anyhow::bail!(
                        "configuration key '{}' not found - use 'ttrack config list' to see available keys",
                        get.key
                    ),
                }
            }
        },
        Some(Commands::Add(args)) => cmd_add(args),
        Some(Commands::List(args)) => cmd_list(&args),
        Some(Commands::Done(args)) => cmd_done(&args),
        Some(Commands::Start(args)) => cmd_start(&args),
        Some(Commands::Status(args)) => cmd_status(&args),
        Some(Commands::Edit(args)) => cmd_edit(args),
        Some(Commands::Remove(args)) => cmd_remove(&args),
        Some(Commands::Version) => Ok(cmd_version()),
    }
}

fn load_cfg() -> anyhow::Result<config::Config> {
    let (cfg, _doc, _paths) = config::load()?;
    Ok(cfg)
}

fn open_store(cfg: &config::Config) -> anyhow::Result<TaskStore> {
    let path = config::expand_path(&cfg.storage.data_file)?;
    TaskStore::open(TaskStorage::new(path))
}

fn cmd_default() -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let mut store = open_store(&cfg)?;

    if menu::is_tty() {
        menu::run(&cfg, &mut store)?;
        return Ok(ExitCode::SUCCESS);
    }

    // Non-TTY fallback: plain list with defaults.
    let args = ListArgs {
        status: String::new(),
        json: false,
        csv: false,
        verbose: false,
    };
    output_tasks(&cfg, &args, store.tasks())?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_add(args: AddArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let mut store = open_store(&cfg)?;

    let description = args.description.join(" ");
    let task = store.add(&description)?;
    println!("Added task {}: {}", task.id, task.description);
    Ok(ExitCode::SUCCESS)
}

fn cmd_list(args: &ListArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let store = open_store(&cfg)?;

    let filter = parse_status_filter(&args.status)?;
    let tasks: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|t| filter.is_none_or(|f| t.status == f))
        .cloned()
        .collect();

    output_tasks(&cfg, args, &tasks)?;
    Ok(ExitCode::SUCCESS)
}

fn parse_status_filter(input: &str) -> anyhow::Result<Option<TaskStatus>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    match TaskStatus::parse(input) {
        Some(status) => Ok(Some(status)),
        None => anyhow::bail!("invalid status filter '{input}' (use pending|ongoing|completed)"),
    }
}

fn output_tasks(cfg: &config::Config, args: &ListArgs, tasks: &[Task]) -> anyhow::Result<()> {
    if args.json {
        let mut s = serde_json::to_string_pretty(tasks)?;
        s.push('\n');
        print!("{s}");
        return Ok(());
    }

    if args.csv {
        let mut t = Table::new(["id", "status", "description", "created_at"]);
        for task in tasks {
            t.row([
                task.id.to_string(),
                task.status.as_str().to_owned(),
                task.description.clone(),
                task.created_at.clone(),
            ]);
        }
        t.write_csv()?;
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let mut t = if args.verbose {
        Table::new(["ID", "STATUS", "DESCRIPTION", "AGE", "CREATED"])
    } else {
        Table::new(["ID", "STATUS", "DESCRIPTION", "AGE"])
    };
    for task in tasks {
        let mut id = task.id.to_string();
        if cfg.ui.icons {
            id = format!("{} {}", status_icon(task.status), task.id);
        }
        if args.verbose {
            t.row([
                id,
                task.status.as_str().to_owned(),
                task.description.clone(),
                format_age(&task.created_at),
                task.created_at.clone(),
            ]);
        } else {
            t.row([
                id,
                task.status.as_str().to_owned(),
                task.description.clone(),
                format_age(&task.created_at),
            ]);
        }
    }
    t.print()?;
    Ok(())
}

fn cmd_done(args: &DoneArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let mut store = open_store(&cfg)?;

    if !store.complete(args.id)? {
        anyhow::bail!(
            "task {} not found or not pending (use 'ttrack status {} completed' to force)",
            args.id,
            args.id
        );
    }
    println!("Task {} completed", args.id);
    Ok(ExitCode::SUCCESS)
}

fn cmd_start(args: &StartArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let mut store = open_store(&cfg)?;

    if !store.set_status(args.id, TaskStatus::Ongoing)? {
        anyhow::bail!("task {} not found", args.id);
    }
    println!("Task {} marked ongoing", args.id);
    Ok(ExitCode::SUCCESS)
}

fn cmd_status(args: &StatusArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let mut store = open_store(&cfg)?;

    let Some(status) = TaskStatus::parse(&args.status) else {
        anyhow::bail!(
            "invalid status '{}' (use pending|ongoing|completed)",
            args.status
        );
    };
    if !store.set_status(args.id, status)? {
        anyhow::bail!("task {} not found", args.id);
    }
    println!("Task {} is now {}", args.id, status.as_str());
    Ok(ExitCode::SUCCESS)
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let mut store = open_store(&cfg)?;

    if store.tasks().iter().all(|t| t.id != args.id) {
        anyhow::bail!("task {} not found", args.id);
    }
    let description = args.description.join(" ");
    if !store.edit(args.id, &description)? {
        anyhow::bail!("new description must not be empty");
    }
    println!("Task {} updated", args.id);
    Ok(ExitCode::SUCCESS)
}

fn cmd_remove(args: &RemoveArgs) -> anyhow::Result<ExitCode> {
    let cfg = load_cfg()?;
    let mut store = open_store(&cfg)?;

    let Some(description) = store
        .tasks()
        .iter()
        .find(|t| t.id == args.id)
        .map(|t| t.description.clone())
    else {
        anyhow::bail!("task {} not found", args.id);
    };

    if !args.force {
        if !menu::is_tty() {
            anyhow::bail!("confirmation requires a TTY; pass --force to remove anyway");
        }
        if !confirm_remove(&description)? {
            println!("Removal cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    store.remove(args.id)?;
    println!("Removed task {}", args.id);
    Ok(ExitCode::SUCCESS)
}

fn confirm_remove(description: &str) -> anyhow::Result<bool> {
    print!("Remove task \"{description}\"? (y/N): ");
    std::io::Write::flush(&mut std::io::stdout())?;
    let mut input = String::new();
    let _ = std::io::stdin().read_line(&mut input)?;
    let resp = input.trim().to_lowercase();
    Ok(resp == "y" || resp == "yes")
}

fn cmd_version() -> ExitCode {
    println!("ttrack version {}", env!("CARGO_PKG_VERSION"));
    if let Some(commit) = option_env!("TTRACK_GIT_COMMIT") {
        println!("  commit: {commit}");
    }
    if let Some(date) = option_env!("TTRACK_BUILD_DATE") {
        println!("  built: {date}");
    }
    println!("  rust: {}", rustc_version_runtime::version());
    println!(
        "  os/arch: {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    ExitCode::SUCCESS
}

fn status_icon(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "○",
        TaskStatus::Ongoing => "●",
        TaskStatus::Completed => "✓",
    }
}

fn format_age(created_at: &str) -> String {
    let Ok(t) = time::OffsetDateTime::parse(
        created_at,
        &time::format_description::well_known::Rfc3339,
    ) else {
        return created_at.to_owned();
    };

    let now = time::OffsetDateTime::now_utc();
    let diff = now - t;
    if diff < time::Duration::minutes(1) {
        "just now".to_owned()
    } else if diff < time::Duration::hours(1) {
        let mins = diff.whole_minutes();
        if mins == 1 {
            "1 min ago".to_owned()
        } else {
            format!("{mins} mins ago")
        }
    } else if diff < time::Duration::days(1) {
        let hours = diff.whole_hours();
        if hours == 1 {
            "1 hour ago".to_owned()
        } else {
            format!("{hours} hours ago")
        }
    } else if diff < time::Duration::days(7) {
        let days = diff.whole_days();
        if days == 1 {
            "1 day ago".to_owned()
        } else {
            format!("{days} days ago")
        }
    } else {
        t.date().to_string()
    }
}
