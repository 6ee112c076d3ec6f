use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use kanban_client::client::{
    CreateBoardRequest, CreateTaskRequest, UpdateBoardRequest, UpdateColumnRequest,
    UpdateTaskRequest,
};
use kanban_client::config::Config;
use kanban_client::models::{Priority, Role, TaskStatus};
use kanban_client::selectors::{self, TaskFilter};
use kanban_client::store::{Store, StoreError};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(author, version, about = "Command line client for the kanban board API", long_about = None)]
struct Cli {
    /// The base URL of the API (overrides KANBAN_API_URL)
    #[arg(long, global = true)]
    url: Option<String>,
    /// Bearer token (overrides KANBAN_TOKEN and the session file)
    #[arg(long, global = true)]
    token: Option<String>,
    /// Where to keep the session token between runs (overrides KANBAN_SESSION_FILE)
    #[arg(long, global = true)]
    session: Option<PathBuf>,
    /// Skip confirmation prompts for destructive commands
    #[arg(short, long, global = true)]
    yes: bool,
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Output::Json)]
    output: Output,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign up and session commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Board commands
    Boards {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Column commands
    Columns {
        #[command(subcommand)]
        command: ColumnCommands,
    },
    /// Task commands
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Board member commands
    Members {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Notification commands
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Sign in and store the session token
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and store the session token
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show the signed-in user
    Profile,
    /// Forget the stored session token
    Signout,
}

#[derive(Subcommand)]
enum BoardCommands {
    /// List boards
    List {
        /// Only starred boards
        #[arg(long)]
        starred: bool,
    },
    /// Show a board
    Show { id: String },
    /// Create a board
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        color: Option<String>,
    },
    /// Update a board
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a board with its columns and tasks
    Delete { id: String },
    /// Toggle the starred flag
    Star { id: String },
    /// Task counts per status
    Stats { id: String },
}

#[derive(Subcommand)]
enum ColumnCommands {
    /// List the columns of a board
    List {
        #[arg(long)]
        board: String,
    },
    /// Append a column to a board
    Create {
        #[arg(long)]
        board: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Update a column
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a column and its tasks
    Delete { id: String },
    /// Move the column at index FROM to index TO
    Reorder {
        #[arg(long)]
        board: String,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List the tasks of a column
    List {
        #[arg(long)]
        column: String,
    },
    /// List every task of a board, optionally filtered
    Board {
        board: String,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// List every task visible to the user
    All {
        /// Only tasks past their due date
        #[arg(long)]
        overdue: bool,
    },
    /// Show a task
    Show { id: String },
    /// Append a task to a column
    Create {
        #[arg(long)]
        board: String,
        #[arg(long)]
        column: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "todo")]
        status: TaskStatus,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// RFC 3339 due date
        #[arg(long)]
        due: Option<DateTime<Utc>>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Update a task
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        due: Option<DateTime<Utc>>,
    },
    /// Delete a task
    Delete { id: String },
    /// Move a task to a column at a given index
    Move {
        id: String,
        #[arg(long)]
        board: String,
        #[arg(long)]
        to: String,
        #[arg(long, default_value_t = 0)]
        position: usize,
    },
    /// Assign a user to a task
    Assign { id: String, user: String },
    /// Remove a user from a task
    Unassign { id: String, user: String },
    /// Add a tag to a task
    Tag { id: String, tag: String },
    /// Remove a tag from a task
    Untag { id: String, tag: String },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// List the members of a board
    List {
        #[arg(long)]
        board: String,
    },
    /// Invite a user by email
    Add {
        #[arg(long)]
        board: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "member")]
        role: Role,
    },
    /// Change a member's role
    Role {
        #[arg(long)]
        board: String,
        user: String,
        role: Role,
    },
    /// Remove a member from a board
    Remove {
        #[arg(long)]
        board: String,
        user: String,
    },
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// List notifications
    List {
        #[arg(long)]
        unread: bool,
    },
    /// Mark a notification as read
    Read { id: String },
    /// Mark every notification as read
    ReadAll,
    /// Delete a notification
    Delete { id: String },
}

fn print<T: Serialize>(output: Output, value: &T) -> anyhow::Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Output::Yaml => print!("{}", serde_yaml::to_string(value)?),
    }
    Ok(())
}

/// Asks before destructive commands unless `--yes` was given.
fn confirm(yes: bool, prompt: &str) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    let answer = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("could not read confirmation, pass --yes to skip it")?;
    Ok(answer)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    if cli.token.is_some() {
        config.token = cli.token;
    }
    if let Some(path) = cli.session {
        config.session_file = Some(path);
    }

    let mut store = Store::from_config(&config);
    if config.token.is_none() {
        store.restore_session()?;
    }
    let output = cli.output;
    let yes = cli.yes;

    match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Signin { email, password } => {
                let user = store.sign_in(&email, &password).await?;
                print(output, &user)?;
                announce_token(&store, config.session_file.is_some());
            }
            AuthCommands::Signup {
                name,
                email,
                password,
            } => {
                let user = store.sign_up(&name, &email, &password).await?;
                print(output, &user)?;
                announce_token(&store, config.session_file.is_some());
            }
            AuthCommands::Profile => {
                let user = store.load_profile().await?;
                print(output, &user)?;
            }
            AuthCommands::Signout => {
                store.sign_out();
                eprintln!("Signed out");
            }
        },
        Commands::Boards { command } => match command {
            BoardCommands::List { starred } => {
                store.fetch_boards().await?;
                let state = store.snapshot();
                if starred {
                    print(output, &selectors::starred_boards(&state))?;
                } else {
                    print(output, &selectors::boards_by_priority(&state))?;
                }
            }
            BoardCommands::Show { id } => {
                let board = store.fetch_board(&id).await?;
                print(output, &board)?;
            }
            BoardCommands::Create {
                title,
                description,
                priority,
                color,
            } => {
                let board = store
                    .create_board(CreateBoardRequest {
                        title,
                        description,
                        priority,
                        color,
                    })
                    .await?;
                print(output, &board)?;
            }
            BoardCommands::Update {
                id,
                title,
                description,
                priority,
                color,
            } => {
                let patch = UpdateBoardRequest {
                    title,
                    description,
                    priority,
                    color,
                };
                let board = store.update_board(&id, patch).await?;
                print(output, &board)?;
            }
            BoardCommands::Delete { id } => {
                if confirm(yes, &format!("Delete board {id} with all its columns and tasks?"))? {
                    store.delete_board(&id).await?;
                    eprintln!("Board {} deleted successfully", id);
                }
            }
            BoardCommands::Star { id } => {
                store.fetch_boards().await?;
                let board = store.star_board(&id).await?;
                print(output, &board)?;
            }
            BoardCommands::Stats { id } => {
                store.load_board(&id).await?;
                print(output, &selectors::board_stats(&store.snapshot(), &id))?;
            }
        },
        Commands::Columns { command } => match command {
            ColumnCommands::List { board } => {
                store.fetch_columns(&board).await?;
                print(output, &selectors::board_columns(&store.snapshot(), &board))?;
            }
            ColumnCommands::Create {
                board,
                title,
                color,
            } => {
                store.fetch_columns(&board).await?;
                let column = store.create_column(&board, &title, color).await?;
                print(output, &column)?;
            }
            ColumnCommands::Update { id, title, color } => {
                let column = store
                    .update_column(&id, UpdateColumnRequest { title, color })
                    .await?;
                print(output, &column)?;
            }
            ColumnCommands::Delete { id } => {
                if confirm(yes, &format!("Delete column {id} and all its tasks?"))? {
                    store.delete_column(&id).await?;
                    eprintln!("Column {} deleted successfully", id);
                }
            }
            ColumnCommands::Reorder { board, from, to } => {
                store.fetch_columns(&board).await?;
                store.reorder_columns(&board, from, to).await?;
                print(output, &selectors::board_columns(&store.snapshot(), &board))?;
            }
        },
        Commands::Tasks { command } => match command {
            TaskCommands::List { column } => {
                store.fetch_tasks(&column).await?;
                print(output, &selectors::column_tasks(&store.snapshot(), &column))?;
            }
            TaskCommands::Board {
                board,
                status,
                priority,
                assignee,
                tag,
                search,
            } => {
                store.load_board(&board).await?;
                let filter = TaskFilter {
                    status,
                    priority,
                    assignee,
                    tag,
                    search,
                };
                print(output, &selectors::filter_tasks(&store.snapshot(), &board, &filter))?;
            }
            TaskCommands::All { overdue } => {
                store.fetch_all_tasks().await?;
                let state = store.snapshot();
                if overdue {
                    print(output, &selectors::overdue_tasks(&state, Utc::now()))?;
                } else {
                    let tasks: Vec<_> = state.tasks.values().flatten().collect();
                    print(output, &tasks)?;
                }
            }
            TaskCommands::Show { id } => {
                let task = store.fetch_task_details(&id).await?;
                print(output, &task)?;
            }
            TaskCommands::Create {
                board,
                column,
                title,
                description,
                status,
                priority,
                due,
                tags,
            } => {
                store.fetch_tasks(&column).await?;
                let mut request = CreateTaskRequest::new(&board, &column, &title);
                request.description = description;
                request.status = status;
                request.priority = priority;
                request.due_date = due;
                request.tags = tags;
                let task = store.create_task(request).await?;
                print(output, &task)?;
            }
            TaskCommands::Update {
                id,
                title,
                description,
                status,
                priority,
                due,
            } => {
                let patch = UpdateTaskRequest {
                    title,
                    description,
                    status,
                    priority,
                    due_date: due,
                };
                let task = store.update_task(&id, patch).await?;
                print(output, &task)?;
            }
            TaskCommands::Delete { id } => {
                if confirm(yes, &format!("Delete task {id}?"))? {
                    store.delete_task(&id).await?;
                    eprintln!("Task {} deleted successfully", id);
                }
            }
            TaskCommands::Move {
                id,
                board,
                to,
                position,
            } => {
                store.load_board(&board).await?;
                store.move_task(&id, &to, position).await?;
                print(output, &selectors::column_tasks(&store.snapshot(), &to))?;
            }
            TaskCommands::Assign { id, user } => {
                print(output, &store.add_assignee(&id, &user).await?)?;
            }
            TaskCommands::Unassign { id, user } => {
                print(output, &store.remove_assignee(&id, &user).await?)?;
            }
            TaskCommands::Tag { id, tag } => {
                print(output, &store.add_tag(&id, &tag).await?)?;
            }
            TaskCommands::Untag { id, tag } => {
                print(output, &store.remove_tag(&id, &tag).await?)?;
            }
        },
        Commands::Members { command } => match command {
            MemberCommands::List { board } => {
                store.fetch_members(&board).await?;
                let state = store.snapshot();
                print(output, &state.members.get(&board).cloned().unwrap_or_default())?;
            }
            MemberCommands::Add { board, email, role } => {
                let member = store.add_member(&board, &email, role).await?;
                print(output, &member)?;
            }
            MemberCommands::Role { board, user, role } => {
                let member = store.update_member_role(&board, &user, role).await?;
                print(output, &member)?;
            }
            MemberCommands::Remove { board, user } => {
                if confirm(yes, &format!("Remove {user} from board {board}?"))? {
                    store.remove_member(&board, &user).await?;
                    eprintln!("Member {} removed successfully", user);
                }
            }
        },
        Commands::Notifications { command } => match command {
            NotificationCommands::List { unread } => {
                store.fetch_notifications().await?;
                let state = store.snapshot();
                let notifications: Vec<_> = state
                    .notifications
                    .iter()
                    .filter(|n| !unread || !n.read)
                    .collect();
                print(output, &notifications)?;
            }
            NotificationCommands::Read { id } => {
                store.mark_notification_read(&id).await?;
                eprintln!("Notification {} marked as read", id);
            }
            NotificationCommands::ReadAll => {
                store.mark_all_notifications_read().await?;
                eprintln!("All notifications marked as read");
            }
            NotificationCommands::Delete { id } => {
                if confirm(yes, &format!("Delete notification {id}?"))? {
                    store.delete_notification(&id).await?;
                    eprintln!("Notification {} deleted successfully", id);
                }
            }
        },
    }

    Ok(())
}

fn announce_token(store: &Store, saved: bool) {
    if saved {
        return;
    }
    if let Some(token) = store.client().token() {
        eprintln!("No session file configured; export the token to stay signed in:");
        eprintln!("export KANBAN_TOKEN={}", token);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        if e
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_unauthorized)
        {
            eprintln!("Your session has expired, sign in again with `kanban auth signin`");
        }
        std::process::exit(1);
    }
}
