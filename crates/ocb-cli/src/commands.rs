//! Command implementations against the board API.

use anyhow::{bail, Result};

use ocb_core::{
    params::{CreateTask, UpdateTask},
    Origin, Priority, Task, TaskStatus,
};

use crate::args::{
    BlockArgs, Command, CommentArgs, CreateArgs, JsonArgs, ListArgs, PickArgs, ShowArgs,
    TaskIdArgs,
};
use crate::client::{parse_task_id, ApiClient};
use crate::format::{task_details, task_line, Paint};

/// Dispatches one parsed command.
pub async fn run(command: Command, client: &ApiClient, paint: &Paint) -> Result<()> {
    match command {
        Command::List(args) => list(args, client, paint).await,
        Command::Show(args) => show(args, client, paint).await,
        Command::Create(args) => create(args, client, paint).await,
        Command::Start(args) => start(args, client, paint).await,
        Command::Done(args) => done(args, client, paint).await,
        Command::Review(args) => review(args, client, paint).await,
        Command::Block(args) => block(args, client, paint).await,
        Command::Pick(args) => pick(args, client, paint).await,
        Command::Active(args) => active(args, client, paint).await,
        Command::Comment(args) => comment(args, client, paint).await,
        Command::Todo(args) => todo(args, client, paint).await,
    }
}

fn parse_status(value: &str) -> Result<TaskStatus> {
    match value.parse::<TaskStatus>() {
        Ok(status) => Ok(status),
        Err(e) => bail!("{e}"),
    }
}

fn parse_priority(value: &str) -> Result<Priority> {
    match value.parse::<Priority>() {
        Ok(priority) => Ok(priority),
        Err(e) => bail!("{e}"),
    }
}

fn print_tasks(tasks: &[Task], json: bool, empty_message: &str, paint: &Paint) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
    } else if tasks.is_empty() {
        println!("{}", paint.dim(empty_message));
    } else {
        for task in tasks {
            println!("{}", task_line(task, paint));
        }
    }
    Ok(())
}

async fn list(args: ListArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let mut tasks = client.list_tasks(args.all).await?;

    if let Some(status) = &args.status {
        let status = parse_status(status)?;
        tasks.retain(|t| t.status == status);
    }
    if let Some(priority) = &args.priority {
        let priority = parse_priority(priority)?;
        tasks.retain(|t| t.priority == priority);
    }
    if let Some(tag) = &args.tag {
        tasks.retain(|t| t.tags.iter().any(|candidate| candidate == tag));
    }

    print_tasks(&tasks, args.json, "No tasks found", paint)
}

async fn show(args: ShowArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let number = parse_task_id(&args.id)?;
    let task = client.find_task(number).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{}", task_details(&task, paint));
    }
    Ok(())
}

async fn create(args: CreateArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let params = CreateTask {
        title: args.title,
        description: args.description,
        priority: Some(parse_priority(&args.priority)?),
        tags: args
            .tags
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
        origin: Some(Origin::Ai),
        ..Default::default()
    };

    let task = client.create_task(&params).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{} {}", paint.green("Created:"), task_line(&task, paint));
    }
    Ok(())
}

async fn start(args: TaskIdArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let number = parse_task_id(&args.id)?;
    let task = client.find_task(number).await?;

    let updated = client
        .update_task(
            task.id,
            &UpdateTask {
                status: Some(TaskStatus::InProgress),
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await?;

    println!("{} {}", paint.blue("Started:"), task_line(&updated, paint));
    Ok(())
}

async fn done(args: TaskIdArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let number = parse_task_id(&args.id)?;
    let task = client.find_task(number).await?;

    let updated = client
        .update_task(
            task.id,
            &UpdateTask {
                status: Some(TaskStatus::Done),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;

    println!("{} {}", paint.green("Done:"), task_line(&updated, paint));
    Ok(())
}

async fn review(args: TaskIdArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let number = parse_task_id(&args.id)?;
    let task = client.find_task(number).await?;

    let updated = client
        .update_task(
            task.id,
            &UpdateTask {
                status: Some(TaskStatus::NeedsReview),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;

    println!(
        "{} {}",
        paint.magenta("Ready for review:"),
        task_line(&updated, paint)
    );
    Ok(())
}

async fn block(args: BlockArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let number = parse_task_id(&args.id)?;
    let task = client.find_task(number).await?;

    // Blocking is a reason on the task, not a workflow status
    let reason = args.reason.unwrap_or_else(|| "Blocked".to_string());
    let updated = client
        .update_task(
            task.id,
            &UpdateTask {
                blocked_reason: Some(Some(reason)),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await?;

    println!("{} {}", paint.red("Blocked:"), task_line(&updated, paint));
    Ok(())
}

async fn pick(args: PickArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let mut candidates: Vec<Task> = client
        .list_tasks(false)
        .await?
        .into_iter()
        .filter(|t| t.status == TaskStatus::Todo)
        .collect();

    if args.priority {
        candidates.sort_by_key(|t| t.priority.rank());
    }

    let Some(task) = candidates.into_iter().next() else {
        println!("{}", paint.dim("No TODO tasks available"));
        return Ok(());
    };

    let updated = client
        .update_task(
            task.id,
            &UpdateTask {
                status: Some(TaskStatus::InProgress),
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await?;

    println!("{} {}", paint.blue("Picked up:"), task_line(&updated, paint));
    Ok(())
}

async fn active(args: JsonArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let tasks = client.list_tasks(false).await?;
    let Some(task) = tasks.into_iter().find(|t| t.is_active) else {
        println!("{}", paint.dim("No active task"));
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("{}", task_details(&task, paint));
    }
    Ok(())
}

async fn comment(args: CommentArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let number = parse_task_id(&args.id)?;
    let task = client.find_task(number).await?;

    client.add_comment(task.id, &args.message).await?;

    println!(
        "{} {}",
        paint.green("Comment added to"),
        paint.dim(&format!("OCB-{number}"))
    );
    Ok(())
}

async fn todo(args: JsonArgs, client: &ApiClient, paint: &Paint) -> Result<()> {
    let tasks: Vec<Task> = client
        .list_tasks(false)
        .await?
        .into_iter()
        .filter(|t| t.status == TaskStatus::Todo)
        .collect();

    print_tasks(&tasks, args.json, "No TODO tasks", paint)
}
