//! Line-oriented command driver over a [`CategoryBoard`].
//!
//! Saves, deletes and toggles run in background tasks so the prompt stays
//! responsive during their simulated round-trip. [`run`] waits for every task
//! it started before returning, so a closed input never loses a mutation.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinSet;

use crate::actions::{ActionError, CategoryBoard};
use crate::domain::category::Category;
use crate::domain::types::CategoryId;
use crate::forms::categories::{
    CategoryForm, DeleteCategoryForm, ReorderCategoryForm, ToggleCategoryForm,
};
use crate::repository::{CategoryReader, CategoryWriter};

pub const HELP: &str = "\
commands:
  list [query]                    show categories, optionally filtered
  add <name> <#color> [desc...]   create a category
  rename <id> <name>              rename a category
  toggle <id>                     flip the active flag
  delete <id>                     delete a category and its subcategories
  move <source> <target> [query]  drop <source> onto <target>
  parents <id>                    list valid parents for <id>
  quit";

/// Reads commands from `input` until `quit` or end of input, then waits for
/// the actions still in flight.
pub async fn run<R, I>(board: &CategoryBoard<R>, input: I) -> io::Result<()>
where
    R: CategoryReader + CategoryWriter + Send + Sync + 'static,
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut pending = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        if !execute(board, &line, &mut pending) {
            break;
        }
    }

    while let Some(joined) = pending.join_next().await {
        if let Err(e) = joined {
            log::error!("Console action task failed: {e}");
        }
    }
    Ok(())
}

/// Handles one command line. Returns `false` when the driver should stop.
fn execute<R>(board: &CategoryBoard<R>, line: &str, pending: &mut JoinSet<()>) -> bool
where
    R: CategoryReader + CategoryWriter + Send + Sync + 'static,
{
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return true;
    };
    let args: Vec<&str> = words.collect();

    match (command, args.as_slice()) {
        ("quit" | "exit", _) => return false,
        ("list", query) => print_list(board, &query.join(" ")),
        ("add", [name, color, description @ ..]) => {
            let form = CategoryForm {
                name: name.to_string(),
                color: color.to_string(),
                description: description.join(" "),
                ..CategoryForm::default()
            };
            let board = board.clone();
            spawn_action(pending, async move { board.submit(form).await });
        }
        ("rename", [id, name @ ..]) if !name.is_empty() => match find(board, id) {
            Some(category) => {
                let mut form = CategoryForm::from_category(&category);
                form.name = name.join(" ");
                let board = board.clone();
                spawn_action(pending, async move { board.submit(form).await });
            }
            None => println!("no category {id}"),
        },
        ("toggle", [id]) => match find(board, id) {
            Some(category) => {
                let form = ToggleCategoryForm {
                    category_id: id.to_string(),
                    is_active: !category.is_active,
                };
                let board = board.clone();
                spawn_action(pending, async move { board.toggle_status(form).await });
            }
            None => println!("no category {id}"),
        },
        ("delete", [id]) => {
            let preview = CategoryId::new(*id)
                .ok()
                .and_then(|id| board.delete_preview(&id).ok());
            if let Some(preview) = preview.filter(|p| p.has_subcategories()) {
                println!(
                    "\"{}\" has subcategories that will also be deleted: {}",
                    preview.name,
                    preview.subcategory_names.join(", ")
                );
            }
            let form = DeleteCategoryForm {
                category_id: id.to_string(),
            };
            let board = board.clone();
            spawn_action(pending, async move { board.delete(form).await });
        }
        ("move", [source, target, query @ ..]) => {
            let form = ReorderCategoryForm {
                source_id: source.to_string(),
                target_id: target.to_string(),
                search: query.join(" "),
            };
            if let Err(e) = board.reorder(form) {
                report(e);
            }
        }
        ("parents", [id]) => {
            let editing = CategoryId::new(*id).ok();
            match board.parent_options(editing.as_ref()) {
                Ok(options) => {
                    for option in options {
                        println!("  {}  {}", option.id, option.name);
                    }
                }
                Err(e) => println!("error: {e}"),
            }
        }
        _ => println!("{HELP}"),
    }
    true
}

/// Prints the rows matching `query` in display order.
pub fn print_list<R>(board: &CategoryBoard<R>, query: &str)
where
    R: CategoryReader + CategoryWriter + Send + Sync + 'static,
{
    match board.list(query) {
        Ok(rows) if rows.is_empty() => println!("(no categories)"),
        Ok(rows) => {
            for row in rows {
                let parent = row
                    .parent_name
                    .map(|p| format!(" <- {p}"))
                    .unwrap_or_default();
                let status = if row.is_active { "active" } else { "inactive" };
                println!(
                    "{:>3}  {:<36}  {:<20} {} {:<8}{parent}",
                    row.sort_order, row.id, row.name, row.color, status
                );
            }
        }
        Err(e) => println!("error: {e}"),
    }
}

fn find<R>(board: &CategoryBoard<R>, id: &str) -> Option<Category>
where
    R: CategoryReader + CategoryWriter + Send + Sync + 'static,
{
    let id = CategoryId::new(id).ok()?;
    match board.repository().get_category_by_id(&id) {
        Ok(category) => category,
        Err(e) => {
            log::error!("Failed to get category {id}: {e}");
            None
        }
    }
}

fn spawn_action<T, F>(pending: &mut JoinSet<()>, action: F)
where
    T: Send + 'static,
    F: Future<Output = Result<T, ActionError>> + Send + 'static,
{
    pending.spawn(async move {
        if let Err(e) = action.await {
            report(e);
        }
    });
}

fn report(error: ActionError) {
    match error {
        ActionError::Validation(fields) => {
            for (field, messages) in fields {
                println!("  {field}: {}", messages.join(" "));
            }
        }
        other => println!("error: {other}"),
    }
}
