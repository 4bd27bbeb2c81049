//! Tag command handlers.

use tabled::Tabled;

use pcdex_core::{Inventory, Tag, TagCreate, TagId};

use crate::cli::{GlobalOpts, TagsArgs, TagsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct TagRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
}

impl From<&Tag> for TagRow {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.as_i64(),
            name: tag.name.clone(),
            color: tag.color.clone(),
        }
    }
}

fn detail(tag: &Tag, colored: bool) -> String {
    [
        format!("ID:     {}", tag.id),
        format!("Name:   {}", util::badge(&tag.name, &tag.color, colored)),
        format!("Color:  {}", tag.color),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    inventory: &Inventory,
    args: TagsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TagsCommand::List => {
            let tags = inventory.tags().await?;
            let out = output::render_list(
                &global.output,
                tags.as_slice(),
                |t| TagRow::from(t),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TagsCommand::Create { name, color } => {
            let tag = inventory
                .create_tag()
                .trigger(TagCreate { name, color })
                .await?;
            let colored = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &tag,
                |t| detail(t, colored),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TagsCommand::Delete { id } => {
            let tag = resolve_tag(inventory, TagId::new(id)).await?;
            if !util::confirm(
                &format!("Delete tag '{}' from every PC? This cannot be undone.", tag.name),
                global.yes,
            )? {
                return Ok(());
            }
            inventory.delete_tag().trigger(tag).await?;
            if !global.quiet {
                eprintln!("Tag deleted");
            }
            Ok(())
        }
    }
}

/// Look a tag up by id through the cached tag list.
pub(crate) async fn resolve_tag(inventory: &Inventory, id: TagId) -> Result<Tag, CliError> {
    let tags = inventory.tags().await?;
    tags.iter()
        .find(|t| t.id == id)
        .cloned()
        .ok_or_else(|| CliError::NotFound {
            resource: "tag".into(),
            message: format!("no tag with id {id}"),
            list_command: "tags list".into(),
        })
}
