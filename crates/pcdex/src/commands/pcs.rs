//! PC command handlers.

use tabled::Tabled;

use pcdex_core::{
    Inventory, NotesUpdate, Pc, PcId, PcListParams, PcSummary, TagAssignment, TagId,
};

use crate::cli::{GlobalOpts, PcsArgs, PcsCommand};
use crate::error::CliError;
use crate::output;

use super::tags::TagRow;
use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PcRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "RAM")]
    ram: String,
    #[tabled(rename = "Submitted")]
    submitted: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl From<&PcSummary> for PcRow {
    fn from(row: &PcSummary) -> Self {
        Self {
            id: util::short_id(row.id.as_str()),
            host: row.host.clone().unwrap_or_else(|| "-".into()),
            cpu: row.cpu.clone().unwrap_or_else(|| "-".into()),
            ram: format_ram(row.ram_total_gb),
            submitted: row
                .submitted_at
                .as_deref()
                .and_then(util::format_age)
                .unwrap_or_else(|| "-".into()),
            tags: row
                .tags
                .iter()
                .map(|b| b.name.clone())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn format_ram(gb: Option<f64>) -> String {
    match gb {
        Some(gb) => format!("{gb:.0} GB"),
        None => "-".into(),
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn detail(pc: &Pc, colored: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", pc.id),
        format!("Host:        {}", pc.host.as_deref().unwrap_or("-")),
        format!("Serial:      {}", pc.serial.as_deref().unwrap_or("-")),
        format!("CPU:         {}", pc.cpu.as_deref().unwrap_or("-")),
        format!("Mainboard:   {}", pc.mainboard.as_deref().unwrap_or("-")),
        format!("Resolution:  {}", pc.resolution.as_deref().unwrap_or("-")),
        format!("RAM:         {}", format_ram(pc.ram_total_gb)),
        format!("RAM slots:   {}", pc.ram_slots.as_deref().unwrap_or("-")),
    ];

    match pc.submitted_at.as_deref() {
        Some(ts) => {
            let age = util::format_age(ts).map(|a| format!(" ({a})")).unwrap_or_default();
            lines.push(format!("Submitted:   {ts}{age}"));
        }
        None => lines.push("Submitted:   -".to_owned()),
    }

    lines.push(format!("Notes:       {}", pc.notes.as_deref().unwrap_or("")));

    if !pc.gpus.is_empty() {
        lines.push(String::new());
        lines.push("GPUs:".to_owned());
        for gpu in &pc.gpus {
            lines.push(format!("  {gpu}"));
        }
    }

    if !pc.ram_sticks.is_empty() {
        lines.push(String::new());
        lines.push("RAM sticks:".to_owned());
        for stick in &pc.ram_sticks {
            lines.push(format!(
                "  {} GB {} - {}",
                stick.size_gb,
                stick.kind.as_deref().unwrap_or("?"),
                stick.model.as_deref().unwrap_or("unknown"),
            ));
        }
    }

    if !pc.disks.is_empty() {
        lines.push(String::new());
        lines.push("Disks:".to_owned());
        for disk in &pc.disks {
            lines.push(format!(
                "  {} GB - {} ({})",
                disk.size_gb,
                disk.model.as_deref().unwrap_or("unknown"),
                disk.path.as_deref().unwrap_or("-"),
            ));
        }
    }

    if !pc.tags.is_empty() {
        lines.push(String::new());
        let badges = pc
            .tags
            .iter()
            .map(|t| util::badge(&t.name, &t.color, colored))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("Tags: {badges}"));
    }

    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    inventory: &Inventory,
    args: PcsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PcsCommand::List { sort_by, order, tag } => {
            let params = PcListParams {
                sort_by: sort_by.map(Into::into),
                sort_order: order.map(Into::into),
                tag,
            };
            let rows = inventory.pcs(&params).await?;
            let out = output::render_list(
                &global.output,
                rows.as_slice(),
                |p| PcRow::from(p),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PcsCommand::Get { id } => {
            let pc = inventory.pc(&PcId::from(id)).await?;
            let colored = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                pc.as_ref(),
                |p| detail(p, colored),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PcsCommand::Notes { id, notes } => {
            inventory
                .update_notes()
                .trigger(NotesUpdate {
                    pc_id: PcId::from(id),
                    notes,
                })
                .await?;
            if !global.quiet {
                eprintln!("Notes updated");
            }
            Ok(())
        }

        PcsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete PC {id} and all its component records? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }
            inventory.delete_pc().trigger(PcId::from(id)).await?;
            if !global.quiet {
                eprintln!("PC deleted");
            }
            Ok(())
        }

        PcsCommand::Tag { id, tag_id } => {
            inventory
                .add_tag()
                .trigger(TagAssignment {
                    pc_id: PcId::from(id),
                    tag_id: TagId::new(tag_id),
                })
                .await?;
            if !global.quiet {
                eprintln!("Tag attached");
            }
            Ok(())
        }

        PcsCommand::Untag { id, tag_id } => {
            inventory
                .remove_tag()
                .trigger(TagAssignment {
                    pc_id: PcId::from(id),
                    tag_id: TagId::new(tag_id),
                })
                .await?;
            if !global.quiet {
                eprintln!("Tag detached");
            }
            Ok(())
        }

        PcsCommand::Tags { id } => {
            let tags = inventory.pc_tags(&PcId::from(id)).await?;
            let out = output::render_list(
                &global.output,
                tags.as_slice(),
                |t| TagRow::from(t),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
