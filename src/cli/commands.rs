//! Command dispatch: maps parsed arguments onto services

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::ShareService;
use crate::application::snapshot::{decode_regions, encode_fragment};
use crate::application::ApplicationError;
use crate::cli::args::{
    Cli, Commands, ConfigCommands, NodeCommands, NodeFields, RegionCommands, ShareCommands,
    SnapshotCommands,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{
    conflict_message, department_stats, group_children, region_summaries, DropPosition, Layout,
    NodeDraft, NodeId, NodePatch, Operation, OrgTree,
};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::{node_label, TreeNodeConvert};

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see orgtree --help".into(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let mut settings = Settings::load()?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    debug!(data_dir = %settings.data_dir.display(), zoning = %settings.zoning, "settings loaded");
    let container = ServiceContainer::new(settings)?;

    match command {
        Commands::Region { command } => cmd_region(&container, command),
        Commands::Show { region } => cmd_show(&container, region),
        Commands::Stats { region } => cmd_stats(&container, region),
        Commands::Groups { region, node } => cmd_groups(&container, region, node.as_deref()),
        Commands::Node { command } => cmd_node(&container, command),
        Commands::Snapshot { command } => cmd_snapshot(&container, command),
        Commands::Share { command } => cmd_share(&container, command),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

// ============================================================
// Region commands
// ============================================================

#[instrument(level = "debug", skip(container))]
fn cmd_region(container: &ServiceContainer, command: &RegionCommands) -> CliResult<()> {
    let chart = &container.chart;
    match command {
        RegionCommands::List => {
            let summaries = region_summaries(&chart.regions()?);
            output::header(format!("{} region(s)", summaries.len()));
            for summary in &summaries {
                let staffing = if summary.has_employees { "" } else { ", placeholder" };
                output::detail(format!(
                    "{}  {} ({} people{staffing})",
                    summary.id, summary.name, summary.node_count
                ));
            }
        }
        RegionCommands::Add { name } => {
            let region = chart.add_region(name)?;
            output::success(format!("Added region {} ({})", region.name, region.id));
        }
        RegionCommands::Rename { region, name } => {
            let region = chart.rename_region(region, name)?;
            output::success(format!("Renamed region {} to {}", region.id, region.name));
        }
        RegionCommands::Delete { region } => {
            let region = chart.delete_region(region)?;
            output::success(format!("Deleted region {}", region.name));
        }
    }
    Ok(())
}

// ============================================================
// Read-only views
// ============================================================

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, region: &str) -> CliResult<()> {
    let region = container.chart.region(region)?;
    output::header(&region.name);
    output::info(region.org_data.to_tree_string());
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_stats(container: &ServiceContainer, region: &str) -> CliResult<()> {
    let region = container.chart.region(region)?;
    output::header(format!("{}: {} people", region.name, region.node_count()));
    for stat in department_stats(&region.org_data) {
        output::department(&stat.name, stat.count, None);
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_groups(container: &ServiceContainer, region: &str, node: Option<&str>) -> CliResult<()> {
    let region = container.chart.region(region)?;
    let tree = &region.org_data;
    let parent = match node {
        Some(id) => tree
            .find_by_id(&NodeId::from(id))
            .ok_or_else(|| CliError::InvalidArgs(format!("node not found: {id}")))?,
        None => tree.root(),
    };

    let grouped = group_children(parent);
    output::header(node_label(parent));
    for group in &grouped.groups {
        let layout = match group.layout {
            Layout::Horizontal => "horizontal",
            Layout::Vertical => "vertical",
        };
        output::department(group.department, group.members.len(), Some(layout));
        for member in &group.members {
            output::detail(node_label(member));
        }
    }
    if !grouped.ungrouped.is_empty() {
        output::department("(no department)", grouped.ungrouped.len(), None);
        for member in &grouped.ungrouped {
            output::detail(node_label(member));
        }
    }
    Ok(())
}

// ============================================================
// Tree edits
// ============================================================

#[instrument(level = "debug", skip(container))]
fn cmd_node(container: &ServiceContainer, command: &NodeCommands) -> CliResult<()> {
    let chart = &container.chart;
    let (region, op, dry_run) = match command {
        NodeCommands::AddChild {
            region,
            parent,
            fields,
            dry_run,
        } => {
            let node = chart.new_node(draft(fields))?;
            let op = Operation::AddChild {
                parent: parent.as_str().into(),
                node,
            };
            (region, op, *dry_run)
        }
        NodeCommands::AddSibling {
            region,
            sibling,
            fields,
            dry_run,
        } => {
            let node = chart.new_node(draft(fields))?;
            let op = Operation::AddSibling {
                sibling: sibling.as_str().into(),
                node,
            };
            (region, op, *dry_run)
        }
        NodeCommands::Edit {
            region,
            node,
            name,
            position,
            department,
            notes,
            dry_run,
        } => {
            let patch = patch(name, position, department, notes);
            if patch.is_empty() {
                return Err(CliError::InvalidArgs("nothing to change".into()));
            }
            let op = Operation::Edit {
                node: node.as_str().into(),
                patch,
            };
            (region, op, *dry_run)
        }
        NodeCommands::Delete {
            region,
            node,
            dry_run,
        } => (region, Operation::Delete { node: node.as_str().into() }, *dry_run),
        NodeCommands::MoveUp {
            region,
            node,
            dry_run,
        } => (region, Operation::MoveUp { node: node.as_str().into() }, *dry_run),
        NodeCommands::MoveDown {
            region,
            node,
            sibling,
            dry_run,
        } => {
            let op = Operation::MoveToSiblingChild {
                node: node.as_str().into(),
                sibling: sibling.as_str().into(),
            };
            (region, op, *dry_run)
        }
        NodeCommands::MoveBeside {
            region,
            node,
            target,
            dry_run,
        } => {
            let op = Operation::MoveBeside {
                node: node.as_str().into(),
                target: target.as_str().into(),
            };
            (region, op, *dry_run)
        }
        NodeCommands::Reorder {
            region,
            node,
            target,
            placement,
            dry_run,
        } => {
            let op = Operation::Reorder {
                node: node.as_str().into(),
                target: target.as_str().into(),
                placement: *placement,
            };
            (region, op, *dry_run)
        }
        NodeCommands::Drop {
            region,
            node,
            target,
            position,
            dry_run,
        } => {
            let op = Operation::Relocate {
                node: node.as_str().into(),
                target: target.as_str().into(),
                position: *position,
            };
            (region, op, *dry_run)
        }
    };

    if dry_run {
        return match chart.check(region, &op) {
            Ok(()) => {
                output::success(format!("{op}: allowed"));
                Ok(())
            }
            Err(ApplicationError::Domain(reason)) => {
                explain_rejection(container, region, &op);
                Err(CliError::Rejected(reason))
            }
            Err(e) => Err(e.into()),
        };
    }

    let description = op.to_string();
    let outcome = chart.apply(region, op.clone())?;
    if let Some(reason) = outcome.rejection {
        explain_rejection(container, region, &op);
        return Err(CliError::Rejected(reason));
    }
    if outcome.changed {
        output::success(&description);
    } else {
        output::warning("nothing changed");
    }
    output::info(outcome.tree.to_tree_string());
    Ok(())
}

/// Print the zoning explanation for a refused relocation, when there is one.
fn explain_rejection(container: &ServiceContainer, region: &str, op: &Operation) {
    let Ok(region) = container.chart.region(region) else {
        return;
    };
    if let Some(message) = zoning_message(&region.org_data, op, container) {
        output::zoning(&message);
    }
}

fn zoning_message(tree: &OrgTree, op: &Operation, container: &ServiceContainer) -> Option<String> {
    let policy = container.chart.engine().policy();
    let (node, zone_target) = match op {
        Operation::MoveUp { node } => {
            let parent = tree.find_parent(node)?;
            (node, tree.find_parent(&parent.id)?)
        }
        Operation::MoveToSiblingChild { node, sibling } => (node, tree.find_by_id(sibling)?),
        Operation::MoveBeside { node, target } => (node, tree.find_parent(target)?),
        Operation::Relocate {
            node,
            target,
            position,
        } => {
            let target_node = tree.find_by_id(target)?;
            let zone_target = match position {
                DropPosition::Below => target_node,
                DropPosition::Above => tree.find_parent(target)?,
            };
            (node, zone_target)
        }
        _ => return None,
    };
    conflict_message(tree, tree.find_by_id(node)?, zone_target, policy)
}

fn draft(fields: &NodeFields) -> NodeDraft {
    NodeDraft {
        name: fields.name.clone(),
        position: fields.position.clone(),
        department: fields.department.clone(),
        notes: fields.notes.clone(),
    }
}

/// Build a patch; an empty `--department`/`--notes` clears the field.
fn patch(
    name: &Option<String>,
    position: &Option<String>,
    department: &Option<String>,
    notes: &Option<String>,
) -> NodePatch {
    let mut patch = NodePatch::default();
    if let Some(name) = name {
        patch = patch.name(name.clone());
    }
    if let Some(position) = position {
        patch = patch.position(position.clone());
    }
    if let Some(department) = department {
        patch = patch.department(cleared(department));
    }
    if let Some(notes) = notes {
        patch = patch.notes(cleared(notes));
    }
    patch
}

fn cleared(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// ============================================================
// Snapshots and sharing
// ============================================================

#[instrument(level = "debug", skip(container))]
fn cmd_snapshot(container: &ServiceContainer, command: &SnapshotCommands) -> CliResult<()> {
    match command {
        SnapshotCommands::Export => {
            let regions = container.chart.regions()?;
            output::info(encode_fragment(&regions)?);
        }
        SnapshotCommands::Import { data } => {
            let regions = decode_regions(data)?;
            container.chart.replace_all(&regions)?;
            output::success(format!("Imported {} region(s)", regions.len()));
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_share(container: &ServiceContainer, command: &ShareCommands) -> CliResult<()> {
    match command {
        ShareCommands::Save { id } => {
            let share_id = id
                .clone()
                .unwrap_or_else(ShareService::generate_share_id);
            let regions = container.chart.regions()?;
            let saved_at = container.share.save(&share_id, &regions)?;
            output::success(format!("Shared {} region(s)", regions.len()));
            output::action("share", &share_id);
            output::detail(format!("saved at {}", saved_at.to_rfc3339()));
        }
        ShareCommands::Load { id } => match container.share.load(id)? {
            Some(snapshot) => {
                container.chart.replace_all(&snapshot.regions)?;
                output::success(format!(
                    "Loaded {} region(s) from {id} (saved {})",
                    snapshot.regions.len(),
                    snapshot.updated_at.to_rfc3339()
                ));
            }
            None => {
                return Err(CliError::InvalidArgs(format!("no shared snapshot: {id}")));
            }
        },
    }
    Ok(())
}

// ============================================================
// Config
// ============================================================

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(container.settings.to_toml()?),
        ConfigCommands::Template => output::info(Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("config", &path.display()),
                None => output::warning("no config directory on this platform"),
            }
            output::action("regions", &container.settings.regions_path().display());
            output::action("shared", &container.settings.shared_path().display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_blank_department_when_building_patch_then_clears_field() {
        let patch = patch(&None, &None, &Some("  ".into()), &Some("remote".into()));

        assert_eq!(patch.department, Some(None));
        assert_eq!(patch.notes, Some(Some("remote".into())));
        assert!(patch.name.is_none());
    }

    #[test]
    fn given_no_flags_when_building_patch_then_empty() {
        assert!(patch(&None, &None, &None, &None).is_empty());
    }
}
