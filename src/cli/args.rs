//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::{DropPosition, Placement};

/// Regional org charts: edit reporting lines under department zoning rules
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Data directory (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::DirPath, env = "ORGTREE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage regions
    Region {
        #[command(subcommand)]
        command: RegionCommands,
    },

    /// Print a region's chart as a tree
    Show {
        /// Region id or name
        region: String,
    },

    /// Head count per department
    Stats {
        /// Region id or name
        region: String,
    },

    /// Department groups among a node's direct reports
    Groups {
        /// Region id or name
        region: String,
        /// Node id (default: root)
        node: Option<String>,
    },

    /// Edit the chart
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Export/import URL-safe snapshots of all regions
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },

    /// Save/load shared-link snapshots
    Share {
        #[command(subcommand)]
        command: ShareCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegionCommands {
    /// List regions
    List,
    /// Add an empty region
    Add {
        /// Region name
        name: String,
    },
    /// Rename a region
    Rename {
        /// Region id or name
        region: String,
        /// New name
        name: String,
    },
    /// Delete a region without employees
    Delete {
        /// Region id or name
        region: String,
    },
}

/// Fields of a new node.
#[derive(Args, Debug, Clone)]
pub struct NodeFields {
    /// Person's name
    #[arg(long)]
    pub name: String,
    /// Job title
    #[arg(long)]
    pub position: String,
    /// Department
    #[arg(long)]
    pub department: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// Add a direct report
    AddChild {
        region: String,
        /// Parent node id
        parent: String,
        #[command(flatten)]
        fields: NodeFields,
        /// Only check, do not store
        #[arg(long)]
        dry_run: bool,
    },
    /// Add a colleague under the same manager
    AddSibling {
        region: String,
        /// Sibling node id
        sibling: String,
        #[command(flatten)]
        fields: NodeFields,
        #[arg(long)]
        dry_run: bool,
    },
    /// Change a node's fields (empty string clears department/notes)
    Edit {
        region: String,
        node: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Remove a node and everyone under it
    Delete {
        region: String,
        node: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Move a node (with its reports) up one level
    MoveUp {
        region: String,
        node: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Move a node (with its reports) under one of its siblings
    MoveDown {
        region: String,
        node: String,
        sibling: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Move a node (with its reports) next to another node
    MoveBeside {
        region: String,
        node: String,
        target: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// Change order among siblings
    Reorder {
        region: String,
        node: String,
        target: String,
        /// before|after
        #[arg(long, default_value = "after")]
        placement: Placement,
        #[arg(long)]
        dry_run: bool,
    },
    /// Drag a node next to another; its reports stay with the old manager
    Drop {
        region: String,
        node: String,
        target: String,
        /// above|below
        #[arg(long, default_value = "below")]
        position: DropPosition,
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Print a `#data=` fragment of all regions
    Export,
    /// Replace all regions from a fragment or payload
    Import {
        /// Fragment (`#data=...`) or bare payload
        data: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShareCommands {
    /// Store all regions under a share id (new id if omitted)
    Save {
        id: Option<String>,
    },
    /// Replace all regions with a shared snapshot
    Load {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,
    /// Print config template
    Template,
    /// Show config and data paths
    Path,
}
