//! Command-line interface for groceries
//!
//! This module defines the CLI structure using clap derive macros. Running
//! without a subcommand opens the interactive list.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// groceries - shopping list manager
///
/// Add items, tick them off as purchased, filter by category or search
/// text, and delete them. Everything is kept in a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "groceries")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file (defaults to the configured path)
    #[arg(long, global = true, env = "GROCERIES_DB")]
    pub db: Option<PathBuf>,

    /// Config file (defaults to ./groceries.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive shopping list (default)
    Ui,

    /// Add an item to the list
    Add {
        /// Name of the grocery item
        item: String,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,

        /// Initial status: planned or purchased
        #[arg(short, long, default_value = "planned")]
        status: String,

        /// Who added the item (defaults to $GROCERIES_AUTHOR or config)
        #[arg(long = "by")]
        created_by: Option<String>,

        /// Category used for filtering
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List items, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Only items whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only items in this category ("All" for every category)
        #[arg(short, long, default_value = crate::task::ALL_CATEGORIES)]
        category: String,
    },

    /// Show the category filter options
    Categories,

    /// Mark an item purchased
    Check {
        /// Item id
        id: i64,
    },

    /// Mark an item planned again
    Uncheck {
        /// Item id
        id: i64,
    },

    /// Flip an item between planned and purchased
    Toggle {
        /// Item id
        id: i64,
    },

    /// Delete an item permanently
    #[command(alias = "rm")]
    Delete {
        /// Item id
        id: i64,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = task::GlobalOptions {
            db: self.db,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command.unwrap_or(Commands::Ui) {
            Commands::Ui => task::run_ui(global),
            Commands::Add {
                item,
                description,
                status,
                created_by,
                category,
            } => task::run_add(task::AddOptions {
                item,
                description,
                status,
                created_by,
                category,
                global,
            }),
            Commands::List { search, category } => task::run_list(task::ListOptions {
                search,
                category,
                global,
            }),
            Commands::Categories => task::run_categories(global),
            Commands::Check { id } => task::run_set_status(id, true, global),
            Commands::Uncheck { id } => task::run_set_status(id, false, global),
            Commands::Toggle { id } => task::run_toggle(id, global),
            Commands::Delete { id } => task::run_delete(id, global),
        }
    }
}
