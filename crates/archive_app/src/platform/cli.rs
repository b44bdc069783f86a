use std::path::PathBuf;

use anyhow::{bail, Result};
use archive_core::Msg;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "archive-fetch", version)]
#[command(about = "Find archived document sets and download them through the archive proxy")]
pub struct Cli {
    #[arg(long, global = true, help = "RON config file (default: ./archive_fetch.ron if present)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Base URL of the archive proxy")]
    pub backend: Option<String>,
    #[arg(long, global = true, help = "Catalog JSON: a file path or an http(s) URL")]
    pub catalog: Option<String>,
    #[arg(long, global = true, help = "Directory downloaded files are saved into")]
    pub out: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "List catalog groups")]
    Groups,
    #[command(about = "List the items of a group")]
    Items { group: String },
    #[command(about = "Show the documents of an item")]
    Show {
        #[command(flatten)]
        lookup: LookupArgs,
    },
    #[command(about = "Download documents of an item")]
    Download {
        #[command(flatten)]
        lookup: LookupArgs,
        #[command(flatten)]
        pick: PickArgs,
    },
}

/// Either a free-text code or a group/item pair.
#[derive(Args, Debug)]
#[group(required = true, multiple = true)]
pub struct LookupArgs {
    #[arg(long, conflicts_with_all = ["group", "item"], help = "Item code, matched case-insensitively")]
    pub code: Option<String>,
    #[arg(long, requires = "item", help = "Group key")]
    pub group: Option<String>,
    #[arg(long, requires = "group", help = "Item name within the group")]
    pub item: Option<String>,
}

impl LookupArgs {
    /// The input a user would have produced through the two entry paths.
    pub fn messages(&self) -> Vec<Msg> {
        match (&self.code, &self.group, &self.item) {
            (Some(code), _, _) => vec![Msg::CodeInputChanged(code.clone())],
            (None, Some(group), Some(item)) => vec![
                Msg::GroupSelected(group.clone()),
                Msg::ItemSelected(item.clone()),
            ],
            (None, Some(group), None) => vec![Msg::GroupSelected(group.clone())],
            (None, None, _) => Vec::new(),
        }
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PickArgs {
    #[arg(long, value_delimiter = ',', help = "1-based row numbers, e.g. 1,3")]
    pub select: Vec<usize>,
    #[arg(long, help = "Select every document")]
    pub all: bool,
}

impl PickArgs {
    /// Zero-based row indices to toggle, in the order given, without repeats.
    pub fn row_indices(&self, row_count: usize) -> Result<Vec<usize>> {
        if self.all {
            return Ok((0..row_count).collect());
        }
        let mut indices = Vec::with_capacity(self.select.len());
        for &number in &self.select {
            if number == 0 || number > row_count {
                bail!("row {number} is out of range (1..={row_count})");
            }
            if !indices.contains(&(number - 1)) {
                indices.push(number - 1);
            }
        }
        Ok(indices)
    }
}
