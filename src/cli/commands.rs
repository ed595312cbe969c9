use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio", about = concat!("folio v", env!("CARGO_PKG_VERSION"), " - folders and pages in plain JSON"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the notebook as a tree: pinned, folders, unorganized
    Tree(TreeArgs),
    /// List pages
    Ls(LsArgs),
    /// Search page titles and bodies by regex
    Search(SearchArgs),
    /// Folder management
    Folder(FolderCmd),
    /// Page management
    Page(PageCmd),
    /// Select the active page
    Select(IdArg),
    /// Write a backup of the notebook
    Export(ExportArgs),
    /// Restore a backup written by `export`
    Import(ImportArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TreeArgs {
    /// Only show pages whose title contains this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct LsArgs {
    /// Only pages in this folder
    #[arg(long, conflicts_with_all = ["root", "pinned"])]
    pub folder: Option<String>,
    /// Only unorganized pages
    #[arg(long, conflicts_with = "pinned")]
    pub root: bool,
    /// Only pinned pages
    #[arg(long)]
    pub pinned: bool,
    /// Most recently updated first
    #[arg(long)]
    pub recent: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
    /// Case-insensitive match
    #[arg(short = 'i', long)]
    pub ignore_case: bool,
}

#[derive(Args)]
pub struct IdArg {
    /// Page or folder ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Folder commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct FolderCmd {
    #[command(subcommand)]
    pub action: FolderAction,
}

#[derive(Subcommand)]
pub enum FolderAction {
    /// List folders
    Ls,
    /// Create a folder
    Add(FolderAddArgs),
    /// Delete a folder (its pages move to Unorganized)
    Rm(IdArg),
    /// Rename a folder
    Rename(FolderRenameArgs),
    /// Change a folder's color
    Color(FolderColorArgs),
    /// Expand or collapse a folder in the tree
    Toggle(IdArg),
}

#[derive(Args)]
pub struct FolderAddArgs {
    /// Folder name
    pub name: String,
    /// Color (accent, rose, orange, amber, green, blue, indigo, purple)
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct FolderRenameArgs {
    /// Folder ID
    pub id: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct FolderColorArgs {
    /// Folder ID
    pub id: String,
    /// New color
    pub color: String,
}

// ---------------------------------------------------------------------------
// Page commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct PageCmd {
    #[command(subcommand)]
    pub action: PageAction,
}

#[derive(Subcommand)]
pub enum PageAction {
    /// Create a page (it becomes active)
    New(PageNewArgs),
    /// Delete a page
    Rm(IdArg),
    /// Show a page (default: the active page)
    Show(PageShowArgs),
    /// Edit page fields
    Edit(PageEditArgs),
    /// Move a page into a folder, or to Unorganized without --folder
    Mv(PageMvArgs),
    /// Pin a page
    Pin(IdArg),
    /// Unpin a page
    Unpin(IdArg),
    /// Mark a page locked
    Lock(IdArg),
    /// Clear a page's locked flag
    Unlock(IdArg),
    /// Toggle the checkbox on a body line (0-based)
    Check(PageCheckArgs),
    /// Write a page body to <title>.md
    Export(PageExportArgs),
}

#[derive(Args)]
pub struct PageNewArgs {
    /// Create inside this folder
    #[arg(long)]
    pub folder: Option<String>,
    /// Initial title
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args)]
pub struct PageShowArgs {
    /// Page ID (default: active page)
    pub id: Option<String>,
    /// Print the body even if the page is locked
    #[arg(long)]
    pub reveal: bool,
}

#[derive(Args)]
pub struct PageEditArgs {
    /// Page ID
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
    /// New body text
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,
    /// Read the new body from a file ("-" for stdin)
    #[arg(long)]
    pub content_file: Option<String>,
}

#[derive(Args)]
pub struct PageMvArgs {
    /// Page ID
    pub id: String,
    /// Target folder ID (omit to move to Unorganized)
    #[arg(long)]
    pub folder: Option<String>,
}

#[derive(Args)]
pub struct PageCheckArgs {
    /// Page ID
    pub id: String,
    /// Line number in the body (0-based)
    pub line: usize,
}

#[derive(Args)]
pub struct PageExportArgs {
    /// Page ID
    pub id: String,
    /// Directory to write into (default: current directory)
    #[arg(long)]
    pub out: Option<String>,
    /// Export even if the page is locked
    #[arg(long)]
    pub reveal: bool,
}

// ---------------------------------------------------------------------------
// Backup
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: folio_backup_<date>.json)
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Backup file to restore
    pub file: String,
}
