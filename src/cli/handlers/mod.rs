use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use regex::RegexBuilder;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::backup;
use crate::io::config_io::{self, ConfigError};
use crate::io::lock::FileLock;
use crate::io::notebook_io::NotebookStore;
use crate::io::store::{self, FileStore, StoreError};
use crate::model::config::FolioConfig;
use crate::model::page::{Page, PageUpdate};
use crate::ops::{content, search, tree};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Where the notebook lives and how to present it
pub struct Context {
    pub data_dir: PathBuf,
    pub config: FolioConfig,
}

impl Context {
    pub fn load(data_dir_flag: Option<&str>) -> Result<Self, ConfigError> {
        let data_dir = config_io::resolve_data_dir(data_dir_flag);
        let config = config_io::read_config(&data_dir)?;
        Ok(Context { data_dir, config })
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, ctx: &Context) -> CmdResult {
    let json = cli.json;
    match cli.command {
        // Read commands
        Commands::Tree(args) => cmd_tree(ctx, args, json),
        Commands::Ls(args) => cmd_ls(ctx, args, json),
        Commands::Search(args) => cmd_search(ctx, args, json),

        Commands::Folder(cmd) => match cmd.action {
            FolderAction::Ls => cmd_folder_ls(ctx, json),
            FolderAction::Add(args) => cmd_folder_add(ctx, args),
            FolderAction::Rm(args) => cmd_folder_rm(ctx, args),
            FolderAction::Rename(args) => cmd_folder_rename(ctx, args),
            FolderAction::Color(args) => cmd_folder_color(ctx, args),
            FolderAction::Toggle(args) => cmd_folder_toggle(ctx, args),
        },

        Commands::Page(cmd) => match cmd.action {
            PageAction::New(args) => cmd_page_new(ctx, args),
            PageAction::Rm(args) => cmd_page_rm(ctx, args),
            PageAction::Show(args) => cmd_page_show(ctx, args, json),
            PageAction::Edit(args) => cmd_page_edit(ctx, args),
            PageAction::Mv(args) => cmd_page_mv(ctx, args),
            PageAction::Pin(args) => cmd_page_flag(ctx, args, Flag::Pinned, true),
            PageAction::Unpin(args) => cmd_page_flag(ctx, args, Flag::Pinned, false),
            PageAction::Lock(args) => cmd_page_flag(ctx, args, Flag::Locked, true),
            PageAction::Unlock(args) => cmd_page_flag(ctx, args, Flag::Locked, false),
            PageAction::Check(args) => cmd_page_check(ctx, args),
            PageAction::Export(args) => cmd_page_export(ctx, args),
        },

        Commands::Select(args) => cmd_select(ctx, args),
        Commands::Export(args) => cmd_export(ctx, args),
        Commands::Import(args) => cmd_import(ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Open the notebook under the data directory lock. Loading may itself
/// write (seeding the welcome page, setting aside corrupt data), so readers
/// take the lock too.
fn open_notebook(
    ctx: &Context,
) -> Result<(FileLock, NotebookStore<FileStore>), Box<dyn std::error::Error>> {
    let store = FileStore::open(&ctx.data_dir)?;
    let lock = FileLock::acquire_default(&ctx.data_dir)?;
    let nb = NotebookStore::load(store)?;
    Ok((lock, nb))
}

fn require_page<'a>(nb: &'a NotebookStore<FileStore>, id: &str) -> Result<&'a Page, String> {
    nb.notebook()
        .page(id)
        .ok_or_else(|| format!("page not found: {}", id))
}

fn require_folder(nb: &NotebookStore<FileStore>, id: &str) -> Result<(), String> {
    match nb.notebook().folder(id) {
        Some(_) => Ok(()),
        None => Err(format!("folder not found: {}", id)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tree(ctx: &Context, args: TreeArgs, json: bool) -> CmdResult {
    let (_lock, nb) = open_notebook(ctx)?;
    let query = args.search.as_deref().unwrap_or("");
    let view = tree::tree_view(nb.notebook(), query);
    let active = nb.active_page().map(|p| p.id.as_str());

    if json {
        return print_json(&tree_to_json(&view, active));
    }
    for line in format_tree(&view, active, &ctx.config.ui) {
        println!("{}", line);
    }
    if !query.is_empty() && view.page_count() == 0 {
        println!("no pages match '{}'", query);
    }
    Ok(())
}

fn cmd_ls(ctx: &Context, args: LsArgs, json: bool) -> CmdResult {
    let (_lock, nb) = open_notebook(ctx)?;
    let pages = if let Some(ref folder_id) = args.folder {
        if nb.notebook().folder(folder_id).is_none() {
            eprintln!("warning: no folder with id {}", folder_id);
        }
        nb.pages_in(Some(folder_id.as_str()))
    } else if args.root {
        nb.pages_in(None)
    } else if args.pinned {
        nb.pinned_pages()
    } else {
        nb.pages().iter().collect()
    };
    let pages = if args.recent {
        search::newest_first(pages)
    } else {
        pages
    };

    if json {
        let out: Vec<PageJson> = pages.iter().map(|p| page_to_json(p)).collect();
        return print_json(&out);
    }
    let active = nb.active_page().map(|p| p.id.as_str());
    for page in pages {
        let line = format_page_line(page, active == Some(page.id.as_str()), &ctx.config.ui);
        println!("{}", line.trim_end());
    }
    Ok(())
}

fn cmd_search(ctx: &Context, args: SearchArgs, json: bool) -> CmdResult {
    let (_lock, nb) = open_notebook(ctx)?;
    let re = RegexBuilder::new(&args.pattern)
        .case_insensitive(args.ignore_case)
        .build()?;
    let hits = search::search_pages(nb.notebook(), &re);

    if json {
        let out: Vec<SearchHitJson> = hits
            .iter()
            .filter_map(|hit| {
                let page = nb.notebook().page(&hit.page_id)?;
                Some(hit_to_json(hit, page.display_title()))
            })
            .collect();
        return print_json(&out);
    }

    // One line per page, naming every field that matched
    let mut seen = HashSet::new();
    for hit in &hits {
        if !seen.insert(hit.page_id.as_str()) {
            continue;
        }
        let Some(page) = nb.notebook().page(&hit.page_id) else {
            continue;
        };
        let fields: Vec<&str> = hits
            .iter()
            .filter(|h| h.page_id == hit.page_id)
            .map(|h| h.field.name())
            .collect();
        println!(
            "{}  {} {}  ({})",
            page.id,
            page.icon,
            page.display_title(),
            fields.join(", ")
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Folder commands
// ---------------------------------------------------------------------------

fn cmd_folder_ls(ctx: &Context, json: bool) -> CmdResult {
    let (_lock, nb) = open_notebook(ctx)?;
    if json {
        let out: Vec<FolderJson> = nb.folders().iter().map(folder_to_json).collect();
        return print_json(&out);
    }
    for folder in nb.folders() {
        let count = nb.pages_in(Some(folder.id.as_str())).len();
        println!("{}", format_folder_line(folder, count));
    }
    Ok(())
}

fn cmd_folder_add(ctx: &Context, args: FolderAddArgs) -> CmdResult {
    let color = match args.color {
        Some(ref c) => parse_folder_color(c)?,
        None => ctx.config.notebook.default_color,
    };
    if args.name.trim().is_empty() {
        return Err("folder name cannot be blank".into());
    }

    let (_lock, mut nb) = open_notebook(ctx)?;
    let id = nb
        .create_folder(&args.name, Some(color))?
        .ok_or_else(|| format!("a folder named '{}' already exists", args.name.trim()))?;
    println!("{}", id);
    Ok(())
}

fn cmd_folder_rm(ctx: &Context, args: IdArg) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    require_folder(&nb, &args.id)?;
    let moved = nb.pages_in(Some(args.id.as_str())).len();
    nb.delete_folder(&args.id)?;
    println!("deleted {} ({} moved to Unorganized)", args.id, moved);
    Ok(())
}

fn cmd_folder_rename(ctx: &Context, args: FolderRenameArgs) -> CmdResult {
    if args.name.trim().is_empty() {
        return Err("folder name cannot be blank".into());
    }
    let (_lock, mut nb) = open_notebook(ctx)?;
    require_folder(&nb, &args.id)?;
    nb.rename_folder(&args.id, &args.name)?;
    Ok(())
}

fn cmd_folder_color(ctx: &Context, args: FolderColorArgs) -> CmdResult {
    let color = parse_folder_color(&args.color)?;
    let (_lock, mut nb) = open_notebook(ctx)?;
    require_folder(&nb, &args.id)?;
    nb.recolor_folder(&args.id, color)?;
    Ok(())
}

fn cmd_folder_toggle(ctx: &Context, args: IdArg) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    require_folder(&nb, &args.id)?;
    let expanded = nb.toggle_folder_expansion(&args.id)?;
    println!("{}", if expanded { "expanded" } else { "collapsed" });
    Ok(())
}

// ---------------------------------------------------------------------------
// Page commands
// ---------------------------------------------------------------------------

fn cmd_page_new(ctx: &Context, args: PageNewArgs) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    if let Some(ref folder_id) = args.folder {
        require_folder(&nb, folder_id)?;
    }
    let id = nb.create_page(args.folder.as_deref())?;
    if let Some(title) = args.title {
        nb.update_page(&id, PageUpdate::title(title))?;
    }
    println!("{}", id);
    Ok(())
}

fn cmd_page_rm(ctx: &Context, args: IdArg) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    if !nb.delete_page(&args.id)? {
        return Err(format!("page not found: {}", args.id).into());
    }
    Ok(())
}

fn cmd_page_show(ctx: &Context, args: PageShowArgs, json: bool) -> CmdResult {
    let (_lock, nb) = open_notebook(ctx)?;
    let page = match args.id {
        Some(ref id) => require_page(&nb, id)?,
        None => nb.active_page().ok_or("no active page")?,
    };
    let stats = content::content_stats(&page.content);

    if json {
        return print_json(&page_detail_to_json(page, stats, args.reveal));
    }
    let folder_name = page
        .folder_id
        .as_deref()
        .and_then(|id| nb.notebook().folder(id))
        .map(|f| f.name.as_str());
    for line in format_page_detail(page, folder_name, stats) {
        println!("{}", line);
    }
    println!();
    if page.is_locked && !args.reveal {
        println!("(locked; pass --reveal to show the body)");
    } else {
        println!("{}", page.content);
    }
    Ok(())
}

fn cmd_page_edit(ctx: &Context, args: PageEditArgs) -> CmdResult {
    let body = match args.content_file {
        Some(ref path) => Some(read_content_file(path)?),
        None => args.content,
    };
    let update = PageUpdate {
        title: args.title,
        icon: args.icon,
        content: body,
        ..Default::default()
    };
    if update.is_empty() {
        return Err("nothing to change (use --title, --icon, --content or --content-file)".into());
    }

    let (_lock, mut nb) = open_notebook(ctx)?;
    if !nb.update_page(&args.id, update)? {
        return Err(format!("page not found: {}", args.id).into());
    }
    Ok(())
}

fn read_content_file(path: &str) -> Result<String, std::io::Error> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn cmd_page_mv(ctx: &Context, args: PageMvArgs) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    require_page(&nb, &args.id)?;
    if let Some(ref folder_id) = args.folder {
        require_folder(&nb, folder_id)?;
    }
    nb.move_page(&args.id, args.folder.as_deref())?;
    Ok(())
}

enum Flag {
    Pinned,
    Locked,
}

fn cmd_page_flag(ctx: &Context, args: IdArg, flag: Flag, value: bool) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    let changed = match flag {
        Flag::Pinned => nb.pin_page(&args.id, value)?,
        Flag::Locked => nb.lock_page(&args.id, value)?,
    };
    if !changed {
        return Err(format!("page not found: {}", args.id).into());
    }
    Ok(())
}

fn cmd_page_check(ctx: &Context, args: PageCheckArgs) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    require_page(&nb, &args.id)?;
    if !nb.toggle_checkbox(&args.id, args.line)? {
        return Err(format!("line {} of {} is not a checkbox", args.line, args.id).into());
    }
    Ok(())
}

fn cmd_page_export(ctx: &Context, args: PageExportArgs) -> CmdResult {
    let (_lock, nb) = open_notebook(ctx)?;
    let page = require_page(&nb, &args.id)?;
    if page.is_locked && !args.reveal {
        return Err(format!("page {} is locked (pass --reveal to export it)", args.id).into());
    }
    let dir = args.out.as_deref().map(Path::new).unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let path = dir.join(content::markdown_file_name(page));
    store::atomic_write(&path, page.content.as_bytes())?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_select(ctx: &Context, args: IdArg) -> CmdResult {
    let (_lock, mut nb) = open_notebook(ctx)?;
    require_page(&nb, &args.id)?;
    nb.set_active_page(&args.id)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Backup
// ---------------------------------------------------------------------------

fn cmd_export(ctx: &Context, args: ExportArgs) -> CmdResult {
    let store = FileStore::open(&ctx.data_dir)?;
    let doc = backup::export_backup(&store)?;
    let path = match args.out {
        Some(out) => PathBuf::from(out),
        None => PathBuf::from(format!(
            "folio_backup_{}.json",
            chrono::Local::now().format("%Y-%m-%d")
        )),
    };
    store::atomic_write(&path, doc.as_bytes())?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_import(ctx: &Context, args: ImportArgs) -> CmdResult {
    let doc = fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;

    let (_lock, nb) = open_notebook(ctx)?;
    let mut store = nb.into_store();
    let summary = backup::import_backup(&mut store, &doc)?;
    let nb = NotebookStore::load(store)?;
    println!(
        "restored {} from backup of {} ({} folders, {} pages)",
        summary.restored.join(", "),
        summary.timestamp,
        nb.folders().len(),
        nb.pages().len()
    );
    Ok(())
}
