//! File-system operations, one per [`CommandKind`].
//!
//! Every operation reads its validated arguments from a [`ParsedInvocation`]
//! and writes human-readable lines to the context's output. Confirmation
//! prompts read from the context's input so tests can script the answers.

use std::ffi::OsStr;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use fsc_core::{CommandKind, CommandRegistry, CommandSchema, ParsedInvocation};
use tracing::{debug, info};

use crate::error::{CommandError, IoContext, Result};
use crate::prompt;

const PROGRAM: &str = "fsc";
const OVERWRITE_HINT: &str = "Use flag \"-o\" to overwrite.";

/// Extensions that get `#pragma once` on creation.
const PRAGMA_ONCE_EXTENSIONS: [&str; 5] = ["hpp", "inl", "ipp", "tpp", "hxx"];

/// Console and registry access shared by all operations.
pub struct Context<'a> {
    pub registry: &'a CommandRegistry,
    pub input: &'a mut dyn BufRead,
    pub output: &'a mut dyn Write,
}

impl Context<'_> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        prompt::confirm(question, &mut *self.input, &mut *self.output)
    }
}

/// Runs the operation bound to `kind`.
pub fn dispatch(
    kind: CommandKind,
    invocation: &ParsedInvocation,
    ctx: &mut Context<'_>,
) -> Result<()> {
    info!(command = invocation.command(), %kind, flags = ?invocation.flags(), "Executing command");
    match kind {
        CommandKind::Help => help(invocation, ctx),
        CommandKind::Create => create(invocation, ctx),
        CommandKind::Delete => delete(invocation, ctx),
        CommandKind::List => list(invocation, ctx),
        CommandKind::Read => read(invocation, ctx),
        CommandKind::Clone => clone(invocation, ctx),
        CommandKind::Move => move_item(invocation, ctx),
        CommandKind::Rename => rename(invocation, ctx),
        CommandKind::Version => version(invocation, ctx),
    }
}

// ---------------------------------------------------------------------------
// help / version
// ---------------------------------------------------------------------------

fn help(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    if invocation.has_argument("command") {
        let name = invocation.argument("command")?;
        let schema = ctx
            .registry
            .find(name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
        write_schema_help(&mut *ctx.output, schema)?;
    } else {
        writeln!(
            ctx.output,
            "Command structure: {PROGRAM} <command> <parameters> <flags>"
        )?;
        for schema in ctx.registry.all() {
            write_schema_help(&mut *ctx.output, schema)?;
        }
    }
    Ok(())
}

fn write_schema_help<W: Write + ?Sized>(
    out: &mut W,
    schema: &CommandSchema,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Command: {}", schema.name)?;
    writeln!(out, "  Parameters:")?;
    if schema.parameters.is_empty() {
        writeln!(out, "    None")?;
    }
    for parameter in &schema.parameters {
        writeln!(
            out,
            "    ({}) purpose: {} required: {}",
            parameter.name,
            parameter.purpose,
            parameter.is_required()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "  Flags:")?;
    if schema.flags.is_empty() {
        writeln!(out, "    None")?;
    }
    for flag in &schema.flags {
        writeln!(out, "    {} ({})", flag.name, flag.purpose)?;
    }
    Ok(())
}

fn version(_invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    writeln!(ctx.output, "{PROGRAM} version: {}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

fn create(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    let path = PathBuf::from(invocation.argument("path")?);
    if entry_exists(&path) {
        return Err(CommandError::AlreadyExists { path, hint: None });
    }

    let file_flag = invocation.has_flag("-f");
    let directory_flag = invocation.has_flag("-d");
    if file_flag && directory_flag {
        return Err(CommandError::ConflictingFlags("-f", "-d"));
    }

    let path = std::path::absolute(&path).with_path("resolve path", &path)?;
    let is_file = if path.extension().is_some() {
        !directory_flag
    } else {
        file_flag
    };

    if !is_file {
        fs::create_dir_all(&path).with_path("create directory", &path)?;
        let path = fs::canonicalize(&path).with_path("resolve path", &path)?;
        debug!(path = %path.display(), "Created directory");
        writeln!(ctx.output, "Created directory \"{}\".", path.display())?;
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path("create directory", parent)?;
    }
    let mut file = fs::File::create_new(&path).with_path("create file", &path)?;
    if !invocation.has_flag("-n") {
        if let Some(guard) = header_guard(&path) {
            file.write_all(guard.as_bytes())
                .with_path("write file", &path)?;
        }
    }

    let path = fs::canonicalize(&path).with_path("resolve path", &path)?;
    debug!(path = %path.display(), "Created file");
    writeln!(ctx.output, "Created file \"{}\".", path.display())?;
    Ok(())
}

/// Initial contents for C and C++ header files, if `path` is one.
fn header_guard(path: &Path) -> Option<String> {
    let extension = path.extension().and_then(OsStr::to_str)?;
    if PRAGMA_ONCE_EXTENSIONS.contains(&extension) {
        return Some("#pragma once\n\n".to_string());
    }
    if extension == "h" {
        let macro_name = guard_macro_name(&path.file_name()?.to_string_lossy());
        return Some(format!(
            "#ifndef {macro_name}\n#define {macro_name}\n\n\n\n#endif"
        ));
    }
    None
}

/// `config.h` -> `CONFIG_H`, `2d-math.h` -> `_2D_MATH_H`.
fn guard_macro_name(file_name: &str) -> String {
    let name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

fn delete(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    let path = resolve_entry(Path::new(invocation.argument("path")?))?;
    let metadata = fs::symlink_metadata(&path).with_path("inspect", &path)?;

    if !metadata.is_dir() {
        fs::remove_file(&path).with_path("delete file", &path)?;
        writeln!(ctx.output, "Deleted file \"{}\".", path.display())?;
        return Ok(());
    }

    let contents_only = invocation.has_flag("-c");
    if is_empty_dir(&path)? {
        if contents_only {
            writeln!(ctx.output, "Directory \"{}\" is already empty.", path.display())?;
        } else {
            fs::remove_dir(&path).with_path("delete directory", &path)?;
            writeln!(ctx.output, "Deleted directory \"{}\".", path.display())?;
        }
        return Ok(());
    }

    if !invocation.has_flag("-r") {
        return Err(CommandError::DirectoryNotEmpty(path));
    }

    if !invocation.has_flag("-s") {
        let question = if contents_only {
            format!("Delete contents of directory \"{}\"?", path.display())
        } else {
            format!("Delete directory and contents \"{}\"?", path.display())
        };
        if !ctx.confirm(&question)? {
            writeln!(ctx.output, "Nothing was deleted.")?;
            return Ok(());
        }
    }

    if contents_only {
        for entry in fs::read_dir(&path).with_path("read directory", &path)? {
            let entry = entry.with_path("read directory", &path)?;
            remove_entry(&entry.path())?;
        }
        writeln!(
            ctx.output,
            "Deleted contents of directory \"{}\".",
            path.display()
        )?;
    } else {
        fs::remove_dir_all(&path).with_path("delete directory", &path)?;
        writeln!(
            ctx.output,
            "Deleted directory and contents \"{}\".",
            path.display()
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// list / read
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct ListFilter {
    files: bool,
    directories: bool,
}

fn list(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    let path = if invocation.has_argument("path") {
        PathBuf::from(invocation.argument("path")?)
    } else {
        std::env::current_dir().with_path("resolve path", Path::new("."))?
    };
    let path = resolve_directory(&path)?;

    let files_only = invocation.has_flag("-f");
    let directories_only = invocation.has_flag("-d");
    if files_only && directories_only {
        return Err(CommandError::ConflictingFlags("-f", "-d"));
    }
    let filter = ListFilter {
        files: !directories_only,
        directories: !files_only,
    };

    list_directory(
        &path,
        &path,
        invocation.has_flag("-r"),
        filter,
        &mut *ctx.output,
    )
}

fn list_directory<W: Write + ?Sized>(
    root: &Path,
    dir: &Path,
    recursive: bool,
    filter: ListFilter,
    out: &mut W,
) -> Result<()> {
    for entry in sorted_entries(dir)? {
        let path = entry.path();
        let display = path.strip_prefix(root).unwrap_or(&path).display();
        if path.is_dir() {
            if filter.directories {
                writeln!(out, "D: {display}")?;
            }
            // Symlinked directories are shown but not descended into.
            let is_real_dir = entry
                .file_type()
                .with_path("inspect", &path)?
                .is_dir();
            if recursive && is_real_dir {
                list_directory(root, &path, recursive, filter, &mut *out)?;
            }
        } else if filter.files {
            writeln!(out, "F: {display}")?;
        }
    }
    Ok(())
}

fn read(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    let path = PathBuf::from(invocation.argument("path")?);
    if !path.exists() {
        return Err(CommandError::NotFound(path));
    }
    if path.is_dir() {
        return Err(CommandError::NotAFile(path));
    }

    let contents = fs::read(&path).with_path("read file", &path)?;
    ctx.output.write_all(&contents)?;
    writeln!(ctx.output)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// clone / move / rename
// ---------------------------------------------------------------------------

/// A validated request to place `target` into `destination`.
#[derive(Debug)]
struct Transfer {
    target: PathBuf,
    destination: PathBuf,
    /// `destination/<target name>`
    item: PathBuf,
}

impl Transfer {
    fn name(&self) -> String {
        self.item
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Checks a clone or move request and clears the way for it.
///
/// Returns `None` when the user declines to overwrite.
fn prepare_transfer(
    invocation: &ParsedInvocation,
    ctx: &mut Context<'_>,
) -> Result<Option<Transfer>> {
    let target = resolve_entry(Path::new(invocation.argument("target")?))?;
    let destination = resolve_directory(Path::new(invocation.argument("destination")?))?;

    if target == destination {
        return Err(CommandError::SamePath(target));
    }
    if destination.starts_with(&target) {
        return Err(CommandError::DestinationInsideTarget {
            target,
            destination,
        });
    }
    if target.parent() == Some(destination.as_path()) {
        return Err(CommandError::AlreadyInDestination {
            target,
            destination,
        });
    }

    let Some(name) = target.file_name() else {
        return Err(CommandError::NotFound(target));
    };
    let item = destination.join(name);
    if !claim_path(&item, invocation, ctx)? {
        return Ok(None);
    }

    Ok(Some(Transfer {
        target,
        destination,
        item,
    }))
}

fn clone(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    let Some(transfer) = prepare_transfer(invocation, ctx)? else {
        return Ok(());
    };

    copy_recursive(&transfer.target, &transfer.item)?;
    writeln!(
        ctx.output,
        "Cloned \"{}\" to \"{}\".",
        transfer.name(),
        transfer.destination.display()
    )?;
    Ok(())
}

fn move_item(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    let Some(transfer) = prepare_transfer(invocation, ctx)? else {
        return Ok(());
    };

    if let Err(err) = fs::rename(&transfer.target, &transfer.item) {
        debug!(error = %err, "Rename failed, falling back to copy and remove");
        move_by_copy(&transfer.target, &transfer.item)?;
    }
    writeln!(
        ctx.output,
        "Moved \"{}\" to \"{}\".",
        transfer.name(),
        transfer.destination.display()
    )?;
    Ok(())
}

fn rename(invocation: &ParsedInvocation, ctx: &mut Context<'_>) -> Result<()> {
    let target = resolve_entry(Path::new(invocation.argument("target")?))?;
    let new_name = invocation.argument("new name")?;
    if !is_plain_name(new_name) {
        return Err(CommandError::InvalidName(new_name.to_string()));
    }

    let new_path = target
        .parent()
        .map(|parent| parent.join(new_name))
        .ok_or_else(|| CommandError::NotFound(target.clone()))?;
    if new_path == target {
        return Err(CommandError::SamePath(target));
    }
    if !claim_path(&new_path, invocation, ctx)? {
        return Ok(());
    }

    fs::rename(&target, &new_path).with_path("rename", &target)?;
    writeln!(
        ctx.output,
        "Renamed \"{}\" to \"{new_name}\".",
        target.display()
    )?;
    Ok(())
}

/// Makes `path` free for a new item, honoring `-o` and `-s`.
///
/// Returns `false` when the user declines to overwrite.
fn claim_path(
    path: &Path,
    invocation: &ParsedInvocation,
    ctx: &mut Context<'_>,
) -> Result<bool> {
    if !entry_exists(path) {
        return Ok(true);
    }
    if !invocation.has_flag("-o") {
        return Err(CommandError::AlreadyExists {
            path: path.to_path_buf(),
            hint: Some(OVERWRITE_HINT),
        });
    }
    if !invocation.has_flag("-s") {
        let question = format!("Overwrite item \"{}\"?", path.display());
        if !ctx.confirm(&question)? {
            writeln!(ctx.output, "Nothing was overwritten.")?;
            return Ok(false);
        }
    }

    debug!(path = %path.display(), "Removing item to overwrite");
    remove_entry(path)?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// file-system helpers
// ---------------------------------------------------------------------------

/// Like `Path::exists`, but also true for dangling symlinks.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Absolute path of an entry without resolving the entry itself if it is a
/// symlink; only its parent directory is canonicalized.
fn resolve_entry(path: &Path) -> Result<PathBuf> {
    if !entry_exists(path) {
        return Err(CommandError::NotFound(path.to_path_buf()));
    }

    match path.file_name() {
        Some(name) => {
            let parent = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let parent = fs::canonicalize(parent).with_path("resolve path", parent)?;
            Ok(parent.join(name))
        }
        None => fs::canonicalize(path).with_path("resolve path", path),
    }
}

/// Canonical path of an existing directory.
fn resolve_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(CommandError::NotFound(path.to_path_buf()));
    }
    let path = fs::canonicalize(path).with_path("resolve path", path)?;
    if !path.is_dir() {
        return Err(CommandError::NotADirectory(path));
    }
    Ok(path)
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(path).with_path("read directory", path)?;
    Ok(entries.next().is_none())
}

fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .with_path("read directory", dir)?
        .collect::<std::io::Result<Vec<_>>>()
        .with_path("read directory", dir)?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Removes a file, symlink or whole directory tree.
fn remove_entry(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).with_path("inspect", path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).with_path("delete directory", path)
    } else {
        fs::remove_file(path).with_path("delete file", path)
    }
}

/// Copies a file or directory tree. Symlinks are recreated as links, never
/// followed.
fn copy_recursive(source: &Path, target: &Path) -> Result<()> {
    let file_type = fs::symlink_metadata(source)
        .with_path("inspect", source)?
        .file_type();

    if file_type.is_symlink() {
        copy_symlink(source, target)
    } else if file_type.is_dir() {
        fs::create_dir_all(target).with_path("create directory", target)?;
        for entry in sorted_entries(source)? {
            copy_recursive(&entry.path(), &target.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(source, target).with_path("copy", source)?;
        Ok(())
    }
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(source).with_path("read link", source)?;
    std::os::unix::fs::symlink(&link, target).with_path("create link", target)
}

#[cfg(windows)]
fn copy_symlink(source: &Path, target: &Path) -> Result<()> {
    let link = fs::read_link(source).with_path("read link", source)?;
    let created = if source.is_dir() {
        std::os::windows::fs::symlink_dir(&link, target)
    } else {
        std::os::windows::fs::symlink_file(&link, target)
    };
    created.with_path("create link", target)
}

/// Moves `source` to `target` where a plain rename is not possible, for
/// example across file systems.
fn move_by_copy(source: &Path, target: &Path) -> Result<()> {
    copy_recursive(source, target)?;
    remove_entry(source)
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', std::path::MAIN_SEPARATOR])
}
