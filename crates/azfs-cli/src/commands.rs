use std::io::Write;

use azfs_sdk::{AzFs, BlobStore, Removal};
use serde::Serialize;
use tracing::info;

use crate::cli::*;
use crate::render::{container_line, entry_line};

pub fn run_command<S: BlobStore>(
    fs: &AzFs<S>,
    command: Command,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Mkdir(args) => cmd_mkdir(fs, args),
        Command::Lsdir(_) => cmd_lsdir(fs, format, out),
        Command::Rmdir(args) => cmd_rmdir(fs, args),
        Command::Put(args) => Ok(fs.put(&args.local, &args.remote)?),
        Command::Get(args) => Ok(fs.get(&args.remote, &args.local)?),
        Command::Rm(args) => Ok(fs.rm(&args.remote)?),
        Command::Ls(args) => cmd_ls(fs, args, format, out),
        Command::Chdir(args) => {
            writeln!(out, "{}", fs.chdir(&args.remote))?;
            Ok(())
        }
    }
}

fn cmd_mkdir<S: BlobStore>(fs: &AzFs<S>, args: RemoteArgs) -> anyhow::Result<()> {
    if !fs.mkdir(&args.remote)? {
        info!(path = %args.remote, "container already exists");
    }
    Ok(())
}

fn cmd_rmdir<S: BlobStore>(fs: &AzFs<S>, args: RemoteArgs) -> anyhow::Result<()> {
    match fs.rmdir(&args.remote)? {
        Removal::Container => info!(path = %args.remote, "deleted container"),
        Removal::Blobs(count) => info!(path = %args.remote, count, "deleted blobs"),
    }
    Ok(())
}

fn cmd_lsdir<S: BlobStore>(
    fs: &AzFs<S>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let containers = fs.lsdir()?;
    match format {
        OutputFormat::Json => write_json(out, &containers),
        OutputFormat::Text => {
            for container in &containers {
                writeln!(out, "{}", container_line(container))?;
            }
            Ok(())
        }
    }
}

fn cmd_ls<S: BlobStore>(
    fs: &AzFs<S>,
    args: RemoteArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let entries = fs.ls(&args.remote)?;
    match format {
        OutputFormat::Json => write_json(out, &entries),
        OutputFormat::Text => {
            for entry in &entries {
                writeln!(out, "{}", entry_line(entry))?;
            }
            Ok(())
        }
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
