use std::ffi::OsString;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use ghstools::io::compression::slid;
use ghstools::io::container::{stm, MapContainer};
use ghstools::io::texture::{quickcheck_tex, quickcheck_tex2, read_all, TextureReadOptions, TextureVariant};
use ghstools::modelmeta::{self, GameVersion};
use ghstools::unpack::{
    classify_map_member, default_root_dir, write_result, BlobKind, UnpackConfiguration, Unpacker,
};
use ghstools::GhsError;

#[derive(Parser)]
#[command(
    name = "ghs-tools",
    version,
    about = "Gregory Horror Show asset unpacking tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Unpack contents from the EU or JP FILE.STM.
    UnpackStm {
        /// Path to FILE.STM.
        file_stm: PathBuf,
        /// Output directory; defaults to GHS_EU_FILE_STM or GHS_JP_FILE_STM
        /// depending on the version detected.
        #[arg(short = 'd', long = "directory", value_name = "ALTERNATE_DIR")]
        directory: Option<PathBuf>,
        /// List contents as they are unpacked.
        #[arg(short, long)]
        verbose: bool,
        /// Abort on the first member that fails to decode.
        #[arg(long)]
        strict: bool,
        /// Reorder swizzled 256-color palettes of 8-bit textures.
        #[arg(long)]
        deswizzle_palette: bool,
        /// Keep MPR files that store float frames without the float flag.
        #[arg(long)]
        forced_float_mpr: bool,
    },
    /// Decompress .sli files, writing `<file>_dec` next to each.
    Decompress {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Convert texture files to PNG images.
    TexConvert {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Extract the members of .map files into `<file>_extract/`.
    MapUnpack {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Extract model metadata (.ghs files) from the EU executable.
    Modelmeta {
        /// Path to SLES_519.33.
        executable: PathBuf,
        /// Output directory; defaults to GHS_EU_FILE_STM.
        #[arg(short = 'd', long = "directory", value_name = "ALTERNATE_DIR")]
        directory: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::UnpackStm {
            file_stm,
            directory,
            verbose,
            strict,
            deswizzle_palette,
            forced_float_mpr,
        } => unpack_stm(
            &file_stm,
            directory,
            verbose,
            UnpackConfiguration {
                failsafe: !strict,
                deswizzle_palette,
                forced_float_mpr,
            },
        ),
        Command::Decompress { files } => for_each_file(&files, decompress_file),
        Command::TexConvert { files } => for_each_file(&files, convert_textures),
        Command::MapUnpack { files } => for_each_file(&files, unpack_map),
        Command::Modelmeta {
            executable,
            directory,
        } => extract_modelmeta(&executable, directory),
    }
}

/// `path` with `suffix` appended to its last component.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run `job` on every file in parallel, then print each file's messages in
/// argument order. Fails if any file failed.
fn for_each_file(files: &[PathBuf], job: fn(&Path) -> Result<Vec<String>>) -> Result<()> {
    let results: Vec<_> = files.par_iter().map(|path| job(path)).collect();
    let mut failed = 0usize;
    for (path, result) in files.iter().zip(results) {
        println!("{}", display_name(path));
        match result {
            Ok(lines) => lines.iter().for_each(|line| println!("{line}")),
            Err(e) => {
                failed += 1;
                eprintln!("!! {e:#}");
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} files failed", files.len());
    }
    Ok(())
}

fn unpack_stm(
    path: &Path,
    directory: Option<PathBuf>,
    verbose: bool,
    config: UnpackConfiguration,
) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let entry_count = match stm::count_entries(&data) {
        Some(count) if stm::quickcheck(&data) => count,
        _ => bail!("{} is not a valid STM file", path.display()),
    };
    let out_dir = directory.unwrap_or_else(|| PathBuf::from(default_root_dir(entry_count)));
    if verbose {
        println!("{entry_count} entries, unpacking to {}", out_dir.display());
    }

    let result = Unpacker::new()
        .with_config(config)
        .unpack(&data)
        .with_context(|| format!("unpack {}", path.display()))?;
    if verbose {
        for line in result.root.outline() {
            println!("{line}");
        }
    }
    for notification in &result.notifications {
        eprintln!("{notification}");
    }
    if !result.notifications.is_empty() {
        eprintln!("{}", result.notifications.summary());
    }
    write_result(&result, &out_dir).with_context(|| format!("write {}", out_dir.display()))?;
    Ok(())
}

fn decompress_file(path: &Path) -> Result<Vec<String>> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let decompressed = slid::decompress(&data)?;
    fs::write(with_suffix(path, "_dec"), decompressed)?;
    Ok(Vec::new())
}

fn convert_textures(path: &Path) -> Result<Vec<String>> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let variant = if quickcheck_tex(&data) {
        TextureVariant::V1
    } else if quickcheck_tex2(&data) {
        TextureVariant::V2
    } else {
        return Ok(vec!["!! Not a GHS texture file".to_string()]);
    };

    let stream = read_all(&data, variant, &TextureReadOptions::default())?;
    let mut lines = Vec::new();
    if let Some(raw) = stream.unknown_format {
        lines.push(format!("!! {}", GhsError::UnknownPixelFormat(raw)));
    }

    let stem = path.with_extension("");
    let digits = stream.textures.len().to_string().len();
    for (i, texture) in stream.textures.iter().enumerate() {
        let out_path = with_suffix(
            &stem,
            &format!("_{i:0digits$}_{:#05x}.png", texture.tex_offset),
        );
        let mut out = BufWriter::new(
            File::create(&out_path).with_context(|| format!("create {}", out_path.display()))?,
        );
        texture.write_png(&mut out)?;
    }
    Ok(lines)
}

fn unpack_map(path: &Path) -> Result<Vec<String>> {
    let data = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let map = MapContainer::from_bytes(&data)?;

    let out_dir = with_suffix(path, "_extract");
    fs::create_dir_all(&out_dir)?;
    for (i, member) in map.iter().enumerate() {
        let ext = match classify_map_member(member, false) {
            kind @ (BlobKind::Pm2 | BlobKind::Atr) => kind.extension(),
            _ => BlobKind::Dat.extension(),
        };
        fs::write(out_dir.join(format!("{i:08}.{ext}")), member)?;
    }
    Ok(Vec::new())
}

fn extract_modelmeta(executable: &Path, directory: Option<PathBuf>) -> Result<()> {
    let name = executable
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let version = GameVersion::from_file_name(name)?;
    version.ensure_supported()?;

    let data = fs::read(executable).with_context(|| format!("read {}", executable.display()))?;
    let files = modelmeta::extract_all(&data).context("read model metadata tables")?;
    let out_dir = directory.unwrap_or_else(|| PathBuf::from(version.default_dir()));
    modelmeta::write_all(&files, &out_dir)
        .with_context(|| format!("write {}", out_dir.display()))?;
    println!("{} model metadata files written to {}", files.len(), out_dir.display());
    Ok(())
}
