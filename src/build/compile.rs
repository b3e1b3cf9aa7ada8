use crate::cli::Configuration;
use crate::manifest::Package;
use crate::toolchain::Toolchain;
use crate::verbosity::Verbosity;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use walkdir::WalkDir;

pub const BUILD_DIR: &str = ".build";
pub const SOURCES_DIR: &str = "Sources";

/// Source files of one package, split by compiler.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub c: Vec<PathBuf>,
    pub swift: Vec<PathBuf>,
}

impl SourceFiles {
    pub fn is_empty(&self) -> bool {
        self.c.is_empty() && self.swift.is_empty()
    }

    /// A package with a `main` source builds an executable, otherwise a library.
    pub fn has_main(&self) -> bool {
        self.c
            .iter()
            .chain(&self.swift)
            .any(|p| p.file_stem().is_some_and(|s| s == "main"))
    }

    pub fn all(&self) -> impl Iterator<Item = &PathBuf> {
        self.c.iter().chain(&self.swift)
    }
}

/// Collects `.c` and `.swift` files below `package_dir/Sources`, sorted.
pub fn collect_sources(package_dir: &Path) -> SourceFiles {
    let mut sources = SourceFiles::default();
    for entry in WalkDir::new(package_dir.join(SOURCES_DIR))
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("c") => sources.c.push(path.to_owned()),
            Some("swift") => sources.swift.push(path.to_owned()),
            _ => {}
        }
    }
    sources
}

/// Everything a build needs once the mode has been resolved.
pub struct BuildRequest<'a> {
    pub root: &'a Path,
    pub package: &'a Package,
    pub external: &'a [Package],
    pub configuration: Configuration,
    pub toolchain: &'a Toolchain,
    /// `-Xcc` values, in command-line order
    pub xcc: &'a [String],
    /// `-Xlinker` values, in command-line order
    pub xld: &'a [String],
    /// `-Xswiftc` values, in command-line order
    pub xswiftc: &'a [String],
    pub verbosity: Verbosity,
}

/// Compiles the root package and its fetched dependencies into one product
/// under `.build/<configuration>/`. Returns the product path.
pub fn build_package(req: &BuildRequest<'_>) -> Result<PathBuf> {
    let start_time = Instant::now();

    let mut sources = SourceFiles::default();
    for pkg in req.external.iter().chain(std::iter::once(req.package)) {
        let found = collect_sources(&pkg.path);
        sources.c.extend(found.c);
        sources.swift.extend(found.swift);
    }
    if sources.is_empty() {
        return Err(anyhow::anyhow!(
            "No sources found in {}/",
            req.root.join(SOURCES_DIR).display()
        ));
    }

    let executable = sources.has_main();
    let out_dir = req.root.join(BUILD_DIR).join(req.configuration.dirname());
    let obj_dir = out_dir.join(format!("{}.build", req.package.name));
    fs::create_dir_all(&obj_dir)
        .with_context(|| format!("Failed to create {}", obj_dir.display()))?;
    let product = out_dir.join(product_name(&req.package.name, executable));

    println!(
        "{} Compiling {} ({})",
        "⚙️".cyan(),
        req.package.name.bold(),
        req.configuration
    );

    let objects = compile_c_sources(req, &sources.c, &obj_dir, executable)?;

    let link_args = if sources.swift.is_empty() {
        cc_link_args(req, &objects, &product, executable)
    } else {
        swiftc_args(req, &sources.swift, &objects, &product, executable)
    };
    let driver = if sources.swift.is_empty() {
        req.toolchain.cc_path.clone()
    } else {
        req.toolchain.swiftc_path.clone().with_context(|| {
            format!(
                "{} contains Swift sources but no Swift compiler was found (set SWIFT_EXEC)",
                req.package.name
            )
        })?
    };
    run_tool(&driver, &link_args, req.verbosity)?;

    println!(
        "{} Built {} in {:.2?}",
        "✓".green(),
        product.display(),
        start_time.elapsed()
    );
    Ok(product)
}

fn product_name(name: &str, executable: bool) -> String {
    if executable {
        name.to_string()
    } else if cfg!(target_os = "macos") {
        format!("lib{}.dylib", name)
    } else {
        format!("lib{}.so", name)
    }
}

/// Swift module names must be identifiers.
fn module_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn object_path(obj_dir: &Path, root: &Path, src: &Path) -> PathBuf {
    let rel = src.strip_prefix(root).unwrap_or(src);
    let flat: String = rel
        .to_string_lossy()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    obj_dir.join(flat).with_extension("o")
}

fn opt_flags(configuration: Configuration) -> &'static [&'static str] {
    match configuration {
        Configuration::Debug => &["-g", "-O0"],
        Configuration::Release => &["-O2"],
    }
}

pub(crate) fn c_compile_args(
    req: &BuildRequest<'_>,
    src: &Path,
    obj: &Path,
    executable: bool,
) -> Vec<String> {
    let mut args = vec![
        "-c".to_string(),
        src.to_string_lossy().to_string(),
        "-o".to_string(),
        obj.to_string_lossy().to_string(),
    ];
    args.extend(opt_flags(req.configuration).iter().map(|s| s.to_string()));
    if !executable {
        args.push("-fPIC".to_string());
    }
    args.extend(req.xcc.iter().cloned());
    args
}

fn compile_c_sources(
    req: &BuildRequest<'_>,
    c_sources: &[PathBuf],
    obj_dir: &Path,
    executable: bool,
) -> Result<Vec<PathBuf>> {
    if c_sources.is_empty() {
        return Ok(Vec::new());
    }

    let pb = ProgressBar::new(c_sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let objects = c_sources
        .par_iter()
        .map(|src| -> Result<PathBuf> {
            let obj = object_path(obj_dir, req.root, src);
            pb.set_message(format!(
                "{}",
                src.file_name().unwrap_or_default().to_string_lossy()
            ));
            let args = c_compile_args(req, src, &obj, executable);
            if let Err(e) = run_tool(&req.toolchain.cc_path, &args, req.verbosity) {
                pb.println(format!("{} Error compiling {}", "x".red(), src.display()));
                return Err(e);
            }
            pb.inc(1);
            Ok(obj)
        })
        .collect::<Result<Vec<_>>>();

    pb.finish_and_clear();
    objects
}

pub(crate) fn cc_link_args(
    req: &BuildRequest<'_>,
    objects: &[PathBuf],
    product: &Path,
    executable: bool,
) -> Vec<String> {
    let mut args: Vec<String> = objects
        .iter()
        .map(|o| o.to_string_lossy().to_string())
        .collect();
    if !executable {
        args.push("-shared".to_string());
    }
    args.push("-o".to_string());
    args.push(product.to_string_lossy().to_string());
    for flag in req.xld {
        args.push("-Xlinker".to_string());
        args.push(flag.clone());
    }
    args
}

pub(crate) fn swiftc_args(
    req: &BuildRequest<'_>,
    swift_sources: &[PathBuf],
    objects: &[PathBuf],
    product: &Path,
    executable: bool,
) -> Vec<String> {
    let mut args = vec![
        "-module-name".to_string(),
        module_name(&req.package.name),
        (if executable { "-emit-executable" } else { "-emit-library" }).to_string(),
    ];
    args.extend(swift_sources.iter().map(|p| p.to_string_lossy().to_string()));
    args.extend(objects.iter().map(|p| p.to_string_lossy().to_string()));
    match req.configuration {
        Configuration::Debug => args.extend(["-Onone".to_string(), "-g".to_string()]),
        Configuration::Release => args.push("-O".to_string()),
    }
    args.push("-o".to_string());
    args.push(product.to_string_lossy().to_string());
    for flag in req.xcc {
        args.push("-Xcc".to_string());
        args.push(flag.clone());
    }
    for flag in req.xld {
        args.push("-Xlinker".to_string());
        args.push(flag.clone());
    }
    args.extend(req.xswiftc.iter().cloned());
    args
}

fn run_tool(tool: &Path, args: &[String], verbosity: Verbosity) -> Result<()> {
    let command_line = format!("{} {}", tool.display(), args.join(" "));
    if verbosity >= Verbosity::Verbose {
        println!("{}", command_line.dimmed());
    }
    tracing::info!(command = %command_line, "exec");

    let output = Command::new(tool)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute {}", tool.display()))?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "{} exited with {}\n{}",
            tool.display(),
            output.status,
            stderr.trim_end()
        ));
    }
    if !stderr.trim().is_empty() {
        eprintln!("{} {}", "!".yellow(), stderr.trim_end());
    }
    Ok(())
}
