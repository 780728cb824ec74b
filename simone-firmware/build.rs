//! Build script for simone-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates simone.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use simone_core::config::{parse_config, ConsoleConfig, Level};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// `simone.toml` as a typed document
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    keyboard: KeyboardSection,
    #[serde(default)]
    game: GameSection,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyboardSection {
    debounce_ms: Option<u32>,
    row_timeout_ms: Option<u32>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GameSection {
    level: Option<Level>,
    seed: Option<u64>,
}

/// Validate simone.toml so a bad file fails the build instead of falling
/// back to defaults on the board
fn validate_config() {
    println!("cargo:rerun-if-changed=simone.toml");

    let config_path = Path::new("simone.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read simone.toml", &[e.to_string()]),
    };

    let file: ConfigFile = match toml::from_str(&content) {
        Ok(file) => file,
        Err(e) => fail(
            "Invalid configuration in simone.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let defaults = ConsoleConfig::default();
    let console = ConsoleConfig {
        level: file.game.level.unwrap_or(defaults.level),
        debounce_ms: file.keyboard.debounce_ms.unwrap_or(defaults.debounce_ms),
        row_timeout_ms: file.keyboard.row_timeout_ms.unwrap_or(defaults.row_timeout_ms),
    };
    let seed = file.game.seed.filter(|&seed| seed != 0);

    let mut errors = Vec::new();
    if let Err(e) = console.validate() {
        errors.push(format!("rejected by the console: {:?}", e));
    }

    // The board reads the file with its own parser; both must agree
    match parse_config(&content) {
        Ok(parsed) if parsed.console == console && parsed.seed == seed => {}
        Ok(_) => errors.push("the firmware parser reads different values".to_string()),
        Err(e) => errors.push(format!("the firmware parser rejects the file: {:?}", e)),
    }

    if !errors.is_empty() {
        fail("Invalid configuration in simone.toml", &errors);
    }

    println!("cargo:warning=simone.toml validated successfully");
}

/// Abort the build with a boxed message
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
