//! Memory-to-stream datamover CLI.

use clap::Parser;
use pyo3::prelude::*;
use pyo3::types::PyList;
use std::ffi::CString;
use std::{fs, process};

use mm2s::common::constants::WORD_SIZE_BYTES;
use mm2s::config::Config;
use mm2s::core::Datamover;
use mm2s::core::types::TransferRequest;
use mm2s::mem::Ram;
use mm2s::sim::loader;

#[derive(Parser, Debug)]
#[command(
    name = "mm2s",
    author,
    version,
    about = "Cycle-accurate memory-to-stream datamover model",
    long_about = None,
)]
struct Cli {
    /// Binary image streamed out of the modeled memory.
    #[arg(short = 'f', long, conflicts_with = "script")]
    file: Option<String>,

    /// JSON config file; missing sections fall back to defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Source address (decimal or 0x-hex); defaults to the RAM base.
    #[arg(long)]
    address: Option<String>,

    /// Bytes to transfer; defaults to the image size rounded up to a word.
    #[arg(long)]
    length: Option<u64>,

    /// Maximum words per burst.
    #[arg(long)]
    burst: Option<u64>,

    /// Deassert consumer ready every Nth tick (0 = always ready).
    #[arg(long, default_value_t = 0)]
    stall_every: u64,

    /// Write the emitted stream to a file instead of hex lines on stdout.
    #[arg(short, long)]
    out: Option<String>,

    /// Print stats as JSON.
    #[arg(long)]
    json: bool,

    /// Per-tick state trace on stderr.
    #[arg(long)]
    trace: bool,

    /// Python script to run (gem5-style).
    #[arg(long, conflicts_with = "file")]
    script: Option<String>,

    /// Arguments passed to the script as sys.argv[1:].
    #[arg(
        allow_hyphen_values = true,
        trailing_var_arg = true,
        requires = "script"
    )]
    script_args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(script) = cli.script.clone() {
        run_python_script(&script, cli.script_args);
    } else if let Some(file) = cli.file.clone() {
        cmd_file(&cli, &file);
    } else {
        eprintln!(
            "\n\x1b[1;31merror:\x1b[0m one of \x1b[1m--file\x1b[0m or \x1b[1m--script\x1b[0m is required\n"
        );
        eprintln!("\x1b[1;33mUsage:\x1b[0m");
        eprintln!(
            "  \x1b[1;36mmm2s \x1b[0m \x1b[32m-f\x1b[0m <image> [\x1b[32m--length\x1b[0m n] [\x1b[32m--burst\x1b[0m n]     \x1b[2mStream an image\x1b[0m"
        );
        eprintln!(
            "  \x1b[1;36mmm2s \x1b[0m \x1b[32m--script\x1b[0m <script.py> [args...]             \x1b[2mPython script\x1b[0m"
        );
        eprintln!();
        eprintln!("Run \x1b[1mmm2s --help\x1b[0m for full usage information.");
        process::exit(1);
    }
}

fn load_config(path: &Option<String>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read config '{}': {}", path, e);
        process::exit(1);
    });
    Config::from_json(&text).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Bad config '{}': {}", path, e);
        process::exit(1);
    })
}

fn parse_u64(text: &str) -> u64 {
    let parsed = if let Some(hex) = text.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.unwrap_or_else(|_| {
        eprintln!("\n[!] FATAL: Bad number '{}'", text);
        process::exit(1);
    })
}

fn cmd_file(cli: &Cli, path: &str) {
    let mut config = load_config(&cli.config);
    if cli.trace {
        config.general.trace = true;
    }
    if let Some(burst) = cli.burst {
        config.engine.max_burst_words = burst;
    }

    if cli.stall_every == 1 {
        eprintln!("\n[!] FATAL: --stall-every 1 never asserts ready");
        process::exit(1);
    }

    let image = loader::load_binary(path);
    let mut ram = Ram::from_config(&config.memory);
    ram.load_at(&image, config.memory.base);

    let addr = cli
        .address
        .as_deref()
        .map(parse_u64)
        .unwrap_or(config.memory.base);
    let padded = (image.len() as u64).next_multiple_of(WORD_SIZE_BYTES);
    let len = cli.length.unwrap_or(padded);

    println!(
        "[*] Streaming {} bytes from {:#x} (burst {} words)",
        len, addr, config.engine.max_burst_words
    );

    let mut mover = Datamover::new(Box::new(ram), &config);
    let req = TransferRequest::new(addr, len, config.engine.max_burst_words);
    mover.start(req);

    let mut emitted: Vec<u64> = Vec::new();
    let words = len / WORD_SIZE_BYTES;
    // Latency and stalls slow a transfer but never wedge it; anything past
    // this bound is a hang.
    let limit = 16 * words + 10_000;
    let mut tickno: u64 = 0;
    loop {
        if mover.status().done {
            break;
        }
        if let Some(kind) = mover.status().error {
            eprintln!("\n\x1b[1;31m[!] TRANSFER ERROR:\x1b[0m {}", kind);
            mover.stats.print();
            process::exit(1);
        }
        tickno += 1;
        if tickno > limit {
            eprintln!("\n[!] FATAL: transfer wedged after {} ticks", limit);
            process::exit(1);
        }
        let ready = cli.stall_every == 0 || !tickno.is_multiple_of(cli.stall_every);
        let out = mover.output();
        if out.valid && ready {
            emitted.push(out.data);
        }
        mover.tick(ready);
    }

    // The final word can still sit in the output slot after the pulse.
    let mut guard = 0;
    while mover.output().valid && guard < 8 {
        emitted.push(mover.output().data);
        mover.tick(true);
        guard += 1;
    }

    match &cli.out {
        Some(path) => {
            let bytes: Vec<u8> = emitted.iter().flat_map(|w| w.to_le_bytes()).collect();
            fs::write(path, &bytes).unwrap_or_else(|e| {
                eprintln!("\n[!] FATAL: Could not write '{}': {}", path, e);
                process::exit(1);
            });
            println!("[*] Wrote {} words to {}", emitted.len(), path);
        }
        None => {
            for word in &emitted {
                println!("{:#018x}", word);
            }
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&mover.stats).expect("stats"));
    } else {
        mover.stats.print();
    }
}

fn run_python_script(script_path: &str, script_args: Vec<String>) {
    let script_content = fs::read_to_string(script_path).unwrap_or_else(|e| {
        eprintln!("Error reading script {}: {}", script_path, e);
        process::exit(1);
    });

    Python::with_gil(|py| {
        let sys = py.import("sys").expect("sys");
        let path = sys.getattr("path").expect("path");
        // Add repo root so a pure-Python `mm2s/` package is importable.
        path.call_method1("insert", (0, ".")).expect("path.insert");

        // Inject the compiled Rust extension as `mm2s._core` so scripts can
        // import it without building the extension module separately.
        let m = PyModule::new(py, "mm2s._core").expect("module");
        _core::register_core_module(&m).expect("register");
        let modules = sys.getattr("modules").expect("modules");
        modules.set_item("mm2s._core", m).expect("inject");

        let mut full_args = vec![script_path.to_string()];
        full_args.extend(script_args);
        let py_args = PyList::new(py, &full_args).expect("argv");
        sys.setattr("argv", py_args).expect("argv");

        let code_c = CString::new(script_content).expect("code");
        let file_c = CString::new(script_path).expect("file");
        let name_c = CString::new("__main__").unwrap();

        if let Err(e) = PyModule::from_code(py, code_c.as_c_str(), file_c.as_c_str(), name_c.as_c_str())
        {
            e.print(py);
            process::exit(1);
        }
    });
}
