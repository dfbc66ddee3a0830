use anyhow::{bail, Context, Result};
use brightboost::{
    config::Config, CommitTarget, ClassStore, ImportSession, ImportState, JsonFileStore,
};
use glob::glob;
use rayon::prelude::*;
use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: brightboost [--config FILE] [--commit] [--class ID] <CSV|DIR>...";

struct Args {
    config: Option<PathBuf>,
    commit: bool,
    class_id: Option<String>,
    inputs: Vec<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: env::var_os("BRIGHTBOOST_CONFIG").map(PathBuf::from),
        commit: false,
        class_id: None,
        inputs: Vec::new(),
    };

    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(PathBuf::from(it.next().context(USAGE)?)),
            "--commit" => args.commit = true,
            "--class" => args.class_id = Some(it.next().context(USAGE)?),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {}\n{}", flag, USAGE),
            _ => args.inputs.push(PathBuf::from(arg)),
        }
    }
    if args.inputs.is_empty() {
        bail!(USAGE);
    }
    Ok(args)
}

/// Files as given; directories expand to their `*.csv` entries, sorted.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let pattern = format!("{}/*.csv", input.display());
            let mut found: Vec<PathBuf> = glob(&pattern)
                .with_context(|| format!("invalid glob pattern '{}'", pattern))?
                .filter_map(|entry| entry.ok())
                .collect();
            found.sort();
            if found.is_empty() {
                warn!(dir = %input.display(), "no CSV files in directory");
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn report(path: &Path, state: &ImportState) {
    match state {
        ImportState::Upload { last_error } => {
            println!("✘ {}", path.display());
            if let Some(msg) = last_error {
                for line in msg.lines() {
                    println!("    {}", line);
                }
            }
        }
        ImportState::Invalid { errors } => {
            println!("✘ {}", path.display());
            for e in errors {
                println!("    {}", e);
            }
        }
        ImportState::Ready { data } => println!(
            "✔ {}: {} ({} students)",
            path.display(),
            data.class_name,
            data.students.len()
        ),
        ImportState::Committed { class } => println!(
            "✔ {}: committed {} as {} ({} students)",
            path.display(),
            class.name,
            class.id,
            class.students.len()
        ),
        ImportState::CommitFailed { message, .. } => {
            println!("✘ {}: commit failed: {}", path.display(), message)
        }
    }
}

fn run() -> Result<bool> {
    let args = parse_args()?;
    let cfg = Config::load(args.config.as_deref())?;

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!(tokenizer = cfg.tokenizer.as_str(), store = %cfg.store_dir.display(), "startup");

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        bail!("no CSV files to import");
    }

    // parse + validate in parallel, one session per file
    let mut sessions: Vec<(PathBuf, ImportSession, Option<String>)> = files
        .into_par_iter()
        .map(|path| {
            let mut session = ImportSession::new(cfg.tokenizer);
            let io_error = session.load_file(&path).err().map(|e| format!("{:#}", e));
            (path, session, io_error)
        })
        .collect();

    let store = if args.commit {
        Some(JsonFileStore::open(&cfg.store_dir)?)
    } else {
        None
    };
    let target = match args.class_id {
        Some(id) => CommitTarget::Existing(id),
        None => CommitTarget::NewClass,
    };

    let mut all_ok = true;
    for (path, session, io_error) in sessions.iter_mut() {
        if let Some(msg) = io_error {
            error!(path = %path.display(), "{}", msg);
            println!("✘ {}: {}", path.display(), msg);
            all_ok = false;
            continue;
        }

        let ready = matches!(session.state(), ImportState::Ready { .. });
        if let (Some(store), true) = (&store, ready) {
            session.confirm(store as &dyn ClassStore, target.clone())?;
        }

        let state = session.state();
        all_ok &= matches!(
            state,
            ImportState::Ready { .. } | ImportState::Committed { .. }
        );
        report(path, state);
    }

    info!(ok = all_ok, "all done");
    Ok(all_ok)
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
