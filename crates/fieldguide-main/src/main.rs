use std::process::ExitCode;

use fieldguide_cli::logging::init_logging;
use fieldguide_lib::output::StdIO;
use fieldguide_lib::runtime::Runtime;

fn main() -> ExitCode {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    if let Err(err) = init_logging() {
        eprintln!("{err:#}");
    }
    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

    let result = Runtime::from_env()
        .and_then(|runtime| fieldguide_cli::try_run(&arg_refs, &runtime, &mut StdIO::new()));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
