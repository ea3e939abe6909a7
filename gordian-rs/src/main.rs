use std::process::ExitCode;

use tracing::warn;

use gordian::cli::{self, CliArgs};
use gordian::loader::FileLoader;
use gordian::logging;
use gordian::properties::Properties;
use gordian::script::{
    Action, CommandTable, FailurePolicy, Gordian, GordianError, RunReport, Step, Value,
};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("gordian: {e}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    logging::init(args.debug);

    match run(&args) {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("gordian: line {}: {}", failure.line, failure.error);
            }
            if report.aborted {
                eprintln!("gordian: aborted");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("gordian: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<RunReport, GordianError> {
    let root = cli::resolve_root(args.root.as_ref());

    // Commands with no handler are printed for the operator to see.
    let mut table = CommandTable::with_builtins();
    table.set_fallback(|action: &Action| {
        println!("{action}");
        Ok(())
    });

    let policy = if args.abort_on_error {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Continue
    };
    let mut gordian = Gordian::new(FileLoader::new(root), table).with_policy(policy);

    if let Some(path) = &args.properties {
        let (props, errors) =
            Properties::load_file(path).map_err(|source| GordianError::Load {
                identifier: path.display().to_string(),
                source,
            })?;
        for e in &errors {
            warn!(file = %path.display(), "{e}");
        }
        for p in props.iter() {
            gordian.set_global(p.key(), Value::parse_setting(p.value()));
        }
    }

    gordian.start(&args.script)?;
    if args.step {
        let mut tick = 0u64;
        loop {
            if gordian.step()? == Step::Finished {
                break;
            }
            tick += 1;
            println!("-- tick {tick}");
        }
    }
    gordian.finish()
}
