use argh::FromArgs;
use quickrun::Runner;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Start a program by name or path, detached, without a shell.
/// With no command, opens an interactive prompt.
struct Args {
    #[argh(switch, short = 'n')]
    /// print the resolved program and arguments instead of starting it.
    dry_run: bool,

    #[argh(switch, short = 'v')]
    /// log resolution details to stderr.
    verbose: bool,

    #[argh(positional, greedy)]
    /// program followed by its arguments; quote the program if it contains spaces.
    command: Vec<String>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let runner: Runner = Runner::default();
    if args.command.is_empty() {
        runner.prompt()?;
        return Ok(());
    }

    let input = args.command.join(" ");
    let outcome = if args.dry_run {
        runner.resolve(&input)
    } else {
        runner.run(&input)
    };

    match outcome {
        Ok(target) => {
            if args.dry_run {
                println!("{target}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
