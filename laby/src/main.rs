use std::{io, process::ExitCode};

use clap::Parser;
use log::LevelFilter;

use laby::{
    app::{self, AppError, Options},
    cli::{resolve_dims, Args},
    logging,
    settings::{Delays, Settings},
};

fn run(args: Args) -> Result<(), AppError> {
    if args.reset_config {
        Settings::reset_config(&Settings::default_path())?;
        return Ok(());
    }

    if args.show_config_path {
        let settings_path = Settings::default_path();
        if let Some(s) = settings_path.to_str() {
            println!("{}", s);
        } else {
            println!("{:?}", settings_path);
        }
        return Ok(());
    }

    if args.debug_config {
        println!("{:#?}", Settings::load(Settings::default_path()));
        return Ok(());
    }

    logging::init(LevelFilter::Warn);
    let settings = Settings::load_or_default(Settings::default_path());
    logging::get_logger().set_level(settings.get_log_level());

    better_panic::install();

    let dims = resolve_dims(
        args.rows.as_deref(),
        args.cols.as_deref(),
        settings.get_default_dims(),
    )?;

    let animate = settings.get_animate() && !args.no_animation;
    let options = Options {
        dims,
        seed: args.seed,
        mode: args.mode,
        animate,
        delays: if animate {
            settings.get_delays()
        } else {
            Delays::NONE
        },
    };

    app::run(&options)?.write(&mut io::stdout())?;

    Ok(())
}

fn main() -> ExitCode {
    let result = run(Args::parse());
    app::conclude(result, logging::get_logger(), &mut io::stderr())
}
