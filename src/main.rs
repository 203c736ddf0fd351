use clap::Parser;
use hand_pointer::cli::{handle_config_action, run, Args, Command};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let result = match args.command {
        Some(Command::Config { ref action }) => handle_config_action(action.clone(), &args),
        None => run(&args).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
