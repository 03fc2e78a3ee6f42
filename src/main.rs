use clap::Parser;
use colored::Colorize;

use routemap::cli::Cli;
use routemap::config::{get_config, init_config};
use routemap::errors::RoutemapError;
use routemap::runtime::modes::{run_command, run_server};
use routemap::system::{ConsoleTarget, init_logging};

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_config(cli.config.as_deref());

    // 服务器模式日志写 stdout，CLI 模式写 stderr
    let console = if cli.command.is_some() {
        ConsoleTarget::Stderr
    } else {
        ConsoleTarget::Stdout
    };
    let _guard = init_logging(&get_config().logging, console);

    let result = match cli.command {
        None => run_server().await,
        Some(cmd) => run_command(cmd).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<RoutemapError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }
}
