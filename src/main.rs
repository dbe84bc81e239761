mod cli;
mod workflow;

use clap::Parser;
use meme_editor::logging;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    // コマンドライン引数を解析します
    let args = cli::Args::parse();
    logging::init_logging(&args.log_level);

    match workflow::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // エラーの原因をたどって表示する
            eprintln!("エラー: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  原因: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
