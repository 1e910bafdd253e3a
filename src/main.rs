use clap::Parser;
use quizsheet::{Cli, OutputFormatter, OutputMode, QuizSheet, QuizSheetError, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let quizsheet = match QuizSheet::from_cli(&cli) {
        Ok(quizsheet) => quizsheet,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    if cli.dry_run {
        return match quizsheet.dry_run() {
            Ok(_) => 0,
            Err(e) => {
                quizsheet.handle_error(&e);
                1
            }
        };
    }

    match quizsheet.run_extraction() {
        Ok(report) => {
            quizsheet.output_formatter().print_extraction_report(&report);

            if let Some(ref path) = cli.report {
                if let Err(e) = report.save_json(path) {
                    quizsheet.handle_error(&e);
                    return 1;
                }
                quizsheet
                    .output_formatter()
                    .info(&format!("Report written to {}", path.display()));
            }

            0
        }
        Err(e) => {
            quizsheet.handle_error(&e);

            match e {
                QuizSheetError::InvalidPath { .. } => 2,
                QuizSheetError::Config { .. } | QuizSheetError::InvalidRepository { .. } => 3,
                QuizSheetError::Pdf { .. } => 4,
                QuizSheetError::Spreadsheet { .. } => 5,
                _ => 1,
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "quizsheet.toml".to_string());

    match QuizSheet::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  quizsheet <folder> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(cli: &Cli, error: &QuizSheetError) {
    let formatter = OutputFormatter::new(OutputMode::from(cli.output_format), 0, false);
    formatter.print_user_friendly_error(error);
}
