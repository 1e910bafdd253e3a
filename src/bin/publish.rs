use clap::Parser;
use quizsheet::publish::{Publisher, RepositoryInfo};
use quizsheet::{OutputFormatter, OutputMode, PublishCli, QuizSheetError, UserFriendlyError};
use std::process;

fn main() {
    let cli = PublishCli::parse();
    process::exit(run(&cli));
}

/// Step failures are reported but never change the exit code.
fn run(cli: &PublishCli) -> i32 {
    let formatter = OutputFormatter::new(OutputMode::from(cli.output_format), cli.verbosity_level(), cli.quiet);

    if !cli.directory.is_dir() {
        formatter.print_user_friendly_error(&QuizSheetError::InvalidPath {
            path: cli.directory.display().to_string(),
        });
        return 1;
    }

    match RepositoryInfo::discover(&cli.directory) {
        Ok(info) => formatter.info(&info.display_summary()),
        Err(e) => formatter.warning(&e.user_message()),
    }

    let publisher = Publisher::new(&cli.directory, &cli.message);

    if cli.dry_run {
        formatter.info("DRY RUN MODE - No commands will be run");
        for step in publisher.steps() {
            formatter.info(&format!("{}: {}", step.name, step.command_line()));
        }
        return 0;
    }

    formatter.start_operation(&format!(
        "Publishing {}",
        publisher.working_dir().display()
    ));

    let outcomes = publisher.run(|outcome| formatter.print_publish_outcome(outcome));
    formatter.print_publish_summary(&outcomes);

    0
}
