use clap::Parser;
use tablestat::cli::Cli;
use tablestat::config::Config;
use tablestat::logging::{self, LogConfig};
use tablestat::probe;
use tablestat::report;
use tablestat::source::mysql::MysqlSource;
use tablestat::store::SnapshotStore;

fn main() {
    let cli = Cli::parse();
    logging::init(&LogConfig::from_cli(cli.verbose, cli.quiet));

    let result = Config::from_cli(&cli).and_then(|config| {
        let store = SnapshotStore::new(config.cache_dir.clone(), config.format_version.clone())
            .with_max_age(config.max_age);
        let source = MysqlSource::from_config(&config);
        let now = chrono::Utc::now().timestamp();

        probe::run(&config, &source, &store, now)
    });

    if let Err(e) = &result {
        tracing::debug!(target: "tablestat::probe", error = ?e, "probe failed");
    }

    let rendered = report::render(&result, cli.json);
    print!("{}", rendered.body);
    std::process::exit(rendered.status.exit_code());
}
