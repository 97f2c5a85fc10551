use clap::Parser;
use jsic_parser::{cli, config, error, export, pipeline, reader};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use jsic_common::TierStats;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(cli) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

/// RUST_LOG があればそれを、なければ --verbose に応じて info/debug を使う
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Run { input, output, format, index_pages, detail_pages, report } => {
            println!("📚 jsic - 産業分類の階層化\n");

            println!("[1/3] テキストを読み込み中...");
            let document = reader::Document::open(&input)?;
            println!("✔ {}ページを読み込み\n", document.total_pages());

            let options = pipeline::PipelineOptions {
                index_pages: index_pages.unwrap_or(config.index_pages),
                detail_pages: detail_pages.unwrap_or(config.detail_pages),
                verbosity: format.unwrap_or(config.default_format),
            };

            println!(
                "[2/3] 解析中... (目次 {} / 本文 {})",
                options.index_pages, options.detail_pages
            );
            let result = pipeline::run(&document, &options)?;
            export::print_stats("目次", &result.index_stats());
            export::print_stats("本文", &result.detail_stats());
            export::print_report(&result.report);
            println!();

            println!("[3/3] 結果を保存中... (形式: {})", options.verbosity);
            let output = output.unwrap_or(config.output);
            export::write_json(&result.taxonomy, &output)?;
            println!("✔ 階層を保存: {}", output.display());

            if let Some(report_path) = report {
                export::write_json(&result.report.discrepancies, &report_path)?;
                println!("✔ 食い違いレポートを保存: {}", report_path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Index { input, pages, output } => {
            let pages = pages.unwrap_or(config.index_pages);
            let document = reader::Document::open(&input)?;
            let entries = pipeline::scan_index(&document, pages)?;
            export::print_stats("目次", &TierStats::count(entries.iter().map(|e| e.tier)));
            export::write_json(&entries, &output)?;
            println!("✔ 目次エントリを保存: {}", output.display());
        }

        Commands::Detail { input, pages, output } => {
            let pages = pages.unwrap_or(config.detail_pages);
            let document = reader::Document::open(&input)?;
            let entries = pipeline::scan_detail(&document, pages)?;
            export::print_stats("本文", &TierStats::count(entries.iter().map(|e| e.tier)));
            export::write_json(&entries, &output)?;
            println!("✔ 本文エントリを保存: {}", output.display());
        }

        Commands::Config { show, set_index_pages, set_detail_pages, set_format } => {
            let mut config = config;
            let changed =
                set_index_pages.is_some() || set_detail_pages.is_some() || set_format.is_some();

            if let Some(pages) = set_index_pages {
                config.index_pages = pages;
            }
            if let Some(pages) = set_detail_pages {
                config.detail_pages = pages;
            }
            if let Some(format) = set_format {
                config.default_format = format;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  目次ページ: {}", config.index_pages);
                println!("  本文ページ: {}", config.detail_pages);
                println!("  出力形式: {}", config.default_format);
                println!("  出力ファイル: {}", config.output.display());
            }
        }
    }

    Ok(())
}
