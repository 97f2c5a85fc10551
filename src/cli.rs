use clap::{Parser, Subcommand};
use jsic_common::{PageRange, Verbosity};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jsic")]
#[command(about = "日本標準産業分類テキストの解析・JSON階層化ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 目次と本文を解析して階層JSONを出力
    Run {
        /// 抽出済みテキスト（改ページ区切りのファイル、またはページごとの .txt フォルダ）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力JSONファイル（デフォルト: 設定の output）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (full/simple/en)
        #[arg(short, long)]
        format: Option<Verbosity>,

        /// 目次のページ範囲（例: 51-102）
        #[arg(long)]
        index_pages: Option<PageRange>,

        /// 本文のページ範囲（例: 105-534）
        #[arg(long)]
        detail_pages: Option<PageRange>,

        /// 食い違いレポートのJSONファイル
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// 目次のみ解析してエントリ一覧を出力
    Index {
        /// 抽出済みテキスト
        #[arg(required = true)]
        input: PathBuf,

        /// ページ範囲（デフォルト: 設定の index_pages）
        #[arg(short, long)]
        pages: Option<PageRange>,

        /// 出力JSONファイル（デフォルト: index.json）
        #[arg(short, long, default_value = "index.json")]
        output: PathBuf,
    },

    /// 本文のみ解析してエントリ一覧を出力
    Detail {
        /// 抽出済みテキスト
        #[arg(required = true)]
        input: PathBuf,

        /// ページ範囲（デフォルト: 設定の detail_pages）
        #[arg(short, long)]
        pages: Option<PageRange>,

        /// 出力JSONファイル（デフォルト: detail.json）
        #[arg(short, long, default_value = "detail.json")]
        output: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 目次のページ範囲を設定
        #[arg(long)]
        set_index_pages: Option<PageRange>,

        /// 本文のページ範囲を設定
        #[arg(long)]
        set_detail_pages: Option<PageRange>,

        /// 既定の出力形式を設定 (full/simple/en)
        #[arg(long)]
        set_format: Option<Verbosity>,
    },
}
