use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardrush-reprice")]
#[command(about = "CardRush買取価格の照合・値付けツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時は ~/.config/cardrush-reprice/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 買取表を取得して商品マスタと照合し、値付け結果を出力
    Run {
        /// 商品マスタ（.xlsx/.xlsm）
        #[arg(required = true)]
        workbook: PathBuf,

        /// 取得済みの買取表CSV（指定時はスクレイピングしない）
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// 出力ディレクトリ（デフォルト: 商品マスタと同じ場所）
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// 買取表を取得してCSVに保存
    Scrape {
        /// 出力CSVファイル
        #[arg(short, long, default_value = "cardrush_source.csv")]
        output: PathBuf,
    },

    /// 1件の価格を変換して表示
    Price {
        /// 買取価格
        #[arg(required = true)]
        value: String,

        /// rarity（AR補正の判定用）
        #[arg(short, long, default_value = "")]
        rarity: String,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,
    },
}
