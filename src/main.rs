use cardrush_reprice::{cli, config, error, pipeline, scraper, source, workbook};
use cardrush_reprice_common::{reconcile, transform, PriceOutcome, RawPrice};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { show, init } = &cli.command {
        let path = match &cli.config {
            Some(p) => p.clone(),
            None => Config::config_path()?,
        };

        if *init {
            Config::default().save(&path)?;
            println!("✔ 設定ファイルを作成しました: {}", path.display());
        }

        if *show || !*init {
            let config = Config::load(cli.config.as_deref())?;
            println!("設定ファイル: {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            workbook: workbook_path,
            source: source_csv,
            output_dir,
        } => {
            println!("🃏 cardrush-reprice - 買取価格照合\n");

            // 1. 買取表
            let source_rows = match source_csv {
                Some(path) => {
                    println!("[1/4] 買取表CSVを読み込み中...");
                    source::read_csv(&path)?
                }
                None => {
                    println!("[1/4] 買取表を取得中... ({})", config.scraper.base_url);
                    scraper::scrape_all(&config.scraper, cli.verbose).await?
                }
            };
            println!("✔ 買取表 {}件\n", source_rows.len());

            // 2. 商品マスタ
            println!("[2/4] 商品マスタを読み込み中...");
            let sheet = workbook::read_sheet(&workbook_path, &config.catalog.sheet_name)?;
            let catalog = workbook::load_catalog(sheet, &config.catalog)?;
            println!("✔ 商品マスタ {}件\n", catalog.records.len());

            // 3. 照合・値付け
            println!("[3/4] 照合中... (閾値: {})", config.matching.threshold);
            let recon = reconcile(
                &catalog.records,
                &source::to_records(&source_rows),
                &config.matching,
                &config.pricing,
            )?;

            let stats = &recon.stats;
            println!(
                "✔ 一致 {}/{}件（重複割当 {}件）\n",
                stats.matched_rows, stats.catalog_rows, stats.reused_rows
            );

            if stats.price_fallbacks > 0 {
                eprintln!(
                    "⚠ 照合価格を数値にできず元の価格のままの行: {}件",
                    stats.price_fallbacks
                );
            }
            if cli.verbose {
                for entry in recon.repriced.iter().filter(|e| e.price.is_fallback()) {
                    let row = catalog.row_numbers.get(entry.catalog_index).map_or(0, |r| r + 1);
                    println!("  {}行目: 元の価格のまま", row);
                }
            }

            // 4. 出力
            println!("[4/4] 出力中...");
            let paths = pipeline::OutputPaths::resolve(
                &workbook_path,
                output_dir.as_deref(),
                &config.output,
            );
            let written = pipeline::write_outputs(&catalog, &source_rows, &recon, &config, &paths)?;

            if let Some(path) = &written.match_file {
                println!("✔ 一致抽出ファイル: {}", path.display());
            }
            if let Some(path) = &written.updated_sheet {
                println!("✔ 更新シート: {}", path.display());
            }
            if let Some(path) = &written.upload_csv {
                println!("✔ Mycaアップロード用CSV: {}", path.display());
            }

            if !recon.has_matches() {
                eprintln!("⚠ 一致した行が1件もありません（閾値を下げるとマッチするかもしれません）");
                return Ok(());
            }

            println!("\n✅ 完了");
        }

        Commands::Scrape { output } => {
            println!("🃏 cardrush-reprice - 買取表取得\n");

            println!("[1/2] 買取表を取得中... ({})", config.scraper.base_url);
            let rows = scraper::scrape_all(&config.scraper, cli.verbose).await?;
            println!("✔ {}件\n", rows.len());

            println!("[2/2] CSVを保存中...");
            source::write_csv(&rows, &output)?;
            println!("✔ 保存: {}", output.display());
        }

        Commands::Price { value, rarity } => {
            let raw = RawPrice::from(value.as_str());
            match transform(&raw, (), &rarity, &config.pricing) {
                PriceOutcome::Adjusted(price) => println!("{} → {}", raw, price),
                PriceOutcome::Fallback(()) => println!("{} → 変更なし", raw),
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}
