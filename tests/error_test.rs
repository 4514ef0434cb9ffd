//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use cardrush_reprice::config::{CatalogLayout, Config};
use cardrush_reprice::error::RepriceError;
use cardrush_reprice::{source, workbook};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない商品マスタを読み込んだ場合
#[test]
fn test_read_nonexistent_workbook() {
    let result = workbook::read_sheet(Path::new("/nonexistent/path/ポケカラッシュ.xlsm"), "Sheet1");
    assert!(matches!(result, Err(RepriceError::FileNotFound(_))));
}

/// 指定シートが無い場合
#[test]
fn test_read_missing_sheet() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("master.xlsx");

    let mut book = rust_xlsxwriter::Workbook::new();
    let sheet = book.add_worksheet();
    sheet.set_name("Other").unwrap();
    sheet.write_string(0, 0, "x").unwrap();
    book.save(&path).unwrap();

    let result = workbook::read_sheet(&path, "Sheet1");
    assert!(matches!(result, Err(RepriceError::SheetNotFound(_))));
}

/// 価格列がシート幅を超える場合は照合前にエラー
#[test]
fn test_missing_price_column() {
    let sheet = workbook::Sheet {
        name: "Sheet1".into(),
        rows: vec![vec![workbook::Cell::from("id"); 8]],
    };
    let err = workbook::load_catalog(sheet, &CatalogLayout::default()).unwrap_err();

    assert!(matches!(
        err,
        RepriceError::Common(cardrush_reprice_common::Error::MissingColumn { .. })
    ));
    let display = format!("{}", err);
    assert!(display.contains("列数=8"));
}

/// 壊れた設定ファイル
#[test]
fn test_invalid_config_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ invalid }").unwrap();

    let result = Config::load(Some(&path));
    assert!(matches!(result, Err(RepriceError::JsonParse(_))));
}

/// 閾値が範囲外の設定ファイル
#[test]
fn test_out_of_range_threshold() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"matching": {"threshold": 1.5}}"#).unwrap();

    let result = Config::load(Some(&path));
    assert!(matches!(
        result,
        Err(RepriceError::Common(cardrush_reprice_common::Error::InvalidConfig(_)))
    ));
}

/// 価格が数値でない買取表CSV
#[test]
fn test_source_csv_with_bad_price() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("source.csv");
    std::fs::write(&path, "name,model,price\nピカチュウex,SV1-001,お問い合わせ\n").unwrap();

    let result = source::read_csv(&path);
    assert!(matches!(result, Err(RepriceError::Csv(_))));
}

/// RepriceErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        RepriceError::Config("テスト設定エラー".to_string()),
        RepriceError::FileNotFound("master.xlsm".to_string()),
        RepriceError::SheetNotFound("Sheet1".to_string()),
        RepriceError::ExcelGeneration("Excel生成エラー".to_string()),
        RepriceError::EmptyScrape("https://cardrush.media/pokemon/buying_prices".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: RepriceError = io_err.into();

    assert!(matches!(err, RepriceError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// common::Errorは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let common_err = cardrush_reprice_common::Error::InvalidConfig("fragment_len".to_string());
    let err: RepriceError = common_err.into();

    assert!(matches!(err, RepriceError::Common(_)));
    assert!(format!("{}", err).contains("fragment_len"));
}
