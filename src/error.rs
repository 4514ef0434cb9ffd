use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepriceError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("Excel読み込みエラー: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("抽出結果が空です: {0}")]
    EmptyScrape(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] cardrush_reprice_common::Error),
}

impl From<rust_xlsxwriter::XlsxError> for RepriceError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        RepriceError::ExcelGeneration(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepriceError>;
