use crate::error::{RepriceError, Result};
use crate::workbook::column_index;
use cardrush_reprice_common::{MatchConfig, PriceRules};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 商品マスタ（Myca形式）シートの列配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogLayout {
    pub sheet_name: String,
    /// 名前 (display_name)
    pub name_column: String,
    /// 型番 (cardnumber)
    pub model_column: String,
    /// 価格（ここを上書き = buy_price）
    pub price_column: String,
    /// rarity（AR判定用）
    pub rarity_column: String,
    /// 列名として読む先頭行数
    pub header_rows: usize,
    /// 更新シートでそのまま残す先頭行数
    pub preserved_rows: usize,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".into(),
            name_column: "C".into(),
            model_column: "F".into(),
            price_column: "O".into(),
            rarity_column: "G".into(),
            header_rows: 1,
            preserved_rows: 5,
        }
    }
}

/// スクレイピング設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// ページ間の待ち時間（サーバー負荷軽減）
    pub page_delay_ms: u64,
    /// この金額以下は除外
    pub min_price: i64,
    /// 取得ページ数の上限（未指定なら空ページまで）
    pub max_pages: Option<u32>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cardrush.media/pokemon/buying_prices".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .into(),
            timeout_seconds: 20,
            page_delay_ms: 300,
            min_price: 90,
            max_pages: None,
        }
    }
}

/// 出力ファイル名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 一致抽出＆レポート
    pub match_file: String,
    /// Mycaアップロード用CSV
    pub upload_csv: String,
    /// 更新シートのファイル名に付ける接尾辞
    pub updated_suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            match_file: "ポケカラッシュ_一致抽出.xlsx".into(),
            upload_csv: "ポケカラッシュ_Mycaアップロード用.csv".into(),
            updated_suffix: "_更新".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogLayout,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub matching: MatchConfig,
    pub pricing: PriceRules,
}

impl Config {
    /// 設定を読み込む
    ///
    /// `path` 指定時はそのファイルが必須。未指定時は既定パスにあれば読み、なければ既定値。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => {
                if !p.exists() {
                    return Err(RepriceError::FileNotFound(p.display().to_string()));
                }
                Self::read_from(p)?
            }
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::read_from(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RepriceError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cardrush-reprice").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.catalog;
        for letter in [
            &layout.name_column,
            &layout.model_column,
            &layout.price_column,
            &layout.rarity_column,
        ] {
            if column_index(letter).is_none() {
                return Err(RepriceError::Config(format!("列指定が不正: {:?}", letter)));
            }
        }
        if layout.sheet_name.trim().is_empty() {
            return Err(RepriceError::Config("シート名が空です".into()));
        }

        self.matching.validate()?;
        self.pricing.validate()?;
        Ok(())
    }
}
