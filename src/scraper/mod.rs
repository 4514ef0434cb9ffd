//! CardRush 買取表スクレイピング
//!
//! ページ番号を1から進め、取得失敗か空ページで止める。

mod html;

pub use html::{cell_text, detect_columns, parse_page, parse_price, ColumnLayout};

use crate::config::ScraperConfig;
use crate::error::{RepriceError, Result};
use crate::source::{dedupe, SourceRow};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// ページ番号に対応するURL（1ページ目はベースURLそのまま）
pub fn page_url(base_url: &str, page: u32) -> String {
    if page <= 1 {
        base_url.to_string()
    } else {
        let sep = if base_url.contains('?') { '&' } else { '?' };
        format!("{}{}page={}", base_url, sep, page)
    }
}

pub fn build_client(config: &ScraperConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()?;
    Ok(client)
}

fn http_warning(status: StatusCode, url: &str) -> String {
    format!("⚠ HTTP {}: {}", status.as_u16(), url)
}

/// 1ページ取得（200以外は警告を出して None）
pub async fn fetch_page(client: &Client, base_url: &str, page: u32) -> Result<Option<String>> {
    let url = page_url(base_url, page);
    let response = client.get(&url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        eprintln!("{}", http_warning(status, &url));
        return Ok(None);
    }
    Ok(Some(response.text().await?))
}

/// 全ページを取得して重複を除いた買取表を返す
pub async fn scrape_all(config: &ScraperConfig, verbose: bool) -> Result<Vec<SourceRow>> {
    let client = build_client(config)?;
    let mut rows = Vec::new();
    let mut page = 1u32;

    loop {
        if config.max_pages.is_some_and(|max| page > max) {
            break;
        }

        let html = match fetch_page(&client, &config.base_url, page).await {
            Ok(Some(html)) => html,
            Ok(None) => {
                if verbose {
                    println!("  page {}: 取得できませんでした（終了）", page);
                }
                break;
            }
            Err(e) => {
                eprintln!("⚠ page {} の取得に失敗: {}", page, e);
                break;
            }
        };

        let page_rows = parse_page(&html, config.min_price);
        if verbose {
            println!("  page {}: {}件", page, page_rows.len());
        }
        if page_rows.is_empty() {
            break;
        }
        rows.extend(page_rows);

        page += 1;
        tokio::time::sleep(Duration::from_millis(config.page_delay_ms)).await;
    }

    if rows.is_empty() {
        return Err(RepriceError::EmptyScrape(config.base_url.clone()));
    }

    Ok(dedupe(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let base = "https://cardrush.media/pokemon/buying_prices";
        assert_eq!(page_url(base, 1), base);
        assert_eq!(
            page_url(base, 2),
            "https://cardrush.media/pokemon/buying_prices?page=2"
        );
        assert_eq!(page_url("https://x.test/p?sort=new", 3), "https://x.test/p?sort=new&page=3");
    }

    #[test]
    fn test_http_warning() {
        let url = "https://cardrush.media/pokemon/buying_prices?page=4";
        assert_eq!(
            http_warning(StatusCode::NOT_FOUND, url),
            "⚠ HTTP 404: https://cardrush.media/pokemon/buying_prices?page=4"
        );
        assert!(http_warning(StatusCode::SERVICE_UNAVAILABLE, url).starts_with("⚠ HTTP 503: "));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&ScraperConfig::default()).is_ok());
    }
}
