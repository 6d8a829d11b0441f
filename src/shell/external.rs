//! # 外部链接
//!
//! 离开应用的链接（文档、问题反馈、作者网站，以及窗口内任何跳转到外部
//! http(s) 页面的导航）都交给系统默认程序打开，应用窗口只显示应用自身页面。

use tauri::AppHandle;
use tauri_plugin_opener::OpenerExt;
use url::Url;

pub const DOCUMENTATION_URL: &str = "https://github.com/YUZU-Hub/appscreen";
pub const ISSUES_URL: &str = "https://github.com/YUZU-Hub/appscreen/issues";
pub const WEBSITE_URL: &str = "https://yuzuhub.com/en";

/// 提供应用自身页面的主机（打包资源和开发服务器）
const APP_HOSTS: [&str; 3] = ["tauri.localhost", "localhost", "127.0.0.1"];

/// 解析 `raw_url`，只接受 http 和 https
///
/// # 错误
/// 链接为空、无法解析或协议不是 http/https 时返回错误信息
pub fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|e| format!("Invalid URL: {}", e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{}', only http/https are allowed.",
            scheme
        )),
    }
}

/// 是否为指向应用以外的 http(s) 链接
pub fn is_external(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
        && !url.host_str().is_some_and(|host| APP_HOSTS.contains(&host))
}

/// 在用户默认浏览器中打开 `raw_url`
///
/// # 错误
/// 链接不合法或系统打开失败时返回错误信息
pub fn open_external(app: &AppHandle, raw_url: &str) -> Result<(), String> {
    let url = parse_openable_url(raw_url)?;
    app.opener()
        .open_url(url.as_str(), None::<&str>)
        .map_err(|e| format!("Failed to open {}: {}", url, e))
}

/// 应用窗口的导航过滤器
///
/// 外部页面交给系统打开，并取消窗口内导航。
///
/// # 返回值
/// 允许窗口继续导航时返回 `true`
pub fn allow_navigation(app: &AppHandle, url: &Url) -> bool {
    if !is_external(url) {
        return true;
    }
    if let Err(e) = open_external(app, url.as_str()) {
        log::warn!("{}", e);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_urls_are_openable() {
        assert!(parse_openable_url(" https://yuzuhub.com/en ").is_ok());
        assert!(parse_openable_url("http://example.com").is_ok());
        assert!(parse_openable_url("").is_err());
        assert!(parse_openable_url("file:///etc/passwd").is_err());
        assert!(parse_openable_url("javascript:alert(1)").is_err());
        assert!(parse_openable_url("not a url").is_err());
    }

    #[test]
    fn app_pages_stay_in_the_window() {
        let internal = [
            "tauri://localhost/index.html",
            "http://tauri.localhost/preferences.html",
            "http://localhost:1420/",
            "about:blank",
        ];
        for url in internal {
            assert!(!is_external(&Url::parse(url).unwrap()), "{}", url);
        }

        for url in [DOCUMENTATION_URL, ISSUES_URL, WEBSITE_URL] {
            assert!(is_external(&Url::parse(url).unwrap()), "{}", url);
        }
    }
}
