//! Per-browser "selected fruit" for the browse page.
//!
//! The selection lives in a cookie, so each visitor carries their own state and
//! the server holds nothing mutable per user. Selecting again overwrites it.

use axum::http::{HeaderMap, header};
use classifier::Fruit;

pub const SELECTED_FRUIT_COOKIE: &str = "selected_fruit";

/// `Set-Cookie` value recording `fruit` as the current selection.
pub fn select_cookie(fruit: Fruit) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SELECTED_FRUIT_COOKIE,
        fruit.slug()
    )
}

/// The fruit selected by this visitor, if any. Unknown values are ignored.
pub fn selected_fruit(headers: &HeaderMap) -> Option<Fruit> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SELECTED_FRUIT_COOKIE)
        .find_map(|(_, value)| Fruit::from_slug(value.trim_matches('"')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn test_no_cookie_means_no_selection() {
        assert_eq!(selected_fruit(&HeaderMap::new()), None);
        assert_eq!(selected_fruit(&headers(&["theme=dark"])), None);
    }

    #[test]
    fn test_reads_selection_among_other_cookies() {
        let headers = headers(&["theme=dark; selected_fruit=melon; lang=id"]);
        assert_eq!(selected_fruit(&headers), Some(Fruit::Melon));
    }

    #[test]
    fn test_reads_selection_from_any_cookie_header() {
        let headers = headers(&["theme=dark", "selected_fruit=tomat"]);
        assert_eq!(selected_fruit(&headers), Some(Fruit::Tomat));
    }

    #[test]
    fn test_unknown_fruit_is_ignored() {
        assert_eq!(selected_fruit(&headers(&["selected_fruit=durian"])), None);
    }

    #[test]
    fn test_select_cookie_round_trips() {
        let set_cookie = select_cookie(Fruit::Jeruk);
        assert!(set_cookie.starts_with("selected_fruit=jeruk;"));
        assert!(set_cookie.contains("HttpOnly"));

        let (pair, _) = set_cookie.split_once(';').unwrap();
        assert_eq!(selected_fruit(&headers(&[pair])), Some(Fruit::Jeruk));
    }
}
