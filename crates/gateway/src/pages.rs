//! Server-rendered HTML for the two pages.

use crate::catalog::{self, FruitInfo};
use base64::{Engine, engine::general_purpose::STANDARD};
use classifier::{Fruit, Prediction};
use std::borrow::Cow;
use std::fmt::Write;

pub const ACCEPTED_UPLOADS: &str = ".jpg,.jpeg,.png,image/jpeg,image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Predict,
}

impl Page {
    const ALL: [Page; 2] = [Page::Home, Page::Predict];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Beranda",
            Page::Predict => "Prediksi Buah",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Predict => "/predict",
        }
    }
}

/// One tile of the browse-page gallery.
pub struct GalleryTile {
    pub info: &'static FruitInfo,
    pub has_image: bool,
}

pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; color: #262730; }
nav { width: 14em; background: #f0f2f6; padding: 1.5em; }
nav a { display: block; padding: .4em .6em; border-radius: 4px; color: inherit; text-decoration: none; }
nav a.active { background: #ff4b4b; color: white; }
main { flex: 1; padding: 2em 3em; max-width: 60em; }
.gallery { display: grid; grid-template-columns: repeat(5, 1fr); gap: 1em; }
.gallery figure { margin: 0; }
.gallery img { width: 180px; height: 180px; object-fit: cover; border-radius: 4px; }
.notice { padding: 1em; border-radius: 4px; }
.info { background: #e8f0fe; } .warning { background: #fffbe6; }
.success { background: #e6f4ea; } .error { background: #fdecea; }
"#;

fn layout(title: &str, active: Option<Page>, body: &str) -> String {
    let mut nav = String::new();
    for page in Page::ALL {
        let class = if Some(page) == active { " class=\"active\"" } else { "" };
        let _ = write!(nav, "<a href=\"{}\"{}>{}</a>", page.path(), class, page.title());
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="id"><head><meta charset="utf-8"><title>{title}</title>
<style>{STYLE}</style></head><body>
<nav><h3>Pilih Halaman</h3>{nav}</nav>
<main>
{body}
</main>
</body></html>"#,
        title = escape(title),
    )
}

fn explanation(info: &FruitInfo) -> String {
    let mut html = format!(
        "<hr><section id=\"explanation\"><h2>{} {}</h2>",
        info.emoji, info.fruit
    );
    for (ripeness, description) in &info.descriptions {
        let _ = write!(
            html,
            "<p><strong>{}:</strong> {}</p>",
            ripeness,
            escape(description)
        );
    }
    html.push_str("</section>");
    html
}

pub fn home(tiles: &[GalleryTile], selected: Option<Fruit>) -> String {
    let mut body = String::from(
        "<h1>Prediksi Kondisi Buah</h1>\
         <p>Aplikasi ini dapat mengenali kondisi buah berdasarkan gambar. \
         Berikut kategori yang digunakan:</p>\
         <h2>Pilih Buah</h2><div class=\"gallery\">",
    );

    for tile in tiles {
        let fruit = tile.info.fruit;
        let _ = write!(
            body,
            "<figure><figcaption>{} {}</figcaption>",
            tile.info.emoji, fruit
        );
        if tile.has_image {
            let _ = write!(
                body,
                "<img src=\"/gallery/{}\" width=\"180\" alt=\"{}\">",
                fruit.slug(),
                fruit
            );
        } else {
            body.push_str("<div class=\"notice warning\">Belum ada gambar</div>");
        }
        let _ = write!(
            body,
            "<form method=\"post\" action=\"/select/{}\">\
             <button type=\"submit\">Lihat penjelasan</button></form></figure>",
            fruit.slug()
        );
    }
    body.push_str("</div>");

    match selected {
        Some(fruit) => body.push_str(&explanation(catalog::info(fruit))),
        None => body.push_str(
            "<div class=\"notice info\">Klik tombol di bawah gambar untuk melihat penjelasan.</div>",
        ),
    }

    layout(Page::Home.title(), Some(Page::Home), &body)
}

fn upload_form() -> String {
    format!(
        "<form method=\"post\" action=\"/predict\" enctype=\"multipart/form-data\">\
         <label for=\"file\">Upload gambar buah...</label> \
         <input type=\"file\" id=\"file\" name=\"file\" accept=\"{}\" required> \
         <button type=\"submit\">Prediksi</button></form>",
        ACCEPTED_UPLOADS
    )
}

pub fn predict_form() -> String {
    let body = format!("<h1>📷 Prediksi Kondisi Buah</h1>{}", upload_form());
    layout(Page::Predict.title(), Some(Page::Predict), &body)
}

/// Predict page showing the uploaded image and its classification.
pub fn predict_result(image_src: &str, prediction: &Prediction) -> String {
    let body = format!(
        "<h1>📷 Prediksi Kondisi Buah</h1>{form}\
         <figure><img src=\"{src}\" style=\"max-width:100%\" alt=\"upload\">\
         <figcaption>Gambar yang diunggah</figcaption></figure>\
         <p>⏳ Sedang memproses...</p>\
         <div class=\"notice success\">Prediksi: <strong>{label}</strong></div>\
         <p>Tingkat keyakinan: <strong>{confidence}</strong></p>",
        form = upload_form(),
        src = escape(image_src),
        label = escape(prediction.label),
        confidence = prediction.confidence_percent(),
    );
    layout(Page::Predict.title(), Some(Page::Predict), &body)
}

pub fn error_page(heading: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1><div class=\"notice error\">{}</div>",
        escape(heading),
        escape(message)
    );
    layout(heading, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles(has_image: bool) -> Vec<GalleryTile> {
        catalog::all()
            .iter()
            .map(|info| GalleryTile { info, has_image })
            .collect()
    }

    #[test]
    fn test_escape() {
        assert!(matches!(escape("apel segar"), Cow::Borrowed(_)));
        assert_eq!(
            escape(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_home_without_selection_shows_hint() {
        let html = home(&tiles(true), None);

        assert!(html.contains("Klik tombol di bawah gambar untuk melihat penjelasan."));
        assert!(!html.contains("id=\"explanation\""));
        for fruit in Fruit::ALL {
            assert!(html.contains(&format!("action=\"/select/{}\"", fruit.slug())));
            assert!(html.contains(&format!("src=\"/gallery/{}\"", fruit.slug())));
        }
        assert_eq!(html.matches("Lihat penjelasan").count(), 5);
    }

    #[test]
    fn test_home_without_images_warns_per_tile() {
        let html = home(&tiles(false), None);

        assert_eq!(html.matches("Belum ada gambar").count(), 5);
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_home_with_selection_shows_only_that_fruit() {
        let html = home(&tiles(true), Some(Fruit::Pisang));

        assert!(html.contains("<h2>🍌 Pisang</h2>"));
        assert!(html.contains("<strong>Segar:</strong> Kulit kuning cerah"));
        assert!(html.contains("<strong>Setengah Segar:</strong> Mulai muncul bercak coklat kecil."));
        assert!(html.contains("<strong>Busuk:</strong> Kulit hitam hampir seluruhnya"));
        assert!(!html.contains("Kulit mengkilap"));
        assert!(!html.contains("Klik tombol di bawah gambar"));
    }

    #[test]
    fn test_predict_form_accepts_jpeg_and_png() {
        let html = predict_form();

        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("accept=\".jpg,.jpeg,.png,image/jpeg,image/png\""));
        assert!(html.contains("<a href=\"/predict\" class=\"active\">Prediksi Buah</a>"));
    }

    #[test]
    fn test_predict_result_formats_confidence() {
        let prediction = Prediction {
            label: "tomat busuk",
            index: 12,
            confidence: 0.5,
            scores: vec![],
        };

        let html = predict_result("data:image/png;base64,AAAA", &prediction);

        assert!(html.contains("Prediksi: <strong>tomat busuk</strong>"));
        assert!(html.contains("Tingkat keyakinan: <strong>50.00%</strong>"));
        assert!(html.contains("src=\"data:image/png;base64,AAAA\""));
        assert!(html.contains("Gambar yang diunggah"));

        let progress = html.find("⏳ Sedang memproses...").unwrap();
        assert!(html.find("Gambar yang diunggah").unwrap() < progress);
        assert!(progress < html.find("Prediksi: <strong>").unwrap());
    }
}
