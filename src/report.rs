use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::Result;
use crate::fmt::amount;
use crate::models::Order;

const ORDER_URL_PREFIX: &str = "https://aliexpress.ru/order-list/";
const NO_IMAGE_HTML: &str = "<div class=\"product-image\" style=\"background:#f0f0f0;display:flex;\
align-items:center;justify-content:center;color:#ccc;font-size:12px;\">No image</div>";

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub struct Templates {
    pub base: String,
    pub card: String,
    pub styles: String,
    pub script: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            base: include_str!("../templates/base.html").to_string(),
            card: include_str!("../templates/order_card.html").to_string(),
            styles: include_str!("../templates/styles.css").to_string(),
            script: include_str!("../templates/script.js").to_string(),
        }
    }
}

impl Templates {
    /// Built-in templates, with any same-named file in `dir` taking precedence.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut templates = Self::default();
        for (name, slot) in [
            ("base.html", &mut templates.base),
            ("order_card.html", &mut templates.card),
            ("styles.css", &mut templates.styles),
            ("script.js", &mut templates.script),
        ] {
            let path = dir.join(name);
            if path.is_file() {
                *slot = std::fs::read_to_string(&path)?;
            }
        }
        Ok(templates)
    }
}

/// Substitute `{{key}}` placeholders in one pass. Inserted values are not
/// rescanned; unknown placeholders stay in the output.
pub fn render_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

pub fn status_class(status: &str) -> &'static str {
    let upper = status.to_uppercase();
    if upper.contains("READY") || upper.contains("PICKUP") {
        "status-ready"
    } else if upper.contains("TRANSIT") {
        "status-transit"
    } else {
        "status-unknown"
    }
}

pub fn order_url(order_number: &str) -> String {
    let id: String = order_number.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{ORDER_URL_PREFIX}{id}")
}

pub fn image_data_url(filename: &str, folder: &Path) -> Option<String> {
    if filename.is_empty() {
        return None;
    }
    let bytes = std::fs::read(folder.join(filename)).ok()?;
    Some(format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes)))
}

pub fn image_html(filename: &str, folder: &Path) -> String {
    match image_data_url(filename, folder) {
        Some(src) => format!("<img src=\"{src}\" alt=\"Product\" class=\"product-image\">"),
        None => NO_IMAGE_HTML.to_string(),
    }
}

/// `assets` is the folder the order's page saved its images to, if any.
pub fn render_order_card(templates: &Templates, order: &Order, assets: Option<&Path>) -> String {
    let (class, status) = if order.is_archived {
        ("status-ready", "Received".to_string())
    } else {
        (status_class(&order.status), escape_html(&order.status))
    };
    let desc_class = if order.is_delayed {
        "delivery-desc delayed"
    } else {
        "delivery-desc"
    };
    render_template(
        &templates.card,
        &[
            ("price", order.price.to_string()),
            ("order_number", escape_html(&order.order_number)),
            ("delivery_date", order.delivery_date.clone()),
            ("order_url", order_url(&order.order_number)),
            (
                "img_html",
                assets
                    .map(|folder| image_html(&order.local_image, folder))
                    .unwrap_or_default(),
            ),
            ("status_class", class.to_string()),
            ("status", status),
            ("delivery_info", escape_html(&order.delivery_info)),
            ("desc_class", desc_class.to_string()),
            ("description", escape_html(&order.description)),
            ("price_formatted", amount(order.price)),
            (
                "card_extra_class",
                String::from(if order.is_archived { " archived" } else { "" }),
            ),
            (
                "checkbox_attrs",
                String::from(if order.is_archived { " checked disabled" } else { "" }),
            ),
        ],
    )
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Orders that came from the same saved page, sharing one asset folder.
pub struct OrderGroup<'a> {
    pub orders: &'a [Order],
    pub assets: Option<&'a Path>,
}

pub fn generate_html(templates: &Templates, groups: &[OrderGroup<'_>]) -> String {
    let cards: Vec<String> = groups
        .iter()
        .flat_map(|g| g.orders.iter().map(move |o| render_order_card(templates, o, g.assets)))
        .collect();
    let count: usize = groups.iter().map(|g| g.orders.len()).sum();
    let total: f64 = groups
        .iter()
        .flat_map(|g| g.orders.iter())
        .map(|o| o.price)
        .sum();

    render_template(
        &templates.base,
        &[
            ("styles", templates.styles.clone()),
            ("script", templates.script.clone()),
            ("order_count", count.to_string()),
            ("total_price", amount(total)),
            ("order_cards", cards.join("\n")),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(number: &str, status: &str, archived: bool) -> Order {
        Order {
            order_number: number.to_string(),
            status: status.to_string(),
            delivery_info: "Delivery by 12 February".to_string(),
            delivery_date: "2026-02-12".to_string(),
            description: String::new(),
            is_delayed: false,
            price: 7.5,
            local_image: "pic.jpg".to_string(),
            is_archived: archived,
            is_foreign: false,
        }
    }

    fn simple_templates() -> Templates {
        Templates {
            base: "{{order_count}}|{{total_price}}|{{order_cards}}".to_string(),
            card: "[{{order_number}} {{status_class}} {{status}} {{price_formatted}}{{card_extra_class}}{{checkbox_attrs}}]{{img_html}}"
                .to_string(),
            styles: String::new(),
            script: String::new(),
        }
    }

    #[test]
    fn test_render_template() {
        let vars = [("name", "World".to_string()), ("x", "{{name}}".to_string())];
        assert_eq!(render_template("Hello {{name}}!", &vars), "Hello World!");
        assert_eq!(render_template("{{x}}", &vars), "{{name}}");
        assert_eq!(render_template("{{missing}} {{name}}", &vars), "{{missing}} World");
        assert_eq!(render_template("open {{name", &vars), "open {{name");
    }

    #[test]
    fn test_status_class() {
        assert_eq!(status_class("Ready for pickup"), "status-ready");
        assert_eq!(status_class("Awaiting PICKUP"), "status-ready");
        assert_eq!(status_class("In transit"), "status-transit");
        assert_eq!(status_class("Unknown"), "status-unknown");
    }

    #[test]
    fn test_order_url() {
        assert_eq!(
            order_url("1234 5678 9012 3456"),
            "https://aliexpress.ru/order-list/1234567890123456"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a <b> & \"c\""), "a &lt;b&gt; &amp; &quot;c&quot;");
    }

    #[test]
    fn test_image_embedding() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.jpg"), b"abc").unwrap();
        assert_eq!(
            image_data_url("pic.jpg", dir.path()),
            Some("data:image/jpeg;base64,YWJj".to_string())
        );
        assert_eq!(image_data_url("", dir.path()), None);
        assert_eq!(image_data_url("gone.jpg", dir.path()), None);
        assert!(image_html("gone.jpg", dir.path()).contains("No image"));
    }

    #[test]
    fn test_archived_card_shows_received() {
        let t = simple_templates();
        let card = render_order_card(&t, &order("1234 5678 9012 3456", "In transit", true), None);
        assert_eq!(
            card,
            "[1234 5678 9012 3456 status-ready Received 7,50 archived checked disabled]"
        );
    }

    #[test]
    fn test_active_card_escapes_status() {
        let t = simple_templates();
        let card = render_order_card(&t, &order("1", "In <transit>", false), None);
        assert_eq!(card, "[1 status-transit In &lt;transit&gt; 7,50]");
    }

    #[test]
    fn test_generate_html_totals_and_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.jpg"), b"abc").unwrap();
        let active = vec![order("1", "In transit", false), order("2", "In transit", false)];
        let archived = vec![order("3", "Delivered", true)];
        let html = generate_html(
            &simple_templates(),
            &[
                OrderGroup {
                    orders: &active,
                    assets: Some(dir.path()),
                },
                OrderGroup {
                    orders: &archived,
                    assets: None,
                },
            ],
        );
        assert!(html.starts_with("3|22,50|"));
        assert_eq!(html.matches("data:image/jpeg;base64,YWJj").count(), 2);
        assert!(html.ends_with("[3 status-ready Received 7,50 archived checked disabled]"));
    }

    #[test]
    fn test_builtin_templates_have_placeholders() {
        let t = Templates::default();
        assert!(t.base.contains("{{order_cards}}"));
        assert!(t.card.contains("{{order_url}}"));
    }

    #[test]
    fn test_template_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("styles.css"), "body{}").unwrap();
        let t = Templates::load(dir.path()).unwrap();
        assert_eq!(t.styles, "body{}");
        assert!(t.base.contains("{{styles}}"));
    }
}
