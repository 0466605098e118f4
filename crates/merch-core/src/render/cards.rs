//! Product grid and cards.

use crate::format::price_label;
use crate::product::Product;

use super::{html_escape, image_tag, panel_anchor, RenderOptions};

/// Render the product grid for the visible products.
#[must_use]
pub fn render_grid(products: &[&Product], options: &RenderOptions) -> String {
    let cards: String = products
        .iter()
        .enumerate()
        .map(|(idx, product)| render_product_card(product, idx, options))
        .collect();

    format!(r#"<div class="products-grid" id="productsGrid">{cards}</div>"#)
}

/// Render one card. Cards for products with an id link to their in-page
/// detail panel.
#[must_use]
pub fn render_product_card(product: &Product, idx: usize, options: &RenderOptions) -> String {
    let title = product.display_title();
    let has_back = product.back_image().is_some();

    let badge = product
        .badge
        .as_deref()
        .map(|b| format!(r#"<div class="product-badge">{}</div>"#, html_escape(b)))
        .unwrap_or_default();
    let front = image_tag(
        product.front_image(),
        None,
        "product-image product-image-front",
        title,
        options,
    );
    let back = image_tag(
        product.back_image(),
        None,
        "product-image product-image-back",
        title,
        options,
    );

    let class = if has_back {
        "product-card has-back"
    } else {
        "product-card"
    };
    // 0.03s stagger per card, kept in integer hundredths.
    let delay = idx.saturating_mul(3);
    let style = format!("animation-delay: {}.{:02}s", delay / 100, delay % 100);

    let inner = format!(
        r#"<div class="product-media">{badge}{front}{back}</div>
            <div class="product-info">
                <h3 class="product-title">{title}</h3>
                <p class="product-category">{category}</p>
                {prices}
            </div>"#,
        title = html_escape(title),
        category = html_escape(product.category_label()),
        prices = render_prices(product, "product-prices"),
    );

    match product.id.as_ref() {
        Some(id) => format!(
            r#"<a class="{class}" style="{style}" data-product-id="{data_id}" href="{href}">
            {inner}
        </a>"#,
            data_id = html_escape(id.as_str()),
            href = html_escape(&format!("#{}", panel_anchor(id))),
        ),
        None => format!(
            r#"<div class="{class}" style="{style}">
            {inner}
        </div>"#
        ),
    }
}

/// Current and old price. The current slot is always present (empty when
/// there is no price); the old price is omitted when absent.
pub(super) fn render_prices(product: &Product, class: &str) -> String {
    let current = price_label(product.price_current).unwrap_or_default();
    let old = price_label(product.price_old)
        .map(|old| format!(r#"<div class="price-old">{old}</div>"#))
        .unwrap_or_default();

    format!(r#"<div class="{class}"><div class="price-current">{current}</div>{old}</div>"#)
}
