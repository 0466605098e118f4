//! Product detail modal.

use crate::filter::ActiveFilter;
use crate::product::Product;

use super::cards::render_prices;
use super::{html_escape, image_tag, panel_anchor, RenderOptions, PANEL_CLOSE_HREF};

/// Render the modal container. Without a selected product the container is
/// emitted hidden and empty.
#[must_use]
pub fn render_modal(
    product: Option<&Product>,
    filter: &ActiveFilter,
    options: &RenderOptions,
) -> String {
    let Some(product) = product else {
        return r#"<div id="productModal" class="modal" style="display: none;"></div>"#.to_string();
    };

    let close_href = html_escape(&options.links.filter_href(filter));
    format!(
        r#"<div id="productModal" class="modal" style="display: block;" role="dialog" aria-modal="true">
        {inner}
    </div>"#,
        inner = modal_inner(
            product,
            &DetailIds {
                image: Some("modalImage"),
                title: "modalTitle",
                description: Some("modalDescription"),
            },
            &close_href,
            None,
            options,
        ),
    )
}

/// One hidden detail panel per visible product with an id. A panel opens
/// when its `#product-{id}` fragment is targeted and closes back to the grid.
#[must_use]
pub fn render_detail_panels(
    products: &[&Product],
    filter: &ActiveFilter,
    options: &RenderOptions,
) -> String {
    let panels: String = products
        .iter()
        .filter_map(|product| {
            let id = product.id.as_ref()?;
            let anchor = html_escape(&panel_anchor(id));
            let title_id = format!("{anchor}-title");
            let deep_link = options.links.deep_link(id, filter);
            Some(format!(
                r#"<div id="{anchor}" class="modal product-modal" role="dialog" aria-modal="true" aria-labelledby="{title_id}">
        {inner}
    </div>"#,
                inner = modal_inner(
                    product,
                    &DetailIds {
                        image: None,
                        title: &title_id,
                        description: None,
                    },
                    PANEL_CLOSE_HREF,
                    deep_link.as_deref(),
                    options,
                ),
            ))
        })
        .collect();

    format!(r#"<div class="product-modals" id="productModals">{panels}</div>"#)
}

struct DetailIds<'a> {
    image: Option<&'a str>,
    title: &'a str,
    description: Option<&'a str>,
}

/// Backdrop, close control and body shared by the deep-link modal and the
/// in-page panels. `close_href` must already be escaped.
fn modal_inner(
    product: &Product,
    ids: &DetailIds<'_>,
    close_href: &str,
    deep_link: Option<&str>,
    options: &RenderOptions,
) -> String {
    let title = product.display_title();
    let image = match product.front_image() {
        Some(front) => image_tag(Some(front), ids.image, "modal-image", title, options),
        None => match ids.image {
            Some(id) => format!(r#"<img id="{id}" class="modal-image" alt="">"#),
            None => r#"<img class="modal-image" alt="">"#.to_string(),
        },
    };
    let description_id = ids
        .description
        .map(|id| format!(r#" id="{id}""#))
        .unwrap_or_default();
    let permalink = deep_link
        .map(|href| {
            format!(
                r#"<a class="modal-permalink" href="{}">Ссылка на товар</a>"#,
                html_escape(href)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<a class="modal-backdrop" href="{close_href}" aria-label="Закрыть"></a>
        <div class="modal-content">
            <a class="modal-close" href="{close_href}" aria-label="Закрыть">&times;</a>
            <div class="modal-body">
                <div class="modal-image-wrap">{image}</div>
                <div class="modal-info">
                    <h2 id="{title_id}">{title}</h2>
                    <div class="modal-description"{description_id}>
                        <div class="modal-meta">{category}</div>
                        {prices}
                        {permalink}
                    </div>
                </div>
            </div>
        </div>"#,
        title_id = ids.title,
        title = html_escape(title),
        category = html_escape(product.category_label()),
        prices = render_prices(product, "modal-prices"),
    )
}
