//! Server-side HTML rendering of the catalog page.
//!
//! The page keeps the storefront's DOM contract: `#filterButtons`,
//! `#productsGrid`, `#productModal` and `.hero-stats`. Styling lives in the
//! static stylesheet.
//!
//! Every visible product also gets an in-page detail panel (`#product-{id}`)
//! that its card opens through a fragment link, so opening a product needs
//! no request. `#productModal` is only filled for `/products/{id}` deep links.

mod cards;
mod filters;
mod hero;
mod modal;

use crate::filter::{ActiveFilter, HeroStats};
use crate::image::{resolve_image, DEFAULT_IMAGES_DIR};
use crate::product::{Product, ProductId};
use crate::view::ViewState;

pub use cards::{render_grid, render_product_card};
pub use filters::render_filter_bar;
pub use hero::render_hero;
pub use modal::{render_detail_panels, render_modal};

/// Fragment that closes an in-page detail panel.
const PANEL_CLOSE_HREF: &str = "#catalog";

/// Panels are hidden until targeted by their fragment; a targeted panel
/// suspends page scroll.
const PANEL_STYLE: &str = ".product-modal{display:none}.product-modal:target{display:block}body:has(.product-modal:target){overflow:hidden}";

/// How page links are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// Routes of the live server: `/?filter=..` and `/products/{id}`.
    #[default]
    Server,
    /// Sibling files of a static export. The "all" view is `index_file`,
    /// every other filter is `filter-{id}.html`.
    Static { index_file: String },
}

impl LinkStyle {
    /// Link that selects `filter`.
    #[must_use]
    pub fn filter_href(&self, filter: &ActiveFilter) -> String {
        match (self, filter) {
            (Self::Server, ActiveFilter::All) => "/".to_string(),
            (Self::Server, other) => format!("/?filter={}", encode_component(other.id())),
            (Self::Static { index_file }, filter) => static_page_name(filter, index_file),
        }
    }

    /// Shareable link that opens `id` with `filter` kept. Static exports have
    /// no such route and get `None`.
    #[must_use]
    pub fn deep_link(&self, id: &ProductId, filter: &ActiveFilter) -> Option<String> {
        match self {
            Self::Server => Some(product_href(id, filter)),
            Self::Static { .. } => None,
        }
    }
}

/// File name of the static page showing `filter`.
///
/// Characters outside `[A-Za-z0-9_-]` in the filter id become `_`.
#[must_use]
pub fn static_page_name(filter: &ActiveFilter, index_file: &str) -> String {
    match filter {
        ActiveFilter::All => index_file.to_string(),
        other => {
            let safe: String = other
                .id()
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            format!("filter-{safe}.html")
        }
    }
}

/// Settings that differ between the live server and static exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Local assets directory, used as the prefix of local image paths.
    pub images_dir: String,
    /// `<base href>` of the page; relative asset paths resolve against it.
    pub base_href: String,
    pub links: LinkStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            images_dir: DEFAULT_IMAGES_DIR.to_string(),
            base_href: "/".to_string(),
            links: LinkStyle::Server,
        }
    }
}

impl RenderOptions {
    /// Options for a static export whose "all" page is `index_file`. Assets
    /// and sibling pages resolve relative to the page's own directory.
    #[must_use]
    pub fn static_export(images_dir: impl Into<String>, index_file: impl Into<String>) -> Self {
        Self {
            images_dir: images_dir.into(),
            base_href: "./".to_string(),
            links: LinkStyle::Static {
                index_file: index_file.into(),
            },
        }
    }
}

/// Renders the complete catalog page for `state` over `catalog`.
///
/// An empty catalog (including one that failed to load) renders zeroed hero
/// stats, the "all" filter only and an empty grid.
#[must_use]
pub fn render_page(catalog: &[Product], state: &ViewState, options: &RenderOptions) -> String {
    let visible = state.visible_products(catalog);
    let stats = HeroStats::from_catalog(catalog);
    let hero = render_hero(&stats);
    let filters = render_filter_bar(&state.filter_buttons(catalog), &options.links);
    let grid = render_grid(&visible, options);
    let panels = render_detail_panels(&visible, state.active_filter(), options);
    let modal = render_modal(
        state.selected_product(catalog),
        state.active_filter(),
        options,
    );

    let close_panel = format!(
        "if(event.key==='Escape'&&location.hash.indexOf('#{PANEL_ANCHOR_PREFIX}')===0){{location.hash='{PANEL_CLOSE_HREF}';}}"
    );
    let body_attrs = if state.is_scroll_locked() {
        let close_href = html_escape(&options.links.filter_href(state.active_filter()));
        format!(
            r#" style="overflow: hidden;" onkeydown="if(event.key==='Escape'){{window.location.href='{close_href}';}}""#
        )
    } else {
        format!(r#" onkeydown="{close_panel}""#)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <base href="{base_href}">
    <title>BALLIN MERCH</title>
    <link rel="stylesheet" href="styles.css">
    <style>{PANEL_STYLE}</style>
</head>
<body{body_attrs}>
    <nav class="navbar">
        <a class="nav-logo" href="{home}">BALLIN</a>
        <ul class="nav-menu" id="navMenu">
            <li><a class="nav-link" href="{home}#home">Главная</a></li>
            <li><a class="nav-link" href="{home}#catalog">Каталог</a></li>
        </ul>
    </nav>
    {hero}
    <section class="catalog" id="catalog">
        {filters}
        {grid}
    </section>
    {panels}
    {modal}
</body>
</html>
"#,
        base_href = html_escape(&options.base_href),
        home = html_escape(&options.links.filter_href(&ActiveFilter::All)),
    )
}

/// Escapes text for use in HTML element content and quoted attributes.
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Server deep link that opens the modal for `id` while keeping `filter`.
#[must_use]
pub fn product_href(id: &ProductId, filter: &ActiveFilter) -> String {
    let path = format!("/products/{}", encode_path_segment(id.as_str()));
    match filter {
        ActiveFilter::All => path,
        other => format!("{path}?filter={}", encode_component(other.id())),
    }
}

const PANEL_ANCHOR_PREFIX: &str = "product-";

/// Element id of the in-page detail panel for `id`. Also used verbatim as
/// the fragment of the card link, so it needs no further decoding.
#[must_use]
pub fn panel_anchor(id: &ProductId) -> String {
    format!("{PANEL_ANCHOR_PREFIX}{}", encode_path_segment(id.as_str()))
}

fn encode_component(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

fn encode_path_segment(s: &str) -> String {
    encode_component(s).replace('+', "%20")
}

/// `<img>` with local-first source and a one-shot remote fallback.
/// Renders nothing when `remote_url` is absent.
pub(crate) fn image_tag(
    remote_url: Option<&str>,
    element_id: Option<&str>,
    class: &str,
    alt: &str,
    options: &RenderOptions,
) -> String {
    let Some(remote_url) = remote_url else {
        return String::new();
    };
    let id_attr = element_id
        .map(|id| format!(r#" id="{}""#, html_escape(id)))
        .unwrap_or_default();
    let alt = html_escape(&alt.replace('"', ""));
    let resolved = resolve_image(remote_url, &options.images_dir);
    let src = html_escape(&resolved.src);

    match resolved.fallback {
        Some(fallback) => format!(
            r#"<img{id_attr} class="{class}" src="{src}" data-fallback="{fallback}" alt="{alt}" loading="lazy" onerror="this.onerror=null;this.src=this.dataset.fallback;">"#,
            fallback = html_escape(&fallback),
        ),
        None => format!(r#"<img{id_attr} class="{class}" src="{src}" alt="{alt}" loading="lazy">"#),
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
