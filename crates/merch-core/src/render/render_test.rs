use super::*;
use crate::view::{CloseTrigger, ViewEvent};

fn hoodie() -> Product {
    Product {
        id: Some("1".into()),
        title: Some("Zip Hoodie".into()),
        sku: Some("ZH-1".into()),
        badge: Some("NEW".into()),
        category: Some("hoodie".into()),
        price_current: Some(2990.0),
        price_old: Some(12990.0),
        images: crate::product::ProductImages {
            front: Some("https://static.tildacdn.com/tild1/front.jpg".into()),
            back: Some("https://static.tildacdn.com/tild1/back.jpg".into()),
        },
    }
}

fn shorts() -> Product {
    Product {
        id: Some("3".into()),
        title: Some("Шорты".into()),
        category: Some("shorts".into()),
        price_current: Some(2490.0),
        ..Product::default()
    }
}

fn gift() -> Product {
    Product {
        id: Some("2".into()),
        title: Some("Подарочный \"сертификат\"".into()),
        sku: Some("gift".into()),
        category: Some("tshirt".into()),
        ..Product::default()
    }
}

#[test]
fn image_tag_wires_one_shot_fallback() {
    let tag = image_tag(
        Some("https://cdn.example.com/shop/img/front-1.jpg"),
        None,
        "product-image",
        "Tee",
        &RenderOptions::default(),
    );
    assert!(tag.contains(r#"src="images/front-1.jpg""#), "{tag}");
    assert!(tag.contains(r#"data-fallback="https://cdn.example.com/shop/img/front-1.jpg""#));
    assert!(tag.contains("this.onerror=null;this.src=this.dataset.fallback;"));
}

#[test]
fn image_tag_without_local_path_has_no_fallback() {
    let tag = image_tag(
        Some("front.jpg"),
        Some("modalImage"),
        "modal-image",
        "Tee",
        &RenderOptions::default(),
    );
    assert!(tag.starts_with(r#"<img id="modalImage" class="modal-image" src="front.jpg""#));
    assert!(!tag.contains("onerror"));
    assert!(!tag.contains("data-fallback"));
}

#[test]
fn image_tag_strips_quotes_from_alt_and_skips_missing_url() {
    let tag = image_tag(
        Some("https://cdn.example.com/a.jpg"),
        None,
        "c",
        r#"The "Best" Tee"#,
        &RenderOptions::default(),
    );
    assert!(tag.contains(r#"alt="The Best Tee""#));
    assert_eq!(image_tag(None, None, "c", "alt", &RenderOptions::default()), "");
}

#[test]
fn card_renders_badge_back_image_and_prices() {
    let product = hoodie();
    let html = render_product_card(&product, 2, &RenderOptions::default());
    assert!(html.contains("product-card has-back"));
    assert!(html.contains(r#"<div class="product-badge">NEW</div>"#));
    assert!(html.contains("product-image-back"));
    assert!(html.contains("animation-delay: 0.06s"));
    assert!(html.contains(r#"<div class="price-current">2990 р.</div>"#));
    assert!(html.contains("<div class=\"price-old\">12\u{a0}990 р.</div>"));
    assert!(html.contains(r##"href="#product-1""##));
    assert!(html.contains("<p class=\"product-category\">Худи</p>"));
}

#[test]
fn card_omits_missing_optional_fragments() {
    let product = gift();
    let html = render_product_card(&product, 0, &RenderOptions::default());
    assert!(!html.contains("has-back"));
    assert!(!html.contains("product-badge"));
    assert!(!html.contains("<img"));
    assert!(!html.contains("price-old"));
    assert!(html.contains(r#"<div class="price-current"></div>"#));
    assert!(html.contains(r##"href="#product-2""##));
    assert!(html.contains("Подарочный &quot;сертификат&quot;"));
}

#[test]
fn card_without_id_is_not_a_link() {
    let mut product = hoodie();
    product.id = None;
    let html = render_product_card(&product, 0, &RenderOptions::default());
    assert!(html.starts_with("<div class=\"product-card has-back\""));
    assert!(!html.contains("href="));
}

#[test]
fn filter_bar_marks_active_button() {
    let catalog = vec![hoodie(), gift()];
    let mut state = ViewState::new();
    state.apply(&catalog, ViewEvent::SelectFilter("certificate".into()));
    let html = render_filter_bar(&state.filter_buttons(&catalog), &LinkStyle::Server);
    assert!(html.contains(r#"<a class="filter-btn" data-filter="all" href="/">"#));
    assert!(html.contains(
        r#"<a class="filter-btn active" data-filter="certificate" href="/?filter=certificate">"#
    ));
    assert!(html.contains("<span>Сертификат</span>"));
    assert_eq!(html.matches("filter-btn active").count(), 1);
}

#[test]
fn page_for_empty_catalog_has_zero_stats_and_empty_grid() {
    let html = render_page(&[], &ViewState::new(), &RenderOptions::default());
    assert!(html.contains(r#"<span class="stat-number" data-target="0">0</span><span class="stat-label">товаров</span>"#));
    assert!(html.contains(r#"<span class="stat-number" data-target="0">0</span><span class="stat-label">категорий</span>"#));
    assert!(html.contains(r#"<div class="products-grid" id="productsGrid"></div>"#));
    assert!(html.contains(r#"style="display: none;""#));
    assert!(!html.contains("overflow: hidden"));
}

#[test]
fn page_with_open_modal_locks_scroll() {
    let catalog = vec![hoodie(), gift()];
    let mut state = ViewState::new();
    state.apply(&catalog, ViewEvent::SelectFilter("hoodie".into()));
    state.apply(&catalog, ViewEvent::OpenProduct("1".into()));
    let html = render_page(&catalog, &state, &RenderOptions::default());

    assert!(html.contains(r#"<body style="overflow: hidden;""#));
    assert!(html.contains("event.key==='Escape'"));
    assert!(html.contains(r#"<h2 id="modalTitle">Zip Hoodie</h2>"#));
    assert!(html.contains(r#"<img id="modalImage" class="modal-image" src="images/front.jpg""#));
    assert!(html.contains(r#"class="modal-close" href="/?filter=hoodie""#));
    assert!(html.contains(r#"class="modal-backdrop" href="/?filter=hoodie""#));

    state.apply(&catalog, ViewEvent::CloseModal(CloseTrigger::Escape));
    let html = render_page(&catalog, &state, &RenderOptions::default());
    assert!(!html.contains("overflow: hidden"));
    assert!(html.contains(r#"style="display: none;""#));
}

#[test]
fn modal_without_front_image_renders_empty_image() {
    let catalog = vec![gift()];
    let html = render_modal(catalog.first(), &ActiveFilter::All, &RenderOptions::default());
    assert!(html.contains(r#"<img id="modalImage" class="modal-image" alt="">"#));
    assert!(html.contains(r#"<div class="modal-meta">Футболки</div>"#));
}

#[test]
fn page_uses_configured_images_dir_and_base() {
    let catalog = vec![hoodie()];
    let options = RenderOptions {
        images_dir: "assets/img".into(),
        base_href: "./".into(),
        ..RenderOptions::default()
    };
    let html = render_page(&catalog, &ViewState::new(), &options);
    assert!(html.contains(r#"<base href="./">"#));
    assert!(html.contains(r#"src="assets/img/front.jpg""#));
}

#[test]
fn hrefs_encode_ids_and_filters() {
    assert_eq!(LinkStyle::Server.filter_href(&ActiveFilter::All), "/");
    assert_eq!(
        LinkStyle::Server.filter_href(&ActiveFilter::from_id("zip hoodie")),
        "/?filter=zip+hoodie"
    );
    assert_eq!(
        product_href(&ProductId::from("a b"), &ActiveFilter::All),
        "/products/a%20b"
    );
}

#[test]
fn html_escape_covers_markup_characters() {
    assert_eq!(
        html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
        "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
    );
}

#[test]
fn page_embeds_detail_panel_per_visible_product() {
    let catalog = vec![hoodie(), gift(), shorts()];
    let mut state = ViewState::new();
    state.apply(&catalog, ViewEvent::SelectFilter("hoodie".into()));
    let html = render_page(&catalog, &state, &RenderOptions::default());

    // Cards open panels already present in the page.
    assert!(html.contains(r##"href="#product-1""##));
    assert!(html.contains(r#"<div id="product-1" class="modal product-modal""#));
    assert!(html.contains(r#"<h2 id="product-1-title">Zip Hoodie</h2>"#));
    assert!(html.contains(r#"<div id="product-2" class="modal product-modal""#));
    assert!(!html.contains(r#"id="product-3""#));
    assert!(html.contains(".product-modal:target{display:block}"));

    assert!(html.contains(r##"class="modal-close" href="#catalog""##));
    assert!(html.contains(r#"class="modal-permalink" href="/products/1?filter=hoodie""#));
    assert!(html.contains("location.hash='#catalog'"));
    assert!(html.contains(r#"<div id="productModal" class="modal" style="display: none;"></div>"#));
}

#[test]
fn panel_anchor_encodes_ids() {
    assert_eq!(panel_anchor(&ProductId::from("42")), "product-42");
    assert_eq!(panel_anchor(&ProductId::from("a b")), "product-a%20b");
}

#[test]
fn static_export_links_between_sibling_files() {
    let catalog = vec![hoodie(), gift(), shorts()];
    let options = RenderOptions::static_export("images", "index.html");
    let mut state = ViewState::new();
    state.apply(&catalog, ViewEvent::SelectFilter("shorts".into()));
    let html = render_page(&catalog, &state, &options);

    assert!(html.contains(r#"<base href="./">"#));
    assert!(html.contains(r#"<a class="filter-btn" data-filter="all" href="index.html">"#));
    assert!(html.contains(r#"data-filter="certificate" href="filter-certificate.html">"#));
    assert!(html.contains(r#"<a class="filter-btn active" data-filter="shorts" href="filter-shorts.html">"#));
    assert!(html.contains(r#"class="nav-logo" href="index.html""#));
    assert!(html.contains(r##"href="#product-3""##));
    assert!(html.contains(r#"<div id="product-3" class="modal product-modal""#));
    assert!(!html.contains("modal-permalink"));
    assert!(!html.contains(r#"href="/"#), "no server-rooted links in a static export");
}

#[test]
fn static_page_names_are_file_safe() {
    assert_eq!(static_page_name(&ActiveFilter::All, "catalog.html"), "catalog.html");
    assert_eq!(
        static_page_name(&ActiveFilter::from_id("hoodie"), "index.html"),
        "filter-hoodie.html"
    );
    assert_eq!(
        static_page_name(&ActiveFilter::from_id("zip/hoodie x"), "index.html"),
        "filter-zip_hoodie_x.html"
    );
}
