use super::*;

fn item(id: &str, category: &str, sku: Option<&str>, title: &str) -> Product {
    Product {
        id: Some(ProductId::from(id)),
        title: Some(title.to_owned()),
        sku: sku.map(str::to_owned),
        category: Some(category.to_owned()),
        ..Product::default()
    }
}

/// Hoodie plus a gift certificate that is labelled as a t-shirt.
fn hoodie_and_gift() -> Vec<Product> {
    vec![
        item("1", "hoodie", None, "Худи"),
        item("2", "tshirt", Some("gift"), "Подарочный сертификат"),
    ]
}

fn ids(view: &[&Product]) -> Vec<String> {
    view.iter()
        .map(|p| p.id.as_ref().map_or_else(String::new, ToString::to_string))
        .collect()
}

#[test]
fn active_filter_from_id() {
    assert_eq!(ActiveFilter::from_id("all"), ActiveFilter::All);
    assert_eq!(ActiveFilter::from_id(""), ActiveFilter::All);
    assert_eq!(ActiveFilter::from_id("certificate"), ActiveFilter::Certificate);
    assert_eq!(
        ActiveFilter::from_id("hoodie"),
        ActiveFilter::Category("hoodie".to_string())
    );
    assert_eq!(ActiveFilter::default().id(), "all");
    assert_eq!("shorts".parse::<ActiveFilter>().unwrap().to_string(), "shorts");
}

#[test]
fn all_returns_full_catalog_in_order() {
    let catalog = hoodie_and_gift();
    let view = filtered_view(&catalog, &ActiveFilter::All);
    assert_eq!(ids(&view), vec!["1", "2"]);
}

#[test]
fn category_filter_injects_certificates() {
    let catalog = hoodie_and_gift();
    let view = filtered_view(&catalog, &ActiveFilter::from_id("hoodie"));
    assert_eq!(ids(&view), vec!["1", "2"]);
}

#[test]
fn certificate_filter_returns_only_certificates() {
    let catalog = hoodie_and_gift();
    let view = filtered_view(&catalog, &ActiveFilter::Certificate);
    assert_eq!(ids(&view), vec!["2"]);
}

#[test]
fn certificate_filter_preserves_catalog_order() {
    let catalog = vec![
        item("a", "certificate", None, "Сертификат 5000"),
        item("b", "hoodie", None, "Hoodie"),
        item("c", "tshirt", Some("GIFT"), "Gift card"),
    ];
    let view = filtered_view(&catalog, &ActiveFilter::Certificate);
    assert_eq!(ids(&view), vec!["a", "c"]);
}

#[test]
fn category_and_certificate_overlap_appears_once() {
    // "certificate" literal category matches both halves of the union.
    let catalog = vec![
        item("1", "certificate", None, "Сертификат"),
        item("2", "hoodie", None, "Hoodie"),
    ];
    let view = filtered_view(&catalog, &ActiveFilter::Category("certificate".into()));
    assert_eq!(ids(&view), vec!["1"]);
}

#[test]
fn duplicate_ids_keep_first_position_and_last_instance() {
    let mut first = item("7", "shorts", None, "Shorts v1");
    first.price_current = Some(2490.0);
    let other = item("8", "shorts", None, "Shorts other");
    let mut second = item("7", "tshirt", Some("gift"), "Shorts v2");
    second.price_current = Some(2590.0);
    let catalog = vec![first, other, second];

    let view = filtered_view(&catalog, &ActiveFilter::from_id("shorts"));
    assert_eq!(ids(&view), vec!["7", "8"]);
    assert_eq!(view[0].title.as_deref(), Some("Shorts v2"));
    assert_eq!(view[0].price_current, Some(2590.0));
}

#[test]
fn category_filter_drops_products_without_id() {
    let mut anonymous = item("x", "hoodie", None, "Hoodie");
    anonymous.id = None;
    let catalog = vec![anonymous, item("2", "hoodie", None, "Hoodie 2")];
    let view = filtered_view(&catalog, &ActiveFilter::from_id("hoodie"));
    assert_eq!(ids(&view), vec!["2"]);
}

#[test]
fn unknown_category_yields_only_certificates() {
    let catalog = hoodie_and_gift();
    let view = filtered_view(&catalog, &ActiveFilter::from_id("socks"));
    assert_eq!(ids(&view), vec!["2"]);
}

#[test]
fn category_filter_without_certificates_is_plain_filter() {
    let catalog = vec![
        item("1", "hoodie", None, "Hoodie"),
        item("2", "shorts", None, "Shorts"),
        item("3", "hoodie", None, "Hoodie 2"),
    ];
    let view = filtered_view(&catalog, &ActiveFilter::from_id("hoodie"));
    assert_eq!(ids(&view), vec!["1", "3"]);
}

#[test]
fn filters_start_with_all_and_follow_priority_order() {
    let catalog = vec![
        item("1", "longsleeve", None, "Long Sleeve"),
        item("2", "hoodie", None, "Hoodie"),
        item("3", "shorts", None, "Shorts"),
        item("4", "certificate", None, "Сертификат"),
    ];
    let buttons = build_filters(&catalog, &ActiveFilter::All);
    let ids: Vec<&str> = buttons.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["all", "certificate", "hoodie", "shorts", "longsleeve"]);
    assert_eq!(buttons[0].label, "Весь каталог");
    assert_eq!(buttons[2].label, "Худи");
}

#[test]
fn certificate_filter_is_injected_by_predicate() {
    let catalog = hoodie_and_gift();
    let buttons = build_filters(&catalog, &ActiveFilter::All);
    let ids: Vec<&str> = buttons.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["all", "certificate", "hoodie"]);
}

#[test]
fn categories_outside_priority_list_get_no_button() {
    let catalog = vec![
        item("1", "tshirt", None, "Tee"),
        item("2", "jersey", None, "Jersey"),
    ];
    let buttons = build_filters(&catalog, &ActiveFilter::All);
    let ids: Vec<&str> = buttons.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec!["all"]);
}

#[test]
fn exactly_one_button_is_active() {
    let catalog = hoodie_and_gift();
    for active in [ActiveFilter::All, ActiveFilter::Certificate, ActiveFilter::from_id("hoodie")] {
        let buttons = build_filters(&catalog, &active);
        let active_ids: Vec<&str> = buttons.iter().filter(|b| b.active).map(|b| b.id).collect();
        assert_eq!(active_ids, vec![active.id()]);
    }
}

#[test]
fn empty_catalog_has_only_all_filter() {
    let buttons = build_filters(&[], &ActiveFilter::All);
    assert_eq!(buttons.len(), 1);
    assert!(buttons[0].active);
}

#[test]
fn hero_stats_count_distinct_literal_categories() {
    let mut uncategorized = item("3", "", None, "Mystery");
    uncategorized.category = None;
    let catalog = vec![
        item("1", "hoodie", None, "Hoodie"),
        item("2", "hoodie", None, "Hoodie 2"),
        item("4", "tshirt", Some("gift"), "Сертификат"),
        uncategorized,
    ];
    let stats = HeroStats::from_catalog(&catalog);
    assert_eq!(stats.total_products, 4);
    assert_eq!(stats.total_categories, 2);
    assert_eq!(stats.third, 100);
}

#[test]
fn hero_stats_empty_are_zero() {
    let stats = HeroStats::from_catalog(&[]);
    assert_eq!(stats.total_products, 0);
    assert_eq!(stats.total_categories, 0);
}
