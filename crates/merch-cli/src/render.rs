//! Static export of the catalog page.
//!
//! Without `--filter` the export is one file per offered filter: the "all"
//! view at `out` and `filter-{id}.html` next to it. Filter buttons link
//! between these files and product cards open detail panels embedded in each
//! page, so the export works from disk or any static host. With `--filter`
//! only that view is written to `out`.

use std::path::{Path, PathBuf};

use merch_core::render::static_page_name;
use merch_core::{render_page, AppConfig, Product, RenderOptions, ViewEvent, ViewState};
use merch_scraper::CatalogLoader;

/// Loads the catalog and writes the rendered page(s).
///
/// A catalog that cannot be loaded renders as an empty page, the same as the
/// live server.
///
/// # Errors
///
/// Returns an error if the loader cannot be built or a file cannot be
/// written.
pub(crate) async fn run_render(
    config: &AppConfig,
    filter: Option<&str>,
    out: &Path,
) -> anyhow::Result<()> {
    let loader = CatalogLoader::from_config(config)?;
    let catalog = loader.load_or_empty().await;

    let pages = export_pages(&catalog, filter, &config.images_dir, out);
    for (path, html) in &pages {
        tokio::fs::write(path, html).await?;
    }

    println!(
        "rendered {} page(s) for {} products into {}",
        pages.len(),
        catalog.len(),
        out.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .display()
    );
    Ok(())
}

/// Pages of a static export as `(path, html)`.
fn export_pages(
    catalog: &[Product],
    filter: Option<&str>,
    images_dir: &str,
    out: &Path,
) -> Vec<(PathBuf, String)> {
    let index_file = out
        .file_name()
        .map_or_else(|| "index.html".to_string(), |n| n.to_string_lossy().into_owned());
    let options = RenderOptions::static_export(images_dir, index_file.as_str());

    if let Some(filter) = filter {
        let state = view_for(catalog, filter);
        return vec![(out.to_path_buf(), render_page(catalog, &state, &options))];
    }

    ViewState::new()
        .filter_buttons(catalog)
        .iter()
        .map(|button| {
            let state = view_for(catalog, button.id);
            let name = static_page_name(state.active_filter(), &index_file);
            (
                out.with_file_name(name),
                render_page(catalog, &state, &options),
            )
        })
        .collect()
}

fn view_for(catalog: &[Product], filter: &str) -> ViewState {
    let mut state = ViewState::new();
    state.apply(catalog, ViewEvent::SelectFilter(filter.to_owned()));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use merch_core::ActiveFilter;

    fn catalog() -> Vec<Product> {
        serde_json::from_value(serde_json::json!([
            {"id": "1", "title": "Худи", "category": "hoodie"},
            {"id": "2", "title": "Шорты", "category": "shorts"}
        ]))
        .expect("catalog")
    }

    #[test]
    fn offered_filter_is_selected() {
        let state = view_for(&catalog(), "shorts");
        assert_eq!(
            state.active_filter(),
            &ActiveFilter::Category("shorts".to_string())
        );
        assert_eq!(state.visible_products(&catalog()).len(), 1);
    }

    #[test]
    fn unoffered_filter_renders_all() {
        let state = view_for(&catalog(), "longsleeve");
        assert_eq!(state.active_filter(), &ActiveFilter::All);
    }

    #[test]
    fn full_export_writes_a_page_per_filter_with_relative_links() {
        let pages = export_pages(&catalog(), None, "images", Path::new("site/index.html"));

        let paths: Vec<&Path> = pages.iter().map(|(p, _)| p.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                Path::new("site/index.html"),
                Path::new("site/filter-hoodie.html"),
                Path::new("site/filter-shorts.html"),
            ]
        );

        let (_, shorts) = &pages[2];
        assert!(shorts.contains(r#"data-filter="all" href="index.html""#));
        assert!(shorts.contains(r#"data-filter="hoodie" href="filter-hoodie.html""#));
        assert!(shorts.contains(r#"class="filter-btn active" data-filter="shorts""#));
        assert!(shorts.contains(r##"href="#product-2""##));
        assert!(shorts.contains(r#"<div id="product-2" class="modal product-modal""#));
        assert!(!shorts.contains("/products/"));
        assert!(!shorts.contains(r#"href="/"#));
    }

    #[test]
    fn filter_export_writes_only_that_view() {
        let pages = export_pages(&catalog(), Some("hoodie"), "images", Path::new("out.html"));

        assert_eq!(pages.len(), 1);
        let (path, html) = &pages[0];
        assert_eq!(path, Path::new("out.html"));
        assert!(html.contains(r#"data-filter="all" href="out.html""#));
        assert!(html.contains(r#"class="filter-btn active" data-filter="hoodie""#));
    }
}
